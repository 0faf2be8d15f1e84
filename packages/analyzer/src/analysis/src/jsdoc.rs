// JSDoc Reader
//
// Turns the doc blocks attached to declarations into `{name, text}` tag records and
// free-text documentation.

use crate::meta::{parent_dir, DocTagMeta};
use ts::{JsDoc, JsDocComment, JsDocCommentPart, JsDocTag, Symbol};

/// Tag records of a doc block, in source order. Tag text is resolved against `file_name`.
pub fn read_doc_tags(jsdoc: Option<&JsDoc>, file_name: &str) -> Vec<DocTagMeta> {
    let dir = parent_dir(&file_name.replace('\\', "/"));
    jsdoc
        .map(|doc| {
            doc.tags
                .iter()
                .filter(|tag| !tag.tag_name.is_empty())
                .map(|tag| DocTagMeta::new(tag.tag_name.clone(), tag_text(tag, &dir)))
                .collect()
        })
        .unwrap_or_default()
}

/// Free text before the first tag, trimmed.
pub fn documentation(jsdoc: Option<&JsDoc>) -> String {
    jsdoc
        .and_then(|doc| doc.comment.as_deref())
        .map(|c| c.trim().to_string())
        .unwrap_or_default()
}

/// Documentation of a symbol's first declaration that carries a doc block.
pub fn symbol_documentation(symbol: &Symbol) -> String {
    symbol
        .declarations
        .iter()
        .find_map(|d| declaration_jsdoc(&d.declaration))
        .map(|doc| documentation(Some(doc)))
        .unwrap_or_default()
}

fn declaration_jsdoc(declaration: &ts::Declaration) -> Option<&JsDoc> {
    match declaration {
        ts::Declaration::Class(c) => c.jsdoc.as_ref(),
        ts::Declaration::Interface(i) => i.jsdoc.as_ref(),
        ts::Declaration::Function(f) => f.jsdoc.as_ref(),
        ts::Declaration::Variable(v) => v.jsdoc.as_ref(),
        ts::Declaration::TypeAlias(t) => t.jsdoc.as_ref(),
        ts::Declaration::Enum(_) => None,
    }
}

/// Resolved text of one tag, `None` when the tag has no usable text.
pub fn tag_text(tag: &JsDocTag, dir: &str) -> Option<String> {
    let raw = match tag.comment.as_ref()? {
        JsDocComment::Text(text) => text.trim().to_string(),
        JsDocComment::Parts(parts) => join_parts(parts),
    };
    if raw.is_empty() {
        return None;
    }
    Some(resolve_relative(&raw, dir).unwrap_or(raw))
}

fn join_parts(parts: &[JsDocCommentPart]) -> String {
    let mut out = String::new();
    for part in parts {
        match part {
            JsDocCommentPart::Text(text) => out.push_str(text),
            JsDocCommentPart::Link { name, text } => out.push_str(&link_text(name.as_deref(), text)),
        }
    }
    out.trim().to_string()
}

/// `{@link https://x.dev}` arrives as `name: "https", text: "://x.dev"`.
fn link_text(name: Option<&str>, text: &str) -> String {
    let text = text.trim_start();
    match name {
        _ if text.starts_with("://") => format!("{}{}", name.unwrap_or("https"), text),
        Some(name) if text.is_empty() => name.to_string(),
        Some(name) => format!("{} {}", name, text),
        None => text.to_string(),
    }
}

/// Resolves `./x` and `../x` (optionally quoted) against `dir`.
fn resolve_relative(text: &str, dir: &str) -> Option<String> {
    let unquoted = text
        .strip_prefix(['\'', '"', '`'])
        .and_then(|t| t.strip_suffix(['\'', '"', '`']))
        .unwrap_or(text);
    if !(unquoted.starts_with("./") || unquoted.starts_with("../")) {
        return None;
    }

    let absolute = dir.starts_with('/');
    let mut segments: Vec<&str> = dir.split('/').filter(|s| !s.is_empty() && *s != ".").collect();
    for segment in unquoted.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().map_or(true, |s| *s == "..") {
                    if !absolute {
                        segments.push("..");
                    }
                } else {
                    segments.pop();
                }
            }
            other => segments.push(other),
        }
    }
    let joined = segments.join("/");
    Some(if absolute { format!("/{}", joined) } else { joined })
}
