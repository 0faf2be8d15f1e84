// JSDoc Fixture Parser
//
// Parses `/** ... */` blocks of fixture text into the doc nodes a front end would attach.

use ts::{JsDoc, JsDocComment, JsDocCommentPart, JsDocTag, Span};

/// Parse the doc block covering `span` of `text`.
pub fn parse_jsdoc(text: &str, span: Span) -> JsDoc {
    let raw = &text[span.start..span.end];
    let body_start = span.start + 3;
    let body = raw
        .strip_prefix("/**")
        .map(|b| b.strip_suffix("*/").unwrap_or(b))
        .unwrap_or("");

    let mut description = String::new();
    let mut tags: Vec<(String, String, usize)> = Vec::new();
    let mut in_description = true;

    let mut offset = body_start;
    for line in body.split('\n') {
        let line_start = offset;
        offset += line.len() + 1;

        let trimmed = line.trim().trim_start_matches('*').trim();
        if let Some(tag_body) = trimmed.strip_prefix('@') {
            in_description = false;
            let at = line_start + line.find('@').unwrap_or(0);
            let (name, rest) = match tag_body.find(char::is_whitespace) {
                Some(pos) => (&tag_body[..pos], tag_body[pos..].trim()),
                None => (tag_body, ""),
            };
            tags.push((name.to_string(), rest.to_string(), at));
        } else if in_description {
            if !description.is_empty() && !trimmed.is_empty() {
                description.push(' ');
            }
            description.push_str(trimmed);
        } else if let Some((_, text, _)) = tags.last_mut() {
            if !trimmed.is_empty() {
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(trimmed);
            }
        }
    }

    let tags = tags
        .into_iter()
        .map(|(tag_name, comment, at)| JsDocTag {
            span: Span::new(at, at + 1 + tag_name.len() + comment.len()),
            comment: tag_comment(&comment),
            tag_name,
        })
        .collect();

    let description = description.trim().to_string();
    JsDoc {
        comment: (!description.is_empty()).then_some(description),
        tags,
        span,
    }
}

/// Plain text, or text interleaved with `{@link ...}` parts.
fn tag_comment(comment: &str) -> Option<JsDocComment> {
    if comment.is_empty() {
        return None;
    }
    if !comment.contains("{@link") {
        return Some(JsDocComment::Text(comment.to_string()));
    }

    let mut parts = Vec::new();
    let mut rest = comment;
    while let Some(open) = rest.find("{@link") {
        if open > 0 {
            parts.push(JsDocCommentPart::Text(rest[..open].to_string()));
        }
        let inner_start = open + "{@link".len();
        let close = rest[inner_start..]
            .find('}')
            .map_or(rest.len(), |i| inner_start + i);
        let inner = rest[inner_start..close].trim();
        parts.push(link_part(inner));
        rest = rest.get(close + 1..).unwrap_or("");
    }
    if !rest.is_empty() {
        parts.push(JsDocCommentPart::Text(rest.to_string()));
    }
    Some(JsDocComment::Parts(parts))
}

/// The front end splits a link target at its first `:` the way it parses entity names.
fn link_part(inner: &str) -> JsDocCommentPart {
    let (target, label) = match inner.find(char::is_whitespace) {
        Some(pos) => (&inner[..pos], &inner[pos..]),
        None => (inner, ""),
    };
    match target.find(':') {
        Some(colon) => JsDocCommentPart::Link {
            name: Some(target[..colon].to_string()),
            text: format!("{}{}", &target[colon..], label),
        },
        None if target.is_empty() => JsDocCommentPart::Link {
            name: None,
            text: label.trim().to_string(),
        },
        None => JsDocCommentPart::Link {
            name: Some(target.to_string()),
            text: label.trim().to_string(),
        },
    }
}
