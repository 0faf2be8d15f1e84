// Component Builder
//
// Assembles the metadata of one component class: tag name, documentation, members,
// styling hooks, slots, events and source location. Heritage is attached by the resolver.

use super::context::AnalysisContext;
use super::jsdoc::{documentation, read_doc_tags, tag_text};
use super::method::MethodBuilder;
use super::property::PropertyBuilder;
use crate::diagnostics::ErrorCode;
use crate::meta::{
    parent_dir, ComponentMeta, CssPartMeta, CssPropMeta, EventMeta, NodeRef, SlotMeta, SourceMeta,
    DEFAULT_SLOT_NAME,
};
use std::collections::HashSet;
use ts::{ClassDeclaration, Expression, JsDocTag, SourceFile};

/// Doc tags that name a component's tag, in precedence order.
pub const TAG_NAME_DOC_TAGS: &[&str] = &["tagname", "customElement", "element"];

const CSS_PROP_TAGS: &[&str] = &["cssprop", "cssproperty"];
const CSS_PART_TAGS: &[&str] = &["csspart"];
const SLOT_TAGS: &[&str] = &["slot"];
const EVENT_TAGS: &[&str] = &["fires", "event"];

pub struct ComponentBuilder<'a> {
    ctx: AnalysisContext<'a>,
}

impl<'a> ComponentBuilder<'a> {
    pub fn new(ctx: AnalysisContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn build(&self, file: &SourceFile, class: &ClassDeclaration) -> ComponentMeta {
        let class_name = class.name_text().unwrap_or("default").to_string();
        let mut component = ComponentMeta::new(class_name, SourceMeta::from_file(file, class.span));
        component.tag_name = self.tag_name(file, class);
        component.documentation = documentation(class.jsdoc.as_ref());
        component.doc_tags = read_doc_tags(class.jsdoc.as_ref(), file.file_name());

        let properties = PropertyBuilder::new(self.ctx, file, class);
        let methods = MethodBuilder::new(self.ctx, file);
        for member in &class.members {
            if let Some(prop) = properties.build(member) {
                component.props.push(prop);
            } else if let Some(method) = methods.build(member) {
                component.methods.push(method);
            }
        }

        let tags: &[JsDocTag] = class.jsdoc.as_ref().map(|doc| doc.tags.as_slice()).unwrap_or(&[]);
        let mut hooks = HookReader::new(self.ctx, file);
        for tag in tags {
            let name = tag.tag_name.as_str();
            if CSS_PROP_TAGS.contains(&name) {
                if let Some((title, description, node)) = hooks.styling_hook(tag, "cssprop") {
                    component.css_props.push(CssPropMeta {
                        name: title,
                        description,
                        node,
                    });
                }
            } else if CSS_PART_TAGS.contains(&name) {
                if let Some((title, description, node)) = hooks.styling_hook(tag, "csspart") {
                    component.css_parts.push(CssPartMeta {
                        name: title,
                        description,
                        node,
                    });
                }
            } else if SLOT_TAGS.contains(&name) {
                if let Some(slot) = hooks.slot(tag) {
                    component.slots.push(slot);
                }
            } else if EVENT_TAGS.contains(&name) {
                if let Some((title, description, node)) = hooks.event(tag) {
                    component.events.push(EventMeta {
                        name: title,
                        description,
                        node,
                    });
                }
            }
        }
        component
    }

    /// Decorator argument first, then the tag-name doc tags.
    fn tag_name(&self, file: &SourceFile, class: &ClassDeclaration) -> Option<String> {
        let from_decorator = class
            .decorators
            .iter()
            .filter(|d| d.name().map_or(false, |n| self.ctx.config.is_component_decorator(n)))
            .filter_map(|d| d.arguments()?.first())
            .find_map(|arg| match arg {
                Expression::StringLiteral(lit) => Some(lit.value.clone()),
                Expression::ObjectLiteral(obj) => ["tag", "tagName", "name"]
                    .iter()
                    .find_map(|key| obj.get(key).and_then(Expression::as_string_literal))
                    .map(str::to_string),
                Expression::Other(span) => Some(strip_quotes(file.text_of(*span)).to_string()),
                _ => None,
            });

        let dir = parent_dir(file.file_name());
        let tags: &[JsDocTag] = class.jsdoc.as_ref().map(|doc| doc.tags.as_slice()).unwrap_or(&[]);
        from_decorator
            .or_else(|| {
                TAG_NAME_DOC_TAGS.iter().find_map(|wanted| {
                    tags.iter()
                        .filter(|t| t.tag_name == *wanted)
                        .find_map(|t| tag_text(t, &dir))
                })
            })
            .map(|t| strip_quotes(t.trim()).to_string())
            .filter(|t| !t.is_empty())
    }
}

fn strip_quotes(text: &str) -> &str {
    let text = text.trim();
    for quote in ['\'', '"', '`'] {
        if let Some(inner) = text.strip_prefix(quote).and_then(|t| t.strip_suffix(quote)) {
            return inner;
        }
    }
    text
}

/// Splits `title - description` on the first ` - `.
pub fn split_title(text: &str) -> (String, String) {
    let text = text.trim();
    if let Some((title, description)) = text.split_once(" - ") {
        return (title.trim().to_string(), description.trim().to_string());
    }
    if text == "-" {
        return (String::new(), String::new());
    }
    if let Some(description) = text.strip_prefix("- ") {
        return (String::new(), description.trim().to_string());
    }
    (text.to_string(), String::new())
}

/// Reads the hook tags of one class, tracking titles and the default slot across the whole
/// class so duplicates can be reported.
struct HookReader<'a> {
    ctx: AnalysisContext<'a>,
    file: &'a SourceFile,
    dir: String,
    seen: HashSet<(&'static str, String)>,
    has_default_slot: bool,
}

type Hook = (String, String, NodeRef);

impl<'a> HookReader<'a> {
    fn new(ctx: AnalysisContext<'a>, file: &'a SourceFile) -> Self {
        Self {
            ctx,
            file,
            dir: parent_dir(file.file_name()),
            seen: HashSet::new(),
            has_default_slot: false,
        }
    }

    fn parse(&self, tag: &JsDocTag) -> Hook {
        let text = tag_text(tag, &self.dir).unwrap_or_default();
        let (title, description) = split_title(&text);
        (title, description, NodeRef::new(self.file.file_name(), tag.span))
    }

    /// False (after warning) when `title` was already seen for `kind`.
    fn first_occurrence(&mut self, kind: &'static str, title: &str, tag: &JsDocTag) -> bool {
        if self.seen.insert((kind, title.to_string())) {
            return true;
        }
        self.ctx.diagnostics.warn(
            ErrorCode::DuplicateStylingHook,
            self.file,
            tag.span,
            format!("Duplicate `@{}` entry `{}`; only the first one is kept.", tag.tag_name, title),
        );
        false
    }

    fn styling_hook(&mut self, tag: &JsDocTag, kind: &'static str) -> Option<Hook> {
        let (title, description, node) = self.parse(tag);
        let example = match kind {
            "csspart" => "@csspart label - The text label",
            _ => "@cssprop --my-color - The text color",
        };
        if title.is_empty() {
            self.ctx.diagnostics.warn(
                ErrorCode::MissingTitle,
                self.file,
                tag.span,
                format!("`@{}` tag is missing a title, e.g. `{}`.", tag.tag_name, example),
            );
        } else if !self.first_occurrence(kind, &title, tag) {
            return None;
        }
        if description.is_empty() {
            self.ctx.diagnostics.warn(
                ErrorCode::MissingDescription,
                self.file,
                tag.span,
                format!("`@{}` tag is missing a description, e.g. `{}`.", tag.tag_name, example),
            );
        }
        Some((title, description, node))
    }

    fn slot(&mut self, tag: &JsDocTag) -> Option<SlotMeta> {
        let (title, description, node) = self.parse(tag);
        if !title.is_empty() {
            if !self.first_occurrence("slot", &title, tag) {
                return None;
            }
            return Some(SlotMeta {
                name: title,
                description,
                default: false,
                node,
            });
        }
        if self.has_default_slot {
            self.ctx.diagnostics.warn(
                ErrorCode::DuplicateDefaultSlot,
                self.file,
                tag.span,
                "Only one `@slot` tag may omit its title; it documents the default slot.",
            );
            return Some(SlotMeta {
                name: String::new(),
                description,
                default: false,
                node,
            });
        }
        self.has_default_slot = true;
        Some(SlotMeta {
            name: DEFAULT_SLOT_NAME.to_string(),
            description,
            default: true,
            node,
        })
    }

    fn event(&mut self, tag: &JsDocTag) -> Option<Hook> {
        let hook = self.parse(tag);
        if !hook.0.is_empty() && !self.first_occurrence("event", &hook.0, tag) {
            return None;
        }
        Some(hook)
    }
}
