// Member Metadata
//
// Records for properties, methods, events, styling hooks, slots and doc tags.

use super::source::NodeRef;
use serde::Serialize;

/// Coarse classification of a member type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    #[default]
    Any,
    String,
    Number,
    Boolean,
    Unknown,
    Never,
}

impl PrimitiveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::Any => "any",
            PrimitiveType::String => "string",
            PrimitiveType::Number => "number",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Unknown => "unknown",
            PrimitiveType::Never => "never",
        }
    }
}

/// A `@name text` doc tag. Two tags are the same tag when name and text match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct DocTagMeta {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl DocTagMeta {
    pub fn new(name: impl Into<String>, text: Option<String>) -> Self {
        Self {
            name: name.into(),
            text,
        }
    }
}

pub fn find_tag<'a>(tags: &'a [DocTagMeta], name: &str) -> Option<&'a DocTagMeta> {
    tags.iter().find(|t| t.name == name)
}

pub fn has_tag(tags: &[DocTagMeta], name: &str) -> bool {
    tags.iter().any(|t| t.name == name)
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropMeta {
    pub name: String,
    /// Resolved, printable type text.
    #[serde(rename = "type")]
    pub type_text: String,
    pub primitive: PrimitiveType,
    #[serde(rename = "static")]
    pub is_static: bool,
    pub readonly: bool,
    pub required: bool,
    pub optional: bool,
    pub internal: bool,
    pub deprecated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    pub reflect: bool,
    /// Initializer text, a default tag, `'undefined'` for optional members, or empty.
    pub default_value: String,
    #[serde(rename = "enum")]
    pub is_enum: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_default_value: Option<String>,
    pub doc_tags: Vec<DocTagMeta>,
    pub documentation: String,
    #[serde(skip)]
    pub node: NodeRef,
}

impl PropMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamMeta {
    pub name: String,
    #[serde(rename = "type")]
    pub type_text: String,
    pub primitive: PrimitiveType,
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodMeta {
    pub name: String,
    pub params: Vec<ParamMeta>,
    /// Arrow-style signature, e.g. `(value: string) => void`.
    pub signature: String,
    pub return_type: String,
    #[serde(rename = "static")]
    pub is_static: bool,
    pub internal: bool,
    pub deprecated: bool,
    pub doc_tags: Vec<DocTagMeta>,
    pub documentation: String,
    #[serde(skip)]
    pub node: NodeRef,
}

impl MethodMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMeta {
    pub name: String,
    pub description: String,
    #[serde(skip)]
    pub node: NodeRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CssPropMeta {
    pub name: String,
    pub description: String,
    #[serde(skip)]
    pub node: NodeRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CssPartMeta {
    pub name: String,
    pub description: String,
    #[serde(skip)]
    pub node: NodeRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotMeta {
    /// `DEFAULT` for the unnamed slot.
    pub name: String,
    pub description: String,
    pub default: bool,
    #[serde(skip)]
    pub node: NodeRef,
}

pub const DEFAULT_SLOT_NAME: &str = "DEFAULT";
