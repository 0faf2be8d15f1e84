// Heritage Metadata
//
// One node of a component's resolved inheritance chain.

use super::component::ComponentMeta;
use super::members::{DocTagMeta, MethodMeta, PropMeta};
use super::source::NodeRef;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeritageKind {
    Subclass,
    Interface,
    Mixin,
}

/// What an ancestor declaration turned out to be once resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HeritagePayload {
    Component(Box<ComponentMeta>),
    Mixin(Box<ComponentMeta>),
    Interface(Box<InterfaceMeta>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeritageMeta {
    /// Name as written at the heritage site.
    pub name: String,
    pub kind: HeritageKind,
    /// Printable type of the referenced expression.
    pub type_text: String,
    /// File of the resolved declaration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Name of the declaration whose heritage clause introduced this edge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// At most one resolved payload.
    #[serde(flatten)]
    pub payload: Option<HeritagePayload>,
    #[serde(skip)]
    pub node: NodeRef,
}

impl HeritageMeta {
    pub fn new(name: impl Into<String>, kind: HeritageKind) -> Self {
        Self {
            name: name.into(),
            kind,
            type_text: String::new(),
            file: None,
            parent: None,
            payload: None,
            node: NodeRef::default(),
        }
    }

    /// Heritage nested under this node's payload.
    pub fn children(&self) -> &[HeritageMeta] {
        match &self.payload {
            Some(HeritagePayload::Component(c)) | Some(HeritagePayload::Mixin(c)) => &c.heritage,
            Some(HeritagePayload::Interface(i)) => &i.heritage,
            None => &[],
        }
    }

    /// Pre-order flattening of this node and everything beneath it.
    pub fn flatten(&self) -> Vec<&HeritageMeta> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into<'a>(&'a self, out: &mut Vec<&'a HeritageMeta>) {
        out.push(self);
        for child in self.children() {
            child.flatten_into(out);
        }
    }
}

/// Metadata of a non-class ancestor.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceMeta {
    pub name: String,
    pub props: Vec<PropMeta>,
    pub methods: Vec<MethodMeta>,
    pub heritage: Vec<HeritageMeta>,
    pub doc_tags: Vec<DocTagMeta>,
    pub documentation: String,
    #[serde(skip)]
    pub node: NodeRef,
}

/// Pre-order flattening of a heritage forest.
pub fn flatten_heritage(heritage: &[HeritageMeta]) -> Vec<&HeritageMeta> {
    heritage.iter().flat_map(|h| h.flatten()).collect()
}
