// Component Metadata
//
// The per-class record assembled by the builder, enriched by heritage merging and plugin
// hooks, and frozen once handed to `transform`.

use super::heritage::HeritageMeta;
use super::members::*;
use super::source::{NodeRef, SourceMeta};
use serde::Serialize;
use ts::Diagnostic;

/// Reference to another component of the same result set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRef {
    /// Class name.
    pub name: String,
    pub tag_name: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    pub class_name: String,
    pub documentation: String,
    pub source: SourceMeta,
    pub props: Vec<PropMeta>,
    pub methods: Vec<MethodMeta>,
    pub events: Vec<EventMeta>,
    pub css_props: Vec<CssPropMeta>,
    pub css_parts: Vec<CssPartMeta>,
    pub slots: Vec<SlotMeta>,
    pub doc_tags: Vec<DocTagMeta>,
    pub heritage: Vec<HeritageMeta>,
    pub dependents: Vec<ComponentRef>,
    pub dependencies: Vec<ComponentRef>,
    #[serde(skip)]
    pub node: NodeRef,
}

impl ComponentMeta {
    pub fn new(class_name: impl Into<String>, source: SourceMeta) -> Self {
        let node = source.node.clone();
        Self {
            class_name: class_name.into(),
            source,
            node,
            ..Default::default()
        }
    }

    pub fn prop(&self, name: &str) -> Option<&PropMeta> {
        self.props.iter().find(|p| p.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodMeta> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn as_ref_entry(&self) -> Option<ComponentRef> {
        self.tag_name.as_ref().map(|tag| ComponentRef {
            name: self.class_name.clone(),
            tag_name: tag.clone(),
            path: self.source.path.clone(),
        })
    }
}

/// Output of one pipeline run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub components: Vec<ComponentMeta>,
    /// Candidate files of the batch, path-sorted.
    pub files: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl AnalysisResult {
    pub fn component(&self, tag_name: &str) -> Option<&ComponentMeta> {
        self.components
            .iter()
            .find(|c| c.tag_name.as_deref() == Some(tag_name))
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }
}
