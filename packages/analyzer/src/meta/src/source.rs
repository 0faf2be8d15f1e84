// Source Metadata
//
// Where a component was declared, and handles back to syntax nodes.

use serde::Serialize;
use std::path::Path;
use ts::{SourceFile, Span};

/// Handle to a syntax node: the file it lives in and its span.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodeRef {
    pub file_name: String,
    pub span: Span,
}

impl NodeRef {
    pub fn new(file_name: impl Into<String>, span: Span) -> Self {
        Self {
            file_name: file_name.into(),
            span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMeta {
    /// Normalized path with forward slashes.
    pub path: String,
    pub dir: String,
    /// File name with extension.
    pub base: String,
    /// File name without extension.
    pub name: String,
    /// Extension including the leading dot, or empty.
    pub ext: String,
    #[serde(skip)]
    pub node: NodeRef,
}

impl SourceMeta {
    pub fn from_file(file: &SourceFile, span: Span) -> Self {
        let path = normalize_path(file.file_name());
        let as_path = Path::new(&path);
        let base = as_path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = as_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = as_path
            .extension()
            .map(|s| format!(".{}", s.to_string_lossy()))
            .unwrap_or_default();
        let dir = parent_dir(&path);
        Self {
            node: NodeRef::new(file.file_name(), span),
            path,
            dir,
            base,
            name,
            ext,
        }
    }
}

pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Directory part of a normalized path, `.` for a bare file name.
pub fn parent_dir(path: &str) -> String {
    match path.rfind('/') {
        Some(0) => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
        None => ".".to_string(),
    }
}
