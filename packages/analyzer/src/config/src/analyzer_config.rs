// Analyzer Config
//
// Loaded from camelCase JSON. Every field has a default covering Lit, Stencil and FAST.

use crate::error::{AnalyzerError, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzerConfig {
    /// Globs a source file must match to be a candidate.
    pub include: Vec<String>,
    /// Globs that drop an otherwise included file.
    pub exclude: Vec<String>,
    /// Class decorators that mark a component; the first argument may carry the tag name.
    pub component_decorators: Vec<String>,
    /// Member decorators that mark a public reflected property.
    pub property_decorators: Vec<String>,
    /// Member decorators that mark internal reactive state.
    pub internal_decorators: Vec<String>,
    /// Base identifiers ignored in addition to the built-in platform bases.
    pub extra_ignored_bases: Vec<String>,
    /// Capacity of each heritage memo table.
    pub heritage_cache_size: usize,
    /// Capacity of the per-file component cache.
    pub component_cache_size: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            include: strings(&["**/*.ts", "**/*.tsx", "**/*.js", "**/*.mjs"]),
            exclude: strings(&[
                "**/node_modules/**",
                "**/*.d.ts",
                "**/*.spec.ts",
                "**/*.test.ts",
            ]),
            component_decorators: strings(&["customElement", "Component"]),
            property_decorators: strings(&["property", "Prop", "attr"]),
            internal_decorators: strings(&["state", "internalProperty", "State"]),
            extra_ignored_bases: Vec::new(),
            heritage_cache_size: 512,
            component_cache_size: 1024,
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl AnalyzerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| AnalyzerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| AnalyzerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.heritage_cache_size == 0 || self.component_cache_size == 0 {
            return Err(AnalyzerError::Config(
                "cache sizes must be greater than zero".to_string(),
            ));
        }
        self.file_filter().map(|_| ())
    }

    pub fn is_component_decorator(&self, name: &str) -> bool {
        self.component_decorators.iter().any(|d| d == name)
    }

    pub fn is_property_decorator(&self, name: &str) -> bool {
        self.property_decorators.iter().any(|d| d == name)
    }

    pub fn is_internal_decorator(&self, name: &str) -> bool {
        self.internal_decorators.iter().any(|d| d == name)
    }

    pub fn file_filter(&self) -> Result<FileFilter> {
        Ok(FileFilter {
            include: compile_patterns(&self.include)?,
            exclude: compile_patterns(&self.exclude)?,
        })
    }

    /// Candidate files among `file_names`, path-sorted and deduplicated.
    pub fn select_files<'a>(&self, file_names: impl IntoIterator<Item = &'a str>) -> Result<Vec<String>> {
        let filter = self.file_filter()?;
        let mut selected: Vec<String> = file_names
            .into_iter()
            .filter(|name| filter.matches(name))
            .map(str::to_string)
            .collect();
        selected.sort();
        selected.dedup();
        Ok(selected)
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| AnalyzerError::Config(format!("bad glob `{}`: {}", p, e)))
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct FileFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl FileFilter {
    pub fn matches(&self, path: &str) -> bool {
        let path = path.replace('\\', "/");
        self.include.iter().any(|p| p.matches(&path)) && !self.exclude.iter().any(|p| p.matches(&path))
    }
}
