// Analyzer Errors
//
// Fatal errors that abort a run. Per-member and per-component problems are diagnostics,
// not errors.

use crate::plugin::Stage;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("source file `{0}` is not part of the program")]
    MissingFile(String),

    #[error("plugin `{plugin}` failed during {stage}: {source}")]
    Plugin {
        plugin: String,
        stage: Stage,
        #[source]
        source: anyhow::Error,
    },
}

impl AnalyzerError {
    pub fn plugin(plugin: &str, stage: Stage, source: anyhow::Error) -> Self {
        AnalyzerError::Plugin {
            plugin: plugin.to_string(),
            stage,
            source,
        }
    }
}
