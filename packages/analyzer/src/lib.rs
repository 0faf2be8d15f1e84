//! Component Analyzer
//!
//! Walks a type-checked program and extracts metadata for web-component classes:
//! properties, methods, events, styling hooks, slots and resolved heritage. Extraction runs
//! as a staged plugin pipeline with per-file incremental caching.

pub mod analysis;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod heritage;
pub mod meta;
pub mod pipeline;
pub mod plugin;
pub mod testing;
pub mod validation;

pub use config::AnalyzerConfig;
pub use error::{AnalyzerError, Result};
pub use meta::{AnalysisResult, ComponentMeta};
pub use pipeline::{BatchOutcome, Pipeline, WatchSession};
pub use plugin::{CorePlugin, Plugin, PluginContext, Stage};
