//! Analyzer Configuration
//!
//! Decorator vocabularies, candidate-file globs and cache bounds.

pub mod src {
    pub mod analyzer_config;
}

pub use src::analyzer_config::*;

#[cfg(test)]
mod test;
