//! Pipeline Module
//!
//! Staged plugin execution over a program, content-digest change detection, the per-file
//! incremental cache, the component dependency graph and watch-mode batches.

pub mod src {
    pub mod cache;
    pub mod dependency_graph;
    pub mod digest;
    pub mod run;
    pub mod watch;
}

pub use src::cache::*;
pub use src::dependency_graph::*;
pub use src::digest::*;
pub use src::run::*;
pub use src::watch::*;
