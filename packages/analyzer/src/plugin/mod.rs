//! Plugin Module
//!
//! The staged hook contract every analysis plugin implements, and the built-in `core`
//! plugin that discovers and builds component classes.

pub mod src {
    pub mod core_plugin;
    pub mod plugin;
}

pub use src::core_plugin::*;
pub use src::plugin::*;
