//! Analysis Module
//!
//! Per-class semantic extraction: type normalization, doc-comment reading, member builders
//! and the component builder.

pub mod src {
    pub mod component;
    pub mod context;
    pub mod jsdoc;
    pub mod method;
    pub mod property;
    pub mod reserved;
    pub mod type_resolver;
}

pub use src::component::*;
pub use src::context::*;
pub use src::jsdoc::*;
pub use src::method::*;
pub use src::property::*;
pub use src::type_resolver::*;
