//! Metadata Model
//!
//! The records produced by extraction and consumed by serializers. Every list field is
//! always present; node handles are skipped by serde.

pub mod src {
    pub mod component;
    pub mod heritage;
    pub mod members;
    pub mod source;
}

pub use src::component::*;
pub use src::heritage::*;
pub use src::members::*;
pub use src::source::*;

#[cfg(test)]
mod test;
