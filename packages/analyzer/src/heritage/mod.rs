//! Heritage Module
//!
//! Edge classification, the concurrent ancestor walk with its memo tables, and the merge of
//! ancestor metadata into a component.

pub mod src {
    pub mod cache;
    pub mod edges;
    pub mod merge;
    pub mod resolver;
}

pub use src::cache::*;
pub use src::edges::*;
pub use src::merge::*;
pub use src::resolver::*;

#[cfg(test)]
mod test;
