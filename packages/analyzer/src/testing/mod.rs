//! Testing Module
//!
//! Fixture helpers: parse small TypeScript sources with oxc into declaration trees and assemble
//! in-memory programs with the type annotations a checker would have produced.

pub mod src {
    pub mod front_end;
    pub mod jsdoc;
    pub mod program_builder;
}

pub use src::front_end::{parse_expression, parse_source};
pub use src::jsdoc::parse_jsdoc;
pub use src::program_builder::*;
