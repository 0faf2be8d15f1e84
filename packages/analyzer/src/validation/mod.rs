//! Validation Module
//!
//! Tag-name grammar checks per component and duplicate detection over a whole batch.

pub mod src {
    pub mod duplicates;
    pub mod tag_name;
}

pub use src::duplicates::*;
pub use src::tag_name::*;
