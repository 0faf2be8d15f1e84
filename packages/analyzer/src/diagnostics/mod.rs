pub mod src {
    pub mod error_code;
    pub mod sink;
}

pub use src::error_code::*;
pub use src::sink::*;
pub use ts::{Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation};

#[cfg(test)]
mod test;
