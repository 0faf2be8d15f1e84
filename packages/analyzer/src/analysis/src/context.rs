use crate::config::AnalyzerConfig;
use crate::diagnostics::DiagnosticSink;
use ts::{Program, TypeChecker};

/// Everything an extraction step reads: the program, the config and where to report.
#[derive(Clone, Copy)]
pub struct AnalysisContext<'a> {
    pub program: &'a dyn Program,
    pub config: &'a AnalyzerConfig,
    pub diagnostics: &'a DiagnosticSink,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(
        program: &'a dyn Program,
        config: &'a AnalyzerConfig,
        diagnostics: &'a DiagnosticSink,
    ) -> Self {
        Self {
            program,
            config,
            diagnostics,
        }
    }

    pub fn checker(&self) -> &'a dyn TypeChecker {
        self.program.get_type_checker()
    }
}
