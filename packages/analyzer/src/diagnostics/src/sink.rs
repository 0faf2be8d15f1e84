use super::error_code::ErrorCode;
use std::collections::HashSet;
use std::sync::Mutex;
use ts::{
    Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation, SourceFile, Span,
};

pub fn make_diagnostic(
    code: ErrorCode,
    file: &SourceFile,
    span: Span,
    message_text: impl Into<String>,
    related_information: Option<Vec<DiagnosticRelatedInformation>>,
    category: DiagnosticCategory,
) -> Diagnostic {
    Diagnostic {
        category,
        code: code.code(),
        file: Some(file.file_name().to_string()),
        start: span.start,
        length: span.len(),
        lines: file.line_range(span),
        message_text: message_text.into(),
        related_information: related_information.unwrap_or_default(),
    }
}

pub fn make_related_information(
    file: &SourceFile,
    span: Span,
    message_text: impl Into<String>,
) -> DiagnosticRelatedInformation {
    DiagnosticRelatedInformation {
        category: DiagnosticCategory::Message,
        code: 0,
        file: Some(file.file_name().to_string()),
        start: Some(span.start),
        length: Some(span.len()),
        message_text: message_text.into(),
    }
}

/// Collects diagnostics from every stage. Shared across the heritage fan-out threads.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, diagnostic: Diagnostic) {
        tracing::debug!(code = diagnostic.code, file = ?diagnostic.file, "{}", diagnostic.message_text);
        self.lock().push(diagnostic);
    }

    /// Pushes `diagnostic` unless one with the same file, span and code is already held.
    pub fn push_unique(&self, diagnostic: Diagnostic) -> bool {
        let mut diagnostics = self.lock();
        let key = diagnostic_key(&diagnostic);
        if diagnostics.iter().any(|d| diagnostic_key(d) == key) {
            return false;
        }
        tracing::debug!(code = diagnostic.code, file = ?diagnostic.file, "{}", diagnostic.message_text);
        diagnostics.push(diagnostic);
        true
    }

    pub fn warn(&self, code: ErrorCode, file: &SourceFile, span: Span, message: impl Into<String>) {
        self.push(make_diagnostic(
            code,
            file,
            span,
            message,
            None,
            DiagnosticCategory::Warning,
        ));
    }

    pub fn error(&self, code: ErrorCode, file: &SourceFile, span: Span, message: impl Into<String>) {
        self.push(make_diagnostic(
            code,
            file,
            span,
            message,
            None,
            DiagnosticCategory::Error,
        ));
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drains everything collected so far.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Diagnostic>> {
        // A panicking holder cannot leave the Vec half-written; keep collecting.
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

type DiagnosticKey<'d> = (Option<&'d str>, usize, usize, i32);

fn diagnostic_key(diagnostic: &Diagnostic) -> DiagnosticKey<'_> {
    (
        diagnostic.file.as_deref(),
        diagnostic.start,
        diagnostic.length,
        diagnostic.code,
    )
}

/// Drops repeats of the same file, span and code, keeping the first report.
pub fn dedupe_diagnostics(diagnostics: &mut Vec<Diagnostic>) {
    let mut seen: HashSet<(Option<String>, usize, usize, i32)> = HashSet::new();
    diagnostics.retain(|d| seen.insert((d.file.clone(), d.start, d.length, d.code)));
}
