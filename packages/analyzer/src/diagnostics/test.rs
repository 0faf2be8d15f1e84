// Diagnostics Tests

#[cfg(test)]
mod tests {
    use crate::diagnostics::*;
    use std::sync::Arc;
    use std::thread;
    use ts::{SourceFile, Span};

    fn file() -> SourceFile {
        SourceFile::new("/src/a.ts", "line one\nline two\nline three", vec![])
    }

    mod make_diagnostic_tests {
        use super::*;

        #[test]
        fn should_carry_location_and_lines() {
            let file = file();
            let diagnostic = make_diagnostic(
                ErrorCode::MissingTitle,
                &file,
                Span::new(9, 26),
                "missing",
                None,
                DiagnosticCategory::Warning,
            );
            assert_eq!(diagnostic.code, 2003);
            assert_eq!(diagnostic.file.as_deref(), Some("/src/a.ts"));
            assert_eq!(diagnostic.start, 9);
            assert_eq!(diagnostic.length, 17);
            assert_eq!((diagnostic.lines.start_line, diagnostic.lines.end_line), (2, 3));
            assert!(diagnostic.related_information.is_empty());
            assert_eq!(diagnostic.to_string(), "/src/a.ts:2:3 - warning WC2003: missing");
        }

        #[test]
        fn should_attach_related_information() {
            let file = file();
            let related = make_related_information(&file, Span::new(0, 4), "first declared here");
            let diagnostic = make_diagnostic(
                ErrorCode::DuplicateTagName,
                &file,
                Span::new(0, 4),
                "duplicate",
                Some(vec![related]),
                DiagnosticCategory::Error,
            );
            assert!(diagnostic.is_error());
            assert_eq!(diagnostic.related_information.len(), 1);
            assert_eq!(diagnostic.related_information[0].category, DiagnosticCategory::Message);
        }
    }

    mod sink_tests {
        use super::*;

        #[test]
        fn should_collect_and_drain() {
            let file = file();
            let sink = DiagnosticSink::new();
            sink.warn(ErrorCode::MissingDescription, &file, Span::new(0, 1), "a");
            sink.error(ErrorCode::InvalidTagName, &file, Span::new(0, 1), "b");
            assert_eq!(sink.len(), 2);
            let drained = sink.take();
            assert!(sink.is_empty());
            assert_eq!(drained[0].category, DiagnosticCategory::Warning);
            assert_eq!(drained[1].category, DiagnosticCategory::Error);
        }

        #[test]
        fn should_accept_reports_from_many_threads() {
            let file = Arc::new(file());
            let sink = Arc::new(DiagnosticSink::new());
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let file = file.clone();
                    let sink = sink.clone();
                    thread::spawn(move || {
                        for _ in 0..10 {
                            sink.warn(ErrorCode::DuplicateStylingHook, &file, Span::new(0, 1), "dup");
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
            assert_eq!(sink.len(), 40);
        }

        #[test]
        fn should_skip_repeated_reports_when_pushing_unique() {
            let file = file();
            let sink = DiagnosticSink::new();
            let first = make_diagnostic(
                ErrorCode::NonPublicProperty,
                &file,
                Span::new(0, 4),
                "private",
                None,
                DiagnosticCategory::Warning,
            );
            let elsewhere = make_diagnostic(
                ErrorCode::NonPublicProperty,
                &file,
                Span::new(9, 12),
                "private",
                None,
                DiagnosticCategory::Warning,
            );
            assert!(sink.push_unique(first.clone()));
            assert!(!sink.push_unique(first));
            assert!(sink.push_unique(elsewhere));
            assert_eq!(sink.len(), 2);
        }

        #[test]
        fn should_dedupe_by_file_span_and_code() {
            let file = file();
            let warn = |code, span| make_diagnostic(code, &file, span, "m", None, DiagnosticCategory::Warning);
            let mut diagnostics = vec![
                warn(ErrorCode::MissingTitle, Span::new(0, 4)),
                warn(ErrorCode::MissingDescription, Span::new(0, 4)),
                warn(ErrorCode::MissingTitle, Span::new(0, 4)),
            ];
            dedupe_diagnostics(&mut diagnostics);
            let codes: Vec<i32> = diagnostics.iter().map(|d| d.code).collect();
            assert_eq!(codes, vec![2003, 2004]);
        }
    }
}
