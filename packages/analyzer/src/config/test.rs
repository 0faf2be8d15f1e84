// Config Tests

#[cfg(test)]
mod tests {
    use crate::config::*;
    use crate::error::AnalyzerError;

    mod analyzer_config_tests {
        use super::*;

        #[test]
        fn should_fill_missing_fields_with_defaults() {
            let config = AnalyzerConfig::from_json(r#"{ "propertyDecorators": ["prop"] }"#).unwrap();
            assert_eq!(config.property_decorators, vec!["prop".to_string()]);
            assert!(config.is_component_decorator("customElement"));
            assert_eq!(config.heritage_cache_size, 512);
        }

        #[test]
        fn should_reject_zero_cache_size() {
            let err = AnalyzerConfig::from_json(r#"{ "componentCacheSize": 0 }"#).unwrap_err();
            assert!(matches!(err, AnalyzerError::Config(_)));
        }

        #[test]
        fn should_reject_malformed_json() {
            let err = AnalyzerConfig::from_json("{ include: ").unwrap_err();
            assert!(matches!(err, AnalyzerError::Config(_)));
        }

        #[test]
        fn should_report_unreadable_file_as_io_error() {
            let err = AnalyzerConfig::load("/definitely/not/here/analyzer.json").unwrap_err();
            assert!(matches!(err, AnalyzerError::Io { .. }));
        }
    }

    mod file_selection_tests {
        use super::*;

        #[test]
        fn should_select_sorted_candidates() {
            let config = AnalyzerConfig::default();
            let files = config
                .select_files(vec![
                    "/src/b-el.ts",
                    "/src/a-el.ts",
                    "/src/types.d.ts",
                    "/node_modules/lit/index.js",
                    "/src/a-el.spec.ts",
                    "/src/styles.css",
                ])
                .unwrap();
            assert_eq!(files, vec!["/src/a-el.ts".to_string(), "/src/b-el.ts".to_string()]);
        }

        #[test]
        fn should_honor_custom_include() {
            let config = AnalyzerConfig {
                include: vec!["/lib/**/*.js".to_string()],
                exclude: Vec::new(),
                ..Default::default()
            };
            let files = config.select_files(vec!["/lib/x/y.js", "/src/y.ts"]).unwrap();
            assert_eq!(files, vec!["/lib/x/y.js".to_string()]);
        }

        #[test]
        fn should_reject_invalid_glob() {
            let config = AnalyzerConfig {
                include: vec!["[".to_string()],
                ..Default::default()
            };
            assert!(config.select_files(vec!["/a.ts"]).is_err());
        }
    }
}
