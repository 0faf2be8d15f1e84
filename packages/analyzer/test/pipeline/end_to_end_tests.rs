// End-to-End Pipeline Tests
//
// Whole batches through the public API: core plugin, heritage merge, validation and
// serialization.

use component_analyzer::testing::{TestFile, TestProgram};
use component_analyzer::{AnalyzerConfig, Pipeline};
use pretty_assertions::assert_eq;
use serde_json::json;
use ts::Type;

const FOO_BAR: &str = r#"import { Base } from './base';

/**
 * A labelled element.
 * @tagname foo-bar
 */
export class FooBar extends Base {
  /**
   * The visible label.
   * @default 'hi'
   */
  label: string;
}
"#;

const BASE: &str = r#"export class Base extends LitElement {
  /** Contributed by the base. */
  'base-prop' = 1;
}
"#;

fn foo_bar_program() -> ts::InMemoryProgram {
    TestProgram::new()
        .file(TestFile::new("/src/foo-bar.ts", FOO_BAR).typed("label", Type::string()))
        .file(TestFile::new("/src/base.ts", BASE).typed("base-prop", Type::number()))
        .build()
}

#[test]
fn should_analyze_a_subclass_with_inherited_props() {
    let result = Pipeline::with_core(AnalyzerConfig::default())
        .run(&foo_bar_program())
        .unwrap();

    assert_eq!(result.components.len(), 1);
    let component = &result.components[0];
    assert_eq!(component.tag_name.as_deref(), Some("foo-bar"));
    assert_eq!(component.documentation, "A labelled element.");

    let props: Vec<(&str, &str)> = component
        .props
        .iter()
        .map(|p| (p.name.as_str(), p.default_value.as_str()))
        .collect();
    assert_eq!(props, vec![("label", "'hi'"), ("base-prop", "1")]);
    assert_eq!(component.props[1].documentation, "Contributed by the base.");
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn should_serialize_every_list_field() {
    let result = Pipeline::with_core(AnalyzerConfig::default())
        .run(&foo_bar_program())
        .unwrap();
    let value = serde_json::to_value(&result).unwrap();
    let component = &value["components"][0];

    assert_eq!(component["tagName"], json!("foo-bar"));
    assert_eq!(component["className"], json!("FooBar"));
    for field in [
        "props",
        "methods",
        "events",
        "cssProps",
        "cssParts",
        "slots",
        "docTags",
        "heritage",
        "dependents",
        "dependencies",
    ] {
        assert!(component[field].is_array(), "{} must be present", field);
    }
    assert_eq!(component["heritage"][0]["name"], json!("Base"));
    assert_eq!(component["heritage"][0]["kind"], json!("subclass"));
    assert_eq!(component["props"][0]["type"], json!("string"));
    assert_eq!(value["files"], json!(["/src/base.ts", "/src/foo-bar.ts"]));
}

#[test]
fn should_report_duplicate_tags_once() {
    let first = "/** @tagname x-y */\nexport class First extends LitElement {\n}\n";
    let second = "/** @tagname x-y */\nexport class Second extends LitElement {\n}\n";
    let program = TestProgram::new()
        .file(TestFile::new("/src/first.ts", first))
        .file(TestFile::new("/src/second.ts", second))
        .build();

    let result = Pipeline::with_core(AnalyzerConfig::default())
        .run(&program)
        .unwrap();

    let duplicates: Vec<_> = result.diagnostics.iter().filter(|d| d.code == 1002).collect();
    assert_eq!(duplicates.len(), 1);
    assert!(duplicates[0].message_text.contains("/src/first.ts"));
    assert!(duplicates[0].message_text.contains("/src/second.ts"));
    assert_eq!(result.components.len(), 2);
}

#[test]
fn should_build_identical_results_from_identical_text() {
    let first = Pipeline::with_core(AnalyzerConfig::default())
        .run(&foo_bar_program())
        .unwrap();
    let second = Pipeline::with_core(AnalyzerConfig::default())
        .run(&foo_bar_program())
        .unwrap();
    assert_eq!(first.components, second.components);
}

#[test]
fn should_report_diagnostics_of_non_component_ancestors() {
    let base = r#"/**
 * @cssprop --a - Accent.
 * @cssprop --a - Accent again.
 */
export class Base extends LitElement {
  @property() private secret = 1;
}
"#;
    let program = TestProgram::new()
        .file(TestFile::new("/src/foo-bar.ts", FOO_BAR).typed("label", Type::string()))
        .file(TestFile::new("/src/base.ts", base))
        .build();
    let result = Pipeline::with_core(AnalyzerConfig::default()).run(&program).unwrap();

    assert_eq!(result.components.len(), 1);
    let mut reported: Vec<(i32, Option<&str>)> = result
        .diagnostics
        .iter()
        .map(|d| (d.code, d.file.as_deref()))
        .collect();
    reported.sort();
    assert_eq!(reported, vec![(2001, Some("/src/base.ts")), (2002, Some("/src/base.ts"))]);
}
