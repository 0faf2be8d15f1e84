// Watch Session Tests

use component_analyzer::testing::{TestFile, TestProgram};
use component_analyzer::{AnalyzerConfig, BatchOutcome, Pipeline, WatchSession};
use ts::InMemoryProgram;

const EL: &str = "/** @tagname my-el */\nexport class MyEl extends LitElement {\n  open = false;\n}\n";

fn program(el: &str, types: &str) -> InMemoryProgram {
    TestProgram::new()
        .file(TestFile::new("/src/my-el.ts", el))
        .file(TestFile::new("/src/types.d.ts", types))
        .build()
}

#[test]
fn should_skip_unchanged_batches() {
    let mut session = WatchSession::new(Pipeline::with_core(AnalyzerConfig::default()));
    let snapshot = program(EL, "export type A = string;\n");

    let first = session.run_batch(&snapshot).unwrap();
    assert_eq!(first.result().map(|r| r.components.len()), Some(1));
    assert!(matches!(session.run_batch(&snapshot).unwrap(), BatchOutcome::Unchanged));
    assert_eq!(session.batches(), 1);
}

#[test]
fn should_ignore_changes_outside_candidate_files() {
    let mut session = WatchSession::new(Pipeline::with_core(AnalyzerConfig::default()));
    session.run_batch(&program(EL, "export type A = string;\n")).unwrap();
    let outcome = session
        .run_batch(&program(EL, "export type A = number;\n"))
        .unwrap();
    assert!(matches!(outcome, BatchOutcome::Unchanged));
}

#[test]
fn should_rerun_changed_batches() {
    let mut session = WatchSession::new(Pipeline::with_core(AnalyzerConfig::default()));
    session.run_batch(&program(EL, "")).unwrap();

    let edited = "/** @tagname my-el */\nexport class MyEl extends LitElement {\n  open = false;\n  size = 1;\n}\n";
    let outcome = session.run_batch(&program(edited, "")).unwrap();
    let result = outcome.result().expect("edited batch runs");
    let props: Vec<&str> = result.components[0].props.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(props, vec!["open", "size"]);
    assert_eq!(session.batches(), 2);
    assert_eq!(session.pipeline().cache_stats().files.misses, 2);
}

#[test]
fn should_rerun_when_a_non_candidate_ancestor_changes() {
    let host = "/** @tagname my-el */\nexport class MyEl extends Base {\n  open = false;\n}\n";
    let base = "export declare class Base extends LitElement {\n  baseProp: number;\n}\n";
    let edited_base = "export declare class Base extends LitElement {\n  baseProp: number;\n  extra: string;\n}\n";
    let snapshot = |base: &str| {
        TestProgram::new()
            .file(TestFile::new("/src/my-el.ts", host))
            .file(TestFile::new("/src/base.d.ts", base))
            .build()
    };
    let mut session = WatchSession::new(Pipeline::with_core(AnalyzerConfig::default()));

    let first = session.run_batch(&snapshot(base)).unwrap();
    assert_eq!(first.result().map(|r| r.files.clone()), Some(vec!["/src/my-el.ts".to_string()]));
    assert!(matches!(session.run_batch(&snapshot(base)).unwrap(), BatchOutcome::Unchanged));

    let outcome = session.run_batch(&snapshot(edited_base)).unwrap();
    let result = outcome.result().expect("an edited ancestor reruns the batch");
    let props: Vec<&str> = result.components[0].props.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(props, vec!["open", "baseProp", "extra"]);
    assert_eq!(session.batches(), 2);
}
