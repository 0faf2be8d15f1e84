// Heritage Tests
//
// Edge classification, the merge policy and the ancestor walk over multi-file programs.

#[cfg(test)]
mod tests {
    use crate::analysis::AnalysisContext;
    use crate::config::AnalyzerConfig;
    use crate::diagnostics::{dedupe_diagnostics, DiagnosticSink};
    use crate::heritage::*;
    use crate::meta::*;
    use crate::pipeline::FileDigests;
    use crate::testing::{parse_expression, span_of, TestFile, TestProgram};
    use pretty_assertions::assert_eq;
    use ts::{HeritageClause, HeritageToken, InMemoryProgram, Program, Span, Type};

    fn clause(token: HeritageToken, text: &str) -> HeritageClause {
        let span = Span::new(0, text.len());
        HeritageClause {
            token,
            types: vec![parse_expression(text)],
            span,
        }
    }

    fn names(edges: &EdgeList) -> Vec<(HeritageKind, &str)> {
        edges.iter().map(|e| (e.kind(), e.name())).collect()
    }

    fn resolve_in(program: &InMemoryProgram, cache: &HeritageCache, file_name: &str, class_name: &str) -> ResolvedHeritage {
        let config = AnalyzerConfig::default();
        let sink = DiagnosticSink::new();
        let digests = FileDigests::from_program(program);
        let file = program.get_source_file(file_name).cloned().expect("fixture file");
        let class = file
            .classes()
            .find(|c| c.name_text() == Some(class_name))
            .cloned()
            .expect("fixture class");
        let ctx = AnalysisContext::new(program, &config, &sink);
        let resolved = HeritageResolver::new(ctx, cache, &digests).resolve_class(&file, &class);
        let mut forwarded = resolved.diagnostics.clone();
        dedupe_diagnostics(&mut forwarded);
        assert_eq!(sink.take(), forwarded, "ancestor diagnostics are forwarded once");
        resolved
    }

    fn component_payload(node: &HeritageMeta) -> &ComponentMeta {
        match &node.payload {
            Some(HeritagePayload::Component(meta)) | Some(HeritagePayload::Mixin(meta)) => meta,
            other => panic!("expected a class payload, got {:?}", other),
        }
    }

    fn prop_names(component: &ComponentMeta) -> Vec<&str> {
        component.props.iter().map(|p| p.name.as_str()).collect()
    }

    const FOO: &str = "import { Base } from './base';\n\n/** @tagname foo-bar */\nexport class FooBar extends Base {\n  label = 'hi';\n}\n";

    const BASE: &str = "/** Shared base. */\nexport class Base extends LitElement {\n  /** From the base. */\n  baseProp = 1;\n}\n";

    const MIXIN: &str = "export const Focusable = <T extends Constructor<LitElement>>(superClass: T) => {\n  class FocusableElement extends superClass {\n    focused = false;\n  };\n  return FocusableElement;\n};\n";

    mod edge_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_classify_mixin_applications() {
            let clauses = vec![
                clause(HeritageToken::Extends, "Focusable(Sized(Base))"),
                clause(HeritageToken::Implements, "Labelled"),
            ];
            let edges = class_edges(&clauses, &[]);
            assert_eq!(
                names(&edges),
                vec![
                    (HeritageKind::Mixin, "Focusable"),
                    (HeritageKind::Mixin, "Sized"),
                    (HeritageKind::Subclass, "Base"),
                    (HeritageKind::Interface, "Labelled"),
                ]
            );
            assert_eq!(edges[0].site(), Span::new(0, "Focusable(Sized(Base))".len()));
        }

        #[test]
        fn should_read_qualified_bases() {
            let edges = class_edges(&[clause(HeritageToken::Extends, "widgets.Base")], &[]);
            assert_eq!(names(&edges), vec![(HeritageKind::Subclass, "Base")]);
        }

        #[test]
        fn should_ignore_platform_bases() {
            for base in ["HTMLElement", "HTMLButtonElement", "LitElement", "FASTElement"] {
                let edges = class_edges(&[clause(HeritageToken::Extends, base)], &[]);
                assert!(edges.is_empty(), "{} should be ignored", base);
            }
            let extra = vec!["AppElement".to_string()];
            assert!(class_edges(&[clause(HeritageToken::Extends, "AppElement")], &extra).is_empty());
            assert!(!class_edges(&[clause(HeritageToken::Extends, "AppElement")], &[]).is_empty());
        }

        #[test]
        fn should_treat_interface_extends_as_interfaces() {
            let edges = interface_edges(&[clause(HeritageToken::Extends, "Sized")], &[]);
            assert_eq!(names(&edges), vec![(HeritageKind::Interface, "Sized")]);
        }
    }

    mod merge_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        fn prop(name: &str) -> PropMeta {
            PropMeta::new(name)
        }

        fn with_props(name: &str, props: Vec<PropMeta>) -> ComponentMeta {
            let mut meta = ComponentMeta::new(name, SourceMeta::default());
            meta.props = props;
            meta
        }

        fn node(payload: Option<HeritagePayload>) -> HeritageMeta {
            let mut node = HeritageMeta::new("Ancestor", HeritageKind::Subclass);
            node.payload = payload;
            node
        }

        #[test]
        fn should_leave_components_unchanged_for_empty_records() {
            let mut component = with_props("A", vec![prop("x")]);
            component.events.push(EventMeta {
                name: "change".into(),
                ..Default::default()
            });
            let before = component.clone();
            merge_heritage(&mut component, &node(None));
            merge_heritage(
                &mut component,
                &node(Some(HeritagePayload::Component(Box::new(ComponentMeta::default())))),
            );
            merge_heritage(
                &mut component,
                &node(Some(HeritagePayload::Interface(Box::new(InterfaceMeta::default())))),
            );
            assert_eq!(component, before);
        }

        #[test]
        fn should_append_unmatched_entries_in_order() {
            let mut component = with_props("A", vec![prop("own")]);
            let first = with_props("B", vec![prop("b1"), prop("own")]);
            let second = with_props("C", vec![prop("c1"), prop("b1")]);
            merge_component(&mut component, &first);
            merge_component(&mut component, &second);
            assert_eq!(prop_names(&component), vec!["own", "b1", "c1"]);
        }

        #[test]
        fn should_follow_the_field_policy_on_collisions() {
            let mut own = prop("value");
            own.type_text = "string".into();
            own.doc_tags = vec![DocTagMeta::new("since", Some("2".into()))];

            let mut inherited = prop("value");
            inherited.type_text = "unknown".into();
            inherited.documentation = "Inherited docs.".into();
            inherited.reflect = true;
            inherited.doc_tags = vec![
                DocTagMeta::new("since", Some("2".into())),
                DocTagMeta::new("default", Some("'x'".into())),
            ];

            let mut component = with_props("A", vec![own]);
            merge_component(&mut component, &with_props("B", vec![inherited]));
            let merged = &component.props[0];
            assert_eq!(merged.type_text, "string");
            assert_eq!(merged.documentation, "Inherited docs.");
            assert_eq!(merged.default_value, "'x'");
            assert!(merged.reflect);
            assert_eq!(
                merged.doc_tags,
                vec![
                    DocTagMeta::new("since", Some("2".into())),
                    DocTagMeta::new("default", Some("'x'".into())),
                ]
            );
        }

        #[test]
        fn should_keep_subclass_defaults_and_descriptions() {
            let mut own = prop("value");
            own.default_value = "1".into();
            let mut inherited = prop("value");
            inherited.doc_tags = vec![DocTagMeta::new("default", Some("2".into()))];
            let mut component = with_props("A", vec![own]);
            component.css_parts.push(CssPartMeta {
                name: "label".into(),
                description: "Own".into(),
                ..Default::default()
            });

            let mut ancestor = with_props("B", vec![inherited]);
            ancestor.css_parts.push(CssPartMeta {
                name: "label".into(),
                description: "Inherited".into(),
                ..Default::default()
            });
            merge_component(&mut component, &ancestor);
            assert_eq!(component.props[0].default_value, "1");
            assert_eq!(component.css_parts[0].description, "Own");
        }

        #[test]
        fn should_merge_interface_members_only() {
            let mut component = with_props("A", vec![]);
            let interface = InterfaceMeta {
                name: "Labelled".into(),
                props: vec![prop("label")],
                methods: vec![MethodMeta::new("describe")],
                ..Default::default()
            };
            merge_heritage(&mut component, &node(Some(HeritagePayload::Interface(Box::new(interface)))));
            assert_eq!(prop_names(&component), vec!["label"]);
            assert_eq!(component.methods[0].name, "describe");
        }

        #[test]
        fn should_merge_the_whole_chain_and_keep_it() {
            let grand = with_props("C", vec![prop("c")]);
            let mut parent = with_props("B", vec![prop("b")]);
            parent.heritage = vec![node(Some(HeritagePayload::Component(Box::new(grand))))];
            let mut component = with_props("A", vec![prop("a")]);
            component.heritage = vec![node(Some(HeritagePayload::Component(Box::new(parent))))];

            merge_chain(&mut component);
            assert_eq!(prop_names(&component), vec!["a", "b", "c"]);
            assert_eq!(component.heritage.len(), 1);
        }
    }

    mod resolver_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_resolve_subclasses_across_files() {
            let program = TestProgram::new()
                .file(TestFile::new("/src/foo-bar.ts", FOO).typed("label", Type::string()))
                .file(TestFile::new("/src/base.ts", BASE).typed("baseProp", Type::number()))
                .build();
            let cache = HeritageCache::new(16);
            let resolved = resolve_in(&program, &cache, "/src/foo-bar.ts", "FooBar");

            assert_eq!(resolved.heritage.len(), 1);
            let base = &resolved.heritage[0];
            assert_eq!(base.name, "Base");
            assert_eq!(base.kind, HeritageKind::Subclass);
            assert_eq!(base.type_text, "Base");
            assert_eq!(base.file.as_deref(), Some("/src/base.ts"));
            assert_eq!(base.parent.as_deref(), Some("FooBar"));
            let site = span_of(FOO, "Base {");
            assert_eq!(base.node.span, Span::new(site.start, site.start + "Base".len()));

            let meta = component_payload(base);
            assert!(matches!(base.payload, Some(HeritagePayload::Component(_))));
            assert_eq!(meta.class_name, "Base");
            assert_eq!(prop_names(meta), vec!["baseProp"]);
            assert_eq!(meta.props[0].type_text, "number");
            assert!(meta.heritage.is_empty());

            assert_eq!(
                resolved.dependencies.keys().map(String::as_str).collect::<Vec<_>>(),
                vec!["/src/base.ts"]
            );
        }

        #[test]
        fn should_unwrap_mixin_factories() {
            let host = "export class Host extends Focusable(LitElement) {\n  own = 1;\n}\n";
            let program = TestProgram::new()
                .file(TestFile::new("/src/host.ts", host))
                .file(TestFile::new("/src/focusable.ts", MIXIN).typed("focused", Type::boolean()))
                .build();
            let cache = HeritageCache::new(16);
            let resolved = resolve_in(&program, &cache, "/src/host.ts", "Host");

            assert_eq!(resolved.heritage.len(), 1);
            let mixin = &resolved.heritage[0];
            assert_eq!(mixin.kind, HeritageKind::Mixin);
            assert_eq!(mixin.type_text, "Focusable(LitElement)");
            assert!(matches!(mixin.payload, Some(HeritagePayload::Mixin(_))));
            let meta = component_payload(mixin);
            assert_eq!(meta.class_name, "FocusableElement");
            assert_eq!(prop_names(meta), vec!["focused"]);
            assert!(meta.heritage.is_empty(), "the factory parameter is not an ancestor");
        }

        #[test]
        fn should_resolve_interfaces_with_their_own_heritage() {
            let host = "export class Host extends LitElement implements Labelled {\n  label = '';\n}\n";
            let shapes = "export interface Labelled extends Sized {\n  /** The label. */\n  label: string;\n  describe(verbose?: boolean): string;\n}\nexport interface Sized {\n  size?: number;\n}\n";
            let program = TestProgram::new()
                .file(TestFile::new("/src/host.ts", host))
                .file(
                    TestFile::new("/src/shapes.ts", shapes)
                        .typed("label", Type::string())
                        .typed("size", Type::number()),
                )
                .build();
            let cache = HeritageCache::new(16);
            let resolved = resolve_in(&program, &cache, "/src/host.ts", "Host");

            let node = &resolved.heritage[0];
            assert_eq!(node.kind, HeritageKind::Interface);
            let Some(HeritagePayload::Interface(labelled)) = &node.payload else {
                panic!("expected an interface payload");
            };
            assert_eq!(labelled.props[0].name, "label");
            assert_eq!(labelled.props[0].documentation, "The label.");
            assert_eq!(labelled.methods[0].name, "describe");

            assert_eq!(labelled.heritage.len(), 1);
            assert_eq!(labelled.heritage[0].parent.as_deref(), Some("Labelled"));
            let Some(HeritagePayload::Interface(sized)) = &labelled.heritage[0].payload else {
                panic!("expected a nested interface payload");
            };
            assert_eq!(sized.props[0].name, "size");
            assert!(sized.props[0].optional);
            assert_eq!(sized.props[0].default_value, "undefined");
        }

        #[test]
        fn should_keep_unresolved_edges_without_payload() {
            let host = "export class Host extends Missing {\n}\n";
            let program = TestProgram::new().file(TestFile::new("/src/host.ts", host)).build();
            let cache = HeritageCache::new(16);
            let resolved = resolve_in(&program, &cache, "/src/host.ts", "Host");
            assert_eq!(resolved.heritage.len(), 1);
            assert_eq!(resolved.heritage[0].name, "Missing");
            assert!(resolved.heritage[0].payload.is_none());
            assert!(resolved.heritage[0].file.is_none());
            assert!(resolved.dependencies.is_empty());
        }

        #[test]
        fn should_cut_cycles_at_the_first_revisit() {
            let text = "export class A extends B {\n  a = 1;\n}\nexport class B extends A {\n  b = 1;\n}\n";
            let program = TestProgram::new().file(TestFile::new("/src/cycle.ts", text)).build();
            let cache = HeritageCache::new(16);
            let resolved = resolve_in(&program, &cache, "/src/cycle.ts", "A");

            let b = component_payload(&resolved.heritage[0]);
            assert_eq!(b.class_name, "B");
            assert_eq!(b.heritage.len(), 1);
            assert_eq!(b.heritage[0].name, "A");
            assert!(b.heritage[0].payload.is_none());
            assert_eq!(cache.payload_stats().entries, 0, "cut subtrees are not memoized");
        }

        #[test]
        fn should_reuse_payloads_while_dependencies_are_unchanged() {
            let program = TestProgram::new()
                .file(TestFile::new("/src/foo-bar.ts", FOO))
                .file(TestFile::new("/src/base.ts", BASE))
                .build();
            let cache = HeritageCache::new(16);
            let first = resolve_in(&program, &cache, "/src/foo-bar.ts", "FooBar");
            let second = resolve_in(&program, &cache, "/src/foo-bar.ts", "FooBar");
            assert_eq!(first, second);
            assert_eq!(cache.payload_stats().hits, 1);
            assert!(cache.edge_stats().hits >= 1);
        }

        #[test]
        fn should_forward_ancestor_diagnostics_and_replay_them_from_cache() {
            let base = "/**\n * @cssprop --a - Accent.\n * @cssprop --a - Accent again.\n */\nexport class Base extends LitElement {\n  @property() private secret = 1;\n}\n";
            let program = TestProgram::new()
                .file(TestFile::new("/src/foo-bar.ts", FOO))
                .file(TestFile::new("/src/base.ts", base))
                .build();
            let cache = HeritageCache::new(16);

            for _ in 0..2 {
                let resolved = resolve_in(&program, &cache, "/src/foo-bar.ts", "FooBar");
                let mut reported: Vec<(i32, Option<&str>)> = resolved
                    .diagnostics
                    .iter()
                    .map(|d| (d.code, d.file.as_deref()))
                    .collect();
                reported.sort();
                assert_eq!(reported, vec![(2001, Some("/src/base.ts")), (2002, Some("/src/base.ts"))]);
            }
            assert_eq!(cache.payload_stats().hits, 1, "the second walk replays the cached payload");
        }

        #[test]
        fn should_not_share_payloads_between_identical_declarations_in_different_files() {
            let mixin = "const M = (B) => class extends B {\n  value = 1;\n};\n";
            let a = format!("{}export class AHost extends M(LitElement) {{\n}}\n", mixin);
            let b = format!("{}export class BHost extends M(LitElement) {{\n}}\n", mixin);
            let program = TestProgram::new()
                .file(TestFile::new("/a.ts", a).typed("value", Type::string()))
                .file(TestFile::new("/b.ts", b).typed("value", Type::number()))
                .build();
            let cache = HeritageCache::new(16);

            let from_a = resolve_in(&program, &cache, "/a.ts", "AHost");
            let from_b = resolve_in(&program, &cache, "/b.ts", "BHost");

            let a_meta = component_payload(&from_a.heritage[0]);
            let b_meta = component_payload(&from_b.heritage[0]);
            assert_eq!(from_a.heritage[0].file.as_deref(), Some("/a.ts"));
            assert_eq!(from_b.heritage[0].file.as_deref(), Some("/b.ts"));
            assert_eq!(a_meta.props[0].type_text, "string");
            assert_eq!(b_meta.props[0].type_text, "number");
            assert_eq!(cache.payload_stats().entries, 2);
        }

        #[test]
        fn should_rebuild_payloads_when_an_ancestor_file_changes() {
            let mid = "export class Mid extends Base {\n  mid = 1;\n}\n";
            let foo = "export class Foo extends Mid {\n}\n";
            let changed_base = "/** Shared base. */\nexport class Base extends LitElement {\n  /** From the base. */\n  baseProp = 1;\n  extra = 2;\n}\n";
            let cache = HeritageCache::new(16);

            let before = TestProgram::new()
                .file(TestFile::new("/src/foo.ts", foo))
                .file(TestFile::new("/src/mid.ts", mid))
                .file(TestFile::new("/src/base.ts", BASE))
                .build();
            let resolved = resolve_in(&before, &cache, "/src/foo.ts", "Foo");
            let mid_meta = component_payload(&resolved.heritage[0]);
            assert_eq!(prop_names(component_payload(&mid_meta.heritage[0])), vec!["baseProp"]);

            let after = TestProgram::new()
                .file(TestFile::new("/src/foo.ts", foo))
                .file(TestFile::new("/src/mid.ts", mid))
                .file(TestFile::new("/src/base.ts", changed_base))
                .build();
            let resolved = resolve_in(&after, &cache, "/src/foo.ts", "Foo");
            let mid_meta = component_payload(&resolved.heritage[0]);
            assert_eq!(
                prop_names(component_payload(&mid_meta.heritage[0])),
                vec!["baseProp", "extra"]
            );
            assert_eq!(
                resolved.dependencies.keys().map(String::as_str).collect::<Vec<_>>(),
                vec!["/src/base.ts", "/src/mid.ts"]
            );
        }

        #[test]
        fn should_resolve_siblings_in_source_order() {
            let host = "export class Host extends Focusable(Base) implements Labelled {\n}\n";
            let shapes = "export interface Labelled {\n  label: string;\n}\n";
            let program = TestProgram::new()
                .file(TestFile::new("/src/host.ts", host))
                .file(TestFile::new("/src/focusable.ts", MIXIN))
                .file(TestFile::new("/src/base.ts", BASE))
                .file(TestFile::new("/src/shapes.ts", shapes))
                .build();
            let cache = HeritageCache::new(16);
            let resolved = resolve_in(&program, &cache, "/src/host.ts", "Host");
            let order: Vec<(&str, HeritageKind)> = resolved
                .heritage
                .iter()
                .map(|h| (h.name.as_str(), h.kind))
                .collect();
            assert_eq!(
                order,
                vec![
                    ("Focusable", HeritageKind::Mixin),
                    ("Base", HeritageKind::Subclass),
                    ("Labelled", HeritageKind::Interface),
                ]
            );
        }
    }
}
