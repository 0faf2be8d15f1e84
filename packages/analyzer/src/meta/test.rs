// Meta Tests

#[cfg(test)]
mod tests {
    use crate::meta::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use ts::{SourceFile, Span};

    fn component(name: &str, heritage: Vec<HeritageMeta>) -> ComponentMeta {
        let mut meta = ComponentMeta::new(name, SourceMeta::default());
        meta.heritage = heritage;
        meta
    }

    fn subclass(name: &str, heritage: Vec<HeritageMeta>) -> HeritageMeta {
        let mut node = HeritageMeta::new(name, HeritageKind::Subclass);
        node.payload = Some(HeritagePayload::Component(Box::new(component(name, heritage))));
        node
    }

    mod source_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_split_file_paths() {
            let file = SourceFile::new("C:\\work\\src\\my-el.component.ts", "", vec![]);
            let source = SourceMeta::from_file(&file, Span::new(0, 0));
            assert_eq!(source.path, "C:/work/src/my-el.component.ts");
            assert_eq!(source.dir, "C:/work/src");
            assert_eq!(source.base, "my-el.component.ts");
            assert_eq!(source.name, "my-el.component");
            assert_eq!(source.ext, ".ts");
            assert_eq!(source.node.file_name, "C:\\work\\src\\my-el.component.ts");
        }

        #[test]
        fn should_compute_parent_dirs() {
            assert_eq!(parent_dir("/a.ts"), "/");
            assert_eq!(parent_dir("a.ts"), ".");
            assert_eq!(parent_dir("/x/y/a.ts"), "/x/y");
        }
    }

    mod heritage_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_flatten_in_pre_order() {
            let d = subclass("D", vec![]);
            let b = subclass("B", vec![d]);
            let c = HeritageMeta::new("C", HeritageKind::Interface);
            let a = subclass("A", vec![b, c]);
            let names: Vec<&str> = a.flatten().iter().map(|h| h.name.as_str()).collect();
            assert_eq!(names, vec!["A", "B", "D", "C"]);

            let forest = vec![a.clone(), HeritageMeta::new("E", HeritageKind::Mixin)];
            assert_eq!(flatten_heritage(&forest).len(), 5);
        }

        #[test]
        fn should_have_no_children_without_payload() {
            let edge = HeritageMeta::new("Unresolved", HeritageKind::Subclass);
            assert!(edge.children().is_empty());
            assert_eq!(edge.flatten().len(), 1);
        }
    }

    mod serialization_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_always_emit_list_fields() {
            let value = serde_json::to_value(component("Empty", vec![])).unwrap();
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
                assert_eq!(value[field], json!([]), "{}", field);
            }
            assert!(value.get("tagName").is_none());
            assert!(value.get("node").is_none());
        }

        #[test]
        fn should_use_manifest_field_names() {
            let mut prop = PropMeta::new("size");
            prop.type_text = "number".to_string();
            prop.primitive = PrimitiveType::Number;
            prop.is_static = true;
            prop.default_value = "1".to_string();
            let value = serde_json::to_value(&prop).unwrap();
            assert_eq!(value["type"], json!("number"));
            assert_eq!(value["primitive"], json!("number"));
            assert_eq!(value["static"], json!(true));
            assert_eq!(value["enum"], json!(false));
            assert_eq!(value["defaultValue"], json!("1"));
            assert!(value.get("attribute").is_none());
        }

        #[test]
        fn should_flatten_heritage_payload_under_its_kind() {
            let mut node = HeritageMeta::new("Focusable", HeritageKind::Mixin);
            node.payload = Some(HeritagePayload::Mixin(Box::new(component("FocusableElement", vec![]))));
            let value = serde_json::to_value(&node).unwrap();
            assert_eq!(value["kind"], json!("mixin"));
            assert_eq!(value["mixin"]["className"], json!("FocusableElement"));
            assert!(value.get("component").is_none());

            let bare = serde_json::to_value(HeritageMeta::new("X", HeritageKind::Interface)).unwrap();
            assert!(bare.get("interface").is_none());
            assert!(bare.get("file").is_none());
        }
    }

    mod result_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_find_components_by_tag() {
            let mut tagged = component("A", vec![]);
            tagged.tag_name = Some("a-el".to_string());
            let result = AnalysisResult {
                components: vec![component("B", vec![]), tagged],
                ..Default::default()
            };
            assert_eq!(result.component("a-el").map(|c| c.class_name.as_str()), Some("A"));
            assert!(result.component("b-el").is_none());
            assert!(!result.has_errors());
        }

        #[test]
        fn should_build_ref_entries_only_for_tagged_components() {
            let mut tagged = component("A", vec![]);
            assert_eq!(tagged.as_ref_entry(), None);
            tagged.tag_name = Some("a-el".to_string());
            tagged.source.path = "/a.ts".to_string();
            assert_eq!(
                tagged.as_ref_entry(),
                Some(ComponentRef {
                    name: "A".to_string(),
                    tag_name: "a-el".to_string(),
                    path: "/a.ts".to_string(),
                })
            );
        }
    }
}
