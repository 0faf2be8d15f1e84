// Component Dependency Graph
//
// A component depends on every other component whose tag appears as `<tag` in its
// declaration text. Dependents are the inverse edges. Both lists are sorted by tag name.

use crate::meta::{ComponentMeta, ComponentRef};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use ts::Program;

static OPENING_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<([A-Za-z][\w-]*)").unwrap());

/// Tag names opened in `text`, in order of appearance.
pub fn opened_tags(text: &str) -> impl Iterator<Item = &str> {
    OPENING_TAG
        .captures_iter(text)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
}

pub fn link_dependencies(components: &mut [ComponentMeta], program: &dyn Program) {
    let mut by_tag: BTreeMap<String, ComponentRef> = BTreeMap::new();
    for entry in components.iter().filter_map(ComponentMeta::as_ref_entry) {
        by_tag.entry(entry.tag_name.clone()).or_insert(entry);
    }

    let dependencies: Vec<BTreeMap<String, ComponentRef>> = components
        .iter()
        .map(|component| {
            let mut found: BTreeMap<String, ComponentRef> = component
                .dependencies
                .iter()
                .map(|r| (r.tag_name.clone(), r.clone()))
                .collect();
            let Some(file) = program.get_source_file(&component.node.file_name) else {
                return found;
            };
            for tag in opened_tags(file.text_of(component.node.span)) {
                if component.tag_name.as_deref() == Some(tag) {
                    continue;
                }
                if let Some(target) = by_tag.get(tag) {
                    found.entry(tag.to_string()).or_insert_with(|| target.clone());
                }
            }
            found
        })
        .collect();

    let mut dependents: BTreeMap<String, BTreeMap<String, ComponentRef>> = BTreeMap::new();
    for (component, deps) in components.iter().zip(&dependencies) {
        let Some(owner) = component.as_ref_entry() else {
            continue;
        };
        for tag in deps.keys() {
            dependents
                .entry(tag.clone())
                .or_default()
                .insert(owner.tag_name.clone(), owner.clone());
        }
    }

    for (component, deps) in components.iter_mut().zip(dependencies) {
        component.dependencies = deps.into_values().collect();
        component.dependents = component
            .tag_name
            .as_ref()
            .and_then(|tag| dependents.get(tag))
            .map(|owners| owners.values().cloned().collect())
            .unwrap_or_default();
    }
}
