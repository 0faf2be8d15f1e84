// Duplicate Tag Names
//
// One diagnostic per colliding tag, anchored at the first owner and naming every owning
// source file.

use crate::diagnostics::{make_diagnostic, make_related_information, DiagnosticSink, ErrorCode};
use crate::meta::ComponentMeta;
use indexmap::IndexMap;
use ts::{DiagnosticCategory, Program};

/// Owners of every tag name declared more than once, in first-seen order.
pub fn duplicate_groups(components: &[ComponentMeta]) -> Vec<(&str, Vec<&ComponentMeta>)> {
    let mut groups: IndexMap<&str, Vec<&ComponentMeta>> = IndexMap::new();
    for component in components {
        if let Some(tag) = component.tag_name.as_deref() {
            groups.entry(tag).or_default().push(component);
        }
    }
    groups.into_iter().filter(|(_, owners)| owners.len() > 1).collect()
}

pub fn report_duplicates(components: &[ComponentMeta], program: &dyn Program, sink: &DiagnosticSink) {
    for (tag, owners) in duplicate_groups(components) {
        let Some(first) = program.get_source_file(&owners[0].node.file_name) else {
            continue;
        };
        let paths: Vec<&str> = owners.iter().map(|c| c.source.path.as_str()).collect();
        let related = owners
            .iter()
            .filter_map(|owner| {
                let file = program.get_source_file(&owner.node.file_name)?;
                Some(make_related_information(
                    file,
                    owner.node.span,
                    format!("`{}` is declared by `{}` here", tag, owner.class_name),
                ))
            })
            .collect();
        sink.push(make_diagnostic(
            ErrorCode::DuplicateTagName,
            first,
            owners[0].node.span,
            format!("Tag name `{}` is declared more than once: {}", tag, paths.join(", ")),
            Some(related),
            DiagnosticCategory::Error,
        ));
    }
}
