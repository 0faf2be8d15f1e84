// Heritage Merge
//
// Folds ancestor metadata into a component. Entries match by name; unmatched ancestor
// entries are appended and matched ones follow the per-type policy below. Anything a policy
// does not mention keeps the subclass value.

use crate::meta::{
    find_tag, flatten_heritage, ComponentMeta, ComponentRef, CssPartMeta, CssPropMeta, DocTagMeta,
    EventMeta, HeritageMeta, HeritagePayload, MethodMeta, PropMeta,
};

pub trait Mergeable: Clone {
    fn name(&self) -> &str;

    /// Folds a same-named ancestor entry into `self`.
    fn merge_from(&mut self, ancestor: &Self);
}

/// Appends unmatched entries, merges matched ones. Target order is kept.
pub fn merge_list<T: Mergeable>(target: &mut Vec<T>, source: &[T]) {
    for entry in source {
        match target.iter_mut().find(|t| t.name() == entry.name()) {
            Some(existing) => existing.merge_from(entry),
            None => target.push(entry.clone()),
        }
    }
}

/// Folds whichever payload `node` carries into `component`. Nested heritage is not walked.
pub fn merge_heritage(component: &mut ComponentMeta, node: &HeritageMeta) {
    match &node.payload {
        Some(HeritagePayload::Component(source)) | Some(HeritagePayload::Mixin(source)) => {
            merge_component(component, source)
        }
        Some(HeritagePayload::Interface(source)) => {
            merge_list(&mut component.props, &source.props);
            merge_list(&mut component.methods, &source.methods);
        }
        None => {}
    }
}

pub fn merge_component(target: &mut ComponentMeta, source: &ComponentMeta) {
    merge_list(&mut target.props, &source.props);
    merge_list(&mut target.methods, &source.methods);
    merge_list(&mut target.events, &source.events);
    merge_list(&mut target.css_props, &source.css_props);
    merge_list(&mut target.css_parts, &source.css_parts);
    merge_list(&mut target.dependencies, &source.dependencies);
}

/// Pre-order flattens the component's own heritage tree and merges every node into it.
pub fn merge_chain(component: &mut ComponentMeta) {
    let heritage = std::mem::take(&mut component.heritage);
    for node in flatten_heritage(&heritage) {
        merge_heritage(component, node);
    }
    component.heritage = heritage;
}

fn union_doc_tags(target: &mut Vec<DocTagMeta>, source: &[DocTagMeta]) {
    for tag in source {
        if !target.contains(tag) {
            target.push(tag.clone());
        }
    }
}

fn backfill(target: &mut String, source: &str) {
    if target.is_empty() && !source.is_empty() {
        *target = source.to_string();
    }
}

impl Mergeable for PropMeta {
    fn name(&self) -> &str {
        &self.name
    }

    fn merge_from(&mut self, ancestor: &Self) {
        union_doc_tags(&mut self.doc_tags, &ancestor.doc_tags);
        if self.default_value.is_empty() {
            if let Some(text) = find_tag(&ancestor.doc_tags, "default").and_then(|t| t.text.as_deref()) {
                self.default_value = text.to_string();
            }
        }
        backfill(&mut self.documentation, &ancestor.documentation);
        self.readonly |= ancestor.readonly;
        self.required |= ancestor.required;
        self.optional |= ancestor.optional;
        self.internal |= ancestor.internal;
        self.deprecated |= ancestor.deprecated;
        self.reflect |= ancestor.reflect;
        self.is_enum |= ancestor.is_enum;
    }
}

impl Mergeable for MethodMeta {
    fn name(&self) -> &str {
        &self.name
    }

    fn merge_from(&mut self, ancestor: &Self) {
        union_doc_tags(&mut self.doc_tags, &ancestor.doc_tags);
        backfill(&mut self.documentation, &ancestor.documentation);
        self.internal |= ancestor.internal;
        self.deprecated |= ancestor.deprecated;
    }
}

macro_rules! describe_only {
    ($($ty:ty),*) => {
        $(
            impl Mergeable for $ty {
                fn name(&self) -> &str {
                    &self.name
                }

                fn merge_from(&mut self, ancestor: &Self) {
                    backfill(&mut self.description, &ancestor.description);
                }
            }
        )*
    };
}

describe_only!(EventMeta, CssPropMeta, CssPartMeta);

impl Mergeable for ComponentRef {
    fn name(&self) -> &str {
        &self.name
    }

    fn merge_from(&mut self, _ancestor: &Self) {}
}
