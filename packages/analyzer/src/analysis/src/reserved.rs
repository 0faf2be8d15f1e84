// Reserved Member Names
//
// Framework lifecycle hooks and platform members never reported as component methods.

use once_cell::sync::Lazy;
use std::collections::HashSet;

static LIFECYCLE_METHODS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Custom elements
        "connectedCallback",
        "disconnectedCallback",
        "adoptedCallback",
        "attributeChangedCallback",
        // Lit
        "render",
        "update",
        "updated",
        "firstUpdated",
        "willUpdate",
        "shouldUpdate",
        "performUpdate",
        "scheduleUpdate",
        "getUpdateComplete",
        "createRenderRoot",
        // Stencil
        "componentWillLoad",
        "componentDidLoad",
        "componentShouldUpdate",
        "componentWillRender",
        "componentDidRender",
        "componentWillUpdate",
        "componentDidUpdate",
        // FAST
        "templateChanged",
        "stylesChanged",
    ]
    .into_iter()
    .collect()
});

static PUBLIC_MEMBERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "constructor",
        "requestUpdate",
        "addController",
        "removeController",
        "updateComplete",
        "hasUpdated",
        "isUpdatePending",
        "renderRoot",
        "renderOptions",
        "observedAttributes",
        "styles",
        "shadowRootOptions",
        "elementStyles",
        "finalize",
        "createProperty",
        "getPropertyDescriptor",
        "getPropertyOptions",
        "$emit",
        "$fastController",
    ]
    .into_iter()
    .collect()
});

pub fn is_reserved_method(name: &str) -> bool {
    LIFECYCLE_METHODS.contains(name) || PUBLIC_MEMBERS.contains(name)
}

pub fn is_reserved_member(name: &str) -> bool {
    PUBLIC_MEMBERS.contains(name)
}
