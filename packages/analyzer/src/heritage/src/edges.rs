// Heritage Edges
//
// Direct ancestors of a class or interface, classified once at the syntactic site.

use crate::meta::HeritageKind;
use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;
use ts::{Expression, HeritageClause, HeritageToken, Identifier, Span};

/// Platform and framework bases that are never resolved as ancestors.
const PLATFORM_BASES: &[&str] = &[
    "HTMLElement",
    "LitElement",
    "ReactiveElement",
    "FASTElement",
    "Element",
    "Node",
    "EventTarget",
    "Object",
];

static HTML_ELEMENT_BASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^HTML\w*Element$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeritageEdge {
    /// `extends Base`, or a class passed into a mixin application.
    Subclass { ident: Identifier, site: Span },
    /// The callee of `extends Mixin(Base)`.
    Mixin { ident: Identifier, site: Span },
    /// `implements I`, or `extends I` on an interface.
    Interface { ident: Identifier, site: Span },
}

impl HeritageEdge {
    pub fn kind(&self) -> HeritageKind {
        match self {
            HeritageEdge::Subclass { .. } => HeritageKind::Subclass,
            HeritageEdge::Mixin { .. } => HeritageKind::Mixin,
            HeritageEdge::Interface { .. } => HeritageKind::Interface,
        }
    }

    pub fn ident(&self) -> &Identifier {
        match self {
            HeritageEdge::Subclass { ident, .. }
            | HeritageEdge::Mixin { ident, .. }
            | HeritageEdge::Interface { ident, .. } => ident,
        }
    }

    /// The whole expression the edge was read from.
    pub fn site(&self) -> Span {
        match self {
            HeritageEdge::Subclass { site, .. }
            | HeritageEdge::Mixin { site, .. }
            | HeritageEdge::Interface { site, .. } => *site,
        }
    }

    pub fn name(&self) -> &str {
        &self.ident().name
    }
}

pub type EdgeList = SmallVec<[HeritageEdge; 4]>;

pub fn is_ignored_base(name: &str, extra_ignored: &[String]) -> bool {
    PLATFORM_BASES.contains(&name)
        || HTML_ELEMENT_BASE.is_match(name)
        || extra_ignored.iter().any(|n| n == name)
}

/// Edges of a class: `extends` is walked for mixin applications, `implements` yields interfaces.
pub fn class_edges(clauses: &[HeritageClause], extra_ignored: &[String]) -> EdgeList {
    let mut edges = EdgeList::new();
    for clause in clauses {
        for expression in &clause.types {
            match clause.token {
                HeritageToken::Extends => extends_edges(expression, &mut edges),
                HeritageToken::Implements => {
                    if let Some(ident) = reference_name(expression) {
                        edges.push(HeritageEdge::Interface {
                            ident: ident.clone(),
                            site: expression.span(),
                        });
                    }
                }
            }
        }
    }
    edges.retain(|e| !is_ignored_base(e.name(), extra_ignored));
    edges
}

/// Edges of an interface: every `extends` entry is another interface.
pub fn interface_edges(clauses: &[HeritageClause], extra_ignored: &[String]) -> EdgeList {
    clauses
        .iter()
        .flat_map(|clause| clause.types.iter())
        .filter_map(|expression| {
            reference_name(expression).map(|ident| HeritageEdge::Interface {
                ident: ident.clone(),
                site: expression.span(),
            })
        })
        .filter(|e| !is_ignored_base(e.name(), extra_ignored))
        .collect()
}

/// `A(B(Base))` yields `A` and `B` as mixins and `Base` as the subclass, in that order.
fn extends_edges(expression: &Expression, edges: &mut EdgeList) {
    match expression {
        Expression::Call(call) => {
            if let Some(ident) = reference_name(&call.expression) {
                edges.push(HeritageEdge::Mixin {
                    ident: ident.clone(),
                    site: expression.span(),
                });
            }
            for argument in &call.arguments {
                extends_edges(argument, edges);
            }
        }
        Expression::Identifier(_) | Expression::PropertyAccess(_) => {
            if let Some(ident) = reference_name(expression) {
                edges.push(HeritageEdge::Subclass {
                    ident: ident.clone(),
                    site: expression.span(),
                });
            }
        }
        _ => {}
    }
}

/// `Base` for `Base` and `ns.Base`.
fn reference_name(expression: &Expression) -> Option<&Identifier> {
    match expression {
        Expression::Identifier(ident) => Some(ident),
        Expression::PropertyAccess(access) => Some(&access.name),
        _ => None,
    }
}
