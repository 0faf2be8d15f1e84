// Heritage Resolver
//
// Walks the ancestor DAG of a declaration. Every edge is classified once (see `edges`),
// resolved through the checker to its declaration and turned into a payload:
//
//   class                  -> component (or mixin when reached through a mixin call)
//   mixin factory          -> mixin, built from the class the factory declares or returns
//   interface              -> interface, with its own `extends` chain
//   enum, alias, unresolved -> no payload
//
// Sibling edges are resolved in parallel and joined in source order. A declaration already
// on the current branch is not entered again. Diagnostics raised while building ancestors
// travel with the result (and its cache entry) and are reported once per file, span and code.

use super::cache::{CachedPayload, DeclarationKey, HeritageCache};
use super::edges::{class_edges, interface_edges, EdgeList, HeritageEdge};
use crate::analysis::{
    documentation, read_doc_tags, resolve, resolve_type, AnalysisContext, ComponentBuilder,
    MethodBuilder,
};
use crate::diagnostics::DiagnosticSink;
use crate::meta::{
    find_tag, has_tag, ComponentMeta, DocTagMeta, HeritageKind, HeritageMeta, HeritagePayload,
    InterfaceMeta, MethodMeta, NodeRef, PropMeta,
};
use crate::pipeline::{content_digest, FileDigests};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use ts::{
    ClassDeclaration, Declaration, Diagnostic, Expression, FunctionBody, FunctionDeclaration,
    InterfaceDeclaration, ModifierFlags, SourceFile, TypeElement, TypeElementKind, TypeFlags,
};

/// File name to content digest.
pub type Dependencies = BTreeMap<String, String>;

/// Heritage of one declaration, plus the digest of every file it was resolved from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedHeritage {
    pub heritage: Vec<HeritageMeta>,
    pub dependencies: Dependencies,
    /// Ancestor diagnostics, already forwarded to the context's sink.
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of resolving one part of the DAG. `cut` is set when a cycle was broken somewhere
/// below, which makes the result depend on where the walk started.
struct Resolved<T> {
    value: T,
    dependencies: Dependencies,
    diagnostics: Vec<Diagnostic>,
    cut: bool,
}

impl<T> Resolved<T> {
    fn leaf(value: T) -> Self {
        Self {
            value,
            dependencies: Dependencies::new(),
            diagnostics: Vec::new(),
            cut: false,
        }
    }
}

pub struct HeritageResolver<'a> {
    ctx: AnalysisContext<'a>,
    cache: &'a HeritageCache,
    digests: &'a FileDigests,
}

impl<'a> HeritageResolver<'a> {
    pub fn new(ctx: AnalysisContext<'a>, cache: &'a HeritageCache, digests: &'a FileDigests) -> Self {
        Self {
            ctx,
            cache,
            digests,
        }
    }

    pub fn resolve_class(&self, file: &SourceFile, class: &ClassDeclaration) -> ResolvedHeritage {
        let key = DeclarationKey::of(file, class.span);
        let owner = class.name_text().unwrap_or("default");
        let edges = self.class_edges(class, &key);
        let resolved = self.resolve_edges(file, owner, &edges, &[], &[key]);
        for diagnostic in &resolved.diagnostics {
            self.ctx.diagnostics.push_unique(diagnostic.clone());
        }
        ResolvedHeritage {
            heritage: resolved.value,
            dependencies: resolved.dependencies,
            diagnostics: resolved.diagnostics,
        }
    }

    fn class_edges(&self, class: &ClassDeclaration, key: &DeclarationKey) -> EdgeList {
        if let Some(edges) = self.cache.edges(key) {
            return edges;
        }
        let edges = class_edges(&class.heritage_clauses, &self.ctx.config.extra_ignored_bases);
        self.cache.put_edges(key.clone(), edges.clone());
        edges
    }

    fn interface_edges(&self, interface: &InterfaceDeclaration, key: &DeclarationKey) -> EdgeList {
        if let Some(edges) = self.cache.edges(key) {
            return edges;
        }
        let edges = interface_edges(&interface.heritage_clauses, &self.ctx.config.extra_ignored_bases);
        self.cache.put_edges(key.clone(), edges.clone());
        edges
    }

    /// Resolves sibling edges concurrently. Edges naming one of `excluded` (the parameters of
    /// an enclosing mixin factory) are dropped.
    fn resolve_edges(
        &self,
        file: &SourceFile,
        owner: &str,
        edges: &[HeritageEdge],
        excluded: &[String],
        path: &[DeclarationKey],
    ) -> Resolved<Vec<HeritageMeta>> {
        let nodes: Vec<Resolved<HeritageMeta>> = edges
            .par_iter()
            .filter(|edge| !excluded.iter().any(|param| param == edge.name()))
            .map(|edge| self.resolve_edge(file, owner, edge, path))
            .collect();

        let mut resolved = Resolved::leaf(Vec::with_capacity(nodes.len()));
        for node in nodes {
            resolved.value.push(node.value);
            resolved.dependencies.extend(node.dependencies);
            resolved.diagnostics.extend(node.diagnostics);
            resolved.cut |= node.cut;
        }
        resolved
    }

    fn resolve_edge(
        &self,
        file: &SourceFile,
        owner: &str,
        edge: &HeritageEdge,
        path: &[DeclarationKey],
    ) -> Resolved<HeritageMeta> {
        let mut node = HeritageMeta::new(edge.name(), edge.kind());
        node.parent = Some(owner.to_string());
        node.node = NodeRef::new(file.file_name(), edge.site());
        node.type_text = self.type_text(file, edge);

        let target = self
            .ctx
            .checker()
            .get_symbol_at_location(file.file_name(), edge.ident())
            .and_then(|symbol| symbol.value_declaration().cloned())
            .and_then(|d| {
                let decl_file = self.ctx.program.get_source_file(&d.file_name)?;
                Some((d.declaration, decl_file))
            });
        let Some((declaration, decl_file)) = target else {
            tracing::debug!(name = edge.name(), file = file.file_name(), "unresolved heritage edge");
            return Resolved::leaf(node);
        };
        node.file = Some(decl_file.file_name().to_string());

        let key = DeclarationKey::of(decl_file, declaration.span());
        if path.contains(&key) {
            tracing::debug!(name = edge.name(), file = decl_file.file_name(), "heritage cycle cut");
            return Resolved {
                value: node,
                dependencies: self.own_dependency(decl_file),
                diagnostics: Vec::new(),
                cut: true,
            };
        }

        let payload = self.payload(decl_file, &declaration, key, path);
        node.payload = payload.value.map(|p| match (p, edge.kind()) {
            (HeritagePayload::Component(meta), HeritageKind::Mixin) => HeritagePayload::Mixin(meta),
            (other, _) => other,
        });
        Resolved {
            value: node,
            dependencies: payload.dependencies,
            diagnostics: payload.diagnostics,
            cut: payload.cut,
        }
    }

    /// Checker text of the heritage expression, or its source text when the checker knows
    /// nothing about it.
    fn type_text(&self, file: &SourceFile, edge: &HeritageEdge) -> String {
        let checker = self.ctx.checker();
        let ty = checker.get_type_at_location(file.file_name(), edge.site());
        if ty.flags.contains(TypeFlags::ANY) {
            file.text_of(edge.site()).to_string()
        } else {
            resolve_type(checker, &ty)
        }
    }

    fn own_dependency(&self, file: &SourceFile) -> Dependencies {
        let digest = self
            .digests
            .get(file.file_name())
            .map(str::to_string)
            .unwrap_or_else(|| content_digest(file.text()));
        Dependencies::from([(file.file_name().to_string(), digest)])
    }

    fn payload(
        &self,
        file: &SourceFile,
        declaration: &Declaration,
        key: DeclarationKey,
        path: &[DeclarationKey],
    ) -> Resolved<Option<HeritagePayload>> {
        if let Some(cached) = self.cache.payload(&key) {
            if self.digests.matches(&cached.dependencies) {
                return Resolved {
                    value: cached.payload,
                    dependencies: cached.dependencies,
                    diagnostics: cached.diagnostics,
                    cut: false,
                };
            }
        }

        let mut branch = path.to_vec();
        branch.push(key.clone());
        let mut resolved = match declaration {
            Declaration::Class(class) => {
                let meta = self.class_meta(file, class, None, &[], &branch);
                wrap(meta, |m| Some(HeritagePayload::Component(Box::new(m))))
            }
            Declaration::Function(function) => {
                let name = function.name.as_ref().map_or("default", |n| n.name.as_str());
                self.mixin_payload(file, function, name, &branch)
            }
            Declaration::Variable(variable) => match &variable.initializer {
                Some(Expression::Function(function)) => {
                    self.mixin_payload(file, function, &variable.name.name, &branch)
                }
                Some(Expression::Class(class)) => {
                    let meta = self.class_meta(file, class, Some(&variable.name.name), &[], &branch);
                    wrap(meta, |m| Some(HeritagePayload::Mixin(Box::new(m))))
                }
                _ => Resolved::leaf(None),
            },
            Declaration::Interface(interface) => {
                let meta = self.interface_meta(file, interface, &branch);
                wrap(meta, |m| Some(HeritagePayload::Interface(Box::new(m))))
            }
            Declaration::Enum(_) | Declaration::TypeAlias(_) => Resolved::leaf(None),
        };
        resolved.dependencies.extend(self.own_dependency(file));

        if !resolved.cut {
            self.cache.put_payload(
                key,
                CachedPayload {
                    payload: resolved.value.clone(),
                    dependencies: resolved.dependencies.clone(),
                    diagnostics: resolved.diagnostics.clone(),
                },
            );
        }
        resolved
    }

    /// Builds an ancestor class with its own heritage. The build reports into a scratch sink
    /// whose diagnostics are returned with the result.
    fn class_meta(
        &self,
        file: &SourceFile,
        class: &ClassDeclaration,
        fallback_name: Option<&str>,
        excluded: &[String],
        path: &[DeclarationKey],
    ) -> Resolved<ComponentMeta> {
        let scratch = DiagnosticSink::new();
        let ctx = AnalysisContext::new(self.ctx.program, self.ctx.config, &scratch);
        let mut meta = ComponentBuilder::new(ctx).build(file, class);
        if class.name.is_none() {
            if let Some(name) = fallback_name {
                meta.class_name = name.to_string();
            }
        }

        let key = DeclarationKey::of(file, class.span);
        let edges = self.class_edges(class, &key);
        let heritage = self.resolve_edges(file, &meta.class_name, &edges, excluded, path);
        meta.heritage = heritage.value;
        let mut diagnostics = scratch.take();
        diagnostics.extend(heritage.diagnostics);
        Resolved {
            value: meta,
            dependencies: heritage.dependencies,
            diagnostics,
            cut: heritage.cut,
        }
    }

    fn mixin_payload(
        &self,
        file: &SourceFile,
        function: &FunctionDeclaration,
        name: &str,
        path: &[DeclarationKey],
    ) -> Resolved<Option<HeritagePayload>> {
        let Some(class) = mixin_class(function) else {
            return Resolved::leaf(None);
        };
        let params: Vec<String> = function.parameters.iter().map(|p| p.name.clone()).collect();
        let meta = self.class_meta(file, &class, Some(name), &params, path);
        wrap(meta, |m| Some(HeritagePayload::Mixin(Box::new(m))))
    }

    fn interface_meta(
        &self,
        file: &SourceFile,
        interface: &InterfaceDeclaration,
        path: &[DeclarationKey],
    ) -> Resolved<InterfaceMeta> {
        let file_name = file.file_name();
        let methods = MethodBuilder::new(self.ctx, file);
        let mut meta = InterfaceMeta {
            name: interface.name.name.clone(),
            doc_tags: read_doc_tags(interface.jsdoc.as_ref(), file_name),
            documentation: documentation(interface.jsdoc.as_ref()),
            node: NodeRef::new(file_name, interface.span),
            ..Default::default()
        };

        for element in &interface.members {
            let name = element.name.text();
            if name.is_empty() {
                continue;
            }
            let doc_tags = read_doc_tags(element.jsdoc.as_ref(), file_name);
            match element.kind {
                TypeElementKind::PropertySignature => {
                    meta.props.push(self.signature_prop(file, element, doc_tags))
                }
                TypeElementKind::MethodSignature => {
                    let mut method = MethodMeta::new(name);
                    methods.fill_signature(&mut method, &element.parameters, element.span);
                    method.internal = has_tag(&doc_tags, "internal");
                    method.deprecated = has_tag(&doc_tags, "deprecated");
                    method.documentation = documentation(element.jsdoc.as_ref());
                    method.doc_tags = doc_tags;
                    method.node = NodeRef::new(file_name, element.span);
                    meta.methods.push(method);
                }
            }
        }

        let key = DeclarationKey::of(file, interface.span);
        let edges = self.interface_edges(interface, &key);
        let heritage = self.resolve_edges(file, &meta.name, &edges, &[], path);
        meta.heritage = heritage.value;
        Resolved {
            value: meta,
            dependencies: heritage.dependencies,
            diagnostics: heritage.diagnostics,
            cut: heritage.cut,
        }
    }

    fn signature_prop(&self, file: &SourceFile, element: &TypeElement, doc_tags: Vec<DocTagMeta>) -> PropMeta {
        let checker = self.ctx.checker();
        let resolved = resolve(checker, &checker.get_type_at_location(file.file_name(), element.span));
        let mut prop = PropMeta::new(element.name.text());
        prop.type_text = resolved.text;
        prop.primitive = resolved.primitive;
        prop.readonly = element.modifiers.contains(ModifierFlags::READONLY) || has_tag(&doc_tags, "readonly");
        prop.optional = element.question_token || has_tag(&doc_tags, "optional");
        prop.required = has_tag(&doc_tags, "required");
        prop.internal = has_tag(&doc_tags, "internal");
        prop.deprecated = has_tag(&doc_tags, "deprecated");
        prop.default_value = ["defaultValue", "default"]
            .iter()
            .find_map(|tag| find_tag(&doc_tags, tag).and_then(|t| t.text.clone()))
            .unwrap_or_else(|| if prop.optional { "undefined".to_string() } else { String::new() });
        prop.documentation = documentation(element.jsdoc.as_ref());
        prop.doc_tags = doc_tags;
        prop.node = NodeRef::new(file.file_name(), element.span);
        prop
    }
}

fn wrap<T>(resolved: Resolved<T>, f: impl FnOnce(T) -> Option<HeritagePayload>) -> Resolved<Option<HeritagePayload>> {
    Resolved {
        value: f(resolved.value),
        dependencies: resolved.dependencies,
        diagnostics: resolved.diagnostics,
        cut: resolved.cut,
    }
}

/// The class a mixin factory produces: a returned class expression, a returned local class,
/// or failing those the first class declared in the body.
pub fn mixin_class(function: &FunctionDeclaration) -> Option<Arc<ClassDeclaration>> {
    match &function.body {
        FunctionBody::Block {
            declarations,
            return_expressions,
        } => {
            let local_class = |name: Option<&str>| {
                declarations.iter().find_map(|d| match d {
                    Declaration::Class(class) if name.is_none() || class.name_text() == name => {
                        Some(class.clone())
                    }
                    _ => None,
                })
            };
            return_expressions
                .iter()
                .find_map(|expression| match expression {
                    Expression::Class(class) => Some(class.clone()),
                    Expression::Identifier(ident) => local_class(Some(&ident.name)),
                    _ => None,
                })
                .or_else(|| local_class(None))
        }
        FunctionBody::Expression(expression) => match expression.as_ref() {
            Expression::Class(class) => Some(class.clone()),
            _ => None,
        },
    }
}
