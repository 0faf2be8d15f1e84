// Fixture Front End
//
// Parses fixture sources with oxc and lowers the AST into the declaration trees the
// analyzer reads. Span conventions follow what the checker keys annotations by:
//
//   class, function, variable -> from the first decorator or `export` keyword
//   class member               -> from its first decorator, trailing `;` excluded
//   parameter                  -> the whole parameter, default value included
//
// Doc blocks come from the parser's comment list and attach to the node they directly
// precede. A member doc block may also sit between the decorators and the member.

use super::jsdoc::parse_jsdoc;
use oxc_allocator::Allocator;
use oxc_ast::ast;
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span as OxcSpan};
use std::sync::Arc;
use ts::*;

fn source_type() -> SourceType {
    SourceType::default().with_typescript(true).with_module(true)
}

/// Top-level declarations of a TypeScript module.
///
/// Panics when the parser gives up on the fixture. Recoverable errors are tolerated.
pub fn parse_source(text: &str) -> Vec<Declaration> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, text, source_type()).parse();
    if ret.panicked {
        panic!("fixture does not parse: {:?}", ret.errors);
    }
    let comments: Vec<(usize, usize)> = ret
        .program
        .comments
        .iter()
        .map(|c| (c.span.start as usize, c.span.end as usize))
        .collect();
    let lowering = Lowering::new(text, &comments);
    ret.program
        .body
        .iter()
        .flat_map(|statement| lowering.statement(statement))
        .collect()
}

/// The first expression statement of `text`, or `Other` covering the text.
pub fn parse_expression(text: &str) -> Expression {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, text, source_type()).parse();
    let lowering = Lowering::new(text, &[]);
    ret.program
        .body
        .iter()
        .find_map(|statement| match statement {
            ast::Statement::ExpressionStatement(s) => Some(lowering.expression(&s.expression)),
            _ => None,
        })
        .unwrap_or(Expression::Other(Span::new(0, text.len())))
}

struct Lowering<'t> {
    text: &'t str,
    /// `/** */` blocks in source order, delimiters included.
    docs: Vec<Span>,
}

impl<'t> Lowering<'t> {
    fn new(text: &'t str, comments: &[(usize, usize)]) -> Self {
        let docs = comments
            .iter()
            .filter_map(|&(start, end)| doc_block(text, start, end))
            .collect();
        Self { text, docs }
    }

    fn span(&self, span: OxcSpan) -> Span {
        Span::new(span.start as usize, span.end as usize)
    }

    fn text_of(&self, span: OxcSpan) -> &'t str {
        self.text.get(span.start as usize..span.end as usize).unwrap_or_default()
    }

    /// `span` without trailing whitespace and statement separators.
    fn trimmed(&self, span: Span) -> Span {
        let text = self.text.get(span.start..span.end).unwrap_or_default();
        let kept = text
            .trim_end()
            .trim_end_matches(|c| c == ';' || c == ',')
            .trim_end();
        Span::new(span.start, span.start + kept.len())
    }

    /// The doc block ending right before `pos`, with only whitespace in between.
    fn doc_before(&self, pos: usize) -> Option<JsDoc> {
        let idx = self.docs.partition_point(|d| d.end <= pos);
        let doc = self.docs[..idx].last()?;
        self.text
            .get(doc.end..pos)?
            .trim()
            .is_empty()
            .then(|| parse_jsdoc(self.text, *doc))
    }

    /// The doc block starting at the first non-whitespace offset after `pos`.
    fn doc_after(&self, pos: usize) -> Option<JsDoc> {
        let rest = self.text.get(pos..)?;
        let at = pos + (rest.len() - rest.trim_start().len());
        self.docs
            .iter()
            .find(|d| d.start == at)
            .map(|d| parse_jsdoc(self.text, *d))
    }

    // --- Statements ---

    fn statement(&self, statement: &ast::Statement<'_>) -> Vec<Declaration> {
        let start = statement.span().start as usize;
        match statement {
            ast::Statement::ExportNamedDeclaration(export) => match &export.declaration {
                Some(declaration) => self.declaration(declaration, start, ModifierFlags::EXPORT),
                None => Vec::new(),
            },
            ast::Statement::ExportDefaultDeclaration(export) => {
                let modifiers = ModifierFlags::EXPORT | ModifierFlags::DEFAULT;
                match &export.declaration {
                    ast::ExportDefaultDeclarationKind::ClassDeclaration(class) => {
                        vec![Declaration::Class(Arc::new(self.class(class, start, modifiers)))]
                    }
                    ast::ExportDefaultDeclarationKind::FunctionDeclaration(function) => {
                        vec![Declaration::Function(Arc::new(self.function(function, start)))]
                    }
                    ast::ExportDefaultDeclarationKind::TSInterfaceDeclaration(interface) => {
                        vec![Declaration::Interface(Arc::new(self.interface(interface, start)))]
                    }
                    _ => Vec::new(),
                }
            }
            other => other
                .as_declaration()
                .map(|declaration| self.declaration(declaration, start, ModifierFlags::empty()))
                .unwrap_or_default(),
        }
    }

    fn declaration(&self, declaration: &ast::Declaration<'_>, start: usize, modifiers: ModifierFlags) -> Vec<Declaration> {
        match declaration {
            ast::Declaration::ClassDeclaration(class) => {
                vec![Declaration::Class(Arc::new(self.class(class, start, modifiers)))]
            }
            ast::Declaration::FunctionDeclaration(function) => {
                vec![Declaration::Function(Arc::new(self.function(function, start)))]
            }
            ast::Declaration::VariableDeclaration(variables) => self.variables(variables, start, modifiers),
            ast::Declaration::TSInterfaceDeclaration(interface) => {
                vec![Declaration::Interface(Arc::new(self.interface(interface, start)))]
            }
            ast::Declaration::TSEnumDeclaration(enumeration) => {
                vec![Declaration::Enum(Arc::new(self.enumeration(enumeration, start)))]
            }
            ast::Declaration::TSTypeAliasDeclaration(alias) => {
                let start = start.min(alias.span.start as usize);
                vec![Declaration::TypeAlias(Arc::new(TypeAliasDeclaration {
                    name: self.binding(&alias.id),
                    span: self.trimmed(Span::new(start, alias.span.end as usize)),
                    jsdoc: self.doc_before(start),
                }))]
            }
            _ => Vec::new(),
        }
    }

    fn variables(&self, variables: &ast::VariableDeclaration<'_>, start: usize, modifiers: ModifierFlags) -> Vec<Declaration> {
        let start = start.min(variables.span.start as usize);
        let single = variables.declarations.len() == 1;
        let jsdoc = self.doc_before(start);
        let mut modifiers = modifiers;
        modifiers.set(ModifierFlags::CONST, matches!(variables.kind, ast::VariableDeclarationKind::Const));
        modifiers.set(ModifierFlags::AMBIENT, variables.declare);

        variables
            .declarations
            .iter()
            .filter_map(|declarator| {
                let ast::BindingPatternKind::BindingIdentifier(id) = &declarator.id.kind else {
                    return None;
                };
                let span = if single {
                    self.trimmed(Span::new(start, variables.span.end as usize))
                } else {
                    self.span(declarator.span)
                };
                Some(Declaration::Variable(Arc::new(VariableDeclaration {
                    name: self.binding(id),
                    span,
                    modifiers,
                    initializer: declarator.init.as_ref().map(|init| self.expression(init)),
                    jsdoc: jsdoc.clone(),
                })))
            })
            .collect()
    }

    fn binding(&self, id: &ast::BindingIdentifier<'_>) -> Identifier {
        Identifier::new(id.name.as_str(), self.span(id.span))
    }

    // --- Classes ---

    fn class(&self, class: &ast::Class<'_>, start: usize, modifiers: ModifierFlags) -> ClassDeclaration {
        let decorators: Vec<Decorator> = class.decorators.iter().map(|d| self.decorator(d)).collect();
        let start = decorators
            .iter()
            .map(|d| d.span.start)
            .fold(start.min(class.span.start as usize), usize::min);

        let mut modifiers = modifiers;
        modifiers.set(ModifierFlags::ABSTRACT, class.r#abstract);
        modifiers.set(ModifierFlags::AMBIENT, class.declare);

        let mut heritage_clauses = Vec::new();
        if let Some(base) = &class.super_class {
            let expression = self.expression(base);
            heritage_clauses.push(HeritageClause {
                token: HeritageToken::Extends,
                span: expression.span(),
                types: vec![expression],
            });
        }
        if let (Some(first), Some(last)) = (class.implements.first(), class.implements.last()) {
            heritage_clauses.push(HeritageClause {
                token: HeritageToken::Implements,
                types: class.implements.iter().map(|i| self.type_name(&i.expression)).collect(),
                span: Span::new(first.span.start as usize, last.span.end as usize),
            });
        }

        ClassDeclaration {
            name: class.id.as_ref().map(|id| self.binding(id)),
            span: Span::new(start, class.span.end as usize),
            modifiers,
            decorators,
            heritage_clauses,
            members: class.body.body.iter().filter_map(|e| self.member(e)).collect(),
            jsdoc: self.doc_before(start),
        }
    }

    fn decorator(&self, decorator: &ast::Decorator<'_>) -> Decorator {
        Decorator {
            expression: self.expression(&decorator.expression),
            span: self.span(decorator.span),
        }
    }

    fn member(&self, element: &ast::ClassElement<'_>) -> Option<ClassMember> {
        match element {
            ast::ClassElement::PropertyDefinition(prop) => {
                let mut modifiers = accessibility(prop.accessibility.as_ref());
                modifiers.set(ModifierFlags::STATIC, prop.r#static);
                modifiers.set(ModifierFlags::READONLY, prop.readonly);
                modifiers.set(ModifierFlags::AMBIENT, prop.declare);
                modifiers.set(ModifierFlags::OVERRIDE, prop.r#override);
                modifiers.set(
                    ModifierFlags::ABSTRACT,
                    matches!(prop.r#type, ast::PropertyDefinitionType::TSAbstractPropertyDefinition),
                );
                let mut member = self.class_member(
                    ClassMemberKind::Property,
                    &prop.decorators,
                    self.property_name(&prop.key, prop.computed),
                    prop.span,
                    modifiers,
                );
                member.question_token = prop.optional;
                member.exclamation_token = prop.definite;
                member.initializer = prop.value.as_ref().map(|v| self.expression(v));
                Some(member)
            }
            ast::ClassElement::AccessorProperty(prop) => {
                let mut modifiers = ModifierFlags::ACCESSOR;
                modifiers.set(ModifierFlags::STATIC, prop.r#static);
                let mut member = self.class_member(
                    ClassMemberKind::Property,
                    &prop.decorators,
                    self.property_name(&prop.key, prop.computed),
                    prop.span,
                    modifiers,
                );
                member.initializer = prop.value.as_ref().map(|v| self.expression(v));
                Some(member)
            }
            ast::ClassElement::MethodDefinition(method) => {
                let kind = match method.kind {
                    ast::MethodDefinitionKind::Constructor => ClassMemberKind::Constructor,
                    ast::MethodDefinitionKind::Method => ClassMemberKind::Method,
                    ast::MethodDefinitionKind::Get => ClassMemberKind::GetAccessor,
                    ast::MethodDefinitionKind::Set => ClassMemberKind::SetAccessor,
                };
                let mut modifiers = accessibility(method.accessibility.as_ref());
                modifiers.set(ModifierFlags::STATIC, method.r#static);
                modifiers.set(ModifierFlags::OVERRIDE, method.r#override);
                modifiers.set(ModifierFlags::ASYNC, method.value.r#async);
                modifiers.set(
                    ModifierFlags::ABSTRACT,
                    matches!(method.r#type, ast::MethodDefinitionType::TSAbstractMethodDefinition),
                );
                let mut member = self.class_member(
                    kind,
                    &method.decorators,
                    self.property_name(&method.key, method.computed),
                    method.span,
                    modifiers,
                );
                member.question_token = method.optional;
                member.parameters = self.parameters(&method.value.params);
                Some(member)
            }
            ast::ClassElement::TSIndexSignature(signature) => {
                let span = self.trimmed(self.span(signature.span));
                let mut modifiers = ModifierFlags::empty();
                modifiers.set(ModifierFlags::READONLY, signature.readonly);
                Some(ClassMember {
                    kind: ClassMemberKind::IndexSignature,
                    name: PropertyName::Computed(self.text_of(signature.span).to_string()),
                    span,
                    modifiers,
                    jsdoc: self.doc_before(span.start),
                    ..Default::default()
                })
            }
            ast::ClassElement::StaticBlock(_) => None,
        }
    }

    fn class_member(
        &self,
        kind: ClassMemberKind,
        decorators: &[ast::Decorator<'_>],
        name: PropertyName,
        span: OxcSpan,
        modifiers: ModifierFlags,
    ) -> ClassMember {
        let decorators: Vec<Decorator> = decorators.iter().map(|d| self.decorator(d)).collect();
        let start = decorators
            .iter()
            .map(|d| d.span.start)
            .fold(span.start as usize, usize::min);
        let jsdoc = self
            .doc_before(start)
            .or_else(|| decorators.last().and_then(|d| self.doc_after(d.span.end)));
        ClassMember {
            kind,
            name,
            span: self.trimmed(Span::new(start, span.end as usize)),
            modifiers,
            decorators,
            jsdoc,
            ..Default::default()
        }
    }

    fn property_name(&self, key: &ast::PropertyKey<'_>, computed: bool) -> PropertyName {
        if computed {
            return PropertyName::Computed(self.text_of(key.span()).to_string());
        }
        match key {
            ast::PropertyKey::StaticIdentifier(id) => PropertyName::Identifier(id.name.to_string()),
            ast::PropertyKey::PrivateIdentifier(id) => PropertyName::PrivateIdentifier(format!("#{}", id.name)),
            ast::PropertyKey::StringLiteral(lit) => PropertyName::StringLiteral(lit.value.to_string()),
            ast::PropertyKey::NumericLiteral(lit) => PropertyName::NumericLiteral(self.text_of(lit.span).to_string()),
            other => PropertyName::Computed(self.text_of(other.span()).to_string()),
        }
    }

    // --- Functions ---

    fn parameters(&self, params: &ast::FormalParameters<'_>) -> Vec<Parameter> {
        let mut parameters: Vec<Parameter> = params
            .items
            .iter()
            .map(|param| self.parameter(&param.pattern, param.span, false))
            .collect();
        if let Some(rest) = &params.rest {
            parameters.push(self.parameter(&rest.argument, rest.span, true));
        }
        parameters
    }

    fn parameter(&self, pattern: &ast::BindingPattern<'_>, span: OxcSpan, rest: bool) -> Parameter {
        let (name, initializer) = match &pattern.kind {
            ast::BindingPatternKind::AssignmentPattern(assign) => {
                (self.binding_name(&assign.left), Some(self.expression(&assign.right)))
            }
            _ => (self.binding_name(pattern), None),
        };
        Parameter {
            name,
            span: self.span(span),
            question_token: pattern.optional,
            dot_dot_dot_token: rest,
            initializer,
        }
    }

    fn binding_name(&self, pattern: &ast::BindingPattern<'_>) -> String {
        match &pattern.kind {
            ast::BindingPatternKind::BindingIdentifier(id) => id.name.to_string(),
            other => self.text_of(other.span()).to_string(),
        }
    }

    fn function(&self, function: &ast::Function<'_>, start: usize) -> FunctionDeclaration {
        let start = start.min(function.span.start as usize);
        FunctionDeclaration {
            name: function.id.as_ref().map(|id| self.binding(id)),
            span: Span::new(start, function.span.end as usize),
            parameters: self.parameters(&function.params),
            body: function
                .body
                .as_ref()
                .map(|body| self.block_body(&body.statements))
                .unwrap_or_default(),
            jsdoc: self.doc_before(start),
        }
    }

    fn arrow(&self, arrow: &ast::ArrowFunctionExpression<'_>) -> FunctionDeclaration {
        let body = if arrow.expression {
            match arrow.body.statements.first() {
                Some(ast::Statement::ExpressionStatement(s)) => {
                    FunctionBody::Expression(Box::new(self.expression(&s.expression)))
                }
                _ => FunctionBody::default(),
            }
        } else {
            self.block_body(&arrow.body.statements)
        };
        FunctionDeclaration {
            name: None,
            span: self.span(arrow.span),
            parameters: self.parameters(&arrow.params),
            body,
            jsdoc: None,
        }
    }

    /// Local declarations and `return` expressions of a block body.
    fn block_body(&self, statements: &[ast::Statement<'_>]) -> FunctionBody {
        let mut declarations = Vec::new();
        let mut return_expressions = Vec::new();
        for statement in statements {
            match statement {
                ast::Statement::ReturnStatement(ret) => {
                    if let Some(argument) = &ret.argument {
                        return_expressions.push(self.expression(argument));
                    }
                }
                other => declarations.extend(self.statement(other)),
            }
        }
        FunctionBody::Block {
            declarations,
            return_expressions,
        }
    }

    // --- Interfaces and enums ---

    fn interface(&self, interface: &ast::TSInterfaceDeclaration<'_>, start: usize) -> InterfaceDeclaration {
        let start = start.min(interface.span.start as usize);
        let mut heritage_clauses = Vec::new();
        if let (Some(first), Some(last)) = (interface.extends.first(), interface.extends.last()) {
            heritage_clauses.push(HeritageClause {
                token: HeritageToken::Extends,
                types: interface.extends.iter().map(|h| self.expression(&h.expression)).collect(),
                span: Span::new(first.span.start as usize, last.span.end as usize),
            });
        }
        InterfaceDeclaration {
            name: self.binding(&interface.id),
            span: Span::new(start, interface.span.end as usize),
            heritage_clauses,
            members: interface
                .body
                .body
                .iter()
                .filter_map(|signature| self.type_element(signature))
                .collect(),
            jsdoc: self.doc_before(start),
        }
    }

    fn type_element(&self, signature: &ast::TSSignature<'_>) -> Option<TypeElement> {
        let (kind, name, span, optional, readonly, parameters) = match signature {
            ast::TSSignature::TSPropertySignature(prop) => (
                TypeElementKind::PropertySignature,
                self.property_name(&prop.key, prop.computed),
                prop.span,
                prop.optional,
                prop.readonly,
                Vec::new(),
            ),
            ast::TSSignature::TSMethodSignature(method) => (
                TypeElementKind::MethodSignature,
                self.property_name(&method.key, method.computed),
                method.span,
                method.optional,
                false,
                self.parameters(&method.params),
            ),
            _ => return None,
        };
        let span = self.trimmed(self.span(span));
        Some(TypeElement {
            kind,
            name,
            span,
            modifiers: if readonly { ModifierFlags::READONLY } else { ModifierFlags::empty() },
            question_token: optional,
            parameters,
            jsdoc: self.doc_before(span.start),
        })
    }

    fn enumeration(&self, enumeration: &ast::TSEnumDeclaration<'_>, start: usize) -> EnumDeclaration {
        let start = start.min(enumeration.span.start as usize);
        EnumDeclaration {
            name: self.binding(&enumeration.id),
            span: Span::new(start, enumeration.span.end as usize),
            members: enumeration
                .body
                .members
                .iter()
                .map(|member| EnumMember {
                    name: PropertyName::Identifier(
                        self.text_of(member.id.span())
                            .trim_matches(|c| c == '\'' || c == '"')
                            .to_string(),
                    ),
                    span: self.span(member.span),
                    initializer: member.initializer.as_ref().map(|init| self.expression(init)),
                })
                .collect(),
        }
    }

    // --- Expressions ---

    fn expression(&self, expression: &ast::Expression<'_>) -> Expression {
        let span = self.span(expression.span());
        match expression {
            ast::Expression::Identifier(id) => Expression::Identifier(Identifier::new(id.name.as_str(), span)),
            ast::Expression::StringLiteral(lit) => Expression::StringLiteral(StringLiteral {
                value: lit.value.to_string(),
                span,
            }),
            ast::Expression::NumericLiteral(lit) => Expression::NumericLiteral(NumericLiteral {
                text: self.text_of(lit.span).to_string(),
                span,
            }),
            ast::Expression::BooleanLiteral(lit) => Expression::BooleanLiteral { value: lit.value, span },
            ast::Expression::StaticMemberExpression(member) => {
                Expression::PropertyAccess(PropertyAccessExpression {
                    expression: Box::new(self.expression(&member.object)),
                    name: Identifier::new(member.property.name.as_str(), self.span(member.property.span)),
                    span,
                })
            }
            ast::Expression::CallExpression(call) => Expression::Call(CallExpression {
                expression: Box::new(self.expression(&call.callee)),
                arguments: call
                    .arguments
                    .iter()
                    .filter_map(|argument| argument.as_expression())
                    .map(|argument| self.expression(argument))
                    .collect(),
                span,
            }),
            ast::Expression::ObjectExpression(object) => Expression::ObjectLiteral(ObjectLiteralExpression {
                properties: object
                    .properties
                    .iter()
                    .filter_map(|property| match property {
                        ast::ObjectPropertyKind::ObjectProperty(p) => Some(PropertyAssignment {
                            name: self.property_name(&p.key, p.computed),
                            initializer: self.expression(&p.value),
                            span: self.span(p.span),
                        }),
                        ast::ObjectPropertyKind::SpreadProperty(_) => None,
                    })
                    .collect(),
                span,
            }),
            ast::Expression::ClassExpression(class) => {
                Expression::Class(Arc::new(self.class(class, span.start, ModifierFlags::empty())))
            }
            ast::Expression::FunctionExpression(function) => {
                Expression::Function(Arc::new(self.function(function, span.start)))
            }
            ast::Expression::ArrowFunctionExpression(arrow) => Expression::Function(Arc::new(self.arrow(arrow))),
            ast::Expression::ParenthesizedExpression(inner) => self.expression(&inner.expression),
            _ => Expression::Other(span),
        }
    }

    /// Type references in `implements` lists, as identifier or property-access chains.
    fn type_name(&self, name: &ast::TSTypeName<'_>) -> Expression {
        match name {
            ast::TSTypeName::IdentifierReference(id) => {
                Expression::Identifier(Identifier::new(id.name.as_str(), self.span(id.span)))
            }
            ast::TSTypeName::QualifiedName(qualified) => Expression::PropertyAccess(PropertyAccessExpression {
                expression: Box::new(self.type_name(&qualified.left)),
                name: Identifier::new(qualified.right.name.as_str(), self.span(qualified.right.span)),
                span: self.span(qualified.span),
            }),
            other => Expression::Other(self.span(other.span())),
        }
    }
}

fn accessibility(accessibility: Option<&ast::TSAccessibility>) -> ModifierFlags {
    match accessibility {
        Some(ast::TSAccessibility::Public) => ModifierFlags::PUBLIC,
        Some(ast::TSAccessibility::Private) => ModifierFlags::PRIVATE,
        Some(ast::TSAccessibility::Protected) => ModifierFlags::PROTECTED,
        None => ModifierFlags::empty(),
    }
}

/// Span of a `/** */` block with its delimiters. Comment spans from the parser cover the
/// comment body only.
fn doc_block(text: &str, start: usize, end: usize) -> Option<Span> {
    let (start, end) = if text.get(start..)?.starts_with("/*") {
        (start, end)
    } else {
        (start.checked_sub(2)?, end + 2)
    };
    let raw = text.get(start..end)?;
    (raw.starts_with("/**") && raw.ends_with("*/") && raw.len() > 4).then(|| Span::new(start, end))
}
