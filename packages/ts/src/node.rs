//! Declaration-level syntax tree produced by the front end.
//!
//! Only the shapes the analyzer reads are modelled: classes, interfaces, functions,
//! variables, enums and type aliases, with their members, decorators, heritage clauses and
//! attached JSDoc blocks. Every node carries a [`Span`] into its file's raw text.

use crate::LineRange;
use bitflags::bitflags;
use serde::Serialize;
use std::sync::Arc;

/// Byte range of a node in the raw text of its source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierFlags: u32 {
        const EXPORT = 1 << 0;
        const AMBIENT = 1 << 1;
        const DEFAULT = 1 << 2;
        const CONST = 1 << 3;
        const PUBLIC = 1 << 4;
        const PRIVATE = 1 << 5;
        const PROTECTED = 1 << 6;
        const STATIC = 1 << 7;
        const READONLY = 1 << 8;
        const ABSTRACT = 1 << 9;
        const ASYNC = 1 << 10;
        const OVERRIDE = 1 << 11;
        const ACCESSOR = 1 << 12;

        const NON_PUBLIC_ACCESSIBILITY = Self::PRIVATE.bits() | Self::PROTECTED.bits();
    }
}

// --- Source files ---

#[derive(Debug)]
pub struct SourceFile {
    file_name: String,
    text: String,
    declarations: Vec<Declaration>,
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(
        file_name: impl Into<String>,
        text: impl Into<String>,
        declarations: Vec<Declaration>,
    ) -> Self {
        let text = text.into();
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            file_name: file_name.into(),
            text,
            declarations,
            line_starts,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Top-level declarations in source order.
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Raw source text covered by `span`, or an empty string for an out-of-range span.
    pub fn text_of(&self, span: Span) -> &str {
        self.text.get(span.start..span.end).unwrap_or("")
    }

    /// 1-based line of a byte offset.
    pub fn line_of(&self, pos: usize) -> usize {
        match self.line_starts.binary_search(&pos) {
            Ok(i) => i + 1,
            Err(i) => i,
        }
    }

    pub fn line_range(&self, span: Span) -> LineRange {
        LineRange {
            start_line: self.line_of(span.start),
            end_line: self.line_of(span.end.max(span.start)),
        }
    }

    pub fn find_declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name() == Some(name))
    }

    pub fn classes(&self) -> impl Iterator<Item = &Arc<ClassDeclaration>> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Class(class) => Some(class),
            _ => None,
        })
    }
}

// --- Declarations ---

#[derive(Debug, Clone)]
pub enum Declaration {
    Class(Arc<ClassDeclaration>),
    Interface(Arc<InterfaceDeclaration>),
    Function(Arc<FunctionDeclaration>),
    Variable(Arc<VariableDeclaration>),
    Enum(Arc<EnumDeclaration>),
    TypeAlias(Arc<TypeAliasDeclaration>),
}

impl Declaration {
    pub fn name(&self) -> Option<&str> {
        match self {
            Declaration::Class(d) => d.name.as_ref().map(|n| n.name.as_str()),
            Declaration::Interface(d) => Some(d.name.name.as_str()),
            Declaration::Function(d) => d.name.as_ref().map(|n| n.name.as_str()),
            Declaration::Variable(d) => Some(d.name.name.as_str()),
            Declaration::Enum(d) => Some(d.name.name.as_str()),
            Declaration::TypeAlias(d) => Some(d.name.name.as_str()),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Declaration::Class(d) => d.span,
            Declaration::Interface(d) => d.span,
            Declaration::Function(d) => d.span,
            Declaration::Variable(d) => d.span,
            Declaration::Enum(d) => d.span,
            Declaration::TypeAlias(d) => d.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClassDeclaration {
    pub name: Option<Identifier>,
    pub span: Span,
    pub modifiers: ModifierFlags,
    pub decorators: Vec<Decorator>,
    pub heritage_clauses: Vec<HeritageClause>,
    pub members: Vec<ClassMember>,
    pub jsdoc: Option<JsDoc>,
}

impl ClassDeclaration {
    pub fn name_text(&self) -> Option<&str> {
        self.name.as_ref().map(|n| n.name.as_str())
    }

    pub fn extends_clause(&self) -> Option<&HeritageClause> {
        self.heritage_clauses
            .iter()
            .find(|c| c.token == HeritageToken::Extends)
    }

    /// True when a set accessor with the given name exists on the class.
    pub fn has_setter(&self, name: &str) -> bool {
        self.members
            .iter()
            .any(|m| m.kind == ClassMemberKind::SetAccessor && m.name.text() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeritageToken {
    Extends,
    Implements,
}

#[derive(Debug, Clone)]
pub struct HeritageClause {
    pub token: HeritageToken,
    pub types: Vec<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClassMemberKind {
    #[default]
    Property,
    Method,
    GetAccessor,
    SetAccessor,
    Constructor,
    IndexSignature,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyName {
    Identifier(String),
    StringLiteral(String),
    NumericLiteral(String),
    PrivateIdentifier(String),
    Computed(String),
}

impl PropertyName {
    pub fn text(&self) -> &str {
        match self {
            PropertyName::Identifier(s)
            | PropertyName::StringLiteral(s)
            | PropertyName::NumericLiteral(s)
            | PropertyName::PrivateIdentifier(s)
            | PropertyName::Computed(s) => s,
        }
    }

    pub fn is_private_identifier(&self) -> bool {
        matches!(self, PropertyName::PrivateIdentifier(_))
    }
}

impl Default for PropertyName {
    fn default() -> Self {
        PropertyName::Identifier(String::new())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClassMember {
    pub kind: ClassMemberKind,
    pub name: PropertyName,
    pub span: Span,
    pub modifiers: ModifierFlags,
    /// `name?: T`
    pub question_token: bool,
    /// `name!: T`
    pub exclamation_token: bool,
    pub initializer: Option<Expression>,
    pub parameters: Vec<Parameter>,
    pub decorators: Vec<Decorator>,
    pub jsdoc: Option<JsDoc>,
}

impl ClassMember {
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(ModifierFlags::STATIC)
    }

    /// Public unless marked `private`/`protected` or declared with a `#name`.
    pub fn is_public(&self) -> bool {
        !self.modifiers.intersects(ModifierFlags::NON_PUBLIC_ACCESSIBILITY)
            && !self.name.is_private_identifier()
    }

    pub fn is_accessor(&self) -> bool {
        matches!(
            self.kind,
            ClassMemberKind::GetAccessor | ClassMemberKind::SetAccessor
        ) || self.modifiers.contains(ModifierFlags::ACCESSOR)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Parameter {
    pub name: String,
    pub span: Span,
    pub question_token: bool,
    pub dot_dot_dot_token: bool,
    pub initializer: Option<Expression>,
}

#[derive(Debug, Clone)]
pub struct Decorator {
    pub expression: Expression,
    pub span: Span,
}

impl Decorator {
    /// Name the decorator was invoked by: `@foo`, `@foo(...)` and `@ns.foo(...)` all yield `foo`.
    pub fn name(&self) -> Option<&str> {
        let target = match &self.expression {
            Expression::Call(call) => call.expression.as_ref(),
            other => other,
        };
        match target {
            Expression::Identifier(id) => Some(id.name.as_str()),
            Expression::PropertyAccess(access) => Some(access.name.name.as_str()),
            _ => None,
        }
    }

    /// Arguments of a called decorator, `None` for the bare `@foo` form.
    pub fn arguments(&self) -> Option<&[Expression]> {
        match &self.expression {
            Expression::Call(call) => Some(&call.arguments),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FunctionDeclaration {
    pub name: Option<Identifier>,
    pub span: Span,
    pub parameters: Vec<Parameter>,
    pub body: FunctionBody,
    pub jsdoc: Option<JsDoc>,
}

#[derive(Debug, Clone)]
pub enum FunctionBody {
    /// `{ ... }` body: local declarations and the expressions of its `return` statements.
    Block {
        declarations: Vec<Declaration>,
        return_expressions: Vec<Expression>,
    },
    /// Concise arrow body.
    Expression(Box<Expression>),
}

impl Default for FunctionBody {
    fn default() -> Self {
        FunctionBody::Block {
            declarations: Vec::new(),
            return_expressions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct VariableDeclaration {
    pub name: Identifier,
    pub span: Span,
    pub modifiers: ModifierFlags,
    pub initializer: Option<Expression>,
    pub jsdoc: Option<JsDoc>,
}

#[derive(Debug, Clone, Default)]
pub struct InterfaceDeclaration {
    pub name: Identifier,
    pub span: Span,
    pub heritage_clauses: Vec<HeritageClause>,
    pub members: Vec<TypeElement>,
    pub jsdoc: Option<JsDoc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeElementKind {
    #[default]
    PropertySignature,
    MethodSignature,
}

#[derive(Debug, Clone, Default)]
pub struct TypeElement {
    pub kind: TypeElementKind,
    pub name: PropertyName,
    pub span: Span,
    pub modifiers: ModifierFlags,
    pub question_token: bool,
    pub parameters: Vec<Parameter>,
    pub jsdoc: Option<JsDoc>,
}

#[derive(Debug, Clone, Default)]
pub struct EnumDeclaration {
    pub name: Identifier,
    pub span: Span,
    pub members: Vec<EnumMember>,
}

#[derive(Debug, Clone, Default)]
pub struct EnumMember {
    pub name: PropertyName,
    pub span: Span,
    pub initializer: Option<Expression>,
}

#[derive(Debug, Clone, Default)]
pub struct TypeAliasDeclaration {
    pub name: Identifier,
    pub span: Span,
    pub jsdoc: Option<JsDoc>,
}

// --- Expressions ---

#[derive(Debug, Clone)]
pub enum Expression {
    Identifier(Identifier),
    StringLiteral(StringLiteral),
    NumericLiteral(NumericLiteral),
    BooleanLiteral { value: bool, span: Span },
    PropertyAccess(PropertyAccessExpression),
    Call(CallExpression),
    ObjectLiteral(ObjectLiteralExpression),
    Class(Arc<ClassDeclaration>),
    Function(Arc<FunctionDeclaration>),
    /// Any other expression; its text is recovered from the span.
    Other(Span),
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Identifier(e) => e.span,
            Expression::StringLiteral(e) => e.span,
            Expression::NumericLiteral(e) => e.span,
            Expression::BooleanLiteral { span, .. } => *span,
            Expression::PropertyAccess(e) => e.span,
            Expression::Call(e) => e.span,
            Expression::ObjectLiteral(e) => e.span,
            Expression::Class(e) => e.span,
            Expression::Function(e) => e.span,
            Expression::Other(span) => *span,
        }
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Expression::Identifier(id) => Some(id),
            _ => None,
        }
    }

    /// Value of a string literal (without quotes).
    pub fn as_string_literal(&self) -> Option<&str> {
        match self {
            Expression::StringLiteral(lit) => Some(lit.value.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StringLiteral {
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, Default)]
pub struct NumericLiteral {
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct PropertyAccessExpression {
    pub expression: Box<Expression>,
    pub name: Identifier,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct CallExpression {
    pub expression: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Default)]
pub struct ObjectLiteralExpression {
    pub properties: Vec<PropertyAssignment>,
    pub span: Span,
}

impl ObjectLiteralExpression {
    pub fn get(&self, name: &str) -> Option<&Expression> {
        self.properties
            .iter()
            .find(|p| p.name.text() == name)
            .map(|p| &p.initializer)
    }
}

#[derive(Debug, Clone)]
pub struct PropertyAssignment {
    pub name: PropertyName,
    pub initializer: Expression,
    pub span: Span,
}

// --- JSDoc ---

#[derive(Debug, Clone, Default)]
pub struct JsDoc {
    /// Free text before the first tag.
    pub comment: Option<String>,
    pub tags: Vec<JsDocTag>,
    pub span: Span,
}

#[derive(Debug, Clone, Default)]
pub struct JsDocTag {
    pub tag_name: String,
    pub comment: Option<JsDocComment>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsDocComment {
    Text(String),
    /// Comment text interleaved with `{@link ...}` nodes.
    Parts(Vec<JsDocCommentPart>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsDocCommentPart {
    Text(String),
    /// `{@link name text}`. A URL such as `https://x.dev` arrives split as
    /// `name: "https"`, `text: "://x.dev"`.
    Link { name: Option<String>, text: String },
}
