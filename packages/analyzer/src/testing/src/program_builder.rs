// Test Program Builder
//
// Assembles in-memory programs from fixture source text plus the type annotations a
// checker would have produced for it.

use super::front_end::parse_source;
use ts::{
    ClassMember, Declaration, Expression, FunctionBody, InMemoryProgram, InMemoryTypeChecker,
    Location, Signature, SourceFile, Span, Type, TypeElement,
};

/// Span of the first occurrence of `needle` in `text`.
///
/// Panics when `needle` is absent; fixtures are expected to contain what tests look up.
pub fn span_of(text: &str, needle: &str) -> Span {
    nth_span_of(text, needle, 0)
}

/// Span of the `n`th (0-based) occurrence of `needle` in `text`.
pub fn nth_span_of(text: &str, needle: &str, n: usize) -> Span {
    let start = text
        .match_indices(needle)
        .nth(n)
        .map(|(i, _)| i)
        .unwrap_or_else(|| panic!("`{}` not found in fixture", needle));
    Span::new(start, start + needle.len())
}

/// One fixture file: its text, parsed declarations and checker annotations.
pub struct TestFile {
    name: String,
    text: String,
    declarations: Vec<Declaration>,
    types: Vec<(Span, Type)>,
    signatures: Vec<(Span, Signature)>,
}

impl TestFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let declarations = parse_source(&text);
        Self {
            name: name.into(),
            text,
            declarations,
            types: Vec::new(),
            signatures: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Type of the first class or interface member named `member`.
    pub fn typed(mut self, member: &str, ty: Type) -> Self {
        let span = self.member_span(member);
        self.types.push((span, ty));
        self
    }

    /// Signature of the first method named `method`.
    pub fn signature(mut self, method: &str, signature: Signature) -> Self {
        let span = self.member_span(method);
        self.signatures.push((span, signature));
        self
    }

    /// Type of the expression at the first occurrence of `needle`.
    pub fn typed_at(mut self, needle: &str, ty: Type) -> Self {
        let span = span_of(&self.text, needle);
        self.types.push((span, ty));
        self
    }

    fn member_span(&self, name: &str) -> Span {
        let mut found = None;
        for declaration in &self.declarations {
            visit_members(declaration, &mut |member_name, span| {
                if found.is_none() && member_name == name {
                    found = Some(span);
                }
            });
        }
        found.unwrap_or_else(|| panic!("member `{}` not found in {}", name, self.name))
    }

    fn into_parts(self, checker: &mut InMemoryTypeChecker) -> SourceFile {
        for (span, ty) in self.types {
            checker.set_type(Location::new(self.name.clone(), span), ty);
        }
        for (span, signature) in self.signatures {
            checker.set_signature(Location::new(self.name.clone(), span), signature);
        }
        SourceFile::new(self.name, self.text, self.declarations)
    }
}

fn visit_members(declaration: &Declaration, f: &mut dyn FnMut(&str, Span)) {
    match declaration {
        Declaration::Class(class) => visit_class_members(&class.members, f),
        Declaration::Interface(interface) => visit_type_elements(&interface.members, f),
        Declaration::Function(function) => visit_body(&function.body, f),
        Declaration::Variable(variable) => {
            if let Some(init) = &variable.initializer {
                visit_expression(init, f);
            }
        }
        Declaration::Enum(_) | Declaration::TypeAlias(_) => {}
    }
}

fn visit_class_members(members: &[ClassMember], f: &mut dyn FnMut(&str, Span)) {
    for member in members {
        f(member.name.text(), member.span);
    }
}

fn visit_type_elements(members: &[TypeElement], f: &mut dyn FnMut(&str, Span)) {
    for member in members {
        f(member.name.text(), member.span);
    }
}

fn visit_body(body: &FunctionBody, f: &mut dyn FnMut(&str, Span)) {
    match body {
        FunctionBody::Block {
            declarations,
            return_expressions,
        } => {
            for declaration in declarations {
                visit_members(declaration, f);
            }
            for expression in return_expressions {
                visit_expression(expression, f);
            }
        }
        FunctionBody::Expression(expression) => visit_expression(expression, f),
    }
}

fn visit_expression(expression: &Expression, f: &mut dyn FnMut(&str, Span)) {
    match expression {
        Expression::Class(class) => visit_class_members(&class.members, f),
        Expression::Function(function) => visit_body(&function.body, f),
        _ => {}
    }
}

/// Builds an [`InMemoryProgram`] out of fixture files.
#[derive(Default)]
pub struct TestProgram {
    files: Vec<TestFile>,
}

impl TestProgram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, file: TestFile) -> Self {
        self.files.push(file);
        self
    }

    pub fn build(self) -> InMemoryProgram {
        let mut checker = InMemoryTypeChecker::new();
        let files = self
            .files
            .into_iter()
            .map(|f| f.into_parts(&mut checker))
            .collect();
        InMemoryProgram::new(files, checker)
    }
}
