use crate::node::{Declaration, Identifier, Span};
use bitflags::bitflags;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use crate::node::SourceFile;

/// Printed types longer than this are cut unless `NO_TRUNCATION` is requested.
pub const DEFAULT_TRUNCATION_LENGTH: usize = 160;

pub trait TypeChecker: Debug + Send + Sync {
    fn get_type_at_location(&self, file_name: &str, span: Span) -> Type;
    fn get_symbol_at_location(&self, file_name: &str, node: &Identifier) -> Option<Symbol>;
    fn get_signature_at_location(&self, file_name: &str, span: Span) -> Option<Signature>;
    fn get_symbol_of_type(&self, ty: &Type) -> Option<Symbol>;
    fn type_to_string(&self, ty: &Type, flags: TypeFormatFlags) -> String;

    fn signature_to_string(&self, signature: &Signature, flags: TypeFormatFlags) -> String {
        let params = signature
            .parameters
            .iter()
            .map(|p| {
                format!(
                    "{}{}{}: {}",
                    if p.rest { "..." } else { "" },
                    p.name,
                    if p.optional { "?" } else { "" },
                    self.type_to_string(&p.ty, flags)
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        let type_params = if signature.type_parameters.is_empty() {
            String::new()
        } else {
            format!("<{}>", signature.type_parameters.join(", "))
        };
        let ret = self.type_to_string(&signature.return_type, flags);
        if flags.contains(TypeFormatFlags::WRITE_ARROW_STYLE_SIGNATURE) {
            format!("{}({}) => {}", type_params, params, ret)
        } else {
            format!("{}({}): {}", type_params, params, ret)
        }
    }
}

// --- Types ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    pub flags: TypeFlags,
    /// Printable form as the checker would write it.
    pub text: String,
    /// Members of a union or intersection.
    pub types: Vec<Type>,
    /// Constraint of a type parameter.
    pub constraint: Option<Box<Type>>,
    /// Name of the declaring symbol for named types (classes, enums, aliases).
    pub symbol: Option<String>,
}

impl Type {
    pub fn new(flags: TypeFlags, text: impl Into<String>) -> Self {
        Self {
            flags,
            text: text.into(),
            types: Vec::new(),
            constraint: None,
            symbol: None,
        }
    }

    pub fn any() -> Self {
        Self::new(TypeFlags::ANY, "any")
    }

    pub fn unknown() -> Self {
        Self::new(TypeFlags::UNKNOWN, "unknown")
    }

    pub fn string() -> Self {
        Self::new(TypeFlags::STRING, "string")
    }

    pub fn number() -> Self {
        Self::new(TypeFlags::NUMBER, "number")
    }

    pub fn never() -> Self {
        Self::new(TypeFlags::NEVER, "never")
    }

    pub fn undefined() -> Self {
        Self::new(TypeFlags::UNDEFINED, "undefined")
    }

    pub fn null() -> Self {
        Self::new(TypeFlags::NULL, "null")
    }

    pub fn void() -> Self {
        Self::new(TypeFlags::VOID, "void")
    }

    /// `boolean` is the union `false | true`.
    pub fn boolean() -> Self {
        let mut ty = Self::new(TypeFlags::BOOLEAN | TypeFlags::UNION, "boolean");
        ty.types = vec![Self::boolean_literal(false), Self::boolean_literal(true)];
        ty
    }

    pub fn boolean_literal(value: bool) -> Self {
        Self::new(TypeFlags::BOOLEAN_LITERAL, value.to_string())
    }

    pub fn string_literal(value: &str) -> Self {
        Self::new(TypeFlags::STRING_LITERAL, format!("\"{}\"", value))
    }

    pub fn number_literal(value: impl ToString) -> Self {
        Self::new(TypeFlags::NUMBER_LITERAL, value.to_string())
    }

    /// Builds a union, printing members joined by ` | `.
    pub fn union(types: Vec<Type>) -> Self {
        let text = types
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" | ");
        let mut ty = Self::new(TypeFlags::UNION, text);
        ty.types = types;
        ty
    }

    pub fn object(text: impl Into<String>) -> Self {
        Self::new(TypeFlags::OBJECT, text)
    }

    /// Object type whose declaring symbol is a named declaration.
    pub fn named_object(name: &str) -> Self {
        let mut ty = Self::new(TypeFlags::OBJECT, name);
        ty.symbol = Some(name.to_string());
        ty
    }

    pub fn function(text: impl Into<String>) -> Self {
        Self::new(TypeFlags::OBJECT, text)
    }

    pub fn type_parameter(name: &str, constraint: Option<Type>) -> Self {
        let mut ty = Self::new(TypeFlags::TYPE_PARAMETER, name);
        ty.constraint = constraint.map(Box::new);
        ty
    }

    /// Union enum type; members are `enum_literal`s.
    pub fn enum_type(name: &str, members: Vec<Type>) -> Self {
        let mut ty = Self::new(TypeFlags::ENUM | TypeFlags::UNION, name);
        ty.types = members;
        ty.symbol = Some(name.to_string());
        ty
    }

    pub fn enum_literal(enum_name: &str, member: &str, numeric: bool) -> Self {
        let literal = if numeric {
            TypeFlags::NUMBER_LITERAL
        } else {
            TypeFlags::STRING_LITERAL
        };
        let mut ty = Self::new(
            TypeFlags::ENUM_LITERAL | literal,
            format!("{}.{}", enum_name, member),
        );
        ty.symbol = Some(enum_name.to_string());
        ty
    }

    pub fn is_union(&self) -> bool {
        self.flags.contains(TypeFlags::UNION)
    }

    pub fn is_type_parameter(&self) -> bool {
        self.flags.contains(TypeFlags::TYPE_PARAMETER)
    }

    pub fn is_literal(&self) -> bool {
        self.flags.intersects(
            TypeFlags::STRING_LITERAL | TypeFlags::NUMBER_LITERAL | TypeFlags::BIGINT_LITERAL,
        )
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TypeFlags: u32 {
        const ANY = 1;
        const UNKNOWN = 2;
        const STRING = 4;
        const NUMBER = 8;
        const BOOLEAN = 16;
        const ENUM = 32;
        const BIGINT = 64;
        const STRING_LITERAL = 128;
        const NUMBER_LITERAL = 256;
        const BOOLEAN_LITERAL = 512;
        const ENUM_LITERAL = 1024;
        const BIGINT_LITERAL = 2048;
        const ESSYMBOL = 4096;
        const UNIQUE_ESSYMBOL = 8192;
        const VOID = 16384;
        const UNDEFINED = 32768;
        const NULL = 65536;
        const NEVER = 131072;
        const TYPE_PARAMETER = 262144;
        const OBJECT = 524288;
        const UNION = 1048576;
        const INTERSECTION = 2097152;
        const INDEX = 4194304;
        const INDEXED_ACCESS = 8388608;
        const CONDITIONAL = 16777216;
        const SUBSTITUTION = 33554432;
        const NON_PRIMITIVE = 67108864;
        const TEMPLATE_LITERAL = 134217728;
        const STRING_MAPPING = 268435456;

        const STRING_LIKE = Self::STRING.bits()
            | Self::STRING_LITERAL.bits()
            | Self::TEMPLATE_LITERAL.bits()
            | Self::STRING_MAPPING.bits();
        const NUMBER_LIKE = Self::NUMBER.bits() | Self::NUMBER_LITERAL.bits() | Self::ENUM.bits();
        const BOOLEAN_LIKE = Self::BOOLEAN.bits() | Self::BOOLEAN_LITERAL.bits();
        const ENUM_LIKE = Self::ENUM.bits() | Self::ENUM_LITERAL.bits();
        const NULLABLE = Self::UNDEFINED.bits() | Self::NULL.bits() | Self::VOID.bits();
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SymbolFlags: u32 {
        const NONE = 0;
        const FUNCTION_SCOPED_VARIABLE = 1;
        const BLOCK_SCOPED_VARIABLE = 2;
        const PROPERTY = 4;
        const ENUM_MEMBER = 8;
        const FUNCTION = 16;
        const CLASS = 32;
        const INTERFACE = 64;
        const CONST_ENUM = 128;
        const REGULAR_ENUM = 256;
        const VALUE_MODULE = 512;
        const NAMESPACE_MODULE = 1024;
        const TYPE_LITERAL = 2048;
        const OBJECT_LITERAL = 4096;
        const METHOD = 8192;
        const CONSTRUCTOR = 16384;
        const GET_ACCESSOR = 32768;
        const SET_ACCESSOR = 65536;
        const SIGNATURE = 131072;
        const TYPE_PARAMETER = 262144;
        const TYPE_ALIAS = 524288;
        const EXPORT_VALUE = 1048576;
        const ALIAS = 2097152;

        const VARIABLE = Self::FUNCTION_SCOPED_VARIABLE.bits() | Self::BLOCK_SCOPED_VARIABLE.bits();
        const ENUM = Self::CONST_ENUM.bits() | Self::REGULAR_ENUM.bits();
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeFormatFlags: u32 {
        const NONE = 0;
        const NO_TRUNCATION = 1;
        const WRITE_ARROW_STYLE_SIGNATURE = 1 << 5;
        const USE_FULLY_QUALIFIED_TYPE = 1 << 6;
    }
}

// --- Symbols ---

/// A declaration together with the file it lives in.
#[derive(Debug, Clone)]
pub struct DeclarationRef {
    pub file_name: String,
    pub declaration: Declaration,
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub flags: SymbolFlags,
    pub declarations: Vec<DeclarationRef>,
}

impl Symbol {
    pub fn value_declaration(&self) -> Option<&DeclarationRef> {
        self.declarations.first()
    }
}

fn symbol_flags_of(declaration: &Declaration) -> SymbolFlags {
    match declaration {
        Declaration::Class(_) => SymbolFlags::CLASS,
        Declaration::Interface(_) => SymbolFlags::INTERFACE,
        Declaration::Function(_) => SymbolFlags::FUNCTION,
        Declaration::Variable(_) => SymbolFlags::BLOCK_SCOPED_VARIABLE,
        Declaration::Enum(_) => SymbolFlags::REGULAR_ENUM,
        Declaration::TypeAlias(_) => SymbolFlags::TYPE_ALIAS,
    }
}

// --- Signatures ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureParameter {
    pub name: String,
    pub ty: Type,
    pub optional: bool,
    pub rest: bool,
}

impl SignatureParameter {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            rest: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub type_parameters: Vec<String>,
    pub parameters: Vec<SignatureParameter>,
    pub return_type: Type,
}

impl Signature {
    pub fn new(parameters: Vec<SignatureParameter>, return_type: Type) -> Self {
        Self {
            type_parameters: Vec::new(),
            parameters,
            return_type,
        }
    }
}

// --- In-memory checker ---

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub file_name: String,
    pub span: Span,
}

impl Location {
    pub fn new(file_name: impl Into<String>, span: Span) -> Self {
        Self {
            file_name: file_name.into(),
            span,
        }
    }
}

/// Semantic model handed over by a front end as precomputed tables.
///
/// Types and signatures are keyed by node location. Symbols are resolved by name over the
/// top-level declarations of the indexed files, preferring the file of the reference.
/// Nodes without a recorded type are `any`.
#[derive(Debug, Default)]
pub struct InMemoryTypeChecker {
    types: HashMap<Location, Type>,
    signatures: HashMap<Location, Signature>,
    declarations: HashMap<String, Vec<DeclarationRef>>,
}

impl InMemoryTypeChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_type(&mut self, location: Location, ty: Type) {
        self.types.insert(location, ty);
    }

    pub fn set_signature(&mut self, location: Location, signature: Signature) {
        self.signatures.insert(location, signature);
    }

    /// Registers the top-level declarations of a file for name lookup.
    pub fn index_file(&mut self, file: &Arc<SourceFile>) {
        for declaration in file.declarations() {
            if let Some(name) = declaration.name() {
                self.declarations
                    .entry(name.to_string())
                    .or_default()
                    .push(DeclarationRef {
                        file_name: file.file_name().to_string(),
                        declaration: declaration.clone(),
                    });
            }
        }
    }

    fn lookup(&self, name: &str, from_file: Option<&str>) -> Option<Symbol> {
        let candidates = self.declarations.get(name)?;
        let mut declarations = candidates.clone();
        if let Some(file) = from_file {
            // Stable: same-file declarations first, otherwise index order.
            declarations.sort_by_key(|d| d.file_name != file);
        }
        let flags = declarations
            .iter()
            .fold(SymbolFlags::NONE, |acc, d| acc | symbol_flags_of(&d.declaration));
        Some(Symbol {
            name: name.to_string(),
            flags,
            declarations,
        })
    }
}

impl TypeChecker for InMemoryTypeChecker {
    fn get_type_at_location(&self, file_name: &str, span: Span) -> Type {
        self.types
            .get(&Location::new(file_name, span))
            .cloned()
            .unwrap_or_else(Type::any)
    }

    fn get_symbol_at_location(&self, file_name: &str, node: &Identifier) -> Option<Symbol> {
        self.lookup(&node.name, Some(file_name))
    }

    fn get_signature_at_location(&self, file_name: &str, span: Span) -> Option<Signature> {
        self.signatures.get(&Location::new(file_name, span)).cloned()
    }

    fn get_symbol_of_type(&self, ty: &Type) -> Option<Symbol> {
        ty.symbol.as_deref().and_then(|name| self.lookup(name, None))
    }

    fn type_to_string(&self, ty: &Type, flags: TypeFormatFlags) -> String {
        if flags.contains(TypeFormatFlags::NO_TRUNCATION)
            || ty.text.chars().count() <= DEFAULT_TRUNCATION_LENGTH
        {
            return ty.text.clone();
        }
        let cut: String = ty.text.chars().take(DEFAULT_TRUNCATION_LENGTH).collect();
        format!("{}...", cut)
    }
}
