// Type Resolver
//
// Normalizes checker types into printable text and a coarse primitive class.

use crate::meta::PrimitiveType;
use indexmap::IndexSet;
use ts::{Type, TypeChecker, TypeFlags, TypeFormatFlags};

/// Unions with more parts than this print as the checker writes them.
pub const MAX_UNION_PARTS: usize = 20;

/// Printable text and primitive class of one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub text: String,
    pub primitive: PrimitiveType,
}

pub fn resolve(checker: &dyn TypeChecker, ty: &Type) -> ResolvedType {
    ResolvedType {
        text: resolve_type(checker, ty),
        primitive: primitive_of(ty),
    }
}

/// Printable text of a type. Unions are flattened, `true`/`false` collapse to `boolean`,
/// parts are sorted and function parts are parenthesized.
pub fn resolve_type(checker: &dyn TypeChecker, ty: &Type) -> String {
    if !is_flattenable(ty) {
        return checker.type_to_string(ty, TypeFormatFlags::NONE);
    }

    let mut parts = IndexSet::new();
    collect_union_parts(checker, ty, &mut parts);

    let had_boolean = parts.shift_remove("true") | parts.shift_remove("false");
    if had_boolean {
        parts.insert("boolean".to_string());
    }

    let mut parts: Vec<String> = parts.into_iter().collect();
    if parts.len() > MAX_UNION_PARTS {
        return checker.type_to_string(ty, TypeFormatFlags::NO_TRUNCATION);
    }
    parts.sort();

    if parts.len() > 1 {
        for part in parts.iter_mut() {
            if part.contains("=>") {
                *part = format!("({})", part);
            }
        }
    }
    parts.join(" | ")
}

fn collect_union_parts(checker: &dyn TypeChecker, ty: &Type, parts: &mut IndexSet<String>) {
    for member in &ty.types {
        if is_flattenable(member) {
            collect_union_parts(checker, member, parts);
        } else {
            parts.insert(checker.type_to_string(member, TypeFormatFlags::NONE));
        }
    }
}

/// Union enums print by name.
fn is_flattenable(ty: &Type) -> bool {
    ty.is_union() && !ty.types.is_empty() && !ty.flags.contains(TypeFlags::ENUM)
}

#[derive(Debug, Default)]
struct Categories {
    string: bool,
    number: bool,
    boolean: bool,
}

impl Categories {
    fn count(&self) -> usize {
        [self.string, self.number, self.boolean]
            .iter()
            .filter(|b| **b)
            .count()
    }
}

/// Coarse primitive class. More than one matching category is `any`; none is `unknown`.
pub fn primitive_of(ty: &Type) -> PrimitiveType {
    if ty.flags == TypeFlags::NEVER {
        return PrimitiveType::Never;
    }
    let mut categories = Categories::default();
    if classify(ty, &mut categories) {
        return PrimitiveType::Any;
    }
    match categories.count() {
        0 => PrimitiveType::Unknown,
        1 if categories.string => PrimitiveType::String,
        1 if categories.number => PrimitiveType::Number,
        1 => PrimitiveType::Boolean,
        _ => PrimitiveType::Any,
    }
}

/// Records the categories `ty` matches; returns true when an `any` was found.
fn classify(ty: &Type, categories: &mut Categories) -> bool {
    if ty.flags.contains(TypeFlags::ANY) {
        return true;
    }
    if ty.is_union() && !ty.types.is_empty() {
        return ty.types.iter().any(|member| classify(member, categories));
    }
    if ty.is_type_parameter() {
        return match &ty.constraint {
            Some(constraint) => classify(constraint, categories),
            None => false,
        };
    }
    if ty.flags.intersects(TypeFlags::NULLABLE) {
        return false;
    }
    if ty.flags.intersects(TypeFlags::STRING_LIKE) {
        categories.string = true;
    } else if ty.flags.intersects(TypeFlags::NUMBER_LIKE) {
        categories.number = true;
    } else if ty.flags.intersects(TypeFlags::BOOLEAN_LIKE) {
        categories.boolean = true;
    }
    false
}
