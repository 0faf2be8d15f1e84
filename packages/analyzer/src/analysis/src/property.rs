// Property Builder
//
// Builds the metadata record of one class field or accessor.

use super::context::AnalysisContext;
use super::jsdoc::{documentation, read_doc_tags};
use super::reserved::is_reserved_member;
use super::type_resolver::resolve;
use crate::diagnostics::ErrorCode;
use crate::meta::{find_tag, has_tag, DocTagMeta, NodeRef, PrimitiveType, PropMeta};
use std::sync::Arc;
use ts::{
    ClassDeclaration, ClassMember, ClassMemberKind, Declaration, Decorator, EnumDeclaration,
    Expression, ObjectLiteralExpression, SourceFile, SymbolFlags, Type,
};

pub struct PropertyBuilder<'a> {
    ctx: AnalysisContext<'a>,
    file: &'a SourceFile,
    class: &'a ClassDeclaration,
}

impl<'a> PropertyBuilder<'a> {
    pub fn new(ctx: AnalysisContext<'a>, file: &'a SourceFile, class: &'a ClassDeclaration) -> Self {
        Self { ctx, file, class }
    }

    /// Whether `member` describes a property at all. A set accessor only counts when the
    /// class has no matching getter.
    pub fn is_property_member(&self, member: &ClassMember) -> bool {
        match member.kind {
            ClassMemberKind::Property | ClassMemberKind::GetAccessor => true,
            ClassMemberKind::SetAccessor => !self.class.members.iter().any(|m| {
                m.kind == ClassMemberKind::GetAccessor && m.name.text() == member.name.text()
            }),
            _ => false,
        }
    }

    /// Metadata for `member`, or `None` when it is not a public property.
    pub fn build(&self, member: &ClassMember) -> Option<PropMeta> {
        if !self.is_property_member(member) {
            return None;
        }
        let decorator = self.property_decorator(member);
        if !member.is_public() {
            if let Some(decorator) = decorator {
                self.ctx.diagnostics.warn(
                    ErrorCode::NonPublicProperty,
                    self.file,
                    decorator.span,
                    format!(
                        "`{}` is not public and cannot be a reflected property; use a `@state` \
                         decorator or an `@internal` doc tag for internal state instead.",
                        member.name.text()
                    ),
                );
            }
            return None;
        }
        let name = member.name.text();
        if name.is_empty() || is_reserved_member(name) {
            return None;
        }

        let file_name = self.file.file_name();
        let checker = self.ctx.checker();
        let ty = checker.get_type_at_location(file_name, member.span);
        let resolved = resolve(checker, &ty);

        let jsdoc = member.jsdoc.as_ref().or_else(|| self.setter_jsdoc(member));
        let doc_tags = read_doc_tags(jsdoc, file_name);
        let has_setter = self.class.has_setter(name);

        let mut prop = PropMeta::new(name);
        prop.is_static = member.is_static();
        prop.readonly = (member.kind == ClassMemberKind::GetAccessor && !has_setter)
            || (has_tag(&doc_tags, "readonly") && !has_setter)
            || member.modifiers.contains(ts::ModifierFlags::READONLY);
        prop.required = member.exclamation_token || has_tag(&doc_tags, "required");
        prop.optional = member.question_token || has_tag(&doc_tags, "optional");
        prop.internal = has_tag(&doc_tags, "internal")
            || member
                .decorators
                .iter()
                .filter_map(Decorator::name)
                .any(|n| self.ctx.config.is_internal_decorator(n));
        prop.deprecated = has_tag(&doc_tags, "deprecated");

        if let Some(decorator) = decorator {
            let typed = resolved.primitive != PrimitiveType::Unknown
                || (member.is_accessor() && has_setter);
            if typed {
                if let Some(args) = decorator.arguments() {
                    let options = args.first().and_then(|arg| match arg {
                        Expression::ObjectLiteral(obj) => Some(obj),
                        _ => None,
                    });
                    prop.attribute = attribute_name(name, options, prop.readonly, &doc_tags);
                    prop.reflect = options
                        .and_then(|o| o.get("reflect"))
                        .map_or(false, |e| matches!(e, Expression::BooleanLiteral { value: true, .. }));
                }
            }
        }

        prop.default_value = self.default_value(member, &doc_tags, prop.optional);
        if let Some((enum_decl, enum_file)) = self.enum_declaration(&ty) {
            prop.is_enum = true;
            prop.enum_default_value = member
                .initializer
                .as_ref()
                .and_then(|init| enum_member_value(&enum_decl, &enum_file, init));
        }

        prop.type_text = resolved.text;
        prop.primitive = resolved.primitive;
        prop.documentation = documentation(jsdoc);
        prop.doc_tags = doc_tags;
        prop.node = NodeRef::new(file_name, member.span);
        Some(prop)
    }

    fn property_decorator<'m>(&self, member: &'m ClassMember) -> Option<&'m Decorator> {
        member.decorators.iter().find(|d| {
            d.name()
                .map_or(false, |n| self.ctx.config.is_property_decorator(n))
        })
    }

    fn setter_jsdoc(&self, member: &ClassMember) -> Option<&'a ts::JsDoc> {
        if member.kind != ClassMemberKind::GetAccessor {
            return None;
        }
        self.class
            .members
            .iter()
            .find(|m| m.kind == ClassMemberKind::SetAccessor && m.name.text() == member.name.text())
            .and_then(|m| m.jsdoc.as_ref())
    }

    fn default_value(
        &self,
        member: &ClassMember,
        doc_tags: &[DocTagMeta],
        optional: bool,
    ) -> String {
        if member.kind == ClassMemberKind::Property {
            if let Some(init) = &member.initializer {
                return self.file.text_of(init.span()).trim().to_string();
            }
        }
        ["defaultValue", "default"]
            .iter()
            .find_map(|tag| find_tag(doc_tags, tag).and_then(|t| t.text.clone()))
            .unwrap_or_else(|| {
                if optional {
                    "undefined".to_string()
                } else {
                    String::new()
                }
            })
    }

    /// The enum `ty` aliases, with the file declaring it.
    fn enum_declaration(&self, ty: &Type) -> Option<(Arc<EnumDeclaration>, Arc<SourceFile>)> {
        let checker = self.ctx.checker();
        let symbol = checker.get_symbol_of_type(ty).or_else(|| {
            // `Color | undefined`
            ty.types
                .iter()
                .filter(|t| t.flags.intersects(ts::TypeFlags::ENUM_LIKE))
                .find_map(|t| checker.get_symbol_of_type(t))
        })?;
        if !symbol.flags.intersects(SymbolFlags::ENUM) {
            return None;
        }
        symbol.declarations.iter().find_map(|d| match &d.declaration {
            Declaration::Enum(e) => self
                .ctx
                .program
                .get_source_file(&d.file_name)
                .map(|f| (e.clone(), f.clone())),
            _ => None,
        })
    }
}

/// Explicit `attribute:` option first, then the kebab-cased name. Read-only members only get
/// an attribute from an `@attribute` doc tag.
fn attribute_name(
    name: &str,
    options: Option<&ObjectLiteralExpression>,
    readonly: bool,
    doc_tags: &[DocTagMeta],
) -> Option<String> {
    match options.and_then(|o| o.get("attribute")) {
        Some(Expression::StringLiteral(lit)) => return Some(lit.value.clone()),
        Some(Expression::BooleanLiteral { value: false, .. }) => return None,
        _ => {}
    }
    if readonly {
        return find_tag(doc_tags, "attribute").and_then(|t| t.text.clone());
    }
    Some(kebab_case(name))
}

/// Literal value of the enum member an initializer such as `Color.Red` names.
fn enum_member_value(decl: &EnumDeclaration, file: &SourceFile, init: &Expression) -> Option<String> {
    let access = match init {
        Expression::PropertyAccess(access) => access,
        _ => return None,
    };
    match access.expression.as_ref() {
        Expression::Identifier(id) if id.name == decl.name.name => {}
        _ => return None,
    }

    let mut next_numeric: Option<i64> = Some(0);
    for member in &decl.members {
        let value = match &member.initializer {
            Some(Expression::NumericLiteral(lit)) => {
                next_numeric = lit.text.parse::<i64>().ok().map(|n| n + 1);
                lit.text.clone()
            }
            Some(other) => {
                next_numeric = None;
                file.text_of(other.span()).to_string()
            }
            None => {
                let n = next_numeric.unwrap_or(0);
                next_numeric = Some(n + 1);
                n.to_string()
            }
        };
        if member.name.text() == access.name.name {
            return Some(value);
        }
    }
    None
}

/// `myProp` -> `my-prop`, `URLValue` -> `url-value`.
pub fn kebab_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            out.push('-');
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).map_or(false, |n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                out.push('-');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}
