// Method Builder
//
// Builds the metadata record of one public class method.

use super::context::AnalysisContext;
use super::jsdoc::{documentation, read_doc_tags};
use super::reserved::is_reserved_method;
use super::type_resolver::resolve;
use crate::meta::{has_tag, MethodMeta, NodeRef, ParamMeta};
use ts::{
    ClassMember, ClassMemberKind, Parameter, Signature, SignatureParameter, SourceFile, Type,
    TypeFormatFlags,
};

const SIGNATURE_FLAGS: TypeFormatFlags =
    TypeFormatFlags::NO_TRUNCATION.union(TypeFormatFlags::WRITE_ARROW_STYLE_SIGNATURE);

pub struct MethodBuilder<'a> {
    ctx: AnalysisContext<'a>,
    file: &'a SourceFile,
}

impl<'a> MethodBuilder<'a> {
    pub fn new(ctx: AnalysisContext<'a>, file: &'a SourceFile) -> Self {
        Self { ctx, file }
    }

    /// Metadata for `member`, or `None` for non-methods, non-public and reserved members.
    pub fn build(&self, member: &ClassMember) -> Option<MethodMeta> {
        if member.kind != ClassMemberKind::Method || !member.is_public() {
            return None;
        }
        let name = member.name.text();
        if name.is_empty() || is_reserved_method(name) {
            return None;
        }
        let doc_tags = read_doc_tags(member.jsdoc.as_ref(), self.file.file_name());
        let mut method = MethodMeta::new(name);
        self.fill_signature(&mut method, &member.parameters, member.span);
        method.is_static = member.is_static();
        method.internal = has_tag(&doc_tags, "internal");
        method.deprecated = has_tag(&doc_tags, "deprecated");
        method.documentation = documentation(member.jsdoc.as_ref());
        method.doc_tags = doc_tags;
        method.node = NodeRef::new(self.file.file_name(), member.span);
        Some(method)
    }

    /// Signature, return type and parameters. Shared with interface method signatures.
    pub fn fill_signature(&self, method: &mut MethodMeta, parameters: &[Parameter], span: ts::Span) {
        let checker = self.ctx.checker();
        let file_name = self.file.file_name();
        let signature = checker
            .get_signature_at_location(file_name, span)
            .unwrap_or_else(|| self.signature_from_syntax(parameters));

        method.signature = checker.signature_to_string(&signature, SIGNATURE_FLAGS);
        method.return_type = checker.type_to_string(&signature.return_type, TypeFormatFlags::NO_TRUNCATION);
        method.params = parameters
            .iter()
            .enumerate()
            .map(|(i, param)| {
                let sig_param = signature.parameters.get(i);
                let ty = sig_param
                    .map(|p| p.ty.clone())
                    .unwrap_or_else(|| checker.get_type_at_location(file_name, param.span));
                let resolved = resolve(checker, &ty);
                ParamMeta {
                    name: param.name.clone(),
                    type_text: resolved.text,
                    primitive: resolved.primitive,
                    optional: param.question_token
                        || param.initializer.is_some()
                        || sig_param.map_or(false, |p| p.optional),
                    default_value: param
                        .initializer
                        .as_ref()
                        .map(|init| self.file.text_of(init.span()).to_string()),
                }
            })
            .collect();
    }

    fn signature_from_syntax(&self, parameters: &[Parameter]) -> Signature {
        let checker = self.ctx.checker();
        let params = parameters
            .iter()
            .map(|p| SignatureParameter {
                name: p.name.clone(),
                ty: checker.get_type_at_location(self.file.file_name(), p.span),
                optional: p.question_token || p.initializer.is_some(),
                rest: p.dot_dot_dot_token,
            })
            .collect();
        Signature::new(params, Type::any())
    }
}
