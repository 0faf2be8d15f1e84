// Tag Name Validation

use crate::analysis::AnalysisContext;
use crate::diagnostics::ErrorCode;
use crate::meta::ComponentMeta;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use ts::SourceFile;

static TAG_NAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w-]+$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TagNameError {
    #[error("tag names must be lowercase without surrounding whitespace")]
    NotNormalized,
    #[error("tag names must not contain spaces")]
    ContainsSpace,
    #[error("tag names must not contain commas")]
    ContainsComma,
    #[error("tag names may only contain letters, digits, underscores and dashes")]
    InvalidCharacter,
    #[error("tag names must not start with a dash")]
    LeadingDash,
    #[error("tag names must not end with a dash")]
    TrailingDash,
    #[error("tag names must contain a dash")]
    MissingDash,
    #[error("tag names must not contain consecutive dashes")]
    DoubleDash,
}

/// Checks `tag` against the custom-element naming grammar. Rules are checked in a fixed
/// order and the first violation is returned.
pub fn validate_tag_name(tag: &str) -> Result<(), TagNameError> {
    if tag != tag.trim().to_lowercase() {
        return Err(TagNameError::NotNormalized);
    }
    if tag.contains(' ') {
        return Err(TagNameError::ContainsSpace);
    }
    if tag.contains(',') {
        return Err(TagNameError::ContainsComma);
    }
    if !TAG_NAME_CHARS.is_match(tag) {
        return Err(TagNameError::InvalidCharacter);
    }
    if tag.starts_with('-') {
        return Err(TagNameError::LeadingDash);
    }
    if tag.ends_with('-') {
        return Err(TagNameError::TrailingDash);
    }
    if !tag.contains('-') {
        return Err(TagNameError::MissingDash);
    }
    if tag.contains("--") {
        return Err(TagNameError::DoubleDash);
    }
    Ok(())
}

/// Reports an invalid tag name on `component` and clears it.
pub fn validate_component(ctx: &AnalysisContext<'_>, file: &SourceFile, component: &mut ComponentMeta) {
    let Some(tag) = component.tag_name.as_deref() else {
        return;
    };
    if let Err(err) = validate_tag_name(tag) {
        ctx.diagnostics.error(
            ErrorCode::InvalidTagName,
            file,
            component.node.span,
            format!("`{}` is not a valid tag name for `{}`: {}", tag, component.class_name, err),
        );
        component.tag_name = None;
    }
}
