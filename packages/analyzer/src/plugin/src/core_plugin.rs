// Core Plugin
//
// Finds the first class marked as a component and builds it.

use super::plugin::{Plugin, PluginContext};
use crate::analysis::{ComponentBuilder, TAG_NAME_DOC_TAGS};
use crate::meta::ComponentMeta;
use std::sync::Arc;
use ts::{ClassDeclaration, SourceFile};

#[derive(Debug, Default, Clone, Copy)]
pub struct CorePlugin;

impl CorePlugin {
    pub const NAME: &'static str = "core";

    /// A component class carries a configured component decorator or a tag-name doc tag.
    pub fn is_component(ctx: &PluginContext<'_>, class: &ClassDeclaration) -> bool {
        let decorated = class
            .decorators
            .iter()
            .filter_map(|d| d.name())
            .any(|name| ctx.config.is_component_decorator(name));
        decorated
            || class.jsdoc.as_ref().map_or(false, |doc| {
                doc.tags
                    .iter()
                    .any(|tag| TAG_NAME_DOC_TAGS.contains(&tag.tag_name.as_str()))
            })
    }
}

impl Plugin for CorePlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn discover(
        &mut self,
        ctx: &PluginContext<'_>,
        file: &SourceFile,
    ) -> anyhow::Result<Option<Arc<ClassDeclaration>>> {
        Ok(file.classes().find(|c| Self::is_component(ctx, c)).cloned())
    }

    fn build(
        &mut self,
        ctx: &PluginContext<'_>,
        file: &SourceFile,
        declaration: &ClassDeclaration,
    ) -> anyhow::Result<Option<ComponentMeta>> {
        Ok(Some(ComponentBuilder::new(*ctx).build(file, declaration)))
    }
}
