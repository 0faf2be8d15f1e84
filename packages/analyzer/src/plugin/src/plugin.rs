// Plugin Contract
//
// Hooks run in registration order. `discover` and `build` stop at the first plugin with a
// result; the per-component hooks thread the component from one plugin to the next.

use crate::analysis::AnalysisContext;
use crate::meta::{ComponentMeta, HeritageMeta};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use ts::{ClassDeclaration, SourceFile};

/// What a hook can read: the program, the config and the diagnostic sink of the current file.
pub type PluginContext<'a> = AnalysisContext<'a>;

/// Every candidate file of a batch, path-sorted, mapped to the index of its component in the
/// `transform` input (or `None` when the file declares no component).
pub type FileMap = IndexMap<String, Option<usize>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Init,
    Discover,
    Build,
    Postbuild,
    Link,
    Postlink,
    Transform,
    Destroy,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Init => "init",
            Stage::Discover => "discover",
            Stage::Build => "build",
            Stage::Postbuild => "postbuild",
            Stage::Link => "link",
            Stage::Postlink => "postlink",
            Stage::Transform => "transform",
            Stage::Destroy => "destroy",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An analysis plugin. Every hook is optional; errors abort the run and are reported with
/// the plugin name and stage.
pub trait Plugin: Send {
    /// Display name used for logging and error context.
    fn name(&self) -> &str;

    fn init(&mut self, _ctx: &PluginContext<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// The component declaration of `file`, if this plugin recognizes one.
    fn discover(
        &mut self,
        _ctx: &PluginContext<'_>,
        _file: &SourceFile,
    ) -> anyhow::Result<Option<Arc<ClassDeclaration>>> {
        Ok(None)
    }

    fn build(
        &mut self,
        _ctx: &PluginContext<'_>,
        _file: &SourceFile,
        _declaration: &ClassDeclaration,
    ) -> anyhow::Result<Option<ComponentMeta>> {
        Ok(None)
    }

    fn postbuild(
        &mut self,
        _ctx: &PluginContext<'_>,
        component: ComponentMeta,
        _file: &SourceFile,
    ) -> anyhow::Result<ComponentMeta> {
        Ok(component)
    }

    /// Called once per flattened heritage node, after the ancestors were merged in.
    fn link(
        &mut self,
        _ctx: &PluginContext<'_>,
        component: ComponentMeta,
        _heritage: &HeritageMeta,
        _file: &SourceFile,
        _all_files: &[String],
    ) -> anyhow::Result<ComponentMeta> {
        Ok(component)
    }

    fn postlink(
        &mut self,
        _ctx: &PluginContext<'_>,
        component: ComponentMeta,
        _file: &SourceFile,
    ) -> anyhow::Result<ComponentMeta> {
        Ok(component)
    }

    fn transform(
        &mut self,
        _ctx: &PluginContext<'_>,
        _components: &[ComponentMeta],
        _file_map: &FileMap,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    fn destroy(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}
