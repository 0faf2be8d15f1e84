// Plugin Pipeline
//
// Drives one batch over a program:
//
//   init -> per file (path-sorted): discover -> build (+heritage) -> postbuild -> link -> postlink
//        -> duplicate tags -> dependency graph -> transform -> destroy
//
// Per-file results are memoized in the incremental cache and reused while the file and the
// files its heritage came from are unchanged.

use super::cache::{CachedFile, IncrementalCache};
use super::dependency_graph::link_dependencies;
use super::digest::FileDigests;
use crate::analysis::AnalysisContext;
use crate::config::AnalyzerConfig;
use crate::diagnostics::{dedupe_diagnostics, DiagnosticSink};
use crate::error::{AnalyzerError, Result};
use crate::heritage::{merge_chain, CacheStats, HeritageCache, HeritageResolver};
use crate::meta::{flatten_heritage, AnalysisResult, ComponentMeta};
use crate::plugin::{CorePlugin, FileMap, Plugin, PluginContext, Stage};
use crate::validation::{report_duplicates, validate_component};
use std::collections::BTreeMap;
use ts::{Program, SourceFile};

pub struct Pipeline {
    config: AnalyzerConfig,
    plugins: Vec<Box<dyn Plugin>>,
    heritage_cache: HeritageCache,
    cache: IncrementalCache,
}

/// Cache statistics of one pipeline instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub files: CacheStats,
    pub heritage_edges: CacheStats,
    pub heritage_payloads: CacheStats,
}

impl Pipeline {
    /// A pipeline with no plugins registered.
    pub fn new(config: AnalyzerConfig) -> Self {
        let heritage_cache = HeritageCache::new(config.heritage_cache_size);
        let cache = IncrementalCache::new(config.component_cache_size);
        Self {
            config,
            plugins: Vec::new(),
            heritage_cache,
            cache,
        }
    }

    /// A pipeline with the built-in `core` plugin registered first.
    pub fn with_core(config: AnalyzerConfig) -> Self {
        let mut pipeline = Self::new(config);
        pipeline.add_plugin(CorePlugin);
        pipeline
    }

    pub fn add_plugin(&mut self, plugin: impl Plugin + 'static) -> &mut Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Candidate files of `program`, path-sorted.
    pub fn candidate_files(&self, program: &dyn Program) -> Result<Vec<String>> {
        let names = program.get_root_file_names();
        self.config.select_files(names.iter().map(String::as_str))
    }

    pub fn clear_caches(&mut self) {
        self.heritage_cache.clear();
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> PipelineStats {
        PipelineStats {
            files: self.cache.stats(),
            heritage_edges: self.heritage_cache.edge_stats(),
            heritage_payloads: self.heritage_cache.payload_stats(),
        }
    }

    pub(crate) fn incremental_cache(&mut self) -> &mut IncrementalCache {
        &mut self.cache
    }

    /// Runs one batch over every candidate file of `program`.
    pub fn run(&mut self, program: &dyn Program) -> Result<AnalysisResult> {
        let files = self.candidate_files(program)?;
        let digests = FileDigests::from_program(program);
        tracing::info!(files = files.len(), plugins = self.plugins.len(), "analysis batch started");

        let Pipeline {
            config,
            plugins,
            heritage_cache,
            cache,
        } = self;
        let batch = Batch {
            program,
            config,
            heritage_cache,
            digests: &digests,
            files: &files,
        };

        let global = DiagnosticSink::new();
        let ctx = AnalysisContext::new(program, config, &global);
        for plugin in plugins.iter_mut() {
            tracing::debug!(plugin = plugin.name(), "init");
            plugin
                .init(&ctx)
                .map_err(|e| AnalyzerError::plugin(plugin.name(), Stage::Init, e))?;
        }

        let mut components = Vec::new();
        let mut file_map = FileMap::new();
        let mut diagnostics = Vec::new();
        for file_name in &files {
            let entry = match cache.get(file_name, &digests) {
                Some(entry) => {
                    tracing::debug!(file = %file_name, "unchanged, reusing cached result");
                    entry
                }
                None => {
                    let entry = batch.analyze_file(plugins, file_name)?;
                    cache.put(file_name.clone(), entry.clone());
                    entry
                }
            };
            diagnostics.extend(entry.diagnostics);
            let index = entry.component.map(|component| {
                components.push(component);
                components.len() - 1
            });
            file_map.insert(file_name.clone(), index);
        }

        report_duplicates(&components, program, &global);
        link_dependencies(&mut components, program);

        for plugin in plugins.iter_mut() {
            tracing::debug!(plugin = plugin.name(), components = components.len(), "transform");
            plugin
                .transform(&ctx, &components, &file_map)
                .map_err(|e| AnalyzerError::plugin(plugin.name(), Stage::Transform, e))?;
        }
        for plugin in plugins.iter_mut() {
            plugin
                .destroy()
                .map_err(|e| AnalyzerError::plugin(plugin.name(), Stage::Destroy, e))?;
        }

        diagnostics.extend(global.take());
        // An ancestor that is also a component reports from both analyses.
        dedupe_diagnostics(&mut diagnostics);
        tracing::info!(
            components = components.len(),
            diagnostics = diagnostics.len(),
            cache = %cache.stats(),
            "analysis batch finished"
        );
        Ok(AnalysisResult {
            components,
            files,
            diagnostics,
        })
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("plugins", &self.plugin_names())
            .field("heritage_cache", &self.heritage_cache)
            .field("cache", &self.cache)
            .finish()
    }
}

/// Read-only state shared by every file of one batch.
struct Batch<'a> {
    program: &'a dyn Program,
    config: &'a AnalyzerConfig,
    heritage_cache: &'a HeritageCache,
    digests: &'a FileDigests,
    files: &'a [String],
}

impl<'a> Batch<'a> {
    /// Runs discover through postlink for one file.
    fn analyze_file(&self, plugins: &mut [Box<dyn Plugin>], file_name: &str) -> Result<CachedFile> {
        let file = self
            .program
            .get_source_file(file_name)
            .ok_or_else(|| AnalyzerError::MissingFile(file_name.to_string()))?;
        let digest = self.digests.get(file_name).unwrap_or_default().to_string();
        let sink = DiagnosticSink::new();
        let ctx = AnalysisContext::new(self.program, self.config, &sink);

        let (component, dependencies) = match self.build_component(&ctx, plugins, file)? {
            Some((component, dependencies)) => (Some(component), dependencies),
            None => {
                tracing::debug!(file = file_name, "no component");
                (None, BTreeMap::new())
            }
        };
        Ok(CachedFile {
            digest,
            dependencies,
            component,
            diagnostics: sink.take(),
        })
    }

    fn build_component(
        &self,
        ctx: &PluginContext<'_>,
        plugins: &mut [Box<dyn Plugin>],
        file: &SourceFile,
    ) -> Result<Option<(ComponentMeta, BTreeMap<String, String>)>> {
        let Some(declaration) = first_some(plugins, Stage::Discover, |p| p.discover(ctx, file))? else {
            return Ok(None);
        };
        let Some(mut component) = first_some(plugins, Stage::Build, |p| p.build(ctx, file, &declaration))?
        else {
            return Ok(None);
        };
        tracing::debug!(file = file.file_name(), class = %component.class_name, "built");

        let resolved = HeritageResolver::new(*ctx, self.heritage_cache, self.digests)
            .resolve_class(file, &declaration);
        component.heritage = resolved.heritage;

        let component = thread(plugins, Stage::Postbuild, component, |p, c| p.postbuild(ctx, c, file))?;
        let component = self.link(ctx, plugins, component, file)?;
        let mut component = thread(plugins, Stage::Postlink, component, |p, c| p.postlink(ctx, c, file))?;

        validate_component(ctx, file, &mut component);
        Ok(Some((component, resolved.dependencies)))
    }

    /// Merges the resolved ancestors, then lets every plugin see every heritage node.
    fn link(
        &self,
        ctx: &PluginContext<'_>,
        plugins: &mut [Box<dyn Plugin>],
        mut component: ComponentMeta,
        file: &SourceFile,
    ) -> Result<ComponentMeta> {
        merge_chain(&mut component);
        let heritage = component.heritage.clone();
        for node in flatten_heritage(&heritage) {
            component = thread(plugins, Stage::Link, component, |p, c| {
                p.link(ctx, c, node, file, self.files)
            })?;
        }
        Ok(component)
    }
}

/// The first plugin result, skipping the remaining plugins once one is found.
fn first_some<T>(
    plugins: &mut [Box<dyn Plugin>],
    stage: Stage,
    mut hook: impl FnMut(&mut dyn Plugin) -> anyhow::Result<Option<T>>,
) -> Result<Option<T>> {
    plugins.iter_mut().try_fold(None, |found, plugin| match found {
        Some(_) => Ok(found),
        None => hook(plugin.as_mut()).map_err(|e| AnalyzerError::plugin(plugin.name(), stage, e)),
    })
}

/// Passes `component` through every plugin in order.
fn thread(
    plugins: &mut [Box<dyn Plugin>],
    stage: Stage,
    component: ComponentMeta,
    mut hook: impl FnMut(&mut dyn Plugin, ComponentMeta) -> anyhow::Result<ComponentMeta>,
) -> Result<ComponentMeta> {
    plugins.iter_mut().try_fold(component, |component, plugin| {
        hook(plugin.as_mut(), component).map_err(|e| AnalyzerError::plugin(plugin.name(), stage, e))
    })
}
