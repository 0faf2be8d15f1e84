// Incremental Cache
//
// Per-file results of the discover..postlink stages, keyed by file path and validated by
// content digest. An entry is reused only while the file and every file its heritage was
// built from still hash the same.

use super::digest::FileDigests;
use crate::heritage::CacheStats;
use crate::meta::ComponentMeta;
use lru::LruCache;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use ts::Diagnostic;

#[derive(Debug, Clone)]
pub struct CachedFile {
    pub digest: String,
    /// Digests of the files the component's heritage was resolved from.
    pub dependencies: BTreeMap<String, String>,
    /// `None` records that the file declares no component.
    pub component: Option<ComponentMeta>,
    /// Diagnostics the file produced; replayed on every hit.
    pub diagnostics: Vec<Diagnostic>,
}

pub struct IncrementalCache {
    entries: LruCache<String, CachedFile>,
    last_aggregate: Option<String>,
    hits: usize,
    misses: usize,
}

impl IncrementalCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
            last_aggregate: None,
            hits: 0,
            misses: 0,
        }
    }

    /// The cached result for `file_name` when it is still valid against `digests`.
    pub fn get(&mut self, file_name: &str, digests: &FileDigests) -> Option<CachedFile> {
        let fresh = self.entries.get(file_name).filter(|entry| {
            digests.get(file_name) == Some(entry.digest.as_str()) && digests.matches(&entry.dependencies)
        });
        match fresh {
            Some(entry) => {
                self.hits += 1;
                Some(entry.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn put(&mut self, file_name: impl Into<String>, entry: CachedFile) {
        self.entries.put(file_name.into(), entry);
    }

    /// Every file a cached entry's heritage was resolved from.
    pub fn dependency_files(&self) -> Vec<String> {
        let mut files: Vec<String> = self
            .entries
            .iter()
            .flat_map(|(_, entry)| entry.dependencies.keys().cloned())
            .collect();
        files.sort();
        files.dedup();
        files
    }

    /// Aggregate digest of the last batch that ran to completion.
    pub fn last_aggregate(&self) -> Option<&str> {
        self.last_aggregate.as_deref()
    }

    pub fn set_last_aggregate(&mut self, aggregate: String) {
        self.last_aggregate = Some(aggregate);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.last_aggregate = None;
        self.hits = 0;
        self.misses = 0;
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

impl std::fmt::Debug for IncrementalCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncrementalCache")
            .field("stats", &self.stats())
            .field("last_aggregate", &self.last_aggregate)
            .finish()
    }
}
