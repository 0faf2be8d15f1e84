// Heritage Memo Tables
//
// Two bounded tables keyed by declaration identity: the direct edge list of a declaration
// and its fully resolved payload. Both sit behind mutexes because ancestors are resolved
// from rayon worker threads.

use super::edges::EdgeList;
use crate::meta::HeritagePayload;
use crate::pipeline::content_digest;
use lru::LruCache;
use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};
use ts::{Diagnostic, SourceFile, Span};

/// Identity of one declaration: its file, its offset in that file and a digest of its text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclarationKey {
    pub file_name: String,
    pub start: usize,
    pub digest: String,
}

impl DeclarationKey {
    pub fn of(file: &SourceFile, span: Span) -> Self {
        Self {
            file_name: file.file_name().to_string(),
            start: span.start,
            digest: content_digest(file.text_of(span)),
        }
    }
}

/// A resolved payload plus the digest of every file its subtree was built from and the
/// diagnostics its ancestor builds reported.
#[derive(Debug, Clone)]
pub struct CachedPayload {
    pub payload: Option<HeritagePayload>,
    pub dependencies: BTreeMap<String, String>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: usize,
    pub misses: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f32 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f32 / total as f32
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries, {} hits, {} misses, {:.2}% hit rate",
            self.entries,
            self.hits,
            self.misses,
            self.hit_rate() * 100.0
        )
    }
}

struct Table<V> {
    entries: LruCache<DeclarationKey, V>,
    hits: usize,
    misses: usize,
}

impl<V: Clone> Table<V> {
    fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
            hits: 0,
            misses: 0,
        }
    }

    fn get(&mut self, key: &DeclarationKey) -> Option<V> {
        match self.entries.get(key) {
            Some(value) => {
                self.hits += 1;
                Some(value.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

pub struct HeritageCache {
    edges: Mutex<Table<EdgeList>>,
    payloads: Mutex<Table<CachedPayload>>,
}

impl HeritageCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            edges: Mutex::new(Table::new(capacity)),
            payloads: Mutex::new(Table::new(capacity)),
        }
    }

    pub fn edges(&self, key: &DeclarationKey) -> Option<EdgeList> {
        lock(&self.edges).get(key)
    }

    pub fn put_edges(&self, key: DeclarationKey, edges: EdgeList) {
        lock(&self.edges).entries.put(key, edges);
    }

    pub fn payload(&self, key: &DeclarationKey) -> Option<CachedPayload> {
        lock(&self.payloads).get(key)
    }

    pub fn put_payload(&self, key: DeclarationKey, payload: CachedPayload) {
        lock(&self.payloads).entries.put(key, payload);
    }

    pub fn clear(&self) {
        lock(&self.edges).clear();
        lock(&self.payloads).clear();
    }

    pub fn edge_stats(&self) -> CacheStats {
        lock(&self.edges).stats()
    }

    pub fn payload_stats(&self) -> CacheStats {
        lock(&self.payloads).stats()
    }
}

impl fmt::Debug for HeritageCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeritageCache")
            .field("edges", &self.edge_stats())
            .field("payloads", &self.payload_stats())
            .finish()
    }
}

fn lock<V>(table: &Mutex<Table<V>>) -> MutexGuard<'_, Table<V>> {
    table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
