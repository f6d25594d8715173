use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use rayon::prelude::*;

use crate::foundation::error::{DeckError, DeckResult};

/// Version tag written into the persisted query cache. Files with another version are ignored.
pub const QUERY_CACHE_VERSION: u32 = 1;

/// Deterministic, step-independent identifier of a measurement.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct QueryKey(String);

impl QueryKey {
    /// Key for a measurement of `kind` over `payload` (for text, the measurement document).
    pub fn new(kind: &str, payload: &str) -> Self {
        Self(format!("{kind}:{payload}"))
    }

    /// Full key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened key for diagnostics.
    pub fn short(&self) -> String {
        const MAX: usize = 64;
        if self.0.len() <= MAX {
            return self.0.clone();
        }
        let mut cut = MAX;
        while !self.0.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}... ({} bytes)", &self.0[..cut], self.0.len())
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short())
    }
}

/// Resolved measurement value.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Measured {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

type Resolver = Box<dyn FnOnce() -> DeckResult<Measured> + Send>;

/// A measurement request: its key plus the deferred computation that answers it on a miss.
pub struct Query {
    key: QueryKey,
    resolver: Resolver,
}

impl Query {
    /// Create a query.
    pub fn new(
        key: QueryKey,
        resolver: impl FnOnce() -> DeckResult<Measured> + Send + 'static,
    ) -> Self {
        Self {
            key,
            resolver: Box::new(resolver),
        }
    }

    /// The query key.
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Run the resolver. Failures are reported as [`DeckError::Query`] carrying the key.
    pub fn resolve(self) -> DeckResult<Measured> {
        let Self { key, resolver } = self;
        resolver().map_err(|e| match e {
            DeckError::Query { .. } => e,
            other => DeckError::query(key.short(), other.to_string()),
        })
    }
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query").field("key", &self.key).finish_non_exhaustive()
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
struct CacheFile {
    version: u32,
    entries: Vec<CacheEntry>,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct CacheEntry {
    key: QueryKey,
    width: f64,
    height: f64,
}

/// Resolved key -> value mapping, read-only once a build starts rendering pages.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryCache {
    entries: BTreeMap<QueryKey, Measured>,
}

impl QueryCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a resolved value.
    pub fn get(&self, key: &QueryKey) -> Option<Measured> {
        self.entries.get(key).copied()
    }

    /// Whether `key` is resolved.
    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: QueryKey, value: Measured) {
        self.entries.insert(key, value);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&QueryKey, Measured)> {
        self.entries.iter().map(|(k, v)| (k, *v))
    }

    /// Load a persisted cache. A missing, unreadable, unparseable or foreign-version file yields
    /// an empty cache (cold start); only the latter three are reported.
    pub fn load(path: &Path) -> Self {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no query cache, cold start");
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "query cache unreadable, cold start"
                );
                return Self::default();
            }
        };
        let file: CacheFile = match serde_json::from_slice(&bytes) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "query cache unparseable, cold start"
                );
                return Self::default();
            }
        };
        if file.version != QUERY_CACHE_VERSION {
            tracing::warn!(
                path = %path.display(),
                version = file.version,
                "query cache has unsupported version, cold start"
            );
            return Self::default();
        }
        let entries = file
            .entries
            .into_iter()
            .map(|e| {
                (
                    e.key,
                    Measured {
                        width: e.width,
                        height: e.height,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Persist the cache, replacing `path` atomically via a temporary sibling.
    pub fn save(&self, path: &Path) -> DeckResult<()> {
        let file = CacheFile {
            version: QUERY_CACHE_VERSION,
            entries: self
                .entries
                .iter()
                .map(|(k, v)| CacheEntry {
                    key: k.clone(),
                    width: v.width,
                    height: v.height,
                })
                .collect(),
        };
        let json = serde_json::to_vec_pretty(&file)
            .map_err(|e| DeckError::serde(format!("query cache: {e}")))?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = std::path::PathBuf::from(tmp);
        std::fs::write(&tmp, json)
            .map_err(|e| DeckError::cache_io(format!("write '{}': {e}", tmp.display())))?;
        std::fs::rename(&tmp, path).map_err(|e| {
            DeckError::cache_io(format!(
                "rename '{}' -> '{}': {e}",
                tmp.display(),
                path.display()
            ))
        })
    }
}

/// Counters from one resolution pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Distinct keys requested.
    pub total: usize,
    /// Keys answered by the previous cache.
    pub cached: usize,
    /// Keys computed by running their resolver.
    pub resolved: usize,
}

/// Answer every query: hits come from `previous` verbatim, misses run on `pool`.
///
/// Each distinct key is resolved at most once (the first query for a key wins). The first failing
/// resolver aborts the pass. The returned cache holds exactly the requested keys.
#[tracing::instrument(skip_all, fields(queries = queries.len()))]
pub fn resolve_queries(
    queries: Vec<Query>,
    previous: &QueryCache,
    pool: &rayon::ThreadPool,
) -> DeckResult<(QueryCache, ResolveStats)> {
    let mut cache = QueryCache::new();
    let mut pending = BTreeSet::new();
    let mut misses = Vec::new();
    for query in queries {
        if cache.contains(&query.key) || pending.contains(&query.key) {
            continue;
        }
        match previous.get(&query.key) {
            Some(value) => cache.insert(query.key, value),
            None => {
                pending.insert(query.key.clone());
                misses.push(query);
            }
        }
    }
    let cached = cache.len();
    tracing::debug!(cached, misses = misses.len(), "query cache lookup");

    let resolved = pool.install(|| {
        misses
            .into_par_iter()
            .map(|query| {
                let key = query.key.clone();
                tracing::debug!(key = %key, "resolving query");
                query.resolve().map(|value| (key, value))
            })
            .collect::<DeckResult<Vec<_>>>()
    })?;

    let stats = ResolveStats {
        total: cached + resolved.len(),
        cached,
        resolved: resolved.len(),
    };
    for (key, value) in resolved {
        cache.insert(key, value);
    }
    Ok((cache, stats))
}

#[cfg(test)]
#[path = "../../tests/unit/cache/query.rs"]
mod tests;
