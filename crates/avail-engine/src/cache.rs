//! Snapshot cache abstraction for the data-fetch layer.
//!
//! The engine itself never caches — it computes over an immutable snapshot
//! per request. Fetch layers that want to reuse snapshots across requests
//! inject an implementation of [`SnapshotCache`] instead of reaching for a
//! module-level mutable map.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::model::CompanySnapshot;

/// Request- or process-scoped cache of company snapshots, keyed by tenant id.
pub trait SnapshotCache: Send + Sync {
    fn get(&self, company_id: &str) -> Option<Arc<CompanySnapshot>>;
    fn set(&self, company_id: &str, snapshot: Arc<CompanySnapshot>);
    fn invalidate(&self, company_id: &str);
    fn invalidate_all(&self);
}

/// Simple in-process cache behind an `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryCache {
    inner: RwLock<HashMap<String, Arc<CompanySnapshot>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotCache for MemoryCache {
    fn get(&self, company_id: &str) -> Option<Arc<CompanySnapshot>> {
        self.inner
            .read()
            .ok()
            .and_then(|map| map.get(company_id).cloned())
    }

    fn set(&self, company_id: &str, snapshot: Arc<CompanySnapshot>) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(company_id.to_string(), snapshot);
        }
    }

    fn invalidate(&self, company_id: &str) {
        if let Ok(mut map) = self.inner.write() {
            map.remove(company_id);
        }
    }

    fn invalidate_all(&self) {
        if let Ok(mut map) = self.inner.write() {
            map.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_invalidate_roundtrip() {
        let cache = MemoryCache::new();
        assert!(cache.get("acme").is_none());

        cache.set("acme", Arc::new(CompanySnapshot::default()));
        assert!(cache.get("acme").is_some());

        cache.invalidate("acme");
        assert!(cache.get("acme").is_none());
    }

    #[test]
    fn invalidate_all_clears_every_tenant() {
        let cache = MemoryCache::new();
        cache.set("acme", Arc::new(CompanySnapshot::default()));
        cache.set("globex", Arc::new(CompanySnapshot::default()));

        cache.invalidate_all();
        assert!(cache.get("acme").is_none());
        assert!(cache.get("globex").is_none());
    }
}
