//! Snapshot stores: where the facade gets its pre-fetched tenant data.
//!
//! Lookups are synchronous and cheap; anything slow (remote fetch) belongs
//! behind [`crate::fetch::with_retry`] at load/refresh time, never inside a
//! request's engine invocation.

use std::collections::HashMap;
use std::sync::Arc;

use avail_engine::cache::SnapshotCache;
use avail_engine::model::CompanySnapshot;
use serde::Deserialize;

/// On-disk/wire directory format: tenants keyed by company id.
#[derive(Debug, Default, Deserialize)]
pub struct Directory {
    pub companies: HashMap<String, CompanySnapshot>,
}

/// Company id → snapshot lookup.
pub trait SnapshotStore: Send + Sync {
    fn company(&self, company_id: &str) -> Option<Arc<CompanySnapshot>>;
}

/// Store backed by a directory loaded once at startup.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    companies: HashMap<String, Arc<CompanySnapshot>>,
}

impl InMemoryStore {
    pub fn new(directory: Directory) -> Self {
        Self {
            companies: directory
                .companies
                .into_iter()
                .map(|(id, snapshot)| (id, Arc::new(snapshot)))
                .collect(),
        }
    }
}

impl SnapshotStore for InMemoryStore {
    fn company(&self, company_id: &str) -> Option<Arc<CompanySnapshot>> {
        self.companies.get(company_id).cloned()
    }
}

/// Store that consults an injected [`SnapshotCache`] before its inner store.
///
/// With the in-memory store this is belt-and-suspenders, but it keeps the
/// cache seam in one place for stores that fetch remotely.
pub struct CachingStore<S> {
    inner: S,
    cache: Arc<dyn SnapshotCache>,
}

impl<S: SnapshotStore> CachingStore<S> {
    pub fn new(inner: S, cache: Arc<dyn SnapshotCache>) -> Self {
        Self { inner, cache }
    }

    pub fn invalidate(&self, company_id: &str) {
        self.cache.invalidate(company_id);
    }
}

impl<S: SnapshotStore> SnapshotStore for CachingStore<S> {
    fn company(&self, company_id: &str) -> Option<Arc<CompanySnapshot>> {
        if let Some(hit) = self.cache.get(company_id) {
            return Some(hit);
        }
        let snapshot = self.inner.company(company_id)?;
        self.cache.set(company_id, Arc::clone(&snapshot));
        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avail_engine::cache::MemoryCache;

    fn directory_with(company_id: &str) -> Directory {
        Directory {
            companies: HashMap::from([(company_id.to_string(), CompanySnapshot::default())]),
        }
    }

    #[test]
    fn in_memory_store_resolves_known_company() {
        let store = InMemoryStore::new(directory_with("acme"));
        assert!(store.company("acme").is_some());
        assert!(store.company("ghost").is_none());
    }

    #[test]
    fn caching_store_populates_and_serves_from_cache() {
        let cache = Arc::new(MemoryCache::new());
        let store = CachingStore::new(
            InMemoryStore::new(directory_with("acme")),
            Arc::clone(&cache) as Arc<dyn SnapshotCache>,
        );

        assert!(cache.get("acme").is_none());
        assert!(store.company("acme").is_some());
        assert!(cache.get("acme").is_some());

        store.invalidate("acme");
        assert!(cache.get("acme").is_none());
    }
}
