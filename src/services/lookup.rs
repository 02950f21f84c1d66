use std::sync::Arc;
use tracing::trace;

use crate::cache::SnapshotCache;
use crate::classifier::{Presence, classify, resolve_name};
use crate::gtin::normalize;
use crate::models::{LookupResult, Snapshot};

/// Answers status queries against whatever snapshot is currently published
#[derive(Clone)]
pub struct LookupService {
    cache: Arc<SnapshotCache>,
}

impl LookupService {
    pub fn new(cache: Arc<SnapshotCache>) -> Self {
        Self { cache }
    }

    pub fn lookup(&self, raw_gtin: &str) -> LookupResult {
        let snapshot = self.cache.get();
        let result = lookup_in(&snapshot, raw_gtin);
        trace!(
            "Lookup '{}' -> {} (generation {})",
            result.gtin, result.status, snapshot.generation
        );
        result
    }
}

/// Classify one raw code against a single snapshot
pub fn lookup_in(snapshot: &Snapshot, raw_gtin: &str) -> LookupResult {
    let gtin = normalize(raw_gtin);
    let entry = snapshot.register.get(&gtin);

    let presence = Presence {
        in_register: entry.is_some(),
        in_catalog: snapshot.catalog.contains(&gtin),
        in_all_gtins: snapshot.all_gtins.contains(&gtin),
        uploaded_to_catalog: entry.is_some_and(|e| e.uploaded_to_catalog),
        uploaded_to_register: entry.is_some_and(|e| e.uploaded_to_register),
    };

    let status = classify(&presence);
    let name = resolve_name(status, entry);

    LookupResult { gtin, status, name }
}
