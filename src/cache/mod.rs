//! Atomically published snapshot storage
//!
//! Readers call [`SnapshotCache::get`] and receive an `Arc<Snapshot>` pinned
//! for as long as they hold it. The refresh scheduler builds a complete
//! replacement and swaps it in with [`SnapshotCache::publish`]. Loads are
//! wait-free and a reader can never observe register data from one refresh
//! combined with catalog data from another.

use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::models::Snapshot;

pub struct SnapshotCache {
    snap: ArcSwap<Snapshot>,
}

impl SnapshotCache {
    /// Create a cache serving the empty startup snapshot
    pub fn new() -> Self {
        Self::with_snapshot(Snapshot::empty())
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snap: ArcSwap::from_pointee(snapshot),
        }
    }

    #[inline]
    pub fn get(&self) -> Arc<Snapshot> {
        self.snap.load_full()
    }

    pub fn publish(&self, snapshot: Snapshot) {
        self.snap.store(Arc::new(snapshot));
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new()
    }
}
