use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One register-sheet row, keyed by its GTIN in [`Snapshot::register`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegisterEntry {
    pub uploaded_to_catalog: bool,
    pub uploaded_to_register: bool,
    pub name: Option<String>,
}

/// Traffic-light registration status
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    Green,
    Yellow,
    Orange,
    Red,
}

/// Immutable view of both spreadsheets as of one refresh cycle.
///
/// Snapshots are built once and never mutated after they are published, so a
/// reader holding an `Arc<Snapshot>` always sees register and catalog data
/// from the same cycle.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub register: HashMap<String, RegisterEntry>,
    pub catalog: HashSet<String>,
    pub all_gtins: HashSet<String>,
    /// 0 for the empty startup snapshot, then one per successful publish
    pub generation: u64,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// The snapshot served before the first successful load
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }
}

/// Answer to a single GTIN query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    pub gtin: String,
    pub status: Status,
    pub name: Option<String>,
}

/// Bookkeeping about the refresh loop, exposed on the health endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshStatus {
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub consecutive_failures: u32,
}

/// Summary of a successful load cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSummary {
    pub generation: u64,
    pub register_entries: usize,
    pub catalog_entries: usize,
}
