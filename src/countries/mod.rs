//! Country dispatch
//!
//! Every configured country owns its own snapshot cache and, when it has a
//! sheet source, a refresh scheduler feeding that cache. Countries without a
//! sheet source answer every lookup from the empty snapshot.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

use crate::cache::SnapshotCache;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ingestor::RefreshScheduler;
use crate::models::{LookupResult, RefreshStatus};
use crate::services::LookupService;
use crate::sources::SheetFetcher;

/// Country code used when a request does not name one
pub const DEFAULT_COUNTRY_CODE: &str = "se";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Country {
    #[serde(rename = "se")]
    #[strum(serialize = "se")]
    Sweden,
    #[serde(rename = "de")]
    #[strum(serialize = "de")]
    Germany,
}

/// Lookup and refresh machinery for one country
pub struct CountryCatalog {
    country: Country,
    lookup: LookupService,
    cache: Arc<SnapshotCache>,
    scheduler: Option<Arc<RefreshScheduler>>,
}

impl CountryCatalog {
    /// A catalog with no sheet source, permanently serving the empty snapshot
    pub fn always_negative(country: Country) -> Self {
        let cache = Arc::new(SnapshotCache::new());
        Self {
            country,
            lookup: LookupService::new(Arc::clone(&cache)),
            cache,
            scheduler: None,
        }
    }

    pub fn with_scheduler(country: Country, scheduler: Arc<RefreshScheduler>) -> Self {
        let cache = Arc::clone(scheduler.cache());
        Self {
            country,
            lookup: LookupService::new(Arc::clone(&cache)),
            cache,
            scheduler: Some(scheduler),
        }
    }

    pub fn country(&self) -> Country {
        self.country
    }

    pub fn lookup(&self) -> &LookupService {
        &self.lookup
    }

    pub fn scheduler(&self) -> Option<&Arc<RefreshScheduler>> {
        self.scheduler.as_ref()
    }

    pub fn health(&self) -> CountryHealth {
        let snapshot = self.cache.get();
        CountryHealth {
            country: self.country,
            sheet_backed: self.scheduler.is_some(),
            generation: snapshot.generation,
            register_entries: snapshot.register.len(),
            catalog_entries: snapshot.catalog.len(),
            loaded_at: snapshot.loaded_at,
            refresh: self.scheduler.as_ref().map(|s| (*s.status()).clone()),
        }
    }
}

/// Per-country cache state reported by the health endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryHealth {
    pub country: Country,
    pub sheet_backed: bool,
    pub generation: u64,
    pub register_entries: usize,
    pub catalog_entries: usize,
    pub loaded_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh: Option<RefreshStatus>,
}

/// All configured countries, keyed in stable order
#[derive(Default)]
pub struct CountryRegistry {
    catalogs: BTreeMap<Country, CountryCatalog>,
}

impl CountryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one catalog per configured country, sharing `fetcher` between
    /// every sheet-backed scheduler. Schedulers are created but not started.
    pub fn from_config(config: &Config, fetcher: Arc<dyn SheetFetcher>) -> Self {
        let mut registry = Self::new();

        for country_config in &config.countries {
            let country = country_config.code;
            let catalog = match &country_config.sheet {
                Some(sheet) => {
                    let scheduler = RefreshScheduler::new(
                        country.to_string(),
                        sheet.clone(),
                        Arc::clone(&fetcher),
                        Arc::new(SnapshotCache::new()),
                    );
                    CountryCatalog::with_scheduler(country, Arc::new(scheduler))
                }
                None => {
                    debug!("Country '{}' has no sheet source; lookups are always red", country);
                    CountryCatalog::always_negative(country)
                }
            };
            registry.insert(catalog);
        }

        registry
    }

    pub fn insert(&mut self, catalog: CountryCatalog) {
        self.catalogs.insert(catalog.country(), catalog);
    }

    /// Resolve a request's country code to its catalog
    pub fn catalog(&self, code: &str) -> AppResult<&CountryCatalog> {
        Country::from_str(code.trim())
            .ok()
            .and_then(|country| self.catalogs.get(&country))
            .ok_or_else(|| AppError::unsupported_country(code.trim().to_lowercase()))
    }

    pub fn lookup(&self, code: &str, raw_gtin: &str) -> AppResult<LookupResult> {
        Ok(self.catalog(code)?.lookup().lookup(raw_gtin))
    }

    pub fn codes(&self) -> Vec<String> {
        self.catalogs.keys().map(Country::to_string).collect()
    }

    pub fn health(&self) -> Vec<CountryHealth> {
        self.catalogs.values().map(CountryCatalog::health).collect()
    }

    /// Start every scheduler. Already-running schedulers are left alone.
    pub fn start_all(&self) {
        let started = self
            .schedulers()
            .filter(|scheduler| scheduler.start())
            .count();
        info!("Started {} refresh scheduler(s)", started);
    }

    /// Stop every scheduler and wait for their loops to exit
    pub async fn shutdown(&self) {
        for scheduler in self.schedulers() {
            scheduler.stop().await;
        }
        info!("All refresh schedulers stopped");
    }

    fn schedulers(&self) -> impl Iterator<Item = &Arc<RefreshScheduler>> {
        self.catalogs.values().filter_map(CountryCatalog::scheduler)
    }
}
