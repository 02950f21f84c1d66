//! Health check HTTP handler
//!
//! Reports the published snapshot and refresh bookkeeping per country.
//! `degraded` means a sheet-backed country has not loaded yet and its lookups
//! currently answer red.

use axum::{extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::countries::CountryHealth;
use crate::web::{AppState, responses::ok};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: i64,
    pub countries: Vec<CountryHealth>,
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let countries = state.registry.health();
    let all_loaded = countries
        .iter()
        .filter(|c| c.sheet_backed)
        .all(|c| c.loaded_at.is_some());

    ok(HealthResponse {
        status: if all_loaded { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: (chrono::Utc::now() - state.start_time).num_seconds(),
        countries,
    })
}
