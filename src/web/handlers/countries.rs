use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::web::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountriesResponse {
    pub countries: Vec<String>,
}

/// List the country codes accepted by `check-gtin`
pub async fn list_countries(State(state): State<AppState>) -> Json<CountriesResponse> {
    Json(CountriesResponse {
        countries: state.registry.codes(),
    })
}
