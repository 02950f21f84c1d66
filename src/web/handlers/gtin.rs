use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::countries::DEFAULT_COUNTRY_CODE;
use crate::errors::AppError;
use crate::models::LookupResult;
use crate::web::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckGtinRequest {
    pub gtin: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    DEFAULT_COUNTRY_CODE.to_string()
}

/// Classify one scanned code for a country
///
/// Answers `{gtin, status, name}`; an unknown country is a 400.
pub async fn check_gtin(
    State(state): State<AppState>,
    Json(request): Json<CheckGtinRequest>,
) -> Result<Json<LookupResult>, AppError> {
    let result = state.registry.lookup(&request.country, &request.gtin)?;
    debug!(
        "check-gtin country={} gtin={} status={}",
        request.country, result.gtin, result.status
    );
    Ok(Json(result))
}
