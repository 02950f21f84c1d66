//! Bearer-token sources for the Sheets API
//!
//! The fetcher asks its [`AccessTokenProvider`] for a token on every request.
//! Providers that can renew (service accounts) hand out a fresh token once
//! the cached one nears expiry, so a long-running process keeps refreshing.

use async_trait::async_trait;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use std::path::Path;
use tracing::debug;

use crate::errors::{SourceError, SourceResult};

/// Read-only access to spreadsheet values and metadata
pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> SourceResult<String>;
}

/// A token supplied from configuration. It is never renewed.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl AccessTokenProvider for StaticToken {
    async fn access_token(&self) -> SourceResult<String> {
        Ok(self.0.clone())
    }
}

/// OAuth tokens minted from a service-account key file
pub struct ServiceAccountTokens {
    account: CustomServiceAccount,
}

impl ServiceAccountTokens {
    pub fn from_file(path: impl AsRef<Path>) -> SourceResult<Self> {
        let path = path.as_ref();
        let account = CustomServiceAccount::from_file(path).map_err(|e| {
            SourceError::InvalidConfig {
                field: "sheets.service_account_file".to_string(),
                message: format!("{}: {}", path.display(), e),
            }
        })?;
        debug!("Loaded service account key from {}", path.display());
        Ok(Self { account })
    }
}

#[async_trait]
impl AccessTokenProvider for ServiceAccountTokens {
    async fn access_token(&self) -> SourceResult<String> {
        // gcp_auth caches the token and only mints a new one near expiry
        let token = self
            .account
            .token(&[SHEETS_READONLY_SCOPE])
            .await
            .map_err(|e| SourceError::token_unavailable(e.to_string()))?;
        Ok(token.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_token_is_returned_unchanged() {
        let provider = StaticToken::new("abc");
        assert_eq!(provider.access_token().await.unwrap(), "abc");
        assert_eq!(provider.access_token().await.unwrap(), "abc");
    }

    #[test]
    fn test_missing_key_file_is_a_config_error() {
        let err = ServiceAccountTokens::from_file("/nonexistent/service_account.json")
            .err()
            .unwrap();
        assert!(matches!(
            err,
            SourceError::InvalidConfig { ref field, .. } if field == "sheets.service_account_file"
        ));
    }
}
