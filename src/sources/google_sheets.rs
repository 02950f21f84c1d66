//! Google Sheets v4 REST implementation of [`SheetFetcher`]
//!
//! Worksheets are addressed by their numeric id (the `gid` in a sheet URL),
//! but the values endpoint only accepts A1 ranges. Each fetch therefore
//! resolves the worksheet title from the spreadsheet metadata first and then
//! reads the whole worksheet as a `'Title'` range.
//!
//! Bearer tokens come from an [`AccessTokenProvider`] asked on every request:
//! a service-account key file (renewed before expiry) or a fixed access token.
//! Without either, an API key is appended as `key=`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

use super::SheetFetcher;
use super::auth::{AccessTokenProvider, ServiceAccountTokens, StaticToken};
use crate::config::SheetsApiConfig;
use crate::errors::{SourceError, SourceResult};
use crate::ingestor::parser::Rows;

enum Credentials {
    Bearer(Arc<dyn AccessTokenProvider>),
    ApiKey(String),
    Missing,
}

pub struct GoogleSheetsFetcher {
    client: Client,
    base_url: Url,
    credentials: Credentials,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<WorksheetEntry>,
}

#[derive(Debug, Deserialize)]
struct WorksheetEntry {
    properties: WorksheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorksheetProperties {
    sheet_id: u64,
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

impl GoogleSheetsFetcher {
    /// Build a fetcher from configuration.
    ///
    /// Credential precedence: `service_account_file`, then `access_token`,
    /// then `api_key`.
    pub fn new(config: &SheetsApiConfig) -> SourceResult<Self> {
        let credentials = match (
            &config.service_account_file,
            &config.access_token,
            &config.api_key,
        ) {
            (Some(path), _, _) => {
                Credentials::Bearer(Arc::new(ServiceAccountTokens::from_file(path)?))
            }
            (None, Some(token), _) => {
                Credentials::Bearer(Arc::new(StaticToken::new(token.clone())))
            }
            (None, None, Some(key)) => Credentials::ApiKey(key.clone()),
            (None, None, None) => Credentials::Missing,
        };
        Self::with_credentials(config, credentials)
    }

    /// Build a fetcher that authenticates with tokens from `provider`
    pub fn with_token_provider(
        config: &SheetsApiConfig,
        provider: Arc<dyn AccessTokenProvider>,
    ) -> SourceResult<Self> {
        Self::with_credentials(config, Credentials::Bearer(provider))
    }

    fn with_credentials(config: &SheetsApiConfig, credentials: Credentials) -> SourceResult<Self> {
        let base_url = Url::parse(&config.api_base_url).map_err(|e| SourceError::InvalidConfig {
            field: "sheets.api_base_url".to_string(),
            message: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SourceError::InvalidConfig {
                field: "sheets.api_base_url".to_string(),
                message: format!("'{base_url}' cannot be used as a base URL"),
            });
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("gtin-status/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> SourceResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidConfig {
                field: "sheets.api_base_url".to_string(),
                message: "base URL has no path".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn authorize(&self, request: RequestBuilder) -> SourceResult<RequestBuilder> {
        match &self.credentials {
            Credentials::Bearer(provider) => {
                let token = provider.access_token().await?;
                Ok(request.bearer_auth(token))
            }
            Credentials::ApiKey(key) => Ok(request.query(&[("key", key.as_str())])),
            Credentials::Missing => Err(SourceError::missing_credentials(
                "set sheets.service_account_file, sheets.access_token or sheets.api_key",
            )),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
        sheet_id: &str,
    ) -> SourceResult<T> {
        let request = self.authorize(self.client.get(url).query(query)).await?;
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| SourceError::invalid_response(e.to_string()));
        }

        let message = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SourceError::AuthenticationFailed {
                status: status.as_u16(),
                message,
            },
            StatusCode::NOT_FOUND => SourceError::SheetNotFound {
                sheet_id: sheet_id.to_string(),
            },
            _ => SourceError::Http {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn worksheet_title(&self, sheet_id: &str, worksheet_id: u64) -> SourceResult<String> {
        let url = self.endpoint(&["v4", "spreadsheets", sheet_id])?;
        let metadata: SpreadsheetMetadata = self
            .get_json(url, &[("fields", "sheets.properties(sheetId,title)")], sheet_id)
            .await?;

        metadata
            .sheets
            .into_iter()
            .map(|entry| entry.properties)
            .find(|props| props.sheet_id == worksheet_id)
            .map(|props| props.title)
            .ok_or_else(|| SourceError::WorksheetNotFound {
                sheet_id: sheet_id.to_string(),
                worksheet_id,
            })
    }
}

#[async_trait]
impl SheetFetcher for GoogleSheetsFetcher {
    async fn fetch_rows(&self, sheet_id: &str, worksheet_id: u64) -> SourceResult<Rows> {
        let title = self.worksheet_title(sheet_id, worksheet_id).await?;
        let range = a1_whole_sheet(&title);
        debug!(
            "Fetching worksheet '{}' ({}) from spreadsheet {}",
            title, worksheet_id, sheet_id
        );

        let url = self.endpoint(&["v4", "spreadsheets", sheet_id, "values", &range])?;
        let values: ValueRange = self
            .get_json(
                url,
                &[
                    ("majorDimension", "ROWS"),
                    ("valueRenderOption", "FORMATTED_VALUE"),
                ],
                sheet_id,
            )
            .await?;

        Ok(values
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }
}

/// A1 range covering a whole worksheet, quoting the title
fn a1_whole_sheet(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

fn cell_to_string(cell: serde_json::Value) -> String {
    match cell {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
