use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tracing::info;

pub mod defaults;
pub mod duration_serde;

use crate::countries::Country;
use crate::errors::{AppError, AppResult};
use defaults::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub sheets: SheetsApiConfig,
    #[serde(default = "default_countries")]
    pub countries: Vec<CountryConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Connection settings for the Google Sheets REST API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsApiConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(
        default = "default_request_timeout",
        with = "duration_serde::duration"
    )]
    pub request_timeout: Duration,
    /// Service-account JSON key; tokens minted from it are renewed before expiry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_file: Option<String>,
    /// Fixed OAuth bearer token, used when no key file is set. It is never renewed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// A country served by the lookup API.
///
/// Countries without a `sheet` are served from a permanently empty snapshot,
/// so every lookup for them classifies as red.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryConfig {
    pub code: Country,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<SheetSourceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetSourceConfig {
    pub sheet_id: String,
    pub register_worksheet: u64,
    pub catalog_worksheet: u64,
    #[serde(
        default = "default_refresh_interval",
        with = "duration_serde::duration"
    )]
    pub refresh_interval: Duration,
    #[serde(default)]
    pub columns: RegisterColumns,
}

/// Header names looked up in the register sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterColumns {
    #[serde(default = "default_uploaded_to_catalog_column")]
    pub uploaded_to_catalog: String,
    #[serde(default = "default_uploaded_to_register_column")]
    pub uploaded_to_register: String,
    #[serde(default = "default_name_column")]
    pub name: String,
}

// Web defaults
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

// Sheets defaults
fn default_api_base_url() -> String {
    DEFAULT_SHEETS_API_BASE_URL.to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(DEFAULT_SHEETS_REQUEST_TIMEOUT_SECS)
}

fn default_refresh_interval() -> Duration {
    Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS)
}

fn default_uploaded_to_catalog_column() -> String {
    DEFAULT_UPLOADED_TO_CATALOG_COLUMN.to_string()
}

fn default_uploaded_to_register_column() -> String {
    DEFAULT_UPLOADED_TO_REGISTER_COLUMN.to_string()
}

fn default_name_column() -> String {
    DEFAULT_NAME_COLUMN.to_string()
}

fn default_countries() -> Vec<CountryConfig> {
    vec![CountryConfig {
        code: Country::Sweden,
        sheet: Some(SheetSourceConfig {
            sheet_id: DEFAULT_SE_SHEET_ID.to_string(),
            register_worksheet: DEFAULT_SE_REGISTER_WORKSHEET,
            catalog_worksheet: DEFAULT_SE_CATALOG_WORKSHEET,
            refresh_interval: default_refresh_interval(),
            columns: RegisterColumns::default(),
        }),
    }]
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for SheetsApiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout: default_request_timeout(),
            service_account_file: None,
            access_token: None,
            api_key: None,
        }
    }
}

impl Default for RegisterColumns {
    fn default() -> Self {
        Self {
            uploaded_to_catalog: default_uploaded_to_catalog_column(),
            uploaded_to_register: default_uploaded_to_register_column(),
            name: default_name_column(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web: WebConfig::default(),
            sheets: SheetsApiConfig::default(),
            countries: default_countries(),
        }
    }
}

impl Config {
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        let config = if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            toml::from_str::<Self>(&contents)?
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
            default_config
        };

        config.validate()?;
        Ok(config)
    }

    /// Fill credentials missing from the file from the environment
    pub fn apply_credential_env(&mut self) {
        let sheets = &mut self.sheets;
        if sheets.service_account_file.is_none() {
            sheets.service_account_file = non_empty_env(SERVICE_ACCOUNT_FILE_ENV);
        }
        if sheets.access_token.is_none() {
            sheets.access_token = non_empty_env(ACCESS_TOKEN_ENV);
        }
        if sheets.api_key.is_none() {
            sheets.api_key = non_empty_env(API_KEY_ENV);
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        let mut seen = HashSet::new();
        for country in &self.countries {
            if !seen.insert(country.code) {
                return Err(AppError::configuration(format!(
                    "country '{}' is configured more than once",
                    country.code
                )));
            }

            if let Some(sheet) = &country.sheet {
                if sheet.sheet_id.trim().is_empty() {
                    return Err(AppError::configuration(format!(
                        "country '{}' has an empty sheet_id",
                        country.code
                    )));
                }
                if sheet.refresh_interval.is_zero() {
                    return Err(AppError::configuration(format!(
                        "country '{}' has a zero refresh_interval",
                        country.code
                    )));
                }
            }
        }

        Ok(())
    }
}
