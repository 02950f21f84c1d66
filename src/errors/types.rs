//! Error type definitions for the GTIN status service

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// The requested country has no configured catalog
    #[error("Unsupported country: {code}")]
    UnsupportedCountry { code: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Spreadsheet source errors
///
/// Every variant represents a failed fetch. The refresh scheduler logs them
/// and keeps serving the previously published snapshot.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Neither an access token nor an API key was configured
    #[error("Missing credentials: {message}")]
    MissingCredentials { message: String },

    /// Invalid source configuration
    #[error("Invalid configuration: {field} - {message}")]
    InvalidConfig { field: String, message: String },

    /// The backend rejected the supplied credentials
    #[error("Authentication failed: {status} - {message}")]
    AuthenticationFailed { status: u16, message: String },

    /// The spreadsheet itself does not exist or is not shared with us
    #[error("Spreadsheet not found: {sheet_id}")]
    SheetNotFound { sheet_id: String },

    /// The spreadsheet exists but has no worksheet with the given id
    #[error("Worksheet {worksheet_id} not found in spreadsheet {sheet_id}")]
    WorksheetNotFound { sheet_id: String, worksheet_id: u64 },

    /// The token provider could not produce an access token
    #[error("Access token unavailable: {message}")]
    TokenUnavailable { message: String },

    /// Non-success HTTP status from the backend
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    /// Transport-level failures (DNS, TLS, timeouts, body decoding)
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a payload we could not interpret
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },
}

impl AppError {
    /// Create an unsupported country error
    pub fn unsupported_country<S: Into<String>>(code: S) -> Self {
        Self::UnsupportedCountry { code: code.into() }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl SourceError {
    /// Create a missing credentials error
    pub fn missing_credentials<S: Into<String>>(message: S) -> Self {
        Self::MissingCredentials {
            message: message.into(),
        }
    }

    /// Create a token unavailable error
    pub fn token_unavailable<S: Into<String>>(message: S) -> Self {
        Self::TokenUnavailable {
            message: message.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response<S: Into<String>>(message: S) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}
