//! Centralized error handling for the GTIN status service
//!
//! Two layers of errors exist:
//!
//! - **Source Errors**: failures talking to the spreadsheet backend. These are
//!   absorbed by the refresh scheduler and never reach a lookup caller.
//! - **Application Errors**: conditions surfaced to callers of the service,
//!   such as a request for a country that is not configured.
//!
//! # Usage
//!
//! ```rust
//! use gtin_status::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::unsupported_country("xx"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Source Results
pub type SourceResult<T> = Result<T, SourceError>;
