//! Spreadsheet data sources
//!
//! The refresh scheduler only depends on the [`SheetFetcher`] trait, so tests
//! and alternative backends can be swapped in without touching the cache.

use async_trait::async_trait;

use crate::errors::SourceResult;
use crate::ingestor::parser::Rows;

pub mod auth;
pub mod google_sheets;

pub use auth::{AccessTokenProvider, ServiceAccountTokens, StaticToken};
pub use google_sheets::GoogleSheetsFetcher;

/// Capability to read every row of one worksheet.
///
/// Row 0 of the result is the header row. Cells are returned as displayed in
/// the spreadsheet; trailing empty cells may be omitted, so rows can differ in
/// length.
#[async_trait]
pub trait SheetFetcher: Send + Sync {
    async fn fetch_rows(&self, sheet_id: &str, worksheet_id: u64) -> SourceResult<Rows>;
}
