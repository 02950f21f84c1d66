//! Spreadsheet ingestion
//!
//! [`parser`] turns raw worksheet rows into lookup sets and [`scheduler`]
//! drives the periodic fetch-parse-publish cycle.

pub mod parser;
pub mod scheduler;

pub use parser::{ColumnLayout, ParsedDataset, Rows};
pub use scheduler::RefreshScheduler;
