//! Service layer
//!
//! Services sit between the web handlers and the snapshot caches and contain
//! no HTTP concerns.

pub mod lookup;

pub use lookup::LookupService;
