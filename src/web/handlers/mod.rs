//! HTTP request handlers organized by resource

pub mod countries;
pub mod gtin;
pub mod health;
