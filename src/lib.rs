pub mod cache;
pub mod classifier;
pub mod config;
pub mod countries;
pub mod errors;
pub mod gtin;
pub mod ingestor;
pub mod models;
pub mod services;
pub mod sources;
pub mod web;
