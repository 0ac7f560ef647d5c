// lib.rs
// Async client library for the TShock REST API

pub mod client;
pub mod config;
pub mod defs;
pub mod error;
pub mod request;

pub use client::TShock;
pub use config::ClientConfig;
pub use defs::{BanLookupType, StatusFilters, UserLookupType};
pub use error::RestError;
