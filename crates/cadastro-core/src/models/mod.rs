//! Data models: the extracted record and engine configuration.

pub mod config;
pub mod record;
