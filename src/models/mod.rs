//! Database row models and configuration records.

pub mod client;
pub mod config;
