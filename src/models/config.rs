//! Configuration model loaded from external sources.

use serde::Deserialize;

fn default_api_prefix() -> String {
    "/v1".to_string()
}

fn default_slow_query_ms() -> u64 {
    1000
}

#[derive(Clone, Debug, Deserialize)]
/// Server settings shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// Version prefix every route is mounted under.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Statements slower than this are logged as warnings.
    #[serde(default = "default_slow_query_ms")]
    pub slow_query_ms: u64,
}
