//! Portal configuration and logging setup.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

pub const APP_NAME: &str = "Testing Portal";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_GRAPHQL_URL: &str = "http://localhost:8080/graphql";
pub const DEFAULT_PXP_URL: &str = "http://localhost:8080/pxp";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_FILTER: &str = "info,portal_core=debug";

/// Runtime configuration for the network clients and logging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PortalConfig {
    /// GraphQL endpoint for patient mutations
    pub graphql_url: String,
    /// Base URL of the patient experience API
    pub pxp_url: String,
    /// HTTP request timeout
    pub timeout_secs: u64,
    /// Bearer token for the GraphQL API
    pub auth_token: Option<String>,
    /// `tracing` filter directive
    pub log_filter: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            pxp_url: DEFAULT_PXP_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            auth_token: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl PortalConfig {
    /// Defaults overridden by `PORTAL_*` environment variables and `RUST_LOG`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parse a JSON configuration document; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup("PORTAL_GRAPHQL_URL") {
            config.graphql_url = url;
        }
        if let Some(url) = lookup("PORTAL_PXP_URL") {
            config.pxp_url = url;
        }
        if let Some(secs) = lookup("PORTAL_HTTP_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            config.timeout_secs = secs;
        }
        if let Some(token) = lookup("PORTAL_AUTH_TOKEN").filter(|t| !t.is_empty()) {
            config.auth_token = Some(token);
        }
        if let Some(filter) = lookup("RUST_LOG") {
            config.log_filter = filter;
        }
        config
    }
}

/// Install the global fmt subscriber. Later calls are no-ops.
pub fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // try_init fails only when a subscriber is already installed
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
