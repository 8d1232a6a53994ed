use serde::Deserialize;

use crate::config::secrets::CredentialsConfig;

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub credentials: CredentialsConfig,
    pub endpoint: EndpointConfig,
    pub store: StoreConfig,
    pub retry: Option<RetryConfig>,
    pub logging: Option<LoggingConfig>,
}

/// ================================
/// Token endpoint
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct EndpointConfig {
    pub url: String,
    pub scope: String,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetryConfig {
    /// when false, a failing fetch propagates immediately after one attempt
    #[serde(default = "default_retry_enabled")]
    pub enabled: bool,
    pub attempts: Option<u32>,
    /// fixed delay between attempts, no exponential growth
    pub delay_ms: Option<u64>,
}

fn default_retry_enabled() -> bool {
    true
}

/// ================================
/// Store backends
/// ================================
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// single fixed file path
    File { path: String },
    /// remote key-value store reachable over HTTP; the slot id becomes the
    /// final path segment
    Http { url: String },
    /// in-process store, mainly for tests and short-lived deployments
    Memory,
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "json".to_string())
            .to_lowercase()
            .as_str()
        {
            "compact" | "text" => LogFormat::Compact,
            _ => LogFormat::Json,
        }
    }
}
