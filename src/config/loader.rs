use std::fs;
use std::path::Path;

use crate::config::settings::{ServiceConfig, StoreConfig};
use crate::error::{Error, Result};
use crate::utils::constants::{DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY_MS};

/// Load and validate config from YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ServiceConfig> {
    let raw = fs::read_to_string(&path)
        .map_err(|e| Error::config(format!("cannot read config '{}': {e}", path.as_ref().display())))?;
    let config: ServiceConfig =
        serde_yaml::from_str(&raw).map_err(|e| Error::config(format!("invalid config: {e}")))?;
    validate(config)
}

/// Apply defaults and reject configs the refresher cannot run with.
pub fn validate(mut config: ServiceConfig) -> Result<ServiceConfig> {
    if let Some(retry) = config.retry.as_mut() {
        if retry.attempts.is_none() {
            retry.attempts = Some(DEFAULT_RETRY_ATTEMPTS);
        }
        if retry.delay_ms.is_none() {
            retry.delay_ms = Some(DEFAULT_RETRY_DELAY_MS);
        }
    }

    if config.endpoint.url.is_empty() {
        return Err(Error::config("endpoint.url is empty"));
    }
    if config.endpoint.scope.is_empty() {
        return Err(Error::config("endpoint.scope is empty"));
    }
    match &config.store {
        StoreConfig::File { path } if path.is_empty() => {
            return Err(Error::config("store.path is empty"));
        }
        StoreConfig::Http { url } if url.is_empty() => {
            return Err(Error::config("store.url is empty"));
        }
        _ => {}
    }

    Ok(config)
}
