use std::fmt;
use std::{env, fs};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Where a credential comes from
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum SecretValue {
    Literal { value: String },
    FromEnv { from_env: String },
    FromFile { path: String },
}

impl SecretValue {
    pub fn resolve(&self, name: &str) -> Result<String> {
        let value = match self {
            SecretValue::Literal { value } => value.to_owned(),
            SecretValue::FromEnv { from_env } => env::var(from_env).map_err(|_| {
                Error::config(format!("environment variable '{from_env}' for {name} is unset"))
            })?,
            SecretValue::FromFile { path } => fs::read_to_string(path)
                .map_err(|e| Error::config(format!("cannot read {name} from '{path}': {e}")))?
                .trim()
                .to_owned(),
        };
        if value.is_empty() {
            return Err(Error::config(format!("{name} resolved to an empty value")));
        }
        Ok(value)
    }
}

/// ================================
/// Credentials
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct CredentialsConfig {
    pub consumer_key: SecretValue,
    pub consumer_secret: SecretValue,
    /// Derive the cache key the way the historic deployment did (digest over
    /// no input). Only for reading caches written by that version.
    #[serde(default)]
    pub legacy_empty_key: bool,
}

impl CredentialsConfig {
    /// Resolved fresh on every refresh cycle; the pair is never persisted.
    pub fn resolve(&self) -> Result<CredentialPair> {
        Ok(CredentialPair {
            consumer_key: self.consumer_key.resolve("consumer key")?,
            consumer_secret: self.consumer_secret.resolve("consumer secret")?,
        })
    }
}

#[derive(Clone)]
pub struct CredentialPair {
    pub consumer_key: String,
    pub consumer_secret: String,
}

impl CredentialPair {
    /// `base64(key:secret)` for the `Authorization: Basic` header.
    pub fn basic_auth(&self) -> String {
        BASE64.encode(format!("{}:{}", self.consumer_key, self.consumer_secret))
    }
}

impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPair")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .finish()
    }
}
