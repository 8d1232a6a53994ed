use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::error::{Error, Result};
use crate::store::TokenStore;
use crate::utils::constants::DEFAULT_HTTP_TIMEOUT_MS;

/// Remote key-value store reachable over HTTP: `GET`/`PUT` on
/// `<base_url>/<slot>`. The composite of base URL and slot id is fixed per
/// deployment, mirroring a remote table with one well-known record.
#[derive(Debug, Clone)]
pub struct HttpStore {
    base_url: String,
    client: Client,
}

impl HttpStore {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(DEFAULT_HTTP_TIMEOUT_MS))
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client,
        })
    }

    fn slot_url(&self, slot: &str) -> String {
        format!("{}/{}", self.base_url, slot)
    }
}

impl TokenStore for HttpStore {
    async fn get(&self, slot: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(self.slot_url(slot))
            .send()
            .await
            .map_err(|e| Error::store(format!("GET '{slot}': {e}")))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Error::store(format!("GET '{slot}': status {}", response.status())));
        }
        let body = response
            .text()
            .await
            .map_err(|e| Error::store(format!("GET '{slot}': {e}")))?;
        if body.is_empty() {
            Ok(None)
        } else {
            Ok(Some(body))
        }
    }

    async fn put(&self, slot: &str, ciphertext: &str) -> Result<()> {
        let response = self
            .client
            .put(self.slot_url(slot))
            .body(ciphertext.to_owned())
            .send()
            .await
            .map_err(|e| Error::store(format!("PUT '{slot}': {e}")))?;

        if !response.status().is_success() {
            return Err(Error::store(format!("PUT '{slot}': status {}", response.status())));
        }
        Ok(())
    }
}
