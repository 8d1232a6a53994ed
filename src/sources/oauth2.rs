use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::Client;

use crate::cache::token::Token;
use crate::config::secrets::CredentialPair;
use crate::config::settings::EndpointConfig;
use crate::error::{Error, Result};
use crate::utils::constants::DEFAULT_HTTP_TIMEOUT_MS;

/// Client-credentials token exchange against one fixed endpoint.
#[derive(Debug, Clone)]
pub struct OAuth2Source {
    pub cfg: EndpointConfig,
    pub client: Client,
}

impl OAuth2Source {
    pub fn new(cfg: EndpointConfig) -> Result<Self> {
        let timeout_ms = cfg.timeout_ms.unwrap_or(DEFAULT_HTTP_TIMEOUT_MS);
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { cfg, client })
    }

    /// One POST exchange. Retrying is the caller's concern.
    pub async fn fetch_token(&self, creds: &CredentialPair) -> Result<Token> {
        let form = [
            ("grant_type", "client_credentials"),
            ("scope", self.cfg.scope.as_str()),
        ];
        // .form() supplies Content-Type: application/x-www-form-urlencoded
        let response = self
            .client
            .post(&self.cfg.url)
            .header(AUTHORIZATION, format!("Basic {}", creds.basic_auth()))
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Http { status: response.status().as_u16() });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::Parse {
            context: "token endpoint response",
            message: e.to_string(),
        })
    }
}
