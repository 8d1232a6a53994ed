// tests/common/mod.rs
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;

use axum::Router;

use crate::config::secrets::{CredentialsConfig, SecretValue};
use crate::config::settings::{EndpointConfig, RetryConfig};
use crate::refresh::refresher::TokenRefresher;
use crate::sources::oauth2::OAuth2Source;
use crate::store::TokenStore;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn static_credentials(key: &str, secret: &str) -> CredentialsConfig {
    CredentialsConfig {
        consumer_key: SecretValue::Literal { value: key.to_owned() },
        consumer_secret: SecretValue::Literal { value: secret.to_owned() },
        legacy_empty_key: false,
    }
}

pub fn endpoint(url: &str) -> EndpointConfig {
    EndpointConfig {
        url: url.to_owned(),
        scope: "default".to_owned(),
        timeout_ms: Some(2000),
    }
}

/// Refresher against `url` with literal `k1`/`s1` credentials and short
/// retry delays so failure tests stay fast.
pub fn build_refresher<S: TokenStore>(
    url: &str,
    store: S,
    retry: Option<RetryConfig>,
) -> TokenRefresher<S> {
    let source = OAuth2Source::new(endpoint(url)).expect("build source");
    TokenRefresher::new(static_credentials("k1", "s1"), source, store, retry.as_ref())
}

pub fn fast_retry(enabled: bool, attempts: u32) -> RetryConfig {
    RetryConfig {
        enabled,
        attempts: Some(attempts),
        delay_ms: Some(10),
    }
}
