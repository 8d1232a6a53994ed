use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::cache::token::{CacheOutcome, Token};
use crate::config::secrets::{CredentialPair, CredentialsConfig};
use crate::config::settings::{RetryConfig, ServiceConfig};
use crate::crypto::cipher;
use crate::crypto::key::{derive_key, Derivation};
use crate::error::{Error, Result};
use crate::helpers::time::now_millis;
use crate::observability::metrics::get_metrics;
use crate::resilience::retry::RetrySettings;
use crate::sources::oauth2::OAuth2Source;
use crate::store::{build_store, StoreKind, TokenStore};
use crate::utils::constants::{DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY_MS, TOKEN_SLOT_ID};

/// Orchestrates the cached-token lifecycle:
/// load -> validate expiry -> fetch if needed -> stamp expiry -> encrypt -> persist.
///
/// Holds the only cross-call state (via the store) and the single-flight
/// guard serializing concurrent refreshes.
pub struct TokenRefresher<S: TokenStore> {
    credentials: CredentialsConfig,
    source: OAuth2Source,
    store: S,
    retry: RetrySettings,
    should_retry: bool,
    slot: String,
    refresh_lock: Mutex<()>,
}

impl TokenRefresher<StoreKind> {
    pub fn from_config(cfg: &ServiceConfig) -> Result<Self> {
        let store = build_store(&cfg.store)?;
        let source = OAuth2Source::new(cfg.endpoint.clone())?;
        Ok(Self::new(cfg.credentials.clone(), source, store, cfg.retry.as_ref()))
    }
}

impl<S: TokenStore> TokenRefresher<S> {
    pub fn new(
        credentials: CredentialsConfig,
        source: OAuth2Source,
        store: S,
        retry: Option<&RetryConfig>,
    ) -> Self {
        let should_retry = retry.map(|r| r.enabled).unwrap_or(true);
        let retry = RetrySettings {
            attempts: retry.and_then(|r| r.attempts).unwrap_or(DEFAULT_RETRY_ATTEMPTS),
            delay_ms: retry.and_then(|r| r.delay_ms).unwrap_or(DEFAULT_RETRY_DELAY_MS),
        };
        Self {
            credentials,
            source,
            store,
            retry,
            should_retry,
            slot: TOKEN_SLOT_ID.to_owned(),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Return the cached token if still valid, otherwise fetch, stamp the
    /// expiry and persist the encrypted result.
    ///
    /// Concurrent callers serialize on the refresh lock; whoever arrives
    /// while a fetch is in flight finds the winner's token in the cache
    /// instead of issuing a duplicate exchange.
    pub async fn refresh(&self) -> Result<Token> {
        let metrics = get_metrics().await;
        metrics.refresh_requests.inc();

        // resolved fresh every cycle, never held across calls
        let creds = self.credentials.resolve()?;
        let derivation = if self.credentials.legacy_empty_key {
            Derivation::LegacyEmptyDigest
        } else {
            Derivation::Concat
        };
        let key = derive_key(&creds, derivation)?;

        let _guard = self.refresh_lock.lock().await;

        match self.load_cached(&key).await {
            CacheOutcome::Valid(token) => {
                metrics.cache_hits.inc();
                debug!("cached token valid until {}", token.expiry);
                return Ok(token);
            }
            CacheOutcome::Miss => {
                metrics.cache_misses.inc();
            }
            CacheOutcome::Corrupt => {
                metrics.cache_corrupt.inc();
                warn!("cached token blob is unreadable, treating as miss");
            }
        }

        let mut token = self.fetch(&creds).await?;
        token.stamp_expiry(now_millis());
        info!("fetched new token, expires_in {}s", token.expires_in);

        if let Err(e) = self.persist(&token, &key).await {
            // the caller already holds a usable credential; do not discard it
            metrics.store_write_failures.inc();
            error!("failed to persist refreshed token: {e}");
        }

        Ok(token)
    }

    async fn fetch(&self, creds: &CredentialPair) -> Result<Token> {
        let metrics = get_metrics().await;
        metrics.fetch_requests.inc();
        let start = Instant::now();

        let result = if self.should_retry && self.retry.attempts >= 1 {
            self.retry
                .run_with_retry(|| self.source.fetch_token(creds))
                .await
        } else {
            self.source.fetch_token(creds).await
        };

        metrics.fetch_duration.observe(start.elapsed().as_secs_f64());
        if result.is_err() {
            metrics.fetch_failures.inc();
        }
        result
    }

    /// Classify the cached slot. Every read failure degrades to a miss:
    /// store I/O and decryption produce no usable token, and an unparsable
    /// decrypted payload is just another corrupt blob.
    async fn load_cached(&self, key: &[u8; 32]) -> CacheOutcome {
        let blob = match self.store.get(&self.slot).await {
            Ok(Some(blob)) => blob,
            Ok(None) => return CacheOutcome::Miss,
            Err(e) => {
                get_metrics().await.store_read_failures.inc();
                warn!("store read failed, treating as miss: {e}");
                return CacheOutcome::Miss;
            }
        };

        let plaintext = match cipher::decrypt(&blob, key) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                debug!("cached blob failed to decrypt: {e}");
                return CacheOutcome::Corrupt;
            }
        };

        let token: Token = match serde_json::from_str(&plaintext) {
            Ok(token) => token,
            Err(e) => {
                debug!("cached payload failed to parse: {e}");
                return CacheOutcome::Corrupt;
            }
        };

        if token.is_valid_at(now_millis()) {
            CacheOutcome::Valid(token)
        } else {
            debug!("cached token expired at {}", token.expiry);
            CacheOutcome::Miss
        }
    }

    async fn persist(&self, token: &Token, key: &[u8; 32]) -> Result<()> {
        let plaintext = serde_json::to_string(token).map_err(|e| Error::Parse {
            context: "token serialization",
            message: e.to_string(),
        })?;
        let blob = cipher::encrypt(&plaintext, key);
        self.store.put(&self.slot, &blob).await
    }
}
