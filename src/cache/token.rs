use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Bearer token as returned by the endpoint, plus the locally stamped
/// absolute expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    /// lifetime reported by the endpoint, in seconds
    pub expires_in: u64,
    /// absolute unix milliseconds; stamped exactly once, at fetch success,
    /// and never recomputed on a cache hit
    #[serde(default)]
    pub expiry: i64,
    /// provider-defined fields (token_type, scope, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Token {
    pub fn stamp_expiry(&mut self, now_millis: i64) {
        self.expiry = now_millis + self.expires_in as i64 * 1000;
    }

    pub fn is_valid_at(&self, now_millis: i64) -> bool {
        now_millis < self.expiry
    }
}

/// Outcome of reading the cached slot. `Corrupt` separates an unreadable blob
/// from plain absence so call sites handle each deliberately.
#[derive(Debug)]
pub enum CacheOutcome {
    Valid(Token),
    Miss,
    Corrupt,
}
