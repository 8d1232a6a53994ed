//! Shared constants and invariants

/// The single cache slot per deployment. No per-scope or per-audience keying.
pub const TOKEN_SLOT_ID: &str = "api_token";

pub const DEFAULT_RETRY_ATTEMPTS: u32 = 2;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 3000;
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;
