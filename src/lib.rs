//! # Token Keeper Library
//!
//! Obtains an OAuth2 client-credentials bearer token, caches it encrypted
//! at rest, and refreshes it once expired. The token never touches a store
//! in plaintext; every backend holds the same opaque `iv:ciphertext` blob.
//!
//! Modules:
//! - `config` — service configuration and credential sources
//! - `crypto` — key derivation and the at-rest cipher
//! - `cache` — token model and cache-read outcome
//! - `store` — pluggable ciphertext stores (file, HTTP key-value, memory)
//! - `sources` — OAuth2 token endpoint client
//! - `resilience` — bounded fixed-delay retry
//! - `refresh` — the refresh orchestrator

pub mod cache;
pub mod config;
pub mod crypto;
pub mod error;
pub mod helpers;
pub mod observability;
pub mod refresh;
pub mod resilience;
pub mod sources;
pub mod store;
pub mod tests;
pub mod utils;

pub use crate::cache::token::Token;
pub use crate::config::loader::load_config;
pub use crate::config::settings::ServiceConfig;
pub use crate::error::{Error, Result};
pub use crate::refresh::refresher::TokenRefresher;
