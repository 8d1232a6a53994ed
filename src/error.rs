use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for the token refresh cycle.
///
/// `Config` and `RetryExhausted` are always fatal to the current refresh.
/// `Cipher`, and `Store`/`Parse` raised while reading the cached slot, are
/// degraded to a cache miss by the refresher and never reach the caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("token endpoint returned status {status}")]
    Http { status: u16 },

    #[error("failed to parse {context}: {message}")]
    Parse { context: &'static str, message: String },

    #[error("store backend failure: {0}")]
    Store(String),

    #[error("cipher failure: {0}")]
    Cipher(String),

    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("all {attempts} fetch attempts failed: {source}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Error::Store(msg.into())
    }

    pub fn cipher(msg: impl Into<String>) -> Self {
        Error::Cipher(msg.into())
    }
}
