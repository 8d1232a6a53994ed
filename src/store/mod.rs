/// Store module
///
/// Capability contract over the single cache slot, independent of medium,
/// plus a factory to build a backend from config. Values are opaque
/// ciphertext; no backend ever sees plaintext structure.

use crate::config::settings::StoreConfig;
use crate::error::Result;

pub mod file;
pub mod http;
pub mod memory;

use file::FileStore;
use http::HttpStore;
use memory::MemoryStore;

pub trait TokenStore {
    fn get(&self, slot: &str) -> impl std::future::Future<Output = Result<Option<String>>> + Send;

    fn put(
        &self,
        slot: &str,
        ciphertext: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[derive(Debug, Clone)]
pub enum StoreKind {
    File(FileStore),
    Http(HttpStore),
    Memory(MemoryStore),
}

impl TokenStore for StoreKind {
    async fn get(&self, slot: &str) -> Result<Option<String>> {
        match self {
            StoreKind::File(s) => s.get(slot).await,
            StoreKind::Http(s) => s.get(slot).await,
            StoreKind::Memory(s) => s.get(slot).await,
        }
    }

    async fn put(&self, slot: &str, ciphertext: &str) -> Result<()> {
        match self {
            StoreKind::File(s) => s.put(slot, ciphertext).await,
            StoreKind::Http(s) => s.put(slot, ciphertext).await,
            StoreKind::Memory(s) => s.put(slot, ciphertext).await,
        }
    }
}

pub fn build_store(cfg: &StoreConfig) -> Result<StoreKind> {
    match cfg {
        StoreConfig::File { path } => Ok(StoreKind::File(FileStore::new(path))),
        StoreConfig::Http { url } => Ok(StoreKind::Http(HttpStore::new(url)?)),
        StoreConfig::Memory => Ok(StoreKind::Memory(MemoryStore::new())),
    }
}
