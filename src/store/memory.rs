use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::Result;
use crate::store::TokenStore;

/// In-process store. Holds the same opaque ciphertext as every other backend;
/// clones share the underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryStore {
    async fn get(&self, slot: &str) -> Result<Option<String>> {
        Ok(self.inner.read().await.get(slot).cloned())
    }

    async fn put(&self, slot: &str, ciphertext: &str) -> Result<()> {
        self.inner
            .write()
            .await
            .insert(slot.to_owned(), ciphertext.to_owned());
        Ok(())
    }
}
