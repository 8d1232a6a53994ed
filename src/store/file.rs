use std::io::ErrorKind;
use std::path::PathBuf;

use tokio::fs;

use crate::error::{Error, Result};
use crate::store::TokenStore;

/// Single fixed path; the slot id is implied by the path itself.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileStore {
    async fn get(&self, _slot: &str) -> Result<Option<String>> {
        match fs::read_to_string(&self.path).await {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::store(format!("read '{}': {e}", self.path.display()))),
        }
    }

    async fn put(&self, _slot: &str, ciphertext: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| Error::store(format!("create '{}': {e}", parent.display())))?;
            }
        }
        fs::write(&self.path, ciphertext.as_bytes())
            .await
            .map_err(|e| Error::store(format!("write '{}': {e}", self.path.display())))
    }
}
