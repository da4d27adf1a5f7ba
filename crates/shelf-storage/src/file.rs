//! JSON file cart store

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use shelf_core::Cart;
use tracing::{debug, warn};

use crate::store::CartStore;
use crate::{Result, StorageError};

/// Cart persisted as a single JSON file.
///
/// Writes go through a temp file and a rename, so readers never observe a
/// half-written cart. The version compare and the rename are not one atomic
/// step; two processes writing at the same instant can still interleave.
pub struct FileCartStore {
    path: PathBuf,
}

impl FileCartStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open the store at the platform data directory (`.../shelf/cart.json`)
    pub fn open_default() -> Self {
        Self::new(Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "shelf", "shelf") {
            dirs.data_dir().join("cart.json")
        } else {
            PathBuf::from("~/.shelf/cart.json")
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Cart> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Cart::default()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Cart::default());
        }

        match Cart::parse(&content) {
            Ok(cart) => Ok(cart),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring corrupt cart file");
                Ok(Cart::default())
            }
        }
    }
}

#[async_trait]
impl CartStore for FileCartStore {
    async fn load(&self) -> Result<Cart> {
        self.read().await
    }

    async fn save(&self, cart: &Cart, expected_version: u64) -> Result<u64> {
        let current = self.read().await?;
        if current.version != expected_version {
            return Err(StorageError::Conflict {
                expected: expected_version,
                found: current.version,
            });
        }

        let next = Cart {
            version: expected_version + 1,
            items: cart.items.clone(),
        };
        let content = serde_json::to_string_pretty(&next)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), version = next.version, "cart saved");
        Ok(next.version)
    }
}
