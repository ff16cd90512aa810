use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::storage::filesystem::FilesystemFragmentStore;
use crate::storage::memory::MemoryFragmentStore;
use crate::storage::{FragmentStore, StorageError};

/// Which storage backend to construct.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-lifetime maps; everything is lost on exit.
    Memory,
    /// Durable files under `storage.path`.
    Filesystem,
}

/// App-level storage configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageAppConfig {
    /// Backend kind. Default: filesystem.
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,
    /// Base directory for the filesystem backend. Default: "./data/fragments".
    #[serde(default = "default_path")]
    pub path: PathBuf,
    /// Largest accepted fragment body in bytes. Default: 5 MiB.
    #[serde(default = "default_max_fragment_size")]
    pub max_fragment_size: u64,
}

fn default_backend() -> StorageBackend {
    StorageBackend::Filesystem
}
fn default_path() -> PathBuf {
    PathBuf::from("./data/fragments")
}
fn default_max_fragment_size() -> u64 {
    5 * 1024 * 1024
}

impl Default for StorageAppConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: default_path(),
            max_fragment_size: default_max_fragment_size(),
        }
    }
}

impl StorageAppConfig {
    /// Construct the configured backend.
    pub async fn open(&self) -> Result<Arc<dyn FragmentStore>, StorageError> {
        match self.backend {
            StorageBackend::Memory => {
                info!("Using in-memory fragment store");
                Ok(Arc::new(MemoryFragmentStore::new()))
            }
            StorageBackend::Filesystem => {
                info!(path = %self.path.display(), "Using filesystem fragment store");
                let store =
                    FilesystemFragmentStore::new(self.path.clone(), self.max_fragment_size).await?;
                Ok(Arc::new(store))
            }
        }
    }
}
