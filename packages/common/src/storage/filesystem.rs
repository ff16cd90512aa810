use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::error::StorageError;
use super::hash::OwnerKey;
use super::key::validate_fragment_id;
use super::record::FragmentMetadata;
use super::traits::FragmentStore;

const METADATA_EXT: &str = ".json";
const DATA_EXT: &str = ".bin";

/// Filesystem-backed fragment store.
///
/// Each owner gets one directory named after the hex digest of its owner id:
/// `{base_path}/{owner key}/{id}.json` holds the metadata record and
/// `{base_path}/{owner key}/{id}.bin` holds the raw bytes. Files are written to
/// `{base_path}/.tmp` first and renamed into place, so a reader never sees a
/// half-written file.
pub struct FilesystemFragmentStore {
    base_path: PathBuf,
    max_size: u64,
}

impl FilesystemFragmentStore {
    /// Create a new filesystem fragment store.
    pub async fn new(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            max_size,
        })
    }

    fn owner_dir(&self, owner_id: &str) -> PathBuf {
        self.base_path.join(OwnerKey::compute(owner_id).to_hex())
    }

    fn entry_path(&self, owner_id: &str, id: &str, ext: &str) -> Result<PathBuf, StorageError> {
        let id = validate_fragment_id(id)
            .map_err(|e| StorageError::InvalidKey(format!("{}: {id:?}", e.message())))?;
        Ok(self.owner_dir(owner_id).join(format!("{id}{ext}")))
    }

    /// The path for a lookup. Ids that could never have been written resolve
    /// to `None` so reads and deletes treat them as absent.
    fn lookup_path(&self, owner_id: &str, id: &str, ext: &str) -> Option<PathBuf> {
        match self.entry_path(owner_id, id, ext) {
            Ok(path) => Some(path),
            Err(e) => {
                debug!(error = %e, "filesystem store: lookup of unstorable id");
                None
            }
        }
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }

    async fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, bytes).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = fs::rename(&temp_path, path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(())
    }

    async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove_optional(path: &Path) -> Result<bool, StorageError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl FragmentStore for FilesystemFragmentStore {
    async fn write_metadata(
        &self,
        owner_id: &str,
        id: &str,
        record: &FragmentMetadata,
    ) -> Result<(), StorageError> {
        let path = self.entry_path(owner_id, id, METADATA_EXT)?;
        let bytes = serde_json::to_vec(record)?;
        self.write_atomic(&path, &bytes).await?;
        debug!(id, path = %path.display(), "filesystem store: wrote metadata");
        Ok(())
    }

    async fn read_metadata(
        &self,
        owner_id: &str,
        id: &str,
    ) -> Result<Option<FragmentMetadata>, StorageError> {
        let Some(path) = self.lookup_path(owner_id, id, METADATA_EXT) else {
            return Ok(None);
        };
        match Self::read_optional(&path).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn max_data_size(&self) -> u64 {
        self.max_size
    }

    async fn write_data(&self, owner_id: &str, id: &str, data: &[u8]) -> Result<(), StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let path = self.entry_path(owner_id, id, DATA_EXT)?;
        self.write_atomic(&path, data).await?;
        debug!(id, bytes = data.len(), "filesystem store: wrote data");
        Ok(())
    }

    async fn read_data(&self, owner_id: &str, id: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let Some(path) = self.lookup_path(owner_id, id, DATA_EXT) else {
            return Ok(None);
        };
        Self::read_optional(&path).await
    }

    async fn list_ids(&self, owner_id: &str) -> Result<Vec<String>, StorageError> {
        let mut entries = match fs::read_dir(self.owner_dir(owner_id)).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.strip_suffix(METADATA_EXT))
            {
                ids.push(id.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    async fn delete(&self, owner_id: &str, id: &str) -> Result<(), StorageError> {
        let (Some(metadata_path), Some(data_path)) = (
            self.lookup_path(owner_id, id, METADATA_EXT),
            self.lookup_path(owner_id, id, DATA_EXT),
        ) else {
            return Err(StorageError::not_found(owner_id, id));
        };

        let had_metadata = Self::remove_optional(&metadata_path).await?;
        let had_data = Self::remove_optional(&data_path).await?;

        if had_metadata || had_data {
            debug!(id, "filesystem store: deleted");
            Ok(())
        } else {
            Err(StorageError::not_found(owner_id, id))
        }
    }
}
