use async_trait::async_trait;

use super::error::StorageError;
use super::record::FragmentMetadata;

/// Owner-partitioned fragment storage.
///
/// Every fragment is addressed by `(owner_id, id)` in two parallel namespaces:
/// the metadata record and the raw data bytes. Writes are upserts. Reads of a
/// missing key return `Ok(None)` rather than an error, so callers can tell
/// "never stored" apart from a backend failure.
///
/// Metadata and data are written by separate calls. Nothing here makes the
/// pair transactional: a reader running between the two writes can observe a
/// new record alongside old (or missing) bytes.
#[async_trait]
pub trait FragmentStore: Send + Sync {
    /// Insert or replace the metadata record for `(owner_id, id)`.
    async fn write_metadata(
        &self,
        owner_id: &str,
        id: &str,
        record: &FragmentMetadata,
    ) -> Result<(), StorageError>;

    /// Read the metadata record for `(owner_id, id)`.
    ///
    /// Ids the backend could never store read as `None`, the same as ids that
    /// were never written.
    async fn read_metadata(
        &self,
        owner_id: &str,
        id: &str,
    ) -> Result<Option<FragmentMetadata>, StorageError>;

    /// Largest data payload [`write_data`](Self::write_data) accepts, in bytes.
    ///
    /// Callers that write metadata before data check this first so an
    /// oversized payload is rejected before anything is written.
    fn max_data_size(&self) -> u64 {
        u64::MAX
    }

    /// Insert or replace the raw bytes for `(owner_id, id)`.
    async fn write_data(&self, owner_id: &str, id: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Read the raw bytes for `(owner_id, id)`.
    async fn read_data(&self, owner_id: &str, id: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// All fragment ids stored for `owner_id`, each exactly once.
    ///
    /// An owner with no fragments yields an empty list.
    async fn list_ids(&self, owner_id: &str) -> Result<Vec<String>, StorageError>;

    /// The metadata records for every id returned by [`list_ids`](Self::list_ids).
    async fn list_metadata(&self, owner_id: &str) -> Result<Vec<FragmentMetadata>, StorageError> {
        let mut records = Vec::new();
        for id in self.list_ids(owner_id).await? {
            if let Some(record) = self.read_metadata(owner_id, &id).await? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Remove both metadata and data for `(owner_id, id)`.
    ///
    /// Afterwards both namespaces are empty for the key. Returns
    /// [`StorageError::NotFound`] if neither held anything.
    async fn delete(&self, owner_id: &str, id: &str) -> Result<(), StorageError>;
}
