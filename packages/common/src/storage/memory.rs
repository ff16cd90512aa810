use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use super::error::StorageError;
use super::record::FragmentMetadata;
use super::traits::FragmentStore;

#[derive(Debug, Default)]
struct Partition {
    metadata: BTreeMap<String, FragmentMetadata>,
    data: HashMap<String, Vec<u8>>,
}

impl Partition {
    fn is_empty(&self) -> bool {
        self.metadata.is_empty() && self.data.is_empty()
    }
}

/// Process-lifetime fragment store.
///
/// State is sharded per owner, so operations for different owners never
/// contend on the same lock. Ids are listed in ascending order; with UUIDv7
/// ids that is creation order. Everything is lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryFragmentStore {
    partitions: DashMap<String, Partition>,
}

impl MemoryFragmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FragmentStore for MemoryFragmentStore {
    async fn write_metadata(
        &self,
        owner_id: &str,
        id: &str,
        record: &FragmentMetadata,
    ) -> Result<(), StorageError> {
        debug!(id, "memory store: write metadata");
        self.partitions
            .entry(owner_id.to_string())
            .or_default()
            .metadata
            .insert(id.to_string(), record.clone());
        Ok(())
    }

    async fn read_metadata(
        &self,
        owner_id: &str,
        id: &str,
    ) -> Result<Option<FragmentMetadata>, StorageError> {
        Ok(self
            .partitions
            .get(owner_id)
            .and_then(|p| p.metadata.get(id).cloned()))
    }

    async fn write_data(&self, owner_id: &str, id: &str, data: &[u8]) -> Result<(), StorageError> {
        debug!(id, bytes = data.len(), "memory store: write data");
        self.partitions
            .entry(owner_id.to_string())
            .or_default()
            .data
            .insert(id.to_string(), data.to_vec());
        Ok(())
    }

    async fn read_data(&self, owner_id: &str, id: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self
            .partitions
            .get(owner_id)
            .and_then(|p| p.data.get(id).cloned()))
    }

    async fn list_ids(&self, owner_id: &str) -> Result<Vec<String>, StorageError> {
        Ok(self
            .partitions
            .get(owner_id)
            .map(|p| p.metadata.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn list_metadata(&self, owner_id: &str) -> Result<Vec<FragmentMetadata>, StorageError> {
        Ok(self
            .partitions
            .get(owner_id)
            .map(|p| p.metadata.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn delete(&self, owner_id: &str, id: &str) -> Result<(), StorageError> {
        let Some(mut partition) = self.partitions.get_mut(owner_id) else {
            return Err(StorageError::not_found(owner_id, id));
        };

        let had_metadata = partition.metadata.remove(id).is_some();
        let had_data = partition.data.remove(id).is_some();
        drop(partition);

        self.partitions.remove_if(owner_id, |_, p| p.is_empty());

        if had_metadata || had_data {
            debug!(id, "memory store: deleted");
            Ok(())
        } else {
            Err(StorageError::not_found(owner_id, id))
        }
    }
}
