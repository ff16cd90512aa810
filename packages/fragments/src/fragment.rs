use chrono::{DateTime, TimeDelta, Utc};
use common::{FragmentMetadata, FragmentStore, StorageError};
use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::error::{FragmentError, Result};
use crate::types::{self, MediaType};

/// One owner-scoped fragment: its validated metadata plus data access.
///
/// A `Fragment` is a transient value. The store passed to each method owns the
/// persisted state; the fragment only mirrors the last record it wrote or read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    metadata: FragmentMetadata,
    media_type: MediaType,
}

/// The result of listing an owner's fragments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FragmentList {
    Ids(Vec<String>),
    Expanded(Vec<Fragment>),
}

impl FragmentList {
    pub fn len(&self) -> usize {
        match self {
            Self::Ids(ids) => ids.len(),
            Self::Expanded(fragments) => fragments.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn validate(owner_id: &str, content_type: &str) -> Result<MediaType> {
    if owner_id.is_empty() {
        return Err(FragmentError::Validation("ownerId is required".into()));
    }
    if content_type.trim().is_empty() {
        return Err(FragmentError::Validation("type is required".into()));
    }
    MediaType::parse(content_type).ok_or_else(|| {
        let shown = types::base_type(content_type).unwrap_or_else(|| content_type.to_string());
        FragmentError::Validation(format!("the '{shown}' MIME type is not supported"))
    })
}

/// A timestamp strictly later than `previous`, even if the clock has not moved.
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + TimeDelta::nanoseconds(1)
    }
}

impl Fragment {
    /// A fresh fragment with a new id, zero size and both timestamps set to now.
    pub fn new(owner_id: impl Into<String>, content_type: impl Into<String>) -> Result<Self> {
        let owner_id = owner_id.into();
        let content_type = content_type.into();
        let media_type = validate(&owner_id, &content_type)?;
        let now = Utc::now();

        Ok(Self {
            metadata: FragmentMetadata {
                id: Uuid::now_v7().to_string(),
                owner_id,
                created: now,
                updated: now,
                content_type,
                size: 0,
            },
            media_type,
        })
    }

    /// Rebuild a fragment from a stored record, re-checking its invariants.
    pub fn from_metadata(metadata: FragmentMetadata) -> Result<Self> {
        if metadata.id.is_empty() {
            return Err(FragmentError::Validation("id must not be empty".into()));
        }
        let media_type = validate(&metadata.owner_id, &metadata.content_type)?;
        Ok(Self {
            metadata,
            media_type,
        })
    }

    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    pub fn owner_id(&self) -> &str {
        &self.metadata.owner_id
    }

    /// The declared Content-Type, parameters included.
    pub fn content_type(&self) -> &str {
        &self.metadata.content_type
    }

    pub fn size(&self) -> u64 {
        self.metadata.size
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.metadata.created
    }

    pub fn updated(&self) -> DateTime<Utc> {
        self.metadata.updated
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// The base MIME type: `text/html; charset=utf-8` -> `text/html`.
    pub fn mime_type(&self) -> &'static str {
        self.media_type.as_str()
    }

    pub fn is_text(&self) -> bool {
        self.media_type.is_text()
    }

    /// MIME types this fragment can be rendered as, its own type included.
    pub fn formats(&self) -> Vec<&'static str> {
        types::available_representations(self.mime_type())
            .into_iter()
            .map(|t| t.as_str())
            .collect()
    }

    pub fn metadata(&self) -> &FragmentMetadata {
        &self.metadata
    }

    pub fn into_metadata(self) -> FragmentMetadata {
        self.metadata
    }

    /// Refresh `updated` and write the metadata record.
    pub async fn save(&mut self, store: &dyn FragmentStore) -> Result<()> {
        self.metadata.updated = next_timestamp(self.metadata.updated);
        store
            .write_metadata(&self.metadata.owner_id, &self.metadata.id, &self.metadata)
            .await?;
        Ok(())
    }

    /// The stored bytes, or `None` if nothing is stored for this fragment.
    pub async fn get_data(&self, store: &dyn FragmentStore) -> Result<Option<Vec<u8>>> {
        Ok(store
            .read_data(&self.metadata.owner_id, &self.metadata.id)
            .await?)
    }

    /// Replace the fragment's data.
    ///
    /// Data larger than the store's [`max_data_size`](FragmentStore::max_data_size)
    /// is rejected before anything is written. Otherwise updates `size`, saves
    /// the metadata, then writes the bytes. These are two separate store
    /// writes: if the second fails or a reader runs in between, the new
    /// `size`/`updated` can be seen next to the previous bytes.
    pub async fn set_data(&mut self, store: &dyn FragmentStore, data: &[u8]) -> Result<()> {
        let size = data.len() as u64;
        let limit = store.max_data_size();
        if size > limit {
            return Err(StorageError::SizeLimitExceeded {
                actual: size,
                limit,
            }
            .into());
        }

        self.metadata.size = size;
        self.save(store).await?;
        store
            .write_data(&self.metadata.owner_id, &self.metadata.id, data)
            .await?;
        Ok(())
    }

    /// All of an owner's fragments, as ids or fully hydrated.
    pub async fn by_user(
        store: &dyn FragmentStore,
        owner_id: &str,
        expand: bool,
    ) -> Result<FragmentList> {
        if expand {
            let fragments = store
                .list_metadata(owner_id)
                .await?
                .into_iter()
                .map(Fragment::from_metadata)
                .collect::<Result<Vec<_>>>()?;
            Ok(FragmentList::Expanded(fragments))
        } else {
            Ok(FragmentList::Ids(store.list_ids(owner_id).await?))
        }
    }

    pub async fn by_id(store: &dyn FragmentStore, owner_id: &str, id: &str) -> Result<Fragment> {
        match store.read_metadata(owner_id, id).await? {
            Some(metadata) => Fragment::from_metadata(metadata),
            None => Err(FragmentError::not_found(id)),
        }
    }

    /// Remove the fragment's metadata and data.
    pub async fn delete(store: &dyn FragmentStore, owner_id: &str, id: &str) -> Result<()> {
        match store.delete(owner_id, id).await {
            Ok(()) => Ok(()),
            Err(StorageError::NotFound { .. }) => Err(FragmentError::not_found(id)),
            Err(e) => Err(e.into()),
        }
    }

    pub fn is_supported_type(value: &str) -> bool {
        types::is_supported_type(value)
    }
}

impl Serialize for Fragment {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.metadata.serialize(serializer)
    }
}
