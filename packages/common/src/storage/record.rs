use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The persisted metadata record for one fragment.
///
/// This is the shape written to the metadata namespace of a
/// [`FragmentStore`](super::FragmentStore). Validation of its fields is the
/// responsibility of the entity layer that builds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentMetadata {
    pub id: String,
    pub owner_id: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    /// Declared Content-Type, parameters included (e.g. `text/plain; charset=utf-8`).
    #[serde(rename = "type")]
    pub content_type: String,
    pub size: u64,
}
