use std::sync::Arc;

use common::FragmentStore;
use tracing::{Span, debug, field, info, instrument, warn};

use crate::convert;
use crate::error::{FragmentError, Result};
use crate::fragment::{Fragment, FragmentList};
use crate::id::split_id;
use crate::ingest::validate_content;
use crate::types::Extension;

/// Bytes returned by a read, with the media type they should be served as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentContent {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Create, read, update, delete and list fragments on behalf of an owner.
///
/// The owner id is taken as already authenticated. Ids passed to
/// [`read_metadata`](Self::read_metadata), [`update`](Self::update) and
/// [`delete`](Self::delete) may carry a `.ext` suffix, which is ignored.
#[derive(Clone)]
pub struct FragmentService {
    store: Arc<dyn FragmentStore>,
}

impl FragmentService {
    pub fn new(store: Arc<dyn FragmentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn FragmentStore {
        &*self.store
    }

    #[instrument(skip(self, owner_id, data), fields(id = field::Empty, size = data.len()))]
    pub async fn create(&self, owner_id: &str, content_type: &str, data: &[u8]) -> Result<Fragment> {
        validate_content(content_type, data)?;
        if data.is_empty() {
            return Err(FragmentError::Validation("fragment data is empty".into()));
        }

        let mut fragment = Fragment::new(owner_id, content_type.trim())?;
        Span::current().record("id", fragment.id());

        fragment.set_data(self.store(), data).await?;

        info!(mime_type = fragment.mime_type(), "fragment created");
        Ok(fragment)
    }

    /// Read a fragment's data, converted to `extension` when one is given.
    ///
    /// Without an extension the stored bytes are returned under the fragment's
    /// declared type. The stored data is never modified by a conversion.
    #[instrument(skip(self, owner_id))]
    pub async fn read(
        &self,
        owner_id: &str,
        id: &str,
        extension: Option<&str>,
    ) -> Result<FragmentContent> {
        let fragment = Fragment::by_id(self.store(), owner_id, id).await?;

        let Some(extension) = extension else {
            let data = self.stored_data(&fragment).await?;
            return Ok(FragmentContent {
                data,
                content_type: fragment.content_type().to_string(),
            });
        };

        let target = Extension::parse(extension)
            .filter(|target| convert::find_rule(fragment.media_type(), *target).is_some())
            .ok_or_else(|| FragmentError::UnsupportedConversion {
                id: id.to_string(),
                from: fragment.content_type().to_string(),
                to: extension.to_string(),
            })?;

        let data = self.stored_data(&fragment).await?;
        let converted = convert::convert(&data, fragment.media_type(), target).map_err(|source| {
            warn!(error = %source, "conversion failed");
            FragmentError::Conversion {
                id: id.to_string(),
                source,
            }
        })?;
        debug!(extension = %target, bytes = converted.data.len(), "converted fragment");

        Ok(FragmentContent {
            data: converted.data,
            content_type: converted.media_type.as_str().to_string(),
        })
    }

    /// Read by a request path such as `"<id>.html"`.
    pub async fn read_by_path(&self, owner_id: &str, path: &str) -> Result<FragmentContent> {
        let requested = split_id(path);
        self.read(owner_id, requested.id, requested.extension).await
    }

    #[instrument(skip(self, owner_id))]
    pub async fn read_metadata(&self, owner_id: &str, id: &str) -> Result<Fragment> {
        Fragment::by_id(self.store(), owner_id, split_id(id).id).await
    }

    #[instrument(skip(self, owner_id))]
    pub async fn list(&self, owner_id: &str, expand: bool) -> Result<FragmentList> {
        Fragment::by_user(self.store(), owner_id, expand).await
    }

    /// Replace a fragment's data. The declared type must match the stored one.
    #[instrument(skip(self, owner_id, data), fields(size = data.len()))]
    pub async fn update(
        &self,
        owner_id: &str,
        id: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<Fragment> {
        let declared = validate_content(content_type, data)?;
        let id = split_id(id).id;
        let mut fragment = Fragment::by_id(self.store(), owner_id, id).await?;

        if declared.essence_str() != fragment.mime_type() {
            warn!(
                stored = fragment.mime_type(),
                declared = declared.essence_str(),
                "rejected type change"
            );
            return Err(FragmentError::TypeImmutable {
                id: id.to_string(),
                stored: fragment.mime_type().to_string(),
                declared: declared.essence_str().to_string(),
            });
        }

        fragment.set_data(self.store(), data).await?;
        info!("fragment updated");
        Ok(fragment)
    }

    #[instrument(skip(self, owner_id))]
    pub async fn delete(&self, owner_id: &str, id: &str) -> Result<()> {
        Fragment::delete(self.store(), owner_id, split_id(id).id).await?;
        info!("fragment deleted");
        Ok(())
    }

    async fn stored_data(&self, fragment: &Fragment) -> Result<Vec<u8>> {
        match fragment.get_data(self.store()).await? {
            Some(data) => Ok(data),
            None => {
                warn!(id = fragment.id(), "metadata present without data");
                Err(FragmentError::MissingData {
                    id: fragment.id().to_string(),
                })
            }
        }
    }
}
