use crate::types::Extension;

/// A fragment id as requested by a caller, possibly with a `.ext` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestedId<'a> {
    pub id: &'a str,
    pub extension: Option<&'a str>,
}

impl RequestedId<'_> {
    /// The media type for the extension, if it is one we know.
    pub fn media_type(&self) -> Option<&'static str> {
        self.extension
            .and_then(Extension::parse)
            .map(|ext| ext.media_type().as_str())
    }
}

/// Whether `raw` ends in a non-empty `.ext` suffix.
pub fn has_extension(raw: &str) -> bool {
    matches!(raw.rfind('.'), Some(dot) if dot < raw.len() - 1)
}

/// Split `id.ext` on the last dot.
///
/// A trailing dot or no dot at all means there is no extension and the whole
/// input is the id.
pub fn split_id(raw: &str) -> RequestedId<'_> {
    match raw.rsplit_once('.') {
        Some((id, ext)) if !ext.is_empty() => RequestedId {
            id,
            extension: Some(ext),
        },
        _ => RequestedId {
            id: raw,
            extension: None,
        },
    }
}
