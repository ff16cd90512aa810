//! Content-Type / body agreement checks run before any fragment is written.

use image::ImageFormat;
use thiserror::Error;
use tracing::warn;

/// Why a request body was rejected at ingestion.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IngestionError {
    #[error("malformed Content-Type header: {0:?}")]
    MalformedContentType(String),

    #[error("unsupported content type: {0}")]
    UnsupportedType(String),

    #[error("body is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("body is not a valid {declared} image: {reason}")]
    InvalidImage { declared: String, reason: String },
}

const TEXT_TYPES: &[&str] = &["text/plain", "text/markdown", "text/html"];

const RASTER_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::WebP,
    ImageFormat::Gif,
];

/// Check that `body` really is what `content_type` claims.
///
/// Returns the parsed Content-Type on success. JSON bodies must parse, image
/// bodies must decode as PNG, JPEG, WebP or GIF, and the supported text
/// subtypes are accepted as-is.
pub fn validate_content(content_type: &str, body: &[u8]) -> Result<mime::Mime, IngestionError> {
    let parsed: mime::Mime = content_type
        .trim()
        .to_ascii_lowercase()
        .parse()
        .map_err(|_| IngestionError::MalformedContentType(content_type.to_string()))?;
    let essence = parsed.essence_str();

    if essence == "application/json" {
        if let Err(e) = serde_json::from_slice::<serde_json::Value>(body) {
            warn!(error = %e, "rejected body declared as JSON");
            return Err(IngestionError::InvalidJson(e.to_string()));
        }
    } else if parsed.type_() == mime::IMAGE {
        if let Err(reason) = decode_image(body) {
            warn!(declared = essence, %reason, "rejected body declared as image");
            return Err(IngestionError::InvalidImage {
                declared: essence.to_string(),
                reason,
            });
        }
    } else if !TEXT_TYPES.contains(&essence) {
        return Err(IngestionError::UnsupportedType(essence.to_string()));
    }

    Ok(parsed)
}

fn decode_image(body: &[u8]) -> Result<(), String> {
    let format = image::guess_format(body).map_err(|e| e.to_string())?;
    if !RASTER_FORMATS.contains(&format) {
        return Err(format!("{format:?} is not a supported raster format"));
    }
    image::load_from_memory_with_format(body, format).map_err(|e| e.to_string())?;
    Ok(())
}
