use std::io::Cursor;

use image::{DynamicImage, ImageError, ImageFormat};

/// Decode `data` and encode it as `format` with the encoder's default settings.
///
/// JPEG has no alpha channel, so images are flattened to RGB for it; every
/// other target gets RGBA.
pub(super) fn reencode(data: &[u8], format: ImageFormat) -> Result<Vec<u8>, ImageError> {
    let decoded = image::load_from_memory(data)?;
    let prepared = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(decoded.to_rgb8()),
        _ => DynamicImage::ImageRgba8(decoded.to_rgba8()),
    };

    let mut out = Cursor::new(Vec::new());
    prepared.write_to(&mut out, format)?;
    Ok(out.into_inner())
}
