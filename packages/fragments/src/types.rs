//! The closed set of supported media types and the conversion matrix.
//!
//! Legality of a conversion is answered from the converter's rule table
//! ([`crate::convert`]), so the matrix here and the transformations there come
//! from a single declaration.

use std::fmt;

use image::ImageFormat;

use crate::convert;

/// A supported base MIME type (parameters stripped).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    TextPlain,
    TextMarkdown,
    TextHtml,
    ApplicationJson,
    ImagePng,
    ImageJpeg,
    ImageWebp,
    ImageGif,
}

impl MediaType {
    /// Every supported type.
    pub const ALL: &'static [MediaType] = &[
        Self::TextPlain,
        Self::TextMarkdown,
        Self::TextHtml,
        Self::ApplicationJson,
        Self::ImagePng,
        Self::ImageJpeg,
        Self::ImageWebp,
        Self::ImageGif,
    ];

    /// The supported raster image types.
    pub const IMAGES: &'static [MediaType] = &[
        Self::ImagePng,
        Self::ImageJpeg,
        Self::ImageWebp,
        Self::ImageGif,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextPlain => "text/plain",
            Self::TextMarkdown => "text/markdown",
            Self::TextHtml => "text/html",
            Self::ApplicationJson => "application/json",
            Self::ImagePng => "image/png",
            Self::ImageJpeg => "image/jpeg",
            Self::ImageWebp => "image/webp",
            Self::ImageGif => "image/gif",
        }
    }

    /// Look up a bare `type/subtype` string, ignoring ASCII case.
    pub fn from_essence(essence: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(essence.trim()))
    }

    /// Parse a full Content-Type value such as `text/plain; charset=utf-8`.
    ///
    /// Returns `None` for malformed values and for well-formed but unsupported
    /// types.
    pub fn parse(value: &str) -> Option<Self> {
        base_type(value).and_then(|essence| Self::from_essence(&essence))
    }

    pub fn is_text(&self) -> bool {
        self.as_str().starts_with("text/")
    }

    pub fn is_image(&self) -> bool {
        Self::IMAGES.contains(self)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A representation that can be requested by appending `.ext` to a fragment id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extension {
    Txt,
    Md,
    Html,
    Json,
    Png,
    Jpg,
    Jpeg,
    Webp,
    Gif,
}

impl Extension {
    pub const ALL: &'static [Extension] = &[
        Self::Txt,
        Self::Md,
        Self::Html,
        Self::Json,
        Self::Png,
        Self::Jpg,
        Self::Jpeg,
        Self::Webp,
        Self::Gif,
    ];

    /// Raster extensions any image type can be re-encoded into.
    pub const IMAGES: &'static [Extension] =
        &[Self::Png, Self::Jpg, Self::Jpeg, Self::Webp, Self::Gif];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Md => "md",
            Self::Html => "html",
            Self::Json => "json",
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Webp => "webp",
            Self::Gif => "gif",
        }
    }

    /// Parse an extension (without the leading dot), ignoring ASCII case.
    pub fn parse(ext: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.as_str().eq_ignore_ascii_case(ext))
    }

    /// The media type a representation with this extension has.
    pub fn media_type(&self) -> MediaType {
        match self {
            Self::Txt => MediaType::TextPlain,
            Self::Md => MediaType::TextMarkdown,
            Self::Html => MediaType::TextHtml,
            Self::Json => MediaType::ApplicationJson,
            Self::Png => MediaType::ImagePng,
            Self::Jpg | Self::Jpeg => MediaType::ImageJpeg,
            Self::Webp => MediaType::ImageWebp,
            Self::Gif => MediaType::ImageGif,
        }
    }

    pub(crate) fn image_format(&self) -> Option<ImageFormat> {
        match self {
            Self::Png => Some(ImageFormat::Png),
            Self::Jpg | Self::Jpeg => Some(ImageFormat::Jpeg),
            Self::Webp => Some(ImageFormat::WebP),
            Self::Gif => Some(ImageFormat::Gif),
            _ => None,
        }
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a Content-Type value and return its lowercased `type/subtype`.
///
/// Returns `None` if the value is not a well-formed media type.
pub fn base_type(value: &str) -> Option<String> {
    value
        .trim()
        .to_ascii_lowercase()
        .parse::<mime::Mime>()
        .ok()
        .map(|m| m.essence_str().to_string())
}

/// Whether the base type of a Content-Type value is supported.
pub fn is_supported_type(value: &str) -> bool {
    MediaType::parse(value).is_some()
}

/// Whether a fragment of `source_type` can be rendered with `target_extension`.
///
/// Both arguments are case-insensitive. Empty, malformed or unknown input
/// yields `false`.
pub fn is_conversion_possible(source_type: &str, target_extension: &str) -> bool {
    match (MediaType::parse(source_type), Extension::parse(target_extension)) {
        (Some(source), Some(target)) => convert::find_rule(source, target).is_some(),
        _ => false,
    }
}

/// Listing order for [`available_representations`].
const REPRESENTATION_ORDER: &[MediaType] = &[
    MediaType::TextMarkdown,
    MediaType::TextHtml,
    MediaType::ApplicationJson,
    MediaType::TextPlain,
    MediaType::ImagePng,
    MediaType::ImageJpeg,
    MediaType::ImageWebp,
    MediaType::ImageGif,
];

/// Every media type a fragment of `source_type` can be rendered as.
///
/// Includes the source type itself. Text sources list their own type first;
/// image sources always list png, jpeg, webp, gif. Unknown types yield an
/// empty list.
pub fn available_representations(source_type: &str) -> Vec<MediaType> {
    let Some(source) = MediaType::parse(source_type) else {
        return Vec::new();
    };

    REPRESENTATION_ORDER
        .iter()
        .copied()
        .filter(|media_type| {
            *media_type == source
                || Extension::ALL.iter().any(|target| {
                    target.media_type() == *media_type
                        && convert::find_rule(source, *target).is_some()
                })
        })
        .collect()
}
