//! Read-time conversion of fragment data.
//!
//! [`RULES`] is an ordered table; the first rule whose source set and target
//! set both match decides the transformation. The type registry answers
//! "is this conversion possible?" from the same table.

mod raster;
mod text;

use thiserror::Error;
use tracing::debug;

use crate::types::{Extension, MediaType};

pub use self::text::{json_to_text, markdown_to_html, strip_tags};

/// Errors produced while converting fragment data.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unsupported conversion from {from} to .{to}")]
    Unsupported { from: MediaType, to: Extension },

    #[error("data is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("image could not be re-encoded: {0}")]
    Image(#[from] ::image::ImageError),
}

/// The output of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    pub data: Vec<u8>,
    pub media_type: MediaType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transform {
    MarkdownToHtml,
    StripTags,
    JsonToText,
    ReencodeImage,
    Identity,
}

#[derive(Debug)]
enum Targets {
    Only(&'static [Extension]),
    /// Any extension whose media type equals the source type.
    SameType,
}

#[derive(Debug)]
pub(crate) struct ConversionRule {
    sources: &'static [MediaType],
    targets: Targets,
    transform: Transform,
}

impl ConversionRule {
    fn matches(&self, source: MediaType, target: Extension) -> bool {
        self.sources.contains(&source)
            && match self.targets {
                Targets::Only(exts) => exts.contains(&target),
                Targets::SameType => target.media_type() == source,
            }
    }
}

static RULES: &[ConversionRule] = &[
    ConversionRule {
        sources: &[MediaType::TextMarkdown],
        targets: Targets::Only(&[Extension::Html]),
        transform: Transform::MarkdownToHtml,
    },
    ConversionRule {
        sources: &[MediaType::TextHtml, MediaType::TextMarkdown],
        targets: Targets::Only(&[Extension::Txt]),
        transform: Transform::StripTags,
    },
    ConversionRule {
        sources: &[MediaType::ApplicationJson],
        targets: Targets::Only(&[Extension::Txt]),
        transform: Transform::JsonToText,
    },
    ConversionRule {
        sources: MediaType::IMAGES,
        targets: Targets::Only(Extension::IMAGES),
        transform: Transform::ReencodeImage,
    },
    ConversionRule {
        sources: MediaType::ALL,
        targets: Targets::SameType,
        transform: Transform::Identity,
    },
];

/// The first rule that handles `source` rendered as `target`, if any.
pub(crate) fn find_rule(source: MediaType, target: Extension) -> Option<&'static ConversionRule> {
    RULES.iter().find(|rule| rule.matches(source, target))
}

/// Convert `data` of type `source` into the representation named by `target`.
///
/// The input is never modified. Text inputs are decoded as UTF-8, replacing
/// invalid sequences.
pub fn convert(data: &[u8], source: MediaType, target: Extension) -> Result<Converted, ConvertError> {
    let rule = find_rule(source, target).ok_or(ConvertError::Unsupported {
        from: source,
        to: target,
    })?;
    debug!(%source, %target, transform = ?rule.transform, "converting fragment data");

    let data = match rule.transform {
        Transform::MarkdownToHtml => markdown_to_html(data).into_bytes(),
        Transform::StripTags if source == MediaType::TextMarkdown => {
            strip_tags(&markdown_to_html(data)).into_bytes()
        }
        Transform::StripTags => strip_tags(&String::from_utf8_lossy(data)).into_bytes(),
        Transform::JsonToText => json_to_text(data)?.into_bytes(),
        Transform::ReencodeImage => match target.image_format() {
            Some(format) => raster::reencode(data, format)?,
            None => {
                return Err(ConvertError::Unsupported {
                    from: source,
                    to: target,
                });
            }
        },
        Transform::Identity => data.to_vec(),
    };

    Ok(Converted {
        data,
        media_type: target.media_type(),
    })
}
