//! Owner-scoped, immutably typed data fragments with read-time conversion.
//!
//! - [`types`]: supported media types and the conversion matrix
//! - [`convert`]: the conversion rule table and transformations
//! - [`ingest`]: Content-Type / body agreement checks
//! - [`fragment`]: the fragment entity
//! - [`service`]: create/read/update/delete/list over a [`common::FragmentStore`]

pub mod convert;
pub mod error;
pub mod fragment;
pub mod id;
pub mod ingest;
pub mod service;
pub mod types;

pub use error::{FragmentError, Result};
pub use fragment::{Fragment, FragmentList};
pub use id::{RequestedId, has_extension, split_id};
pub use ingest::{IngestionError, validate_content};
pub use service::{FragmentContent, FragmentService};
pub use types::{
    Extension, MediaType, available_representations, is_conversion_possible, is_supported_type,
};
