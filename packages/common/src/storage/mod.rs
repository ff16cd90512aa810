mod error;
mod hash;
mod key;
mod record;
mod traits;

pub mod filesystem;
pub mod memory;

pub use error::StorageError;
pub use hash::OwnerKey;
pub use key::{KeyError, validate_fragment_id};
pub use record::FragmentMetadata;
pub use traits::FragmentStore;
