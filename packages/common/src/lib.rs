pub mod config;
pub mod storage;

pub use config::{StorageAppConfig, StorageBackend};
pub use storage::{FragmentMetadata, FragmentStore, StorageError};
