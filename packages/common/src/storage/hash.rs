use std::fmt;

use sha2::{Digest, Sha256};

/// A filesystem-safe partition key derived from an owner id.
///
/// Owner ids are opaque strings and may contain characters that are not valid
/// in file names, so the durable backend partitions by the SHA-256 digest of
/// the owner id instead of the id itself.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerKey([u8; 32]);

impl OwnerKey {
    /// Derive the partition key for an owner id.
    pub fn compute(owner_id: &str) -> Self {
        let hash = Sha256::digest(owner_id.as_bytes());
        Self(hash.into())
    }

    /// Return the key as a 64-character lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnerKey({})", self.to_hex())
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
