use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_types::{ContainerId, ObjectKey};

/// Acknowledgment returned by a successful upload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutAck {
    pub container: ContainerId,
    pub key: ObjectKey,
    /// Number of bytes stored.
    pub size: u64,
    /// Hex-encoded BLAKE3 digest of the stored bytes.
    pub etag: String,
    pub stored_at: DateTime<Utc>,
}

impl PutAck {
    /// Build an acknowledgment for `data`, stamped with the current time.
    pub fn for_bytes(container: ContainerId, key: ObjectKey, data: &[u8]) -> Self {
        Self {
            container,
            key,
            size: data.len() as u64,
            etag: etag_of(data),
            stored_at: Utc::now(),
        }
    }

    /// First 8 bytes of the etag, or the whole etag when that would split a
    /// character.
    pub fn short_etag(&self) -> &str {
        self.etag.get(..8).unwrap_or(&self.etag)
    }
}

/// Hex-encoded BLAKE3 digest used as an entity tag.
pub fn etag_of(data: &[u8]) -> String {
    hex::encode(blake3::hash(data).as_bytes())
}
