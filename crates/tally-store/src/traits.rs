use std::io::Read;

use tally_types::{ContainerId, ObjectKey};

use crate::ack::PutAck;
use crate::error::StoreResult;

/// Transient read handle over a remote object's bytes.
pub type ObjectReader = Box<dyn Read + Send>;

/// Read/write capability over a remote object store.
///
/// Implementations own authentication, transport and any retry or timeout
/// behavior. Callers pass only the container and the key.
///
/// All implementations must satisfy these invariants:
/// - `put` replaces any existing object under the same key.
/// - A failed request leaves no partial object visible to `get`.
/// - Errors are returned, never swallowed.
pub trait ObjectStore: Send + Sync {
    /// Open the object stored under `key` in `container` for reading.
    fn get(&self, container: &ContainerId, key: &ObjectKey) -> StoreResult<ObjectReader>;

    /// Upload the full contents of `body` under `key` in `container`.
    fn put(
        &self,
        container: &ContainerId,
        key: &ObjectKey,
        body: &mut dyn Read,
    ) -> StoreResult<PutAck>;

    /// Check whether an object exists.
    ///
    /// Default implementation issues a `get` and maps `NotFound` to `false`.
    fn exists(&self, container: &ContainerId, key: &ObjectKey) -> StoreResult<bool> {
        match self.get(container, key) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
