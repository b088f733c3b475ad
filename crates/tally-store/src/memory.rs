use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use tally_types::{ContainerId, ObjectKey};

use crate::ack::PutAck;
use crate::error::{StoreError, StoreResult};
use crate::traits::{ObjectReader, ObjectStore};

type Container = HashMap<ObjectKey, Vec<u8>>;

/// In-memory, HashMap-based object store.
///
/// Intended for tests and embedding. Containers must be created before
/// objects can be stored in them. Every `get` and `put` request is counted,
/// including failed ones, so tests can assert that a request was or was not
/// issued.
pub struct InMemoryObjectStore {
    containers: RwLock<HashMap<ContainerId, Container>>,
    gets: AtomicUsize,
    puts: AtomicUsize,
    read_only: AtomicBool,
}

impl InMemoryObjectStore {
    /// Create a new store with no containers.
    pub fn new() -> Self {
        Self {
            containers: RwLock::new(HashMap::new()),
            gets: AtomicUsize::new(0),
            puts: AtomicUsize::new(0),
            read_only: AtomicBool::new(false),
        }
    }

    /// Create a container. Returns `false` if it already existed.
    pub fn create_container(&self, container: &ContainerId) -> bool {
        let mut map = self.containers.write().expect("lock poisoned");
        if map.contains_key(container) {
            return false;
        }
        map.insert(container.clone(), HashMap::new());
        true
    }

    /// Store `data` directly, bypassing request accounting.
    ///
    /// Creates the container if needed. Used to seed fixtures.
    pub fn insert(&self, container: &ContainerId, key: &ObjectKey, data: impl Into<Vec<u8>>) {
        let mut map = self.containers.write().expect("lock poisoned");
        map.entry(container.clone())
            .or_default()
            .insert(key.clone(), data.into());
    }

    /// Copy of the bytes stored under `key`, bypassing request accounting.
    pub fn object(&self, container: &ContainerId, key: &ObjectKey) -> Option<Vec<u8>> {
        let map = self.containers.read().expect("lock poisoned");
        map.get(container).and_then(|c| c.get(key)).cloned()
    }

    /// Number of objects across all containers.
    pub fn len(&self) -> usize {
        let map = self.containers.read().expect("lock poisoned");
        map.values().map(HashMap::len).sum()
    }

    /// Returns `true` if no objects are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `get` requests received so far.
    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// Number of `put` requests received so far.
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Make subsequent `put` requests fail with [`StoreError::ReadOnly`].
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn get(&self, container: &ContainerId, key: &ObjectKey) -> StoreResult<ObjectReader> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        let map = self.containers.read().expect("lock poisoned");
        let objects = map
            .get(container)
            .ok_or_else(|| StoreError::NoSuchContainer(container.clone()))?;
        let data = objects.get(key).ok_or_else(|| StoreError::NotFound {
            container: container.clone(),
            key: key.clone(),
        })?;
        Ok(Box::new(Cursor::new(data.clone())))
    }

    fn put(
        &self,
        container: &ContainerId,
        key: &ObjectKey,
        body: &mut dyn Read,
    ) -> StoreResult<PutAck> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StoreError::ReadOnly);
        }

        // Drain the body before taking the lock so a failing reader leaves
        // the stored object untouched.
        let mut data = Vec::new();
        body.read_to_end(&mut data)?;

        let mut map = self.containers.write().expect("lock poisoned");
        let objects = map
            .get_mut(container)
            .ok_or_else(|| StoreError::NoSuchContainer(container.clone()))?;
        let ack = PutAck::for_bytes(container.clone(), key.clone(), &data);
        objects.insert(key.clone(), data);
        Ok(ack)
    }

    fn exists(&self, container: &ContainerId, key: &ObjectKey) -> StoreResult<bool> {
        let map = self.containers.read().expect("lock poisoned");
        let objects = map
            .get(container)
            .ok_or_else(|| StoreError::NoSuchContainer(container.clone()))?;
        Ok(objects.contains_key(key))
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("object_count", &self.len())
            .field("gets", &self.get_count())
            .field("puts", &self.put_count())
            .finish()
    }
}
