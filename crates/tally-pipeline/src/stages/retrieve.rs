use tally_store::{ObjectReader, ObjectStore};
use tally_types::{ContainerId, ObjectKey};
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};
use crate::progress::ProgressHook;

/// Fetch the object at `key` from `container`.
///
/// The progress hook is notified before the request is issued. Any store
/// failure is returned as [`PipelineError::Retrieval`] without retrying.
pub fn retrieve(
    store: &dyn ObjectStore,
    progress: &dyn ProgressHook,
    container: &ContainerId,
    key: &ObjectKey,
) -> PipelineResult<ObjectReader> {
    progress.on_retrieve(key);
    debug!(%container, %key, "requesting object");
    store.get(container, key).map_err(PipelineError::Retrieval)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tally_store::{InMemoryObjectStore, StoreError};

    use crate::progress::NoOpProgress;

    #[test]
    fn returns_object_stream() {
        let store = InMemoryObjectStore::new();
        let c = ContainerId::new("b").unwrap();
        let k = ObjectKey::new("dir/n").unwrap();
        store.insert(&c, &k, "41");

        let mut reader = retrieve(&store, &NoOpProgress, &c, &k).unwrap();
        let mut s = String::new();
        reader.read_to_string(&mut s).unwrap();
        assert_eq!(s, "41");
        assert_eq!(store.get_count(), 1);
    }

    #[test]
    fn missing_object_is_retrieval_error() {
        let store = InMemoryObjectStore::new();
        let c = ContainerId::new("b").unwrap();
        store.create_container(&c);
        let k = ObjectKey::new("nope").unwrap();

        let err = retrieve(&store, &NoOpProgress, &c, &k).err().unwrap();
        assert!(matches!(
            err,
            PipelineError::Retrieval(StoreError::NotFound { .. })
        ));
        assert_eq!(store.get_count(), 1);
    }
}
