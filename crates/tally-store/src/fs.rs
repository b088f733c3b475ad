use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use tally_types::{ContainerId, ObjectKey};
use tracing::debug;

use crate::ack::{etag_of, PutAck};
use crate::error::{StoreError, StoreResult};
use crate::traits::{ObjectReader, ObjectStore};

/// Object store backed by a directory tree on local disk.
///
/// Layout:
/// ```text
/// <root>/<container>/<key>
/// ```
/// Each container is a directory directly under `root` and must exist before
/// it is used. Key segments become nested directories. Uploads are staged in
/// a temp file next to the destination and renamed over it, so a reader never
/// observes a half-written object.
#[derive(Clone, Debug)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Open a store rooted at `root`. The directory is not created.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory for `container` if it does not exist.
    pub fn create_container(&self, container: &ContainerId) -> StoreResult<()> {
        let dir = self.container_dir(container)?;
        fs::create_dir_all(&dir)?;
        Ok(())
    }

    fn container_dir(&self, container: &ContainerId) -> StoreResult<PathBuf> {
        let name = container.as_str();
        if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
            return Err(StoreError::NoSuchContainer(container.clone()));
        }
        Ok(self.root.join(name))
    }

    /// Resolve the on-disk path for an object, checking that the container
    /// exists and that the key stays inside it.
    fn object_path(&self, container: &ContainerId, key: &ObjectKey) -> StoreResult<PathBuf> {
        let dir = self.container_dir(container)?;
        if !dir.is_dir() {
            return Err(StoreError::NoSuchContainer(container.clone()));
        }

        let mut path = dir;
        for segment in key.segments() {
            let reason = match segment {
                "" => Some("empty path segment"),
                "." | ".." => Some("relative path segment"),
                s if s.contains('\\') => Some("backslash in path segment"),
                _ => None,
            };
            if let Some(reason) = reason {
                return Err(StoreError::InvalidKey {
                    key: key.clone(),
                    reason: reason.into(),
                });
            }
            path.push(segment);
        }
        Ok(path)
    }
}

impl ObjectStore for FsObjectStore {
    fn get(&self, container: &ContainerId, key: &ObjectKey) -> StoreResult<ObjectReader> {
        let path = self.object_path(container, key)?;
        if path.is_dir() {
            return Err(StoreError::NotFound {
                container: container.clone(),
                key: key.clone(),
            });
        }
        let file = File::open(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound {
                container: container.clone(),
                key: key.clone(),
            },
            _ => StoreError::Io(e),
        })?;
        debug!(path = %path.display(), "opened object");
        Ok(Box::new(BufReader::new(file)))
    }

    fn put(
        &self,
        container: &ContainerId,
        key: &ObjectKey,
        body: &mut dyn Read,
    ) -> StoreResult<PutAck> {
        let path = self.object_path(container, key)?;
        let parent = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        fs::create_dir_all(&parent)?;

        let mut data = Vec::new();
        body.read_to_end(&mut data)?;

        let mut staged = tempfile::NamedTempFile::new_in(&parent)?;
        staged.write_all(&data)?;
        staged.as_file().sync_all()?;
        staged.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        debug!(path = %path.display(), len = data.len(), "stored object");
        Ok(PutAck {
            container: container.clone(),
            key: key.clone(),
            size: data.len() as u64,
            etag: etag_of(&data),
            stored_at: chrono::Utc::now(),
        })
    }
}
