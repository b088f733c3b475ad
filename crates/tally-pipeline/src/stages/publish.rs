use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tally_store::{ObjectStore, PutAck};
use tally_types::{ContainerId, ObjectKey};
use tracing::info;

use crate::error::{PipelineError, PipelineResult};
use crate::progress::ProgressHook;

/// Upload the local artifact at `path` under `key` in `container`.
///
/// If the artifact cannot be opened the run fails with
/// [`PipelineError::LocalArtifactMissing`] and the store is never contacted.
/// Otherwise the progress hook is notified and the upload replaces whatever
/// the store holds under `key`.
pub fn publish(
    store: &dyn ObjectStore,
    progress: &dyn ProgressHook,
    container: &ContainerId,
    key: &ObjectKey,
    path: &Path,
) -> PipelineResult<PutAck> {
    let file = File::open(path).map_err(|source| PipelineError::LocalArtifactMissing {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    progress.on_publish(key);
    let ack = store
        .put(container, key, &mut reader)
        .map_err(PipelineError::Publish)?;

    info!(%container, %key, size = ack.size, etag = ack.short_etag(), "published");
    Ok(ack)
}
