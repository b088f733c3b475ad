use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tally_store::StoreError;
use tally_types::{ObjectKey, TypeError};

use crate::state::PipelineState;

/// The pipeline step a failure is attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Configure,
    Resolve,
    Retrieve,
    Transform,
    Publish,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configure => "configure",
            Self::Resolve => "resolve",
            Self::Retrieve => "retrieve",
            Self::Transform => "transform",
            Self::Publish => "publish",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why counter text could not be incremented.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseFailure {
    #[error("content is not valid UTF-8")]
    InvalidUtf8,

    #[error("content is empty")]
    Empty,

    #[error("content is not a base-10 integer: {0:?}")]
    NotAnInteger(String),

    #[error("counter is out of range for a 64-bit integer")]
    Overflow,
}

/// Why a key could not be turned into a local artifact name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("key {0} has an empty final segment")]
    EmptyName(ObjectKey),

    #[error("key {key} resolves to reserved name {name:?}")]
    ReservedName { key: ObjectKey, name: String },
}

/// Errors that abort a pipeline run.
///
/// Every variant belongs to exactly one [`Stage`]; see [`PipelineError::stage`].
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A required input is missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The key has no usable final segment.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The store could not produce the object.
    #[error("retrieval failed: {0}")]
    Retrieval(#[source] StoreError),

    /// The object's byte stream failed while being read.
    #[error("failed reading object body: {0}")]
    StreamRead(#[source] io::Error),

    /// Increment mode found content that is not a counter.
    #[error("parse failure: {0}")]
    Parse(#[from] ParseFailure),

    /// Creating or writing the local artifact failed.
    #[error("local I/O error on {}: {source}", .path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The local artifact could not be opened for upload.
    #[error("local artifact missing: {}", .path.display())]
    LocalArtifactMissing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The store rejected the upload.
    #[error("publish failed: {0}")]
    Publish(#[source] StoreError),
}

impl PipelineError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// The stage this error aborted.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Configuration(_) => Stage::Configure,
            Self::Resolve(_) => Stage::Resolve,
            Self::Retrieval(_) => Stage::Retrieve,
            Self::StreamRead(_) | Self::Parse(_) | Self::LocalIo { .. } => Stage::Transform,
            Self::LocalArtifactMissing { .. } | Self::Publish(_) => Stage::Publish,
        }
    }

    /// The terminal state a run ends in when it fails with this error.
    pub fn failed_state(&self) -> PipelineState {
        PipelineState::Failed {
            stage: self.stage(),
            cause: self.to_string(),
        }
    }
}

impl From<TypeError> for PipelineError {
    fn from(e: TypeError) -> Self {
        Self::Configuration(e.to_string())
    }
}

/// Result alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use tally_types::ContainerId;

    #[test]
    fn every_variant_maps_to_its_stage() {
        let key = ObjectKey::new("k").unwrap();
        let io_err = || io::Error::new(io::ErrorKind::Other, "x");
        let cases = vec![
            (PipelineError::configuration("missing"), Stage::Configure),
            (ResolveError::EmptyName(key.clone()).into(), Stage::Resolve),
            (
                PipelineError::Retrieval(StoreError::NotFound {
                    container: ContainerId::new("b").unwrap(),
                    key: key.clone(),
                }),
                Stage::Retrieve,
            ),
            (PipelineError::StreamRead(io_err()), Stage::Transform),
            (ParseFailure::Empty.into(), Stage::Transform),
            (
                PipelineError::LocalIo {
                    path: "k".into(),
                    source: io_err(),
                },
                Stage::Transform,
            ),
            (
                PipelineError::LocalArtifactMissing {
                    path: "k".into(),
                    source: io_err(),
                },
                Stage::Publish,
            ),
            (PipelineError::Publish(StoreError::ReadOnly), Stage::Publish),
        ];
        for (err, stage) in cases {
            assert_eq!(err.stage(), stage, "{err}");
        }
    }

    #[test]
    fn type_error_becomes_configuration() {
        let err: PipelineError = TypeError::EmptyKey.into();
        assert_eq!(err.stage(), Stage::Configure);
        assert!(err.to_string().contains("object key must not be empty"));
    }

    #[test]
    fn failed_state_carries_stage_and_cause() {
        let err: PipelineError = ParseFailure::NotAnInteger("abc".into()).into();
        match err.failed_state() {
            PipelineState::Failed { stage, cause } => {
                assert_eq!(stage, Stage::Transform);
                assert!(cause.contains("abc"));
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn stage_display() {
        assert_eq!(Stage::Retrieve.to_string(), "retrieve");
        assert_eq!(Stage::Publish.as_str(), "publish");
    }
}
