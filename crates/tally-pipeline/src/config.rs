use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tally_types::{ContainerId, ObjectKey};

use crate::error::{PipelineError, PipelineResult};

/// How the retrieved bytes become the local artifact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformMode {
    /// Parse the content as a decimal integer and write `value + 1`.
    #[default]
    Increment,
    /// Write the content unchanged.
    Copy,
}

impl fmt::Display for TransformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increment => f.write_str("increment"),
            Self::Copy => f.write_str("copy"),
        }
    }
}

/// How the local artifact is written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteStrategy {
    /// Create or truncate the artifact and write into it directly. A crash
    /// mid-write leaves an empty or partial file.
    #[default]
    Truncate,
    /// Write a temp file in the same directory and rename it into place.
    Atomic,
}

/// Everything one pipeline run needs, passed by value into
/// [`Pipeline::run`](crate::Pipeline::run).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Container holding the object.
    pub container: ContainerId,
    /// Key of the object to fetch and republish.
    pub key: ObjectKey,
    #[serde(default)]
    pub mode: TransformMode,
    /// Directory the local artifact is written to.
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
    #[serde(default)]
    pub write_strategy: WriteStrategy,
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(".")
}

impl PipelineConfig {
    /// Increment the counter at `key`, writing the artifact to the current
    /// directory with truncate semantics.
    pub fn new(container: ContainerId, key: ObjectKey) -> Self {
        Self {
            container,
            key,
            mode: TransformMode::default(),
            work_dir: default_work_dir(),
            write_strategy: WriteStrategy::default(),
        }
    }

    /// Build a config from optional raw inputs.
    ///
    /// Fails with [`PipelineError::Configuration`] when either value is
    /// absent or empty.
    pub fn from_parts(container: Option<&str>, key: Option<&str>) -> PipelineResult<Self> {
        match (container, key) {
            (Some(c), Some(k)) if !c.is_empty() && !k.is_empty() => {
                Ok(Self::new(ContainerId::new(c)?, ObjectKey::new(k)?))
            }
            _ => Err(PipelineError::configuration(
                "a container and an object key are both required",
            )),
        }
    }

    pub fn with_mode(mut self, mode: TransformMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    pub fn with_write_strategy(mut self, strategy: WriteStrategy) -> Self {
        self.write_strategy = strategy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = PipelineConfig::from_parts(Some("b"), Some("k")).unwrap();
        assert_eq!(c.mode, TransformMode::Increment);
        assert_eq!(c.work_dir, PathBuf::from("."));
        assert_eq!(c.write_strategy, WriteStrategy::Truncate);
    }

    #[test]
    fn missing_inputs_are_configuration_errors() {
        for (c, k) in [(None, Some("k")), (Some("b"), None), (Some(""), Some("k")), (None, None)] {
            let err = PipelineConfig::from_parts(c, k).unwrap_err();
            assert!(matches!(err, PipelineError::Configuration(_)));
        }
    }

    #[test]
    fn builders() {
        let c = PipelineConfig::from_parts(Some("b"), Some("k"))
            .unwrap()
            .with_mode(TransformMode::Copy)
            .with_work_dir("/tmp/x")
            .with_write_strategy(WriteStrategy::Atomic);
        assert_eq!(c.mode, TransformMode::Copy);
        assert_eq!(c.work_dir, PathBuf::from("/tmp/x"));
        assert_eq!(c.write_strategy, WriteStrategy::Atomic);
    }

    #[test]
    fn mode_display() {
        assert_eq!(TransformMode::Increment.to_string(), "increment");
        assert_eq!(TransformMode::Copy.to_string(), "copy");
    }

    #[test]
    fn deserialize_from_toml() {
        let c: PipelineConfig = toml::from_str(
            r#"
            container = "counters"
            key = "site/visits"
            mode = "copy"
            write_strategy = "atomic"
            "#,
        )
        .unwrap();
        assert_eq!(c.container.as_str(), "counters");
        assert_eq!(c.key.as_str(), "site/visits");
        assert_eq!(c.mode, TransformMode::Copy);
        assert_eq!(c.write_strategy, WriteStrategy::Atomic);
        assert_eq!(c.work_dir, PathBuf::from("."));
    }

    #[test]
    fn deserialize_rejects_empty_key() {
        let res: Result<PipelineConfig, _> = toml::from_str(
            r#"
            container = "counters"
            key = ""
            "#,
        );
        assert!(res.is_err());
    }
}
