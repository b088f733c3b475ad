use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use tally_pipeline::{PipelineConfig, PipelineResult, TransformMode, WriteStrategy};

use crate::cli::Cli;

/// Optional defaults read from a TOML file. Flags on the command line win.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub bucket: Option<String>,
    pub key: Option<String>,
    pub mode: Option<TransformMode>,
    pub store_root: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
    pub atomic: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }
}

/// Fully resolved inputs for one invocation.
#[derive(Clone, Debug)]
pub struct Settings {
    pub pipeline: PipelineConfig,
    pub store_root: PathBuf,
}

impl Settings {
    /// Merge command-line flags over file defaults.
    ///
    /// Fails with a configuration error when the bucket or key is missing
    /// from both sources.
    pub fn resolve(cli: &Cli, file: FileConfig) -> PipelineResult<Self> {
        let bucket = cli.bucket.clone().or(file.bucket);
        let key = cli.file.clone().or(file.key);

        let mode = cli
            .mode
            .map(TransformMode::from)
            .or(file.mode)
            .unwrap_or_default();
        let strategy = if cli.atomic || file.atomic.unwrap_or(false) {
            WriteStrategy::Atomic
        } else {
            WriteStrategy::Truncate
        };
        let work_dir = cli
            .work_dir
            .clone()
            .or(file.work_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        let store_root = cli
            .store_root
            .clone()
            .or(file.store_root)
            .unwrap_or_else(|| PathBuf::from("."));

        let pipeline = PipelineConfig::from_parts(bucket.as_deref(), key.as_deref())?
            .with_mode(mode)
            .with_write_strategy(strategy)
            .with_work_dir(work_dir);

        Ok(Self {
            pipeline,
            store_root,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tally_pipeline::PipelineError;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["tally"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn flags_only() {
        let s = Settings::resolve(&cli(&["-b", "b", "-f", "a/n"]), FileConfig::default()).unwrap();
        assert_eq!(s.pipeline.container.as_str(), "b");
        assert_eq!(s.pipeline.key.as_str(), "a/n");
        assert_eq!(s.pipeline.mode, TransformMode::Increment);
        assert_eq!(s.pipeline.write_strategy, WriteStrategy::Truncate);
        assert_eq!(s.store_root, PathBuf::from("."));
    }

    #[test]
    fn missing_key_is_configuration_error() {
        let err = Settings::resolve(&cli(&["-b", "b"]), FileConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }

    #[test]
    fn file_supplies_defaults() {
        let file: FileConfig = toml::from_str(
            r#"
            bucket = "from-file"
            key = "k"
            mode = "copy"
            store_root = "/srv"
            atomic = true
            "#,
        )
        .unwrap();
        let s = Settings::resolve(&cli(&[]), file).unwrap();
        assert_eq!(s.pipeline.container.as_str(), "from-file");
        assert_eq!(s.pipeline.mode, TransformMode::Copy);
        assert_eq!(s.pipeline.write_strategy, WriteStrategy::Atomic);
        assert_eq!(s.store_root, PathBuf::from("/srv"));
    }

    #[test]
    fn flags_override_file() {
        let file: FileConfig = toml::from_str(
            r#"
            bucket = "from-file"
            key = "k"
            mode = "copy"
            "#,
        )
        .unwrap();
        let s = Settings::resolve(&cli(&["-b", "flag", "-m", "increment"]), file).unwrap();
        assert_eq!(s.pipeline.container.as_str(), "flag");
        assert_eq!(s.pipeline.key.as_str(), "k");
        assert_eq!(s.pipeline.mode, TransformMode::Increment);
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        assert!(toml::from_str::<FileConfig>("buckett = \"x\"").is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("reading config file"));
    }
}
