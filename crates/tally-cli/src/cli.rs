use std::path::PathBuf;

use clap::Parser;
use tally_pipeline::TransformMode;

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    about = "Fetch an object, increment or copy it locally, and publish it back",
    version
)]
pub struct Cli {
    /// The bucket to download/upload the file from/to
    #[arg(short = 'b', long = "bucket", value_name = "BUCKET")]
    pub bucket: Option<String>,

    /// The file to download/upload
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: Option<String>,

    /// What to do with the downloaded content
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Directory holding one subdirectory per bucket
    #[arg(long, value_name = "DIR")]
    pub store_root: Option<PathBuf>,

    /// Directory the local artifact is written to
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Write the local artifact via temp file and rename
    #[arg(long)]
    pub atomic: bool,

    /// TOML file supplying defaults for any of the above
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(short, long)]
    pub verbose: bool,

    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Always exit with status 0, even on failure
    #[arg(long)]
    pub legacy_exit: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ModeArg {
    Increment,
    Copy,
}

impl From<ModeArg> for TransformMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Increment => TransformMode::Increment,
            ModeArg::Copy => TransformMode::Copy,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_short_flags() {
        let cli = Cli::try_parse_from(["tally", "-b", "bucket", "-f", "a/b/c"]).unwrap();
        assert_eq!(cli.bucket.as_deref(), Some("bucket"));
        assert_eq!(cli.file.as_deref(), Some("a/b/c"));
        assert!(cli.mode.is_none());
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.legacy_exit);
    }

    #[test]
    fn parse_long_flags() {
        let cli = Cli::try_parse_from([
            "tally",
            "--bucket",
            "b",
            "--file",
            "k",
            "--mode",
            "copy",
            "--store-root",
            "/srv/store",
            "--work-dir",
            "/tmp",
            "--atomic",
        ])
        .unwrap();
        assert_eq!(cli.mode, Some(ModeArg::Copy));
        assert_eq!(cli.store_root, Some(PathBuf::from("/srv/store")));
        assert_eq!(cli.work_dir, Some(PathBuf::from("/tmp")));
        assert!(cli.atomic);
    }

    #[test]
    fn flags_are_optional_at_parse_time() {
        let cli = Cli::try_parse_from(["tally"]).unwrap();
        assert!(cli.bucket.is_none());
        assert!(cli.file.is_none());
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["tally", "--format", "json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["tally", "--mode", "double"]).is_err());
    }

    #[test]
    fn mode_arg_converts() {
        assert_eq!(TransformMode::from(ModeArg::Copy), TransformMode::Copy);
        assert_eq!(
            TransformMode::from(ModeArg::Increment),
            TransformMode::Increment
        );
    }

    #[test]
    fn parse_verbose_and_legacy_exit() {
        let cli = Cli::try_parse_from(["tally", "-v", "--legacy-exit"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.legacy_exit);
    }
}
