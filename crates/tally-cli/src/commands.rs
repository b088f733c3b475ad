use std::sync::Arc;

use colored::Colorize;
use tally_pipeline::{
    NoOpProgress, Pipeline, PipelineError, PipelineReport, ProgressHook, Stage, TransformMode,
};
use tally_store::FsObjectStore;
use tally_types::ObjectKey;

use crate::cli::{Cli, OutputFormat};
use crate::settings::{FileConfig, Settings};

const USAGE: &str = "You must supply a bucket name (-b BUCKET) and file name (-f FILE)";

/// How an invocation ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success,
    ConfigurationError,
    StageFailure,
}

impl Outcome {
    /// Process exit status. `legacy` reports every outcome as success.
    pub fn exit_code(self, legacy: bool) -> u8 {
        if legacy {
            return 0;
        }
        match self {
            Self::Success => 0,
            Self::StageFailure => 1,
            Self::ConfigurationError => 2,
        }
    }
}

/// Prints progress notices to standard output.
struct ConsoleProgress;

impl ProgressHook for ConsoleProgress {
    fn on_retrieve(&self, key: &ObjectKey) {
        println!("Downloading: {key}");
    }

    fn on_publish(&self, key: &ObjectKey) {
        println!("Uploading: {key}");
    }
}

pub fn run_command(cli: Cli) -> Outcome {
    let file = match &cli.config {
        Some(path) => match FileConfig::load(path) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("{} {e:#}", "error:".red().bold());
                return Outcome::ConfigurationError;
            }
        },
        None => FileConfig::default(),
    };

    let settings = match Settings::resolve(&cli, file) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::debug!(error = %e, "configuration incomplete");
            println!("{}", usage_output(&e, cli.format));
            return Outcome::ConfigurationError;
        }
    };

    let store = Arc::new(FsObjectStore::new(settings.store_root));
    tracing::debug!(
        bucket = %settings.pipeline.container,
        key = %settings.pipeline.key,
        mode = %settings.pipeline.mode,
        store_root = %store.root().display(),
        "starting run"
    );

    let progress: Arc<dyn ProgressHook> = match cli.format {
        OutputFormat::Text => Arc::new(ConsoleProgress),
        OutputFormat::Json => Arc::new(NoOpProgress),
    };
    let mode = settings.pipeline.mode;
    let pipeline = Pipeline::new(store).with_progress(progress);

    match pipeline.run(settings.pipeline) {
        Ok(report) => {
            print_report(&report, cli.format);
            Outcome::Success
        }
        Err(e) => {
            print_failure(&e, mode, cli.format);
            match e.stage() {
                Stage::Configure => Outcome::ConfigurationError,
                _ => Outcome::StageFailure,
            }
        }
    }
}

/// The usage hint shown when required inputs are missing.
fn usage_output(err: &PipelineError, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => USAGE.to_string(),
        OutputFormat::Json => {
            let body = serde_json::json!({
                "state": err.failed_state(),
                "message": USAGE,
            });
            format!("{body:#}")
        }
    }
}

fn print_report(report: &PipelineReport, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!(
            "{} {} ({} bytes, etag {})",
            "✓".green().bold(),
            report.local_artifact.display(),
            report.ack.size,
            report.ack.short_etag().yellow(),
        ),
        OutputFormat::Json => match serde_json::to_string_pretty(report) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("{} {e}", "error:".red().bold()),
        },
    }
}

/// Label a failure with the stage context it happened in.
fn failure_message(err: &PipelineError, mode: TransformMode) -> String {
    match err {
        PipelineError::Configuration(_) => err.to_string(),
        PipelineError::Resolve(e) => format!("ResolveKey error: {e}"),
        PipelineError::Retrieval(e) => format!("GetFile error: {e}"),
        PipelineError::LocalArtifactMissing { path, .. } => {
            format!("Unable to open file {}", path.display())
        }
        PipelineError::Publish(e) => format!("Got error uploading file: {e}"),
        PipelineError::StreamRead(_) | PipelineError::Parse(_) | PipelineError::LocalIo { .. } => {
            match mode {
                TransformMode::Increment => format!("IncreaseFileValue error: {err}"),
                TransformMode::Copy => format!("CopyFile error: {err}"),
            }
        }
    }
}

fn print_failure(err: &PipelineError, mode: TransformMode, format: OutputFormat) {
    match format {
        OutputFormat::Text => eprintln!("{}", failure_message(err, mode).red()),
        OutputFormat::Json => {
            let body = serde_json::json!({
                "state": err.failed_state(),
                "message": failure_message(err, mode),
            });
            println!("{body:#}");
        }
    }
}
