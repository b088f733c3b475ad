use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tally_store::{ObjectStore, PutAck};
use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::error::{PipelineResult, Stage};
use crate::progress::{NoOpProgress, ProgressHook};
use crate::resolve::resolve_local_name;
use crate::stages::{publish, retrieve, transform};
use crate::state::PipelineState;

// ---------------------------------------------------------------------------
// StageResult / PipelineReport
// ---------------------------------------------------------------------------

/// Timing for one completed stage.
#[derive(Clone, Debug, Serialize)]
pub struct StageResult {
    pub stage: Stage,
    pub elapsed: Duration,
}

/// Summary of a successful run.
#[derive(Clone, Debug, Serialize)]
pub struct PipelineReport {
    /// Always [`PipelineState::Published`].
    pub state: PipelineState,
    /// Where the local artifact was written.
    pub local_artifact: PathBuf,
    /// Size of the local artifact.
    pub bytes_written: u64,
    /// The store's acknowledgment of the upload.
    pub ack: PutAck,
    /// Per-stage timings in execution order.
    pub stage_results: Vec<StageResult>,
    /// Total wall-clock time for the run.
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Runs one fetch-transform-publish cycle per call against an injected store.
///
/// The pipeline holds no per-run state; everything a run needs arrives in its
/// [`PipelineConfig`]. Stages execute sequentially on the calling thread and
/// the first failure ends the run.
pub struct Pipeline {
    store: Arc<dyn ObjectStore>,
    progress: Arc<dyn ProgressHook>,
}

impl Pipeline {
    /// Create a pipeline over `store` with no progress reporting.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Replace the progress hook.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressHook>) -> Self {
        self.progress = progress;
        self
    }

    /// Execute the pipeline for `config`.
    ///
    /// On failure the returned error identifies the aborted stage through
    /// [`PipelineError::stage`](crate::PipelineError::stage). Side effects of
    /// stages that already completed are left in place.
    pub fn run(&self, config: PipelineConfig) -> PipelineResult<PipelineReport> {
        let started = Instant::now();
        let mut run = Run {
            state: PipelineState::Start,
            stage_results: Vec::with_capacity(4),
        };

        match self.run_stages(&config, &mut run) {
            Ok((local_artifact, bytes_written, ack)) => Ok(PipelineReport {
                state: run.state,
                local_artifact,
                bytes_written,
                ack,
                stage_results: run.stage_results,
                elapsed: started.elapsed(),
            }),
            Err(e) => {
                let failed = e.failed_state();
                warn!(key = %config.key, stage = %e.stage(), error = %e, "pipeline aborted");
                debug!(from = ?run.state, to = ?failed, "transition");
                Err(e)
            }
        }
    }

    fn run_stages(
        &self,
        config: &PipelineConfig,
        run: &mut Run,
    ) -> PipelineResult<(PathBuf, u64, PutAck)> {
        let store = self.store.as_ref();
        let progress = self.progress.as_ref();

        let t = Instant::now();
        let local_name = resolve_local_name(&config.key)?;
        let path = local_name.path_in(&config.work_dir);
        run.complete(t);

        let t = Instant::now();
        let mut body = retrieve(store, progress, &config.container, &config.key)?;
        run.complete(t);

        let t = Instant::now();
        let bytes_written = transform(
            &mut body,
            &path,
            config.mode,
            config.write_strategy,
        )?;
        drop(body);
        run.complete(t);

        let t = Instant::now();
        let ack = publish(store, progress, &config.container, &config.key, &path)?;
        run.complete(t);

        Ok((path, bytes_written, ack))
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").finish_non_exhaustive()
    }
}

/// Mutable bookkeeping for a single run.
struct Run {
    state: PipelineState,
    stage_results: Vec<StageResult>,
}

impl Run {
    /// Record the pending stage as finished and move to the next state.
    fn complete(&mut self, started: Instant) {
        let (Some(stage), Some(next)) = (self.state.pending_stage(), self.state.advance()) else {
            return;
        };
        self.stage_results.push(StageResult {
            stage,
            elapsed: started.elapsed(),
        });
        debug!(from = ?self.state, to = ?next, "transition");
        self.state = next;
    }
}
