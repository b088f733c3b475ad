//! The tally pipeline: fetch an object, derive a local artifact from it, and
//! publish the artifact back under the same key.
//!
//! Control flows strictly `resolve -> retrieve -> transform -> publish`. The
//! first failing stage aborts the run; nothing is retried and nothing done by
//! an earlier stage is rolled back.
//!
//! # Key Types
//!
//! - [`Pipeline`] -- runner holding the injected [`ObjectStore`](tally_store::ObjectStore)
//! - [`PipelineConfig`] -- container, key, transform mode and local write policy
//! - [`TransformMode`] -- `Increment` a decimal counter or `Copy` bytes verbatim
//! - [`PipelineState`] -- `Start -> Resolved -> Retrieved -> Transformed -> Published | Failed`
//! - [`PipelineError`] -- the failure of exactly one [`Stage`]

pub mod config;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod resolve;
pub mod stages;
pub mod state;

pub use config::{PipelineConfig, TransformMode, WriteStrategy};
pub use error::{ParseFailure, PipelineError, PipelineResult, ResolveError, Stage};
pub use pipeline::{Pipeline, PipelineReport, StageResult};
pub use progress::{NoOpProgress, ProgressHook};
pub use resolve::{resolve_local_name, LocalName};
pub use state::PipelineState;
