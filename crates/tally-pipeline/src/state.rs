use serde::{Deserialize, Serialize};

use crate::error::Stage;

/// Where a pipeline run currently is.
///
/// ```text
/// Start -> Resolved -> Retrieved -> Transformed -> Published
///   \_________\____________\_____________\______-> Failed { stage, cause }
/// ```
/// No state is revisited. `Published` and `Failed` are terminal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PipelineState {
    Start,
    Resolved,
    Retrieved,
    Transformed,
    Published,
    Failed { stage: Stage, cause: String },
}

impl PipelineState {
    /// The next state on the success path, or `None` from a terminal state.
    pub fn advance(&self) -> Option<PipelineState> {
        match self {
            Self::Start => Some(Self::Resolved),
            Self::Resolved => Some(Self::Retrieved),
            Self::Retrieved => Some(Self::Transformed),
            Self::Transformed => Some(Self::Published),
            Self::Published | Self::Failed { .. } => None,
        }
    }

    /// The stage that runs when leaving this state.
    pub fn pending_stage(&self) -> Option<Stage> {
        match self {
            Self::Start => Some(Stage::Resolve),
            Self::Resolved => Some(Stage::Retrieve),
            Self::Retrieved => Some(Stage::Transform),
            Self::Transformed => Some(Stage::Publish),
            Self::Published | Self::Failed { .. } => None,
        }
    }
}
