use thiserror::Error;
use uuid::Uuid;

use crate::repository::StoreError;
use crate::service::pipeline::stages::StageError;
use crate::service::pipeline::tracker::TrackerError;

/// Why a run did not complete
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("interview {0} not found")]
    NotFound(Uuid),

    /// Fatal input problem; never retried
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{stage} failed: {source}")]
    Stage {
        stage: String,
        #[source]
        source: StageError,
    },

    #[error("interview {0} is already being processed")]
    AlreadyRunning(Uuid),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

impl PipelineError {
    /// Wraps a stage failure with the stage's name
    pub fn stage(stage: &str) -> impl FnOnce(StageError) -> PipelineError + '_ {
        move |source| PipelineError::Stage {
            stage: stage.to_string(),
            source,
        }
    }
}
