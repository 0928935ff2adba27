//! Interview processing pipeline
//!
//! The orchestrator sequences stages over a static step plan, the tracker
//! owns step transitions, and the monitor records one summary per run.
//! External capabilities are reached only through the traits in [`stages`].

pub mod aggregate;
pub mod error;
pub mod monitor;
pub mod orchestrator;
pub mod plan;
pub mod stages;
pub mod tracker;

pub use error::PipelineError;
pub use monitor::{PipelineMonitor, RunOutcome};
pub use orchestrator::{DEFAULT_LEASE_TTL, PipelineOrchestrator};
pub use plan::{PipelineStage, StepPlan};
pub use stages::{
    AnalysisServices, DisabledEmbeddings, EmbeddingCapability, Encryptor, Metered, StageError,
};
pub use tracker::{StepTracker, TrackerError};
