//! Stage executor interfaces
//!
//! Each external capability the pipeline depends on sits behind a trait so
//! the orchestrator can be constructed with real adapters (see
//! `crate::gateway`) or with fakes in tests. All traits are object safe and
//! shared as `Arc<dyn ...>`.

use async_trait::async_trait;
use intervue_core::domain::analysis::{
    ContentAnalysis, EmbeddingAnalysis, Explanation, FlowAnalysis, JdRelevance, PiiEntity,
    ResumeAlignment, SentimentAnalysis,
};
use intervue_core::domain::transcript::{Transcript, TranscriptSegment};
use intervue_core::extract::ExtractError;
use thiserror::Error;

/// Typed failure of a single stage
#[derive(Debug, Error)]
pub enum StageError {
    #[error("request to {capability} failed: {source}")]
    Transport {
        capability: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{capability} returned {status}: {message}")]
    Api {
        capability: String,
        status: u16,
        message: String,
    },

    #[error("malformed {capability} output: {source}")]
    MalformedOutput {
        capability: String,
        #[source]
        source: ExtractError,
    },

    #[error("invalid {capability} output: {reason}")]
    InvalidOutput { capability: String, reason: String },

    #[error("transcription failed: {0}")]
    Transcription(String),

    #[error("{0} is not available")]
    Unavailable(String),
}

/// A stage result together with the tokens it consumed
#[derive(Debug, Clone, PartialEq)]
pub struct Metered<T> {
    pub value: T,
    pub tokens: u64,
}

impl<T> Metered<T> {
    pub fn new(value: T, tokens: u64) -> Self {
        Self { value, tokens }
    }
}

/// The model-backed analysis capabilities
#[async_trait]
pub trait AnalysisServices: Send + Sync {
    /// Speech-to-text with speaker diarization
    async fn transcribe(&self, audio_path: &str) -> Result<Metered<Transcript>, StageError>;

    async fn classify_content(
        &self,
        segments: &[TranscriptSegment],
    ) -> Result<Metered<ContentAnalysis>, StageError>;

    async fn detect_pii(&self, text: &str) -> Result<Metered<Vec<PiiEntity>>, StageError>;

    async fn analyze_sentiment(
        &self,
        segments: &[TranscriptSegment],
        content: &ContentAnalysis,
    ) -> Result<Metered<SentimentAnalysis>, StageError>;

    async fn analyze_jd_relevance(
        &self,
        job_description: &str,
        segments: &[TranscriptSegment],
        content: &ContentAnalysis,
    ) -> Result<Metered<JdRelevance>, StageError>;

    async fn analyze_flow(
        &self,
        segments: &[TranscriptSegment],
        content: &ContentAnalysis,
    ) -> Result<Metered<FlowAnalysis>, StageError>;

    /// Interview-only alignment when `resume_text` is `None`
    async fn analyze_resume_alignment(
        &self,
        resume_text: Option<&str>,
        segments: &[TranscriptSegment],
        job_description: &str,
    ) -> Result<Metered<ResumeAlignment>, StageError>;

    /// Explains a scored decision (e.g. "jd_relevance", 72.0)
    async fn explain(
        &self,
        decision: &str,
        score: f64,
        context: &serde_json::Value,
    ) -> Result<Metered<Explanation>, StageError>;
}

/// Encrypts redacted transcripts at rest
#[async_trait]
pub trait Encryptor: Send + Sync {
    async fn encrypt(&self, plaintext: &str) -> Result<String, StageError>;
}

/// Optional semantic embeddings
///
/// Chosen once at startup: a gateway-backed adapter when embeddings are
/// enabled, [`DisabledEmbeddings`] otherwise.
#[async_trait]
pub trait EmbeddingCapability: Send + Sync {
    fn is_enabled(&self) -> bool;

    async fn analyze(
        &self,
        segments: &[TranscriptSegment],
        job_description: &str,
    ) -> Result<Metered<EmbeddingAnalysis>, StageError>;
}

/// No-op embeddings; runs built with it have no embeddings step
pub struct DisabledEmbeddings;

#[async_trait]
impl EmbeddingCapability for DisabledEmbeddings {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn analyze(
        &self,
        _segments: &[TranscriptSegment],
        _job_description: &str,
    ) -> Result<Metered<EmbeddingAnalysis>, StageError> {
        Err(StageError::Unavailable("embeddings".to_string()))
    }
}
