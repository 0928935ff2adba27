//! Gateway-backed analysis services
//!
//! Maps each analysis capability onto a gateway endpoint. Request bodies are
//! camelCase JSON; outputs are parsed and validated by [`GatewayClient`].

use async_trait::async_trait;
use intervue_core::domain::analysis::{
    ContentAnalysis, Explanation, FlowAnalysis, JdRelevance, PiiEntity, ResumeAlignment,
    SentimentAnalysis,
};
use intervue_core::domain::transcript::{Transcript, TranscriptSegment};
use serde::Serialize;

use crate::gateway::client::GatewayClient;
use crate::service::pipeline::{AnalysisServices, Metered, StageError};

// =============================================================================
// Request bodies
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TranscribeInput<'a> {
    audio_path: &'a str,
    diarize: bool,
}

#[derive(Debug, Serialize)]
struct SegmentsInput<'a> {
    segments: &'a [TranscriptSegment],
}

#[derive(Debug, Serialize)]
struct TextInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct ContentInput<'a> {
    segments: &'a [TranscriptSegment],
    content: &'a ContentAnalysis,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JdRelevanceInput<'a> {
    job_description: &'a str,
    segments: &'a [TranscriptSegment],
    content: &'a ContentAnalysis,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResumeAlignmentInput<'a> {
    resume_text: Option<&'a str>,
    segments: &'a [TranscriptSegment],
    job_description: &'a str,
}

#[derive(Debug, Serialize)]
struct ExplainInput<'a> {
    decision: &'a str,
    score: f64,
    context: &'a serde_json::Value,
}

/// [`AnalysisServices`] over the analysis gateway
#[derive(Debug, Clone)]
pub struct GatewayAnalysis {
    client: GatewayClient,
}

impl GatewayAnalysis {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AnalysisServices for GatewayAnalysis {
    async fn transcribe(&self, audio_path: &str) -> Result<Metered<Transcript>, StageError> {
        let input = TranscribeInput {
            audio_path,
            diarize: true,
        };

        let transcript: Metered<Transcript> = self
            .client
            .invoke("transcribe", &input)
            .await
            .map_err(|e| StageError::Transcription(e.to_string()))?;

        if transcript.value.segments.is_empty() {
            return Err(StageError::Transcription(format!(
                "no speech segments returned for {}",
                audio_path
            )));
        }

        Ok(transcript)
    }

    async fn classify_content(
        &self,
        segments: &[TranscriptSegment],
    ) -> Result<Metered<ContentAnalysis>, StageError> {
        self.client
            .invoke_checked("classify-content", &SegmentsInput { segments })
            .await
    }

    async fn detect_pii(&self, text: &str) -> Result<Metered<Vec<PiiEntity>>, StageError> {
        self.client
            .invoke_checked("detect-pii", &TextInput { text })
            .await
    }

    async fn analyze_sentiment(
        &self,
        segments: &[TranscriptSegment],
        content: &ContentAnalysis,
    ) -> Result<Metered<SentimentAnalysis>, StageError> {
        self.client
            .invoke_checked("sentiment", &ContentInput { segments, content })
            .await
    }

    async fn analyze_jd_relevance(
        &self,
        job_description: &str,
        segments: &[TranscriptSegment],
        content: &ContentAnalysis,
    ) -> Result<Metered<JdRelevance>, StageError> {
        let input = JdRelevanceInput {
            job_description,
            segments,
            content,
        };
        self.client.invoke_checked("jd-relevance", &input).await
    }

    async fn analyze_flow(
        &self,
        segments: &[TranscriptSegment],
        content: &ContentAnalysis,
    ) -> Result<Metered<FlowAnalysis>, StageError> {
        self.client
            .invoke_checked("flow", &ContentInput { segments, content })
            .await
    }

    async fn analyze_resume_alignment(
        &self,
        resume_text: Option<&str>,
        segments: &[TranscriptSegment],
        job_description: &str,
    ) -> Result<Metered<ResumeAlignment>, StageError> {
        // Without a resume the gateway runs interview-only alignment
        let capability = match resume_text {
            Some(_) => "resume-alignment",
            None => "interview-alignment",
        };
        let input = ResumeAlignmentInput {
            resume_text,
            segments,
            job_description,
        };
        self.client.invoke_checked(capability, &input).await
    }

    async fn explain(
        &self,
        decision: &str,
        score: f64,
        context: &serde_json::Value,
    ) -> Result<Metered<Explanation>, StageError> {
        let input = ExplainInput {
            decision,
            score,
            context,
        };
        self.client.invoke_checked("explain", &input).await
    }
}
