//! Fakes and fixtures shared by the pipeline integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use intervue_core::domain::analysis::{
    CandidateReport, ConfidenceLevel, ContentAnalysis, ContentType, EmbeddingAnalysis,
    Explanation, FlowAnalysis, JdRelevance, PiiEntity, PiiKind, RecommendedAction,
    RecruiterReport, ResumeAlignment, SentimentAnalysis, SkillGapAnalysis, SpeakerSentiment,
};
use intervue_core::domain::interview::{Interview, ProcessingStatus};
use intervue_core::domain::monitoring::PipelineMonitoringRecord;
use intervue_core::domain::report::{AnalysisReport, RecruiterMetrics};
use intervue_core::domain::step::{Step, StepStatus};
use intervue_core::domain::transcript::{Speaker, Transcript, TranscriptSegment};
use intervue_core::dto::interview::CreateInterview;
use intervue_orchestrator::repository::{InterviewStore, MemoryStore, StoreError};
use intervue_orchestrator::service::pipeline::{
    AnalysisServices, DisabledEmbeddings, EmbeddingCapability, Encryptor, Metered,
    PipelineOrchestrator, StageError,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub const TOKENS_PER_CALL: u64 = 100;

pub fn segment(speaker: Speaker, text: &str, timestamp: f64) -> TranscriptSegment {
    TranscriptSegment {
        speaker,
        text: text.to_string(),
        timestamp,
    }
}

/// A short recruiter/candidate exchange with one follow-up thread
pub fn interview_segments() -> Vec<TranscriptSegment> {
    vec![
        segment(
            Speaker::Recruiter,
            "Tell me about the payment platform you built at Globex?",
            0.0,
        ),
        segment(
            Speaker::Candidate,
            "I built the payment platform that handled receipts and refunds for merchants.",
            4.0,
        ),
        segment(
            Speaker::Recruiter,
            "How did the payment platform handle refunds at scale?",
            15.0,
        ),
        segment(
            Speaker::Candidate,
            "Refunds were queued and reconciled nightly against merchant receipts.",
            19.0,
        ),
    ]
}

pub fn monologue_segments() -> Vec<TranscriptSegment> {
    vec![
        segment(Speaker::Candidate, "Welcome to my channel.", 0.0),
        segment(Speaker::Candidate, "Today I will talk about sourdough.", 3.0),
    ]
}

fn transcript_of(segments: &[TranscriptSegment]) -> Transcript {
    Transcript {
        text: segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" "),
        segments: segments.to_vec(),
    }
}

pub fn request(resume_text: Option<&str>) -> CreateInterview {
    CreateInterview {
        candidate_name: Some("Dana Reyes".to_string()),
        audio_path: "s3://interviews/dana.wav".to_string(),
        resume_text: resume_text.map(str::to_string),
        job_description: "Senior backend engineer for a payments team".to_string(),
    }
}

/// Capability names a [`FakeServices`] can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Transcribe,
    Classify,
    Pii,
    Sentiment,
    JdRelevance,
    Flow,
    Alignment,
    Explain,
}

/// Deterministic analysis services
pub struct FakeServices {
    pub segments: Vec<TranscriptSegment>,
    pub content_type: ContentType,
    pub failing: Option<Capability>,
    /// Reported instead of the located "Globex" mention
    pub pii: Option<Vec<PiiEntity>>,
}

impl FakeServices {
    pub fn new(segments: Vec<TranscriptSegment>) -> Self {
        Self {
            segments,
            content_type: ContentType::Interview,
            failing: None,
            pii: None,
        }
    }

    pub fn with_pii(mut self, entities: Vec<PiiEntity>) -> Self {
        self.pii = Some(entities);
        self
    }

    pub fn failing(mut self, capability: Capability) -> Self {
        self.failing = Some(capability);
        self
    }

    fn check(&self, capability: Capability) -> Result<(), StageError> {
        if self.failing == Some(capability) {
            return Err(StageError::Api {
                capability: format!("{:?}", capability),
                status: 503,
                message: "upstream unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AnalysisServices for FakeServices {
    async fn transcribe(&self, _audio_path: &str) -> Result<Metered<Transcript>, StageError> {
        if self.failing == Some(Capability::Transcribe) {
            return Err(StageError::Transcription("unreadable audio".to_string()));
        }
        Ok(Metered::new(transcript_of(&self.segments), TOKENS_PER_CALL))
    }

    async fn classify_content(
        &self,
        _segments: &[TranscriptSegment],
    ) -> Result<Metered<ContentAnalysis>, StageError> {
        self.check(Capability::Classify)?;
        Ok(Metered::new(
            ContentAnalysis {
                content_type: self.content_type,
                speaker_count: 2,
                topics: vec!["payments".to_string()],
                is_job_related: true,
                recommended_analysis: vec![],
            },
            TOKENS_PER_CALL,
        ))
    }

    async fn detect_pii(&self, text: &str) -> Result<Metered<Vec<PiiEntity>>, StageError> {
        self.check(Capability::Pii)?;
        if let Some(entities) = &self.pii {
            return Ok(Metered::new(entities.clone(), TOKENS_PER_CALL));
        }
        let entities = text
            .find("Globex")
            .map(|start| PiiEntity {
                kind: PiiKind::Other,
                text: "Globex".to_string(),
                start,
                end: start + "Globex".len(),
            })
            .into_iter()
            .collect();
        Ok(Metered::new(entities, TOKENS_PER_CALL))
    }

    async fn analyze_sentiment(
        &self,
        _segments: &[TranscriptSegment],
        _content: &ContentAnalysis,
    ) -> Result<Metered<SentimentAnalysis>, StageError> {
        self.check(Capability::Sentiment)?;
        let sentiment = |score: f64| SpeakerSentiment {
            score,
            label: "positive".to_string(),
        };
        Ok(Metered::new(
            SentimentAnalysis {
                recruiter_sentiment: sentiment(0.4),
                candidate_sentiment: sentiment(0.6),
                timeline: None,
            },
            TOKENS_PER_CALL,
        ))
    }

    async fn analyze_jd_relevance(
        &self,
        _job_description: &str,
        _segments: &[TranscriptSegment],
        _content: &ContentAnalysis,
    ) -> Result<Metered<JdRelevance>, StageError> {
        self.check(Capability::JdRelevance)?;
        Ok(Metered::new(
            JdRelevance {
                overall_score: 78.0,
                category_breakdown: BTreeMap::from([("technical".to_string(), 82.0)]),
                question_relevance: vec![],
                answer_alignment: vec![],
                skill_gap_analysis: SkillGapAnalysis {
                    matched_skills: vec!["payments".to_string()],
                    missing_skills: vec!["kubernetes".to_string()],
                },
                recommended_action: RecommendedAction::Advance,
            },
            TOKENS_PER_CALL,
        ))
    }

    async fn analyze_flow(
        &self,
        _segments: &[TranscriptSegment],
        _content: &ContentAnalysis,
    ) -> Result<Metered<FlowAnalysis>, StageError> {
        self.check(Capability::Flow)?;
        Ok(Metered::new(
            FlowAnalysis {
                continuity_score: 70.0,
                flow_breaks: vec![],
                insights: vec!["questions build on answers".to_string()],
            },
            TOKENS_PER_CALL,
        ))
    }

    async fn analyze_resume_alignment(
        &self,
        _resume_text: Option<&str>,
        _segments: &[TranscriptSegment],
        _job_description: &str,
    ) -> Result<Metered<ResumeAlignment>, StageError> {
        self.check(Capability::Alignment)?;
        Ok(Metered::new(
            ResumeAlignment {
                resume_analysis: None,
                candidate_report: CandidateReport {
                    summary: "Strong payments background".to_string(),
                    strengths: vec![],
                    improvements: vec![],
                },
                recruiter_report: RecruiterReport {
                    summary: "Ask about infrastructure depth".to_string(),
                    recommendation: "advance".to_string(),
                    concerns: vec![],
                },
            },
            TOKENS_PER_CALL,
        ))
    }

    async fn explain(
        &self,
        decision: &str,
        _score: f64,
        _context: &serde_json::Value,
    ) -> Result<Metered<Explanation>, StageError> {
        self.check(Capability::Explain)?;
        Ok(Metered::new(
            Explanation {
                reasoning: vec![format!("{} score follows the transcript", decision)],
                evidence: vec![],
                confidence_level: ConfidenceLevel::Medium,
                alternatives: vec![],
            },
            TOKENS_PER_CALL,
        ))
    }
}

pub struct FakeEncryptor;

#[async_trait]
impl Encryptor for FakeEncryptor {
    async fn encrypt(&self, plaintext: &str) -> Result<String, StageError> {
        Ok(format!("enc:{}", plaintext))
    }
}

/// Enabled embeddings that either succeed or fail every call
pub struct FakeEmbeddings {
    pub fail: bool,
    pub delay: Duration,
}

impl FakeEmbeddings {
    pub fn working() -> Self {
        Self {
            fail: false,
            delay: Duration::ZERO,
        }
    }

    pub fn broken() -> Self {
        Self {
            fail: true,
            delay: Duration::ZERO,
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            fail: false,
            delay,
        }
    }
}

#[async_trait]
impl EmbeddingCapability for FakeEmbeddings {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn analyze(
        &self,
        _segments: &[TranscriptSegment],
        _job_description: &str,
    ) -> Result<Metered<EmbeddingAnalysis>, StageError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(StageError::Api {
                capability: "embeddings".to_string(),
                status: 500,
                message: "model crashed".to_string(),
            });
        }
        Ok(Metered::new(
            EmbeddingAnalysis {
                dimensions: 768,
                semantic_similarity: 0.71,
                topic_clusters: vec!["payments".to_string()],
            },
            TOKENS_PER_CALL,
        ))
    }
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub orchestrator: Arc<PipelineOrchestrator>,
}

impl Harness {
    pub fn new(services: FakeServices, embeddings: Arc<dyn EmbeddingCapability>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let orchestrator = PipelineOrchestrator::new(
            store.clone(),
            Arc::new(services),
            Arc::new(FakeEncryptor),
            embeddings,
        );

        Self {
            store,
            orchestrator: Arc::new(orchestrator),
        }
    }

    pub fn without_embeddings(services: FakeServices) -> Self {
        Self::new(services, Arc::new(DisabledEmbeddings))
    }

    pub async fn create(&self, resume_text: Option<&str>) -> Uuid {
        self.store
            .create_interview(request(resume_text))
            .await
            .expect("create interview")
            .id
    }
}

/// Memory store whose progress writes fail once the named step is complete
///
/// Writes that mark the run as failed always go through.
pub struct FailingProgressStore {
    pub inner: Arc<MemoryStore>,
    pub step: &'static str,
}

#[async_trait]
impl InterviewStore for FailingProgressStore {
    async fn create_interview(&self, req: CreateInterview) -> Result<Interview, StoreError> {
        self.inner.create_interview(req).await
    }

    async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>, StoreError> {
        self.inner.get_interview(id).await
    }

    async fn list_interviews(&self) -> Result<Vec<Interview>, StoreError> {
        self.inner.list_interviews().await
    }

    async fn update_interview(&self, interview: &Interview) -> Result<(), StoreError> {
        self.inner.update_interview(interview).await
    }

    async fn save_progress(
        &self,
        id: Uuid,
        status: ProcessingStatus,
        steps: &[Step],
        error_message: Option<&str>,
    ) -> Result<(), StoreError> {
        let step_done = steps
            .iter()
            .any(|s| s.name == self.step && s.status == StepStatus::Complete);
        if status != ProcessingStatus::Error && step_done {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        self.inner
            .save_progress(id, status, steps, error_message)
            .await
    }

    async fn create_analysis_report(&self, report: &AnalysisReport) -> Result<(), StoreError> {
        self.inner.create_analysis_report(report).await
    }

    async fn get_report(&self, interview_id: Uuid) -> Result<Option<AnalysisReport>, StoreError> {
        self.inner.get_report(interview_id).await
    }

    async fn create_recruiter_metrics(&self, metrics: &RecruiterMetrics) -> Result<(), StoreError> {
        self.inner.create_recruiter_metrics(metrics).await
    }

    async fn create_pipeline_monitoring(
        &self,
        record: &PipelineMonitoringRecord,
    ) -> Result<(), StoreError> {
        self.inner.create_pipeline_monitoring(record).await
    }

    async fn acquire_lease(
        &self,
        interview_id: Uuid,
        run_id: Uuid,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        self.inner.acquire_lease(interview_id, run_id, ttl).await
    }

    async fn release_lease(&self, interview_id: Uuid, run_id: Uuid) -> Result<(), StoreError> {
        self.inner.release_lease(interview_id, run_id).await
    }
}
