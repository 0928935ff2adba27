//! Pipeline orchestrator
//!
//! Drives one run of the baseline or enhanced pipeline for an interview:
//! sequences stages, fans out stage groups, moves the step tracker and
//! writes every transition through to the store before the next stage
//! starts. Required stage failures abort the run with exactly one step in
//! `error`; the optional embeddings stage only degrades its own step.

use chrono::{DateTime, Utc};
use intervue_core::domain::analysis::{
    ContentAnalysis, ContentType, EmbeddingAnalysis, FlowAnalysis, JdRelevance, PiiEntity,
    ResumeAlignment, SentimentAnalysis, redact_pii,
};
use intervue_core::domain::flow::ConversationFlow;
use intervue_core::domain::interview::{Interview, ProcessingStatus};
use intervue_core::domain::report::Explanations;
use intervue_core::domain::run::{PipelineKind, PipelineRun};
use intervue_core::domain::step::{Step, StepStatus};
use intervue_core::domain::transcript::Transcript;
use intervue_core::dto::interview::ProcessingAccepted;
use intervue_core::flow;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::repository::InterviewStore;
use crate::service::pipeline::aggregate::{self, StageOutputs};
use crate::service::pipeline::error::PipelineError;
use crate::service::pipeline::monitor::{PipelineMonitor, RunOutcome};
use crate::service::pipeline::plan::{PipelineStage, StepPlan};
use crate::service::pipeline::stages::{
    AnalysisServices, EmbeddingCapability, Encryptor, Metered, StageError,
};
use crate::service::pipeline::tracker::{StepTracker, TrackerError};

pub const DEFAULT_LEASE_TTL: Duration = Duration::from_secs(30 * 60);

pub struct PipelineOrchestrator {
    store: Arc<dyn InterviewStore>,
    services: Arc<dyn AnalysisServices>,
    encryptor: Arc<dyn Encryptor>,
    embeddings: Arc<dyn EmbeddingCapability>,
    monitor: PipelineMonitor,
    lease_ttl: Duration,
}

/// Mutable state of one run; only the orchestrator touches it
struct Run {
    interview: Interview,
    plan: StepPlan,
    tracker: StepTracker,
    record: PipelineRun,
    /// Stage begun or being settled whose terminal state is not yet persisted
    active: Option<PipelineStage>,
}

impl Run {
    fn new(mut interview: Interview, run_id: Uuid, plan: StepPlan) -> Self {
        let steps = plan.steps();
        interview.processing_status = ProcessingStatus::Processing;
        interview.error_message = None;
        interview.steps = steps.clone();
        let mut record = PipelineRun::new(interview.id, plan.kind(), steps.clone());
        record.run_id = run_id;

        Self {
            interview,
            plan,
            tracker: StepTracker::new(steps),
            record,
            active: None,
        }
    }

    fn id(&self) -> Uuid {
        self.interview.id
    }

    fn kind(&self) -> PipelineKind {
        self.plan.kind()
    }

    fn index(&self, stage: PipelineStage) -> Result<usize, TrackerError> {
        self.plan
            .index_of(stage)
            .ok_or_else(|| TrackerError::UnknownStep(self.plan.label(stage).to_string()))
    }

    fn outcome(&self, error: Option<&PipelineError>) -> RunOutcome {
        RunOutcome {
            interview_id: self.id(),
            run_id: self.record.run_id,
            pipeline: self.kind(),
            started_at: self.record.started_at,
            steps: self.tracker.snapshot(),
            error: error.map(|e| e.to_string()),
        }
    }
}

/// Outcome of the embeddings call and the window it ran in
struct EmbeddingsAttempt {
    result: Result<Metered<EmbeddingAnalysis>, StageError>,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

struct ContentOutputs {
    content: ContentAnalysis,
    sentiment: SentimentAnalysis,
    pii: Option<Vec<PiiEntity>>,
}

struct RelevanceOutputs {
    jd_relevance: JdRelevance,
    flow: FlowAnalysis,
    resume_alignment: Option<ResumeAlignment>,
    conversation: Option<ConversationFlow>,
    embedding_analysis: Option<EmbeddingAnalysis>,
}

impl PipelineOrchestrator {
    pub fn new(
        store: Arc<dyn InterviewStore>,
        services: Arc<dyn AnalysisServices>,
        encryptor: Arc<dyn Encryptor>,
        embeddings: Arc<dyn EmbeddingCapability>,
    ) -> Self {
        Self {
            monitor: PipelineMonitor::new(store.clone()),
            store,
            services,
            encryptor,
            embeddings,
            lease_ttl: DEFAULT_LEASE_TTL,
        }
    }

    pub fn with_lease_ttl(mut self, lease_ttl: Duration) -> Self {
        self.lease_ttl = lease_ttl;
        self
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    /// Runs the baseline pipeline to completion
    pub async fn process(&self, interview_id: Uuid) -> Result<(), PipelineError> {
        self.run(PipelineKind::Baseline, interview_id).await
    }

    /// Runs the enhanced pipeline to completion
    pub async fn process_enhanced(&self, interview_id: Uuid) -> Result<(), PipelineError> {
        self.run(PipelineKind::Enhanced, interview_id).await
    }

    /// Claims the interview and runs the pipeline in the background
    ///
    /// Lookup and lease conflicts are reported to the caller; everything after
    /// that is observable only through the persisted steps.
    pub async fn launch(
        self: Arc<Self>,
        kind: PipelineKind,
        interview_id: Uuid,
    ) -> Result<ProcessingAccepted, PipelineError> {
        let run = self.start(kind, interview_id).await?;
        let run_id = run.record.run_id;

        tokio::spawn(async move {
            if let Err(e) = self.finish(run).await {
                tracing::warn!(%interview_id, %run_id, "Background pipeline run failed: {}", e);
            }
        });

        Ok(ProcessingAccepted {
            interview_id,
            run_id,
            pipeline: kind,
        })
    }

    async fn run(&self, kind: PipelineKind, interview_id: Uuid) -> Result<(), PipelineError> {
        let run = self.start(kind, interview_id).await?;
        self.finish(run).await
    }

    /// Claims the interview and persists the fresh step list
    ///
    /// Once this returns, pollers see the new run rather than a previous
    /// terminal state.
    async fn start(&self, kind: PipelineKind, interview_id: Uuid) -> Result<Run, PipelineError> {
        let interview = self
            .store
            .get_interview(interview_id)
            .await?
            .ok_or(PipelineError::NotFound(interview_id))?;

        let run_id = Uuid::new_v4();
        if !self
            .store
            .acquire_lease(interview_id, run_id, self.lease_ttl)
            .await?
        {
            tracing::warn!(%interview_id, "Rejected run: interview is already being processed");
            return Err(PipelineError::AlreadyRunning(interview_id));
        }

        let plan = StepPlan::new(kind, self.embeddings.is_enabled());
        let mut run = Run::new(interview, run_id, plan);

        let snapshot = run.tracker.snapshot();
        if let Err(e) = self
            .persist(&mut run, snapshot, ProcessingStatus::Processing)
            .await
        {
            self.release(&run).await;
            return Err(e);
        }

        tracing::info!(%interview_id, %run_id, pipeline = %kind, "Starting pipeline run");
        Ok(run)
    }

    /// Drives a started run to its terminal state and releases the lease
    async fn finish(&self, mut run: Run) -> Result<(), PipelineError> {
        let result = self.drive(&mut run).await;

        match &result {
            Ok(()) => {
                tracing::info!(interview_id = %run.id(), run_id = %run.record.run_id, "Pipeline run complete")
            }
            Err(e) => self.fail(&mut run, e).await,
        }

        self.monitor.record(&run.outcome(result.as_ref().err())).await;
        self.release(&run).await;

        result
    }

    async fn release(&self, run: &Run) {
        if let Err(e) = self.store.release_lease(run.id(), run.record.run_id).await {
            tracing::warn!(
                interview_id = %run.id(),
                run_id = %run.record.run_id,
                "Failed to release run lease: {}",
                e
            );
        }
    }

    async fn drive(&self, run: &mut Run) -> Result<(), PipelineError> {
        let transcript = self.transcribe(run).await?;
        self.validate(run, &transcript).await?;

        let content = self.analyze_content(run, &transcript).await?;

        let pii_entity_count = match &content.pii {
            Some(entities) => Some(self.encrypt(run, &transcript, entities).await?),
            None => None,
        };

        let relevance = self
            .analyze_relevance(run, &transcript, &content.content)
            .await?;

        let explanations = if run.plan.contains(PipelineStage::Explainability) {
            Some(self.explain(run, &content, &relevance).await?)
        } else {
            None
        };

        let outputs = StageOutputs {
            content: content.content,
            sentiment: content.sentiment,
            jd_relevance: relevance.jd_relevance,
            flow: relevance.flow,
            conversation: relevance.conversation,
            pii_entity_count,
            resume_alignment: relevance.resume_alignment,
            explanations,
            embedding_analysis: relevance.embedding_analysis,
        };

        self.generate_report(run, &transcript, outputs).await
    }

    // =========================================================================
    // Stages
    // =========================================================================

    /// Stage 1: speech to text; persists the transcript
    async fn transcribe(&self, run: &mut Run) -> Result<Transcript, PipelineError> {
        let stage = PipelineStage::Transcription;
        self.begin(run, stage).await?;

        let audio_path = run.interview.audio_path.clone();
        let transcript = self
            .services
            .transcribe(&audio_path)
            .await
            .map_err(PipelineError::stage(run.plan.label(stage)))?;

        let index = run.index(stage)?;
        run.tracker.record_metrics(index, 1, transcript.tokens)?;

        run.interview.transcript = Some(transcript.value.clone());
        run.interview.steps = run.tracker.snapshot();
        self.store.update_interview(&run.interview).await?;

        let message = format!("{} segments transcribed", transcript.value.segments.len());
        self.complete(run, stage, message).await?;

        Ok(transcript.value)
    }

    /// Gate: an interview needs at least two distinct speakers
    async fn validate(&self, run: &mut Run, transcript: &Transcript) -> Result<(), PipelineError> {
        let stage = PipelineStage::Validation;
        self.begin(run, stage).await?;

        let speakers = transcript.distinct_speakers();
        if speakers < 2 {
            return Err(PipelineError::InvalidInput(format!(
                "transcript has {} distinct speaker(s); an interview needs a recruiter and a candidate",
                speakers
            )));
        }

        self.complete(run, stage, format!("{} speakers detected", speakers))
            .await
    }

    /// Stage 2: {classification then sentiment} alongside PII detection
    async fn analyze_content(
        &self,
        run: &mut Run,
        transcript: &Transcript,
    ) -> Result<ContentOutputs, PipelineError> {
        let stage = PipelineStage::ContentAnalysis;
        self.begin(run, stage).await?;

        let with_pii = run.kind() == PipelineKind::Enhanced;
        let segments = transcript.segments.as_slice();

        let classified = async {
            let content = self
                .services
                .classify_content(segments)
                .await
                .map_err(PipelineError::stage("Content classification"))?;
            ensure_interview(&content.value)?;

            let sentiment = self
                .services
                .analyze_sentiment(segments, &content.value)
                .await
                .map_err(PipelineError::stage("Sentiment analysis"))?;

            Ok::<_, PipelineError>((content, sentiment))
        };

        let pii = async {
            if !with_pii {
                return Ok(None);
            }
            self.services
                .detect_pii(&transcript.text)
                .await
                .map(Some)
                .map_err(PipelineError::stage("PII detection"))
        };

        let ((content, sentiment), pii) = tokio::try_join!(classified, pii)?;

        let index = run.index(stage)?;
        let calls = 2 + u32::from(pii.is_some());
        let tokens = content.tokens + sentiment.tokens + pii.as_ref().map_or(0, |p| p.tokens);
        run.tracker.record_metrics(index, calls, tokens)?;

        let message = match &pii {
            Some(entities) => format!(
                "Content classified; {} PII entities found",
                entities.value.len()
            ),
            None => "Content classified".to_string(),
        };
        self.complete(run, stage, message).await?;

        Ok(ContentOutputs {
            content: content.value,
            sentiment: sentiment.value,
            pii: pii.map(|p| p.value),
        })
    }

    /// Stage 3: local redaction, then encryption by the vault
    ///
    /// Returns the number of entities actually redacted.
    async fn encrypt(
        &self,
        run: &mut Run,
        transcript: &Transcript,
        entities: &[PiiEntity],
    ) -> Result<usize, PipelineError> {
        let stage = PipelineStage::Encryption;
        self.begin(run, stage).await?;

        let redaction = redact_pii(&transcript.text, entities);
        for entity in &redaction.unresolved {
            tracing::warn!(
                interview_id = %run.id(),
                kind = ?entity.kind,
                start = entity.start,
                end = entity.end,
                "PII entity not found in transcript, left unredacted"
            );
        }

        let ciphertext = self
            .encryptor
            .encrypt(&redaction.text)
            .await
            .map_err(PipelineError::stage(run.plan.label(stage)))?;

        let index = run.index(stage)?;
        run.tracker.record_metrics(index, 1, 0)?;

        run.interview.encrypted_transcript = Some(ciphertext);
        run.interview.steps = run.tracker.snapshot();
        self.store.update_interview(&run.interview).await?;

        let message = match redaction.unresolved.len() {
            0 => format!("{} PII entities redacted", redaction.redacted),
            missed => format!(
                "{} PII entities redacted, {} not found in transcript",
                redaction.redacted, missed
            ),
        };
        self.complete(run, stage, message).await?;

        Ok(redaction.redacted)
    }

    /// Stage 4: local flow graph, then relevance, flow, alignment and
    /// optional embeddings concurrently
    async fn analyze_relevance(
        &self,
        run: &mut Run,
        transcript: &Transcript,
        content: &ContentAnalysis,
    ) -> Result<RelevanceOutputs, PipelineError> {
        let stage = PipelineStage::RelevanceAnalysis;
        self.begin(run, stage).await?;

        let enhanced = run.kind() == PipelineKind::Enhanced;
        let with_embeddings = run.plan.contains(PipelineStage::Embeddings);
        let job_description = run.interview.job_description.clone();
        let resume_text = run.interview.resume_text.clone();
        let segments = transcript.segments.as_slice();

        let conversation = enhanced.then(|| flow::analyze_transcript(transcript));

        let required = async {
            let jd = async {
                self.services
                    .analyze_jd_relevance(&job_description, segments, content)
                    .await
                    .map_err(PipelineError::stage("Job description relevance"))
            };
            let flow = async {
                self.services
                    .analyze_flow(segments, content)
                    .await
                    .map_err(PipelineError::stage("Flow analysis"))
            };
            let alignment = async {
                if !enhanced {
                    return Ok(None);
                }
                self.services
                    .analyze_resume_alignment(resume_text.as_deref(), segments, &job_description)
                    .await
                    .map(Some)
                    .map_err(PipelineError::stage("Resume alignment"))
            };
            let outputs = tokio::try_join!(jd, flow, alignment);
            (outputs, Utc::now())
        };

        let optional = async {
            if !with_embeddings {
                return None;
            }
            let started_at = Utc::now();
            let result = self.embeddings.analyze(segments, &job_description).await;
            Some(EmbeddingsAttempt {
                result,
                started_at,
                completed_at: Utc::now(),
            })
        };

        let ((required, required_done), embeddings) = tokio::join!(required, optional);
        let (jd_relevance, flow, alignment) = required?;

        let index = run.index(stage)?;
        let calls = 2 + u32::from(alignment.is_some());
        let tokens =
            jd_relevance.tokens + flow.tokens + alignment.as_ref().map_or(0, |a| a.tokens);
        run.tracker.record_metrics(index, calls, tokens)?;

        let message = match &conversation {
            Some(local) => format!(
                "Relevance {:.0}/100, {} missed follow-ups",
                jd_relevance.value.overall_score,
                local.missed_follow_ups.len()
            ),
            None => format!("Relevance {:.0}/100", jd_relevance.value.overall_score),
        };
        self.complete_at(run, stage, message, required_done).await?;

        let embedding_analysis = match embeddings {
            Some(attempt) => self.settle_embeddings(run, attempt).await?,
            None => None,
        };

        Ok(RelevanceOutputs {
            jd_relevance: jd_relevance.value,
            flow: flow.value,
            resume_alignment: alignment.map(|a| a.value),
            conversation,
            embedding_analysis,
        })
    }

    /// Settles the embeddings step after its group joined; failure only degrades it
    async fn settle_embeddings(
        &self,
        run: &mut Run,
        attempt: EmbeddingsAttempt,
    ) -> Result<Option<EmbeddingAnalysis>, PipelineError> {
        let stage = PipelineStage::Embeddings;
        let index = run.index(stage)?;
        run.active = Some(stage);

        let (message, analysis) = match attempt.result {
            Ok(embeddings) => {
                run.tracker.record_metrics(index, 1, embeddings.tokens)?;
                let message = format!("{} dimensions", embeddings.value.dimensions);
                (message, Some(embeddings.value))
            }
            Err(e) => {
                tracing::warn!(
                    interview_id = %run.id(),
                    stage = run.plan.label(stage),
                    "Optional stage failed, continuing without it: {}",
                    e
                );
                run.tracker.record_metrics(index, 1, 0)?;
                run.tracker.warn(index, e.to_string())?;
                ("Skipped: embeddings unavailable".to_string(), None)
            }
        };

        let mut tracker = run.tracker.clone();
        let snapshot = tracker.settle(
            index,
            StepStatus::Complete,
            Some(message),
            attempt.started_at,
            attempt.completed_at,
        )?;
        self.commit(run, stage, tracker, snapshot, ProcessingStatus::Processing)
            .await?;

        Ok(analysis)
    }

    /// Stage 5: explanations for the relevance, flow and sentiment scores
    async fn explain(
        &self,
        run: &mut Run,
        content: &ContentOutputs,
        relevance: &RelevanceOutputs,
    ) -> Result<Explanations, PipelineError> {
        let stage = PipelineStage::Explainability;
        self.begin(run, stage).await?;

        let flow_score =
            aggregate::blended_flow_score(&relevance.flow, relevance.conversation.as_ref());
        let sentiment_score = content.sentiment.overall_score();
        let context = serde_json::json!({
            "contentType": content.content.content_type,
            "topics": content.content.topics,
            "recommendedAction": relevance.jd_relevance.recommended_action,
            "missingSkills": relevance.jd_relevance.skill_gap_analysis.missing_skills,
            "flowBreaks": relevance.flow.flow_breaks.len(),
            "missedFollowUps": relevance
                .conversation
                .as_ref()
                .map(|c| c.missed_follow_ups.len()),
            "candidateSentiment": content.sentiment.candidate_sentiment.label,
        });

        let label = run.plan.label(stage);
        let (jd_relevance, flow, sentiment) = tokio::try_join!(
            async {
                self.services
                    .explain("jd_relevance", relevance.jd_relevance.overall_score, &context)
                    .await
                    .map_err(PipelineError::stage(label))
            },
            async {
                self.services
                    .explain("flow", flow_score, &context)
                    .await
                    .map_err(PipelineError::stage(label))
            },
            async {
                self.services
                    .explain("sentiment", sentiment_score, &context)
                    .await
                    .map_err(PipelineError::stage(label))
            }
        )?;

        let index = run.index(stage)?;
        let tokens = jd_relevance.tokens + flow.tokens + sentiment.tokens;
        run.tracker.record_metrics(index, 3, tokens)?;
        self.complete(run, stage, "3 scores explained".to_string())
            .await?;

        Ok(Explanations {
            jd_relevance: jd_relevance.value,
            flow: flow.value,
            sentiment: sentiment.value,
        })
    }

    /// Aggregates, persists the report and metrics, and completes the run
    async fn generate_report(
        &self,
        run: &mut Run,
        transcript: &Transcript,
        outputs: StageOutputs,
    ) -> Result<(), PipelineError> {
        let stage = PipelineStage::ReportGeneration;
        self.begin(run, stage).await?;

        let local = match &outputs.conversation {
            Some(conversation) => conversation.clone(),
            None => flow::analyze_transcript(transcript),
        };
        let metrics = aggregate::recruiter_metrics(run.id(), transcript, &local);
        let report = aggregate::build_report(run.id(), run.kind(), outputs);

        self.store.create_analysis_report(&report).await?;
        self.store.create_recruiter_metrics(&metrics).await?;

        // The last step and the run complete in one write
        let index = run.index(stage)?;
        let mut tracker = run.tracker.clone();
        let snapshot = tracker.advance(
            index,
            StepStatus::Complete,
            Some(format!("Report {} saved", report.id)),
        )?;
        self.commit(run, stage, tracker, snapshot, ProcessingStatus::Complete)
            .await?;

        run.record.status = ProcessingStatus::Complete;
        run.interview.processing_status = ProcessingStatus::Complete;

        Ok(())
    }

    // =========================================================================
    // Step transitions
    // =========================================================================

    async fn begin(&self, run: &mut Run, stage: PipelineStage) -> Result<(), PipelineError> {
        tracing::info!(
            interview_id = %run.id(),
            stage = run.plan.label(stage),
            "Stage started"
        );

        let index = run.index(stage)?;
        run.active = Some(stage);
        let snapshot = run.tracker.advance(
            index,
            StepStatus::Processing,
            Some(stage.progress_message().to_string()),
        )?;
        self.persist(run, snapshot, ProcessingStatus::Processing)
            .await
    }

    async fn complete(
        &self,
        run: &mut Run,
        stage: PipelineStage,
        message: String,
    ) -> Result<(), PipelineError> {
        self.complete_at(run, stage, message, Utc::now()).await
    }

    /// Completes the in-flight step as of `at`
    async fn complete_at(
        &self,
        run: &mut Run,
        stage: PipelineStage,
        message: String,
        at: DateTime<Utc>,
    ) -> Result<(), PipelineError> {
        let index = run.index(stage)?;
        let mut tracker = run.tracker.clone();
        let snapshot = tracker.advance_at(index, StepStatus::Complete, Some(message), at)?;
        self.commit(run, stage, tracker, snapshot, ProcessingStatus::Processing)
            .await
    }

    /// Persists a terminal transition, then adopts it
    ///
    /// Until the write succeeds the run keeps the previous tracker, so a
    /// failed write leaves the step in flight for [`fail`](Self::fail).
    async fn commit(
        &self,
        run: &mut Run,
        stage: PipelineStage,
        tracker: StepTracker,
        snapshot: Vec<Step>,
        status: ProcessingStatus,
    ) -> Result<(), PipelineError> {
        let index = run.index(stage)?;
        let duration_ms = snapshot[index].duration_ms;

        self.persist(run, snapshot, status).await?;
        run.tracker = tracker;
        run.active = None;

        tracing::debug!(
            interview_id = %run.id(),
            stage = run.plan.label(stage),
            duration_ms,
            "Stage complete"
        );
        Ok(())
    }

    /// Write-through of the latest snapshot
    async fn persist(
        &self,
        run: &mut Run,
        snapshot: Vec<Step>,
        status: ProcessingStatus,
    ) -> Result<(), PipelineError> {
        self.store
            .save_progress(run.id(), status, &snapshot, None)
            .await?;

        let (api_calls, tokens) = run.tracker.totals();
        run.record.api_call_count = api_calls;
        run.record.token_count = tokens;
        run.record.steps = snapshot;
        run.interview.steps = run.record.steps.clone();
        Ok(())
    }

    /// Marks the failing step and persists the error state; never fails itself
    async fn fail(&self, run: &mut Run, error: &PipelineError) {
        let message = error.to_string();

        let failing = run
            .active
            .and_then(|stage| run.plan.index_of(stage))
            .filter(|&index| !run.tracker.steps()[index].status.is_terminal())
            .or_else(|| run.tracker.current());

        if let Some(index) = failing {
            match run.tracker.mark_error(index, message.clone()) {
                Ok(snapshot) => {
                    run.record.steps = snapshot;
                    run.active = None;
                }
                Err(e) => tracing::error!(interview_id = %run.id(), "Could not mark step failed: {}", e),
            }
        }

        run.record.status = ProcessingStatus::Error;
        run.interview.processing_status = ProcessingStatus::Error;

        tracing::error!(
            interview_id = %run.id(),
            stage = failing.map(|i| run.tracker.steps()[i].name.as_str()),
            "Pipeline run failed: {}",
            message
        );

        if let Err(e) = self
            .store
            .save_progress(
                run.id(),
                ProcessingStatus::Error,
                run.tracker.steps(),
                Some(&message),
            )
            .await
        {
            tracing::error!(interview_id = %run.id(), "Failed to persist error state: {}", e);
        }
    }
}

/// Content gate applied right after classification
fn ensure_interview(content: &ContentAnalysis) -> Result<(), PipelineError> {
    if content.content_type != ContentType::Interview {
        return Err(PipelineError::InvalidInput(format!(
            "recording was classified as {:?}, not an interview",
            content.content_type
        )));
    }
    if !content.is_job_related {
        return Err(PipelineError::InvalidInput(
            "recording is not related to a job opening".to_string(),
        ));
    }
    Ok(())
}
