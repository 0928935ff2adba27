//! End-to-end pipeline runs over the in-memory store with fake services

mod common;

use common::{
    Capability, FailingProgressStore, FakeEmbeddings, FakeEncryptor, FakeServices, Harness,
    interview_segments, monologue_segments,
};
use intervue_core::domain::analysis::{ContentType, PiiEntity, PiiKind};
use intervue_core::domain::interview::ProcessingStatus;
use intervue_core::domain::monitoring::MonitoringStatus;
use intervue_core::domain::run::PipelineKind;
use intervue_core::domain::step::{Step, StepStatus};
use intervue_orchestrator::repository::{InterviewStore, MemoryStore};
use intervue_orchestrator::service::pipeline::{
    DisabledEmbeddings, PipelineError, PipelineOrchestrator, StageError,
};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

fn statuses(steps: &[Step]) -> Vec<StepStatus> {
    steps.iter().map(|s| s.status).collect()
}

fn failed_steps(steps: &[Step]) -> Vec<&Step> {
    steps.iter().filter(|s| s.status == StepStatus::Error).collect()
}

fn step<'a>(steps: &'a [Step], name: &str) -> &'a Step {
    steps
        .iter()
        .find(|s| s.name == name)
        .unwrap_or_else(|| panic!("no step named {}", name))
}

async fn assert_single_processing_step(harness: &Harness, id: Uuid) {
    let history = harness.store.progress_history(id).await;
    assert!(!history.is_empty());
    for snapshot in history {
        let processing = snapshot
            .iter()
            .filter(|s| s.status == StepStatus::Processing)
            .count();
        assert!(processing <= 1, "snapshot with {} processing steps", processing);
    }
}

// =============================================================================
// Successful runs
// =============================================================================

#[tokio::test]
async fn test_baseline_run_completes() {
    let harness = Harness::without_embeddings(FakeServices::new(interview_segments()));
    let id = harness.create(None).await;

    harness.orchestrator.process(id).await.unwrap();

    let interview = harness.store.get_interview(id).await.unwrap().unwrap();
    assert_eq!(interview.processing_status, ProcessingStatus::Complete);
    assert_eq!(interview.error_message, None);
    assert_eq!(interview.steps.len(), 5);
    assert!(interview.steps.iter().all(|s| s.status == StepStatus::Complete));
    assert!(interview.steps.iter().all(|s| s.completed_at >= s.started_at));
    assert!(interview.transcript.is_some());
    assert!(interview.encrypted_transcript.is_none());

    let report = harness.store.get_report(id).await.unwrap().unwrap();
    assert_eq!(report.pipeline, PipelineKind::Baseline);
    assert_eq!(report.pii_entity_count, None);
    assert!(report.explanations.is_none());
    assert!(report.flow.conversation.is_none());
    assert_eq!(report.flow.blended_score, 70.0);

    let metrics = harness.store.recruiter_metrics(id).await.unwrap();
    assert_eq!(metrics.question_count, 2);
    assert_eq!(metrics.answer_count, 2);

    let records = harness.store.monitoring_records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, MonitoringStatus::Success);
    // transcribe, classify, sentiment, relevance, flow
    assert_eq!(records[0].api_call_count, 5);
    assert_eq!(records[0].token_count, 5 * common::TOKENS_PER_CALL);
    assert!(!harness.store.is_leased(id).await);

    assert_single_processing_step(&harness, id).await;
}

#[tokio::test]
async fn test_enhanced_run_completes() {
    let harness = Harness::without_embeddings(FakeServices::new(interview_segments()));
    let id = harness.create(Some("Payments engineer at Globex")).await;

    harness.orchestrator.process_enhanced(id).await.unwrap();

    let interview = harness.store.get_interview(id).await.unwrap().unwrap();
    assert_eq!(interview.processing_status, ProcessingStatus::Complete);
    assert_eq!(
        interview
            .steps
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>(),
        vec![
            "Transcription",
            "Validation",
            "Content, PII & sentiment analysis",
            "Redaction & encryption",
            "Relevance, flow & alignment analysis",
            "Explainability",
            "Report generation",
        ]
    );
    assert!(interview.steps.iter().all(|s| s.status == StepStatus::Complete));

    let ciphertext = interview.encrypted_transcript.unwrap();
    assert!(ciphertext.starts_with("enc:"));
    assert!(!ciphertext.contains("Globex"));
    assert!(ciphertext.contains("[OTHER]"));

    let report = harness.store.get_report(id).await.unwrap().unwrap();
    assert_eq!(report.pipeline, PipelineKind::Enhanced);
    assert_eq!(report.pii_entity_count, Some(1));
    assert!(report.resume_alignment.is_some());
    assert!(report.explanations.is_some());
    assert!(report.embedding_analysis.is_none());

    let conversation = report.flow.conversation.as_ref().unwrap();
    assert_eq!(conversation.graph.questions().count(), 2);
    let expected = 0.6 * 70.0 + 0.4 * conversation.logical_score;
    assert!((report.flow.blended_score - expected).abs() < 0.06);

    let records = harness.store.monitoring_records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, MonitoringStatus::Success);
    assert_eq!(records[0].error_count, 0);
    // transcribe 1, content 3, encrypt 1, relevance 3, explain 3
    assert_eq!(records[0].api_call_count, 11);
    assert_eq!(records[0].steps.len(), 7);

    assert_single_processing_step(&harness, id).await;
}

#[tokio::test]
async fn test_misplaced_pii_offsets_are_relocated() {
    // Offsets that do not cover the reported text
    let pii = vec![PiiEntity {
        kind: PiiKind::Other,
        text: "Globex".to_string(),
        start: 0,
        end: 6,
    }];
    let harness =
        Harness::without_embeddings(FakeServices::new(interview_segments()).with_pii(pii));
    let id = harness.create(None).await;

    harness.orchestrator.process_enhanced(id).await.unwrap();

    let interview = harness.store.get_interview(id).await.unwrap().unwrap();
    let ciphertext = interview.encrypted_transcript.unwrap();
    assert!(!ciphertext.contains("Globex"));
    assert!(ciphertext.starts_with("enc:Tell me about"));

    let encryption = step(&interview.steps, "Redaction & encryption");
    assert_eq!(encryption.message.as_deref(), Some("1 PII entities redacted"));
}

#[tokio::test]
async fn test_unlocatable_pii_is_not_counted_as_redacted() {
    let pii = vec![
        PiiEntity {
            kind: PiiKind::Other,
            text: "Globex".to_string(),
            start: 48,
            end: 54,
        },
        PiiEntity {
            kind: PiiKind::Name,
            text: "Dana Reyes".to_string(),
            start: 200,
            end: 210,
        },
    ];
    let harness =
        Harness::without_embeddings(FakeServices::new(interview_segments()).with_pii(pii));
    let id = harness.create(None).await;

    harness.orchestrator.process_enhanced(id).await.unwrap();

    let interview = harness.store.get_interview(id).await.unwrap().unwrap();
    let encryption = step(&interview.steps, "Redaction & encryption");
    assert_eq!(
        encryption.message.as_deref(),
        Some("1 PII entities redacted, 1 not found in transcript")
    );

    let report = harness.store.get_report(id).await.unwrap().unwrap();
    assert_eq!(report.pii_entity_count, Some(1));
}

#[tokio::test]
async fn test_first_persisted_snapshot_is_all_pending() {
    let harness = Harness::without_embeddings(FakeServices::new(interview_segments()));
    let id = harness.create(None).await;

    harness.orchestrator.process(id).await.unwrap();

    let history = harness.store.progress_history(id).await;
    assert!(history[0].iter().all(|s| s.status == StepStatus::Pending));
    assert!(
        history
            .last()
            .unwrap()
            .iter()
            .all(|s| s.status == StepStatus::Complete)
    );
}

// =============================================================================
// Optional embeddings
// =============================================================================

#[tokio::test]
async fn test_embeddings_included_when_enabled() {
    let harness = Harness::new(
        FakeServices::new(interview_segments()),
        Arc::new(FakeEmbeddings::working()),
    );
    let id = harness.create(None).await;

    harness.orchestrator.process_enhanced(id).await.unwrap();

    let interview = harness.store.get_interview(id).await.unwrap().unwrap();
    let embeddings = step(&interview.steps, "Semantic embeddings");
    assert_eq!(embeddings.status, StepStatus::Complete);
    assert_eq!(embeddings.warning, None);

    let report = harness.store.get_report(id).await.unwrap().unwrap();
    assert_eq!(report.embedding_analysis.unwrap().dimensions, 768);
}

#[tokio::test]
async fn test_embeddings_failure_degrades_without_failing_the_run() {
    let harness = Harness::new(
        FakeServices::new(interview_segments()),
        Arc::new(FakeEmbeddings::broken()),
    );
    let id = harness.create(None).await;

    harness.orchestrator.process_enhanced(id).await.unwrap();

    let interview = harness.store.get_interview(id).await.unwrap().unwrap();
    assert_eq!(interview.processing_status, ProcessingStatus::Complete);
    assert!(interview.steps.iter().all(|s| s.status == StepStatus::Complete));

    let embeddings = step(&interview.steps, "Semantic embeddings");
    assert!(embeddings.warning.as_deref().unwrap().contains("model crashed"));

    let report = harness.store.get_report(id).await.unwrap().unwrap();
    assert!(report.embedding_analysis.is_none());
    assert!(report.resume_alignment.is_some());
    assert!(report.explanations.is_some());

    let records = harness.store.monitoring_records().await;
    assert_eq!(records[0].status, MonitoringStatus::Success);
}

#[tokio::test]
async fn test_embeddings_step_keeps_its_own_duration() {
    let harness = Harness::new(
        FakeServices::new(interview_segments()),
        Arc::new(FakeEmbeddings::slow(Duration::from_millis(300))),
    );
    let id = harness.create(None).await;

    harness.orchestrator.process(id).await.unwrap();

    let interview = harness.store.get_interview(id).await.unwrap().unwrap();
    let relevance = step(&interview.steps, "Relevance & flow analysis");
    let embeddings = step(&interview.steps, "Semantic embeddings");

    assert!(embeddings.duration_ms.unwrap() >= 250);
    assert!(relevance.duration_ms.unwrap() < 250);
    assert!(embeddings.started_at >= relevance.started_at);
    assert!(embeddings.completed_at > embeddings.started_at);
}

#[tokio::test]
async fn test_disabled_embeddings_have_no_step() {
    let harness = Harness::without_embeddings(FakeServices::new(interview_segments()));
    let id = harness.create(None).await;

    harness.orchestrator.process(id).await.unwrap();

    let interview = harness.store.get_interview(id).await.unwrap().unwrap();
    assert!(interview.steps.iter().all(|s| s.name != "Semantic embeddings"));
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_single_speaker_fails_validation() {
    let harness = Harness::without_embeddings(FakeServices::new(monologue_segments()));
    let id = harness.create(None).await;

    let result = harness.orchestrator.process_enhanced(id).await;
    assert!(matches!(result, Err(PipelineError::InvalidInput(_))));

    let interview = harness.store.get_interview(id).await.unwrap().unwrap();
    assert_eq!(interview.processing_status, ProcessingStatus::Error);
    assert!(interview.error_message.is_some());
    assert_eq!(
        statuses(&interview.steps),
        vec![
            StepStatus::Complete,
            StepStatus::Error,
            StepStatus::Pending,
            StepStatus::Pending,
            StepStatus::Pending,
            StepStatus::Pending,
            StepStatus::Pending,
        ]
    );
    assert!(harness.store.get_report(id).await.unwrap().is_none());

    let records = harness.store.monitoring_records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, MonitoringStatus::Error);
    assert_eq!(records[0].failed_stage.as_deref(), Some("Validation"));
    assert!(!harness.store.is_leased(id).await);
}

#[tokio::test]
async fn test_non_interview_content_is_rejected() {
    let mut services = FakeServices::new(interview_segments());
    services.content_type = ContentType::Meeting;
    let harness = Harness::without_embeddings(services);
    let id = harness.create(None).await;

    let result = harness.orchestrator.process(id).await;
    assert!(matches!(result, Err(PipelineError::InvalidInput(_))));

    let interview = harness.store.get_interview(id).await.unwrap().unwrap();
    let failed = interview
        .steps
        .iter()
        .filter(|s| s.status == StepStatus::Error)
        .collect::<Vec<_>>();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].name, "Content & sentiment analysis");
}

#[tokio::test]
async fn test_required_stage_failure_aborts_the_run() {
    let harness = Harness::new(
        FakeServices::new(interview_segments()).failing(Capability::Flow),
        Arc::new(FakeEmbeddings::working()),
    );
    let id = harness.create(None).await;

    let result = harness.orchestrator.process_enhanced(id).await;
    assert!(matches!(
        result,
        Err(PipelineError::Stage { ref stage, .. }) if stage == "Flow analysis"
    ));

    let interview = harness.store.get_interview(id).await.unwrap().unwrap();
    assert_eq!(interview.processing_status, ProcessingStatus::Error);

    let failed = interview
        .steps
        .iter()
        .filter(|s| s.status == StepStatus::Error)
        .collect::<Vec<_>>();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].name, "Relevance, flow & alignment analysis");
    assert_eq!(
        step(&interview.steps, "Explainability").status,
        StepStatus::Pending
    );
    assert_eq!(
        step(&interview.steps, "Report generation").status,
        StepStatus::Pending
    );
    assert!(harness.store.get_report(id).await.unwrap().is_none());

    let records = harness.store.monitoring_records().await;
    assert_eq!(records[0].status, MonitoringStatus::Error);
    assert_eq!(
        records[0].failed_stage.as_deref(),
        Some("Relevance, flow & alignment analysis")
    );
    assert!(!harness.store.is_leased(id).await);

    assert_single_processing_step(&harness, id).await;
}

#[tokio::test]
async fn test_pii_detection_failure_aborts_the_run() {
    let harness = Harness::without_embeddings(
        FakeServices::new(interview_segments()).failing(Capability::Pii),
    );
    let id = harness.create(None).await;

    let result = harness.orchestrator.process_enhanced(id).await;
    assert!(matches!(
        result,
        Err(PipelineError::Stage { ref stage, .. }) if stage == "PII detection"
    ));

    let interview = harness.store.get_interview(id).await.unwrap().unwrap();
    assert_eq!(interview.processing_status, ProcessingStatus::Error);
    assert!(interview.encrypted_transcript.is_none());

    let failed = failed_steps(&interview.steps);
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].name, "Content, PII & sentiment analysis");
    assert_eq!(
        step(&interview.steps, "Redaction & encryption").status,
        StepStatus::Pending
    );

    let records = harness.store.monitoring_records().await;
    assert_eq!(
        records[0].failed_stage.as_deref(),
        Some("Content, PII & sentiment analysis")
    );
    assert!(!harness.store.is_leased(id).await);
}

#[tokio::test]
async fn test_explainability_failure_aborts_the_run() {
    let harness = Harness::without_embeddings(
        FakeServices::new(interview_segments()).failing(Capability::Explain),
    );
    let id = harness.create(None).await;

    let result = harness.orchestrator.process_enhanced(id).await;
    assert!(matches!(
        result,
        Err(PipelineError::Stage { ref stage, .. }) if stage == "Explainability"
    ));

    let interview = harness.store.get_interview(id).await.unwrap().unwrap();
    let failed = failed_steps(&interview.steps);
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].name, "Explainability");
    assert_eq!(
        step(&interview.steps, "Relevance, flow & alignment analysis").status,
        StepStatus::Complete
    );
    assert_eq!(
        step(&interview.steps, "Report generation").status,
        StepStatus::Pending
    );
    assert!(harness.store.get_report(id).await.unwrap().is_none());

    let records = harness.store.monitoring_records().await;
    assert_eq!(records[0].status, MonitoringStatus::Error);
    assert_eq!(records[0].error_count, 1);

    assert_single_processing_step(&harness, id).await;
}

#[tokio::test]
async fn test_failed_progress_write_marks_the_step_in_flight() {
    let memory = Arc::new(MemoryStore::new());
    let store = Arc::new(FailingProgressStore {
        inner: memory.clone(),
        step: "Validation",
    });
    let orchestrator = PipelineOrchestrator::new(
        store,
        Arc::new(FakeServices::new(interview_segments())),
        Arc::new(FakeEncryptor),
        Arc::new(DisabledEmbeddings),
    );
    let id = memory.create_interview(common::request(None)).await.unwrap().id;

    let result = orchestrator.process(id).await;
    assert!(matches!(result, Err(PipelineError::Store(_))));

    let interview = memory.get_interview(id).await.unwrap().unwrap();
    assert_eq!(interview.processing_status, ProcessingStatus::Error);
    assert_eq!(
        statuses(&interview.steps),
        vec![
            StepStatus::Complete,
            StepStatus::Error,
            StepStatus::Pending,
            StepStatus::Pending,
            StepStatus::Pending,
        ]
    );

    let records = memory.monitoring_records().await;
    assert_eq!(records[0].failed_stage.as_deref(), Some("Validation"));
    assert!(!memory.is_leased(id).await);
}

#[tokio::test]
async fn test_transcription_failure() {
    let harness = Harness::without_embeddings(
        FakeServices::new(interview_segments()).failing(Capability::Transcribe),
    );
    let id = harness.create(None).await;

    let result = harness.orchestrator.process(id).await;
    assert!(matches!(
        result,
        Err(PipelineError::Stage {
            source: StageError::Transcription(_),
            ..
        })
    ));

    let interview = harness.store.get_interview(id).await.unwrap().unwrap();
    assert_eq!(interview.steps[0].status, StepStatus::Error);
    assert!(interview.transcript.is_none());
}

#[tokio::test]
async fn test_rerun_after_failure_clears_error() {
    let harness = Harness::without_embeddings(
        FakeServices::new(interview_segments()).failing(Capability::Sentiment),
    );
    let id = harness.create(None).await;
    assert!(harness.orchestrator.process(id).await.is_err());

    let retry = Harness::without_embeddings(FakeServices::new(interview_segments()));
    let interview = harness.store.get_interview(id).await.unwrap().unwrap();
    retry.store.insert(interview).await;

    retry.orchestrator.process(id).await.unwrap();

    let interview = retry.store.get_interview(id).await.unwrap().unwrap();
    assert_eq!(interview.processing_status, ProcessingStatus::Complete);
    assert_eq!(interview.error_message, None);
}

// =============================================================================
// Invocation guards
// =============================================================================

#[tokio::test]
async fn test_unknown_interview() {
    let harness = Harness::without_embeddings(FakeServices::new(interview_segments()));

    let result = harness.orchestrator.process(Uuid::new_v4()).await;
    assert!(matches!(result, Err(PipelineError::NotFound(_))));
    assert!(harness.store.monitoring_records().await.is_empty());
}

#[tokio::test]
async fn test_concurrent_run_is_rejected() {
    let harness = Harness::without_embeddings(FakeServices::new(interview_segments()));
    let id = harness.create(None).await;

    let other_run = Uuid::new_v4();
    assert!(
        harness
            .store
            .acquire_lease(id, other_run, Duration::from_secs(60))
            .await
            .unwrap()
    );

    let result = harness.orchestrator.process_enhanced(id).await;
    assert!(matches!(result, Err(PipelineError::AlreadyRunning(lease)) if lease == id));

    let interview = harness.store.get_interview(id).await.unwrap().unwrap();
    assert_eq!(interview.processing_status, ProcessingStatus::Pending);
    assert!(interview.steps.is_empty());
    assert!(harness.store.monitoring_records().await.is_empty());

    harness.store.release_lease(id, other_run).await.unwrap();
    harness.orchestrator.process(id).await.unwrap();
}

#[tokio::test]
async fn test_launch_runs_in_background() {
    let harness = Harness::without_embeddings(FakeServices::new(interview_segments()));
    let id = harness.create(None).await;

    let accepted = harness
        .orchestrator
        .clone()
        .launch(PipelineKind::Baseline, id)
        .await
        .unwrap();
    assert_eq!(accepted.interview_id, id);
    assert_eq!(accepted.pipeline, PipelineKind::Baseline);

    let mut status = ProcessingStatus::Pending;
    for _ in 0..100 {
        status = harness
            .store
            .get_interview(id)
            .await
            .unwrap()
            .unwrap()
            .processing_status;
        if status.is_terminal() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(status, ProcessingStatus::Complete);
}
