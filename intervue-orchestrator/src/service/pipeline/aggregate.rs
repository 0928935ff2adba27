//! Report aggregation
//!
//! Folds stage outputs into the persisted report and derives recruiter
//! metrics from the transcript and the local flow graph.

use chrono::Utc;
use intervue_core::domain::analysis::{
    ContentAnalysis, EmbeddingAnalysis, FlowAnalysis, JdRelevance, ResumeAlignment,
    SentimentAnalysis,
};
use intervue_core::domain::flow::{ConversationFlow, EdgeKind};
use intervue_core::domain::report::{AnalysisReport, Explanations, FlowReport, RecruiterMetrics};
use intervue_core::domain::run::PipelineKind;
use intervue_core::domain::transcript::{Speaker, Transcript};
use uuid::Uuid;

const CONTINUITY_WEIGHT: f64 = 0.6;
const LOGICAL_WEIGHT: f64 = 0.4;

/// Everything the stages produced for one run
pub struct StageOutputs {
    pub content: ContentAnalysis,
    pub sentiment: SentimentAnalysis,
    pub jd_relevance: JdRelevance,
    pub flow: FlowAnalysis,
    pub conversation: Option<ConversationFlow>,
    pub pii_entity_count: Option<usize>,
    pub resume_alignment: Option<ResumeAlignment>,
    pub explanations: Option<Explanations>,
    pub embedding_analysis: Option<EmbeddingAnalysis>,
}

/// Blends model continuity with the local logical score
///
/// Falls back to the model score alone when there is no usable local graph.
pub fn blended_flow_score(flow: &FlowAnalysis, conversation: Option<&ConversationFlow>) -> f64 {
    let score = match conversation {
        Some(local) if !local.graph.is_empty() => {
            CONTINUITY_WEIGHT * flow.continuity_score + LOGICAL_WEIGHT * local.logical_score
        }
        _ => flow.continuity_score,
    };
    (score.clamp(0.0, 100.0) * 10.0).round() / 10.0
}

pub fn build_report(interview_id: Uuid, pipeline: PipelineKind, outputs: StageOutputs) -> AnalysisReport {
    let blended_score = blended_flow_score(&outputs.flow, outputs.conversation.as_ref());

    AnalysisReport {
        id: Uuid::new_v4(),
        interview_id,
        pipeline,
        content: outputs.content,
        sentiment: outputs.sentiment,
        jd_relevance: outputs.jd_relevance,
        flow: FlowReport {
            analysis: outputs.flow,
            conversation: outputs.conversation,
            blended_score,
        },
        pii_entity_count: outputs.pii_entity_count,
        resume_alignment: outputs.resume_alignment,
        explanations: outputs.explanations,
        embedding_analysis: outputs.embedding_analysis,
        created_at: Utc::now(),
    }
}

pub fn recruiter_metrics(
    interview_id: Uuid,
    transcript: &Transcript,
    conversation: &ConversationFlow,
) -> RecruiterMetrics {
    let question_count = conversation.graph.questions().count();
    let answer_count = conversation.graph.answers().count();

    let recruiter_words = transcript.word_count(Speaker::Recruiter);
    let candidate_words = transcript.word_count(Speaker::Candidate);
    let total_words = recruiter_words + candidate_words;

    let talk_ratio = ratio(recruiter_words, total_words);
    let avg_answer_words = if answer_count == 0 {
        0.0
    } else {
        round2(candidate_words as f64 / answer_count as f64)
    };
    let follow_up_rate = ratio(
        conversation.graph.edges_of(EdgeKind::FollowUp).count(),
        question_count,
    );

    RecruiterMetrics {
        interview_id,
        question_count,
        answer_count,
        talk_ratio,
        avg_answer_words,
        follow_up_rate,
        missed_follow_up_count: conversation.missed_follow_ups.len(),
        created_at: Utc::now(),
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round2(part as f64 / whole as f64)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
