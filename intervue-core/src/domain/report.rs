//! Report domain types
//!
//! The aggregated output of a successful run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::analysis::{
    ContentAnalysis, EmbeddingAnalysis, Explanation, FlowAnalysis, JdRelevance, ResumeAlignment,
    SentimentAnalysis,
};
use crate::domain::flow::ConversationFlow;
use crate::domain::run::PipelineKind;

/// Model flow analysis combined with the local conversation graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowReport {
    pub analysis: FlowAnalysis,
    /// Local graph analysis; enhanced runs only
    pub conversation: Option<ConversationFlow>,
    /// 0-100; equals the model continuity score when no local graph exists
    pub blended_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanations {
    pub jd_relevance: Explanation,
    pub flow: Explanation,
    pub sentiment: Explanation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub pipeline: PipelineKind,
    pub content: ContentAnalysis,
    pub sentiment: SentimentAnalysis,
    pub jd_relevance: JdRelevance,
    pub flow: FlowReport,
    /// Number of PII entities redacted before encryption; enhanced runs only
    pub pii_entity_count: Option<usize>,
    pub resume_alignment: Option<ResumeAlignment>,
    pub explanations: Option<Explanations>,
    /// Absent when embeddings are disabled or the stage degraded
    pub embedding_analysis: Option<EmbeddingAnalysis>,
    pub created_at: DateTime<Utc>,
}

/// Interviewer-side metrics derived locally from the transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterMetrics {
    pub interview_id: Uuid,
    pub question_count: usize,
    pub answer_count: usize,
    /// Share of spoken words that belong to the recruiter, 0-1
    pub talk_ratio: f64,
    pub avg_answer_words: f64,
    /// Follow-up questions per question, 0-1
    pub follow_up_rate: f64,
    pub missed_follow_up_count: usize,
    pub created_at: DateTime<Utc>,
}
