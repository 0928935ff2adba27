//! Analysis result types
//!
//! One tagged result type per external analysis stage. Every type is parsed
//! from model output and then checked with [`Validate`] before the pipeline
//! trusts it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schema check applied to parsed model output
pub trait Validate {
    /// Returns a description of the first violated constraint
    fn validate(&self) -> Result<(), String>;
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), String> {
        self.iter().try_for_each(Validate::validate)
    }
}

fn check_score(field: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{} must be within 0-100 (got {})", field, value))
    }
}

fn check_unit(field: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && (-1.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{} must be within -1..1 (got {})", field, value))
    }
}

// =============================================================================
// Content classification
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Interview,
    Meeting,
    Lecture,
    Monologue,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAnalysis {
    pub content_type: ContentType,
    pub speaker_count: u32,
    #[serde(default)]
    pub topics: Vec<String>,
    pub is_job_related: bool,
    #[serde(default)]
    pub recommended_analysis: Vec<String>,
}

impl ContentAnalysis {
    /// Whether the recording is a job interview worth analyzing
    pub fn is_interview(&self) -> bool {
        self.content_type == ContentType::Interview && self.is_job_related
    }
}

impl Validate for ContentAnalysis {
    fn validate(&self) -> Result<(), String> {
        if self.speaker_count == 0 {
            return Err("speakerCount must be positive".to_string());
        }
        Ok(())
    }
}

// =============================================================================
// PII
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PiiKind {
    Name,
    Email,
    Phone,
    Address,
    Ssn,
    Other,
}

/// A detected PII span, as byte offsets into the analyzed text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiiEntity {
    pub kind: PiiKind,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Validate for PiiEntity {
    fn validate(&self) -> Result<(), String> {
        if self.end < self.start {
            return Err(format!(
                "PII span end {} precedes start {}",
                self.end, self.start
            ));
        }
        Ok(())
    }
}

/// Outcome of [`redact_pii`]
#[derive(Debug, Clone, PartialEq)]
pub struct Redaction<'a> {
    pub text: String,
    /// Entities whose text was found and replaced
    pub redacted: usize,
    /// Entities whose text could not be located; their content may remain
    pub unresolved: Vec<&'a PiiEntity>,
}

/// Replaces every detected entity with a `[KIND]` placeholder
///
/// A reported span is used only when it covers exactly the entity text.
/// Otherwise every occurrence of the entity text is replaced. Overlapping
/// spans are merged into one placeholder.
pub fn redact_pii<'a>(text: &str, entities: &'a [PiiEntity]) -> Redaction<'a> {
    let mut spans: Vec<(usize, usize, PiiKind)> = Vec::new();
    let mut redacted = 0;
    let mut unresolved = Vec::new();

    for entity in entities {
        let located = locate(text, entity);
        if located.is_empty() {
            unresolved.push(entity);
            continue;
        }
        redacted += 1;
        spans.extend(located.into_iter().map(|(start, end)| (start, end, entity.kind)));
    }
    spans.sort_by_key(|&(start, end, _)| (start, std::cmp::Reverse(end)));

    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;
    for (start, end, kind) in spans {
        if end <= cursor {
            continue;
        }
        if start < cursor {
            // Overlaps the previous placeholder; swallow the remainder
            cursor = end;
            continue;
        }
        output.push_str(&text[cursor..start]);
        output.push_str(&format!("[{:?}]", kind).to_uppercase());
        cursor = end;
    }
    output.push_str(&text[cursor..]);

    Redaction {
        text: output,
        redacted,
        unresolved,
    }
}

/// Byte spans of an entity in `text`
fn locate(text: &str, entity: &PiiEntity) -> Vec<(usize, usize)> {
    if entity.text.is_empty() {
        return Vec::new();
    }
    if text.get(entity.start..entity.end) == Some(entity.text.as_str()) {
        return vec![(entity.start, entity.end)];
    }
    text.match_indices(entity.text.as_str())
        .map(|(start, found)| (start, start + found.len()))
        .collect()
}

// =============================================================================
// Sentiment
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerSentiment {
    /// -1 (negative) to 1 (positive)
    pub score: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentPoint {
    pub timestamp: f64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentAnalysis {
    pub recruiter_sentiment: SpeakerSentiment,
    pub candidate_sentiment: SpeakerSentiment,
    #[serde(default)]
    pub timeline: Option<Vec<SentimentPoint>>,
}

impl SentimentAnalysis {
    /// Overall sentiment mapped onto the 0-100 scale used by explainability
    pub fn overall_score(&self) -> f64 {
        let mean = (self.recruiter_sentiment.score + self.candidate_sentiment.score) / 2.0;
        ((mean + 1.0) * 50.0).clamp(0.0, 100.0)
    }
}

impl Validate for SentimentAnalysis {
    fn validate(&self) -> Result<(), String> {
        check_unit("recruiterSentiment.score", self.recruiter_sentiment.score)?;
        check_unit("candidateSentiment.score", self.candidate_sentiment.score)?;
        if let Some(timeline) = &self.timeline {
            for point in timeline {
                check_unit("timeline.score", point.score)?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// Job description relevance
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendedAction {
    Advance,
    Hold,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRelevance {
    pub question: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerAlignment {
    pub answer: String,
    pub score: f64,
    #[serde(default)]
    pub matched_requirements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGapAnalysis {
    #[serde(default)]
    pub matched_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JdRelevance {
    pub overall_score: f64,
    #[serde(default)]
    pub category_breakdown: BTreeMap<String, f64>,
    #[serde(default)]
    pub question_relevance: Vec<QuestionRelevance>,
    #[serde(default)]
    pub answer_alignment: Vec<AnswerAlignment>,
    #[serde(default)]
    pub skill_gap_analysis: SkillGapAnalysis,
    pub recommended_action: RecommendedAction,
}

impl Validate for JdRelevance {
    fn validate(&self) -> Result<(), String> {
        check_score("overallScore", self.overall_score)?;
        for (category, score) in &self.category_breakdown {
            check_score(&format!("categoryBreakdown.{}", category), *score)?;
        }
        for item in &self.question_relevance {
            check_score("questionRelevance.score", item.score)?;
        }
        for item in &self.answer_alignment {
            check_score("answerAlignment.score", item.score)?;
        }
        Ok(())
    }
}

// =============================================================================
// Conversation flow (model side)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowBreak {
    pub timestamp: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowAnalysis {
    pub continuity_score: f64,
    #[serde(default)]
    pub flow_breaks: Vec<FlowBreak>,
    #[serde(default)]
    pub insights: Vec<String>,
}

impl Validate for FlowAnalysis {
    fn validate(&self) -> Result<(), String> {
        check_score("continuityScore", self.continuity_score)
    }
}

// =============================================================================
// Resume alignment
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    pub consistency_score: f64,
    #[serde(default)]
    pub verified_claims: Vec<String>,
    #[serde(default)]
    pub discrepancies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateReport {
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecruiterReport {
    pub summary: String,
    pub recommendation: String,
    #[serde(default)]
    pub concerns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAlignment {
    /// Absent for interview-only alignment
    #[serde(default)]
    pub resume_analysis: Option<ResumeAnalysis>,
    pub candidate_report: CandidateReport,
    pub recruiter_report: RecruiterReport,
}

impl Validate for ResumeAlignment {
    fn validate(&self) -> Result<(), String> {
        if let Some(resume) = &self.resume_analysis {
            check_score("resumeAnalysis.consistencyScore", resume.consistency_score)?;
        }
        if self.candidate_report.summary.trim().is_empty() {
            return Err("candidateReport.summary is empty".to_string());
        }
        if self.recruiter_report.summary.trim().is_empty() {
            return Err("recruiterReport.summary is empty".to_string());
        }
        Ok(())
    }
}

// =============================================================================
// Explainability
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    #[serde(default)]
    pub reasoning: Vec<String>,
    #[serde(default)]
    pub evidence: Vec<String>,
    pub confidence_level: ConfidenceLevel,
    #[serde(default)]
    pub alternatives: Vec<String>,
}

impl Validate for Explanation {
    fn validate(&self) -> Result<(), String> {
        if self.reasoning.is_empty() {
            return Err("explanation has no reasoning".to_string());
        }
        Ok(())
    }
}

// =============================================================================
// Embeddings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingAnalysis {
    pub dimensions: u32,
    /// Cosine similarity between candidate answers and the job description
    pub semantic_similarity: f64,
    #[serde(default)]
    pub topic_clusters: Vec<String>,
}

impl Validate for EmbeddingAnalysis {
    fn validate(&self) -> Result<(), String> {
        check_unit("semanticSimilarity", self.semantic_similarity)
    }
}
