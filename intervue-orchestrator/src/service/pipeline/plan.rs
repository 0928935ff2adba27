//! Static step plans
//!
//! The step list of a run is fixed before the first stage starts. Optional
//! stages get a slot only when their capability is enabled for the run.

use intervue_core::domain::run::PipelineKind;
use intervue_core::domain::step::Step;

/// A tracked unit of a run; some are groups of concurrent stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Transcription,
    Validation,
    ContentAnalysis,
    Encryption,
    RelevanceAnalysis,
    Embeddings,
    Explainability,
    ReportGeneration,
}

impl PipelineStage {
    pub fn label(self, kind: PipelineKind) -> &'static str {
        match (self, kind) {
            (Self::Transcription, _) => "Transcription",
            (Self::Validation, _) => "Validation",
            (Self::ContentAnalysis, PipelineKind::Baseline) => "Content & sentiment analysis",
            (Self::ContentAnalysis, PipelineKind::Enhanced) => {
                "Content, PII & sentiment analysis"
            }
            (Self::Encryption, _) => "Redaction & encryption",
            (Self::RelevanceAnalysis, PipelineKind::Baseline) => "Relevance & flow analysis",
            (Self::RelevanceAnalysis, PipelineKind::Enhanced) => {
                "Relevance, flow & alignment analysis"
            }
            (Self::Embeddings, _) => "Semantic embeddings",
            (Self::Explainability, _) => "Explainability",
            (Self::ReportGeneration, _) => "Report generation",
        }
    }

    /// Shown to pollers while the step is processing
    pub fn progress_message(self) -> &'static str {
        match self {
            Self::Transcription => "Transcribing audio",
            Self::Validation => "Checking speakers",
            Self::ContentAnalysis => "Classifying content and analyzing sentiment",
            Self::Encryption => "Redacting and encrypting transcript",
            Self::RelevanceAnalysis => "Scoring relevance and conversation flow",
            Self::Embeddings => "Computing semantic embeddings",
            Self::Explainability => "Explaining scores",
            Self::ReportGeneration => "Assembling report",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepPlan {
    kind: PipelineKind,
    stages: Vec<PipelineStage>,
}

impl StepPlan {
    pub fn new(kind: PipelineKind, embeddings: bool) -> Self {
        use PipelineStage::*;

        let mut stages = match kind {
            PipelineKind::Baseline => vec![Transcription, Validation, ContentAnalysis, RelevanceAnalysis],
            PipelineKind::Enhanced => vec![
                Transcription,
                Validation,
                ContentAnalysis,
                Encryption,
                RelevanceAnalysis,
            ],
        };
        if embeddings {
            stages.push(Embeddings);
        }
        if kind == PipelineKind::Enhanced {
            stages.push(Explainability);
        }
        stages.push(ReportGeneration);

        Self { kind, stages }
    }

    pub fn kind(&self) -> PipelineKind {
        self.kind
    }

    pub fn index_of(&self, stage: PipelineStage) -> Option<usize> {
        self.stages.iter().position(|s| *s == stage)
    }

    pub fn contains(&self, stage: PipelineStage) -> bool {
        self.index_of(stage).is_some()
    }

    pub fn label(&self, stage: PipelineStage) -> &'static str {
        stage.label(self.kind)
    }

    /// Fresh pending steps in execution order
    pub fn steps(&self) -> Vec<Step> {
        self.stages
            .iter()
            .map(|stage| Step::pending(stage.label(self.kind)))
            .collect()
    }
}
