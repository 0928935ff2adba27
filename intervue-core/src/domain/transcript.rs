//! Transcript domain types

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Who said a transcript segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    Recruiter,
    Candidate,
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Speaker::Recruiter => write!(f, "Recruiter"),
            Speaker::Candidate => write!(f, "Candidate"),
        }
    }
}

/// One diarized utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub speaker: Speaker,
    pub text: String,
    /// Seconds from the start of the recording
    pub timestamp: f64,
}

/// Full transcription output
///
/// Segments are chronological and read-only once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    pub segments: Vec<TranscriptSegment>,
}

/// A question or answer fed to the flow graph builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    pub timestamp: f64,
}

impl Transcript {
    /// Number of distinct speakers with at least one non-empty segment
    pub fn distinct_speakers(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| !s.text.trim().is_empty())
            .map(|s| s.speaker)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Recruiter utterances, in order
    pub fn questions(&self) -> Vec<Utterance> {
        self.utterances_by(Speaker::Recruiter)
    }

    /// Candidate utterances, in order
    pub fn answers(&self) -> Vec<Utterance> {
        self.utterances_by(Speaker::Candidate)
    }

    /// Total words spoken by a speaker
    pub fn word_count(&self, speaker: Speaker) -> usize {
        self.segments
            .iter()
            .filter(|s| s.speaker == speaker)
            .map(|s| s.text.split_whitespace().count())
            .sum()
    }

    fn utterances_by(&self, speaker: Speaker) -> Vec<Utterance> {
        self.segments
            .iter()
            .filter(|s| s.speaker == speaker && !s.text.trim().is_empty())
            .map(|s| Utterance {
                text: s.text.clone(),
                timestamp: s.timestamp,
            })
            .collect()
    }
}
