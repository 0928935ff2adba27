//! Local conversation flow analysis
//!
//! Builds a question/answer graph from a diarized transcript and derives a
//! logical continuity score, missed follow-up opportunities and topic
//! branches from it. Everything here is pure and deterministic.

mod branches;
mod builder;
mod follow_ups;
mod score;
mod text;

pub use branches::identify_conversation_branches;
pub use builder::{FOLLOW_UP_LOOKBACK, MIN_KEYWORD_OVERLAP, build};
pub use follow_ups::{MISSED_FOLLOW_UP_LOOKAHEAD, detect_missed_follow_ups};
pub use score::{NEUTRAL_SCORE, calculate_logical_score};

use crate::domain::flow::ConversationFlow;
use crate::domain::transcript::{Transcript, Utterance};

/// Runs the full local flow analysis over questions and answers
pub fn analyze_conversation(questions: &[Utterance], answers: &[Utterance]) -> ConversationFlow {
    let graph = build(questions, answers);
    ConversationFlow {
        logical_score: calculate_logical_score(&graph),
        missed_follow_ups: detect_missed_follow_ups(&graph),
        branches: identify_conversation_branches(&graph),
        graph,
    }
}

/// Convenience wrapper over a diarized transcript
pub fn analyze_transcript(transcript: &Transcript) -> ConversationFlow {
    analyze_conversation(&transcript.questions(), &transcript.answers())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::flow::Importance;

    fn utterance(text: &str, timestamp: f64) -> Utterance {
        Utterance {
            text: text.to_string(),
            timestamp,
        }
    }

    fn questions() -> Vec<Utterance> {
        vec![
            utterance("What kind of projects do you enjoy?", 0.0),
            utterance("What made the payment platform work for small shops?", 30.0),
            utterance("How did refunds and receipts stay simple?", 60.0),
        ]
    }

    #[test]
    fn test_well_linked_interview() {
        let answers = vec![
            utterance("I enjoy building payment platforms for small shops.", 5.0),
            utterance("Clear receipts and simple refunds kept the shops happy.", 35.0),
            utterance("Refunds reused the receipt records.", 65.0),
        ];

        let flow = analyze_conversation(&questions(), &answers);

        assert!(flow.logical_score >= 80.0, "score {}", flow.logical_score);
        assert!(flow.missed_follow_ups.is_empty());
        assert_eq!(flow.branches.len(), 1);
        assert_eq!(flow.branches[0].question_ids, vec!["q0", "q1", "q2"]);
    }

    #[test]
    fn test_unexplored_team_size_is_flagged_once() {
        let answers = vec![
            utterance("I enjoy building payment platforms for small shops.", 5.0),
            utterance("Clear receipts and simple refunds kept the shops happy.", 35.0),
            utterance("Honestly I led a team of 12 engineers on that.", 65.0),
        ];

        let flow = analyze_conversation(&questions(), &answers);

        assert_eq!(flow.missed_follow_ups.len(), 1);
        let missed = &flow.missed_follow_ups[0];
        assert_eq!(missed.after_node, "a2");
        assert_eq!(missed.importance, Importance::High);
        assert!(!missed.suggested_questions.is_empty());
    }

    #[test]
    fn test_empty_conversation() {
        let flow = analyze_conversation(&[], &[]);
        assert!(flow.graph.is_empty());
        assert_eq!(flow.logical_score, NEUTRAL_SCORE);
        assert!(flow.missed_follow_ups.is_empty());
        assert!(flow.branches.is_empty());
    }
}
