//! Question/answer graph construction

use std::collections::BTreeSet;

use crate::domain::flow::{EdgeKind, FlowEdge, FlowGraph, FlowNode, FlowNodeType};
use crate::domain::transcript::{Speaker, Utterance};
use crate::flow::text::{has_follow_up_cue, keywords};

/// How many earlier questions a follow-up may build on
pub const FOLLOW_UP_LOOKBACK: usize = 3;

/// Minimum share of a question's keywords found in the earlier answer
pub const MIN_KEYWORD_OVERLAP: f64 = 0.2;

/// Seconds over which a response edge weight halves
const RESPONSE_HALF_LIFE_SECS: f64 = 60.0;

pub(crate) fn question_id(index: usize) -> String {
    format!("q{}", index)
}

pub(crate) fn answer_id(index: usize) -> String {
    format!("a{}", index)
}

/// Builds the flow graph for an interview
///
/// Returns an empty graph when either list is empty. Deterministic for a given
/// input ordering.
pub fn build(questions: &[Utterance], answers: &[Utterance]) -> FlowGraph {
    if questions.is_empty() || answers.is_empty() {
        return FlowGraph::default();
    }

    let mut nodes = Vec::with_capacity(questions.len() + answers.len());
    for (index, q) in questions.iter().enumerate() {
        nodes.push(FlowNode {
            id: question_id(index),
            node_type: FlowNodeType::Question,
            speaker: Speaker::Recruiter,
            text: q.text.clone(),
            timestamp: q.timestamp,
            index,
        });
    }
    for (index, a) in answers.iter().enumerate() {
        nodes.push(FlowNode {
            id: answer_id(index),
            node_type: FlowNodeType::Answer,
            speaker: Speaker::Candidate,
            text: a.text.clone(),
            timestamp: a.timestamp,
            index,
        });
    }

    let mut edges = Vec::new();

    // Response edges: each answer to the latest question asked at or before it
    let mut answers_by_question: Vec<Vec<usize>> = vec![Vec::new(); questions.len()];
    for (ai, answer) in answers.iter().enumerate() {
        let Some(qi) = preceding_question(questions, answer.timestamp) else {
            continue;
        };
        answers_by_question[qi].push(ai);

        let gap = (answer.timestamp - questions[qi].timestamp).max(0.0);
        edges.push(FlowEdge {
            from: question_id(qi),
            to: answer_id(ai),
            kind: EdgeKind::Response,
            weight: round3(0.5f64.powf(gap / RESPONSE_HALF_LIFE_SECS)),
            via: None,
        });
    }

    // Follow-up edges: a later question building on an earlier answer
    let answer_keywords: Vec<BTreeSet<String>> =
        answers.iter().map(|a| keywords(&a.text)).collect();

    for (qj, question) in questions.iter().enumerate().skip(1) {
        let question_keywords = keywords(&question.text);
        if question_keywords.is_empty() {
            continue;
        }
        let cue = has_follow_up_cue(&question.text);

        let mut best: Option<(f64, usize, usize)> = None;
        for qi in qj.saturating_sub(FOLLOW_UP_LOOKBACK)..qj {
            for &ai in &answers_by_question[qi] {
                if answers[ai].timestamp > question.timestamp {
                    continue;
                }
                let shared = question_keywords
                    .intersection(&answer_keywords[ai])
                    .count();
                if shared == 0 {
                    continue;
                }
                let overlap = shared as f64 / question_keywords.len() as f64;
                if overlap < MIN_KEYWORD_OVERLAP && !cue {
                    continue;
                }
                let score = if cue { overlap + 0.25 } else { overlap };
                // Later (closer) answers win ties
                if best.is_none_or(|(s, _, _)| score >= s) {
                    best = Some((score, qi, ai));
                }
            }
        }

        if let Some((score, qi, ai)) = best {
            edges.push(FlowEdge {
                from: question_id(qi),
                to: question_id(qj),
                kind: EdgeKind::FollowUp,
                weight: round3(score.min(1.0)),
                via: Some(answer_id(ai)),
            });
        }
    }

    FlowGraph { nodes, edges }
}

/// Index of the latest question at or before `timestamp`; ties go to the later index
fn preceding_question(questions: &[Utterance], timestamp: f64) -> Option<usize> {
    questions
        .iter()
        .enumerate()
        .filter(|(_, q)| q.timestamp <= timestamp)
        .max_by(|(i, a), (j, b)| a.timestamp.total_cmp(&b.timestamp).then(i.cmp(j)))
        .map(|(i, _)| i)
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
