//! Logical continuity scoring

use std::collections::HashSet;

use crate::domain::flow::{EdgeKind, FlowGraph};

/// Score reported when there is nothing to judge
pub const NEUTRAL_SCORE: f64 = 50.0;

const BASE_SCORE: f64 = 40.0;
const FOLLOW_UP_WEIGHT: f64 = 60.0;
const ORPHAN_PENALTY: f64 = 30.0;

/// Scores conversational continuity on a 0-100 scale
///
/// Rewards the share of questions that follow up on an earlier answer and
/// penalizes questions that never received an answer. Non-decreasing in the
/// follow-up ratio for a fixed orphan count.
pub fn calculate_logical_score(graph: &FlowGraph) -> f64 {
    let question_count = graph.questions().count();
    if graph.is_empty() || question_count == 0 {
        return NEUTRAL_SCORE;
    }

    let follow_ups = graph.edges_of(EdgeKind::FollowUp).count();
    let answered: HashSet<&str> = graph
        .edges_of(EdgeKind::Response)
        .map(|e| e.from.as_str())
        .collect();
    let orphans = graph
        .questions()
        .filter(|q| !answered.contains(q.id.as_str()))
        .count();

    // The opening question cannot be a follow-up
    let follow_up_ratio =
        (follow_ups as f64 / question_count.saturating_sub(1).max(1) as f64).min(1.0);
    let orphan_ratio = orphans as f64 / question_count as f64;

    let score = BASE_SCORE + FOLLOW_UP_WEIGHT * follow_up_ratio - ORPHAN_PENALTY * orphan_ratio;
    (score.clamp(0.0, 100.0) * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::flow::{FlowEdge, FlowNode, FlowNodeType};
    use crate::domain::transcript::Speaker;

    fn node(id: &str, node_type: FlowNodeType, index: usize) -> FlowNode {
        FlowNode {
            id: id.to_string(),
            node_type,
            speaker: match node_type {
                FlowNodeType::Question => Speaker::Recruiter,
                FlowNodeType::Answer => Speaker::Candidate,
            },
            text: String::new(),
            timestamp: index as f64,
            index,
        }
    }

    fn edge(from: &str, to: &str, kind: EdgeKind) -> FlowEdge {
        FlowEdge {
            from: from.to_string(),
            to: to.to_string(),
            kind,
            weight: 1.0,
            via: None,
        }
    }

    /// Four questions, the last unanswered, with `follow_ups` follow-up edges
    fn graph_with_follow_ups(follow_ups: usize) -> FlowGraph {
        let mut nodes = Vec::new();
        for i in 0..4 {
            nodes.push(node(&format!("q{}", i), FlowNodeType::Question, i));
        }
        for i in 0..3 {
            nodes.push(node(&format!("a{}", i), FlowNodeType::Answer, i));
        }
        let mut edges = vec![
            edge("q0", "a0", EdgeKind::Response),
            edge("q1", "a1", EdgeKind::Response),
            edge("q2", "a2", EdgeKind::Response),
        ];
        for i in 0..follow_ups {
            edges.push(edge(
                &format!("q{}", i),
                &format!("q{}", i + 1),
                EdgeKind::FollowUp,
            ));
        }
        FlowGraph { nodes, edges }
    }

    #[test]
    fn test_empty_graph_is_neutral() {
        let score = calculate_logical_score(&FlowGraph::default());
        assert_eq!(score, NEUTRAL_SCORE);
        assert!(!score.is_nan());
    }

    #[test]
    fn test_monotonic_in_follow_up_ratio() {
        let scores: Vec<f64> = (0..=3)
            .map(|n| calculate_logical_score(&graph_with_follow_ups(n)))
            .collect();

        for pair in scores.windows(2) {
            assert!(pair[1] >= pair[0], "scores not monotonic: {:?}", scores);
        }
    }

    #[test]
    fn test_orphans_are_penalized() {
        let mut answered = graph_with_follow_ups(1);
        answered.nodes.push(node("a3", FlowNodeType::Answer, 3));
        answered.edges.push(edge("q3", "a3", EdgeKind::Response));

        let orphaned = graph_with_follow_ups(1);
        assert!(calculate_logical_score(&answered) > calculate_logical_score(&orphaned));
    }

    #[test]
    fn test_fully_linked_interview_scores_high() {
        let mut graph = graph_with_follow_ups(3);
        graph.nodes.push(node("a3", FlowNodeType::Answer, 3));
        graph.edges.push(edge("q3", "a3", EdgeKind::Response));

        assert_eq!(calculate_logical_score(&graph), 100.0);
    }
}
