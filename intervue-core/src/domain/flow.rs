//! Conversation flow graph types
//!
//! Produced locally by [`crate::flow`]; never by an external model.

use serde::{Deserialize, Serialize};

use crate::domain::transcript::Speaker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowNodeType {
    Question,
    Answer,
}

/// One question or one answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: FlowNodeType,
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: f64,
    /// Position within its own question or answer list
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeKind {
    /// Question to the answer that responds to it
    Response,
    /// Earlier question to a later question building on one of its answers
    FollowUp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
    pub weight: f64,
    /// For follow-up edges, the answer the later question builds on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
}

/// Directed question/answer graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowGraph {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

impl FlowGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn questions(&self) -> impl Iterator<Item = &FlowNode> {
        self.nodes
            .iter()
            .filter(|n| n.node_type == FlowNodeType::Question)
    }

    pub fn answers(&self) -> impl Iterator<Item = &FlowNode> {
        self.nodes
            .iter()
            .filter(|n| n.node_type == FlowNodeType::Answer)
    }

    pub fn edges_of(&self, kind: EdgeKind) -> impl Iterator<Item = &FlowEdge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    /// The question an answer responds to, if any
    pub fn question_for(&self, answer_id: &str) -> Option<&str> {
        self.edges_of(EdgeKind::Response)
            .find(|e| e.to == answer_id)
            .map(|e| e.from.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    Medium,
    High,
}

/// An answer with detail the interviewer never followed up on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissedFollowUp {
    pub after_node: String,
    pub suggested_questions: Vec<String>,
    pub importance: Importance,
    pub reasoning: String,
}

/// A topic thread linked by follow-up edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationBranch {
    pub id: String,
    pub question_ids: Vec<String>,
    pub answer_ids: Vec<String>,
    pub topic_keywords: Vec<String>,
    /// Number of questions in the thread
    pub depth: usize,
    pub started_at: f64,
    pub ended_at: f64,
}

/// Complete local flow analysis of one transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationFlow {
    pub graph: FlowGraph,
    pub logical_score: f64,
    pub missed_follow_ups: Vec<MissedFollowUp>,
    pub branches: Vec<ConversationBranch>,
}
