//! Conversation branch identification
//!
//! A branch is a connected component of the follow-up subgraph: a run of
//! questions that keep building on each other's answers.

use std::collections::{BTreeMap, HashMap};

use crate::domain::flow::{ConversationBranch, EdgeKind, FlowGraph, FlowNode};
use crate::flow::text::keywords;

const MAX_TOPIC_KEYWORDS: usize = 3;

/// Disjoint-set over question indices
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Groups follow-up chains into topic threads, ordered by start time
pub fn identify_conversation_branches(graph: &FlowGraph) -> Vec<ConversationBranch> {
    let questions: Vec<&FlowNode> = graph.questions().collect();
    if questions.is_empty() {
        return Vec::new();
    }

    let position: HashMap<&str, usize> = questions
        .iter()
        .enumerate()
        .map(|(i, q)| (q.id.as_str(), i))
        .collect();

    let mut sets = UnionFind::new(questions.len());
    let mut linked = vec![false; questions.len()];

    for edge in graph.edges_of(EdgeKind::FollowUp) {
        let (Some(&from), Some(&to)) = (
            position.get(edge.from.as_str()),
            position.get(edge.to.as_str()),
        ) else {
            continue;
        };
        sets.union(from, to);
        linked[from] = true;
        linked[to] = true;
    }

    let mut components: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for i in (0..questions.len()).filter(|&i| linked[i]) {
        components.entry(sets.find(i)).or_default().push(i);
    }

    let mut branches: Vec<ConversationBranch> = components
        .into_values()
        .map(|members| branch_from(graph, &questions, members))
        .collect();

    branches.sort_by(|a, b| a.started_at.total_cmp(&b.started_at));
    for (i, branch) in branches.iter_mut().enumerate() {
        branch.id = format!("branch-{}", i + 1);
    }

    branches
}

fn branch_from(graph: &FlowGraph, questions: &[&FlowNode], members: Vec<usize>) -> ConversationBranch {
    let mut question_nodes: Vec<&FlowNode> = members.iter().map(|&i| questions[i]).collect();
    question_nodes.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

    let mut answer_nodes: Vec<&FlowNode> = graph
        .answers()
        .filter(|a| {
            graph
                .question_for(&a.id)
                .is_some_and(|q| question_nodes.iter().any(|n| n.id == q))
        })
        .collect();
    answer_nodes.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

    // Keywords that recur across at least two nodes of the thread
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for node in question_nodes.iter().chain(answer_nodes.iter()) {
        for word in keywords(&node.text) {
            *counts.entry(word).or_insert(0) += 1;
        }
    }
    let mut recurring: Vec<(String, usize)> =
        counts.into_iter().filter(|(_, count)| *count >= 2).collect();
    recurring.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let timestamps = question_nodes
        .iter()
        .chain(answer_nodes.iter())
        .map(|n| n.timestamp);
    let started_at = timestamps.clone().fold(f64::INFINITY, f64::min);
    let ended_at = timestamps.fold(f64::NEG_INFINITY, f64::max);

    ConversationBranch {
        id: String::new(),
        depth: question_nodes.len(),
        question_ids: question_nodes.iter().map(|n| n.id.clone()).collect(),
        answer_ids: answer_nodes.iter().map(|n| n.id.clone()).collect(),
        topic_keywords: recurring
            .into_iter()
            .take(MAX_TOPIC_KEYWORDS)
            .map(|(word, _)| word)
            .collect(),
        started_at,
        ended_at,
    }
}
