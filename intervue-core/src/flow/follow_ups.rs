//! Missed follow-up detection
//!
//! Flags answers that introduce a concrete claim (numbers, team size,
//! technology, ownership, conflict) which the interviewer never followed up on.

use regex::Regex;
use std::sync::LazyLock;

use crate::domain::flow::{EdgeKind, FlowGraph, FlowNode, Importance, MissedFollowUp};

/// Questions after an answer within which a follow-up counts as probing it
pub const MISSED_FOLLOW_UP_LOOKAHEAD: usize = 2;

static TEAM_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:team|group|squad|organi[sz]ation|org)\s+of\s+(\d+|a dozen|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|fifteen|twenty|thirty|forty|fifty)\b",
    )
    .expect("valid team size pattern")
});

static HEADCOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:led|managed|mentored|supervised|hired|grew)\s+(?:a\s+)?(\d+)\s+(?:\w+\s+)?(?:engineers|developers|people|reports|designers|analysts|members)\b",
    )
    .expect("valid headcount pattern")
});

static LEADERSHIP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:i|we)\s+(?:led|managed|headed|ran)\s+(?:the|a|our)\s+team\b")
        .expect("valid leadership pattern")
});

static METRIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:[$€£]\s?\d[\d,.]*\s*(?:k|m|million|billion)?|\b\d[\d,.]*\s*(?:%|percent\b|x\b|ms\b|milliseconds\b|seconds\b|hours\b|days\b|users\b|customers\b|requests\b|transactions\b|million\b|billion\b|thousand\b))",
    )
    .expect("valid metric pattern")
});

static OWNERSHIP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bi\s+(built|designed|architected|launched|created|founded|owned|implemented|migrated|rewrote)\b",
    )
    .expect("valid ownership pattern")
});

static CHALLENGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(challenge|challenging|difficult|conflict|disagreement|disagreed|failure|failed|mistake|struggled)\b",
    )
    .expect("valid challenge pattern")
});

const TECHNOLOGIES: &[&str] = &[
    "rust",
    "python",
    "java",
    "javascript",
    "typescript",
    "golang",
    "kotlin",
    "scala",
    "react",
    "angular",
    "django",
    "rails",
    "spring",
    "kubernetes",
    "docker",
    "terraform",
    "aws",
    "azure",
    "gcp",
    "postgres",
    "postgresql",
    "mysql",
    "mongodb",
    "redis",
    "kafka",
    "spark",
    "graphql",
    "grpc",
    "tensorflow",
    "pytorch",
    "elasticsearch",
    "snowflake",
    "airflow",
    "microservices",
];

/// A detail in an answer worth a follow-up question
#[derive(Debug, Clone, PartialEq)]
enum Detail {
    TeamSize(String),
    Leadership,
    Metric(String),
    Technology(String),
    Ownership(String),
    Challenge(String),
}

impl Detail {
    fn importance(&self) -> Importance {
        match self {
            Detail::TeamSize(_) | Detail::Leadership | Detail::Metric(_) => Importance::High,
            Detail::Technology(_) | Detail::Ownership(_) => Importance::Medium,
            Detail::Challenge(_) => Importance::Low,
        }
    }

    fn suggested_questions(&self) -> Vec<String> {
        match self {
            Detail::TeamSize(size) => vec![
                format!("How was the team of {} structured, and what was your role in it?", size),
                "What was the hardest people problem you handled with that team?".to_string(),
            ],
            Detail::Leadership => vec![
                "How many people were you responsible for, and how did you support them?"
                    .to_string(),
            ],
            Detail::Metric(figure) => vec![
                format!("How did you measure the {} figure?", figure),
                "What was your personal contribution to that result?".to_string(),
            ],
            Detail::Technology(name) => vec![
                format!("Why was {} the right choice for that work?", name),
                format!("What trade-offs or problems did you run into with {}?", name),
            ],
            Detail::Ownership(verb) => vec![
                format!("What were the key design decisions when you {} it?", verb),
                "What would you change about it today?".to_string(),
            ],
            Detail::Challenge(_) => vec![
                "How did you resolve that situation?".to_string(),
                "What would you do differently next time?".to_string(),
            ],
        }
    }

    fn reasoning(&self) -> String {
        match self {
            Detail::TeamSize(size) => format!(
                "Candidate mentioned a team of {} without being asked about team structure or their leadership",
                size
            ),
            Detail::Leadership => {
                "Candidate claimed team leadership that was never explored".to_string()
            }
            Detail::Metric(figure) => format!(
                "Candidate cited a quantitative result ({}) that was not verified",
                figure
            ),
            Detail::Technology(name) => format!(
                "Candidate mentioned {} without elaborating on depth of experience",
                name
            ),
            Detail::Ownership(verb) => format!(
                "Candidate said they {} something but the scope of ownership was not explored",
                verb
            ),
            Detail::Challenge(word) => format!(
                "Candidate referred to a {} without describing how it was handled",
                word
            ),
        }
    }
}

/// Finds the most important follow-up-worthy detail in an answer
fn strongest_detail(text: &str) -> Option<Detail> {
    if let Some(caps) = TEAM_SIZE.captures(text).or_else(|| HEADCOUNT.captures(text)) {
        return Some(Detail::TeamSize(caps[1].to_string()));
    }
    if let Some(m) = METRIC.find(text) {
        return Some(Detail::Metric(m.as_str().trim().to_string()));
    }
    if LEADERSHIP.is_match(text) {
        return Some(Detail::Leadership);
    }

    let lowered = text.to_lowercase();
    let technology = lowered
        .split(|c: char| !c.is_alphanumeric())
        .find(|w| TECHNOLOGIES.contains(w));
    if let Some(name) = technology {
        return Some(Detail::Technology(name.to_string()));
    }
    if let Some(caps) = OWNERSHIP.captures(text) {
        return Some(Detail::Ownership(caps[1].to_lowercase()));
    }
    CHALLENGE
        .captures(text)
        .map(|caps| Detail::Challenge(caps[1].to_lowercase()))
}

/// Lists answers whose detail was not followed up within the look-ahead window
pub fn detect_missed_follow_ups(graph: &FlowGraph) -> Vec<MissedFollowUp> {
    if graph.is_empty() {
        return Vec::new();
    }

    let mut questions: Vec<&FlowNode> = graph.questions().collect();
    questions.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp).then(a.index.cmp(&b.index)));

    let mut missed = Vec::new();

    for answer in graph.answers() {
        let Some(detail) = strongest_detail(&answer.text) else {
            continue;
        };

        if is_followed_up(graph, answer, &questions) {
            continue;
        }

        missed.push(MissedFollowUp {
            after_node: answer.id.clone(),
            suggested_questions: detail.suggested_questions(),
            importance: detail.importance(),
            reasoning: detail.reasoning(),
        });
    }

    missed
}

/// Whether a follow-up edge reaches one of the next questions after this answer
fn is_followed_up(graph: &FlowGraph, answer: &FlowNode, questions: &[&FlowNode]) -> bool {
    let window: Vec<&str> = questions
        .iter()
        .filter(|q| q.timestamp >= answer.timestamp)
        .take(MISSED_FOLLOW_UP_LOOKAHEAD)
        .map(|q| q.id.as_str())
        .collect();
    if window.is_empty() {
        return false;
    }

    let asked_by = graph.question_for(&answer.id);

    graph.edges_of(EdgeKind::FollowUp).any(|edge| {
        let from_this_answer =
            edge.via.as_deref() == Some(answer.id.as_str()) || asked_by == Some(edge.from.as_str());
        from_this_answer && window.contains(&edge.to.as_str())
    })
}
