//! Keyword extraction for topical overlap

use std::collections::BTreeSet;

/// Phrases that mark a question as explicitly building on a previous answer
const FOLLOW_UP_CUES: &[&str] = &[
    "you mentioned",
    "you said",
    "you talked about",
    "you described",
    "earlier you",
    "tell me more",
    "elaborate",
    "expand on",
    "go deeper",
    "dig into",
    "more about that",
];

/// Extracts normalized content words from an utterance
pub(crate) fn keywords(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 2)
        .map(|w| w.to_lowercase())
        .filter(|w| !is_stopword(w))
        .map(|w| normalize(&w))
        .collect()
}

/// Whether a question explicitly refers back to an earlier answer
pub(crate) fn has_follow_up_cue(text: &str) -> bool {
    let lowered = text.to_lowercase();
    FOLLOW_UP_CUES.iter().any(|cue| lowered.contains(cue))
}

/// Crude plural folding so "teams" and "team" match
fn normalize(word: &str) -> String {
    if word.len() > 4 && word.ends_with('s') && !word.ends_with("ss") {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

fn is_stopword(word: &str) -> bool {
    matches!(
        word,
        "the"
            | "and"
            | "for"
            | "that"
            | "this"
            | "with"
            | "from"
            | "have"
            | "has"
            | "had"
            | "are"
            | "was"
            | "were"
            | "been"
            | "being"
            | "but"
            | "not"
            | "you"
            | "your"
            | "yours"
            | "our"
            | "ours"
            | "they"
            | "them"
            | "their"
            | "there"
            | "then"
            | "than"
            | "what"
            | "when"
            | "where"
            | "which"
            | "who"
            | "why"
            | "how"
            | "can"
            | "could"
            | "would"
            | "should"
            | "will"
            | "did"
            | "does"
            | "doing"
            | "done"
            | "about"
            | "into"
            | "onto"
            | "over"
            | "some"
            | "any"
            | "all"
            | "also"
            | "just"
            | "really"
            | "very"
            | "like"
            | "yeah"
            | "yes"
            | "okay"
            | "sure"
            | "well"
            | "know"
            | "think"
            | "thing"
            | "things"
            | "tell"
            | "more"
            | "much"
            | "many"
            | "mentioned"
            | "said"
            | "talked"
            | "described"
            | "elaborate"
            | "expand"
            | "earlier"
            | "please"
            | "describe"
            | "walk"
            | "through"
            | "its"
            | "it's"
            | "she"
            | "her"
            | "him"
            | "his"
            | "myself"
            | "out"
            | "get"
            | "got"
            | "one"
            | "lot"
    )
}
