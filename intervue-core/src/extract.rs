//! Tolerant extraction of structured data from model output
//!
//! Language models wrap JSON in prose, code fences, raw newlines inside
//! strings and trailing commas. The extractor sanitizes control characters,
//! locates the first balanced object or array (string and escape aware),
//! strips trailing commas and only then hands the slice to `serde_json`.

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors from structured output extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Output contained no `{` or `[`
    #[error("no JSON object or array found in model output")]
    NotFound,

    /// An object or array was opened but never closed
    #[error("unbalanced brackets in model output")]
    Unbalanced,

    /// A balanced candidate was found but did not deserialize
    #[error("failed to parse model output: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Maximum number of candidate start positions tried before giving up
const MAX_CANDIDATES: usize = 8;

/// Extracts and deserializes the first JSON value in `raw` that fits `T`
pub fn extract_json<T: DeserializeOwned>(raw: &str) -> Result<T, ExtractError> {
    let sanitized = sanitize(raw);

    if let Ok(value) = serde_json::from_str::<T>(sanitized.trim()) {
        return Ok(value);
    }

    let mut last_error = ExtractError::NotFound;
    let mut search_from = 0;

    for _ in 0..MAX_CANDIDATES {
        let Some(offset) = sanitized[search_from..].find(['{', '[']) else {
            break;
        };
        let start = search_from + offset;

        match balanced_end(&sanitized, start) {
            Some(end) => {
                let candidate = strip_trailing_commas(&sanitized[start..end]);
                match serde_json::from_str::<T>(&candidate) {
                    Ok(value) => return Ok(value),
                    Err(e) => last_error = ExtractError::Parse(e),
                }
            }
            None => {
                if matches!(last_error, ExtractError::NotFound) {
                    last_error = ExtractError::Unbalanced;
                }
            }
        }

        search_from = start + 1;
    }

    Err(last_error)
}

/// Removes control characters and escapes raw whitespace inside strings
fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in raw.chars() {
        if in_string {
            if escaped {
                escaped = false;
                out.push(c);
                continue;
            }
            match c {
                '\\' => {
                    escaped = true;
                    out.push(c);
                }
                '"' => {
                    in_string = false;
                    out.push(c);
                }
                '\n' => out.push_str("\\n"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() => {}
                c => out.push(c),
            }
        } else {
            match c {
                '"' => {
                    in_string = true;
                    out.push(c);
                }
                '\n' | '\t' | '\r' | ' ' => out.push(c),
                c if c.is_control() => {}
                c => out.push(c),
            }
        }
    }

    out
}

/// Byte index one past the bracket closing the one opened at `start`
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                if stack.pop() != Some(c) {
                    return None;
                }
                if stack.is_empty() {
                    return Some(start + i + c.len_utf8());
                }
            }
            _ => {}
        }
    }

    None
}

/// Drops commas that directly precede `}` or `]`, outside strings
fn strip_trailing_commas(json: &str) -> String {
    let chars: Vec<char> = json.chars().collect();
    let mut out = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            out.push(c);
            continue;
        }

        if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        out.push(c);
    }

    out
}
