//! Normalization of expected parse-tree dumps for advance-mode fixtures.
//!
//! Reference dumps print some list non-terminals even when they derive
//! nothing, while a parser is free to omit them. Such childless container
//! nodes are dropped. `RELOP` nodes are compared by node type only, and `FLOAT`
//! literals are re-rendered through a 32-bit round trip so `2`, `2.0` and
//! `2.000000` all compare equal.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Container non-terminals that carry no information when they have no child.
pub const CONTAINER_NODES: [&str; 4] = ["ExtDefList", "OptTag", "DefList", "StmtList"];

static RELOP_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^( *RELOP):.*$").expect("RELOP pattern is valid"));
static FLOAT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^( *FLOAT:)(.*)$").expect("FLOAT pattern is valid"));

#[derive(Debug, Error, PartialEq, Eq)]
#[error("line {line}: FLOAT value '{value}' is not a number")]
pub struct NormalizeError {
    /// 1-based line within the dump.
    pub line: usize,
    pub value: String,
}

fn indentation(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}

fn is_empty_container(lines: &[&str], i: usize) -> bool {
    let Some(head) = lines[i].split_whitespace().next() else {
        return false;
    };
    if !CONTAINER_NODES.contains(&head) {
        return false;
    }
    match lines.get(i + 1) {
        None => true,
        Some(next) => indentation(lines[i]) >= indentation(next),
    }
}

/// Renders a float literal the way a 32-bit `%f` would.
pub fn canonical_float(value: &str) -> Option<String> {
    let parsed: f64 = value.trim().parse().ok()?;
    Some(format!("{:.6}", f64::from(parsed as f32)))
}

/// Normalizes an expected dump into the lines an actual dump is compared against.
///
/// Container nodes are judged against the next line of the *input*, so a
/// container whose only children are themselves dropped is kept.
pub fn normalize(dump: &str) -> Result<Vec<String>, NormalizeError> {
    let lines: Vec<&str> = dump.lines().collect();
    let mut kept = Vec::with_capacity(lines.len());

    for (i, line) in lines.iter().enumerate() {
        if is_empty_container(&lines, i) {
            continue;
        }
        if let Some(caps) = RELOP_LINE.captures(line) {
            kept.push(caps[1].to_string());
        } else if let Some(caps) = FLOAT_LINE.captures(line) {
            let value = canonical_float(&caps[2]).ok_or_else(|| NormalizeError {
                line: i + 1,
                value: caps[2].trim().to_string(),
            })?;
            kept.push(format!("{} {}", &caps[1], value));
        } else {
            kept.push(line.to_string());
        }
    }
    Ok(kept)
}
