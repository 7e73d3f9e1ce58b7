//! Extraction of diagnostic markers from parser output.
//!
//! The parser under test reports problems as lines of the form
//! `Error type A at Line 12`. Only lines that *start* with that pattern count;
//! anything after the line number is ignored.

use std::collections::BTreeSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

static DIAGNOSTIC_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^Error type (A|B) at Line (\d+)").expect("diagnostic pattern is valid")
});

/// A diagnostic reported by the parser: category letter plus source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Marker {
    // Field order gives the (line, category) sort.
    pub line: u64,
    pub category: char,
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.category, self.line)
    }
}

/// Every marker in `output`, in the order encountered.
///
/// A line number too large for `u64` cannot name a source line; the marker is
/// skipped with a warning.
pub fn scan(output: &str) -> Vec<Marker> {
    output
        .lines()
        .filter_map(|line| {
            let caps = DIAGNOSTIC_LINE.captures(line)?;
            let category = caps[1].chars().next()?.to_ascii_uppercase();
            match caps[2].parse() {
                Ok(number) => Some(Marker {
                    line: number,
                    category,
                }),
                Err(e) => {
                    warn!(line = %line, error = %e, "diagnostic line number out of range, ignored");
                    None
                }
            }
        })
        .collect()
}

/// Markers rendered as `<category><line>`, sorted by line number.
///
/// Duplicates are kept; the result is compared against answer rows as-is.
pub fn distinguishing(output: &str) -> Vec<String> {
    let mut markers = scan(output);
    markers.sort();
    markers.iter().map(Marker::to_string).collect()
}

/// The set of line numbers that carry a diagnostic, category discarded.
pub fn line_set(output: &str) -> BTreeSet<u64> {
    scan(output).into_iter().map(|m| m.line).collect()
}
