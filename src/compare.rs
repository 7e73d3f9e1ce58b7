//! Line-by-line comparison of actual against expected output.

use std::fmt;

/// The first line where actual and expected output disagree.
///
/// A side that ran out of lines is reported as an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMismatch {
    /// 1-based line number.
    pub line: usize,
    pub actual: String,
    pub expected: String,
}

impl fmt::Display for LineMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "err @ Line{}, got {}, expect {}",
            self.line, self.actual, self.expected
        )
    }
}

/// Returns the first mismatch between the two sequences, comparing lines with
/// surrounding whitespace trimmed, or `None` when they are identical.
pub fn first_mismatch<A, E>(actual: &[A], expected: &[E]) -> Option<LineMismatch>
where
    A: AsRef<str>,
    E: AsRef<str>,
{
    let len = actual.len().max(expected.len());
    (0..len).find_map(|i| {
        let got = actual.get(i).map_or("", |s| s.as_ref().trim());
        let want = expected.get(i).map_or("", |s| s.as_ref().trim());
        let missing = i >= actual.len() || i >= expected.len();
        (missing || got != want).then(|| LineMismatch {
            line: i + 1,
            actual: got.to_string(),
            expected: want.to_string(),
        })
    })
}
