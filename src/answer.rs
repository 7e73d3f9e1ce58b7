//! Expected-answer grammar for simple-mode fixtures (`.txt` companions).
//!
//! Each line holds whitespace-separated tokens. Every token contributes one
//! marker to each answer row; a token written as `A3,B3` branches the rows,
//! one branch per comma-separated alternative. A line that begins with a space
//! is optional: the rows accumulated before it stay valid answers next to the
//! rows it extends.
//!
//! ```text
//! A1          -> [A1]
//! A1 B2       -> [A1, B2]
//! A1,B1       -> [A1], [B1]
//! A1
//!  B4         -> [A1], [A1, B4]
//! ```

/// One acceptable, order-sensitive sequence of diagnostic markers.
pub type AnswerRow = Vec<String>;

/// Every acceptable answer for a fixture.
///
/// An empty set means the answer file placed no constraint on diagnostics, so
/// the fixture falls back to a literal stdout comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet {
    rows: Vec<AnswerRow>,
}

impl AnswerSet {
    /// Expands answer-file text into the full set of answer rows.
    pub fn parse(text: &str) -> Self {
        let mut rows: Vec<AnswerRow> = vec![Vec::new()];

        for line in text.lines() {
            let mut next = if line.starts_with(' ') {
                rows.clone()
            } else {
                Vec::new()
            };

            let mut expanded = rows;
            for token in line.split_whitespace() {
                expanded = expanded
                    .iter()
                    .flat_map(move |row| {
                        token.split(',').map(move |alt| {
                            let mut row = row.clone();
                            row.push(alt.to_string());
                            row
                        })
                    })
                    .collect();
            }

            next.extend(expanded);
            rows = next;
        }

        if rows.len() == 1 && rows[0].is_empty() {
            rows.clear();
        }
        Self { rows }
    }

    /// True when the answer file constrains nothing.
    pub fn is_unconstrained(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[AnswerRow] {
        &self.rows
    }

    /// The row reported as "expected" when a fixture fails.
    pub fn first(&self) -> Option<&AnswerRow> {
        self.rows.first()
    }

    pub fn accepts(&self, actual: &[String]) -> bool {
        self.rows.iter().any(|row| row.as_slice() == actual)
    }
}
