use std::fmt;

use serde::{Deserialize, Serialize};

/// Position of a cell in a tabular source: source name plus 1-based row
/// and column.
///
/// Locations are immutable values with structural equality. Every
/// diagnostic and every accepted-row notification carries one. Row sources
/// for delimited text, fixed-width text, and spreadsheets all populate the
/// same type; the validation core never computes locations itself beyond
/// picking the column of a failed field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    pub source: String,
    pub row: u32,
    pub column: u32,
}

impl Location {
    pub fn new(source: impl Into<String>, row: u32, column: u32) -> Self {
        Self {
            source: source.into(),
            row,
            column,
        }
    }

    /// The same row pointing at another cell.
    pub fn with_column(&self, column: u32) -> Self {
        Self {
            source: self.source.clone(),
            row: self.row,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (R{}C{})", self.source, self.row, self.column)
    }
}
