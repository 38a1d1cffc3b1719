use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::location::Location;

/// Typed result of validating one raw cell.
///
/// `Empty` is what a field that is allowed to be empty produces when its
/// type has no natural blank (date/time fields, external types).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Value {
    Empty,
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    DateTime(NaiveDateTime),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Text(text) => write!(f, "{text}"),
            Value::Integer(value) => write!(f, "{value}"),
            Value::Decimal(value) => write!(f, "{value}"),
            Value::DateTime(value) => write!(f, "{value}"),
        }
    }
}

/// Field name to validated value, one per accepted data row.
///
/// Handed to every check and, through the pipeline's row callback, to the
/// caller.
pub type RowMap = BTreeMap<String, Value>;

/// One raw row as produced by a row source: the untyped cells plus the
/// location of the row's first cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub cells: Vec<String>,
    pub location: Location,
}

impl SourceRow {
    pub fn new(cells: Vec<String>, location: Location) -> Self {
        Self { cells, location }
    }
}
