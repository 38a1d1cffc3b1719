//! Error taxonomy of the validation engine.
//!
//! Two families exist. Interface errors mean the definition itself is
//! broken; they are fatal and abort before any data is read. Data errors
//! (field, check, structure) are recoverable per row and subject to the
//! pipeline's error policy. Failures of the physical row source are neither
//! and always terminate a run.

use thiserror::Error;

use crate::location::Location;

fn prefixed(location: &Option<Location>, message: &str) -> String {
    match location {
        Some(location) => format!("{location}: {message}"),
        None => message.to_string(),
    }
}

/// The interface definition is malformed: bad range syntax, an unknown
/// field type, a broken check rule, an invalid data format property.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", prefixed(.location, .message))]
pub struct InterfaceError {
    pub message: String,
    pub location: Option<Location>,
}

impl InterfaceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    pub fn at(message: impl Into<String>, location: Location) -> Self {
        Self {
            message: message.into(),
            location: Some(location),
        }
    }

    /// Attach a location unless one is already present.
    pub fn located_at(mut self, location: &Location) -> Self {
        if self.location.is_none() {
            self.location = Some(location.clone());
        }
        self
    }
}

impl From<rowspec_ranges::RangeSyntaxError> for InterfaceError {
    fn from(error: rowspec_ranges::RangeSyntaxError) -> Self {
        Self::new(error.to_string())
    }
}

/// One cell does not conform to its field format.
///
/// Raised by field formats, which do not know where the cell came from;
/// the pipeline wraps it into [`DataError::Field`] together with the field
/// name and cell location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FieldValueError {
    pub message: String,
}

impl FieldValueError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn check_message(
    location: &Location,
    message: &str,
    first_occurrence: &Option<Location>,
) -> String {
    match first_occurrence {
        Some(first) => format!("{location}: {message} (first occurrence: {first})"),
        None => format!("{location}: {message}"),
    }
}

/// A row check or end-of-stream check failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", check_message(.location, .message, .first_occurrence))]
pub struct CheckError {
    pub message: String,
    pub location: Location,
    /// Related earlier location, e.g. where a duplicated key first occurred.
    pub first_occurrence: Option<Location>,
}

impl CheckError {
    pub fn new(message: impl Into<String>, location: Location) -> Self {
        Self {
            message: message.into(),
            location,
            first_occurrence: None,
        }
    }

    pub fn with_first_occurrence(mut self, first_occurrence: Location) -> Self {
        self.first_occurrence = Some(first_occurrence);
        self
    }
}

/// A recoverable per-row error, subject to the pipeline's error policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("{location}: cannot accept field {field:?}: {source}")]
    Field {
        field: String,
        location: Location,
        source: FieldValueError,
    },
    #[error(transparent)]
    Check(#[from] CheckError),
    /// The row has the wrong number of cells.
    #[error("{location}: {message}")]
    Structure { location: Location, message: String },
}

impl DataError {
    pub fn location(&self) -> &Location {
        match self {
            DataError::Field { location, .. } => location,
            DataError::Check(error) => &error.location,
            DataError::Structure { location, .. } => location,
        }
    }
}
