use thiserror::Error;

/// Error raised while parsing a range expression.
///
/// The error carries the offending range text; the location of the cell
/// that declared the range is only known to the caller and gets attached
/// when the error is converted into an interface error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse range {text:?}: {message}")]
pub struct RangeSyntaxError {
    /// The range text as written in the interface definition.
    pub text: String,
    /// What is wrong with it.
    pub message: String,
}

impl RangeSyntaxError {
    pub fn new(text: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            message: message.into(),
        }
    }
}
