use std::fmt;

use rowspec_model::{DataFormat, FieldSpec, FieldValueError, FormatKind, Value};
use rowspec_ranges::Range;

/// Type-specific part of a field format.
///
/// Implementations only ever see non-empty input that already passed the
/// shared envelope; empty-value handling is decided by the engine, not by
/// individual types.
pub trait FieldType: fmt::Debug + Send + Sync {
    /// Value produced for an empty cell of a field that is allowed to be
    /// empty. Defaults to blank text.
    fn empty_value(&self) -> Value {
        Value::Text(String::new())
    }

    /// Validate a non-empty raw value and convert it to its typed form.
    fn validate_value(&self, value: &str) -> Result<Value, FieldValueError>;
}

/// Runtime validator for one declared field, bound to the active data
/// format.
///
/// Stateless across rows: everything derived from the rule (a compiled
/// pattern, a parsed range) is computed once at construction, so a field
/// format can be shared read-only between concurrent validation runs.
#[derive(Debug)]
pub struct FieldFormat {
    spec: FieldSpec,
    allowed_characters: Option<Range>,
    fixed_width: bool,
    field_type: Box<dyn FieldType>,
}

impl FieldFormat {
    pub(crate) fn new(
        spec: FieldSpec,
        data_format: &DataFormat,
        field_type: Box<dyn FieldType>,
    ) -> Self {
        Self {
            allowed_characters: data_format.allowed_characters().cloned(),
            fixed_width: data_format.kind() == FormatKind::Fixed,
            spec,
            field_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    /// The value an empty cell maps to when the field is allowed to be
    /// empty.
    pub fn empty_value(&self) -> Value {
        self.field_type.empty_value()
    }

    /// Validate one raw cell.
    ///
    /// For fixed-width data the cell is trimmed first and the length range
    /// is not re-checked, since the physical slice already fixes it.
    pub fn validate(&self, raw: &str) -> Result<Value, FieldValueError> {
        self.validate_characters(raw)?;
        let value = if self.fixed_width { raw.trim() } else { raw };
        if value.is_empty() {
            if self.spec.allowed_to_be_empty {
                return Ok(self.field_type.empty_value());
            }
            return Err(FieldValueError::new("value must not be empty"));
        }
        if !self.fixed_width
            && let Some(length) = &self.spec.length
        {
            let count = value.chars().count() as i64;
            if !length.contains(count) {
                return Err(FieldValueError::new(format!(
                    "length of {value:?} is {count} but must be within range: {length}"
                )));
            }
        }
        self.field_type.validate_value(value)
    }

    fn validate_characters(&self, raw: &str) -> Result<(), FieldValueError> {
        let Some(allowed) = &self.allowed_characters else {
            return Ok(());
        };
        for character in raw.chars() {
            let code = i64::from(u32::from(character));
            if !allowed.contains(code) {
                return Err(FieldValueError::new(format!(
                    "character {character:?} (code point {code}) must be inside \
                     the allowed character range: {allowed}"
                )));
            }
        }
        Ok(())
    }
}
