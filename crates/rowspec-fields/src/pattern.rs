use globset::{GlobBuilder, GlobMatcher};

use rowspec_model::{DataFormat, FieldSpec, FieldValueError, InterfaceError, Value};

use crate::field::FieldType;

/// Field format accepting values that match a glob-style pattern with `?`
/// for exactly one character and `*` for zero or more, compared
/// case-insensitively over the full value.
#[derive(Debug)]
pub struct PatternFieldType {
    rule: String,
    matcher: GlobMatcher,
}

impl PatternFieldType {
    pub fn new(spec: &FieldSpec, _data_format: &DataFormat) -> Result<Self, InterfaceError> {
        let rule = spec.rule.trim();
        if rule.is_empty() {
            return Err(InterfaceError::new("pattern rule must not be empty"));
        }
        let glob = GlobBuilder::new(rule)
            .literal_separator(false)
            .case_insensitive(true)
            .backslash_escape(true)
            .build()
            .map_err(|error| {
                InterfaceError::new(format!("pattern rule {rule:?} is invalid: {error}"))
            })?;
        Ok(Self {
            rule: rule.to_string(),
            matcher: glob.compile_matcher(),
        })
    }
}

impl FieldType for PatternFieldType {
    fn validate_value(&self, value: &str) -> Result<Value, FieldValueError> {
        if self.matcher.is_match(value) {
            return Ok(Value::Text(value.to_string()));
        }
        Err(FieldValueError::new(format!(
            "value {value:?} must match pattern: {:?}",
            self.rule
        )))
    }
}
