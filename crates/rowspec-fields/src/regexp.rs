use regex::{Regex, RegexBuilder};

use rowspec_model::{DataFormat, FieldSpec, FieldValueError, InterfaceError, Value};

use crate::field::FieldType;

/// Field format accepting values that match a regular expression.
///
/// The expression must cover the full raw value, so the rule is compiled
/// inside a `^(?:...)$` anchor. Matching is case-insensitive.
#[derive(Debug)]
pub struct RegExFieldType {
    rule: String,
    regex: Regex,
}

impl RegExFieldType {
    pub fn new(spec: &FieldSpec, _data_format: &DataFormat) -> Result<Self, InterfaceError> {
        let rule = spec.rule.trim();
        if rule.is_empty() {
            return Err(InterfaceError::new(
                "regular expression rule must not be empty",
            ));
        }
        let regex = RegexBuilder::new(&format!("^(?:{rule})$"))
            .case_insensitive(true)
            .build()
            .map_err(|error| {
                InterfaceError::new(format!(
                    "regular expression rule {rule:?} is invalid: {error}"
                ))
            })?;
        Ok(Self {
            rule: rule.to_string(),
            regex,
        })
    }
}

impl FieldType for RegExFieldType {
    fn validate_value(&self, value: &str) -> Result<Value, FieldValueError> {
        if self.regex.is_match(value) {
            return Ok(Value::Text(value.to_string()));
        }
        Err(FieldValueError::new(format!(
            "value {value:?} must match regular expression: {:?}",
            self.rule
        )))
    }
}
