use rust_decimal::Decimal;

use rowspec_model::{DataFormat, FieldSpec, FieldValueError, InterfaceError, Value};

use crate::field::FieldType;

/// Field format accepting decimal numbers with an exact representation.
///
/// The declared decimal and thousands separators of the data format are
/// honored: at most one decimal separator, thousands separators only
/// before it. Values never go through binary floating point.
#[derive(Debug)]
pub struct DecimalFieldType {
    decimal_separator: char,
    thousands_separator: Option<char>,
}

impl DecimalFieldType {
    pub fn new(spec: &FieldSpec, data_format: &DataFormat) -> Result<Self, InterfaceError> {
        if !spec.rule.trim().is_empty() {
            return Err(InterfaceError::new("decimal rule must be empty"));
        }
        Ok(Self {
            decimal_separator: data_format.decimal_separator(),
            thousands_separator: data_format.thousands_separator(),
        })
    }
}

impl FieldType for DecimalFieldType {
    fn empty_value(&self) -> Value {
        Value::Decimal(Decimal::ZERO)
    }

    fn validate_value(&self, value: &str) -> Result<Value, FieldValueError> {
        let mut translated = String::with_capacity(value.len());
        let mut found_decimal_separator = false;
        for (position, character) in value.chars().enumerate() {
            if character == self.decimal_separator {
                if found_decimal_separator {
                    return Err(FieldValueError::new(format!(
                        "decimal value must contain only one decimal separator \
                         ({:?}): {value:?}",
                        self.decimal_separator
                    )));
                }
                translated.push('.');
                found_decimal_separator = true;
            } else if self.thousands_separator == Some(character) {
                if found_decimal_separator {
                    return Err(FieldValueError::new(format!(
                        "thousands separator {character:?} must only occur before \
                         decimal separator {:?}: {value:?} (position {})",
                        self.decimal_separator,
                        position + 1
                    )));
                }
            } else {
                translated.push(character);
            }
        }
        let decimal: Decimal = translated.parse().map_err(|_| {
            FieldValueError::new(format!("value must be a decimal number: {value:?}"))
        })?;
        Ok(Value::Decimal(decimal))
    }
}
