use rowspec_model::{DataFormat, FieldSpec, FieldValueError, InterfaceError, Value};
use rowspec_ranges::{DEFAULT_INTEGER_RANGE_TEXT, Range};

/// Field format accepting signed integer values.
///
/// The rule, when present, is a range the value must satisfy. Without a
/// rule the 32 bit default range applies; users wanting a larger span have
/// to declare it.
#[derive(Debug)]
pub struct IntegerFieldType {
    valid_range: Range,
}

impl IntegerFieldType {
    pub fn new(spec: &FieldSpec, _data_format: &DataFormat) -> Result<Self, InterfaceError> {
        let rule = spec.rule.trim();
        let valid_range = if rule.is_empty() {
            Range::parse(DEFAULT_INTEGER_RANGE_TEXT)?
        } else {
            Range::parse(rule)?
        };
        Ok(Self { valid_range })
    }
}

impl crate::field::FieldType for IntegerFieldType {
    fn empty_value(&self) -> Value {
        Value::Integer(0)
    }

    fn validate_value(&self, value: &str) -> Result<Value, FieldValueError> {
        let value_as_int: i64 = value.parse().map_err(|_| {
            FieldValueError::new(format!("value must be an integer number: {value:?}"))
        })?;
        if !self.valid_range.contains(value_as_int) {
            return Err(FieldValueError::new(format!(
                "value is {value_as_int} but must be within range: {}",
                self.valid_range
            )));
        }
        Ok(Value::Integer(value_as_int))
    }
}
