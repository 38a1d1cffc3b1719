use rowspec_model::{DataFormat, FieldSpec, FieldValueError, InterfaceError, Value};

use crate::field::FieldType;

/// Field format accepting any text. The rule is unused; only the length
/// range of the declaration constrains the value.
#[derive(Debug)]
pub struct TextFieldType;

impl TextFieldType {
    pub fn new(_spec: &FieldSpec, _data_format: &DataFormat) -> Result<Self, InterfaceError> {
        Ok(Self)
    }
}

impl FieldType for TextFieldType {
    fn validate_value(&self, value: &str) -> Result<Value, FieldValueError> {
        Ok(Value::Text(value.to_string()))
    }
}
