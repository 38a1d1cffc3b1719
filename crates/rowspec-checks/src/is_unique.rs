use std::collections::BTreeMap;

use rowspec_model::{CheckError, CheckSpec, InterfaceError, Location, RowMap, Value,
    validate_field_name};

use crate::Check;

/// Check that all rows are unique with respect to a composite key.
///
/// The rule is a comma-separated list of previously declared field names.
/// A repeated key fails the row and names the location where the key was
/// first seen.
#[derive(Debug)]
pub struct IsUniqueCheck {
    description: String,
    key_fields: Vec<String>,
    seen_keys: BTreeMap<Vec<Value>, Location>,
}

impl IsUniqueCheck {
    pub fn new(spec: &CheckSpec, field_names: &[String]) -> Result<Self, InterfaceError> {
        let mut key_fields = Vec::new();
        for part in spec.rule.split(',') {
            let field_name = validate_field_name(part, &spec.location)?;
            if !field_names.contains(&field_name) {
                return Err(InterfaceError::at(
                    format!(
                        "unknown field name {field_name:?} must be replaced by one of: {}",
                        field_names.join(", ")
                    ),
                    spec.location.clone(),
                ));
            }
            if key_fields.contains(&field_name) {
                return Err(InterfaceError::at(
                    format!("duplicate field name for unique check must be removed: {field_name}"),
                    spec.location.clone(),
                ));
            }
            key_fields.push(field_name);
        }
        if key_fields.is_empty() {
            return Err(InterfaceError::at(
                "rule must contain at least one field name to check for uniqueness",
                spec.location.clone(),
            ));
        }
        Ok(Self {
            description: spec.description.clone(),
            key_fields,
            seen_keys: BTreeMap::new(),
        })
    }
}

impl Check for IsUniqueCheck {
    fn description(&self) -> &str {
        &self.description
    }

    fn reset(&mut self) {
        self.seen_keys.clear();
    }

    fn check_row(&mut self, row: &RowMap, location: &Location) -> Result<(), CheckError> {
        let key: Vec<Value> = self
            .key_fields
            .iter()
            .map(|field_name| row.get(field_name).cloned().unwrap_or(Value::Empty))
            .collect();
        if let Some(first_occurrence) = self.seen_keys.get(&key) {
            let rendered: Vec<String> = key.iter().map(|value| format!("{value}")).collect();
            return Err(CheckError::new(
                format!(
                    "values for {} must be unique: {}",
                    self.key_fields.join(", "),
                    rendered.join(", ")
                ),
                location.clone(),
            )
            .with_first_occurrence(first_occurrence.clone()));
        }
        self.seen_keys.insert(key, location.clone());
        Ok(())
    }
}
