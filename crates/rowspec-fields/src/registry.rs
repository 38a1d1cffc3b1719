use std::collections::BTreeMap;
use std::fmt;

use rowspec_model::{DataFormat, FieldSpec, InterfaceError};

use crate::choice::ChoiceFieldType;
use crate::datetime::DateTimeFieldType;
use crate::decimal::DecimalFieldType;
use crate::field::{FieldFormat, FieldType};
use crate::integer::IntegerFieldType;
use crate::pattern::PatternFieldType;
use crate::regexp::RegExFieldType;
use crate::text::TextFieldType;

type Constructor =
    Box<dyn Fn(&FieldSpec, &DataFormat) -> Result<Box<dyn FieldType>, InterfaceError> + Send + Sync>;

/// Maps a declared field type name to its constructor.
///
/// Construction fails fast: an unparsable rule is rejected while the
/// interface definition is read, never at first use. External field types
/// register under a name of their own; how their code gets loaded is not
/// this crate's business.
pub struct FieldFormatRegistry {
    constructors: BTreeMap<String, Constructor>,
}

impl FieldFormatRegistry {
    /// Registry without any types. Mostly useful for tests.
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Registry with all built-in field types.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("Text", |spec, format| {
            Ok(Box::new(TextFieldType::new(spec, format)?))
        });
        registry.register("Integer", |spec, format| {
            Ok(Box::new(IntegerFieldType::new(spec, format)?))
        });
        registry.register("Decimal", |spec, format| {
            Ok(Box::new(DecimalFieldType::new(spec, format)?))
        });
        registry.register("Choice", |spec, format| {
            Ok(Box::new(ChoiceFieldType::new(spec, format)?))
        });
        registry.register("DateTime", |spec, format| {
            Ok(Box::new(DateTimeFieldType::new(spec, format)?))
        });
        registry.register("Pattern", |spec, format| {
            Ok(Box::new(PatternFieldType::new(spec, format)?))
        });
        registry.register("RegEx", |spec, format| {
            Ok(Box::new(RegExFieldType::new(spec, format)?))
        });
        registry
    }

    /// Register a field type under `name`, replacing any previous
    /// registration of the same name.
    pub fn register<F>(&mut self, name: &str, constructor: F)
    where
        F: Fn(&FieldSpec, &DataFormat) -> Result<Box<dyn FieldType>, InterfaceError>
            + Send
            + Sync
            + 'static,
    {
        self.constructors
            .insert(name.to_string(), Box::new(constructor));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Names of all registered types, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    /// Build the runtime validator for a field declaration.
    pub fn create(
        &self,
        spec: FieldSpec,
        data_format: &DataFormat,
    ) -> Result<FieldFormat, InterfaceError> {
        let constructor = self.constructors.get(&spec.type_name).ok_or_else(|| {
            InterfaceError::new(format!(
                "field type is {:?} but must be one of: {}",
                spec.type_name,
                self.type_names().join(", ")
            ))
        })?;
        let field_type = constructor(&spec, data_format)?;
        tracing::debug!(field = %spec.name, r#type = %spec.type_name, "created field format");
        Ok(FieldFormat::new(spec, data_format, field_type))
    }
}

impl Default for FieldFormatRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for FieldFormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldFormatRegistry")
            .field("type_names", &self.type_names())
            .finish()
    }
}
