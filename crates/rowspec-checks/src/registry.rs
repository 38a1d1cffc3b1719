use std::collections::BTreeMap;
use std::fmt;

use rowspec_model::{CheckSpec, InterfaceError};

use crate::distinct_count::DistinctCountCheck;
use crate::is_unique::IsUniqueCheck;
use crate::Check;

type Constructor =
    Box<dyn Fn(&CheckSpec, &[String]) -> Result<Box<dyn Check>, InterfaceError> + Send + Sync>;

/// Maps a declared check type name to its constructor.
///
/// Constructors receive the check declaration and the names of all
/// declared fields, and pre-parse the rule so a broken declaration fails
/// while the interface definition is read. External checks register under
/// a name of their own.
pub struct CheckRegistry {
    constructors: BTreeMap<String, Constructor>,
}

impl CheckRegistry {
    /// Registry without any check types. Mostly useful for tests.
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Registry with all built-in checks.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("IsUnique", |spec, field_names| {
            Ok(Box::new(IsUniqueCheck::new(spec, field_names)?))
        });
        registry.register("DistinctCount", |spec, field_names| {
            Ok(Box::new(DistinctCountCheck::new(spec, field_names)?))
        });
        registry
    }

    /// Register a check type under `name`, replacing any previous
    /// registration of the same name.
    pub fn register<F>(&mut self, name: &str, constructor: F)
    where
        F: Fn(&CheckSpec, &[String]) -> Result<Box<dyn Check>, InterfaceError>
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

    /// Names of all registered check types, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    /// Build a fresh check instance for a declaration.
    pub fn create(
        &self,
        spec: &CheckSpec,
        field_names: &[String],
    ) -> Result<Box<dyn Check>, InterfaceError> {
        let constructor = self.constructors.get(&spec.type_name).ok_or_else(|| {
            InterfaceError::at(
                format!(
                    "check type is {:?} but must be one of: {}",
                    spec.type_name,
                    self.type_names().join(", ")
                ),
                spec.location.clone(),
            )
        })?;
        let check = constructor(spec, field_names)?;
        tracing::debug!(check = %spec.description, r#type = %spec.type_name, "created check");
        Ok(check)
    }
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckRegistry")
            .field("type_names", &self.type_names())
            .finish()
    }
}
