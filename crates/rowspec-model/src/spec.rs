use rowspec_ranges::Range;

use crate::error::InterfaceError;
use crate::location::Location;

/// Declaration of one field as written in an `F` row of the interface
/// definition. Built once while the definition is read and immutable
/// thereafter.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    /// Example value from the definition; must itself validate.
    pub example: Option<String>,
    pub allowed_to_be_empty: bool,
    pub length: Option<Range>,
    pub type_name: String,
    /// Type-specific rule text; the empty string means "no rule".
    pub rule: String,
}

/// Declaration of one check as written in a `C` row of the interface
/// definition.
#[derive(Debug, Clone)]
pub struct CheckSpec {
    pub description: String,
    pub type_name: String,
    pub rule: String,
    /// Where the check was declared, for error messages about its rule.
    pub location: Location,
}

/// Validate and normalize a declared field name.
///
/// Field names consist of ASCII letters, digits and underscores and must
/// not start with a digit.
pub fn validate_field_name(name: &str, location: &Location) -> Result<String, InterfaceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(InterfaceError::at(
            "field name must not be empty",
            location.clone(),
        ));
    }
    let mut chars = name.chars();
    if let Some(first) = chars.next()
        && !(first.is_ascii_alphabetic() || first == '_')
    {
        return Err(InterfaceError::at(
            format!("field name must start with an ASCII letter or underscore but is: {name:?}"),
            location.clone(),
        ));
    }
    if !chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
        return Err(InterfaceError::at(
            format!(
                "field name must consist of ASCII letters, digits and underscores \
                 but is: {name:?}"
            ),
            location.clone(),
        ));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::validate_field_name;
    use crate::location::Location;

    fn location() -> Location {
        Location::new("cid.csv", 1, 2)
    }

    #[test]
    fn accepts_identifiers() {
        assert_eq!(
            validate_field_name(" customer_id ", &location()).expect("valid"),
            "customer_id"
        );
        assert!(validate_field_name("_internal2", &location()).is_ok());
    }

    #[test]
    fn rejects_bad_names() {
        assert!(validate_field_name("", &location()).is_err());
        assert!(validate_field_name("2nd", &location()).is_err());
        assert!(validate_field_name("first name", &location()).is_err());
        assert!(validate_field_name("naïve", &location()).is_err());
    }
}
