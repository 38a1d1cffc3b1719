use std::collections::BTreeMap;
use std::path::Path;

use rowspec_checks::{Check, CheckRegistry};
use rowspec_fields::{FieldFormat, FieldFormatRegistry};
use rowspec_ingest::DelimitedReader;
use rowspec_model::{
    CheckSpec, DataFormat, FieldSpec, FormatKind, InterfaceError, Location, validate_field_name,
};
use rowspec_ranges::Range;

/// Marker that declares a field as allowed to be empty.
const EMPTY_INDICATOR: &str = "x";

/// An interface definition: the data format, the ordered field formats,
/// and the ordered check declarations.
///
/// Field declaration order is preserved verbatim; it governs how data row
/// cells map to fields and in which order checks run. Once built the
/// definition is read-only, so independent validation runs may share it
/// concurrently, each owning its own set of check instances from
/// [`InterfaceDefinition::create_checks`].
#[derive(Debug)]
pub struct InterfaceDefinition {
    source: String,
    data_format: DataFormat,
    fields: Vec<FieldFormat>,
    field_names: Vec<String>,
    check_specs: Vec<CheckSpec>,
    check_registry: CheckRegistry,
}

impl InterfaceDefinition {
    /// Build a definition from already-tokenized rows using the built-in
    /// field and check types.
    pub fn read(
        source: &str,
        rows: impl IntoIterator<Item = Vec<String>>,
    ) -> Result<Self, InterfaceError> {
        Self::read_with(
            source,
            rows,
            &FieldFormatRegistry::with_builtins(),
            CheckRegistry::with_builtins(),
        )
    }

    /// Build a definition with custom registries, admitting externally
    /// supplied field and check types.
    pub fn read_with(
        source: &str,
        rows: impl IntoIterator<Item = Vec<String>>,
        field_registry: &FieldFormatRegistry,
        check_registry: CheckRegistry,
    ) -> Result<Self, InterfaceError> {
        let mut builder = Builder {
            source: source.to_string(),
            data_format: None,
            fields: Vec::new(),
            field_names: Vec::new(),
            check_specs: Vec::new(),
            check_locations: BTreeMap::new(),
            rows_seen: 0,
            field_registry,
            check_registry,
        };
        for (index, cells) in rows.into_iter().enumerate() {
            builder.add_row(index as u32 + 1, &cells)?;
        }
        builder.finish()
    }

    /// Load a definition from a delimited file using comma and UTF-8, the
    /// conventions for definition files themselves.
    pub fn from_path(path: &Path) -> Result<Self, InterfaceError> {
        let format = DataFormat::new(FormatKind::Delimited);
        let reader = DelimitedReader::open(path, &format).map_err(|error| {
            InterfaceError::new(format!("cannot read interface definition: {error}"))
        })?;
        let mut rows = Vec::new();
        for row in reader {
            let row = row.map_err(|error| {
                InterfaceError::new(format!("cannot read interface definition: {error}"))
            })?;
            rows.push(row.cells);
        }
        Self::read(&path.display().to_string(), rows)
    }

    /// Name of the source the definition was read from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn data_format(&self) -> &DataFormat {
        &self.data_format
    }

    /// Field formats in declaration order.
    pub fn fields(&self) -> &[FieldFormat] {
        &self.fields
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// Check declarations in declaration order.
    pub fn check_specs(&self) -> &[CheckSpec] {
        &self.check_specs
    }

    /// Mint a fresh set of check instances for one validation run.
    ///
    /// Check instances are stateful and must never be shared between
    /// concurrent runs; every run gets its own set.
    pub fn create_checks(&self) -> Result<Vec<Box<dyn Check>>, InterfaceError> {
        self.check_specs
            .iter()
            .map(|spec| self.check_registry.create(spec, &self.field_names))
            .collect()
    }

    /// Per-field character widths for fixed data, in declaration order.
    ///
    /// `None` unless the data format is fixed. For fixed definitions every
    /// field has an exact positive length, enforced while reading.
    pub fn fixed_field_widths(&self) -> Option<Vec<usize>> {
        if self.data_format.kind() != FormatKind::Fixed {
            return None;
        }
        let widths: Vec<usize> = self
            .fields
            .iter()
            .filter_map(|field| field.spec().length.as_ref())
            .filter_map(Range::exact_value)
            .filter_map(|width| usize::try_from(width).ok())
            .collect();
        (widths.len() == self.fields.len()).then_some(widths)
    }
}

struct Builder<'a> {
    source: String,
    data_format: Option<DataFormat>,
    fields: Vec<FieldFormat>,
    field_names: Vec<String>,
    check_specs: Vec<CheckSpec>,
    check_locations: BTreeMap<String, Location>,
    rows_seen: u32,
    field_registry: &'a FieldFormatRegistry,
    check_registry: CheckRegistry,
}

impl Builder<'_> {
    fn add_row(&mut self, row_number: u32, cells: &[String]) -> Result<(), InterfaceError> {
        self.rows_seen = row_number;
        let location = Location::new(self.source.as_str(), row_number, 1);
        let Some(marker) = cells.first() else {
            return Ok(());
        };
        match marker.trim().to_lowercase().as_str() {
            "" => Ok(()),
            "d" => self.add_data_format_row(&cells[1..], &location),
            "f" => self.add_field_row(&cells[1..], &location),
            "c" => self.add_check_row(&cells[1..], &location),
            other => Err(InterfaceError::at(
                format!("row marker is {other:?} but must be empty or one of: C, D, F"),
                location,
            )),
        }
    }

    fn add_data_format_row(
        &mut self,
        items: &[String],
        location: &Location,
    ) -> Result<(), InterfaceError> {
        if items.len() < 2 {
            return Err(InterfaceError::at(
                "data format row must have at least a property name and a value",
                location.clone(),
            ));
        }
        let name = items[0].trim();
        let value = items[1].trim();
        if name.is_empty() {
            return Err(InterfaceError::at(
                "name of data format property must be specified",
                location.with_column(2),
            ));
        }
        let is_format_property = name.to_lowercase().replace(' ', "_") == "format";
        if let Some(data_format) = self.data_format.as_mut() {
            data_format.set_property(name, value, &location.with_column(3))
        } else {
            if !is_format_property {
                return Err(InterfaceError::at(
                    format!(
                        "first data format row must set property \"format\" \
                         instead of {name:?}"
                    ),
                    location.with_column(2),
                ));
            }
            self.data_format = Some(DataFormat::from_name(value, &location.with_column(3))?);
            Ok(())
        }
    }

    fn add_field_row(&mut self, items: &[String], location: &Location) -> Result<(), InterfaceError> {
        let Some(data_format) = &self.data_format else {
            return Err(InterfaceError::at(
                "data format must be specified before the first field",
                location.clone(),
            ));
        };
        if items.is_empty() {
            return Err(InterfaceError::at(
                "field row must have at least a field name",
                location.clone(),
            ));
        }
        let item = |index: usize| items.get(index).map(String::as_str).unwrap_or("");

        let name = validate_field_name(item(0), &location.with_column(2))?;
        if self.field_names.contains(&name) {
            return Err(InterfaceError::at(
                format!("duplicate field name must be changed to a unique one: {name}"),
                location.with_column(2),
            ));
        }

        let example_text = item(1).trim();
        let example = (!example_text.is_empty()).then(|| example_text.to_string());

        let allowed_to_be_empty = match item(2).trim().to_lowercase().as_str() {
            "" => false,
            marker if marker == EMPTY_INDICATOR => true,
            other => {
                return Err(InterfaceError::at(
                    format!("mark for empty field must be {EMPTY_INDICATOR:?} or empty but is: {other:?}"),
                    location.with_column(4),
                ));
            }
        };

        let length_text = item(3).trim();
        let length = if length_text.is_empty() {
            None
        } else {
            let range = Range::parse(length_text)
                .map_err(|error| InterfaceError::at(error.to_string(), location.with_column(5)))?;
            let has_negative_bound = range.items().iter().any(|item| {
                item.lower.is_some_and(|bound| bound < 0)
                    || item.upper.is_some_and(|bound| bound < 0)
            });
            if has_negative_bound {
                return Err(InterfaceError::at(
                    format!("length range of field {name:?} must not contain negative values"),
                    location.with_column(5),
                ));
            }
            Some(range)
        };
        if data_format.kind() == FormatKind::Fixed {
            let width = length.as_ref().and_then(Range::exact_value);
            match width {
                None => {
                    return Err(InterfaceError::at(
                        format!(
                            "length of field {name:?} must be a single exact value \
                             for fixed data format"
                        ),
                        location.with_column(5),
                    ));
                }
                Some(width) if width < 1 => {
                    return Err(InterfaceError::at(
                        format!(
                            "length of field {name:?} for fixed data format must be \
                             at least 1 but is: {width}"
                        ),
                        location.with_column(5),
                    ));
                }
                Some(_) => {}
            }
        }

        let type_text = item(4).trim();
        let type_name = if type_text.is_empty() {
            "Text".to_string()
        } else {
            validated_type_name(type_text, &location.with_column(6))?
        };
        if !self.field_registry.contains(&type_name) {
            return Err(InterfaceError::at(
                format!(
                    "field type is {type_name:?} but must be one of: {}",
                    self.field_registry.type_names().join(", ")
                ),
                location.with_column(6),
            ));
        }

        let spec = FieldSpec {
            name: name.clone(),
            example,
            allowed_to_be_empty,
            length,
            type_name,
            rule: item(5).trim().to_string(),
        };
        let field = self
            .field_registry
            .create(spec, data_format)
            .map_err(|error| error.located_at(&location.with_column(7)))?;
        if let Some(example) = field.spec().example.as_deref()
            && let Err(error) = field.validate(example)
        {
            return Err(InterfaceError::at(
                format!("cannot validate example for field {name:?}: {error}"),
                location.with_column(3),
            ));
        }
        tracing::debug!(field = %name, "defined field");
        self.field_names.push(name);
        self.fields.push(field);
        Ok(())
    }

    fn add_check_row(&mut self, items: &[String], location: &Location) -> Result<(), InterfaceError> {
        if items.len() < 2 {
            return Err(InterfaceError::at(
                "check row must have at least a description and a check type",
                location.clone(),
            ));
        }
        if self.field_names.is_empty() {
            return Err(InterfaceError::at(
                "fields must be specified before the first check",
                location.clone(),
            ));
        }
        let description = items[0].trim();
        if description.is_empty() {
            return Err(InterfaceError::at(
                "check description must be specified",
                location.with_column(2),
            ));
        }
        if let Some(first) = self.check_locations.get(description) {
            return Err(InterfaceError::at(
                format!(
                    "check description must be used only once: {description:?} \
                     (first declaration: {first})"
                ),
                location.with_column(2),
            ));
        }
        let type_name = items[1].trim();
        if !self.check_registry.contains(type_name) {
            return Err(InterfaceError::at(
                format!(
                    "check type is {type_name:?} but must be one of: {}",
                    self.check_registry.type_names().join(", ")
                ),
                location.with_column(3),
            ));
        }
        let spec = CheckSpec {
            description: description.to_string(),
            type_name: type_name.to_string(),
            rule: items.get(2).map(String::as_str).unwrap_or("").trim().to_string(),
            location: location.with_column(4),
        };
        // Construct once so a broken rule is rejected while the definition
        // is read, not at the first validation run.
        self.check_registry.create(&spec, &self.field_names)?;
        tracing::debug!(check = %spec.description, "defined check");
        self.check_locations
            .insert(spec.description.clone(), location.with_column(2));
        self.check_specs.push(spec);
        Ok(())
    }

    fn finish(self) -> Result<InterfaceDefinition, InterfaceError> {
        let end = Location::new(self.source.as_str(), self.rows_seen.max(1), 1);
        let Some(mut data_format) = self.data_format else {
            return Err(InterfaceError::at("data format must be specified", end));
        };
        if self.fields.is_empty() {
            return Err(InterfaceError::at("fields must be specified", end));
        }
        data_format.validate(&end)?;
        tracing::debug!(
            source = %self.source,
            fields = self.fields.len(),
            checks = self.check_specs.len(),
            "interface definition complete"
        );
        Ok(InterfaceDefinition {
            source: self.source,
            data_format,
            fields: self.fields,
            field_names: self.field_names,
            check_specs: self.check_specs,
            check_registry: self.check_registry,
        })
    }
}

fn validated_type_name(text: &str, location: &Location) -> Result<String, InterfaceError> {
    let mut chars = text.chars();
    let starts_well = chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_');
    if !starts_well || !chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
        return Err(InterfaceError::at(
            format!("field type must be a plain name but is: {text:?}"),
            location.clone(),
        ));
    }
    Ok(text.to_string())
}
