//! The validation pipeline: feeds rows from a row source through the
//! field formats and checks of an interface definition.
//!
//! Row validation is strictly sequential; row order determines both the
//! reported locations and the order in which checks observe data. The
//! pipeline owns one set of check instances per run and resets them at the
//! start of every run, so validating a second data set never sees state
//! from the first.

mod validator;

use std::path::Path;

use rowspec_ingest::{DelimitedReader, FixedReader, ReadError};
use rowspec_interface::InterfaceDefinition;
use rowspec_model::{FormatKind, SourceRow};

pub use validator::{ErrorPolicy, Summary, ValidationError, ValidationOptions, Validator};

/// Open the row source matching the definition's declared format kind.
///
/// Spreadsheet containers are not readable from a path here; they stay
/// external collaborators that feed [`SourceRow`]s into
/// [`Validator::validate`] directly.
pub fn open_row_source(
    definition: &InterfaceDefinition,
    path: &Path,
) -> Result<Box<dyn Iterator<Item = Result<SourceRow, ReadError>>>, ReadError> {
    match definition.data_format().kind() {
        FormatKind::Delimited => Ok(Box::new(DelimitedReader::open(
            path,
            definition.data_format(),
        )?)),
        FormatKind::Fixed => {
            let widths = definition.fixed_field_widths().ok_or_else(|| {
                ReadError::Unsupported(
                    "fixed data format requires exact field lengths".to_string(),
                )
            })?;
            Ok(Box::new(FixedReader::open(
                path,
                definition.data_format(),
                widths,
            )?))
        }
        FormatKind::Spreadsheet => Err(ReadError::Unsupported(
            "spreadsheet data must be supplied through an external row source".to_string(),
        )),
    }
}

/// Validate the data file at `path` against `definition`.
pub fn validate_path(
    definition: &InterfaceDefinition,
    path: &Path,
    options: ValidationOptions,
) -> Result<Summary, ValidationError> {
    let rows = open_row_source(definition, path)?;
    let mut validator = Validator::new(definition, options)?;
    validator.validate(rows)
}
