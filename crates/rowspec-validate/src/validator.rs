use thiserror::Error;

use rowspec_checks::Check;
use rowspec_ingest::ReadError;
use rowspec_interface::InterfaceDefinition;
use rowspec_model::{DataError, InterfaceError, Location, RowMap, SourceRow};

/// What to do when a row or check produces a data error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Abort the run on the first data error.
    #[default]
    Raise,
    /// Record every data error in the summary and keep going.
    CollectAndContinue,
    /// Drop data errors and keep going. Low-safety mode intended only for
    /// exploratory use.
    Ignore,
}

/// Pipeline configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidationOptions {
    pub error_policy: ErrorPolicy,
    /// Stop validating (but keep consuming the source) after this many
    /// data rows. Bounds validation cost on huge files.
    pub row_limit: Option<u64>,
}

/// Outcome of one validation run.
#[derive(Debug, Default)]
pub struct Summary {
    pub accepted_count: u64,
    pub rejected_count: u64,
    /// Descriptions of checks that failed at end of stream.
    pub failed_checks: Vec<String>,
    /// Every data error of the run; populated under
    /// [`ErrorPolicy::CollectAndContinue`].
    pub errors: Vec<DataError>,
}

impl Summary {
    pub fn has_errors(&self) -> bool {
        self.rejected_count > 0 || !self.failed_checks.is_empty()
    }
}

/// Error terminating a validation run.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A data error under [`ErrorPolicy::Raise`].
    #[error(transparent)]
    Data(#[from] DataError),
    /// The row source failed; never subject to the error policy.
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Interface(#[from] InterfaceError),
}

/// One validation run over a row source.
///
/// Owns its check instances; a definition can be shared by many
/// concurrent validators, but a single validator must not be shared.
pub struct Validator<'a> {
    definition: &'a InterfaceDefinition,
    options: ValidationOptions,
    checks: Vec<Box<dyn Check>>,
}

impl<'a> Validator<'a> {
    pub fn new(
        definition: &'a InterfaceDefinition,
        options: ValidationOptions,
    ) -> Result<Self, InterfaceError> {
        Ok(Self {
            checks: definition.create_checks()?,
            definition,
            options,
        })
    }

    /// Validate all rows of a source.
    pub fn validate<I>(&mut self, rows: I) -> Result<Summary, ValidationError>
    where
        I: IntoIterator<Item = Result<SourceRow, ReadError>>,
    {
        self.validate_with(rows, |_, _| {})
    }

    /// Validate all rows of a source, invoking `on_accepted_row` with the
    /// row map and location of every accepted row.
    pub fn validate_with<I, F>(
        &mut self,
        rows: I,
        mut on_accepted_row: F,
    ) -> Result<Summary, ValidationError>
    where
        I: IntoIterator<Item = Result<SourceRow, ReadError>>,
        F: FnMut(&RowMap, &Location),
    {
        for check in &mut self.checks {
            check.reset();
        }
        let mut summary = Summary::default();
        let mut header_rows_left = self.definition.data_format().header();
        let mut validated_rows: u64 = 0;
        let mut limit_reached = false;
        let mut last_location: Option<Location> = None;
        for row in rows {
            let row = row?;
            if header_rows_left > 0 {
                header_rows_left -= 1;
                continue;
            }
            if let Some(limit) = self.options.row_limit
                && validated_rows >= limit
            {
                // Keep consuming the source so the caller can iterate the
                // remainder, but stop validating.
                limit_reached = true;
                continue;
            }
            validated_rows += 1;
            last_location = Some(row.location.clone());
            match self.validate_row(&row) {
                Ok(row_map) => {
                    summary.accepted_count += 1;
                    on_accepted_row(&row_map, &row.location);
                }
                Err(error) => {
                    summary.rejected_count += 1;
                    match self.options.error_policy {
                        ErrorPolicy::Raise => return Err(error.into()),
                        ErrorPolicy::CollectAndContinue => summary.errors.push(error),
                        ErrorPolicy::Ignore => {}
                    }
                }
            }
        }
        if !limit_reached {
            let end_location =
                last_location.unwrap_or_else(|| Location::new("<no data rows>", 1, 1));
            for check in &mut self.checks {
                if let Err(error) = check.check_at_end(&end_location) {
                    summary.failed_checks.push(check.description().to_string());
                    match self.options.error_policy {
                        ErrorPolicy::Raise => return Err(DataError::Check(error).into()),
                        ErrorPolicy::CollectAndContinue => {
                            summary.errors.push(DataError::Check(error));
                        }
                        ErrorPolicy::Ignore => {}
                    }
                }
            }
        }
        tracing::info!(
            accepted = summary.accepted_count,
            rejected = summary.rejected_count,
            failed_checks = summary.failed_checks.len(),
            "validation finished"
        );
        Ok(summary)
    }

    /// Validate a single row: cell count, then every field in declaration
    /// order, then every row check in declaration order.
    fn validate_row(&mut self, row: &SourceRow) -> Result<RowMap, DataError> {
        let fields = self.definition.fields();
        if row.cells.len() != fields.len() {
            return Err(DataError::Structure {
                location: row.location.clone(),
                message: format!(
                    "row must contain {} cells but has {}",
                    fields.len(),
                    row.cells.len()
                ),
            });
        }
        let mut row_map = RowMap::new();
        for (index, (field, cell)) in fields.iter().zip(&row.cells).enumerate() {
            match field.validate(cell) {
                Ok(value) => {
                    row_map.insert(field.name().to_string(), value);
                }
                Err(error) => {
                    return Err(DataError::Field {
                        field: field.name().to_string(),
                        location: row.location.with_column(index as u32 + 1),
                        source: error,
                    });
                }
            }
        }
        for check in &mut self.checks {
            check.check_row(&row_map, &row.location)?;
        }
        Ok(row_map)
    }
}
