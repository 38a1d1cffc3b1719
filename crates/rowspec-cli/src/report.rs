//! Machine-readable JSON report of a validation run.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use rowspec_model::{DataError, Location};

use crate::commands::FileOutcome;

const REPORT_SCHEMA: &str = "rowspec.validation-report";
const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
pub struct ReportPayload {
    pub schema: &'static str,
    pub schema_version: u32,
    pub generated_at: String,
    pub definition: String,
    pub files: Vec<FileReport>,
}

#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: String,
    pub accepted_count: u64,
    pub rejected_count: u64,
    pub failed_checks: Vec<String>,
    pub errors: Vec<ErrorReport>,
    /// Message of the data error that aborted the file under the raise
    /// policy, if any.
    pub aborted: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub kind: &'static str,
    pub location: Location,
    pub message: String,
}

impl From<&DataError> for ErrorReport {
    fn from(error: &DataError) -> Self {
        let kind = match error {
            DataError::Field { .. } => "field",
            DataError::Check(_) => "check",
            DataError::Structure { .. } => "structure",
        };
        Self {
            kind,
            location: error.location().clone(),
            message: error.to_string(),
        }
    }
}

pub fn build_report(definition: &Path, files: &[FileOutcome]) -> ReportPayload {
    ReportPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        definition: definition.display().to_string(),
        files: files.iter().map(FileReport::from).collect(),
    }
}

impl From<&FileOutcome> for FileReport {
    fn from(outcome: &FileOutcome) -> Self {
        let (accepted, rejected, failed_checks, errors) = match &outcome.summary {
            Some(summary) => (
                summary.accepted_count,
                summary.rejected_count,
                summary.failed_checks.clone(),
                summary.errors.iter().map(ErrorReport::from).collect(),
            ),
            None => (0, 0, Vec::new(), Vec::new()),
        };
        Self {
            path: outcome.path.display().to_string(),
            accepted_count: accepted,
            rejected_count: rejected,
            failed_checks,
            errors,
            aborted: outcome.aborted.clone(),
        }
    }
}

pub fn write_report(path: &Path, payload: &ReportPayload) -> Result<()> {
    let json = serde_json::to_string_pretty(payload).context("serialize report")?;
    std::fs::write(path, format!("{json}\n"))
        .with_context(|| format!("write report: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use rowspec_model::{DataError, FieldValueError, Location};

    use super::ErrorReport;

    #[test]
    fn error_report_names_the_kind() {
        let error = DataError::Field {
            field: "branch_id".to_string(),
            location: Location::new("data.csv", 3, 1),
            source: FieldValueError::new("value must be an integer number"),
        };
        let report = ErrorReport::from(&error);
        assert_eq!(report.kind, "field");
        assert_eq!(report.location, Location::new("data.csv", 3, 1));
        assert!(report.message.contains("branch_id"));
    }
}
