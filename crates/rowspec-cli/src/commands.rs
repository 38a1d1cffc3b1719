use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use tracing::info;

use rowspec_interface::InterfaceDefinition;
use rowspec_validate::{
    ErrorPolicy, Summary, ValidationError, ValidationOptions, validate_path,
};

use crate::cli::{PolicyArg, ShowArgs, ValidateArgs};
use crate::report::{build_report, write_report};

/// Result of validating one data file.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    /// `None` when the file was aborted before a summary existed.
    pub summary: Option<Summary>,
    /// Message of the data error that aborted the file (raise policy).
    pub aborted: Option<String>,
}

impl FileOutcome {
    fn has_errors(&self) -> bool {
        self.aborted.is_some()
            || self
                .summary
                .as_ref()
                .is_some_and(Summary::has_errors)
    }
}

pub fn run_validate(args: &ValidateArgs) -> Result<bool> {
    let definition = InterfaceDefinition::from_path(&args.definition)
        .with_context(|| format!("read interface definition: {}", args.definition.display()))?;
    info!(
        definition = %args.definition.display(),
        fields = definition.fields().len(),
        checks = definition.check_specs().len(),
        "interface definition read"
    );
    let options = ValidationOptions {
        error_policy: match args.policy {
            PolicyArg::Raise => ErrorPolicy::Raise,
            PolicyArg::Collect => ErrorPolicy::CollectAndContinue,
            PolicyArg::Ignore => ErrorPolicy::Ignore,
        },
        row_limit: args.row_limit,
    };

    let mut outcomes = Vec::new();
    for data_path in &args.data {
        let outcome = match validate_path(&definition, data_path, options.clone()) {
            Ok(summary) => {
                for error in &summary.errors {
                    eprintln!("{error}");
                }
                FileOutcome {
                    path: data_path.clone(),
                    summary: Some(summary),
                    aborted: None,
                }
            }
            Err(ValidationError::Data(error)) => {
                eprintln!("{error}");
                FileOutcome {
                    path: data_path.clone(),
                    summary: None,
                    aborted: Some(error.to_string()),
                }
            }
            // Environment problems terminate the whole run.
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("validate {}", data_path.display()));
            }
        };
        outcomes.push(outcome);
    }

    if !outcomes.is_empty() {
        print_validation_table(&outcomes);
    } else {
        println!(
            "interface definition is valid: {} field(s), {} check(s)",
            definition.fields().len(),
            definition.check_specs().len()
        );
    }
    if let Some(report_path) = &args.report {
        let payload = build_report(&args.definition, &outcomes);
        write_report(report_path, &payload)?;
        println!("Report: {}", report_path.display());
    }
    Ok(outcomes.iter().any(FileOutcome::has_errors))
}

fn print_validation_table(outcomes: &[FileOutcome]) {
    let mut table = Table::new();
    table.set_header(vec!["Data file", "Accepted", "Rejected", "Failed checks"]);
    apply_table_style(&mut table);
    for outcome in outcomes {
        match (&outcome.summary, &outcome.aborted) {
            (Some(summary), _) => {
                table.add_row(vec![
                    Cell::new(outcome.path.display()),
                    Cell::new(summary.accepted_count),
                    Cell::new(summary.rejected_count),
                    Cell::new(summary.failed_checks.join(", ")),
                ]);
            }
            (None, Some(aborted)) => {
                table.add_row(vec![
                    Cell::new(outcome.path.display()),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new(format!("aborted: {aborted}")),
                ]);
            }
            (None, None) => {}
        }
    }
    println!("{table}");
}

pub fn run_show(args: &ShowArgs) -> Result<()> {
    let definition = InterfaceDefinition::from_path(&args.definition)
        .with_context(|| format!("read interface definition: {}", args.definition.display()))?;
    let format = definition.data_format();
    println!("Format: {}", format.kind());
    println!("Encoding: {}", format.encoding());
    if format.header() > 0 {
        println!("Header rows: {}", format.header());
    }

    let mut fields = Table::new();
    fields.set_header(vec!["Field", "Empty", "Length", "Type", "Rule", "Example"]);
    apply_table_style(&mut fields);
    for field in definition.fields() {
        let spec = field.spec();
        fields.add_row(vec![
            Cell::new(&spec.name),
            Cell::new(if spec.allowed_to_be_empty { "x" } else { "" }),
            Cell::new(
                spec.length
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            ),
            Cell::new(&spec.type_name),
            Cell::new(&spec.rule),
            Cell::new(spec.example.as_deref().unwrap_or_default()),
        ]);
    }
    println!("{fields}");

    if !definition.check_specs().is_empty() {
        let mut checks = Table::new();
        checks.set_header(vec!["Check", "Type", "Rule"]);
        apply_table_style(&mut checks);
        for spec in definition.check_specs() {
            checks.add_row(vec![
                Cell::new(&spec.description),
                Cell::new(&spec.type_name),
                Cell::new(&spec.rule),
            ]);
        }
        println!("{checks}");
    }
    Ok(())
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    if let Some(column) = table.column_mut(2) {
        column.set_cell_alignment(CellAlignment::Right);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::{Path, PathBuf};

    use crate::cli::{PolicyArg, ShowArgs, ValidateArgs};

    use super::{run_show, run_validate};

    fn write_definition(dir: &Path) -> PathBuf {
        let path = dir.join("customers.cid");
        let mut file = std::fs::File::create(&path).expect("create definition");
        write!(
            file,
            "D,Format,Delimited\n\
             F,branch_id,,,,Integer,38000...38999\n\
             F,customer_id,,,,Integer,10...65535\n\
             C,customer must be unique,IsUnique,\"branch_id, customer_id\"\n"
        )
        .expect("write definition");
        path
    }

    fn write_data(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).expect("write data");
        path
    }

    fn validate_args(definition: PathBuf, data: Vec<PathBuf>) -> ValidateArgs {
        ValidateArgs {
            definition,
            data,
            policy: PolicyArg::Collect,
            row_limit: None,
            report: None,
        }
    }

    #[test]
    fn validate_reports_clean_and_broken_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let definition = write_definition(dir.path());
        let clean = write_data(dir.path(), "clean.csv", "38000,10\n38001,11\n");
        let broken = write_data(dir.path(), "broken.csv", "38000,10\n38000,10\n");

        let has_errors =
            run_validate(&validate_args(definition.clone(), vec![clean.clone()]))
                .expect("validate clean file");
        assert!(!has_errors);

        let has_errors = run_validate(&validate_args(definition, vec![clean, broken]))
            .expect("validate both files");
        assert!(has_errors);
    }

    #[test]
    fn validate_writes_a_json_report() {
        let dir = tempfile::tempdir().expect("temp dir");
        let definition = write_definition(dir.path());
        let data = write_data(dir.path(), "data.csv", "38000,10\nbroken,row\n");
        let report = dir.path().join("report.json");
        let mut args = validate_args(definition, vec![data]);
        args.report = Some(report.clone());

        let has_errors = run_validate(&args).expect("validate");
        assert!(has_errors);

        let payload: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report).expect("read report"))
                .expect("parse report");
        assert_eq!(payload["schema"], "rowspec.validation-report");
        assert_eq!(payload["files"][0]["accepted_count"], 1);
        assert_eq!(payload["files"][0]["rejected_count"], 1);
        assert_eq!(payload["files"][0]["errors"][0]["kind"], "field");
    }

    #[test]
    fn validate_without_data_only_checks_the_definition() {
        let dir = tempfile::tempdir().expect("temp dir");
        let definition = write_definition(dir.path());
        let has_errors =
            run_validate(&validate_args(definition, Vec::new())).expect("definition only");
        assert!(!has_errors);
    }

    #[test]
    fn show_prints_a_definition() {
        let dir = tempfile::tempdir().expect("temp dir");
        let definition = write_definition(dir.path());
        run_show(&ShowArgs { definition }).expect("show");
    }
}
