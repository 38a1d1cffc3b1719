//! Tests for building interface definitions from declaration rows.

use std::io::Write;

use rowspec_interface::InterfaceDefinition;
use rowspec_model::{FormatKind, LineDelimiter};

fn rows(table: &[&[&str]]) -> Vec<Vec<String>> {
    table
        .iter()
        .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
        .collect()
}

fn customer_rows() -> Vec<Vec<String>> {
    rows(&[
        &["D", "Format", "Delimited"],
        &["D", "Line delimiter", "LF"],
        &["", "ignored comment row"],
        &["F", "branch_id", "38000", "", "", "Integer", "38000...38999"],
        &["F", "customer_id", "92", "", "", "Integer", "10...65535"],
        &["F", "first_name", "Bill", "X", "...60"],
        &["F", "last_name", "Carter", "", "...60"],
        &["F", "gender", "male", "", "", "Choice", "male,female"],
        &["F", "date_of_birth", "05.04.1953", "", "", "DateTime", "DD.MM.YYYY"],
        &["C", "customer must be unique", "IsUnique", "branch_id, customer_id"],
        &["C", "branch count", "DistinctCount", "branch_id <= 3"],
    ])
}

#[test]
fn builds_fields_and_checks_in_declaration_order() {
    let definition = InterfaceDefinition::read("cid.csv", customer_rows()).expect("read");
    assert_eq!(definition.data_format().kind(), FormatKind::Delimited);
    assert_eq!(definition.data_format().line_delimiter(), LineDelimiter::Lf);
    assert!(definition.data_format().is_valid());
    assert_eq!(
        definition.field_names(),
        &[
            "branch_id",
            "customer_id",
            "first_name",
            "last_name",
            "gender",
            "date_of_birth",
        ]
    );
    let descriptions: Vec<&str> = definition
        .check_specs()
        .iter()
        .map(|spec| spec.description.as_str())
        .collect();
    assert_eq!(descriptions, vec!["customer must be unique", "branch count"]);
}

#[test]
fn create_checks_mints_independent_instances() {
    let definition = InterfaceDefinition::read("cid.csv", customer_rows()).expect("read");
    let first = definition.create_checks().expect("first set");
    let second = definition.create_checks().expect("second set");
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
}

#[test]
fn field_defaults_to_text_type() {
    let definition = InterfaceDefinition::read(
        "cid.csv",
        rows(&[&["D", "Format", "Delimited"], &["F", "note"]]),
    )
    .expect("read");
    assert_eq!(definition.fields()[0].spec().type_name, "Text");
    assert!(!definition.fields()[0].spec().allowed_to_be_empty);
}

#[test]
fn marker_is_case_insensitive() {
    let definition = InterfaceDefinition::read(
        "cid.csv",
        rows(&[&["d", "format", "delimited"], &["f", "note"]]),
    )
    .expect("read");
    assert_eq!(definition.field_names(), &["note"]);
}

#[test]
fn rejects_unknown_marker() {
    let error = InterfaceDefinition::read(
        "cid.csv",
        rows(&[&["D", "Format", "Delimited"], &["x", "note"]]),
    )
    .unwrap_err();
    assert!(error.to_string().contains("row marker"), "{error}");
    assert!(error.to_string().contains("R2C1"), "{error}");
}

#[test]
fn rejects_rows_with_too_few_columns() {
    let cases: &[&[&[&str]]] = &[
        &[&["D", "Format"]],
        &[&["D", "Format", "Delimited"], &["F"]],
        &[
            &["D", "Format", "Delimited"],
            &["F", "branch_id"],
            &["C", "only description"],
        ],
    ];
    for case in cases {
        assert!(
            InterfaceDefinition::read("cid.csv", rows(case)).is_err(),
            "{case:?} must be rejected"
        );
    }
}

#[test]
fn rejects_duplicate_field_names_and_checks() {
    let duplicate_field = rows(&[
        &["D", "Format", "Delimited"],
        &["F", "branch_id"],
        &["F", "branch_id"],
    ]);
    let error = InterfaceDefinition::read("cid.csv", duplicate_field).unwrap_err();
    assert!(error.to_string().contains("duplicate field name"), "{error}");

    let duplicate_check = rows(&[
        &["D", "Format", "Delimited"],
        &["F", "branch_id", "", "", "", "Integer"],
        &["C", "unique branch", "IsUnique", "branch_id"],
        &["C", "unique branch", "IsUnique", "branch_id"],
    ]);
    let error = InterfaceDefinition::read("cid.csv", duplicate_check).unwrap_err();
    assert!(error.to_string().contains("only once"), "{error}");
}

#[test]
fn rejects_definition_without_format_or_fields() {
    let error =
        InterfaceDefinition::read("cid.csv", rows(&[&["F", "branch_id"]])).unwrap_err();
    assert!(
        error
            .to_string()
            .contains("data format must be specified before the first field"),
        "{error}"
    );

    let error = InterfaceDefinition::read("cid.csv", rows(&[&["D", "Format", "Delimited"]]))
        .unwrap_err();
    assert!(error.to_string().contains("fields must be specified"), "{error}");

    let empty: Vec<Vec<String>> = Vec::new();
    assert!(InterfaceDefinition::read("cid.csv", empty).is_err());
}

#[test]
fn rejects_checks_before_fields() {
    let error = InterfaceDefinition::read(
        "cid.csv",
        rows(&[
            &["D", "Format", "Delimited"],
            &["C", "unique branch", "IsUnique", "branch_id"],
        ]),
    )
    .unwrap_err();
    assert!(
        error.to_string().contains("fields must be specified before"),
        "{error}"
    );
}

#[test]
fn broken_field_rule_fails_fast_with_location() {
    let error = InterfaceDefinition::read(
        "cid.csv",
        rows(&[
            &["D", "Format", "Delimited"],
            &["F", "branch_id", "", "", "", "Integer", "20...10"],
        ]),
    )
    .unwrap_err();
    assert!(error.to_string().contains("R2C7"), "{error}");
}

#[test]
fn broken_check_rule_fails_fast_with_location() {
    let error = InterfaceDefinition::read(
        "cid.csv",
        rows(&[
            &["D", "Format", "Delimited"],
            &["F", "branch_id", "", "", "", "Integer"],
            &["C", "branch count", "DistinctCount", "no_such_field <= 3"],
        ]),
    )
    .unwrap_err();
    assert!(error.to_string().contains("R3C4"), "{error}");
}

#[test]
fn example_values_must_validate() {
    let error = InterfaceDefinition::read(
        "cid.csv",
        rows(&[
            &["D", "Format", "Delimited"],
            &["F", "branch_id", "12345", "", "", "Integer", "38000...38999"],
        ]),
    )
    .unwrap_err();
    assert!(error.to_string().contains("example"), "{error}");
    assert!(error.to_string().contains("R2C3"), "{error}");
}

#[test]
fn empty_marker_must_be_x_or_blank() {
    let error = InterfaceDefinition::read(
        "cid.csv",
        rows(&[
            &["D", "Format", "Delimited"],
            &["F", "note", "", "yes"],
        ]),
    )
    .unwrap_err();
    assert!(error.to_string().contains("mark for empty field"), "{error}");
}

#[test]
fn fixed_format_requires_exact_field_lengths() {
    let missing_length = rows(&[
        &["D", "Format", "Fixed"],
        &["F", "branch_id", "", "", "", "Integer"],
    ]);
    assert!(InterfaceDefinition::read("cid.csv", missing_length).is_err());

    let ranged_length = rows(&[
        &["D", "Format", "Fixed"],
        &["F", "branch_id", "", "", "1...5", "Integer"],
    ]);
    assert!(InterfaceDefinition::read("cid.csv", ranged_length).is_err());

    let exact = rows(&[
        &["D", "Format", "Fixed"],
        &["F", "branch_id", "", "", "5", "Integer"],
        &["F", "name", "", "X", "10"],
    ]);
    let definition = InterfaceDefinition::read("cid.csv", exact).expect("read");
    assert_eq!(definition.fixed_field_widths(), Some(vec![5, 10]));
}

#[test]
fn delimited_definitions_have_no_fixed_widths() {
    let definition = InterfaceDefinition::read("cid.csv", customer_rows()).expect("read");
    assert_eq!(definition.fixed_field_widths(), None);
}

#[test]
fn definitions_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<InterfaceDefinition>();
}

#[test]
fn reads_definition_from_a_delimited_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        "D,Format,Delimited\n\
         F,branch_id,,,,Integer,38000...38999\n\
         F,name,,X,...60\n\
         C,branch must be unique,IsUnique,branch_id\n"
    )
    .expect("write definition");
    let definition = InterfaceDefinition::from_path(file.path()).expect("read from path");
    assert_eq!(definition.field_names(), &["branch_id", "name"]);
    assert_eq!(definition.check_specs().len(), 1);
}
