//! Field formats: typed validators for single cells.
//!
//! A [`FieldFormat`] binds a field declaration to the active data format
//! and validates one raw cell at a time, producing a typed
//! [`rowspec_model::Value`] or a [`rowspec_model::FieldValueError`]. The
//! shared envelope (allowed characters, empty handling, length range) lives
//! in [`FieldFormat::validate`]; everything type-specific sits behind the
//! [`FieldType`] trait, so external field types plug in through the
//! [`FieldFormatRegistry`] under the same contract as the built-ins.

mod choice;
mod datetime;
mod decimal;
mod field;
mod integer;
mod pattern;
mod regexp;
mod registry;
mod text;

pub use choice::ChoiceFieldType;
pub use datetime::DateTimeFieldType;
pub use decimal::DecimalFieldType;
pub use field::{FieldFormat, FieldType};
pub use integer::IntegerFieldType;
pub use pattern::PatternFieldType;
pub use regexp::RegExFieldType;
pub use registry::FieldFormatRegistry;
pub use text::TextFieldType;
