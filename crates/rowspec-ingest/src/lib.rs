//! Physical row sources for tabular data.
//!
//! The validation core consumes any iterator over
//! `Result<SourceRow, ReadError>`; this crate provides the two text-based
//! implementations, reading delimited data through the `csv` crate and
//! fixed-width data by slicing lines into declared column widths.
//! Spreadsheet containers stay external: whoever can read them only has to
//! yield the same `SourceRow` values.
//!
//! Errors from a row source are environment problems, never data quality
//! problems; the pipeline propagates them regardless of its error policy.

mod delimited;
mod error;
mod fixed;

pub use delimited::DelimitedReader;
pub use error::ReadError;
pub use fixed::FixedReader;
