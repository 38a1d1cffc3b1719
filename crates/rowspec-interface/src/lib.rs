//! The interface definition model: an in-memory schema built from tagged
//! declaration rows.
//!
//! An interface definition is itself tabular data. Each row is tagged by
//! its first cell: `D` sets a data format property, `F` declares a field,
//! `C` declares a check, and a row with an empty first cell is a comment.
//! The resulting [`InterfaceDefinition`] is immutable and can be shared
//! read-only between any number of validation runs.

mod definition;

pub use definition::InterfaceDefinition;
