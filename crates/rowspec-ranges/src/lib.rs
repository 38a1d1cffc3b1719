//! Range expressions used throughout interface definitions.
//!
//! A range describes a set of integer intervals such as `1...40` or
//! `0x20...0x7e, Tab`. Interface definitions use ranges for field lengths,
//! integer field rules, and the set of allowed characters of a data format.
//!
//! The grammar is a comma-separated list of items. Each item is either an
//! exact value or a pair of bounds joined by `...` (the legacy `:` separator
//! keeps working). A bound is a decimal integer, a `0x`-prefixed hex
//! integer, a quoted single character standing for its code point, or one of
//! the symbolic names `Cr`, `Ff`, `Lf`, `Tab`, `Vt`.

mod error;
mod range;
mod scan;

pub use error::RangeSyntaxError;
pub use range::{DEFAULT_INTEGER_RANGE_TEXT, Range, RangeItem, character_code};
