//! Checks: stateful validators spanning multiple rows or the whole data
//! set.
//!
//! A check runs once per accepted row and once at the end of the stream.
//! Check instances are mutable and owned by a single validation run; the
//! [`CheckRegistry`] mints fresh instances from the declared
//! [`rowspec_model::CheckSpec`]s, and [`Check::reset`] is part of the
//! contract so a run can start from a clean slate without reconstructing
//! anything.

mod distinct_count;
mod is_unique;
mod registry;

use rowspec_model::{CheckError, Location, RowMap};

pub use distinct_count::DistinctCountCheck;
pub use is_unique::IsUniqueCheck;
pub use registry::CheckRegistry;

/// A stateful validator over a whole data set.
///
/// Lifecycle: constructed once when the interface definition is read
/// (constructors pre-parse the rule and fail fast), then per validation
/// run: `reset`, `check_row` for every accepted row, `check_at_end` after
/// the last row. `reset` clears all accumulated state, so re-validating a
/// second data set never sees identifiers from the first.
pub trait Check: std::fmt::Debug + Send {
    /// The human readable description declared in the interface
    /// definition, e.g. `"customer must be unique"`.
    fn description(&self) -> &str;

    /// Forget all accumulated state and start a new validation run.
    fn reset(&mut self);

    /// Judge one accepted row. `location` points at the row the values
    /// came from.
    fn check_row(&mut self, _row: &RowMap, _location: &Location) -> Result<(), CheckError> {
        Ok(())
    }

    /// Judge conditions that are only decidable once all rows have been
    /// seen. `location` points at the last row of the input.
    fn check_at_end(&mut self, _location: &Location) -> Result<(), CheckError> {
        Ok(())
    }
}
