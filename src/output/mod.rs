//! Result formatting for external collaborators
//!
//! The engine's UI, report and download collaborators never touch a
//! [`SimulationResult`](crate::result::SimulationResult) directly; they
//! consume the two presentation-ready views built here:
//!
//! - [`Table`]: ordered rows (samples) × columns (independent variable
//!   first, then every series) with `name (unit)` headers, plus the
//!   scalar summary outputs as key/value pairs — the shape report
//!   writers and CSV downloads want,
//! - [`series_pairs`]: `(x, y)` pair vectors per series — the shape
//!   charting widgets want.
//!
//! Both are pure transformations: the result is borrowed, never mutated.
//! The [`csv`] sub-module writes a `Table` through any `io::Write`; it is
//! the only place in the crate that touches I/O, and it only runs when a
//! download collaborator asks for it.

pub mod csv;
mod table;

pub use csv::{CsvConfig, CsvError};
pub use table::Table;

use crate::result::SimulationResult;

/// Chart-ready `(independent, dependent)` pairs for one series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPairs {
    /// Series name as declared by the output spec
    pub name: &'static str,

    /// `(x, y)` samples in order
    pub points: Vec<(f64, f64)>,
}

/// Build chart-ready pairs for every series of a result.
pub fn series_pairs(result: &SimulationResult) -> Vec<SeriesPairs> {
    let xs = result.independent();
    result
        .all_series()
        .iter()
        .map(|(name, values)| SeriesPairs {
            name,
            points: xs.iter().copied().zip(values.iter().copied()).collect(),
        })
        .collect()
}

// =================================================================================================
// Tests
// =================================================================================================
