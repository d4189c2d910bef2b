//! Tabular view of a simulation result

use crate::result::SimulationResult;

/// Ordered tabular view: one row per sample, one column per series.
///
/// The first column is always the independent variable. Headers are
/// rendered `name (unit)` from the operation's output spec. Scalar
/// summary outputs, which have no per-sample extent, are listed
/// separately as `(name, unit, value)` triples.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<f64>>,
    scalars: Vec<(String, String, f64)>,
}

impl Table {
    /// Build the tabular view of `result`.
    pub fn from_result(result: &SimulationResult) -> Self {
        let spec = result.operation().output_spec();

        let mut headers = Vec::with_capacity(1 + result.all_series().len());
        headers.push(format!(
            "{} ({})",
            spec.independent.name, spec.independent.unit
        ));
        for (name, _) in result.all_series() {
            // Series not covered by the spec (none today) fall back to a
            // bare name rather than being dropped.
            match spec.series_spec(name) {
                Some(s) => headers.push(format!("{} ({})", s.name, s.unit)),
                None => headers.push((*name).to_string()),
            }
        }

        let xs = result.independent();
        let mut rows = Vec::with_capacity(xs.len());
        for i in 0..xs.len() {
            let mut row = Vec::with_capacity(headers.len());
            row.push(xs[i]);
            for (_, values) in result.all_series() {
                row.push(values[i]);
            }
            rows.push(row);
        }

        let scalars = result
            .scalars()
            .iter()
            .map(|s| (s.name.to_string(), s.unit.to_string(), s.value))
            .collect();

        Self {
            headers,
            rows,
            scalars,
        }
    }

    /// Column headers, independent variable first.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Sample rows in order; each row aligns with [`Table::headers`].
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Scalar summary outputs as `(name, unit, value)`.
    pub fn scalars(&self) -> &[(String, String, f64)] {
        &self.scalars
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// =================================================================================================
// Tests
// =================================================================================================
