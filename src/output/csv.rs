//! CSV rendering of a result table
//!
//! Writes a [`Table`] through any `io::Write` in a format Excel, pandas
//! and MATLAB all ingest directly. The delimiter and numeric precision
//! are configurable; an optional comment header records the operation and
//! the full parameter set, so a downloaded file is self-describing and
//! the run it came from is reproducible.
//!
//! # Example output
//!
//! ```csv
//! # operation: batch_reactor
//! # c0 = 1
//! # k = 0.1
//! # n = 1
//! # resolution = 200
//! # t_end = 20
//! time (min),concentration (mol/L),conversion (-)
//! 0.000000,1.000000,0.000000
//! 0.100000,0.990050,0.009950
//! ...
//! ```

use std::io::{self, Write};

use thiserror::Error;

use super::Table;
use crate::result::SimulationResult;

/// CSV writing failure.
#[derive(Debug, Error)]
pub enum CsvError {
    /// The result holds no samples to write
    #[error("result contains no samples")]
    EmptyResult,

    /// Underlying writer failure
    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

/// CSV rendering options.
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Column delimiter (default `,`)
    pub delimiter: char,

    /// Decimal places for sample values (default 6)
    pub precision: usize,

    /// Prepend `#`-comment lines with the operation id and parameters
    /// (default true)
    pub include_provenance: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            precision: 6,
            include_provenance: true,
        }
    }
}

/// Render `result` as CSV into `writer`.
pub fn write_csv<W: Write>(
    result: &SimulationResult,
    config: &CsvConfig,
    writer: &mut W,
) -> Result<(), CsvError> {
    if result.is_empty() {
        return Err(CsvError::EmptyResult);
    }

    let table = Table::from_result(result);
    let d = config.delimiter;

    if config.include_provenance {
        writeln!(writer, "# operation: {}", result.operation())?;
        for (name, value) in result.params().iter() {
            writeln!(writer, "# {name} = {value}")?;
        }
        for diagnostic in result.diagnostics() {
            writeln!(writer, "# diagnostic: {diagnostic}")?;
        }
        for (name, unit, value) in table.scalars() {
            writeln!(writer, "# {name} ({unit}) = {value}")?;
        }
    }

    let header_line: Vec<&str> = table.headers().iter().map(String::as_str).collect();
    writeln!(writer, "{}", header_line.join(&d.to_string()))?;

    let mut line = String::new();
    for row in table.rows() {
        line.clear();
        for (i, value) in row.iter().enumerate() {
            if i > 0 {
                line.push(d);
            }
            line.push_str(&format!("{value:.prec$}", prec = config.precision));
        }
        writeln!(writer, "{line}")?;
    }

    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UnitModel;
    use crate::numeric::Budget;
    use crate::operation::Operation;

    fn sample_result() -> SimulationResult {
        let params = Operation::BatchReactor.schema().defaults();
        crate::models::batch::BatchReactor.simulate(&params, &mut Budget::unlimited())
    }

    fn render(config: &CsvConfig) -> String {
        let result = sample_result();
        let mut buffer = Vec::new();
        write_csv(&result, config, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_header_and_row_count() {
        let text = render(&CsvConfig {
            include_provenance: false,
            ..CsvConfig::default()
        });
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "time (min),concentration (mol/L),conversion (-)");
        // Header plus 201 samples.
        assert_eq!(lines.len(), 202);
    }

    #[test]
    fn test_provenance_header() {
        let text = render(&CsvConfig::default());

        assert!(text.starts_with("# operation: batch_reactor\n"));
        assert!(text.contains("# k = 0.1\n"));
        assert!(text.contains("# final_conversion (-) ="));
    }

    #[test]
    fn test_custom_delimiter_and_precision() {
        let text = render(&CsvConfig {
            delimiter: ';',
            precision: 2,
            include_provenance: false,
        });
        let first_row = text.lines().nth(1).unwrap();

        assert_eq!(first_row, "0.00;1.00;0.00");
    }

    #[test]
    fn test_first_and_last_rows_present() {
        let text = render(&CsvConfig {
            include_provenance: false,
            ..CsvConfig::default()
        });
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[1].starts_with("0.000000,1.000000"));
        assert!(lines.last().unwrap().starts_with("20.000000,"));
    }
}
