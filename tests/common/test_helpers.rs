//! Helper functions for integration tests

use std::collections::HashMap;

use chemengsim::{Runner, SimulationResult};

/// Run an operation on its schema defaults.
#[allow(dead_code)]
pub fn run_defaults(operation_id: &str) -> SimulationResult {
    run_with(operation_id, &[])
}

/// Run an operation with the given overrides on top of the defaults.
#[allow(dead_code)]
pub fn run_with(operation_id: &str, overrides: &[(&str, f64)]) -> SimulationResult {
    let raw: HashMap<String, f64> = overrides
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect();
    Runner::new()
        .run(operation_id, &raw)
        .unwrap_or_else(|e| panic!("{operation_id} failed: {e}"))
}

/// Compute relative error: |actual - expected| / |expected|
#[allow(dead_code)]
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}
