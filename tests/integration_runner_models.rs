//! Integration tests: runner + model library
//!
//! These tests exercise the full path a session takes — string id, raw
//! inputs, validation, dispatch, budget — and check the structural
//! contract every operation's result must satisfy.

use std::collections::HashMap;
use std::time::Duration;

use chemengsim::prelude::*;
use chemengsim::BudgetPolicy;

mod common;
use common::{run_defaults, run_with};

// =================================================================================================
// Catalog and Dispatch
// =================================================================================================

#[test]
fn test_catalog_lists_all_ten_operations() {
    let catalog = Catalog::standard();
    assert_eq!(catalog.len(), 10);

    for op in Operation::ALL {
        assert!(
            catalog.resolve(op.id()).is_some(),
            "{op} missing from standard catalog"
        );
    }
}

#[test]
fn test_unknown_id_is_rejected_without_output() {
    let runner = Runner::new();
    for bad in ["11", "0", "batch", "", "BATCH_REACTOR"] {
        let err = runner.run(bad, &HashMap::new()).unwrap_err();
        assert_eq!(err, RunError::UnknownOperation(bad.to_string()));
    }
}

#[test]
fn test_validation_rejects_out_of_range_without_clamping() {
    let runner = Runner::new();
    let raw = HashMap::from([("k".to_string(), -0.5)]);

    match runner.run("batch_reactor", &raw).unwrap_err() {
        RunError::Validation(e) => {
            assert_eq!(e.parameter(), "k");
            assert_eq!(e.bound(), Some(0.0));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_validation_rejects_unknown_parameter() {
    let runner = Runner::new();
    let raw = HashMap::from([("kk".to_string(), 0.1)]);

    match runner.run("batch_reactor", &raw).unwrap_err() {
        RunError::Validation(e) => assert_eq!(e.parameter(), "kk"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

// =================================================================================================
// Output Contract
// =================================================================================================

/// Every operation, run on its defaults, must produce exactly the series
/// its output spec declares, in order, each satisfying its expectation.
#[test]
fn test_every_operation_honors_its_output_spec() {
    for op in Operation::ALL {
        let result = run_defaults(op.id());
        let spec = op.output_spec();

        assert!(!result.is_empty(), "{op} produced no samples");
        assert_eq!(
            result.all_series().len(),
            spec.series.len(),
            "{op}: series count mismatch"
        );

        for (declared, (name, values)) in spec.series.iter().zip(result.all_series()) {
            assert_eq!(declared.name, *name, "{op}: series order mismatch");
            assert_eq!(values.len(), result.len(), "{op}: ragged series `{name}`");
            assert!(
                declared.expectation.check(values),
                "{op}: series `{name}` violates its expectation"
            );
        }

        // Emitted scalars are all declared; no undeclared extras leak out.
        for scalar in result.scalars() {
            assert!(
                spec.scalars.iter().any(|(n, _)| *n == scalar.name),
                "{op}: undeclared scalar `{}`",
                scalar.name
            );
            assert!(scalar.value.is_finite(), "{op}: non-finite `{}`", scalar.name);
        }
    }
}

#[test]
fn test_independent_variable_is_monotone_for_every_operation() {
    for op in Operation::ALL {
        let result = run_defaults(op.id());
        let xs = result.independent();
        for w in xs.as_slice().windows(2) {
            assert!(w[1] > w[0], "{op}: independent variable not increasing");
        }
    }
}

#[test]
fn test_results_carry_full_parameter_provenance() {
    let result = run_with("cstr", &[("tau", 8.0)]);

    // Overridden and defaulted values both appear.
    assert_eq!(result.params().get("tau"), 8.0);
    assert_eq!(result.params().get("c0"), 1.0);
    assert_eq!(result.params().len(), Operation::Cstr.schema().defaults().len());
}

// =================================================================================================
// Determinism
// =================================================================================================

#[test]
fn test_identical_inputs_give_bitwise_identical_results() {
    for op in Operation::ALL {
        let a = run_defaults(op.id());
        let b = run_defaults(op.id());

        assert_eq!(a.independent(), b.independent(), "{op}: independent differs");
        for ((_, va), (_, vb)) in a.all_series().iter().zip(b.all_series()) {
            assert_eq!(va, vb, "{op}: series differ between identical runs");
        }
        for (sa, sb) in a.scalars().iter().zip(b.scalars()) {
            assert_eq!(sa, sb, "{op}: scalars differ between identical runs");
        }
    }
}

// =================================================================================================
// Budget
// =================================================================================================

#[test]
fn test_exhausted_budget_flags_and_keeps_prefix() {
    let runner = Runner::new().with_budget_policy(BudgetPolicy {
        max_evals: 40,
        wall_clock: Duration::from_secs(60),
    });

    let result = runner.run("batch_reactor", &HashMap::new()).unwrap();

    assert!(result
        .diagnostics()
        .iter()
        .any(|d| matches!(d, Diagnostic::BudgetExhausted { .. })));
    // 40 evaluations fund 10 RK4 steps: initial sample plus 10.
    assert_eq!(result.len(), 11);
    // The prefix is still physically sound.
    let conc = result.series("concentration").unwrap();
    assert!(conc.iter().all(|&c| (0.0..=1.0).contains(&c)));
}

#[test]
fn test_generous_budget_never_flags() {
    for op in Operation::ALL {
        let result = run_defaults(op.id());
        assert!(
            !result
                .diagnostics()
                .iter()
                .any(|d| matches!(d, Diagnostic::BudgetExhausted { .. })),
            "{op} exhausted the default budget on default inputs"
        );
    }
}

// =================================================================================================
// Formatting Round Trip
// =================================================================================================

#[test]
fn test_table_and_pairs_agree_with_the_result() {
    let result = run_defaults("filter_press");
    let table = Table::from_result(&result);
    let pairs = series_pairs(&result);

    assert_eq!(table.len(), result.len());
    assert_eq!(pairs.len(), result.all_series().len());

    // Row 0, column 1 is the first sample of the first series.
    assert_eq!(table.rows()[0][1], pairs[0].points[0].1);
}

#[test]
fn test_csv_export_is_parseable() {
    let result = run_defaults("trommel");
    let mut buffer = Vec::new();
    chemengsim::output::csv::write_csv(&result, &CsvConfig::default(), &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();

    let data_lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.starts_with('#'))
        .collect();

    // Header plus one line per sample, every field a finite number.
    assert_eq!(data_lines.len(), 1 + result.len());
    for line in &data_lines[1..] {
        for field in line.split(',') {
            let value: f64 = field.parse().expect("numeric CSV field");
            assert!(value.is_finite());
        }
    }
}
