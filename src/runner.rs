//! Simulation runner
//!
//! The single entry point collaborators call:
//! resolve the operation id against the catalog, validate the raw inputs
//! into a [`ParameterSet`], hand a fresh [`Budget`] to the matching
//! solver, and return its [`SimulationResult`].
//!
//! Every failure mode is a value, never a panic across the boundary:
//!
//! - unknown id → [`RunError::UnknownOperation`], no partial output,
//! - bad input → [`RunError::Validation`], recoverable by re-prompting,
//! - pathological-but-valid parameters → a partial result flagged
//!   `BudgetExhausted`, because a slow answer beats a hung session.
//!
//! A `Runner` holds only the read-only catalog, so one instance can serve
//! concurrent sessions from multiple threads without locking.

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;

use crate::numeric::Budget;
use crate::operation::{Catalog, Operation};
use crate::params::ValidationError;
use crate::result::SimulationResult;

/// Failure of [`Runner::run`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunError {
    /// Raw inputs rejected by the operation's schema
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Id outside the closed operation set — an integration error on the
    /// caller's side, aborted without partial output
    #[error("unknown operation id `{0}`")]
    UnknownOperation(String),
}

/// Per-run numerical allowance used by a [`Runner`].
#[derive(Debug, Clone, Copy)]
pub struct BudgetPolicy {
    /// Derivative/function evaluations allowed per run
    pub max_evals: u64,

    /// Wall-clock time allowed per run
    pub wall_clock: Duration,
}

impl Default for BudgetPolicy {
    fn default() -> Self {
        Self {
            max_evals: Budget::DEFAULT_MAX_EVALS,
            wall_clock: Budget::DEFAULT_WALL_CLOCK,
        }
    }
}

/// Dispatches validated runs to the model library.
pub struct Runner {
    catalog: Catalog,
    policy: BudgetPolicy,
}

impl Runner {
    /// Runner over the standard ten-operation catalog.
    pub fn new() -> Self {
        Self::with_catalog(Catalog::standard())
    }

    /// Runner over an explicit catalog (tests inject reduced ones).
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            catalog,
            policy: BudgetPolicy::default(),
        }
    }

    /// Replace the per-run budget policy.
    pub fn with_budget_policy(mut self, policy: BudgetPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The catalog this runner dispatches against.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Run a simulation selected by string id.
    pub fn run(
        &self,
        operation_id: &str,
        raw_inputs: &HashMap<String, f64>,
    ) -> Result<SimulationResult, RunError> {
        let operation = Operation::from_id(operation_id)
            .ok_or_else(|| RunError::UnknownOperation(operation_id.to_string()))?;
        self.run_operation(operation, raw_inputs)
    }

    /// Run a simulation for a statically-known operation.
    pub fn run_operation(
        &self,
        operation: Operation,
        raw_inputs: &HashMap<String, f64>,
    ) -> Result<SimulationResult, RunError> {
        let params = operation.schema().validate(raw_inputs)?;

        log::debug!("running {operation} with {} parameters", params.len());

        let mut budget = Budget::new(self.policy.max_evals, self.policy.wall_clock);
        let entry = self.catalog.entry(operation);
        Ok(entry.model().simulate(&params, &mut budget))
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Diagnostic;

    #[test]
    fn test_unknown_operation_id() {
        let runner = Runner::new();
        let err = runner.run("11", &HashMap::new()).unwrap_err();

        assert_eq!(err, RunError::UnknownOperation("11".to_string()));
    }

    #[test]
    fn test_validation_error_surfaces() {
        let runner = Runner::new();
        let raw = HashMap::from([("k".to_string(), -1.0)]);
        let err = runner.run("batch_reactor", &raw).unwrap_err();

        match err {
            RunError::Validation(e) => {
                assert_eq!(e.parameter(), "k");
                assert_eq!(e.bound(), Some(0.0));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_all_operations_run_on_defaults() {
        let runner = Runner::new();
        for op in Operation::ALL {
            let result = runner
                .run(op.id(), &HashMap::new())
                .unwrap_or_else(|e| panic!("{op} failed on defaults: {e}"));
            assert!(!result.is_empty(), "{op} produced no samples");
        }
    }

    #[test]
    fn test_tight_budget_yields_partial_result() {
        let runner = Runner::new().with_budget_policy(BudgetPolicy {
            max_evals: 40,
            wall_clock: Duration::from_secs(60),
        });

        let result = runner.run("batch_reactor", &HashMap::new()).unwrap();
        assert!(result
            .diagnostics()
            .iter()
            .any(|d| matches!(d, Diagnostic::BudgetExhausted { .. })));
        assert!(result.len() > 0, "partial result must keep the prefix");
    }

    #[test]
    fn test_runner_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Runner>();
    }

    #[test]
    fn test_concurrent_runs_agree() {
        use std::sync::Arc;

        let runner = Arc::new(Runner::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let runner = Arc::clone(&runner);
                std::thread::spawn(move || {
                    runner.run("cstr", &HashMap::new()).unwrap()
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for r in &results[1..] {
            assert_eq!(
                r.series("concentration"),
                results[0].series("concentration")
            );
        }
    }
}
