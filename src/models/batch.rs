//! Batch reactor with n-th order kinetics
//!
//! # Governing equation
//!
//! Isothermal, constant-volume batch reactor, single reaction A → products:
//!
//! ```text
//! dC/dt = -k·Cⁿ        C(0) = C0
//! ```
//!
//! Conversion follows as `X(t) = 1 - C(t)/C0`.
//!
//! For `n = 1` the closed form is `C(t) = C0·e^{-kt}`, which the
//! integration tests use as the accuracy reference. `n = 0` hits zero
//! concentration in finite time (`t = C0/k`); the integrator clamps there
//! and the run carries a `ClampedNegative` diagnostic.

use nalgebra::DVector;

use crate::models::UnitModel;
use crate::numeric::{Budget, Integration};
use crate::operation::Operation;
use crate::params::{ParamSchema, ParamSpec, ParameterSet};
use crate::result::{
    Diagnostic, Expectation, OutputSpec, ResultBuilder, SeriesSpec, SimulationResult,
};

pub(crate) static SCHEMA: ParamSchema = ParamSchema::new(&[
    ParamSpec { name: "c0", unit: "mol/L", min: 0.01, max: 100.0, default: 1.0 },
    ParamSpec { name: "k", unit: "(mol/L)^(1-n)/min", min: 0.0, max: 10.0, default: 0.1 },
    ParamSpec { name: "n", unit: "-", min: 0.0, max: 3.0, default: 1.0 },
    ParamSpec { name: "t_end", unit: "min", min: 0.1, max: 1000.0, default: 20.0 },
    ParamSpec { name: "resolution", unit: "steps", min: 10.0, max: 10000.0, default: 200.0 },
]);

pub(crate) static OUTPUT: OutputSpec = OutputSpec {
    independent: SeriesSpec {
        name: "time",
        unit: "min",
        expectation: Expectation::NonDecreasing,
    },
    series: &[
        SeriesSpec {
            name: "concentration",
            unit: "mol/L",
            expectation: Expectation::NonNegative,
        },
        SeriesSpec {
            name: "conversion",
            unit: "-",
            expectation: Expectation::UnitInterval,
        },
    ],
    scalars: &[
        ("final_concentration", "mol/L"),
        ("final_conversion", "-"),
    ],
};

/// Batch reactor solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchReactor;

impl UnitModel for BatchReactor {
    fn operation(&self) -> Operation {
        Operation::BatchReactor
    }

    fn simulate(&self, params: &ParameterSet, budget: &mut Budget) -> SimulationResult {
        let c0 = params.get("c0");
        let k = params.get("k");
        let n = params.get("n");
        let t_end = params.get("t_end");
        let steps = params.get("resolution") as usize;

        let integration = Integration::run(
            |_t, y: &DVector<f64>| DVector::from_vec(vec![-k * y[0].powf(n)]),
            DVector::from_vec(vec![c0]),
            t_end,
            steps,
            budget,
        );

        let concentration = integration.component(0);
        let conversion: Vec<f64> = concentration
            .iter()
            .map(|&c| (1.0 - c / c0).clamp(0.0, 1.0))
            .collect();

        let final_c = *concentration.last().unwrap_or(&c0);
        let final_x = *conversion.last().unwrap_or(&0.0);
        let completed = integration.xs.len().saturating_sub(1);

        let mut builder = ResultBuilder::new(Operation::BatchReactor, integration.xs)
            .series("concentration", concentration)
            .series("conversion", conversion)
            .scalar("final_concentration", "mol/L", final_c)
            .scalar("final_conversion", "-", final_x);

        if integration.clamped[0] {
            builder = builder.diagnostic(Diagnostic::ClampedNegative {
                series: "concentration",
            });
        }
        if integration.exhausted {
            builder = builder.diagnostic(Diagnostic::BudgetExhausted {
                completed_steps: completed,
            });
        }

        builder.finish(params)
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    fn run(raw: &[(&str, f64)]) -> SimulationResult {
        let raw: HashMap<String, f64> =
            raw.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        let params = SCHEMA.validate(&raw).unwrap();
        BatchReactor.simulate(&params, &mut Budget::unlimited())
    }

    #[test]
    fn test_first_order_matches_closed_form() {
        // C0 = 1, k = 0.1, t = 20  =>  C = e^{-2} ≈ 0.1353, X ≈ 0.8647
        let result = run(&[]);

        let c = result.series("concentration").unwrap();
        let x = result.series("conversion").unwrap();
        let expected = (-2.0f64).exp();

        assert_relative_eq!(c[c.len() - 1], expected, max_relative = 1e-3);
        assert_relative_eq!(x[x.len() - 1], 1.0 - expected, max_relative = 1e-3);
        assert!(result.diagnostics().is_empty());
    }

    #[test]
    fn test_zero_rate_constant_keeps_conversion_at_zero() {
        let result = run(&[("k", 0.0)]);

        let x = result.series("conversion").unwrap();
        assert!(x.iter().all(|&v| v == 0.0));

        let c = result.series("concentration").unwrap();
        assert!(c.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_zero_order_clamps_at_exhaustion() {
        // n = 0: C hits zero at t = C0/k = 2 min, well inside the horizon.
        let result = run(&[("n", 0.0), ("k", 0.5), ("t_end", 10.0)]);

        assert!(result.has_diagnostic(&Diagnostic::ClampedNegative {
            series: "concentration"
        }));
        let c = result.series("concentration").unwrap();
        assert_eq!(c[c.len() - 1], 0.0);
        assert!(c.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_second_order_matches_closed_form() {
        // n = 2: C(t) = C0 / (1 + k C0 t)
        let result = run(&[("n", 2.0), ("k", 0.3), ("t_end", 15.0), ("resolution", 500.0)]);

        let c = result.series("concentration").unwrap();
        let expected = 1.0 / (1.0 + 0.3 * 1.0 * 15.0);
        assert_relative_eq!(c[c.len() - 1], expected, max_relative = 1e-4);
    }

    #[test]
    fn test_deterministic() {
        let a = run(&[("k", 0.25), ("resolution", 137.0)]);
        let b = run(&[("k", 0.25), ("resolution", 137.0)]);

        assert_eq!(a.series("concentration"), b.series("concentration"));
        assert_eq!(a.scalars(), b.scalars());
    }

    #[test]
    fn test_budget_exhaustion_returns_partial_profile() {
        let raw = HashMap::new();
        let params = SCHEMA.validate(&raw).unwrap();
        let mut budget = Budget::new(40, std::time::Duration::from_secs(60));

        let result = BatchReactor.simulate(&params, &mut budget);

        assert!(result
            .diagnostics()
            .iter()
            .any(|d| matches!(d, Diagnostic::BudgetExhausted { .. })));
        assert_eq!(result.len(), 11); // initial sample + 10 steps of 4 evals
    }
}
