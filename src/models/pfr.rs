//! Plug-flow reactor
//!
//! # Governing equation
//!
//! Under the plug-flow assumption (no axial dispersion, no radial
//! gradients) the steady-state species balance along the reactor axis is
//! formally the batch balance with residence position `z/u` in place of
//! time:
//!
//! ```text
//! u·dC/dz = -k·Cⁿ        C(0) = C0
//! ```
//!
//! The profile is integrated over `[0, L]`; the outlet of a PFR with
//! space time `L/u` therefore matches a batch reactor run for the same
//! duration, which the tests exploit as a cross-model check.

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
    ParamSpec { name: "length", unit: "m", min: 0.1, max: 100.0, default: 1.0 },
    ParamSpec { name: "velocity", unit: "m/min", min: 0.001, max: 100.0, default: 0.05 },
    ParamSpec { name: "resolution", unit: "steps", min: 10.0, max: 10000.0, default: 200.0 },
]);

pub(crate) static OUTPUT: OutputSpec = OutputSpec {
    independent: SeriesSpec {
        name: "axial_position",
        unit: "m",
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
        ("space_time", "min"),
        ("outlet_concentration", "mol/L"),
        ("outlet_conversion", "-"),
    ],
};

/// Plug-flow reactor solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlugFlowReactor;

impl UnitModel for PlugFlowReactor {
    fn operation(&self) -> Operation {
        Operation::Pfr
    }

    fn simulate(&self, params: &ParameterSet, budget: &mut Budget) -> SimulationResult {
        let c0 = params.get("c0");
        let k = params.get("k");
        let n = params.get("n");
        let length = params.get("length");
        let velocity = params.get("velocity");
        let steps = params.get("resolution") as usize;

        let integration = Integration::run(
            |_z, y: &DVector<f64>| DVector::from_vec(vec![-k * y[0].powf(n) / velocity]),
            DVector::from_vec(vec![c0]),
            length,
            steps,
            budget,
        );

        let concentration = integration.component(0);
        let conversion: Vec<f64> = concentration
            .iter()
            .map(|&c| (1.0 - c / c0).clamp(0.0, 1.0))
            .collect();

        let outlet_c = *concentration.last().unwrap_or(&c0);
        let outlet_x = *conversion.last().unwrap_or(&0.0);
        let completed = integration.xs.len().saturating_sub(1);

        let mut builder = ResultBuilder::new(Operation::Pfr, integration.xs)
            .series("concentration", concentration)
            .series("conversion", conversion)
            .scalar("space_time", "min", length / velocity)
            .scalar("outlet_concentration", "mol/L", outlet_c)
            .scalar("outlet_conversion", "-", outlet_x);

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
        PlugFlowReactor.simulate(&params, &mut Budget::unlimited())
    }

    #[test]
    fn test_first_order_matches_batch_at_equal_space_time() {
        // L = 1 m, u = 0.05 m/min: space time 20 min, so the outlet must
        // match the batch reactor at t = 20 with the same kinetics.
        let result = run(&[]);

        assert_relative_eq!(result.scalar("space_time").unwrap(), 20.0, epsilon = 1e-12);
        assert_relative_eq!(
            result.scalar("outlet_concentration").unwrap(),
            (-2.0f64).exp(),
            max_relative = 1e-3
        );
    }

    #[test]
    fn test_zero_kinetics_flat_profile() {
        let result = run(&[("k", 0.0)]);

        let c = result.series("concentration").unwrap();
        assert!(c.iter().all(|&v| v == 1.0));
        assert_eq!(result.scalar("outlet_conversion"), Some(0.0));
    }

    #[test]
    fn test_profile_monotone_decreasing() {
        let result = run(&[("k", 0.5), ("n", 2.0)]);

        let c = result.series("concentration").unwrap();
        assert!(c.as_slice().windows(2).all(|w| w[1] <= w[0]));
        assert!(Expectation::UnitInterval.check(result.series("conversion").unwrap()));
    }

    #[test]
    fn test_independent_variable_is_axial_position() {
        let result = run(&[("length", 2.5)]);

        let z = result.independent();
        assert_eq!(z[0], 0.0);
        assert_relative_eq!(z[z.len() - 1], 2.5, epsilon = 1e-12);
    }
}
