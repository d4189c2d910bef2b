//! Plate-and-frame filter press — constant-pressure cake filtration
//!
//! # Governing equation
//!
//! Ruth's constant-pressure filtration equation, with cumulative filtrate
//! volume `V` as the state:
//!
//! ```text
//! dV/dt = A·ΔP / (μ·(α·c·V/A + Rm))
//! ```
//!
//! `Rm` is the medium resistance, `α` the specific cake resistance and
//! `c` the solids deposited per filtrate volume. The rate is strictly
//! positive for any valid parameter set, so cumulative volume is
//! non-decreasing by construction. Cake thickness follows from the solids
//! balance:
//!
//! ```text
//! L(t) = c·V(t) / (A·ρ_cake)
//! ```

use nalgebra::DVector;

use crate::models::UnitModel;
use crate::numeric::{Budget, Integration};
use crate::operation::Operation;
use crate::params::{ParamSchema, ParamSpec, ParameterSet};
use crate::result::{
    Diagnostic, Expectation, OutputSpec, ResultBuilder, SeriesSpec, SimulationResult,
};

pub(crate) static SCHEMA: ParamSchema = ParamSchema::new(&[
    ParamSpec { name: "delta_p", unit: "Pa", min: 1e3, max: 1e6, default: 2e5 },
    ParamSpec { name: "area", unit: "m2", min: 0.01, max: 100.0, default: 1.0 },
    ParamSpec { name: "viscosity", unit: "Pa·s", min: 1e-4, max: 1.0, default: 1e-3 },
    ParamSpec { name: "medium_resistance", unit: "1/m", min: 1e8, max: 1e13, default: 1e10 },
    ParamSpec { name: "cake_resistance", unit: "m/kg", min: 1e9, max: 1e13, default: 1e11 },
    ParamSpec { name: "slurry_conc", unit: "kg/m3", min: 0.1, max: 500.0, default: 10.0 },
    ParamSpec { name: "cake_density", unit: "kg/m3", min: 200.0, max: 3000.0, default: 1000.0 },
    ParamSpec { name: "t_end", unit: "s", min: 1.0, max: 36000.0, default: 1800.0 },
    ParamSpec { name: "resolution", unit: "steps", min: 10.0, max: 10000.0, default: 300.0 },
]);

pub(crate) static OUTPUT: OutputSpec = OutputSpec {
    independent: SeriesSpec {
        name: "time",
        unit: "s",
        expectation: Expectation::NonDecreasing,
    },
    series: &[
        SeriesSpec {
            name: "filtrate_volume",
            unit: "m3",
            expectation: Expectation::NonDecreasing,
        },
        SeriesSpec {
            name: "cake_thickness",
            unit: "mm",
            expectation: Expectation::NonDecreasing,
        },
    ],
    scalars: &[
        ("final_volume", "m3"),
        ("final_thickness", "mm"),
        ("mean_rate", "m3/s"),
    ],
};

/// Filter press solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterPress;

impl UnitModel for FilterPress {
    fn operation(&self) -> Operation {
        Operation::FilterPress
    }

    fn simulate(&self, params: &ParameterSet, budget: &mut Budget) -> SimulationResult {
        let delta_p = params.get("delta_p");
        let area = params.get("area");
        let viscosity = params.get("viscosity");
        let rm = params.get("medium_resistance");
        let alpha = params.get("cake_resistance");
        let conc = params.get("slurry_conc");
        let cake_density = params.get("cake_density");
        let t_end = params.get("t_end");
        let steps = params.get("resolution") as usize;

        let integration = Integration::run(
            |_t, y: &DVector<f64>| {
                let v = y[0];
                let resistance = alpha * conc * v / area + rm;
                DVector::from_vec(vec![area * delta_p / (viscosity * resistance)])
            },
            DVector::from_vec(vec![0.0]),
            t_end,
            steps,
            budget,
        );

        let volume = integration.component(0);
        let thickness_mm: Vec<f64> = volume
            .iter()
            .map(|&v| 1000.0 * conc * v / (area * cake_density))
            .collect();

        let final_v = *volume.last().unwrap_or(&0.0);
        let final_l = *thickness_mm.last().unwrap_or(&0.0);
        let elapsed = *integration.xs.last().unwrap_or(&0.0);
        let mean_rate = if elapsed > 0.0 { final_v / elapsed } else { 0.0 };
        let completed = integration.xs.len().saturating_sub(1);

        let mut builder = ResultBuilder::new(Operation::FilterPress, integration.xs)
            .series("filtrate_volume", volume)
            .series("cake_thickness", thickness_mm)
            .scalar("final_volume", "m3", final_v)
            .scalar("final_thickness", "mm", final_l)
            .scalar("mean_rate", "m3/s", mean_rate);

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
        FilterPress.simulate(&params, &mut Budget::unlimited())
    }

    #[test]
    fn test_cumulative_volume_non_decreasing() {
        let result = run(&[]);
        let v = result.series("filtrate_volume").unwrap();

        assert!(Expectation::NonDecreasing.check(v));
        assert!(v[v.len() - 1] > 0.0);
    }

    #[test]
    fn test_matches_quadratic_closed_form() {
        // Constant-pressure filtration has the implicit solution
        //   (μ α c / (2 A² ΔP))·V² + (μ Rm / (A ΔP))·V = t.
        // Verify the integrator's final V satisfies it.
        let result = run(&[("resolution", 2000.0)]);
        let v = result.scalar("final_volume").unwrap();

        let (dp, a, mu, rm, alpha, c) = (2e5, 1.0, 1e-3, 1e10, 1e11, 10.0);
        let t_implied = mu * alpha * c / (2.0 * a * a * dp) * v * v + mu * rm / (a * dp) * v;
        assert_relative_eq!(t_implied, 1800.0, max_relative = 1e-4);
    }

    #[test]
    fn test_rate_declines_as_cake_builds() {
        let result = run(&[]);
        let v = result.series("filtrate_volume").unwrap();

        // Compare first and last increments over the uniform grid.
        let first = v[1] - v[0];
        let last = v[v.len() - 1] - v[v.len() - 2];
        assert!(last < first, "rate must decline: {last} >= {first}");
    }

    #[test]
    fn test_thickness_tracks_volume() {
        let result = run(&[("slurry_conc", 50.0), ("cake_density", 1250.0)]);

        let v = result.series("filtrate_volume").unwrap();
        let l = result.series("cake_thickness").unwrap();
        for (vi, li) in v.iter().zip(l.iter()) {
            assert_relative_eq!(*li, 1000.0 * 50.0 * vi / 1250.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_higher_pressure_filters_faster() {
        let low = run(&[("delta_p", 5e4)]);
        let high = run(&[("delta_p", 5e5)]);

        assert!(
            high.scalar("final_volume").unwrap() > low.scalar("final_volume").unwrap()
        );
    }
}
