//! Hydraulic classifier
//!
//! # Model
//!
//! In an upward-flow classifier a particle reports to the underflow when
//! its terminal settling velocity exceeds the upward fluid velocity
//! `v_up = Q/A`. Equating the Stokes settling velocity to `v_up` gives
//! the cut size:
//!
//! ```text
//! d50 = √(18·μ·v_up / (Δρ·g))
//! ```
//!
//! Real classifiers split imperfectly around the cut, so the partition
//! to underflow is reported as a Rosin-Rammler-shaped curve through
//! `(d50, 50 %)`:
//!
//! ```text
//! P(d) = 1 - exp(-ln 2 · (d/d50)^m)
//! ```
//!
//! with sharpness `m` an input (higher is closer to an ideal splitter).

use crate::models::{linspace, UnitModel, GRAVITY};
use crate::numeric::Budget;
use crate::operation::Operation;
use crate::params::{ParamSchema, ParamSpec, ParameterSet};
use crate::result::{
    Diagnostic, Expectation, OutputSpec, ResultBuilder, SeriesSpec, SimulationResult,
};

pub(crate) static SCHEMA: ParamSchema = ParamSchema::new(&[
    ParamSpec { name: "flow_rate", unit: "L/min", min: 0.1, max: 10000.0, default: 100.0 },
    ParamSpec { name: "area", unit: "m2", min: 0.01, max: 50.0, default: 0.5 },
    ParamSpec { name: "viscosity", unit: "Pa·s", min: 1e-4, max: 1.0, default: 1e-3 },
    // Default is quartz in water.
    ParamSpec { name: "density_difference", unit: "kg/m3", min: 10.0, max: 5000.0, default: 1650.0 },
    ParamSpec { name: "sharpness", unit: "-", min: 0.5, max: 10.0, default: 3.0 },
    ParamSpec { name: "max_size", unit: "um", min: 10.0, max: 5000.0, default: 300.0 },
    ParamSpec { name: "resolution", unit: "points", min: 10.0, max: 10000.0, default: 100.0 },
]);

pub(crate) static OUTPUT: OutputSpec = OutputSpec {
    independent: SeriesSpec {
        name: "particle_size",
        unit: "um",
        expectation: Expectation::NonDecreasing,
    },
    series: &[
        SeriesSpec {
            name: "partition_underflow",
            unit: "-",
            expectation: Expectation::UnitInterval,
        },
        SeriesSpec {
            name: "partition_overflow",
            unit: "-",
            expectation: Expectation::UnitInterval,
        },
    ],
    scalars: &[
        ("cut_size", "um"),
        ("upflow_velocity", "m/s"),
    ],
};

/// Hydraulic classifier solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifiers;

impl UnitModel for Classifiers {
    fn operation(&self) -> Operation {
        Operation::Classifiers
    }

    fn simulate(&self, params: &ParameterSet, budget: &mut Budget) -> SimulationResult {
        let flow_m3s = params.get("flow_rate") / 60000.0;
        let area = params.get("area");
        let viscosity = params.get("viscosity");
        let delta_rho = params.get("density_difference");
        let sharpness = params.get("sharpness");
        let max_size = params.get("max_size");
        let points = params.get("resolution") as usize;

        let v_up = flow_m3s / area;
        let d50_m = (18.0 * viscosity * v_up / (delta_rho * GRAVITY)).sqrt();
        let d50_um = d50_m * 1e6;

        let sizes = linspace(0.0, max_size, points);
        let mut underflow = Vec::with_capacity(points);
        let mut overflow = Vec::with_capacity(points);
        let mut exhausted = false;

        let ln2 = std::f64::consts::LN_2;
        for &d in &sizes {
            if !budget.try_consume(1) {
                exhausted = true;
                break;
            }
            let p = 1.0 - (-ln2 * (d / d50_um).powf(sharpness)).exp();
            underflow.push(p);
            overflow.push(1.0 - p);
        }

        let completed = underflow.len();
        let sizes: Vec<f64> = sizes.into_iter().take(completed).collect();

        let mut builder = ResultBuilder::new(Operation::Classifiers, sizes)
            .series("partition_underflow", underflow)
            .series("partition_overflow", overflow)
            .scalar("cut_size", "um", d50_um)
            .scalar("upflow_velocity", "m/s", v_up);

        if exhausted {
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
