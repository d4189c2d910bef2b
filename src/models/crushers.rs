//! Crushers and ball mill — comminution energy laws
//!
//! # Correlations
//!
//! Specific energy from feed and product 80%-passing sizes (both in µm):
//!
//! ```text
//! Rittinger:  E = K_R · (1/P80 - 1/F80)
//! Kick:       E = K_K · ln(F80/P80)
//! Bond:       E = 10·Wi · (1/√P80 - 1/√F80)
//! ```
//!
//! all in kWh/t; mill power is `E × throughput`.
//!
//! # Size distributions
//!
//! Feed and product cumulative-passing curves are synthesized with the
//! Gates-Gaudin-Schuhmann form `P(d) = min(1, (d/d_max)^a)`, anchored so
//! the curve passes through 80% at the given x80, with the distribution
//! modulus tied to the chosen law (fine-grinding laws give flatter, finer
//! distributions).

use crate::models::{linspace, UnitModel};
use crate::numeric::Budget;
use crate::operation::Operation;
use crate::params::{ParamSchema, ParamSpec, ParameterSet};
use crate::result::{
    Diagnostic, Expectation, OutputSpec, ResultBuilder, SeriesSpec, SimulationResult,
};

/// Law selector values (the `law` parameter, rounded).
const LAW_RITTINGER: u8 = 1;
const LAW_KICK: u8 = 2;
const LAW_BOND: u8 = 3;

pub(crate) static SCHEMA: ParamSchema = ParamSchema::new(&[
    ParamSpec { name: "f80", unit: "um", min: 100.0, max: 500000.0, default: 50000.0 },
    ParamSpec { name: "p80", unit: "um", min: 10.0, max: 100000.0, default: 5000.0 },
    ParamSpec { name: "throughput", unit: "t/h", min: 0.1, max: 2000.0, default: 100.0 },
    // 1 = Rittinger, 2 = Kick, 3 = Bond
    ParamSpec { name: "law", unit: "-", min: 1.0, max: 3.0, default: 3.0 },
    ParamSpec { name: "work_index", unit: "kWh/t", min: 1.0, max: 30.0, default: 12.0 },
    ParamSpec { name: "rittinger_constant", unit: "kWh·um/t", min: 100.0, max: 1e6, default: 5e4 },
    ParamSpec { name: "kick_constant", unit: "kWh/t", min: 0.1, max: 100.0, default: 3.0 },
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
            name: "feed_passing",
            unit: "-",
            expectation: Expectation::UnitInterval,
        },
        SeriesSpec {
            name: "product_passing",
            unit: "-",
            expectation: Expectation::UnitInterval,
        },
    ],
    scalars: &[
        ("specific_energy", "kWh/t"),
        ("power", "kW"),
        ("reduction_ratio", "-"),
    ],
};

/// Comminution solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct Crushers;

impl Crushers {
    /// Specific energy (kWh/t) for the selected law. Negative results
    /// (product coarser than feed) are reported as zero by the caller.
    fn specific_energy(law: u8, f80: f64, p80: f64, params: &ParameterSet) -> f64 {
        match law {
            LAW_RITTINGER => params.get("rittinger_constant") * (1.0 / p80 - 1.0 / f80),
            LAW_KICK => params.get("kick_constant") * (f80 / p80).ln(),
            _ => 10.0 * params.get("work_index") * (1.0 / p80.sqrt() - 1.0 / f80.sqrt()),
        }
    }

    /// Distribution modulus of the synthetic GGS curve for the law.
    fn distribution_modulus(law: u8) -> f64 {
        match law {
            LAW_RITTINGER => 0.8,
            _ => 1.0,
        }
    }

    /// GGS cumulative passing at `d`, anchored at 80% passing `x80`.
    fn ggs_passing(d: f64, x80: f64, modulus: f64) -> f64 {
        let d_max = x80 / 0.8f64.powf(1.0 / modulus);
        (d / d_max).powf(modulus).min(1.0)
    }
}

impl UnitModel for Crushers {
    fn operation(&self) -> Operation {
        Operation::Crushers
    }

    fn simulate(&self, params: &ParameterSet, budget: &mut Budget) -> SimulationResult {
        let f80 = params.get("f80");
        let p80 = params.get("p80");
        let throughput = params.get("throughput");
        let law = (params.get("law").round() as u8).clamp(LAW_RITTINGER, LAW_BOND);
        let points = params.get("resolution") as usize;

        let no_reduction = p80 >= f80;
        let energy = Self::specific_energy(law, f80, p80, params).max(0.0);
        let modulus = Self::distribution_modulus(law);

        let sizes = linspace(0.0, f80, points);
        let mut feed_passing = Vec::with_capacity(points);
        let mut product_passing = Vec::with_capacity(points);
        let mut exhausted = false;

        for &d in &sizes {
            if !budget.try_consume(1) {
                exhausted = true;
                break;
            }
            feed_passing.push(Self::ggs_passing(d, f80, modulus));
            product_passing.push(Self::ggs_passing(d, p80, modulus));
        }

        let completed = feed_passing.len();
        let sizes: Vec<f64> = sizes.into_iter().take(completed).collect();

        let mut builder = ResultBuilder::new(Operation::Crushers, sizes)
            .series("feed_passing", feed_passing)
            .series("product_passing", product_passing)
            .scalar("specific_energy", "kWh/t", energy)
            .scalar("power", "kW", energy * throughput)
            .scalar("reduction_ratio", "-", f80 / p80);

        if no_reduction {
            builder = builder.diagnostic(Diagnostic::NoReduction);
        }
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
