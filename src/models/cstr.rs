//! Continuous stirred-tank reactor at steady state
//!
//! # Governing equation
//!
//! The steady-state material balance for space time `τ = V/Q`:
//!
//! ```text
//! τ = (C0 - C) / (k·Cⁿ)      ⇔      f(C) = C0 - C - k·τ·Cⁿ = 0
//! ```
//!
//! For `n = 1` the closed form is `C = C0/(1 + kτ)`. For other orders the
//! root is found numerically on `[0, C0]` — bracketed scan plus bisection,
//! never a single Newton iteration, so that kinetics admitting more than
//! one steady state (effective orders below zero, i.e. inhibition) have
//! **all** physical roots enumerated deterministically and flagged.
//!
//! When the balance has no root on `[0, C0]` (kinetics fast enough to
//! outrun the feed, e.g. zero order with `k·τ > C0`) the reactant is
//! fully consumed: the effluent is reported as zero, conversion as one,
//! and the run carries a `ClampedNegative` diagnostic.
//!
//! Besides solving the balance at the requested space time, the model
//! sweeps `τ' ∈ [0, τ]` to produce the effluent-versus-space-time profile
//! the laboratory plots; the lowest steady state is reported along the
//! sweep.

use crate::models::{linspace, UnitModel};
use crate::numeric::{roots::bracketed_roots, Budget};
use crate::operation::Operation;
use crate::params::{ParamSchema, ParamSpec, ParameterSet};
use crate::result::{
    Diagnostic, Expectation, OutputSpec, ResultBuilder, SeriesSpec, SimulationResult,
};

/// Space time below which the effluent is reported as the feed itself.
const TAU_EPSILON: f64 = 1e-6;

/// Scan resolution for the per-sweep-point solves; the user-facing
/// `resolution` parameter governs the scan at the requested space time.
const SWEEP_SCAN_INTERVALS: usize = 64;

/// Number of points in the space-time sweep profile.
const SWEEP_POINTS: usize = 100;

/// Scalar slots for enumerated steady states; at most three are reported
/// (power-law kinetics on a bounded domain admit no more than two, the
/// third slot absorbs any future kinetics extension).
const STEADY_STATE_NAMES: [&str; 3] =
    ["steady_state_1", "steady_state_2", "steady_state_3"];

pub(crate) static SCHEMA: ParamSchema = ParamSchema::new(&[
    ParamSpec { name: "c0", unit: "mol/L", min: 0.01, max: 100.0, default: 1.0 },
    ParamSpec { name: "k", unit: "(mol/L)^(1-n)/min", min: 0.0, max: 10.0, default: 0.5 },
    // Negative effective orders model substrate-inhibited kinetics and are
    // what makes steady-state multiplicity reachable.
    ParamSpec { name: "n", unit: "-", min: -1.0, max: 3.0, default: 1.0 },
    ParamSpec { name: "tau", unit: "min", min: 0.0, max: 1000.0, default: 5.0 },
    ParamSpec { name: "resolution", unit: "intervals", min: 10.0, max: 10000.0, default: 400.0 },
]);

pub(crate) static OUTPUT: OutputSpec = OutputSpec {
    independent: SeriesSpec {
        name: "space_time",
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
        ("effluent_concentration", "mol/L"),
        ("conversion", "-"),
        ("steady_state_count", "-"),
        ("steady_state_1", "mol/L"),
        ("steady_state_2", "mol/L"),
        ("steady_state_3", "mol/L"),
    ],
};

/// CSTR steady-state solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cstr;

impl Cstr {
    /// All physical roots of the balance at space time `tau`, ascending.
    fn steady_states(
        c0: f64,
        k: f64,
        n: f64,
        tau: f64,
        intervals: usize,
        budget: &mut Budget,
    ) -> (Vec<f64>, bool) {
        if k == 0.0 || tau == 0.0 {
            // No reaction: the balance collapses to C = C0.
            return (vec![c0], false);
        }

        let balance = |c: f64| c0 - c - k * tau * c.powf(n);

        // For negative orders the rate diverges at C → 0; start the scan
        // just inside the domain so every evaluation is finite.
        let lo = if n < 0.0 { c0 * 1e-9 } else { 0.0 };

        let scan = bracketed_roots(&balance, lo, c0, intervals, budget);
        (scan.roots, scan.exhausted)
    }
}

impl UnitModel for Cstr {
    fn operation(&self) -> Operation {
        Operation::Cstr
    }

    fn simulate(&self, params: &ParameterSet, budget: &mut Budget) -> SimulationResult {
        let c0 = params.get("c0");
        let k = params.get("k");
        let n = params.get("n");
        let tau = params.get("tau");
        let intervals = params.get("resolution") as usize;

        // ====== Solve at the requested space time ======

        let near_zero_tau = tau < TAU_EPSILON;
        let (roots, exhausted) = if near_zero_tau {
            (vec![c0], false)
        } else {
            Self::steady_states(c0, k, n, tau, intervals, budget)
        };

        // The lowest root is the conventional operating branch. A completed
        // scan with no root means the balance is negative over all of
        // [0, C0] (fast kinetics, e.g. zero order with k·tau > C0): the
        // reactant is fully consumed, so the effluent clamps to zero. Only
        // an exhausted scan degrades to the feed.
        let no_root = !exhausted && roots.is_empty();
        let mut clamped = no_root;
        let effluent = if no_root {
            0.0
        } else {
            roots.first().copied().unwrap_or(c0)
        };
        let conversion_at_tau = (1.0 - effluent / c0).clamp(0.0, 1.0);

        if roots.len() > 1 {
            log::debug!("CSTR balance has {} steady states at tau = {tau}", roots.len());
        }

        // ====== Sweep tau' in [0, tau] for the profile ======

        let sweep = linspace(0.0, tau.max(TAU_EPSILON), SWEEP_POINTS);
        let mut concentration = Vec::with_capacity(sweep.len());
        let mut sweep_exhausted = false;

        for &tau_i in &sweep {
            if sweep_exhausted {
                break;
            }
            let c = if tau_i < TAU_EPSILON {
                c0
            } else {
                let (r, ex) =
                    Self::steady_states(c0, k, n, tau_i, SWEEP_SCAN_INTERVALS, budget);
                sweep_exhausted = ex;
                if ex {
                    break;
                }
                match r.first() {
                    Some(&root) => root,
                    // Past the full-consumption threshold the profile
                    // stays at zero rather than jumping back to the feed.
                    None => {
                        clamped = true;
                        0.0
                    }
                }
            };
            concentration.push(c);
        }

        let sweep: Vec<f64> = sweep.into_iter().take(concentration.len()).collect();
        let conversion: Vec<f64> = concentration
            .iter()
            .map(|&c| (1.0 - c / c0).clamp(0.0, 1.0))
            .collect();

        // ====== Assemble ======

        let completed_points = concentration.len();
        let mut builder = ResultBuilder::new(Operation::Cstr, sweep)
            .series("concentration", concentration)
            .series("conversion", conversion)
            .scalar("effluent_concentration", "mol/L", effluent)
            .scalar("conversion", "-", conversion_at_tau)
            .scalar("steady_state_count", "-", roots.len() as f64);

        for (name, &root) in STEADY_STATE_NAMES.iter().zip(roots.iter()) {
            builder = builder.scalar(name, "mol/L", root);
        }

        if near_zero_tau {
            builder = builder.diagnostic(Diagnostic::NearZeroResidenceTime);
        }
        if clamped {
            builder = builder.diagnostic(Diagnostic::ClampedNegative {
                series: "concentration",
            });
        }
        if roots.len() > 1 {
            builder = builder.diagnostic(Diagnostic::MultipleSteadyStates {
                count: roots.len(),
            });
        }
        if exhausted || sweep_exhausted {
            builder = builder.diagnostic(Diagnostic::BudgetExhausted {
                completed_steps: completed_points,
            });
        }

        builder.finish(params)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
