//! Model library: one solver per unit operation
//!
//! All solvers implement the [`UnitModel`] trait. The solver gets a
//! validated [`ParameterSet`](crate::params::ParameterSet) and a run
//! [`Budget`](crate::numeric::Budget), and produces a
//! [`SimulationResult`](crate::result::SimulationResult) — deterministic,
//! with no shared mutable state between invocations, so concurrent
//! sessions can run models in parallel freely.
//!
//! The models own the physics (governing equations, correlations, domain
//! edge cases); the [`numeric`](crate::numeric) module owns the stepping
//! and root finding.
//!
//! # Solver families
//!
//! - **Reactors** ([`batch`], [`semi_batch`], [`pfr`]): material-balance
//!   ODEs integrated with RK4 over time or axial position.
//! - **Steady state** ([`cstr`]): algebraic balance solved by bracketed
//!   root scan, surfacing steady-state multiplicity.
//! - **Mechanical separation** ([`crushers`], [`filter_press`],
//!   [`rotary_filter`], [`centrifuge_flotation`], [`classifiers`],
//!   [`trommel`]): empirical correlations and the Ruth filtration
//!   equation.

pub mod batch;
pub mod centrifuge_flotation;
pub mod classifiers;
pub mod crushers;
pub mod cstr;
pub mod filter_press;
pub mod pfr;
pub mod rotary_filter;
pub mod semi_batch;
pub mod trommel;

use crate::numeric::Budget;
use crate::operation::Operation;
use crate::params::ParameterSet;
use crate::result::SimulationResult;

/// Shared solver contract.
///
/// `simulate` must be deterministic (identical parameters produce an
/// identical result) and must not keep state across invocations. The
/// `params` argument is always a set validated against
/// [`Operation::schema`] for [`UnitModel::operation`], so models read
/// their parameters infallibly.
pub trait UnitModel: Send + Sync {
    /// The operation this solver implements.
    fn operation(&self) -> Operation;

    /// Run one simulation.
    ///
    /// On budget exhaustion the model returns the prefix of the profile
    /// computed so far, flagged with
    /// [`Diagnostic::BudgetExhausted`](crate::result::Diagnostic::BudgetExhausted).
    fn simulate(&self, params: &ParameterSet, budget: &mut Budget) -> SimulationResult;
}

/// Construct the solver bound to `operation`.
///
/// Called once per catalog slot during startup.
pub(crate) fn solver_for(operation: Operation) -> Box<dyn UnitModel> {
    match operation {
        Operation::BatchReactor => Box::new(batch::BatchReactor),
        Operation::SemiBatchReactor => Box::new(semi_batch::SemiBatchReactor),
        Operation::Cstr => Box::new(cstr::Cstr),
        Operation::Pfr => Box::new(pfr::PlugFlowReactor),
        Operation::Crushers => Box::new(crushers::Crushers),
        Operation::FilterPress => Box::new(filter_press::FilterPress),
        Operation::RotaryVacuumFilter => Box::new(rotary_filter::RotaryVacuumFilter),
        Operation::CentrifugeFlotation => {
            Box::new(centrifuge_flotation::CentrifugeFlotation)
        }
        Operation::Classifiers => Box::new(classifiers::Classifiers),
        Operation::Trommel => Box::new(trommel::Trommel),
    }
}

/// `count` evenly spaced samples of `[lo, hi]`, endpoints included.
///
/// Sample positions come from the index so the last sample lands on `hi`
/// to machine precision.
pub(crate) fn linspace(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    debug_assert!(count >= 2);
    let step = (hi - lo) / (count - 1) as f64;
    (0..count).map(|i| lo + step * i as f64).collect()
}

/// Standard gravitational acceleration (m/s²), shared by the settling
/// correlations.
pub(crate) const GRAVITY: f64 = 9.80665;
