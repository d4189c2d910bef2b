//! Numerical methods shared by the model library
//!
//! The engine separates physics from numerics the same way throughout:
//! model modules define the governing equations, this module provides the
//! machinery that solves them.
//!
//! - [`integrate`]: fixed-step fourth-order Runge-Kutta over
//!   `nalgebra::DVector` states, with built-in non-negativity clamping
//!   (the shared numeric policy — concentrations, volumes and thicknesses
//!   are clamped at zero and flagged rather than allowed to go negative
//!   or turn into NaN).
//! - [`roots`]: deterministic enumeration of all roots of a scalar
//!   function on a bounded interval, by fixed-resolution scan followed by
//!   bisection refinement of each bracketed sign change.
//! - [`Budget`]: shared step/wall-clock budget threaded through every
//!   solver so a pathological parameter combination degrades into a
//!   partial result instead of a hung run.

mod budget;
pub mod integrate;
pub mod roots;

pub use budget::Budget;
pub use integrate::{rk4_step, Integration};
