//! Simulation results and output schemas
//!
//! A run produces exactly one [`SimulationResult`]: a columnar record of
//! the model's natural independent variable (time for batch processes,
//! axial position for the PFR, drum angle for rotary equipment) together
//! with one column per output series, a handful of scalar summary outputs
//! (specific energy, cut size, ...), any [`Diagnostic`] flags the solver
//! raised, and the full [`ParameterSet`] that produced it.
//!
//! Results are immutable after construction — formatting and reporting
//! collaborators only ever borrow them.

use std::fmt;

use nalgebra::DVector;

use crate::operation::Operation;
use crate::params::ParameterSet;

// =================================================================================================
// Output Schema
// =================================================================================================

/// Physical expectation attached to an output series.
///
/// Checked by tests and by [`Expectation::check`]; models are written so
/// that the expectation always holds for valid inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// No constraint beyond being finite
    Free,

    /// Every sample `>= 0` (volumes, thicknesses, sizes)
    NonNegative,

    /// Every sample in `[0, 1]` (conversions, recoveries, efficiencies)
    UnitInterval,

    /// Non-negative and monotonically non-decreasing (cumulative volumes)
    NonDecreasing,
}

impl Expectation {
    /// True when `values` satisfies this expectation.
    pub fn check(&self, values: &DVector<f64>) -> bool {
        if values.iter().any(|v| !v.is_finite()) {
            return false;
        }
        match self {
            Expectation::Free => true,
            Expectation::NonNegative => values.iter().all(|&v| v >= 0.0),
            Expectation::UnitInterval => {
                values.iter().all(|&v| (0.0..=1.0).contains(&v))
            }
            Expectation::NonDecreasing => {
                values.iter().all(|&v| v >= 0.0)
                    && values.as_slice().windows(2).all(|w| w[1] >= w[0])
            }
        }
    }
}

/// Declaration of one output series (or of the independent variable).
#[derive(Debug, Clone, Copy)]
pub struct SeriesSpec {
    /// Series name, used as the column key (`"concentration"`, ...)
    pub name: &'static str,

    /// Semantic unit (`"mol/L"`, `"m3"`, ...)
    pub unit: &'static str,

    /// Physical expectation on the sample values
    pub expectation: Expectation,
}

/// Output contract of one unit operation.
///
/// Fixed per [`Operation`]; the result a model builds must list its series
/// in exactly this order.
#[derive(Debug, Clone, Copy)]
pub struct OutputSpec {
    /// Independent variable (time, axial position, drum angle, size)
    pub independent: SeriesSpec,

    /// Output series, one column each
    pub series: &'static [SeriesSpec],

    /// Scalar summary outputs (name, unit); values are per-run
    pub scalars: &'static [(&'static str, &'static str)],
}

impl OutputSpec {
    /// Look up a series declaration by name.
    pub fn series_spec(&self, name: &str) -> Option<&'static SeriesSpec> {
        self.series.iter().find(|s| s.name == name)
    }
}

// =================================================================================================
// Diagnostics
// =================================================================================================

/// Non-fatal condition raised during a successful run.
///
/// The run still returns usable data; collaborators decide how to surface
/// the flag to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// The CSTR balance admitted more than one physical steady state
    MultipleSteadyStates { count: usize },

    /// A negative intermediate (concentration, volume, thickness) was
    /// clamped to zero instead of propagating
    ClampedNegative { series: &'static str },

    /// The step/wall-clock budget ran out; the result is a valid prefix
    BudgetExhausted { completed_steps: usize },

    /// Space time below 1e-6: effluent effectively equals feed
    NearZeroResidenceTime,

    /// Semi-batch feed term dominated the reaction term; sub-stepping
    /// was engaged
    StiffFeedTerm,

    /// Crusher product size is not smaller than the feed size
    NoReduction,

    /// Trommel driven at or above critical speed: charge centrifuges and
    /// screening stops
    AboveCriticalSpeed,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MultipleSteadyStates { count } => {
                write!(f, "{count} steady states satisfy the CSTR balance")
            }
            Diagnostic::ClampedNegative { series } => {
                write!(f, "negative `{series}` intermediate clamped to zero")
            }
            Diagnostic::BudgetExhausted { completed_steps } => {
                write!(f, "budget exhausted after {completed_steps} steps; partial result")
            }
            Diagnostic::NearZeroResidenceTime => {
                write!(f, "near-zero residence time")
            }
            Diagnostic::StiffFeedTerm => {
                write!(f, "feed term stiff relative to reaction term; step size reduced")
            }
            Diagnostic::NoReduction => {
                write!(f, "product size is not smaller than feed size")
            }
            Diagnostic::AboveCriticalSpeed => {
                write!(f, "drum at or above critical speed")
            }
        }
    }
}

// =================================================================================================
// Scalars
// =================================================================================================

/// Single-number summary output of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    pub name: &'static str,
    pub unit: &'static str,
    pub value: f64,
}

// =================================================================================================
// Simulation Result
// =================================================================================================

/// Outcome of a single run. Immutable after construction.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    operation: Operation,
    independent: DVector<f64>,
    series: Vec<(&'static str, DVector<f64>)>,
    scalars: Vec<Scalar>,
    diagnostics: Vec<Diagnostic>,
    params: ParameterSet,
}

impl SimulationResult {
    /// Operation that produced this result.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Samples of the independent variable, in order.
    pub fn independent(&self) -> &DVector<f64> {
        &self.independent
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.independent.len()
    }

    /// True when the run produced no samples.
    pub fn is_empty(&self) -> bool {
        self.independent.is_empty()
    }

    /// A named output series.
    pub fn series(&self, name: &str) -> Option<&DVector<f64>> {
        self.series
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// All series in declaration order.
    pub fn all_series(&self) -> &[(&'static str, DVector<f64>)] {
        &self.series
    }

    /// Scalar summary outputs.
    pub fn scalars(&self) -> &[Scalar] {
        &self.scalars
    }

    /// A named scalar value.
    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.scalars.iter().find(|s| s.name == name).map(|s| s.value)
    }

    /// Diagnostic flags raised during the run.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// True when the given diagnostic was raised.
    pub fn has_diagnostic(&self, diagnostic: &Diagnostic) -> bool {
        self.diagnostics.contains(diagnostic)
    }

    /// Parameter set that produced this result (full provenance).
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }
}

// =================================================================================================
// Result Builder
// =================================================================================================

/// Incremental constructor used by the model library.
///
/// Models push series and scalars as they compute them, then seal the
/// result with [`ResultBuilder::finish`].
#[derive(Debug)]
pub struct ResultBuilder {
    operation: Operation,
    independent: Vec<f64>,
    series: Vec<(&'static str, Vec<f64>)>,
    scalars: Vec<Scalar>,
    diagnostics: Vec<Diagnostic>,
}

impl ResultBuilder {
    /// Start a result for `operation` with the given independent samples.
    pub fn new(operation: Operation, independent: Vec<f64>) -> Self {
        Self {
            operation,
            independent,
            series: Vec::new(),
            scalars: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Add an output series. Length must match the independent variable.
    pub fn series(mut self, name: &'static str, values: Vec<f64>) -> Self {
        debug_assert_eq!(
            values.len(),
            self.independent.len(),
            "series `{name}` length must match independent variable",
        );
        self.series.push((name, values));
        self
    }

    /// Add a scalar summary output.
    pub fn scalar(mut self, name: &'static str, unit: &'static str, value: f64) -> Self {
        self.scalars.push(Scalar { name, unit, value });
        self
    }

    /// Raise a diagnostic flag (deduplicated).
    pub fn diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        if !self.diagnostics.contains(&diagnostic) {
            self.diagnostics.push(diagnostic);
        }
        self
    }

    /// Raise a diagnostic through a mutable reference (for loop bodies).
    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        if !self.diagnostics.contains(&diagnostic) {
            self.diagnostics.push(diagnostic);
        }
    }

    /// Seal the result, attaching provenance.
    pub fn finish(self, params: &ParameterSet) -> SimulationResult {
        SimulationResult {
            operation: self.operation,
            independent: DVector::from_vec(self.independent),
            series: self
                .series
                .into_iter()
                .map(|(n, v)| (n, DVector::from_vec(v)))
                .collect(),
            scalars: self.scalars,
            diagnostics: self.diagnostics,
            params: params.clone(),
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
