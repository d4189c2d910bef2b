//! chemengsim: Chemical-Engineering Laboratory Simulation Engine
//!
//! Simulation engine behind an educational laboratory bench: ten unit
//! operations (batch, semi-batch, CSTR and plug-flow reactors, crushers,
//! filter press, rotary vacuum filter, centrifuge/flotation, hydraulic
//! classifiers and a trommel screen), each solved from its governing
//! equations into presentation-ready profiles.
//!
//! # Architecture
//!
//! The engine separates concerns into four layers:
//!
//! 1. **Parameter model** ([`params`]): WHAT the caller may specify.
//!    Typed schemas with units, ranges and defaults; strict validation,
//!    never silent clamping.
//! 2. **Model library** ([`models`]): the physics. One solver per
//!    operation behind the shared [`UnitModel`](models::UnitModel)
//!    contract, deterministic and free of shared mutable state.
//! 3. **Simulation runner** ([`runner`]): dispatch and guard rails.
//!    Id resolution against the explicit [`Catalog`](operation::Catalog),
//!    validation, and a per-run step/wall-clock budget that turns
//!    pathological inputs into flagged partial results instead of hangs.
//! 4. **Result formatter** ([`output`]): pure views of a
//!    [`SimulationResult`](result::SimulationResult) for tables, charts
//!    and CSV downloads.
//!
//! # Quick start
//!
//! ```rust
//! use std::collections::HashMap;
//! use chemengsim::Runner;
//!
//! let runner = Runner::new();
//!
//! // Batch reactor: C0 = 1 mol/L, k = 0.1 /min, first order, 20 min.
//! let raw = HashMap::from([
//!     ("k".to_string(), 0.1),
//!     ("t_end".to_string(), 20.0),
//! ]);
//! let result = runner.run("batch_reactor", &raw)?;
//!
//! let conversion = result.series("conversion").unwrap();
//! assert!((conversion[conversion.len() - 1] - 0.865).abs() < 1e-3);
//! # Ok::<(), chemengsim::RunError>(())
//! ```
//!
//! # Error handling
//!
//! Three kinds of failure, all returned as values:
//!
//! - [`ValidationError`](params::ValidationError): bad input, names the
//!   parameter and the violated bound; the caller re-prompts,
//! - [`Diagnostic`](result::Diagnostic): non-fatal flags on a usable
//!   result (steady-state multiplicity, clamped negatives, exhausted
//!   budget),
//! - [`RunError::UnknownOperation`](runner::RunError): an id outside the
//!   closed operation set; an integration bug, aborted without output.
//!
//! # Concurrency
//!
//! Runs are single-shot, synchronous and stateless: the only process-wide
//! shared state is the read-only operation catalog, so one [`Runner`] can
//! serve any number of sessions concurrently without locking.

pub mod models;
pub mod numeric;
pub mod operation;
pub mod output;
pub mod params;
pub mod result;
pub mod runner;

pub use operation::{Catalog, Operation};
pub use params::{ParamSchema, ParamSpec, ParameterSet, ValidationError};
pub use result::{Diagnostic, Expectation, OutputSpec, SeriesSpec, SimulationResult};
pub use runner::{BudgetPolicy, RunError, Runner};

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use chemengsim::prelude::*;
    //! ```
    pub use crate::models::UnitModel;
    pub use crate::numeric::Budget;
    pub use crate::operation::{Catalog, Operation};
    pub use crate::output::{series_pairs, CsvConfig, Table};
    pub use crate::params::{ParameterSet, ValidationError};
    pub use crate::result::{Diagnostic, SimulationResult};
    pub use crate::runner::{RunError, Runner};
}
