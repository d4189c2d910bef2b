//! Operation catalog
//!
//! The ten unit operations are a closed set, so they are an enum rather
//! than a string-keyed registry: dispatch is type-checked, and an unknown
//! id can only enter the system at the text boundary ([`Operation::from_id`]),
//! where it is an explicit error.
//!
//! The [`Catalog`] binds each operation to its solver once, at startup.
//! It is explicit and ordered — nothing is auto-discovered — so its
//! contents are independently testable and free of load-order surprises.

use crate::models::{self, UnitModel};
use crate::params::ParamSchema;
use crate::result::OutputSpec;

// =================================================================================================
// Operation
// =================================================================================================

/// One of the ten laboratory unit operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    BatchReactor,
    SemiBatchReactor,
    Cstr,
    Pfr,
    Crushers,
    FilterPress,
    RotaryVacuumFilter,
    CentrifugeFlotation,
    Classifiers,
    Trommel,
}

impl Operation {
    /// Every operation, in catalog order.
    pub const ALL: [Operation; 10] = [
        Operation::BatchReactor,
        Operation::SemiBatchReactor,
        Operation::Cstr,
        Operation::Pfr,
        Operation::Crushers,
        Operation::FilterPress,
        Operation::RotaryVacuumFilter,
        Operation::CentrifugeFlotation,
        Operation::Classifiers,
        Operation::Trommel,
    ];

    /// Stable string id used at the function-call boundary.
    pub fn id(&self) -> &'static str {
        match self {
            Operation::BatchReactor => "batch_reactor",
            Operation::SemiBatchReactor => "semi_batch_reactor",
            Operation::Cstr => "cstr",
            Operation::Pfr => "pfr",
            Operation::Crushers => "crushers",
            Operation::FilterPress => "filter_press",
            Operation::RotaryVacuumFilter => "rotary_vacuum_filter",
            Operation::CentrifugeFlotation => "centrifuge_flotation",
            Operation::Classifiers => "classifiers",
            Operation::Trommel => "trommel",
        }
    }

    /// Resolve a string id. `None` for anything outside the closed set.
    pub fn from_id(id: &str) -> Option<Operation> {
        Operation::ALL.into_iter().find(|op| op.id() == id)
    }

    /// Human-readable title for UI collaborators.
    pub fn title(&self) -> &'static str {
        match self {
            Operation::BatchReactor => "Batch Reactor",
            Operation::SemiBatchReactor => "Semi-Batch Reactor",
            Operation::Cstr => "Continuous Stirred-Tank Reactor",
            Operation::Pfr => "Plug-Flow Reactor",
            Operation::Crushers => "Crushers and Ball Mill",
            Operation::FilterPress => "Plate-and-Frame Filter Press",
            Operation::RotaryVacuumFilter => "Rotary Vacuum Filter",
            Operation::CentrifugeFlotation => "Centrifuge and Flotation",
            Operation::Classifiers => "Hydraulic Classifier",
            Operation::Trommel => "Trommel Screen",
        }
    }

    /// One-line description for UI collaborators.
    pub fn description(&self) -> &'static str {
        match self {
            Operation::BatchReactor => {
                "Isothermal batch reactor with n-th order kinetics"
            }
            Operation::SemiBatchReactor => {
                "Batch reactor with a continuous volumetric feed stream"
            }
            Operation::Cstr => {
                "Steady-state stirred tank; effluent from the algebraic balance"
            }
            Operation::Pfr => {
                "Axial concentration profile under the plug-flow assumption"
            }
            Operation::Crushers => {
                "Comminution energy by Rittinger, Kick or Bond law"
            }
            Operation::FilterPress => {
                "Constant-pressure cake filtration (Ruth equation)"
            }
            Operation::RotaryVacuumFilter => {
                "Drum filtration over form, wash and dry zones of one revolution"
            }
            Operation::CentrifugeFlotation => {
                "Centrifugal separation sizing and first-order flotation recovery"
            }
            Operation::Classifiers => {
                "Settling-balance cut size and partition curve"
            }
            Operation::Trommel => {
                "Screen passage probability versus particle size"
            }
        }
    }

    /// Input contract of this operation.
    pub fn schema(&self) -> &'static ParamSchema {
        match self {
            Operation::BatchReactor => &models::batch::SCHEMA,
            Operation::SemiBatchReactor => &models::semi_batch::SCHEMA,
            Operation::Cstr => &models::cstr::SCHEMA,
            Operation::Pfr => &models::pfr::SCHEMA,
            Operation::Crushers => &models::crushers::SCHEMA,
            Operation::FilterPress => &models::filter_press::SCHEMA,
            Operation::RotaryVacuumFilter => &models::rotary_filter::SCHEMA,
            Operation::CentrifugeFlotation => &models::centrifuge_flotation::SCHEMA,
            Operation::Classifiers => &models::classifiers::SCHEMA,
            Operation::Trommel => &models::trommel::SCHEMA,
        }
    }

    /// Output contract of this operation.
    pub fn output_spec(&self) -> &'static OutputSpec {
        match self {
            Operation::BatchReactor => &models::batch::OUTPUT,
            Operation::SemiBatchReactor => &models::semi_batch::OUTPUT,
            Operation::Cstr => &models::cstr::OUTPUT,
            Operation::Pfr => &models::pfr::OUTPUT,
            Operation::Crushers => &models::crushers::OUTPUT,
            Operation::FilterPress => &models::filter_press::OUTPUT,
            Operation::RotaryVacuumFilter => &models::rotary_filter::OUTPUT,
            Operation::CentrifugeFlotation => &models::centrifuge_flotation::OUTPUT,
            Operation::Classifiers => &models::classifiers::OUTPUT,
            Operation::Trommel => &models::trommel::OUTPUT,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

// =================================================================================================
// Catalog
// =================================================================================================

/// One catalog slot: an operation bound to its solver.
pub struct CatalogEntry {
    operation: Operation,
    model: Box<dyn UnitModel>,
}

impl CatalogEntry {
    /// The operation this entry simulates.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// The bound solver.
    pub fn model(&self) -> &dyn UnitModel {
        self.model.as_ref()
    }
}

/// Explicit, ordered catalog of every operation and its solver.
///
/// Built once during process startup and shared read-only afterwards; the
/// solvers hold no mutable state, so a `Catalog` (and the
/// [`Runner`](crate::runner::Runner) wrapping it) can serve concurrent
/// sessions without locking.
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// The standard catalog: all ten operations, in [`Operation::ALL`]
    /// order.
    pub fn standard() -> Self {
        let entries = Operation::ALL
            .into_iter()
            .map(|operation| CatalogEntry {
                operation,
                model: models::solver_for(operation),
            })
            .collect();
        Self { entries }
    }

    /// Resolve a string id against the catalog.
    pub fn resolve(&self, id: &str) -> Option<&CatalogEntry> {
        let operation = Operation::from_id(id)?;
        Some(self.entry(operation))
    }

    /// Entry for a statically-known operation.
    pub fn entry(&self, operation: Operation) -> &CatalogEntry {
        // standard() inserts every variant exactly once, in ALL order.
        self.entries
            .iter()
            .find(|e| e.operation == operation)
            .expect("catalog covers every operation")
    }

    /// Entries in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Number of catalog entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for the standard catalog.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_id(op.id()), Some(op));
        }
    }

    #[test]
    fn test_unknown_id_is_none() {
        assert_eq!(Operation::from_id("11"), None);
        assert_eq!(Operation::from_id(""), None);
        assert_eq!(Operation::from_id("Batch Reactor"), None);
    }

    #[test]
    fn test_standard_catalog_covers_all_ten_once() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.len(), 10);

        for op in Operation::ALL {
            let matching = catalog.iter().filter(|e| e.operation() == op).count();
            assert_eq!(matching, 1, "operation {op} must appear exactly once");
        }
    }

    #[test]
    fn test_catalog_models_match_operations() {
        let catalog = Catalog::standard();
        for entry in catalog.iter() {
            assert_eq!(entry.model().operation(), entry.operation());
        }
    }

    #[test]
    fn test_schema_defaults_in_range() {
        for op in Operation::ALL {
            for spec in op.schema().specs() {
                assert!(
                    spec.default >= spec.min && spec.default <= spec.max,
                    "{op}: default of `{}` outside its own range",
                    spec.name
                );
                assert!(spec.min <= spec.max, "{op}: inverted range on `{}`", spec.name);
            }
        }
    }
}
