//! Parameter schemas and validation
//!
//! Every unit operation declares its input contract as a [`ParamSchema`]:
//! an ordered list of [`ParamSpec`] entries, each carrying the parameter
//! name, its semantic unit, the valid `[min, max]` range and a default.
//!
//! Validation is pure and strict:
//!
//! - a raw input that is absent takes the declared default (configuration
//!   behaviour, not an error),
//! - a raw input that is present but non-finite or out of range produces a
//!   [`ValidationError`] naming the parameter, the offending value and the
//!   violated bound — values are **never** silently clamped,
//! - a raw input whose name the schema does not declare is rejected; the
//!   calling form cannot produce one, so receiving one is an integration
//!   bug worth surfacing early.
//!
//! The output of a successful validation is an immutable [`ParameterSet`].

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

// =================================================================================================
// Parameter Specification
// =================================================================================================

/// Declaration of a single numeric parameter.
///
/// `const`-constructible so that each model module can declare its schema
/// as a static table.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    /// Parameter name, as the caller supplies it (`"k"`, `"delta_p"`, ...)
    pub name: &'static str,

    /// Semantic unit, for display and table headers (`"mol/L"`, `"Pa"`, ...)
    pub unit: &'static str,

    /// Lower bound (inclusive)
    pub min: f64,

    /// Upper bound (inclusive)
    pub max: f64,

    /// Value used when the raw input omits this parameter
    pub default: f64,
}

impl ParamSpec {
    /// Check a candidate value against this spec.
    fn check(&self, value: f64) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite {
                parameter: self.name,
                value,
            });
        }
        if value < self.min {
            return Err(ValidationError::BelowMinimum {
                parameter: self.name,
                value,
                bound: self.min,
            });
        }
        if value > self.max {
            return Err(ValidationError::AboveMaximum {
                parameter: self.name,
                value,
                bound: self.max,
            });
        }
        Ok(())
    }
}

// =================================================================================================
// Validation Errors
// =================================================================================================

/// Rejected raw input.
///
/// Always recoverable: the caller re-prompts with a corrected value.
/// Each variant names the offending parameter and, where one exists, the
/// violated bound, so collaborators can point the user at the exact field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value below the declared minimum
    #[error("parameter `{parameter}` = {value} violates lower bound {bound}")]
    BelowMinimum {
        parameter: &'static str,
        value: f64,
        bound: f64,
    },

    /// Value above the declared maximum
    #[error("parameter `{parameter}` = {value} violates upper bound {bound}")]
    AboveMaximum {
        parameter: &'static str,
        value: f64,
        bound: f64,
    },

    /// NaN or infinite input
    #[error("parameter `{parameter}` = {value} is not a finite number")]
    NotFinite { parameter: &'static str, value: f64 },

    /// Name not declared by the targeted operation's schema
    #[error("parameter `{parameter}` is not declared by this operation")]
    UnknownParameter { parameter: String },
}

impl ValidationError {
    /// Name of the parameter this error refers to.
    pub fn parameter(&self) -> &str {
        match self {
            ValidationError::BelowMinimum { parameter, .. }
            | ValidationError::AboveMaximum { parameter, .. }
            | ValidationError::NotFinite { parameter, .. } => parameter,
            ValidationError::UnknownParameter { parameter } => parameter,
        }
    }

    /// The violated bound, when the error is a range violation.
    pub fn bound(&self) -> Option<f64> {
        match self {
            ValidationError::BelowMinimum { bound, .. }
            | ValidationError::AboveMaximum { bound, .. } => Some(*bound),
            _ => None,
        }
    }
}

// =================================================================================================
// Parameter Schema
// =================================================================================================

/// Ordered input contract of one unit operation.
#[derive(Debug, Clone, Copy)]
pub struct ParamSchema {
    specs: &'static [ParamSpec],
}

impl ParamSchema {
    /// Wrap a static spec table.
    pub const fn new(specs: &'static [ParamSpec]) -> Self {
        Self { specs }
    }

    /// Declared parameters, in schema order.
    pub fn specs(&self) -> &'static [ParamSpec] {
        self.specs
    }

    /// Look up a declared parameter by name.
    pub fn spec(&self, name: &str) -> Option<&'static ParamSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    /// Validate raw inputs against this schema.
    ///
    /// Missing entries take their defaults; out-of-range, non-finite and
    /// undeclared entries fail with the first violation found (schema order
    /// for declared parameters, then unknown keys).
    pub fn validate(
        &self,
        raw: &HashMap<String, f64>,
    ) -> Result<ParameterSet, ValidationError> {
        let mut values = BTreeMap::new();

        for spec in self.specs {
            let value = match raw.get(spec.name) {
                Some(&v) => {
                    spec.check(v)?;
                    v
                }
                None => spec.default,
            };
            values.insert(spec.name, value);
        }

        if let Some(name) = raw.keys().find(|k| self.spec(k).is_none()) {
            return Err(ValidationError::UnknownParameter {
                parameter: name.clone(),
            });
        }

        Ok(ParameterSet { values })
    }

    /// A `ParameterSet` holding every default. Cannot fail: defaults are
    /// required to lie inside their own ranges.
    pub fn defaults(&self) -> ParameterSet {
        let values = self
            .specs
            .iter()
            .map(|s| (s.name, s.default))
            .collect();
        ParameterSet { values }
    }
}

// =================================================================================================
// Parameter Set
// =================================================================================================

/// Validated, immutable name → value mapping for one run.
///
/// Constructed only through [`ParamSchema::validate`] (or
/// [`ParamSchema::defaults`]), so every declared parameter is guaranteed
/// present and in range. Carried on the [`SimulationResult`] as provenance.
///
/// [`SimulationResult`]: crate::result::SimulationResult
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    values: BTreeMap<&'static str, f64>,
}

impl ParameterSet {
    /// Value of a declared parameter.
    ///
    /// # Panics
    ///
    /// Panics when `name` was not declared by the schema this set was
    /// validated against. Models only ask for names from their own schema,
    /// so a panic here is a programming error, not a user error.
    pub fn get(&self, name: &str) -> f64 {
        match self.values.get(name) {
            Some(&v) => v,
            None => panic!("parameter `{name}` not present in validated set"),
        }
    }

    /// Iterate `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.values.iter().map(|(&k, &v)| (k, v))
    }

    /// Number of parameters in the set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the set holds no parameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SPECS: &[ParamSpec] = &[
        ParamSpec { name: "k", unit: "1/min", min: 0.0, max: 10.0, default: 0.1 },
        ParamSpec { name: "c0", unit: "mol/L", min: 0.01, max: 100.0, default: 1.0 },
    ];

    const SCHEMA: ParamSchema = ParamSchema::new(SPECS);

    #[test]
    fn test_defaults_fill_missing_inputs() {
        let raw = HashMap::from([("k".to_string(), 0.5)]);
        let set = SCHEMA.validate(&raw).unwrap();

        assert_eq!(set.get("k"), 0.5);
        assert_eq!(set.get("c0"), 1.0);
    }

    #[test]
    fn test_below_minimum_names_parameter_and_bound() {
        let raw = HashMap::from([("k".to_string(), -0.1)]);
        let err = SCHEMA.validate(&raw).unwrap_err();

        assert_eq!(err.parameter(), "k");
        assert_eq!(err.bound(), Some(0.0));
        assert!(matches!(err, ValidationError::BelowMinimum { .. }));
    }

    #[test]
    fn test_above_maximum_rejected() {
        let raw = HashMap::from([("c0".to_string(), 500.0)]);
        let err = SCHEMA.validate(&raw).unwrap_err();

        assert_eq!(err.parameter(), "c0");
        assert_eq!(err.bound(), Some(100.0));
    }

    #[test]
    fn test_nan_rejected() {
        let raw = HashMap::from([("k".to_string(), f64::NAN)]);
        let err = SCHEMA.validate(&raw).unwrap_err();

        assert!(matches!(err, ValidationError::NotFinite { parameter: "k", .. }));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let raw = HashMap::from([("pressure".to_string(), 1.0)]);
        let err = SCHEMA.validate(&raw).unwrap_err();

        assert_eq!(err.parameter(), "pressure");
    }

    #[test]
    fn test_boundary_values_accepted() {
        let raw = HashMap::from([
            ("k".to_string(), 0.0),
            ("c0".to_string(), 100.0),
        ]);
        let set = SCHEMA.validate(&raw).unwrap();

        assert_eq!(set.get("k"), 0.0);
        assert_eq!(set.get("c0"), 100.0);
    }

    #[test]
    fn test_defaults_set_is_complete() {
        let set = SCHEMA.defaults();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("k"), 0.1);
    }
}
