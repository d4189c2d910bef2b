//! Trommel screen
//!
//! # Model
//!
//! A rotating inclined drum screen. The drum must run well below its
//! critical speed — the speed at which charge centrifuges against the
//! shell and screening stops:
//!
//! ```text
//! Nc = 42.3 / √D     (rpm, drum diameter D in m)
//! ```
//!
//! A particle meets the screen surface roughly once per drum revolution;
//! the axial advance per revolution is `π·D·tan β` for inclination `β`,
//! so a drum of length `L` offers
//!
//! ```text
//! np = max(1, L / (π·D·tan β))
//! ```
//!
//! presentations. The per-presentation passage probability for a particle
//! of size `d` through an aperture `a` is the classical projected-opening
//! form `p = (1 - d/a)²` for `d < a`, zero otherwise, and the overall
//! recovery to undersize is `1 - (1-p)^np`.

use crate::models::{linspace, UnitModel};
use crate::numeric::Budget;
use crate::operation::Operation;
use crate::params::{ParamSchema, ParamSpec, ParameterSet};
use crate::result::{
    Diagnostic, Expectation, OutputSpec, ResultBuilder, SeriesSpec, SimulationResult,
};

pub(crate) static SCHEMA: ParamSchema = ParamSchema::new(&[
    ParamSpec { name: "drum_diameter", unit: "m", min: 0.1, max: 5.0, default: 1.0 },
    ParamSpec { name: "drum_length", unit: "m", min: 0.5, max: 20.0, default: 3.0 },
    ParamSpec { name: "speed", unit: "rpm", min: 1.0, max: 100.0, default: 15.0 },
    ParamSpec { name: "inclination", unit: "deg", min: 1.0, max: 30.0, default: 5.0 },
    ParamSpec { name: "aperture", unit: "mm", min: 1.0, max: 200.0, default: 10.0 },
    ParamSpec { name: "max_size", unit: "mm", min: 1.0, max: 400.0, default: 20.0 },
    ParamSpec { name: "resolution", unit: "points", min: 10.0, max: 10000.0, default: 100.0 },
]);

pub(crate) static OUTPUT: OutputSpec = OutputSpec {
    independent: SeriesSpec {
        name: "particle_size",
        unit: "mm",
        expectation: Expectation::NonDecreasing,
    },
    series: &[
        SeriesSpec {
            name: "passage_probability",
            unit: "-",
            expectation: Expectation::UnitInterval,
        },
        SeriesSpec {
            name: "recovery",
            unit: "-",
            expectation: Expectation::UnitInterval,
        },
    ],
    scalars: &[
        ("critical_speed", "rpm"),
        ("speed_ratio", "-"),
        ("presentations", "-"),
        ("cut_size", "mm"),
    ],
};

/// Trommel screen solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trommel;

impl UnitModel for Trommel {
    fn operation(&self) -> Operation {
        Operation::Trommel
    }

    fn simulate(&self, params: &ParameterSet, budget: &mut Budget) -> SimulationResult {
        let diameter = params.get("drum_diameter");
        let length = params.get("drum_length");
        let speed = params.get("speed");
        let inclination = params.get("inclination").to_radians();
        let aperture = params.get("aperture");
        let max_size = params.get("max_size");
        let points = params.get("resolution") as usize;

        let critical_speed = 42.3 / diameter.sqrt();
        let speed_ratio = speed / critical_speed;
        let centrifuging = speed_ratio >= 1.0;

        let advance_per_rev = std::f64::consts::PI * diameter * inclination.tan();
        let presentations = (length / advance_per_rev).max(1.0);

        if centrifuging {
            log::warn!(
                "trommel at {speed:.1} rpm >= critical {critical_speed:.1} rpm: charge centrifuges"
            );
        }

        let passage = |d: f64| -> f64 {
            if centrifuging || d >= aperture {
                0.0
            } else {
                let p = (1.0 - d / aperture).powi(2);
                p.clamp(0.0, 1.0)
            }
        };

        let sizes = linspace(0.0, max_size, points);
        let mut probability = Vec::with_capacity(points);
        let mut recovery = Vec::with_capacity(points);
        let mut exhausted = false;

        for &d in &sizes {
            if !budget.try_consume(1) {
                exhausted = true;
                break;
            }
            let p = passage(d);
            probability.push(p);
            recovery.push(1.0 - (1.0 - p).powf(presentations));
        }

        // Size recovered to undersize with 50 % probability:
        // (1-p)^np = 0.5 gives p* = 1 - 0.5^(1/np), d50 = a·(1 - sqrt(p*)).
        let cut_size = if centrifuging {
            0.0
        } else {
            let p_star = 1.0 - 0.5f64.powf(1.0 / presentations);
            aperture * (1.0 - p_star.sqrt())
        };

        let completed = probability.len();
        let sizes: Vec<f64> = sizes.into_iter().take(completed).collect();

        let mut builder = ResultBuilder::new(Operation::Trommel, sizes)
            .series("passage_probability", probability)
            .series("recovery", recovery)
            .scalar("critical_speed", "rpm", critical_speed)
            .scalar("speed_ratio", "-", speed_ratio)
            .scalar("presentations", "-", presentations)
            .scalar("cut_size", "mm", cut_size);

        if centrifuging {
            builder = builder.diagnostic(Diagnostic::AboveCriticalSpeed);
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    fn run(raw: &[(&str, f64)]) -> SimulationResult {
        let raw: HashMap<String, f64> =
            raw.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        let params = SCHEMA.validate(&raw).unwrap();
        Trommel.simulate(&params, &mut Budget::unlimited())
    }

    #[test]
    fn test_critical_speed() {
        // D = 1 m: Nc = 42.3 rpm.
        let result = run(&[]);

        assert_relative_eq!(result.scalar("critical_speed").unwrap(), 42.3, epsilon = 1e-12);
        assert_relative_eq!(
            result.scalar("speed_ratio").unwrap(),
            15.0 / 42.3,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_oversize_never_passes() {
        let result = run(&[]);

        let sizes = result.independent();
        let p = result.series("passage_probability").unwrap();
        let r = result.series("recovery").unwrap();
        for i in 0..sizes.len() {
            if sizes[i] >= 10.0 {
                assert_eq!(p[i], 0.0);
                assert_eq!(r[i], 0.0);
            }
        }
    }

    #[test]
    fn test_fines_fully_recovered() {
        let result = run(&[]);

        let r = result.series("recovery").unwrap();
        // d = 0 passes with p = 1 on the first presentation.
        assert_relative_eq!(r[0], 1.0, epsilon = 1e-12);
        assert!(Expectation::UnitInterval.check(r));
    }

    #[test]
    fn test_recovery_monotone_decreasing_in_size() {
        let result = run(&[("resolution", 500.0)]);

        let r = result.series("recovery").unwrap();
        assert!(r.as_slice().windows(2).all(|w| w[1] <= w[0] + 1e-12));
    }

    #[test]
    fn test_above_critical_speed_stops_screening() {
        let result = run(&[("speed", 50.0)]);

        assert!(result.has_diagnostic(&Diagnostic::AboveCriticalSpeed));
        let r = result.series("recovery").unwrap();
        assert!(r.iter().all(|&v| v == 0.0));
        assert_eq!(result.scalar("cut_size"), Some(0.0));
    }

    #[test]
    fn test_longer_drum_recovers_more_near_misses() {
        let short = run(&[("drum_length", 1.0)]);
        let long = run(&[("drum_length", 10.0)]);

        assert!(long.scalar("presentations").unwrap() > short.scalar("presentations").unwrap());

        // Near-aperture particle benefits from extra presentations.
        let idx = 40; // 8 mm on the default 0..20 grid of 100 points
        let rs = short.series("recovery").unwrap();
        let rl = long.series("recovery").unwrap();
        assert!(rl[idx] > rs[idx]);
    }

    #[test]
    fn test_cut_size_below_aperture() {
        let result = run(&[]);
        let d50 = result.scalar("cut_size").unwrap();
        assert!(d50 > 0.0 && d50 < 10.0);
    }
}
