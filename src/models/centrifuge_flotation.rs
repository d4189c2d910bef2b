//! Centrifuge sizing and flotation recovery
//!
//! The laboratory bench pairs two separations driven by density
//! differences:
//!
//! # Centrifuge
//!
//! Relative centrifugal force and Stokes-regime settling:
//!
//! ```text
//! G   = ω²·r / g                    (ω = 2πN/60)
//! v_g = d²·Δρ·g / (18·μ)            (settling at 1 g)
//! v_c = G·v_g                       (settling in the bowl)
//! ```
//!
//! Separation efficiency follows sigma theory: a bowl with equivalent
//! settling area `Σ` captures a particle class completely when
//! `v_g·Σ ≥ Q`, so `η = min(1, v_g·Σ/Q)`.
//!
//! # Flotation
//!
//! Recovery approaches its asymptote first-order in residence time:
//!
//! ```text
//! R(t) = R∞·(1 - e^{-k_f·t})
//! ```

use crate::models::{linspace, UnitModel, GRAVITY};
use crate::numeric::Budget;
use crate::operation::Operation;
use crate::params::{ParamSchema, ParamSpec, ParameterSet};
use crate::result::{
    Diagnostic, Expectation, OutputSpec, ResultBuilder, SeriesSpec, SimulationResult,
};

pub(crate) static SCHEMA: ParamSchema = ParamSchema::new(&[
    ParamSpec { name: "bowl_radius", unit: "m", min: 0.01, max: 2.0, default: 0.1 },
    ParamSpec { name: "speed", unit: "rpm", min: 100.0, max: 20000.0, default: 3000.0 },
    ParamSpec { name: "particle_diameter", unit: "um", min: 0.1, max: 1000.0, default: 10.0 },
    ParamSpec { name: "density_difference", unit: "kg/m3", min: 10.0, max: 5000.0, default: 500.0 },
    ParamSpec { name: "viscosity", unit: "Pa·s", min: 1e-4, max: 1.0, default: 1e-3 },
    ParamSpec { name: "flow_rate", unit: "L/min", min: 0.01, max: 1000.0, default: 10.0 },
    ParamSpec { name: "sigma_area", unit: "m2", min: 1.0, max: 1e5, default: 500.0 },
    ParamSpec { name: "max_recovery", unit: "-", min: 0.0, max: 1.0, default: 0.9 },
    ParamSpec { name: "flotation_rate", unit: "1/min", min: 0.01, max: 10.0, default: 0.5 },
    ParamSpec { name: "t_end", unit: "min", min: 0.1, max: 120.0, default: 10.0 },
    ParamSpec { name: "resolution", unit: "points", min: 10.0, max: 10000.0, default: 200.0 },
]);

pub(crate) static OUTPUT: OutputSpec = OutputSpec {
    independent: SeriesSpec {
        name: "time",
        unit: "min",
        expectation: Expectation::NonDecreasing,
    },
    series: &[SeriesSpec {
        name: "recovery",
        unit: "-",
        expectation: Expectation::UnitInterval,
    }],
    scalars: &[
        ("g_force", "-"),
        ("settling_velocity", "m/s"),
        ("centrifugal_velocity", "m/s"),
        ("separation_efficiency", "-"),
    ],
};

/// Centrifuge and flotation solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct CentrifugeFlotation;

impl UnitModel for CentrifugeFlotation {
    fn operation(&self) -> Operation {
        Operation::CentrifugeFlotation
    }

    fn simulate(&self, params: &ParameterSet, budget: &mut Budget) -> SimulationResult {
        let radius = params.get("bowl_radius");
        let speed = params.get("speed");
        let diameter_m = params.get("particle_diameter") * 1e-6;
        let delta_rho = params.get("density_difference");
        let viscosity = params.get("viscosity");
        let flow_m3s = params.get("flow_rate") / 60000.0;
        let sigma = params.get("sigma_area");
        let r_inf = params.get("max_recovery");
        let k_f = params.get("flotation_rate");
        let t_end = params.get("t_end");
        let points = params.get("resolution") as usize;

        // ====== Centrifuge scalars ======

        let omega = 2.0 * std::f64::consts::PI * speed / 60.0;
        let g_force = omega * omega * radius / GRAVITY;
        let v_g = diameter_m * diameter_m * delta_rho * GRAVITY / (18.0 * viscosity);
        let v_c = g_force * v_g;
        let efficiency = (v_g * sigma / flow_m3s).min(1.0);

        log::debug!("centrifuge: G = {g_force:.0}, v_g = {v_g:.3e} m/s, eta = {efficiency:.3}");

        // ====== Flotation recovery profile ======

        let times = linspace(0.0, t_end, points);
        let mut recovery = Vec::with_capacity(points);
        let mut exhausted = false;

        for &t in &times {
            if !budget.try_consume(1) {
                exhausted = true;
                break;
            }
            recovery.push(r_inf * (1.0 - (-k_f * t).exp()));
        }

        let completed = recovery.len();
        let times: Vec<f64> = times.into_iter().take(completed).collect();

        let mut builder = ResultBuilder::new(Operation::CentrifugeFlotation, times)
            .series("recovery", recovery)
            .scalar("g_force", "-", g_force)
            .scalar("settling_velocity", "m/s", v_g)
            .scalar("centrifugal_velocity", "m/s", v_c)
            .scalar("separation_efficiency", "-", efficiency);

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
        CentrifugeFlotation.simulate(&params, &mut Budget::unlimited())
    }

    #[test]
    fn test_g_force() {
        // 3000 rpm, r = 0.1 m: omega = 100π/s, G = omega²r/g ≈ 1006.6
        let result = run(&[]);

        let omega = 2.0 * std::f64::consts::PI * 3000.0 / 60.0;
        assert_relative_eq!(
            result.scalar("g_force").unwrap(),
            omega * omega * 0.1 / GRAVITY,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_stokes_velocity_quadratic_in_diameter() {
        let small = run(&[("particle_diameter", 5.0)]);
        let large = run(&[("particle_diameter", 10.0)]);

        assert_relative_eq!(
            large.scalar("settling_velocity").unwrap(),
            4.0 * small.scalar("settling_velocity").unwrap(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_efficiency_saturates_at_one() {
        // Huge sigma area and coarse particles: everything settles.
        let result = run(&[("sigma_area", 1e5), ("particle_diameter", 500.0)]);
        assert_eq!(result.scalar("separation_efficiency"), Some(1.0));
    }

    #[test]
    fn test_recovery_approaches_asymptote() {
        let result = run(&[("t_end", 60.0)]);
        let r = result.series("recovery").unwrap();

        assert_eq!(r[0], 0.0);
        assert!(Expectation::UnitInterval.check(r));
        // After 60 min at k = 0.5/min the exponential is ~1e-13 from R∞.
        assert_relative_eq!(r[r.len() - 1], 0.9, max_relative = 1e-9);
        // Monotone approach.
        assert!(r.as_slice().windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_recovery_half_life() {
        // R(t½)/R∞ = 0.5 at t½ = ln 2 / k_f.
        let result = run(&[("flotation_rate", 0.6931471805599453), ("t_end", 10.0), ("resolution", 1001.0)]);
        let r = result.series("recovery").unwrap();
        let t = result.independent();

        let idx = t.iter().position(|&x| (x - 1.0).abs() < 1e-9).unwrap();
        assert_relative_eq!(r[idx], 0.45, max_relative = 1e-9); // 0.9 * 0.5
    }
}
