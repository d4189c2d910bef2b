//! Rotary vacuum drum filter
//!
//! # Model
//!
//! One drum revolution is discretized by angle `θ ∈ [0°, 360°]` and split
//! into three timed zones, each a fraction of the cycle:
//!
//! - **form** (`θ < 360·submergence`): the drum face is submerged; the
//!   constant-pressure filtration equation (see
//!   [`filter_press`](crate::models::filter_press)) integrates with
//!   `t = θ/360 · 60/N`,
//! - **wash**: cake is rinsed; thickness holds, no new filtrate counted,
//! - **dry**: vacuum dewaters the cake; thickness holds.
//!
//! The profile reports cumulative filtrate, cake thickness and the active
//! zone per angle; capacity scales the per-revolution filtrate by the
//! rotation speed.

use nalgebra::DVector;

use crate::models::UnitModel;
use crate::numeric::{rk4_step, Budget};
use crate::operation::Operation;
use crate::params::{ParamSchema, ParamSpec, ParameterSet};
use crate::result::{
    Diagnostic, Expectation, OutputSpec, ResultBuilder, SeriesSpec, SimulationResult,
};

/// Zone indices reported in the `zone` series.
pub const ZONE_FORM: f64 = 0.0;
pub const ZONE_WASH: f64 = 1.0;
pub const ZONE_DRY: f64 = 2.0;

pub(crate) static SCHEMA: ParamSchema = ParamSchema::new(&[
    ParamSpec { name: "area", unit: "m2", min: 0.1, max: 200.0, default: 10.0 },
    ParamSpec { name: "speed", unit: "rpm", min: 0.1, max: 10.0, default: 1.0 },
    ParamSpec { name: "submergence", unit: "-", min: 0.05, max: 0.5, default: 0.3 },
    ParamSpec { name: "wash_fraction", unit: "-", min: 0.0, max: 0.3, default: 0.1 },
    // Vacuum drive: capped below one atmosphere.
    ParamSpec { name: "delta_p", unit: "Pa", min: 1e3, max: 9e4, default: 7e4 },
    ParamSpec { name: "viscosity", unit: "Pa·s", min: 1e-4, max: 1.0, default: 1e-3 },
    ParamSpec { name: "medium_resistance", unit: "1/m", min: 1e8, max: 1e13, default: 1e10 },
    ParamSpec { name: "cake_resistance", unit: "m/kg", min: 1e9, max: 1e13, default: 1e11 },
    ParamSpec { name: "slurry_conc", unit: "kg/m3", min: 0.1, max: 500.0, default: 10.0 },
    ParamSpec { name: "cake_density", unit: "kg/m3", min: 200.0, max: 3000.0, default: 1000.0 },
    ParamSpec { name: "resolution", unit: "steps", min: 10.0, max: 10000.0, default: 360.0 },
]);

pub(crate) static OUTPUT: OutputSpec = OutputSpec {
    independent: SeriesSpec {
        name: "drum_angle",
        unit: "deg",
        expectation: Expectation::NonDecreasing,
    },
    series: &[
        SeriesSpec {
            name: "filtrate_volume",
            unit: "m3",
            expectation: Expectation::NonDecreasing,
        },
        SeriesSpec {
            name: "cake_thickness",
            unit: "mm",
            expectation: Expectation::NonDecreasing,
        },
        SeriesSpec {
            name: "zone",
            unit: "-",
            expectation: Expectation::NonNegative,
        },
    ],
    scalars: &[
        ("filtrate_per_revolution", "m3"),
        ("capacity", "m3/h"),
        ("final_thickness", "mm"),
        ("cycle_time", "s"),
    ],
};

/// Rotary vacuum filter solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct RotaryVacuumFilter;

impl UnitModel for RotaryVacuumFilter {
    fn operation(&self) -> Operation {
        Operation::RotaryVacuumFilter
    }

    fn simulate(&self, params: &ParameterSet, budget: &mut Budget) -> SimulationResult {
        let area = params.get("area");
        let speed = params.get("speed");
        let submergence = params.get("submergence");
        let wash_fraction = params.get("wash_fraction");
        let delta_p = params.get("delta_p");
        let viscosity = params.get("viscosity");
        let rm = params.get("medium_resistance");
        let alpha = params.get("cake_resistance");
        let conc = params.get("slurry_conc");
        let cake_density = params.get("cake_density");
        let steps = params.get("resolution") as usize;

        let cycle_time = 60.0 / speed;
        let form_end = 360.0 * submergence;
        let wash_end = form_end + 360.0 * wash_fraction;
        let d_angle = 360.0 / steps as f64;
        // Seconds of filtration per degree of rotation.
        let dt_per_deg = cycle_time / 360.0;

        let rhs = |_t: f64, y: &DVector<f64>| {
            let resistance = alpha * conc * y[0] / area + rm;
            DVector::from_vec(vec![area * delta_p / (viscosity * resistance)])
        };

        let mut angles = Vec::with_capacity(steps + 1);
        let mut volume = Vec::with_capacity(steps + 1);
        let mut zone = Vec::with_capacity(steps + 1);
        let mut exhausted_at = None;

        let mut v = DVector::from_vec(vec![0.0]);
        angles.push(0.0);
        volume.push(0.0);
        zone.push(ZONE_FORM);

        for step in 0..steps {
            let angle = d_angle * (step + 1) as f64;

            if angle <= form_end {
                if !budget.try_consume(4) {
                    log::warn!("rotary filter budget exhausted at {angle:.1} deg");
                    exhausted_at = Some(step);
                    break;
                }
                let t = d_angle * step as f64 * dt_per_deg;
                v = rk4_step(&rhs, t, &v, d_angle * dt_per_deg);
            } else if !budget.try_consume(1) {
                exhausted_at = Some(step);
                break;
            }

            angles.push(angle);
            volume.push(v[0]);
            zone.push(if angle <= form_end {
                ZONE_FORM
            } else if angle <= wash_end {
                ZONE_WASH
            } else {
                ZONE_DRY
            });
        }

        let thickness_mm: Vec<f64> = volume
            .iter()
            .map(|&vi| 1000.0 * conc * vi / (area * cake_density))
            .collect();

        let per_rev = *volume.last().unwrap_or(&0.0);
        let final_l = *thickness_mm.last().unwrap_or(&0.0);
        let capacity = per_rev * speed * 60.0;

        let mut builder = ResultBuilder::new(Operation::RotaryVacuumFilter, angles)
            .series("filtrate_volume", volume)
            .series("cake_thickness", thickness_mm)
            .series("zone", zone)
            .scalar("filtrate_per_revolution", "m3", per_rev)
            .scalar("capacity", "m3/h", capacity)
            .scalar("final_thickness", "mm", final_l)
            .scalar("cycle_time", "s", cycle_time);

        if let Some(step) = exhausted_at {
            builder = builder.diagnostic(Diagnostic::BudgetExhausted {
                completed_steps: step,
            });
        }

        builder.finish(params)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
