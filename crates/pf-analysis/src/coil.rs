//! Coil analysis: forward (ADP + BF) or reverse (measured leaving air), with
//! per-mass or absolute loads and an optional chilled-water flow estimate.

use pf_core::UnitSystem;
use pf_process::common::{LINEAR_SEGMENTS, Loads, linear_path, total_c_factor};
use pf_process::result::push_warning;
use pf_process::{CoolingDehumidification, CoolingLeg, PathPoint, forward_leg, reverse_leg};
use pf_props::{PropertyModel, PsychrometricState, StateSpec};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context;
use crate::error::{AnalysisError, AnalysisResult};

/// Smallest water-side temperature rise used for a flow estimate.
const MIN_WATER_DELTA_T: f64 = 0.01;

/// BTU/hr per (GPM · °F): 60 min/hr × 8.33 lb/gal.
const WATER_FACTOR_IP: f64 = 500.0;
/// W per (L/s · K).
const WATER_FACTOR_SI: f64 = 4186.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoilInput {
    pub unit_system: UnitSystem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    pub entering: StateSpec,
    #[serde(flatten)]
    pub mode: CoolingDehumidification,
    /// CFM or m³/s; loads are per unit mass of dry air without it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airflow: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_entering: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_leaving: Option<f64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct CoilOutput {
    pub unit_system: UnitSystem,
    pub pressure: f64,
    pub mode: &'static str,
    pub entering: PsychrometricState,
    pub leaving: PsychrometricState,
    pub adp: PsychrometricState,
    pub bypass_factor: f64,
    pub contact_factor: f64,
    #[serde(rename = "Qs")]
    pub qs: f64,
    #[serde(rename = "Ql")]
    pub ql: f64,
    #[serde(rename = "Qt")]
    pub qt: f64,
    #[serde(rename = "SHR")]
    pub shr: f64,
    pub load_unit: &'static str,
    /// GPM or L/s
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_flow: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_flow_unit: Option<&'static str>,
    pub path: Vec<PathPoint>,
    pub warnings: Vec<String>,
}

impl CoilInput {
    fn check(&self) -> AnalysisResult<()> {
        if let Some(airflow) = self.airflow {
            if !airflow.is_finite() || airflow <= 0.0 {
                return Err(AnalysisError::validation(
                    "airflow",
                    format!("must be positive, got {airflow}"),
                ));
            }
        }
        for (field, t) in [("water_entering", self.water_entering), ("water_leaving", self.water_leaving)] {
            if matches!(t, Some(t) if !t.is_finite()) {
                return Err(AnalysisError::validation(field, "must be finite"));
            }
        }
        Ok(())
    }
}

/// Loads scaled to absolute values when airflow is known, else per unit mass.
fn coil_loads(leg: &CoolingLeg, airflow: Option<f64>) -> (Loads, &'static str) {
    let units = leg.entering.unit_system();
    let per_mass = leg.loads();
    match airflow {
        // Mass flow from the entering density; SI kJ to J folds into the factor
        Some(q) => (
            per_mass.scaled(total_c_factor(units, leg.entering.density()) * q),
            units.load_label(),
        ),
        None => (per_mass, units.enthalpy_label()),
    }
}

/// Water flow for total load `qt` carried by a water-side rise of `dt`.
fn water_flow(units: UnitSystem, qt: f64, dt: f64) -> f64 {
    match units {
        UnitSystem::IP => qt / (WATER_FACTOR_IP * dt),
        UnitSystem::SI => qt / (WATER_FACTOR_SI * dt),
    }
}

pub fn analyze_coil(model: &dyn PropertyModel, input: &CoilInput) -> AnalysisResult<CoilOutput> {
    input.check()?;
    let ctx = context(model, input.unit_system, input.pressure);
    let entering = ctx.resolve(&input.entering, "entering")?;

    let (mode, leg) = match &input.mode {
        CoolingDehumidification::Forward {
            adp_tdb,
            bypass_factor,
        } => ("forward", forward_leg(&ctx, &entering, *adp_tdb, *bypass_factor)?),
        CoolingDehumidification::Reverse { leaving } => {
            let leaving = ctx.resolve(leaving, "leaving")?;
            ("reverse", reverse_leg(&ctx, &entering, leaving)?)
        }
    };
    debug!(mode, adp = leg.adp.tdb(), bf = leg.bypass_factor, "coil leg solved");

    let (loads, load_unit) = coil_loads(&leg, input.airflow);
    let mut warnings = leg.warnings.clone();

    let water = match (input.water_entering, input.water_leaving) {
        (Some(t_in), Some(t_out)) => {
            let dt = (t_out - t_in).abs();
            if input.airflow.is_none() {
                push_warning(
                    &mut warnings,
                    "Water temperatures were given without airflow; water flow needs absolute loads.".to_string(),
                );
                None
            } else if dt < MIN_WATER_DELTA_T {
                push_warning(
                    &mut warnings,
                    format!("Water temperature rise ({dt:.3}) is too small for a flow estimate."),
                );
                None
            } else {
                Some(water_flow(input.unit_system, loads.total, dt))
            }
        }
        (None, None) => None,
        _ => {
            push_warning(
                &mut warnings,
                "Both entering and leaving water temperatures are needed for a flow estimate.".to_string(),
            );
            None
        }
    };

    let path = linear_path(
        ctx.units,
        (leg.entering.tdb(), leg.entering.w()),
        (leg.leaving.tdb(), leg.leaving.w()),
        LINEAR_SEGMENTS,
    );
    let contact_factor = leg.contact_factor();

    Ok(CoilOutput {
        unit_system: ctx.units,
        pressure: ctx.pressure,
        mode,
        entering: leg.entering,
        leaving: leg.leaving,
        adp: leg.adp,
        bypass_factor: leg.bypass_factor,
        contact_factor,
        qs: loads.sensible,
        ql: loads.latent,
        qt: loads.total,
        shr: loads.shr,
        load_unit,
        water_flow: water,
        water_flow_unit: water.map(|_| input.unit_system.water_flow_label()),
        path,
        warnings,
    })
}
