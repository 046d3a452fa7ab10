//! Load equation Q = C · airflow · Δ and a surface condensation check.
//!
//! C is density-corrected at a reference state:
//! sensible Qs = Cs·airflow·ΔT, latent Ql = Cl·airflow·ΔW, total Qt = Ct·airflow·Δh.

use pf_core::UnitSystem;
use pf_process::common::{latent_c_factor, sensible_c_factor, total_c_factor};
use pf_props::{PropertyModel, PsychrometricState, StateSpec};
use serde::{Deserialize, Serialize};

use crate::context;
use crate::error::{AnalysisError, AnalysisResult};

const MIN_DIVISOR: f64 = 1e-12;
const DEFAULT_REFERENCE_W: f64 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadType {
    Sensible,
    Latent,
    Total,
}

impl LoadType {
    fn load_symbol(self) -> &'static str {
        match self {
            LoadType::Sensible => "Qs",
            LoadType::Latent => "Ql",
            LoadType::Total => "Qt",
        }
    }

    fn delta_symbol(self) -> &'static str {
        match self {
            LoadType::Sensible => "ΔT",
            LoadType::Latent => "ΔW",
            LoadType::Total => "Δh",
        }
    }

    fn delta_unit(self, units: UnitSystem) -> &'static str {
        match (self, units) {
            (LoadType::Sensible, _) => units.temperature_label(),
            (LoadType::Latent, UnitSystem::IP) => "lb/lb",
            (LoadType::Latent, UnitSystem::SI) => "kg/kg",
            (LoadType::Total, _) => units.enthalpy_label(),
        }
    }
}

/// The unknown of the load equation, with the two known terms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "solve_for", rename_all = "snake_case")]
pub enum SolveFor {
    Load { airflow: f64, delta: f64 },
    Airflow { q: f64, delta: f64 },
    Delta { q: f64, airflow: f64 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AirflowInput {
    pub unit_system: UnitSystem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    pub load_type: LoadType,
    #[serde(flatten)]
    pub solve_for: SolveFor,
    /// Reference dry bulb for air density; 70 °F or 21 °C when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_tdb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_w: Option<f64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct AirflowOutput {
    pub load_type: LoadType,
    pub unit_system: UnitSystem,
    /// BTU/hr or W
    pub q: f64,
    /// CFM or m³/s
    pub airflow: f64,
    pub delta: f64,
    pub c_factor: f64,
    pub air_density: f64,
    pub formula: String,
}

fn default_reference_tdb(units: UnitSystem) -> f64 {
    match units {
        UnitSystem::IP => 70.0,
        UnitSystem::SI => 21.0,
    }
}

/// C factor and air density (lb/ft³ or kg/m³) at the reference state.
pub fn c_factor(
    model: &dyn PropertyModel,
    units: UnitSystem,
    load_type: LoadType,
    tdb: f64,
    w: f64,
    pressure: f64,
) -> AnalysisResult<(f64, f64)> {
    let density = 1.0 / model.specific_volume(units, tdb, w, pressure)?;
    let c = match load_type {
        LoadType::Sensible => sensible_c_factor(units, density),
        LoadType::Latent => latent_c_factor(units, density),
        LoadType::Total => total_c_factor(units, density),
    };
    Ok((c, density))
}

fn nonzero(field: &'static str, value: f64) -> AnalysisResult<f64> {
    if !value.is_finite() || value.abs() < MIN_DIVISOR {
        return Err(AnalysisError::validation(field, format!("must be non-zero, got {value}")));
    }
    Ok(value)
}

fn formula(input: &AirflowInput, c: f64, q: f64, airflow: f64, delta: f64) -> String {
    let units = input.unit_system;
    let lt = input.load_type;
    let (q_unit, flow_unit, d_unit) = (units.load_label(), units.airflow_label(), lt.delta_unit(units));
    match input.solve_for {
        SolveFor::Load { .. } => format!(
            "{} = {c:.4} × {airflow:.2} {flow_unit} × {delta:.4} {d_unit} = {q:.2} {q_unit}",
            lt.load_symbol()
        ),
        SolveFor::Airflow { .. } => format!(
            "{flow_unit} = {q:.2} {q_unit} / ({c:.4} × {delta:.4} {d_unit}) = {airflow:.2} {flow_unit}"
        ),
        SolveFor::Delta { .. } => format!(
            "{} = {q:.2} {q_unit} / ({c:.4} × {airflow:.2} {flow_unit}) = {delta:.4} {d_unit}",
            lt.delta_symbol()
        ),
    }
}

pub fn calculate_airflow(model: &dyn PropertyModel, input: &AirflowInput) -> AnalysisResult<AirflowOutput> {
    let units = input.unit_system;
    let ctx = context(model, units, input.pressure);
    let tdb = input.reference_tdb.unwrap_or_else(|| default_reference_tdb(units));
    let w = input.reference_w.unwrap_or(DEFAULT_REFERENCE_W);
    let (c, density) = c_factor(model, units, input.load_type, tdb, w, ctx.pressure)?;

    let (q, airflow, delta) = match input.solve_for {
        SolveFor::Load { airflow, delta } => {
            if !airflow.is_finite() || airflow < 0.0 {
                return Err(AnalysisError::validation("airflow", "must be non-negative"));
            }
            (c * airflow * delta, airflow, delta)
        }
        SolveFor::Airflow { q, delta } => {
            nonzero("delta", delta)?;
            (q, q / nonzero("C × delta", c * delta)?, delta)
        }
        SolveFor::Delta { q, airflow } => {
            if !airflow.is_finite() || airflow <= 0.0 {
                return Err(AnalysisError::validation("airflow", "must be positive"));
            }
            (q, airflow, q / nonzero("C × airflow", c * airflow)?)
        }
    };

    Ok(AirflowOutput {
        load_type: input.load_type,
        unit_system: units,
        q,
        airflow,
        delta,
        c_factor: c,
        air_density: density,
        formula: formula(input, c, q, airflow, delta),
    })
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CondensationInput {
    pub unit_system: UnitSystem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    pub state: StateSpec,
    pub surface_temperature: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct CondensationOutput {
    pub state: PsychrometricState,
    pub surface_temperature: f64,
    pub dew_point: f64,
    /// Surface minus dew point; negative when condensing
    pub margin: f64,
    pub is_condensing: bool,
}

pub fn check_condensation(model: &dyn PropertyModel, input: &CondensationInput) -> AnalysisResult<CondensationOutput> {
    if !input.surface_temperature.is_finite() {
        return Err(AnalysisError::validation("surface_temperature", "must be finite"));
    }
    let ctx = context(model, input.unit_system, input.pressure);
    let state = ctx.resolve(&input.state, "condensation_check")?;
    let dew_point = state.tdp();
    Ok(CondensationOutput {
        surface_temperature: input.surface_temperature,
        dew_point,
        margin: input.surface_temperature - dew_point,
        is_condensing: input.surface_temperature < dew_point,
        state,
    })
}
