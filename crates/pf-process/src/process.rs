//! Process requests and dispatch.

use pf_core::UnitSystem;
use pf_props::{PropertyModel, StateSpec};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cooling::CoolingDehumidification;
use crate::desiccant::ChemicalDehumidification;
use crate::error::ProcessError;
use crate::evaporative::{DirectEvaporative, IndirectDirectEvaporative, IndirectEvaporative};
use crate::humidification::{AdiabaticHumidification, HeatedWaterSpray, SteamHumidification};
use crate::mixing::Mixing;
use crate::result::ProcessResult;
use crate::sensible::SensibleMode;
use crate::traits::{ProcessSolver, SolveContext};

/// Resolved process type reported on results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessKind {
    SensibleHeating,
    SensibleCooling,
    CoolingDehumidification,
    AdiabaticMixing,
    SteamHumidification,
    AdiabaticHumidification,
    HeatedWaterHumidification,
    DirectEvaporative,
    IndirectEvaporative,
    IndirectDirectEvaporative,
    ChemicalDehumidification,
}

/// Process variant with its parameters, tagged by `type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Process {
    Sensible(SensibleMode),
    CoolingDehumidification(CoolingDehumidification),
    Mixing(Mixing),
    SteamHumidification(SteamHumidification),
    AdiabaticHumidification(AdiabaticHumidification),
    HeatedWaterHumidification(HeatedWaterSpray),
    DirectEvaporative(DirectEvaporative),
    IndirectEvaporative(IndirectEvaporative),
    IndirectDirectEvaporative(IndirectDirectEvaporative),
    ChemicalDehumidification(ChemicalDehumidification),
}

impl Process {
    pub fn solver(&self) -> &dyn ProcessSolver {
        match self {
            Process::Sensible(p) => p,
            Process::CoolingDehumidification(p) => p,
            Process::Mixing(p) => p,
            Process::SteamHumidification(p) => p,
            Process::AdiabaticHumidification(p) => p,
            Process::HeatedWaterHumidification(p) => p,
            Process::DirectEvaporative(p) => p,
            Process::IndirectEvaporative(p) => p,
            Process::IndirectDirectEvaporative(p) => p,
            Process::ChemicalDehumidification(p) => p,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Process::Sensible(_) => "sensible",
            Process::CoolingDehumidification(_) => "cooling_dehumidification",
            Process::Mixing(_) => "mixing",
            Process::SteamHumidification(_) => "steam_humidification",
            Process::AdiabaticHumidification(_) => "adiabatic_humidification",
            Process::HeatedWaterHumidification(_) => "heated_water_humidification",
            Process::DirectEvaporative(_) => "direct_evaporative",
            Process::IndirectEvaporative(_) => "indirect_evaporative",
            Process::IndirectDirectEvaporative(_) => "indirect_direct_evaporative",
            Process::ChemicalDehumidification(_) => "chemical_dehumidification",
        }
    }
}

/// A complete process request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessInput {
    pub unit_system: UnitSystem,
    /// Defaults to standard sea-level pressure for the unit system
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    pub start: StateSpec,
    pub process: Process,
}

impl ProcessInput {
    pub fn new(unit_system: UnitSystem, start: StateSpec, process: Process) -> Self {
        Self {
            unit_system,
            pressure: None,
            start,
            process,
        }
    }

    pub fn at_pressure(mut self, pressure: f64) -> Self {
        self.pressure = Some(pressure);
        self
    }

    pub fn pressure(&self) -> f64 {
        self.pressure
            .unwrap_or_else(|| self.unit_system.default_pressure())
    }

    pub fn solve(&self, model: &dyn PropertyModel) -> Result<ProcessResult, ProcessError> {
        let ctx = SolveContext::new(model, self.unit_system, self.pressure());
        let solver = self.process.solver();
        debug!(process = self.process.name(), units = %self.unit_system, "solving process");
        let start = ctx.resolve(&self.start, solver.start_label())?;
        solver.solve(&ctx, &start)
    }
}
