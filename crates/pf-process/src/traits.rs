//! Core traits for process solvers.

use pf_core::UnitSystem;
use pf_props::{Property, PropertyModel, PsychrometricState, StateSpec};

use crate::error::ProcessError;
use crate::result::ProcessResult;

/// Everything a solver needs besides its own parameters.
#[derive(Clone, Copy)]
pub struct SolveContext<'a> {
    pub model: &'a dyn PropertyModel,
    pub units: UnitSystem,
    pub pressure: f64,
}

impl<'a> SolveContext<'a> {
    pub fn new(model: &'a dyn PropertyModel, units: UnitSystem, pressure: f64) -> Self {
        Self {
            model,
            units,
            pressure,
        }
    }

    /// Resolve a request, labelling it `default_label` unless it carries its own.
    pub fn resolve(&self, spec: &StateSpec, default_label: &str) -> Result<PsychrometricState, ProcessError> {
        let label = spec.label.as_deref().unwrap_or(default_label);
        Ok(pf_props::resolve(
            self.model,
            spec.pair,
            spec.values,
            self.pressure,
            self.units,
            Some(label),
        )?)
    }

    pub fn tdb_w(&self, tdb: f64, w: f64, label: &str) -> Result<PsychrometricState, ProcessError> {
        Ok(pf_props::resolve_tdb_w(
            self.model,
            tdb,
            w,
            self.pressure,
            self.units,
            Some(label),
        )?)
    }

    pub fn tdb_rh(&self, tdb: f64, rh: f64, label: &str) -> Result<PsychrometricState, ProcessError> {
        Ok(pf_props::resolve(
            self.model,
            (Property::Tdb, Property::RH),
            (tdb, rh),
            self.pressure,
            self.units,
            Some(label),
        )?)
    }

    pub fn saturated(&self, tdb: f64, label: &str) -> Result<PsychrometricState, ProcessError> {
        Ok(pf_props::resolve_saturated(
            self.model,
            tdb,
            self.pressure,
            self.units,
            Some(label),
        )?)
    }

    /// Humidity ratio on the constant wet-bulb line through `twb` at `tdb`.
    pub fn w_at_wet_bulb(&self, tdb: f64, twb: f64) -> Result<f64, ProcessError> {
        Ok(self
            .model
            .hum_ratio_from_wet_bulb(self.units, tdb, twb.min(tdb), self.pressure)?)
    }
}

/// One implementation per process variant.
///
/// Solvers are pure functions of the context, the resolved start state and
/// their own parameters.
pub trait ProcessSolver: Send + Sync {
    /// Label given to the resolved start state.
    fn start_label(&self) -> &'static str {
        "start"
    }

    fn solve(&self, ctx: &SolveContext<'_>, start: &PsychrometricState) -> Result<ProcessResult, ProcessError>;
}
