//! Process output types.

use std::collections::BTreeMap;

use pf_core::UnitSystem;
use pf_props::PsychrometricState;
use serde::Serialize;

use crate::process::ProcessKind;

/// Visualization point along a process curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PathPoint {
    pub tdb: f64,
    pub w: f64,
    pub w_display: f64,
}

impl PathPoint {
    pub fn new(tdb: f64, w: f64, units: UnitSystem) -> Self {
        Self {
            tdb,
            w,
            w_display: units.w_to_display(w),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ProcessResult {
    pub kind: ProcessKind,
    pub unit_system: UnitSystem,
    pub pressure: f64,
    pub start: PsychrometricState,
    pub end: PsychrometricState,
    pub path: Vec<PathPoint>,
    pub metadata: BTreeMap<String, f64>,
    /// Auxiliary states: ADP, second stream, secondary air, intermediate stage.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reference_states: Vec<PsychrometricState>,
    pub warnings: Vec<String>,
}

impl ProcessResult {
    pub fn new(kind: ProcessKind, start: PsychrometricState, end: PsychrometricState) -> Self {
        Self {
            kind,
            unit_system: start.unit_system(),
            pressure: start.pressure(),
            start,
            end,
            path: Vec::new(),
            metadata: BTreeMap::new(),
            reference_states: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_path(mut self, path: Vec<PathPoint>) -> Self {
        self.path = path;
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn reference(mut self, state: PsychrometricState) -> Self {
        self.reference_states.push(state);
        self
    }

    pub fn meta(mut self, key: &str, value: f64) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    pub fn metadata_value(&self, key: &str) -> Option<f64> {
        self.metadata.get(key).copied()
    }

    pub fn reference_state(&self, label: &str) -> Option<&PsychrometricState> {
        self.reference_states.iter().find(|s| s.label() == Some(label))
    }
}

/// Record a non-fatal warning.
pub fn push_warning(warnings: &mut Vec<String>, message: String) {
    tracing::debug!(warning = %message, "process warning");
    warnings.push(message);
}
