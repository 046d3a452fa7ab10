//! pf-analysis: coil analysis, SHR/GSHR/ESHR lines and airflow sizing.
//!
//! Builds on the cooling legs of `pf-process` and the ADP search of
//! `pf-solver`; every entry point takes a property model and a request.

pub mod airflow;
pub mod coil;
pub mod error;
pub mod shr;

pub use airflow::{
    AirflowInput, AirflowOutput, CondensationInput, CondensationOutput, LoadType, SolveFor, c_factor,
    calculate_airflow, check_condensation,
};
pub use coil::{CoilInput, CoilOutput, analyze_coil};
pub use error::{AnalysisError, AnalysisResult};
pub use shr::{
    GshrInput, GshrOutput, ShrLine, ShrLineInput, ShrLineOutput, calculate_gshr, calculate_shr_line,
    find_adp_from_shr, generate_shr_line, shr_slope,
};

use pf_core::UnitSystem;
use pf_process::SolveContext;
use pf_props::PropertyModel;

/// Context at `pressure`, or standard sea-level pressure when absent.
pub(crate) fn context(model: &dyn PropertyModel, units: UnitSystem, pressure: Option<f64>) -> SolveContext<'_> {
    SolveContext::new(model, units, pressure.unwrap_or_else(|| units.default_pressure()))
}
