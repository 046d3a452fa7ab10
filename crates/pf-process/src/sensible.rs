//! Sensible heating and cooling at constant humidity ratio.

use pf_props::PsychrometricState;
use serde::{Deserialize, Serialize};

use crate::common::{linear_path, sensible_c_factor};
use crate::error::ProcessError;
use crate::process::ProcessKind;
use crate::result::{ProcessResult, push_warning};
use crate::traits::{ProcessSolver, SolveContext};

/// How the leaving dry bulb is specified.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SensibleMode {
    TargetTdb { tdb: f64 },
    /// Positive heats, negative cools
    DeltaT { delta_t: f64 },
    /// Sensible load (BTU/hr or W) with airflow (CFM or m³/s)
    HeatAndAirflow { q_sensible: f64, airflow: f64 },
}

impl ProcessSolver for SensibleMode {
    fn solve(&self, ctx: &SolveContext<'_>, start: &PsychrometricState) -> Result<ProcessResult, ProcessError> {
        let mut warnings = Vec::new();
        let mut c_factor = None;

        let end_tdb = match *self {
            SensibleMode::TargetTdb { tdb } => tdb,
            SensibleMode::DeltaT { delta_t } => start.tdb() + delta_t,
            SensibleMode::HeatAndAirflow { q_sensible, airflow } => {
                if !airflow.is_finite() || airflow <= 0.0 {
                    return Err(ProcessError::validation(
                        "airflow",
                        format!("must be positive, got {airflow}"),
                    ));
                }
                if !q_sensible.is_finite() {
                    return Err(ProcessError::validation("q_sensible", "must be finite"));
                }
                // Density from the entering state, not a sea-level constant
                let c = sensible_c_factor(ctx.units, start.density());
                c_factor = Some(c);
                start.tdb() + q_sensible / (c * airflow)
            }
        };

        let kind = if end_tdb >= start.tdb() {
            ProcessKind::SensibleHeating
        } else {
            ProcessKind::SensibleCooling
        };

        if end_tdb < start.tdp() {
            push_warning(
                &mut warnings,
                format!(
                    "Target Tdb ({end_tdb:.1}) is below the dew point ({:.1}); dehumidification would occur in practice. \
                     Consider a cooling and dehumidification process.",
                    start.tdp()
                ),
            );
        }

        let end = ctx.tdb_w(end_tdb, start.w(), "end")?;
        let path = linear_path(ctx.units, (start.tdb(), start.w()), (end.tdb(), end.w()), 1);
        let delta_t = end.tdb() - start.tdb();
        let q_per_mass = end.h() - start.h();

        let mut result = ProcessResult::new(kind, start.clone(), end)
            .with_path(path)
            .with_warnings(warnings)
            .meta("delta_T", delta_t)
            .meta("Qs_per_unit_mass", q_per_mass);

        if let (SensibleMode::HeatAndAirflow { q_sensible, airflow }, Some(c)) = (self, c_factor) {
            result = result
                .meta("Q_sensible", *q_sensible)
                .meta("airflow", *airflow)
                .meta("C_factor", c);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::UnitSystem;
    use pf_props::AshraeModel;

    fn ctx() -> SolveContext<'static> {
        SolveContext::new(&AshraeModel, UnitSystem::IP, 14.696)
    }

    #[test]
    fn delta_t_cooling_is_reported_as_cooling() {
        let ctx = ctx();
        let start = ctx.tdb_rh(80.0, 40.0, "start").unwrap();
        let r = SensibleMode::DeltaT { delta_t: -10.0 }.solve(&ctx, &start).unwrap();
        assert_eq!(r.kind, ProcessKind::SensibleCooling);
        assert!((r.end.tdb() - 70.0).abs() < 1e-12);
        assert!(r.warnings.is_empty());
        assert_eq!(r.path.len(), 2);
        assert!(r.metadata_value("Qs_per_unit_mass").unwrap() < 0.0);
    }

    #[test]
    fn cooling_below_dew_point_warns() {
        let ctx = ctx();
        let start = ctx.tdb_rh(75.0, 50.0, "start").unwrap();
        let r = SensibleMode::TargetTdb { tdb: 50.0 }.solve(&ctx, &start).unwrap();
        assert_eq!(r.warnings.len(), 1);
        assert!(r.warnings[0].contains("dew point"));
        assert!((r.end.w() - start.w()).abs() < 1e-12);
    }

    #[test]
    fn heat_and_airflow_uses_entering_density() {
        let ctx = ctx();
        let start = ctx.tdb_rh(55.0, 50.0, "start").unwrap();
        let r = SensibleMode::HeatAndAirflow {
            q_sensible: 21_600.0,
            airflow: 1000.0,
        }
        .solve(&ctx, &start)
        .unwrap();
        let c = r.metadata_value("C_factor").unwrap();
        assert!((c - 60.0 * 0.244 / start.v()).abs() < 1e-12);
        assert!((r.metadata_value("delta_T").unwrap() - 21_600.0 / (c * 1000.0)).abs() < 1e-9);
        assert_eq!(r.kind, ProcessKind::SensibleHeating);
    }

    #[test]
    fn non_positive_airflow_is_rejected() {
        let ctx = ctx();
        let start = ctx.tdb_rh(55.0, 50.0, "start").unwrap();
        let err = SensibleMode::HeatAndAirflow {
            q_sensible: 1000.0,
            airflow: 0.0,
        }
        .solve(&ctx, &start)
        .unwrap_err();
        assert!(matches!(err, ProcessError::Validation { field: "airflow", .. }));
    }
}
