//! Chemical (desiccant) dehumidification, idealized as constant enthalpy.

use pf_core::{PfError, RootConfig, brent};
use pf_props::{PropsError, PsychrometricState};
use serde::{Deserialize, Serialize};

use crate::common::{ENTHALPY_SEGMENTS, check_target_rh, enthalpy_path};
use crate::error::ProcessError;
use crate::process::ProcessKind;
use crate::result::{ProcessResult, push_warning};
use crate::traits::{ProcessSolver, SolveContext};

/// Lower bound of the humidity-ratio search.
const MIN_SEARCH_W: f64 = 1e-6;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ChemicalDehumidification {
    TargetW { w: f64 },
    TargetRh { rh: f64 },
}

/// Humidity ratio on the start enthalpy line where RH equals `target_rh`.
fn w_for_rh_at_constant_enthalpy(
    ctx: &SolveContext<'_>,
    start: &PsychrometricState,
    target_rh: f64,
) -> Result<f64, ProcessError> {
    let h = start.h();
    let objective = |w: f64| -> Result<f64, PropsError> {
        let tdb = ctx.model.dry_bulb_from_enthalpy(ctx.units, h, w)?;
        Ok(100.0 * ctx.model.rel_hum(ctx.units, tdb, w, ctx.pressure)? - target_rh)
    };
    brent(
        objective,
        MIN_SEARCH_W,
        start.w(),
        &RootConfig::default(),
        "humidity ratio at target RH along constant enthalpy",
    )
    .map_err(|e| match e {
        PropsError::Numeric(PfError::NoSignChange { .. } | PfError::InvalidArg { .. }) => ProcessError::Range {
            what: "target RH",
            message: format!(
                "{target_rh}% is not reachable by desiccant dehumidification from RH {:.1}%",
                start.rh()
            ),
        },
        other => other.into(),
    })
}

impl ProcessSolver for ChemicalDehumidification {
    fn solve(&self, ctx: &SolveContext<'_>, start: &PsychrometricState) -> Result<ProcessResult, ProcessError> {
        let end_w = match *self {
            ChemicalDehumidification::TargetW { w } => {
                if !w.is_finite() || w < 0.0 {
                    return Err(ProcessError::validation(
                        "target_w",
                        format!("must be non-negative, got {w}"),
                    ));
                }
                w
            }
            ChemicalDehumidification::TargetRh { rh } => {
                w_for_rh_at_constant_enthalpy(ctx, start, check_target_rh(rh)?)?
            }
        };

        let mut warnings = Vec::new();
        if end_w > start.w() {
            push_warning(
                &mut warnings,
                format!(
                    "Target humidity ratio ({end_w:.6}) exceeds start ({:.6}); this adds moisture.",
                    start.w()
                ),
            );
        }

        let h = start.h();
        let end_tdb = ctx.model.dry_bulb_from_enthalpy(ctx.units, h, end_w)?;
        let end = ctx.tdb_w(end_tdb, end_w, "end")?;
        let path = enthalpy_path(ctx, h, start.w(), end_w, ENTHALPY_SEGMENTS)?;

        let delta_tdb = end.tdb() - start.tdb();
        let delta_w = end.w() - start.w();
        let end_rh = end.rh();

        Ok(ProcessResult::new(ProcessKind::ChemicalDehumidification, start.clone(), end)
            .with_path(path)
            .with_warnings(warnings)
            .meta("h_constant", h)
            .meta("delta_Tdb", delta_tdb)
            .meta("delta_W", delta_w)
            .meta("delta_W_display", ctx.units.w_to_display(delta_w))
            .meta("start_RH", start.rh())
            .meta("end_RH", end_rh))
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
    fn target_w_heats_at_constant_enthalpy() {
        let ctx = ctx();
        let start = ctx.tdb_rh(75.0, 60.0, "start").unwrap();
        let r = ChemicalDehumidification::TargetW { w: 0.006 }.solve(&ctx, &start).unwrap();
        assert!(r.end.tdb() > start.tdb());
        assert!((r.end.h() - start.h()).abs() < 1e-9);
        assert_eq!(r.path.len(), ENTHALPY_SEGMENTS + 1);
        assert!(r.warnings.is_empty());
    }

    #[test]
    fn target_rh_is_met() {
        let ctx = ctx();
        let start = ctx.tdb_rh(75.0, 60.0, "start").unwrap();
        let r = ChemicalDehumidification::TargetRh { rh: 20.0 }.solve(&ctx, &start).unwrap();
        assert!((r.end.rh() - 20.0).abs() < 0.01);
        assert!(r.metadata_value("delta_W").unwrap() < 0.0);
    }

    #[test]
    fn target_rh_above_start_is_unreachable() {
        let ctx = ctx();
        let start = ctx.tdb_rh(75.0, 30.0, "start").unwrap();
        let err = ChemicalDehumidification::TargetRh { rh: 50.0 }.solve(&ctx, &start).unwrap_err();
        assert!(matches!(err, ProcessError::Range { .. }));
        assert!(err.is_client_error());
    }

    #[test]
    fn adding_moisture_warns() {
        let ctx = ctx();
        let start = ctx.tdb_rh(75.0, 30.0, "start").unwrap();
        let r = ChemicalDehumidification::TargetW { w: start.w() + 0.002 }
            .solve(&ctx, &start)
            .unwrap();
        assert_eq!(r.warnings.len(), 1);
    }
}
