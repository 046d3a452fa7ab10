//! Cooling and dehumidification along the entering → ADP line.
//!
//! Forward: entering state, ADP dry bulb and bypass factor give the leaving
//! state. Reverse: entering and leaving states give the ADP and bypass factor.
//! Both legs are shared with coil analysis.

use pf_props::{PsychrometricState, StateSpec};
use pf_solver::{apply_bypass_factor, compute_bypass_factor, contact_factor, find_apparatus_dew_point};
use serde::{Deserialize, Serialize};

use crate::common::{LINEAR_SEGMENTS, Loads, linear_path};
use crate::error::ProcessError;
use crate::process::ProcessKind;
use crate::result::{ProcessResult, push_warning};
use crate::traits::{ProcessSolver, SolveContext};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CoolingDehumidification {
    Forward { adp_tdb: f64, bypass_factor: f64 },
    Reverse { leaving: StateSpec },
}

/// Entering, leaving and ADP states of one pass through a coil.
#[derive(Clone, Debug)]
pub struct CoolingLeg {
    pub entering: PsychrometricState,
    pub leaving: PsychrometricState,
    pub adp: PsychrometricState,
    pub bypass_factor: f64,
    pub warnings: Vec<String>,
}

impl CoolingLeg {
    pub fn contact_factor(&self) -> f64 {
        contact_factor(self.bypass_factor)
    }

    /// Loads per unit mass of dry air.
    pub fn loads(&self) -> Loads {
        Loads::between(self.entering.unit_system(), &self.entering, &self.leaving)
    }
}

fn warn_if_adp_above_dew_point(warnings: &mut Vec<String>, adp_tdb: f64, entering: &PsychrometricState) {
    if adp_tdb >= entering.tdp() {
        push_warning(
            warnings,
            format!(
                "ADP Tdb ({adp_tdb:.1}) is at or above the entering dew point ({:.1}); no dehumidification would occur.",
                entering.tdp()
            ),
        );
    }
}

/// Leaving state from a given ADP and bypass factor.
pub fn forward_leg(
    ctx: &SolveContext<'_>,
    entering: &PsychrometricState,
    adp_tdb: f64,
    bypass_factor: f64,
) -> Result<CoolingLeg, ProcessError> {
    let mut warnings = Vec::new();
    let adp = ctx.saturated(adp_tdb, "ADP")?;
    warn_if_adp_above_dew_point(&mut warnings, adp.tdb(), entering);

    let (tdb, w) = apply_bypass_factor(
        (entering.tdb(), entering.w()),
        (adp.tdb(), adp.w()),
        bypass_factor,
    )?;
    let leaving = ctx.tdb_w(tdb, w, "leaving")?;

    Ok(CoolingLeg {
        entering: entering.clone(),
        leaving,
        adp,
        bypass_factor,
        warnings,
    })
}

/// ADP and bypass factor from measured entering and leaving states.
pub fn reverse_leg(
    ctx: &SolveContext<'_>,
    entering: &PsychrometricState,
    leaving: PsychrometricState,
) -> Result<CoolingLeg, ProcessError> {
    let mut warnings = Vec::new();
    if leaving.tdb() >= entering.tdb() {
        return Err(ProcessError::validation(
            "leaving Tdb",
            format!(
                "leaving Tdb ({:.1}) must be less than entering Tdb ({:.1})",
                leaving.tdb(),
                entering.tdb()
            ),
        ));
    }
    if leaving.w() >= entering.w() {
        push_warning(
            &mut warnings,
            format!(
                "Leaving humidity ratio ({:.6}) is not less than entering ({:.6}); this is sensible cooling only.",
                leaving.w(),
                entering.w()
            ),
        );
    }

    let adp_tdb = find_apparatus_dew_point(
        ctx.model,
        (entering.tdb(), entering.w()),
        (leaving.tdb(), leaving.w()),
        ctx.pressure,
        ctx.units,
    )?;
    let adp = ctx.saturated(adp_tdb, "ADP")?;
    let bypass_factor = compute_bypass_factor(entering.tdb(), adp.tdb(), leaving.tdb())?;
    warn_if_adp_above_dew_point(&mut warnings, adp.tdb(), entering);

    Ok(CoolingLeg {
        entering: entering.clone(),
        leaving,
        adp,
        bypass_factor,
        warnings,
    })
}

impl ProcessSolver for CoolingDehumidification {
    fn start_label(&self) -> &'static str {
        "entering"
    }

    fn solve(&self, ctx: &SolveContext<'_>, start: &PsychrometricState) -> Result<ProcessResult, ProcessError> {
        let leg = match self {
            CoolingDehumidification::Forward {
                adp_tdb,
                bypass_factor,
            } => forward_leg(ctx, start, *adp_tdb, *bypass_factor)?,
            CoolingDehumidification::Reverse { leaving } => {
                let leaving = ctx.resolve(leaving, "leaving")?;
                reverse_leg(ctx, start, leaving)?
            }
        };

        let loads = leg.loads();
        let path = linear_path(
            ctx.units,
            (leg.entering.tdb(), leg.entering.w()),
            (leg.leaving.tdb(), leg.leaving.w()),
            LINEAR_SEGMENTS,
        );
        let cf = leg.contact_factor();

        Ok(ProcessResult::new(ProcessKind::CoolingDehumidification, leg.entering, leg.leaving)
            .with_path(path)
            .with_warnings(leg.warnings)
            .meta("ADP_Tdb", leg.adp.tdb())
            .meta("ADP_W", leg.adp.w())
            .meta("ADP_W_display", leg.adp.w_display())
            .meta("BF", leg.bypass_factor)
            .meta("CF", cf)
            .meta("Qs", loads.sensible)
            .meta("Ql", loads.latent)
            .meta("Qt", loads.total)
            .meta("SHR", loads.shr)
            .reference(leg.adp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::UnitSystem;
    use pf_props::{AshraeModel, Property};

    fn ctx() -> SolveContext<'static> {
        SolveContext::new(&AshraeModel, UnitSystem::IP, 14.696)
    }

    #[test]
    fn forward_then_reverse_round_trip() {
        let ctx = ctx();
        let entering = ctx
            .resolve(&StateSpec::new(Property::Tdb, Property::Twb, (80.0, 67.0)), "entering")
            .unwrap();
        let fwd = forward_leg(&ctx, &entering, 48.0, 0.2).unwrap();
        let rev = reverse_leg(&ctx, &entering, fwd.leaving.clone()).unwrap();
        assert!((rev.adp.tdb() - 48.0).abs() < 0.01);
        assert!((rev.bypass_factor - 0.2).abs() < 1e-3);
        assert!(rev.warnings.is_empty());
    }

    #[test]
    fn adp_above_dew_point_warns() {
        let ctx = ctx();
        let entering = ctx.tdb_rh(80.0, 30.0, "entering").unwrap();
        let leg = forward_leg(&ctx, &entering, entering.tdp() + 2.0, 0.3).unwrap();
        assert_eq!(leg.warnings.len(), 1);
        assert!(leg.warnings[0].contains("no dehumidification"));
    }

    #[test]
    fn reverse_rejects_warmer_leaving_air() {
        let ctx = ctx();
        let entering = ctx.tdb_rh(75.0, 50.0, "entering").unwrap();
        let leaving = ctx.tdb_rh(78.0, 40.0, "leaving").unwrap();
        let err = reverse_leg(&ctx, &entering, leaving).unwrap_err();
        assert!(matches!(err, ProcessError::Validation { field: "leaving Tdb", .. }));
    }

    #[test]
    fn forward_rejects_bypass_factor_outside_interval() {
        let ctx = ctx();
        let entering = ctx.tdb_rh(80.0, 50.0, "entering").unwrap();
        let err = forward_leg(&ctx, &entering, 45.0, 1.0).unwrap_err();
        assert!(err.is_client_error());
    }
}
