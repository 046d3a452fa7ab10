//! Humidification: steam (constant Tdb), adiabatic (constant Twb) and heated
//! water spray (straight line toward saturation at the water temperature).

use pf_core::{PfError, RootConfig, brent};
use pf_props::{PropsError, PsychrometricState};
use serde::{Deserialize, Serialize};

use crate::common::{
    LINEAR_SEGMENTS, WET_BULB_SEGMENTS, check_target_rh, check_unit_interval, linear_path, wet_bulb_path,
};
use crate::error::ProcessError;
use crate::process::ProcessKind;
use crate::result::{ProcessResult, push_warning};
use crate::traits::{ProcessSolver, SolveContext};

/// Supersaturation slack before a fog warning.
const FOG_MARGIN: f64 = 1.001;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SteamHumidification {
    TargetRh { rh: f64 },
    TargetW { w: f64 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AdiabaticHumidification {
    Effectiveness { effectiveness: f64 },
    TargetRh { rh: f64 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeatedWaterSpray {
    pub effectiveness: f64,
    pub water_temperature: f64,
}

impl ProcessSolver for SteamHumidification {
    fn solve(&self, ctx: &SolveContext<'_>, start: &PsychrometricState) -> Result<ProcessResult, ProcessError> {
        let mut warnings = Vec::new();
        let end = match *self {
            SteamHumidification::TargetRh { rh } => {
                ctx.tdb_rh(start.tdb(), check_target_rh(rh)?, "end")?
            }
            SteamHumidification::TargetW { w } => {
                if !w.is_finite() || w < 0.0 {
                    return Err(ProcessError::validation(
                        "target_w",
                        format!("must be non-negative, got {w}"),
                    ));
                }
                ctx.tdb_w(start.tdb(), w, "end")?
            }
        };

        if end.w() < start.w() {
            push_warning(
                &mut warnings,
                format!(
                    "End humidity ratio ({:.6}) is lower than start ({:.6}); this is dehumidification, not humidification.",
                    end.w(),
                    start.w()
                ),
            );
        }
        let w_sat = ctx.model.sat_hum_ratio(ctx.units, start.tdb(), ctx.pressure)?;
        if end.w() > w_sat * FOG_MARGIN {
            push_warning(
                &mut warnings,
                format!(
                    "Target humidity ratio exceeds saturation at Tdb={:.1}; fog or condensation would occur.",
                    start.tdb()
                ),
            );
        }

        let path = linear_path(
            ctx.units,
            (start.tdb(), start.w()),
            (start.tdb(), end.w()),
            LINEAR_SEGMENTS,
        );
        let delta_w = end.w() - start.w();
        let delta_h = end.h() - start.h();
        let end_rh = end.rh();

        Ok(ProcessResult::new(ProcessKind::SteamHumidification, start.clone(), end)
            .with_path(path)
            .with_warnings(warnings)
            .meta("delta_W", delta_w)
            .meta("delta_W_display", ctx.units.w_to_display(delta_w))
            .meta("delta_h", delta_h)
            .meta("start_RH", start.rh())
            .meta("end_RH", end_rh))
    }
}

/// Dry bulb on the start state's constant wet-bulb line where RH reaches `target_rh`.
fn tdb_for_rh_on_wet_bulb(
    ctx: &SolveContext<'_>,
    start: &PsychrometricState,
    target_rh: f64,
) -> Result<f64, ProcessError> {
    let twb = start.twb();
    if target_rh >= 100.0 - 1e-9 {
        return Ok(twb);
    }
    let objective = |tdb: f64| -> Result<f64, PropsError> {
        let w = ctx.model.hum_ratio_from_wet_bulb(ctx.units, tdb, twb.min(tdb), ctx.pressure)?;
        Ok(100.0 * ctx.model.rel_hum(ctx.units, tdb, w, ctx.pressure)? - target_rh)
    };
    brent(
        objective,
        twb,
        start.tdb(),
        &RootConfig::default(),
        "dry bulb at target RH along constant wet bulb",
    )
    .map_err(|e| match e {
        PropsError::Numeric(PfError::NoSignChange { .. }) => ProcessError::Range {
            what: "target RH",
            message: format!("{target_rh}% is not reachable along Twb={twb:.2}"),
        },
        other => other.into(),
    })
}

/// Constant wet-bulb humidification/cooling by effectiveness.
pub(crate) fn wet_bulb_process(
    ctx: &SolveContext<'_>,
    start: &PsychrometricState,
    end_tdb: f64,
    effectiveness: f64,
    kind: ProcessKind,
) -> Result<ProcessResult, ProcessError> {
    let twb = start.twb();
    let sat_at_twb = ctx.saturated(twb, "sat_at_Twb")?;
    let end_w = ctx.w_at_wet_bulb(end_tdb, twb)?;
    let end = ctx.tdb_w(end_tdb, end_w, "end")?;
    let path = wet_bulb_path(ctx, start.tdb(), end_tdb, twb, WET_BULB_SEGMENTS)?;

    let delta_w = end.w() - start.w();
    let delta_tdb = end.tdb() - start.tdb();
    let end_rh = end.rh();

    Ok(ProcessResult::new(kind, start.clone(), end)
        .with_path(path)
        .meta("effectiveness", effectiveness)
        .meta("Twb", twb)
        .meta("delta_Tdb", delta_tdb)
        .meta("delta_W", delta_w)
        .meta("delta_W_display", ctx.units.w_to_display(delta_w))
        .meta("start_RH", start.rh())
        .meta("end_RH", end_rh)
        .reference(sat_at_twb))
}

impl ProcessSolver for AdiabaticHumidification {
    fn solve(&self, ctx: &SolveContext<'_>, start: &PsychrometricState) -> Result<ProcessResult, ProcessError> {
        let depression = start.tdb() - start.twb();
        let (end_tdb, eff) = match *self {
            AdiabaticHumidification::Effectiveness { effectiveness } => {
                let eff = check_unit_interval(effectiveness, "effectiveness")?;
                (start.tdb() - eff * depression, eff)
            }
            AdiabaticHumidification::TargetRh { rh } => {
                if !rh.is_finite() || rh <= start.rh() {
                    return Err(ProcessError::validation(
                        "target_rh",
                        format!("target RH ({rh}%) must be greater than current RH ({:.1}%)", start.rh()),
                    ));
                }
                if rh > 100.0 {
                    return Err(ProcessError::validation("target_rh", "cannot exceed 100%"));
                }
                let end_tdb = tdb_for_rh_on_wet_bulb(ctx, start, rh)?;
                let eff = if depression.abs() > 1e-10 {
                    (start.tdb() - end_tdb) / depression
                } else {
                    1.0
                };
                (end_tdb, eff)
            }
        };
        wet_bulb_process(ctx, start, end_tdb, eff, ProcessKind::AdiabaticHumidification)
    }
}

impl ProcessSolver for HeatedWaterSpray {
    fn solve(&self, ctx: &SolveContext<'_>, start: &PsychrometricState) -> Result<ProcessResult, ProcessError> {
        let eff = check_unit_interval(self.effectiveness, "effectiveness")?;
        let sat_water = ctx.saturated(self.water_temperature, "sat_water")?;
        let mut warnings = Vec::new();

        let end_tdb = start.tdb() + eff * (sat_water.tdb() - start.tdb());
        let end_w = start.w() + eff * (sat_water.w() - start.w());
        let end = ctx.tdb_w(end_tdb, end_w, "end")?;

        // Cold water below the entering dew point dehumidifies; computable, so only flagged
        if end.w() < start.w() {
            push_warning(
                &mut warnings,
                "End humidity ratio is lower than start; the water temperature may be too cold for humidification."
                    .to_string(),
            );
        }

        let path = linear_path(ctx.units, (start.tdb(), start.w()), (end_tdb, end_w), LINEAR_SEGMENTS);
        let delta_w = end.w() - start.w();
        let delta_tdb = end.tdb() - start.tdb();
        let delta_h = end.h() - start.h();
        let end_rh = end.rh();

        Ok(ProcessResult::new(ProcessKind::HeatedWaterHumidification, start.clone(), end)
            .with_path(path)
            .with_warnings(warnings)
            .meta("effectiveness", eff)
            .meta("water_temperature", self.water_temperature)
            .meta("sat_water_Tdb", sat_water.tdb())
            .meta("sat_water_W", sat_water.w())
            .meta("sat_water_W_display", sat_water.w_display())
            .meta("delta_Tdb", delta_tdb)
            .meta("delta_W", delta_w)
            .meta("delta_W_display", ctx.units.w_to_display(delta_w))
            .meta("delta_h", delta_h)
            .meta("start_RH", start.rh())
            .meta("end_RH", end_rh)
            .reference(sat_water))
    }
}
