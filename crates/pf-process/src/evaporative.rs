//! Evaporative coolers: direct (DEC), indirect (IEC) and two-stage IEC + DEC.

use pf_props::{PsychrometricState, StateSpec};
use serde::{Deserialize, Serialize};

use crate::common::{check_unit_interval, linear_path, wet_bulb_path};
use crate::error::ProcessError;
use crate::humidification::wet_bulb_process;
use crate::process::ProcessKind;
use crate::result::{PathPoint, ProcessResult, push_warning};
use crate::traits::{ProcessSolver, SolveContext};

const IEC_STAGE_SEGMENTS: usize = 5;
const DEC_STAGE_SEGMENTS: usize = 14;

/// Direct evaporative cooling along the start state's wet-bulb line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectEvaporative {
    pub effectiveness: f64,
}

/// Indirect evaporative cooling at constant humidity ratio.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndirectEvaporative {
    pub effectiveness: f64,
    /// Secondary (scavenger) air; the primary air is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<StateSpec>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndirectDirectEvaporative {
    pub iec_effectiveness: f64,
    pub dec_effectiveness: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<StateSpec>,
}

/// Secondary wet bulb and, when given, the resolved secondary state.
fn secondary_wet_bulb(
    ctx: &SolveContext<'_>,
    start: &PsychrometricState,
    secondary: Option<&StateSpec>,
) -> Result<(f64, Option<PsychrometricState>), ProcessError> {
    match secondary {
        Some(spec) => {
            let state = ctx.resolve(spec, "secondary")?;
            Ok((state.twb(), Some(state)))
        }
        None => Ok((start.twb(), None)),
    }
}

impl ProcessSolver for DirectEvaporative {
    fn solve(&self, ctx: &SolveContext<'_>, start: &PsychrometricState) -> Result<ProcessResult, ProcessError> {
        let eff = check_unit_interval(self.effectiveness, "effectiveness")?;
        let end_tdb = start.tdb() - eff * (start.tdb() - start.twb());
        wet_bulb_process(ctx, start, end_tdb, eff, ProcessKind::DirectEvaporative)
    }
}

impl ProcessSolver for IndirectEvaporative {
    fn solve(&self, ctx: &SolveContext<'_>, start: &PsychrometricState) -> Result<ProcessResult, ProcessError> {
        let eff = check_unit_interval(self.effectiveness, "effectiveness")?;
        let (twb_sec, secondary) = secondary_wet_bulb(ctx, start, self.secondary.as_ref())?;
        let mut warnings = Vec::new();

        let end_tdb = start.tdb() - eff * (start.tdb() - twb_sec);
        if end_tdb > start.tdb() + 0.01 {
            push_warning(
                &mut warnings,
                format!(
                    "Secondary wet bulb ({twb_sec:.1}) is above the primary dry bulb ({:.1}); the primary air is heated.",
                    start.tdb()
                ),
            );
        }
        if end_tdb < start.tdp() {
            push_warning(
                &mut warnings,
                format!(
                    "Leaving Tdb ({end_tdb:.1}) is below the primary dew point ({:.1}); condensation would occur in the heat exchanger.",
                    start.tdp()
                ),
            );
        }

        let end = ctx.tdb_w(end_tdb, start.w(), "end")?;
        let path = linear_path(ctx.units, (start.tdb(), start.w()), (end_tdb, start.w()), 1);
        let delta_tdb = end.tdb() - start.tdb();
        let end_rh = end.rh();

        let mut result = ProcessResult::new(ProcessKind::IndirectEvaporative, start.clone(), end)
            .with_path(path)
            .with_warnings(warnings)
            .meta("effectiveness", eff)
            .meta("secondary_Twb", twb_sec)
            .meta("delta_Tdb", delta_tdb)
            .meta("start_RH", start.rh())
            .meta("end_RH", end_rh);
        if let Some(secondary) = secondary {
            result = result.reference(secondary);
        }
        Ok(result)
    }
}

impl ProcessSolver for IndirectDirectEvaporative {
    fn solve(&self, ctx: &SolveContext<'_>, start: &PsychrometricState) -> Result<ProcessResult, ProcessError> {
        let iec = check_unit_interval(self.iec_effectiveness, "iec_effectiveness")?;
        let dec = check_unit_interval(self.dec_effectiveness, "dec_effectiveness")?;
        let (twb_sec, secondary) = secondary_wet_bulb(ctx, start, self.secondary.as_ref())?;

        // Stage 1: sensible cooling toward the secondary wet bulb
        let mid_tdb = start.tdb() - iec * (start.tdb() - twb_sec);
        let intermediate = ctx.tdb_w(mid_tdb, start.w(), "intermediate")?;

        // Stage 2: adiabatic cooling along the intermediate wet-bulb line
        let mid_twb = intermediate.twb();
        let end_tdb = mid_tdb - dec * (mid_tdb - mid_twb);
        let end_w = ctx.w_at_wet_bulb(end_tdb, mid_twb)?;
        let end = ctx.tdb_w(end_tdb, end_w, "end")?;

        let mut path: Vec<PathPoint> = linear_path(
            ctx.units,
            (start.tdb(), start.w()),
            (mid_tdb, start.w()),
            IEC_STAGE_SEGMENTS,
        );
        path.extend(
            wet_bulb_path(ctx, mid_tdb, end_tdb, mid_twb, DEC_STAGE_SEGMENTS)?
                .into_iter()
                .skip(1),
        );

        let delta_tdb = end.tdb() - start.tdb();
        let delta_w = end.w() - start.w();
        let end_rh = end.rh();
        let mid_rh = intermediate.rh();

        let mut result = ProcessResult::new(ProcessKind::IndirectDirectEvaporative, start.clone(), end)
            .with_path(path)
            .meta("iec_effectiveness", iec)
            .meta("dec_effectiveness", dec)
            .meta("secondary_Twb", twb_sec)
            .meta("intermediate_Tdb", mid_tdb)
            .meta("intermediate_RH", mid_rh)
            .meta("intermediate_Twb", mid_twb)
            .meta("delta_Tdb_total", delta_tdb)
            .meta("delta_W", delta_w)
            .meta("delta_W_display", ctx.units.w_to_display(delta_w))
            .meta("start_RH", start.rh())
            .meta("end_RH", end_rh)
            .reference(intermediate);
        if let Some(secondary) = secondary {
            result = result.reference(secondary);
        }
        Ok(result)
    }
}
