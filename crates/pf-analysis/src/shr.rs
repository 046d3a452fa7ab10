//! Sensible heat ratio lines and the grand/effective SHR of a cooling coil.
//!
//! An SHR line through the room state has slope
//! `dW/dTdb = cp·(1 − SHR) / (hfg·SHR)` and meets saturation at the ADP
//! a coil must reach to handle that load split.

use pf_core::{UnitSystem, lerp};
use pf_process::common::{sensible_c_factor, total_c_factor};
use pf_process::result::push_warning;
use pf_process::{PathPoint, SolveContext};
use pf_props::{PropertyModel, PsychrometricState, StateSpec};
use pf_solver::{ProcessLine, find_adp_on_line};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context;
use crate::error::{AnalysisError, AnalysisResult};

const LINE_STEPS: usize = 50;
/// Points above `W_sat · SATURATION_SLACK` are dropped from a line.
const SATURATION_SLACK: f64 = 1.01;
/// SHR = 0 is a vertical line; slopes are drawn from at least this ratio.
const MIN_LINE_RATIO: f64 = 0.01;

/// Slope dW/dTdb of an SHR line (lb/lb per °F or kg/kg per °C).
pub fn shr_slope(units: UnitSystem, shr: f64) -> AnalysisResult<f64> {
    if !shr.is_finite() || shr <= 0.0 || shr > 1.0 {
        return Err(AnalysisError::validation(
            "SHR",
            format!("must be within (0, 1], got {shr}"),
        ));
    }
    if shr == 1.0 {
        return Ok(0.0);
    }
    Ok(units.cp_air() * (1.0 - shr) / (units.hfg() * shr))
}

/// Line through `room` swept across the chart, clipped at saturation.
pub fn generate_shr_line(ctx: &SolveContext<'_>, room: (f64, f64), slope: f64) -> Vec<PathPoint> {
    let range = ctx.units.chart_range();
    let line = ProcessLine::with_slope(room.0, room.1, slope);
    let step = (range.tdb_max - range.tdb_min) / LINE_STEPS as f64;

    (0..=LINE_STEPS)
        .filter_map(|i| {
            let tdb = range.tdb_min + i as f64 * step;
            let w = line.w_at(tdb);
            if w < 0.0 {
                return None;
            }
            let w_sat = ctx.model.sat_hum_ratio(ctx.units, tdb, ctx.pressure).ok()?;
            (w <= w_sat * SATURATION_SLACK).then(|| PathPoint::new(tdb, w, ctx.units))
        })
        .collect()
}

/// ADP where the SHR line through `room` meets saturation below the room dry bulb.
pub fn find_adp_from_shr(ctx: &SolveContext<'_>, room: (f64, f64), slope: f64) -> AnalysisResult<f64> {
    let line = ProcessLine::with_slope(room.0, room.1, slope);
    Ok(find_adp_on_line(ctx.model, &line, room.0, ctx.pressure, ctx.units)?)
}

/// One SHR line with its saturation intersection.
#[derive(Clone, Debug, Serialize)]
pub struct ShrLine {
    pub shr: f64,
    pub slope: f64,
    pub points: Vec<PathPoint>,
    pub adp: PsychrometricState,
}

impl ShrLine {
    fn through(ctx: &SolveContext<'_>, room: &PsychrometricState, shr: f64, adp_label: &str) -> AnalysisResult<Self> {
        let slope = shr_slope(ctx.units, shr)?;
        let origin = (room.tdb(), room.w());
        let points = generate_shr_line(ctx, origin, slope);
        let adp_tdb = find_adp_from_shr(ctx, origin, slope)?;
        debug!(shr, slope, adp = adp_tdb, "SHR line");
        Ok(Self {
            shr,
            slope,
            points,
            adp: ctx.saturated(adp_tdb, adp_label)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShrLineInput {
    pub unit_system: UnitSystem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    pub room: StateSpec,
    pub shr: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct ShrLineOutput {
    pub room: PsychrometricState,
    pub line: ShrLine,
    pub warnings: Vec<String>,
}

pub fn calculate_shr_line(model: &dyn PropertyModel, input: &ShrLineInput) -> AnalysisResult<ShrLineOutput> {
    // Rejected before any property work
    shr_slope(input.unit_system, input.shr)?;
    let ctx = context(model, input.unit_system, input.pressure);
    let room = ctx.resolve(&input.room, "room")?;
    let line = ShrLine::through(&ctx, &room, input.shr, "ADP")?;
    Ok(ShrLineOutput {
        room,
        line,
        warnings: Vec::new(),
    })
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GshrInput {
    pub unit_system: UnitSystem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    pub room: StateSpec,
    pub outdoor: StateSpec,
    /// BTU/hr or W
    pub room_sensible_load: f64,
    pub room_total_load: f64,
    /// Outdoor-air share of the supply airflow
    pub oa_fraction: f64,
    /// CFM or m³/s
    pub total_airflow: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bypass_factor: Option<f64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct GshrOutput {
    pub room: PsychrometricState,
    pub outdoor: PsychrometricState,
    pub mixed: PsychrometricState,
    pub room_shr: f64,
    pub gshr: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eshr: Option<f64>,
    pub ventilation_sensible: f64,
    pub ventilation_total: f64,
    pub room_line: ShrLine,
    pub gshr_line: ShrLine,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eshr_line: Option<ShrLine>,
    pub warnings: Vec<String>,
}

impl GshrInput {
    fn check(&self) -> AnalysisResult<()> {
        for (field, v) in [
            ("room_sensible_load", self.room_sensible_load),
            ("room_total_load", self.room_total_load),
            ("total_airflow", self.total_airflow),
        ] {
            if !v.is_finite() {
                return Err(AnalysisError::validation(field, "must be finite"));
            }
        }
        if self.room_sensible_load > self.room_total_load {
            return Err(AnalysisError::validation(
                "room_sensible_load",
                "room sensible load cannot exceed room total load",
            ));
        }
        if !(0.0..=1.0).contains(&self.oa_fraction) {
            return Err(AnalysisError::validation(
                "oa_fraction",
                format!("must be between 0 and 1, got {}", self.oa_fraction),
            ));
        }
        if self.total_airflow < 0.0 {
            return Err(AnalysisError::validation("total_airflow", "must be non-negative"));
        }
        if let Some(bf) = self.bypass_factor {
            if !(bf > 0.0 && bf < 1.0) {
                return Err(AnalysisError::validation(
                    "bypass_factor",
                    format!("must be between 0 and 1 (exclusive), got {bf}"),
                ));
            }
        }
        Ok(())
    }
}

/// Clamp a load ratio into [0, 1], warning when it had to move.
fn clamp_ratio(warnings: &mut Vec<String>, name: &str, ratio: f64, hint: &str) -> f64 {
    if (0.0..=1.0).contains(&ratio) {
        return ratio;
    }
    push_warning(
        warnings,
        format!("Computed {name} ({ratio:.3}) is outside the normal range (0-1); {hint}"),
    );
    ratio.clamp(0.0, 1.0)
}

fn line_ratio(ratio: f64) -> f64 {
    ratio.clamp(MIN_LINE_RATIO, 1.0)
}

pub fn calculate_gshr(model: &dyn PropertyModel, input: &GshrInput) -> AnalysisResult<GshrOutput> {
    input.check()?;
    let ctx = context(model, input.unit_system, input.pressure);
    let room = ctx.resolve(&input.room, "room")?;
    let outdoor = ctx.resolve(&input.outdoor, "outdoor")?;
    let mut warnings = Vec::new();

    let room_shr = if input.room_total_load > 0.0 {
        input.room_sensible_load / input.room_total_load
    } else {
        1.0
    };

    // Mixed air interpolates Tdb and W linearly from room toward outdoor
    let f = input.oa_fraction;
    let mixed = ctx.tdb_w(lerp(room.tdb(), outdoor.tdb(), f), lerp(room.w(), outdoor.w(), f), "mixed")?;

    // Ventilation loads at room-air density
    let oa_flow = input.total_airflow * input.oa_fraction;
    let rho = room.density();
    let ventilation_sensible = sensible_c_factor(ctx.units, rho) * oa_flow * (outdoor.tdb() - room.tdb());
    let ventilation_total = total_c_factor(ctx.units, rho) * oa_flow * (outdoor.h() - room.h());

    let total_sensible = input.room_sensible_load + ventilation_sensible;
    let total_heat = input.room_total_load + ventilation_total;
    let gshr = if total_heat <= 0.0 {
        push_warning(
            &mut warnings,
            "Total heat load is non-positive; GSHR cannot be computed and is taken as 1.".to_string(),
        );
        1.0
    } else {
        clamp_ratio(
            &mut warnings,
            "GSHR",
            total_sensible / total_heat,
            "check load values and OA conditions.",
        )
    };
    debug!(room_shr, gshr, ventilation_sensible, ventilation_total, "grand SHR");

    let room_line = ShrLine::through(&ctx, &room, line_ratio(room_shr), "RSHR_ADP")?;
    let gshr_line = ShrLine::through(&ctx, &room, line_ratio(gshr), "GSHR_ADP")?;

    let (eshr, eshr_line) = match input.bypass_factor {
        Some(bf) => {
            let eshr = clamp_ratio(
                &mut warnings,
                "ESHR",
                1.0 - (1.0 - gshr) / (1.0 - bf),
                "the combination of GSHR and BF may be invalid.",
            );
            let line = ShrLine::through(&ctx, &room, line_ratio(eshr), "ESHR_ADP")?;
            (Some(eshr), Some(line))
        }
        None => (None, None),
    };

    Ok(GshrOutput {
        room,
        outdoor,
        mixed,
        room_shr,
        gshr,
        eshr,
        ventilation_sensible,
        ventilation_total,
        room_line,
        gshr_line,
        eshr_line,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_props::{AshraeModel, Property};

    fn ctx() -> SolveContext<'static> {
        SolveContext::new(&AshraeModel, UnitSystem::IP, 14.696)
    }

    #[test]
    fn unit_shr_is_horizontal() {
        assert_eq!(shr_slope(UnitSystem::IP, 1.0).unwrap(), 0.0);
        assert_eq!(shr_slope(UnitSystem::SI, 1.0).unwrap(), 0.0);
    }

    #[test]
    fn slope_outside_unit_interval_is_rejected() {
        for shr in [0.0, -0.2, 1.01, f64::NAN] {
            let err = shr_slope(UnitSystem::IP, shr).unwrap_err();
            assert!(matches!(err, AnalysisError::Validation { field: "SHR", .. }));
        }
    }

    #[test]
    fn horizontal_line_meets_saturation_at_dew_point() {
        let ctx = ctx();
        let room = ctx.tdb_rh(75.0, 50.0, "room").unwrap();
        let adp = find_adp_from_shr(&ctx, (room.tdb(), room.w()), 0.0).unwrap();
        assert!((adp - room.tdp()).abs() < 1e-6);
    }

    #[test]
    fn line_stays_at_or_below_saturation() {
        let ctx = ctx();
        let room = ctx.tdb_rh(75.0, 50.0, "room").unwrap();
        let slope = shr_slope(UnitSystem::IP, 0.7).unwrap();
        let points = generate_shr_line(&ctx, (room.tdb(), room.w()), slope);
        assert!(!points.is_empty() && points.len() <= LINE_STEPS + 1);
        for p in &points {
            let w_sat = AshraeModel.sat_hum_ratio(UnitSystem::IP, p.tdb, 14.696).unwrap();
            assert!(p.w >= 0.0 && p.w <= w_sat * SATURATION_SLACK);
        }
    }

    fn gshr_input(bypass_factor: Option<f64>) -> GshrInput {
        GshrInput {
            unit_system: UnitSystem::IP,
            pressure: None,
            room: StateSpec::new(Property::Tdb, Property::RH, (75.0, 50.0)),
            outdoor: StateSpec::new(Property::Tdb, Property::Twb, (95.0, 75.0)),
            room_sensible_load: 60_000.0,
            room_total_load: 75_000.0,
            oa_fraction: 0.15,
            total_airflow: 4000.0,
            bypass_factor,
        }
    }

    #[test]
    fn ventilation_lowers_grand_shr() {
        let out = calculate_gshr(&AshraeModel, &gshr_input(Some(0.1))).unwrap();
        assert!((out.room_shr - 0.8).abs() < 1e-12);
        assert!(out.ventilation_sensible > 0.0 && out.ventilation_total > out.ventilation_sensible);
        assert!(out.gshr < out.room_shr);
        let eshr = out.eshr.unwrap();
        assert!((eshr - (1.0 - (1.0 - out.gshr) / 0.9)).abs() < 1e-12);
        assert!(out.gshr_line.adp.tdb() < out.room_line.adp.tdb());
        assert!(out.eshr_line.is_some());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn mixed_state_sits_between_room_and_outdoor() {
        let out = calculate_gshr(&AshraeModel, &gshr_input(None)).unwrap();
        assert!(out.mixed.tdb() > out.room.tdb() && out.mixed.tdb() < out.outdoor.tdb());
        let tdb = out.room.tdb() + 0.15 * (out.outdoor.tdb() - out.room.tdb());
        let w = out.room.w() + 0.15 * (out.outdoor.w() - out.room.w());
        assert!((out.mixed.tdb() - tdb).abs() < 1e-9);
        assert!((out.mixed.w() - w).abs() < 1e-12);
        assert!(out.eshr.is_none() && out.eshr_line.is_none());
    }

    #[test]
    fn sensible_above_total_is_rejected() {
        let mut input = gshr_input(None);
        input.room_sensible_load = 90_000.0;
        let err = calculate_gshr(&AshraeModel, &input).unwrap_err();
        assert!(matches!(err, AnalysisError::Validation { field: "room_sensible_load", .. }));
    }

    #[test]
    fn non_positive_total_heat_falls_back_to_unity() {
        let mut input = gshr_input(None);
        input.room_sensible_load = -10_000.0;
        input.room_total_load = -5_000.0;
        input.oa_fraction = 0.0;
        let out = calculate_gshr(&AshraeModel, &input).unwrap();
        assert_eq!(out.gshr, 1.0);
        assert!(out.warnings.iter().any(|w| w.contains("non-positive")));
    }
}
