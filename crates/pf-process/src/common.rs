//! Common utilities for process calculations.

use pf_core::{UnitSystem, lerp};
use pf_props::PsychrometricState;

use crate::error::ProcessError;
use crate::result::PathPoint;
use crate::traits::SolveContext;

/// Segments along straight process lines.
pub const LINEAR_SEGMENTS: usize = 12;

/// Segments along constant wet-bulb curves.
pub const WET_BULB_SEGMENTS: usize = 20;

/// Segments along constant-enthalpy curves.
pub const ENTHALPY_SEGMENTS: usize = 16;

/// Total heat below which SHR is reported as 1.
pub const EPSILON_LOAD: f64 = 1e-10;

/// Ensure `value` lies in [0, 1].
pub fn check_unit_interval(value: f64, field: &'static str) -> Result<f64, ProcessError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ProcessError::validation(
            field,
            format!("must be between 0 and 1, got {value}"),
        ));
    }
    Ok(value)
}

/// Target RH in (0, 100].
pub fn check_target_rh(rh: f64) -> Result<f64, ProcessError> {
    if !rh.is_finite() || rh <= 0.0 || rh > 100.0 {
        return Err(ProcessError::validation(
            "target_rh",
            format!("must be within (0, 100], got {rh}"),
        ));
    }
    Ok(rh)
}

/// Straight segment from `from` to `to` as `segments + 1` points.
pub fn linear_path(units: UnitSystem, from: (f64, f64), to: (f64, f64), segments: usize) -> Vec<PathPoint> {
    let n = segments.max(1);
    (0..=n)
        .map(|i| {
            let t = i as f64 / n as f64;
            PathPoint::new(lerp(from.0, to.0, t), lerp(from.1, to.1, t), units)
        })
        .collect()
}

/// Constant wet-bulb curve swept in dry bulb.
pub fn wet_bulb_path(
    ctx: &SolveContext<'_>,
    start_tdb: f64,
    end_tdb: f64,
    twb: f64,
    segments: usize,
) -> Result<Vec<PathPoint>, ProcessError> {
    let n = segments.max(1);
    (0..=n)
        .map(|i| {
            let tdb = lerp(start_tdb, end_tdb, i as f64 / n as f64);
            Ok(PathPoint::new(tdb, ctx.w_at_wet_bulb(tdb, twb)?, ctx.units))
        })
        .collect()
}

/// Constant-enthalpy curve swept in humidity ratio.
pub fn enthalpy_path(
    ctx: &SolveContext<'_>,
    h: f64,
    start_w: f64,
    end_w: f64,
    segments: usize,
) -> Result<Vec<PathPoint>, ProcessError> {
    let n = segments.max(1);
    (0..=n)
        .map(|i| {
            let w = lerp(start_w, end_w, i as f64 / n as f64);
            let tdb = ctx.model.dry_bulb_from_enthalpy(ctx.units, h, w)?;
            Ok(PathPoint::new(tdb, w, ctx.units))
        })
        .collect()
}

/// Loads per unit mass of dry air, positive for heat removed from the air.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Loads {
    pub sensible: f64,
    pub latent: f64,
    pub total: f64,
    pub shr: f64,
}

impl Loads {
    pub fn between(units: UnitSystem, entering: &PsychrometricState, leaving: &PsychrometricState) -> Self {
        let sensible = units.cp_air() * (entering.tdb() - leaving.tdb());
        let total = entering.h() - leaving.h();
        Self::from_parts(sensible, total)
    }

    pub fn from_parts(sensible: f64, total: f64) -> Self {
        let shr = if total.abs() < EPSILON_LOAD {
            1.0
        } else {
            sensible / total
        };
        Self {
            sensible,
            latent: total - sensible,
            total,
            shr,
        }
    }

    /// Scale per-mass loads to absolute ones by a mass-flow factor.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            sensible: self.sensible * factor,
            latent: self.latent * factor,
            total: self.total * factor,
            shr: self.shr,
        }
    }
}

/// Sensible C factor: BTU/hr·CFM·°F (IP) or W per m³/s·K (SI).
pub fn sensible_c_factor(units: UnitSystem, density: f64) -> f64 {
    match units {
        UnitSystem::IP => 60.0 * density * units.cp_air(),
        UnitSystem::SI => density * 1006.0,
    }
}

/// Latent C factor per unit humidity ratio difference.
pub fn latent_c_factor(units: UnitSystem, density: f64) -> f64 {
    match units {
        UnitSystem::IP => 60.0 * density * units.hfg(),
        UnitSystem::SI => density * 2_501_000.0,
    }
}

/// Total C factor per unit enthalpy difference.
pub fn total_c_factor(units: UnitSystem, density: f64) -> f64 {
    match units {
        UnitSystem::IP => 60.0 * density,
        UnitSystem::SI => density * 1000.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_path_endpoints() {
        let path = linear_path(UnitSystem::IP, (80.0, 0.011), (50.0, 0.007), LINEAR_SEGMENTS);
        assert_eq!(path.len(), LINEAR_SEGMENTS + 1);
        assert_eq!(path[0].tdb, 80.0);
        assert!((path[LINEAR_SEGMENTS].w - 0.007).abs() < 1e-15);
        assert!((path[0].w_display - 77.0).abs() < 1e-9);
    }

    #[test]
    fn shr_defaults_to_one_without_total_load() {
        let loads = Loads::from_parts(0.0, 0.0);
        assert_eq!(loads.shr, 1.0);
        let loads = Loads::from_parts(6.0, 8.0);
        assert!((loads.shr - 0.75).abs() < 1e-12);
        assert!((loads.latent - 2.0).abs() < 1e-12);
    }

    #[test]
    fn sea_level_c_factors() {
        // Standard air, 0.075 lb/ft³
        let rho = 0.075;
        assert!((sensible_c_factor(UnitSystem::IP, rho) - 1.098).abs() < 1e-9);
        assert!((total_c_factor(UnitSystem::IP, rho) - 4.5).abs() < 1e-9);
        assert!((latent_c_factor(UnitSystem::IP, rho) - 4774.5).abs() < 1e-6);
        assert!((sensible_c_factor(UnitSystem::SI, 1.2) - 1207.2).abs() < 1e-9);
    }

    #[test]
    fn unit_interval_check() {
        assert!(check_unit_interval(0.5, "effectiveness").is_ok());
        assert!(check_unit_interval(1.2, "effectiveness").is_err());
        assert!(check_target_rh(0.0).is_err());
        assert!(check_target_rh(100.0).is_ok());
    }
}
