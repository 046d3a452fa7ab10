//! Property model trait and validation helpers.

use pf_core::UnitSystem;

use crate::error::{PropsError, PropsResult};

/// Ratio of molecular masses of water vapor and dry air.
pub const MOLAR_MASS_RATIO: f64 = 0.621_945;

/// Smallest humidity ratio handed to the correlations.
pub const MIN_HUM_RATIO: f64 = 1e-7;

/// Moist-air property primitives.
///
/// Every call names its unit system explicitly; implementations hold no
/// mutable state and must be thread-safe. Relative humidity is a 0..1 fraction
/// at this layer. Backends supply the core correlations; the composite
/// relations below are derived from them.
pub trait PropertyModel: Send + Sync {
    /// Model name (for debugging/logging).
    fn name(&self) -> &str;

    /// Saturation vapor pressure over water or ice at `tdb`.
    fn sat_vap_pres(&self, units: UnitSystem, tdb: f64) -> PropsResult<f64>;

    /// Dew point from vapor pressure, capped at `tdb`.
    fn dew_point_from_vap_pres(&self, units: UnitSystem, tdb: f64, pv: f64) -> PropsResult<f64>;

    /// Humidity ratio from the psychrometric wet-bulb equation.
    fn hum_ratio_from_wet_bulb(
        &self,
        units: UnitSystem,
        tdb: f64,
        twb: f64,
        pressure: f64,
    ) -> PropsResult<f64>;

    /// Moist-air enthalpy: BTU/lb (IP) or kJ/kg (SI).
    fn enthalpy(&self, units: UnitSystem, tdb: f64, w: f64) -> PropsResult<f64>;

    /// Closed-form inverse of [`PropertyModel::enthalpy`] at fixed `w`.
    fn dry_bulb_from_enthalpy(&self, units: UnitSystem, h: f64, w: f64) -> PropsResult<f64>;

    /// Moist-air specific volume, ft³/lb or m³/kg of dry air.
    fn specific_volume(&self, units: UnitSystem, tdb: f64, w: f64, pressure: f64)
    -> PropsResult<f64>;

    /// Standard-atmosphere pressure at altitude (ft or m).
    fn standard_pressure(&self, units: UnitSystem, altitude: f64) -> PropsResult<f64>;

    fn hum_ratio_from_vap_pres(&self, _units: UnitSystem, pv: f64, pressure: f64) -> PropsResult<f64> {
        validation::validate_pressure(pressure)?;
        if !pv.is_finite() || pv < 0.0 {
            return Err(PropsError::NonPhysical {
                what: "vapor pressure must be non-negative",
            });
        }
        if pv >= pressure {
            return Err(PropsError::Range {
                what: "vapor pressure",
                message: format!("{pv} is not below total pressure {pressure}"),
            });
        }
        Ok((MOLAR_MASS_RATIO * pv / (pressure - pv)).max(MIN_HUM_RATIO))
    }

    fn vap_pres_from_hum_ratio(&self, _units: UnitSystem, w: f64, pressure: f64) -> PropsResult<f64> {
        validation::validate_pressure(pressure)?;
        validation::validate_hum_ratio(w)?;
        let w = w.max(MIN_HUM_RATIO);
        Ok(pressure * w / (MOLAR_MASS_RATIO + w))
    }

    fn sat_hum_ratio(&self, units: UnitSystem, tdb: f64, pressure: f64) -> PropsResult<f64> {
        let ps = self.sat_vap_pres(units, tdb)?;
        self.hum_ratio_from_vap_pres(units, ps, pressure)
    }

    fn hum_ratio_from_rel_hum(
        &self,
        units: UnitSystem,
        tdb: f64,
        rh: f64,
        pressure: f64,
    ) -> PropsResult<f64> {
        validation::validate_rel_hum(rh)?;
        let pv = rh * self.sat_vap_pres(units, tdb)?;
        self.hum_ratio_from_vap_pres(units, pv, pressure)
    }

    fn hum_ratio_from_dew_point(&self, units: UnitSystem, tdp: f64, pressure: f64) -> PropsResult<f64> {
        let pv = self.sat_vap_pres(units, tdp)?;
        self.hum_ratio_from_vap_pres(units, pv, pressure)
    }

    fn rel_hum(&self, units: UnitSystem, tdb: f64, w: f64, pressure: f64) -> PropsResult<f64> {
        let pv = self.vap_pres_from_hum_ratio(units, w, pressure)?;
        Ok(pv / self.sat_vap_pres(units, tdb)?)
    }

    fn dew_point(&self, units: UnitSystem, tdb: f64, w: f64, pressure: f64) -> PropsResult<f64> {
        let pv = self.vap_pres_from_hum_ratio(units, w, pressure)?;
        self.dew_point_from_vap_pres(units, tdb, pv)
    }

    /// Wet bulb by bisection between the dew point and the dry bulb.
    fn wet_bulb(&self, units: UnitSystem, tdb: f64, w: f64, pressure: f64) -> PropsResult<f64> {
        let w = w.max(MIN_HUM_RATIO);
        let mut lower = self.dew_point(units, tdb, w, pressure)?;
        let mut upper = tdb;
        let mut twb = 0.5 * (lower + upper);

        for _ in 0..200 {
            if upper - lower <= validation::WET_BULB_TOLERANCE {
                return Ok(twb);
            }
            let w_star = self.hum_ratio_from_wet_bulb(units, tdb, twb, pressure)?;
            if w_star > w {
                upper = twb;
            } else {
                lower = twb;
            }
            twb = 0.5 * (lower + upper);
        }
        Err(PropsError::Convergence {
            what: "wet bulb",
            message: format!("bisection did not close at Tdb={tdb}, W={w}"),
        })
    }

    /// Degree of saturation, W / W_sat(Tdb).
    fn degree_of_saturation(&self, units: UnitSystem, tdb: f64, w: f64, pressure: f64) -> PropsResult<f64> {
        let w_sat = self.sat_hum_ratio(units, tdb, pressure)?;
        Ok(w / w_sat)
    }
}

/// Validation helpers for property inputs.
pub(crate) mod validation {
    use super::*;

    pub const WET_BULB_TOLERANCE: f64 = 1e-6;

    /// Ensure pressure is positive and finite.
    pub fn validate_pressure(p: f64) -> PropsResult<()> {
        if !p.is_finite() || p <= 0.0 {
            return Err(PropsError::validation(
                "pressure",
                format!("must be positive and finite, got {p}"),
            ));
        }
        Ok(())
    }

    pub fn validate_hum_ratio(w: f64) -> PropsResult<()> {
        if !w.is_finite() || w < 0.0 {
            return Err(PropsError::validation(
                "W",
                format!("humidity ratio must be non-negative, got {w}"),
            ));
        }
        Ok(())
    }

    /// Relative humidity as a fraction.
    pub fn validate_rel_hum(rh: f64) -> PropsResult<()> {
        if !rh.is_finite() || !(0.0..=1.0).contains(&rh) {
            return Err(PropsError::validation(
                "RH",
                format!("relative humidity fraction must be within [0, 1], got {rh}"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;

    #[test]
    fn validation_rejects_bad_inputs() {
        assert!(validate_pressure(0.0).is_err());
        assert!(validate_pressure(f64::NAN).is_err());
        assert!(validate_pressure(14.696).is_ok());
        assert!(validate_hum_ratio(-1e-3).is_err());
        assert!(validate_hum_ratio(0.0).is_ok());
        assert!(validate_rel_hum(1.2).is_err());
        assert!(validate_rel_hum(0.5).is_ok());
    }

    #[test]
    fn bad_pressure_is_a_client_error() {
        let err = validate_pressure(-14.7).unwrap_err();
        assert!(err.is_client_error());
        assert!(matches!(err, crate::PropsError::Validation { field: "pressure", .. }));
    }
}
