//! ASHRAE Handbook Fundamentals (2017) moist-air correlations.
//!
//! Saturation pressure uses the Hyland-Wexler fits over ice below the triple
//! point and over liquid water above it. IP results are in psia, BTU/lb and
//! ft³/lb; SI results in Pa, kJ/kg and m³/kg.

use pf_core::UnitSystem;

use crate::error::{PropsError, PropsResult};
use crate::model::{MIN_HUM_RATIO, PropertyModel, validation};

const RANKINE_OFFSET: f64 = 459.67;
const KELVIN_OFFSET: f64 = 273.15;

const TRIPLE_POINT_IP: f64 = 32.018;
const TRIPLE_POINT_SI: f64 = 0.01;
const FREEZING_POINT_IP: f64 = 32.0;
const FREEZING_POINT_SI: f64 = 0.0;

const R_DA_IP: f64 = 53.350;
const R_DA_SI: f64 = 287.042;

const DEW_POINT_TOLERANCE: f64 = 1e-7;
const DEW_POINT_MAX_ITER: usize = 100;

/// Saturation-pressure domain of the fits.
fn psat_domain(units: UnitSystem) -> (f64, f64) {
    match units {
        UnitSystem::IP => (-148.0, 392.0),
        UnitSystem::SI => (-100.0, 200.0),
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AshraeModel;

impl AshraeModel {
    pub fn new() -> Self {
        Self
    }

    fn check_domain(units: UnitSystem, tdb: f64) -> PropsResult<()> {
        let (lo, hi) = psat_domain(units);
        if !tdb.is_finite() || tdb < lo || tdb > hi {
            return Err(PropsError::Range {
                what: "saturation pressure",
                message: format!(
                    "temperature {tdb} {} outside [{lo}, {hi}]",
                    units.temperature_label()
                ),
            });
        }
        Ok(())
    }

    fn ln_sat_vap_pres(units: UnitSystem, tdb: f64) -> f64 {
        match units {
            UnitSystem::IP => {
                let t = tdb + RANKINE_OFFSET;
                if tdb <= TRIPLE_POINT_IP {
                    -1.021_416_5e4 / t - 4.893_242_8 - 5.376_579_4e-3 * t
                        + 1.920_237_7e-7 * t * t
                        + 3.557_583_2e-10 * t.powi(3)
                        - 9.034_468_8e-14 * t.powi(4)
                        + 4.163_501_9 * t.ln()
                } else {
                    -1.044_039_7e4 / t - 1.129_465_0e1 - 2.702_235_5e-2 * t
                        + 1.289_036_0e-5 * t * t
                        - 2.478_068_1e-9 * t.powi(3)
                        + 6.545_967_3 * t.ln()
                }
            }
            UnitSystem::SI => {
                let t = tdb + KELVIN_OFFSET;
                if tdb <= TRIPLE_POINT_SI {
                    -5.674_535_9e3 / t + 6.392_524_7 - 9.677_843e-3 * t
                        + 6.221_570_1e-7 * t * t
                        + 2.074_782_5e-9 * t.powi(3)
                        - 9.484_024e-13 * t.powi(4)
                        + 4.163_501_9 * t.ln()
                } else {
                    -5.800_220_6e3 / t + 1.391_499_3 - 4.864_023_9e-2 * t
                        + 4.176_476_8e-5 * t * t
                        - 1.445_209_3e-8 * t.powi(3)
                        + 6.545_967_3 * t.ln()
                }
            }
        }
    }

    /// d(ln Pws)/dT, per degree of the unit system.
    fn d_ln_sat_vap_pres(units: UnitSystem, tdb: f64) -> f64 {
        match units {
            UnitSystem::IP => {
                let t = tdb + RANKINE_OFFSET;
                if tdb <= TRIPLE_POINT_IP {
                    1.021_416_5e4 / (t * t) - 5.376_579_4e-3 + 2.0 * 1.920_237_7e-7 * t
                        + 3.0 * 3.557_583_2e-10 * t * t
                        - 4.0 * 9.034_468_8e-14 * t.powi(3)
                        + 4.163_501_9 / t
                } else {
                    1.044_039_7e4 / (t * t) - 2.702_235_5e-2 + 2.0 * 1.289_036_0e-5 * t
                        - 3.0 * 2.478_068_1e-9 * t * t
                        + 6.545_967_3 / t
                }
            }
            UnitSystem::SI => {
                let t = tdb + KELVIN_OFFSET;
                if tdb <= TRIPLE_POINT_SI {
                    5.674_535_9e3 / (t * t) - 9.677_843e-3 + 2.0 * 6.221_570_1e-7 * t
                        + 3.0 * 2.074_782_5e-9 * t * t
                        - 4.0 * 9.484_024e-13 * t.powi(3)
                        + 4.163_501_9 / t
                } else {
                    5.800_220_6e3 / (t * t) - 4.864_023_9e-2 + 2.0 * 4.176_476_8e-5 * t
                        - 3.0 * 1.445_209_3e-8 * t * t
                        + 6.545_967_3 / t
                }
            }
        }
    }
}

impl PropertyModel for AshraeModel {
    fn name(&self) -> &str {
        "ASHRAE 2017"
    }

    fn sat_vap_pres(&self, units: UnitSystem, tdb: f64) -> PropsResult<f64> {
        Self::check_domain(units, tdb)?;
        Ok(Self::ln_sat_vap_pres(units, tdb).exp())
    }

    fn dew_point_from_vap_pres(&self, units: UnitSystem, tdb: f64, pv: f64) -> PropsResult<f64> {
        let (lo, hi) = psat_domain(units);
        let pv_lo = self.sat_vap_pres(units, lo)?;
        let pv_hi = self.sat_vap_pres(units, hi)?;
        if !(pv_lo..=pv_hi).contains(&pv) {
            return Err(PropsError::Range {
                what: "dew point",
                message: format!("vapor pressure {pv} outside [{pv_lo}, {pv_hi}]"),
            });
        }

        // Newton on ln(Pws), kept inside the fit domain
        let ln_pv = pv.ln();
        let mut tdp = tdb.clamp(lo, hi);
        for iter in 0..DEW_POINT_MAX_ITER {
            let prev = tdp;
            let residual = Self::ln_sat_vap_pres(units, prev) - ln_pv;
            let slope = Self::d_ln_sat_vap_pres(units, prev);
            tdp = (prev - residual / slope).clamp(lo, hi);
            if (tdp - prev).abs() <= DEW_POINT_TOLERANCE {
                tracing::trace!(iterations = iter + 1, tdp, "dew point converged");
                return Ok(tdp.min(tdb));
            }
        }
        Err(PropsError::Convergence {
            what: "dew point",
            message: format!("Newton iteration did not converge for Pv={pv}"),
        })
    }

    fn hum_ratio_from_wet_bulb(
        &self,
        units: UnitSystem,
        tdb: f64,
        twb: f64,
        pressure: f64,
    ) -> PropsResult<f64> {
        if twb > tdb {
            return Err(PropsError::validation(
                "Twb",
                format!("wet bulb {twb} is above dry bulb {tdb}"),
            ));
        }
        let ws_star = self.sat_hum_ratio(units, twb, pressure)?;
        let w = match units {
            UnitSystem::IP => {
                if twb >= FREEZING_POINT_IP {
                    ((1093.0 - 0.556 * twb) * ws_star - 0.240 * (tdb - twb))
                        / (1093.0 + 0.444 * tdb - twb)
                } else {
                    ((1220.0 - 0.04 * twb) * ws_star - 0.240 * (tdb - twb))
                        / (1220.0 + 0.444 * tdb - 0.48 * twb)
                }
            }
            UnitSystem::SI => {
                if twb >= FREEZING_POINT_SI {
                    ((2501.0 - 2.326 * twb) * ws_star - 1.006 * (tdb - twb))
                        / (2501.0 + 1.86 * tdb - 4.186 * twb)
                } else {
                    ((2830.0 - 0.24 * twb) * ws_star - 1.006 * (tdb - twb))
                        / (2830.0 + 1.86 * tdb - 2.1 * twb)
                }
            }
        };
        Ok(w.max(MIN_HUM_RATIO))
    }

    fn enthalpy(&self, units: UnitSystem, tdb: f64, w: f64) -> PropsResult<f64> {
        validation::validate_hum_ratio(w)?;
        Ok(match units {
            UnitSystem::IP => 0.240 * tdb + w * (1061.0 + 0.444 * tdb),
            UnitSystem::SI => 1.006 * tdb + w * (2501.0 + 1.86 * tdb),
        })
    }

    fn dry_bulb_from_enthalpy(&self, units: UnitSystem, h: f64, w: f64) -> PropsResult<f64> {
        validation::validate_hum_ratio(w)?;
        Ok(match units {
            UnitSystem::IP => (h - 1061.0 * w) / (0.240 + 0.444 * w),
            UnitSystem::SI => (h - 2501.0 * w) / (1.006 + 1.86 * w),
        })
    }

    fn specific_volume(
        &self,
        units: UnitSystem,
        tdb: f64,
        w: f64,
        pressure: f64,
    ) -> PropsResult<f64> {
        validation::validate_pressure(pressure)?;
        validation::validate_hum_ratio(w)?;
        let w = w.max(MIN_HUM_RATIO);
        Ok(match units {
            UnitSystem::IP => {
                R_DA_IP * (tdb + RANKINE_OFFSET) * (1.0 + 1.607_858 * w) / (144.0 * pressure)
            }
            UnitSystem::SI => R_DA_SI * (tdb + KELVIN_OFFSET) * (1.0 + 1.607_858 * w) / pressure,
        })
    }

    fn standard_pressure(&self, units: UnitSystem, altitude: f64) -> PropsResult<f64> {
        let base = match units {
            UnitSystem::IP => 1.0 - 6.8754e-6 * altitude,
            UnitSystem::SI => 1.0 - 2.25577e-5 * altitude,
        };
        if !altitude.is_finite() || base <= 0.0 {
            return Err(PropsError::validation(
                "altitude",
                format!("{altitude} is outside the standard atmosphere"),
            ));
        }
        Ok(units.default_pressure() * base.powf(5.2559))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IP: UnitSystem = UnitSystem::IP;
    const SI: UnitSystem = UnitSystem::SI;

    fn rel_close(a: f64, b: f64, rel: f64) -> bool {
        (a - b).abs() <= rel * b.abs()
    }

    #[test]
    fn saturation_pressure_si_reference_values() {
        let m = AshraeModel;
        assert!(rel_close(m.sat_vap_pres(SI, 25.0).unwrap(), 3169.7, 1e-3));
        assert!(rel_close(m.sat_vap_pres(SI, 50.0).unwrap(), 12351.0, 1e-3));
        assert!(rel_close(m.sat_vap_pres(SI, 100.0).unwrap(), 101418.0, 1e-3));
        assert!(rel_close(m.sat_vap_pres(SI, -20.0).unwrap(), 103.24, 1e-3));
    }

    #[test]
    fn saturation_pressure_ip_matches_si() {
        let m = AshraeModel;
        let p_ip = m.sat_vap_pres(IP, 77.0).unwrap();
        let p_si = m.sat_vap_pres(SI, 25.0).unwrap();
        assert!(rel_close(p_ip * 6894.757, p_si, 1e-3));
    }

    #[test]
    fn saturation_pressure_outside_domain() {
        let m = AshraeModel;
        let err = m.sat_vap_pres(SI, 250.0).unwrap_err();
        assert!(matches!(err, PropsError::Range { .. }));
        assert!(m.sat_vap_pres(IP, -200.0).is_err());
    }

    #[test]
    fn dew_point_inverts_saturation() {
        let m = AshraeModel;
        for (units, t) in [(IP, 55.0), (IP, 10.0), (SI, 12.0), (SI, -15.0)] {
            let pv = m.sat_vap_pres(units, t).unwrap();
            let tdp = m.dew_point_from_vap_pres(units, t + 20.0, pv).unwrap();
            assert!((tdp - t).abs() < 1e-5, "{units} {t} -> {tdp}");
        }
    }

    #[test]
    fn dew_point_is_capped_at_dry_bulb() {
        let m = AshraeModel;
        let pv = m.sat_vap_pres(IP, 70.0).unwrap();
        assert_eq!(m.dew_point_from_vap_pres(IP, 60.0, pv).unwrap(), 60.0);
    }

    #[test]
    fn wet_bulb_equation_saturated_at_equal_temps() {
        let m = AshraeModel;
        let w = m.hum_ratio_from_wet_bulb(IP, 60.0, 60.0, 14.696).unwrap();
        let ws = m.sat_hum_ratio(IP, 60.0, 14.696).unwrap();
        assert!((w - ws).abs() < 1e-9);
        assert!(m.hum_ratio_from_wet_bulb(IP, 60.0, 61.0, 14.696).is_err());
    }

    #[test]
    fn enthalpy_inverse_is_exact() {
        let m = AshraeModel;
        for units in [IP, SI] {
            let h = m.enthalpy(units, 24.0, 0.008).unwrap();
            let t = m.dry_bulb_from_enthalpy(units, h, 0.008).unwrap();
            assert!((t - 24.0).abs() < 1e-10);
        }
    }

    #[test]
    fn si_state_at_25c_50pct() {
        let m = AshraeModel;
        let w = m.hum_ratio_from_rel_hum(SI, 25.0, 0.5, 101_325.0).unwrap();
        assert!((w - 0.00988).abs() < 5e-5);
        let h = m.enthalpy(SI, 25.0, w).unwrap();
        assert!((h - 50.3).abs() < 0.3);
        let v = m.specific_volume(SI, 25.0, w, 101_325.0).unwrap();
        assert!((v - 0.858).abs() < 0.003);
    }

    #[test]
    fn standard_pressure_values() {
        let m = AshraeModel;
        assert!((m.standard_pressure(IP, 0.0).unwrap() - 14.696).abs() < 1e-12);
        let denver = m.standard_pressure(IP, 5280.0).unwrap();
        assert!((denver - 12.1).abs() < 0.1);
        let si = m.standard_pressure(SI, 1500.0).unwrap();
        assert!((si - 84_556.0).abs() < 100.0);
        assert!(m.standard_pressure(SI, 1e6).is_err());
    }
}
