//! Apparatus dew point: where a process line meets the saturation curve.

use pf_core::{PfError, RootConfig, UnitSystem, scan_brent};
use pf_props::{PropertyModel, PropsError};
use tracing::debug;

use crate::error::{SolverError, SolverResult};
use crate::line::ProcessLine;

/// Search configuration for the saturation intersection.
#[derive(Clone, Copy, Debug)]
pub struct AdpSearch {
    /// Sub-intervals scanned downward from the upper bound
    pub steps: usize,
    pub root: RootConfig,
}

impl Default for AdpSearch {
    fn default() -> Self {
        Self {
            steps: 200,
            root: RootConfig {
                x_tol: 1e-8,
                max_iterations: 200,
            },
        }
    }
}

impl AdpSearch {
    /// Intersection of `line` with saturation in `[lower, upper]`, nearest `upper`.
    pub fn intersect(
        &self,
        model: &dyn PropertyModel,
        line: &ProcessLine,
        lower: f64,
        upper: f64,
        pressure: f64,
        units: UnitSystem,
    ) -> SolverResult<f64> {
        let (ot, ow) = line.origin();
        if !(upper > lower) {
            return Err(SolverError::NoIntersection {
                what: format!("search interval [{lower}, {upper}] is empty"),
            });
        }

        if line.is_horizontal() {
            // Constant W meets saturation at its dew point
            let tdp = model.dew_point(units, upper, ow, pressure)?;
            if tdp < lower || tdp > upper {
                return Err(SolverError::NoIntersection {
                    what: format!("dew point {tdp:.3} of W={ow:.6} outside [{lower}, {upper}]"),
                });
            }
            debug!(adp = tdp, "horizontal line meets saturation at dew point");
            return Ok(tdp);
        }

        let objective = |tdb: f64| -> Result<f64, PropsError> {
            Ok(model.sat_hum_ratio(units, tdb, pressure)? - line.w_at(tdb))
        };

        match scan_brent(objective, upper, lower, self.steps, &self.root, "apparatus dew point") {
            Ok(adp) => {
                debug!(adp, slope = line.slope(), origin_tdb = ot, "saturation intersection");
                Ok(adp)
            }
            Err(PropsError::Numeric(PfError::NoSignChange { lo, hi, .. })) => {
                Err(SolverError::NoIntersection {
                    what: format!(
                        "line through ({ot:.3}, {ow:.6}) with slope {:.3e} does not cross saturation in [{lo}, {hi}]",
                        line.slope()
                    ),
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// ADP dry bulb for the line from the entering through the leaving state.
///
/// Searches from the chart minimum up to the leaving dry bulb.
pub fn find_apparatus_dew_point(
    model: &dyn PropertyModel,
    entering: (f64, f64),
    leaving: (f64, f64),
    pressure: f64,
    units: UnitSystem,
) -> SolverResult<f64> {
    let line = ProcessLine::through(entering, leaving)?;
    AdpSearch::default().intersect(
        model,
        &line,
        units.chart_range().tdb_min,
        leaving.0,
        pressure,
        units,
    )
}

/// ADP for an arbitrary line, searched from the chart minimum up to `upper`.
pub fn find_adp_on_line(
    model: &dyn PropertyModel,
    line: &ProcessLine,
    upper: f64,
    pressure: f64,
    units: UnitSystem,
) -> SolverResult<f64> {
    AdpSearch::default().intersect(
        model,
        line,
        units.chart_range().tdb_min,
        upper,
        pressure,
        units,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_props::AshraeModel;

    const P: f64 = 14.696;
    const IP: UnitSystem = UnitSystem::IP;

    #[test]
    fn adp_lies_on_saturation_and_line() {
        let m = AshraeModel;
        let entering = (80.0, 0.0112);
        let leaving = (55.0, 0.0085);
        let adp = find_apparatus_dew_point(&m, entering, leaving, P, IP).unwrap();
        let line = ProcessLine::through(entering, leaving).unwrap();
        let w_sat = m.sat_hum_ratio(IP, adp, P).unwrap();
        assert!(adp < 55.0 && adp > 30.0);
        assert!((w_sat - line.w_at(adp)).abs() < 1e-8);
    }

    #[test]
    fn horizontal_line_gives_dew_point() {
        let m = AshraeModel;
        let w = 0.0093;
        let line = ProcessLine::with_slope(75.0, w, 0.0);
        let adp = find_adp_on_line(&m, &line, 75.0, P, IP).unwrap();
        let tdp = m.dew_point(IP, 75.0, w, P).unwrap();
        assert!((adp - tdp).abs() < 1e-9);
    }

    #[test]
    fn line_climbing_away_from_saturation_has_no_intersection() {
        let m = AshraeModel;
        // Cooling while adding moisture keeps the line below saturation
        let err = find_apparatus_dew_point(&m, (80.0, 0.001), (70.0, 0.0012), P, IP).unwrap_err();
        assert!(matches!(err, SolverError::NoIntersection { .. }), "{err:?}");
        assert!(err.is_client_error());
    }

    #[test]
    fn leaving_below_chart_minimum_is_rejected() {
        let m = AshraeModel;
        let err = find_apparatus_dew_point(&m, (40.0, 0.003), (15.0, 0.001), P, IP).unwrap_err();
        assert!(matches!(err, SolverError::NoIntersection { .. }));
    }

    #[test]
    fn chord_of_saturation_returns_upper_crossing() {
        let m = AshraeModel;
        let w40 = m.sat_hum_ratio(IP, 40.0, P).unwrap();
        let w70 = m.sat_hum_ratio(IP, 70.0, P).unwrap();
        let line = ProcessLine::through((40.0, w40), (70.0, w70)).unwrap();
        let f = |t: f64| m.sat_hum_ratio(IP, t, P).unwrap() - line.w_at(t);
        // Both ends of the bracket lie outside the chord
        assert!(f(20.0) > 0.0 && f(75.0) > 0.0);

        let adp = AdpSearch::default().intersect(&m, &line, 20.0, 75.0, P, IP).unwrap();
        assert!((adp - 70.0).abs() < 1e-6, "adp = {adp}");
    }
}
