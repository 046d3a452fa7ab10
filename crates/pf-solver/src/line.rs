//! Straight process lines in (Tdb, W).

use crate::error::{SolverError, SolverResult};

const MIN_SPAN: f64 = 1e-10;
const HORIZONTAL_SLOPE: f64 = 1e-15;

/// W(Tdb) = origin_w + slope * (Tdb - origin_tdb)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProcessLine {
    origin_tdb: f64,
    origin_w: f64,
    slope: f64,
}

impl ProcessLine {
    pub fn with_slope(origin_tdb: f64, origin_w: f64, slope: f64) -> Self {
        Self {
            origin_tdb,
            origin_w,
            slope,
        }
    }

    /// Line through two (Tdb, W) points.
    pub fn through(a: (f64, f64), b: (f64, f64)) -> SolverResult<Self> {
        let dt = b.0 - a.0;
        if dt.abs() < MIN_SPAN {
            return Err(SolverError::Validation {
                field: "Tdb",
                message: format!(
                    "entering and leaving dry bulb coincide ({}); line slope is undefined",
                    a.0
                ),
            });
        }
        Ok(Self::with_slope(a.0, a.1, (b.1 - a.1) / dt))
    }

    pub fn origin(&self) -> (f64, f64) {
        (self.origin_tdb, self.origin_w)
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn w_at(&self, tdb: f64) -> f64 {
        self.origin_w + self.slope * (tdb - self.origin_tdb)
    }

    pub fn is_horizontal(&self) -> bool {
        self.slope.abs() < HORIZONTAL_SLOPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_through_points() {
        let line = ProcessLine::through((80.0, 0.011), (55.0, 0.009)).unwrap();
        assert!((line.slope() - 0.002 / 25.0).abs() < 1e-15);
        assert!((line.w_at(55.0) - 0.009).abs() < 1e-15);
        assert!(!line.is_horizontal());
    }

    #[test]
    fn vertical_line_is_rejected() {
        let err = ProcessLine::through((70.0, 0.008), (70.0, 0.010)).unwrap_err();
        assert!(matches!(err, SolverError::Validation { field: "Tdb", .. }));
    }

    #[test]
    fn horizontal_line() {
        let line = ProcessLine::with_slope(75.0, 0.0093, 0.0);
        assert!(line.is_horizontal());
        assert_eq!(line.w_at(40.0), 0.0093);
    }
}
