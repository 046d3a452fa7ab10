//! Bracketed scalar root-finding.
//!
//! Several psychrometric relations have no closed-form inverse (dry bulb from
//! wet bulb + RH, humidity ratio at constant enthalpy for a target RH, the
//! apparatus dew point). They are solved here with Brent's method on a bracket
//! that must contain a sign change. An invalid bracket fails immediately with
//! [`PfError::NoSignChange`]; the iteration count is bounded.
//!
//! Objectives return `Result` so that property-model errors raised while
//! evaluating a trial point propagate unchanged to the caller.

use crate::error::PfError;
use crate::numeric::{Real, ensure_finite};

/// Root-finder configuration.
#[derive(Clone, Copy, Debug)]
pub struct RootConfig {
    /// Absolute tolerance on the abscissa
    pub x_tol: Real,
    /// Maximum iterations
    pub max_iterations: usize,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            x_tol: 1e-9,
            max_iterations: 200,
        }
    }
}

fn finite<E: From<PfError>>(v: Real, what: &'static str) -> Result<Real, E> {
    ensure_finite(v, what).map_err(E::from)
}

/// Find a root of `f` in `[lo, hi]` with Brent's method.
///
/// `f(lo)` and `f(hi)` must differ in sign (a zero at either end is returned
/// directly).
pub fn brent<F, E>(mut f: F, lo: Real, hi: Real, cfg: &RootConfig, what: &'static str) -> Result<Real, E>
where
    F: FnMut(Real) -> Result<Real, E>,
    E: From<PfError>,
{
    if !lo.is_finite() || !hi.is_finite() {
        return Err(PfError::InvalidArg {
            what: "root bracket must be finite",
        }
        .into());
    }

    let mut a = lo;
    let mut b = hi;
    let mut fa = finite(f(a)?, what)?;
    let mut fb = finite(f(b)?, what)?;

    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }
    if fa.signum() == fb.signum() {
        return Err(PfError::NoSignChange {
            what,
            lo: lo.min(hi),
            hi: lo.max(hi),
        }
        .into());
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for iter in 0..cfg.max_iterations {
        if (fb > 0.0 && fc > 0.0) || (fb < 0.0 && fc < 0.0) {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol1 = 2.0 * Real::EPSILON * b.abs() + 0.5 * cfg.x_tol;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol1 || fb == 0.0 {
            tracing::trace!(what, iterations = iter, root = b, "brent converged");
            return Ok(b);
        }

        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            // Inverse quadratic interpolation, or secant when only two points exist
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let qa = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * xm * qa * (qa - r) - (b - a) * (r - 1.0)),
                    (qa - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let min1 = 3.0 * xm * q - (tol1 * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        if d.abs() > tol1 {
            b += d;
        } else {
            b += tol1.copysign(xm);
        }
        fb = finite(f(b)?, what)?;
    }

    Err(PfError::MaxIterations {
        what,
        iterations: cfg.max_iterations,
    }
    .into())
}

/// Walk from `upper` down to `lower` in `steps` equal sub-intervals and solve
/// the first one that contains a sign change.
///
/// This returns the root nearest to `upper`, which matters when the objective
/// has more than one root in `[lower, upper]` (a straight line can cut the
/// convex saturation curve twice).
pub fn scan_brent<F, E>(
    mut f: F,
    upper: Real,
    lower: Real,
    steps: usize,
    cfg: &RootConfig,
    what: &'static str,
) -> Result<Real, E>
where
    F: FnMut(Real) -> Result<Real, E>,
    E: From<PfError>,
{
    if steps == 0 || !(upper > lower) {
        return Err(PfError::InvalidArg {
            what: "scan requires upper > lower and at least one step",
        }
        .into());
    }

    let step = (upper - lower) / steps as Real;
    let mut x_hi = upper;
    let mut f_hi = finite(f(x_hi)?, what)?;
    if f_hi == 0.0 {
        return Ok(x_hi);
    }

    for i in 1..=steps {
        let x_lo = if i == steps {
            lower
        } else {
            upper - i as Real * step
        };
        let f_lo = finite(f(x_lo)?, what)?;
        if f_lo == 0.0 {
            return Ok(x_lo);
        }
        if f_lo.signum() != f_hi.signum() {
            tracing::trace!(what, x_lo, x_hi, "scan found sign change");
            return brent(&mut f, x_lo, x_hi, cfg, what);
        }
        x_hi = x_lo;
        f_hi = f_lo;
    }

    Err(PfError::NoSignChange {
        what,
        lo: lower,
        hi: upper,
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(v: Real) -> Result<Real, PfError> {
        Ok(v)
    }

    #[test]
    fn brent_finds_sqrt_two() {
        let root = brent(|x| ok(x * x - 2.0), 0.0, 2.0, &RootConfig::default(), "sqrt2").unwrap();
        assert!((root - 2.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn brent_accepts_reversed_bracket() {
        let root = brent(|x| ok(x.cos() - x), 1.0, 0.0, &RootConfig::default(), "dottie").unwrap();
        assert!((root - 0.739_085_133_2).abs() < 1e-8);
    }

    #[test]
    fn brent_returns_endpoint_zero() {
        let root = brent(|x| ok(x - 3.0), 3.0, 10.0, &RootConfig::default(), "edge").unwrap();
        assert_eq!(root, 3.0);
    }

    #[test]
    fn brent_rejects_bracket_without_sign_change() {
        let err = brent(|x| ok(x * x + 1.0), -1.0, 1.0, &RootConfig::default(), "none").unwrap_err();
        assert!(matches!(err, PfError::NoSignChange { what: "none", .. }));
    }

    #[test]
    fn brent_propagates_objective_error() {
        let err = brent(
            |x| {
                if x > 0.5 {
                    Err(PfError::InvalidArg { what: "domain" })
                } else {
                    Ok(x - 0.25)
                }
            },
            0.0,
            1.0,
            &RootConfig::default(),
            "domain",
        )
        .unwrap_err();
        assert_eq!(err, PfError::InvalidArg { what: "domain" });
    }

    #[test]
    fn brent_reports_non_finite_objective() {
        let err = brent(|_| ok(Real::NAN), 0.0, 1.0, &RootConfig::default(), "nan").unwrap_err();
        assert!(matches!(err, PfError::NonFinite { what: "nan", .. }));
    }

    #[test]
    fn brent_is_bounded() {
        let cfg = RootConfig {
            x_tol: 0.0,
            max_iterations: 3,
        };
        let err = brent(|x| ok(x.powi(3) - 0.3), 0.0, 1.0, &cfg, "bounded").unwrap_err();
        assert!(matches!(err, PfError::MaxIterations { iterations: 3, .. }));
    }

    #[test]
    fn scan_prefers_root_nearest_upper() {
        // Roots at 1 and 4; scanning down from 5 must find 4
        let f = |x: Real| ok((x - 1.0) * (x - 4.0));
        let root = scan_brent(f, 5.0, 0.0, 50, &RootConfig::default(), "two roots").unwrap();
        assert!((root - 4.0).abs() < 1e-8);

        // Plain Brent on the same bracket sees no sign change
        assert!(brent(f, 0.0, 5.0, &RootConfig::default(), "two roots").is_err());
    }

    #[test]
    fn scan_without_root_fails() {
        let err = scan_brent(|x| ok(x + 10.0), 5.0, 0.0, 10, &RootConfig::default(), "none").unwrap_err();
        assert_eq!(
            err,
            PfError::NoSignChange {
                what: "none",
                lo: 0.0,
                hi: 5.0
            }
        );
    }

    proptest::proptest! {
        #[test]
        fn brent_recovers_root_of_monotone_cubic(r in -50.0f64..50.0, span in 0.5f64..40.0) {
            let root = brent(|x| ok((x - r).powi(3) + (x - r)), r - span, r + 1.3 * span, &RootConfig::default(), "cubic")
                .unwrap();
            proptest::prop_assert!((root - r).abs() < 1e-6);
        }
    }
}
