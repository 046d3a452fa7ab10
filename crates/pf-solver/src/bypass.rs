//! Bypass factor, forward and reverse.

use crate::error::{SolverError, SolverResult};

const MIN_SPAN: f64 = 1e-10;
const BF_SLACK: f64 = 1e-9;

/// BF = (leaving - ADP) / (entering - ADP), validated into [0, 1].
pub fn compute_bypass_factor(entering_tdb: f64, adp_tdb: f64, leaving_tdb: f64) -> SolverResult<f64> {
    let denom = entering_tdb - adp_tdb;
    if denom.abs() < MIN_SPAN {
        return Err(SolverError::Validation {
            field: "ADP_Tdb",
            message: format!("entering dry bulb equals ADP ({adp_tdb}); bypass factor undefined"),
        });
    }
    let bf = (leaving_tdb - adp_tdb) / denom;
    if !(-BF_SLACK..=1.0 + BF_SLACK).contains(&bf) {
        return Err(SolverError::Validation {
            field: "BF",
            message: format!("computed bypass factor {bf:.4} is outside [0, 1]; leaving state beyond ADP"),
        });
    }
    Ok(bf.clamp(0.0, 1.0))
}

/// Leaving (Tdb, W) a fraction `bf` of the way back from the ADP to the entering state.
pub fn apply_bypass_factor(entering: (f64, f64), adp: (f64, f64), bf: f64) -> SolverResult<(f64, f64)> {
    if !bf.is_finite() || bf <= 0.0 || bf >= 1.0 {
        return Err(SolverError::Validation {
            field: "bypass_factor",
            message: format!("must be between 0 and 1 (exclusive), got {bf}"),
        });
    }
    Ok((
        adp.0 + bf * (entering.0 - adp.0),
        adp.1 + bf * (entering.1 - adp.1),
    ))
}

pub fn contact_factor(bf: f64) -> f64 {
    1.0 - bf
}
