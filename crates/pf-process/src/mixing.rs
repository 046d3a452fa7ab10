//! Adiabatic mixing of two airstreams (lever rule on W and h).

use pf_props::{PsychrometricState, StateSpec};
use serde::{Deserialize, Serialize};

use crate::common::{LINEAR_SEGMENTS, check_unit_interval, linear_path};
use crate::error::ProcessError;
use crate::process::ProcessKind;
use crate::result::{ProcessResult, push_warning};
use crate::traits::{ProcessSolver, SolveContext};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mixing {
    pub stream2: StateSpec,
    /// Dry-air mass fraction of the start stream
    pub fraction: f64,
}

/// Mixed state of `fraction` parts `s1` and `1 - fraction` parts `s2`.
///
/// Dry bulb comes from the closed-form inverse of enthalpy at the mixed W.
pub fn mix_states(
    ctx: &SolveContext<'_>,
    s1: &PsychrometricState,
    s2: &PsychrometricState,
    fraction: f64,
    label: &str,
) -> Result<PsychrometricState, ProcessError> {
    let f = check_unit_interval(fraction, "fraction")?;
    let w = f * s1.w() + (1.0 - f) * s2.w();
    let h = f * s1.h() + (1.0 - f) * s2.h();
    let tdb = ctx.model.dry_bulb_from_enthalpy(ctx.units, h, w)?;
    ctx.tdb_w(tdb, w, label)
}

impl ProcessSolver for Mixing {
    fn start_label(&self) -> &'static str {
        "stream_1"
    }

    fn solve(&self, ctx: &SolveContext<'_>, start: &PsychrometricState) -> Result<ProcessResult, ProcessError> {
        let f = check_unit_interval(self.fraction, "fraction")?;
        let mut warnings = Vec::new();
        if f == 0.0 || f == 1.0 {
            let which = if f == 1.0 { "stream 1" } else { "stream 2" };
            push_warning(
                &mut warnings,
                format!("mixing fraction is {f}; the mixed state equals {which} (no actual mixing occurs)."),
            );
        }

        let stream2 = ctx.resolve(&self.stream2, "stream_2")?;
        let mixed = mix_states(ctx, start, &stream2, f, "mixed")?;
        let path = linear_path(
            ctx.units,
            (start.tdb(), start.w()),
            (stream2.tdb(), stream2.w()),
            LINEAR_SEGMENTS,
        );

        let (tdb_mix, w_mix, w_mix_display, h_mix) = (mixed.tdb(), mixed.w(), mixed.w_display(), mixed.h());
        Ok(ProcessResult::new(ProcessKind::AdiabaticMixing, start.clone(), mixed)
            .with_path(path)
            .with_warnings(warnings)
            .meta("mixing_fraction", f)
            .meta("Tdb_mix", tdb_mix)
            .meta("W_mix", w_mix)
            .meta("W_mix_display", w_mix_display)
            .meta("h_mix", h_mix)
            .reference(stream2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::UnitSystem;
    use pf_props::{AshraeModel, Property};

    fn ctx() -> SolveContext<'static> {
        SolveContext::new(&AshraeModel, UnitSystem::IP, 14.696)
    }

    #[test]
    fn degenerate_fraction_warns() {
        let ctx = ctx();
        let s1 = ctx.tdb_rh(95.0, 40.0, "stream_1").unwrap();
        let m = Mixing {
            stream2: StateSpec::new(Property::Tdb, Property::RH, (75.0, 50.0)),
            fraction: 1.0,
        };
        let r = m.solve(&ctx, &s1).unwrap();
        assert_eq!(r.warnings.len(), 1);
        assert!((r.end.tdb() - 95.0).abs() < 1e-9);
        assert!(r.reference_state("stream_2").is_some());
    }

    #[test]
    fn fraction_outside_unit_interval_is_rejected() {
        let ctx = ctx();
        let s1 = ctx.tdb_rh(95.0, 40.0, "stream_1").unwrap();
        let m = Mixing {
            stream2: StateSpec::new(Property::Tdb, Property::RH, (75.0, 50.0)),
            fraction: 1.3,
        };
        let err = m.solve(&ctx, &s1).unwrap_err();
        assert!(matches!(err, ProcessError::Validation { field: "fraction", .. }));
    }
}
