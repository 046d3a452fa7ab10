//! State resolution from any supported input pair.
//!
//! Pairs with a closed-form humidity ratio go straight to (Tdb, W). The rest
//! are solved with bracketed Brent searches:
//! - (Tdb, h): W over [0, W_sat(Tdb)]
//! - (Twb, RH): Tdb over [Twb, search max] along the wet-bulb relation
//! - (Tdp, RH): Tdb over [Tdp, search max] with Psat(Tdb) = Pv / RH

use pf_core::units::{convert_pressure, convert_temperature};
use pf_core::{PfError, RootConfig, UnitSystem, brent};
use tracing::debug;

use crate::error::{PropsError, PropsResult};
use crate::model::{PropertyModel, validation};
use crate::state::{DerivedProperties, InputPair, Property, PsychrometricState};

/// Slack on range checks before a target counts as unreachable.
const RANGE_TOLERANCE: f64 = 1e-9;

fn check_finite(field: &'static str, v: f64) -> PropsResult<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PropsError::validation(field, format!("must be finite, got {v}")))
    }
}

fn check_pressure(pressure: f64) -> PropsResult<()> {
    if !pressure.is_finite() || pressure <= 0.0 {
        return Err(PropsError::validation(
            "pressure",
            format!("must be positive, got {pressure}"),
        ));
    }
    Ok(())
}

fn check_rh_percent(rh: f64, allow_zero: bool) -> PropsResult<()> {
    let ok = if allow_zero {
        (0.0..=100.0).contains(&rh)
    } else {
        rh > 0.0 && rh <= 100.0
    };
    if !ok {
        let bounds = if allow_zero { "[0, 100]" } else { "(0, 100]" };
        return Err(PropsError::validation(
            "RH",
            format!("must be within {bounds}, got {rh}"),
        ));
    }
    Ok(())
}

/// Map a bracket failure to the resolver's error class.
fn no_sign_change_as(err: PropsError, class: fn(String) -> PropsError) -> PropsError {
    match err {
        PropsError::Numeric(PfError::NoSignChange { what, lo, hi }) => {
            class(format!("no solution for {what} in [{lo}, {hi}]"))
        }
        other => other,
    }
}

/// Resolve a full state from an (unordered) input pair.
pub fn resolve(
    model: &dyn PropertyModel,
    pair: (Property, Property),
    values: (f64, f64),
    pressure: f64,
    units: UnitSystem,
    label: Option<&str>,
) -> PropsResult<PsychrometricState> {
    let (pair, (a, b)) = InputPair::canonicalize(pair.0, pair.1, values)?;
    let (pa, pb) = pair.properties();
    check_finite(pa.label(), a)?;
    check_finite(pb.label(), b)?;
    check_pressure(pressure)?;

    debug!(pair = %pair, a, b, pressure, units = %units, "resolving state");

    let cfg = RootConfig::default();
    let (tdb, w) = match pair {
        InputPair::TdbRh => {
            check_rh_percent(b, true)?;
            (a, model.hum_ratio_from_rel_hum(units, a, b / 100.0, pressure)?)
        }
        InputPair::TdbTwb => {
            if b > a + RANGE_TOLERANCE {
                return Err(PropsError::validation(
                    "Twb",
                    format!("wet bulb {b} exceeds dry bulb {a}"),
                ));
            }
            (a, model.hum_ratio_from_wet_bulb(units, a, b.min(a), pressure)?)
        }
        InputPair::TdbTdp => {
            if b > a + RANGE_TOLERANCE {
                return Err(PropsError::validation(
                    "Tdp",
                    format!("dew point {b} exceeds dry bulb {a}"),
                ));
            }
            (a, model.hum_ratio_from_dew_point(units, b.min(a), pressure)?)
        }
        InputPair::TdbW => {
            validation::validate_hum_ratio(b)?;
            (a, b)
        }
        InputPair::TdbH => (a, hum_ratio_from_tdb_h(model, a, b, pressure, units, &cfg)?),
        InputPair::TwbRh => {
            let tdb = tdb_from_twb_rh(model, a, b, pressure, units, &cfg)?;
            (tdb, model.hum_ratio_from_wet_bulb(units, tdb, a.min(tdb), pressure)?)
        }
        InputPair::TdpRh => {
            check_rh_percent(b, false)?;
            let pv = model.sat_vap_pres(units, a)?;
            let target = pv / (b / 100.0);
            let tdb = if b >= 100.0 - RANGE_TOLERANCE {
                a
            } else {
                brent(
                    |t| Ok::<_, PropsError>(model.sat_vap_pres(units, t)? - target),
                    a,
                    units.tdb_search_max(),
                    &cfg,
                    "dry bulb from dew point and RH",
                )
                .map_err(|e| {
                    no_sign_change_as(e, |message| PropsError::Convergence {
                        what: "dry bulb from dew point and RH",
                        message,
                    })
                })?
            };
            (tdb, model.hum_ratio_from_vap_pres(units, pv, pressure)?)
        }
    };

    build_state(
        model,
        tdb,
        w,
        pressure,
        units,
        pair,
        (a, b),
        label.map(str::to_string),
    )
}

fn hum_ratio_from_tdb_h(
    model: &dyn PropertyModel,
    tdb: f64,
    h: f64,
    pressure: f64,
    units: UnitSystem,
    cfg: &RootConfig,
) -> PropsResult<f64> {
    let w_sat = model.sat_hum_ratio(units, tdb, pressure)?;
    let h_min = model.enthalpy(units, tdb, 0.0)?;
    let h_max = model.enthalpy(units, tdb, w_sat)?;
    let slack = RANGE_TOLERANCE * h_max.abs().max(1.0);
    if h < h_min - slack || h > h_max + slack {
        return Err(PropsError::Range {
            what: "enthalpy",
            message: format!(
                "h={h} {} unreachable at Tdb={tdb}; valid range [{h_min:.4}, {h_max:.4}]",
                units.enthalpy_label()
            ),
        });
    }
    let target = h.clamp(h_min, h_max);
    brent(
        |w| Ok::<_, PropsError>(model.enthalpy(units, tdb, w)? - target),
        0.0,
        w_sat,
        cfg,
        "humidity ratio from enthalpy",
    )
    .map_err(|e| {
        no_sign_change_as(e, |message| PropsError::Range {
            what: "enthalpy",
            message,
        })
    })
}

fn tdb_from_twb_rh(
    model: &dyn PropertyModel,
    twb: f64,
    rh: f64,
    pressure: f64,
    units: UnitSystem,
    cfg: &RootConfig,
) -> PropsResult<f64> {
    check_rh_percent(rh, false)?;
    if rh >= 100.0 - RANGE_TOLERANCE {
        return Ok(twb);
    }
    let objective = |tdb: f64| -> PropsResult<f64> {
        let w = model.hum_ratio_from_wet_bulb(units, tdb, twb.min(tdb), pressure)?;
        Ok(100.0 * model.rel_hum(units, tdb, w, pressure)? - rh)
    };
    brent(
        objective,
        twb,
        units.tdb_search_max(),
        cfg,
        "dry bulb from wet bulb and RH",
    )
    .map_err(|e| {
        no_sign_change_as(e, |message| PropsError::Convergence {
            what: "dry bulb from wet bulb and RH",
            message,
        })
    })
}

#[allow(clippy::too_many_arguments)]
fn build_state(
    model: &dyn PropertyModel,
    tdb: f64,
    w: f64,
    pressure: f64,
    units: UnitSystem,
    pair: InputPair,
    input_values: (f64, f64),
    label: Option<String>,
) -> PropsResult<PsychrometricState> {
    let ps = model.sat_vap_pres(units, tdb)?;
    let pv = model.vap_pres_from_hum_ratio(units, w, pressure)?;
    let w_sat = model.hum_ratio_from_vap_pres(units, ps, pressure)?;
    let tdp = model.dew_point_from_vap_pres(units, tdb, pv)?;
    let twb = model.wet_bulb(units, tdb, w, pressure)?;
    let derived = DerivedProperties {
        twb: twb.max(tdp).min(tdb),
        tdp,
        rh: 100.0 * pv / ps,
        h: model.enthalpy(units, tdb, w)?,
        v: model.specific_volume(units, tdb, w, pressure)?,
        pv,
        ps,
        mu: w / w_sat,
    };
    Ok(PsychrometricState::from_parts(
        tdb,
        w,
        pressure,
        units,
        derived,
        pair,
        input_values,
        label,
    ))
}

/// Saturated state at `tdb`.
pub fn resolve_saturated(
    model: &dyn PropertyModel,
    tdb: f64,
    pressure: f64,
    units: UnitSystem,
    label: Option<&str>,
) -> PropsResult<PsychrometricState> {
    resolve(model, (Property::Tdb, Property::RH), (tdb, 100.0), pressure, units, label)
}

pub fn resolve_tdb_w(
    model: &dyn PropertyModel,
    tdb: f64,
    w: f64,
    pressure: f64,
    units: UnitSystem,
    label: Option<&str>,
) -> PropsResult<PsychrometricState> {
    resolve(model, (Property::Tdb, Property::W), (tdb, w), pressure, units, label)
}

/// Re-express a state in another unit system.
///
/// Tdb and pressure are converted; W carries over unchanged and the rest is
/// recomputed (the enthalpy datums differ between systems).
pub fn convert_state(
    model: &dyn PropertyModel,
    state: &PsychrometricState,
    target: UnitSystem,
) -> PropsResult<PsychrometricState> {
    let from = state.unit_system();
    if from == target {
        return Ok(state.clone());
    }
    let tdb = convert_temperature(state.tdb(), from, target);
    let pressure = convert_pressure(state.pressure(), from, target);
    resolve_tdb_w(model, tdb, state.w(), pressure, target, state.label())
}

/// Standard-atmosphere pressure at `altitude` (ft or m).
pub fn standard_pressure(model: &dyn PropertyModel, altitude: f64, units: UnitSystem) -> PropsResult<f64> {
    model.standard_pressure(units, altitude)
}
