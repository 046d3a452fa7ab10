use pf_core::UnitSystem;
use pf_process::{
    AdiabaticHumidification, CoolingDehumidification, Mixing, Process, ProcessInput, ProcessKind, SensibleMode,
    SolveContext, mix_states,
};
use pf_props::{AshraeModel, Property, StateSpec};
use proptest::prelude::*;

fn tdb_rh(tdb: f64, rh: f64) -> StateSpec {
    StateSpec::new(Property::Tdb, Property::RH, (tdb, rh))
}

#[test]
fn cooling_coil_forward_80_67() {
    let input = ProcessInput::new(
        UnitSystem::IP,
        StateSpec::new(Property::Tdb, Property::Twb, (80.0, 67.0)),
        Process::CoolingDehumidification(CoolingDehumidification::Forward {
            adp_tdb: 45.0,
            bypass_factor: 0.15,
        }),
    );
    let r = input.solve(&AshraeModel).unwrap();

    assert_eq!(r.kind, ProcessKind::CoolingDehumidification);
    assert!((r.end.tdb() - 50.25).abs() < 1e-9, "leaving Tdb = {}", r.end.tdb());
    assert!(r.end.rh() > 80.0, "leaving RH = {}", r.end.rh());
    assert!(r.end.w() < r.start.w());
    assert_eq!(r.start.label(), Some("entering"));
    assert!(r.reference_state("ADP").is_some());

    let shr = r.metadata_value("SHR").unwrap();
    assert!(shr > 0.0 && shr < 1.0, "SHR = {shr}");
    assert!((r.metadata_value("CF").unwrap() - 0.85).abs() < 1e-12);
}

#[test]
fn mixing_outdoor_and_return_air() {
    let input = ProcessInput::new(
        UnitSystem::IP,
        StateSpec::new(Property::Tdb, Property::Twb, (95.0, 75.0)),
        Process::Mixing(Mixing {
            stream2: tdb_rh(75.0, 50.0),
            fraction: 0.3,
        }),
    );
    let r = input.solve(&AshraeModel).unwrap();
    assert_eq!(r.kind, ProcessKind::AdiabaticMixing);
    assert!((r.end.tdb() - 81.0).abs() < 1.0, "mixed Tdb = {}", r.end.tdb());
    assert!(r.warnings.is_empty());
}

#[test]
fn saturating_adiabatic_humidifier_reaches_wet_bulb() {
    let input = ProcessInput::new(
        UnitSystem::IP,
        tdb_rh(80.0, 30.0),
        Process::AdiabaticHumidification(AdiabaticHumidification::Effectiveness { effectiveness: 1.0 }),
    );
    let r = input.solve(&AshraeModel).unwrap();
    assert!((r.end.rh() - 100.0).abs() < 0.1, "end RH = {}", r.end.rh());
    assert!((r.end.tdb() - r.start.twb()).abs() < 1e-9);
    assert!(r.reference_state("sat_at_Twb").is_some());
}

#[test]
fn sensible_heating_keeps_humidity_ratio() {
    let input = ProcessInput::new(
        UnitSystem::IP,
        tdb_rh(55.0, 50.0),
        Process::Sensible(SensibleMode::TargetTdb { tdb: 75.0 }),
    );
    let r = input.solve(&AshraeModel).unwrap();
    assert_eq!(r.kind, ProcessKind::SensibleHeating);
    assert!((r.end.w() - r.start.w()).abs() < 1e-6);
    assert!(r.end.rh() < r.start.rh());
    assert!(r.metadata_value("Qs_per_unit_mass").unwrap() > 0.0);
}

#[test]
fn si_cooling_coil_reverse() {
    let input = ProcessInput::new(
        UnitSystem::SI,
        tdb_rh(27.0, 50.0),
        Process::CoolingDehumidification(CoolingDehumidification::Reverse {
            leaving: tdb_rh(13.0, 90.0),
        }),
    )
    .at_pressure(101_325.0);
    let r = input.solve(&AshraeModel).unwrap();
    let adp = r.metadata_value("ADP_Tdb").unwrap();
    let bf = r.metadata_value("BF").unwrap();
    assert!(adp < 13.0 && adp > 0.0, "ADP = {adp}");
    assert!(bf > 0.0 && bf < 1.0, "BF = {bf}");
    // SI loads are kJ/kg
    assert!(r.metadata_value("Qt").unwrap() > 10.0);
}

#[test]
fn process_input_from_yaml() {
    let yaml = r#"
unit_system: IP
start:
  pair: [Tdb, RH]
  values: [75.0, 50.0]
  label: room
process:
  type: steam_humidification
  mode: target_rh
  rh: 60.0
"#;
    let input: ProcessInput = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(input.pressure(), 14.696);
    let r = input.solve(&AshraeModel).unwrap();
    assert_eq!(r.kind, ProcessKind::SteamHumidification);
    assert_eq!(r.start.label(), Some("room"));
    assert!((r.end.rh() - 60.0).abs() < 1e-6);
}

#[test]
fn unknown_process_type_fails_to_parse() {
    let yaml = r#"
unit_system: SI
start: { pair: [Tdb, RH], values: [25.0, 50.0] }
process: { type: freeze_drying }
"#;
    assert!(serde_yaml::from_str::<ProcessInput>(yaml).is_err());
}

#[test]
fn start_state_errors_surface_as_client_errors() {
    let input = ProcessInput::new(
        UnitSystem::IP,
        tdb_rh(75.0, 140.0),
        Process::Sensible(SensibleMode::DeltaT { delta_t: 5.0 }),
    );
    let err = input.solve(&AshraeModel).unwrap_err();
    assert!(err.is_client_error(), "{err}");
}

fn tdb_lever(mixed: f64, t1: f64, t2: f64) -> f64 {
    (mixed - t2) / (t1 - t2)
}

#[test]
fn mixed_dry_bulb_follows_lever_at_thirty_percent() {
    let ctx = SolveContext::new(&AshraeModel, UnitSystem::IP, 14.696);
    let s1 = ctx.tdb_rh(95.0, 40.0, "stream_1").unwrap();
    let s2 = ctx.tdb_rh(75.0, 50.0, "stream_2").unwrap();
    let m = mix_states(&ctx, &s1, &s2, 0.30, "mixed").unwrap();
    let ratio = tdb_lever(m.tdb(), s1.tdb(), s2.tdb());
    assert!((ratio - 0.30).abs() <= 0.01, "Tdb lever = {ratio}");
}

proptest! {
    // W spread stays under 0.007 so the h lever bends the Tdb ratio by < 0.01
    #[test]
    fn mixed_state_obeys_lever_rule(
        t1 in 60.0f64..100.0,
        w1 in 0.002f64..0.009,
        t2 in 55.0f64..90.0,
        w2 in 0.002f64..0.009,
        f in 0.0f64..=1.0,
    ) {
        prop_assume!((t1 - t2).abs() > 1.0);
        let ctx = SolveContext::new(&AshraeModel, UnitSystem::IP, 14.696);
        let s1 = ctx.tdb_w(t1, w1, "stream_1").unwrap();
        let s2 = ctx.tdb_w(t2, w2, "stream_2").unwrap();
        let m = mix_states(&ctx, &s1, &s2, f, "mixed").unwrap();

        let w_lever = f * s1.w() + (1.0 - f) * s2.w();
        let h_lever = f * s1.h() + (1.0 - f) * s2.h();
        prop_assert!((m.w() - w_lever).abs() <= 0.01 * w_lever.abs().max(1e-6));
        prop_assert!((m.h() - h_lever).abs() <= 0.01 * h_lever.abs().max(1e-6));

        let ratio = tdb_lever(m.tdb(), t1, t2);
        prop_assert!((ratio - f).abs() <= 0.01, "Tdb lever {} vs f {}", ratio, f);
    }
}
