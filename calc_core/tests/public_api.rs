//! End-to-end checks through the public API, the way the front ends use it.

use calc_core::calculations::cable_sizing::{self, CableSizingInput, PhaseSystem};
use calc_core::calculations::circuit_schedule::{self, CircuitSchedule, PowerUnit, ProtectionType};
use calc_core::calculations::shading::{self, ShadingInput};
use calc_core::format::{fmt2, UNDEFINED};
use calc_core::geo::parse_coordinates;
use calc_core::rtiebt::{ConductorMaterial, InstallationMethod, UsageType};
use calc_core::{CalcError, CalcSettings, CalculationItem, CalculationOutput};

#[test]
fn shading_from_pasted_coordinates() {
    let coords = parse_coordinates("38.7223, -9.1393").unwrap();
    let mut input = ShadingInput {
        b_m: 2.0,
        beta_deg: 30.0,
        ..ShadingInput::default()
    };
    input.set_latitude(coords.latitude);
    assert_eq!((input.lat_deg, input.lat_min, input.lat_sec), (38, 43, 20));

    let result = shading::calculate(&input).unwrap();
    // γ = 90 - (38.7222 + 23.44) = 27.84
    assert!((result.gama_deg - 27.8378).abs() < 1e-3);
    assert!((result.h_m - 1.0).abs() < 1e-9);
    let expected_d1 = 1.0 / result.gama_deg.to_radians().tan() + 0.2;
    assert!((result.d1_m - expected_d1).abs() < 1e-9);
    assert!((result.d_m - (expected_d1 + 3f64.sqrt())).abs() < 1e-9);
    assert_eq!(fmt2(result.h_m), "1,00");
}

#[test]
fn shading_undefined_spacing_displays_dash() {
    // γ at latitude 0 is 66.56; a slope of 66.56 makes the ray parallel
    let input = ShadingInput {
        b_m: 1.0,
        beta_deg: 20.0,
        alfa_deg: 66.56,
        ..ShadingInput::default()
    };
    let result = shading::calculate(&input).unwrap();
    assert!(!result.is_defined());
    assert_eq!(fmt2(result.d_m), UNDEFINED);

    let json = serde_json::to_value(&result).unwrap();
    assert!(json["d_m"].is_null());
}

#[test]
fn cable_sizing_through_settings() {
    let settings = CalcSettings::from_toml_str(
        r#"
        [cable]
        current_a = 20.0
        length_m = 25.0
        conductor_count = 1
        "#,
    )
    .unwrap();

    let input = settings.cable_input();
    let result = cable_sizing::calculate(&input).unwrap();
    assert!((result.drop_section_mm2 - 1.52).abs() < 0.01);
    assert_eq!(result.section_mm2, 2.5);
    assert!(result.passes());

    let mut three_phase = input.clone();
    three_phase.set_phases(PhaseSystem::ThreePhase);
    assert_eq!(three_phase.voltage_v, 400.0);
    let result = cable_sizing::calculate(&three_phase).unwrap();
    assert!(result.voltage_drop_percent < 5.0);
}

#[test]
fn aluminium_small_section_is_not_compliant() {
    let input = CableSizingInput {
        current_a: 10.0,
        length_m: 10.0,
        material: ConductorMaterial::Aluminum,
        method: InstallationMethod::C,
        usage: UsageType::Other,
        conductor_count: 1,
        ..CableSizingInput::default()
    };
    let result = cable_sizing::calculate(&input).unwrap();
    assert!(result.section_mm2 < 16.0);
    assert!(!result.passes());
    assert!(!result.failures().is_empty());
}

#[test]
fn validation_errors_name_the_field() {
    let input = CableSizingInput {
        conductor_count: 0,
        ..CableSizingInput::default()
    };
    let err = cable_sizing::calculate(&input).unwrap_err();
    assert_eq!(err.field(), Some("conductor_count"));
    assert_eq!(err.error_code(), "INVALID_INPUT");

    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["type"], "InvalidInput");
    assert_eq!(json["details"]["field"], "conductor_count");

    let back: CalcError = serde_json::from_value(json).unwrap();
    assert_eq!(back, err);
}

#[test]
fn circuit_schedule_from_json() {
    let json = r#"{
        "label": "PV plant",
        "rows": [
            {"label": "MB → Inverter 1", "power": 10.0, "section_mm2": 16.0, "length_m": 50.0,
             "in_a": 16.0, "iz_a": 20.0, "protection": "breaker_le_63a"},
            {"label": "Inverter 1 → String box", "power": 50.0, "power_unit": "kVA",
             "section_mm2": 35.0, "length_m": 30.0, "in_a": 80.0, "iz_a": 100.0}
        ]
    }"#;
    let schedule: CircuitSchedule = serde_json::from_str(json).unwrap();
    assert_eq!(schedule.rows[1].protection, ProtectionType::BreakerAbove63);
    assert_eq!(schedule.rows[1].power_unit, PowerUnit::Kva);

    let results = circuit_schedule::calculate(&schedule).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].ib_a, 14.5);
    assert!(results[0].passes());
    assert_eq!(results[1].ib_a, 72.2);
    let total = results[0].du_percent + results[1].du_percent;
    assert!((results[1].du_total_percent - total).abs() < 0.011);
}

#[test]
fn tagged_items_run_their_calculator() {
    let item = CalculationItem::CableSizing(CableSizingInput {
        label: "Kitchen".to_string(),
        ..CableSizingInput::default()
    });
    let json = serde_json::to_string(&item).unwrap();
    assert!(json.contains(r#""type":"CableSizing""#));

    let item: CalculationItem = serde_json::from_str(&json).unwrap();
    assert_eq!(item.label(), "Kitchen");
    match item.calculate().unwrap() {
        CalculationOutput::CableSizing(result) => assert!(result.section_mm2 >= 2.5),
        other => panic!("unexpected output {:?}", other),
    }
}
