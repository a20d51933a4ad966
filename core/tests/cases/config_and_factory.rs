use crate::common::TestHarness;
use pwrsim_core::config::{CondenserType, TubeMaterial};
use pwrsim_core::traits::read;
use pwrsim_core::*;
use serde_json::json;

#[test]
fn test_partial_json_overrides_named_keys_only() {
    let config = PlantConfig::from_json(
        r#"{
            "primary_loop": { "pump_on_pressure": 2.5 },
            "condenser": { "condenser_type": "air-cooled", "tube_material": "copper_nickel" }
        }"#,
    )
    .unwrap();
    let defaults = PlantConfig::default();

    assert_eq!(config.primary_loop.pump_on_pressure, 2.5);
    assert_eq!(config.primary_loop.pump_on_flow_rate, defaults.primary_loop.pump_on_flow_rate);
    assert_eq!(config.condenser.condenser_type, CondenserType::AirCooled);
    assert_eq!(config.condenser.tube_material, TubeMaterial::CopperNickel);
    assert_eq!(config.pressurizer, defaults.pressurizer);

    let mut h = TestHarness::with_config(config);
    h.queue(commands::pump_switch(true));
    h.step();
    assert_eq!(read(&h.handles().primary_loop).pump_pressure(), 2.5);
}

#[test]
fn test_config_round_trips_through_json() {
    let config = PlantConfig::default();
    let restored = PlantConfig::from_value(config.to_json()).unwrap();
    assert_eq!(restored, config);
}

#[test]
fn test_bad_config_is_reported() {
    let err = PlantConfig::from_json(r#"{ "steam_turbine": { "max_rpm": -5 } }"#).unwrap_err();
    assert!(matches!(err, SimError::Config(_)));
}

#[test]
fn test_factory_builds_standalone_components() {
    let handle = create_component("Generator", json!({ "poles": 4 })).unwrap();
    {
        let generator = read(&handle);
        assert_eq!(generator.kind(), ComponentKind::Generator);
        assert_eq!(generator.name(), "GEN1");
        assert_eq!(generator.id().len(), 12);
    }

    // no turbine attached
    let mut sim = Simulator::new("Bench", "one generator");
    sim.add_component(handle);
    sim.step();
    let report = sim.last_report().unwrap();
    assert!(matches!(
        report.errors[0].error,
        SimError::MissingCollaborator { collaborator: "steam turbine", .. }
    ));

    assert!(create_component("CoolingTower", serde_json::Value::Null).is_none());
}

#[test]
fn test_catalog_lists_every_kind_once() {
    let catalog = component_catalog();
    let kinds: Vec<_> = catalog.iter().map(|(kind, _)| *kind).collect();
    assert_eq!(kinds.len(), 9);
    for (i, kind) in kinds.iter().enumerate() {
        assert!(!kinds[i + 1..].contains(kind), "{} listed twice", kind);
    }
    assert!(catalog.iter().all(|(_, description)| !description.is_empty()));
}

#[test]
fn test_turbine_report_from_the_library() {
    let report = turbine_calc::calculate(&turbine_calc::TurbineParams::default()).unwrap();
    let json = report.to_json();
    assert_eq!(json["stages"].as_array().unwrap().len(), 6);
    assert_eq!(json["condenserPressure"], 5.0);
    assert_eq!(json["extractionPressures"].as_array().unwrap().len(), 7);
}
