use crate::common::TestHarness;
use approx::assert_relative_eq;
use pwrsim_core::steam_table::saturation_temperature;
use pwrsim_core::traits::{read, write};
use pwrsim_core::*;

#[test]
fn test_feedwater_ramps_up_and_down() {
    let mut h = TestHarness::new();
    let sl = h.handles().secondary_loop;

    let on = h.queue(commands::feedwater_pump_switch(true));
    h.step();
    assert_eq!(h.status_of(on), EventStatus::Completed);
    assert_relative_eq!(read(&sl).feedwater_flow_rate(), 0.8);

    h.run_for(24);
    assert_eq!(read(&sl).feedwater_flow_rate(), 20.0);
    assert_eq!(read(&sl).steam_flow_rate(), 400.0);

    h.queue(commands::feedwater_pump_switch(false));
    h.run_for(13);
    assert!(read(&sl).feedwater_flow_rate() > 0.0);
    h.step();
    assert_eq!(read(&sl).feedwater_flow_rate(), 0.0);
}

#[test]
fn test_feedheaters_warm_feedwater() {
    let mut h = TestHarness::new();
    let sl = h.handles().secondary_loop;

    h.queue(commands::feedheaters_switch(true));
    h.run_for(32);
    assert!(read(&sl).feedheaters_on());
    assert_eq!(read(&sl).feedwater_temperature_out(), 80.0);

    h.queue(commands::feedheaters_switch(false));
    h.run_for(16);
    assert_eq!(read(&sl).feedwater_temperature_out(), read(&sl).feedwater_temperature_in());
}

#[test]
fn test_mssv_vents_overpressure_in_the_same_tick() {
    let mut h = TestHarness::new();
    let sl = h.handles().secondary_loop;
    write(&sl).set_steam_pressure(9.0);

    h.step();
    assert_relative_eq!(read(&sl).steam_pressure(), 8.5);
    assert_relative_eq!(read(&sl).steam_temperature(), saturation_temperature(8.5));
    let vents = h.archived(commands::EMERGENCY_MSSV_RELEASED);
    assert_eq!(vents.len(), 1);
    assert_eq!(vents[0].status(), EventStatus::Completed);

    h.run_for(2);
    assert_relative_eq!(read(&sl).steam_pressure(), 8.0);
    assert_eq!(read(&sl).mssv_vents(), 2);
    assert_eq!(h.plant.status().mssv_vents, 2);
}

#[test]
fn test_porv_bleeds_steam_to_atmosphere() {
    let mut h = TestHarness::new();
    let sl = h.handles().secondary_loop;
    let atmospheric = h.plant.config().common.atmospheric_pressure;
    write(&sl).set_steam_pressure(2.0);

    let id = h.queue(commands::power_operated_relief_valve(true));
    h.run_for(3);
    assert_eq!(h.status_of(id), EventStatus::Completed);
    assert!(read(&sl).power_operated_relief_valve_open());
    assert_relative_eq!(read(&sl).steam_pressure(), 0.5, epsilon = 1e-12);

    h.step();
    assert_eq!(read(&sl).steam_pressure(), atmospheric);
    assert_relative_eq!(read(&sl).steam_temperature(), 100.0, epsilon = 1e-9);
}
