use crate::common::TestHarness;
use approx::assert_relative_eq;
use pwrsim_core::steam_table::saturation_pressure;
use pwrsim_core::traits::{read, write};
use pwrsim_core::*;

#[test]
fn test_heater_raises_pressure_to_target() {
    let mut h = TestHarness::new();
    let pr = h.handles().pressurizer;
    let config = h.plant.config().pressurizer.clone();

    h.queue(commands::heater_power(true));
    let id = h.queue(commands::target_pressure(0.5));

    h.step();
    assert_eq!(read(&pr).heater_power(), config.heater_high_power);
    assert!(read(&pr).heater_on_high());

    h.run_for(200);
    let pr = read(&pr);
    assert_eq!(h.status_of(id), EventStatus::Completed);
    assert!(pr.pressure() >= 0.5);
    assert!(pr.heater_on_low());
    assert_eq!(pr.pressure(), saturation_pressure(pr.temperature()));
}

#[test]
fn test_relief_valve_vents_above_threshold() {
    let mut h = TestHarness::new();
    let pr = h.handles().pressurizer;
    let config = h.plant.config().pressurizer.clone();

    h.queue(commands::heater_power(true));
    h.queue(commands::target_pressure(20.0));

    let mut ticks = 0;
    let peak = loop {
        let before = read(&pr).temperature();
        h.step();
        if read(&pr).relief_vents() > 0 {
            break saturation_pressure(before + config.heatup_rate);
        }
        ticks += 1;
        assert!(ticks < 500, "relief valve never lifted");
    };

    assert!(peak > config.relief_valve_threshold_pressure);
    assert_relative_eq!(
        read(&pr).pressure(),
        peak - config.relief_valve_pressure_drop,
        epsilon = 1e-9
    );

    let vents = h.archived(commands::RELIEF_VALVE_VENT);
    assert_eq!(vents.len(), 1);
    assert_eq!(vents[0].status(), EventStatus::Completed);
    assert_eq!(h.plant.event_handler().relief_vents(), 1);
    assert_eq!(h.plant.status().relief_vents, 1);
}

#[test]
fn test_spray_cools_down_to_cold_leg() {
    let mut h = TestHarness::new();
    let pr = h.handles().pressurizer;
    let pl = h.handles().primary_loop;
    write(&pr).set_temperature(300.0);

    // valve position alone does not move the temperature
    h.queue(commands::spray_nozzle(true));
    h.step();
    assert_eq!(read(&pr).temperature(), 300.0);
    assert!(read(&pr).spray_nozzle_open());

    // heater off and spray open: both cooling paths apply in one step
    let id = h.queue(commands::target_pressure(0.0));
    h.step();
    assert_relative_eq!(read(&pr).temperature(), 294.0, epsilon = 1e-9);
    assert_eq!(h.status_of(id), EventStatus::Completed);

    let floor = read(&pl).cold_leg_temperature();
    write(&pr).set_temperature(floor + 2.0);
    h.queue(commands::target_pressure(0.0));
    h.step();
    assert_eq!(read(&pr).temperature(), floor);
    assert_eq!(read(&pr).pressure(), saturation_pressure(floor));
}

#[test]
fn test_heater_off_never_warms_a_cold_pressurizer() {
    let mut h = TestHarness::new();
    let pr = h.handles().pressurizer;
    h.queue(commands::pump_switch(true));
    h.run_for(50);

    // below the (now warmer) cold leg
    write(&pr).set_temperature(15.0);
    h.queue(commands::target_pressure(1.0));
    h.run_for(10);

    assert_eq!(read(&pr).temperature(), 15.0);
}
