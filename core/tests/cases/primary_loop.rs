use crate::common::TestHarness;
use approx::assert_relative_eq;
use pwrsim_core::traits::{read, write};
use pwrsim_core::*;

#[test]
fn test_pump_switch_applies_configured_constants() {
    let mut h = TestHarness::new();
    let pl = h.handles().primary_loop;
    let config = h.plant.config().primary_loop.clone();

    let on = h.queue(commands::pump_switch(true));
    h.step();
    {
        let pl = read(&pl);
        assert!(pl.pump_on());
        assert_eq!(pl.pump_pressure(), config.pump_on_pressure);
        assert_eq!(pl.flow_rate(), config.pump_on_flow_rate);
        assert_eq!(pl.pump_heat(), config.pump_on_heat);
    }
    assert_eq!(h.status_of(on), EventStatus::Completed);

    let off = h.queue(commands::pump_switch(false));
    h.step();
    {
        let pl = read(&pl);
        assert!(!pl.pump_on());
        assert_eq!(pl.pump_pressure(), config.pump_off_pressure);
        assert_eq!(pl.flow_rate(), config.pump_off_flow_rate);
        assert_eq!(pl.pump_heat(), config.pump_off_heat);
    }
    assert_eq!(h.status_of(off), EventStatus::Completed);
}

#[test]
fn test_boron_converges_exactly_with_pump_running() {
    let mut h = TestHarness::new();
    let pl = h.handles().primary_loop;
    assert_eq!(h.plant.config().primary_loop.max_boron_rate_of_change, 0.083);
    let target = 0.83;
    let ticks = 10;

    h.queue(commands::pump_switch(true));
    let id = h.queue(commands::boron_concentration(target));

    h.run_for(ticks - 1);
    assert!(read(&pl).boron_concentration() < target);
    assert_eq!(h.status_of(id), EventStatus::InProgress);

    h.step();
    assert_eq!(read(&pl).boron_concentration(), target);
    assert_eq!(h.status_of(id), EventStatus::Completed);
}

#[test]
fn test_boron_frozen_while_pump_off() {
    let mut h = TestHarness::new();
    let pl = h.handles().primary_loop;
    let id = h.queue(commands::boron_concentration(500.0));

    h.run_for(100);

    assert_eq!(read(&pl).boron_concentration(), 0.0);
    assert_eq!(h.status_of(id), EventStatus::InProgress);
}

#[test]
fn test_boron_target_is_clamped_to_maximum() {
    let mut h = TestHarness::new();
    let pl = h.handles().primary_loop;
    let max = h.plant.config().primary_loop.max_boron_concentration;

    h.queue(commands::pump_switch(true));
    write_boron(&pl, max - 0.05);
    let id = h.queue(commands::boron_concentration(max + 1000.0));
    h.step();

    assert_eq!(read(&pl).boron_concentration(), max);
    assert_eq!(h.status_of(id), EventStatus::Completed);
}

fn write_boron(pl: &Shared<components::PrimaryLoop>, ppm: f64) {
    let mut pl = write(pl);
    let was_on = pl.pump_on();
    pl.switch_pump(true);
    while pl.boron_concentration() != ppm {
        pl.adjust_boron(ppm);
    }
    pl.switch_pump(was_on);
}

#[test]
fn test_leg_temperatures_follow_pump() {
    let mut h = TestHarness::new();
    let pl = h.handles().primary_loop;
    let config = h.plant.config().clone();

    h.queue(commands::pump_switch(true));
    h.run_for(100);
    {
        let pl = read(&pl);
        assert_relative_eq!(pl.hot_leg_temperature(), 25.0, epsilon = 1e-6);
        assert_relative_eq!(
            pl.cold_leg_temperature(),
            25.0 - config.primary_loop.loop_delta_t,
            epsilon = 1e-6
        );
    }

    h.queue(commands::pump_switch(false));
    h.run_for(200);
    {
        let pl = read(&pl);
        assert_eq!(pl.hot_leg_temperature(), config.common.room_temperature);
        assert_eq!(pl.cold_leg_temperature(), config.common.room_temperature);
    }
}

#[test]
fn test_boron_event_remembers_starting_concentration() {
    let mut h = TestHarness::new();
    h.queue(commands::pump_switch(true));
    let up = h.queue(commands::boron_concentration(0.83));
    h.run_for(10);

    let down = h.queue(commands::boron_concentration(0.415));
    h.run_for(5);

    let origin = |id| h.plant.simulator().event(id).and_then(Event::original_value);
    assert_eq!(h.status_of(down), EventStatus::Completed);
    assert_eq!(origin(up), Some(0.0));
    assert_eq!(origin(down), Some(0.83));
    let snapshot = h.plant.simulator().event(down).map(Event::snapshot).unwrap();
    assert_eq!(snapshot.from_value, Some(0.83));
}
