use crate::common::TestHarness;
use approx::assert_relative_eq;
use pwrsim_core::config::CondenserType;
use pwrsim_core::steam_table;
use pwrsim_core::traits::read;
use pwrsim_core::*;

#[test]
fn test_steam_generator_transfers_primary_heat() {
    let mut h = TestHarness::new();
    let sg = h.handles().steam_generator;
    let config = h.plant.config().clone();

    h.queue(commands::pump_switch(true));
    h.run_for(6000);

    let sg = read(&sg);
    let hot_leg = config.primary_loop.no_load_temperature;
    assert_relative_eq!(sg.primary_inlet_temp(), hot_leg, epsilon = 1e-9);
    assert_relative_eq!(sg.primary_outlet_temp(), hot_leg - 35.0, epsilon = 1e-9);
    assert_relative_eq!(sg.secondary_outlet_temp(), hot_leg - 40.0, epsilon = 1e-9);

    let expected_heat = config.primary_loop.pump_on_flow_rate * 740.0 * 5.5 * 35.0 / 1000.0;
    assert_relative_eq!(sg.heat_transfer_rate(), expected_heat, max_relative = 1e-9);
    assert_relative_eq!(sg.steam_flow_rate(), expected_heat * 1000.0 / 1500.0, max_relative = 1e-9);
}

#[test]
fn test_cold_plant_transfers_nothing() {
    let mut h = TestHarness::new();
    let sg = h.handles().steam_generator;
    h.queue(commands::pump_switch(true));
    h.step();

    // the coolant is still colder than the feedwater
    let sg = read(&sg);
    assert_eq!(sg.primary_outlet_temp(), sg.primary_inlet_temp());
    assert_eq!(sg.heat_transfer_rate(), 0.0);
    assert_eq!(sg.secondary_outlet_temp(), 40.0);
}

#[test]
fn test_turbine_reaches_synchronous_speed() {
    let mut h = TestHarness::new();
    let turbine = h.handles().steam_turbine;
    h.bring_turbine_to_speed();

    let turbine = read(&turbine);
    assert_eq!(turbine.rpm(), turbine.max_rpm());
    assert_eq!(turbine.inlet_pressure(), 7.0);
    assert_eq!(turbine.outlet_pressure(), 0.005);
    assert_eq!(turbine.steam_flow_rate(), 400.0);
    assert_relative_eq!(
        turbine.thermal_power(),
        400.0 * steam_table::from_pressure(7.0).enthalpy / 1000.0,
        max_relative = 1e-12
    );
}

#[test]
fn test_grid_sync_fails_off_frequency() {
    let mut h = TestHarness::new();
    let generator = h.handles().generator;

    let id = h.queue(commands::connect_to_grid(true));
    h.step();

    assert_eq!(h.status_of(id), EventStatus::Canceled);
    let generator = read(&generator);
    assert!(!generator.connected_to_grid());
    assert_eq!(generator.electrical_power_out(), 0.0);
    assert!(!generator.in_sync());
}

#[test]
fn test_generator_connects_at_sixty_hertz() {
    let mut h = TestHarness::new();
    let generator = h.handles().generator;
    h.bring_turbine_to_speed();

    let id = h.queue(commands::connect_to_grid(true));
    h.step();

    assert_eq!(h.status_of(id), EventStatus::Completed);
    {
        let generator = read(&generator);
        assert!(generator.connected_to_grid());
        assert_relative_eq!(generator.frequency(), 60.0);
        assert_relative_eq!(generator.electrical_power_out(), 3600.0 * 0.3);
    }

    let id = h.queue(commands::connect_to_grid(false));
    h.step();
    assert_eq!(h.status_of(id), EventStatus::Completed);
    assert!(!read(&generator).connected_to_grid());
    assert_eq!(read(&generator).electrical_power_out(), 0.0);
}

#[test]
fn test_losing_steam_trips_the_breaker() {
    let mut h = TestHarness::new();
    let generator = h.handles().generator;
    h.bring_turbine_to_speed();
    h.queue(commands::connect_to_grid(true));
    h.step();
    assert!(read(&generator).connected_to_grid());

    h.queue(commands::feedwater_pump_switch(false));
    let mut tripped = false;
    for _ in 0..10 {
        h.step();
        if h.last_errors()
            .iter()
            .any(|e| matches!(e, SimError::GridFrequencyExcursion { .. }))
        {
            tripped = true;
            break;
        }
    }

    assert!(tripped);
    assert!(!read(&generator).connected_to_grid());
    assert_eq!(read(&generator).electrical_power_out(), 0.0);
}

#[test]
fn test_water_cooled_condenser_balance() {
    let mut h = TestHarness::new();
    let condenser = h.handles().condenser;
    let turbine = h.handles().steam_turbine;
    let config = h.plant.config().clone();
    h.bring_turbine_to_speed();

    let thermal_power = read(&turbine).thermal_power();
    let condenser = read(&condenser);
    let rejected = thermal_power * (1.0 - config.condenser.thermal_efficiency);

    assert_eq!(condenser.condenser_type(), CondenserType::WaterCooled);
    assert_relative_eq!(condenser.heat_rejection(), rejected, max_relative = 1e-12);
    assert_eq!(condenser.cooling_water_temp_in(), 25.0);
    assert_eq!(condenser.cooling_water_temp_out(), 35.0);
    assert_eq!(condenser.condenser_temperature(), 40.0);
    assert_eq!(condenser.condenser_pressure(), steam_table::saturation_pressure(40.0));
    assert_relative_eq!(
        condenser.steam_flow_rate(),
        rejected * 1e6 / config.common.steam_latent_heat,
        max_relative = 1e-12
    );
    assert_relative_eq!(
        condenser.cooling_water_flow_rate(),
        rejected * 1e6 / (config.common.water_specific_heat * 10.0),
        max_relative = 1e-12
    );
    assert!(condenser.surface_area() > 0.0);
    assert!(condenser.heat_transfer_coefficient() > 0.0);
}

#[test]
fn test_air_cooled_condenser_tracks_weather() {
    let mut config = PlantConfig::default();
    config.condenser.condenser_type = CondenserType::AirCooled;
    let mut h = TestHarness::with_config(config);
    let condenser = h.handles().condenser;

    h.plant.simulator_mut().environment_mut().update_weather(30.0, 40.0, 3.0, 0.0);
    h.bring_turbine_to_speed();

    let condenser = read(&condenser);
    assert_eq!(condenser.condenser_temperature(), 55.0);
    assert_eq!(condenser.cooling_water_flow_rate(), 0.0);
    assert_eq!(condenser.condenser_pressure(), steam_table::saturation_pressure(55.0));
    assert!(condenser.heat_rejection() > 0.0);
}
