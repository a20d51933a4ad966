//! Event codes understood by the plant and typed constructors for them.

use crate::event::Event;

pub const PUMP_SWITCH: &str = "primary_loop.cooling_pump.switch";
pub const BORON_CONCENTRATION: &str = "primary_loop.cvcs.boron_concentration_target";

pub const CONTROL_BANKS_TARGET: &str = "control_rods.control_banks.target";
pub const GRAY_BANKS_TARGET: &str = "control_rods.gray_banks.target";
pub const SHUTDOWN_BANKS_WITHDRAW: &str = "control_rods.shutdown_banks.withdraw";
pub const SCRAM: &str = "control_rods.scram";

pub const TARGET_PRESSURE: &str = "pressurizer.target_pressure.set";
pub const HEATER_POWER: &str = "pressurizer.heater_power";
pub const SPRAY_NOZZLE: &str = "pressurizer.spray_nozzle";
pub const RELIEF_VALVE_VENT: &str = "pressurizer.relief_valve.vented";

pub const FEEDWATER_PUMP_SWITCH: &str = "secondary_loop.feedwater_pump.switch";
pub const FEEDHEATERS_SWITCH: &str = "secondary_loop.feedheaters.switch";
pub const POWER_OPERATED_RELIEF_VALVE: &str = "secondary_loop.power_operated_relief_valve.switch";
pub const EMERGENCY_MSSV_RELEASED: &str = "secondary_loop.emergency_mssv.released";

pub const CONNECT_TO_GRID: &str = "generator.connect_to_grid";

pub fn pump_switch(on: bool) -> Event {
    Event::immediate_bool(PUMP_SWITCH, on)
}

pub fn boron_concentration(ppm: f64) -> Event {
    Event::adjustment(BORON_CONCENTRATION, ppm)
}

pub fn control_banks_target(position: i64) -> Event {
    Event::adjustment(CONTROL_BANKS_TARGET, position as f64)
}

pub fn gray_banks_target(position: i64) -> Event {
    Event::adjustment(GRAY_BANKS_TARGET, position as f64)
}

/// `true` withdraws the shutdown banks, `false` drives them back in.
pub fn withdraw_shutdown_banks(withdraw: bool) -> Event {
    Event::immediate_bool(SHUTDOWN_BANKS_WITHDRAW, withdraw)
}

pub fn scram() -> Event {
    Event::immediate(SCRAM)
}

pub fn target_pressure(mpa: f64) -> Event {
    Event::adjustment(TARGET_PRESSURE, mpa)
}

pub fn heater_power(on: bool) -> Event {
    Event::immediate_bool(HEATER_POWER, on)
}

pub fn spray_nozzle(open: bool) -> Event {
    Event::immediate_bool(SPRAY_NOZZLE, open)
}

pub fn relief_valve_vent() -> Event {
    Event::immediate(RELIEF_VALVE_VENT)
}

pub fn feedwater_pump_switch(on: bool) -> Event {
    Event::immediate_bool(FEEDWATER_PUMP_SWITCH, on)
}

pub fn feedheaters_switch(on: bool) -> Event {
    Event::immediate_bool(FEEDHEATERS_SWITCH, on)
}

pub fn power_operated_relief_valve(open: bool) -> Event {
    Event::immediate_bool(POWER_OPERATED_RELIEF_VALVE, open)
}

pub fn emergency_mssv_released() -> Event {
    Event::immediate(EMERGENCY_MSSV_RELEASED)
}

pub fn connect_to_grid(connect: bool) -> Event {
    Event::immediate_bool(CONNECT_TO_GRID, connect)
}
