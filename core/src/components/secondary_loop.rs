use std::sync::Arc;

use crate::commands;
use crate::components::step_toward;
use crate::config::PlantConfig;
use crate::engine::TickContext;
use crate::error::Result;
use crate::event::Event;
use crate::snapshot::{ComponentStatus, SecondaryLoopStatus};
use crate::steam_table;
use crate::traits::{Component, ComponentInfo, ComponentKind};

// Water is boiled in the steam generator and the steam drives the turbine.
// What leaves the turbine is condensed and pumped back to the steam
// generator by the feedwater pump, passing the feedheaters on the way.
// Safety valves vent steam before pressure gets dangerous.

/// Steam and feedwater side of the plant.
pub struct SecondaryLoop {
    info: ComponentInfo,
    config: Arc<PlantConfig>,
    steam_temperature: f64, // °C
    steam_pressure: f64,    // MPa
    power_operated_relief_valve_open: bool,
    feedwater_pump_on: bool,
    feedwater_flow_rate: f64, // m³/s
    feedheaters_on: bool,
    feedwater_temperature_out: f64,
    feedwater_temperature_in: f64,
    mssv_vents: u64,
}

impl SecondaryLoop {
    pub fn new(name: &str, description: &str) -> Self {
        Self::build(ComponentInfo::new(name, description), Arc::new(PlantConfig::default()))
    }

    pub fn with_config(self, config: Arc<PlantConfig>) -> Self {
        Self::build(self.info, config)
    }

    fn build(info: ComponentInfo, config: Arc<PlantConfig>) -> Self {
        let base_feedwater = config.secondary_loop.base_feedwater_temperature;
        Self {
            info,
            steam_temperature: config.common.room_temperature,
            steam_pressure: config.common.atmospheric_pressure,
            power_operated_relief_valve_open: false,
            feedwater_pump_on: false,
            feedwater_flow_rate: 0.0,
            feedheaters_on: false,
            feedwater_temperature_out: base_feedwater,
            feedwater_temperature_in: base_feedwater,
            mssv_vents: 0,
            config,
        }
    }

    pub fn steam_temperature(&self) -> f64 {
        self.steam_temperature
    }

    pub fn steam_pressure(&self) -> f64 {
        self.steam_pressure
    }

    /// Temperature follows pressure along the saturation curve.
    pub fn set_steam_pressure(&mut self, pressure: f64) {
        self.steam_pressure = pressure;
        self.steam_temperature = steam_table::saturation_temperature(pressure);
    }

    /// kg/s of steam delivered toward the turbine.
    pub fn steam_flow_rate(&self) -> f64 {
        self.feedwater_flow_rate * self.config.secondary_loop.steam_yield
    }

    pub fn power_operated_relief_valve_open(&self) -> bool {
        self.power_operated_relief_valve_open
    }

    pub fn feedwater_pump_on(&self) -> bool {
        self.feedwater_pump_on
    }

    pub fn feedwater_flow_rate(&self) -> f64 {
        self.feedwater_flow_rate
    }

    pub fn feedheaters_on(&self) -> bool {
        self.feedheaters_on
    }

    pub fn feedwater_temperature_out(&self) -> f64 {
        self.feedwater_temperature_out
    }

    pub fn feedwater_temperature_in(&self) -> f64 {
        self.feedwater_temperature_in
    }

    pub fn mssv_vents(&self) -> u64 {
        self.mssv_vents
    }

    pub fn switch_feedwater_pump(&mut self, on: bool) {
        self.feedwater_pump_on = on;
    }

    pub fn switch_feedheaters(&mut self, on: bool) {
        self.feedheaters_on = on;
    }

    pub fn switch_power_operated_relief_valve(&mut self, open: bool) {
        self.power_operated_relief_valve_open = open;
    }

    fn process_event(&mut self, event: &mut Event) {
        match event.code() {
            commands::FEEDWATER_PUMP_SWITCH => self.switch_feedwater_pump(event.truthy()),
            commands::FEEDHEATERS_SWITCH => self.switch_feedheaters(event.truthy()),
            commands::POWER_OPERATED_RELIEF_VALVE => {
                self.switch_power_operated_relief_valve(event.truthy())
            }
            _ => return,
        }
        event.set_complete();
    }

    fn vent_main_steam(&mut self, ctx: &mut TickContext<'_>) {
        let sl = &self.config.secondary_loop;
        if self.steam_pressure <= sl.mssv_pressure_threshold {
            return;
        }
        ctx.queue_event(commands::emergency_mssv_released().schedule_at(ctx.now()));
        let vented = self.steam_pressure - sl.mssv_pressure_drop;
        self.set_steam_pressure(vented);
        self.mssv_vents += 1;
        log::warn!(
            "{}: emergency MSSV released, steam at {:.2} MPa / {:.1} °C",
            self.info.name(),
            self.steam_pressure,
            self.steam_temperature
        );
    }

    fn ramp_feedwater(&mut self) {
        let sl = &self.config.secondary_loop;
        self.feedwater_flow_rate = if self.feedwater_pump_on {
            step_toward(self.feedwater_flow_rate, sl.feedwater_flow_rate_target, sl.feedwater_flow_rate_step_up)
        } else {
            step_toward(self.feedwater_flow_rate, 0.0, sl.feedwater_flow_rate_step_down)
        };

        self.feedwater_temperature_out = if self.feedheaters_on {
            step_toward(self.feedwater_temperature_out, sl.heated_feedwater_temperature, sl.feedheater_step_up)
        } else {
            step_toward(self.feedwater_temperature_out, self.feedwater_temperature_in, sl.feedheater_step_down)
        };
    }
}

impl Default for SecondaryLoop {
    fn default() -> Self {
        Self::new(
            "SL1",
            "Carries feedwater to the steam generators and steam to the turbine, with relief valves on the steam lines.",
        )
    }
}

impl Component for SecondaryLoop {
    fn info(&self) -> &ComponentInfo {
        &self.info
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::SecondaryLoop
    }

    fn status(&self) -> ComponentStatus {
        ComponentStatus::SecondaryLoop(SecondaryLoopStatus {
            about: self.info.about(),
            steam_temperature: self.steam_temperature,
            steam_temperature_unit: "°C",
            steam_pressure: self.steam_pressure,
            steam_pressure_unit: "MPa",
            steam_flow_rate: self.steam_flow_rate(),
            steam_flow_rate_unit: "kg/s",
            power_operated_relief_valve_open: self.power_operated_relief_valve_open,
            feedwater_pump_on: self.feedwater_pump_on,
            feedwater_flow_rate: self.feedwater_flow_rate,
            feedwater_flow_rate_unit: "m³/s",
            feedheaters_on: self.feedheaters_on,
            feedwater_temperature_out: self.feedwater_temperature_out,
            feedwater_temperature_in: self.feedwater_temperature_in,
            feedwater_temperature_unit: "°C",
        })
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) -> Result<ComponentStatus> {
        self.info.touch(ctx.now());
        for event in ctx.in_progress_mut() {
            self.process_event(event);
        }

        self.vent_main_steam(ctx);
        self.ramp_feedwater();

        if self.power_operated_relief_valve_open {
            let sl = &self.config.secondary_loop;
            let relieved = step_toward(
                self.steam_pressure,
                self.config.common.atmospheric_pressure,
                sl.porv_pressure_step,
            );
            self.set_steam_pressure(relieved);
        }

        self.steam_temperature = steam_table::saturation_temperature(self.steam_pressure);
        Ok(self.status())
    }
}
