use std::sync::Arc;

use crate::commands;
use crate::components::step_toward;
use crate::config::PlantConfig;
use crate::engine::TickContext;
use crate::error::Result;
use crate::event::Event;
use crate::snapshot::{ComponentStatus, PrimaryLoopStatus};
use crate::traits::{Component, ComponentInfo, ComponentKind};

/// Reactor coolant loop: the main coolant pump and the chemical and volume
/// control system that sets boron concentration.
pub struct PrimaryLoop {
    info: ComponentInfo,
    config: Arc<PlantConfig>,
    pump_on: bool,
    pump_pressure: f64,      // MPa
    flow_rate: f64,          // m³/s
    pump_heat: f64,          // MW
    boron_concentration: f64, // ppm
    hot_leg_temperature: f64,
    cold_leg_temperature: f64,
}

impl PrimaryLoop {
    pub fn new(name: &str, description: &str) -> Self {
        Self::build(ComponentInfo::new(name, description), Arc::new(PlantConfig::default()))
    }

    pub fn with_config(self, config: Arc<PlantConfig>) -> Self {
        Self::build(self.info, config)
    }

    fn build(info: ComponentInfo, config: Arc<PlantConfig>) -> Self {
        let pl = &config.primary_loop;
        let room = config.common.room_temperature;
        Self {
            info,
            pump_on: false,
            pump_pressure: pl.pump_off_pressure,
            flow_rate: pl.pump_off_flow_rate,
            pump_heat: pl.pump_off_heat,
            boron_concentration: 0.0,
            hot_leg_temperature: room,
            cold_leg_temperature: room,
            config,
        }
    }

    pub fn pump_on(&self) -> bool {
        self.pump_on
    }

    pub fn pump_pressure(&self) -> f64 {
        self.pump_pressure
    }

    pub fn flow_rate(&self) -> f64 {
        self.flow_rate
    }

    pub fn pump_heat(&self) -> f64 {
        self.pump_heat
    }

    pub fn boron_concentration(&self) -> f64 {
        self.boron_concentration
    }

    pub fn hot_leg_temperature(&self) -> f64 {
        self.hot_leg_temperature
    }

    pub fn cold_leg_temperature(&self) -> f64 {
        self.cold_leg_temperature
    }

    pub fn switch_pump(&mut self, on: bool) {
        let pl = &self.config.primary_loop;
        self.pump_on = on;
        if on {
            self.pump_pressure = pl.pump_on_pressure;
            self.flow_rate = pl.pump_on_flow_rate;
            self.pump_heat = pl.pump_on_heat;
        } else {
            self.pump_pressure = pl.pump_off_pressure;
            self.flow_rate = pl.pump_off_flow_rate;
            self.pump_heat = pl.pump_off_heat;
        }
        log::debug!("{}: coolant pump {}", self.info.name(), if on { "on" } else { "off" });
    }

    /// Boron only mixes in while coolant circulates. Returns whether the
    /// concentration sits exactly at the (clamped) target.
    pub fn adjust_boron(&mut self, target: f64) -> bool {
        let pl = &self.config.primary_loop;
        let target = target.clamp(0.0, pl.max_boron_concentration);
        if self.pump_on && self.boron_concentration != target {
            self.boron_concentration =
                step_toward(self.boron_concentration, target, pl.max_boron_rate_of_change);
        }
        self.boron_concentration == target
    }

    fn process_event(&mut self, event: &mut Event) {
        match event.code() {
            commands::PUMP_SWITCH => {
                self.switch_pump(event.truthy());
                event.set_complete();
            }
            commands::BORON_CONCENTRATION => {
                event.record_origin(self.boron_concentration);
                if self.adjust_boron(event.target_value()) {
                    log::info!(
                        "{}: boron concentration reached {:.3} ppm",
                        self.info.name(),
                        self.boron_concentration
                    );
                    event.set_complete();
                }
            }
            _ => {}
        }
    }

    fn update_leg_temperatures(&mut self) {
        let pl = &self.config.primary_loop;
        let room = self.config.common.room_temperature;
        let target = if self.pump_on { pl.no_load_temperature } else { room };
        self.hot_leg_temperature = step_toward(self.hot_leg_temperature, target, pl.leg_temperature_step);
        self.cold_leg_temperature = (self.hot_leg_temperature - pl.loop_delta_t).max(room.min(self.hot_leg_temperature));
    }
}

impl Default for PrimaryLoop {
    fn default() -> Self {
        Self::new(
            "PL1",
            "Circulates coolant through the reactor core, carrying boron for moderation and heat to the steam generators.",
        )
    }
}

impl Component for PrimaryLoop {
    fn info(&self) -> &ComponentInfo {
        &self.info
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::PrimaryLoop
    }

    fn status(&self) -> ComponentStatus {
        ComponentStatus::PrimaryLoop(PrimaryLoopStatus {
            about: self.info.about(),
            pump_on: self.pump_on,
            pump_pressure: self.pump_pressure,
            pump_pressure_unit: "MPa",
            pump_heat: self.pump_heat,
            pump_heat_unit: "MW",
            flow_rate: self.flow_rate,
            flow_rate_unit: "m³/s",
            boron_concentration: self.boron_concentration,
            boron_concentration_unit: "ppm",
            hot_leg_temperature: self.hot_leg_temperature,
            hot_leg_temperature_unit: "°C",
            cold_leg_temperature: self.cold_leg_temperature,
            cold_leg_temperature_unit: "°C",
        })
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) -> Result<ComponentStatus> {
        self.info.touch(ctx.now());
        for event in ctx.in_progress_mut() {
            self.process_event(event);
        }
        self.update_leg_temperatures();
        Ok(self.status())
    }
}
