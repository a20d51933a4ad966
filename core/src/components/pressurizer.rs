use std::sync::Arc;

use crate::commands;
use crate::components::PrimaryLoop;
use crate::config::PlantConfig;
use crate::engine::TickContext;
use crate::error::Result;
use crate::event::Event;
use crate::snapshot::{ComponentStatus, PressurizerStatus};
use crate::steam_table;
use crate::traits::{read, Component, ComponentInfo, ComponentKind, Shared};

/// Keeps the primary coolant pressurized by boiling a small volume of it.
/// Pressure and temperature stay on the saturation curve.
pub struct Pressurizer {
    info: ComponentInfo,
    config: Arc<PlantConfig>,
    primary_loop: Option<Shared<PrimaryLoop>>,
    pressure: f64,        // MPa
    temperature: f64,     // °C
    heater_on: bool,
    heater_power: f64,    // kW
    spray_nozzle_open: bool,
    spray_flow_rate: f64, // kg/s
    relief_vents: u64,
}

impl Pressurizer {
    pub fn new(name: &str, description: &str) -> Self {
        Self::build(ComponentInfo::new(name, description), Arc::new(PlantConfig::default()))
    }

    pub fn with_config(self, config: Arc<PlantConfig>) -> Self {
        Self {
            primary_loop: self.primary_loop,
            ..Self::build(self.info, config)
        }
    }

    fn build(info: ComponentInfo, config: Arc<PlantConfig>) -> Self {
        Self {
            info,
            primary_loop: None,
            pressure: config.common.atmospheric_pressure,
            temperature: config.common.room_temperature,
            heater_on: false,
            heater_power: 0.0,
            spray_nozzle_open: false,
            spray_flow_rate: 0.0,
            relief_vents: 0,
            config,
        }
    }

    /// Spray and heater-off cooling stop at the primary loop's cold leg.
    pub fn with_primary_loop(mut self, primary_loop: Shared<PrimaryLoop>) -> Self {
        self.primary_loop = Some(primary_loop);
        self
    }

    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn heater_on(&self) -> bool {
        self.heater_on
    }

    pub fn heater_power(&self) -> f64 {
        self.heater_power
    }

    pub fn heater_on_high(&self) -> bool {
        self.heater_on && self.heater_power == self.config.pressurizer.heater_high_power
    }

    pub fn heater_on_low(&self) -> bool {
        self.heater_on && self.heater_power == self.config.pressurizer.heater_low_power
    }

    pub fn spray_nozzle_open(&self) -> bool {
        self.spray_nozzle_open
    }

    pub fn spray_flow_rate(&self) -> f64 {
        self.spray_flow_rate
    }

    pub fn relief_vents(&self) -> u64 {
        self.relief_vents
    }

    /// Puts the pressurizer at a saturated state for the given temperature.
    pub fn set_temperature(&mut self, temperature: f64) {
        self.temperature = temperature;
        self.pressure = steam_table::saturation_pressure(temperature);
    }

    pub fn switch_heater(&mut self, on: bool) {
        self.heater_on = on;
        self.heater_power = if on {
            self.config.pressurizer.heater_low_power
        } else {
            0.0
        };
    }

    pub fn switch_spray(&mut self, open: bool) {
        self.spray_nozzle_open = open;
        self.spray_flow_rate = if open {
            self.config.pressurizer.spray_flow_rate
        } else {
            0.0
        };
    }

    fn cooling_floor(&self) -> f64 {
        match &self.primary_loop {
            Some(pl) => read(pl).cold_leg_temperature(),
            None => self.config.pressurizer.cold_leg_temperature,
        }
    }

    /// One tick of heater/spray action toward `target` MPa.
    pub fn adjust_pressure(&mut self, target: f64) {
        let pr = &self.config.pressurizer;
        let floor = self.cooling_floor();
        let cool = |temperature: f64, rate: f64| {
            if temperature > floor {
                (temperature - rate).max(floor)
            } else {
                temperature
            }
        };

        if self.heater_on {
            self.heater_power = if self.pressure < target {
                pr.heater_high_power
            } else {
                pr.heater_low_power
            };
            if self.heater_power == pr.heater_high_power {
                self.temperature += pr.heatup_rate;
            }
        } else {
            self.temperature = cool(self.temperature, pr.cooldown_rate);
        }

        if self.spray_nozzle_open {
            self.temperature = cool(self.temperature, pr.spray_cooldown_rate);
        }

        self.pressure = steam_table::saturation_pressure(self.temperature);
    }

    fn process_event(&mut self, event: &mut Event) {
        match event.code() {
            commands::HEATER_POWER => {
                self.switch_heater(event.truthy());
                event.set_complete();
            }
            commands::SPRAY_NOZZLE => {
                self.switch_spray(event.truthy());
                event.set_complete();
            }
            commands::TARGET_PRESSURE => {
                let target = event.target_value();
                self.adjust_pressure(target);
                if self.pressure >= target {
                    if self.heater_on {
                        self.heater_power = self.config.pressurizer.heater_low_power;
                    }
                    log::info!("{}: target pressure {:.2} MPa reached", self.info.name(), target);
                    event.set_complete();
                }
            }
            _ => {}
        }
    }

    fn relieve_overpressure(&mut self, ctx: &mut TickContext<'_>) {
        let pr = &self.config.pressurizer;
        if self.pressure <= pr.relief_valve_threshold_pressure {
            return;
        }
        ctx.queue_event(commands::relief_valve_vent().schedule_at(ctx.now()));

        let vented = steam_table::from_pressure(self.pressure - pr.relief_valve_pressure_drop);
        log::warn!(
            "{}: relief valve lifted at {:.2} MPa, venting to {:.2} MPa / {:.1} °C",
            self.info.name(),
            self.pressure,
            vented.pressure,
            vented.temperature
        );
        self.pressure = vented.pressure;
        self.temperature = vented.temperature;
        self.relief_vents += 1;
    }
}

impl Default for Pressurizer {
    fn default() -> Self {
        Self::new(
            "PR1",
            "Heats and sprays primary coolant to hold system pressure on the saturation curve.",
        )
    }
}

impl Component for Pressurizer {
    fn info(&self) -> &ComponentInfo {
        &self.info
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Pressurizer
    }

    fn status(&self) -> ComponentStatus {
        ComponentStatus::Pressurizer(PressurizerStatus {
            about: self.info.about(),
            pressure: self.pressure,
            pressure_unit: "MPa",
            temperature: self.temperature,
            temperature_unit: "°C",
            heater_on: self.heater_on,
            heater_power: self.heater_power,
            heater_power_unit: "kW",
            spray_nozzle_open: self.spray_nozzle_open,
            spray_flow_rate: self.spray_flow_rate,
            spray_flow_rate_unit: "kg/s",
            relief_vents: self.relief_vents,
        })
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) -> Result<ComponentStatus> {
        self.info.touch(ctx.now());
        for event in ctx.in_progress_mut() {
            self.process_event(event);
        }
        self.relieve_overpressure(ctx);
        Ok(self.status())
    }
}
