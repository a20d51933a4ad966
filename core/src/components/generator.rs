use std::sync::Arc;

use crate::commands;
use crate::components::SteamTurbine;
use crate::config::PlantConfig;
use crate::engine::TickContext;
use crate::error::{Result, SimError};
use crate::event::Event;
use crate::snapshot::{ComponentStatus, GeneratorStatus};
use crate::traits::{read, Component, ComponentInfo, ComponentKind, Shared};

/// Synchronous generator on the turbine shaft.
///
/// Closing the breaker requires the output frequency to match the grid.
/// Phase angle and voltage matching are not modeled.
pub struct Generator {
    info: ComponentInfo,
    config: Arc<PlantConfig>,
    steam_turbine: Option<Shared<SteamTurbine>>,
    rpm: u32,
    electrical_power_out: f64, // MW
    connected_to_grid: bool,
}

impl Generator {
    pub fn new(name: &str, description: &str) -> Self {
        Self::build(ComponentInfo::new(name, description), Arc::new(PlantConfig::default()))
    }

    pub fn with_config(self, config: Arc<PlantConfig>) -> Self {
        Self {
            steam_turbine: self.steam_turbine,
            ..Self::build(self.info, config)
        }
    }

    fn build(info: ComponentInfo, config: Arc<PlantConfig>) -> Self {
        Self {
            info,
            config,
            steam_turbine: None,
            rpm: 0,
            electrical_power_out: 0.0,
            connected_to_grid: false,
        }
    }

    pub fn with_steam_turbine(mut self, steam_turbine: Shared<SteamTurbine>) -> Self {
        self.steam_turbine = Some(steam_turbine);
        self
    }

    pub fn rpm(&self) -> u32 {
        self.rpm
    }

    pub fn electrical_power_out(&self) -> f64 {
        self.electrical_power_out
    }

    pub fn connected_to_grid(&self) -> bool {
        self.connected_to_grid
    }

    /// Hz
    pub fn frequency(&self) -> f64 {
        f64::from(self.rpm) * f64::from(self.config.generator.poles) / 120.0
    }

    pub fn standard_frequency(&self) -> f64 {
        self.config.generator.standard_ac_frequency
    }

    pub fn in_sync(&self) -> bool {
        let g = &self.config.generator;
        let tolerance = g.standard_ac_frequency * g.frequency_tolerance;
        (self.frequency() - g.standard_ac_frequency).abs() <= tolerance
    }

    fn process_event(&mut self, event: &mut Event) {
        if event.code() != commands::CONNECT_TO_GRID {
            return;
        }
        if !event.truthy() {
            self.connected_to_grid = false;
            log::info!("{}: breaker opened, disconnected from grid", self.info.name());
            event.set_complete();
            return;
        }
        if !self.in_sync() {
            let err = SimError::EventPreconditionUnmet {
                code: event.code().to_string(),
                reason: format!(
                    "output at {:.3} Hz, grid at {:.1} Hz",
                    self.frequency(),
                    self.standard_frequency()
                ),
            };
            log::warn!("{}: {}", self.info.name(), err);
            event.set_canceled();
            return;
        }
        self.connected_to_grid = true;
        log::info!("{}: synchronized and connected to grid", self.info.name());
        event.set_complete();
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new("GEN1", "Turns shaft power into electricity and synchronizes with the grid.")
    }
}

impl Component for Generator {
    fn info(&self) -> &ComponentInfo {
        &self.info
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Generator
    }

    fn status(&self) -> ComponentStatus {
        ComponentStatus::Generator(GeneratorStatus {
            about: self.info.about(),
            rpm: self.rpm,
            frequency: self.frequency(),
            frequency_unit: "Hz",
            connected_to_grid: self.connected_to_grid,
            electrical_power_out: self.electrical_power_out,
            electrical_power_out_unit: "MW",
        })
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) -> Result<ComponentStatus> {
        let rpm = match &self.steam_turbine {
            Some(st) => read(st).rpm(),
            None => {
                return Err(SimError::MissingCollaborator {
                    component: self.info.name().to_string(),
                    collaborator: "steam turbine",
                })
            }
        };
        self.info.touch(ctx.now());
        self.rpm = rpm;

        for event in ctx.in_progress_mut() {
            self.process_event(event);
        }

        // once on the grid, drop off if the frequency wanders
        if self.connected_to_grid && !self.in_sync() {
            self.connected_to_grid = false;
            self.electrical_power_out = 0.0;
            return Err(SimError::GridFrequencyExcursion {
                frequency: self.frequency(),
                standard: self.standard_frequency(),
            });
        }

        self.electrical_power_out = if self.connected_to_grid {
            f64::from(self.rpm) * self.config.generator.power_per_rpm
        } else {
            0.0
        };
        Ok(self.status())
    }
}
