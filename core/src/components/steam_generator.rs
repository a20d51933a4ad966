use std::sync::Arc;

use crate::components::{PrimaryLoop, SecondaryLoop};
use crate::config::PlantConfig;
use crate::engine::TickContext;
use crate::error::{Result, SimError};
use crate::snapshot::{ComponentStatus, SteamGeneratorStatus};
use crate::traits::{read, Component, ComponentInfo, ComponentKind, Shared};

/// Heat exchanger between the loops. Hot-leg coolant on the tube side boils
/// feedwater on the shell side.
pub struct SteamGenerator {
    info: ComponentInfo,
    config: Arc<PlantConfig>,
    primary_loop: Option<Shared<PrimaryLoop>>,
    secondary_loop: Option<Shared<SecondaryLoop>>,
    primary_inlet_temp: f64,
    primary_outlet_temp: f64,
    secondary_inlet_temp: f64,
    secondary_outlet_temp: f64,
    heat_transfer_rate: f64, // MW
    steam_flow_rate: f64,    // kg/s
}

impl SteamGenerator {
    pub fn new(name: &str, description: &str) -> Self {
        Self::build(ComponentInfo::new(name, description), Arc::new(PlantConfig::default()))
    }

    pub fn with_config(self, config: Arc<PlantConfig>) -> Self {
        Self {
            primary_loop: self.primary_loop,
            secondary_loop: self.secondary_loop,
            ..Self::build(self.info, config)
        }
    }

    fn build(info: ComponentInfo, config: Arc<PlantConfig>) -> Self {
        let room = config.common.room_temperature;
        Self {
            info,
            primary_loop: None,
            secondary_loop: None,
            primary_inlet_temp: room,
            primary_outlet_temp: room,
            secondary_inlet_temp: room,
            secondary_outlet_temp: room,
            heat_transfer_rate: 0.0,
            steam_flow_rate: 0.0,
            config,
        }
    }

    pub fn with_primary_loop(mut self, primary_loop: Shared<PrimaryLoop>) -> Self {
        self.primary_loop = Some(primary_loop);
        self
    }

    pub fn with_secondary_loop(mut self, secondary_loop: Shared<SecondaryLoop>) -> Self {
        self.secondary_loop = Some(secondary_loop);
        self
    }

    pub fn primary_inlet_temp(&self) -> f64 {
        self.primary_inlet_temp
    }

    pub fn primary_outlet_temp(&self) -> f64 {
        self.primary_outlet_temp
    }

    pub fn secondary_inlet_temp(&self) -> f64 {
        self.secondary_inlet_temp
    }

    pub fn secondary_outlet_temp(&self) -> f64 {
        self.secondary_outlet_temp
    }

    pub fn heat_transfer_rate(&self) -> f64 {
        self.heat_transfer_rate
    }

    pub fn steam_flow_rate(&self) -> f64 {
        self.steam_flow_rate
    }

    fn missing(&self, collaborator: &'static str) -> SimError {
        SimError::MissingCollaborator {
            component: self.info.name().to_string(),
            collaborator,
        }
    }
}

impl Default for SteamGenerator {
    fn default() -> Self {
        Self::new(
            "SG1",
            "Transfers heat from the primary coolant to boil secondary feedwater into steam.",
        )
    }
}

impl Component for SteamGenerator {
    fn info(&self) -> &ComponentInfo {
        &self.info
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::SteamGenerator
    }

    fn status(&self) -> ComponentStatus {
        ComponentStatus::SteamGenerator(SteamGeneratorStatus {
            about: self.info.about(),
            primary_inlet_temp: self.primary_inlet_temp,
            primary_outlet_temp: self.primary_outlet_temp,
            secondary_inlet_temp: self.secondary_inlet_temp,
            secondary_outlet_temp: self.secondary_outlet_temp,
            temperature_unit: "°C",
            heat_transfer_rate: self.heat_transfer_rate,
            heat_transfer_rate_unit: "MW",
            steam_flow_rate: self.steam_flow_rate,
            steam_flow_rate_unit: "kg/s",
        })
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) -> Result<ComponentStatus> {
        let (hot_leg, primary_flow) = match &self.primary_loop {
            Some(pl) => {
                let pl = read(pl);
                (pl.hot_leg_temperature(), pl.flow_rate())
            }
            None => return Err(self.missing("primary loop")),
        };
        let feedwater = match &self.secondary_loop {
            Some(sl) => read(sl).feedwater_temperature_out(),
            None => return Err(self.missing("secondary loop")),
        };
        self.info.touch(ctx.now());

        let sg = &self.config.steam_generator;
        self.primary_inlet_temp = hot_leg;
        self.secondary_inlet_temp = feedwater;
        // coolant cannot leave colder than the feedwater it heats
        self.primary_outlet_temp = (hot_leg - sg.primary_delta_t).max(feedwater.min(hot_leg));
        self.secondary_outlet_temp = (hot_leg - sg.approach_temperature)
            .min(sg.max_steam_temperature)
            .max(feedwater);

        let delta_t = self.primary_inlet_temp - self.primary_outlet_temp;
        self.heat_transfer_rate =
            primary_flow * sg.coolant_density * sg.coolant_specific_heat * delta_t / 1000.0;
        self.steam_flow_rate = self.heat_transfer_rate * 1000.0 / sg.steam_generation_enthalpy;

        Ok(self.status())
    }
}
