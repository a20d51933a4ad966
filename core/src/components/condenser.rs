use std::sync::Arc;

use crate::components::SteamTurbine;
use crate::config::{CondenserType, PlantConfig, TubeMaterial};
use crate::engine::TickContext;
use crate::error::{Result, SimError};
use crate::snapshot::{CondenserStatus, ComponentStatus};
use crate::steam_table;
use crate::traits::{read, Component, ComponentInfo, ComponentKind, Shared};

/// Log-mean temperature difference between condensing steam at `hot` and
/// cooling water warming from `cold_in` to `cold_out`.
pub fn log_mean_temperature_difference(hot: f64, cold_in: f64, cold_out: f64) -> f64 {
    let inlet_gap = hot - cold_in;
    let outlet_gap = hot - cold_out;
    if (inlet_gap - outlet_gap).abs() < f64::EPSILON {
        return inlet_gap;
    }
    (inlet_gap - outlet_gap) / (inlet_gap / outlet_gap).ln()
}

/// Turns turbine exhaust back into water by dumping waste heat into
/// cooling water or ambient air.
pub struct Condenser {
    info: ComponentInfo,
    config: Arc<PlantConfig>,
    steam_turbine: Option<Shared<SteamTurbine>>,
    heat_rejection: f64,          // MW
    condenser_pressure: f64,      // MPa
    condenser_temperature: f64,   // °C
    steam_flow_rate: f64,         // kg/s
    cooling_water_flow_rate: f64, // kg/s
    heat_transfer_coefficient: f64, // W/m²·K
    cooling_water_temp_in: f64,
    cooling_water_temp_out: f64,
    surface_area: f64, // m²
}

impl Condenser {
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
        let c = &config.condenser;
        let room = config.common.room_temperature;
        Self {
            info,
            steam_turbine: None,
            heat_rejection: 0.0,
            condenser_pressure: config.common.atmospheric_pressure,
            condenser_temperature: room,
            steam_flow_rate: 0.0,
            cooling_water_flow_rate: 0.0,
            heat_transfer_coefficient: 0.0,
            cooling_water_temp_in: c.cooling_water_temp_in,
            cooling_water_temp_out: c.cooling_water_temp_in,
            surface_area: c.surface_area,
            config,
        }
    }

    pub fn with_steam_turbine(mut self, steam_turbine: Shared<SteamTurbine>) -> Self {
        self.steam_turbine = Some(steam_turbine);
        self
    }

    pub fn condenser_type(&self) -> CondenserType {
        self.config.condenser.condenser_type
    }

    pub fn tube_material(&self) -> TubeMaterial {
        self.config.condenser.tube_material
    }

    pub fn heat_rejection(&self) -> f64 {
        self.heat_rejection
    }

    pub fn condenser_pressure(&self) -> f64 {
        self.condenser_pressure
    }

    pub fn condenser_temperature(&self) -> f64 {
        self.condenser_temperature
    }

    pub fn steam_flow_rate(&self) -> f64 {
        self.steam_flow_rate
    }

    pub fn cooling_water_flow_rate(&self) -> f64 {
        self.cooling_water_flow_rate
    }

    pub fn heat_transfer_coefficient(&self) -> f64 {
        self.heat_transfer_coefficient
    }

    pub fn cooling_water_temp_in(&self) -> f64 {
        self.cooling_water_temp_in
    }

    pub fn cooling_water_temp_out(&self) -> f64 {
        self.cooling_water_temp_out
    }

    pub fn surface_area(&self) -> f64 {
        self.surface_area
    }

    /// Overall coefficient across steam film, tube wall and water film,
    /// with the water side from Dittus-Boelter.
    pub fn overall_heat_transfer_coefficient(&self) -> f64 {
        let c = &self.config.condenser;
        let tube_od = c.tube_outer_diameter;
        let tube_id = tube_od - 2.0 * c.tube_wall_thickness;

        let reynolds = c.water_velocity * tube_id * self.config.common.water_density / c.water_viscosity;
        let nusselt = 0.023 * reynolds.powf(0.8) * c.prandtl_number.powf(0.4);
        let h_water = nusselt * c.water_conductivity / tube_id;

        let wall = tube_od * (tube_od / tube_id).ln() / (2.0 * c.tube_material.conductivity());
        1.0 / (1.0 / c.steam_side_coefficient + wall + tube_od / (tube_id * h_water))
    }

    fn condense_water_cooled(&mut self, heat_rejection_w: f64) {
        let c = &self.config.condenser;
        self.cooling_water_temp_in = c.cooling_water_temp_in;
        self.cooling_water_temp_out = c.cooling_water_temp_in + c.cooling_water_temp_rise;
        self.condenser_temperature = self.cooling_water_temp_out + c.terminal_temperature_difference;
        self.cooling_water_flow_rate =
            heat_rejection_w / (self.config.common.water_specific_heat * c.cooling_water_temp_rise);

        self.heat_transfer_coefficient = self.overall_heat_transfer_coefficient();
        if heat_rejection_w > 0.0 {
            let lmtd = log_mean_temperature_difference(
                self.condenser_temperature,
                self.cooling_water_temp_in,
                self.cooling_water_temp_out,
            );
            self.surface_area = heat_rejection_w / (self.heat_transfer_coefficient * lmtd);
        }
    }

    fn condense_air_cooled(&mut self, ambient: f64) {
        let c = &self.config.condenser;
        self.cooling_water_temp_in = ambient;
        self.cooling_water_temp_out = ambient;
        self.cooling_water_flow_rate = 0.0;
        self.heat_transfer_coefficient = 0.0;
        self.condenser_temperature = ambient + c.air_cooled_terminal_difference + c.air_cooled_approach;
    }
}

impl Default for Condenser {
    fn default() -> Self {
        Self::new("CD1", "Condenses turbine exhaust and rejects waste heat to the ultimate heat sink.")
    }
}

impl Component for Condenser {
    fn info(&self) -> &ComponentInfo {
        &self.info
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Condenser
    }

    fn status(&self) -> ComponentStatus {
        ComponentStatus::Condenser(CondenserStatus {
            about: self.info.about(),
            condenser_type: self.condenser_type(),
            tube_material: self.tube_material(),
            heat_rejection: self.heat_rejection,
            heat_rejection_unit: "MW",
            condenser_pressure: self.condenser_pressure,
            condenser_pressure_unit: "MPa",
            condenser_temperature: self.condenser_temperature,
            steam_flow_rate: self.steam_flow_rate,
            cooling_water_flow_rate: self.cooling_water_flow_rate,
            flow_rate_unit: "kg/s",
            heat_transfer_coefficient: self.heat_transfer_coefficient,
            cooling_water_temp_in: self.cooling_water_temp_in,
            cooling_water_temp_out: self.cooling_water_temp_out,
            temperature_unit: "°C",
            water_velocity: self.config.condenser.water_velocity,
            surface_area: self.surface_area,
            surface_area_unit: "m²",
        })
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) -> Result<ComponentStatus> {
        let thermal_power = match &self.steam_turbine {
            Some(st) => read(st).thermal_power(),
            None => {
                return Err(SimError::MissingCollaborator {
                    component: self.info.name().to_string(),
                    collaborator: "steam turbine",
                })
            }
        };
        self.info.touch(ctx.now());

        self.heat_rejection = thermal_power * (1.0 - self.config.condenser.thermal_efficiency);
        let heat_rejection_w = self.heat_rejection * 1e6;

        match self.condenser_type() {
            CondenserType::WaterCooled => self.condense_water_cooled(heat_rejection_w),
            CondenserType::AirCooled => self.condense_air_cooled(ctx.environment().weather.temperature),
        }

        self.condenser_pressure = steam_table::saturation_pressure(self.condenser_temperature);
        self.steam_flow_rate = heat_rejection_w / self.config.common.steam_latent_heat;

        Ok(self.status())
    }
}
