use std::f64::consts::PI;
use std::sync::Arc;

use crate::components::SecondaryLoop;
use crate::config::PlantConfig;
use crate::engine::TickContext;
use crate::error::{Result, SimError};
use crate::snapshot::{ComponentStatus, SteamTurbineStatus};
use crate::steam_table;
use crate::traits::{read, Component, ComponentInfo, ComponentKind, Shared};

/// Converts steam energy into shaft rotation for the generator.
///
/// No operator events; the governor is assumed to just work once there is
/// enough steam pressure, so rpm follows the secondary loop directly.
pub struct SteamTurbine {
    info: ComponentInfo,
    config: Arc<PlantConfig>,
    secondary_loop: Option<Shared<SecondaryLoop>>,
    inlet_pressure: f64,  // MPa
    outlet_pressure: f64, // MPa
    steam_flow_rate: f64, // kg/s
    rpm: u32,
    thermal_power: f64, // MW
}

impl SteamTurbine {
    pub fn new(name: &str, description: &str) -> Self {
        Self::build(ComponentInfo::new(name, description), Arc::new(PlantConfig::default()))
    }

    pub fn with_config(self, config: Arc<PlantConfig>) -> Self {
        Self {
            secondary_loop: self.secondary_loop,
            ..Self::build(self.info, config)
        }
    }

    fn build(info: ComponentInfo, config: Arc<PlantConfig>) -> Self {
        Self {
            info,
            secondary_loop: None,
            inlet_pressure: 0.0,
            outlet_pressure: config.steam_turbine.exhaust_pressure,
            steam_flow_rate: 0.0,
            rpm: 0,
            thermal_power: 0.0,
            config,
        }
    }

    pub fn with_secondary_loop(mut self, secondary_loop: Shared<SecondaryLoop>) -> Self {
        self.secondary_loop = Some(secondary_loop);
        self
    }

    pub fn inlet_pressure(&self) -> f64 {
        self.inlet_pressure
    }

    pub fn outlet_pressure(&self) -> f64 {
        self.outlet_pressure
    }

    pub fn steam_flow_rate(&self) -> f64 {
        self.steam_flow_rate
    }

    pub fn rpm(&self) -> u32 {
        self.rpm
    }

    pub fn max_rpm(&self) -> u32 {
        self.config.steam_turbine.max_rpm
    }

    pub fn efficiency(&self) -> f64 {
        self.config.steam_turbine.efficiency
    }

    pub fn blade_diameter(&self) -> f64 {
        self.config.steam_turbine.blade_diameter
    }

    pub fn thermal_power(&self) -> f64 {
        self.thermal_power
    }

    /// Blade tip speed from a simplified Euler turbine relation, converted
    /// to rpm and clamped to the mechanical limit.
    pub fn calculate_rpm(&self) -> u32 {
        let common = &self.config.common;
        let st = &self.config.steam_turbine;

        let inlet_abs = self.inlet_pressure + common.atmospheric_pressure;
        let outlet_abs = self.outlet_pressure + common.atmospheric_pressure;
        let pressure_ratio = inlet_abs / outlet_abs;

        let expansion = (pressure_ratio.powf(0.286) - 1.0).max(0.0);
        let tip_speed = (2.0 * common.gravity * st.efficiency * expansion * self.steam_flow_rate).sqrt();
        let rpm = tip_speed * 60.0 / (PI * st.blade_diameter);

        rpm.round().clamp(0.0, f64::from(st.max_rpm)) as u32
    }
}

impl Default for SteamTurbine {
    fn default() -> Self {
        Self::new("ST1", "Expands main steam through its blade stages to turn the generator shaft.")
    }
}

impl Component for SteamTurbine {
    fn info(&self) -> &ComponentInfo {
        &self.info
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::SteamTurbine
    }

    fn status(&self) -> ComponentStatus {
        ComponentStatus::SteamTurbine(SteamTurbineStatus {
            about: self.info.about(),
            inlet_pressure: self.inlet_pressure,
            outlet_pressure: self.outlet_pressure,
            pressure_unit: "MPa",
            steam_flow_rate: self.steam_flow_rate,
            steam_flow_rate_unit: "kg/s",
            rpm: self.rpm,
            max_rpm: self.max_rpm(),
            blade_diameter: self.blade_diameter(),
            efficiency: self.efficiency(),
            thermal_power: self.thermal_power,
            thermal_power_unit: "MW",
        })
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) -> Result<ComponentStatus> {
        let (pressure, flow) = match &self.secondary_loop {
            Some(sl) => {
                let sl = read(sl);
                (sl.steam_pressure(), sl.steam_flow_rate())
            }
            None => {
                return Err(SimError::MissingCollaborator {
                    component: self.info.name().to_string(),
                    collaborator: "secondary loop",
                })
            }
        };
        self.info.touch(ctx.now());

        self.inlet_pressure = pressure;
        self.outlet_pressure = self.config.steam_turbine.exhaust_pressure;
        self.steam_flow_rate = flow;
        self.rpm = self.calculate_rpm();
        self.thermal_power = flow * steam_table::from_pressure(pressure).enthalpy / 1000.0;

        Ok(self.status())
    }
}
