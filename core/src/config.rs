use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Physical constants and set-points for every component of the plant.
///
/// The numbers are simplified operating values, good enough for a training
/// model. Any subset can be overridden from JSON; missing keys keep their
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantConfig {
    pub common: CommonConfig,
    pub primary_loop: PrimaryLoopConfig,
    pub control_rods: ControlRodsConfig,
    pub reactor_core: ReactorCoreConfig,
    pub pressurizer: PressurizerConfig,
    pub secondary_loop: SecondaryLoopConfig,
    pub steam_generator: SteamGeneratorConfig,
    pub steam_turbine: SteamTurbineConfig,
    pub generator: GeneratorConfig,
    pub condenser: CondenserConfig,
}

impl PlantConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonConfig {
    pub room_temperature: f64,     // °C
    pub atmospheric_pressure: f64, // MPa
    pub gravity: f64,              // m/s²
    pub steam_latent_heat: f64,    // J/kg
    pub water_specific_heat: f64,  // J/kg·K
    pub water_density: f64,        // kg/m³
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            room_temperature: 20.0,
            atmospheric_pressure: 0.101325,
            gravity: 9.81,
            steam_latent_heat: 2.257e6,
            water_specific_heat: 4186.0,
            water_density: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimaryLoopConfig {
    pub pump_on_pressure: f64,
    pub pump_on_flow_rate: f64,
    pub pump_on_heat: f64,
    pub pump_off_pressure: f64,
    pub pump_off_flow_rate: f64,
    pub pump_off_heat: f64,
    /// ppm per tick
    pub max_boron_rate_of_change: f64,
    pub max_boron_concentration: f64,
    /// Hot-leg temperature reached from pump heat alone.
    pub no_load_temperature: f64,
    /// °C per tick, both warming and cooling.
    pub leg_temperature_step: f64,
    pub loop_delta_t: f64,
}

impl Default for PrimaryLoopConfig {
    fn default() -> Self {
        Self {
            pump_on_pressure: 1.0,
            pump_on_flow_rate: 20.0,
            pump_on_heat: 100.0,
            pump_off_pressure: 0.0,
            pump_off_flow_rate: 0.0,
            pump_off_heat: 0.0,
            max_boron_rate_of_change: 0.083,
            max_boron_concentration: 2500.0,
            no_load_temperature: 291.7,
            leg_temperature_step: 0.05,
            loop_delta_t: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlRodsConfig {
    pub max_withdrawal_steps: u32,
    /// Steps per tick for every rate-limited bank motion.
    pub withdrawal_rate: u32,
}

impl Default for ControlRodsConfig {
    fn default() -> Self {
        Self {
            max_withdrawal_steps: 250,
            withdrawal_rate: 3,
        }
    }
}

/// Boron concentration and rod extraction at which the core sits critical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalPoint {
    pub boron_concentration: f64,
    pub rod_extraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactorCoreConfig {
    pub beginning_of_cycle_days: f64,
    pub middle_of_cycle_days: f64,
    pub end_of_cycle_days: f64,
    pub beginning_of_cycle: CriticalPoint,
    pub middle_of_cycle: CriticalPoint,
    pub end_of_cycle: CriticalPoint,
    pub refueling: CriticalPoint,
    pub rod_worth: f64,
    pub boron_worth: f64,
    /// MW at unit reactivity.
    pub max_thermal_power: f64,
    /// °C per MW per tick.
    pub heat_capacity_factor: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub source_neutron_flux: f64,
    pub max_neutron_flux: f64,
    pub flux_sensitivity: f64,
}

impl Default for ReactorCoreConfig {
    fn default() -> Self {
        Self {
            beginning_of_cycle_days: 120.0,
            middle_of_cycle_days: 400.0,
            end_of_cycle_days: 540.0,
            beginning_of_cycle: CriticalPoint {
                boron_concentration: 1200.0,
                rod_extraction: 0.60,
            },
            middle_of_cycle: CriticalPoint {
                boron_concentration: 800.0,
                rod_extraction: 0.70,
            },
            end_of_cycle: CriticalPoint {
                boron_concentration: 100.0,
                rod_extraction: 0.85,
            },
            refueling: CriticalPoint {
                boron_concentration: 2500.0,
                rod_extraction: 0.0,
            },
            rod_worth: 0.5,
            boron_worth: 0.5,
            max_thermal_power: 3000.0,
            heat_capacity_factor: 0.0001,
            min_temperature: 20.0,
            max_temperature: 1000.0,
            source_neutron_flux: 1.0e3,
            max_neutron_flux: 1.0e14,
            flux_sensitivity: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressurizerConfig {
    pub heater_high_power: f64, // kW
    pub heater_low_power: f64,  // kW
    pub spray_flow_rate: f64,   // kg/s
    pub relief_valve_threshold_pressure: f64,
    /// MPa released per vent.
    pub relief_valve_pressure_drop: f64,
    pub heatup_rate: f64,
    pub cooldown_rate: f64,
    pub spray_cooldown_rate: f64,
    /// Cooling floor when no primary loop is attached.
    pub cold_leg_temperature: f64,
}

impl Default for PressurizerConfig {
    fn default() -> Self {
        Self {
            heater_high_power: 1500.0,
            heater_low_power: 50.0,
            spray_flow_rate: 10.0,
            relief_valve_threshold_pressure: 18.0,
            relief_valve_pressure_drop: 1.0,
            heatup_rate: 1.0,
            cooldown_rate: 1.0,
            spray_cooldown_rate: 5.0,
            cold_leg_temperature: 290.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecondaryLoopConfig {
    pub mssv_pressure_threshold: f64,
    pub mssv_pressure_drop: f64,
    pub porv_pressure_step: f64,
    pub base_feedwater_temperature: f64,
    pub heated_feedwater_temperature: f64,
    pub feedheater_step_up: f64,
    pub feedheater_step_down: f64,
    pub feedwater_flow_rate_target: f64,
    pub feedwater_flow_rate_step_up: f64,
    pub feedwater_flow_rate_step_down: f64,
    /// kg of steam per m³ of feedwater.
    pub steam_yield: f64,
}

impl Default for SecondaryLoopConfig {
    fn default() -> Self {
        Self {
            mssv_pressure_threshold: 8.0,
            mssv_pressure_drop: 0.5,
            porv_pressure_step: 0.5,
            base_feedwater_temperature: 40.0,
            heated_feedwater_temperature: 80.0,
            feedheater_step_up: 1.25,
            feedheater_step_down: 2.5,
            feedwater_flow_rate_target: 20.0,
            feedwater_flow_rate_step_up: 0.8,
            feedwater_flow_rate_step_down: 1.5,
            steam_yield: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteamGeneratorConfig {
    pub primary_delta_t: f64,
    pub approach_temperature: f64,
    pub max_steam_temperature: f64,
    pub coolant_density: f64,       // kg/m³
    pub coolant_specific_heat: f64, // kJ/kg·K
    /// kJ/kg to raise feedwater to steam.
    pub steam_generation_enthalpy: f64,
}

impl Default for SteamGeneratorConfig {
    fn default() -> Self {
        Self {
            primary_delta_t: 35.0,
            approach_temperature: 40.0,
            max_steam_temperature: 285.0,
            coolant_density: 740.0,
            coolant_specific_heat: 5.5,
            steam_generation_enthalpy: 1500.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteamTurbineConfig {
    pub max_rpm: u32,
    pub efficiency: f64,
    pub blade_diameter: f64, // m
    pub exhaust_pressure: f64, // MPa
}

impl Default for SteamTurbineConfig {
    fn default() -> Self {
        Self {
            max_rpm: 3600,
            efficiency: 0.85,
            blade_diameter: 0.6,
            exhaust_pressure: 0.005,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub poles: u32,
    pub standard_ac_frequency: f64,
    /// Fraction of the standard frequency.
    pub frequency_tolerance: f64,
    /// MW per rpm while synchronized.
    pub power_per_rpm: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            poles: 2,
            standard_ac_frequency: 60.0,
            frequency_tolerance: 0.001,
            power_per_rpm: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CondenserType {
    WaterCooled,
    AirCooled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TubeMaterial {
    Titanium,
    StainlessSteel,
    CopperNickel,
}

impl TubeMaterial {
    /// W/m·K
    pub fn conductivity(self) -> f64 {
        match self {
            TubeMaterial::Titanium => 22.0,
            TubeMaterial::StainlessSteel => 16.0,
            TubeMaterial::CopperNickel => 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CondenserConfig {
    pub condenser_type: CondenserType,
    pub tube_material: TubeMaterial,
    pub thermal_efficiency: f64,
    pub cooling_water_temp_in: f64,
    pub cooling_water_temp_rise: f64,
    pub terminal_temperature_difference: f64,
    pub air_cooled_terminal_difference: f64,
    pub air_cooled_approach: f64,
    pub surface_area: f64, // m²
    pub water_velocity: f64, // m/s
    pub tube_outer_diameter: f64, // m
    pub tube_wall_thickness: f64, // m
    pub water_viscosity: f64,
    pub water_conductivity: f64,
    pub prandtl_number: f64,
    pub steam_side_coefficient: f64, // W/m²·K
}

impl Default for CondenserConfig {
    fn default() -> Self {
        Self {
            condenser_type: CondenserType::WaterCooled,
            tube_material: TubeMaterial::Titanium,
            thermal_efficiency: 0.33,
            cooling_water_temp_in: 25.0,
            cooling_water_temp_rise: 10.0,
            terminal_temperature_difference: 5.0,
            air_cooled_terminal_difference: 15.0,
            air_cooled_approach: 10.0,
            surface_area: 40_000.0,
            water_velocity: 2.0,
            tube_outer_diameter: 0.025,
            tube_wall_thickness: 0.0015,
            water_viscosity: 1e-3,
            water_conductivity: 0.6,
            prandtl_number: 7.0,
            steam_side_coefficient: 10_000.0,
        }
    }
}
