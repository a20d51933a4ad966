//! Typed status snapshots. Field names serialize in camelCase and carry
//! unit companions (`pumpPressureUnit`, ...) so the JSON is self-describing.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{CondenserType, TubeMaterial};
use crate::traits::ComponentKind;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct About {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryLoopStatus {
    pub about: About,
    pub pump_on: bool,
    pub pump_pressure: f64,
    pub pump_pressure_unit: &'static str,
    pub pump_heat: f64,
    pub pump_heat_unit: &'static str,
    pub flow_rate: f64,
    pub flow_rate_unit: &'static str,
    pub boron_concentration: f64,
    pub boron_concentration_unit: &'static str,
    pub hot_leg_temperature: f64,
    pub hot_leg_temperature_unit: &'static str,
    pub cold_leg_temperature: f64,
    pub cold_leg_temperature_unit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlBankStatus {
    pub label: String,
    pub num_rods: u32,
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlRodsStatus {
    pub about: About,
    pub control_banks: Vec<ControlBankStatus>,
    pub gray_banks: Vec<ControlBankStatus>,
    pub shutdown_banks: Vec<ControlBankStatus>,
    pub average_control_rod_extraction: f64,
    pub shutdown_motion: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactorCoreStatus {
    pub about: About,
    pub fuel_age: u64,
    pub fuel_age_unit: &'static str,
    pub cycle_phase: &'static str,
    pub reactivity: f64,
    pub neutron_flux: f64,
    pub neutron_flux_unit: &'static str,
    pub temperature: f64,
    pub temperature_unit: &'static str,
    pub heat_energy_rate: f64,
    pub heat_energy_rate_unit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PressurizerStatus {
    pub about: About,
    pub pressure: f64,
    pub pressure_unit: &'static str,
    pub temperature: f64,
    pub temperature_unit: &'static str,
    pub heater_on: bool,
    pub heater_power: f64,
    pub heater_power_unit: &'static str,
    pub spray_nozzle_open: bool,
    pub spray_flow_rate: f64,
    pub spray_flow_rate_unit: &'static str,
    pub relief_vents: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryLoopStatus {
    pub about: About,
    pub steam_temperature: f64,
    pub steam_temperature_unit: &'static str,
    pub steam_pressure: f64,
    pub steam_pressure_unit: &'static str,
    pub steam_flow_rate: f64,
    pub steam_flow_rate_unit: &'static str,
    pub power_operated_relief_valve_open: bool,
    pub feedwater_pump_on: bool,
    pub feedwater_flow_rate: f64,
    pub feedwater_flow_rate_unit: &'static str,
    pub feedheaters_on: bool,
    pub feedwater_temperature_out: f64,
    pub feedwater_temperature_in: f64,
    pub feedwater_temperature_unit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SteamGeneratorStatus {
    pub about: About,
    pub primary_inlet_temp: f64,
    pub primary_outlet_temp: f64,
    pub secondary_inlet_temp: f64,
    pub secondary_outlet_temp: f64,
    pub temperature_unit: &'static str,
    pub heat_transfer_rate: f64,
    pub heat_transfer_rate_unit: &'static str,
    pub steam_flow_rate: f64,
    pub steam_flow_rate_unit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SteamTurbineStatus {
    pub about: About,
    pub inlet_pressure: f64,
    pub outlet_pressure: f64,
    pub pressure_unit: &'static str,
    pub steam_flow_rate: f64,
    pub steam_flow_rate_unit: &'static str,
    pub rpm: u32,
    pub max_rpm: u32,
    pub blade_diameter: f64,
    pub efficiency: f64,
    pub thermal_power: f64,
    pub thermal_power_unit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorStatus {
    pub about: About,
    pub rpm: u32,
    pub frequency: f64,
    pub frequency_unit: &'static str,
    pub connected_to_grid: bool,
    pub electrical_power_out: f64,
    pub electrical_power_out_unit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CondenserStatus {
    pub about: About,
    pub condenser_type: CondenserType,
    pub tube_material: TubeMaterial,
    pub heat_rejection: f64,
    pub heat_rejection_unit: &'static str,
    pub condenser_pressure: f64,
    pub condenser_pressure_unit: &'static str,
    pub condenser_temperature: f64,
    pub steam_flow_rate: f64,
    pub cooling_water_flow_rate: f64,
    pub flow_rate_unit: &'static str,
    pub heat_transfer_coefficient: f64,
    pub cooling_water_temp_in: f64,
    pub cooling_water_temp_out: f64,
    pub temperature_unit: &'static str,
    pub water_velocity: f64,
    pub surface_area: f64,
    pub surface_area_unit: &'static str,
}

/// One snapshot per component kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentStatus {
    PrimaryLoop(PrimaryLoopStatus),
    ControlRods(ControlRodsStatus),
    ReactorCore(ReactorCoreStatus),
    Pressurizer(PressurizerStatus),
    SecondaryLoop(SecondaryLoopStatus),
    SteamGenerator(SteamGeneratorStatus),
    SteamTurbine(SteamTurbineStatus),
    Generator(GeneratorStatus),
    Condenser(CondenserStatus),
}

impl ComponentStatus {
    pub fn kind(&self) -> ComponentKind {
        match self {
            ComponentStatus::PrimaryLoop(_) => ComponentKind::PrimaryLoop,
            ComponentStatus::ControlRods(_) => ComponentKind::ControlRods,
            ComponentStatus::ReactorCore(_) => ComponentKind::ReactorCore,
            ComponentStatus::Pressurizer(_) => ComponentKind::Pressurizer,
            ComponentStatus::SecondaryLoop(_) => ComponentKind::SecondaryLoop,
            ComponentStatus::SteamGenerator(_) => ComponentKind::SteamGenerator,
            ComponentStatus::SteamTurbine(_) => ComponentKind::SteamTurbine,
            ComponentStatus::Generator(_) => ComponentKind::Generator,
            ComponentStatus::Condenser(_) => ComponentKind::Condenser,
        }
    }

    pub fn about(&self) -> &About {
        match self {
            ComponentStatus::PrimaryLoop(s) => &s.about,
            ComponentStatus::ControlRods(s) => &s.about,
            ComponentStatus::ReactorCore(s) => &s.about,
            ComponentStatus::Pressurizer(s) => &s.about,
            ComponentStatus::SecondaryLoop(s) => &s.about,
            ComponentStatus::SteamGenerator(s) => &s.about,
            ComponentStatus::SteamTurbine(s) => &s.about,
            ComponentStatus::Generator(s) => &s.about,
            ComponentStatus::Condenser(s) => &s.about,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Point-in-time view of the whole plant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantStatus {
    pub motto: String,
    pub sim_time: DateTime<Utc>,
    pub relief_vents: u64,
    pub mssv_vents: u64,
    pub simulator: crate::engine::SimulatorStatus,
}

impl PlantStatus {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
