//! Offline sizing of a multi-stage PWR turbine train.
//!
//! Independent of the tick loop: takes throttle conditions and a required
//! electrical output and reports the stage-by-stage expansion, the feedwater
//! heater extraction pressures and the steam flow needed.

use serde::{Deserialize, Serialize};

use crate::config::CondenserType;
use crate::error::{Result, SimError};

const MAX_MOISTURE_CONTENT: f64 = 0.12;
const HP_OUTLET_MOISTURE: f64 = 0.12;
const HP_OUTLET_TEMPERATURE: f64 = 180.0; // °C
const HP_PRESSURE_RATIO: f64 = 0.25;
const LP_PRESSURE_RATIO: f64 = 0.004;
const LP_STAGES: usize = 4;
const LP_MOISTURE_PICKUP: f64 = 0.03;
const MSR_TEMPERATURE_RISE: f64 = 40.0; // °C
const MSR_OUTLET_MOISTURE: f64 = 0.001;
const BASE_EFFICIENCY: f64 = 0.75;
const MSR_EFFICIENCY_BONUS: f64 = 0.02;
const HEATER_EFFICIENCY_BONUS: f64 = 0.002;
const MAX_EFFICIENCY: f64 = 0.86;
const ENTHALPY_DROP: f64 = 800.0; // kJ/kg

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TurbineParams {
    pub throttle_pressure: f64,    // MPa
    pub throttle_temperature: f64, // °C
    pub generator_output: f64,     // MW
    pub moisture_separation_stages: usize,
    pub feedwater_heaters: usize,
    pub condenser_type: CondenserType,
}

impl Default for TurbineParams {
    fn default() -> Self {
        Self {
            throttle_pressure: 7.0,
            throttle_temperature: 286.0,
            generator_output: 1100.0,
            moisture_separation_stages: 1,
            feedwater_heaters: 7,
            condenser_type: CondenserType::WaterCooled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurbineStage {
    pub name: String,
    pub inlet_pressure: f64,  // MPa
    pub outlet_pressure: f64, // MPa
    pub inlet_temperature: f64,
    pub outlet_temperature: f64,
    pub moisture_content: f64, // fraction
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurbineReport {
    pub stages: Vec<TurbineStage>,
    /// MPa, highest first
    pub extraction_pressures: Vec<f64>,
    pub total_efficiency: f64,
    pub steam_flow: f64, // kg/s
    pub condenser_pressure: f64, // kPa
    pub generator_output: f64, // MW
}

impl TurbineReport {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

fn condenser_back_pressure(condenser_type: CondenserType) -> f64 {
    match condenser_type {
        CondenserType::WaterCooled => 5.0,
        CondenserType::AirCooled => 8.0,
    }
}

/// Cycle efficiency: a base value plus a bonus per reheater and per
/// feedwater heater, capped.
pub fn total_efficiency(moisture_separation_stages: usize, feedwater_heaters: usize) -> f64 {
    let bonus = MSR_EFFICIENCY_BONUS * moisture_separation_stages as f64
        + HEATER_EFFICIENCY_BONUS * feedwater_heaters as f64;
    (BASE_EFFICIENCY + bonus).min(MAX_EFFICIENCY)
}

pub fn calculate(params: &TurbineParams) -> Result<TurbineReport> {
    if params.throttle_pressure.is_nan() || params.throttle_pressure <= 0.0 {
        return Err(SimError::InvalidTurbineParameters(format!(
            "throttle pressure must be positive, got {}",
            params.throttle_pressure
        )));
    }
    if params.generator_output < 0.0 {
        return Err(SimError::InvalidTurbineParameters(format!(
            "generator output cannot be negative, got {}",
            params.generator_output
        )));
    }

    let saturation_temperature = params
        .throttle_temperature
        .min(234.0 + 44.0 * params.throttle_pressure.log10());

    let mut stages = Vec::with_capacity(1 + params.moisture_separation_stages + LP_STAGES);

    let mut pressure = params.throttle_pressure * HP_PRESSURE_RATIO;
    let mut temperature = HP_OUTLET_TEMPERATURE;
    let mut moisture = HP_OUTLET_MOISTURE;
    stages.push(TurbineStage {
        name: "HP".to_string(),
        inlet_pressure: params.throttle_pressure,
        outlet_pressure: pressure,
        inlet_temperature: saturation_temperature,
        outlet_temperature: temperature,
        moisture_content: moisture,
    });

    for i in 0..params.moisture_separation_stages {
        let drop = if i == 0 { 0.95 } else { 0.90 };
        let inlet = pressure * drop;
        let outlet = inlet * 0.95;
        let reheated = temperature + MSR_TEMPERATURE_RISE;
        moisture = MSR_OUTLET_MOISTURE;
        stages.push(TurbineStage {
            name: format!("MSR{}", i + 1),
            inlet_pressure: inlet,
            outlet_pressure: outlet,
            inlet_temperature: temperature,
            outlet_temperature: reheated,
            moisture_content: moisture,
        });
        pressure = outlet;
        temperature = reheated;
    }

    let stage_ratio = LP_PRESSURE_RATIO.powf(1.0 / LP_STAGES as f64);
    for i in 0..LP_STAGES {
        let outlet = pressure * stage_ratio;
        let cooled = 60.0 + (temperature - 60.0) * stage_ratio.powf(0.3);
        moisture = (moisture + LP_MOISTURE_PICKUP).min(MAX_MOISTURE_CONTENT);
        stages.push(TurbineStage {
            name: format!("LP{}", i + 1),
            inlet_pressure: pressure,
            outlet_pressure: outlet,
            inlet_temperature: temperature,
            outlet_temperature: cooled,
            moisture_content: moisture,
        });
        pressure = outlet;
        temperature = cooled;
    }

    let condenser_pressure = condenser_back_pressure(params.condenser_type);
    // geometric spacing between throttle and condenser
    let overall_ratio = condenser_pressure / 1000.0 / params.throttle_pressure;
    let extraction_pressures = (1..=params.feedwater_heaters)
        .map(|i| {
            let exponent = i as f64 / (params.feedwater_heaters + 1) as f64;
            params.throttle_pressure * overall_ratio.powf(exponent)
        })
        .collect();

    let efficiency = total_efficiency(params.moisture_separation_stages, params.feedwater_heaters);
    let steam_flow = params.generator_output * 1000.0 / (ENTHALPY_DROP * efficiency);

    Ok(TurbineReport {
        stages,
        extraction_pressures,
        total_efficiency: efficiency,
        steam_flow,
        condenser_pressure,
        generator_output: params.generator_output,
    })
}
