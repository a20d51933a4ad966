use std::sync::Arc;

use crate::components::{direction, ControlRods, PrimaryLoop};
use crate::config::{CriticalPoint, PlantConfig};
use crate::engine::TickContext;
use crate::error::{Result, SimError};
use crate::snapshot::{ComponentStatus, ReactorCoreStatus};
use crate::traits::{read, Component, ComponentInfo, ComponentKind, Shared};
use crate::ONE_DAY_IN_SECONDS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    BeginningOfCycle,
    MiddleOfCycle,
    EndOfCycle,
    Refueling,
}

impl CyclePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            CyclePhase::BeginningOfCycle => "beginning_of_cycle",
            CyclePhase::MiddleOfCycle => "middle_of_cycle",
            CyclePhase::EndOfCycle => "end_of_cycle",
            CyclePhase::Refueling => "refueling",
        }
    }
}

/// Fuel assemblies and moderator. Reactivity comes from where boron and rod
/// extraction sit relative to the critical point for the current fuel age.
pub struct ReactorCore {
    info: ComponentInfo,
    config: Arc<PlantConfig>,
    primary_loop: Option<Shared<PrimaryLoop>>,
    control_rods: Option<Shared<ControlRods>>,
    fuel_age: u64, // seconds
    reactivity: f64,
    neutron_flux: f64,
    temperature: f64,
    heat_energy_rate: f64,
}

impl ReactorCore {
    pub fn new(name: &str, description: &str) -> Self {
        Self::build(ComponentInfo::new(name, description), Arc::new(PlantConfig::default()))
    }

    pub fn with_config(self, config: Arc<PlantConfig>) -> Self {
        Self {
            primary_loop: self.primary_loop,
            control_rods: self.control_rods,
            ..Self::build(self.info, config)
        }
    }

    fn build(info: ComponentInfo, config: Arc<PlantConfig>) -> Self {
        Self {
            info,
            primary_loop: None,
            control_rods: None,
            fuel_age: 0,
            reactivity: 0.0,
            neutron_flux: config.reactor_core.source_neutron_flux,
            temperature: config.common.room_temperature,
            heat_energy_rate: 0.0,
            config,
        }
    }

    pub fn with_primary_loop(mut self, primary_loop: Shared<PrimaryLoop>) -> Self {
        self.primary_loop = Some(primary_loop);
        self
    }

    pub fn with_control_rods(mut self, control_rods: Shared<ControlRods>) -> Self {
        self.control_rods = Some(control_rods);
        self
    }

    pub fn fuel_age(&self) -> u64 {
        self.fuel_age
    }

    pub fn set_fuel_age(&mut self, seconds: u64) {
        self.fuel_age = seconds;
    }

    pub fn fuel_age_days(&self) -> f64 {
        self.fuel_age as f64 / ONE_DAY_IN_SECONDS as f64
    }

    pub fn reactivity(&self) -> f64 {
        self.reactivity
    }

    pub fn neutron_flux(&self) -> f64 {
        self.neutron_flux
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn heat_energy_rate(&self) -> f64 {
        self.heat_energy_rate
    }

    pub fn cycle_phase(&self) -> CyclePhase {
        let rc = &self.config.reactor_core;
        let days = self.fuel_age_days();
        if days < rc.beginning_of_cycle_days {
            CyclePhase::BeginningOfCycle
        } else if days < rc.middle_of_cycle_days {
            CyclePhase::MiddleOfCycle
        } else if days < rc.end_of_cycle_days {
            CyclePhase::EndOfCycle
        } else {
            CyclePhase::Refueling
        }
    }

    pub fn critical_point(&self) -> CriticalPoint {
        let rc = &self.config.reactor_core;
        match self.cycle_phase() {
            CyclePhase::BeginningOfCycle => rc.beginning_of_cycle,
            CyclePhase::MiddleOfCycle => rc.middle_of_cycle,
            CyclePhase::EndOfCycle => rc.end_of_cycle,
            CyclePhase::Refueling => rc.refueling,
        }
    }

    /// Rods withdrawn past critical add reactivity, boron above critical
    /// takes it away.
    pub fn compute_reactivity(&self, boron_concentration: f64, rod_extraction: f64) -> f64 {
        let rc = &self.config.reactor_core;
        let critical = self.critical_point();
        rc.rod_worth * direction(rod_extraction - critical.rod_extraction)
            - rc.boron_worth * direction(boron_concentration - critical.boron_concentration)
    }

    fn missing(&self, collaborator: &'static str) -> SimError {
        SimError::MissingCollaborator {
            component: self.info.name().to_string(),
            collaborator,
        }
    }
}

impl Default for ReactorCore {
    fn default() -> Self {
        Self::new("RC1", "Fuel assemblies and moderator where fission heat is produced.")
    }
}

impl Component for ReactorCore {
    fn info(&self) -> &ComponentInfo {
        &self.info
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::ReactorCore
    }

    fn status(&self) -> ComponentStatus {
        ComponentStatus::ReactorCore(ReactorCoreStatus {
            about: self.info.about(),
            fuel_age: self.fuel_age,
            fuel_age_unit: "s",
            cycle_phase: self.cycle_phase().as_str(),
            reactivity: self.reactivity,
            neutron_flux: self.neutron_flux,
            neutron_flux_unit: "n/cm²·s",
            temperature: self.temperature,
            temperature_unit: "°C",
            heat_energy_rate: self.heat_energy_rate,
            heat_energy_rate_unit: "MW",
        })
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) -> Result<ComponentStatus> {
        let boron = match &self.primary_loop {
            Some(pl) => read(pl).boron_concentration(),
            None => return Err(self.missing("primary loop")),
        };
        let extraction = match &self.control_rods {
            Some(cr) => read(cr).average_control_rod_extraction(),
            None => return Err(self.missing("control rods")),
        };
        self.info.touch(ctx.now());
        self.fuel_age += 1;

        let rc = &self.config.reactor_core;
        self.reactivity = self.compute_reactivity(boron, extraction);
        self.heat_energy_rate = self.reactivity * rc.max_thermal_power;
        self.temperature = (self.temperature + self.heat_energy_rate * rc.heat_capacity_factor)
            .clamp(rc.min_temperature, rc.max_temperature);
        self.neutron_flux = (self.neutron_flux * (1.0 + self.reactivity * rc.flux_sensitivity))
            .clamp(rc.source_neutron_flux, rc.max_neutron_flux);

        Ok(self.status())
    }
}
