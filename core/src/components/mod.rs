use std::sync::Arc;

use serde_json::Value;

use crate::config::PlantConfig;
use crate::traits::{shared, Component, ComponentHandle, ComponentKind};

pub mod condenser;
pub mod control_bank;
pub mod control_rods;
pub mod generator;
pub mod pressurizer;
pub mod primary_loop;
pub mod reactor_core;
pub mod secondary_loop;
pub mod steam_generator;
pub mod steam_turbine;

pub use condenser::Condenser;
pub use control_bank::ControlBank;
pub use control_rods::{BankGroup, ControlRods, ShutdownMotion};
pub use generator::Generator;
pub use pressurizer::Pressurizer;
pub use primary_loop::PrimaryLoop;
pub use reactor_core::{CyclePhase, ReactorCore};
pub use secondary_loop::SecondaryLoop;
pub use steam_generator::SteamGenerator;
pub use steam_turbine::SteamTurbine;

/// Moves `current` toward `target` by at most `max_step`, landing exactly on
/// the target once within reach.
pub fn step_toward(current: f64, target: f64, max_step: f64) -> f64 {
    let delta = target - current;
    // absorbs float drift from many repeated steps
    if delta.abs() <= max_step * (1.0 + 1e-9) {
        target
    } else {
        current + max_step.copysign(delta)
    }
}

/// -1, 0 or 1. Unlike `f64::signum`, zero maps to zero.
pub fn direction(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

macro_rules! register_components {
    ($($kind:expr => $type:ty, $section:ident),* $(,)?) => {
        /// Builds a standalone component by kind name. `data` overrides that
        /// component's config section; siblings are left unattached.
        pub fn create_component(kind: &str, data: Value) -> Option<ComponentHandle> {
            match kind {
                $(
                    $kind => {
                        let mut config = PlantConfig::default();
                        if !data.is_null() {
                            match serde_json::from_value(data) {
                                Ok(section) => config.$section = section,
                                Err(err) => log::warn!("ignoring {} config: {}", $kind, err),
                            }
                        }
                        let component = <$type>::default().with_config(Arc::new(config));
                        let handle: ComponentHandle = shared(component);
                        Some(handle)
                    }
                )*
                _ => None,
            }
        }

        /// Kind and default description of every component the plant knows.
        pub fn component_catalog() -> Vec<(ComponentKind, String)> {
            vec![
                $(
                    {
                        let tmp: $type = Default::default();
                        (tmp.kind(), tmp.description().to_string())
                    }
                ),*
            ]
        }
    };
}

register_components!(
    "PrimaryLoop" => PrimaryLoop, primary_loop,
    "ControlRods" => ControlRods, control_rods,
    "ReactorCore" => ReactorCore, reactor_core,
    "Pressurizer" => Pressurizer, pressurizer,
    "SecondaryLoop" => SecondaryLoop, secondary_loop,
    "SteamGenerator" => SteamGenerator, steam_generator,
    "SteamTurbine" => SteamTurbine, steam_turbine,
    "Generator" => Generator, generator,
    "Condenser" => Condenser, condenser,
);
