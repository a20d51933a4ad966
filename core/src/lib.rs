pub mod clock;
pub mod commands;
pub mod components;
pub mod config;
pub mod engine;
pub mod environment;
pub mod error;
pub mod event;
pub mod plant;
pub mod runner;
pub mod snapshot;
pub mod steam_table;
pub mod traits;
pub mod turbine_calc;

pub use clock::SimClock;
pub use components::{component_catalog, create_component};
pub use config::PlantConfig;
pub use engine::{ComponentFailure, Simulator, SimulatorStatus, TickContext, TickReport};
pub use environment::{Environment, WeatherModel};
pub use error::{Result, SimError};
pub use event::{Event, EventId, EventQueue, EventStatus};
pub use plant::{PlantEventHandler, PlantHandles, PwrPlant};
pub use runner::SimulationRunner;
pub use snapshot::{ComponentStatus, PlantStatus};
pub use traits::{Component, ComponentHandle, ComponentInfo, ComponentKind, EventHandler, Shared};

/// Simulated time advances one second per tick.
pub const ONE_MINUTE_IN_SECONDS: u64 = 60;
pub const ONE_HOUR_IN_SECONDS: u64 = 60 * ONE_MINUTE_IN_SECONDS;
pub const ONE_DAY_IN_SECONDS: u64 = 24 * ONE_HOUR_IN_SECONDS;
pub const ONE_WEEK_IN_SECONDS: u64 = 7 * ONE_DAY_IN_SECONDS;
