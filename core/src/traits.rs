use std::any::Any;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::TickContext;
use crate::error::Result;
use crate::event::Event;
use crate::snapshot::{About, ComponentStatus};

pub type ComponentId = String;

/// Typed handle to a component. Dependents keep clones of these.
pub type Shared<T> = Arc<RwLock<T>>;

/// Type-erased handle the simulator iterates over.
pub type ComponentHandle = Arc<RwLock<dyn Component>>;

pub fn shared<T>(value: T) -> Shared<T> {
    Arc::new(RwLock::new(value))
}

/// Read-locks a handle. A panic in another holder does not invalidate
/// plant state, so poisoning is ignored.
pub fn read<T: ?Sized>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub fn write<T: ?Sized>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn generate_id(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    PrimaryLoop,
    ControlRods,
    ReactorCore,
    Pressurizer,
    SecondaryLoop,
    SteamGenerator,
    SteamTurbine,
    Generator,
    Condenser,
}

impl ComponentKind {
    pub fn label(self) -> &'static str {
        match self {
            ComponentKind::PrimaryLoop => "Primary Loop",
            ComponentKind::ControlRods => "Control Rods",
            ComponentKind::ReactorCore => "Reactor Core",
            ComponentKind::Pressurizer => "Pressurizer",
            ComponentKind::SecondaryLoop => "Secondary Loop",
            ComponentKind::SteamGenerator => "Steam Generator",
            ComponentKind::SteamTurbine => "Steam Turbine",
            ComponentKind::Generator => "Generator",
            ComponentKind::Condenser => "Condenser",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identity shared by every component plus the instant it last updated.
#[derive(Debug, Clone)]
pub struct ComponentInfo {
    id: ComponentId,
    name: String,
    description: String,
    latest_moment: Option<DateTime<Utc>>,
}

impl ComponentInfo {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            id: generate_id(12),
            name: name.to_string(),
            description: description.to_string(),
            latest_moment: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn latest_moment(&self) -> Option<DateTime<Utc>> {
        self.latest_moment
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.latest_moment = Some(now);
    }

    pub fn about(&self) -> About {
        About {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

pub trait Component: Any + Send + Sync {
    fn info(&self) -> &ComponentInfo;
    fn kind(&self) -> ComponentKind;

    /// Read-only snapshot of the current physical state.
    fn status(&self) -> ComponentStatus;

    /// Advances the component by one tick. Consumes in-progress events the
    /// component owns. An error means the physics were skipped this tick.
    fn update(&mut self, ctx: &mut TickContext<'_>) -> Result<ComponentStatus>;

    fn id(&self) -> &str {
        self.info().id()
    }

    fn name(&self) -> &str {
        self.info().name()
    }

    fn description(&self) -> &str {
        self.info().description()
    }

    fn latest_moment(&self) -> Option<DateTime<Utc>> {
        self.info().latest_moment()
    }
}

/// Cross-cutting consumer of events no component owns, such as venting
/// notifications. Sees events that are still pending and due after all
/// components have updated.
pub trait EventHandler: Send {
    fn process_event(&mut self, event: &mut Event);
}
