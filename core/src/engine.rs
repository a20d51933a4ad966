use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::clock::{self, SimClock};
use crate::environment::Environment;
use crate::error::{Result, SimError};
use crate::event::{Event, EventId, EventQueue, EventSnapshot};
use crate::snapshot::ComponentStatus;
use crate::traits::{generate_id, read, write, ComponentHandle, EventHandler};

/// What a component sees while it updates: simulated time, the environment
/// and the active event list.
pub struct TickContext<'a> {
    tick: u64,
    now: DateTime<Utc>,
    environment: &'a Environment,
    events: &'a mut EventQueue,
}

impl<'a> TickContext<'a> {
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn environment(&self) -> &Environment {
        self.environment
    }

    pub fn events(&self) -> &[Event] {
        self.events.active()
    }

    pub fn in_progress_mut(&mut self) -> impl Iterator<Item = &mut Event> + '_ {
        self.events
            .active_mut()
            .iter_mut()
            .filter(|e| e.is_in_progress())
    }

    /// Appended to the active list right away, so components later in the
    /// order and the event handler see it during this tick.
    pub fn queue_event(&mut self, event: Event) -> EventId {
        self.events.push(event)
    }
}

#[derive(Debug, Clone)]
pub struct ComponentFailure {
    pub component_id: String,
    pub component_name: String,
    pub error: SimError,
}

/// Outcome of one tick: every snapshot that was produced and every
/// component that had to skip its physics.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub tick: u64,
    pub now: DateTime<Utc>,
    pub statuses: Vec<ComponentStatus>,
    pub errors: Vec<ComponentFailure>,
}

impl TickReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatorStatus {
    pub id: String,
    pub name: String,
    pub purpose: String,
    pub created_at: DateTime<Utc>,
    pub sim_time: DateTime<Utc>,
    pub ticks: u64,
    pub running: bool,
    pub environment: Environment,
    pub components: Vec<ComponentStatus>,
    pub active_events: Vec<EventSnapshot>,
    pub inactive_event_count: usize,
}

impl SimulatorStatus {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Drives registered components through simulated time.
///
/// Components update in registration order, and a component may read the
/// state its siblings reached earlier in the same tick. The order is a
/// dependency order and must not change once ticking has begun.
pub struct Simulator {
    id: String,
    name: String,
    purpose: String,
    created_at: DateTime<Utc>,
    clock: SimClock,
    environment: Environment,
    components: Vec<ComponentHandle>,
    component_index: HashMap<String, ComponentHandle>,
    events: EventQueue,
    event_handler: Option<Box<dyn EventHandler>>,
    last_report: Option<TickReport>,
    running: bool,
}

impl Simulator {
    pub fn new(name: &str, purpose: &str) -> Self {
        Self {
            id: generate_id(8),
            name: name.to_string(),
            purpose: purpose.to_string(),
            created_at: Utc::now(),
            clock: SimClock::default(),
            environment: Environment::new(),
            components: Vec::new(),
            component_index: HashMap::new(),
            events: EventQueue::new(),
            event_handler: None,
            last_report: None,
            running: false,
        }
    }

    pub fn with_clock(mut self, clock: SimClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn current_moment(&self) -> DateTime<Utc> {
        self.clock.sim_now()
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    pub fn set_event_handler(&mut self, handler: impl EventHandler + 'static) {
        self.event_handler = Some(Box::new(handler));
    }

    pub fn has_event_handler(&self) -> bool {
        self.event_handler.is_some()
    }

    pub fn add_component(&mut self, component: ComponentHandle) {
        let id = {
            let c = read(&component);
            log::debug!("registered {} '{}' ({})", c.kind(), c.name(), c.id());
            c.id().to_string()
        };
        self.component_index.insert(id, Arc::clone(&component));
        self.components.push(component);
    }

    pub fn components(&self) -> &[ComponentHandle] {
        &self.components
    }

    pub fn component(&self, id: &str) -> Option<ComponentHandle> {
        self.component_index.get(id).cloned()
    }

    /// FIFO, no deduplication.
    pub fn queue_event(&mut self, event: Event) -> EventId {
        self.events.push(event)
    }

    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.events.get(id)
    }

    pub fn active_events(&self) -> &[Event] {
        self.events.active()
    }

    pub fn inactive_events(&self) -> &[Event] {
        self.events.inactive()
    }

    pub fn last_report(&self) -> Option<&TickReport> {
        self.last_report.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub(crate) fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Context for driving a single component by hand, outside the tick loop.
    pub fn tick_context(&mut self) -> TickContext<'_> {
        TickContext {
            tick: self.clock.ticks(),
            now: self.clock.sim_now(),
            environment: &self.environment,
            events: &mut self.events,
        }
    }

    /// Refused while a background run owns the simulator.
    pub fn run(&mut self, ticks: u64) {
        if self.running {
            log::warn!("'{}' is running in the background, {} ticks ignored", self.name, ticks);
            return;
        }
        self.run_ticks(ticks);
    }

    pub(crate) fn run_ticks(&mut self, ticks: u64) {
        for _ in 0..ticks {
            let report = self.advance();
            self.last_report = Some(report);
        }
    }

    pub fn step(&mut self) {
        self.run(1);
    }

    pub fn run_for_a_bit(&mut self, days: u64, hours: u64, minutes: u64, seconds: u64) {
        self.run(clock::ticks_for(days, hours, minutes, seconds));
    }

    fn advance(&mut self) -> TickReport {
        self.clock.tick();
        let tick = self.clock.ticks();
        let now = self.clock.sim_now();

        self.events.progress_due(now);

        let mut statuses = Vec::with_capacity(self.components.len());
        let mut errors = Vec::new();
        for handle in &self.components {
            let mut component = write(handle);
            let mut ctx = TickContext {
                tick,
                now,
                environment: &self.environment,
                events: &mut self.events,
            };
            match component.update(&mut ctx) {
                Ok(status) => statuses.push(status),
                Err(error) => {
                    log::warn!("tick {}: {} '{}' skipped: {}", tick, component.kind(), component.name(), error);
                    errors.push(ComponentFailure {
                        component_id: component.id().to_string(),
                        component_name: component.name().to_string(),
                        error,
                    });
                }
            }
        }

        if let Some(handler) = self.event_handler.as_mut() {
            for event in self.events.active_mut().iter_mut() {
                if event.is_pending() && event.is_due(now) {
                    handler.process_event(event);
                    log::debug!("{} after handler: {}", event.code(), event.status());
                }
            }
        }

        self.events.tidy_up();

        TickReport {
            tick,
            now,
            statuses,
            errors,
        }
    }

    pub fn status(&self) -> SimulatorStatus {
        SimulatorStatus {
            id: self.id.clone(),
            name: self.name.clone(),
            purpose: self.purpose.clone(),
            created_at: self.created_at,
            sim_time: self.clock.sim_now(),
            ticks: self.clock.ticks(),
            running: self.running,
            environment: self.environment.clone(),
            components: self.components.iter().map(|c| read(c).status()).collect(),
            active_events: self.events.active().iter().map(Event::snapshot).collect(),
            inactive_event_count: self.events.inactive().len(),
        }
    }

    /// Runs one update of a single component against the current moment,
    /// outside the regular tick. Useful for checking preconditions.
    pub fn update_component(&mut self, handle: &ComponentHandle) -> Result<ComponentStatus> {
        let mut ctx = self.tick_context();
        let mut component = write(handle);
        component.update(&mut ctx)
    }
}

impl std::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("ticks", &self.clock.ticks())
            .field("components", &self.components.len())
            .field("active_events", &self.events.active().len())
            .finish()
    }
}
