use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::clock::SimClock;
use crate::commands;
use crate::components::{
    Condenser, ControlRods, Generator, Pressurizer, PrimaryLoop, ReactorCore, SecondaryLoop,
    SteamGenerator, SteamTurbine,
};
use crate::config::PlantConfig;
use crate::engine::Simulator;
use crate::event::{Event, EventId};
use crate::snapshot::PlantStatus;
use crate::traits::{shared, EventHandler, Shared};

const PLANT_PURPOSE: &str = "Emulate a Pressurized Water Reactor. This is for demonstration and \
    entertainment purposes and is not suitable for running a real PWR.";

#[derive(Debug, Default)]
struct VentCounts {
    relief: AtomicU64,
    mssv: AtomicU64,
}

/// Completes the venting notifications the pressurizer and secondary loop
/// raise, and keeps a tally of them. Clones share the tally.
#[derive(Debug, Clone, Default)]
pub struct PlantEventHandler {
    counts: Arc<VentCounts>,
}

impl PlantEventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn relief_vents(&self) -> u64 {
        self.counts.relief.load(Ordering::Relaxed)
    }

    pub fn mssv_vents(&self) -> u64 {
        self.counts.mssv.load(Ordering::Relaxed)
    }
}

impl EventHandler for PlantEventHandler {
    fn process_event(&mut self, event: &mut Event) {
        match event.code() {
            commands::RELIEF_VALVE_VENT => {
                log::warn!("pressurizer relief valve triggered and venting");
                self.counts.relief.fetch_add(1, Ordering::Relaxed);
                event.set_complete();
            }
            commands::EMERGENCY_MSSV_RELEASED => {
                log::warn!("emergency MSSV released and venting");
                self.counts.mssv.fetch_add(1, Ordering::Relaxed);
                event.set_complete();
            }
            other => log::debug!("event code not handled: {}", other),
        }
    }
}

/// Typed handles to every component of the standard plant.
#[derive(Clone)]
pub struct PlantHandles {
    pub primary_loop: Shared<PrimaryLoop>,
    pub control_rods: Shared<ControlRods>,
    pub reactor_core: Shared<ReactorCore>,
    pub pressurizer: Shared<Pressurizer>,
    pub secondary_loop: Shared<SecondaryLoop>,
    pub steam_generator: Shared<SteamGenerator>,
    pub steam_turbine: Shared<SteamTurbine>,
    pub generator: Shared<Generator>,
    pub condenser: Shared<Condenser>,
}

impl PlantHandles {
    fn build(config: &Arc<PlantConfig>) -> Self {
        let primary_loop = shared(PrimaryLoop::default().with_config(Arc::clone(config)));
        let control_rods = shared(ControlRods::default().with_config(Arc::clone(config)));
        let reactor_core = shared(
            ReactorCore::default()
                .with_config(Arc::clone(config))
                .with_primary_loop(Arc::clone(&primary_loop))
                .with_control_rods(Arc::clone(&control_rods)),
        );
        let pressurizer = shared(
            Pressurizer::default()
                .with_config(Arc::clone(config))
                .with_primary_loop(Arc::clone(&primary_loop)),
        );
        let secondary_loop = shared(SecondaryLoop::default().with_config(Arc::clone(config)));
        let steam_generator = shared(
            SteamGenerator::default()
                .with_config(Arc::clone(config))
                .with_primary_loop(Arc::clone(&primary_loop))
                .with_secondary_loop(Arc::clone(&secondary_loop)),
        );
        let steam_turbine = shared(
            SteamTurbine::default()
                .with_config(Arc::clone(config))
                .with_secondary_loop(Arc::clone(&secondary_loop)),
        );
        let generator = shared(
            Generator::default()
                .with_config(Arc::clone(config))
                .with_steam_turbine(Arc::clone(&steam_turbine)),
        );
        let condenser = shared(
            Condenser::default()
                .with_config(Arc::clone(config))
                .with_steam_turbine(Arc::clone(&steam_turbine)),
        );

        Self {
            primary_loop,
            control_rods,
            reactor_core,
            pressurizer,
            secondary_loop,
            steam_generator,
            steam_turbine,
            generator,
            condenser,
        }
    }

    /// Registration order is the physical dependency order: every
    /// component is updated after the siblings it reads.
    fn register(&self, simulator: &mut Simulator) {
        simulator.add_component(self.primary_loop.clone());
        simulator.add_component(self.control_rods.clone());
        simulator.add_component(self.reactor_core.clone());
        simulator.add_component(self.pressurizer.clone());
        simulator.add_component(self.secondary_loop.clone());
        simulator.add_component(self.steam_generator.clone());
        simulator.add_component(self.steam_turbine.clone());
        simulator.add_component(self.generator.clone());
        simulator.add_component(self.condenser.clone());
    }
}

/// A simulator wired up with the standard PWR component set.
pub struct PwrPlant {
    simulator: Simulator,
    motto: String,
    config: Arc<PlantConfig>,
    handler: PlantEventHandler,
    handles: PlantHandles,
}

impl PwrPlant {
    pub fn new(name: &str, motto: &str) -> Self {
        Self::with_config(name, motto, PlantConfig::default())
    }

    pub fn with_config(name: &str, motto: &str, config: PlantConfig) -> Self {
        let config = Arc::new(config);
        let mut simulator = Simulator::new(name, PLANT_PURPOSE);
        let handles = PlantHandles::build(&config);
        handles.register(&mut simulator);

        let handler = PlantEventHandler::new();
        simulator.set_event_handler(handler.clone());
        log::info!("{} ({}) assembled with {} components", name, simulator.id(), simulator.components().len());

        Self {
            simulator,
            motto: motto.to_string(),
            config,
            handler,
            handles,
        }
    }

    pub fn with_clock(mut self, clock: SimClock) -> Self {
        self.simulator = self.simulator.with_clock(clock);
        self
    }

    pub fn motto(&self) -> &str {
        &self.motto
    }

    pub fn config(&self) -> &PlantConfig {
        &self.config
    }

    pub fn handles(&self) -> &PlantHandles {
        &self.handles
    }

    pub fn event_handler(&self) -> &PlantEventHandler {
        &self.handler
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    pub fn simulator_mut(&mut self) -> &mut Simulator {
        &mut self.simulator
    }

    /// Hands the simulator over, e.g. to a background runner. Component
    /// handles obtained earlier stay valid.
    pub fn into_simulator(self) -> Simulator {
        self.simulator
    }

    pub fn queue_event(&mut self, event: Event) -> EventId {
        self.simulator.queue_event(event)
    }

    pub fn step(&mut self) {
        self.simulator.step();
    }

    pub fn run(&mut self, ticks: u64) {
        self.simulator.run(ticks);
    }

    pub fn run_for_a_bit(&mut self, days: u64, hours: u64, minutes: u64, seconds: u64) {
        self.simulator.run_for_a_bit(days, hours, minutes, seconds);
    }

    pub fn status(&self) -> PlantStatus {
        PlantStatus {
            motto: self.motto.clone(),
            sim_time: self.simulator.current_moment(),
            relief_vents: self.handler.relief_vents(),
            mssv_vents: self.handler.mssv_vents(),
            simulator: self.simulator.status(),
        }
    }
}
