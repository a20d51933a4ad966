use crate::common::{init_logging, start_moment};
use pwrsim_core::traits::read;
use pwrsim_core::*;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

fn plant() -> PwrPlant {
    init_logging();
    PwrPlant::new("Background", "Keep it turning").with_clock(SimClock::new(start_moment()))
}

#[test]
fn test_background_run_completes_requested_ticks() {
    let plant = plant();
    let core = plant.handles().reactor_core.clone();
    let mut runner = SimulationRunner::new(plant.into_simulator());

    assert!(runner.start(25));
    assert_eq!(runner.join(), Some(25));
    assert!(!runner.is_running());

    let sim = runner.simulator();
    let sim = sim.lock().unwrap();
    assert_eq!(sim.clock().ticks(), 25);
    assert!(!sim.is_running());
    assert_eq!(read(&core).fuel_age(), 25);
}

#[test]
fn test_cancel_stops_before_the_next_tick() {
    let mut runner = SimulationRunner::new(plant().into_simulator());
    let requested = 50_000_000;

    assert!(runner.start(requested));
    assert!(runner.is_running());
    assert!(!runner.start(10), "second start while running");
    assert!(runner.simulator().lock().unwrap().is_running());

    thread::sleep(Duration::from_millis(20));
    runner.cancel();
    let completed = runner.join().unwrap();

    assert!(completed < requested);
    let sim = runner.simulator();
    let sim = sim.lock().unwrap();
    assert_eq!(sim.clock().ticks(), completed);
    assert!(!sim.is_running());
    assert!(!sim.status().running);
}

#[test]
fn test_runner_can_be_restarted() {
    let shared = Arc::new(Mutex::new(plant().into_simulator()));
    let mut runner = SimulationRunner::from_shared(Arc::clone(&shared));

    assert!(runner.start(5));
    assert_eq!(runner.join(), Some(5));
    assert!(runner.start(7));
    assert_eq!(runner.join(), Some(7));
    assert_eq!(runner.join(), None);

    assert_eq!(shared.lock().unwrap().clock().ticks(), 12);
}

#[test]
fn test_runners_sharing_a_simulator_take_turns() {
    let shared = Arc::new(Mutex::new(plant().into_simulator()));
    let mut first = SimulationRunner::from_shared(Arc::clone(&shared));
    let mut second = SimulationRunner::from_shared(Arc::clone(&shared));

    assert!(first.start(50_000_000));
    assert!(!second.start(10), "simulator already driven by the first runner");
    assert!(!second.is_running());
    assert_eq!(second.join(), None);

    first.cancel();
    let completed = first.join().unwrap();
    assert_eq!(shared.lock().unwrap().clock().ticks(), completed);

    // free again once the first run is over
    assert!(second.start(3));
    assert_eq!(second.join(), Some(3));
    assert_eq!(shared.lock().unwrap().clock().ticks(), completed + 3);
}

#[test]
fn test_foreground_run_refused_during_background_run() {
    let shared = Arc::new(Mutex::new(plant().into_simulator()));
    let mut runner = SimulationRunner::from_shared(Arc::clone(&shared));
    assert!(runner.start(50_000_000));

    {
        let mut sim = shared.lock().unwrap();
        let before = sim.clock().ticks();
        sim.run(100);
        sim.step();
        sim.run_for_a_bit(0, 0, 1, 0);
        assert_eq!(sim.clock().ticks(), before);
    }

    runner.cancel();
    let completed = runner.join().unwrap();

    let mut sim = shared.lock().unwrap();
    assert_eq!(sim.clock().ticks(), completed);
    sim.run(100);
    assert_eq!(sim.clock().ticks(), completed + 100);
}

/// Shares a generator's identity and snapshot but dies on its first update.
struct SeizedGenerator {
    generator: components::Generator,
}

impl Component for SeizedGenerator {
    fn info(&self) -> &ComponentInfo {
        self.generator.info()
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Generator
    }

    fn status(&self) -> ComponentStatus {
        self.generator.status()
    }

    fn update(&mut self, _ctx: &mut TickContext<'_>) -> pwrsim_core::Result<ComponentStatus> {
        panic!("bearing seized");
    }
}

#[test]
fn test_running_flag_cleared_when_a_component_panics() {
    init_logging();
    let mut sim = Simulator::new("Bench", "seized shaft").with_clock(SimClock::new(start_moment()));
    sim.add_component(traits::shared(SeizedGenerator {
        generator: components::Generator::default(),
    }));
    let mut runner = SimulationRunner::new(sim);

    assert!(runner.start(10));
    assert_eq!(runner.join(), None);

    let shared = runner.simulator();
    {
        let sim = shared.lock().unwrap_or_else(PoisonError::into_inner);
        assert!(!sim.is_running());
        assert!(!sim.status().running);
    }

    // a panicked run does not lock the simulator out of later runs
    assert!(runner.start(1));
    assert_eq!(runner.join(), None);
}
