use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use crate::engine::Simulator;

fn lock(simulator: &Mutex<Simulator>) -> MutexGuard<'_, Simulator> {
    simulator.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the simulator's running flag when the run ends, including by
/// a panicking component.
struct RunningFlag(Arc<Mutex<Simulator>>);

impl Drop for RunningFlag {
    fn drop(&mut self) {
        lock(&self.0).set_running(false);
    }
}

/// Runs a simulator on a background thread, one tick at a time, until the
/// requested number of ticks is done or the run is canceled.
pub struct SimulationRunner {
    simulator: Arc<Mutex<Simulator>>,
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<u64>>,
}

impl SimulationRunner {
    pub fn new(simulator: Simulator) -> Self {
        Self::from_shared(Arc::new(Mutex::new(simulator)))
    }

    pub fn from_shared(simulator: Arc<Mutex<Simulator>>) -> Self {
        Self {
            simulator,
            stop: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    pub fn simulator(&self) -> Arc<Mutex<Simulator>> {
        Arc::clone(&self.simulator)
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Returns false, and does nothing, while any run is active on the
    /// simulator, whether started here or by another runner sharing it.
    pub fn start(&mut self, ticks: u64) -> bool {
        if self.is_running() {
            log::warn!("simulation already running, start ignored");
            return false;
        }
        // reap a finished run nobody joined
        if let Some(finished) = self.handle.take() {
            let _ = finished.join();
        }

        {
            let mut simulator = lock(&self.simulator);
            if simulator.is_running() {
                log::warn!("'{}' is driven by another runner, start ignored", simulator.name());
                return false;
            }
            simulator.set_running(true);
        }

        self.stop.store(false, Ordering::SeqCst);
        let simulator = Arc::clone(&self.simulator);
        let stop = Arc::clone(&self.stop);
        self.handle = Some(thread::spawn(move || {
            let _flag = RunningFlag(Arc::clone(&simulator));
            log::info!("background run started for {} ticks", ticks);
            let mut completed = 0;
            while completed < ticks {
                if stop.load(Ordering::Relaxed) {
                    log::info!("background run canceled after {} ticks", completed);
                    break;
                }
                lock(&simulator).run_ticks(1);
                completed += 1;
            }
            log::info!("background run finished, {} ticks completed", completed);
            completed
        }));
        true
    }

    /// Takes effect before the next tick; the tick in flight finishes.
    pub fn cancel(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Waits for the current run and returns how many ticks it completed.
    /// `None` when nothing was started or the run panicked.
    pub fn join(&mut self) -> Option<u64> {
        self.handle.take()?.join().ok()
    }
}

impl Drop for SimulationRunner {
    fn drop(&mut self) {
        self.cancel();
        let _ = self.join();
    }
}
