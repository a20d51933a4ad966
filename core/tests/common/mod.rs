use chrono::{DateTime, TimeZone, Utc};
use pwrsim_core::traits::write;
use pwrsim_core::*;

pub fn start_moment() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 8, 0, 0).unwrap()
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct TestHarness {
    pub plant: PwrPlant,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(PlantConfig::default())
    }

    pub fn with_config(config: PlantConfig) -> Self {
        init_logging();
        let plant = PwrPlant::with_config("Test Plant", "Safety first", config)
            .with_clock(SimClock::new(start_moment()));
        Self { plant }
    }

    pub fn handles(&self) -> PlantHandles {
        self.plant.handles().clone()
    }

    pub fn queue(&mut self, event: Event) -> EventId {
        self.plant.queue_event(event)
    }

    pub fn run_for(&mut self, ticks: u64) {
        self.plant.run(ticks);
    }

    pub fn step(&mut self) {
        self.plant.step();
    }

    pub fn status_of(&self, id: EventId) -> EventStatus {
        self.plant
            .simulator()
            .event(id)
            .map(|e| e.status())
            .expect("event was queued")
    }

    pub fn archived(&self, code: &str) -> Vec<Event> {
        self.plant
            .simulator()
            .inactive_events()
            .iter()
            .filter(|e| e.code() == code)
            .cloned()
            .collect()
    }

    pub fn last_errors(&self) -> Vec<SimError> {
        self.plant
            .simulator()
            .last_report()
            .map(|r| r.errors.iter().map(|f| f.error.clone()).collect())
            .unwrap_or_default()
    }

    /// Ramps feedwater to full flow at 7 MPa steam, enough to spin the
    /// turbine to synchronous speed.
    pub fn bring_turbine_to_speed(&mut self) {
        let handles = self.handles();
        self.queue(commands::feedwater_pump_switch(true));
        write(&handles.secondary_loop).set_steam_pressure(7.0);
        self.run_for(30);
    }
}
