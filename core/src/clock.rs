use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::{ONE_DAY_IN_SECONDS, ONE_HOUR_IN_SECONDS, ONE_MINUTE_IN_SECONDS};

/// Tick count for a wall-clock span. Saturates instead of overflowing.
pub fn ticks_for(days: u64, hours: u64, minutes: u64, seconds: u64) -> u64 {
    days.saturating_mul(ONE_DAY_IN_SECONDS)
        .saturating_add(hours.saturating_mul(ONE_HOUR_IN_SECONDS))
        .saturating_add(minutes.saturating_mul(ONE_MINUTE_IN_SECONDS))
        .saturating_add(seconds)
}

/// Simulated time source. One tick is one simulated second past `start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimClock {
    start: DateTime<Utc>,
    ticks: u64,
}

impl SimClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            start: start.trunc_subsecs(0),
            ticks: 0,
        }
    }

    /// The clock only goes forward, one tick at a time.
    pub fn tick(&mut self) {
        self.ticks += 1;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Pinned to the latest representable instant once the tick count
    /// runs past the calendar.
    pub fn sim_now(&self) -> DateTime<Utc> {
        i64::try_from(self.ticks)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|elapsed| self.start.checked_add_signed(elapsed))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn format_now(&self) -> String {
        self.sim_now().format("%d-%b-%Y %H:%M:%S").to_string()
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}
