use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of an event. Transitions only ever move forward:
/// `Pending -> InProgress -> {Completed | Canceled}`, skipping allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Pending,
    InProgress,
    Completed,
    Canceled,
}

impl EventStatus {
    fn rank(self) -> u8 {
        match self {
            EventStatus::Pending => 0,
            EventStatus::InProgress => 1,
            EventStatus::Completed | EventStatus::Canceled => 2,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.rank() == 2
    }

    pub fn can_transition_to(self, next: EventStatus) -> bool {
        (self == next && !self.is_terminal()) || next.rank() > self.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::Pending => "pending",
            EventStatus::InProgress => "in_progress",
            EventStatus::Completed => "completed",
            EventStatus::Canceled => "canceled",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A schedulable unit of change addressed by a namespaced code.
///
/// Immediate events are applied in full during the tick they become due.
/// Gradual (adjustment) events move a quantity toward `target_value` over
/// several ticks. Booleans travel as `0.0` / `1.0` in `target_value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    id: Option<EventId>,
    code: String,
    status: EventStatus,
    immediate: bool,
    start_moment: Option<DateTime<Utc>>,
    duration: Duration,
    target_value: f64,
    from_value: Option<f64>,
}

impl Event {
    fn new(code: impl Into<String>, immediate: bool, target_value: f64) -> Self {
        Self {
            id: None,
            code: code.into(),
            status: EventStatus::Pending,
            immediate,
            start_moment: None,
            duration: Duration::ZERO,
            target_value,
            from_value: None,
        }
    }

    pub fn immediate(code: impl Into<String>) -> Self {
        Self::new(code, true, 0.0)
    }

    pub fn immediate_bool(code: impl Into<String>, value: bool) -> Self {
        Self::new(code, true, if value { 1.0 } else { 0.0 })
    }

    pub fn adjustment(code: impl Into<String>, target_value: f64) -> Self {
        Self::new(code, false, target_value)
    }

    pub fn schedule_at(mut self, moment: DateTime<Utc>) -> Self {
        self.start_moment = Some(moment);
        self
    }

    /// No effect on immediate events; they always finish within one tick.
    pub fn for_duration(mut self, duration: Duration) -> Self {
        if !self.immediate {
            self.duration = duration;
        }
        self
    }

    pub fn from_value(mut self, value: f64) -> Self {
        self.from_value = Some(value);
        self
    }

    /// Notes where a gradual change started. The first value sticks, so a
    /// caller-provided `from_value` is kept.
    pub fn record_origin(&mut self, value: f64) {
        if self.from_value.is_none() {
            self.from_value = Some(value);
        }
    }

    pub fn id(&self) -> Option<EventId> {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: EventId) {
        self.id = Some(id);
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn status(&self) -> EventStatus {
        self.status
    }

    pub fn is_immediate(&self) -> bool {
        self.immediate
    }

    pub fn start_moment(&self) -> Option<DateTime<Utc>> {
        self.start_moment
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn end_moment(&self) -> Option<DateTime<Utc>> {
        let duration = chrono::Duration::from_std(self.duration).ok()?;
        self.start_moment.map(|start| start + duration)
    }

    pub fn target_value(&self) -> f64 {
        self.target_value
    }

    pub fn original_value(&self) -> Option<f64> {
        self.from_value
    }

    pub fn truthy(&self) -> bool {
        self.target_value != 0.0
    }

    pub fn is_scheduled(&self) -> bool {
        self.start_moment.is_some()
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.start_moment {
            None => true,
            Some(start) => now >= start,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == EventStatus::Pending
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == EventStatus::InProgress
    }

    pub fn is_complete(&self) -> bool {
        self.status == EventStatus::Completed
    }

    pub fn is_canceled(&self) -> bool {
        self.status == EventStatus::Canceled
    }

    pub fn transition(&mut self, next: EventStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(SimError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    fn apply(&mut self, next: EventStatus) -> bool {
        match self.transition(next) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("{} {}: {}", self.code, self.label(), err);
                false
            }
        }
    }

    pub fn set_pending(&mut self) -> bool {
        self.apply(EventStatus::Pending)
    }

    pub fn set_in_progress(&mut self) -> bool {
        self.apply(EventStatus::InProgress)
    }

    pub fn set_complete(&mut self) -> bool {
        self.apply(EventStatus::Completed)
    }

    pub fn set_canceled(&mut self) -> bool {
        self.apply(EventStatus::Canceled)
    }

    fn label(&self) -> String {
        self.id.map(|id| id.to_string()).unwrap_or_else(|| "(unqueued)".into())
    }

    pub fn snapshot(&self) -> EventSnapshot {
        EventSnapshot {
            id: self.id,
            code: self.code.clone(),
            status: self.status,
            immediate: self.immediate,
            target_value: self.target_value,
            from_value: self.from_value,
            start_moment: self.start_moment,
            duration_secs: (!self.duration.is_zero()).then(|| self.duration.as_secs_f64()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSnapshot {
    pub id: Option<EventId>,
    pub code: String,
    pub status: EventStatus,
    pub immediate: bool,
    pub target_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_moment: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
}

/// Active events in FIFO order plus the archive of finished ones.
#[derive(Debug, Default)]
pub struct EventQueue {
    active: Vec<Event>,
    inactive: Vec<Event>,
    next_id: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mut event: Event) -> EventId {
        self.next_id += 1;
        let id = EventId(self.next_id);
        event.assign_id(id);
        log::debug!("queued {} {}", event.code(), id);
        self.active.push(event);
        id
    }

    pub fn active(&self) -> &[Event] {
        &self.active
    }

    pub fn inactive(&self) -> &[Event] {
        &self.inactive
    }

    pub(crate) fn active_mut(&mut self) -> &mut [Event] {
        &mut self.active
    }

    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.active
            .iter()
            .chain(self.inactive.iter())
            .find(|e| e.id() == Some(id))
    }

    /// Moves pending events that are due to in-progress.
    pub fn progress_due(&mut self, now: DateTime<Utc>) -> usize {
        let mut promoted = 0;
        for event in self.active.iter_mut() {
            if event.is_pending() && event.is_due(now) && event.set_in_progress() {
                log::debug!("{} {} now in progress", event.code(), event.label());
                promoted += 1;
            }
        }
        promoted
    }

    /// Archives completed and canceled events, keeping relative order.
    pub fn tidy_up(&mut self) -> usize {
        let (finished, still_active): (Vec<Event>, Vec<Event>) = self
            .active
            .drain(..)
            .partition(|e| e.status().is_terminal());
        let archived = finished.len();
        self.active = still_active;
        self.inactive.extend(finished);
        archived
    }
}
