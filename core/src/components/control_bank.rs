use crate::snapshot::ControlBankStatus;

/// A group of control rod assemblies driven as one unit.
///
/// Position is in withdrawal steps and always stays within
/// `0..=max_position`.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlBank {
    label: String,
    num_rods: u32,
    position: u32,
    max_position: u32,
    target: Option<u32>,
}

impl ControlBank {
    pub fn new(label: &str, num_rods: u32, max_position: u32) -> Self {
        Self {
            label: label.to_string(),
            num_rods,
            position: 0,
            max_position,
            target: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn num_rods(&self) -> u32 {
        self.num_rods
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn max_position(&self) -> u32 {
        self.max_position
    }

    pub fn target(&self) -> Option<u32> {
        self.target
    }

    pub fn raise_position(&mut self, steps: u32) {
        self.position = self.position.saturating_add(steps).min(self.max_position);
    }

    pub fn lower_position(&mut self, steps: u32) {
        self.position = self.position.saturating_sub(steps);
    }

    /// One rate-limited move toward `target`, never past it. Returns whether
    /// the bank now sits on the target.
    pub fn move_toward(&mut self, target: u32, rate: u32) -> bool {
        let target = target.min(self.max_position);
        if target > self.position {
            self.raise_position(rate.min(target - self.position));
        } else if target < self.position {
            self.lower_position(rate.min(self.position - target));
        }
        self.position == target
    }

    pub fn set_target(&mut self, target: u32) {
        self.target = Some(target.min(self.max_position));
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    /// Moves toward the standing target, if any, and drops it once reached.
    pub fn advance(&mut self, rate: u32) {
        if let Some(target) = self.target {
            if self.move_toward(target, rate) {
                self.target = None;
            }
        }
    }

    pub fn is_fully_withdrawn(&self) -> bool {
        self.position == self.max_position
    }

    pub fn is_fully_inserted(&self) -> bool {
        self.position == 0
    }

    /// Drops the bank to fully inserted, ignoring any rate limit.
    pub fn scram(&mut self) {
        self.position = 0;
        self.target = None;
    }

    pub fn status(&self) -> ControlBankStatus {
        ControlBankStatus {
            label: self.label.clone(),
            num_rods: self.num_rods,
            position: self.position,
        }
    }
}
