use std::fmt;
use std::sync::Arc;

use crate::commands;
use crate::config::PlantConfig;
use crate::engine::TickContext;
use crate::error::{Result, SimError};
use crate::event::Event;
use crate::snapshot::{ComponentStatus, ControlRodsStatus};
use crate::traits::{Component, ComponentInfo, ComponentKind};

use super::control_bank::ControlBank;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankGroup {
    /// Full-strength absorbers for power control.
    Control,
    /// Weaker absorbers for load following and fine reactivity trim.
    Gray,
    /// Full-strength absorbers that move together to shut the core down.
    Shutdown,
}

impl BankGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            BankGroup::Control => "control",
            BankGroup::Gray => "gray",
            BankGroup::Shutdown => "shutdown",
        }
    }
}

impl fmt::Display for BankGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownMotion {
    Withdrawing,
    Inserting,
}

/// The rod control system. Models the banks that orchestrate rod
/// assemblies rather than the assemblies themselves.
pub struct ControlRods {
    info: ComponentInfo,
    config: Arc<PlantConfig>,
    control_banks: [ControlBank; 4],
    gray_banks: [ControlBank; 2],
    shutdown_banks: [ControlBank; 4],
    shutdown_motion: Option<ShutdownMotion>,
}

impl ControlRods {
    pub fn new(name: &str, description: &str) -> Self {
        Self::build(ComponentInfo::new(name, description), Arc::new(PlantConfig::default()))
    }

    pub fn with_config(self, config: Arc<PlantConfig>) -> Self {
        Self::build(self.info, config)
    }

    fn build(info: ComponentInfo, config: Arc<PlantConfig>) -> Self {
        let max = config.control_rods.max_withdrawal_steps;
        Self {
            info,
            control_banks: [
                ControlBank::new("MA1", 4, max),
                ControlBank::new("MA2", 4, max),
                ControlBank::new("MB1", 4, max),
                ControlBank::new("MB2", 4, max),
            ],
            gray_banks: [ControlBank::new("GR1", 8, max), ControlBank::new("GR2", 8, max)],
            shutdown_banks: [
                ControlBank::new("SD1", 8, max),
                ControlBank::new("SD2", 8, max),
                ControlBank::new("SD3", 8, max),
                ControlBank::new("SD4", 8, max),
            ],
            shutdown_motion: None,
            config,
        }
    }

    fn rate(&self) -> u32 {
        self.config.control_rods.withdrawal_rate
    }

    pub fn max_withdrawal_steps(&self) -> u32 {
        self.config.control_rods.max_withdrawal_steps
    }

    pub fn banks(&self, group: BankGroup) -> &[ControlBank] {
        match group {
            BankGroup::Control => &self.control_banks,
            BankGroup::Gray => &self.gray_banks,
            BankGroup::Shutdown => &self.shutdown_banks,
        }
    }

    fn banks_mut(&mut self, group: BankGroup) -> &mut [ControlBank] {
        match group {
            BankGroup::Control => &mut self.control_banks,
            BankGroup::Gray => &mut self.gray_banks,
            BankGroup::Shutdown => &mut self.shutdown_banks,
        }
    }

    pub fn bank(&self, group: BankGroup, index: usize) -> Result<&ControlBank> {
        self.banks(group).get(index).ok_or_else(|| SimError::InvalidBankIndex {
            group: group.to_string(),
            index,
        })
    }

    pub fn shutdown_motion(&self) -> Option<ShutdownMotion> {
        self.shutdown_motion
    }

    fn validate_target(&self, target: i64) -> Result<u32> {
        let max = self.max_withdrawal_steps();
        if target < 0 || target > i64::from(max) {
            return Err(SimError::InvalidRodPosition { target, max });
        }
        Ok(target as u32)
    }

    /// Gives one bank a standing target it moves toward a step per tick.
    pub fn set_bank_target(&mut self, group: BankGroup, index: usize, target: i64) -> Result<()> {
        let target = self.validate_target(target)?;
        let bank = self
            .banks_mut(group)
            .get_mut(index)
            .ok_or_else(|| SimError::InvalidBankIndex {
                group: group.to_string(),
                index,
            })?;
        bank.set_target(target);
        Ok(())
    }

    pub fn withdraw_shutdown_banks(&mut self) {
        if self.shutdown_banks[0].is_fully_withdrawn() {
            return;
        }
        let rate = self.rate();
        for bank in self.shutdown_banks.iter_mut() {
            bank.raise_position(rate);
        }
    }

    pub fn insert_shutdown_banks(&mut self) {
        if self.shutdown_banks[0].is_fully_inserted() {
            return;
        }
        let rate = self.rate();
        for bank in self.shutdown_banks.iter_mut() {
            bank.lower_position(rate);
        }
    }

    pub fn shutdown_banks_fully_withdrawn(&self) -> bool {
        self.shutdown_banks.iter().all(ControlBank::is_fully_withdrawn)
    }

    pub fn shutdown_banks_fully_inserted(&self) -> bool {
        self.shutdown_banks.iter().all(ControlBank::is_fully_inserted)
    }

    fn adjust_group(&mut self, group: BankGroup, target: i64) -> Result<bool> {
        let target = self.validate_target(target)?;
        let rate = self.rate();
        let mut reached = true;
        for bank in self.banks_mut(group) {
            reached &= bank.move_toward(target, rate);
        }
        Ok(reached)
    }

    /// One rate-limited step of every control bank toward `target`.
    pub fn adjust_control_banks(&mut self, target: i64) -> Result<bool> {
        self.adjust_group(BankGroup::Control, target)
    }

    pub fn adjust_gray_banks(&mut self, target: i64) -> Result<bool> {
        self.adjust_group(BankGroup::Gray, target)
    }

    /// Withdrawn fraction of the lead control bank; the control banks
    /// move in lockstep under normal operation.
    pub fn average_control_rod_extraction(&self) -> f64 {
        f64::from(self.control_banks[0].position()) / f64::from(self.max_withdrawal_steps())
    }

    pub fn scram(&mut self) {
        for bank in self
            .control_banks
            .iter_mut()
            .chain(self.gray_banks.iter_mut())
            .chain(self.shutdown_banks.iter_mut())
        {
            bank.scram();
        }
        self.shutdown_motion = None;
        log::info!("{}: SCRAM, all banks fully inserted", self.info.name());
    }

    fn group_at(&self, group: BankGroup, target: u32) -> bool {
        self.banks(group).iter().all(|b| b.position() == target)
    }

    fn target_group(code: &str) -> Option<BankGroup> {
        match code {
            commands::CONTROL_BANKS_TARGET => Some(BankGroup::Control),
            commands::GRAY_BANKS_TARGET => Some(BankGroup::Gray),
            _ => None,
        }
    }

    fn process_events(&mut self, mut events: Vec<&mut Event>) {
        let scrammed = events.iter().any(|e| e.code() == commands::SCRAM);
        if scrammed {
            self.scram();
        }

        for i in 0..events.len() {
            let code = events[i].code().to_string();
            match code.as_str() {
                commands::SCRAM => {
                    events[i].set_complete();
                }
                commands::SHUTDOWN_BANKS_WITHDRAW => {
                    if !scrammed {
                        self.start_shutdown_motion(events[i].truthy());
                    }
                    events[i].set_complete();
                }
                _ => {
                    let Some(group) = Self::target_group(&code) else {
                        continue;
                    };
                    if scrammed {
                        events[i].set_canceled();
                        continue;
                    }
                    let superseded = events[i + 1..].iter().any(|later| later.code() == code);
                    if superseded {
                        log::debug!("{}: {} target superseded by a later command", self.info.name(), group);
                        events[i].set_canceled();
                        continue;
                    }
                    match self.validate_target(events[i].target_value().round() as i64) {
                        Ok(target) => {
                            events[i].record_origin(f64::from(self.banks(group)[0].position()));
                            for bank in self.banks_mut(group) {
                                bank.set_target(target);
                            }
                        }
                        Err(err) => {
                            log::warn!("{}: {}", self.info.name(), err);
                            events[i].set_canceled();
                        }
                    }
                }
            }
        }

        self.advance_banks();

        for event in events.iter_mut().filter(|e| e.is_in_progress()) {
            if let Some(group) = Self::target_group(event.code()) {
                let target = event.target_value().round() as u32;
                if self.group_at(group, target) {
                    log::info!("{}: {} banks reached step {}", self.info.name(), group, target);
                    event.set_complete();
                }
            }
        }
    }

    fn start_shutdown_motion(&mut self, withdraw: bool) {
        for bank in self.shutdown_banks.iter_mut() {
            bank.clear_target();
        }
        self.shutdown_motion = Some(if withdraw {
            ShutdownMotion::Withdrawing
        } else {
            ShutdownMotion::Inserting
        });
    }

    fn advance_banks(&mut self) {
        let rate = self.rate();
        for bank in self
            .control_banks
            .iter_mut()
            .chain(self.gray_banks.iter_mut())
            .chain(self.shutdown_banks.iter_mut())
        {
            bank.advance(rate);
        }

        match self.shutdown_motion {
            Some(ShutdownMotion::Withdrawing) => {
                self.withdraw_shutdown_banks();
                if self.shutdown_banks_fully_withdrawn() {
                    self.shutdown_motion = None;
                }
            }
            Some(ShutdownMotion::Inserting) => {
                self.insert_shutdown_banks();
                if self.shutdown_banks_fully_inserted() {
                    self.shutdown_motion = None;
                }
            }
            None => {}
        }
    }
}

impl Default for ControlRods {
    fn default() -> Self {
        Self::new("CR1", "Control, gray and shutdown rod banks regulating core reactivity.")
    }
}

impl Component for ControlRods {
    fn info(&self) -> &ComponentInfo {
        &self.info
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::ControlRods
    }

    fn status(&self) -> ComponentStatus {
        ComponentStatus::ControlRods(ControlRodsStatus {
            about: self.info.about(),
            control_banks: self.control_banks.iter().map(ControlBank::status).collect(),
            gray_banks: self.gray_banks.iter().map(ControlBank::status).collect(),
            shutdown_banks: self.shutdown_banks.iter().map(ControlBank::status).collect(),
            average_control_rod_extraction: self.average_control_rod_extraction(),
            shutdown_motion: self.shutdown_motion.map(|m| match m {
                ShutdownMotion::Withdrawing => "withdrawing",
                ShutdownMotion::Inserting => "inserting",
            }),
        })
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) -> Result<ComponentStatus> {
        self.info.touch(ctx.now());
        let events: Vec<&mut Event> = ctx.in_progress_mut().collect();
        self.process_events(events);
        Ok(self.status())
    }
}
