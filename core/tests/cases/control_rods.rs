use crate::common::TestHarness;
use approx::assert_relative_eq;
use pwrsim_core::components::{BankGroup, ControlRods, ShutdownMotion};
use pwrsim_core::traits::{read, write};
use pwrsim_core::*;

fn positions(rods: &ControlRods, group: BankGroup) -> Vec<u32> {
    rods.banks(group).iter().map(|b| b.position()).collect()
}

#[test]
fn test_control_banks_step_to_target() {
    let mut h = TestHarness::new();
    let rods = h.handles().control_rods;
    let id = h.queue(commands::control_banks_target(100));

    // 3 steps per tick, the last move is the 1-step remainder
    h.run_for(33);
    assert_eq!(positions(&read(&rods), BankGroup::Control), vec![99; 4]);
    assert_eq!(h.status_of(id), EventStatus::InProgress);

    h.step();
    assert_eq!(positions(&read(&rods), BankGroup::Control), vec![100; 4]);
    assert_eq!(h.status_of(id), EventStatus::Completed);
    assert_relative_eq!(read(&rods).average_control_rod_extraction(), 0.4);
    assert_eq!(positions(&read(&rods), BankGroup::Gray), vec![0; 2]);
}

#[test]
fn test_gray_banks_move_independently() {
    let mut h = TestHarness::new();
    let rods = h.handles().control_rods;
    let id = h.queue(commands::gray_banks_target(9));

    h.run_for(3);

    assert_eq!(positions(&read(&rods), BankGroup::Gray), vec![9; 2]);
    assert_eq!(positions(&read(&rods), BankGroup::Control), vec![0; 4]);
    assert_eq!(h.status_of(id), EventStatus::Completed);
}

#[test]
fn test_out_of_range_target_cancels_event() {
    let mut h = TestHarness::new();
    let rods = h.handles().control_rods;
    let too_far = h.queue(commands::control_banks_target(251));
    let negative = h.queue(commands::gray_banks_target(-1));

    h.step();

    assert_eq!(h.status_of(too_far), EventStatus::Canceled);
    assert_eq!(h.status_of(negative), EventStatus::Canceled);
    assert_eq!(positions(&read(&rods), BankGroup::Control), vec![0; 4]);
    assert_eq!(positions(&read(&rods), BankGroup::Gray), vec![0; 2]);
}

#[test]
fn test_later_target_supersedes_earlier() {
    let mut h = TestHarness::new();
    let rods = h.handles().control_rods;
    let first = h.queue(commands::control_banks_target(60));
    let second = h.queue(commands::control_banks_target(6));

    h.run_for(2);

    assert_eq!(h.status_of(first), EventStatus::Canceled);
    assert_eq!(h.status_of(second), EventStatus::Completed);
    assert_eq!(positions(&read(&rods), BankGroup::Control), vec![6; 4]);
}

#[test]
fn test_shutdown_banks_withdraw_then_insert() {
    let mut h = TestHarness::new();
    let rods = h.handles().control_rods;
    let id = h.queue(commands::withdraw_shutdown_banks(true));

    h.step();
    assert_eq!(h.status_of(id), EventStatus::Completed);
    assert_eq!(read(&rods).shutdown_motion(), Some(ShutdownMotion::Withdrawing));
    assert_eq!(positions(&read(&rods), BankGroup::Shutdown), vec![3; 4]);

    // 250 steps at 3 per tick
    h.run_for(83);
    assert!(read(&rods).shutdown_banks_fully_withdrawn());
    assert_eq!(read(&rods).shutdown_motion(), None);

    h.queue(commands::withdraw_shutdown_banks(false));
    h.run_for(84);
    assert!(read(&rods).shutdown_banks_fully_inserted());
}

#[test]
fn test_scram_drops_every_bank() {
    let mut h = TestHarness::new();
    let rods = h.handles().control_rods;
    h.queue(commands::control_banks_target(250));
    h.queue(commands::gray_banks_target(250));
    h.queue(commands::withdraw_shutdown_banks(true));
    h.run_for(20);

    let pending = h.queue(commands::control_banks_target(200));
    let scram = h.queue(commands::scram());
    h.step();

    let rods = read(&rods);
    for group in [BankGroup::Control, BankGroup::Gray, BankGroup::Shutdown] {
        assert!(rods.banks(group).iter().all(|b| b.is_fully_inserted()), "{}", group);
    }
    assert_eq!(rods.shutdown_motion(), None);
    assert_eq!(h.status_of(scram), EventStatus::Completed);
    assert_eq!(h.status_of(pending), EventStatus::Canceled);
}

#[test]
fn test_per_bank_targets() {
    let mut h = TestHarness::new();
    let rods = h.handles().control_rods;

    {
        let mut rods = write(&rods);
        rods.set_bank_target(BankGroup::Control, 2, 12).unwrap();
        assert!(matches!(
            rods.set_bank_target(BankGroup::Gray, 2, 12),
            Err(SimError::InvalidBankIndex { index: 2, .. })
        ));
        assert!(matches!(
            rods.set_bank_target(BankGroup::Shutdown, 0, 300),
            Err(SimError::InvalidRodPosition { target: 300, max: 250 })
        ));
        assert!(rods.bank(BankGroup::Shutdown, 4).is_err());
    }

    h.run_for(4);
    assert_eq!(positions(&read(&rods), BankGroup::Control), vec![0, 0, 12, 0]);
    assert_eq!(read(&rods).bank(BankGroup::Control, 2).unwrap().target(), None);
}

#[test]
fn test_bank_target_remembers_starting_position() {
    let mut h = TestHarness::new();
    let first = h.queue(commands::gray_banks_target(9));
    h.run_for(3);
    let second = h.queue(commands::gray_banks_target(3));
    h.run_for(2);

    assert_eq!(h.status_of(second), EventStatus::Completed);
    let origin = |id| h.plant.simulator().event(id).and_then(Event::original_value);
    assert_eq!(origin(first), Some(0.0));
    assert_eq!(origin(second), Some(9.0));
}
