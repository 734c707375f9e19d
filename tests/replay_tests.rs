// Integration tests for replay navigation

use corewind::history::MarkerChange;
use corewind::stepper::{LifeStatus, ReplayEvent, Stepper};
use corewind::trace::{Move, ProcessId, Trace};
use rustc_hash::FxHashMap;

fn zeroed_trace(cells: usize, processes: usize, moves: Vec<Option<Move>>) -> Trace {
    Trace::new(
        vec!["0".to_string(); cells],
        processes,
        FxHashMap::default(),
        moves,
    )
    .expect("trace should be valid")
}

fn no_occupants() -> &'static [ProcessId] {
    &[]
}

#[test]
fn test_two_process_scenario() {
    let trace = zeroed_trace(
        4,
        2,
        vec![Some(Move::new(0, 2, 1, "5")), Some(Move::new(1, 3, 2, "7"))],
    );
    let mut stepper = Stepper::new(trace);

    // Starting ips sit one cell before the first reported ip
    assert_eq!(stepper.occupants(1), &[0]);
    assert_eq!(stepper.occupants(2), &[1]);
    assert!(stepper.is_at_start());

    stepper.step_forward();
    stepper.step_forward();

    assert_eq!(stepper.memory(), ["0", "5", "7", "0"]);
    assert_eq!(stepper.occupants(2), &[0]);
    assert_eq!(stepper.occupants(3), &[1]);
    assert_eq!(stepper.occupants(1), no_occupants());
    assert!(stepper.is_at_end());

    stepper.step_backward();
    assert_eq!(stepper.memory(), ["0", "5", "0", "0"]);
    assert_eq!(stepper.current_cursor(), 1);
    // Process 1 was on cell 2 before process 0 arrived
    assert_eq!(stepper.occupants(2), &[1, 0]);
    assert_eq!(stepper.marker(2), Some(0));
}

#[test]
fn test_boundaries_are_noops() {
    let trace = zeroed_trace(4, 1, vec![Some(Move::new(0, 1, 0, "1"))]);
    let mut stepper = Stepper::new(trace);

    assert!(stepper.step_backward().is_empty());
    assert_eq!(stepper.current_cursor(), 0);

    assert!(!stepper.step_forward().is_empty());
    assert!(stepper.is_at_end());
    assert!(stepper.step_forward().is_empty());
    assert_eq!(stepper.current_cursor(), 1);
}

#[test]
fn test_death_flips_life_without_touching_memory() {
    let moves = vec![
        Some(Move::new(0, 1, 3, "a")),
        Some(Move::new(1, 5, 6, "b")),
        Some(Move::new(0, 2, 3, "c")),
        None,
    ];
    let mut stepper = Stepper::new(zeroed_trace(8, 2, moves));
    stepper.advance_to(3);

    let memory_before: Vec<String> = stepper.memory().iter().map(|v| v.to_string()).collect();
    let occupancy_before: Vec<Vec<ProcessId>> =
        (0..8).map(|a| stepper.occupants(a).to_vec()).collect();

    let events = stepper.step_forward();
    assert_eq!(
        events,
        vec![ReplayEvent::LifeChanged {
            pid: 1,
            status: LifeStatus::Dead
        }]
    );
    assert_eq!(stepper.life_status(1), LifeStatus::Dead);
    assert_eq!(stepper.alive_count(), 1);
    assert_eq!(stepper.memory(), memory_before);
    for (address, occupants) in occupancy_before.iter().enumerate() {
        assert_eq!(stepper.occupants(address), occupants.as_slice());
    }

    stepper.step_backward();
    assert_eq!(stepper.life_status(1), LifeStatus::Alive);
    assert_eq!(stepper.current_cursor(), 3);
}

#[test]
fn test_skip_chain_collapses_repeated_dead_turns() {
    // Process 0 dies on turn 2 and keeps producing empty turns
    let moves = vec![
        Some(Move::new(0, 1, 0, "a0")),
        Some(Move::new(1, 5, 4, "b0")),
        None,
        Some(Move::new(1, 6, 5, "b1")),
        None,
        Some(Move::new(1, 7, 6, "b2")),
        None,
        Some(Move::new(1, 0, 7, "b3")),
    ];
    let mut stepper = Stepper::new(zeroed_trace(8, 2, moves));

    let mut steps = 0;
    while !stepper.is_at_end() {
        stepper.step_forward();
        steps += 1;
    }
    // a0, b0, death of 0, b1, then (dead + b2) and (dead + b3) each as one step
    assert_eq!(steps, 6);
    assert_eq!(stepper.life_status(0), LifeStatus::Dead);
    assert_eq!(stepper.cell_value(7), "b3");

    let mut steps = 0;
    while !stepper.is_at_start() {
        stepper.step_backward();
        steps += 1;
    }
    assert_eq!(steps, 6);
    assert_eq!(stepper.life_status(0), LifeStatus::Alive);
    assert!(stepper.memory().iter().all(|value| *value == "0"));
}

#[test]
fn test_forward_chain_lands_on_next_live_move() {
    let moves = vec![
        Some(Move::new(0, 1, 0, "a0")),
        Some(Move::new(1, 5, 4, "b0")),
        None,
        Some(Move::new(1, 6, 5, "b1")),
        None,
        Some(Move::new(1, 7, 6, "b2")),
    ];
    let mut stepper = Stepper::new(zeroed_trace(8, 2, moves));
    stepper.advance_to(4);

    let events = stepper.step_forward();
    assert_eq!(stepper.current_cursor(), 6);
    assert!(matches!(events.as_slice(), [ReplayEvent::Applied(effect)] if effect.pid == 1));

    // Backward undoes b2 alone; the dead turn before it is chained onto b1
    stepper.step_backward();
    assert_eq!(stepper.current_cursor(), 5);
    assert_eq!(stepper.cell_value(6), "0");
    stepper.step_backward();
    assert_eq!(stepper.current_cursor(), 3);
    assert_eq!(stepper.cell_value(5), "0");
    assert_eq!(stepper.life_status(0), LifeStatus::Dead);
}

#[test]
fn test_jump_to_end_then_start_restores_seed() {
    let mut owners = FxHashMap::default();
    owners.insert(0, 0);
    owners.insert(4, 1);
    let memory: Vec<String> = (0..6).map(|i| format!("DAT #0, {}", i)).collect();
    let moves = vec![
        Some(Move::new(0, 1, 2, "MOV 0, 1")),
        Some(Move::new(1, 5, 0, "DAT #0, 9")),
        Some(Move::jump(0, 3)),
        Some(Move::new(1, 0, 1, "ADD #1, 1")),
        None,
        Some(Move::new(1, 1, 5, "DAT #0, 0")),
    ];
    let trace = Trace::new(memory.clone(), 2, owners, moves).expect("trace should be valid");
    let mut stepper = Stepper::new(trace);

    let seeded_occupancy: Vec<Vec<ProcessId>> =
        (0..6).map(|a| stepper.occupants(a).to_vec()).collect();

    stepper.jump_to_end();
    assert!(stepper.is_at_end());
    assert_eq!(stepper.cell_owner(0), Some(1));
    assert_eq!(stepper.history().write_history_len(0), 2);

    stepper.jump_to_start();
    assert_eq!(stepper.current_cursor(), 0);
    assert_eq!(stepper.memory(), memory.iter().map(String::as_str).collect::<Vec<_>>());
    assert_eq!(stepper.cell_owner(0), Some(0));
    assert_eq!(stepper.cell_owner(4), Some(1));
    for (address, occupants) in seeded_occupancy.iter().enumerate() {
        assert_eq!(stepper.occupants(address), occupants.as_slice());
    }
    assert_eq!(stepper.alive_count(), 2);
}

#[test]
fn test_shared_address_marker_follows_arrival_order() {
    // Both processes start on cell 0
    let moves = vec![
        Some(Move::jump(0, 1)),
        Some(Move::jump(1, 1)),
        Some(Move::jump(0, 0)),
        Some(Move::jump(1, 2)),
    ];
    let mut stepper = Stepper::new(zeroed_trace(4, 2, moves));
    assert_eq!(stepper.occupants(0), &[0, 1]);

    stepper.advance_to(3);
    // Both moved to cell 1, then process 0 returned to cell 0
    assert_eq!(stepper.occupants(0), &[0]);
    assert_eq!(stepper.occupants(1), &[1]);

    stepper.jump_to_start();
    assert_eq!(stepper.occupants(0), &[0, 1]);
    assert_eq!(stepper.marker(0), Some(1));
}

#[test]
fn test_revert_effect_names_restored_cells() {
    let trace = zeroed_trace(4, 1, vec![Some(Move::new(0, 2, 3, "x"))]);
    let mut stepper = Stepper::new(trace);
    stepper.step_forward();

    let events = stepper.step_backward();
    let [ReplayEvent::Reverted(effect)] = events.as_slice() else {
        panic!("expected a single revert, got {:?}", events);
    };
    assert_eq!(effect.vacated, Some(MarkerChange { address: 2, marker: None }));
    assert_eq!(effect.arrived, Some(MarkerChange { address: 1, marker: Some(0) }));
    assert_eq!(effect.written.as_ref().map(|c| c.value.as_str()), Some("0"));
    assert_eq!(effect.window, Some(1));
}

#[test]
fn test_process_dead_on_first_turn_has_no_ip() {
    let moves = vec![None, Some(Move::new(1, 2, 3, "x")), None, Some(Move::new(1, 3, 0, "y"))];
    let mut stepper = Stepper::new(zeroed_trace(4, 2, moves));

    assert_eq!(stepper.current_ip(0), None);
    assert_eq!(stepper.instruction_window(0).len(), 5);
    assert!(stepper
        .instruction_window(0)
        .iter()
        .all(|(address, value)| address.is_none() && *value == "???"));

    stepper.jump_to_end();
    assert_eq!(stepper.life_status(0), LifeStatus::Dead);
    assert_eq!(stepper.memory(), ["y", "0", "0", "x"]);
}

#[test]
fn test_instruction_window_wraps_around_core() {
    let memory: Vec<String> = (0..5).map(|i| format!("c{}", i)).collect();
    let trace = Trace::new(memory, 1, FxHashMap::default(), vec![Some(Move::jump(0, 1))])
        .expect("trace should be valid");
    let stepper = Stepper::new(trace);

    // Starting ip is 0
    let window: Vec<_> = stepper.instruction_window(0);
    assert_eq!(
        window,
        vec![
            (Some(3), "c3"),
            (Some(4), "c4"),
            (Some(0), "c0"),
            (Some(1), "c1"),
            (Some(2), "c2"),
        ]
    );

    let wide = Stepper::new(stepper.trace().clone()).with_window_radius(3);
    assert_eq!(wide.instruction_window(0).len(), 7);
    assert_eq!(wide.instruction_window(0)[0], (Some(2), "c2"));
}

#[test]
fn test_huge_window_radius_is_capped() {
    let trace = zeroed_trace(4, 2, vec![None, Some(Move::jump(1, 2))]);
    let stepper = Stepper::new(trace).with_window_radius(usize::MAX);
    let width = 2 * Stepper::MAX_WINDOW_RADIUS + 1;

    // Live process: window wraps the core repeatedly
    let window = stepper.instruction_window(1);
    assert_eq!(window.len(), width);
    assert_eq!(window[Stepper::MAX_WINDOW_RADIUS], (Some(1), "0"));

    // Process without an ip
    assert_eq!(stepper.instruction_window(0).len(), width);
}
