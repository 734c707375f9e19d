//! Property-based tests for the replay engine
//!
//! Traces are generated the way the battle machine produces them: turns are
//! assigned round-robin, each process may be eliminated at some round and
//! then only produces empty turns, and live turns either write a cell or just
//! jump.
//!
//! ## Properties Verified
//!
//! - A forward step followed by a backward step (and vice versa) restores
//!   every cell, owner, occupancy list and life status
//! - Write-history depth equals one plus the writes replayed so far
//! - Occupancy lists mirror each process's latest ip
//! - Life status matches the latest turn of each process
//! - Jumping to the end and back restores the seeded state

use corewind::stepper::{LifeStatus, Stepper};
use corewind::trace::{Move, ProcessId, Trace};
use proptest::prelude::*;
use rustc_hash::FxHashMap;

/// Everything a viewer can observe at one cursor position
#[derive(Debug, Clone, PartialEq, Eq)]
struct Observed {
    memory: Vec<String>,
    owners: Vec<Option<ProcessId>>,
    occupancy: Vec<Vec<ProcessId>>,
    life: Vec<LifeStatus>,
}

fn observe(stepper: &Stepper) -> Observed {
    let cells = stepper.memory_length();
    Observed {
        memory: stepper.memory().iter().map(|v| v.to_string()).collect(),
        owners: (0..cells).map(|a| stepper.cell_owner(a)).collect(),
        occupancy: (0..cells).map(|a| stepper.occupants(a).to_vec()).collect(),
        life: (0..stepper.process_count())
            .map(|pid| stepper.life_status(pid))
            .collect(),
    }
}

fn arb_trace() -> impl Strategy<Value = Trace> {
    (1usize..10, 1usize..4, 1usize..8)
        .prop_flat_map(|(cells, processes, rounds)| {
            let deaths = prop::collection::vec(prop::option::of(0..rounds), processes);
            let turns =
                prop::collection::vec((0..cells, prop::option::of(0..cells)), processes * rounds);
            (Just(cells), Just(processes), deaths, turns)
        })
        .prop_map(|(cells, processes, deaths, turns)| {
            let moves = turns
                .into_iter()
                .enumerate()
                .map(|(turn, (ip, write))| {
                    let pid = turn % processes;
                    if deaths[pid].is_some_and(|round| turn / processes >= round) {
                        return None;
                    }
                    Some(match write {
                        Some(address) => Move::new(pid, ip, address, format!("v{}", turn)),
                        None => Move::jump(pid, ip),
                    })
                })
                .collect();

            let memory = (0..cells).map(|a| format!("init{}", a)).collect();
            let mut owners = FxHashMap::default();
            for pid in 0..processes {
                owners.insert(pid % cells, pid);
            }
            Trace::new(memory, processes, owners, moves).expect("generated trace is well formed")
        })
}

/// Every cursor position a user can reach by stepping forward from the start
fn forward_walk(trace: &Trace) -> Vec<Stepper> {
    let mut stepper = Stepper::new(trace.clone());
    let mut positions = vec![stepper.clone()];
    while !stepper.is_at_end() {
        stepper.step_forward();
        positions.push(stepper.clone());
    }
    positions
}

/// Whether every turn from `cursor` on repeats an earlier death, so a forward
/// step would run off the end without landing on a turn
fn only_repeated_deaths_remain(trace: &Trace, cursor: usize) -> bool {
    let processes = trace.process_count();
    (cursor..trace.total_moves()).all(|turn| {
        turn >= processes && trace.is_dead_turn(turn) && trace.is_dead_turn(turn - processes)
    })
}

proptest! {
    /// Property: stepping forward then backward restores every observable field
    #[test]
    fn prop_forward_then_backward_restores(trace in arb_trace()) {
        for stepper in forward_walk(&trace) {
            if stepper.is_at_end() || only_repeated_deaths_remain(&trace, stepper.current_cursor()) {
                continue;
            }
            let before = observe(&stepper);
            let mut probe = stepper.clone();
            probe.step_forward();
            probe.step_backward();
            prop_assert_eq!(observe(&probe), before, "cursor {}", stepper.current_cursor());
        }
    }

    /// Property: stepping backward then forward restores every observable field
    #[test]
    fn prop_backward_then_forward_restores(trace in arb_trace()) {
        for stepper in forward_walk(&trace) {
            if stepper.is_at_start() {
                continue;
            }
            let before = observe(&stepper);
            let mut probe = stepper.clone();
            probe.step_backward();
            probe.step_forward();
            prop_assert_eq!(observe(&probe), before, "cursor {}", stepper.current_cursor());
        }
    }

    /// Property: write-history depth is one plus the writes replayed so far
    #[test]
    fn prop_write_history_depth(trace in arb_trace()) {
        for stepper in forward_walk(&trace) {
            let cursor = stepper.current_cursor();
            for address in 0..trace.memory_length() {
                let writes = (0..cursor)
                    .filter_map(|turn| trace.move_at(turn))
                    .filter(|mv| mv.write.as_ref().is_some_and(|w| w.address == address))
                    .count();
                prop_assert_eq!(stepper.history().write_history_len(address), 1 + writes);
            }
        }
    }

    /// Property: occupancy mirrors each process's latest ip and life matches its latest turn
    #[test]
    fn prop_occupancy_and_life_follow_cursor(trace in arb_trace()) {
        let processes = trace.process_count();
        let mut stepper = Stepper::new(trace.clone());
        let mut visited = Vec::new();
        while !stepper.is_at_end() {
            stepper.step_forward();
            visited.push(stepper.clone());
        }
        while !stepper.is_at_start() {
            stepper.step_backward();
            visited.push(stepper.clone());
        }

        for stepper in visited {
            let cursor = stepper.current_cursor();
            for pid in 0..processes {
                let latest_turn = (0..cursor).rev().find(|turn| turn % processes == pid);
                let expected_life = match latest_turn {
                    Some(turn) if trace.is_dead_turn(turn) => LifeStatus::Dead,
                    _ => LifeStatus::Alive,
                };
                prop_assert_eq!(stepper.life_status(pid), expected_life);

                let expected_ip = (0..cursor)
                    .rev()
                    .filter_map(|turn| trace.move_at(turn))
                    .find(|mv| mv.pid == pid)
                    .map(|mv| mv.ip)
                    .or(trace.starting_ip(pid));
                prop_assert_eq!(stepper.current_ip(pid), expected_ip);

                for address in 0..trace.memory_length() {
                    let listed = stepper.occupants(address).iter().filter(|&&p| p == pid).count();
                    let expected = usize::from(expected_ip == Some(address));
                    prop_assert_eq!(listed, expected);
                }
            }
        }
    }

    /// Property: jumping to the end and back restores the seeded state
    #[test]
    fn prop_jump_round_trip_restores_seed(trace in arb_trace()) {
        let mut stepper = Stepper::new(trace);
        let seeded = observe(&stepper);

        stepper.jump_to_end();
        prop_assert!(stepper.is_at_end());
        stepper.jump_to_start();

        prop_assert_eq!(stepper.current_cursor(), 0);
        prop_assert_eq!(observe(&stepper), seeded);
    }
}
