//! Cursor state machine over a [`Trace`]
//!
//! The cursor sits in `[0, total_moves]` and counts how many turns have been
//! replayed. Turn `i` belongs to process `i % process_count`.
//!
//! # Skip-chaining
//!
//! An eliminated process keeps its slot in the round-robin, producing a `None`
//! turn every round. Stepping over such a turn when the same slot was already
//! dead one round earlier immediately continues with the next turn, so the
//! caller only spends navigation steps on turns that change something visible
//! (a live move, or the turn where a process dies).
//!
//! Stepping forward checks the slot's previous-round turn relative to the turn
//! being stepped over; stepping backward checks it relative to the turn the
//! cursor lands on. Both chains are explicit loops bounded by the cursor range.

use crate::history::{HistoryStore, MemoryCell, MoveEffect};
use crate::trace::{Address, ProcessId, Trace, UNREADABLE_CELL};

/// Whether a process is still competing at the current cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeStatus {
    Alive,
    Dead,
}

impl LifeStatus {
    pub fn is_alive(self) -> bool {
        self == LifeStatus::Alive
    }
}

/// A change notification produced by navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayEvent {
    /// A process's life status flipped
    LifeChanged { pid: ProcessId, status: LifeStatus },
    /// A move was replayed
    Applied(MoveEffect),
    /// A move was undone
    Reverted(MoveEffect),
}

/// Replays a trace forward and backward one turn at a time
#[derive(Debug, Clone)]
pub struct Stepper {
    trace: Trace,
    store: HistoryStore,
    cursor: usize,
    life: Vec<LifeStatus>,
    window_radius: usize,
}

impl Stepper {
    /// Nearby-instruction window radius used when none is configured
    pub const DEFAULT_WINDOW_RADIUS: usize = 2;

    /// Largest window radius a stepper will use
    pub const MAX_WINDOW_RADIUS: usize = 64;

    /// Seed the history store and place the cursor at the start
    pub fn new(trace: Trace) -> Self {
        let store = HistoryStore::new(&trace);
        let life = vec![LifeStatus::Alive; trace.process_count()];
        Stepper {
            trace,
            store,
            cursor: 0,
            life,
            window_radius: Self::DEFAULT_WINDOW_RADIUS,
        }
    }

    /// Set the instruction window radius, capped at [`Self::MAX_WINDOW_RADIUS`]
    pub fn with_window_radius(mut self, radius: usize) -> Self {
        self.window_radius = radius.min(Self::MAX_WINDOW_RADIUS);
        self
    }

    /// Replay the turn under the cursor, chaining over repeated dead turns.
    ///
    /// Returns no events at the end of the trace.
    pub fn step_forward(&mut self) -> Vec<ReplayEvent> {
        let mut events = Vec::new();
        let processes = self.trace.process_count();

        while self.cursor < self.trace.total_moves() {
            let turn = self.cursor;
            let slot = turn % processes;

            match self.trace.move_at(turn) {
                None => {
                    Self::set_life(&mut self.life, slot, LifeStatus::Dead, turn, &mut events);
                    self.cursor += 1;
                    let dead_last_round = turn
                        .checked_sub(processes)
                        .is_some_and(|previous| self.trace.is_dead_turn(previous));
                    if !dead_last_round {
                        break;
                    }
                    tracing::trace!(pid = slot, turn, "skipping dead turn");
                }
                Some(mv) => {
                    Self::set_life(&mut self.life, slot, LifeStatus::Alive, turn, &mut events);
                    let effect = self.store.apply_move(mv);
                    events.push(ReplayEvent::Applied(effect));
                    self.cursor += 1;
                    break;
                }
            }
        }

        events
    }

    /// Undo the turn before the cursor, chaining over repeated dead turns.
    ///
    /// Returns no events at the start of the trace.
    pub fn step_backward(&mut self) -> Vec<ReplayEvent> {
        let mut events = Vec::new();
        let processes = self.trace.process_count();

        while self.cursor > 0 {
            self.cursor -= 1;
            let turn = self.cursor;
            let slot = turn % processes;

            let previous = turn.checked_sub(processes);
            let status = match previous {
                Some(previous) if self.trace.is_dead_turn(previous) => LifeStatus::Dead,
                _ => LifeStatus::Alive,
            };
            Self::set_life(&mut self.life, slot, status, turn, &mut events);

            match self.trace.move_at(turn) {
                None => {
                    if status.is_alive() {
                        break;
                    }
                    tracing::trace!(pid = slot, turn, "skipping dead turn");
                }
                Some(mv) => {
                    let effect = self.store.revert_move(mv);
                    events.push(ReplayEvent::Reverted(effect));
                    break;
                }
            }
        }

        events
    }

    /// Step backward until the cursor reaches 0; returns the number of steps
    pub fn jump_to_start(&mut self) -> usize {
        let mut steps = 0;
        while !self.is_at_start() {
            self.step_backward();
            steps += 1;
        }
        steps
    }

    /// Step forward until the cursor reaches the end; returns the number of steps
    pub fn jump_to_end(&mut self) -> usize {
        let mut steps = 0;
        while !self.is_at_end() {
            self.step_forward();
            steps += 1;
        }
        steps
    }

    /// Step forward until the cursor is at least `target` (or the end)
    pub fn advance_to(&mut self, target: usize) -> usize {
        let mut steps = 0;
        while self.cursor < target && !self.is_at_end() {
            self.step_forward();
            steps += 1;
        }
        steps
    }

    fn set_life(
        life: &mut [LifeStatus],
        pid: ProcessId,
        status: LifeStatus,
        turn: usize,
        events: &mut Vec<ReplayEvent>,
    ) {
        if life[pid] != status {
            life[pid] = status;
            tracing::debug!(pid, ?status, turn, "life status changed");
            events.push(ReplayEvent::LifeChanged { pid, status });
        }
    }

    // ========== Queries ==========

    pub fn current_cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_at_start(&self) -> bool {
        self.cursor == 0
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor >= self.trace.total_moves()
    }

    pub fn total_moves(&self) -> usize {
        self.trace.total_moves()
    }

    pub fn process_count(&self) -> usize {
        self.trace.process_count()
    }

    pub fn memory_length(&self) -> usize {
        self.trace.memory_length()
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn history(&self) -> &HistoryStore {
        &self.store
    }

    pub fn cells(&self) -> &[MemoryCell] {
        self.store.cells()
    }

    pub fn cell_value(&self, address: Address) -> &str {
        self.store.cell_value(address)
    }

    pub fn cell_owner(&self, address: Address) -> Option<ProcessId> {
        self.store.cell_owner(address)
    }

    pub fn occupants(&self, address: Address) -> &[ProcessId] {
        self.store.occupants(address)
    }

    pub fn marker(&self, address: Address) -> Option<ProcessId> {
        self.store.marker(address)
    }

    pub fn current_ip(&self, pid: ProcessId) -> Option<Address> {
        self.store.current_ip(pid)
    }

    pub fn life_status(&self, pid: ProcessId) -> LifeStatus {
        self.life[pid]
    }

    pub fn alive_count(&self) -> usize {
        self.life.iter().filter(|status| status.is_alive()).count()
    }

    pub fn process_name(&self, pid: ProcessId) -> String {
        self.trace.process_name(pid)
    }

    /// Current memory contents, one value per cell
    pub fn memory(&self) -> Vec<&str> {
        self.store.cells().iter().map(MemoryCell::value).collect()
    }

    /// Cells around a process's ip (`ip - radius ..= ip + radius`, wrapping)
    ///
    /// Every slot reads as unreadable when the process has no ip.
    pub fn instruction_window(&self, pid: ProcessId) -> Vec<(Option<Address>, &str)> {
        let width = 2 * self.window_radius + 1;
        let Some(ip) = self.store.current_ip(pid) else {
            return vec![(None, UNREADABLE_CELL); width];
        };

        let length = self.memory_length();
        (0..width)
            .map(|offset| {
                let address = (ip + offset + length - self.window_radius % length) % length;
                (Some(address), self.store.cell_value(address))
            })
            .collect()
    }
}
