//! Mutable replay state reconstructed from a [`Trace`]
//!
//! The store keeps three families of stacks:
//! - [`MemoryCell`]: per-address write history, bottom entry = seeded value
//! - per-process instruction-pointer history, bottom entry = starting ip
//! - [`Occupancy`]: per-address ordered list of processes currently pointing there
//!
//! Every mutation is a push ([`HistoryStore::apply_move`]) or the matching pop
//! ([`HistoryStore::revert_move`]), so reverting the most recently applied move
//! restores every observable field exactly.
//!
//! Both operations return a [`MoveEffect`] naming the handful of cells whose
//! presentation changed, so a renderer never has to diff the whole core.

mod occupancy;

pub use occupancy::Occupancy;

use crate::trace::{Address, CellValue, Move, ProcessId, Trace};

/// One layer of a cell's write history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEntry {
    /// Process that wrote the value (or seeded it)
    pub owner: Option<ProcessId>,
    pub value: CellValue,
}

/// A memory cell and the stack of values written to it
#[derive(Debug, Clone)]
pub struct MemoryCell {
    // Never empty: entry 0 is the seeded value
    history: Vec<CellEntry>,
}

impl MemoryCell {
    fn seeded(value: CellValue, owner: Option<ProcessId>) -> Self {
        MemoryCell {
            history: vec![CellEntry { owner, value }],
        }
    }

    fn top(&self) -> &CellEntry {
        // history is seeded on construction and the seed is never popped
        &self.history[self.history.len() - 1]
    }

    /// Current value of the cell
    pub fn value(&self) -> &str {
        &self.top().value
    }

    /// Process that owns the current value
    pub fn owner(&self) -> Option<ProcessId> {
        self.top().owner
    }

    /// Full write history, seed first
    pub fn history(&self) -> &[CellEntry] {
        &self.history
    }
}

/// A position a process's ip moved to, plus where it sat in the occupancy
/// list of the address it left
#[derive(Debug, Clone, Copy)]
struct IpVisit {
    address: Address,
    left_slot: Option<usize>,
}

#[derive(Debug, Clone)]
struct IpHistory {
    start: Option<Address>,
    visits: Vec<IpVisit>,
}

impl IpHistory {
    fn current(&self) -> Option<Address> {
        self.visits.last().map(|visit| visit.address).or(self.start)
    }
}

/// Marker (ip indicator) state of one address after a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerChange {
    pub address: Address,
    /// Most recent occupant, `None` when no ip points here any more
    pub marker: Option<ProcessId>,
}

/// Value state of one address after a move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellChange {
    pub address: Address,
    pub owner: Option<ProcessId>,
    pub value: CellValue,
}

/// Everything a presentation layer must redraw after applying or reverting a move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveEffect {
    pub pid: ProcessId,
    /// Address the process's ip left
    pub vacated: Option<MarkerChange>,
    /// Address the process's ip now points at
    pub arrived: Option<MarkerChange>,
    /// Cell whose visible value changed
    pub written: Option<CellChange>,
    /// Centre of the process's nearby-instruction window
    pub window: Option<Address>,
}

/// Per-cell, per-process and per-address history stacks
#[derive(Debug, Clone)]
pub struct HistoryStore {
    cells: Vec<MemoryCell>,
    ips: Vec<IpHistory>,
    occupancy: Vec<Occupancy>,
}

impl HistoryStore {
    /// Seed every stack from the trace's initial state
    pub fn new(trace: &Trace) -> Self {
        let cells = (0..trace.memory_length())
            .map(|address| {
                MemoryCell::seeded(
                    trace.initial_value(address).to_string(),
                    trace.initial_owner(address),
                )
            })
            .collect();

        let mut occupancy = vec![Occupancy::new(); trace.memory_length()];
        let ips = (0..trace.process_count())
            .map(|pid| {
                let start = trace.starting_ip(pid);
                if let Some(address) = start {
                    occupancy[address].push(pid);
                }
                IpHistory {
                    start,
                    visits: Vec::new(),
                }
            })
            .collect();

        HistoryStore {
            cells,
            ips,
            occupancy,
        }
    }

    /// Push a move onto every affected stack
    pub fn apply_move(&mut self, mv: &Move) -> MoveEffect {
        let pid = mv.pid;

        let left = self.ips[pid].current().map(|address| {
            let slot = self.occupancy[address].remove_last(pid);
            (address, slot)
        });

        self.ips[pid].visits.push(IpVisit {
            address: mv.ip,
            left_slot: left.and_then(|(_, slot)| slot),
        });
        self.occupancy[mv.ip].push(pid);

        let written = mv.write.as_ref().map(|write| {
            self.cells[write.address].history.push(CellEntry {
                owner: Some(pid),
                value: write.value.clone(),
            });
            CellChange {
                address: write.address,
                owner: Some(pid),
                value: write.value.clone(),
            }
        });

        tracing::debug!(pid, ip = mv.ip, write = ?mv.write.as_ref().map(|w| w.address), "applied move");

        MoveEffect {
            pid,
            vacated: left.map(|(address, _)| self.marker_change(address)),
            arrived: Some(self.marker_change(mv.ip)),
            written,
            window: Some(mv.ip),
        }
    }

    /// Pop a previously applied move off every affected stack
    ///
    /// `mv` must be the most recently applied move that has not been reverted.
    pub fn revert_move(&mut self, mv: &Move) -> MoveEffect {
        let pid = mv.pid;

        let written = mv.write.as_ref().map(|write| {
            let cell = &mut self.cells[write.address];
            if cell.history.len() > 1 {
                cell.history.pop();
            } else {
                tracing::warn!(
                    pid,
                    address = write.address,
                    "revert of a write that was never applied; keeping seed"
                );
            }
            CellChange {
                address: write.address,
                owner: cell.owner(),
                value: cell.value().to_string(),
            }
        });

        let mut vacated = None;
        let mut arrived = None;
        let mut window = self.ips[pid].current();

        if let Some(visit) = self.ips[pid].visits.pop() {
            self.occupancy[visit.address].remove_last(pid);
            let exposed = self.ips[pid].current();
            if let Some(address) = exposed {
                self.occupancy[address].restore(pid, visit.left_slot);
            }
            vacated = Some(self.marker_change(visit.address));
            arrived = exposed.map(|address| self.marker_change(address));
            window = exposed;
        }

        tracing::debug!(pid, ip = mv.ip, write = ?mv.write.as_ref().map(|w| w.address), "reverted move");

        MoveEffect {
            pid,
            vacated,
            arrived,
            written,
            window,
        }
    }

    fn marker_change(&self, address: Address) -> MarkerChange {
        MarkerChange {
            address,
            marker: self.occupancy[address].marker(),
        }
    }

    // ========== Queries ==========

    pub fn memory_length(&self) -> usize {
        self.cells.len()
    }

    pub fn cell(&self, address: Address) -> &MemoryCell {
        &self.cells[address]
    }

    pub fn cells(&self) -> &[MemoryCell] {
        &self.cells
    }

    /// Current value of a cell
    pub fn cell_value(&self, address: Address) -> &str {
        self.cells[address].value()
    }

    /// Owner of the current value of a cell
    pub fn cell_owner(&self, address: Address) -> Option<ProcessId> {
        self.cells[address].owner()
    }

    /// Number of entries in a cell's write history, seed included
    pub fn write_history_len(&self, address: Address) -> usize {
        self.cells[address].history.len()
    }

    /// Processes pointing at an address, oldest arrival first
    pub fn occupants(&self, address: Address) -> &[ProcessId] {
        self.occupancy[address].as_slice()
    }

    /// Process whose marker is shown on an address
    pub fn marker(&self, address: Address) -> Option<ProcessId> {
        self.occupancy[address].marker()
    }

    /// Current ip of a process
    pub fn current_ip(&self, pid: ProcessId) -> Option<Address> {
        self.ips[pid].current()
    }

    /// Every ip a process has visited up to the current position, starting ip first
    pub fn ip_history(&self, pid: ProcessId) -> Vec<Address> {
        let history = &self.ips[pid];
        history
            .start
            .into_iter()
            .chain(history.visits.iter().map(|visit| visit.address))
            .collect()
    }
}
