//! Ordered list of processes whose ip points at one address
//!
//! Arrival order matters: the last entry is the most recent arrival and owns
//! the visible marker on the cell. Removal always takes the *last* matching
//! entry so that the remaining occupants keep their relative order after
//! backtracking; removing the first match would hand the marker to the wrong
//! process.

use crate::trace::ProcessId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Occupancy {
    occupants: Vec<ProcessId>,
}

impl Occupancy {
    pub fn new() -> Self {
        Occupancy {
            occupants: Vec::new(),
        }
    }

    /// Record a new arrival
    pub fn push(&mut self, pid: ProcessId) {
        self.occupants.push(pid);
    }

    /// Remove the last occurrence of `pid`, returning the slot it occupied
    pub fn remove_last(&mut self, pid: ProcessId) -> Option<usize> {
        let slot = self.occupants.iter().rposition(|&p| p == pid)?;
        self.occupants.remove(slot);
        Some(slot)
    }

    /// Put `pid` back at `slot`, or at the end when the slot is unknown
    pub fn restore(&mut self, pid: ProcessId, slot: Option<usize>) {
        match slot {
            Some(slot) if slot <= self.occupants.len() => self.occupants.insert(slot, pid),
            _ => self.occupants.push(pid),
        }
    }

    /// Most recent arrival, i.e. the process whose marker is shown
    pub fn marker(&self) -> Option<ProcessId> {
        self.occupants.last().copied()
    }

    pub fn as_slice(&self) -> &[ProcessId] {
        &self.occupants
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    pub fn len(&self) -> usize {
        self.occupants.len()
    }
}
