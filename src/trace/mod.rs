//! Read-only model of a recorded battle
//!
//! A [`Trace`] is the immutable input to the replay engine: the initial core
//! contents, which process seeded which cells, and one entry per turn. Turn
//! `i` belongs to process `i % process_count`; a `None` entry is a no-op turn
//! of a process that had already been eliminated.
//!
//! The first round (one entry per process) doubles as the source of each
//! process's starting instruction pointer. The producing VM advances the ip
//! before reporting it, so the starting ip is the reported ip minus one.

mod document;

use crate::errors::TraceError;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::path::Path;

pub use document::TraceDocument;

/// Index of a memory cell, always in `[0, memory_length)`
pub type Address = usize;

/// Index of a competing process, always in `[0, process_count)`
pub type ProcessId = usize;

/// Rendered contents of a memory cell (e.g. `"MOV 0, 1"`)
pub type CellValue = String;

/// Placeholder shown for a cell that could not be rendered
pub const UNREADABLE_CELL: &str = "???";

/// A single memory write performed by a move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellWrite {
    pub address: Address,
    pub value: CellValue,
}

/// The effect of one live turn
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "document::MoveRecord")]
pub struct Move {
    /// Process that executed the turn
    pub pid: ProcessId,
    /// Instruction pointer after the turn
    pub ip: Address,
    /// Memory write, absent for jumps and comparisons
    pub write: Option<CellWrite>,
}

impl Move {
    /// A turn that moves the ip and writes one cell
    pub fn new(pid: ProcessId, ip: Address, address: Address, value: impl Into<CellValue>) -> Self {
        Move {
            pid,
            ip,
            write: Some(CellWrite {
                address,
                value: value.into(),
            }),
        }
    }

    /// A turn that only moves the ip
    pub fn jump(pid: ProcessId, ip: Address) -> Self {
        Move {
            pid,
            ip,
            write: None,
        }
    }
}

/// Immutable, already-produced battle trace
#[derive(Debug, Clone)]
pub struct Trace {
    memory: Vec<CellValue>,
    owners: FxHashMap<Address, ProcessId>,
    names: Vec<String>,
    process_count: usize,
    moves: Vec<Option<Move>>,
}

impl Trace {
    /// Build a trace, checking only the structure the replay engine indexes by.
    ///
    /// Semantic consistency (round-robin pid order, no resurrection) is the
    /// producer's responsibility and is not checked.
    pub fn new(
        memory: Vec<CellValue>,
        process_count: usize,
        owners: FxHashMap<Address, ProcessId>,
        moves: Vec<Option<Move>>,
    ) -> Result<Self, TraceError> {
        if memory.is_empty() {
            return Err(TraceError::EmptyMemory);
        }
        if process_count == 0 {
            return Err(TraceError::NoProcesses);
        }
        if moves.len() < process_count {
            return Err(TraceError::IncompleteFirstRound {
                moves: moves.len(),
                processes: process_count,
            });
        }

        let length = memory.len();
        let check_address = |context: String, address: Address| {
            if address < length {
                Ok(())
            } else {
                Err(TraceError::AddressOutOfBounds {
                    context,
                    address,
                    length,
                })
            }
        };
        let check_pid = |context: String, pid: ProcessId| {
            if pid < process_count {
                Ok(())
            } else {
                Err(TraceError::UnknownProcess {
                    context,
                    pid,
                    processes: process_count,
                })
            }
        };

        for (&address, &pid) in &owners {
            check_address("owner".to_string(), address)?;
            check_pid(format!("owner of cell {}", address), pid)?;
        }

        for (index, mv) in moves.iter().enumerate() {
            let Some(mv) = mv else { continue };
            check_pid(format!("move {}", index), mv.pid)?;
            check_address(format!("move {} ip", index), mv.ip)?;
            if let Some(write) = &mv.write {
                check_address(format!("move {} write", index), write.address)?;
            }
        }

        Ok(Trace {
            memory,
            owners,
            names: Vec::new(),
            process_count,
            moves,
        })
    }

    /// Attach display names to the first `names.len()` processes
    pub fn with_names(mut self, names: Vec<String>) -> Result<Self, TraceError> {
        if names.len() > self.process_count {
            return Err(TraceError::TooManyNames {
                names: names.len(),
                processes: self.process_count,
            });
        }
        self.names = names;
        Ok(self)
    }

    /// Parse a JSON trace document
    pub fn from_json_str(json: &str) -> Result<Self, TraceError> {
        let document: TraceDocument = serde_json::from_str(json)?;
        document.into_trace()
    }

    /// Read and parse a JSON trace document from disk
    pub fn load(path: &Path) -> Result<Self, TraceError> {
        let json = std::fs::read_to_string(path).map_err(|source| TraceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let trace = Self::from_json_str(&json)?;
        tracing::info!(
            path = %path.display(),
            cells = trace.memory_length(),
            processes = trace.process_count(),
            moves = trace.total_moves(),
            "loaded trace"
        );
        Ok(trace)
    }

    pub fn total_moves(&self) -> usize {
        self.moves.len()
    }

    pub fn process_count(&self) -> usize {
        self.process_count
    }

    pub fn memory_length(&self) -> usize {
        self.memory.len()
    }

    /// The move at `index`; `None` for a no-op turn or an index past the end
    pub fn move_at(&self, index: usize) -> Option<&Move> {
        self.moves.get(index).and_then(Option::as_ref)
    }

    /// Whether `index` is an existing no-op turn (an eliminated process's slot)
    pub fn is_dead_turn(&self, index: usize) -> bool {
        matches!(self.moves.get(index), Some(None))
    }

    /// Seeded value of a cell
    pub fn initial_value(&self, address: Address) -> &str {
        &self.memory[address]
    }

    /// Process whose code was loaded into a cell, if any
    pub fn initial_owner(&self, address: Address) -> Option<ProcessId> {
        self.owners.get(&address).copied()
    }

    /// Starting ip of a process, derived from its first-round move.
    ///
    /// `None` when the process was eliminated on its very first turn.
    pub fn starting_ip(&self, pid: ProcessId) -> Option<Address> {
        let length = self.memory_length();
        self.move_at(pid).map(|mv| (mv.ip + length - 1) % length)
    }

    /// Display name of a process
    pub fn process_name(&self, pid: ProcessId) -> String {
        self.names
            .get(pid)
            .cloned()
            .unwrap_or_else(|| format!("Process {}", pid))
    }
}
