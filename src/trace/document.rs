// JSON shape of a trace as written by the battle producer

use super::{Address, CellValue, CellWrite, Move, ProcessId, Trace, UNREADABLE_CELL};
use crate::errors::TraceError;
use rustc_hash::FxHashMap;
use serde::Deserialize;

/// Top-level trace document
///
/// ```json
/// {
///   "memory": ["DAT #0, 0", "MOV 0, 1"],
///   "process_count": 1,
///   "owners": {"1": 0},
///   "names": ["imp"],
///   "moves": [{"pid": 0, "ip": 2, "index": 2, "value": "MOV 0, 1"}, null]
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct TraceDocument {
    pub memory: Vec<CellValue>,
    pub process_count: usize,
    #[serde(default)]
    pub owners: FxHashMap<Address, ProcessId>,
    #[serde(default)]
    pub names: Vec<String>,
    pub moves: Vec<Option<Move>>,
}

impl TraceDocument {
    pub fn into_trace(self) -> Result<Trace, TraceError> {
        Trace::new(self.memory, self.process_count, self.owners, self.moves)?.with_names(self.names)
    }
}

/// Wire form of a single move; `index`/`value` are null for non-writing turns
#[derive(Debug, Deserialize)]
pub(super) struct MoveRecord {
    pid: ProcessId,
    ip: Address,
    #[serde(default)]
    index: Option<Address>,
    #[serde(default)]
    value: Option<CellValue>,
}

impl From<MoveRecord> for Move {
    fn from(record: MoveRecord) -> Self {
        let write = record.index.map(|address| CellWrite {
            address,
            value: record
                .value
                .unwrap_or_else(|| UNREADABLE_CELL.to_string()),
        });
        Move {
            pid: record.pid,
            ip: record.ip,
            write,
        }
    }
}
