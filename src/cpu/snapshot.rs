//! Machine-state snapshots.
//!
//! A snapshot captures the complete machine — registers, memory, execution
//! state and cycle count — as JSON, for debugging, regression fixtures and
//! reproducible bug reports.

use crate::cpu::engine::Cpu;
use std::path::Path;
use thiserror::Error;

/// Serialize the machine to a JSON string.
pub fn to_json(cpu: &Cpu) -> Result<String, SnapshotError> {
    serde_json::to_string_pretty(cpu).map_err(|e| SnapshotError::Format(e.to_string()))
}

/// Restore a machine from a JSON string.
pub fn from_json(json: &str) -> Result<Cpu, SnapshotError> {
    serde_json::from_str(json).map_err(|e| SnapshotError::Format(e.to_string()))
}

/// Write a snapshot file.
pub fn save<P: AsRef<Path>>(path: P, cpu: &Cpu) -> Result<(), SnapshotError> {
    let json = to_json(cpu)?;
    std::fs::write(path.as_ref(), json).map_err(|e| SnapshotError::Io(e.to_string()))
}

/// Read a snapshot file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Cpu, SnapshotError> {
    let json =
        std::fs::read_to_string(path.as_ref()).map_err(|e| SnapshotError::Io(e.to_string()))?;
    from_json(&json)
}

/// Errors that can occur during snapshot operations.
#[derive(Debug, Clone, Error)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("snapshot format error: {0}")]
    Format(String),
}
