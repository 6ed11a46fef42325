//! # World Error Types
//!
//! Recoverable errors surfaced by the streaming pipeline, the worker pool and
//! configuration loading. Contract violations (out-of-order chunk transitions,
//! malformed neighbourhoods) are not represented here: they panic.

use std::{fmt, path::PathBuf};

use thiserror::Error;

use super::voxels::chunk::ColumnCoordinate;

/// One per-item operation that panicked inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    /// Position of the item in the batch's input list
    pub index: usize,
    /// The panic payload, when it was a string
    pub message: String,
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item {}: {}", self.index, self.message)
    }
}

/// Errors from running a batch on the worker pool.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Some items' operations panicked. Every other item still ran.
    #[error("{} task(s) failed, first {}", .failures.len(), .failures[0])]
    TasksFailed {
        /// Failures in input order; never empty.
        failures: Vec<TaskFailure>,
    },

    /// The worker pool went away before every item reported back.
    #[error("worker pool disconnected before the batch completed")]
    Disconnected,
}

/// Errors from a `ChunkGrid` update.
///
/// Chunks whose work failed have already been evicted when this is returned;
/// the next update recreates them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// The block generation batch failed for the listed columns.
    #[error("block generation failed for {} chunk(s)", .columns.len())]
    BlockGeneration {
        columns: Vec<ColumnCoordinate>,
        #[source]
        source: DispatchError,
    },

    /// The mesh generation batch failed for the listed columns.
    /// Chunks that meshed successfully were still published.
    #[error("mesh generation failed for {} chunk(s)", .columns.len())]
    MeshGeneration {
        columns: Vec<ColumnCoordinate>,
        #[source]
        source: DispatchError,
    },
}

/// Errors from loading a `WorldConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config text is not valid JSON for a `WorldConfig`.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
