/*!
 * Process Types
 * Common types for the simulated process lifecycle
 */

use crate::core::types::{Iteration, PartitionId, Pid, Size, Ticks};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Admission operation result
pub type AdmissionResult<T> = Result<T, AdmissionError>;

/// Admission errors, raised before a process enters the simulation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdmissionError {
    #[error("Process {name} must require at least one memory unit")]
    InvalidSize { name: String },

    #[error("Process {name} must need at least one tick of execution")]
    InvalidTime { name: String },

    #[error("Process name must not be empty")]
    EmptyName,

    #[error("A process named {0} already exists")]
    DuplicateName(String),

    #[error("Process not found: {0}")]
    UnknownProcess(String),

    #[error("Process {name} is {state:?} and can no longer be withdrawn")]
    NotWithdrawable { name: String, state: ProcessState },

    #[error("Process {name} is {state:?} and can no longer be edited")]
    NotEditable { name: String, state: ProcessState },
}

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessState {
    /// Admitted, waiting for memory
    Ready,
    /// Holding a partition, waiting for the CPU
    ReadyInPartition,
    /// Executing
    Running,
    /// Terminal
    Finished,
}

impl ProcessState {
    /// Stable machine identifier; display labels live in `presentation`
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::ReadyInPartition => "READY_IN_PARTITION",
            Self::Running => "RUNNING",
            Self::Finished => "FINISHED",
        }
    }

    #[inline]
    pub const fn is_alive(&self) -> bool {
        !matches!(self, Self::Finished)
    }

    /// States in which the process must hold a partition
    #[inline]
    pub const fn holds_partition(&self) -> bool {
        matches!(self, Self::ReadyInPartition | Self::Running)
    }
}

/// Simulated process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub pid: Pid,
    pub name: String,
    /// Remaining ticks
    pub time: Ticks,
    pub size: Size,
    pub state: ProcessState,
    #[serde(rename = "partition_number")]
    pub partition: Option<PartitionId>,
    pub admitted_at: Iteration,
    /// Iteration in which the process received its partition
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub placed_at: Option<Iteration>,
}

impl Process {
    pub fn new(pid: Pid, name: impl Into<String>, time: Ticks, size: Size) -> Self {
        Self {
            pid,
            name: name.into(),
            time,
            size,
            state: ProcessState::Ready,
            partition: None,
            admitted_at: 0,
            placed_at: None,
        }
    }

    #[must_use]
    pub fn admitted_at(mut self, iteration: Iteration) -> Self {
        self.admitted_at = iteration;
        self
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.state == ProcessState::Finished
    }
}

/// Admission request, as read from a batch file or a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    pub name: String,
    pub time: Ticks,
    pub size: Size,
}

impl ProcessSpec {
    pub fn new(name: impl Into<String>, time: Ticks, size: Size) -> Self {
        Self {
            name: name.into(),
            time,
            size,
        }
    }
}

/// Snapshot of one process at the end of an iteration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessLog {
    pub iteration: Iteration,
    pub name: String,
    pub state: ProcessState,
    #[serde(rename = "storagePartitionId")]
    pub partition: Option<PartitionId>,
    #[serde(rename = "timeRemaining")]
    pub time_remaining: Ticks,
}

impl ProcessLog {
    pub fn of(process: &Process, iteration: Iteration) -> Self {
        Self {
            iteration,
            name: process.name.clone(),
            state: process.state,
            partition: process.partition,
            time_remaining: process.time,
        }
    }
}

/// A process reaching `FINISHED`, with the partition it gave back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishedLog {
    pub iteration: Iteration,
    pub name: String,
    pub partition: PartitionId,
}
