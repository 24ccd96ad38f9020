/*!
 * Memory Types
 * Partitions, free regions, allocation failures and memory event records
 */

use crate::core::types::{Address, Iteration, PartitionId, Size};
use crate::process::{Process, ProcessState};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result of a placement attempt
pub type AllocationResult<T> = Result<T, AllocationFailure>;

/// Result of a structural check
pub type MemoryResult<T> = Result<T, InvariantViolation>;

/// Contiguous region of simulated memory
///
/// A partition does not know whether it is occupied: occupancy is derived
/// from the processes that reference it (see [`super::Occupancy`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub id: PartitionId,
    pub position: Address,
    pub size: Size,
}

impl Partition {
    pub fn new(id: PartitionId, position: Address, size: Size) -> Self {
        Self { id, position, size }
    }

    /// One past the last address covered
    #[inline]
    pub fn end(&self) -> Address {
        self.position + self.size
    }

    #[inline]
    pub fn overlaps(&self, other: &Partition) -> bool {
        self.position < other.end() && other.position < self.end()
    }
}

/// A free region of the layout, either a free partition or an unaddressed gap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeRegion {
    pub position: Address,
    pub size: Size,
    /// `Some` when the region is a free partition, `None` for a gap
    pub partition: Option<PartitionId>,
}

impl FreeRegion {
    pub fn gap(position: Address, size: Size) -> Self {
        Self {
            position,
            size,
            partition: None,
        }
    }

    pub fn partition(partition: &Partition) -> Self {
        Self {
            position: partition.position,
            size: partition.size,
            partition: Some(partition.id),
        }
    }

    #[inline]
    pub fn is_gap(&self) -> bool {
        self.partition.is_none()
    }
}

/// Placement policy for choosing among free regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementPolicy {
    /// First region in address order that is large enough
    #[default]
    FirstFit,
    /// Smallest region that is large enough, ties by lowest address
    BestFit,
}

impl PlacementPolicy {
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FirstFit => "first_fit",
            Self::BestFit => "best_fit",
        }
    }
}

impl std::str::FromStr for PlacementPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first_fit" | "firstfit" | "first" => Ok(Self::FirstFit),
            "best_fit" | "bestfit" | "best" => Ok(Self::BestFit),
            _ => Err(format!(
                "Invalid placement policy '{}'. Valid: first_fit, best_fit",
                s
            )),
        }
    }
}

/// Why a process could not be placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Enough free memory in total, but no single region fits
    Fragmented,
    /// Not enough free memory even if it were contiguous
    InsufficientTotalMemory,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Fragmented => write!(f, "fragmented"),
            FailureReason::InsufficientTotalMemory => write!(f, "insufficient total memory"),
        }
    }
}

/// Allocation failure
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("Cannot place {requested} units ({reason}): {total_free} free in total, largest free region {largest_free}")]
pub struct AllocationFailure {
    pub reason: FailureReason,
    pub requested: Size,
    pub total_free: Size,
    pub largest_free: Size,
}

impl AllocationFailure {
    #[inline]
    pub fn is_fragmented(&self) -> bool {
        self.reason == FailureReason::Fragmented
    }
}

/// Successful placement: the new layout plus the partition now holding the process
#[derive(Debug, Clone)]
pub struct Allocation {
    pub layout: super::MemoryLayout,
    pub partition: PartitionId,
    pub position: Address,
    /// An exact-size free partition was reused instead of carving a new one
    pub reused: bool,
}

/// Broken structural invariant; indicates a simulator bug
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvariantViolation {
    #[error("Partitions {first} and {second} overlap")]
    Overlap {
        first: PartitionId,
        second: PartitionId,
    },

    #[error("Partition {id} ends at {end}, beyond total memory {total}")]
    OutOfBounds {
        id: PartitionId,
        end: Address,
        total: Size,
    },

    #[error("Partition {0} has zero size")]
    EmptyPartition(PartitionId),

    #[error("Process {process} requires zero memory units")]
    EmptyProcess { process: String },

    #[error("Partitions are not ordered by position at {0}")]
    Unordered(PartitionId),

    #[error("Partition id {0} appears more than once")]
    DuplicatePartitionId(PartitionId),

    #[error("Process {process} of size {size} does not fit partition {partition} of size {partition_size}")]
    ProcessExceedsPartition {
        process: String,
        size: Size,
        partition: PartitionId,
        partition_size: Size,
    },

    #[error("Process {process} references missing partition {partition}")]
    DanglingPartition {
        process: String,
        partition: PartitionId,
    },

    #[error("Partition {partition} is held by both {first} and {second}")]
    SharedPartition {
        partition: PartitionId,
        first: String,
        second: String,
    },

    #[error("Process {process} has {time} ticks left in state {state:?}")]
    TimeStateMismatch {
        process: String,
        state: ProcessState,
        time: u32,
    },

    #[error("Process {process} in state {state:?} has partition {partition:?}")]
    PartitionStateMismatch {
        process: String,
        state: ProcessState,
        partition: Option<PartitionId>,
    },

    #[error("Invalid state transition for {process}: {from:?} -> {to:?}")]
    InvalidTransition {
        process: String,
        from: ProcessState,
        to: ProcessState,
    },

    #[error("More than one process is running: {0:?}")]
    MultipleRunning(Vec<String>),
}

/// Snapshot of one partition at the end of an iteration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionLog {
    pub iteration: Iteration,
    pub position: Address,
    pub size: Size,
    #[serde(rename = "storagePartitionId")]
    pub storage_partition_id: PartitionId,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub occupied_by: Option<String>,
}

/// One process moved by a compaction pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactionLog {
    pub iteration: Iteration,
    pub partition: PartitionId,
    pub process: Process,
    pub previous_position: Address,
    pub final_position: Address,
}

impl CompactionLog {
    /// Distance the partition travelled toward address zero
    #[inline]
    pub fn displacement(&self) -> Size {
        self.previous_position - self.final_position
    }
}

/// One free partition absorbed into a merged partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CondensationLog {
    pub iteration: Iteration,
    pub partition: PartitionId,
    pub partition_size: Size,
    pub new_partition: PartitionId,
    pub new_partition_size: Size,
}

/// Memory statistics for a layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_memory: Size,
    pub used_memory: Size,
    pub free_memory: Size,
    pub largest_free_region: Size,
    pub free_regions: usize,
    pub partitions: usize,
    pub usage_percentage: f64,
}

impl MemoryStats {
    /// Share of free memory not reachable through the largest free region
    pub fn external_fragmentation(&self) -> f64 {
        if self.free_memory == 0 {
            0.0
        } else {
            1.0 - self.largest_free_region as f64 / self.free_memory as f64
        }
    }
}
