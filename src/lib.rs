/*!
 * Partition Simulator Library
 *
 * Variable-partition memory management driven by a discrete process
 * lifecycle: first-fit / best-fit placement, compaction on fragmentation,
 * condensation of adjacent free partitions and append-only logs of every
 * iteration.
 */

pub mod core;
pub mod memory;
pub mod monitoring;
pub mod presentation;
pub mod process;
pub mod simulation;

// Re-exports
pub use crate::core::errors::{Error, Result};
pub use crate::core::types::{Address, Iteration, PartitionId, Pid, Size, Ticks};
pub use memory::{
    AllocationFailure, CompactionLog, CondensationLog, FailureReason, InvariantViolation,
    MemoryLayout, MemoryStats, Partition, PartitionLog, PlacementPolicy,
};
pub use monitoring::init_tracing;
pub use presentation::{EnglishLabels, Language, SpanishLabels, StatusLabels};
pub use process::{
    AdmissionError, FinishedLog, Process, ProcessLog, ProcessSpec, ProcessState, SchedulingPolicy,
};
pub use simulation::{
    load_processes, step, ConfigError, LogBook, RunSummary, Simulation, SimulationConfig,
    SimulationError, SimulationState, SimulationStats, StepOutcome, StepReport,
};
