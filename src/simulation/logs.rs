/*!
 * Log Book
 * Append-only record streams, one per log kind
 */

use super::engine::StepReport;
use crate::core::types::Iteration;
use crate::memory::{CompactionLog, CondensationLog, PartitionLog};
use crate::process::{FinishedLog, ProcessLog};
use serde::{Deserialize, Serialize};

/// Accumulated logs of a simulation
///
/// Entries are appended in emission order and never rewritten. The
/// accessors hand out fresh iterators, so every stream can be replayed
/// from the start any number of times.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogBook {
    partitions: Vec<PartitionLog>,
    compactions: Vec<CompactionLog>,
    condensations: Vec<CondensationLog>,
    processes: Vec<ProcessLog>,
    finished: Vec<FinishedLog>,
}

impl LogBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, report: &StepReport) {
        self.partitions.extend(report.partition_logs.iter().cloned());
        self.compactions.extend(report.compaction_logs.iter().cloned());
        self.condensations
            .extend(report.condensation_logs.iter().cloned());
        self.processes.extend(report.process_logs.iter().cloned());
        self.finished.extend(report.finished.iter().cloned());
    }

    pub fn partition_logs(&self) -> impl Iterator<Item = &PartitionLog> {
        self.partitions.iter()
    }

    pub fn compaction_logs(&self) -> impl Iterator<Item = &CompactionLog> {
        self.compactions.iter()
    }

    pub fn condensation_logs(&self) -> impl Iterator<Item = &CondensationLog> {
        self.condensations.iter()
    }

    pub fn process_logs(&self) -> impl Iterator<Item = &ProcessLog> {
        self.processes.iter()
    }

    pub fn finished_logs(&self) -> impl Iterator<Item = &FinishedLog> {
        self.finished.iter()
    }

    /// Partition snapshot taken at the end of `iteration`
    pub fn partitions_at(&self, iteration: Iteration) -> impl Iterator<Item = &PartitionLog> {
        self.partitions
            .iter()
            .filter(move |log| log.iteration == iteration)
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
            && self.compactions.is_empty()
            && self.condensations.is_empty()
            && self.processes.is_empty()
            && self.finished.is_empty()
    }

    /// Hand the accumulated entries to the caller and start over empty
    pub fn take(&mut self) -> LogBook {
        std::mem::take(self)
    }
}
