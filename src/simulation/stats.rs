/*!
 * Simulation Statistics
 */

use super::engine::StepReport;
use crate::core::types::{Iteration, Size};
use crate::memory::FailureReason;
use serde::{Deserialize, Serialize};

/// Running counters over every committed iteration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub iterations: Iteration,
    pub placements: u64,
    pub compactions: u64,
    /// Processes moved across all compaction passes
    pub relocations: u64,
    /// Memory units moved across all compaction passes
    pub relocated_units: Size,
    pub condensations: u64,
    pub processes_finished: u64,
    pub deferrals_fragmented: u64,
    pub deferrals_insufficient: u64,
}

impl SimulationStats {
    pub fn record(&mut self, report: &StepReport) {
        self.iterations += 1;
        self.placements += report.placements.len() as u64;
        if report.compacted {
            self.compactions += 1;
        }
        self.relocations += report.compaction_logs.len() as u64;
        self.relocated_units += report
            .compaction_logs
            .iter()
            .map(|log| log.process.size)
            .sum::<Size>();
        self.condensations += report.condensation_logs.len() as u64;
        if report.finished.is_some() {
            self.processes_finished += 1;
        }
        for deferral in &report.deferred {
            match deferral.failure.reason {
                FailureReason::Fragmented => self.deferrals_fragmented += 1,
                FailureReason::InsufficientTotalMemory => self.deferrals_insufficient += 1,
            }
        }
    }
}
