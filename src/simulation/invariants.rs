/*!
 * State Invariants
 * Structural checks run on every candidate state before it is committed
 */

use super::state::SimulationState;
use crate::core::types::PartitionId;
use crate::memory::{InvariantViolation, MemoryResult};
use crate::process::ProcessState;
use std::collections::BTreeMap;

/// Validate layout and process records together
///
/// Checks, in order: the layout itself, then for every process a non-zero
/// size, the time/state and partition/state pairing, the partition it references
/// (present, large enough, not shared), and finally that at most one
/// process is running.
pub fn validate_state(state: &SimulationState) -> MemoryResult<()> {
    let layout = state.layout();
    layout.validate()?;

    let mut holders: BTreeMap<PartitionId, &str> = BTreeMap::new();
    let mut running = Vec::new();

    for process in state.processes() {
        if process.size == 0 {
            return Err(InvariantViolation::EmptyProcess {
                process: process.name.clone(),
            });
        }

        let finished = process.state == ProcessState::Finished;
        if finished != (process.time == 0) {
            return Err(InvariantViolation::TimeStateMismatch {
                process: process.name.clone(),
                state: process.state,
                time: process.time,
            });
        }

        if process.state.holds_partition() != process.partition.is_some() {
            return Err(InvariantViolation::PartitionStateMismatch {
                process: process.name.clone(),
                state: process.state,
                partition: process.partition,
            });
        }

        if let Some(id) = process.partition {
            let partition =
                layout
                    .partition(id)
                    .ok_or_else(|| InvariantViolation::DanglingPartition {
                        process: process.name.clone(),
                        partition: id,
                    })?;

            if process.size > partition.size {
                return Err(InvariantViolation::ProcessExceedsPartition {
                    process: process.name.clone(),
                    size: process.size,
                    partition: id,
                    partition_size: partition.size,
                });
            }

            if let Some(first) = holders.insert(id, &process.name) {
                return Err(InvariantViolation::SharedPartition {
                    partition: id,
                    first: first.to_string(),
                    second: process.name.clone(),
                });
            }
        }

        if process.state == ProcessState::Running {
            running.push(process.name.clone());
        }
    }

    if running.len() > 1 {
        return Err(InvariantViolation::MultipleRunning(running));
    }

    Ok(())
}
