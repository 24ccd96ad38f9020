/*!
 * Process Lifecycle
 *
 * The only place process state changes. Allowed transitions:
 *
 * ```text
 * READY -> READY_IN_PARTITION -> RUNNING -> FINISHED
 *                                  |  ^
 *                                  +--+  (one tick consumed)
 * ```
 */

use super::types::{Process, ProcessState};
use crate::core::types::{Iteration, PartitionId};
use crate::memory::{InvariantViolation, MemoryResult};
use tracing::{debug, info};

pub type LifecycleResult<T> = MemoryResult<T>;

#[inline]
pub const fn can_transition(from: ProcessState, to: ProcessState) -> bool {
    use ProcessState::*;
    matches!(
        (from, to),
        (Ready, ReadyInPartition)
            | (ReadyInPartition, Running)
            | (Running, Running)
            | (Running, Finished)
    )
}

fn transition(process: &mut Process, to: ProcessState) -> LifecycleResult<()> {
    if !can_transition(process.state, to) {
        return Err(InvariantViolation::InvalidTransition {
            process: process.name.clone(),
            from: process.state,
            to,
        });
    }
    process.state = to;
    Ok(())
}

/// READY → READY_IN_PARTITION
pub fn place(
    process: &mut Process,
    partition: PartitionId,
    iteration: Iteration,
) -> LifecycleResult<()> {
    transition(process, ProcessState::ReadyInPartition)?;
    process.partition = Some(partition);
    process.placed_at = Some(iteration);
    debug!(process = %process.name, partition = %partition, "Process placed in partition");
    Ok(())
}

/// READY_IN_PARTITION → RUNNING
pub fn start(process: &mut Process) -> LifecycleResult<()> {
    transition(process, ProcessState::Running)?;
    info!(process = %process.name, remaining = process.time, "Process started running");
    Ok(())
}

/// Consume one tick of a RUNNING process
///
/// Returns the partition the process gave back if it just finished.
pub fn tick(process: &mut Process) -> LifecycleResult<Option<PartitionId>> {
    if process.state != ProcessState::Running || process.time == 0 {
        return Err(InvariantViolation::TimeStateMismatch {
            process: process.name.clone(),
            state: process.state,
            time: process.time,
        });
    }

    process.time -= 1;
    if process.time > 0 {
        transition(process, ProcessState::Running)?;
        return Ok(None);
    }

    transition(process, ProcessState::Finished)?;
    let freed = process.partition.take();
    info!(process = %process.name, partition = ?freed, "Process finished");
    Ok(freed)
}
