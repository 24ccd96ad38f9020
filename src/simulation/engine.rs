/*!
 * Step Engine
 *
 * One iteration of the simulation as a pure function of the previous state:
 *
 * 1. Place READY processes in admission order (compact once on fragmentation)
 * 2. Promote a READY_IN_PARTITION process if the CPU is idle
 * 3. Tick the running process; free and condense on completion
 * 4. Snapshot partitions and processes
 *
 * The candidate state is validated before it is returned, so a caller that
 * only commits `Ok` outcomes never observes a broken state.
 */

use super::config::SimulationConfig;
use super::invariants::validate_state;
use super::state::SimulationState;
use super::SimulationResult;
use crate::core::types::{Address, Iteration, PartitionId};
use crate::memory::{
    allocate, compact, condense, Allocation, AllocationFailure, AllocationResult, CompactionLog,
    CondensationLog, InvariantViolation, Occupancy, PartitionLog,
};
use crate::process::lifecycle;
use crate::process::{FinishedLog, ProcessLog, ProcessState};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

/// A process that stayed READY this iteration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deferral {
    pub process: String,
    pub failure: AllocationFailure,
}

/// A process that received a partition this iteration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub process: String,
    pub partition: PartitionId,
    pub position: Address,
}

/// Everything one iteration emitted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub iteration: Iteration,
    pub placements: Vec<Placement>,
    pub deferred: Vec<Deferral>,
    pub compacted: bool,
    pub compaction_logs: Vec<CompactionLog>,
    pub promoted: Option<String>,
    pub finished: Option<FinishedLog>,
    pub condensation_logs: Vec<CondensationLog>,
    pub partition_logs: Vec<PartitionLog>,
    pub process_logs: Vec<ProcessLog>,
}

/// New state plus the report of the iteration that produced it
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub state: SimulationState,
    pub report: StepReport,
}

/// Advance `state` by one iteration
pub fn step(state: &SimulationState, config: &SimulationConfig) -> SimulationResult<StepOutcome> {
    let mut next = state.clone();
    next.iteration += 1;
    let iteration = next.iteration;

    let span = info_span!("iteration", iteration);
    let _guard = span.enter();

    let mut report = StepReport {
        iteration,
        ..StepReport::default()
    };

    place_ready(&mut next, config, &mut report)?;
    promote(&mut next, config, &mut report)?;
    run_tick(&mut next, config, &mut report)?;

    report.partition_logs = next.layout.snapshot(iteration, &next.occupancy());
    report.process_logs = next
        .processes
        .iter()
        .map(|p| ProcessLog::of(p, iteration))
        .collect();

    if let Err(violation) = validate_state(&next) {
        warn!(%violation, "Iteration produced an invalid state, discarding it");
        return Err(violation.into());
    }

    debug!(
        placed = report.placements.len(),
        deferred = report.deferred.len(),
        compacted = report.compacted,
        "Iteration complete"
    );

    Ok(StepOutcome {
        state: next,
        report,
    })
}

fn place_ready(
    next: &mut SimulationState,
    config: &SimulationConfig,
    report: &mut StepReport,
) -> SimulationResult<()> {
    let iteration = next.iteration;

    for idx in 0..next.processes.len() {
        if next.processes[idx].state != ProcessState::Ready {
            continue;
        }
        if next.processes[idx].size == 0 {
            return Err(InvariantViolation::EmptyProcess {
                process: next.processes[idx].name.clone(),
            }
            .into());
        }

        let mut attempt = try_allocate(next, idx, config);
        let fragmented = matches!(&attempt, Err(failure) if failure.is_fragmented());
        if fragmented && !report.compacted {
            info!(
                process = %next.processes[idx].name,
                requested = next.processes[idx].size,
                "Fragmented memory, compacting"
            );
            let (layout, logs) = compact(&next.layout, &next.occupancy(), iteration);
            next.layout = layout;
            report.compaction_logs = logs;
            report.compacted = true;
            attempt = try_allocate(next, idx, config);
        }

        match attempt {
            Ok(allocation) => {
                next.layout = allocation.layout;
                let process = &mut next.processes[idx];
                lifecycle::place(process, allocation.partition, iteration)?;
                report.placements.push(Placement {
                    process: process.name.clone(),
                    partition: allocation.partition,
                    position: allocation.position,
                });
            }
            Err(failure) => {
                let process = &next.processes[idx];
                if failure.is_fragmented() {
                    debug!(process = %process.name, %failure, "Placement deferred");
                } else {
                    warn!(process = %process.name, %failure, "Placement deferred");
                }
                report.deferred.push(Deferral {
                    process: process.name.clone(),
                    failure,
                });
            }
        }
    }

    Ok(())
}

fn try_allocate(
    next: &SimulationState,
    idx: usize,
    config: &SimulationConfig,
) -> AllocationResult<Allocation> {
    let occupancy = Occupancy::from_processes(&next.processes);
    allocate(&next.layout, &occupancy, &next.processes[idx], config.placement)
}

fn promote(
    next: &mut SimulationState,
    config: &SimulationConfig,
    report: &mut StepReport,
) -> SimulationResult<()> {
    if next.running().is_some() {
        return Ok(());
    }

    let Some(pid) = config.scheduling.select_pid(&next.processes) else {
        return Ok(());
    };
    let Some(idx) = next.index_of(pid) else {
        return Ok(());
    };

    let process = &mut next.processes[idx];
    lifecycle::start(process)?;
    debug!(process = %process.name, policy = config.scheduling.as_str(), "Promoted");
    report.promoted = Some(process.name.clone());
    Ok(())
}

fn run_tick(
    next: &mut SimulationState,
    config: &SimulationConfig,
    report: &mut StepReport,
) -> SimulationResult<()> {
    let iteration = next.iteration;
    let Some(idx) = next
        .processes
        .iter()
        .position(|p| p.state == ProcessState::Running)
    else {
        return Ok(());
    };

    let process = &mut next.processes[idx];
    let freed = lifecycle::tick(process)?;
    if !process.is_finished() {
        return Ok(());
    }

    let partition = freed.ok_or_else(|| InvariantViolation::PartitionStateMismatch {
        process: process.name.clone(),
        state: ProcessState::Running,
        partition: None,
    })?;
    report.finished = Some(FinishedLog {
        iteration,
        name: process.name.clone(),
        partition,
    });

    if config.condense_free_partitions {
        let (layout, logs) = condense(&next.layout, &next.occupancy(), iteration);
        next.layout = layout;
        report.condensation_logs = logs;
    }

    Ok(())
}
