/*!
 * Simulation Module
 *
 * Owns the canonical state and advances it one iteration at a time.
 *
 * [`step`] is a pure function from one state to the next; [`Simulation`]
 * wraps it with admission, log accumulation and run-to-completion, and only
 * commits a step that passed validation.
 */

pub mod config;
pub mod engine;
pub mod invariants;
pub mod logs;
pub mod state;
pub mod stats;

pub use config::{load_processes, ConfigError, ConfigResult, SimulationConfig};
pub use engine::{step, Deferral, Placement, StepOutcome, StepReport};
pub use logs::LogBook;
pub use state::SimulationState;
pub use stats::SimulationStats;

use crate::core::types::{Iteration, Pid, Size};
use crate::memory::{InvariantViolation, MemoryLayout, MemoryStats};
use crate::process::admission;
use crate::process::{AdmissionError, AdmissionResult, Process, ProcessSpec, ProcessState};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

pub type SimulationResult<T> = Result<T, SimulationError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("Invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),

    #[error("Configured memory size {configured} does not match layout size {layout}")]
    MemoryMismatch { configured: Size, layout: Size },
}

/// Outcome of [`Simulation::run`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub iterations_run: Iteration,
    pub final_iteration: Iteration,
    /// Every admitted process finished
    pub completed: bool,
    /// Only processes larger than the whole memory remain
    pub stalled: bool,
    pub stats: SimulationStats,
}

/// Stepping simulator with its accumulated logs
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    state: SimulationState,
    logs: LogBook,
    stats: SimulationStats,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Self {
        let state = SimulationState::new(config.memory_size);
        info!(
            memory_size = config.memory_size,
            placement = config.placement.as_str(),
            scheduling = config.scheduling.as_str(),
            "Simulation created"
        );
        Self {
            config,
            state,
            logs: LogBook::new(),
            stats: SimulationStats::default(),
        }
    }

    /// Continue from a previously captured state, after validating it
    pub fn resume(config: SimulationConfig, state: SimulationState) -> SimulationResult<Self> {
        if config.memory_size != state.layout().total_size() {
            return Err(SimulationError::MemoryMismatch {
                configured: config.memory_size,
                layout: state.layout().total_size(),
            });
        }
        invariants::validate_state(&state)?;
        Ok(Self {
            config,
            state,
            logs: LogBook::new(),
            stats: SimulationStats::default(),
        })
    }

    /// Add a READY process, returning its pid
    pub fn admit(&mut self, spec: ProcessSpec) -> AdmissionResult<Pid> {
        admission::validate(&spec, |name| self.state.contains(name))?;

        let pid = self.state.next_pid;
        self.state.next_pid += 1;
        let process = Process::new(pid, spec.name.trim(), spec.time, spec.size)
            .admitted_at(self.state.iteration);

        if process.size > self.state.layout().total_size() {
            warn!(
                process = %process.name,
                size = process.size,
                memory = self.state.layout().total_size(),
                "Process is larger than memory and will never be placed"
            );
        }
        info!(
            pid,
            process = %process.name,
            time = process.time,
            size = process.size,
            "Process admitted"
        );

        self.state.push(process);
        Ok(pid)
    }

    /// Admit a batch in order, stopping at the first rejected spec
    pub fn admit_all<I>(&mut self, specs: I) -> AdmissionResult<Vec<Pid>>
    where
        I: IntoIterator<Item = ProcessSpec>,
    {
        specs.into_iter().map(|spec| self.admit(spec)).collect()
    }

    /// Remove a process that never received a partition
    pub fn withdraw(&mut self, name: &str) -> AdmissionResult<Process> {
        let name = name.trim();
        let process = self
            .state
            .process(name)
            .ok_or_else(|| AdmissionError::UnknownProcess(name.to_string()))?;

        if process.state != ProcessState::Ready {
            return Err(AdmissionError::NotWithdrawable {
                name: name.to_string(),
                state: process.state,
            });
        }

        let removed = self
            .state
            .remove(name)
            .ok_or_else(|| AdmissionError::UnknownProcess(name.to_string()))?;
        info!(process = %removed.name, "Process withdrawn");
        Ok(removed)
    }

    /// Edit name, time and size of a process that never received a partition
    ///
    /// The new name may equal the current one; it must not collide with any
    /// other admitted process.
    pub fn update(&mut self, name: &str, spec: ProcessSpec) -> AdmissionResult<()> {
        let name = name.trim();
        let process = self
            .state
            .process(name)
            .ok_or_else(|| AdmissionError::UnknownProcess(name.to_string()))?;

        if process.state != ProcessState::Ready {
            return Err(AdmissionError::NotEditable {
                name: name.to_string(),
                state: process.state,
            });
        }

        admission::validate(&spec, |candidate| {
            candidate != name && self.state.contains(candidate)
        })?;

        let spec = ProcessSpec::new(spec.name.trim(), spec.time, spec.size);
        let updated = self
            .state
            .replace(name, &spec)
            .ok_or_else(|| AdmissionError::UnknownProcess(name.to_string()))?;
        info!(
            previous = name,
            process = %updated.name,
            time = updated.time,
            size = updated.size,
            "Process updated"
        );
        Ok(())
    }

    /// Advance one iteration, committing it only if it produced a valid state
    pub fn step(&mut self) -> SimulationResult<StepReport> {
        let StepOutcome { state, report } = step(&self.state, &self.config)?;
        self.state = state;
        self.logs.record(&report);
        self.stats.record(&report);
        Ok(report)
    }

    /// Step until every process finished, the rest can never fit, or
    /// `max_iterations` steps were taken
    pub fn run(&mut self, max_iterations: Iteration) -> SimulationResult<RunSummary> {
        let mut iterations_run = 0;
        while iterations_run < max_iterations && !self.is_complete() && !self.is_stalled() {
            self.step()?;
            iterations_run += 1;
        }

        let summary = RunSummary {
            iterations_run,
            final_iteration: self.state.iteration(),
            completed: self.is_complete(),
            stalled: self.is_stalled(),
            stats: self.stats.clone(),
        };

        if summary.stalled {
            let stuck: Vec<&str> = self.state.unplaceable().map(|p| p.name.as_str()).collect();
            warn!(?stuck, "Simulation stalled on processes larger than memory");
        } else if !summary.completed {
            warn!(iterations_run, "Iteration cap reached before completion");
        } else {
            info!(iterations_run, "All processes finished");
        }
        Ok(summary)
    }

    /// [`Simulation::run`] bounded by the configured iteration cap
    pub fn run_to_completion(&mut self) -> SimulationResult<RunSummary> {
        self.run(self.config.max_iterations)
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    /// Nothing can make progress: every unfinished process is READY and
    /// larger than the whole memory
    pub fn is_stalled(&self) -> bool {
        let mut alive = self
            .state
            .processes()
            .iter()
            .filter(|p| p.state.is_alive())
            .peekable();
        alive.peek().is_some()
            && alive.all(|p| {
                p.state == ProcessState::Ready && p.size > self.state.layout().total_size()
            })
    }

    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    #[inline]
    pub fn iteration(&self) -> Iteration {
        self.state.iteration()
    }

    #[inline]
    pub fn processes(&self) -> &[Process] {
        self.state.processes()
    }

    pub fn process(&self, name: &str) -> Option<&Process> {
        self.state.process(name)
    }

    #[inline]
    pub fn layout(&self) -> &MemoryLayout {
        self.state.layout()
    }

    pub fn memory_stats(&self) -> MemoryStats {
        self.state.memory_stats()
    }

    #[inline]
    pub fn logs(&self) -> &LogBook {
        &self.logs
    }

    /// Drain accumulated logs, e.g. after persisting them
    pub fn take_logs(&mut self) -> LogBook {
        self.logs.take()
    }

    #[inline]
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }
}
