/*!
 * Simulation State
 * The canonical process set and partition layout at one iteration
 */

use crate::core::types::{Iteration, Pid, Size};
use crate::memory::{MemoryLayout, MemoryStats, Occupancy};
use crate::process::{Process, ProcessSpec, ProcessState};
use ahash::RandomState;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct SimulationState {
    pub(crate) iteration: Iteration,
    /// Admission order
    pub(crate) processes: Vec<Process>,
    pub(crate) layout: MemoryLayout,
    pub(crate) next_pid: Pid,
    names: HashMap<String, usize, RandomState>,
}

impl SimulationState {
    pub fn new(memory_size: Size) -> Self {
        Self {
            iteration: 0,
            processes: Vec::new(),
            layout: MemoryLayout::new(memory_size),
            next_pid: 1,
            names: HashMap::default(),
        }
    }

    /// Reassemble a state from its parts without validating it
    pub fn from_parts(iteration: Iteration, processes: Vec<Process>, layout: MemoryLayout) -> Self {
        let next_pid = processes.iter().map(|p| p.pid + 1).max().unwrap_or(1);
        let mut state = Self {
            iteration,
            processes,
            layout,
            next_pid,
            names: HashMap::default(),
        };
        state.reindex();
        state
    }

    #[inline]
    pub fn iteration(&self) -> Iteration {
        self.iteration
    }

    #[inline]
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    #[inline]
    pub fn layout(&self) -> &MemoryLayout {
        &self.layout
    }

    pub fn process(&self, name: &str) -> Option<&Process> {
        self.names.get(name).map(|&idx| &self.processes[idx])
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn occupancy(&self) -> Occupancy<'_> {
        Occupancy::from_processes(&self.processes)
    }

    pub fn memory_stats(&self) -> MemoryStats {
        self.layout.stats(&self.occupancy())
    }

    pub fn running(&self) -> Option<&Process> {
        self.processes
            .iter()
            .find(|p| p.state == ProcessState::Running)
    }

    /// Every admitted process has finished
    pub fn is_complete(&self) -> bool {
        self.processes.iter().all(Process::is_finished)
    }

    /// Unfinished processes that can never fit, even in empty memory
    pub fn unplaceable(&self) -> impl Iterator<Item = &Process> {
        let total = self.layout.total_size();
        self.processes
            .iter()
            .filter(move |p| p.state == ProcessState::Ready && p.size > total)
    }

    pub(crate) fn push(&mut self, process: Process) {
        self.names.insert(process.name.clone(), self.processes.len());
        self.processes.push(process);
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<Process> {
        let idx = self.names.remove(name)?;
        let process = self.processes.remove(idx);
        self.reindex();
        Some(process)
    }

    /// Rewrite a queued process in place, keeping its pid and admission order
    pub(crate) fn replace(&mut self, name: &str, spec: &ProcessSpec) -> Option<&Process> {
        let idx = *self.names.get(name)?;
        let process = &mut self.processes[idx];
        let renamed = process.name != spec.name;
        process.name = spec.name.clone();
        process.time = spec.time;
        process.size = spec.size;
        if renamed {
            self.reindex();
        }
        Some(&self.processes[idx])
    }

    pub(crate) fn index_of(&self, pid: Pid) -> Option<usize> {
        self.processes.iter().position(|p| p.pid == pid)
    }

    fn reindex(&mut self) {
        self.names = self
            .processes
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.name.clone(), idx))
            .collect();
    }
}
