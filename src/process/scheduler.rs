/*!
 * Scheduling Policy
 * Which READY_IN_PARTITION process gets the CPU when it is idle
 */

use super::types::{Process, ProcessState};
use crate::core::types::Pid;
use serde::{Deserialize, Serialize};

/// Scheduling discipline
///
/// Non-preemptive: a running process keeps the CPU until it finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingPolicy {
    /// Longest waiting in its partition first, ties by admission order
    #[default]
    FirstComeFirstServed,
    /// Fewest remaining ticks first, ties as FCFS
    ShortestJobFirst,
}

impl SchedulingPolicy {
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FirstComeFirstServed => "fcfs",
            Self::ShortestJobFirst => "sjf",
        }
    }

    /// Choose among the READY_IN_PARTITION processes in `processes`
    pub fn select<'a, I>(&self, processes: I) -> Option<&'a Process>
    where
        I: IntoIterator<Item = &'a Process>,
    {
        let candidates = processes
            .into_iter()
            .filter(|p| p.state == ProcessState::ReadyInPartition);
        let waited = |p: &Process| p.placed_at.unwrap_or(u64::MAX);

        match self {
            Self::FirstComeFirstServed => candidates.min_by_key(|p| (waited(*p), p.pid)),
            Self::ShortestJobFirst => candidates.min_by_key(|p| (p.time, waited(*p), p.pid)),
        }
    }

    /// Convenience wrapper returning only the pid
    pub fn select_pid<'a, I>(&self, processes: I) -> Option<Pid>
    where
        I: IntoIterator<Item = &'a Process>,
    {
        self.select(processes).map(|p| p.pid)
    }
}

impl std::str::FromStr for SchedulingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fcfs" | "fifo" | "first_come_first_served" => Ok(Self::FirstComeFirstServed),
            "sjf" | "shortest_job_first" => Ok(Self::ShortestJobFirst),
            _ => Err(format!("Invalid scheduling policy '{}'. Valid: fcfs, sjf", s)),
        }
    }
}
