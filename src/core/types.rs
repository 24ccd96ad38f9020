/*!
 * Core Types
 * Common types used across the simulator
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Admission sequence number of a process
pub type Pid = u32;

/// Offset in the simulated linear address space
pub type Address = usize;

/// Extent in memory units
pub type Size = usize;

/// Remaining execution burst, in iterations
pub type Ticks = u32;

/// Discrete simulation tick counter
pub type Iteration = u64;

/// Stable identity of a storage partition
///
/// Issued by [`crate::memory::MemoryLayout`] from a monotonically increasing
/// counter and never handed out twice within one simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartitionId(pub u32);

impl PartitionId {
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for PartitionId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}
