/*!
 * Partition Occupancy
 * Derived view of which live process holds which partition
 */

use crate::core::types::PartitionId;
use crate::process::{Process, ProcessState};
use std::collections::BTreeMap;

/// Partition → owning process, computed from process records
///
/// Finished processes never own a partition, even if their record still
/// carried one.
#[derive(Debug, Clone, Default)]
pub struct Occupancy<'a> {
    owners: BTreeMap<PartitionId, &'a Process>,
}

impl<'a> Occupancy<'a> {
    pub fn from_processes<I>(processes: I) -> Self
    where
        I: IntoIterator<Item = &'a Process>,
    {
        let owners = processes
            .into_iter()
            .filter(|p| p.state != ProcessState::Finished)
            .filter_map(|p| p.partition.map(|id| (id, p)))
            .collect();
        Self { owners }
    }

    #[inline]
    pub fn is_free(&self, partition: PartitionId) -> bool {
        !self.owners.contains_key(&partition)
    }

    #[inline]
    pub fn owner(&self, partition: PartitionId) -> Option<&'a Process> {
        self.owners.get(&partition).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
