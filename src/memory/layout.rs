/*!
 * Memory Layout
 * Address-ordered partition table over a fixed-size linear memory
 */

use super::occupancy::Occupancy;
use super::types::{
    FreeRegion, InvariantViolation, MemoryResult, MemoryStats, Partition, PartitionLog,
};
use crate::core::limits::FIRST_PARTITION_ID;
use crate::core::types::{Address, Iteration, PartitionId, Size};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Partition table of the simulated memory
///
/// Partitions are kept sorted by ascending position. Address ranges not
/// covered by any partition are gaps; together with the partitions they
/// tile `[0, total_size)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryLayout {
    total_size: Size,
    partitions: Vec<Partition>,
    next_id: u32,
}

impl MemoryLayout {
    /// Empty memory: a single gap spanning everything
    pub fn new(total_size: Size) -> Self {
        Self {
            total_size,
            partitions: Vec::new(),
            next_id: FIRST_PARTITION_ID,
        }
    }

    /// Rebuild a layout from a partition table, e.g. when replaying a snapshot
    ///
    /// The table is sorted but not validated; call [`MemoryLayout::validate`].
    pub fn from_partitions(total_size: Size, mut partitions: Vec<Partition>) -> Self {
        partitions.sort_by_key(|p| (p.position, p.id));
        let next_id = partitions
            .iter()
            .map(|p| p.id.get() + 1)
            .max()
            .unwrap_or(FIRST_PARTITION_ID)
            .max(FIRST_PARTITION_ID);
        Self {
            total_size,
            partitions,
            next_id,
        }
    }

    #[inline]
    pub fn total_size(&self) -> Size {
        self.total_size
    }

    #[inline]
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    pub fn partition(&self, id: PartitionId) -> Option<&Partition> {
        self.partitions.iter().find(|p| p.id == id)
    }

    /// Identifier the next created partition will receive
    #[inline]
    pub fn next_id(&self) -> PartitionId {
        PartitionId(self.next_id)
    }

    pub(crate) fn issue_id(&mut self) -> PartitionId {
        let id = PartitionId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn insert(&mut self, partition: Partition) {
        let at = self
            .partitions
            .partition_point(|p| p.position < partition.position);
        self.partitions.insert(at, partition);
    }

    pub(crate) fn remove(&mut self, id: PartitionId) -> Option<Partition> {
        let at = self.partitions.iter().position(|p| p.id == id)?;
        Some(self.partitions.remove(at))
    }

    /// Same total size and id counter, different partition table
    pub(crate) fn with_partitions(&self, partitions: Vec<Partition>) -> Self {
        Self {
            total_size: self.total_size,
            partitions,
            next_id: self.next_id,
        }
    }

    /// Address ranges covered by no partition, as `(position, size)`
    pub fn gaps(&self) -> Vec<(Address, Size)> {
        let mut gaps = Vec::new();
        let mut cursor = 0;
        for partition in &self.partitions {
            if partition.position > cursor {
                gaps.push((cursor, partition.position - cursor));
            }
            cursor = cursor.max(partition.end());
        }
        if cursor < self.total_size {
            gaps.push((cursor, self.total_size - cursor));
        }
        gaps
    }

    /// Free partitions and gaps in ascending address order
    pub fn free_regions(&self, occupancy: &Occupancy<'_>) -> Vec<FreeRegion> {
        let mut regions = Vec::new();
        let mut cursor = 0;
        for partition in &self.partitions {
            if partition.position > cursor {
                regions.push(FreeRegion::gap(cursor, partition.position - cursor));
            }
            if occupancy.is_free(partition.id) {
                regions.push(FreeRegion::partition(partition));
            }
            cursor = cursor.max(partition.end());
        }
        if cursor < self.total_size {
            regions.push(FreeRegion::gap(cursor, self.total_size - cursor));
        }
        regions
    }

    /// Memory held by partitions that some live process references
    pub fn occupied_size(&self, occupancy: &Occupancy<'_>) -> Size {
        self.partitions
            .iter()
            .filter(|p| !occupancy.is_free(p.id))
            .map(|p| p.size)
            .sum()
    }

    /// Free partitions plus gaps
    pub fn free_size(&self, occupancy: &Occupancy<'_>) -> Size {
        self.total_size.saturating_sub(self.occupied_size(occupancy))
    }

    pub fn stats(&self, occupancy: &Occupancy<'_>) -> MemoryStats {
        let regions = self.free_regions(occupancy);
        let used = self.occupied_size(occupancy);
        let free = self.total_size.saturating_sub(used);
        MemoryStats {
            total_memory: self.total_size,
            used_memory: used,
            free_memory: free,
            largest_free_region: regions.iter().map(|r| r.size).max().unwrap_or(0),
            free_regions: regions.len(),
            partitions: self.partitions.len(),
            usage_percentage: if self.total_size == 0 {
                0.0
            } else {
                used as f64 / self.total_size as f64 * 100.0
            },
        }
    }

    /// One [`PartitionLog`] per partition, occupied or free
    pub fn snapshot(&self, iteration: Iteration, occupancy: &Occupancy<'_>) -> Vec<PartitionLog> {
        self.partitions
            .iter()
            .map(|p| PartitionLog {
                iteration,
                position: p.position,
                size: p.size,
                storage_partition_id: p.id,
                occupied_by: occupancy.owner(p.id).map(|owner| owner.name.clone()),
            })
            .collect()
    }

    /// Check ordering, bounds, non-overlap and id uniqueness
    pub fn validate(&self) -> MemoryResult<()> {
        let mut seen = BTreeSet::new();
        let mut previous: Option<&Partition> = None;
        for partition in &self.partitions {
            if partition.size == 0 {
                return Err(InvariantViolation::EmptyPartition(partition.id));
            }
            if partition.end() > self.total_size {
                return Err(InvariantViolation::OutOfBounds {
                    id: partition.id,
                    end: partition.end(),
                    total: self.total_size,
                });
            }
            if !seen.insert(partition.id) {
                return Err(InvariantViolation::DuplicatePartitionId(partition.id));
            }
            if let Some(prev) = previous {
                if prev.overlaps(partition) {
                    return Err(InvariantViolation::Overlap {
                        first: prev.id,
                        second: partition.id,
                    });
                }
                if partition.position < prev.position {
                    return Err(InvariantViolation::Unordered(partition.id));
                }
            }
            previous = Some(partition);
        }
        Ok(())
    }
}
