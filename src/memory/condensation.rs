/*!
 * Condensation
 * Merge runs of adjacent free partitions into a single fresh partition
 */

use super::layout::MemoryLayout;
use super::occupancy::Occupancy;
use super::types::{CondensationLog, Partition};
use crate::core::types::{Iteration, Size};
use tracing::info;

/// Merge every run of two or more address-adjacent free partitions
///
/// Gaps are left alone; only partitions that a finished process gave back
/// take part.
pub fn condense(
    layout: &MemoryLayout,
    occupancy: &Occupancy<'_>,
    iteration: Iteration,
) -> (MemoryLayout, Vec<CondensationLog>) {
    let partitions = layout.partitions();
    let mut updated = layout.clone();
    let mut logs = Vec::new();

    let mut start = 0;
    while start < partitions.len() {
        if !occupancy.is_free(partitions[start].id) {
            start += 1;
            continue;
        }

        let mut end = start + 1;
        while end < partitions.len()
            && occupancy.is_free(partitions[end].id)
            && partitions[end].position == partitions[end - 1].end()
        {
            end += 1;
        }

        let run = &partitions[start..end];
        if run.len() > 1 {
            let size: Size = run.iter().map(|p| p.size).sum();
            let merged = Partition::new(updated.issue_id(), run[0].position, size);
            for partition in run {
                updated.remove(partition.id);
                logs.push(CondensationLog {
                    iteration,
                    partition: partition.id,
                    partition_size: partition.size,
                    new_partition: merged.id,
                    new_partition_size: merged.size,
                });
            }
            updated.insert(merged);
            info!(
                iteration,
                merged = run.len(),
                partition = %merged.id,
                position = merged.position,
                size,
                "Condensed free partitions"
            );
        }

        start = end;
    }

    (updated, logs)
}
