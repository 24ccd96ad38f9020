/*!
 * Compaction
 *
 * Slides every occupied partition toward address zero, in address order,
 * so that all free memory ends up as one region at the top of memory.
 * Free partitions are dropped: their space rejoins the unaddressed pool and
 * a later allocation carves a fresh partition out of it.
 */

use super::layout::MemoryLayout;
use super::occupancy::Occupancy;
use super::types::{CompactionLog, Partition};
use crate::core::types::Iteration;
use tracing::{debug, info};

/// Relayout `layout`, returning the compacted layout and one log per moved process
pub fn compact(
    layout: &MemoryLayout,
    occupancy: &Occupancy<'_>,
    iteration: Iteration,
) -> (MemoryLayout, Vec<CompactionLog>) {
    let mut cursor = 0;
    let mut partitions = Vec::with_capacity(occupancy.len());
    let mut logs = Vec::new();

    for partition in layout.partitions() {
        let Some(owner) = occupancy.owner(partition.id) else {
            debug!(partition = %partition.id, size = partition.size, "Discarding free partition");
            continue;
        };

        if partition.position != cursor {
            debug!(
                process = %owner.name,
                partition = %partition.id,
                from = partition.position,
                to = cursor,
                "Relocating partition"
            );
            logs.push(CompactionLog {
                iteration,
                partition: partition.id,
                process: owner.clone(),
                previous_position: partition.position,
                final_position: cursor,
            });
        }

        partitions.push(Partition {
            position: cursor,
            ..*partition
        });
        cursor += partition.size;
    }

    let discarded = layout.len() - partitions.len();
    if !logs.is_empty() || discarded > 0 {
        info!(
            iteration,
            moved = logs.len(),
            discarded,
            free_from = cursor,
            free_size = layout.total_size() - cursor,
            "Compaction complete"
        );
    }

    (layout.with_partitions(partitions), logs)
}
