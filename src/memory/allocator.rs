/*!
 * Partition Allocator
 * First-fit / best-fit placement of processes into free regions
 */

use super::layout::MemoryLayout;
use super::occupancy::Occupancy;
use super::types::{
    Allocation, AllocationFailure, AllocationResult, FailureReason, FreeRegion, Partition,
    PlacementPolicy,
};
use crate::core::types::Size;
use crate::process::Process;
use tracing::{debug, info};

impl PlacementPolicy {
    /// Pick a region that fits `size`, or `None`
    ///
    /// `regions` must be in ascending address order.
    pub fn select(&self, regions: &[FreeRegion], size: Size) -> Option<FreeRegion> {
        let mut fitting = regions.iter().filter(|r| r.size >= size);
        match self {
            PlacementPolicy::FirstFit => fitting.next().copied(),
            PlacementPolicy::BestFit => fitting.min_by_key(|r| (r.size, r.position)).copied(),
        }
    }
}

/// Place `process` in `layout`, returning the updated layout
///
/// The input layout is left untouched; the caller commits the returned one.
/// `process` must be READY with a non-zero size; the step engine rejects
/// zero-size processes as an invariant violation before calling this.
pub fn allocate(
    layout: &MemoryLayout,
    occupancy: &Occupancy<'_>,
    process: &Process,
    policy: PlacementPolicy,
) -> AllocationResult<Allocation> {
    let requested = process.size;
    let regions = layout.free_regions(occupancy);
    let total_free: Size = regions.iter().map(|r| r.size).sum();
    let largest_free = regions.iter().map(|r| r.size).max().unwrap_or(0);

    if total_free < requested {
        debug!(
            process = %process.name,
            requested,
            total_free,
            "Not enough free memory in total"
        );
        return Err(AllocationFailure {
            reason: FailureReason::InsufficientTotalMemory,
            requested,
            total_free,
            largest_free,
        });
    }

    let Some(region) = policy.select(&regions, requested) else {
        debug!(
            process = %process.name,
            requested,
            total_free,
            largest_free,
            regions = regions.len(),
            "Free memory is fragmented"
        );
        return Err(AllocationFailure {
            reason: FailureReason::Fragmented,
            requested,
            total_free,
            largest_free,
        });
    };

    let mut updated = layout.clone();
    let (partition, reused) = match region.partition {
        // Exact fit: the free partition keeps its identity
        Some(id) if region.size == requested => (id, true),
        Some(id) => {
            updated.remove(id);
            let occupied = Partition::new(updated.issue_id(), region.position, requested);
            let residual = Partition::new(
                updated.issue_id(),
                region.position + requested,
                region.size - requested,
            );
            debug!(
                split = %id,
                occupied = %occupied.id,
                residual = %residual.id,
                residual_size = residual.size,
                "Split free partition"
            );
            updated.insert(occupied);
            updated.insert(residual);
            (occupied.id, false)
        }
        None => {
            let occupied = Partition::new(updated.issue_id(), region.position, requested);
            updated.insert(occupied);
            (occupied.id, false)
        }
    };

    info!(
        process = %process.name,
        partition = %partition,
        position = region.position,
        size = requested,
        policy = policy.as_str(),
        reused,
        "Allocated partition"
    );

    Ok(Allocation {
        layout: updated,
        partition,
        position: region.position,
        reused,
    })
}
