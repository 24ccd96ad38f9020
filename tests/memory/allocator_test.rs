/*!
 * Allocator Tests
 * First-fit / best-fit placement over free partitions and gaps
 */

use partition_sim::memory::{
    allocate, FailureReason, MemoryLayout, Occupancy, Partition, PlacementPolicy,
};
use partition_sim::{PartitionId, Process, ProcessState};
use pretty_assertions::assert_eq;

fn holder(pid: u32, name: &str, partition: u32, size: usize) -> Process {
    let mut process = Process::new(pid, name, 5, size);
    process.state = ProcessState::ReadyInPartition;
    process.partition = Some(PartitionId(partition));
    process
}

fn layout(total: usize, parts: &[(u32, usize, usize)]) -> MemoryLayout {
    MemoryLayout::from_partitions(
        total,
        parts
            .iter()
            .map(|&(id, position, size)| Partition::new(PartitionId(id), position, size))
            .collect(),
    )
}

#[test]
fn test_first_allocation_carves_from_gap() {
    let layout = MemoryLayout::new(100);
    let processes: Vec<Process> = vec![];
    let occupancy = Occupancy::from_processes(&processes);
    let p1 = Process::new(1, "P1", 3, 40);

    let allocation = allocate(&layout, &occupancy, &p1, PlacementPolicy::FirstFit).unwrap();

    assert_eq!(allocation.partition, PartitionId(1));
    assert_eq!(allocation.position, 0);
    assert!(!allocation.reused);
    assert_eq!(
        allocation.layout.partitions(),
        &[Partition::new(PartitionId(1), 0, 40)]
    );
    assert_eq!(allocation.layout.gaps(), vec![(40, 60)]);
    // Input layout untouched
    assert!(layout.is_empty());
}

#[test]
fn test_exact_fit_reuses_free_partition() {
    let layout = layout(100, &[(1, 0, 40), (2, 40, 30)]);
    let processes = vec![holder(2, "P2", 2, 30)];
    let occupancy = Occupancy::from_processes(&processes);
    let p4 = Process::new(4, "P4", 3, 40);

    let allocation = allocate(&layout, &occupancy, &p4, PlacementPolicy::FirstFit).unwrap();

    assert_eq!(allocation.partition, PartitionId(1));
    assert!(allocation.reused);
    assert_eq!(allocation.layout, layout);
}

#[test]
fn test_splitting_free_partition_issues_fresh_ids() {
    let layout = layout(100, &[(1, 0, 40), (2, 40, 30)]);
    let processes = vec![holder(2, "P2", 2, 30)];
    let occupancy = Occupancy::from_processes(&processes);
    let p4 = Process::new(4, "P4", 3, 30);

    let allocation = allocate(&layout, &occupancy, &p4, PlacementPolicy::FirstFit).unwrap();

    assert_eq!(allocation.partition, PartitionId(3));
    assert_eq!(
        allocation.layout.partitions(),
        &[
            Partition::new(PartitionId(3), 0, 30),
            Partition::new(PartitionId(4), 30, 10),
            Partition::new(PartitionId(2), 40, 30),
        ]
    );
    assert!(allocation.layout.partition(PartitionId(1)).is_none());
    assert!(allocation.layout.validate().is_ok());
}

#[test]
fn test_first_fit_and_best_fit_choose_differently() {
    // free #1 [0,40), held #2 [40,50), free #3 [50,70), held #4 [70,100)
    let layout = layout(100, &[(1, 0, 40), (2, 40, 10), (3, 50, 20), (4, 70, 30)]);
    let processes = vec![holder(1, "A", 2, 10), holder(2, "B", 4, 30)];
    let occupancy = Occupancy::from_processes(&processes);
    let p = Process::new(3, "C", 2, 15);

    let first = allocate(&layout, &occupancy, &p, PlacementPolicy::FirstFit).unwrap();
    let best = allocate(&layout, &occupancy, &p, PlacementPolicy::BestFit).unwrap();

    assert_eq!(first.position, 0);
    assert_eq!(best.position, 50);
}

#[test]
fn test_best_fit_ties_break_by_lowest_address() {
    let layout = layout(100, &[(1, 0, 20), (2, 20, 10), (3, 30, 20), (4, 50, 50)]);
    let processes = vec![holder(1, "A", 2, 10), holder(2, "B", 4, 50)];
    let occupancy = Occupancy::from_processes(&processes);
    let p = Process::new(3, "C", 2, 20);

    let best = allocate(&layout, &occupancy, &p, PlacementPolicy::BestFit).unwrap();

    assert_eq!(best.partition, PartitionId(1));
    assert!(best.reused);
}

#[test]
fn test_insufficient_total_memory() {
    let layout = MemoryLayout::new(100);
    let processes: Vec<Process> = vec![];
    let occupancy = Occupancy::from_processes(&processes);
    let big = Process::new(1, "BIG", 3, 150);

    let failure = allocate(&layout, &occupancy, &big, PlacementPolicy::FirstFit).unwrap_err();

    assert_eq!(failure.reason, FailureReason::InsufficientTotalMemory);
    assert_eq!(failure.total_free, 100);
    assert_eq!(failure.largest_free, 100);
    assert!(!failure.is_fragmented());
}

#[test]
fn test_fragmented_when_no_region_fits() {
    // free #1 [0,40), held [40,70) and [70,90), gap [90,100)
    let layout = layout(100, &[(1, 0, 40), (2, 40, 30), (3, 70, 20)]);
    let processes = vec![holder(2, "P2", 2, 30), holder(3, "P3", 3, 20)];
    let occupancy = Occupancy::from_processes(&processes);
    let p4 = Process::new(4, "P4", 3, 50);

    let failure = allocate(&layout, &occupancy, &p4, PlacementPolicy::FirstFit).unwrap_err();

    assert_eq!(failure.reason, FailureReason::Fragmented);
    assert_eq!(failure.requested, 50);
    assert_eq!(failure.total_free, 50);
    assert_eq!(failure.largest_free, 40);
}

#[test]
fn test_finished_process_does_not_occupy() {
    let layout = layout(50, &[(1, 0, 50)]);
    let mut done = holder(1, "DONE", 1, 50);
    done.state = ProcessState::Finished;
    done.time = 0;
    let processes = vec![done];
    let occupancy = Occupancy::from_processes(&processes);

    assert!(occupancy.is_free(PartitionId(1)));
    let next = Process::new(2, "NEXT", 1, 50);
    let allocation = allocate(&layout, &occupancy, &next, PlacementPolicy::FirstFit).unwrap();
    assert_eq!(allocation.partition, PartitionId(1));
}
