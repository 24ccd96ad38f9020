/*!
 * Compaction Tests
 * Relocation toward address zero, logging and idempotence
 */

use partition_sim::memory::{compact, MemoryLayout, Occupancy, Partition};
use partition_sim::{PartitionId, Process, ProcessState};
use pretty_assertions::assert_eq;

fn holder(pid: u32, name: &str, partition: u32, size: usize) -> Process {
    let mut process = Process::new(pid, name, 5, size);
    process.state = ProcessState::ReadyInPartition;
    process.partition = Some(PartitionId(partition));
    process
}

/// free #1 [0,40), P2 in #2 [40,70), P3 in #3 [70,90), gap [90,100)
fn fragmented() -> (MemoryLayout, Vec<Process>) {
    let layout = MemoryLayout::from_partitions(
        100,
        vec![
            Partition::new(PartitionId(1), 0, 40),
            Partition::new(PartitionId(2), 40, 30),
            Partition::new(PartitionId(3), 70, 20),
        ],
    );
    (layout, vec![holder(2, "P2", 2, 30), holder(3, "P3", 3, 20)])
}

#[test]
fn test_compaction_slides_partitions_down() {
    let (layout, processes) = fragmented();
    let occupancy = Occupancy::from_processes(&processes);

    let (compacted, logs) = compact(&layout, &occupancy, 3);

    assert_eq!(
        compacted.partitions(),
        &[
            Partition::new(PartitionId(2), 0, 30),
            Partition::new(PartitionId(3), 30, 20),
        ]
    );
    assert_eq!(compacted.gaps(), vec![(50, 50)]);

    let moves: Vec<_> = logs
        .iter()
        .map(|log| {
            (
                log.process.name.as_str(),
                log.partition,
                log.previous_position,
                log.final_position,
            )
        })
        .collect();
    assert_eq!(
        moves,
        vec![
            ("P2", PartitionId(2), 40, 0),
            ("P3", PartitionId(3), 70, 30),
        ]
    );
    assert!(logs.iter().all(|log| log.iteration == 3));
    assert_eq!(logs[0].displacement(), 40);
}

#[test]
fn test_compaction_is_idempotent() {
    let (layout, processes) = fragmented();
    let occupancy = Occupancy::from_processes(&processes);

    let (once, _) = compact(&layout, &occupancy, 1);
    let (twice, logs) = compact(&once, &occupancy, 2);

    assert_eq!(once, twice);
    assert!(logs.is_empty());
}

#[test]
fn test_compaction_preserves_memory_totals() {
    let (layout, processes) = fragmented();
    let occupancy = Occupancy::from_processes(&processes);

    let (compacted, _) = compact(&layout, &occupancy, 1);

    assert_eq!(compacted.occupied_size(&occupancy), layout.occupied_size(&occupancy));
    assert_eq!(compacted.free_size(&occupancy), layout.free_size(&occupancy));
    // The id counter survives so discarded ids are never reissued
    assert_eq!(compacted.next_id(), layout.next_id());
}

#[test]
fn test_already_compact_layout_emits_nothing() {
    let layout = MemoryLayout::from_partitions(
        50,
        vec![
            Partition::new(PartitionId(1), 0, 10),
            Partition::new(PartitionId(2), 10, 10),
        ],
    );
    let processes = vec![holder(1, "A", 1, 10), holder(2, "B", 2, 10)];
    let occupancy = Occupancy::from_processes(&processes);

    let (compacted, logs) = compact(&layout, &occupancy, 1);

    assert_eq!(compacted, layout);
    assert!(logs.is_empty());
}
