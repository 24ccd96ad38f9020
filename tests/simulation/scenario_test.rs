/*!
 * Scenario Tests
 * End-to-end iterations through placement, compaction and completion
 */

use partition_sim::{
    FailureReason, Partition, PartitionId, ProcessSpec, ProcessState, Simulation,
    SimulationConfig,
};
use pretty_assertions::assert_eq;

fn state_of(sim: &Simulation, name: &str) -> ProcessState {
    sim.process(name).unwrap().state
}

#[test]
fn test_fragmentation_triggers_compaction() {
    let mut sim = Simulation::new(SimulationConfig::new(100));
    sim.admit_all(vec![
        ProcessSpec::new("P1", 2, 40),
        ProcessSpec::new("P2", 5, 30),
        ProcessSpec::new("P3", 5, 20),
    ])
    .unwrap();

    // Iteration 1: everything fits, P1 starts
    let first = sim.step().unwrap();
    assert_eq!(first.iteration, 1);
    let positions: Vec<_> = first
        .placements
        .iter()
        .map(|p| (p.process.as_str(), p.position))
        .collect();
    assert_eq!(positions, vec![("P1", 0), ("P2", 40), ("P3", 70)]);
    assert_eq!(sim.layout().gaps(), vec![(90, 10)]);
    assert_eq!(first.promoted.as_deref(), Some("P1"));
    assert_eq!(sim.process("P1").unwrap().time, 1);

    // Iteration 2: P1 finishes and frees [0,40)
    let second = sim.step().unwrap();
    let finished = second.finished.unwrap();
    assert_eq!(finished.name, "P1");
    assert_eq!(finished.partition, PartitionId(1));
    assert_eq!(state_of(&sim, "P1"), ProcessState::Finished);
    assert_eq!(sim.memory_stats().free_memory, 50);
    assert_eq!(sim.memory_stats().largest_free_region, 40);
    assert!((sim.memory_stats().external_fragmentation() - 0.2).abs() < 1e-9);

    // Iteration 3: P4 does not fit anywhere until memory is compacted
    sim.admit(ProcessSpec::new("P4", 3, 50)).unwrap();
    let third = sim.step().unwrap();

    assert!(third.compacted);
    assert!(third.deferred.is_empty());
    let moves: Vec<_> = third
        .compaction_logs
        .iter()
        .map(|log| (log.process.name.as_str(), log.previous_position, log.final_position))
        .collect();
    assert_eq!(moves, vec![("P2", 40, 0), ("P3", 70, 30)]);

    assert_eq!(third.placements.len(), 1);
    assert_eq!(third.placements[0].process, "P4");
    assert_eq!(third.placements[0].position, 50);
    assert_eq!(
        sim.layout().partitions(),
        &[
            Partition::new(PartitionId(2), 0, 30),
            Partition::new(PartitionId(3), 30, 20),
            Partition::new(PartitionId(4), 50, 50),
        ]
    );
    assert_eq!(third.promoted.as_deref(), Some("P2"));
    assert_eq!(sim.stats().compactions, 1);
    assert_eq!(sim.stats().relocations, 2);
}

#[test]
fn test_oversized_process_waits_without_compaction() {
    let mut sim = Simulation::new(SimulationConfig::new(100));
    sim.admit(ProcessSpec::new("BIG", 3, 150)).unwrap();

    for iteration in 1..=3 {
        let report = sim.step().unwrap();
        assert_eq!(report.iteration, iteration);
        assert!(!report.compacted);
        assert_eq!(report.deferred.len(), 1);
        assert_eq!(
            report.deferred[0].failure.reason,
            FailureReason::InsufficientTotalMemory
        );
        assert_eq!(state_of(&sim, "BIG"), ProcessState::Ready);
    }

    assert!(sim.is_stalled());
    assert_eq!(sim.stats().deferrals_insufficient, 3);
    assert_eq!(sim.logs().compaction_logs().count(), 0);
}

#[test]
fn test_run_stops_on_stall() {
    let mut sim = Simulation::new(SimulationConfig::new(100));
    sim.admit(ProcessSpec::new("BIG", 3, 150)).unwrap();

    let summary = sim.run(50).unwrap();

    assert!(summary.stalled);
    assert!(!summary.completed);
    assert_eq!(summary.iterations_run, 0);
}

#[test]
fn test_exact_fit_reuses_partition_after_wait() {
    let mut sim = Simulation::new(SimulationConfig::new(50));
    sim.admit_all(vec![ProcessSpec::new("A", 2, 30), ProcessSpec::new("B", 1, 30)])
        .unwrap();

    let first = sim.step().unwrap();
    assert_eq!(first.deferred[0].process, "B");
    assert_eq!(
        first.deferred[0].failure.reason,
        FailureReason::InsufficientTotalMemory
    );

    let second = sim.step().unwrap();
    assert_eq!(second.finished.unwrap().name, "A");

    // B takes over A's partition and runs its single tick immediately
    let third = sim.step().unwrap();
    assert_eq!(third.placements[0].partition, PartitionId(1));
    assert_eq!(third.promoted.as_deref(), Some("B"));
    assert_eq!(third.finished.unwrap().partition, PartitionId(1));
    assert!(sim.is_complete());
}

#[test]
fn test_finished_partitions_condense() {
    let mut sim = Simulation::new(SimulationConfig::new(30));
    sim.admit_all(vec![
        ProcessSpec::new("A", 1, 10),
        ProcessSpec::new("B", 2, 10),
        ProcessSpec::new("C", 5, 10),
    ])
    .unwrap();

    sim.step().unwrap();
    sim.step().unwrap();
    let third = sim.step().unwrap();

    assert_eq!(third.finished.unwrap().name, "B");
    let merged: Vec<_> = third
        .condensation_logs
        .iter()
        .map(|log| (log.partition, log.new_partition, log.new_partition_size))
        .collect();
    assert_eq!(
        merged,
        vec![
            (PartitionId(1), PartitionId(4), 20),
            (PartitionId(2), PartitionId(4), 20),
        ]
    );
    assert_eq!(
        sim.layout().partitions(),
        &[
            Partition::new(PartitionId(4), 0, 20),
            Partition::new(PartitionId(3), 20, 10),
        ]
    );
}

#[test]
fn test_condensation_can_be_disabled() {
    let config = SimulationConfig::new(30).with_condensation(false);
    let mut sim = Simulation::new(config);
    sim.admit_all(vec![
        ProcessSpec::new("A", 1, 10),
        ProcessSpec::new("B", 2, 10),
        ProcessSpec::new("C", 5, 10),
    ])
    .unwrap();

    for _ in 0..3 {
        sim.step().unwrap();
    }

    assert_eq!(sim.layout().len(), 3);
    assert_eq!(sim.logs().condensation_logs().count(), 0);
}

#[test]
fn test_every_iteration_logs_partitions_and_processes() {
    let mut sim = Simulation::new(SimulationConfig::new(100));
    sim.admit_all(vec![ProcessSpec::new("A", 2, 10), ProcessSpec::new("B", 1, 20)])
        .unwrap();

    let summary = sim.run(10).unwrap();

    assert!(summary.completed);
    assert_eq!(summary.iterations_run, 3);
    assert_eq!(summary.final_iteration, 3);
    assert_eq!(sim.logs().process_logs().count(), 6);
    assert_eq!(sim.logs().partitions_at(1).count(), 2);
    let finished: Vec<_> = sim.logs().finished_logs().map(|log| log.name.as_str()).collect();
    assert_eq!(finished, vec!["A", "B"]);
    assert_eq!(sim.stats().processes_finished, 2);
}

#[test]
fn test_demo_workload_completes() {
    let specs = vec![
        ProcessSpec::new("P1", 20, 10),
        ProcessSpec::new("P2", 6, 4),
        ProcessSpec::new("P3", 18, 9),
        ProcessSpec::new("P4", 4, 20),
        ProcessSpec::new("P5", 3, 10),
        ProcessSpec::new("P6", 12, 18),
        ProcessSpec::new("P7", 14, 17),
        ProcessSpec::new("P8", 8, 16),
        ProcessSpec::new("P9", 9, 1),
        ProcessSpec::new("P10", 10, 50),
    ];
    let total_time: u64 = specs.iter().map(|s| s.time as u64).sum();
    let mut sim = Simulation::new(SimulationConfig::default());
    sim.admit_all(specs).unwrap();

    let summary = sim.run_to_completion().unwrap();

    assert!(summary.completed);
    // The CPU is never idle while work remains
    assert_eq!(summary.iterations_run, total_time);
}
