/*!
 * Property Tests
 * Layout and lifecycle invariants over random workloads
 */

use partition_sim::memory::{compact, Occupancy};
use partition_sim::{
    PlacementPolicy, Process, ProcessSpec, ProcessState, SchedulingPolicy, Simulation,
    SimulationConfig,
};
use proptest::prelude::*;

fn rank(state: ProcessState) -> u8 {
    match state {
        ProcessState::Ready => 0,
        ProcessState::ReadyInPartition => 1,
        ProcessState::Running => 2,
        ProcessState::Finished => 3,
    }
}

fn workload() -> impl Strategy<Value = (usize, Vec<(u32, usize)>)> {
    (20usize..120).prop_flat_map(|memory| {
        (
            Just(memory),
            prop::collection::vec((1u32..6, 1usize..=memory), 1..12),
        )
    })
}

fn policies() -> impl Strategy<Value = (PlacementPolicy, SchedulingPolicy, bool)> {
    (
        prop_oneof![Just(PlacementPolicy::FirstFit), Just(PlacementPolicy::BestFit)],
        prop_oneof![
            Just(SchedulingPolicy::FirstComeFirstServed),
            Just(SchedulingPolicy::ShortestJobFirst)
        ],
        any::<bool>(),
    )
}

fn simulation(
    memory: usize,
    jobs: &[(u32, usize)],
    (placement, scheduling, condense): (PlacementPolicy, SchedulingPolicy, bool),
) -> Simulation {
    let config = SimulationConfig::new(memory)
        .with_placement(placement)
        .with_scheduling(scheduling)
        .with_condensation(condense);
    let mut sim = Simulation::new(config);
    for (i, &(time, size)) in jobs.iter().enumerate() {
        sim.admit(ProcessSpec::new(format!("P{}", i + 1), time, size))
            .unwrap();
    }
    sim
}

proptest! {
    #[test]
    fn prop_layout_tiles_memory((memory, jobs) in workload(), policy in policies()) {
        let mut sim = simulation(memory, &jobs, policy);
        let total_time: u32 = jobs.iter().map(|(time, _)| time).sum();

        for _ in 0..total_time {
            prop_assert!(sim.step().is_ok());
            let layout = sim.layout();
            prop_assert!(layout.validate().is_ok());

            let partitioned: usize = layout.partitions().iter().map(|p| p.size).sum();
            let gaps: usize = layout.gaps().iter().map(|(_, size)| size).sum();
            prop_assert_eq!(partitioned + gaps, memory);
        }
    }

    #[test]
    fn prop_lifecycle_moves_forward((memory, jobs) in workload(), policy in policies()) {
        let mut sim = simulation(memory, &jobs, policy);
        let total_time: u32 = jobs.iter().map(|(time, _)| time).sum();

        for _ in 0..total_time {
            let before: Vec<Process> = sim.processes().to_vec();
            prop_assert!(sim.step().is_ok());

            let mut ticked = 0;
            for (old, new) in before.iter().zip(sim.processes()) {
                prop_assert!(rank(new.state) >= rank(old.state));
                if new.time != old.time {
                    prop_assert_eq!(new.time + 1, old.time);
                    prop_assert!(
                        new.state == ProcessState::Running || new.state == ProcessState::Finished
                    );
                    ticked += 1;
                }
            }
            prop_assert!(ticked <= 1);
        }
    }

    #[test]
    fn prop_workload_completes_without_idle_cpu((memory, jobs) in workload(), policy in policies()) {
        let mut sim = simulation(memory, &jobs, policy);
        let total_time: u64 = jobs.iter().map(|(time, _)| *time as u64).sum();

        let summary = sim.run(total_time).unwrap();

        prop_assert!(summary.completed);
        prop_assert_eq!(summary.iterations_run, total_time);
    }

    #[test]
    fn prop_compaction_preserves_occupied_sizes(
        (memory, jobs) in workload(),
        policy in policies(),
        steps in 0u32..8,
    ) {
        let mut sim = simulation(memory, &jobs, policy);
        for _ in 0..steps {
            prop_assert!(sim.step().is_ok());
        }

        let occupancy = Occupancy::from_processes(sim.processes());
        let layout = sim.layout();
        let occupied_sizes = |l: &partition_sim::MemoryLayout| {
            let mut sizes: Vec<usize> = l
                .partitions()
                .iter()
                .filter(|p| !occupancy.is_free(p.id))
                .map(|p| p.size)
                .collect();
            sizes.sort_unstable();
            sizes
        };

        let (once, logs) = compact(layout, &occupancy, 99);
        prop_assert!(once.validate().is_ok());
        prop_assert_eq!(occupied_sizes(&once), occupied_sizes(layout));
        prop_assert_eq!(once.occupied_size(&occupancy), layout.occupied_size(&occupancy));
        prop_assert!(logs.iter().all(|log| log.final_position <= log.previous_position));

        let (twice, again) = compact(&once, &occupancy, 100);
        prop_assert_eq!(&twice, &once);
        prop_assert!(again.is_empty());
    }
}
