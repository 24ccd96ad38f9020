/*!
 * Partition Simulator - Command Line Entry Point
 *
 * Loads a configuration and a batch of processes, runs the simulation to
 * completion and prints every iteration as text tables or the whole run as
 * JSON.
 */

use clap::Parser;
use partition_sim::presentation::table;
use partition_sim::{
    init_tracing, load_processes, Error, Iteration, Language, PlacementPolicy, ProcessSpec,
    SchedulingPolicy, Simulation, SimulationConfig, Size,
};
use std::path::PathBuf;
use tracing::info;

/// Variable-partition memory simulator with compaction
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON array of {"name", "time", "size"}; a demo workload is used if absent
    #[arg(short, long)]
    processes: Option<PathBuf>,

    /// Simulated memory size, in units
    #[arg(short, long)]
    memory_size: Option<Size>,

    /// Placement policy (first_fit | best_fit)
    #[arg(long)]
    placement: Option<PlacementPolicy>,

    /// Scheduling policy (fcfs | sjf)
    #[arg(long)]
    scheduling: Option<SchedulingPolicy>,

    /// Upper bound on iterations
    #[arg(long)]
    max_iterations: Option<Iteration>,

    /// Do not merge adjacent free partitions
    #[arg(long, default_value_t = false)]
    no_condense: bool,

    /// State labels (es | en)
    #[arg(short, long, default_value = "es")]
    labels: Language,

    /// Print the run as JSON instead of tables
    #[arg(long, default_value_t = false)]
    json: bool,
}

/// Built-in workload sized for the default 50-unit memory
fn demo_workload() -> Vec<ProcessSpec> {
    vec![
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
    ]
}

fn build_config(args: &Args) -> partition_sim::Result<SimulationConfig> {
    let base = match &args.config {
        Some(path) => SimulationConfig::from_file(path)?,
        None => SimulationConfig::default(),
    };
    let mut config = base.with_env_overrides()?;

    if let Some(memory_size) = args.memory_size {
        config.memory_size = memory_size;
    }
    if let Some(placement) = args.placement {
        config.placement = placement;
    }
    if let Some(scheduling) = args.scheduling {
        config.scheduling = scheduling;
    }
    if let Some(max_iterations) = args.max_iterations {
        config.max_iterations = max_iterations;
    }
    if args.no_condense {
        config.condense_free_partitions = false;
    }
    config.validate()?;
    Ok(config)
}

fn run(args: Args) -> partition_sim::Result<()> {
    let config = build_config(&args)?;
    let specs = match &args.processes {
        Some(path) => load_processes(path)?,
        None => demo_workload(),
    };

    let mut simulation = Simulation::new(config);
    simulation.admit_all(specs)?;

    if args.json {
        let summary = simulation.run_to_completion()?;
        let output = serde_json::json!({
            "config": simulation.config(),
            "summary": summary,
            "processes": simulation.processes(),
            "logs": simulation.logs(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let labels = args.labels.labels();
    let total = simulation.layout().total_size();
    let max_iterations = simulation.config().max_iterations;
    let mut iterations_run: Iteration = 0;

    while iterations_run < max_iterations && !simulation.is_complete() && !simulation.is_stalled() {
        let report = simulation.step()?;
        iterations_run += 1;

        println!("== Iteration {} ==", report.iteration);
        print!("{}", table::process_table(simulation.processes(), labels));
        print!("{}", table::partition_table(&report.partition_logs));
        println!("[{}]", table::memory_map(&report.partition_logs, total));
        print!(
            "{}",
            table::event_lines(
                &report.compaction_logs,
                &report.condensation_logs,
                report.finished.as_ref()
            )
        );
        for deferral in &report.deferred {
            println!("  waiting: {} ({})", deferral.process, deferral.failure.reason);
        }
        println!();
    }

    let stats = simulation.stats();
    let memory = simulation.memory_stats();
    info!(
        iterations = stats.iterations,
        compactions = stats.compactions,
        relocations = stats.relocations,
        condensations = stats.condensations,
        finished = stats.processes_finished,
        "Simulation finished"
    );
    println!(
        "Memory: {}/{} units used, largest free region {}, external fragmentation {:.1}%",
        memory.used_memory,
        memory.total_memory,
        memory.largest_free_region,
        memory.external_fragmentation() * 100.0
    );
    if simulation.is_stalled() {
        println!("Stalled: remaining processes are larger than memory ({} units)", total);
    } else if !simulation.is_complete() {
        println!("Stopped after {} iterations", iterations_run);
    }
    Ok(())
}

fn main() -> miette::Result<()> {
    init_tracing();
    let args = Args::parse();
    run(args).map_err(|err: Error| miette::Report::new(err))?;
    Ok(())
}
