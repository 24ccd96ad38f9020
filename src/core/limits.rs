/*!
 * Simulator Limits and Constants
 *
 * Centralized location for defaults, environment variable names and
 * other magic numbers, grouped by domain.
 */

use super::types::{Iteration, Size};

// =============================================================================
// MEMORY
// =============================================================================

/// Default size of the simulated memory, in units
pub const DEFAULT_MEMORY_SIZE: Size = 50;

/// First identifier handed out by a fresh layout
pub const FIRST_PARTITION_ID: u32 = 1;

// =============================================================================
// SIMULATION
// =============================================================================

/// Upper bound on iterations for a single `run`
pub const DEFAULT_MAX_ITERATIONS: Iteration = 10_000;

/// Whether adjacent free partitions are merged after a process finishes
pub const DEFAULT_CONDENSE_FREE_PARTITIONS: bool = true;

// =============================================================================
// PRESENTATION
// =============================================================================

/// Widest memory bar the CLI prints; larger memories are scaled down
pub const MEMORY_MAP_WIDTH: usize = 64;

/// Holder marks, handed out to occupied partitions in address order
pub const MEMORY_MAP_MARKS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Overrides `SimulationConfig::memory_size`
pub const ENV_MEMORY_SIZE: &str = "PARTITION_SIM_MEMORY_SIZE";

/// Overrides `SimulationConfig::placement` (`first_fit` | `best_fit`)
pub const ENV_PLACEMENT: &str = "PARTITION_SIM_PLACEMENT";

/// Overrides `SimulationConfig::scheduling` (`fcfs` | `sjf`)
pub const ENV_SCHEDULING: &str = "PARTITION_SIM_SCHEDULING";

/// Switches tracing output to JSON when set to `1` or `true`
pub const ENV_TRACE_JSON: &str = "PARTITION_SIM_TRACE_JSON";
