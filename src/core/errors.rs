/*!
 * Error Types
 * Crate-level error aggregation with thiserror and miette
 */

use miette::Diagnostic;
use thiserror::Error;

pub use crate::memory::{AllocationFailure, InvariantViolation};
pub use crate::process::AdmissionError;
pub use crate::simulation::{ConfigError, SimulationError};

/// Any error the simulator can surface to its caller
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(
        code(partition_sim::config),
        help("Check the configuration file and the PARTITION_SIM_* environment variables.")
    )]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(
        code(partition_sim::admission),
        help("Processes need a unique non-empty name, a positive time and a positive size.")
    )]
    Admission(#[from] AdmissionError),

    #[error(transparent)]
    #[diagnostic(
        code(partition_sim::simulation),
        help("The simulation state was left at the last valid iteration. This is a simulator bug.")
    )]
    Simulation(#[from] SimulationError),

    #[error("Failed to write output: {0}")]
    #[diagnostic(code(partition_sim::output))]
    Output(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<InvariantViolation> for Error {
    fn from(violation: InvariantViolation) -> Self {
        Error::Simulation(violation.into())
    }
}
