/*!
 * Process Module
 * Process records, admission, lifecycle transitions and scheduling
 */

pub mod admission;
pub mod lifecycle;
pub mod scheduler;
pub mod types;

// Re-export for convenience
pub use scheduler::SchedulingPolicy;
pub use types::*;
