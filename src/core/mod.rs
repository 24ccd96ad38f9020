/*!
 * Core Module
 * Shared types, limits and error aggregation
 */

pub mod errors;
pub mod limits;
pub mod types;

pub use errors::{Error, Result};
pub use types::*;
