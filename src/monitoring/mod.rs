/*!
 * Monitoring Module
 * Tracing setup for the simulator binary
 */

pub mod tracer;

pub use tracer::init_tracing;
