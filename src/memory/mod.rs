/*!
 * Memory Module
 *
 * Variable-partition memory management for the simulator.
 *
 * ## Model
 *
 * - **Layout**: address-ordered partitions over `[0, total)`; uncovered
 *   ranges are gaps
 * - **Occupancy**: derived from process records, never stored on a partition
 * - **Allocation**: first-fit (default) or best-fit over free partitions and
 *   gaps; exact-size free partitions are reused, larger regions are split
 * - **Compaction**: occupied partitions slide to low addresses, free space
 *   becomes one region at the top
 * - **Condensation**: adjacent free partitions merge into one
 *
 * Every operation takes the layout by shared reference and returns a new
 * one; nothing in this module keeps state between calls.
 */

pub mod allocator;
pub mod compaction;
pub mod condensation;
pub mod layout;
pub mod occupancy;
pub mod types;

// Re-export for convenience
pub use allocator::allocate;
pub use compaction::compact;
pub use condensation::condense;
pub use layout::MemoryLayout;
pub use occupancy::Occupancy;
pub use types::*;
