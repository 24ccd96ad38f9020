/*!
 * Text Tables
 * Plain-text rendering of process and partition snapshots for the CLI
 */

use super::labels::StatusLabels;
use crate::core::limits::{MEMORY_MAP_MARKS, MEMORY_MAP_WIDTH};
use crate::memory::{CompactionLog, CondensationLog, PartitionLog};
use crate::process::{FinishedLog, Process};
use std::fmt::Write;

/// One row per process: name, state label, partition, remaining time, size
pub fn process_table(processes: &[Process], labels: &dyn StatusLabels) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:<20} {:>9} {:>6} {:>6}",
        "Process", "State", "Partition", "Time", "Size"
    );
    for process in processes {
        let partition = process
            .partition
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<10} {:<20} {:>9} {:>6} {:>6}",
            process.name,
            labels.label(process.state),
            partition,
            process.time,
            process.size
        );
    }
    out
}

/// One row per partition snapshot, in address order
pub fn partition_table(logs: &[PartitionLog]) -> String {
    let marks = holder_marks(logs);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>9} {:>8} {:>6} {:<4} {:<10}",
        "Partition", "Position", "Size", "Mark", "Holder"
    );
    for (log, mark) in logs.iter().zip(&marks) {
        let _ = writeln!(
            out,
            "{:>9} {:>8} {:>6} {:<4} {:<10}",
            log.storage_partition_id.to_string(),
            log.position,
            log.size,
            mark.unwrap_or('-'),
            log.occupied_by.as_deref().unwrap_or("free")
        );
    }
    out
}

/// Memory bar of at most [`MEMORY_MAP_WIDTH`] cells
///
/// Each cell shows what covers its first unit: the holder's mark from
/// [`partition_table`], `_` for a free partition or `.` for a gap. `logs`
/// must be in address order, as snapshots are.
pub fn memory_map(logs: &[PartitionLog], total_size: usize) -> String {
    let width = total_size.min(MEMORY_MAP_WIDTH);
    let marks = holder_marks(logs);
    (0..width)
        .map(|cell| {
            let unit = (cell as u128 * total_size as u128 / width as u128) as usize;
            let idx = logs.partition_point(|log| log.position + log.size <= unit);
            match logs.get(idx) {
                Some(log) if log.position <= unit => marks[idx].unwrap_or('_'),
                _ => '.',
            }
        })
        .collect()
}

/// One mark per occupied partition, cycling once the alphabet runs out
fn holder_marks(logs: &[PartitionLog]) -> Vec<Option<char>> {
    let mut marks = MEMORY_MAP_MARKS.chars().cycle();
    logs.iter()
        .map(|log| log.occupied_by.as_ref().and_then(|_| marks.next()))
        .collect()
}

pub fn event_lines(
    compactions: &[CompactionLog],
    condensations: &[CondensationLog],
    finished: Option<&FinishedLog>,
) -> String {
    let mut out = String::new();
    for log in compactions {
        let _ = writeln!(
            out,
            "  compaction: {} ({}) {} -> {}",
            log.process.name, log.partition, log.previous_position, log.final_position
        );
    }
    for log in condensations {
        let _ = writeln!(
            out,
            "  condensation: {} ({} units) -> {} ({} units)",
            log.partition, log.partition_size, log.new_partition, log.new_partition_size
        );
    }
    if let Some(log) = finished {
        let _ = writeln!(out, "  finished: {} released {}", log.name, log.partition);
    }
    out
}
