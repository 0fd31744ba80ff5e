//! A passive recorder of primitive operation counts and wall-clock time.
//!
//! The tracker has no idea which algorithm drives it: the algorithm calls
//! the `increment_*`/`add_*` methods as it works and brackets a run with
//! [`OperationTracker::start_timer`] and [`OperationTracker::stop_timer`].
//! Finished runs can be recorded as [`MetricsSnapshot`]s and exported as CSV.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use log::debug;
use mem_dbg::*;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// First line of every exported metrics file.
pub const CSV_HEADER: &str =
    "InputSize,Comparisons,Swaps,ArrayAccesses,MemoryAllocations,ExecutionTime(ns)";

const CSV_FIELDS: usize = 6;

/// Two-state wall-clock timer.
///
/// `Idle` carries the last captured interval, `Running` the instant the
/// current interval started. Starting a running timer restarts it and
/// stopping an idle one does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    Idle { last: Duration },
    Running { start: Instant },
}

impl Default for Timer {
    fn default() -> Self {
        Timer::Idle {
            last: Duration::ZERO,
        }
    }
}

impl Timer {
    #[inline]
    pub fn start(&mut self) {
        *self = Timer::Running {
            start: Instant::now(),
        };
    }

    #[inline]
    pub fn stop(&mut self) {
        if let Timer::Running { start } = *self {
            *self = Timer::Idle {
                last: start.elapsed(),
            };
        }
    }

    /// Returns the time elapsed so far if running, the last captured
    /// interval otherwise.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        match *self {
            Timer::Idle { last } => last,
            Timer::Running { start } => start.elapsed(),
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self, Timer::Running { .. })
    }
}

/// Point-in-time copy of the tracker counters.
#[derive(
    Debug, Default, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash, MemSize, MemDbg,
)]
pub struct MetricsSnapshot {
    pub input_size: usize,
    pub comparisons: u64,
    pub swaps: u64,
    pub array_accesses: u64,
    pub memory_allocations: u64,
    pub execution_time_ns: u64,
}

impl MetricsSnapshot {
    fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.input_size,
            self.comparisons,
            self.swaps,
            self.array_accesses,
            self.memory_allocations,
            self.execution_time_ns
        )
    }

    /// Parses one data row of an exported file. `line` is 1-based and only
    /// used for error reporting.
    fn from_csv_row(row: &str, line: usize) -> Result<Self> {
        let fields: Vec<&str> = row.split(',').map(str::trim).collect();
        if fields.len() != CSV_FIELDS {
            return Err(Error::Parse {
                line,
                reason: format!("expected {CSV_FIELDS} fields, found {}", fields.len()),
            });
        }

        let number = |i: usize| -> Result<u64> {
            fields[i].parse::<u64>().map_err(|e| Error::Parse {
                line,
                reason: format!("field {} ({:?}): {e}", i + 1, fields[i]),
            })
        };

        let input_size = fields[0].parse::<usize>().map_err(|e| Error::Parse {
            line,
            reason: format!("field 1 ({:?}): {e}", fields[0]),
        })?;

        Ok(Self {
            input_size,
            comparisons: number(1)?,
            swaps: number(2)?,
            array_accesses: number(3)?,
            memory_allocations: number(4)?,
            execution_time_ns: number(5)?,
        })
    }
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={}: comparisons={}, swaps={}, accesses={}, time={}ns",
            self.input_size,
            self.comparisons,
            self.swaps,
            self.array_accesses,
            self.execution_time_ns
        )
    }
}

/// Counters and timer for one measurement at a time, plus an
/// insertion-ordered history of snapshots.
///
/// A tracker is not synchronized. Concurrent measurements need one tracker
/// each.
///
/// # Examples
/// ```
/// use majority::OperationTracker;
///
/// let mut tracker = OperationTracker::new();
/// tracker.start_timer();
/// tracker.add_comparisons(3);
/// tracker.increment_array_accesses();
/// tracker.stop_timer();
/// tracker.save_snapshot(1);
///
/// assert_eq!(tracker.comparisons(), 3);
/// assert_eq!(tracker.snapshots()[0].array_accesses, 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct OperationTracker {
    comparisons: u64,
    swaps: u64,
    array_accesses: u64,
    memory_allocations: u64,
    timer: Timer,
    snapshots: Vec<MetricsSnapshot>,
}

impl OperationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zeroes every counter and discards any timing, in flight or captured.
    /// The snapshot history is kept.
    pub fn reset(&mut self) {
        self.comparisons = 0;
        self.swaps = 0;
        self.array_accesses = 0;
        self.memory_allocations = 0;
        self.timer = Timer::default();
    }

    #[inline]
    pub fn start_timer(&mut self) {
        self.timer.start();
    }

    #[inline]
    pub fn stop_timer(&mut self) {
        self.timer.stop();
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Live elapsed time while the timer runs, the last captured interval
    /// otherwise.
    #[inline]
    pub fn execution_time(&self) -> Duration {
        self.timer.elapsed()
    }

    /// [`Self::execution_time`] in nanoseconds, saturating at `u64::MAX`.
    #[inline]
    pub fn execution_time_ns(&self) -> u64 {
        u64::try_from(self.execution_time().as_nanos()).unwrap_or(u64::MAX)
    }

    #[inline]
    pub fn execution_time_ms(&self) -> f64 {
        self.execution_time().as_secs_f64() * 1_000.0
    }

    #[inline]
    pub fn increment_comparisons(&mut self) {
        self.comparisons += 1;
    }

    #[inline]
    pub fn add_comparisons(&mut self, n: u64) {
        self.comparisons += n;
    }

    #[inline]
    pub fn increment_array_accesses(&mut self) {
        self.array_accesses += 1;
    }

    #[inline]
    pub fn add_array_accesses(&mut self, n: u64) {
        self.array_accesses += n;
    }

    #[inline]
    pub fn increment_swaps(&mut self) {
        self.swaps += 1;
    }

    #[inline]
    pub fn add_swaps(&mut self, n: u64) {
        self.swaps += n;
    }

    #[inline]
    pub fn increment_memory_allocations(&mut self) {
        self.memory_allocations += 1;
    }

    #[inline]
    pub fn add_memory_allocations(&mut self, n: u64) {
        self.memory_allocations += n;
    }

    pub fn comparisons(&self) -> u64 {
        self.comparisons
    }

    pub fn swaps(&self) -> u64 {
        self.swaps
    }

    pub fn array_accesses(&self) -> u64 {
        self.array_accesses
    }

    pub fn memory_allocations(&self) -> u64 {
        self.memory_allocations
    }

    /// Returns the current counters and execution time as a snapshot,
    /// without recording it.
    pub fn current(&self, input_size: usize) -> MetricsSnapshot {
        MetricsSnapshot {
            input_size,
            comparisons: self.comparisons,
            swaps: self.swaps,
            array_accesses: self.array_accesses,
            memory_allocations: self.memory_allocations,
            execution_time_ns: self.execution_time_ns(),
        }
    }

    /// Appends the current counters to the history. Counters are left as
    /// they are.
    pub fn save_snapshot(&mut self, input_size: usize) {
        let snapshot = self.current(input_size);
        self.snapshots.push(snapshot);
    }

    pub fn snapshots(&self) -> &[MetricsSnapshot] {
        &self.snapshots
    }

    pub fn clear_snapshots(&mut self) {
        self.snapshots.clear();
    }

    /// Writes the header and one row per snapshot, in insertion order.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "{CSV_HEADER}")?;
        for snapshot in self.snapshots.iter() {
            writeln!(writer, "{}", snapshot.to_csv_row())?;
        }
        writer.flush()
    }

    /// Exports the snapshot history to `path`.
    ///
    /// Parent directories are not created: a missing directory is reported
    /// as [`Error::Io`].
    pub fn export<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.write_csv(BufWriter::new(file))?;
        debug!(
            "exported {} snapshots to {}",
            self.snapshots.len(),
            path.display()
        );
        Ok(())
    }
}

impl fmt::Display for OperationTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Performance Metrics ===")?;
        writeln!(f, "Execution Time: {:.3} ms", self.execution_time_ms())?;
        writeln!(f, "Comparisons: {}", self.comparisons)?;
        writeln!(f, "Swaps: {}", self.swaps)?;
        writeln!(f, "Array Accesses: {}", self.array_accesses)?;
        write!(f, "Memory Allocations: {}", self.memory_allocations)
    }
}

/// Parses a history written by [`OperationTracker::write_csv`].
///
/// Blank lines are skipped.
pub fn read_csv<R: BufRead>(reader: R) -> Result<Vec<MetricsSnapshot>> {
    let mut lines = reader.lines();

    match lines.next() {
        Some(header) => {
            let header = header?;
            if header.trim_end() != CSV_HEADER {
                return Err(Error::Parse {
                    line: 1,
                    reason: format!("unexpected header {header:?}"),
                });
            }
        }
        None => {
            return Err(Error::Parse {
                line: 1,
                reason: "missing header".to_string(),
            })
        }
    }

    let mut snapshots = Vec::new();
    for (i, row) in lines.enumerate() {
        let row = row?;
        let row = row.trim_end();
        if row.is_empty() {
            continue;
        }
        // Header is line 1, so the first data row is line 2.
        snapshots.push(MetricsSnapshot::from_csv_row(row, i + 2)?);
    }

    Ok(snapshots)
}

/// Reads back a file produced by [`OperationTracker::export`].
pub fn import<P: AsRef<Path>>(path: P) -> Result<Vec<MetricsSnapshot>> {
    let path = path.as_ref();
    let snapshots = read_csv(BufReader::new(File::open(path)?))?;
    debug!(
        "imported {} snapshots from {}",
        snapshots.len(),
        path.display()
    );
    Ok(snapshots)
}
