//! Benchmark driver support: configuration, repeated timed runs and
//! per-distribution reports.
//!
//! All runs of one [`bench_distribution`] call share a single
//! [`OperationTracker`]. The finder resets it on every run, and the last
//! measured run is appended to its snapshot history so that the history
//! can be exported once the whole suite is done.

use std::fmt;
use std::hint::black_box;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithms::majority;
use crate::gen_sequences::{generate, InputDistribution};
use crate::tracker::OperationTracker;
use crate::{Error, Result};

pub const DEFAULT_SIZES: [usize; 4] = [100, 1_000, 10_000, 100_000];
pub const WARMUP_ITERATIONS: usize = 5;
pub const BENCHMARK_ITERATIONS: usize = 10;
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchConfig {
    pub sizes: Vec<usize>,
    pub warmup_iterations: usize,
    pub measured_iterations: usize,
    pub seed: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            warmup_iterations: WARMUP_ITERATIONS,
            measured_iterations: BENCHMARK_ITERATIONS,
            seed: DEFAULT_SEED,
        }
    }
}

impl BenchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.measured_iterations == 0 {
            return Err(Error::InvalidConfig(
                "at least one measured iteration is required".to_string(),
            ));
        }
        Ok(())
    }

    /// One measured run and no warm-up, as used for side-by-side comparisons.
    pub fn single_run(&self) -> Self {
        Self {
            warmup_iterations: 0,
            measured_iterations: 1,
            ..self.clone()
        }
    }
}

/// Wall-clock time of each measured run.
pub struct RunTimings {
    timings: Vec<u128>,
}

impl RunTimings {
    pub fn new(n_runs: usize) -> Self {
        Self {
            timings: Vec::with_capacity(n_runs),
        }
    }

    #[inline(always)]
    pub fn push(&mut self, elapsed: Duration) {
        self.timings.push(elapsed.as_nanos());
    }

    pub fn len(&self) -> usize {
        self.timings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }

    /// Returns minimum, maximum, average run time in nanosecs, or `None`
    /// if nothing was recorded.
    pub fn get(&self) -> Option<(u128, u128, f64)> {
        let min = *self.timings.iter().min()?;
        let max = *self.timings.iter().max()?;
        let avg = self.timings.iter().sum::<u128>() as f64 / self.timings.len() as f64;
        Some((min, max, avg))
    }
}

/// Averages over the measured runs of one distribution at one size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionReport {
    pub distribution: InputDistribution,
    pub size: usize,
    pub majority: Option<i64>,
    pub min_time_ns: u128,
    pub max_time_ns: u128,
    pub avg_time_ns: f64,
    pub avg_comparisons: f64,
    pub avg_array_accesses: f64,
}

impl DistributionReport {
    pub fn comparisons_per_element(&self) -> f64 {
        per_element(self.avg_comparisons, self.size)
    }

    pub fn accesses_per_element(&self) -> f64 {
        per_element(self.avg_array_accesses, self.size)
    }
}

fn per_element(total: f64, size: usize) -> f64 {
    if size == 0 {
        0.0
    } else {
        total / size as f64
    }
}

impl fmt::Display for DistributionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Input: {}", self.distribution.description())?;
        match self.majority {
            Some(m) => writeln!(f, "  Result: Majority = {m}")?,
            None => writeln!(f, "  Result: No majority")?,
        }
        writeln!(f, "  Avg Time: {:.2} μs", self.avg_time_ns / 1_000.0)?;
        writeln!(
            f,
            "  Avg Comparisons: {:.0} ({:.2} per element)",
            self.avg_comparisons,
            self.comparisons_per_element()
        )?;
        write!(
            f,
            "  Avg Array Accesses: {:.0} ({:.2} per element)",
            self.avg_array_accesses,
            self.accesses_per_element()
        )
    }
}

/// Runs the finder on one generated input: warm-up runs first, then the
/// measured ones. The last measured run is saved into `tracker`'s history.
pub fn bench_distribution(
    size: usize,
    distribution: InputDistribution,
    config: &BenchConfig,
    tracker: &mut OperationTracker,
) -> Result<DistributionReport> {
    config.validate()?;

    let input = generate(size, distribution, config.seed);

    for _ in 0..config.warmup_iterations {
        black_box(majority(black_box(input.as_slice()), tracker));
    }

    let mut timings = RunTimings::new(config.measured_iterations);
    let mut total_comparisons = 0u64;
    let mut total_accesses = 0u64;
    let mut found = None;

    for _ in 0..config.measured_iterations {
        found = majority(black_box(input.as_slice()), tracker).map(|r| r.element());
        timings.push(tracker.execution_time());
        total_comparisons += tracker.comparisons();
        total_accesses += tracker.array_accesses();
    }

    tracker.save_snapshot(size);

    let (min_time_ns, max_time_ns, avg_time_ns) = timings.get().ok_or_else(|| {
        Error::InvalidConfig("no measured run was recorded".to_string())
    })?;
    let runs = timings.len() as f64;

    let report = DistributionReport {
        distribution,
        size,
        majority: found,
        min_time_ns,
        max_time_ns,
        avg_time_ns,
        avg_comparisons: total_comparisons as f64 / runs,
        avg_array_accesses: total_accesses as f64 / runs,
    };

    debug!(
        "bench {:?} n={}: avg_time={:.0}ns avg_comparisons={:.0} avg_accesses={:.0}",
        distribution, size, report.avg_time_ns, report.avg_comparisons, report.avg_array_accesses
    );

    Ok(report)
}

/// Every distribution at every configured size, distributions outermost.
pub fn run_suite(
    config: &BenchConfig,
    tracker: &mut OperationTracker,
) -> Result<Vec<DistributionReport>> {
    config.validate()?;

    let mut reports = Vec::with_capacity(InputDistribution::ALL.len() * config.sizes.len());
    for distribution in InputDistribution::ALL {
        for &size in config.sizes.iter() {
            reports.push(bench_distribution(size, distribution, config, tracker)?);
        }
    }
    Ok(reports)
}

/// A single run of every distribution at `size`.
pub fn compare_distributions(
    size: usize,
    config: &BenchConfig,
    tracker: &mut OperationTracker,
) -> Result<Vec<DistributionReport>> {
    let config = config.single_run();
    InputDistribution::ALL
        .into_iter()
        .map(|d| bench_distribution(size, d, &config, tracker))
        .collect()
}
