use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mem_dbg::*;
use serde_json::json;

use majority::bench::{
    bench_distribution, compare_distributions, run_suite, BenchConfig, BENCHMARK_ITERATIONS,
    DEFAULT_SEED, DEFAULT_SIZES, WARMUP_ITERATIONS,
};
use majority::gen_sequences::{generate, InputDistribution};
use majority::{MajorityVote, OperationTracker};

const DEFAULT_OUTPUT: &str = "docs/performance-plots/benchmark_results.csv";
const PREVIEW_LEN: usize = 20;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[arg(long, global = true, value_delimiter = ',', default_values_t = DEFAULT_SIZES)]
    sizes: Vec<usize>,
    #[arg(long, global = true, default_value_t = WARMUP_ITERATIONS)]
    warmup: usize,
    #[arg(long, global = true, default_value_t = BENCHMARK_ITERATIONS)]
    runs: usize,
    #[arg(long, global = true, default_value_t = DEFAULT_SEED)]
    seed: u64,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Random input with a majority, at every size.
    Quick,
    /// Every input distribution at every size, exported as CSV.
    Full {
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
    },
    /// One run of every input distribution at a single size.
    Compare {
        #[arg(short, long)]
        n: usize,
    },
    /// Analyze one generated input in detail.
    Custom {
        #[arg(short, long)]
        n: usize,
        #[arg(short, long, value_enum, default_value_t = InputDistribution::RandomWithMajority)]
        distribution: InputDistribution,
    },
    /// Analyze the given values.
    Values {
        #[arg(long)]
        json: bool,
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<i64>,
    },
}

fn quick(config: &BenchConfig) -> Result<(), Box<dyn Error>> {
    println!("=== Boyer-Moore Majority Vote - Quick Benchmark ===\n");

    let mut tracker = OperationTracker::new();
    for &n in config.sizes.iter() {
        println!("Testing with n = {n}");
        let report = bench_distribution(
            n,
            InputDistribution::RandomWithMajority,
            config,
            &mut tracker,
        )?;
        println!("{report}\n");
    }

    println!("Quick benchmark complete!");
    println!("Run `full` for comprehensive benchmarks");
    println!("Run `custom`, `compare` or `values` for custom testing");
    Ok(())
}

fn full(config: &BenchConfig, output: &Path) -> Result<(), Box<dyn Error>> {
    println!("=== Boyer-Moore Majority Vote - Full Benchmark Suite ===");

    let mut tracker = OperationTracker::new();
    let reports = run_suite(config, &mut tracker)?;

    let mut current = None;
    for report in reports.iter() {
        if current != Some(report.distribution) {
            println!("\n>>> Testing: {} <<<", report.distribution.description());
            current = Some(report.distribution);
        }
        println!("\nArray size: {}", report.size);
        println!("{report}");
    }

    tracker
        .export(output)
        .map_err(|e| format!("exporting results to {}: {e}", output.display()))?;
    println!("\nResults exported to {}", output.display());

    let bytes: usize = tracker
        .snapshots()
        .iter()
        .map(|s| s.mem_size(SizeFlags::default()))
        .sum();
    println!(
        "Snapshot history: {} entries, {} bytes",
        tracker.snapshots().len(),
        bytes
    );
    if let Some(last) = tracker.snapshots().last() {
        let _ = last.mem_dbg(DbgFlags::empty());
    }

    println!("\nFull benchmark suite complete!");
    Ok(())
}

fn compare(n: usize, config: &BenchConfig) -> Result<(), Box<dyn Error>> {
    println!("=== Comparing Input Distributions (n = {n}) ===\n");
    println!(
        "{:<55} {:>15} {:>15} {:>15}",
        "Distribution", "Time (μs)", "Comparisons", "Accesses"
    );
    println!("{}", "-".repeat(103));

    let mut tracker = OperationTracker::new();
    for report in compare_distributions(n, config, &mut tracker)? {
        println!(
            "{:<55} {:>15.2} {:>15.0} {:>15.0}",
            report.distribution.description(),
            report.avg_time_ns / 1_000.0,
            report.avg_comparisons,
            report.avg_array_accesses
        );
    }
    Ok(())
}

fn custom(n: usize, distribution: InputDistribution, config: &BenchConfig) {
    let input = generate(n, distribution, config.seed);

    println!("Input: {}", distribution.description());
    println!("Array preview (first {PREVIEW_LEN} elements):");
    let preview: Vec<String> = input.iter().take(PREVIEW_LEN).map(|x| x.to_string()).collect();
    print!("{}", preview.join(" "));
    if input.len() > PREVIEW_LEN {
        print!(" ...");
    }
    println!("\n");

    let mut vote = MajorityVote::new();
    match vote.majority(input.as_slice()) {
        Some(result) => println!("Result: {result}"),
        None => println!("No majority element found"),
    }

    println!("\n{}", vote.statistics());
}

fn values(values: &[i64], as_json: bool) -> Result<(), Box<dyn Error>> {
    let mut vote = MajorityVote::new();
    let result = vote.find_majority(Some(values))?;

    if as_json {
        let output = json!({
            "length": values.len(),
            "result": result,
            "metrics": vote.tracker().current(values.len()),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        match result {
            Some(result) => println!("{result}"),
            None => println!("No majority element found"),
        }
        println!("\n{}", vote.statistics());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config = BenchConfig {
        sizes: args.sizes,
        warmup_iterations: args.warmup,
        measured_iterations: args.runs,
        seed: args.seed,
    };

    let outcome = match args.mode.unwrap_or(Mode::Quick) {
        Mode::Quick => quick(&config),
        Mode::Full { output } => full(&config, &output),
        Mode::Compare { n } => compare(n, &config),
        Mode::Custom { n, distribution } => {
            custom(n, distribution, &config);
            Ok(())
        }
        Mode::Values { json, values: v } => values(&v, json),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
