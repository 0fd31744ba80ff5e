//! Error type shared by the finder, the tracker and the benchmark driver.

use thiserror::Error;

/// Errors surfaced by this crate.
///
/// Empty sequences, sequences without a majority and ties at exactly half
/// are normal outcomes and never show up here.
#[derive(Debug, Error)]
pub enum Error {
    /// A sequence was required but none was supplied.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Reading or writing a metrics file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An exported metrics file could not be parsed back.
    #[error("malformed metrics file at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// Benchmark configuration that cannot produce a measurement.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
