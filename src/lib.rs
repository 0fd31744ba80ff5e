//! Boyer-Moore majority vote with operation counting.
//!
//! The finder in [`algorithms`] reports every comparison and array access
//! it performs to an [`OperationTracker`], which also times the run and
//! keeps a history of [`MetricsSnapshot`]s that can be exported as CSV.
//! [`gen_sequences`] and [`bench`] provide the synthetic inputs and the
//! repeated-run measurements used by the `perf_majority` binary.

pub mod error;
pub use error::{Error, Result};

pub mod tracker;
pub use tracker::{MetricsSnapshot, OperationTracker, Timer};

pub mod algorithms;
pub use algorithms::{
    find_majority, find_majority_element, majority, MajorityResult, MajorityVote,
};

pub mod gen_sequences;
pub use gen_sequences::InputDistribution;

pub mod bench;
