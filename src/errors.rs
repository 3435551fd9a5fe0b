use thiserror::Error;

use crate::types::SampleIndex;

/// Error type for configuration, arithmetic domain and indexing failures.
#[derive(Debug, Error)]
pub enum BalanceError {
    /// Invalid parameters or inconsistent inputs.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// A balancing formula was evaluated outside its domain.
    #[error("{operation} is undefined: {reason}")]
    Domain {
        /// Quantity being computed.
        operation: &'static str,
        /// What made it undefined.
        reason: String,
    },
    /// Max zeros per mini epoch would be negative.
    #[error(
        "random zeros per mini epoch ({n_zero_rand_epoch}) exceed zeros per mini epoch ({n_zero_epoch})"
    )]
    NegativeMaxEpoch {
        /// Zeros per mini epoch.
        n_zero_epoch: usize,
        /// Random zeros per mini epoch.
        n_zero_rand_epoch: usize,
    },
    /// An index does not address a pool item.
    #[error("sample index {index} is out of bounds for a pool of {len} samples")]
    IndexOutOfBounds {
        /// Offending index.
        index: SampleIndex,
        /// Pool size.
        len: usize,
    },
    /// No mini epoch could be formed.
    #[error("no mini epochs could be scheduled from {n_one} positive samples")]
    EmptySchedule {
        /// Ones in the training set.
        n_one: usize,
    },
}
