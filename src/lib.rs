#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Balance and fit configuration types.
pub mod config;
/// Centralized constants used by heuristics, scheduler and tuner surface.
pub mod constants;
/// Sample pool, training set and provenance types.
pub mod data;
/// Replication and mini-epoch assembly.
pub mod epoch;
/// Candidate pools and the ones / random zeros / max zeros partition.
pub mod groups;
/// Decay formulas and mini-epoch sizing.
pub mod heuristics;
/// Schedule composition summaries.
pub mod metrics;
/// Balancer trait, full sampling and the triple-balance driver.
pub mod sampler;
/// Shared type aliases.
pub mod types;

mod errors;

pub use config::{BalanceConfig, FitConfig, ParamDistribution, hyperparameter_space};
pub use data::{LABEL_ONE, LABEL_ZERO, ProvenanceMap, SamplePool, TrainingSet};
pub use errors::BalanceError;
pub use groups::{CandidatePools, TripleGroups};
pub use heuristics::TripleDistribution;
pub use metrics::ScheduleSummary;
pub use sampler::{
    BalanceMode, BalanceOutcome, BalanceRequest, Balancer, FallbackReason, FullSampling,
    TripleBalance,
};
pub use types::{Label, ParamName, QuerySource, SampleIndex};
