use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{BalanceConfig, FitConfig};
use crate::data::{ProvenanceMap, SamplePool, TrainingSet};
use crate::epoch::{assemble, effective_fraction, recommended_epochs};
use crate::errors::BalanceError;
use crate::groups::{CandidatePools, TripleGroups};
use crate::heuristics::{mini_epoch_count, triple_dist};
use crate::metrics::{ScheduleSummary, format_replay_factor};
use crate::types::SampleIndex;

static NO_FIT: FitConfig = FitConfig { epochs: None };

/// Inputs of one balancing call.
#[derive(Debug)]
pub struct BalanceRequest<'a, F> {
    /// Full labeled pool.
    pub pool: &'a SamplePool<F>,
    /// Indices currently selected for training.
    pub train_idx: &'a [SampleIndex],
    /// Which query strategy selected which index; `None` reads as empty.
    pub provenance: Option<&'a ProvenanceMap>,
    /// Fit settings of the model; only the presence of `epochs` is consulted.
    pub fit: &'a FitConfig,
}

impl<'a, F> BalanceRequest<'a, F> {
    /// Request without provenance and without an epoch count to adjust.
    pub fn new(pool: &'a SamplePool<F>, train_idx: &'a [SampleIndex]) -> Self {
        Self {
            pool,
            train_idx,
            provenance: None,
            fit: &NO_FIT,
        }
    }

    /// Attach the record of which strategy queried which index.
    pub fn with_provenance(mut self, provenance: &'a ProvenanceMap) -> Self {
        self.provenance = Some(provenance);
        self
    }

    /// Attach the model's fit settings.
    pub fn with_fit(mut self, fit: &'a FitConfig) -> Self {
        self.fit = fit;
        self
    }
}

/// Why a triple-balance call handed over to its fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallbackReason {
    /// No indices were queried by the random-like strategies or by `max`.
    MissingCandidates {
        /// Indices from random-like strategies.
        random: usize,
        /// Indices from the `max` strategy.
        max: usize,
    },
    /// Candidates exist but one of the zero groups has no label-0 entries.
    MissingZeros {
        /// Label-0 indices among the random candidates.
        zero_rand: usize,
        /// Label-0 indices among the max candidates.
        zero_max: usize,
    },
}

/// How the returned training set was produced.
#[derive(Clone, Debug, PartialEq)]
pub enum BalanceMode {
    /// Plain training set, no resampling.
    Full,
    /// Triple-balanced schedule.
    Triple(ScheduleSummary),
    /// Triple balance was requested but the fallback produced the set.
    Fallback(FallbackReason),
}

/// Result of a balancing call.
#[derive(Clone, Debug)]
pub struct BalanceOutcome<F> {
    /// Features and labels in training order.
    pub training: TrainingSet<F>,
    /// Pool indices behind `training`.
    pub order: Vec<SampleIndex>,
    /// Epoch count to fit with; `None` leaves the fit configuration untouched.
    pub epochs: Option<usize>,
    /// Candidate pools in the order this call observed them.
    pub candidates: CandidatePools,
    /// Whether the order is plain, triple-balanced or a fallback.
    pub mode: BalanceMode,
}

/// A strategy turning the current training set into the sequence a model is fitted on.
pub trait Balancer<F: Clone> {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Produce the training order for one round.
    fn balance(
        &self,
        request: &BalanceRequest<'_, F>,
        rng: &mut dyn RngCore,
    ) -> Result<BalanceOutcome<F>, BalanceError>;
}

/// Returns the training set as is.
#[derive(Clone, Copy, Debug, Default)]
pub struct FullSampling;

impl<F: Clone> Balancer<F> for FullSampling {
    fn name(&self) -> &'static str {
        "full"
    }

    fn balance(
        &self,
        request: &BalanceRequest<'_, F>,
        _rng: &mut dyn RngCore,
    ) -> Result<BalanceOutcome<F>, BalanceError> {
        let training = request.pool.select(request.train_idx)?;
        let candidates = request
            .provenance
            .map(CandidatePools::from_provenance)
            .unwrap_or_default();
        Ok(BalanceOutcome {
            training,
            order: request.train_idx.to_vec(),
            epochs: None,
            candidates,
            mode: BalanceMode::Full,
        })
    }
}

/// Three-way rebalancing of ones, random zeros and max zeros.
///
/// Only useful together with a query strategy that mixes random and max
/// picks; without both kinds of zeros the call is delegated to `fallback`.
#[derive(Clone, Debug)]
pub struct TripleBalance<B = FullSampling> {
    config: BalanceConfig,
    fallback: B,
}

impl TripleBalance {
    /// Validated balancer falling back to [`FullSampling`].
    pub fn new(config: BalanceConfig) -> Result<Self, BalanceError> {
        Ok(Self {
            config: config.validate()?,
            fallback: FullSampling,
        })
    }
}

impl<B> TripleBalance<B> {
    /// Replace the strategy used when triple balancing is not possible.
    pub fn with_fallback<C>(self, fallback: C) -> TripleBalance<C> {
        TripleBalance {
            config: self.config,
            fallback,
        }
    }

    /// Parameters this balancer was built with.
    pub fn config(&self) -> &BalanceConfig {
        &self.config
    }

    fn fall_back<F: Clone>(
        &self,
        request: &BalanceRequest<'_, F>,
        rng: &mut dyn RngCore,
        candidates: CandidatePools,
        reason: FallbackReason,
    ) -> Result<BalanceOutcome<F>, BalanceError>
    where
        B: Balancer<F>,
    {
        debug!(
            ?reason,
            fallback = self.fallback.name(),
            "unable to use triple balance, falling back"
        );
        let outcome = self.fallback.balance(request, rng)?;
        Ok(BalanceOutcome {
            epochs: None,
            candidates,
            mode: BalanceMode::Fallback(reason),
            ..outcome
        })
    }
}

impl<F: Clone, B: Balancer<F>> Balancer<F> for TripleBalance<B> {
    fn name(&self) -> &'static str {
        "triple"
    }

    fn balance(
        &self,
        request: &BalanceRequest<'_, F>,
        rng: &mut dyn RngCore,
    ) -> Result<BalanceOutcome<F>, BalanceError> {
        let pool = request.pool;
        pool.check_indices(request.train_idx)?;

        let mut candidates = request
            .provenance
            .map(CandidatePools::from_provenance)
            .unwrap_or_default();
        if self.config.shuffle {
            candidates.shuffle(&mut *rng);
        }
        if !candidates.has_both() {
            let reason = FallbackReason::MissingCandidates {
                random: candidates.random.len(),
                max: candidates.max.len(),
            };
            return self.fall_back(request, rng, candidates, reason);
        }

        let groups = TripleGroups::partition(pool, request.train_idx, &candidates)?;
        if !groups.has_both_zero_groups() {
            let reason = FallbackReason::MissingZeros {
                zero_rand: groups.zero_rand.len(),
                zero_max: groups.zero_max.len(),
            };
            return self.fall_back(request, rng, candidates, reason);
        }

        let sizes = groups.sizes();
        let dist = triple_dist(
            sizes.n_one,
            sizes.n_zero_rand,
            sizes.n_zero_max,
            pool.len(),
            &self.config,
        )?;
        debug!(
            n_one = dist.n_one,
            n_zero_rand = dist.n_zero_rand,
            n_zero_max = dist.n_zero_max,
            "samples per mini epoch"
        );

        let n_mini_epoch = mini_epoch_count(sizes, dist);
        if n_mini_epoch == 0 {
            return Err(BalanceError::EmptySchedule { n_one: sizes.n_one });
        }

        let order = assemble(groups, dist, n_mini_epoch, self.config.shuffle, &mut *rng);
        let training = pool.select(&order)?;

        let summary = ScheduleSummary {
            group_sizes: sizes,
            per_mini_epoch: dist,
            n_mini_epoch,
            effective_fraction: effective_fraction(sizes, dist),
        };
        let epochs = request
            .fit
            .epochs
            .map(|_| recommended_epochs(self.config.pref_epochs, n_mini_epoch));
        let scheduled = summary.scheduled();
        debug!(
            n_mini_epoch,
            effective_fraction = summary.effective_fraction,
            ?epochs,
            replay_one = %format_replay_factor(scheduled.n_one, sizes.n_one),
            replay_zero_rand = %format_replay_factor(scheduled.n_zero_rand, sizes.n_zero_rand),
            replay_zero_max = %format_replay_factor(scheduled.n_zero_max, sizes.n_zero_max),
            "triple balance schedule built"
        );

        Ok(BalanceOutcome {
            training,
            order,
            epochs,
            candidates,
            mode: BalanceMode::Triple(summary),
        })
    }
}
