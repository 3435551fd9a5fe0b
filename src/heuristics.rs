//! Closed-form decay heuristics that size each mini epoch.

use serde::{Deserialize, Serialize};

use crate::config::BalanceConfig;
use crate::errors::BalanceError;

/// Number of ones, random zeros and max zeros drawn into every mini epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripleDistribution {
    /// Ones.
    pub n_one: usize,
    /// Zeros picked by random-like strategies.
    pub n_zero_rand: usize,
    /// Zeros picked by the `max` strategy.
    pub n_zero_max: usize,
}

impl TripleDistribution {
    /// Samples per mini epoch across the three groups.
    pub fn total(&self) -> usize {
        self.n_one + self.n_zero_rand + self.n_zero_max
    }
}

/// Weight ratio between random and max zeros.
///
/// `frac = (n_one + n_zero_max) / (n_samples - n_zero_rand)` is the share of the
/// pool (random picks excluded) already consumed by ones and max zeros. The
/// ratio starts at `b` for `frac = 0` and decays to `1` at `frac = 1` following
/// `b * exp(-ln(b) * frac^alpha)`.
pub fn rand_max_weight(
    n_one: usize,
    n_zero_rand: usize,
    n_zero_max: usize,
    n_samples: usize,
    b: f64,
    alpha: f64,
) -> Result<f64, BalanceError> {
    if n_samples <= n_zero_rand {
        return Err(BalanceError::Domain {
            operation: "random/max weight",
            reason: format!(
                "pool of {n_samples} samples leaves nothing beside {n_zero_rand} random zeros"
            ),
        });
    }
    if b <= 0.0 {
        return Err(BalanceError::Domain {
            operation: "random/max weight",
            reason: format!("ratio at 0% queried must be positive, got {b}"),
        });
    }
    let frac = (n_one + n_zero_max) as f64 / (n_samples - n_zero_rand) as f64;
    Ok(b * (-b.ln() * frac.powf(alpha)).exp())
}

/// Target ones per zero: `(1 - delta) * (n_one / n_zero)^beta + delta`.
pub fn one_zero_ratio(
    n_one: usize,
    n_zero: usize,
    beta: f64,
    delta: f64,
) -> Result<f64, BalanceError> {
    if n_zero == 0 {
        return Err(BalanceError::Domain {
            operation: "ones/zeros ratio",
            reason: "there are no zeros to balance against".to_string(),
        });
    }
    let balance = n_one as f64 / n_zero as f64;
    Ok((1.0 - delta) * balance.powf(beta) + delta)
}

/// Size of every group within one mini epoch.
///
/// All ones are used once per mini epoch; only the zeros are balanced against
/// them, first as a whole and then split between random and max zeros.
pub fn triple_dist(
    n_one: usize,
    n_zero_rand: usize,
    n_zero_max: usize,
    n_samples: usize,
    config: &BalanceConfig,
) -> Result<TripleDistribution, BalanceError> {
    let n_zero = n_zero_rand + n_zero_max;

    let oz_ratio = one_zero_ratio(n_one, n_zero, config.one_zero_beta, config.one_zero_delta)?;
    let n_zero_epoch = ceil_to_count("zeros per mini epoch", n_one as f64 / oz_ratio)?;

    let rand_max_wr = rand_max_weight(
        n_one,
        n_zero_rand,
        n_zero_max,
        n_samples,
        config.rand_max_b,
        config.rand_max_alpha,
    )?;
    let n_zero_rand_epoch = if n_zero_max > 0 {
        if n_zero_rand == 0 {
            return Err(BalanceError::Domain {
                operation: "random zeros per mini epoch",
                reason: format!("{n_zero_max} max zeros but no random zeros"),
            });
        }
        let share = n_zero_epoch as f64 / (rand_max_wr + n_zero_max as f64 / n_zero_rand as f64);
        ceil_to_count("random zeros per mini epoch", rand_max_wr * share)?
    } else {
        n_zero_epoch
    };
    let n_zero_max_epoch =
        n_zero_epoch
            .checked_sub(n_zero_rand_epoch)
            .ok_or(BalanceError::NegativeMaxEpoch {
                n_zero_epoch,
                n_zero_rand_epoch,
            })?;

    Ok(TripleDistribution {
        n_one,
        n_zero_rand: n_zero_rand_epoch,
        n_zero_max: n_zero_max_epoch,
    })
}

/// Mini epochs needed so every sample of a group is drawn at least once.
///
/// Returns `0` when the group is empty or contributes nothing per mini epoch.
pub fn n_mini_epoch(n_samples: usize, epoch_size: usize) -> usize {
    if n_samples == 0 || epoch_size == 0 {
        return 0;
    }
    n_samples.div_ceil(epoch_size)
}

/// Mini epochs needed to cover the largest group relative to its share.
pub fn mini_epoch_count(group_sizes: TripleDistribution, dist: TripleDistribution) -> usize {
    n_mini_epoch(group_sizes.n_one, dist.n_one)
        .max(n_mini_epoch(group_sizes.n_zero_rand, dist.n_zero_rand))
        .max(n_mini_epoch(group_sizes.n_zero_max, dist.n_zero_max))
}

fn ceil_to_count(operation: &'static str, value: f64) -> Result<usize, BalanceError> {
    if !value.is_finite() || value < 0.0 {
        return Err(BalanceError::Domain {
            operation,
            reason: format!("computed {value}"),
        });
    }
    Ok(value.ceil() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BalanceConfig {
        BalanceConfig::default()
    }

    #[test]
    fn weight_starts_at_b_when_nothing_is_queried() {
        let weight = rand_max_weight(0, 5, 0, 20, 10.0, 1.0).unwrap();
        assert_eq!(weight, 10.0);
    }

    #[test]
    fn weight_reaches_one_when_pool_is_consumed() {
        let weight = rand_max_weight(10, 5, 5, 20, 10.0, 1.0).unwrap();
        assert!((weight - 1.0).abs() < 1e-12);

        let weight = rand_max_weight(3, 2, 7, 12, 4.0, 0.3).unwrap();
        assert!((weight - 1.0).abs() < 1e-12);
    }

    #[test]
    fn weight_decays_monotonically_with_queried_fraction() {
        let early = rand_max_weight(1, 5, 1, 100, 10.0, 1.0).unwrap();
        let late = rand_max_weight(30, 5, 30, 100, 10.0, 1.0).unwrap();
        assert!(early > late);
        assert!(late > 1.0);
    }

    #[test]
    fn weight_rejects_degenerate_denominator() {
        assert!(matches!(
            rand_max_weight(0, 20, 0, 20, 10.0, 1.0),
            Err(BalanceError::Domain { .. })
        ));
        assert!(matches!(
            rand_max_weight(1, 1, 1, 20, 0.0, 1.0),
            Err(BalanceError::Domain { .. })
        ));
    }

    #[test]
    fn ratio_is_one_without_decay() {
        for (n_one, n_zero) in [(1, 1), (3, 50), (40, 7), (0, 9)] {
            let ratio = one_zero_ratio(n_one, n_zero, 0.0, 0.15).unwrap();
            assert!((ratio - 1.0).abs() < 1e-12, "{n_one}/{n_zero} -> {ratio}");
        }
    }

    #[test]
    fn ratio_approaches_delta_for_rare_ones() {
        let ratio = one_zero_ratio(1, 1_000_000, 0.6, 0.15).unwrap();
        assert!(ratio > 0.15 && ratio < 0.16);
        assert!(matches!(
            one_zero_ratio(3, 0, 0.6, 0.15),
            Err(BalanceError::Domain { .. })
        ));
    }

    #[test]
    fn balanced_pool_splits_zeros_evenly() {
        let dist = triple_dist(10, 5, 5, 20, &config()).unwrap();
        assert_eq!(
            dist,
            TripleDistribution {
                n_one: 10,
                n_zero_rand: 5,
                n_zero_max: 5
            }
        );
        assert_eq!(dist.total(), 20);
    }

    #[test]
    fn without_max_zeros_all_zeros_are_random() {
        let dist = triple_dist(4, 30, 0, 200, &config()).unwrap();
        let n_zero_epoch = (4.0 / one_zero_ratio(4, 30, 0.6, 0.15).unwrap()).ceil() as usize;
        assert_eq!(dist.n_zero_rand, n_zero_epoch);
        assert_eq!(dist.n_zero_max, 0);
        assert_eq!(dist.n_one, 4);
    }

    #[test]
    fn early_rounds_favour_random_zeros() {
        let dist = triple_dist(2, 10, 10, 1000, &config()).unwrap();
        assert!(dist.n_zero_rand > dist.n_zero_max);
    }

    #[test]
    fn max_zeros_without_random_zeros_is_a_domain_error() {
        assert!(matches!(
            triple_dist(2, 0, 4, 50, &config()),
            Err(BalanceError::Domain { .. })
        ));
    }

    #[test]
    fn rounding_past_the_zero_budget_is_reported() {
        let steep = BalanceConfig {
            rand_max_b: 1e17,
            ..BalanceConfig::default()
        };
        assert!(matches!(
            triple_dist(10, 1, 4, 1_000_000, &steep),
            Err(BalanceError::NegativeMaxEpoch {
                n_zero_epoch: 7,
                n_zero_rand_epoch: 8
            })
        ));
    }

    #[test]
    fn mini_epoch_helpers() {
        assert_eq!(n_mini_epoch(0, 5), 0);
        assert_eq!(n_mini_epoch(5, 0), 0);
        assert_eq!(n_mini_epoch(10, 3), 4);
        assert_eq!(n_mini_epoch(9, 3), 3);

        let sizes = TripleDistribution {
            n_one: 4,
            n_zero_rand: 30,
            n_zero_max: 9,
        };
        let dist = TripleDistribution {
            n_one: 4,
            n_zero_rand: 7,
            n_zero_max: 2,
        };
        assert_eq!(mini_epoch_count(sizes, dist), 5);
    }
}
