use serde::{Deserialize, Serialize};

use crate::constants::balance::{
    DEFAULT_ONE_ZERO_BETA, DEFAULT_ONE_ZERO_DELTA, DEFAULT_PREF_EPOCHS, DEFAULT_RAND_MAX_ALPHA,
    DEFAULT_RAND_MAX_B, DEFAULT_SHUFFLE,
};
use crate::constants::tuning::{
    ONE_ZERO_BETA_RANGE, ONE_ZERO_DELTA_RANGE, PARAM_ONE_ZERO_BETA, PARAM_ONE_ZERO_DELTA,
    PARAM_PREFIX, PARAM_RAND_MAX_ALPHA, PARAM_RAND_MAX_B, RAND_MAX_ALPHA_RANGE, RAND_MAX_B_MU,
    RAND_MAX_B_SIGMA,
};
use crate::errors::BalanceError;
use crate::types::ParamName;

/// Parameters of the three-way (ones / random zeros / max zeros) rebalancing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    /// Ratio between random and max zeros at 0% of the pool queried.
    pub rand_max_b: f64,
    /// Power law governing the random/max transition.
    pub rand_max_alpha: f64,
    /// Exponent governing decay of the ones/zeros ratio.
    pub one_zero_beta: f64,
    /// Asymptotic ones/zeros ratio for an infinite number of samples.
    pub one_zero_delta: f64,
    /// Shuffle candidate pools and every assembled mini epoch.
    pub shuffle: bool,
    /// Number of full passes the caller would train for without rebalancing.
    pub pref_epochs: usize,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            rand_max_b: DEFAULT_RAND_MAX_B,
            rand_max_alpha: DEFAULT_RAND_MAX_ALPHA,
            one_zero_beta: DEFAULT_ONE_ZERO_BETA,
            one_zero_delta: DEFAULT_ONE_ZERO_DELTA,
            shuffle: DEFAULT_SHUFFLE,
            pref_epochs: DEFAULT_PREF_EPOCHS,
        }
    }
}

impl BalanceConfig {
    /// Default parameters with `pref_epochs` taken from the fit configuration.
    pub fn for_fit(fit: &FitConfig) -> Self {
        Self {
            pref_epochs: fit.epochs.unwrap_or(DEFAULT_PREF_EPOCHS),
            ..Self::default()
        }
    }

    /// Parse a JSON object; missing fields keep their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, BalanceError> {
        let config: Self = serde_json::from_str(raw).map_err(|err| {
            BalanceError::Configuration(format!("invalid balance config: {err}"))
        })?;
        config.validate()
    }

    /// Apply tuner output. Names may carry the `bal_` prefix.
    pub fn with_params<'a, I>(mut self, params: I) -> Result<Self, BalanceError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        for (name, value) in params {
            let key = name.strip_prefix(PARAM_PREFIX).unwrap_or(name);
            match key {
                PARAM_RAND_MAX_B => self.rand_max_b = value,
                PARAM_RAND_MAX_ALPHA => self.rand_max_alpha = value,
                PARAM_ONE_ZERO_BETA => self.one_zero_beta = value,
                PARAM_ONE_ZERO_DELTA => self.one_zero_delta = value,
                _ => {
                    return Err(BalanceError::Configuration(format!(
                        "unknown balance parameter '{name}'"
                    )));
                }
            }
        }
        self.validate()
    }

    /// Check that every scalar lies in the domain of the decay formulas.
    pub fn validate(self) -> Result<Self, BalanceError> {
        if !(self.rand_max_b.is_finite() && self.rand_max_b > 0.0) {
            return Err(BalanceError::Configuration(format!(
                "rand_max_b must be a positive number, got {}",
                self.rand_max_b
            )));
        }
        if !(self.rand_max_alpha.is_finite() && self.rand_max_alpha >= 0.0) {
            return Err(BalanceError::Configuration(format!(
                "rand_max_alpha must be non-negative, got {}",
                self.rand_max_alpha
            )));
        }
        if !(self.one_zero_beta.is_finite() && self.one_zero_beta >= 0.0) {
            return Err(BalanceError::Configuration(format!(
                "one_zero_beta must be non-negative, got {}",
                self.one_zero_beta
            )));
        }
        if !(self.one_zero_delta > 0.0 && self.one_zero_delta < 1.0) {
            return Err(BalanceError::Configuration(format!(
                "one_zero_delta must lie strictly between 0 and 1, got {}",
                self.one_zero_delta
            )));
        }
        if self.pref_epochs == 0 {
            return Err(BalanceError::Configuration(
                "pref_epochs must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Settings handed to the model when it is fitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitConfig {
    /// Number of training epochs; `None` when the model takes no epoch count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epochs: Option<usize>,
}

impl FitConfig {
    /// Fit configuration that trains for `epochs` passes.
    pub fn with_epochs(epochs: usize) -> Self {
        Self {
            epochs: Some(epochs),
        }
    }

    /// Write back a recommended epoch count. Only an existing `epochs` field is overwritten.
    pub fn apply(&mut self, recommended: Option<usize>) {
        if let (Some(epochs), Some(value)) = (self.epochs.as_mut(), recommended) {
            *epochs = value;
        }
    }
}

/// Prior distribution a tuner should draw a balance parameter from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParamDistribution {
    /// `exp(N(mu, sigma))`.
    LogNormal {
        /// Mean of the underlying normal.
        mu: f64,
        /// Standard deviation of the underlying normal.
        sigma: f64,
    },
    /// Uniform over `[low, high]`.
    Uniform {
        /// Lower bound.
        low: f64,
        /// Upper bound.
        high: f64,
    },
}

/// Search space for the tunable balance parameters, keyed by prefixed name.
///
/// `shuffle` and `pref_epochs` are not tuned.
pub fn hyperparameter_space() -> Vec<(ParamName, ParamDistribution)> {
    let prefixed = |name: &str| format!("{PARAM_PREFIX}{name}");
    vec![
        (
            prefixed(PARAM_RAND_MAX_B),
            ParamDistribution::LogNormal {
                mu: RAND_MAX_B_MU,
                sigma: RAND_MAX_B_SIGMA,
            },
        ),
        (
            prefixed(PARAM_RAND_MAX_ALPHA),
            ParamDistribution::Uniform {
                low: RAND_MAX_ALPHA_RANGE.0,
                high: RAND_MAX_ALPHA_RANGE.1,
            },
        ),
        (
            prefixed(PARAM_ONE_ZERO_DELTA),
            ParamDistribution::Uniform {
                low: ONE_ZERO_DELTA_RANGE.0,
                high: ONE_ZERO_DELTA_RANGE.1,
            },
        ),
        (
            prefixed(PARAM_ONE_ZERO_BETA),
            ParamDistribution::Uniform {
                low: ONE_ZERO_BETA_RANGE.0,
                high: ONE_ZERO_BETA_RANGE.1,
            },
        ),
    ]
}
