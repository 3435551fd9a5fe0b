/// Constants used by the balancing heuristics and the scheduler driver.
pub mod balance {
    /// Provenance key reserved for the maximum-uncertainty query strategy.
    pub const MAX_QUERY_SOURCE: &str = "max";
    /// Ratio between random and max zeros when nothing has been queried yet.
    pub const DEFAULT_RAND_MAX_B: f64 = 10.0;
    /// Power-law exponent of the random/max transition.
    pub const DEFAULT_RAND_MAX_ALPHA: f64 = 1.0;
    /// Exponent governing the decay of the ones/zeros ratio.
    pub const DEFAULT_ONE_ZERO_BETA: f64 = 0.6;
    /// Asymptotic ones/zeros ratio for a fully labeled pool.
    pub const DEFAULT_ONE_ZERO_DELTA: f64 = 0.15;
    /// Mini epochs are shuffled unless told otherwise.
    pub const DEFAULT_SHUFFLE: bool = true;
    /// Preferred number of passes when the fit configuration has none.
    pub const DEFAULT_PREF_EPOCHS: usize = 1;
    /// Fraction of a full epoch credited to each mini epoch when recommending epochs.
    ///
    /// The measured geometric-mean fraction is reported in the schedule summary
    /// but this constant is what the recommendation uses.
    pub const EPOCH_FRACTION: f64 = 1.0;
}

/// Constants describing the search space exposed to hyperparameter tuners.
pub mod tuning {
    /// Prefix tuners put in front of every balance parameter.
    pub const PARAM_PREFIX: &str = "bal_";
    /// Parameter name of `rand_max_b`.
    pub const PARAM_RAND_MAX_B: &str = "rand_max_b";
    /// Parameter name of `rand_max_alpha`.
    pub const PARAM_RAND_MAX_ALPHA: &str = "rand_max_alpha";
    /// Parameter name of `one_zero_beta`.
    pub const PARAM_ONE_ZERO_BETA: &str = "one_zero_beta";
    /// Parameter name of `one_zero_delta`.
    pub const PARAM_ONE_ZERO_DELTA: &str = "one_zero_delta";

    /// Log-normal location of `rand_max_b`.
    pub const RAND_MAX_B_MU: f64 = 2.0;
    /// Log-normal scale of `rand_max_b`.
    pub const RAND_MAX_B_SIGMA: f64 = 2.0;
    /// Uniform range of `rand_max_alpha`.
    pub const RAND_MAX_ALPHA_RANGE: (f64, f64) = (0.0, 2.0);
    /// Uniform range of `one_zero_beta`.
    pub const ONE_ZERO_BETA_RANGE: (f64, f64) = (0.0, 2.0);
    /// Uniform range of `one_zero_delta`.
    pub const ONE_ZERO_DELTA_RANGE: (f64, f64) = (0.001, 0.999);
}
