use serde::{Deserialize, Serialize};

use crate::heuristics::TripleDistribution;

/// How a produced schedule was composed from the three groups.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Samples available per group before replication.
    pub group_sizes: TripleDistribution,
    /// Samples drawn from each group per mini epoch.
    pub per_mini_epoch: TripleDistribution,
    /// Number of mini epochs concatenated into the order.
    pub n_mini_epoch: usize,
    /// Geometric mean of the per-group fractions drawn per mini epoch.
    pub effective_fraction: f64,
}

impl ScheduleSummary {
    /// Length of the resampled order.
    pub fn total(&self) -> usize {
        self.per_mini_epoch.total() * self.n_mini_epoch
    }

    /// Draws from each group over the whole schedule.
    pub fn scheduled(&self) -> TripleDistribution {
        TripleDistribution {
            n_one: self.per_mini_epoch.n_one * self.n_mini_epoch,
            n_zero_rand: self.per_mini_epoch.n_zero_rand * self.n_mini_epoch,
            n_zero_max: self.per_mini_epoch.n_zero_max * self.n_mini_epoch,
        }
    }

    /// Share of the schedule taken by ones, random zeros and max zeros.
    pub fn shares(&self) -> [f64; 3] {
        let total = self.total();
        if total == 0 {
            return [0.0; 3];
        }
        let scheduled = self.scheduled();
        [
            scheduled.n_one as f64 / total as f64,
            scheduled.n_zero_rand as f64 / total as f64,
            scheduled.n_zero_max as f64 / total as f64,
        ]
    }

    /// How often, on average, each group's samples are replayed.
    pub fn replay_factors(&self) -> [f64; 3] {
        let scheduled = self.scheduled();
        [
            replay_factor(scheduled.n_one, self.group_sizes.n_one),
            replay_factor(scheduled.n_zero_rand, self.group_sizes.n_zero_rand),
            replay_factor(scheduled.n_zero_max, self.group_sizes.n_zero_max),
        ]
    }
}

fn replay_factor(scheduled: usize, available: usize) -> f64 {
    if available == 0 {
        return 0.0;
    }
    scheduled as f64 / available as f64
}

/// Render a replay factor for log lines, `n/a` when undefined.
pub fn format_replay_factor(scheduled: usize, available: usize) -> String {
    if scheduled == 0 || available == 0 {
        return "n/a".to_string();
    }
    format!("{:.2}x", replay_factor(scheduled, available))
}
