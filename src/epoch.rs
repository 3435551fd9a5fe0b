use rand::Rng;
use rand::seq::SliceRandom;

use crate::constants::balance::EPOCH_FRACTION;
use crate::groups::TripleGroups;
use crate::heuristics::TripleDistribution;
use crate::types::SampleIndex;

/// Double `indices` in place until it holds at least `target` entries.
///
/// Each doubling appends the current sequence to itself, so the relative
/// order repeats. Empty input is left empty.
pub fn replicate(indices: &mut Vec<SampleIndex>, target: usize) {
    if indices.is_empty() {
        return;
    }
    while indices.len() < target {
        indices.extend_from_within(..);
    }
}

/// Concatenate `n_mini_epoch` balanced slices into one training order.
///
/// Mini epoch `i` takes the `i`-th contiguous slice of every replicated group
/// (ones, then random zeros, then max zeros) and is optionally shuffled on its
/// own before being appended.
pub fn assemble<R: Rng + ?Sized>(
    mut groups: TripleGroups,
    dist: TripleDistribution,
    n_mini_epoch: usize,
    shuffle: bool,
    rng: &mut R,
) -> Vec<SampleIndex> {
    replicate(&mut groups.ones, dist.n_one * n_mini_epoch);
    replicate(&mut groups.zero_rand, dist.n_zero_rand * n_mini_epoch);
    replicate(&mut groups.zero_max, dist.n_zero_max * n_mini_epoch);

    let mut order = Vec::with_capacity(dist.total() * n_mini_epoch);
    for i in 0..n_mini_epoch {
        let mut mini_epoch = Vec::with_capacity(dist.total());
        mini_epoch.extend_from_slice(nth_slice(&groups.ones, i, dist.n_one));
        mini_epoch.extend_from_slice(nth_slice(&groups.zero_rand, i, dist.n_zero_rand));
        mini_epoch.extend_from_slice(nth_slice(&groups.zero_max, i, dist.n_zero_max));
        if shuffle {
            mini_epoch.shuffle(rng);
        }
        order.extend(mini_epoch);
    }
    order
}

fn nth_slice(indices: &[SampleIndex], i: usize, width: usize) -> &[SampleIndex] {
    &indices[i * width..(i + 1) * width]
}

/// Geometric mean of the fraction of each group drawn per mini epoch.
pub fn effective_fraction(group_sizes: TripleDistribution, dist: TripleDistribution) -> f64 {
    let efrac_one = dist.n_one as f64 / group_sizes.n_one as f64;
    let efrac_zero_rand = dist.n_zero_rand as f64 / group_sizes.n_zero_rand as f64;
    if group_sizes.n_zero_max > 0 {
        let efrac_zero_max = dist.n_zero_max as f64 / group_sizes.n_zero_max as f64;
        (efrac_one * efrac_zero_rand * efrac_zero_max).powf(1.0 / 3.0)
    } else {
        (efrac_one * efrac_zero_rand).sqrt()
    }
}

/// Epochs to train on the resampled set so the total number of passes stays
/// close to `pref_epochs`.
pub fn recommended_epochs(pref_epochs: usize, n_mini_epoch: usize) -> usize {
    (pref_epochs as f64 / (EPOCH_FRACTION * n_mini_epoch as f64)).ceil() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn replicate_doubles_until_long_enough() {
        let mut indices = vec![4, 9, 1];
        replicate(&mut indices, 7);
        assert_eq!(indices, vec![4, 9, 1, 4, 9, 1, 4, 9, 1, 4, 9, 1]);

        let mut short_target = vec![1, 2];
        replicate(&mut short_target, 2);
        assert_eq!(short_target, vec![1, 2]);

        let mut empty = Vec::new();
        replicate(&mut empty, 5);
        assert!(empty.is_empty());
    }

    #[test]
    fn assemble_slices_each_group_per_mini_epoch() {
        let groups = TripleGroups {
            ones: vec![1, 2],
            zero_rand: vec![10, 11, 12, 13, 14],
            zero_max: vec![20, 21, 22],
        };
        let dist = TripleDistribution {
            n_one: 2,
            n_zero_rand: 2,
            n_zero_max: 1,
        };
        let order = assemble(groups, dist, 3, false, &mut StdRng::seed_from_u64(0));
        assert_eq!(
            order,
            vec![1, 2, 10, 11, 20, 1, 2, 12, 13, 21, 1, 2, 14, 10, 22]
        );
    }

    #[test]
    fn shuffled_mini_epochs_keep_their_members() {
        let groups = TripleGroups {
            ones: vec![1, 2, 3],
            zero_rand: vec![10, 11, 12, 13],
            zero_max: vec![20, 21],
        };
        let dist = TripleDistribution {
            n_one: 3,
            n_zero_rand: 2,
            n_zero_max: 1,
        };
        let plain = assemble(groups.clone(), dist, 2, false, &mut StdRng::seed_from_u64(8));
        let shuffled = assemble(groups, dist, 2, true, &mut StdRng::seed_from_u64(8));
        assert_eq!(shuffled.len(), plain.len());
        for (plain_chunk, shuffled_chunk) in plain.chunks(6).zip(shuffled.chunks(6)) {
            let mut a = plain_chunk.to_vec();
            let mut b = shuffled_chunk.to_vec();
            a.sort_unstable();
            b.sort_unstable();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn zero_width_groups_are_skipped() {
        let groups = TripleGroups {
            ones: vec![1, 2],
            zero_rand: vec![10, 11],
            zero_max: vec![20],
        };
        let dist = TripleDistribution {
            n_one: 2,
            n_zero_rand: 1,
            n_zero_max: 0,
        };
        let order = assemble(groups, dist, 2, false, &mut StdRng::seed_from_u64(1));
        assert_eq!(order, vec![1, 2, 10, 1, 2, 11]);
    }

    #[test]
    fn effective_fraction_uses_geometric_mean() {
        let sizes = TripleDistribution {
            n_one: 4,
            n_zero_rand: 8,
            n_zero_max: 2,
        };
        let dist = TripleDistribution {
            n_one: 4,
            n_zero_rand: 1,
            n_zero_max: 1,
        };
        let expected = (1.0_f64 * 0.125 * 0.5).powf(1.0 / 3.0);
        assert!((effective_fraction(sizes, dist) - expected).abs() < 1e-12);

        let no_max = TripleDistribution {
            n_zero_max: 0,
            ..sizes
        };
        assert!((effective_fraction(no_max, dist) - 0.125_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn recommended_epochs_spread_preference_over_mini_epochs() {
        assert_eq!(recommended_epochs(1, 1), 1);
        assert_eq!(recommended_epochs(1, 4), 1);
        assert_eq!(recommended_epochs(10, 3), 4);
        assert_eq!(recommended_epochs(9, 3), 3);
    }
}
