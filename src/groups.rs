use indexmap::IndexSet;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::constants::balance::MAX_QUERY_SOURCE;
use crate::data::{LABEL_ONE, LABEL_ZERO, ProvenanceMap, SamplePool};
use crate::errors::BalanceError;
use crate::heuristics::TripleDistribution;
use crate::types::SampleIndex;

/// Indices queried by the max strategy and by every other strategy.
///
/// Built as a copy of the provenance map so shuffling never touches the
/// caller's record; the caller may store the permuted copy for the next round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePools {
    /// Union of all non-`max` provenance entries, in map order.
    pub random: Vec<SampleIndex>,
    /// Entries of the `max` strategy.
    pub max: Vec<SampleIndex>,
}

impl CandidatePools {
    /// Split provenance entries into the `max` pool and the union of all others.
    pub fn from_provenance(provenance: &ProvenanceMap) -> Self {
        let mut pools = Self::default();
        for (source, indices) in provenance {
            if source == MAX_QUERY_SOURCE {
                pools.max.extend_from_slice(indices);
            } else {
                pools.random.extend_from_slice(indices);
            }
        }
        pools
    }

    /// Independently permute both pools.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.random.shuffle(rng);
        self.max.shuffle(rng);
    }

    /// Both pools hold at least one index.
    pub fn has_both(&self) -> bool {
        !self.random.is_empty() && !self.max.is_empty()
    }
}

/// Ones from the training set and zeros split by the strategy that queried them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TripleGroups {
    /// Label-1 indices of the training set.
    pub ones: Vec<SampleIndex>,
    /// Label-0 indices queried by random-like strategies.
    pub zero_rand: Vec<SampleIndex>,
    /// Label-0 indices queried by the `max` strategy.
    pub zero_max: Vec<SampleIndex>,
}

impl TripleGroups {
    /// Split the training set and candidate pools by label.
    ///
    /// The training set is read as a set: repeated indices are kept once, in
    /// first-seen order. Candidate order is preserved.
    pub fn partition<F>(
        pool: &SamplePool<F>,
        train_idx: &[SampleIndex],
        candidates: &CandidatePools,
    ) -> Result<Self, BalanceError> {
        let unique: IndexSet<SampleIndex> = train_idx.iter().copied().collect();
        Ok(Self {
            ones: with_label(pool, unique.into_iter(), LABEL_ONE)?,
            zero_rand: with_label(pool, candidates.random.iter().copied(), LABEL_ZERO)?,
            zero_max: with_label(pool, candidates.max.iter().copied(), LABEL_ZERO)?,
        })
    }

    /// Group sizes, in the same shape as the per-mini-epoch distribution.
    pub fn sizes(&self) -> TripleDistribution {
        TripleDistribution {
            n_one: self.ones.len(),
            n_zero_rand: self.zero_rand.len(),
            n_zero_max: self.zero_max.len(),
        }
    }

    /// Both zero groups are non-empty.
    pub fn has_both_zero_groups(&self) -> bool {
        !self.zero_rand.is_empty() && !self.zero_max.is_empty()
    }
}

fn with_label<F>(
    pool: &SamplePool<F>,
    indices: impl Iterator<Item = SampleIndex>,
    label: u8,
) -> Result<Vec<SampleIndex>, BalanceError> {
    let mut selected = Vec::new();
    for idx in indices {
        if pool.label(idx)? == label {
            selected.push(idx);
        }
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pool() -> SamplePool<usize> {
        let labels = vec![0, 0, 1, 0, 1, 0, 0, 1, 0, 0];
        SamplePool::new((0..labels.len()).collect(), labels).unwrap()
    }

    fn provenance() -> ProvenanceMap {
        let mut map = ProvenanceMap::new();
        map.insert("random".to_string(), vec![0, 2, 3]);
        map.insert("max".to_string(), vec![4, 5, 6]);
        map.insert("uncertainty".to_string(), vec![8, 7]);
        map
    }

    #[test]
    fn non_max_sources_are_concatenated_in_map_order() {
        let pools = CandidatePools::from_provenance(&provenance());
        assert_eq!(pools.random, vec![0, 2, 3, 8, 7]);
        assert_eq!(pools.max, vec![4, 5, 6]);
        assert!(pools.has_both());
        assert!(!CandidatePools::from_provenance(&ProvenanceMap::new()).has_both());
    }

    #[test]
    fn shuffle_permutes_without_losing_indices() {
        let original = CandidatePools::from_provenance(&provenance());
        let mut shuffled = original.clone();
        shuffled.shuffle(&mut StdRng::seed_from_u64(3));
        let mut random = shuffled.random.clone();
        random.sort_unstable();
        let mut max = shuffled.max.clone();
        max.sort_unstable();
        assert_eq!(random, vec![0, 2, 3, 7, 8]);
        assert_eq!(max, vec![4, 5, 6]);
    }

    #[test]
    fn partition_splits_by_label_and_source() {
        let pools = CandidatePools::from_provenance(&provenance());
        let groups = TripleGroups::partition(&pool(), &[2, 4, 7, 0, 2], &pools).unwrap();
        assert_eq!(groups.ones, vec![2, 4, 7]);
        assert_eq!(groups.zero_rand, vec![0, 3, 8]);
        assert_eq!(groups.zero_max, vec![5, 6]);
        assert_eq!(
            groups.sizes(),
            TripleDistribution {
                n_one: 3,
                n_zero_rand: 3,
                n_zero_max: 2
            }
        );
        assert!(groups.has_both_zero_groups());
    }

    #[test]
    fn partition_is_repeatable() {
        let pools = CandidatePools::from_provenance(&provenance());
        let train = [0, 2, 3, 4, 5, 6, 7, 8];
        let first = TripleGroups::partition(&pool(), &train, &pools).unwrap();
        let second = TripleGroups::partition(&pool(), &train, &pools).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn partition_reports_unknown_indices() {
        let mut map = provenance();
        map.insert("max".to_string(), vec![42]);
        let pools = CandidatePools::from_provenance(&map);
        assert!(matches!(
            TripleGroups::partition(&pool(), &[2], &pools),
            Err(BalanceError::IndexOutOfBounds { index: 42, .. })
        ));
    }
}
