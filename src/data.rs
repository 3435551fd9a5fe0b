use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::BalanceError;
use crate::types::{Label, QuerySource, SampleIndex};

/// Label of a relevant (positive) sample.
pub const LABEL_ONE: Label = 1;
/// Label of an irrelevant (negative) sample.
pub const LABEL_ZERO: Label = 0;

/// Query strategy name mapped to the pool indices it selected, in query order.
pub type ProvenanceMap = IndexMap<QuerySource, Vec<SampleIndex>>;

/// Labeled pool of samples, addressed by position.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplePool<F> {
    features: Vec<F>,
    labels: Vec<Label>,
}

impl<F> SamplePool<F> {
    /// Build a pool from parallel feature and label vectors.
    pub fn new(features: Vec<F>, labels: Vec<Label>) -> Result<Self, BalanceError> {
        if features.len() != labels.len() {
            return Err(BalanceError::Configuration(format!(
                "pool has {} feature rows but {} labels",
                features.len(),
                labels.len()
            )));
        }
        Ok(Self { features, labels })
    }

    /// Number of samples in the pool.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the pool holds no samples.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Feature rows, indexed like the labels.
    pub fn features(&self) -> &[F] {
        &self.features
    }

    /// Labels of all samples.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Label at `index`, or `IndexOutOfBounds`.
    pub fn label(&self, index: SampleIndex) -> Result<Label, BalanceError> {
        self.labels
            .get(index)
            .copied()
            .ok_or(BalanceError::IndexOutOfBounds {
                index,
                len: self.len(),
            })
    }

    /// Fail on the first index that does not address a pool item.
    pub fn check_indices(&self, indices: &[SampleIndex]) -> Result<(), BalanceError> {
        match indices.iter().find(|&&idx| idx >= self.len()) {
            Some(&index) => Err(BalanceError::IndexOutOfBounds {
                index,
                len: self.len(),
            }),
            None => Ok(()),
        }
    }
}

impl<F: Clone> SamplePool<F> {
    /// Gather features and labels in the order given by `order` (repeats allowed).
    pub fn select(&self, order: &[SampleIndex]) -> Result<TrainingSet<F>, BalanceError> {
        self.check_indices(order)?;
        Ok(TrainingSet {
            features: order.iter().map(|&idx| self.features[idx].clone()).collect(),
            labels: order.iter().map(|&idx| self.labels[idx]).collect(),
        })
    }
}

/// Features and labels handed to the model for one training round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingSet<F> {
    /// Feature rows in training order.
    pub features: Vec<F>,
    /// Labels matching `features` row by row.
    pub labels: Vec<Label>,
}

impl<F> TrainingSet<F> {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the set holds no rows.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of rows carrying `label`.
    pub fn count_label(&self, label: Label) -> usize {
        self.labels.iter().filter(|&&value| value == label).count()
    }
}
