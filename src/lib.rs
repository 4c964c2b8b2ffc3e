//! Analytic Hierarchy Process weighting engine.

use std::fmt;
use thiserror::Error;

pub mod engine;
pub mod matrix;
pub mod model;
pub mod parser;
pub mod priority;

pub use engine::{
    aggregate, sensitivity_weights, weigh_alternatives, weigh_criteria, CriterionWeightMap,
    GlobalScores, RankedAlternative, Ranking, StageOutput,
};
pub use matrix::{ItemSet, PairwiseMatrix};
pub use model::{AhpModel, Evaluation};
pub use parser::{
    parse_comparison, parse_scale_value, InputWarning, PairLocation, Scope, TokenError,
    WarningReason,
};
pub use priority::{priority_vector, PriorityMethod, WeightVector, ZeroWeightPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    Criteria,
    Alternatives,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Criteria => write!(f, "criteria"),
            ItemKind::Alternatives => write!(f, "alternatives"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AhpError {
    #[error("Item set is empty: at least one of the {0} is required")]
    EmptyItemSet(ItemKind),
    #[error("Empty label at position {index} in the {kind}")]
    EmptyLabel { kind: ItemKind, index: usize },
    #[error("Expected {expected} pairwise comparisons, got {actual}")]
    ComparisonCountMismatch { expected: usize, actual: usize },
    #[error("Invalid pair ({row}, {col}) for a set of {size} items: only the upper triangle is editable")]
    InvalidPair { row: usize, col: usize, size: usize },
    #[error("Dimension mismatch: expected {expected} entries, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("Invalid weights: {0}")]
    InvalidWeights(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AhpConfig {
    pub method: PriorityMethod,
    pub zero_weights: ZeroWeightPolicy,
}

impl AhpConfig {
    pub fn new(method: PriorityMethod, zero_weights: ZeroWeightPolicy) -> Self {
        AhpConfig {
            method,
            zero_weights,
        }
    }
}
