use crate::matrix::{ItemSet, PairwiseMatrix};
use crate::parser::{InputWarning, Scope};
use crate::priority::{priority_vector, WeightVector, ZeroWeightPolicy};
use crate::{AhpConfig, AhpError};
use std::cmp::Ordering;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct StageOutput<T> {
    pub value: T,
    pub warnings: Vec<InputWarning>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<WeightVector>", into = "Vec<WeightVector>"))]
pub struct CriterionWeightMap {
    vectors: Vec<WeightVector>,
}

impl CriterionWeightMap {
    pub fn new(vectors: Vec<WeightVector>) -> Result<Self, AhpError> {
        if let Some(first) = vectors.first() {
            let expected = first.len();
            if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
                return Err(AhpError::DimensionMismatch {
                    expected,
                    actual: bad.len(),
                });
            }
        }
        Ok(CriterionWeightMap { vectors })
    }

    pub fn get(&self, criterion: usize) -> Option<&WeightVector> {
        self.vectors.get(criterion)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeightVector> {
        self.vectors.iter()
    }

    pub fn criterion_count(&self) -> usize {
        self.vectors.len()
    }

    pub fn alternative_count(&self) -> usize {
        self.vectors.first().map_or(0, WeightVector::len)
    }
}

impl TryFrom<Vec<WeightVector>> for CriterionWeightMap {
    type Error = AhpError;

    fn try_from(vectors: Vec<WeightVector>) -> Result<Self, AhpError> {
        Self::new(vectors)
    }
}

impl From<CriterionWeightMap> for Vec<WeightVector> {
    fn from(map: CriterionWeightMap) -> Self {
        map.vectors
    }
}

pub fn weigh_criteria<S: AsRef<str>>(
    criteria: &ItemSet,
    tokens: &[S],
    config: &AhpConfig,
) -> Result<StageOutput<WeightVector>, AhpError> {
    let (matrix, warnings) = PairwiseMatrix::from_tokens(criteria.len(), tokens, Scope::Criteria)?;
    let weights = priority_vector(&matrix, &config.method);

    debug!(
        criteria = criteria.len(),
        warnings = warnings.len(),
        "criterion weights: {:?}",
        weights.as_slice()
    );

    Ok(StageOutput {
        value: weights,
        warnings,
    })
}

pub fn weigh_alternatives<S: AsRef<str>>(
    criteria: &ItemSet,
    alternatives: &ItemSet,
    tokens_per_criterion: &[Vec<S>],
    config: &AhpConfig,
) -> Result<StageOutput<CriterionWeightMap>, AhpError> {
    if tokens_per_criterion.len() != criteria.len() {
        return Err(AhpError::DimensionMismatch {
            expected: criteria.len(),
            actual: tokens_per_criterion.len(),
        });
    }

    let mut vectors = Vec::with_capacity(criteria.len());
    let mut warnings = Vec::new();

    for (criterion, tokens) in tokens_per_criterion.iter().enumerate() {
        let (matrix, mut raised) = PairwiseMatrix::from_tokens(
            alternatives.len(),
            tokens,
            Scope::Alternatives { criterion },
        )?;
        let weights = priority_vector(&matrix, &config.method);

        debug!(
            criterion = criteria.label(criterion).unwrap_or_default(),
            "alternative weights: {:?}",
            weights.as_slice()
        );

        vectors.push(weights);
        warnings.append(&mut raised);
    }

    Ok(StageOutput {
        value: CriterionWeightMap::new(vectors)?,
        warnings,
    })
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobalScores(Vec<f64>);

impl GlobalScores {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Pairs scores with labels and sorts them descending. Ties keep alternative order.
    pub fn ranked(&self, alternatives: &ItemSet) -> Result<Ranking, AhpError> {
        if alternatives.len() != self.0.len() {
            return Err(AhpError::DimensionMismatch {
                expected: self.0.len(),
                actual: alternatives.len(),
            });
        }

        let mut entries: Vec<RankedAlternative> = alternatives
            .labels()
            .iter()
            .zip(&self.0)
            .enumerate()
            .map(|(index, (label, &score))| RankedAlternative {
                index,
                label: label.clone(),
                score,
            })
            .collect();

        entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        Ok(Ranking(entries))
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedAlternative {
    pub index: usize,
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ranking(Vec<RankedAlternative>);

impl Ranking {
    pub fn entries(&self) -> &[RankedAlternative] {
        &self.0
    }

    pub fn best(&self) -> Option<&RankedAlternative> {
        self.0.first()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn score_of(&self, index: usize) -> Option<f64> {
        self.0.iter().find(|e| e.index == index).map(|e| e.score)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Sum over criteria of `weights[i] * alternative_weights[i]`.
pub fn aggregate(
    weights: &WeightVector,
    alternative_weights: &CriterionWeightMap,
) -> Result<GlobalScores, AhpError> {
    if weights.len() != alternative_weights.criterion_count() {
        return Err(AhpError::DimensionMismatch {
            expected: alternative_weights.criterion_count(),
            actual: weights.len(),
        });
    }

    let mut scores = vec![0.0; alternative_weights.alternative_count()];
    for (w, vector) in weights.iter().zip(alternative_weights.iter()) {
        for (score, x) in scores.iter_mut().zip(vector.iter()) {
            *score += w * x;
        }
    }

    Ok(GlobalScores(scores))
}

pub fn sensitivity_weights(
    sliders: &[f64],
    policy: ZeroWeightPolicy,
) -> Result<WeightVector, AhpError> {
    let weights = WeightVector::normalize(sliders, policy)?;
    debug!("sensitivity weights: {:?}", weights.as_slice());
    Ok(weights)
}
