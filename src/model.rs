use crate::engine::{
    aggregate, sensitivity_weights, weigh_alternatives, weigh_criteria, CriterionWeightMap,
    GlobalScores, Ranking,
};
use crate::matrix::ItemSet;
use crate::parser::InputWarning;
use crate::priority::WeightVector;
use crate::{AhpConfig, AhpError, ItemKind};
use tracing::debug;

pub const DEFAULT_TOKEN: &str = "1";

/// Raw session inputs: labels plus one comparison token per upper-triangle pair.
#[derive(Debug, Clone, PartialEq)]
pub struct AhpModel {
    criteria: ItemSet,
    alternatives: ItemSet,
    criteria_tokens: Vec<String>,
    alternative_tokens: Vec<Vec<String>>,
    config: AhpConfig,
}

impl AhpModel {
    pub fn new<S: AsRef<str>>(criteria: &[S], alternatives: &[S]) -> Result<Self, AhpError> {
        Self::new_with_config(criteria, alternatives, AhpConfig::default())
    }

    pub fn new_with_config<S: AsRef<str>>(
        criteria: &[S],
        alternatives: &[S],
        config: AhpConfig,
    ) -> Result<Self, AhpError> {
        let criteria = ItemSet::new(ItemKind::Criteria, criteria)?;
        let alternatives = ItemSet::new(ItemKind::Alternatives, alternatives)?;

        let criteria_tokens = vec![DEFAULT_TOKEN.to_string(); criteria.pair_count()];
        let alternative_tokens =
            vec![vec![DEFAULT_TOKEN.to_string(); alternatives.pair_count()]; criteria.len()];

        Ok(AhpModel {
            criteria,
            alternatives,
            criteria_tokens,
            alternative_tokens,
            config,
        })
    }

    pub fn criteria(&self) -> &ItemSet {
        &self.criteria
    }

    pub fn alternatives(&self) -> &ItemSet {
        &self.alternatives
    }

    pub fn config(&self) -> &AhpConfig {
        &self.config
    }

    pub fn set_criteria_comparison(
        &mut self,
        row: usize,
        col: usize,
        token: &str,
    ) -> Result<(), AhpError> {
        let index = self.criteria.pair_index(row, col)?;
        self.criteria_tokens[index] = token.to_string();
        Ok(())
    }

    pub fn set_alternative_comparison(
        &mut self,
        criterion: usize,
        row: usize,
        col: usize,
        token: &str,
    ) -> Result<(), AhpError> {
        let index = self.alternatives.pair_index(row, col)?;
        let tokens = self
            .alternative_tokens
            .get_mut(criterion)
            .ok_or(AhpError::DimensionMismatch {
                expected: self.criteria.len(),
                actual: criterion + 1,
            })?;
        tokens[index] = token.to_string();
        Ok(())
    }

    pub fn criteria_comparison(&self, row: usize, col: usize) -> Result<&str, AhpError> {
        let index = self.criteria.pair_index(row, col)?;
        Ok(&self.criteria_tokens[index])
    }

    pub fn evaluate(&self) -> Result<Evaluation, AhpError> {
        let criteria_stage = weigh_criteria(&self.criteria, &self.criteria_tokens, &self.config)?;
        let alternative_stage = weigh_alternatives(
            &self.criteria,
            &self.alternatives,
            &self.alternative_tokens,
            &self.config,
        )?;

        let scores = aggregate(&criteria_stage.value, &alternative_stage.value)?;
        let ranking = scores.ranked(&self.alternatives)?;

        let mut warnings = criteria_stage.warnings;
        warnings.extend(alternative_stage.warnings);

        debug!(
            warnings = warnings.len(),
            "evaluation ranking: {:?}",
            ranking.labels()
        );

        Ok(Evaluation {
            criteria: self.criteria.clone(),
            alternatives: self.alternatives.clone(),
            criterion_weights: criteria_stage.value,
            alternative_weights: alternative_stage.value,
            scores,
            ranking,
            warnings,
            config: self.config.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "EvaluationData"))]
pub struct Evaluation {
    criteria: ItemSet,
    alternatives: ItemSet,
    criterion_weights: WeightVector,
    alternative_weights: CriterionWeightMap,
    scores: GlobalScores,
    ranking: Ranking,
    warnings: Vec<InputWarning>,
    config: AhpConfig,
}

impl Evaluation {
    pub fn criterion_weights(&self) -> &WeightVector {
        &self.criterion_weights
    }

    pub fn weighted_criteria(&self) -> Vec<(&str, f64)> {
        self.criteria
            .labels()
            .iter()
            .map(String::as_str)
            .zip(self.criterion_weights.iter())
            .collect()
    }

    pub fn alternative_weights(&self) -> &CriterionWeightMap {
        &self.alternative_weights
    }

    pub fn scores(&self) -> &GlobalScores {
        &self.scores
    }

    pub fn ranking(&self) -> &Ranking {
        &self.ranking
    }

    pub fn warnings(&self) -> &[InputWarning] {
        &self.warnings
    }

    pub fn criteria(&self) -> &ItemSet {
        &self.criteria
    }

    pub fn alternatives(&self) -> &ItemSet {
        &self.alternatives
    }

    pub fn default_sliders(&self) -> Vec<f64> {
        self.criterion_weights.as_slice().to_vec()
    }

    /// Re-ranks the alternatives under edited criterion weights.
    pub fn sensitivity(&self, sliders: &[f64]) -> Result<Ranking, AhpError> {
        if sliders.len() != self.criteria.len() {
            return Err(AhpError::DimensionMismatch {
                expected: self.criteria.len(),
                actual: sliders.len(),
            });
        }

        let weights = sensitivity_weights(sliders, self.config.zero_weights)?;
        aggregate(&weights, &self.alternative_weights)?.ranked(&self.alternatives)
    }
}

// Serialized scores and ranking are ignored and rebuilt from the validated weights.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct EvaluationData {
    criteria: ItemSet,
    alternatives: ItemSet,
    criterion_weights: WeightVector,
    alternative_weights: CriterionWeightMap,
    warnings: Vec<InputWarning>,
    config: AhpConfig,
}

#[cfg(feature = "serde")]
impl TryFrom<EvaluationData> for Evaluation {
    type Error = AhpError;

    fn try_from(data: EvaluationData) -> Result<Self, AhpError> {
        let n_criteria = data.criteria.len();
        for actual in [
            data.criterion_weights.len(),
            data.alternative_weights.criterion_count(),
        ] {
            if actual != n_criteria {
                return Err(AhpError::DimensionMismatch {
                    expected: n_criteria,
                    actual,
                });
            }
        }
        if data.alternative_weights.alternative_count() != data.alternatives.len() {
            return Err(AhpError::DimensionMismatch {
                expected: data.alternatives.len(),
                actual: data.alternative_weights.alternative_count(),
            });
        }

        let scores = aggregate(&data.criterion_weights, &data.alternative_weights)?;
        let ranking = scores.ranked(&data.alternatives)?;

        Ok(Evaluation {
            criteria: data.criteria,
            alternatives: data.alternatives,
            criterion_weights: data.criterion_weights,
            alternative_weights: data.alternative_weights,
            scores,
            ranking,
            warnings: data.warnings,
            config: data.config,
        })
    }
}

#[cfg(feature = "serde")]
impl Evaluation {
    pub fn to_json(&self) -> Result<String, AhpError> {
        serde_json::to_string(self)
            .map_err(|e| AhpError::SerializationError(format!("Failed to serialize: {}", e)))
    }

    pub fn from_json(json: &str) -> Result<Self, AhpError> {
        serde_json::from_str(json)
            .map_err(|e| AhpError::SerializationError(format!("Failed to deserialize: {}", e)))
    }
}
