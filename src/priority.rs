use crate::matrix::PairwiseMatrix;
use crate::AhpError;
use nalgebra::DVector;
use std::ops::Index;

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PriorityMethod {
    /// Row means of the column-normalized matrix.
    #[default]
    ColumnMean,
    /// Principal eigenvector by power iteration, normalized to sum 1.
    PowerIteration { max_iterations: usize, tolerance: f64 },
}

impl PriorityMethod {
    pub fn power_iteration() -> Self {
        PriorityMethod::PowerIteration {
            max_iterations: 100,
            tolerance: 1e-12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZeroWeightPolicy {
    #[default]
    Reject,
    Uniform,
}

const SUM_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<f64>"))]
pub struct WeightVector(Vec<f64>);

impl WeightVector {
    pub fn uniform(n: usize) -> Self {
        WeightVector(vec![1.0 / n as f64; n])
    }

    pub fn normalize(raw: &[f64], policy: ZeroWeightPolicy) -> Result<Self, AhpError> {
        if raw.is_empty() {
            return Err(AhpError::InvalidWeights("no weights supplied".to_string()));
        }

        if let Some((index, value)) = raw
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(AhpError::InvalidWeights(format!(
                "weight {} must be a non-negative number, got {}",
                index, value
            )));
        }

        let total: f64 = raw.iter().sum();
        if total == 0.0 {
            return match policy {
                ZeroWeightPolicy::Reject => Err(AhpError::InvalidWeights(
                    "cannot normalize a zero vector".to_string(),
                )),
                ZeroWeightPolicy::Uniform => Ok(Self::uniform(raw.len())),
            };
        }

        Ok(WeightVector(raw.iter().map(|v| v / total).collect()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }
}

impl Index<usize> for WeightVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl TryFrom<Vec<f64>> for WeightVector {
    type Error = AhpError;

    fn try_from(weights: Vec<f64>) -> Result<Self, AhpError> {
        if weights.is_empty() {
            return Err(AhpError::InvalidWeights("no weights supplied".to_string()));
        }
        if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(AhpError::InvalidWeights(format!(
                "weights must be non-negative numbers, got {}",
                bad
            )));
        }
        let total: f64 = weights.iter().sum();
        if (total - 1.0).abs() > SUM_TOLERANCE {
            return Err(AhpError::InvalidWeights(format!(
                "weights must sum to 1, got {}",
                total
            )));
        }
        Ok(WeightVector(weights))
    }
}

impl From<DVector<f64>> for WeightVector {
    fn from(v: DVector<f64>) -> Self {
        WeightVector(v.iter().copied().collect())
    }
}

pub fn priority_vector(matrix: &PairwiseMatrix, method: &PriorityMethod) -> WeightVector {
    match method {
        PriorityMethod::ColumnMean => column_mean(matrix),
        PriorityMethod::PowerIteration {
            max_iterations,
            tolerance,
        } => power_iteration(matrix, *max_iterations, *tolerance),
    }
}

fn column_mean(matrix: &PairwiseMatrix) -> WeightVector {
    let m = matrix.as_matrix();
    let n = m.nrows();

    let mut normalized = m.clone();
    for j in 0..n {
        let column_sum = m.column(j).sum();
        normalized.column_mut(j).unscale_mut(column_sum);
    }

    DVector::from_fn(n, |i, _| normalized.row(i).mean()).into()
}

fn power_iteration(matrix: &PairwiseMatrix, max_iterations: usize, tolerance: f64) -> WeightVector {
    let m = matrix.as_matrix();
    let n = m.nrows();

    // Positive matrix, so every iterate stays strictly positive.
    let mut v = DVector::from_element(n, 1.0 / n as f64);
    for _ in 0..max_iterations {
        let mut next = m * &v;
        let total = next.sum();
        next.unscale_mut(total);

        let delta = (&next - &v).amax();
        v = next;
        if delta < tolerance {
            break;
        }
    }

    v.into()
}
