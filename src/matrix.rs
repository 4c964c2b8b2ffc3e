use crate::parser::{parse_comparison, InputWarning, PairLocation, Scope, SCALE_RANGE};
use crate::{AhpError, ItemKind};
use nalgebra::DMatrix;

/// Labels are display-only: every computation indexes by position, so duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawItemSet"))]
pub struct ItemSet {
    kind: ItemKind,
    labels: Vec<String>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawItemSet {
    kind: ItemKind,
    labels: Vec<String>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawItemSet> for ItemSet {
    type Error = AhpError;

    fn try_from(raw: RawItemSet) -> Result<Self, AhpError> {
        ItemSet::new(raw.kind, &raw.labels)
    }
}

impl ItemSet {
    pub fn new<S: AsRef<str>>(kind: ItemKind, labels: &[S]) -> Result<Self, AhpError> {
        if labels.is_empty() {
            return Err(AhpError::EmptyItemSet(kind));
        }

        let mut owned = Vec::with_capacity(labels.len());
        for (index, label) in labels.iter().enumerate() {
            let label = label.as_ref().trim();
            if label.is_empty() {
                return Err(AhpError::EmptyLabel { kind, index });
            }
            owned.push(label.to_string());
        }

        Ok(ItemSet {
            kind,
            labels: owned,
        })
    }

    pub fn from_lines(kind: ItemKind, text: &str) -> Result<Self, AhpError> {
        let labels: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        Self::new(kind, &labels)
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn pair_count(&self) -> usize {
        pair_count(self.len())
    }

    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> {
        pairs(self.len())
    }

    pub(crate) fn pair_index(&self, row: usize, col: usize) -> Result<usize, AhpError> {
        let n = self.len();
        if row >= col || col >= n {
            return Err(AhpError::InvalidPair {
                row,
                col,
                size: n,
            });
        }
        Ok(row * (2 * n - row - 1) / 2 + (col - row - 1))
    }
}

pub(crate) fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

pub(crate) fn pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| (i, j)))
}

/// Square reciprocal matrix: `m[i][i] == 1` and `m[j][i] == 1 / m[i][j]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseMatrix {
    inner: DMatrix<f64>,
}

impl PairwiseMatrix {
    pub fn identity(n: usize) -> Self {
        PairwiseMatrix {
            inner: DMatrix::from_element(n, n, 1.0),
        }
    }

    /// Builds the matrix from upper-triangle values given in [`ItemSet::pairs`] order.
    pub fn from_upper_triangle(n: usize, values: &[f64]) -> Result<Self, AhpError> {
        let expected = pair_count(n);
        if values.len() != expected {
            return Err(AhpError::ComparisonCountMismatch {
                expected,
                actual: values.len(),
            });
        }

        let mut matrix = Self::identity(n);
        for ((i, j), &value) in pairs(n).zip(values) {
            if !SCALE_RANGE.contains(&value) {
                return Err(AhpError::InvalidWeights(format!(
                    "comparison ({}, {}) must lie in [1e-100, 1e100], got {}",
                    i, j, value
                )));
            }
            matrix.set_pair(i, j, value);
        }

        Ok(matrix)
    }

    pub fn from_tokens<S: AsRef<str>>(
        n: usize,
        tokens: &[S],
        scope: Scope,
    ) -> Result<(Self, Vec<InputWarning>), AhpError> {
        let expected = pair_count(n);
        if tokens.len() != expected {
            return Err(AhpError::ComparisonCountMismatch {
                expected,
                actual: tokens.len(),
            });
        }

        let mut matrix = Self::identity(n);
        let mut warnings = Vec::new();

        for ((i, j), token) in pairs(n).zip(tokens) {
            let (value, warning) = parse_comparison(token.as_ref(), PairLocation::new(scope, i, j));
            warnings.extend(warning);
            matrix.set_pair(i, j, value);
        }

        Ok((matrix, warnings))
    }

    fn set_pair(&mut self, i: usize, j: usize, value: f64) {
        self.inner[(i, j)] = value;
        self.inner[(j, i)] = 1.0 / value;
    }

    pub fn dim(&self) -> usize {
        self.inner.nrows()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.inner.get((row, col)).copied()
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.inner
    }
}
