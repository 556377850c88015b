use serde::Deserialize;

/// Shape violations found while building a [`SimilarityMatrix`]
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MatrixError {
    #[error("row {row} has {len} scores, expected {expected}")]
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("score at ({row}, {col}) is not a finite number")]
    NonFinite { row: usize, col: usize },
}

/// Square matrix of pairwise similarity scores, stored row-major
///
/// `row(i)[j]` is the similarity between the movies at row indices `i` and `j`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>")]
pub struct SimilarityMatrix {
    dimension: usize,
    scores: Vec<f64>,
}

impl SimilarityMatrix {
    /// Builds a matrix from nested rows, rejecting ragged rows and non-finite scores
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let dimension = rows.len();
        let mut scores = Vec::with_capacity(dimension * dimension);

        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != dimension {
                return Err(MatrixError::Ragged {
                    row,
                    len: values.len(),
                    expected: dimension,
                });
            }
            if let Some(col) = values.iter().position(|score| !score.is_finite()) {
                return Err(MatrixError::NonFinite { row, col });
            }
            scores.extend(values);
        }

        Ok(Self { dimension, scores })
    }

    /// Number of rows (and columns)
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if index >= self.dimension {
            return None;
        }
        let start = index * self.dimension;
        Some(&self.scores[start..start + self.dimension])
    }
}

impl TryFrom<Vec<Vec<f64>>> for SimilarityMatrix {
    type Error = MatrixError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}
