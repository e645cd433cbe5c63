use rayon::prelude::*;

use crate::{
    error::{AppError, AppResult},
    services::vectorizer::TagVector,
};

/// Dense N×N cosine similarity matrix, row-major
///
/// Row and column `i` refer to corpus movie `i`. Exact pairwise computation,
/// O(N²·D); intended for corpora in the low thousands.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

fn dot(a: &[u32], b: &[u32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| f64::from(x) * f64::from(y))
        .sum()
}

impl SimilarityMatrix {
    /// Pairwise cosine similarity of every vector
    ///
    /// Pairs involving a zero vector score 0, including its own diagonal
    /// entry; every other diagonal entry is exactly 1. Only the upper
    /// triangle is computed, so the result is bit-for-bit symmetric.
    pub fn build(vectors: &[TagVector]) -> Self {
        let size = vectors.len();
        let norms: Vec<f64> = vectors
            .par_iter()
            .map(|v| dot(v.counts(), v.counts()).sqrt())
            .collect();

        // upper triangle of row i, starting at the diagonal
        let upper: Vec<Vec<f64>> = (0..size)
            .into_par_iter()
            .map(|i| {
                if norms[i] == 0.0 {
                    return vec![0.0; size - i];
                }
                (i..size)
                    .map(|j| {
                        if j == i {
                            1.0
                        } else if norms[j] == 0.0 {
                            0.0
                        } else {
                            dot(vectors[i].counts(), vectors[j].counts()) / (norms[i] * norms[j])
                        }
                    })
                    .collect()
            })
            .collect();

        let mut values = vec![0.0; size * size];
        for (i, row) in upper.into_iter().enumerate() {
            for (offset, score) in row.into_iter().enumerate() {
                let j = i + offset;
                values[i * size + j] = score;
                values[j * size + i] = score;
            }
        }

        Self { size, values }
    }

    /// Rebuilds a matrix from persisted rows, checking it is square
    pub fn from_rows(rows: Vec<Vec<f64>>) -> AppResult<Self> {
        let size = rows.len();
        let mut values = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(AppError::Snapshot(format!(
                    "similarity row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    size
                )));
            }
            values.extend(row);
        }
        Ok(Self { size, values })
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.size).map(|i| self.row(i).to_vec()).collect()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.size..(i + 1) * self.size]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TagDocument;
    use crate::services::vectorizer::Vocabulary;

    fn vectors(texts: &[&str]) -> Vec<TagVector> {
        let documents: Vec<TagDocument> = texts.iter().map(|t| TagDocument::new(*t)).collect();
        Vocabulary::fit(&documents, 100)
            .unwrap()
            .vectorize_all(&documents)
    }

    #[test]
    fn test_three_movie_example_is_half_everywhere() {
        let matrix = SimilarityMatrix::build(&vectors(&["space war", "space love", "love war"]));
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.5 };
                assert!((matrix.get(i, j) - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_symmetric_with_unit_diagonal() {
        let matrix = SimilarityMatrix::build(&vectors(&[
            "space war war alien",
            "space love",
            "alien alien planet",
            "love story drama",
        ]));
        for i in 0..matrix.size() {
            assert_eq!(matrix.get(i, i), 1.0);
            for j in 0..matrix.size() {
                assert_eq!(matrix.get(i, j).to_bits(), matrix.get(j, i).to_bits());
                assert!((0.0..=1.0 + 1e-12).contains(&matrix.get(i, j)));
            }
        }
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        let documents = [
            TagDocument::new("space war"),
            TagDocument::new("the and of"),
            TagDocument::new("space"),
        ];
        let vocabulary = Vocabulary::fit(&documents, 100).unwrap();
        let zero_matrix = SimilarityMatrix::build(&vocabulary.vectorize_all(&documents));

        assert_eq!(zero_matrix.size(), 3);
        assert_eq!(zero_matrix.get(1, 1), 0.0);
        assert_eq!(zero_matrix.get(0, 1), 0.0);
        assert_eq!(zero_matrix.get(1, 2), 0.0);
        assert_eq!(zero_matrix.get(0, 0), 1.0);
    }

    #[test]
    fn test_rebuild_is_bit_identical() {
        let input = vectors(&["space war", "war love story", "alien space story"]);
        let first = SimilarityMatrix::build(&input);
        let second = SimilarityMatrix::build(&input);
        let bits = |m: &SimilarityMatrix| m.values.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&first), bits(&second));
    }

    /// Straightforward single-threaded reference
    fn sequential(vectors: &[TagVector]) -> Vec<f64> {
        let n = vectors.len();
        let norms: Vec<f64> = vectors.iter().map(|v| dot(v.counts(), v.counts()).sqrt()).collect();
        let mut values = vec![0.0; n * n];
        for i in 0..n {
            if norms[i] == 0.0 {
                continue;
            }
            values[i * n + i] = 1.0;
            for j in (i + 1)..n {
                if norms[j] == 0.0 {
                    continue;
                }
                let score = dot(vectors[i].counts(), vectors[j].counts()) / (norms[i] * norms[j]);
                values[i * n + j] = score;
                values[j * n + i] = score;
            }
        }
        values
    }

    #[test]
    fn test_parallel_build_matches_sequential() {
        let words = ["space", "war", "love", "alien", "planet", "story", "drama", "heist", "ghost"];
        let texts: Vec<String> = (0..300)
            .map(|i| {
                let mut doc: Vec<&str> = (0..(i % 7))
                    .map(|k| words[(i * 3 + k * 5) % words.len()])
                    .collect();
                // every 50th movie has no usable terms
                if i % 50 == 0 {
                    doc = vec!["the"];
                }
                doc.join(" ")
            })
            .collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let input = vectors(&refs);

        let matrix = SimilarityMatrix::build(&input);
        let bits = |values: &[f64]| values.iter().map(|v| v.to_bits()).collect::<Vec<_>>();

        assert_eq!(matrix.size(), 300);
        assert_eq!(bits(&matrix.values), bits(&sequential(&input)));
        assert_eq!(bits(&matrix.values), bits(&SimilarityMatrix::build(&input).values));
        for i in 0..matrix.size() {
            for j in 0..i {
                assert_eq!(matrix.get(i, j).to_bits(), matrix.get(j, i).to_bits());
            }
        }
    }

    #[test]
    fn test_rows_round_trip_and_shape_check() {
        let matrix = SimilarityMatrix::build(&vectors(&["space war", "space love"]));
        let restored = SimilarityMatrix::from_rows(matrix.to_rows()).unwrap();
        assert_eq!(restored, matrix);

        let err = SimilarityMatrix::from_rows(vec![vec![1.0, 0.0], vec![0.0]]).unwrap_err();
        assert!(matches!(err, AppError::Snapshot(_)));
    }
}
