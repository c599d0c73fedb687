//! Nearest-centroid classifier
//!
//! Hard-label model: there is no probability output, so it does not
//! implement [`ProbabilisticClassifier`](super::classifier::ProbabilisticClassifier).

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use super::classifier::{check_width, Classifier, ClassifierError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestCentroid {
    /// One row per class, one column per feature
    pub centroids: Vec<Vec<f64>>,
}

impl NearestCentroid {
    pub fn validate(&self) -> Result<(), String> {
        let width = match self.centroids.first() {
            Some(row) if !row.is_empty() => row.len(),
            _ => return Err("model has no centroids".to_string()),
        };
        for (i, row) in self.centroids.iter().enumerate() {
            if row.len() != width {
                return Err(format!("centroid {} has {} features, expected {}", i, row.len(), width));
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(format!("centroid {} is not finite", i));
            }
        }
        Ok(())
    }

    fn nearest(&self, sample: ArrayView1<'_, f64>) -> usize {
        self.centroids
            .iter()
            .map(|c| c.iter().zip(sample.iter()).map(|(a, b)| (a - b) * (a - b)).sum::<f64>())
            .enumerate()
            .fold((0, f64::INFINITY), |best, (i, d)| if d < best.1 { (i, d) } else { best })
            .0
    }
}

impl Classifier for NearestCentroid {
    fn kind(&self) -> &'static str {
        "nearest_centroid"
    }

    fn n_features(&self) -> usize {
        self.centroids.first().map(Vec::len).unwrap_or(0)
    }

    fn predict(&self, samples: ArrayView2<'_, f64>) -> Result<Array1<usize>, ClassifierError> {
        check_width(self, &samples)?;
        Ok(samples.axis_iter(Axis(0)).map(|s| self.nearest(s)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn iris_means() -> NearestCentroid {
        NearestCentroid {
            centroids: vec![
                vec![5.006, 3.428, 1.462, 0.246],
                vec![5.936, 2.770, 4.260, 1.326],
                vec![6.588, 2.974, 5.552, 2.026],
            ],
        }
    }

    #[test]
    fn test_predicts_closest_centroid() {
        let model = iris_means();
        let samples = array![
            [5.1, 3.5, 1.4, 0.2],
            [6.4, 3.2, 4.5, 1.5],
            [6.3, 3.3, 6.0, 2.5],
        ];
        let labels = model.predict(samples.view()).unwrap();
        assert_eq!(labels.to_vec(), vec![0, 1, 2]);
    }

    #[test]
    fn test_has_no_probability_capability() {
        assert!(iris_means().as_probabilistic().is_none());
    }

    #[test]
    fn test_validate_ragged_rows() {
        let model = NearestCentroid {
            centroids: vec![vec![0.0, 0.0], vec![1.0]],
        };
        assert!(model.validate().unwrap_err().contains("centroid 1"));

        let empty = NearestCentroid { centroids: vec![] };
        assert!(empty.validate().is_err());
    }
}
