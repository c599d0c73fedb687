//! Random forest classifier
//!
//! Trees are stored as nested split/leaf nodes. Each leaf carries the class
//! distribution of the training samples that reached it; the forest
//! averages those distributions and predicts the most probable class.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use super::classifier::{check_width, Classifier, ClassifierError, ProbabilisticClassifier};

/// One node of a decision tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    Leaf {
        distribution: Vec<f64>,
    },
}

impl Node {
    /// Walk to the leaf for `sample`. Goes left when `x[feature] <= threshold`.
    fn leaf_for(&self, sample: ArrayView1<'_, f64>) -> &[f64] {
        let mut node = self;
        loop {
            match node {
                Node::Split { feature, threshold, left, right } => {
                    node = if sample[*feature] <= *threshold { &**left } else { &**right };
                }
                Node::Leaf { distribution } => return distribution,
            }
        }
    }

    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        match self {
            Node::Split { feature, threshold, left, right } => {
                if *feature >= n_features {
                    return Err(format!("split on feature {} but model has {}", feature, n_features));
                }
                if !threshold.is_finite() {
                    return Err(format!("non-finite threshold on feature {}", feature));
                }
                left.validate(n_features, n_classes)?;
                right.validate(n_features, n_classes)
            }
            Node::Leaf { distribution } => {
                if distribution.len() != n_classes {
                    return Err(format!(
                        "leaf has {} classes, expected {}",
                        distribution.len(),
                        n_classes
                    ));
                }
                if distribution.iter().any(|p| !p.is_finite() || *p < 0.0) {
                    return Err("leaf distribution must be finite and non-negative".to_string());
                }
                if distribution.iter().sum::<f64>() <= 0.0 {
                    return Err("leaf distribution sums to zero".to_string());
                }
                Ok(())
            }
        }
    }
}

/// Ensemble of decision trees with soft voting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub n_classes: usize,
    pub trees: Vec<Node>,
}

impl RandomForest {
    /// Structural checks run once at load time
    pub fn validate(&self) -> Result<(), String> {
        if self.n_classes == 0 {
            return Err("n_classes must be positive".to_string());
        }
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, self.n_classes)
                .map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }

    /// Mean of normalized leaf distributions for one sample
    fn sample_proba(&self, sample: ArrayView1<'_, f64>) -> Array1<f64> {
        let mut acc = Array1::<f64>::zeros(self.n_classes);
        for tree in &self.trees {
            let leaf = tree.leaf_for(sample);
            let total: f64 = leaf.iter().sum();
            for (slot, p) in acc.iter_mut().zip(leaf) {
                *slot += p / total;
            }
        }
        acc / self.trees.len() as f64
    }
}

/// Index of the largest value; ties resolve to the lowest index
fn argmax(row: ArrayView1<'_, f64>) -> usize {
    row.iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, &p)| if p > best.1 { (i, p) } else { best })
        .0
}

impl Classifier for RandomForest {
    fn kind(&self) -> &'static str {
        "random_forest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, samples: ArrayView2<'_, f64>) -> Result<Array1<usize>, ClassifierError> {
        let proba = self.predict_proba(samples)?;
        Ok(proba.axis_iter(Axis(0)).map(argmax).collect())
    }

    fn as_probabilistic(&self) -> Option<&dyn ProbabilisticClassifier> {
        Some(self)
    }
}

impl ProbabilisticClassifier for RandomForest {
    fn predict_proba(&self, samples: ArrayView2<'_, f64>) -> Result<Array2<f64>, ClassifierError> {
        check_width(self, &samples)?;

        let mut out = Array2::<f64>::zeros((samples.nrows(), self.n_classes));
        for (sample, mut row) in samples.axis_iter(Axis(0)).zip(out.axis_iter_mut(Axis(0))) {
            row.assign(&self.sample_proba(sample));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn leaf(d: &[f64]) -> Box<Node> {
        Box::new(Node::Leaf { distribution: d.to_vec() })
    }

    fn stump(feature: usize, threshold: f64, left: &[f64], right: &[f64]) -> Node {
        Node::Split { feature, threshold, left: leaf(left), right: leaf(right) }
    }

    fn forest() -> RandomForest {
        RandomForest {
            n_features: 4,
            n_classes: 3,
            trees: vec![
                stump(2, 2.45, &[40.0, 0.0, 0.0], &[0.0, 30.0, 10.0]),
                stump(3, 0.8, &[1.0, 0.0, 0.0], &[0.0, 0.5, 0.5]),
            ],
        }
    }

    #[test]
    fn test_predict_proba_rows_sum_to_one() {
        let f = forest();
        let samples = array![[5.1, 3.5, 1.4, 0.2], [6.4, 3.2, 4.5, 1.5]];
        let proba = f.predict_proba(samples.view()).unwrap();

        for row in proba.axis_iter(Axis(0)) {
            assert!((row.sum() - 1.0).abs() < 1e-12);
        }
        assert_eq!(proba[[0, 0]], 1.0);
        // (0.75 + 0.5) / 2
        assert!((proba[[1, 1]] - 0.625).abs() < 1e-12);
    }

    #[test]
    fn test_predict_is_argmax() {
        let f = forest();
        let samples = array![[5.1, 3.5, 1.4, 0.2], [6.4, 3.2, 4.5, 1.5]];
        let labels = f.predict(samples.view()).unwrap();
        assert_eq!(labels.to_vec(), vec![0, 1]);
    }

    #[test]
    fn test_tie_picks_lowest_class() {
        assert_eq!(argmax(array![0.5, 0.5, 0.0].view()), 0);
        assert_eq!(argmax(array![0.2, 0.4, 0.4].view()), 1);
    }

    #[test]
    fn test_wrong_width_is_error() {
        let f = forest();
        let samples = array![[1.0, 2.0]];
        assert!(f.predict(samples.view()).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_structure() {
        let mut f = forest();
        f.trees.push(stump(7, 1.0, &[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]));
        assert!(f.validate().unwrap_err().contains("feature 7"));

        let mut f = forest();
        f.trees.push(stump(0, 1.0, &[1.0, 0.0], &[0.0, 1.0, 0.0]));
        assert!(f.validate().is_err());

        let mut f = forest();
        f.trees.push(stump(0, 1.0, &[0.0, 0.0, 0.0], &[0.0, 1.0, 0.0]));
        assert!(f.validate().unwrap_err().contains("sums to zero"));

        let f = RandomForest { n_features: 4, n_classes: 3, trees: vec![] };
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_exposes_probability_capability() {
        let f = forest();
        assert!(f.as_probabilistic().is_some());
    }
}
