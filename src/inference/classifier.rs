//! Classifier traits
//!
//! Every loaded model implements [`Classifier`]. Models that can emit a
//! per-class probability distribution additionally expose it through
//! [`Classifier::as_probabilistic`], so callers branch on a typed
//! capability instead of probing for a method at runtime.

use ndarray::{Array1, Array2, ArrayView2};
use thiserror::Error;

/// Failure inside a model's scoring call
#[derive(Debug, Clone, PartialEq, Error)]
#[error("model scoring failed: {0}")]
pub struct ClassifierError(pub String);

/// A trained model that maps samples to discrete class labels
pub trait Classifier: Send + Sync {
    /// Short model family name, e.g. "random_forest"
    fn kind(&self) -> &'static str;

    /// Number of features per sample
    fn n_features(&self) -> usize;

    /// Predict one class label per row of `samples`
    fn predict(&self, samples: ArrayView2<'_, f64>) -> Result<Array1<usize>, ClassifierError>;

    /// Probability capability, if this model has one
    fn as_probabilistic(&self) -> Option<&dyn ProbabilisticClassifier> {
        None
    }
}

/// Models that output a probability distribution over classes
pub trait ProbabilisticClassifier: Classifier {
    /// One row per sample, one column per class; each row sums to 1
    fn predict_proba(&self, samples: ArrayView2<'_, f64>) -> Result<Array2<f64>, ClassifierError>;
}

/// Check a sample matrix has the width the model was trained on
pub(crate) fn check_width(model: &dyn Classifier, samples: &ArrayView2<'_, f64>) -> Result<(), ClassifierError> {
    let width = samples.ncols();
    if width != model.n_features() {
        return Err(ClassifierError(format!(
            "expected {} columns, got {}",
            model.n_features(),
            width
        )));
    }
    Ok(())
}
