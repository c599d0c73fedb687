//! Inference - feature validation, model loading and scoring

pub mod centroid;
pub mod classifier;
pub mod features;
pub mod forest;
pub mod provider;
pub mod scorer;

pub use classifier::{Classifier, ClassifierError, ProbabilisticClassifier};
pub use features::{FeatureVector, ValidationError, FEATURE_COUNT, FEATURE_LAYOUT};
pub use provider::{FileModelProvider, ModelHandle, ModelLoadError, ModelProvider, StaticModelProvider};
pub use scorer::{score, PredictionResult, ScoreError, DEFAULT_CONFIDENCE};
