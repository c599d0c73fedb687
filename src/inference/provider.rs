//! Model Provider - loading and publishing the active model
//!
//! The provider owns a single slot holding the current [`ModelHandle`].
//! Handlers only ever read it; a reload swaps the whole `Arc` so in-flight
//! requests keep scoring against the handle they started with.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::centroid::NearestCentroid;
use super::classifier::Classifier;
use super::features::FEATURE_COUNT;
use super::forest::RandomForest;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

// ============================================================================
// ARTIFACT
// ============================================================================

/// On-disk model document, tagged by model family
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    RandomForest(RandomForest),
    NearestCentroid(NearestCentroid),
}

impl ModelArtifact {
    /// Parse and validate an artifact from raw bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ModelLoadError> {
        let artifact: ModelArtifact = serde_json::from_slice(bytes)?;
        artifact.validate()?;
        Ok(artifact)
    }

    fn validate(&self) -> Result<(), ModelLoadError> {
        let structure = match self {
            ModelArtifact::RandomForest(m) => m.validate(),
            ModelArtifact::NearestCentroid(m) => m.validate(),
        };
        structure.map_err(ModelLoadError::Invalid)?;

        let n_features = self.as_classifier().n_features();
        if n_features != FEATURE_COUNT {
            return Err(ModelLoadError::Invalid(format!(
                "model expects {} features, service provides {}",
                n_features, FEATURE_COUNT
            )));
        }
        Ok(())
    }

    fn as_classifier(&self) -> &dyn Classifier {
        match self {
            ModelArtifact::RandomForest(m) => m,
            ModelArtifact::NearestCentroid(m) => m,
        }
    }

    fn into_classifier(self) -> Arc<dyn Classifier> {
        match self {
            ModelArtifact::RandomForest(m) => Arc::new(m),
            ModelArtifact::NearestCentroid(m) => Arc::new(m),
        }
    }
}

// ============================================================================
// HANDLE
// ============================================================================

/// The loaded model plus the metadata reported alongside predictions
pub struct ModelHandle {
    model: Arc<dyn Classifier>,
    version: String,
    digest: Option<String>,
    loaded_at: DateTime<Utc>,
}

impl ModelHandle {
    pub fn new(model: Arc<dyn Classifier>, version: impl Into<String>) -> Self {
        Self {
            model,
            version: version.into(),
            digest: None,
            loaded_at: Utc::now(),
        }
    }

    pub fn model(&self) -> &dyn Classifier {
        self.model.as_ref()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// SHA-256 of the artifact bytes, when loaded from a file
    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("kind", &self.model.kind())
            .field("version", &self.version)
            .field("digest", &self.digest)
            .field("loaded_at", &self.loaded_at)
            .finish()
    }
}

// ============================================================================
// PROVIDER
// ============================================================================

/// Source of the currently active model
pub trait ModelProvider: Send + Sync {
    /// The active model, or `None` if nothing is loaded
    fn current(&self) -> Option<Arc<ModelHandle>>;
}

/// Provider backed by a JSON artifact on disk
pub struct FileModelProvider {
    path: PathBuf,
    version: String,
    slot: RwLock<Option<Arc<ModelHandle>>>,
}

impl FileModelProvider {
    /// Create an empty provider; nothing is read until [`load`](Self::load)
    pub fn new(path: impl AsRef<Path>, version: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            version: version.into(),
            slot: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read, validate and publish the artifact.
    ///
    /// On failure the slot is left untouched, so a failed reload keeps the
    /// previous model serving.
    pub fn load(&self) -> Result<Arc<ModelHandle>, ModelLoadError> {
        tracing::info!(path = %self.path.display(), "Loading ML model...");

        let bytes = std::fs::read(&self.path).map_err(|source| ModelLoadError::Io {
            path: self.path.clone(),
            source,
        })?;
        let digest = format!("{:x}", Sha256::digest(&bytes));
        let artifact = ModelArtifact::from_slice(&bytes)?;

        let model = artifact.into_classifier();
        let kind = model.kind();
        let handle = Arc::new(ModelHandle {
            model,
            version: self.version.clone(),
            digest: Some(digest),
            loaded_at: Utc::now(),
        });

        *self.slot.write() = Some(handle.clone());

        tracing::info!(
            kind,
            version = %handle.version,
            sha256 = handle.digest().unwrap_or_default(),
            "Model loaded successfully"
        );
        Ok(handle)
    }

    /// Re-read the artifact, keeping the current model if that fails
    pub fn reload(&self) -> Result<Arc<ModelHandle>, ModelLoadError> {
        self.load().map_err(|e| {
            tracing::error!("Model reload failed, keeping previous model: {}", e);
            e
        })
    }
}

impl ModelProvider for FileModelProvider {
    fn current(&self) -> Option<Arc<ModelHandle>> {
        self.slot.read().clone()
    }
}

/// Provider with a fixed handle, or none at all
#[derive(Debug, Default)]
pub struct StaticModelProvider {
    handle: Option<Arc<ModelHandle>>,
}

impl StaticModelProvider {
    pub fn new(handle: ModelHandle) -> Self {
        Self { handle: Some(Arc::new(handle)) }
    }

    /// A provider that never has a model
    pub fn empty() -> Self {
        Self::default()
    }
}

impl ModelProvider for StaticModelProvider {
    fn current(&self) -> Option<Arc<ModelHandle>> {
        self.handle.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CENTROID_JSON: &str = r#"{
        "kind": "nearest_centroid",
        "centroids": [[5.0, 3.4, 1.5, 0.2], [5.9, 2.8, 4.3, 1.3], [6.6, 3.0, 5.6, 2.0]]
    }"#;

    fn write_artifact(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_publishes_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(&dir, "model.json", CENTROID_JSON);
        let provider = FileModelProvider::new(&path, "2.0.0");

        assert!(provider.current().is_none());

        let handle = provider.load().unwrap();
        assert_eq!(handle.version(), "2.0.0");
        assert_eq!(handle.model().kind(), "nearest_centroid");
        assert_eq!(handle.digest().map(str::len), Some(64));

        let current = provider.current().unwrap();
        assert!(Arc::ptr_eq(&handle, &current));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let provider = FileModelProvider::new("/nonexistent/model.json", "1.0.0");
        assert!(matches!(provider.load(), Err(ModelLoadError::Io { .. })));
        assert!(provider.current().is_none());
    }

    #[test]
    fn test_failed_reload_keeps_previous_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(&dir, "model.json", CENTROID_JSON);
        let provider = FileModelProvider::new(&path, "1.0.0");
        let first = provider.load().unwrap();

        write_artifact(&dir, "model.json", "{ not json");
        assert!(matches!(provider.reload(), Err(ModelLoadError::Parse(_))));

        let current = provider.current().unwrap();
        assert!(Arc::ptr_eq(&first, &current));
    }

    #[test]
    fn test_rejects_wrong_feature_count() {
        let json = r#"{"kind": "nearest_centroid", "centroids": [[1.0, 2.0], [3.0, 4.0]]}"#;
        let err = ModelArtifact::from_slice(json.as_bytes()).unwrap_err();
        assert!(matches!(err, ModelLoadError::Invalid(msg) if msg.contains("expects 2 features")));
    }

    #[test]
    fn test_rejects_unknown_kind() {
        let json = r#"{"kind": "svm", "support_vectors": []}"#;
        assert!(matches!(
            ModelArtifact::from_slice(json.as_bytes()),
            Err(ModelLoadError::Parse(_))
        ));
    }

    #[test]
    fn test_parses_forest_artifact() {
        let json = r#"{
            "kind": "random_forest",
            "n_features": 4,
            "n_classes": 2,
            "trees": [
                {"split": {"feature": 2, "threshold": 2.45,
                    "left": {"leaf": {"distribution": [1.0, 0.0]}},
                    "right": {"leaf": {"distribution": [0.0, 1.0]}}}}
            ]
        }"#;
        let artifact = ModelArtifact::from_slice(json.as_bytes()).unwrap();
        let model = artifact.into_classifier();
        assert_eq!(model.kind(), "random_forest");
        assert!(model.as_probabilistic().is_some());
    }

    #[test]
    fn test_static_provider() {
        assert!(StaticModelProvider::empty().current().is_none());

        let model = Arc::new(NearestCentroid { centroids: vec![vec![0.0; 4]] });
        let provider = StaticModelProvider::new(ModelHandle::new(model, "test"));
        assert_eq!(provider.current().unwrap().version(), "test");
    }
}
