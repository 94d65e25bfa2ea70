//! Trained model artifacts: classifier, label encoders and feature scaler.
//!
//! Artifacts live side by side in one directory:
//!
//! - `pest_risk_model.json`: random forest ([`ForestClassifier`])
//! - `encoders.json`: label encoders keyed by column (`season`, `pest_risk`)
//! - `scalers.json`: standard scalers keyed by name (`features`)
//!
//! Each file is optional and loaded independently. A missing classifier
//! disables the statistical path; missing encoders or scalers fall back to
//! the static season mapping and unscaled features.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::classifier::{ForestClassifier, RiskClassifier};
use crate::error::{EngineError, EngineResult};

pub const MODEL_FILE: &str = "pest_risk_model.json";
pub const ENCODERS_FILE: &str = "encoders.json";
pub const SCALERS_FILE: &str = "scalers.json";

/// Encoder key for the season feature.
pub const SEASON_ENCODER: &str = "season";
/// Encoder key for the pest-risk target labels.
pub const TARGET_ENCODER: &str = "pest_risk";
/// Scaler key for the full feature vector.
pub const FEATURE_SCALER: &str = "features";

/// Maps string labels to contiguous integer codes, in `classes` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    /// Code for a label. Labels not seen during fitting are an error.
    pub fn transform(&self, label: &str) -> EngineResult<usize> {
        self.classes
            .iter()
            .position(|c| c == label)
            .ok_or_else(|| EngineError::UnseenLabel(label.to_string()))
    }

    pub fn inverse(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }
}

/// Standardises features as `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn transform(&self, features: &[f64]) -> EngineResult<Vec<f64>> {
        if features.len() != self.mean.len() || self.scale.len() != self.mean.len() {
            return Err(EngineError::FeatureMismatch {
                expected: self.mean.len(),
                actual: features.len(),
            });
        }
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                // Constant features are fitted with zero variance; leave them centred only.
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect())
    }
}

/// Everything loaded from the model directory.
#[derive(Clone, Default)]
pub struct ModelArtifacts {
    pub classifier: Option<Arc<dyn RiskClassifier>>,
    pub season_encoder: Option<LabelEncoder>,
    pub target_encoder: Option<LabelEncoder>,
    pub scaler: Option<StandardScaler>,
}

impl std::fmt::Debug for ModelArtifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelArtifacts")
            .field("classifier", &self.classifier.as_ref().map(|c| c.name().to_string()))
            .field("season_encoder", &self.season_encoder)
            .field("target_encoder", &self.target_encoder)
            .field("scaler", &self.scaler)
            .finish()
    }
}

impl ModelArtifacts {
    /// No classifier, no encoders, no scaler.
    pub fn none() -> Self {
        Self::default()
    }

    /// Load whatever artifacts are present in `dir`. Never fails.
    pub fn load(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();

        let classifier = match read_json::<ForestClassifier>(&dir.join(MODEL_FILE))
            .and_then(|forest| forest.validate().map(|()| forest))
        {
            Ok(forest) => {
                tracing::info!(
                    trees = forest.trees.len(),
                    classes = forest.n_classes,
                    "pest risk model loaded"
                );
                Some(Arc::new(forest) as Arc<dyn RiskClassifier>)
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not load pest risk model, using rule-based predictions");
                None
            }
        };

        let mut encoders = match read_json::<HashMap<String, LabelEncoder>>(&dir.join(ENCODERS_FILE)) {
            Ok(encoders) => encoders,
            Err(e) => {
                tracing::warn!(error = %e, "could not load label encoders, using static season mapping");
                HashMap::new()
            }
        };

        let scaler = match read_json::<HashMap<String, StandardScaler>>(&dir.join(SCALERS_FILE)) {
            Ok(mut scalers) => scalers.remove(FEATURE_SCALER),
            Err(e) => {
                tracing::warn!(error = %e, "could not load feature scaler, features left unscaled");
                None
            }
        };

        Self {
            classifier,
            season_encoder: encoders.remove(SEASON_ENCODER),
            target_encoder: encoders.remove(TARGET_ENCODER),
            scaler,
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> EngineResult<T> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            EngineError::NotFound(path.display().to_string())
        } else {
            EngineError::Io(format!("{}: {e}", path.display()))
        }
    })?;
    serde_json::from_str(&contents).map_err(|e| EngineError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
