//! Classifier seam for the statistical predictor, and the random-forest
//! implementation loaded from `pest_risk_model.json`.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A trained multi-class risk classifier.
pub trait RiskClassifier: Send + Sync {
    /// Width of the feature vector the model was trained on.
    fn n_features(&self) -> usize;

    /// Per-class probability distribution for one encoded row.
    fn predict_proba(&self, features: &[f64]) -> EngineResult<Vec<f64>>;

    /// Predicted class index (argmax of the distribution, first on ties).
    fn predict(&self, features: &[f64]) -> EngineResult<usize> {
        let proba = self.predict_proba(features)?;
        argmax(&proba).ok_or_else(|| EngineError::Model("empty probability distribution".into()))
    }

    /// Human-readable class labels, when the model carries them.
    fn class_labels(&self) -> Option<&[String]> {
        None
    }

    /// Name for logging.
    fn name(&self) -> &str;
}

/// Index of the largest value; the first one wins on ties.
pub fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if v <= b => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// Leaf marker in `children_left` / `children_right`.
const LEAF: i64 = -1;

/// A single CART tree in flattened array form.
///
/// Node `i` splits on `feature[i] <= threshold[i]` (left) versus `>` (right);
/// a node whose left child is `-1` is a leaf, and `value[i]` holds its class
/// counts or weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    pub fn node_count(&self) -> usize {
        self.children_left.len()
    }

    fn validate(&self, n_features: usize, n_classes: usize) -> EngineResult<()> {
        let n = self.node_count();
        if n == 0 {
            return Err(EngineError::Model("tree has no nodes".into()));
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err(EngineError::Model("tree node arrays differ in length".into()));
        }
        for i in 0..n {
            let (left, right) = (self.children_left[i], self.children_right[i]);
            if left == LEAF {
                if self.value[i].len() != n_classes {
                    return Err(EngineError::Model(format!(
                        "leaf {i} has {} class weights, expected {n_classes}",
                        self.value[i].len()
                    )));
                }
                if self.value[i].iter().any(|w| !w.is_finite() || *w < 0.0) {
                    return Err(EngineError::Model(format!(
                        "leaf {i} has negative or non-finite class weights"
                    )));
                }
                continue;
            }
            // Children always come after their parent, which also rules out cycles.
            let in_range = |c: i64| c > i as i64 && (c as usize) < n;
            if !in_range(left) || !in_range(right) {
                return Err(EngineError::Model(format!("node {i} has out-of-range children")));
            }
            if self.feature[i] < 0 || self.feature[i] as usize >= n_features {
                return Err(EngineError::Model(format!(
                    "node {i} splits on unknown feature {}",
                    self.feature[i]
                )));
            }
        }
        Ok(())
    }

    /// Normalised class distribution at the leaf reached by `features`.
    fn leaf_distribution(&self, features: &[f64]) -> EngineResult<Vec<f64>> {
        let mut node = 0usize;
        // Bounded walk: a validated tree never needs more steps than it has nodes.
        for _ in 0..self.node_count() {
            let left = self.children_left[node];
            if left == LEAF {
                let weights = &self.value[node];
                let total: f64 = weights.iter().sum();
                if total <= 0.0 || !total.is_finite() {
                    return Err(EngineError::Model(format!("leaf {node} has no weight")));
                }
                return Ok(weights.iter().map(|w| w / total).collect());
            }
            let x = features[self.feature[node] as usize];
            node = if x <= self.threshold[node] {
                left as usize
            } else {
                self.children_right[node] as usize
            };
        }
        Err(EngineError::Model("tree walk did not reach a leaf".into()))
    }
}

/// Random forest: averages the leaf distributions of its trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestClassifier {
    pub n_features: usize,
    pub n_classes: usize,
    /// Native class labels in output order (e.g. `["high", "low", ...]`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<Vec<String>>,
    pub trees: Vec<DecisionTree>,
}

impl ForestClassifier {
    /// Structural checks run once at load time.
    pub fn validate(&self) -> EngineResult<()> {
        if self.trees.is_empty() {
            return Err(EngineError::Model("forest has no trees".into()));
        }
        if self.n_classes == 0 {
            return Err(EngineError::Model("forest has no classes".into()));
        }
        if let Some(classes) = &self.classes {
            if classes.len() != self.n_classes {
                return Err(EngineError::Model(format!(
                    "{} class labels for {} classes",
                    classes.len(),
                    self.n_classes
                )));
            }
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, self.n_classes)
                .map_err(|e| EngineError::Model(format!("tree {i}: {e}")))?;
        }
        Ok(())
    }
}

impl RiskClassifier for ForestClassifier {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, features: &[f64]) -> EngineResult<Vec<f64>> {
        if features.len() != self.n_features {
            return Err(EngineError::FeatureMismatch {
                expected: self.n_features,
                actual: features.len(),
            });
        }
        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            let dist = tree.leaf_distribution(features)?;
            for (acc, p) in proba.iter_mut().zip(dist) {
                *acc += p;
            }
        }
        let n_trees = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n_trees);
        Ok(proba)
    }

    fn class_labels(&self) -> Option<&[String]> {
        self.classes.as_deref()
    }

    fn name(&self) -> &str {
        "random_forest"
    }
}
