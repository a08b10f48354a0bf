use serde::{Deserialize, Serialize};

use super::model::{Feature, FeatureVector};
use crate::error::{ReaderError, Result};

// ---------------------------------------------------------------------------
// Regressor – a pre-fitted model, deserialized from JSON
// ---------------------------------------------------------------------------

/// Fitted regression model. The input vector is the feature values in the
/// artifact's declared order; no names travel with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Regressor {
    Linear {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    RandomForest {
        trees: Vec<DecisionTree>,
    },
}

/// One regression tree stored as a flat node array; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    /// Go `left` when `x[feature] <= threshold`, else `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl DecisionTree {
    fn predict(&self, x: &[f64]) -> Result<f64> {
        let mut idx = 0;
        // A well-formed tree reaches a leaf in at most `nodes.len()` steps.
        for _ in 0..=self.nodes.len() {
            let node = self.nodes.get(idx).ok_or_else(|| {
                ReaderError::InvalidModelInput(format!("tree node {idx} does not exist"))
            })?;
            match *node {
                TreeNode::Leaf { value } => return Ok(value),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let v = x.get(feature).ok_or_else(|| {
                        ReaderError::InvalidModelInput(format!(
                            "tree splits on input {feature} but the model has {} inputs",
                            x.len()
                        ))
                    })?;
                    idx = if *v <= threshold { left } else { right };
                }
            }
        }
        Err(ReaderError::InvalidModelInput(
            "tree contains a cycle".to_string(),
        ))
    }
}

impl Regressor {
    /// Single-sample inference on an already ordered input vector.
    pub fn predict(&self, x: &[f64]) -> Result<f64> {
        let dose = match self {
            Regressor::Linear {
                coefficients,
                intercept,
            } => {
                if coefficients.len() != x.len() {
                    return Err(ReaderError::InvalidModelInput(format!(
                        "model has {} coefficients but {} features were supplied",
                        coefficients.len(),
                        x.len()
                    )));
                }
                intercept
                    + coefficients
                        .iter()
                        .zip(x)
                        .map(|(c, v)| c * v)
                        .sum::<f64>()
            }
            Regressor::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err(ReaderError::InvalidModelInput(
                        "random forest has no trees".to_string(),
                    ));
                }
                let mut sum = 0.0;
                for tree in trees {
                    sum += tree.predict(x)?;
                }
                sum / trees.len() as f64
            }
        };

        if !dose.is_finite() {
            return Err(ReaderError::InvalidModelInput(format!(
                "model produced a non-finite dose ({dose})"
            )));
        }
        Ok(dose)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Regressor::Linear { .. } => "linear regression",
            Regressor::RandomForest { .. } => "random forest",
        }
    }
}

// ---------------------------------------------------------------------------
// ModelArtifact – model plus the feature order it was trained on
// ---------------------------------------------------------------------------

/// A stored model and its significant features, in training order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelArtifact {
    pub model: Regressor,
    pub features: Vec<Feature>,
}

/// On-disk shape: feature names stay text until they are checked against
/// the canonical set.
#[derive(Deserialize)]
struct StoredArtifact {
    model: Regressor,
    features: Vec<String>,
}

impl ModelArtifact {
    /// Read an artifact from JSON. Malformed JSON is [`ReaderError::Json`];
    /// an unknown feature name is [`ReaderError::InvalidModelInput`].
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let stored: StoredArtifact = serde_json::from_reader(reader)?;
        let features = stored
            .features
            .iter()
            .map(|name| name.parse::<Feature>())
            .collect::<Result<Vec<_>>>()?;
        Ok(ModelArtifact {
            model: stored.model,
            features,
        })
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes())
    }

    /// Predict a dose from a full feature vector, feeding the model its
    /// declared features in declared order.
    pub fn predict(&self, features: &FeatureVector) -> Result<f64> {
        if self.features.is_empty() {
            return Err(ReaderError::InvalidModelInput(
                "model declares no features".to_string(),
            ));
        }
        let x = features.select(&self.features);
        self.model.predict(&x)
    }

    /// Short human-readable summary, e.g. "linear regression on Green, Blue".
    pub fn summary(&self) -> String {
        let names: Vec<&str> = self.features.iter().map(|f| f.name()).collect();
        format!("{} on {}", self.model.kind(), names.join(", "))
    }
}
