use std::path::Path;

use super::features;
use crate::data::artifact::ModelArtifact;
use crate::data::model::{FeatureVector, Prediction};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Dose prediction
// ---------------------------------------------------------------------------

/// Predict the dose of the film in the image at `path`.
///
/// Extraction failures are returned before the model is touched.
pub fn predict_dose(path: &Path, artifact: &ModelArtifact) -> Result<Prediction> {
    let features = features::extract_from_path(path)?;
    predict_from_features(features, artifact)
}

/// Same as [`predict_dose`] for an in-memory upload.
pub fn predict_dose_from_bytes(bytes: &[u8], artifact: &ModelArtifact) -> Result<Prediction> {
    let features = features::extract_from_bytes(bytes)?;
    predict_from_features(features, artifact)
}

fn predict_from_features(features: FeatureVector, artifact: &ModelArtifact) -> Result<Prediction> {
    let dose = artifact.predict(&features)?;
    log::info!("Predicted dose {dose:.4} Gy using {}", artifact.summary());
    Ok(Prediction { dose, features })
}
