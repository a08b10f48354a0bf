use std::path::Path;

use image::{DynamicImage, RgbImage};

use crate::color::rgb_to_hsv8;
use crate::data::model::FeatureVector;
use crate::error::{ReaderError, Result};

// ---------------------------------------------------------------------------
// Feature extraction
// ---------------------------------------------------------------------------

/// Decode an image file and compute its mean colour statistics.
pub fn extract_from_path(path: &Path) -> Result<FeatureVector> {
    if !path.exists() {
        return Err(ReaderError::InvalidImage(format!(
            "{} does not exist",
            path.display()
        )));
    }
    let img = image::open(path)
        .map_err(|e| ReaderError::InvalidImage(format!("{}: {e}", path.display())))?;
    extract(&img)
}

/// Decode raw image bytes (JPEG/PNG) and compute their mean colour statistics.
pub fn extract_from_bytes(bytes: &[u8]) -> Result<FeatureVector> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| ReaderError::InvalidImage(e.to_string()))?;
    extract(&img)
}

/// Mean R, G, B and 8-bit H, S, V over every pixel.
pub fn extract(img: &DynamicImage) -> Result<FeatureVector> {
    mean_statistics(&img.to_rgb8())
}

fn mean_statistics(rgb: &RgbImage) -> Result<FeatureVector> {
    let n = rgb.width() as u64 * rgb.height() as u64;
    if n == 0 {
        return Err(ReaderError::InvalidImage("image has no pixels".to_string()));
    }

    // Integer accumulation keeps the sums exact and order-independent.
    let mut sums = [0u64; 6];
    for px in rgb.pixels() {
        let [r, g, b] = px.0;
        let [h, s, v] = rgb_to_hsv8(r, g, b);
        sums[0] += r as u64;
        sums[1] += g as u64;
        sums[2] += b as u64;
        sums[3] += h as u64;
        sums[4] += s as u64;
        sums[5] += v as u64;
    }

    let means = sums.map(|s| s as f64 / n as f64);
    Ok(FeatureVector::new(means))
}
