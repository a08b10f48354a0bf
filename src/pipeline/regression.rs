use crate::data::model::{CalibrationDataset, Feature, DOSE_COLUMN};
use crate::error::{ReaderError, Result};

/// Features plotted against dose in the feature-analysis view.
pub const ANALYZED_FEATURES: [Feature; 3] = [Feature::Green, Feature::Blue, Feature::Saturation];

// ---------------------------------------------------------------------------
// Ordinary least squares, one variable
// ---------------------------------------------------------------------------

/// `y = slope * x + intercept` with its coefficient of determination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit `ys` against `xs` by ordinary least squares.
pub fn fit_line(xs: &[f64], ys: &[f64]) -> Result<LinearFit> {
    if xs.len() != ys.len() {
        return Err(ReaderError::InvalidModelInput(format!(
            "{} x values but {} y values",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() < 2 {
        return Err(ReaderError::InvalidModelInput(
            "at least two points are needed to fit a line".to_string(),
        ));
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (sxx, sxy) = xs
        .iter()
        .zip(ys)
        .fold((0.0, 0.0), |(sxx, sxy), (&x, &y)| {
            let dx = x - mean_x;
            (sxx + dx * dx, sxy + dx * (y - mean_y))
        });
    if sxx == 0.0 {
        return Err(ReaderError::InvalidModelInput(
            "feature is constant; no line can be fitted".to_string(),
        ));
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let (ss_res, ss_tot) = xs.iter().zip(ys).fold((0.0, 0.0), |(res, tot), (&x, &y)| {
        let r = y - (slope * x + intercept);
        let t = y - mean_y;
        (res + r * r, tot + t * t)
    });
    // Constant targets: a perfect fit scores 1, anything else 0.
    let r_squared = if ss_tot == 0.0 {
        if ss_res == 0.0 { 1.0 } else { 0.0 }
    } else {
        1.0 - ss_res / ss_tot
    };

    Ok(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}

// ---------------------------------------------------------------------------
// Calibration curves
// ---------------------------------------------------------------------------

/// Dose-vs-feature calibration line for one feature, with the points it was
/// fitted on (kept for plotting).
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFit {
    pub feature: Feature,
    pub fit: LinearFit,
    pub points: Vec<[f64; 2]>,
}

impl FeatureFit {
    /// e.g. `Dose = 2.0000 * Green + 5.0000`
    pub fn equation(&self) -> String {
        format!(
            "Dose = {:.4} * {} + {:.4}",
            self.fit.slope, self.feature, self.fit.intercept
        )
    }

    /// e.g. `R² = 1.00`
    pub fn r_squared_label(&self) -> String {
        format!("R² = {:.2}", self.fit.r_squared)
    }
}

/// Fit one calibration line per feature. Any missing column or degenerate
/// fit aborts the whole analysis.
pub fn analyze(dataset: &CalibrationDataset, features: &[Feature]) -> Result<Vec<FeatureFit>> {
    let dose = dataset.column(DOSE_COLUMN)?;

    let columns = features
        .iter()
        .map(|&f| dataset.column(f.name()).map(|c| (f, c)))
        .collect::<Result<Vec<_>>>()?;

    columns
        .into_iter()
        .map(|(feature, xs)| {
            let fit = fit_line(&xs, &dose)?;
            let points = xs.iter().zip(&dose).map(|(&x, &y)| [x, y]).collect();
            Ok(FeatureFit {
                feature,
                fit,
                points,
            })
        })
        .collect()
}
