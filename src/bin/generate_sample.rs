//! Writes a demo calibration dataset, a matching model artifact and a short
//! reading history into the working directory, so the reader can be tried
//! without real scans.

use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use film_reader::color::rgb_to_hsv8;
use film_reader::data::artifact::{ModelArtifact, Regressor};
use film_reader::data::loader::write_calibration;
use film_reader::data::model::{CalibrationRecord, Feature, FeatureVector};
use film_reader::pipeline::regression::fit_line;

/// Film darkens with dose, mostly in the red and green channels.
fn film_colour(dose: f64, rng: &mut StdRng) -> [u8; 3] {
    let mut channel = |base: f64, per_gy: f64| {
        let noise: f64 = rng.gen_range(-2.0..2.0);
        (base - per_gy * dose + noise).clamp(0.0, 255.0).round() as u8
    };
    [channel(230.0, 6.0), channel(215.0, 7.5), channel(180.0, 2.0)]
}

fn record_for(dose: f64, rng: &mut StdRng) -> CalibrationRecord {
    let [r, g, b] = film_colour(dose, rng);
    let [h, s, v] = rgb_to_hsv8(r, g, b);
    let features = FeatureVector::new([r as f64, g as f64, b as f64, h, s, v]);
    CalibrationRecord::from_features(&features, dose)
}

fn main() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);

    let doses = [0.0, 1.0, 2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 15.0, 20.0];
    let mut records = Vec::new();
    for &dose in &doses {
        for _ in 0..3 {
            records.push(record_for(dose, &mut rng));
        }
    }

    let dataset_path = Path::new("dataset.csv");
    write_calibration(dataset_path, &records).context("writing dataset.csv")?;

    // Single-feature calibration line on Green serves as the demo model.
    let green: Vec<f64> = records.iter().map(|r| r.green).collect();
    let dose: Vec<f64> = records.iter().map(|r| r.dose).collect();
    let fit = fit_line(&green, &dose).context("fitting demo model")?;
    let artifact = ModelArtifact {
        model: Regressor::Linear {
            coefficients: vec![fit.slope],
            intercept: fit.intercept,
        },
        features: vec![Feature::Green],
    };
    let model_json = serde_json::to_string_pretty(&artifact)?;
    std::fs::write("model.json", model_json).context("writing model.json")?;

    let mut history = csv::Writer::from_path("history.csv").context("writing history.csv")?;
    history.write_record(["Date", "Sample", "Dose (Gy)"])?;
    for (i, r) in records.iter().step_by(7).enumerate() {
        let predicted = fit.predict(r.green);
        history.write_record([
            format!("2024-06-{:02}", i + 1),
            format!("S{}", i + 1),
            format!("{predicted:.2}"),
        ])?;
    }
    history.flush()?;

    println!(
        "Wrote {} calibration rows to dataset.csv, model.json (R² = {:.3}) and history.csv",
        records.len(),
        fit.r_squared
    );
    Ok(())
}
