use std::path::{Path, PathBuf};

use rand::Rng;

use crate::data::loader::write_calibration;
use crate::data::model::{CalibrationRecord, Feature, FeatureVector};
use crate::error::{ReaderError, Result};

/// Default dose list offered by the New Method form.
pub const DEFAULT_DOSES: &str = "1,2,3,4,5,6,7,8";

// ---------------------------------------------------------------------------
// Input validation
// ---------------------------------------------------------------------------

/// Parse a comma-separated dose list. Any token that is not a number fails
/// the whole list.
pub fn parse_dose_list(input: &str) -> Result<Vec<f64>> {
    input
        .split(',')
        .map(|tok| {
            let tok = tok.trim();
            tok.parse::<f64>()
                .map_err(|_| ReaderError::ParseError(format!("'{tok}' is not a valid dose")))
        })
        .collect()
}

/// File name for a method's dataset: `dataset_<lowercase, spaces → _>.csv`.
/// Names are limited to letters, digits, spaces, `-`, `_` and `.` so the file
/// always lands directly in the output directory.
pub fn dataset_file_name(method_name: &str) -> Result<String> {
    let name = method_name.trim();
    if name.is_empty() {
        return Err(ReaderError::ParseError("method name is empty".to_string()));
    }
    if let Some(c) = name
        .chars()
        .find(|&c| !(c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.')))
    {
        return Err(ReaderError::ParseError(format!(
            "method name may not contain {c:?}"
        )));
    }
    Ok(format!("dataset_{}.csv", name.to_lowercase().replace(' ', "_")))
}

// ---------------------------------------------------------------------------
// Placeholder dataset
// ---------------------------------------------------------------------------

/// Outcome of [`create_method_dataset`].
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDataset {
    pub path: PathBuf,
    pub doses: Vec<f64>,
}

/// Placeholder scan: uniformly random features within each native range.
/// No scanner is read.
fn placeholder_scan<R: Rng>(rng: &mut R, dose: f64) -> CalibrationRecord {
    let values = Feature::ALL.map(|f| rng.gen_range(0.0..f.max_value()));
    CalibrationRecord::from_features(&FeatureVector::new(values), dose)
}

/// Validate the form, then write one placeholder row per dose to
/// `<output_dir>/dataset_<method>.csv`. Nothing is written if validation fails.
pub fn create_method_dataset<R: Rng>(
    output_dir: &Path,
    method_name: &str,
    scanner_type: &str,
    doses: &str,
    rng: &mut R,
) -> Result<MethodDataset> {
    let doses = parse_dose_list(doses)?;
    let path = output_dir.join(dataset_file_name(method_name)?);

    log::info!(
        "Creating method '{}' (scanner: '{}') with {} doses",
        method_name.trim(),
        scanner_type,
        doses.len()
    );
    let records: Vec<CalibrationRecord> = doses
        .iter()
        .map(|&dose| placeholder_scan(rng, dose))
        .collect();

    std::fs::create_dir_all(output_dir)?;
    write_calibration(&path, &records)?;
    log::info!("Wrote {} rows to {}", records.len(), path.display());

    Ok(MethodDataset { path, doses })
}
