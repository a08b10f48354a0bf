use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use super::artifact::ModelArtifact;
use super::model::{CalibrationDataset, CalibrationRecord, HistoryTable};
use crate::error::{missing_or_io, ReaderError, Result};

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| missing_or_io(path, e))
}

// ---------------------------------------------------------------------------
// Model artifact
// ---------------------------------------------------------------------------

/// Load a pre-fitted model artifact.
///
/// Expected JSON schema:
///
/// ```json
/// {
///   "model": { "kind": "linear", "coefficients": [0.12, -0.4], "intercept": 31.5 },
///   "features": ["Green", "Saturation"]
/// }
/// ```
pub fn load_model(path: &Path) -> Result<ModelArtifact> {
    let file = open(path)?;
    let artifact = ModelArtifact::from_reader(std::io::BufReader::new(file))?;
    log::info!(
        "Loaded model from {}: {}",
        path.display(),
        artifact.summary()
    );
    Ok(artifact)
}

// ---------------------------------------------------------------------------
// Calibration CSV
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per row. Typical
/// header: `Red,Green,Blue,Hue,Saturation,Value,Dose`; other columns may hold
/// anything. Cells are kept as text until a column is asked for.
pub fn load_calibration(path: &Path) -> Result<CalibrationDataset> {
    let mut reader = csv::Reader::from_reader(open(path)?);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut columns: BTreeMap<String, Vec<String>> = headers
        .iter()
        .map(|h| (h.clone(), Vec::new()))
        .collect();
    if columns.len() != headers.len() {
        return Err(ReaderError::ParseError(format!(
            "{}: duplicate column names in header",
            path.display()
        )));
    }

    let mut rows = 0;
    for result in reader.records() {
        let record = result?;
        for (name, cell) in headers.iter().zip(record.iter()) {
            if let Some(col) = columns.get_mut(name) {
                col.push(cell.to_string());
            }
        }
        rows += 1;
    }

    Ok(CalibrationDataset { columns, rows })
}

/// Write calibration records with the canonical header, replacing any
/// existing file.
pub fn write_calibration(path: &Path, records: &[CalibrationRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// History CSV
// ---------------------------------------------------------------------------

/// Read a history log verbatim: no type inference, no reordering.
pub fn load_history(path: &Path) -> Result<HistoryTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(open(path)?);
    let headers = reader.headers()?.iter().map(str::to_string).collect();
    let rows = reader
        .records()
        .map(|r| r.map(|rec| rec.iter().map(str::to_string).collect()))
        .collect::<std::result::Result<Vec<Vec<String>>, csv::Error>>()?;
    Ok(HistoryTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Feature, FeatureVector};

    #[test]
    fn calibration_written_then_read_keeps_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cal.csv");
        let fv = FeatureVector::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        write_calibration(
            &path,
            &[
                CalibrationRecord::from_features(&fv, 0.5),
                CalibrationRecord::from_features(&fv, 1.5),
            ],
        )
        .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Red,Green,Blue,Hue,Saturation,Value,Dose"));

        let ds = load_calibration(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column("Dose").unwrap(), vec![0.5, 1.5]);
        assert_eq!(ds.column(Feature::Saturation.name()).unwrap(), vec![5.0, 5.0]);
    }

    #[test]
    fn missing_calibration_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_calibration(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, ReaderError::MissingFile(_)));
    }

    #[test]
    fn non_numeric_cell_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "Green,Dose\n1.0,2.0\nabc,3.0\n").unwrap();
        let ds = load_calibration(&path).unwrap();
        assert!(matches!(ds.column("Green"), Err(ReaderError::ParseError(_))));
        assert_eq!(ds.column("Dose").unwrap(), vec![2.0, 3.0]);
    }

    #[test]
    fn text_columns_do_not_block_numeric_ones() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cal.csv");
        std::fs::write(
            &path,
            "Sample,Green,Blue,Saturation,Dose,Note\n\
             A,10,5,1,25,first scan\n\
             B,20,4,2,45,\n\
             C,30,3,4,65,rescanned\n",
        )
        .unwrap();
        let ds = load_calibration(&path).unwrap();
        assert_eq!(ds.len(), 3);
        assert!(ds.has_column("Sample"));

        let fits = crate::pipeline::regression::analyze(
            &ds,
            &crate::pipeline::regression::ANALYZED_FEATURES,
        )
        .unwrap();
        assert_eq!(fits.len(), 3);
        assert!((fits[0].fit.slope - 2.0).abs() < 1e-9);
    }

    #[test]
    fn history_is_kept_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        std::fs::write(&path, "Date,Sample,Dose\n2024-05-01,S1,12.35\n2024-05-02,S2,n/a\n")
            .unwrap();
        let table = load_history(&path).unwrap();
        assert_eq!(table.headers, vec!["Date", "Sample", "Dose"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1][2], "n/a");
    }

    #[test]
    fn ragged_history_rows_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        std::fs::write(&path, "Date,Dose\n2024-05-01\n2024-05-02,1.2,rescan\n").unwrap();
        let table = load_history(&path).unwrap();
        assert_eq!(table.rows[0], vec!["2024-05-01"]);
        assert_eq!(table.rows[1].len(), 3);
        assert_eq!(table.width(), 3);
    }

    #[test]
    fn missing_history_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_history(&dir.path().join("history.csv")),
            Err(ReaderError::MissingFile(_))
        ));
    }

    #[test]
    fn model_artifact_loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(
            &path,
            r#"{"model":{"kind":"linear","coefficients":[1.0],"intercept":0.0},"features":["Red"]}"#,
        )
        .unwrap();
        let artifact = load_model(&path).unwrap();
        assert_eq!(artifact.features, vec![Feature::Red]);
    }

    #[test]
    fn unknown_feature_in_model_file_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(
            &path,
            r#"{"model":{"kind":"linear","coefficients":[1.0],"intercept":0.0},"features":["Alpha"]}"#,
        )
        .unwrap();
        assert!(matches!(
            load_model(&path),
            Err(ReaderError::InvalidModelInput(_))
        ));
    }

    #[test]
    fn malformed_model_file_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, r#"{"model": 3}"#).unwrap();
        assert!(matches!(load_model(&path), Err(ReaderError::Json(_))));
    }
}
