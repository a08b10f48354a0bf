use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReaderError;

// ---------------------------------------------------------------------------
// Feature – one of the six canonical colour statistics
// ---------------------------------------------------------------------------

/// The six colour statistics extracted from a film image.
/// Declaration order is the canonical column order of calibration CSVs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Feature {
    Red,
    Green,
    Blue,
    Hue,
    Saturation,
    Value,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::Red,
        Feature::Green,
        Feature::Blue,
        Feature::Hue,
        Feature::Saturation,
        Feature::Value,
    ];

    /// Column / display name.
    pub fn name(self) -> &'static str {
        match self {
            Feature::Red => "Red",
            Feature::Green => "Green",
            Feature::Blue => "Blue",
            Feature::Hue => "Hue",
            Feature::Saturation => "Saturation",
            Feature::Value => "Value",
        }
    }

    /// Upper bound of the native range; the lower bound is always 0.
    /// Hue follows the 8-bit HSV convention (degrees / 2).
    pub fn max_value(self) -> f64 {
        match self {
            Feature::Hue => 180.0,
            _ => 255.0,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = ReaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| ReaderError::InvalidModelInput(format!("unknown feature '{s}'")))
    }
}

/// Name of the dose column in calibration CSVs.
pub const DOSE_COLUMN: &str = "Dose";

// ---------------------------------------------------------------------------
// FeatureVector – the six statistics of one image
// ---------------------------------------------------------------------------

/// Mean colour statistics of one image. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; 6],
}

impl FeatureVector {
    /// Values in canonical order: Red, Green, Blue, Hue, Saturation, Value.
    pub fn new(values: [f64; 6]) -> Self {
        Self { values }
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    /// Iterate `(feature, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.iter().map(move |&f| (f, self.get(f)))
    }

    /// Select values in the given order, e.g. the order a model was trained on.
    pub fn select(&self, order: &[Feature]) -> Vec<f64> {
        order.iter().map(|&f| self.get(f)).collect()
    }
}

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

/// A predicted dose (Gy) and the features it was computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub dose: f64,
    pub features: FeatureVector,
}

// ---------------------------------------------------------------------------
// CalibrationRecord / CalibrationDataset
// ---------------------------------------------------------------------------

/// One row of a calibration CSV.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CalibrationRecord {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
    pub dose: f64,
}

impl CalibrationRecord {
    pub fn from_features(features: &FeatureVector, dose: f64) -> Self {
        CalibrationRecord {
            red: features.get(Feature::Red),
            green: features.get(Feature::Green),
            blue: features.get(Feature::Blue),
            hue: features.get(Feature::Hue),
            saturation: features.get(Feature::Saturation),
            value: features.get(Feature::Value),
            dose,
        }
    }
}

/// Raw cells of a calibration CSV, keyed by header name. Cells are parsed
/// only when a column is asked for, so extra columns (sample ids, dates,
/// notes) never get in the way of the analysed ones.
#[derive(Debug, Clone, Default)]
pub struct CalibrationDataset {
    pub columns: BTreeMap<String, Vec<String>>,
    pub rows: usize,
}

impl CalibrationDataset {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Parse one column as numbers. A missing column is
    /// [`ReaderError::InvalidModelInput`], a non-numeric cell [`ReaderError::ParseError`].
    pub fn column(&self, name: &str) -> Result<Vec<f64>, ReaderError> {
        let cells = self.columns.get(name).ok_or_else(|| {
            ReaderError::InvalidModelInput(format!("calibration data has no '{name}' column"))
        })?;
        cells
            .iter()
            .enumerate()
            .map(|(row, cell)| {
                cell.trim().parse::<f64>().map_err(|_| {
                    ReaderError::ParseError(format!(
                        "row {}, column '{name}': '{cell}' is not a number",
                        row + 1
                    ))
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

// ---------------------------------------------------------------------------
// HistoryTable – displayed verbatim
// ---------------------------------------------------------------------------

/// Rows may be longer or shorter than the header; the log is kept as written.
#[derive(Debug, Clone, Default)]
pub struct HistoryTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl HistoryTable {
    /// Number of display columns: the header or the longest row, whichever is wider.
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .fold(self.headers.len(), usize::max)
    }

    /// Header of column `idx`, empty past the end of the header.
    pub fn header(&self, idx: usize) -> &str {
        self.headers.get(idx).map_or("", String::as_str)
    }

    /// Cell `idx` of `row`, empty past the end of a short row.
    pub fn cell<'a>(row: &'a [String], idx: usize) -> &'a str {
        row.get(idx).map_or("", String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_names_round_trip_through_from_str() {
        for f in Feature::ALL {
            assert_eq!(f.name().parse::<Feature>().unwrap(), f);
        }
        assert!(matches!(
            "red".parse::<Feature>(),
            Err(ReaderError::InvalidModelInput(_))
        ));
    }

    #[test]
    fn select_follows_requested_order() {
        let fv = FeatureVector::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(
            fv.select(&[Feature::Saturation, Feature::Red, Feature::Blue]),
            vec![5.0, 1.0, 3.0]
        );
    }

    #[test]
    fn calibration_columns_parse_on_demand() {
        let ds = CalibrationDataset {
            columns: BTreeMap::from([
                ("Sample".to_string(), vec!["A".to_string(), "B".to_string()]),
                ("Green".to_string(), vec!["10".to_string(), " 20.5".to_string()]),
            ]),
            rows: 2,
        };
        assert_eq!(ds.column("Green").unwrap(), vec![10.0, 20.5]);
        assert!(ds.has_column("Sample"));
        assert!(matches!(ds.column("Sample"), Err(ReaderError::ParseError(_))));
        assert!(matches!(ds.column("Blue"), Err(ReaderError::InvalidModelInput(_))));
    }

    #[test]
    fn ragged_history_is_as_wide_as_its_longest_row() {
        let table = HistoryTable {
            headers: vec!["Date".to_string(), "Dose".to_string()],
            rows: vec![
                vec!["2024-05-01".to_string()],
                vec!["2024-05-02".to_string(), "1.2".to_string(), "rescan".to_string()],
            ],
        };
        assert_eq!(table.width(), 3);
        assert_eq!(table.header(2), "");
        assert_eq!(HistoryTable::cell(&table.rows[0], 1), "");
        assert_eq!(HistoryTable::cell(&table.rows[1], 2), "rescan");
        assert_eq!(HistoryTable::default().width(), 0);
    }

    #[test]
    fn hue_has_the_narrower_range() {
        assert_eq!(Feature::Hue.max_value(), 180.0);
        assert!(Feature::ALL
            .iter()
            .filter(|&&f| f != Feature::Hue)
            .all(|f| f.max_value() == 255.0));
    }
}
