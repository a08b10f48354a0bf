/// Data layer: core types, model artifacts, and file loading.
///
/// Architecture:
/// ```text
///  model.json      calibration .csv      history .csv
///       │                 │                    │
///       ▼                 ▼                    ▼
///   ┌─────────────────────────────────────────────┐
///   │  loader   parse file → typed value          │
///   └─────────────────────────────────────────────┘
///       │                 │                    │
///       ▼                 ▼                    ▼
///  ModelArtifact   CalibrationDataset     HistoryTable
///  (artifact)      (model)                (model)
/// ```

pub mod artifact;
pub mod loader;
pub mod model;
