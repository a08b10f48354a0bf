/// Analysis pipeline: everything a menu action runs.
///
/// ```text
///   image ──► features ──► FeatureVector ──► predict ──► Prediction ──► report (.pdf)
///
///   calibration .csv ──► regression ──► FeatureFit per analysed feature
///
///   dose list ──► synth ──► dataset_<method>.csv
/// ```

pub mod features;
pub mod predict;
pub mod regression;
pub mod report;
pub mod synth;
