//! Dosimeter film reader.
//!
//! Colour statistics of a scanned film feed a pre-fitted regression model to
//! estimate absorbed dose; calibration CSVs are fitted per feature for the
//! analysis view. The desktop shell lives in [`app`] and [`ui`].

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod state;
pub mod ui;
