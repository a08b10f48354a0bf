use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "FILM_READER_CONFIG";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "film-reader.json";

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

/// File locations used by the menu actions. Every field has a default, so a
/// config file only needs the entries it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Pre-fitted model artifact (JSON).
    pub model_path: PathBuf,
    /// Calibration CSV shown in Feature Analysis.
    pub calibration_path: PathBuf,
    /// Externally maintained readings log shown in History.
    pub history_path: PathBuf,
    /// Where reports and method datasets are written.
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("model.json"),
            calibration_path: PathBuf::from("dataset.csv"),
            history_path: PathBuf::from("history.csv"),
            output_dir: PathBuf::from("output"),
        }
    }
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// `$FILM_READER_CONFIG`, else `./film-reader.json` if it exists, else defaults.
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::from_file(local);
        }
        Ok(Self::default())
    }

    /// Per-session report path inside `output_dir`.
    pub fn report_path(&self, session_id: &str) -> PathBuf {
        self.output_dir.join(format!("report_{session_id}.pdf"))
    }
}
