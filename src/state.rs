use std::path::PathBuf;

use crate::config::AppConfig;
use crate::data::artifact::ModelArtifact;
use crate::data::loader;
use crate::data::model::{HistoryTable, Prediction};
use crate::error::{ReaderError, Result};
use crate::pipeline::regression::{self, FeatureFit, ANALYZED_FEATURES};
use crate::pipeline::{predict, report, synth};

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Menu {
    Home,
    UploadSample,
    FeatureAnalysis,
    History,
    About,
    NewMethod,
}

impl Menu {
    pub const ALL: [Menu; 6] = [
        Menu::Home,
        Menu::UploadSample,
        Menu::FeatureAnalysis,
        Menu::History,
        Menu::About,
        Menu::NewMethod,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Menu::Home => "Home",
            Menu::UploadSample => "Upload Sample",
            Menu::FeatureAnalysis => "Feature Analysis",
            Menu::History => "History",
            Menu::About => "About",
            Menu::NewMethod => "New Method",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Form fields of the New Method page.
pub struct MethodForm {
    pub method_name: String,
    pub scanner_type: String,
    pub doses: String,
    /// Progress lines of the last run.
    pub log: Vec<String>,
}

impl Default for MethodForm {
    fn default() -> Self {
        Self {
            method_name: String::new(),
            scanner_type: String::new(),
            doses: synth::DEFAULT_DOSES.to_string(),
            log: Vec::new(),
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Distinguishes this session's output files from other sessions'.
    pub session_id: String,

    /// Current menu selection.
    pub menu: Menu,

    /// Model artifact, loaded on first prediction and kept for the session.
    pub model: Option<ModelArtifact>,

    /// Image picked on the Upload Sample page.
    pub image_path: Option<PathBuf>,
    pub sample_name: String,
    pub prediction: Option<Prediction>,
    pub report_path: Option<PathBuf>,

    /// Calibration CSV analysed on the Feature Analysis page.
    pub calibration_path: PathBuf,
    /// Fits from the last analysis; empty when it failed.
    pub analysis: Vec<FeatureFit>,

    pub history: Option<HistoryTable>,

    pub method_form: MethodForm,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            calibration_path: config.calibration_path.clone(),
            config,
            session_id: uuid::Uuid::new_v4().simple().to_string(),
            menu: Menu::Home,
            model: None,
            image_path: None,
            sample_name: String::new(),
            prediction: None,
            report_path: None,
            analysis: Vec::new(),
            history: None,
            method_form: MethodForm::default(),
            status_message: None,
        }
    }

    /// Error boundary for menu actions: log and show inline, never abort.
    fn settle<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(v) => {
                self.status_message = None;
                Some(v)
            }
            Err(e) => {
                log::error!("{} failed: {e}", self.menu.label());
                self.status_message = Some(format!("Error: {e}"));
                None
            }
        }
    }

    /// Switch page. Pages that display files reload them on entry.
    pub fn select_menu(&mut self, menu: Menu) {
        if self.menu == menu {
            return;
        }
        self.menu = menu;
        self.status_message = None;
        match menu {
            Menu::FeatureAnalysis => self.run_analysis(),
            Menu::History => self.load_history(),
            _ => {}
        }
    }

    // ---- Upload Sample ----

    /// A new image invalidates the previous prediction and report.
    pub fn set_image(&mut self, path: PathBuf) {
        self.image_path = Some(path);
        self.prediction = None;
        self.report_path = None;
    }

    fn ensure_model(&mut self) -> Result<&ModelArtifact> {
        let model = match self.model.take() {
            Some(model) => model,
            None => loader::load_model(&self.config.model_path)?,
        };
        Ok(self.model.insert(model))
    }

    fn try_predict(&mut self) -> Result<Prediction> {
        let path = self
            .image_path
            .clone()
            .ok_or_else(|| ReaderError::InvalidImage("no image selected".to_string()))?;
        let model = self.ensure_model()?;
        predict::predict_dose(&path, model)
    }

    pub fn predict(&mut self) {
        self.report_path = None;
        let result = self.try_predict();
        self.prediction = self.settle(result);
    }

    fn try_generate_report(&self) -> Result<PathBuf> {
        let prediction = self.prediction.as_ref().ok_or_else(|| {
            ReaderError::InvalidModelInput("predict a dose before generating a report".to_string())
        })?;
        std::fs::create_dir_all(&self.config.output_dir)?;
        report::write_report(
            &self.config.report_path(&self.session_id),
            &self.sample_name,
            prediction.dose,
            &prediction.features,
        )
    }

    pub fn generate_report(&mut self) {
        let result = self.try_generate_report();
        self.report_path = self.settle(result);
    }

    // ---- Feature Analysis ----

    /// Recomputed on every call; a failed load leaves no fits behind.
    pub fn run_analysis(&mut self) {
        let result = loader::load_calibration(&self.calibration_path)
            .and_then(|ds| regression::analyze(&ds, &ANALYZED_FEATURES));
        self.analysis = self.settle(result).unwrap_or_default();
    }

    // ---- History ----

    pub fn load_history(&mut self) {
        let result = loader::load_history(&self.config.history_path);
        self.history = self.settle(result);
    }

    // ---- New Method ----

    pub fn create_method(&mut self) {
        let form = &self.method_form;
        let result = synth::create_method_dataset(
            &self.config.output_dir,
            &form.method_name,
            &form.scanner_type,
            &form.doses,
            &mut rand::thread_rng(),
        );
        self.method_form.log = match self.settle(result) {
            Some(out) => {
                let mut log = vec![format!("Doses accepted: {:?}", out.doses)];
                log.extend(out.doses.iter().map(|d| format!("Scan for dose {d} Gy...")));
                log.push(format!("Scan data saved to {}", out.path.display()));
                log
            }
            None => Vec::new(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn state_in(dir: &std::path::Path) -> AppState {
        AppState::new(AppConfig {
            model_path: dir.join("model.json"),
            calibration_path: dir.join("dataset.csv"),
            history_path: dir.join("history.csv"),
            output_dir: dir.join("out"),
        })
    }

    fn write_model(dir: &std::path::Path) {
        std::fs::write(
            dir.join("model.json"),
            r#"{"model":{"kind":"linear","coefficients":[0.1,0.2],"intercept":1.0},"features":["Green","Saturation"]}"#,
        )
        .unwrap();
    }

    #[test]
    fn failed_actions_show_a_message_and_keep_running() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(dir.path());

        state.select_menu(Menu::FeatureAnalysis);
        assert!(state.analysis.is_empty());
        assert!(state.status_message.as_deref().unwrap().contains("not found"));

        state.select_menu(Menu::History);
        assert!(state.history.is_none());
        assert!(state.status_message.is_some());

        state.select_menu(Menu::UploadSample);
        assert!(state.status_message.is_none());
        state.predict();
        assert!(state.prediction.is_none());
        assert!(state.status_message.is_some());
    }

    #[test]
    fn upload_predict_and_report() {
        let dir = tempfile::tempdir().unwrap();
        write_model(dir.path());
        let image = dir.path().join("film.png");
        RgbImage::from_pixel(8, 8, Rgb([40, 100, 160])).save(&image).unwrap();

        let mut state = state_in(dir.path());
        state.select_menu(Menu::UploadSample);
        state.set_image(image);
        state.sample_name = "S1".to_string();
        state.predict();

        let prediction = state.prediction.expect("prediction");
        assert!(state.model.is_some());
        assert!(prediction.dose.is_finite());

        state.generate_report();
        let report = state.report_path.clone().expect("report path");
        assert!(report.ends_with(format!("report_{}.pdf", state.session_id)));
        assert!(report.exists());
    }

    #[test]
    fn report_needs_a_prediction() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(dir.path());
        state.generate_report();
        assert!(state.report_path.is_none());
        assert!(state.status_message.is_some());
    }

    #[test]
    fn new_method_writes_dataset_usable_by_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(dir.path());
        state.method_form.method_name = "Lab A".to_string();
        state.create_method();
        assert!(state.status_message.is_none());
        // doses line + 8 scans + saved line
        assert_eq!(state.method_form.log.len(), 10);

        state.calibration_path = dir.path().join("out").join("dataset_lab_a.csv");
        state.run_analysis();
        assert_eq!(state.analysis.len(), 3);
    }

    #[test]
    fn new_method_with_bad_dose_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(dir.path());
        state.method_form.method_name = "Lab A".to_string();
        state.method_form.doses = "1,a,3".to_string();
        state.create_method();
        assert!(state.method_form.log.is_empty());
        assert!(state.status_message.as_deref().unwrap().contains("parse error"));
        assert!(!dir.path().join("out").join("dataset_lab_a.csv").exists());
    }

    #[test]
    fn model_is_loaded_once_per_session() {
        let dir = tempfile::tempdir().unwrap();
        write_model(dir.path());
        let image = dir.path().join("film.png");
        RgbImage::from_pixel(4, 4, Rgb([200, 50, 10])).save(&image).unwrap();

        let mut state = state_in(dir.path());
        state.set_image(image);
        state.predict();
        let first = state.prediction.expect("first prediction");

        std::fs::remove_file(dir.path().join("model.json")).unwrap();
        state.predict();
        let second = state.prediction.expect("second prediction");
        assert_eq!(first.dose, second.dose);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn ragged_history_opens_without_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("history.csv"),
            "Date,Dose\n2024-05-01\n2024-05-02,1.2,rescan\n",
        )
        .unwrap();
        let mut state = state_in(dir.path());
        state.select_menu(Menu::History);
        assert!(state.status_message.is_none());
        assert_eq!(state.history.as_ref().map(HistoryTable::width), Some(3));
    }

    #[test]
    fn calibration_with_sample_column_is_analysed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("dataset.csv"),
            "Sample,Red,Green,Blue,Hue,Saturation,Value,Dose\n\
             F1,1,10,5,0,1,9,25\n\
             F2,2,20,4,0,2,8,45\n\
             F3,3,30,3,0,4,7,65\n",
        )
        .unwrap();
        let mut state = state_in(dir.path());
        state.select_menu(Menu::FeatureAnalysis);
        assert!(state.status_message.is_none());
        assert_eq!(state.analysis.len(), 3);
        assert_eq!(state.analysis[0].equation(), "Dose = 2.0000 * Green + 5.0000");
    }

    #[test]
    fn sessions_get_distinct_ids() {
        let dir = tempfile::tempdir().unwrap();
        assert_ne!(state_in(dir.path()).session_id, state_in(dir.path()).session_id);
    }
}
