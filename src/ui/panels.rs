use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use super::plot;
use crate::data::model::HistoryTable;
use crate::state::{AppState, Menu};

// ---------------------------------------------------------------------------
// Left side panel – menu navigation
// ---------------------------------------------------------------------------

/// Render the navigation menu.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Menu");
    ui.separator();

    for menu in Menu::ALL {
        if ui
            .selectable_label(state.menu == menu, menu.label())
            .clicked()
        {
            state.select_menu(menu);
        }
    }
}

// ---------------------------------------------------------------------------
// Bottom bar – status / errors
// ---------------------------------------------------------------------------

pub fn status_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("Session {}", state.session_id));
        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – current page
// ---------------------------------------------------------------------------

pub fn page(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.menu {
            Menu::Home => home(ui),
            Menu::UploadSample => upload_sample(ui, state),
            Menu::FeatureAnalysis => feature_analysis(ui, state),
            Menu::History => history(ui, state),
            Menu::About => about(ui, state),
            Menu::NewMethod => new_method(ui, state),
        });
}

fn home(ui: &mut Ui) {
    ui.heading("Dosimeter Film Reader");
    ui.label(
        "Read dosimeter film with a standard scanner: upload a scan of an exposed film \
         and the reader estimates the absorbed dose from its colour statistics.",
    );
    ui.add_space(8.0);
    ui.label("• Upload Sample – predict the dose of a film and export a PDF report");
    ui.label("• Feature Analysis – calibration lines of dose against colour features");
    ui.label("• History – past readings");
    ui.label("• New Method – start a calibration dataset for a new film/scanner");
}

fn upload_sample(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Upload Sample");
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Choose image…").clicked() {
            open_image_dialog(state);
        }
        match &state.image_path {
            Some(p) => ui.label(p.display().to_string()),
            None => ui.label("No image selected."),
        };
    });

    if let Some(path) = &state.image_path {
        ui.add(
            egui::Image::new(format!("file://{}", path.display()))
                .max_width(ui.available_width() * 0.6)
                .max_height(240.0),
        );
    }

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Sample name:");
        ui.text_edit_singleline(&mut state.sample_name);
    });

    if ui.button("Predict dose").clicked() {
        state.predict();
    }

    let Some(prediction) = state.prediction else {
        return;
    };

    ui.separator();
    ui.heading(format!("Predicted dose: {:.2} Gy", prediction.dose));
    egui::Grid::new("features_grid")
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            for (feature, value) in prediction.features.iter() {
                ui.label(feature.name());
                ui.label(format!("{value:.2}"));
                ui.end_row();
            }
        });

    ui.add_space(8.0);
    if ui.button("Generate report").clicked() {
        state.generate_report();
    }
    if let Some(report) = &state.report_path {
        ui.label(format!("Report saved to {}", report.display()));
    }
}

fn feature_analysis(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Feature Analysis");
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("Calibration data: {}", state.calibration_path.display()));
        if ui.button("Open…").clicked() {
            open_calibration_dialog(state);
        }
        if ui.button("Reload").clicked() {
            state.run_analysis();
        }
    });
    ui.separator();

    if state.analysis.is_empty() {
        ui.label("No calibration fits to show.");
        return;
    }
    plot::calibration_plots(ui, &state.analysis);
}

fn history(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Reading History");
    ui.separator();

    if ui.button("Reload").clicked() {
        state.load_history();
    }

    let Some(table) = &state.history else {
        ui.label("No reading history available.");
        return;
    };

    // Rows are shown as logged; short rows leave blank cells.
    let width = table.width();
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .columns(Column::auto().resizable(true), width)
        .header(20.0, |mut header| {
            for i in 0..width {
                header.col(|ui: &mut Ui| {
                    ui.strong(table.header(i));
                });
            }
        })
        .body(|mut body| {
            for row in &table.rows {
                body.row(18.0, |mut cells| {
                    for i in 0..width {
                        cells.col(|ui: &mut Ui| {
                            ui.label(HistoryTable::cell(row, i));
                        });
                    }
                });
            }
        });
}

fn about(ui: &mut Ui, state: &AppState) {
    ui.heading("About");
    ui.separator();
    ui.label(format!("Film Reader v{}", env!("CARGO_PKG_VERSION")));
    ui.label(
        "Estimates absorbed dose from the mean RGB and HSV statistics of a scanned \
         dosimeter film using a pre-fitted regression model.",
    );
    ui.add_space(8.0);
    ui.label(format!("Model file: {}", state.config.model_path.display()));
    match &state.model {
        Some(model) => ui.label(format!("Loaded model: {}", model.summary())),
        None => ui.label("Model is loaded on the first prediction."),
    };
    ui.label(format!("Output directory: {}", state.config.output_dir.display()));
}

fn new_method(ui: &mut Ui, state: &mut AppState) {
    ui.heading("New Method");
    ui.label("Create a calibration dataset for a new analysis method.");
    ui.separator();

    egui::Grid::new("method_form").show(ui, |ui: &mut Ui| {
        ui.label("Method name");
        ui.text_edit_singleline(&mut state.method_form.method_name);
        ui.end_row();

        ui.label("Scanner type");
        ui.text_edit_singleline(&mut state.method_form.scanner_type);
        ui.end_row();

        ui.label("Doses (comma separated)");
        ui.text_edit_singleline(&mut state.method_form.doses);
        ui.end_row();
    });

    if ui.button("Create method").clicked() {
        state.create_method();
    }

    for line in &state.method_form.log {
        ui.label(line);
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_image_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Choose a film image")
        .add_filter("Images", &["jpg", "jpeg", "png"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Selected image {}", path.display());
        state.set_image(path);
    }
}

pub fn open_calibration_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open calibration data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.calibration_path = path;
        state.run_analysis();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn render(state: &mut AppState) {
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| page(ui, state));
        });
    }

    #[test]
    fn ragged_history_renders() {
        let mut state = AppState::new(AppConfig::default());
        state.menu = Menu::History;
        state.history = Some(HistoryTable {
            headers: vec!["Date".to_string(), "Dose".to_string()],
            rows: vec![
                vec!["2024-05-02".to_string(), "1.2".to_string(), "rescan".to_string()],
                vec!["2024-05-01".to_string()],
            ],
        });
        render(&mut state);
        assert!(state.history.is_some());
    }

    #[test]
    fn every_page_renders_without_data() {
        let mut state = AppState::new(AppConfig::default());
        for menu in Menu::ALL {
            state.menu = menu;
            render(&mut state);
        }
    }
}
