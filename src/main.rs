use eframe::egui;
use film_reader::app::FilmReaderApp;
use film_reader::config::AppConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Falling back to default configuration: {e:#}");
        AppConfig::default()
    });
    log::info!("Using configuration {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Film Reader – Dosimeter Film",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can preview the selected film.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(FilmReaderApp::new(config)))
        }),
    )
}
