use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::color::generate_palette;
use crate::pipeline::regression::FeatureFit;

// ---------------------------------------------------------------------------
// Calibration plots (Feature Analysis page)
// ---------------------------------------------------------------------------

/// One scatter + fitted line plot per feature, each followed by its equation.
pub fn calibration_plots(ui: &mut Ui, fits: &[FeatureFit]) {
    let colours = generate_palette(fits.len());

    for (fit, &colour) in fits.iter().zip(colours.iter()) {
        ui.strong(format!("Dose vs {}", fit.feature));
        fit_plot(ui, fit, colour);
        ui.label(RichText::new(fit.equation()).monospace());
        ui.label(fit.r_squared_label());
        ui.separator();
    }
}

fn fit_plot(ui: &mut Ui, fit: &FeatureFit, colour: Color32) {
    let (min_x, max_x) = fit
        .points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p[0]), hi.max(p[0]))
        });

    let scatter: PlotPoints = fit.points.iter().copied().collect();
    let line: PlotPoints = [min_x, max_x]
        .iter()
        .map(|&x| [x, fit.fit.predict(x)])
        .collect();

    Plot::new(format!("fit_{}", fit.feature))
        .height(220.0)
        .legend(Legend::default())
        .x_axis_label(fit.feature.name())
        .y_axis_label("Dose (Gy)")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(scatter)
                    .name("Data")
                    .color(colour)
                    .radius(3.0),
            );
            plot_ui.line(
                Line::new(line)
                    .name("Linear fit")
                    .color(Color32::LIGHT_RED)
                    .width(1.5),
            );
        });
}
