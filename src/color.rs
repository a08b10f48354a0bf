use eframe::egui::Color32;
use palette::{Hsl, Hsv, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// 8-bit HSV conversion
// ---------------------------------------------------------------------------

/// Convert an 8-bit RGB pixel to 8-bit HSV: hue in [0, 180] (degrees / 2),
/// saturation and value in [0, 255]. Each channel is rounded to an integer
/// level, the way 8-bit image tooling stores HSV.
pub fn rgb_to_hsv8(r: u8, g: u8, b: u8) -> [f64; 3] {
    let rgb = Srgb::new(r, g, b).into_format::<f32>();
    let hsv: Hsv = rgb.into_color();

    let hue = (hsv.hue.into_positive_degrees() as f64 / 2.0).round();
    let saturation = (hsv.saturation as f64 * 255.0).round();
    let value = (hsv.value as f64 * 255.0).round();

    [hue.clamp(0.0, 180.0), saturation.clamp(0.0, 255.0), value.clamp(0.0, 255.0)]
}

// ---------------------------------------------------------------------------
// Plot palette
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}
