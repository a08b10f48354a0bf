use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::data::model::FeatureVector;
use crate::error::{ReaderError, Result};

pub const REPORT_TITLE: &str = "Dosimeter Film Reading Report";

// ---------------------------------------------------------------------------
// Report content
// ---------------------------------------------------------------------------

/// Body lines of the report, in layout order (the title is rendered separately).
pub fn report_lines(sample_name: &str, dose: f64, features: &FeatureVector) -> Vec<String> {
    let mut lines = vec![
        format!("Sample: {sample_name}"),
        format!("Predicted dose: {dose:.2} Gy"),
        String::new(),
        "Features:".to_string(),
    ];
    lines.extend(
        features
            .iter()
            .map(|(feature, value)| format!("{feature}: {value:.2}")),
    );
    lines
}

// ---------------------------------------------------------------------------
// PDF generation
// ---------------------------------------------------------------------------

fn pdf_err(e: impl std::fmt::Display) -> ReaderError {
    ReaderError::Pdf(e.to_string())
}

/// Render the single-page A4 report to `path`, replacing any previous report
/// there. Returns the written path.
pub fn write_report(
    path: &Path,
    sample_name: &str,
    dose: f64,
    features: &FeatureVector,
) -> Result<PathBuf> {
    let (doc, page1, layer1) = PdfDocument::new(REPORT_TITLE, Mm(210.0), Mm(297.0), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_err)?;

    let mut y = Mm(280.0);
    layer.use_text(REPORT_TITLE, 16.0, Mm(20.0), y, &bold);
    y -= Mm(12.0);

    for line in report_lines(sample_name, dose, features) {
        layer.use_text(&line, 11.0, Mm(20.0), y, &font);
        y -= Mm(7.0);
    }

    let mut writer = BufWriter::new(File::create(path)?);
    doc.save(&mut writer).map_err(pdf_err)?;
    log::info!("Wrote report for '{sample_name}' to {}", path.display());
    Ok(path.to_path_buf())
}
