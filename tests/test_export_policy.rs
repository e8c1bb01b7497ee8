//! End-to-end export ladder behavior at the persistence boundary.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use pdf_scribe::export::{BitmapSource, ExportPolicy, DEFAULT_LADDER};
use pdf_scribe::{Result, PDF_MIME_TYPE};

/// Rasterizer standing in for the caller's renderer: a solid-color page
/// whose pixel size tracks the requested scale.
struct PageSource {
    width: u32,
    height: u32,
    scales_seen: Vec<f32>,
}

impl PageSource {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scales_seen: Vec::new(),
        }
    }
}

impl BitmapSource for PageSource {
    fn rasterize(&mut self, scale: f32) -> Result<(String, u32, u32)> {
        self.scales_seen.push(scale);
        let width = (self.width as f32 * scale) as u32;
        let height = (self.height as f32 * scale) as u32;
        let bitmap = image::RgbImage::from_pixel(width, height, image::Rgb([240, 240, 235]));
        let mut jpeg = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, 85)
            .encode_image(&bitmap)
            .unwrap();
        Ok((
            format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg)),
            width,
            height,
        ))
    }
}

#[test]
fn test_ladder_descends_until_budget_met() {
    let _ = env_logger::builder().is_test(true).try_init();
    // Budget that the scale 2.0 rendering of an 800x1100 page overshoots
    // but a smaller rung satisfies.
    let mut source = PageSource::new(800, 1100);
    let first = source.rasterize(2.0).unwrap().0.len();
    let budget = first * 3 / 4;

    let mut source = PageSource::new(800, 1100);
    let policy = ExportPolicy::new(budget);
    let result = policy
        .export(&mut source, "Notes", &["fallback".to_string()])
        .unwrap();

    assert_eq!(result.mime_type, PDF_MIME_TYPE);
    assert!(!result.used_fallback);
    assert!(result.bytes.len() <= budget);
    assert!(source.scales_seen.len() > 1);
    assert_eq!(source.scales_seen[0], DEFAULT_LADDER[0].scale);
}

#[test]
fn test_exhausted_ladder_degrades_to_text() {
    let mut source = PageSource::new(800, 1100);
    let policy = ExportPolicy::new(32);
    let result = policy
        .export(
            &mut source,
            "Notes",
            &["first fallback line".to_string(), "second".to_string()],
        )
        .unwrap();

    assert!(result.used_fallback);
    assert_eq!(source.scales_seen.len(), DEFAULT_LADDER.len());
    let content = String::from_utf8_lossy(&result.bytes).to_string();
    assert!(content.contains("(Notes) Tj"));
    assert!(content.contains("(first fallback line) Tj"));
    assert!(content.contains("/BaseFont /Helvetica"));
}
