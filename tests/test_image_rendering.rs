//! Image generator behavior: scaling, slicing, failure modes.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use pdf_scribe::writer::{
    render_image_document, render_image_page, CancelToken, ImageDocumentOptions,
};
use pdf_scribe::Error;

fn solid_jpeg_data_url(width: u32, height: u32) -> String {
    let bitmap = image::RgbImage::from_pixel(width, height, image::Rgb([90, 60, 150]));
    let mut jpeg = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, 88)
        .encode_image(&bitmap)
        .unwrap();
    format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg))
}

#[test]
fn test_oversized_image_scales_to_width() {
    // 3000 px at 96 DPI is 2250 pt, wider than the 575 pt usable width.
    let url = solid_jpeg_data_url(3000, 2000);
    let bytes = render_image_page(&url, 3000, 2000, 10.0).unwrap();
    let content = String::from_utf8_lossy(&bytes).to_string();

    assert!(content.contains("/Width 3000"));
    assert!(content.contains("/Height 2000"));
    // Width lands on 575 pt: usable width at the 575/2250 fit scale.
    assert!(content.contains("575 0 0"));
    assert!(content.contains("/Count 1"));
}

#[test]
fn test_three_band_pagination() {
    let _ = env_logger::builder().is_test(true).try_init();
    // 800 px wide is 600 pt, so the fit scale is 575/600 and one band is
    // floor(822 / (0.75 * 575/600)) = 1143 pixel rows. 3429 rows make
    // exactly three full bands.
    let url = solid_jpeg_data_url(800, 3429);
    let bytes = render_image_document(&url, 800, 3429, &ImageDocumentOptions::default()).unwrap();
    let content = String::from_utf8_lossy(&bytes).to_string();

    assert!(content.contains("/Count 3"));
    assert_eq!(content.matches("/Height 1143").count(), 3);
    assert_eq!(content.matches("/Filter /DCTDecode").count(), 3);
}

#[test]
fn test_band_heights_cover_source_exactly() {
    let url = solid_jpeg_data_url(800, 3000);
    let bytes = render_image_document(&url, 800, 3000, &ImageDocumentOptions::default()).unwrap();
    let content = String::from_utf8_lossy(&bytes).to_string();

    // 3000 rows at 1143 per band: 1143 + 1143 + 714.
    assert!(content.contains("/Count 3"));
    assert_eq!(content.matches("/Height 1143").count(), 2);
    assert_eq!(content.matches("/Height 714").count(), 1);
}

#[test]
fn test_short_image_takes_single_page_path() {
    let url = solid_jpeg_data_url(400, 300);
    let bytes = render_image_document(&url, 400, 300, &ImageDocumentOptions::default()).unwrap();
    let content = String::from_utf8_lossy(&bytes).to_string();
    assert!(content.contains("/Count 1"));
    assert_eq!(content.matches("/Filter /DCTDecode").count(), 1);
}

#[test]
fn test_malformed_data_url_fails_fast() {
    let err = render_image_page("data:text/plain;base64,aGk=", 10, 10, 10.0).unwrap_err();
    assert!(matches!(err, Error::InvalidDataUrl(_)));

    let err =
        render_image_document("not a url at all", 10, 10, &ImageDocumentOptions::default())
            .unwrap_err();
    assert!(matches!(err, Error::InvalidDataUrl(_)));
}

#[test]
fn test_cancelled_document_returns_no_bytes() {
    let token = CancelToken::new();
    token.cancel();
    let options = ImageDocumentOptions {
        cancel: Some(token),
        ..Default::default()
    };
    let url = solid_jpeg_data_url(800, 3429);
    let err = render_image_document(&url, 800, 3429, &options).unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}
