//! Multi-page image documents.
//!
//! A JPEG taller than one page at fit-to-width scale is split into
//! horizontal pixel bands. Unlike the single-page embedder this path must
//! decode the bitmap, because each band is re-encoded as its own JPEG and
//! emitted as its own XObject and page.
//!
//! Decoding and band re-encoding go through the [`RasterCodec`] seam so the
//! rasterizing capability can be substituted; [`JpegCodec`] is the default,
//! backed by the `image` crate. Band encoding is a sequential loop over one
//! decoded bitmap and must stay sequential.

use super::image_handler::{self, ImagePlacement, JpegImage, DEFAULT_IMAGE_MARGIN, PX_TO_PT};
use super::pdf_writer::PdfWriter;
use crate::error::{Error, Result};
use crate::geometry::PageSize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag, checked between band iterations.
///
/// Cloning shares the flag; any clone can cancel the operation.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Bitmap decode and band re-encode capability.
///
/// Implementations hold the decoded bitmap between calls; the paginator
/// decodes once and then requests bands top to bottom.
pub trait RasterCodec {
    /// Decode JPEG bytes into the working bitmap, returning its actual pixel
    /// dimensions.
    fn decode(&mut self, jpeg: &[u8]) -> Result<(u32, u32)>;

    /// Re-encode rows `[y, y + height)` of the working bitmap as a JPEG at
    /// the given quality (0 to 100).
    fn encode_band(&mut self, y: u32, height: u32, quality: u8) -> Result<Vec<u8>>;
}

/// Default codec backed by the `image` crate.
#[derive(Default)]
pub struct JpegCodec {
    bitmap: Option<image::DynamicImage>,
}

impl JpegCodec {
    /// Create a codec with no decoded bitmap.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RasterCodec for JpegCodec {
    fn decode(&mut self, jpeg: &[u8]) -> Result<(u32, u32)> {
        let bitmap = image::load_from_memory_with_format(jpeg, image::ImageFormat::Jpeg)
            .map_err(|e| Error::Image(format!("decode: {}", e)))?;
        let dims = (bitmap.width(), bitmap.height());
        self.bitmap = Some(bitmap);
        Ok(dims)
    }

    fn encode_band(&mut self, y: u32, height: u32, quality: u8) -> Result<Vec<u8>> {
        let bitmap = self
            .bitmap
            .as_ref()
            .ok_or_else(|| Error::Image("encode_band before decode".to_string()))?;
        let y = y.min(bitmap.height().saturating_sub(1));
        let height = height.min(bitmap.height() - y).max(1);
        let band = bitmap.crop_imm(0, y, bitmap.width(), height).to_rgb8();

        let mut out = Vec::new();
        let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality);
        encoder
            .encode_image(&band)
            .map_err(|e| Error::Image(format!("encode band: {}", e)))?;
        Ok(out)
    }
}

/// Options for multi-page image rendering.
#[derive(Debug, Clone, Default)]
pub struct ImageDocumentOptions {
    /// Uniform page margin in points; [`DEFAULT_IMAGE_MARGIN`] when unset
    pub margin: Option<f32>,
    /// Page size, A4 by default
    pub page_size: PageSize,
    /// JPEG re-encode quality in 0.0 to 1.0; 0.8 when unset
    pub quality: Option<f32>,
    /// Optional cancellation token checked before every band
    pub cancel: Option<CancelToken>,
}

impl ImageDocumentOptions {
    fn margin(&self) -> f32 {
        self.margin.unwrap_or(DEFAULT_IMAGE_MARGIN)
    }

    fn quality_u8(&self) -> u8 {
        (self.quality.unwrap_or(0.8).clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

/// Render a JPEG data URL across as many pages as its height needs, using
/// the default codec.
pub fn render_image_document(
    jpeg_data_url: &str,
    pixel_width: u32,
    pixel_height: u32,
    options: &ImageDocumentOptions,
) -> Result<Vec<u8>> {
    render_image_document_with(&mut JpegCodec::new(), jpeg_data_url, pixel_width, pixel_height, options)
}

/// Render a JPEG data URL across pages through a caller-supplied codec.
///
/// The fit-to-width scale is computed from the caller-supplied pixel width.
/// When the scaled height fits one page the original bytes are embedded
/// unchanged on a single page; otherwise the bitmap is decoded and sliced
/// into bands of the pixel-row count that exactly fills one page, top to
/// bottom, last band possibly shorter.
pub fn render_image_document_with<C: RasterCodec>(
    codec: &mut C,
    jpeg_data_url: &str,
    pixel_width: u32,
    pixel_height: u32,
    options: &ImageDocumentOptions,
) -> Result<Vec<u8>> {
    let image = JpegImage::from_data_url(jpeg_data_url, pixel_width, pixel_height)?;
    let margin = options.margin();
    let (page_w, page_h) = options.page_size.dimensions();
    let usable_w = page_w - 2.0 * margin;
    let usable_h = page_h - 2.0 * margin;

    let scale = (usable_w / image.width_pt()).min(1.0);
    if image.height_pt() * scale <= usable_h {
        // Fits one page at fit-to-width scale; pass the bytes through.
        return image_handler::render_single(&image, margin, options.page_size);
    }

    let slice_px = ((usable_h / (PX_TO_PT * scale)) as u32).max(1);
    let page_count = pixel_height.div_ceil(slice_px);
    log::debug!(
        "image document: {}x{} px, scale {:.4}, {} rows per band, {} pages",
        pixel_width,
        pixel_height,
        scale,
        slice_px,
        page_count
    );

    codec.decode(&image.data)?;

    let mut writer = PdfWriter::with_catalog();
    let mut page_ids = Vec::with_capacity(page_count as usize);
    let mut y = 0;
    while y < pixel_height {
        if let Some(token) = &options.cancel {
            if token.is_cancelled() {
                return Err(Error::Cancelled);
            }
        }

        let band_height = slice_px.min(pixel_height - y);
        let band_jpeg = codec.encode_band(y, band_height, options.quality_u8())?;
        let band = JpegImage::from_bytes(band_jpeg, pixel_width, band_height)?;

        let placement = ImagePlacement {
            x: margin,
            y: margin,
            width: band.width_pt() * scale,
            height: band.height_pt() * scale,
        };
        page_ids.push(image_handler::add_image_page(
            &mut writer,
            &band,
            options.page_size,
            placement,
        ));
        y += band_height;
    }

    writer.fill_pages(&page_ids)?;
    writer.finalize()
}
