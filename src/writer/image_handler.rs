//! Single-page JPEG embedding.
//!
//! Caller-supplied JPEG bytes are passed through untouched as a DCTDecode
//! stream; no decoding or re-encoding happens on this path. The only
//! inspection is a header scan for the frame's component count, which picks
//! the `/ColorSpace` of the XObject dictionary.
//!
//! Pixel dimensions are caller-supplied and trusted. A mismatch with the
//! actual bitmap distorts the rendered image but the document stays
//! structurally valid.

use super::content_stream::ContentStreamBuilder;
use super::pdf_writer::{PdfWriter, PAGES_ID};
use crate::error::{Error, Result};
use crate::geometry::PageSize;
use crate::object::Object;
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Conversion factor from source pixels (assumed 96 DPI) to PDF points.
pub(crate) const PX_TO_PT: f32 = 72.0 / 96.0;

/// Default page margin for image documents, in points.
pub const DEFAULT_IMAGE_MARGIN: f32 = 10.0;

/// Required prefix of an accepted image data URL.
const JPEG_DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Color space of an embedded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Grayscale (1 component per pixel)
    DeviceGray,
    /// RGB color (3 components per pixel)
    DeviceRGB,
    /// CMYK color (4 components per pixel)
    DeviceCMYK,
}

impl ColorSpace {
    /// PDF name for this color space.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceCMYK => "DeviceCMYK",
        }
    }
}

/// A JPEG ready for pass-through embedding.
#[derive(Debug, Clone)]
pub struct JpegImage {
    /// Source raster width in pixels (caller-supplied)
    pub width_px: u32,
    /// Source raster height in pixels (caller-supplied)
    pub height_px: u32,
    /// Color space read from the JPEG frame header
    pub color_space: ColorSpace,
    /// Raw JPEG bytes, emitted verbatim as the DCTDecode stream
    pub data: Vec<u8>,
}

impl JpegImage {
    /// Extract the JPEG payload of a `data:image/jpeg;base64,` URL.
    ///
    /// Fails fast with a typed error on a missing prefix, an undecodable or
    /// empty payload, or bytes that are not a JPEG frame, so callers can
    /// apply their fallback chain instead of shipping a corrupt document.
    pub fn from_data_url(data_url: &str, width_px: u32, height_px: u32) -> Result<Self> {
        if width_px == 0 || height_px == 0 {
            return Err(Error::InvalidDimensions {
                width: width_px,
                height: height_px,
            });
        }
        let payload = data_url
            .strip_prefix(JPEG_DATA_URL_PREFIX)
            .ok_or_else(|| Error::InvalidDataUrl("expected data:image/jpeg;base64, prefix".to_string()))?;
        let data = STANDARD
            .decode(payload)
            .map_err(|e| Error::InvalidDataUrl(format!("base64 payload: {}", e)))?;
        if data.is_empty() {
            return Err(Error::InvalidDataUrl("empty payload".to_string()));
        }
        let color_space = scan_color_space(&data)?;
        Ok(Self {
            width_px,
            height_px,
            color_space,
            data,
        })
    }

    /// Wrap already-extracted JPEG bytes.
    pub fn from_bytes(data: Vec<u8>, width_px: u32, height_px: u32) -> Result<Self> {
        if width_px == 0 || height_px == 0 {
            return Err(Error::InvalidDimensions {
                width: width_px,
                height: height_px,
            });
        }
        let color_space = scan_color_space(&data)?;
        Ok(Self {
            width_px,
            height_px,
            color_space,
            data,
        })
    }

    /// Source width in points at the assumed 96 DPI.
    pub fn width_pt(&self) -> f32 {
        self.width_px as f32 * PX_TO_PT
    }

    /// Source height in points at the assumed 96 DPI.
    pub fn height_pt(&self) -> f32 {
        self.height_px as f32 * PX_TO_PT
    }

    /// Build the Image XObject stream for this JPEG.
    pub fn xobject(&self) -> Object {
        Object::stream(
            vec![
                ("Type", Object::name("XObject")),
                ("Subtype", Object::name("Image")),
                ("Width", Object::integer(self.width_px as i64)),
                ("Height", Object::integer(self.height_px as i64)),
                ("ColorSpace", Object::name(self.color_space.pdf_name())),
                ("BitsPerComponent", Object::integer(8)),
                ("Filter", Object::name("DCTDecode")),
            ],
            self.data.clone(),
        )
    }
}

/// Position and display size of an image on a page, in points.
#[derive(Debug, Clone, Copy)]
pub struct ImagePlacement {
    /// X position of the left edge
    pub x: f32,
    /// Y position of the bottom edge
    pub y: f32,
    /// Display width
    pub width: f32,
    /// Display height
    pub height: f32,
}

/// Scale factor fitting a source rectangle into a box without upscaling.
pub(crate) fn fit_scale(width_pt: f32, height_pt: f32, usable_w: f32, usable_h: f32) -> f32 {
    (usable_w / width_pt).min(usable_h / height_pt).min(1.0)
}

/// Append one image page (XObject stream, content stream, page object) to a
/// document under construction, returning the page's object ID.
pub(crate) fn add_image_page(
    writer: &mut PdfWriter,
    image: &JpegImage,
    page_size: PageSize,
    placement: ImagePlacement,
) -> u32 {
    let xobject_id = writer.add_object(&image.xobject());

    let mut content = ContentStreamBuilder::new();
    content.draw_image(
        "Im1",
        placement.x,
        placement.y,
        placement.width,
        placement.height,
    );
    let content_id = writer.add_object(&Object::stream(vec![], content.build()));

    let (page_w, page_h) = page_size.dimensions();
    writer.add_object(&Object::dict(vec![
        ("Type", Object::name("Page")),
        ("Parent", Object::reference(PAGES_ID)),
        (
            "MediaBox",
            Object::rect(0.0, 0.0, page_w as f64, page_h as f64),
        ),
        ("Contents", Object::reference(content_id)),
        (
            "Resources",
            Object::dict(vec![(
                "XObject",
                Object::dict(vec![("Im1", Object::reference(xobject_id))]),
            )]),
        ),
    ]))
}

/// Single image page on a given page size: scaled to fit inside the margin
/// box, aspect ratio preserved, never upscaled, anchored at
/// `(margin, margin)`.
pub(crate) fn render_single(
    image: &JpegImage,
    margin: f32,
    page_size: PageSize,
) -> Result<Vec<u8>> {
    let (page_w, page_h) = page_size.dimensions();
    let usable_w = page_w - 2.0 * margin;
    let usable_h = page_h - 2.0 * margin;
    let scale = fit_scale(image.width_pt(), image.height_pt(), usable_w, usable_h);
    log::debug!(
        "image page: {}x{} px, scale {:.4}",
        image.width_px,
        image.height_px,
        scale
    );

    let mut writer = PdfWriter::with_catalog();
    let page_id = add_image_page(
        &mut writer,
        image,
        page_size,
        ImagePlacement {
            x: margin,
            y: margin,
            width: image.width_pt() * scale,
            height: image.height_pt() * scale,
        },
    );
    writer.fill_pages(&[page_id])?;
    writer.finalize()
}

/// Render a one-page A4 document embedding the JPEG of a
/// `data:image/jpeg;base64,` URL, scaled to fit within the margin on every
/// side.
pub fn render_image_page(
    jpeg_data_url: &str,
    pixel_width: u32,
    pixel_height: u32,
    margin: f32,
) -> Result<Vec<u8>> {
    let image = JpegImage::from_data_url(jpeg_data_url, pixel_width, pixel_height)?;
    render_single(&image, margin, PageSize::A4)
}

/// Scan the JPEG marker stream for the start-of-frame component count.
fn scan_color_space(data: &[u8]) -> Result<ColorSpace> {
    if data.len() < 2 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(Error::Image("not a valid JPEG".to_string()));
    }

    let mut pos = 2;
    while pos < data.len() - 1 {
        if data[pos] != 0xFF {
            pos += 1;
            continue;
        }

        let marker = data[pos + 1];
        pos += 2;

        // Skip fill bytes and stuffed zeros.
        if marker == 0xFF || marker == 0x00 {
            continue;
        }

        // Start-of-frame markers, all variants.
        if matches!(
            marker,
            0xC0 | 0xC1 | 0xC2 | 0xC3 | 0xC5 | 0xC6 | 0xC7 | 0xC9 | 0xCA | 0xCB | 0xCD | 0xCE
                | 0xCF
        ) {
            if pos + 7 >= data.len() {
                return Err(Error::Image("truncated JPEG header".to_string()));
            }
            let components = data[pos + 7];
            return Ok(match components {
                1 => ColorSpace::DeviceGray,
                4 => ColorSpace::DeviceCMYK,
                _ => ColorSpace::DeviceRGB,
            });
        }

        // Skip segments we do not care about.
        if pos + 2 > data.len() {
            break;
        }
        let length = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
        pos += length;
    }

    Err(Error::Image("no frame header found".to_string()))
}
