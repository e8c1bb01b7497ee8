//! Boundary export policy: retry ladder and text fallback.
//!
//! The generators themselves never look at output size. Callers that must
//! stay under a byte budget wrap them in an [`ExportPolicy`]: the source
//! material is rasterized at progressively lower scale and JPEG quality
//! until a rendered document fits, and when no attempt fits (or every
//! attempt fails) the export degrades to a plain multi-page text document.

use crate::error::{Error, Result};
use crate::writer::{render_image_document, render_text_document, ImageDocumentOptions, PageLayout};
use crate::PDF_MIME_TYPE;

/// One rung of the retry ladder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportAttempt {
    /// Rasterization scale passed to the bitmap source
    pub scale: f32,
    /// JPEG re-encode quality, 0.0 to 1.0
    pub quality: f32,
}

/// Default retry ladder, highest fidelity first.
pub const DEFAULT_LADDER: [ExportAttempt; 5] = [
    ExportAttempt { scale: 2.0, quality: 0.95 },
    ExportAttempt { scale: 1.6, quality: 0.9 },
    ExportAttempt { scale: 1.3, quality: 0.85 },
    ExportAttempt { scale: 1.1, quality: 0.8 },
    ExportAttempt { scale: 1.0, quality: 0.75 },
];

/// Caller-side rasterizer for the material being exported.
///
/// Implementations live outside this crate; the policy only asks them to
/// render at a scale and hand back a JPEG data URL with its pixel
/// dimensions.
pub trait BitmapSource {
    /// Rasterize at the given scale, returning
    /// `(jpeg data URL, pixel width, pixel height)`.
    fn rasterize(&mut self, scale: f32) -> Result<(String, u32, u32)>;
}

/// A finished export.
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// The document bytes
    pub bytes: Vec<u8>,
    /// Content type of `bytes`, always [`PDF_MIME_TYPE`]
    pub mime_type: &'static str,
    /// Whether the text fallback was used instead of an image document
    pub used_fallback: bool,
}

/// Size-budgeted export with image retries and a text fallback.
#[derive(Debug, Clone)]
pub struct ExportPolicy {
    /// Attempts tried in order; [`DEFAULT_LADDER`] by default
    pub attempts: Vec<ExportAttempt>,
    /// Maximum accepted output size in bytes
    pub max_bytes: usize,
    /// Page options for the image documents; the quality field is
    /// overridden per attempt
    pub options: ImageDocumentOptions,
    /// Layout of the text fallback document
    pub fallback_layout: PageLayout,
}

impl ExportPolicy {
    /// Policy with the default ladder and the given byte budget.
    pub fn new(max_bytes: usize) -> Self {
        Self {
            attempts: DEFAULT_LADDER.to_vec(),
            max_bytes,
            options: ImageDocumentOptions::default(),
            fallback_layout: PageLayout::default(),
        }
    }

    /// Export the source material as an image document within the budget,
    /// falling back to a text rendering of `fallback_lines` when every
    /// attempt exceeds it or fails.
    ///
    /// Cancellation aborts the whole export rather than falling back.
    pub fn export<S: BitmapSource>(
        &self,
        source: &mut S,
        title: &str,
        fallback_lines: &[String],
    ) -> Result<ExportResult> {
        for attempt in &self.attempts {
            match self.try_attempt(source, attempt) {
                Ok(bytes) if bytes.len() <= self.max_bytes => {
                    return Ok(ExportResult {
                        bytes,
                        mime_type: PDF_MIME_TYPE,
                        used_fallback: false,
                    });
                },
                Ok(bytes) => {
                    log::debug!(
                        "export attempt scale {} quality {} produced {} bytes, over the {} budget",
                        attempt.scale,
                        attempt.quality,
                        bytes.len(),
                        self.max_bytes
                    );
                },
                Err(Error::Cancelled) => return Err(Error::Cancelled),
                Err(err) => {
                    log::warn!(
                        "export attempt scale {} quality {} failed: {}",
                        attempt.scale,
                        attempt.quality,
                        err
                    );
                },
            }
        }

        log::warn!("no image attempt fit the {} byte budget, using text fallback", self.max_bytes);
        let bytes = render_text_document(title, fallback_lines, &self.fallback_layout)?;
        Ok(ExportResult {
            bytes,
            mime_type: PDF_MIME_TYPE,
            used_fallback: true,
        })
    }

    fn try_attempt<S: BitmapSource>(
        &self,
        source: &mut S,
        attempt: &ExportAttempt,
    ) -> Result<Vec<u8>> {
        let (data_url, width, height) = source.rasterize(attempt.scale)?;
        let options = ImageDocumentOptions {
            quality: Some(attempt.quality),
            ..self.options.clone()
        };
        render_image_document(&data_url, width, height, &options)
    }
}
