//! PDF writing module.
//!
//! Everything needed to go from caller inputs to finished document bytes.
//!
//! ## Architecture
//!
//! ```text
//! title/lines | JPEG data URL | AnalysisRecord
//!     ↓
//! [text_renderer | image_handler | image_paginator | report_renderer]
//!     ↓
//! [ContentStreamBuilder] (operators → content stream bytes)
//!     ↓
//! [PdfWriter] (object list, offsets, xref, trailer)
//!     ↓
//! [ObjectSerializer] (serializes PDF objects)
//!     ↓
//! PDF bytes
//! ```
//!
//! Every generator builds its own object list and delegates to [`PdfWriter`]
//! for assembly; all literal text passes through the crate's single-byte
//! encoder on its way into a content stream.

mod content_stream;
mod image_handler;
mod image_paginator;
mod object_serializer;
mod pdf_writer;
mod report_renderer;
mod text_renderer;

pub use content_stream::{ContentStreamBuilder, ContentStreamOp};
pub use image_handler::{
    render_image_page, ColorSpace, ImagePlacement, JpegImage, DEFAULT_IMAGE_MARGIN,
};
pub use image_paginator::{
    render_image_document, render_image_document_with, CancelToken, ImageDocumentOptions,
    JpegCodec, RasterCodec,
};
pub use object_serializer::ObjectSerializer;
pub use pdf_writer::{PdfWriter, CATALOG_ID, PAGES_ID};
pub use report_renderer::{
    render_analysis_report, AnalysisRecord, KeyConcept, TopicQuestions,
};
pub use text_renderer::{
    render_text_document, render_text_page, wrap_line, wrap_lines, PageLayout,
};
