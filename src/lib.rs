#![warn(missing_docs)]
// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::match_like_matches_macro)]

//! # pdf_scribe
//!
//! A hand-rolled PDF document generator: assembles valid PDF byte streams
//! (objects, cross-reference table, content streams, image streams) from
//! scratch, without a PDF library.
//!
//! ## Entry points
//!
//! - [`writer::render_text_page`]: one fixed A4 page, title plus pre-wrapped
//!   body lines
//! - [`writer::render_text_document`]: soft-wrapped, paginated text across
//!   as many pages as needed
//! - [`writer::render_image_page`]: one caller-supplied JPEG embedded
//!   pass-through, scaled to fit one page
//! - [`writer::render_image_document`]: a tall JPEG sliced into horizontal
//!   bands, one page per band
//! - [`writer::render_analysis_report`]: two-column prose plus ruled/shaded
//!   tables from an [`writer::AnalysisRecord`]
//! - [`export::ExportPolicy`]: size-budgeted retry ladder with a text
//!   fallback, for callers at the persistence boundary
//!
//! Every generator produces an independent, self-contained byte buffer of
//! MIME type [`PDF_MIME_TYPE`]. Text is limited to Helvetica with a
//! single-byte Western-European encoding; unsupported code points render
//! as `?`.
//!
//! ## Quick start
//!
//! ```
//! use pdf_scribe::writer::{render_text_document, PageLayout};
//!
//! # fn main() -> pdf_scribe::Result<()> {
//! let lines: Vec<String> = (0..200)
//!     .map(|i| format!("Body line number {}", i))
//!     .collect();
//! let bytes = render_text_document("My Notes", &lines, &PageLayout::default())?;
//! assert!(bytes.starts_with(b"%PDF-1.4"));
//! # Ok(())
//! # }
//! ```

pub mod encoding;
pub mod error;
pub mod export;
pub mod geometry;
pub mod object;
pub mod writer;

pub use error::{Error, Result};
pub use object::Object;

/// Content type of every document this crate produces.
pub const PDF_MIME_TYPE: &str = "application/pdf";
