//! Text document generators.
//!
//! Two entry points: [`render_text_page`] emits a fixed single page with no
//! wrapping (callers pre-wrap), and [`render_text_document`] soft-wraps an
//! unbounded list of lines and paginates them into as many pages as needed.
//!
//! Wrapping uses a fixed-pitch character-width heuristic
//! (`font_size * 0.6` points per character), not real glyph metrics. This is
//! a documented approximation kept for output stability.

use super::content_stream::ContentStreamBuilder;
use super::pdf_writer::{PdfWriter, PAGES_ID};
use crate::error::Result;
use crate::geometry::{Margins, PageSize};
use crate::object::Object;

/// Average glyph advance as a fraction of the font size, for the
/// character-budget wrap heuristic.
pub(crate) const CHAR_WIDTH_RATIO: f32 = 0.6;

/// Layout parameters for multi-page text documents.
#[derive(Debug, Clone, Copy)]
pub struct PageLayout {
    /// Page size, A4 by default
    pub page_size: PageSize,
    /// Page margins in points
    pub margins: Margins,
    /// Body font size in points
    pub font_size: f32,
    /// Line height (leading) in points
    pub line_height: f32,
    /// Lines reserved at the top of the text area for the title block.
    ///
    /// The reservation applies to every page even though the title is drawn
    /// on the first page only; later pages intentionally leave it blank.
    pub title_reserved_lines: usize,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margins: Margins::default(),
            font_size: 12.0,
            line_height: 14.0,
            title_reserved_lines: 3,
        }
    }
}

impl PageLayout {
    /// Width available to body text.
    pub fn usable_width(&self) -> f32 {
        self.page_size.width() - self.margins.horizontal()
    }

    /// Character budget per wrapped line under the width heuristic.
    pub fn max_chars_per_line(&self) -> usize {
        let budget = (self.usable_width() / (self.font_size * CHAR_WIDTH_RATIO)) as usize;
        budget.max(1)
    }

    /// Body lines that fit on one page after the title reservation.
    pub fn lines_per_page(&self) -> usize {
        let text_height = self.page_size.height() - self.margins.vertical();
        let total = (text_height / self.line_height) as usize;
        total.saturating_sub(self.title_reserved_lines).max(1)
    }

    /// Vertical start of the body text, below the title reservation.
    fn body_start_y(&self) -> f32 {
        self.page_size.height()
            - self.margins.top
            - self.title_reserved_lines as f32 * self.line_height
    }
}

/// Wrap one line to the character budget.
///
/// Breaks at the last space at or before the budget, but not before half of
/// it (small fragments read worse than a slightly ragged edge). A run with no
/// usable space is hard-broken at exactly the budget.
pub fn wrap_line(line: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let chars: Vec<char> = line.chars().collect();
    if chars.len() <= max_chars {
        return vec![line.to_string()];
    }

    let mut wrapped = Vec::new();
    let mut rest: &[char] = &chars;
    while rest.len() > max_chars {
        let window = &rest[..=max_chars];
        let break_at = window
            .iter()
            .rposition(|&c| c == ' ')
            .filter(|&pos| pos >= max_chars / 2);
        match break_at {
            Some(pos) => {
                wrapped.push(rest[..pos].iter().collect());
                rest = &rest[pos + 1..];
            },
            None => {
                wrapped.push(rest[..max_chars].iter().collect());
                rest = &rest[max_chars..];
            },
        }
    }
    if !rest.is_empty() {
        wrapped.push(rest.iter().collect());
    }
    wrapped
}

/// Wrap every input line, preserving the order and empty lines.
pub fn wrap_lines(lines: &[String], max_chars: usize) -> Vec<String> {
    lines
        .iter()
        .flat_map(|line| wrap_line(line, max_chars))
        .collect()
}

/// The single Helvetica font object shared by every text-emitting generator.
pub(crate) fn helvetica_font() -> Object {
    Object::dict(vec![
        ("Type", Object::name("Font")),
        ("Subtype", Object::name("Type1")),
        ("BaseFont", Object::name("Helvetica")),
        ("Encoding", Object::name("WinAnsiEncoding")),
    ])
}

/// A page object referencing one content stream and one font resource.
pub(crate) fn text_page_object(page_size: PageSize, content_id: u32, font_id: u32) -> Object {
    let (width, height) = page_size.dimensions();
    Object::dict(vec![
        ("Type", Object::name("Page")),
        ("Parent", Object::reference(PAGES_ID)),
        (
            "MediaBox",
            Object::rect(0.0, 0.0, width as f64, height as f64),
        ),
        ("Contents", Object::reference(content_id)),
        (
            "Resources",
            Object::dict(vec![(
                "Font",
                Object::dict(vec![("F1", Object::reference(font_id))]),
            )]),
        ),
    ])
}

/// Render a one-page A4 document: a 16 pt title followed by the given body
/// lines at 12 pt with 14 pt leading.
///
/// No wrapping and no overflow detection happen here; lines drawn past the
/// bottom margin are clipped by viewers. Callers needing either should use
/// [`render_text_document`].
pub fn render_text_page(title: &str, lines: &[String]) -> Result<Vec<u8>> {
    let mut writer = PdfWriter::with_catalog();
    let font_id = writer.add_object(&helvetica_font());

    let mut content = ContentStreamBuilder::new();
    content
        .begin_text()
        .set_font("F1", 16.0)
        .move_text(50.0, 810.0)
        .show_text(title)
        .end_text();
    content
        .begin_text()
        .set_font("F1", 12.0)
        .set_leading(14.0)
        .move_text(50.0, 780.0);
    for line in lines {
        content.show_text(line).next_line();
    }
    content.end_text();

    let content_id = writer.add_object(&Object::stream(vec![], content.build()));
    let page_id = writer.add_object(&text_page_object(PageSize::A4, content_id, font_id));
    writer.fill_pages(&[page_id])?;
    writer.finalize()
}

/// Render a multi-page document from an unbounded list of body lines.
///
/// Lines are soft-wrapped to the layout's character budget, chunked into
/// pages, and emitted one content stream and page object per chunk. The
/// title is drawn at 16 pt on the first page only.
pub fn render_text_document(title: &str, lines: &[String], layout: &PageLayout) -> Result<Vec<u8>> {
    let wrapped = wrap_lines(lines, layout.max_chars_per_line());
    let lines_per_page = layout.lines_per_page();
    let page_count = wrapped.len().div_ceil(lines_per_page).max(1);
    log::debug!(
        "text document: {} wrapped lines, {} per page, {} pages",
        wrapped.len(),
        lines_per_page,
        page_count
    );

    let mut writer = PdfWriter::with_catalog();
    let font_id = writer.add_object(&helvetica_font());

    let chunks: Vec<&[String]> = if wrapped.is_empty() {
        vec![&[]]
    } else {
        wrapped.chunks(lines_per_page).collect()
    };

    let mut page_ids = Vec::with_capacity(chunks.len());
    for (index, chunk) in chunks.iter().enumerate() {
        let mut content = ContentStreamBuilder::new();
        if index == 0 {
            content
                .begin_text()
                .set_font("F1", 16.0)
                .move_text(
                    layout.margins.left,
                    layout.page_size.height() - layout.margins.top,
                )
                .show_text(title)
                .end_text();
        }
        content
            .begin_text()
            .set_font("F1", layout.font_size)
            .set_leading(layout.line_height)
            .move_text(layout.margins.left, layout.body_start_y());
        for line in chunk.iter() {
            content.show_text(line).next_line();
        }
        content.end_text();

        let content_id = writer.add_object(&Object::stream(vec![], content.build()));
        page_ids.push(writer.add_object(&text_page_object(layout.page_size, content_id, font_id)));
    }

    writer.fill_pages(&page_ids)?;
    writer.finalize()
}
