//! Structured analysis-report documents.
//!
//! Renders an [`AnalysisRecord`] as a titled report: a two-column prose
//! section of labelled, underlined paragraphs followed by two ruled tables
//! with shaded header rows. Layout uses the same character-width wrap
//! heuristic as the text renderers.
//!
//! Page breaks are row-atomic: before any table row or paragraph label the
//! required space is preflighted, and the page is flushed when the unit
//! would cross the bottom margin. A row's borders and cell lines are always
//! drawn together; only the wrapped body of a single paragraph may span a
//! break between its own lines. Table header rows are not repeated after a
//! break.

use super::content_stream::ContentStreamBuilder;
use super::pdf_writer::PdfWriter;
use super::text_renderer::{helvetica_font, text_page_object, wrap_line, CHAR_WIDTH_RATIO};
use crate::error::{Error, Result};
use crate::geometry::{Margins, PageSize};
use crate::object::Object;
use serde::{Deserialize, Serialize};

/// Body text size in points.
const BODY_FONT: f32 = 10.0;
/// Line height for body text and table cells.
const LINE_HEIGHT: f32 = 12.0;
/// Paragraph label size.
const LABEL_FONT: f32 = 11.0;
/// Table section heading size.
const HEADING_FONT: f32 = 13.0;
/// Report title size.
const TITLE_FONT: f32 = 16.0;
/// Padding inside table cells, all sides.
const CELL_PADDING: f32 = 4.0;
/// Gap between the two prose columns.
const COLUMN_GAP: f32 = 20.0;
/// Fill gray of table header rows.
const HEADER_GRAY: f32 = 0.9;
/// Stroke width of rules and cell borders.
const RULE_WIDTH: f32 = 0.5;

/// Result of an external exam analysis, as received from the analyzer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    /// Recurring themes across the analyzed material
    #[serde(default)]
    pub common_themes: String,
    /// Frequently used keywords
    #[serde(default)]
    pub keywords: String,
    /// Kinds of questions encountered
    #[serde(default)]
    pub question_types: String,
    /// Trends observed in the hardest questions
    #[serde(default)]
    pub hard_question_trends: String,
    /// Advice aimed at passing
    #[serde(default)]
    pub advice_for_passing: String,
    /// Advice aimed at a top score
    #[serde(default)]
    pub advice_for_top_score: String,
    /// Key concepts with occurrence counts
    #[serde(default)]
    pub key_concepts: Vec<KeyConcept>,
    /// Topics mapped to the questions that touch them
    #[serde(default)]
    pub question_topic_map: Vec<TopicQuestions>,
}

/// One key concept row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyConcept {
    /// Concept name
    pub name: String,
    /// Concept category
    #[serde(rename = "type")]
    pub kind: String,
    /// Number of occurrences in the material
    pub occurrences: u32,
}

/// One topic with its associated questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicQuestions {
    /// Topic name
    pub topic: String,
    /// Questions touching the topic
    pub questions: Vec<String>,
}

/// Wrapped cell lines per column of one table row.
type TableRow = Vec<Vec<String>>;

/// Incremental page builder for the report layout.
///
/// Owns the document writer, the current page's content stream, and the
/// vertical cursor. `y` always marks the top of the unused area.
struct ReportComposer {
    writer: PdfWriter,
    font_id: u32,
    page_ids: Vec<u32>,
    content: ContentStreamBuilder,
    y: f32,
    dirty: bool,
    page_size: PageSize,
    margins: Margins,
}

impl ReportComposer {
    fn new(page_size: PageSize, margins: Margins) -> Self {
        let mut writer = PdfWriter::with_catalog();
        let font_id = writer.add_object(&helvetica_font());
        let y = page_size.height() - margins.top;
        Self {
            writer,
            font_id,
            page_ids: Vec::new(),
            content: ContentStreamBuilder::new(),
            y,
            dirty: false,
            page_size,
            margins,
        }
    }

    fn bottom(&self) -> f32 {
        self.margins.bottom
    }

    fn usable_width(&self) -> f32 {
        self.page_size.width() - self.margins.horizontal()
    }

    /// Most body lines a single table row can hold on a fresh page.
    fn max_row_lines(&self) -> usize {
        let tallest = self.page_size.height() - self.margins.vertical() - 2.0 * CELL_PADDING;
        (tallest / LINE_HEIGHT) as usize
    }

    /// Close the current page and start a new one at the top margin.
    fn flush_page(&mut self) {
        let content = std::mem::take(&mut self.content);
        let content_id = self
            .writer
            .add_object(&Object::stream(vec![], content.build()));
        self.page_ids.push(self.writer.add_object(&text_page_object(
            self.page_size,
            content_id,
            self.font_id,
        )));
        self.y = self.page_size.height() - self.margins.top;
        self.dirty = false;
    }

    /// Flush the page if `needed` points of height would cross the bottom
    /// margin.
    fn ensure_space(&mut self, needed: f32) {
        if self.y - needed < self.bottom() {
            self.flush_page();
        }
    }

    fn text(&mut self, x: f32, baseline: f32, size: f32, text: &str) {
        self.content
            .begin_text()
            .set_font("F1", size)
            .move_text(x, baseline)
            .show_text(text)
            .end_text();
        self.dirty = true;
    }

    fn rule(&mut self, x1: f32, y: f32, x2: f32) {
        self.content
            .set_line_width(RULE_WIDTH)
            .move_to(x1, y)
            .line_to(x2, y)
            .stroke();
        self.dirty = true;
    }

    fn cell_border(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.content
            .set_line_width(RULE_WIDTH)
            .rect(x, y, width, height)
            .stroke();
        self.dirty = true;
    }

    fn shaded_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.content
            .set_fill_gray(HEADER_GRAY)
            .rect(x, y, width, height)
            .fill()
            .set_fill_gray(0.0);
        self.dirty = true;
    }

    /// Draw the report title on the current page.
    fn title(&mut self, title: &str) {
        self.ensure_space(TITLE_FONT + LINE_HEIGHT);
        self.text(self.margins.left, self.y - TITLE_FONT, TITLE_FONT, title);
        self.y -= TITLE_FONT + LINE_HEIGHT;
    }

    /// Draw a table section heading with space for the table header below.
    fn section_heading(&mut self, heading: &str) {
        self.ensure_space(HEADING_FONT + 3.0 * LINE_HEIGHT);
        self.text(self.margins.left, self.y - HEADING_FONT, HEADING_FONT, heading);
        self.y -= HEADING_FONT + LINE_HEIGHT / 2.0;
    }

    /// Draw the labelled prose paragraphs in two columns.
    ///
    /// Paragraphs are drawn as pairs sharing a baseline grid, one per
    /// column. The atomic unit is a label plus its first body line; body
    /// lines beyond the first may continue across a page break.
    fn paragraph_columns(&mut self, pairs: &[((&str, &str), (&str, &str))]) {
        let col_width = (self.usable_width() - COLUMN_GAP) / 2.0;
        let budget = ((col_width / (BODY_FONT * CHAR_WIDTH_RATIO)) as usize).max(1);
        let x_left = self.margins.left;
        let x_right = self.margins.left + col_width + COLUMN_GAP;

        for (left, right) in pairs {
            let left_lines = wrap_line(left.1, budget);
            let right_lines = wrap_line(right.1, budget);
            let rows = left_lines.len().max(right_lines.len()) + 1;

            for row in 0..rows {
                let needed = if row == 0 {
                    // Label plus first body line stay together.
                    2.0 * LINE_HEIGHT
                } else {
                    LINE_HEIGHT
                };
                self.ensure_space(needed);
                let baseline = self.y - LINE_HEIGHT;

                if row == 0 {
                    self.text(x_left, baseline, LABEL_FONT, left.0);
                    self.rule(x_left, baseline - 2.0, x_left + col_width);
                    self.text(x_right, baseline, LABEL_FONT, right.0);
                    self.rule(x_right, baseline - 2.0, x_right + col_width);
                } else {
                    if let Some(line) = left_lines.get(row - 1) {
                        self.text(x_left, baseline, BODY_FONT, line);
                    }
                    if let Some(line) = right_lines.get(row - 1) {
                        self.text(x_right, baseline, BODY_FONT, line);
                    }
                }
                self.y -= LINE_HEIGHT;
            }
            self.y -= LINE_HEIGHT / 2.0;
        }
    }

    /// Draw a ruled table with a shaded header row.
    ///
    /// `fractions` give each column's share of the usable width. Rows are
    /// preflighted and never split; the header row is drawn once and not
    /// repeated after a page break. A row wrapping to more lines than any
    /// page holds is an error.
    fn table(&mut self, headers: &[&str], fractions: &[f32], rows: &[TableRow]) -> Result<()> {
        let total_width = self.usable_width();
        let widths: Vec<f32> = fractions.iter().map(|f| f * total_width).collect();
        let mut x_positions = vec![self.margins.left];
        for width in &widths[..widths.len() - 1] {
            let next = x_positions.last().copied().unwrap_or(self.margins.left) + width;
            x_positions.push(next);
        }

        // Header row.
        let header_height = LINE_HEIGHT + 2.0 * CELL_PADDING;
        self.ensure_space(header_height);
        let top = self.y;
        self.shaded_rect(self.margins.left, top - header_height, total_width, header_height);
        for (index, header) in headers.iter().enumerate() {
            self.cell_border(x_positions[index], top - header_height, widths[index], header_height);
            self.text(
                x_positions[index] + CELL_PADDING,
                top - CELL_PADDING - BODY_FONT,
                LABEL_FONT,
                header,
            );
        }
        self.y -= header_height;

        // Body rows, each drawn whole after a preflight.
        for row in rows {
            let line_count = row.iter().map(Vec::len).max().unwrap_or(0).max(1);
            if line_count > self.max_row_lines() {
                return Err(Error::RowTooTall {
                    lines: line_count,
                    max: self.max_row_lines(),
                });
            }
            let row_height = line_count as f32 * LINE_HEIGHT + 2.0 * CELL_PADDING;
            self.ensure_space(row_height);

            let top = self.y;
            for (index, cell) in row.iter().enumerate() {
                self.cell_border(x_positions[index], top - row_height, widths[index], row_height);
                let mut baseline = top - CELL_PADDING - BODY_FONT;
                for line in cell {
                    self.text(x_positions[index] + CELL_PADDING, baseline, BODY_FONT, line);
                    baseline -= LINE_HEIGHT;
                }
            }
            self.y -= row_height;
        }
        self.y -= LINE_HEIGHT;
        Ok(())
    }

    /// Finalize the document.
    fn finish(mut self) -> Result<Vec<u8>> {
        if self.dirty || self.page_ids.is_empty() {
            self.flush_page();
        }
        let page_ids = std::mem::take(&mut self.page_ids);
        self.writer.fill_pages(&page_ids)?;
        self.writer.finalize()
    }
}

/// Character budget of a table column, inside its padding.
fn column_budget(width: f32) -> usize {
    (((width - 2.0 * CELL_PADDING) / (BODY_FONT * CHAR_WIDTH_RATIO)) as usize).max(1)
}

/// Break text into chunks of exactly `max` characters, last chunk shorter.
fn hard_wrap(text: &str, max: usize) -> Vec<String> {
    let max = max.max(1);
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars.chunks(max).map(|chunk| chunk.iter().collect()).collect()
}

/// Render an analysis record as a complete report document on A4 pages.
pub fn render_analysis_report(analysis: &AnalysisRecord, title: &str) -> Result<Vec<u8>> {
    let mut composer = ReportComposer::new(PageSize::A4, Margins::default());
    composer.title(title);

    composer.paragraph_columns(&[
        (
            ("Common Themes", analysis.common_themes.as_str()),
            ("Hard Question Trends", analysis.hard_question_trends.as_str()),
        ),
        (
            ("Keywords", analysis.keywords.as_str()),
            ("Advice for Passing", analysis.advice_for_passing.as_str()),
        ),
        (
            ("Question Types", analysis.question_types.as_str()),
            ("Advice for Top Score", analysis.advice_for_top_score.as_str()),
        ),
    ]);

    let usable = composer.usable_width();

    composer.section_heading("Key Concepts");
    let concept_fractions = [0.6, 0.25, 0.15];
    let concept_rows: Vec<TableRow> = analysis
        .key_concepts
        .iter()
        .map(|concept| {
            vec![
                wrap_line(&concept.name, column_budget(concept_fractions[0] * usable)),
                wrap_line(&concept.kind, column_budget(concept_fractions[1] * usable)),
                vec![concept.occurrences.to_string()],
            ]
        })
        .collect();
    composer.table(
        &["Concept", "Type", "Occurrences"],
        &concept_fractions,
        &concept_rows,
    )?;

    composer.section_heading("Question Topic Map");
    let map_fractions = [0.3, 0.7];
    let map_rows: Vec<TableRow> = analysis
        .question_topic_map
        .iter()
        .map(|entry| {
            let question_budget = column_budget(map_fractions[1] * usable);
            let questions: Vec<String> = entry
                .questions
                .iter()
                .flat_map(|q| hard_wrap(q, question_budget))
                .collect();
            vec![
                wrap_line(&entry.topic, column_budget(map_fractions[0] * usable)),
                questions,
            ]
        })
        .collect();
    composer.table(&["Topic", "Questions"], &map_fractions, &map_rows)?;

    log::debug!(
        "analysis report: {} concepts, {} topics",
        analysis.key_concepts.len(),
        analysis.question_topic_map.len()
    );
    composer.finish()
}
