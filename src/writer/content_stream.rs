//! PDF content stream builder.
//!
//! Builds the operator sequence for one page. The operator set is the small
//! subset the generators need: text positioning/showing, coordinate
//! transforms, XObject painting, and line/rectangle drawing with gray fills.

use crate::encoding;
use std::io::Write;

/// Operations that can be added to a content stream.
#[derive(Debug, Clone)]
pub enum ContentStreamOp {
    /// Save graphics state (q)
    SaveState,
    /// Restore graphics state (Q)
    RestoreState,
    /// Set transformation matrix (cm)
    Transform(f32, f32, f32, f32, f32, f32),
    /// Begin text object (BT)
    BeginText,
    /// End text object (ET)
    EndText,
    /// Set font and size (Tf)
    SetFont(String, f32),
    /// Move text position (Td)
    MoveText(f32, f32),
    /// Set text leading (TL)
    SetTextLeading(f32),
    /// Move to next line using the current leading (T*)
    NextLine,
    /// Show text (Tj); the literal string is escaped and byte-encoded when
    /// the stream is built
    ShowText(String),
    /// Set fill color gray (g)
    SetFillGray(f32),
    /// Set line width (w)
    SetLineWidth(f32),
    /// Move to (m)
    MoveTo(f32, f32),
    /// Line to (l)
    LineTo(f32, f32),
    /// Rectangle (re)
    Rectangle(f32, f32, f32, f32),
    /// Stroke (S)
    Stroke,
    /// Fill (f)
    Fill,
    /// Paint XObject (Do)
    PaintXObject(String),
}

/// Builder for PDF content streams.
#[derive(Debug, Default)]
pub struct ContentStreamBuilder {
    operations: Vec<ContentStreamOp>,
    in_text_object: bool,
}

impl ContentStreamBuilder {
    /// Create a new content stream builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operation to the stream.
    pub fn op(&mut self, op: ContentStreamOp) -> &mut Self {
        self.operations.push(op);
        self
    }

    /// Begin a text object if one is not already open.
    pub fn begin_text(&mut self) -> &mut Self {
        if !self.in_text_object {
            self.op(ContentStreamOp::BeginText);
            self.in_text_object = true;
        }
        self
    }

    /// End the current text object, if any.
    pub fn end_text(&mut self) -> &mut Self {
        if self.in_text_object {
            self.op(ContentStreamOp::EndText);
            self.in_text_object = false;
        }
        self
    }

    /// Set font for subsequent text operations.
    pub fn set_font(&mut self, font_name: &str, size: f32) -> &mut Self {
        self.op(ContentStreamOp::SetFont(font_name.to_string(), size))
    }

    /// Move the text position by (tx, ty) relative to the current line start.
    pub fn move_text(&mut self, tx: f32, ty: f32) -> &mut Self {
        self.op(ContentStreamOp::MoveText(tx, ty))
    }

    /// Set the text leading used by `next_line`.
    pub fn set_leading(&mut self, leading: f32) -> &mut Self {
        self.op(ContentStreamOp::SetTextLeading(leading))
    }

    /// Advance to the next line using the current leading.
    pub fn next_line(&mut self) -> &mut Self {
        self.op(ContentStreamOp::NextLine)
    }

    /// Show a text string at the current position.
    pub fn show_text(&mut self, text: &str) -> &mut Self {
        self.op(ContentStreamOp::ShowText(text.to_string()))
    }

    /// Set the gray fill level (0 = black, 1 = white).
    pub fn set_fill_gray(&mut self, gray: f32) -> &mut Self {
        self.op(ContentStreamOp::SetFillGray(gray))
    }

    /// Set line width.
    pub fn set_line_width(&mut self, width: f32) -> &mut Self {
        self.op(ContentStreamOp::SetLineWidth(width))
    }

    /// Move to a point, starting a new subpath.
    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.op(ContentStreamOp::MoveTo(x, y))
    }

    /// Draw a line to a point.
    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.op(ContentStreamOp::LineTo(x, y))
    }

    /// Add a rectangle to the current path.
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.op(ContentStreamOp::Rectangle(x, y, width, height))
    }

    /// Stroke the current path.
    pub fn stroke(&mut self) -> &mut Self {
        self.op(ContentStreamOp::Stroke)
    }

    /// Fill the current path.
    pub fn fill(&mut self) -> &mut Self {
        self.op(ContentStreamOp::Fill)
    }

    /// Save the current graphics state.
    pub fn save_state(&mut self) -> &mut Self {
        self.op(ContentStreamOp::SaveState)
    }

    /// Restore the previous graphics state.
    pub fn restore_state(&mut self) -> &mut Self {
        self.op(ContentStreamOp::RestoreState)
    }

    /// Draw an image XObject at the given position and display size.
    ///
    /// Emits the save/transform/paint/restore sequence; `x`/`y` locate the
    /// bottom-left corner.
    pub fn draw_image(
        &mut self,
        resource_id: &str,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> &mut Self {
        self.end_text();
        self.save_state();
        self.op(ContentStreamOp::Transform(width, 0.0, 0.0, height, x, y));
        self.op(ContentStreamOp::PaintXObject(resource_id.to_string()));
        self.restore_state()
    }

    /// Build the content stream to bytes, one operator per line.
    pub fn build(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for op in &self.operations {
            // Writes to Vec<u8> cannot fail.
            write_op(&mut buf, op).expect("write to Vec");
            buf.push(b'\n');
        }
        buf
    }
}

fn write_op<W: Write>(w: &mut W, op: &ContentStreamOp) -> std::io::Result<()> {
    match op {
        ContentStreamOp::SaveState => write!(w, "q"),
        ContentStreamOp::RestoreState => write!(w, "Q"),
        ContentStreamOp::Transform(a, b, c, d, e, f) => {
            write!(w, "{} {} {} {} {} {} cm", fmt(*a), fmt(*b), fmt(*c), fmt(*d), fmt(*e), fmt(*f))
        },
        ContentStreamOp::BeginText => write!(w, "BT"),
        ContentStreamOp::EndText => write!(w, "ET"),
        ContentStreamOp::SetFont(name, size) => write!(w, "/{} {} Tf", name, fmt(*size)),
        ContentStreamOp::MoveText(tx, ty) => write!(w, "{} {} Td", fmt(*tx), fmt(*ty)),
        ContentStreamOp::SetTextLeading(leading) => write!(w, "{} TL", fmt(*leading)),
        ContentStreamOp::NextLine => write!(w, "T*"),
        ContentStreamOp::ShowText(text) => {
            write!(w, "(")?;
            w.write_all(&encoding::encode_literal(text))?;
            write!(w, ") Tj")
        },
        ContentStreamOp::SetFillGray(g) => write!(w, "{} g", fmt(*g)),
        ContentStreamOp::SetLineWidth(width) => write!(w, "{} w", fmt(*width)),
        ContentStreamOp::MoveTo(x, y) => write!(w, "{} {} m", fmt(*x), fmt(*y)),
        ContentStreamOp::LineTo(x, y) => write!(w, "{} {} l", fmt(*x), fmt(*y)),
        ContentStreamOp::Rectangle(x, y, width, height) => {
            write!(w, "{} {} {} {} re", fmt(*x), fmt(*y), fmt(*width), fmt(*height))
        },
        ContentStreamOp::Stroke => write!(w, "S"),
        ContentStreamOp::Fill => write!(w, "f"),
        ContentStreamOp::PaintXObject(name) => write!(w, "/{} Do", name),
    }
}

/// Format an operand with up to two decimals, trailing zeros trimmed.
fn fmt(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let formatted = format!("{:.2}", value);
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_string(builder: &ContentStreamBuilder) -> String {
        String::from_utf8_lossy(&builder.build()).to_string()
    }

    #[test]
    fn test_text_block() {
        let mut builder = ContentStreamBuilder::new();
        builder
            .begin_text()
            .set_font("F1", 12.0)
            .set_leading(14.0)
            .move_text(50.0, 810.0)
            .show_text("Hello, World!")
            .next_line()
            .show_text("Second line")
            .end_text();

        let content = build_string(&builder);
        assert!(content.contains("BT\n"));
        assert!(content.contains("/F1 12 Tf\n"));
        assert!(content.contains("14 TL\n"));
        assert!(content.contains("50 810 Td\n"));
        assert!(content.contains("(Hello, World!) Tj\n"));
        assert!(content.contains("T*\n"));
        assert!(content.contains("ET\n"));
    }

    #[test]
    fn test_begin_text_is_idempotent() {
        let mut builder = ContentStreamBuilder::new();
        builder.begin_text().begin_text().end_text().end_text();
        assert_eq!(build_string(&builder), "BT\nET\n");
    }

    #[test]
    fn test_show_text_escapes_and_encodes() {
        let mut builder = ContentStreamBuilder::new();
        builder.show_text("caf\u{e9} (50%)");
        let bytes = builder.build();
        let mut expected = Vec::new();
        expected.extend_from_slice(b"(caf");
        expected.push(0xE9);
        expected.extend_from_slice(b" \\(50%\\)) Tj\n");
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_draw_image_sequence() {
        let mut builder = ContentStreamBuilder::new();
        builder.draw_image("Im1", 10.0, 10.0, 500.0, 300.0);
        assert_eq!(build_string(&builder), "q\n500 0 0 300 10 10 cm\n/Im1 Do\nQ\n");
    }

    #[test]
    fn test_draw_image_closes_text_object() {
        let mut builder = ContentStreamBuilder::new();
        builder.begin_text();
        builder.draw_image("Im1", 0.0, 0.0, 1.0, 1.0);
        let content = build_string(&builder);
        assert!(content.starts_with("BT\nET\nq\n"));
    }

    #[test]
    fn test_rule_and_shading_ops() {
        let mut builder = ContentStreamBuilder::new();
        builder
            .set_fill_gray(0.9)
            .rect(50.0, 700.0, 495.0, 16.0)
            .fill()
            .set_fill_gray(0.0)
            .set_line_width(0.5)
            .move_to(50.0, 700.0)
            .line_to(545.0, 700.0)
            .stroke();

        let content = build_string(&builder);
        assert!(content.contains("0.9 g\n"));
        assert!(content.contains("50 700 495 16 re\nf\n"));
        assert!(content.contains("0.5 w\n"));
        assert!(content.contains("50 700 m\n545 700 l\nS\n"));
    }

    #[test]
    fn test_operand_formatting() {
        assert_eq!(fmt(12.0), "12");
        assert_eq!(fmt(0.5), "0.5");
        assert_eq!(fmt(0.25555), "0.26");
        assert_eq!(fmt(-3.0), "-3");
    }
}
