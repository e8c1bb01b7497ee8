//! Geometric primitives shared by the page generators.
//!
//! All values are in PDF points (1 inch = 72 points).

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    /// Left margin
    pub left: f32,
    /// Top margin
    pub top: f32,
    /// Right margin
    pub right: f32,
    /// Bottom margin
    pub bottom: f32,
}

impl Margins {
    /// Create margins from individual sides.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Uniform margins on all sides.
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Total horizontal margin.
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Total vertical margin.
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

impl Default for Margins {
    fn default() -> Self {
        // Left/top/right/bottom defaults of the text document layout.
        Self::new(50.0, 60.0, 50.0, 50.0)
    }
}

/// Standard page sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageSize {
    /// A4 (210mm x 297mm)
    A4,
    /// US Letter (8.5" x 11")
    Letter,
    /// Custom dimensions in points
    Custom(f32, f32),
}

impl PageSize {
    /// Get (width, height) in points.
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.0, 842.0),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Custom(w, h) => (*w, *h),
        }
    }

    /// Page width in points.
    pub fn width(&self) -> f32 {
        self.dimensions().0
    }

    /// Page height in points.
    pub fn height(&self) -> f32 {
        self.dimensions().1
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}
