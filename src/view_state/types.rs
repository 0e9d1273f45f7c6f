//! Core geometry types for layout.
//!
//! Units are abstract: points for the default metrics, terminal cells for the terminal preset.

/// Width and height of a measured element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Nothing measured.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Size from its two extents.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True if both extents are zero.
    pub fn is_zero(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// Axis-aligned frame relative to the row's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Rect {
    /// The absent frame. Elements that do not render get this exact value.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Frame from origin and extents.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Frame at `(x, y)` with a measured size.
    pub fn from_origin_size(x: f64, y: f64, size: Size) -> Self {
        Self::new(x, y, size.width, size.height)
    }

    /// Right edge.
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Extents without the origin.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// True for the absent frame.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Distances from the row edges to its content.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeInsets {
    /// Space above the content.
    pub top: f64,
    /// Space left of the content.
    pub left: f64,
    /// Space below the content.
    pub bottom: f64,
    /// Space right of the content.
    pub right: f64,
}

impl EdgeInsets {
    /// Insets in top, left, bottom, right order.
    pub const fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Left plus right.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }
}
