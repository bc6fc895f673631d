//! Integer rectangles in pixel coordinates.

/// Axis-aligned rectangle; `x`/`y` is the top-left corner.
///
/// Signed so placement arithmetic can go negative before clipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a rectangle from its corners (`x2`/`y2` exclusive).
    pub const fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Clips to `[0, width) × [0, height)`.
    pub fn clip_to(&self, width: i32, height: i32) -> Rect {
        Rect::from_corners(
            self.x.max(0),
            self.y.max(0),
            self.right().min(width),
            self.bottom().min(height),
        )
    }
}
