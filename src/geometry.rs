/// A point in PDF user space, in points (1/72 inch) with the origin at the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in PDF user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle anchored at the origin, which is what every page rectangle is.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn mid_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

/// Fraction of a step below which a value is considered to have reached the limit.
const STRIDE_TOLERANCE: f64 = 1e-9;

/// Iterates over `from`, `from + by`, `from + 2 * by`, ... while the value stays strictly below `to`.
///
/// Every value is computed as `from + k * by` instead of being accumulated, so that the error does
/// not grow with the number of steps, and values that only reach `to` through rounding (such as
/// `30 * (width / 30)`) are excluded like the exact ones.
pub fn stride(from: f64, to: f64, by: f64) -> impl Iterator<Item = f64> + Clone {
    let count = if by > 0.0 && to > from {
        ((to - from) / by - STRIDE_TOLERANCE).ceil().max(0.0) as usize
    } else {
        0
    };

    (0..count).map(move |step| from + step as f64 * by)
}
