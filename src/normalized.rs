//! Rectangles expressed as fractions of a reference rectangle.

use serde::{Deserialize, Serialize};

use crate::source::SourceImage;

/// Smallest width or height a normalized rectangle may shrink to.
pub const MIN_EXTENT: f64 = 0.01;

/// `(x, y, width, height)` in `[0, 1]` with `x + width <= 1`, `y + height <= 1`
/// and both extents at least [`MIN_EXTENT`].
///
/// Every constructor clamps, so a value of this type always satisfies the
/// invariant; out-of-range input is pulled back in rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRect")]
pub struct NormalizedRect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

#[derive(Deserialize)]
struct RawRect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl From<RawRect> for NormalizedRect {
    fn from(raw: RawRect) -> Self {
        Self::new(raw.x, raw.y, raw.width, raw.height)
    }
}

impl Default for NormalizedRect {
    fn default() -> Self {
        Self::FULL
    }
}

impl NormalizedRect {
    pub const FULL: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        let width = clamp_extent(width);
        let height = clamp_extent(height);
        Self {
            x: clamp_origin(x, width),
            y: clamp_origin(y, height),
            width,
            height,
        }
    }

    /// Equal margin on every side, e.g. `inset(0.05)` keeps the central 90%.
    pub fn inset(margin: f64) -> Self {
        let margin = margin.clamp(0.0, (1.0 - MIN_EXTENT) / 2.0);
        Self::new(margin, margin, 1.0 - 2.0 * margin, 1.0 - 2.0 * margin)
    }

    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Moves without resizing; the rectangle stops at the reference bounds.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Aspect ratio of the selected region measured in image pixels.
    pub fn pixel_aspect(&self, image: SourceImage) -> f64 {
        (self.width * f64::from(image.width)) / (self.height * f64::from(image.height))
    }
}

fn clamp_extent(extent: f64) -> f64 {
    if extent.is_nan() {
        return MIN_EXTENT;
    }
    extent.clamp(MIN_EXTENT, 1.0)
}

fn clamp_origin(origin: f64, extent: f64) -> f64 {
    if origin.is_nan() {
        return 0.0;
    }
    origin.clamp(0.0, 1.0 - extent)
}
