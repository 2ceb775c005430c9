//! Points, orientation classification and the line equations shared by
//! clipping and the pixel walk

use serde::{Deserialize, Serialize};

/// Tolerance for every orientation test
pub const EPSILON: f32 = f32::EPSILON;

/// Relative slack for the bounding-box check after clipping.
/// Projected coordinates carry a few ulps of rounding error.
const BOX_TOLERANCE: f32 = 16.0 * f32::EPSILON;

/// A point in continuous pixel space (pixel `(i, j)` covers `[i, i+1) x [j, j+1)`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Snap both coordinates to the center of the pixel containing them
    #[inline]
    pub fn pixel_center(&self) -> Self {
        Self::new(self.x.floor() + 0.5, self.y.floor() + 0.5)
    }
}

/// Geometric class of a segment, which picks the clipping rule and the pixel walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Both endpoints identical
    Point,
    /// `|a.x - b.x| < EPSILON`; slope undefined
    Vertical,
    /// `|slope| < EPSILON`
    Horizontal,
    /// Slope of exactly +1 (within `EPSILON`)
    Diagonal,
    /// `|slope| > 1`: walk one pixel per row
    MostlyVertical,
    /// `|slope| <= 1`: walk one pixel per column
    MostlyHorizontal,
}

/// Slope of the line through `a` and `b`, or `None` when the line is vertical
#[inline]
pub fn slope(a: Point, b: Point) -> Option<f32> {
    if (a.x - b.x).abs() < EPSILON {
        None
    } else {
        Some((b.y - a.y) / (b.x - a.x))
    }
}

/// Classify the segment `a`-`b`.
///
/// Checks run in a fixed priority order: point, vertical, horizontal,
/// diagonal, then steepness. The diagonal band is closed, so slopes of
/// `1 +- EPSILON` still count as diagonal.
pub fn classify(a: Point, b: Point) -> Orientation {
    if a == b {
        return Orientation::Point;
    }
    match slope(a, b) {
        None => Orientation::Vertical,
        Some(m) if m.abs() < EPSILON => Orientation::Horizontal,
        Some(m) if (m - 1.0).abs() <= EPSILON => Orientation::Diagonal,
        Some(m) if m.abs() > 1.0 => Orientation::MostlyVertical,
        Some(_) => Orientation::MostlyHorizontal,
    }
}

/// `y` on the line through `origin` with `slope` at the given `x`
#[inline]
pub fn y_at_x(origin: Point, slope: f32, x: f32) -> f32 {
    origin.y + slope * (x - origin.x)
}

/// `x` on the line through `origin` with `slope` at the given `y`
#[inline]
pub fn x_at_y(origin: Point, slope: f32, y: f32) -> f32 {
    (y - origin.y) / slope + origin.x
}

/// `y` on the 45 degree line through `origin` at the given `x`
#[inline]
pub fn y_at_diagonal_x(origin: Point, x: f32) -> f32 {
    origin.y + (x - origin.x)
}

/// Axis-aligned bounding box of a segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn spanning(a: Point, b: Point) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    /// Inclusive containment with a small slack proportional to the box's magnitude
    pub fn contains(&self, p: Point) -> bool {
        let magnitude = self
            .min_x
            .abs()
            .max(self.max_x.abs())
            .max(self.min_y.abs())
            .max(self.max_y.abs())
            .max(1.0);
        let tol = BOX_TOLERANCE * magnitude;
        p.x >= self.min_x - tol
            && p.x <= self.max_x + tol
            && p.y >= self.min_y - tol
            && p.y <= self.max_y + tol
    }
}
