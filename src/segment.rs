//! Line segment rasterization with boundary clipping
//!
//! `draw` runs the whole pipeline in one pass:
//! classify -> clip -> visibility -> clamp and align to pixel centers -> walk.
//! Clipping guarantees the walk never leaves the surface, so the walk itself
//! writes without per-pixel bounds checks.

use crate::error::RasterError;
use crate::geometry::{self, Bounds, Orientation, Point};
use crate::surface::Surface;

/// A line segment between two endpoints with an optional pen color.
///
/// Drawing consumes the segment: clipping and pixel alignment overwrite the
/// endpoints, so the pre-draw geometry is gone afterwards. Clone first to draw
/// the same segment again.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    a: Point,
    b: Point,
    color: Option<u32>,
    slope: Option<f32>,
}

impl Segment {
    /// Segment drawn in the surface's default color
    pub fn new(a: Point, b: Point) -> Result<Self, RasterError> {
        Self::build(a, b, None)
    }

    pub fn with_color(a: Point, b: Point, color: u32) -> Result<Self, RasterError> {
        Self::build(a, b, Some(color))
    }

    fn build(a: Point, b: Point, color: Option<u32>) -> Result<Self, RasterError> {
        for (name, p) in [("a", a), ("b", b)] {
            if !p.is_finite() {
                return Err(RasterError::InvalidGeometry(format!(
                    "endpoint {} ({}, {}) is not finite",
                    name, p.x, p.y
                )));
            }
        }

        let slope = geometry::slope(a, b);
        if let Some(m) = slope {
            if !m.is_finite() {
                return Err(RasterError::InvalidGeometry(format!(
                    "slope between ({}, {}) and ({}, {}) overflows",
                    a.x, a.y, b.x, b.y
                )));
            }
        }

        Ok(Self { a, b, color, slope })
    }

    #[inline]
    pub fn a(&self) -> Point {
        self.a
    }

    #[inline]
    pub fn b(&self) -> Point {
        self.b
    }

    #[inline]
    pub fn color(&self) -> Option<u32> {
        self.color
    }

    /// `None` for vertical segments and points
    #[inline]
    pub fn slope(&self) -> Option<f32> {
        self.slope
    }

    pub fn orientation(&self) -> Orientation {
        geometry::classify(self.a, self.b)
    }

    /// Clipped endpoints against `surface`, or `None` if nothing would be drawn.
    ///
    /// These are the exact projections onto the surface bounds, before the
    /// clamp to the last pixel center and before pixel alignment.
    pub fn clip_to(&self, surface: &Surface<'_>) -> Option<(Point, Point)> {
        self.clip(surface, self.orientation())
    }

    /// Rasterize into `surface`. Writes nothing if the segment misses it.
    pub fn draw(mut self, surface: &mut Surface<'_>) {
        // Orientation is fixed here, before clipping moves the endpoints
        let orientation = self.orientation();

        let Some((a, b)) = self.clip(surface, orientation) else {
            log::debug!(
                "segment ({}, {})-({}, {}) is outside the {}x{} surface",
                self.a.x,
                self.a.y,
                self.b.x,
                self.b.y,
                surface.width(),
                surface.height()
            );
            return;
        };
        self.a = a;
        self.b = b;

        self.clamp_to_frame(surface);
        self.a = self.a.pixel_center();
        self.b = self.b.pixel_center();

        let color = self.color.unwrap_or(surface.default_color());
        let span = Bounds::spanning(self.a, self.b);

        match orientation {
            Orientation::Point => {
                if surface.contains(span.min_x, span.min_y) {
                    surface.put(span.min_x as i64, span.min_y as i64, color);
                }
            },
            Orientation::Vertical => self.walk_vertical(surface, &span, color),
            Orientation::Horizontal => self.walk_horizontal(surface, &span, color),
            Orientation::Diagonal => self.walk_diagonal(surface, &span, color),
            Orientation::MostlyVertical => self.walk_mostly_vertical(surface, &span, color),
            Orientation::MostlyHorizontal => self.walk_mostly_horizontal(surface, &span, color),
        }
    }

    // ========================================================================
    // Clipping
    // ========================================================================

    /// Slope for the line equations. Vertical lines report infinity, which
    /// no clipping rule for a vertical orientation ever reads.
    #[inline]
    fn steepness(&self) -> f32 {
        self.slope.unwrap_or(f32::INFINITY)
    }

    /// Project each endpoint onto the surface bounds along the segment's line.
    ///
    /// The projection is kept only if both projected points still lie inside the
    /// original segment's bounding box. Otherwise the original endpoints stand:
    /// a projection outside the box means the line reaches the surface only past
    /// the segment's ends.
    fn clip(&self, surface: &Surface<'_>, orientation: Orientation) -> Option<(Point, Point)> {
        let a = self.clip_point(self.a, surface, orientation);
        let b = self.clip_point(self.b, surface, orientation);

        let original = Bounds::spanning(self.a, self.b);
        let (a, b) = if original.contains(a) && original.contains(b) {
            (a, b)
        } else {
            log::trace!(
                "clip of ({}, {})-({}, {}) leaves the segment, keeping endpoints",
                self.a.x,
                self.a.y,
                self.b.x,
                self.b.y
            );
            (self.a, self.b)
        };

        if surface.overlaps(&Bounds::spanning(a, b)) {
            Some((a, b))
        } else {
            None
        }
    }

    fn clip_point(&self, mut p: Point, surface: &Surface<'_>, orientation: Orientation) -> Point {
        let (low_x, high_x) = (surface.origin_x() as f32, surface.width() as f32);
        let (low_y, high_y) = (surface.origin_y() as f32, surface.height() as f32);

        if p.x < low_x {
            p = self.clip_x(p, low_x, orientation);
        } else if p.x > high_x {
            p = self.clip_x(p, high_x, orientation);
        }

        if p.y < low_y {
            p = self.clip_y(p, low_y, orientation);
        } else if p.y > high_y {
            p = self.clip_y(p, high_y, orientation);
        }

        p
    }

    /// Move `p` along the line to `x = bound`
    fn clip_x(&self, p: Point, bound: f32, orientation: Orientation) -> Point {
        let y = match orientation {
            // Horizontal keeps its row. Points and verticals have no line to
            // follow, so a moved x falls outside the bounding box
            Orientation::Point | Orientation::Vertical | Orientation::Horizontal => p.y,
            Orientation::Diagonal => geometry::y_at_diagonal_x(self.a, bound),
            Orientation::MostlyVertical | Orientation::MostlyHorizontal => {
                geometry::y_at_x(self.a, self.steepness(), bound)
            },
        };
        Point::new(bound, y)
    }

    /// Move `p` along the line to `y = bound`
    fn clip_y(&self, p: Point, bound: f32, orientation: Orientation) -> Point {
        let x = match orientation {
            Orientation::Point | Orientation::Vertical | Orientation::Horizontal => p.x,
            Orientation::Diagonal | Orientation::MostlyVertical | Orientation::MostlyHorizontal => {
                geometry::x_at_y(self.a, self.steepness(), bound)
            },
        };
        Point::new(x, bound)
    }

    /// Pull both endpoints into `[origin, dimension - 0.5]` so flooring lands on a real pixel
    fn clamp_to_frame(&mut self, surface: &Surface<'_>) {
        let (low_x, limit_x) = (surface.origin_x() as f32, surface.width() as f32 - 0.5);
        let (low_y, limit_y) = (surface.origin_y() as f32, surface.height() as f32 - 0.5);

        for p in [&mut self.a, &mut self.b] {
            p.x = p.x.clamp(low_x, limit_x);
            p.y = p.y.clamp(low_y, limit_y);
        }
    }

    // ========================================================================
    // Pixel walks
    //
    // Endpoints are pixel-centered and inside the frame at this point. The
    // dependent coordinate is computed from the line through `a` and held to
    // the span of the endpoints, which absorbs the half-pixel shift that
    // alignment introduces.
    // ========================================================================

    fn walk_vertical(&self, surface: &mut Surface<'_>, span: &Bounds, color: u32) {
        let x = span.min_x as i64;
        for y in span.min_y as i64..=span.max_y as i64 {
            surface.put(x, y, color);
        }
    }

    fn walk_horizontal(&self, surface: &mut Surface<'_>, span: &Bounds, color: u32) {
        let y = span.min_y as i64;
        for x in span.min_x as i64..=span.max_x as i64 {
            surface.put(x, y, color);
        }
    }

    fn walk_diagonal(&self, surface: &mut Surface<'_>, span: &Bounds, color: u32) {
        for x in span.min_x as i64..=span.max_x as i64 {
            let y = geometry::y_at_diagonal_x(self.a, x as f32 + 0.5).clamp(span.min_y, span.max_y);
            surface.put(x, y as i64, color);
        }
    }

    fn walk_mostly_vertical(&self, surface: &mut Surface<'_>, span: &Bounds, color: u32) {
        let slope = self.steepness();
        for y in span.min_y as i64..=span.max_y as i64 {
            let x = geometry::x_at_y(self.a, slope, y as f32 + 0.5).clamp(span.min_x, span.max_x);
            surface.put(x as i64, y, color);
        }
    }

    fn walk_mostly_horizontal(&self, surface: &mut Surface<'_>, span: &Bounds, color: u32) {
        let slope = self.steepness();
        for x in span.min_x as i64..=span.max_x as i64 {
            let y = geometry::y_at_x(self.a, slope, x as f32 + 0.5).clamp(span.min_y, span.max_y);
            surface.put(x, y as i64, color);
        }
    }
}
