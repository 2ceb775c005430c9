//! Pixel surfaces the rasterizer writes into
//!
//! `Surface` is a borrowed view over a caller-owned buffer, created once per
//! frame and handed to every `Segment::draw`. `PixelBuffer` owns such a
//! buffer for callers (like the viewer) that don't bring their own.

use crate::error::RasterError;
use crate::geometry::Bounds;

/// Opaque black in packed `0xRRGGBBAA`
pub const DEFAULT_COLOR: u32 = 0x0000_00ff;

// ============================================================================
// Surface
// ============================================================================

/// A view into a `width * height` pixel buffer.
///
/// Drawable area is `[origin_x, width) x [origin_y, height)`. The origin acts as
/// a lower scissor bound; buffer indices are always `x + y * width`.
pub struct Surface<'a> {
    buffer: &'a mut [u32],
    width: u32,
    height: u32,
    origin_x: u32,
    origin_y: u32,
    default_color: u32,
}

impl<'a> Surface<'a> {
    /// Wrap a buffer with the origin at `(0, 0)`
    pub fn new(buffer: &'a mut [u32], width: u32, height: u32) -> Result<Self, RasterError> {
        Self::with_origin(buffer, width, height, 0, 0)
    }

    /// Wrap a buffer, restricting drawing to `x >= origin_x` and `y >= origin_y`
    pub fn with_origin(
        buffer: &'a mut [u32],
        width: u32,
        height: u32,
        origin_x: u32,
        origin_y: u32,
    ) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidSurface(format!(
                "zero-sized surface {}x{}",
                width, height
            )));
        }
        let pixel_count = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| {
                RasterError::InvalidSurface(format!("{}x{} overflows usize", width, height))
            })?;
        if buffer.len() != pixel_count {
            return Err(RasterError::InvalidSurface(format!(
                "buffer holds {} pixels, {}x{} needs {}",
                buffer.len(),
                width,
                height,
                pixel_count
            )));
        }
        if origin_x >= width || origin_y >= height {
            return Err(RasterError::InvalidSurface(format!(
                "origin ({}, {}) outside {}x{}",
                origin_x, origin_y, width, height
            )));
        }
        Ok(Self {
            buffer,
            width,
            height,
            origin_x,
            origin_y,
            default_color: DEFAULT_COLOR,
        })
    }

    /// Color used for segments constructed without one
    pub fn with_default_color(mut self, color: u32) -> Self {
        self.default_color = color;
        self
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn origin_x(&self) -> u32 {
        self.origin_x
    }

    #[inline]
    pub fn origin_y(&self) -> u32 {
        self.origin_y
    }

    #[inline]
    pub fn default_color(&self) -> u32 {
        self.default_color
    }

    pub fn buffer(&self) -> &[u32] {
        &self.buffer[..]
    }

    /// Read a pixel (bounds checked)
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.buffer[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    /// Fill the whole buffer, ignoring the origin
    pub fn clear(&mut self, color: u32) {
        self.buffer.fill(color);
    }

    /// Whether a continuous coordinate lies in the drawable area
    /// `[origin_x, width) x [origin_y, height)`
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.origin_x as f32
            && y >= self.origin_y as f32
            && x < self.width as f32
            && y < self.height as f32
    }

    /// Whether a box shares any point with the drawable area.
    /// A box that only touches the far edges does not.
    #[inline]
    pub(crate) fn overlaps(&self, bounds: &Bounds) -> bool {
        bounds.max_x >= self.origin_x as f32
            && bounds.max_y >= self.origin_y as f32
            && bounds.min_x < self.width as f32
            && bounds.min_y < self.height as f32
    }

    /// Unchecked-by-contract write used by the pixel walk.
    /// Slice indexing still panics on a broken clip rather than corrupting memory.
    #[inline]
    pub(crate) fn put(&mut self, x: i64, y: i64, color: u32) {
        debug_assert!(
            x >= self.origin_x as i64
                && x < self.width as i64
                && y >= self.origin_y as i64
                && y < self.height as i64,
            "pixel ({}, {}) outside {}x{} surface",
            x,
            y,
            self.width,
            self.height
        );
        let idx = x + y * self.width as i64;
        self.buffer[idx as usize] = color;
    }
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// Owned RGBA8888 pixel buffer, one packed `u32` per pixel
pub struct PixelBuffer {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; (width as usize) * (height as usize)],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Clear to a solid color
    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Lend the buffer out as a drawing surface
    pub fn surface(&mut self) -> Result<Surface<'_>, RasterError> {
        Surface::new(&mut self.pixels, self.width, self.height)
    }

    /// Read a pixel (bounds checked)
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Raw bytes for SDL texture upload (native-endian packed RGBA8888)
    pub fn as_bytes(&self) -> &[u8] {
        // Safety: u32 has no padding or invalid bit patterns and u8 has alignment 1,
        // so the same allocation viewed as 4x as many bytes is valid for reads.
        unsafe {
            std::slice::from_raw_parts(self.pixels.as_ptr() as *const u8, self.pixels.len() * 4)
        }
    }

    /// Create a copy with rows in reverse order, for presenting with `y` pointing up
    pub fn flipped_vertical(&self) -> Self {
        let mut flipped = Self::with_size(self.width, self.height);
        let stride = self.width as usize;
        if stride == 0 {
            return flipped;
        }

        for (dst, src) in flipped
            .pixels
            .chunks_exact_mut(stride)
            .zip(self.pixels.chunks_exact(stride).rev())
        {
            dst.copy_from_slice(src);
        }

        flipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    #[test]
    fn test_surface_rejects_zero_size() {
        let mut buffer: Vec<u32> = Vec::new();
        let result = Surface::new(&mut buffer, 0, 10);
        assert!(matches!(result, Err(RasterError::InvalidSurface(_))));
    }

    #[test]
    fn test_surface_rejects_length_mismatch() {
        let mut buffer = vec![0u32; 99];
        let result = Surface::new(&mut buffer, 10, 10);
        assert!(matches!(result, Err(RasterError::InvalidSurface(_))));
    }

    #[test]
    fn test_surface_rejects_origin_outside() {
        let mut buffer = vec![0u32; 100];
        assert!(Surface::with_origin(&mut buffer, 10, 10, 10, 0).is_err());
        assert!(Surface::with_origin(&mut buffer, 10, 10, 0, 12).is_err());
        assert!(Surface::with_origin(&mut buffer, 10, 10, 9, 9).is_ok());
    }

    #[test]
    fn test_surface_defaults() {
        let mut buffer = vec![0u32; 12];
        let surface = Surface::new(&mut buffer, 4, 3).unwrap();
        assert_eq!(surface.width(), 4);
        assert_eq!(surface.height(), 3);
        assert_eq!(surface.origin_x(), 0);
        assert_eq!(surface.origin_y(), 0);
        assert_eq!(surface.default_color(), DEFAULT_COLOR);

        let surface = surface.with_default_color(0xff00_00ff);
        assert_eq!(surface.default_color(), 0xff00_00ff);
    }

    #[test]
    fn test_contains_is_half_open() {
        let mut buffer = vec![0u32; 100];
        let surface = Surface::with_origin(&mut buffer, 10, 10, 2, 0).unwrap();
        assert!(surface.contains(2.0, 0.0));
        assert!(surface.contains(9.99, 9.99));
        assert!(!surface.contains(10.0, 5.0));
        assert!(!surface.contains(1.9, 5.0));
    }

    #[test]
    fn test_overlaps_excludes_far_edges() {
        let mut buffer = vec![0u32; 100];
        let surface = Surface::new(&mut buffer, 10, 10).unwrap();
        let corner = Bounds::spanning(Point::new(10.0, 6.0), Point::new(6.0, 10.0));
        assert!(surface.overlaps(&corner));
        let edge = Bounds::spanning(Point::new(10.0, 0.0), Point::new(10.0, 10.0));
        assert!(!surface.overlaps(&edge));
        let outside = Bounds::spanning(Point::new(-5.0, 0.0), Point::new(-0.5, 3.0));
        assert!(!surface.overlaps(&outside));
    }

    #[test]
    fn test_put_and_pixel() {
        let mut buffer = vec![0u32; 12];
        let mut surface = Surface::new(&mut buffer, 4, 3).unwrap();
        surface.put(3, 2, 7);
        assert_eq!(surface.pixel(3, 2), Some(7));
        assert_eq!(surface.pixel(4, 2), None);
        assert_eq!(buffer[11], 7);
    }

    #[test]
    fn test_pixel_buffer_surface_shares_pixels() {
        let mut buffer = PixelBuffer::with_size(5, 5);
        buffer.clear(1);
        {
            let mut surface = buffer.surface().unwrap();
            surface.put(0, 0, 9);
        }
        assert_eq!(buffer.pixel(0, 0), Some(9));
        assert_eq!(buffer.pixel(4, 4), Some(1));
        assert_eq!(buffer.as_bytes().len(), 5 * 5 * 4);
    }

    #[test]
    fn test_flipped_vertical() {
        let mut buffer = PixelBuffer::with_size(2, 3);
        {
            let mut surface = buffer.surface().unwrap();
            surface.put(0, 0, 1);
            surface.put(1, 2, 2);
        }
        let flipped = buffer.flipped_vertical();
        assert_eq!(flipped.pixel(0, 2), Some(1));
        assert_eq!(flipped.pixel(1, 0), Some(2));
        assert_eq!(flipped.pixel(0, 0), Some(0));
    }
}
