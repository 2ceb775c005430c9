//! Clipped line-segment rasterizer for software pixel buffers.
//!
//! A caller builds a [`Surface`] over its pixel buffer once per frame, then
//! builds and draws one [`Segment`] per line:
//!
//! ```
//! use linecast::{Point, Segment, Surface};
//!
//! let mut pixels = vec![0u32; 1000 * 1000];
//! let mut surface = Surface::new(&mut pixels, 1000, 1000)?;
//! Segment::with_color(Point::new(1100.0, 100.0), Point::new(500.0, -100.0), 0x00ff_00ff)?
//!     .draw(&mut surface);
//! # Ok::<(), linecast::RasterError>(())
//! ```

pub mod error;
pub mod geometry;
pub mod scene;
pub mod segment;
pub mod surface;
pub mod util;

pub use error::RasterError;
pub use geometry::{classify, Orientation, Point};
pub use scene::{Scene, SegmentSpec};
pub use segment::Segment;
pub use surface::{PixelBuffer, Surface, DEFAULT_COLOR};
