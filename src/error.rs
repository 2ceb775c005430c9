//! Error kinds reported by the rasterizer

use thiserror::Error;

/// Malformed input rejected at construction time.
///
/// Drawing itself never fails: once a `Segment` and a `Surface` exist, `draw`
/// either writes pixels or silently does nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RasterError {
    /// An endpoint is NaN or infinite, or the slope through the endpoints overflows
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    /// Zero-sized surface, buffer length mismatch or an origin outside the surface
    #[error("invalid surface: {0}")]
    InvalidSurface(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_kind() {
        let err = RasterError::InvalidSurface("width is zero".to_string());
        assert_eq!(err.to_string(), "invalid surface: width is zero");

        let err = RasterError::InvalidGeometry("endpoint a is NaN".to_string());
        assert!(err.to_string().starts_with("invalid geometry"));
    }
}
