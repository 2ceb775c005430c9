//! Scenes: the ordered list of segments drawn into the surface every frame

use crate::error::RasterError;
use crate::geometry::Point;
use crate::segment::Segment;
use crate::surface::Surface;
use crate::util::{hsv_to_rgba, Rng};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const BLUE: u32 = 0x0000_ffff;
pub const GREEN: u32 = 0x00ff_00ff;

/// Serialized form of a segment. `color` falls back to the surface default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSpec {
    pub a: Point,
    pub b: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
}

impl SegmentSpec {
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b, color: None }
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn to_segment(&self) -> Result<Segment, RasterError> {
        match self.color {
            Some(color) => Segment::with_color(self.a, self.b, color),
            None => Segment::new(self.a, self.b),
        }
    }
}

/// Accepted payloads for segment lists: a bare array or `{"segments": [...]}`
#[derive(Deserialize)]
#[serde(untagged)]
enum SegmentList {
    Bare(Vec<SegmentSpec>),
    Wrapped { segments: Vec<SegmentSpec> },
}

/// Parse a JSON segment list
pub fn parse_segments(json: &str) -> Result<Vec<SegmentSpec>, String> {
    match serde_json::from_str::<SegmentList>(json).map_err(|e| e.to_string())? {
        SegmentList::Bare(segments) | SegmentList::Wrapped { segments } => Ok(segments),
    }
}

/// Draw specs in order, skipping (and logging) any with invalid geometry.
/// Returns the number of segments handed to the rasterizer.
pub fn draw_all(specs: &[SegmentSpec], surface: &mut Surface<'_>) -> usize {
    let mut drawn = 0;
    for (i, spec) in specs.iter().enumerate() {
        match spec.to_segment() {
            Ok(segment) => {
                segment.draw(surface);
                drawn += 1;
            },
            Err(e) => log::warn!("skipping segment {}: {}", i, e),
        }
    }
    drawn
}

/// A named, ordered list of segments plus the color the frame is cleared to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub name: String,
    #[serde(default)]
    pub clear_color: u32,
    #[serde(default)]
    pub segments: Vec<SegmentSpec>,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            clear_color: 0,
            segments: Vec::new(),
        }
    }

    /// Nine segments around a 1000x1000 frame: three that miss it entirely
    /// (blue) and six that cross its edges (green)
    pub fn demo() -> Self {
        let seg = |ax, ay, bx, by, color| {
            SegmentSpec::new(Point::new(ax, ay), Point::new(bx, by)).with_color(color)
        };

        let mut scene = Self::new("demo");
        scene.segments = vec![
            // Fully out of bounds
            seg(1100.0, 100.0, 1100.0, -100.0, BLUE),
            seg(0.0, -100.0, 1100.0, -100.0, BLUE),
            seg(-100.0, 100.0, 100.0, -100.0, BLUE),
            // Partially out of bounds
            seg(1100.0, 100.0, 500.0, -100.0, GREEN),
            seg(-100.0, 100.0, 500.0, -100.0, GREEN),
            seg(-100.0, 900.0, 500.0, 1100.0, GREEN),
            seg(1100.0, 900.0, 500.0, 1100.0, GREEN),
            seg(-10000.0, 0.0, 10000.0, 1000.0, GREEN),
            seg(0.0, 10000.0, 1000.0, -10000.0, GREEN),
        ];
        scene
    }

    /// `count` segments with endpoints spread over twice the frame size in every
    /// direction, so most of them need clipping
    pub fn random(rng: &mut Rng, count: usize, width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        let mut scene = Self::new("random");
        scene.segments = (0..count)
            .map(|i| {
                let a = Point::new(rng.range_f32(-w, 2.0 * w), rng.range_f32(-h, 2.0 * h));
                let b = Point::new(rng.range_f32(-w, 2.0 * w), rng.range_f32(-h, 2.0 * h));
                let hue = i as f32 * 360.0 / count.max(1) as f32;
                SegmentSpec::new(a, b).with_color(hsv_to_rgba(hue, 0.8, 0.9))
            })
            .collect();
        scene
    }

    pub fn add_segment(&mut self, spec: SegmentSpec) {
        self.segments.push(spec);
    }

    /// Draw every segment in order
    pub fn draw(&self, surface: &mut Surface<'_>) -> usize {
        draw_all(&self.segments, surface)
    }

    /// Save scene to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Load scene from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let json = fs::read_to_string(path).map_err(|e| e.to_string())?;
        serde_json::from_str(&json).map_err(|e| e.to_string())
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("untitled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_and_wrapped() {
        let bare = r#"[{"a": {"x": 0, "y": 0}, "b": {"x": 5, "y": 5}}]"#;
        let wrapped = r#"{"segments": [{"a": {"x": 0, "y": 0}, "b": {"x": 5, "y": 5}, "color": 255}]}"#;

        let specs = parse_segments(bare).unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].color, None);

        let specs = parse_segments(wrapped).unwrap();
        assert_eq!(specs[0].color, Some(255));
        assert_eq!(specs[0].b, Point::new(5.0, 5.0));

        assert!(parse_segments("{\"lines\": []}").is_err());
    }

    #[test]
    fn test_scene_json_shape() {
        let mut scene = Scene::new("two");
        scene.add_segment(SegmentSpec::new(Point::new(1.0, 2.0), Point::new(3.0, 4.0)));
        let json = serde_json::to_string(&scene).unwrap();
        assert!(json.contains("\"name\":\"two\""));
        assert!(!json.contains("color\":null"));

        let parsed: Scene = serde_json::from_str(r#"{"name": "empty"}"#).unwrap();
        assert!(parsed.segments.is_empty());
        assert_eq!(parsed.clear_color, 0);
    }

    #[test]
    fn test_demo_scene_stays_in_frame() {
        let mut buffer = vec![0u32; 1000 * 1000];
        let mut surface = Surface::new(&mut buffer, 1000, 1000).unwrap();
        assert_eq!(Scene::demo().draw(&mut surface), 9);

        // The blue segments miss the frame; at most the corner touch of the
        // third one can land
        let blue = buffer.iter().filter(|&&c| c == BLUE).count();
        assert!(blue <= 1, "{} blue pixels", blue);
        assert!(buffer.iter().filter(|&&c| c == GREEN).count() > 1000);
    }

    #[test]
    fn test_draw_all_skips_invalid() {
        let mut buffer = vec![0u32; 100];
        let mut surface = Surface::new(&mut buffer, 10, 10).unwrap();
        let specs = vec![
            SegmentSpec::new(Point::new(0.0, -3.0e38), Point::new(1.0, 3.0e38)),
            SegmentSpec::new(Point::new(0.0, 0.0), Point::new(9.0, 0.0)),
        ];
        assert_eq!(draw_all(&specs, &mut surface), 1);
        assert!(buffer[..10].iter().all(|&c| c != 0));
    }

    #[test]
    fn test_random_scene_is_deterministic() {
        let a = Scene::random(&mut Rng::new(3), 16, 320, 240);
        let b = Scene::random(&mut Rng::new(3), 16, 320, 240);
        assert_eq!(a.segments, b.segments);
        assert_eq!(a.segments.len(), 16);
    }
}
