//! Drawable object variants and their typed property access.
//!
//! The editor used to hold the selected object behind a loosely-typed
//! handle; here every object is an explicit tagged variant, and property
//! access goes through the capability traits ([`HasFill`], [`HasStroke`],
//! [`HasFontProperties`], [`HasGeometry`]) selected by the variant's tag.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{regular_polygon_points, star_points, GeometryError, Point};
use crate::Color;

/// Stroke applied around a shape's outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

/// Horizontal anchoring for text. Centered text anchors `left` at the
/// middle of the rendered line, matching the default certificate title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnchor {
    Left,
    Center,
}

/// Per-kind geometry and styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Rect {
        width: f32,
        height: f32,
        fill: Color,
        stroke: Option<Stroke>,
    },
    Circle {
        radius: f32,
        fill: Color,
    },
    /// Isosceles triangle inscribed in its bounding box, apex at top center.
    Triangle {
        width: f32,
        height: f32,
        fill: Color,
    },
    /// Segment from the object position to position + (dx, dy).
    Line {
        dx: f32,
        dy: f32,
        stroke: Stroke,
    },
    /// Regular polygon; `points` are relative to the center anchor.
    Polygon {
        points: Vec<Point>,
        fill: Color,
    },
    /// Star outline; `points` are relative to the center anchor.
    Star {
        points: Vec<Point>,
        fill: Color,
    },
    Text {
        content: String,
        font_size: f32,
        font_family: String,
        fill: Color,
        anchor: TextAnchor,
    },
    /// Externally hosted or data-backed raster, referenced by source only.
    /// Decoded pixels live in the editor's image cache, never in the scene.
    Image {
        source: String,
        title: Option<String>,
        width: u32,
        height: u32,
        scale_x: f32,
        scale_y: f32,
    },
}

impl Shape {
    /// Stable tag name, matching the snapshot encoding.
    pub fn tag(&self) -> &'static str {
        match self {
            Shape::Rect { .. } => "rect",
            Shape::Circle { .. } => "circle",
            Shape::Triangle { .. } => "triangle",
            Shape::Line { .. } => "line",
            Shape::Polygon { .. } => "polygon",
            Shape::Star { .. } => "star",
            Shape::Text { .. } => "text",
            Shape::Image { .. } => "image",
        }
    }
}

/// One visual primitive or asset placed in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawableObject {
    pub id: Uuid,
    pub left: f32,
    pub top: f32,
    /// Template furniture (the default border) is not selectable.
    pub selectable: bool,
    pub shape: Shape,
}

impl DrawableObject {
    fn with_shape(left: f32, top: f32, shape: Shape) -> Self {
        Self {
            id: Uuid::new_v4(),
            left,
            top,
            selectable: true,
            shape,
        }
    }

    pub fn rect(left: f32, top: f32, width: f32, height: f32, fill: Color) -> Self {
        Self::with_shape(
            left,
            top,
            Shape::Rect {
                width,
                height,
                fill,
                stroke: None,
            },
        )
    }

    pub fn circle(left: f32, top: f32, radius: f32, fill: Color) -> Self {
        Self::with_shape(left, top, Shape::Circle { radius, fill })
    }

    pub fn triangle(left: f32, top: f32, width: f32, height: f32, fill: Color) -> Self {
        Self::with_shape(left, top, Shape::Triangle { width, height, fill })
    }

    pub fn line(x1: f32, y1: f32, x2: f32, y2: f32, stroke: Stroke) -> Self {
        Self::with_shape(
            x1,
            y1,
            Shape::Line {
                dx: x2 - x1,
                dy: y2 - y1,
                stroke,
            },
        )
    }

    pub fn text(left: f32, top: f32, content: impl Into<String>, font_size: f32, fill: Color) -> Self {
        Self::with_shape(
            left,
            top,
            Shape::Text {
                content: content.into(),
                font_size,
                font_family: "Inter".into(),
                fill,
                anchor: TextAnchor::Left,
            },
        )
    }

    /// Regular polygon anchored at its geometric center `(cx, cy)`.
    pub fn regular_polygon(
        cx: f32,
        cy: f32,
        radius: f32,
        sides: u32,
        fill: Color,
    ) -> Result<Self, GeometryError> {
        let points = regular_polygon_points(radius, sides)?;
        Ok(Self::with_shape(cx, cy, Shape::Polygon { points, fill }))
    }

    /// Star anchored at its geometric center `(cx, cy)`.
    pub fn star(
        cx: f32,
        cy: f32,
        points: u32,
        outer: f32,
        inner: f32,
        fill: Color,
    ) -> Result<Self, GeometryError> {
        let points = star_points(points, outer, inner)?;
        Ok(Self::with_shape(cx, cy, Shape::Star { points, fill }))
    }

    pub fn image(
        left: f32,
        top: f32,
        source: impl Into<String>,
        title: Option<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Self::with_shape(
            left,
            top,
            Shape::Image {
                source: source.into(),
                title,
                width,
                height,
                scale_x: 1.0,
                scale_y: 1.0,
            },
        )
    }

    pub fn kind(&self) -> &'static str {
        self.shape.tag()
    }
}

/// Fill color access for variants that carry one.
pub trait HasFill {
    fn fill(&self) -> Option<Color>;
    /// Returns false when the variant has no fill (line, image).
    fn set_fill(&mut self, color: Color) -> bool;
}

/// Stroke access for variants that carry one.
pub trait HasStroke {
    fn stroke(&self) -> Option<Stroke>;
    fn set_stroke(&mut self, stroke: Stroke) -> bool;
}

/// Font properties, text variant only.
pub trait HasFontProperties {
    fn font_size(&self) -> Option<f32>;
    fn set_font_size(&mut self, size: f32) -> bool;
    fn font_family(&self) -> Option<&str>;
    fn set_font_family(&mut self, family: &str) -> bool;
}

/// Position and uniform scaling, common to every variant.
pub trait HasGeometry {
    fn position(&self) -> (f32, f32);
    fn set_position(&mut self, left: f32, top: f32);
}

impl HasFill for DrawableObject {
    fn fill(&self) -> Option<Color> {
        match &self.shape {
            Shape::Rect { fill, .. }
            | Shape::Circle { fill, .. }
            | Shape::Triangle { fill, .. }
            | Shape::Polygon { fill, .. }
            | Shape::Star { fill, .. }
            | Shape::Text { fill, .. } => Some(*fill),
            Shape::Line { .. } | Shape::Image { .. } => None,
        }
    }

    fn set_fill(&mut self, color: Color) -> bool {
        match &mut self.shape {
            Shape::Rect { fill, .. }
            | Shape::Circle { fill, .. }
            | Shape::Triangle { fill, .. }
            | Shape::Polygon { fill, .. }
            | Shape::Star { fill, .. }
            | Shape::Text { fill, .. } => {
                *fill = color;
                true
            }
            Shape::Line { .. } | Shape::Image { .. } => false,
        }
    }
}

impl HasStroke for DrawableObject {
    fn stroke(&self) -> Option<Stroke> {
        match &self.shape {
            Shape::Rect { stroke, .. } => *stroke,
            Shape::Line { stroke, .. } => Some(*stroke),
            _ => None,
        }
    }

    fn set_stroke(&mut self, new: Stroke) -> bool {
        match &mut self.shape {
            Shape::Rect { stroke, .. } => {
                *stroke = Some(new);
                true
            }
            Shape::Line { stroke, .. } => {
                *stroke = new;
                true
            }
            _ => false,
        }
    }
}

impl HasFontProperties for DrawableObject {
    fn font_size(&self) -> Option<f32> {
        match &self.shape {
            Shape::Text { font_size, .. } => Some(*font_size),
            _ => None,
        }
    }

    fn set_font_size(&mut self, size: f32) -> bool {
        match &mut self.shape {
            Shape::Text { font_size, .. } if size > 0.0 => {
                *font_size = size;
                true
            }
            _ => false,
        }
    }

    fn font_family(&self) -> Option<&str> {
        match &self.shape {
            Shape::Text { font_family, .. } => Some(font_family),
            _ => None,
        }
    }

    fn set_font_family(&mut self, family: &str) -> bool {
        match &mut self.shape {
            Shape::Text { font_family, .. } => {
                *font_family = family.to_string();
                true
            }
            _ => false,
        }
    }
}

impl HasGeometry for DrawableObject {
    fn position(&self) -> (f32, f32) {
        (self.left, self.top)
    }

    fn set_position(&mut self, left: f32, top: f32) {
        self.left = left;
        self.top = top;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_capability_follows_the_tag() {
        let mut rect = DrawableObject::rect(0.0, 0.0, 10.0, 10.0, Color::BLACK);
        assert!(rect.set_fill(Color::WHITE));
        assert_eq!(rect.fill(), Some(Color::WHITE));

        let mut img = DrawableObject::image(0.0, 0.0, "https://example.com/a.png", None, 8, 8);
        assert!(!img.set_fill(Color::WHITE));
        assert_eq!(img.fill(), None);
    }

    #[test]
    fn font_capability_only_on_text() {
        let mut text = DrawableObject::text(0.0, 0.0, "hi", 24.0, Color::BLACK);
        assert!(text.set_font_family("Playfair Display"));
        assert_eq!(text.font_family(), Some("Playfair Display"));
        assert!(!text.set_font_size(0.0));
        assert_eq!(text.font_size(), Some(24.0));

        let mut circle = DrawableObject::circle(0.0, 0.0, 5.0, Color::BLACK);
        assert!(!circle.set_font_size(12.0));
        assert_eq!(circle.font_family(), None);
    }

    #[test]
    fn polygon_factory_anchors_at_center() {
        let poly = DrawableObject::regular_polygon(120.0, 80.0, 40.0, 6, Color::BLACK).unwrap();
        assert_eq!(poly.position(), (120.0, 80.0));
        match &poly.shape {
            Shape::Polygon { points, .. } => {
                // Centroid of the relative points is the origin.
                let (sx, sy) = points
                    .iter()
                    .fold((0.0f32, 0.0f32), |(sx, sy), p| (sx + p.x, sy + p.y));
                assert!(sx.abs() < 1e-3 && sy.abs() < 1e-3);
            }
            other => panic!("expected polygon, got {}", other.tag()),
        }
    }

    #[test]
    fn line_stores_relative_endpoint() {
        let line = DrawableObject::line(
            10.0,
            20.0,
            110.0,
            70.0,
            Stroke {
                color: Color::BLACK,
                width: 2.0,
            },
        );
        match line.shape {
            Shape::Line { dx, dy, .. } => {
                assert_eq!((dx, dy), (100.0, 50.0));
            }
            _ => panic!("expected line"),
        }
    }
}
