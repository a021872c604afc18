//! sigil-scene: the certificate scene data model.
//!
//! Design rules:
//! - A scene is an ordered list of drawable objects plus canvas-level
//!   properties (dimensions, background color).
//! - Object factories are pure: they build an object description and
//!   nothing else. Out-of-range geometry parameters are rejected, never
//!   silently degraded.
//! - Snapshots serialize the whole scene; field order is fixed, so equal
//!   scenes produce byte-identical snapshot strings.

use serde::{Deserialize, Serialize};

/// Schema version for forward compatibility.
pub const SCENE_SCHEMA_VERSION: &str = "1.0";

/// RGBA color used for fills, strokes and canvas backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    /// Gold used by the default certificate border.
    pub const GOLD: Color = Color::rgb(0xd4, 0xaf, 0x37);
    /// Slate used by the default certificate title.
    pub const SLATE: Color = Color::rgb(0x1e, 0x29, 0x3b);

    /// Format as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`. Returns `None` on malformed input.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let parse = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut chars = hex.chars();
                let mut next = || {
                    let c = chars.next()?;
                    parse(&format!("{c}{c}"))
                };
                Some(Color::rgb(next()?, next()?, next()?))
            }
            6 => Some(Color::rgb(
                parse(&hex[0..2])?,
                parse(&hex[2..4])?,
                parse(&hex[4..6])?,
            )),
            8 => Some(Color::rgba(
                parse(&hex[0..2])?,
                parse(&hex[2..4])?,
                parse(&hex[4..6])?,
                parse(&hex[6..8])?,
            )),
            _ => None,
        }
    }
}

pub mod geometry;
pub mod object;
pub mod scene;

pub use geometry::{regular_polygon_points, star_points, GeometryError, Point};
pub use object::{
    DrawableObject, HasFill, HasFontProperties, HasGeometry, HasStroke, Shape, Stroke, TextAnchor,
};
pub use scene::{load_scene, save_scene, Scene, SceneError, SCENE_FILE_EXT};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip_opaque() {
        let c = Color::rgb(0xd4, 0xaf, 0x37);
        assert_eq!(c.to_hex(), "#d4af37");
        assert_eq!(Color::from_hex("#d4af37"), Some(c));
    }

    #[test]
    fn hex_with_alpha() {
        let c = Color::rgba(1, 2, 3, 128);
        assert_eq!(Color::from_hex(&c.to_hex()), Some(c));
    }

    #[test]
    fn hex_shorthand() {
        assert_eq!(Color::from_hex("#fff"), Some(Color::WHITE));
    }

    #[test]
    fn hex_rejects_garbage() {
        assert_eq!(Color::from_hex("#zzzzzz"), None);
        assert_eq!(Color::from_hex("not a color"), None);
    }
}
