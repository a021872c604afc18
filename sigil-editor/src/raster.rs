// Raster surface the export path renders into.
// A plain RGBA pixel buffer; all drawing routines live in `draw`.

use sigil_scene::Color;
use tracing::{debug, trace, warn};

#[derive(Debug, Clone)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Raster {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        debug!(width, height, "creating raster surface");
        let total = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![background; total],
        }
    }

    // Check if coordinates are within bounds
    fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    // Convert 2d coordinates to 1d index
    fn index(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.pixels[self.index(x, y)])
    }

    /// Overwrite a pixel. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, color: Color) -> bool {
        if !self.in_bounds(x, y) {
            trace!(x, y, "set outside raster bounds, ignoring");
            return false;
        }
        let i = self.index(x, y);
        self.pixels[i] = color;
        true
    }

    /// Source-over blend a pixel onto the surface.
    pub fn blend(&mut self, x: u32, y: u32, src: Color) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        if src.a == 255 {
            return self.set(x, y, src);
        }
        if src.a == 0 {
            return true;
        }
        let i = self.index(x, y);
        let dst = self.pixels[i];
        let sa = src.a as u32;
        let da = 255 - sa;
        let mix = |s: u8, d: u8| ((s as u32 * sa + d as u32 * da) / 255) as u8;
        self.pixels[i] = Color::rgba(
            mix(src.r, dst.r),
            mix(src.g, dst.g),
            mix(src.b, dst.b),
            (sa + dst.a as u32 * da / 255).min(255) as u8,
        );
        true
    }

    pub fn fill(&mut self, color: Color) {
        for pixel in self.pixels.iter_mut() {
            *pixel = color;
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Flatten to RGBA8 bytes, row-major, for PNG encoding.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for p in &self.pixels {
            out.extend_from_slice(&[p.r, p.g, p.b, p.a]);
        }
        out
    }
}

/// A decoded raster image held by the editor's cache. Scenes reference
/// images by source string only; pixels never enter a snapshot.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl DecodedImage {
    /// Decode PNG/JPEG bytes into RGBA pixels.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let decoded = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = decoded.dimensions();
        let pixels = decoded
            .pixels()
            .map(|p| Color::rgba(p.0[0], p.0[1], p.0[2], p.0[3]))
            .collect();
        debug!(width, height, "decoded image");
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            warn!(x, y, "image sample outside bounds");
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }
}

/// Decoded pixels keyed by the scene's image source string. Lives beside
/// the scene, never inside it: snapshots stay small and byte-stable while
/// the cache survives undo/redo untouched.
#[derive(Debug, Clone, Default)]
pub struct ImageCache {
    entries: std::collections::HashMap<String, DecodedImage>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: impl Into<String>, image: DecodedImage) {
        let source = source.into();
        trace!(%source, "caching decoded image");
        self.entries.insert(source, image);
    }

    pub fn get(&self, source: &str) -> Option<&DecodedImage> {
        self.entries.get(source)
    }

    pub fn contains(&self, source: &str) -> bool {
        self.entries.contains_key(source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let mut r = Raster::new(10, 10, Color::WHITE);
        assert!(r.set(5, 5, Color::BLACK));
        assert_eq!(r.get(5, 5), Some(Color::BLACK));
        assert_eq!(r.get(5, 4), Some(Color::WHITE));
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut r = Raster::new(4, 4, Color::WHITE);
        assert!(!r.set(4, 0, Color::BLACK));
        assert_eq!(r.get(10, 10), None);
    }

    #[test]
    fn blend_half_alpha() {
        let mut r = Raster::new(1, 1, Color::WHITE);
        r.blend(0, 0, Color::rgba(0, 0, 0, 128));
        let p = r.get(0, 0).unwrap();
        // Roughly half-way between white and black.
        assert!(p.r > 110 && p.r < 140, "got {p:?}");
    }

    #[test]
    fn transparent_blend_is_a_noop() {
        let mut r = Raster::new(1, 1, Color::GOLD);
        r.blend(0, 0, Color::TRANSPARENT);
        assert_eq!(r.get(0, 0), Some(Color::GOLD));
    }
}
