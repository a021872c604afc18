//! Scene export: rasterize to PNG for download, and to a base64 transport
//! encoding for the send-certificate contract.
//!
//! Export renders at `EXPORT_SCALE` times the logical canvas resolution
//! and encodes lossless PNG; this layer introduces no compression
//! artifacts. The base64 string and the binary download come from the
//! same raster.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use sigil_scene::{Scene, Shape, TextAnchor};
use std::io::Cursor;
use thiserror::Error;
use tracing::{debug, warn};

use crate::draw;
use crate::font;
use crate::raster::{ImageCache, Raster};

/// Export renders at twice the logical canvas resolution.
pub const EXPORT_SCALE: u32 = 2;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("png encode failed: {0}")]
    Png(#[from] image::ImageError),

    #[error("raster of {width}x{height} is not a valid image")]
    InvalidRaster { width: u32, height: u32 },
}

/// Rasterize a scene at `scale` times its logical resolution.
///
/// Image objects whose pixels are not in the cache are skipped with a
/// warning; a load that never completed must not block export.
pub fn render(scene: &Scene, images: &ImageCache, scale: u32) -> Raster {
    let scale = scale.max(1);
    let s = scale as f32;
    debug!(
        width = scene.width * scale,
        height = scene.height * scale,
        objects = scene.len(),
        "rendering scene"
    );

    let mut raster = Raster::new(scene.width * scale, scene.height * scale, scene.background);

    for obj in scene.objects() {
        let left = obj.left * s;
        let top = obj.top * s;
        match &obj.shape {
            Shape::Rect {
                width,
                height,
                fill,
                stroke,
            } => {
                draw::fill_rect(&mut raster, left, top, width * s, height * s, *fill);
                if let Some(st) = stroke {
                    draw::stroke_rect(
                        &mut raster,
                        left,
                        top,
                        width * s,
                        height * s,
                        st.width * s,
                        st.color,
                    );
                }
            }
            Shape::Circle { radius, fill } => {
                // Anchored top-left like the rectangle; center is offset by the radius.
                let r = radius * s;
                draw::fill_circle(&mut raster, left + r, top + r, r, *fill);
            }
            Shape::Triangle {
                width,
                height,
                fill,
            } => {
                let pts = [
                    (left + width * s / 2.0, top),
                    (left + width * s, top + height * s),
                    (left, top + height * s),
                ];
                draw::fill_polygon(&mut raster, &pts, *fill);
            }
            Shape::Line { dx, dy, stroke } => {
                draw::thick_line(
                    &mut raster,
                    left,
                    top,
                    left + dx * s,
                    top + dy * s,
                    stroke.width * s,
                    stroke.color,
                );
            }
            Shape::Polygon { points, fill } | Shape::Star { points, fill } => {
                let pts: Vec<(f32, f32)> = points
                    .iter()
                    .map(|p| (left + p.x * s, top + p.y * s))
                    .collect();
                draw::fill_polygon(&mut raster, &pts, *fill);
            }
            Shape::Text {
                content,
                font_size,
                fill,
                anchor,
                ..
            } => {
                let glyph_scale = font::scale_for(font_size * s);
                draw::draw_text(
                    &mut raster,
                    content,
                    left,
                    top,
                    glyph_scale,
                    *fill,
                    *anchor == TextAnchor::Center,
                );
            }
            Shape::Image {
                source,
                scale_x,
                scale_y,
                ..
            } => match images.get(source) {
                Some(img) => {
                    draw::blit(&mut raster, img, left, top, scale_x * s, scale_y * s);
                }
                None => {
                    warn!(%source, "image pixels not cached, skipping on export");
                }
            },
        }
    }

    raster
}

/// Encode a raster to lossless PNG bytes.
pub fn encode_png(raster: &Raster) -> Result<Vec<u8>, ExportError> {
    let (width, height) = (raster.width(), raster.height());
    let buf: image::RgbaImage = image::ImageBuffer::from_raw(width, height, raster.to_rgba_bytes())
        .ok_or(ExportError::InvalidRaster { width, height })?;

    let mut out = Cursor::new(Vec::new());
    buf.write_to(&mut out, image::ImageFormat::Png)?;
    debug!(bytes = out.get_ref().len(), "encoded export png");
    Ok(out.into_inner())
}

/// Render at export resolution and return PNG bytes (the binary download).
pub fn export_png(scene: &Scene, images: &ImageCache) -> Result<Vec<u8>, ExportError> {
    encode_png(&render(scene, images, EXPORT_SCALE))
}

/// Render at export resolution and base64-encode the PNG (the transport
/// encoding the send-certificate contract expects).
pub fn export_base64_png(scene: &Scene, images: &ImageCache) -> Result<String, ExportError> {
    Ok(BASE64.encode(export_png(scene, images)?))
}
