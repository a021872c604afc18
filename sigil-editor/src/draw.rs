// Drawing routines for the export rasterizer.
//
// Everything here works in device pixels; the export renderer applies the
// output scale before calling in. Thick strokes are stamped squares along
// a Bresenham walk, fills are scanline spans.

use sigil_scene::Color;
use tracing::trace;

use crate::font;
use crate::raster::{DecodedImage, Raster};

pub fn fill_rect(r: &mut Raster, x: f32, y: f32, w: f32, h: f32, color: Color) {
    if color.a == 0 {
        return;
    }
    let x0 = x.max(0.0) as u32;
    let y0 = y.max(0.0) as u32;
    let x1 = (x + w).max(0.0) as u32;
    let y1 = (y + h).max(0.0) as u32;
    for py in y0..y1 {
        for px in x0..x1 {
            r.blend(px, py, color);
        }
    }
}

/// Rectangle outline with the stroke centered on the edge.
pub fn stroke_rect(r: &mut Raster, x: f32, y: f32, w: f32, h: f32, width: f32, color: Color) {
    thick_line(r, x, y, x + w, y, width, color);
    thick_line(r, x + w, y, x + w, y + h, width, color);
    thick_line(r, x + w, y + h, x, y + h, width, color);
    thick_line(r, x, y + h, x, y, width, color);
}

pub fn fill_circle(r: &mut Raster, cx: f32, cy: f32, radius: f32, color: Color) {
    if color.a == 0 || radius <= 0.0 {
        return;
    }
    let y0 = (cy - radius).floor().max(0.0) as u32;
    let y1 = (cy + radius).ceil().max(0.0) as u32;
    for py in y0..=y1 {
        let dy = py as f32 + 0.5 - cy;
        let span = radius * radius - dy * dy;
        if span < 0.0 {
            continue;
        }
        let half = span.sqrt();
        let x0 = (cx - half).floor().max(0.0) as u32;
        let x1 = (cx + half).ceil().max(0.0) as u32;
        for px in x0..x1 {
            if (px as f32 + 0.5 - cx).powi(2) + dy * dy <= radius * radius {
                r.blend(px, py, color);
            }
        }
    }
}

/// Even-odd scanline fill of a closed polygon.
pub fn fill_polygon(r: &mut Raster, pts: &[(f32, f32)], color: Color) {
    if pts.len() < 3 || color.a == 0 {
        trace!(vertices = pts.len(), "skipping degenerate polygon fill");
        return;
    }

    let y_min = pts.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
    let y_max = pts.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
    let y0 = y_min.floor().max(0.0) as u32;
    let y1 = y_max.ceil().max(0.0) as u32;

    let mut crossings: Vec<f32> = Vec::with_capacity(pts.len());
    for py in y0..=y1 {
        let scan = py as f32 + 0.5;
        crossings.clear();

        for i in 0..pts.len() {
            let (x1p, y1p) = pts[i];
            let (x2p, y2p) = pts[(i + 1) % pts.len()];
            if (y1p <= scan && y2p > scan) || (y2p <= scan && y1p > scan) {
                let t = (scan - y1p) / (y2p - y1p);
                crossings.push(x1p + t * (x2p - x1p));
            }
        }

        crossings.sort_by(|a, b| a.total_cmp(b));
        for pair in crossings.chunks_exact(2) {
            let x0 = pair[0].max(0.0).round() as u32;
            let x1 = pair[1].max(0.0).round() as u32;
            for px in x0..x1 {
                r.blend(px, py, color);
            }
        }
    }
}

/// Line with thickness: a square stamp walked along the segment.
pub fn thick_line(r: &mut Raster, x1: f32, y1: f32, x2: f32, y2: f32, width: f32, color: Color) {
    if color.a == 0 {
        return;
    }
    let half = (width.max(1.0) / 2.0).ceil() as i64;

    let mut x = x1.round() as i64;
    let mut y = y1.round() as i64;
    let xe = x2.round() as i64;
    let ye = y2.round() as i64;

    let dx = (xe - x).abs();
    let dy = -(ye - y).abs();
    let sx = if x < xe { 1 } else { -1 };
    let sy = if y < ye { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        stamp(r, x, y, half, color);
        if x == xe && y == ye {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

// Square stamp centered on (x, y); repeated stamps overdraw, so use the
// opaque set, not blend, to avoid double-blending along the walk.
fn stamp(r: &mut Raster, x: i64, y: i64, half: i64, color: Color) {
    for dy in -half..half {
        for dx in -half..half {
            let px = x + dx;
            let py = y + dy;
            if px >= 0 && py >= 0 {
                r.set(px as u32, py as u32, color);
            }
        }
    }
}

/// Render a text line with the built-in bitmap font.
///
/// `centered` anchors `left` at the middle of the rendered line (the
/// certificate title convention); otherwise `left`/`top` is the top-left
/// corner.
pub fn draw_text(
    r: &mut Raster,
    text: &str,
    left: f32,
    top: f32,
    scale: u32,
    color: Color,
    centered: bool,
) {
    let line_width = font::measure(text, scale);
    let mut pen_x = if centered {
        (left - line_width as f32 / 2.0).round() as i64
    } else {
        left.round() as i64
    };
    let pen_y = top.round() as i64;

    for c in text.chars() {
        let rows = font::glyph(c);
        for (gy, row) in rows.iter().enumerate() {
            for gx in 0..font::GLYPH_WIDTH {
                if row >> (font::GLYPH_WIDTH - 1 - gx) & 1 == 0 {
                    continue;
                }
                // One font cell becomes a scale x scale block.
                for sy in 0..scale {
                    for sx in 0..scale {
                        let px = pen_x + (gx * scale + sx) as i64;
                        let py = pen_y + (gy as u32 * scale + sy) as i64;
                        if px >= 0 && py >= 0 {
                            r.blend(px as u32, py as u32, color);
                        }
                    }
                }
            }
        }
        pen_x += (font::GLYPH_ADVANCE * scale) as i64;
    }
}

/// Nearest-neighbour scaled blit of a decoded image.
pub fn blit(r: &mut Raster, img: &DecodedImage, left: f32, top: f32, scale_x: f32, scale_y: f32) {
    if scale_x <= 0.0 || scale_y <= 0.0 {
        return;
    }
    let dst_w = (img.width as f32 * scale_x).round() as u32;
    let dst_h = (img.height as f32 * scale_y).round() as u32;
    let x0 = left.round() as i64;
    let y0 = top.round() as i64;

    for dy in 0..dst_h {
        for dx in 0..dst_w {
            let sx = ((dx as f32 / scale_x) as u32).min(img.width - 1);
            let sy = ((dy as f32 / scale_y) as u32).min(img.height - 1);
            let Some(src) = img.get(sx, sy) else { continue };
            let px = x0 + dx as i64;
            let py = y0 + dy as i64;
            if px >= 0 && py >= 0 {
                r.blend(px as u32, py as u32, src);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_covers_and_clips() {
        let mut r = Raster::new(10, 10, Color::WHITE);
        fill_rect(&mut r, 8.0, 8.0, 5.0, 5.0, Color::BLACK);
        assert_eq!(r.get(8, 8), Some(Color::BLACK));
        assert_eq!(r.get(9, 9), Some(Color::BLACK));
        assert_eq!(r.get(7, 7), Some(Color::WHITE));
    }

    #[test]
    fn circle_fills_center_not_corner() {
        let mut r = Raster::new(20, 20, Color::WHITE);
        fill_circle(&mut r, 10.0, 10.0, 5.0, Color::BLACK);
        assert_eq!(r.get(10, 10), Some(Color::BLACK));
        assert_eq!(r.get(0, 0), Some(Color::WHITE));
        // Just outside the radius along the diagonal.
        assert_eq!(r.get(14, 14), Some(Color::WHITE));
    }

    #[test]
    fn polygon_fill_square() {
        let mut r = Raster::new(10, 10, Color::WHITE);
        let pts = [(2.0, 2.0), (8.0, 2.0), (8.0, 8.0), (2.0, 8.0)];
        fill_polygon(&mut r, &pts, Color::BLACK);
        assert_eq!(r.get(5, 5), Some(Color::BLACK));
        assert_eq!(r.get(1, 5), Some(Color::WHITE));
        assert_eq!(r.get(9, 5), Some(Color::WHITE));
    }

    #[test]
    fn degenerate_polygon_is_skipped() {
        let mut r = Raster::new(4, 4, Color::WHITE);
        fill_polygon(&mut r, &[(0.0, 0.0), (3.0, 3.0)], Color::BLACK);
        assert_eq!(r.get(1, 1), Some(Color::WHITE));
    }

    #[test]
    fn thick_line_marks_endpoints() {
        let mut r = Raster::new(20, 20, Color::WHITE);
        thick_line(&mut r, 2.0, 2.0, 15.0, 15.0, 2.0, Color::BLACK);
        assert_eq!(r.get(2, 2), Some(Color::BLACK));
        assert_eq!(r.get(14, 14), Some(Color::BLACK));
        assert_eq!(r.get(18, 2), Some(Color::WHITE));
    }

    #[test]
    fn text_draws_something_where_asked() {
        let mut r = Raster::new(40, 20, Color::WHITE);
        draw_text(&mut r, "A", 2.0, 2.0, 1, Color::BLACK, false);
        let inked = (0..20)
            .flat_map(|y| (0..40).map(move |x| (x, y)))
            .filter(|&(x, y)| r.get(x, y) == Some(Color::BLACK))
            .count();
        assert!(inked > 0);
        // 5x7 cell at scale 1: nothing outside it.
        assert_eq!(r.get(20, 10), Some(Color::WHITE));
    }

    #[test]
    fn blit_scales_down() {
        let img = DecodedImage {
            width: 4,
            height: 4,
            pixels: vec![Color::BLACK; 16],
        };
        let mut r = Raster::new(10, 10, Color::WHITE);
        blit(&mut r, &img, 0.0, 0.0, 0.5, 0.5);
        assert_eq!(r.get(0, 0), Some(Color::BLACK));
        assert_eq!(r.get(1, 1), Some(Color::BLACK));
        assert_eq!(r.get(3, 3), Some(Color::WHITE));
    }
}
