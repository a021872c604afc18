//! QR code generation for verification links.
//!
//! The encoded payload is the public verification URL for a certificate
//! code; the matrix is rasterized straight into a [`DecodedImage`] so the
//! editor can place it like any other image object.

use qrcode::QrCode;
use sigil_scene::Color;
use tracing::debug;

use crate::raster::DecodedImage;

/// One quiet-zone module around the code, matching the original margin.
const QUIET_MODULES: u32 = 1;

/// Encode `data` into a QR raster close to `target_px` wide.
pub fn qr_image(data: &str, target_px: u32) -> Result<DecodedImage, qrcode::types::QrError> {
    let code = QrCode::new(data.as_bytes())?;
    let modules = code.width() as u32;
    let total = modules + QUIET_MODULES * 2;
    let module_px = (target_px / total).max(1);
    let size = total * module_px;

    let mut pixels = vec![Color::WHITE; (size * size) as usize];
    let colors = code.to_colors();

    for my in 0..modules {
        for mx in 0..modules {
            if colors[(my * modules + mx) as usize] != qrcode::Color::Dark {
                continue;
            }
            let x0 = (mx + QUIET_MODULES) * module_px;
            let y0 = (my + QUIET_MODULES) * module_px;
            for py in y0..y0 + module_px {
                for px in x0..x0 + module_px {
                    pixels[(py * size + px) as usize] = Color::BLACK;
                }
            }
        }
    }

    debug!(modules, size, "rendered qr code");
    Ok(DecodedImage {
        width: size,
        height: size,
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qr_is_square_and_near_target() {
        let img = qr_image("https://certs.example.com/verify/CERT-2024-001", 100).unwrap();
        assert_eq!(img.width, img.height);
        assert!(img.width <= 100);
        assert!(img.width >= 20);
    }

    #[test]
    fn qr_has_both_colors() {
        let img = qr_image("hello", 100).unwrap();
        let dark = img.pixels.iter().filter(|&&c| c == Color::BLACK).count();
        let light = img.pixels.iter().filter(|&&c| c == Color::WHITE).count();
        assert!(dark > 0 && light > 0);
        assert_eq!(dark + light, img.pixels.len());
    }

    #[test]
    fn same_payload_same_matrix() {
        let a = qr_image("CERT-2024-001", 100).unwrap();
        let b = qr_image("CERT-2024-001", 100).unwrap();
        assert_eq!(a.pixels, b.pixels);
    }
}
