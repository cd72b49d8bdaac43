//! Label and overlay text rasterization
//!
//! Rasterizes glyphs straight into the RGB canvas. The font comes from
//! a configurable file path; a missing font degrades to unlabeled
//! buttons instead of failing the capture.

use image::{Rgb, RgbImage};
use log::{info, warn};
use rusttype::{point, Font, Scale};
use std::path::Path;

/// Font handle for button labels and the summary overlay.
///
/// Holds no font when loading failed; drawing through it then becomes
/// a no-op.
pub struct LabelFont {
    font: Option<Font<'static>>,
}

impl LabelFont {
    /// Load a TTF/OTF font from `path`, degrading with a warning on
    /// failure
    pub fn load(path: &Path) -> Self {
        let font = match std::fs::read(path) {
            Ok(bytes) => match Font::try_from_vec(bytes) {
                Some(font) => {
                    info!("Loaded label font from {:?}", path);
                    Some(font)
                }
                None => {
                    warn!("Font file {:?} is not a usable font, buttons will be unlabeled", path);
                    None
                }
            },
            Err(e) => {
                warn!("Cannot read font {:?}: {}, buttons will be unlabeled", path, e);
                None
            }
        };
        Self { font }
    }

    /// A font handle that never draws anything
    pub fn none() -> Self {
        Self { font: None }
    }

    pub fn get(&self) -> Option<&Font<'static>> {
        self.font.as_ref()
    }
}

/// Advance width of `text` at `scale`, in pixels
pub fn text_width(font: &Font<'_>, text: &str, scale: Scale) -> f32 {
    font.layout(text, scale, point(0.0, 0.0))
        .map(|g| g.unpositioned().h_metrics().advance_width)
        .sum()
}

/// Draw `text` with its top-left corner at `(x, y)`, alpha-blending
/// glyph coverage into the canvas
pub fn draw_text(
    img: &mut RgbImage,
    x: i32,
    y: i32,
    text: &str,
    font: &Font<'_>,
    scale: Scale,
    color: Rgb<u8>,
) {
    let v_metrics = font.v_metrics(scale);
    let glyphs = font.layout(text, scale, point(x as f32, y as f32 + v_metrics.ascent));

    let (width, height) = (img.width() as i32, img.height() as i32);
    for glyph in glyphs {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let px = gx as i32 + bb.min.x;
            let py = gy as i32 + bb.min.y;
            if px < 0 || py < 0 || px >= width || py >= height {
                return;
            }
            let pixel = img.get_pixel_mut(px as u32, py as u32);
            for c in 0..3 {
                let dst = f32::from(pixel.0[c]);
                let src = f32::from(color.0[c]);
                pixel.0[c] = (dst + (src - dst) * coverage) as u8;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_font_degrades_to_none() {
        let font = LabelFont::load(Path::new("/nonexistent/font.ttf"));
        assert!(font.get().is_none());
    }

    #[test]
    fn none_font_draws_nothing() {
        let font = LabelFont::none();
        assert!(font.get().is_none());
    }
}
