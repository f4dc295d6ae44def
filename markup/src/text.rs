//! Glyph rasterization for text annotations and captions.
//!
//! Text is laid out on a single line from a left/baseline anchor, the way a
//! 2D canvas `fillText` places it, and rasterized into a [`Mask`] that the
//! compositor paints through. Control characters are skipped.

#[cfg(test)]
#[path = "text_test.rs"]
mod text_test;

use ab_glyph::{Font, FontArc, FontRef, OutlinedGlyph, PxScale, ScaleFont, point};

use crate::mapper::Point;
use crate::raster::Mask;

/// Bold sans face bundled with the crate so renders never depend on system fonts.
static EMBEDDED_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf");

/// Errors produced while loading a font.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid font data: {0}")]
pub struct FontError(String);

/// A loaded font face used for all annotation text.
#[derive(Clone)]
pub struct Typeface {
    font: FontArc,
}

impl std::fmt::Debug for Typeface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typeface").field("glyphs", &self.font.glyph_count()).finish()
    }
}

impl Typeface {
    /// The bundled bold sans face.
    ///
    /// # Errors
    ///
    /// Returns [`FontError`] if the bundled data cannot be parsed.
    pub fn embedded() -> Result<Self, FontError> {
        let face = FontRef::try_from_slice(EMBEDDED_FONT).map_err(|e| FontError(e.to_string()))?;
        Ok(Self { font: FontArc::new(face) })
    }

    /// Load a TTF/OTF face from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FontError`] if `bytes` is not a usable font.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FontError> {
        let font = FontArc::try_from_vec(bytes).map_err(|e| FontError(e.to_string()))?;
        Ok(Self { font })
    }

    /// Rasterize `text` at `px` with its baseline starting at `anchor`.
    ///
    /// Returns `None` when nothing visible results (empty or whitespace-only text).
    #[must_use]
    pub fn rasterize(&self, text: &str, px: f32, anchor: Point) -> Option<Mask> {
        let scale = PxScale::from(px);
        let scaled = self.font.as_scaled(scale);
        let baseline_y = anchor.y as f32;

        let mut glyphs: Vec<OutlinedGlyph> = Vec::new();
        let mut caret = anchor.x as f32;
        let mut prev = None;
        for ch in text.chars().filter(|c| !c.is_control()) {
            let id = scaled.glyph_id(ch);
            if let Some(p) = prev {
                caret += scaled.kern(p, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, baseline_y));
            caret += scaled.h_advance(id);
            prev = Some(id);
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                glyphs.push(outlined);
            }
        }

        let first = glyphs.first()?.px_bounds();
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.min.x, first.min.y, first.max.x, first.max.y);
        for g in &glyphs[1..] {
            let b = g.px_bounds();
            min_x = min_x.min(b.min.x);
            min_y = min_y.min(b.min.y);
            max_x = max_x.max(b.max.x);
            max_y = max_y.max(b.max.y);
        }

        let left = min_x.floor() as i64;
        let top = min_y.floor() as i64;
        let width = (max_x.ceil() as i64 - left).max(0) as u32;
        let height = (max_y.ceil() as i64 - top).max(0) as u32;
        let mut mask = Mask::new(left, top, width, height);

        for g in &glyphs {
            let b = g.px_bounds();
            let off_x = b.min.x.floor() as i64 - left;
            let off_y = b.min.y.floor() as i64 - top;
            g.draw(|x, y, c| {
                let mx = off_x + i64::from(x);
                let my = off_y + i64::from(y);
                if mx >= 0 && my >= 0 {
                    mask.accumulate(mx as u32, my as u32, c);
                }
            });
        }

        if mask.is_blank() { None } else { Some(mask) }
    }
}
