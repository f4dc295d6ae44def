//! Rendering: composites annotations onto a base drawing.
//!
//! This module is the only consumer of [`Canvas`]. It receives a read-only
//! base image and a read-only annotation sequence and produces a new
//! flattened image; it never mutates session state. Output depends only on
//! its inputs, so re-rendering the same sequence always yields the same
//! bytes.
//!
//! Layering: the base image first, then each annotation in sequence order,
//! each with its caption directly after its shape.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};
use tracing::debug;

use crate::annotation::{Annotation, AnnotationError, AnnotationKind};
use crate::color::Color;
use crate::consts::{
    ARROW_HEAD_ANGLE, ARROW_HEAD_LENGTH, CAPTION_FONT_PX, CAPTION_OFFSET_Y, CAPTION_STROKE_WIDTH,
    HIGHLIGHT_FILL_ALPHA, STROKE_WIDTH, TEXT_FONT_PX,
};
use crate::mapper::Point;
use crate::raster::{Bounds, Canvas};
use crate::text::{FontError, Typeface};

/// Errors produced by the compositor.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// An annotation in the sequence cannot be drawn. Indicates an upstream bug.
    #[error("malformed annotation: {0}")]
    Malformed(#[from] AnnotationError),

    /// The font face could not be loaded.
    #[error(transparent)]
    Font(#[from] FontError),

    /// The flattened image could not be encoded.
    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Deterministic base-plus-annotations compositor.
#[derive(Debug, Clone)]
pub struct Compositor {
    typeface: Typeface,
}

impl Compositor {
    /// Compositor using the bundled font.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Font`] if the bundled font fails to parse.
    pub fn new() -> Result<Self, RenderError> {
        Ok(Self { typeface: Typeface::embedded()? })
    }

    /// Compositor using a caller-supplied face.
    #[must_use]
    pub fn with_typeface(typeface: Typeface) -> Self {
        Self { typeface }
    }

    /// Draw `annotations` over a copy of `base`, in order.
    ///
    /// Every annotation is validated before any pixel is touched, so a
    /// malformed sequence never yields a partial render.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Malformed`] for the first annotation that fails
    /// [`Annotation::validate`].
    pub fn composite(&self, base: &RgbaImage, annotations: &[Annotation]) -> Result<RgbaImage, RenderError> {
        for a in annotations {
            a.validate()?;
        }

        let mut canvas = Canvas::from_image(base);
        for a in annotations {
            self.draw_annotation(&mut canvas, a);
        }

        debug!(count = annotations.len(), width = base.width(), height = base.height(), "composited");
        Ok(canvas.into_image())
    }

    fn draw_annotation(&self, canvas: &mut Canvas, a: &Annotation) {
        match a.kind() {
            AnnotationKind::Circle => draw_circle(canvas, a),
            AnnotationKind::Highlight => draw_highlight(canvas, a),
            AnnotationKind::Arrow => draw_arrow(canvas, a),
            AnnotationKind::Text => self.draw_text(canvas, a),
        }

        if a.kind() != AnnotationKind::Text {
            if let Some(label) = a.label().filter(|l| !l.is_empty()) {
                self.draw_caption(canvas, a.origin(), label);
            }
        }
    }

    // =============================================================
    // Text
    // =============================================================

    fn draw_text(&self, canvas: &mut Canvas, a: &Annotation) {
        let Some(label) = a.label() else {
            return;
        };
        if let Some(mask) = self.typeface.rasterize(label, TEXT_FONT_PX, a.origin()) {
            canvas.fill_mask(&mask, a.color());
        }
    }

    /// Outlined caption: dark stroke first, light fill on top, so it reads on any background.
    fn draw_caption(&self, canvas: &mut Canvas, origin: Point, label: &str) {
        let anchor = Point::new(origin.x, origin.y - CAPTION_OFFSET_Y);
        let Some(mask) = self.typeface.rasterize(label, CAPTION_FONT_PX, anchor) else {
            return;
        };
        canvas.fill_mask(&mask.dilate(CAPTION_STROKE_WIDTH / 2.0), Color::BLACK);
        canvas.fill_mask(&mask, Color::WHITE);
    }
}

/// Encode a flattened image as PNG.
///
/// # Errors
///
/// Returns [`RenderError::Encode`] if the encoder fails.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

// =============================================================
// Shape renderers
// =============================================================

fn draw_circle(canvas: &mut Canvas, a: &Annotation) {
    let radius = a.circle_radius();
    if radius <= 0.0 {
        return;
    }
    canvas.stroke_circle(a.circle_center(), radius, STROKE_WIDTH, a.color());
}

fn draw_highlight(canvas: &mut Canvas, a: &Annotation) {
    let extent = a.extent();
    if extent.is_zero() {
        return;
    }
    let bounds = Bounds::from_origin_size(a.origin(), extent.width, extent.height);
    let color = a.color();
    let fill_alpha = (u16::from(color.a) * u16::from(HIGHLIGHT_FILL_ALPHA) / 0xff) as u8;
    canvas.fill_rect(bounds, color.with_alpha(fill_alpha));
    canvas.stroke_rect(bounds, STROKE_WIDTH, color);
}

fn draw_arrow(canvas: &mut Canvas, a: &Annotation) {
    let (from, to) = (a.origin(), a.end());
    if a.extent().is_zero() {
        return;
    }
    canvas.stroke_line(from, to, STROKE_WIDTH, a.color());
    canvas.fill_triangle(arrowhead(from, to), a.color());
}

/// Tip plus the two back corners: the head-length vector rotated ±30° off the reversed shaft.
fn arrowhead(from: Point, to: Point) -> [Point; 3] {
    let angle = (to.y - from.y).atan2(to.x - from.x);
    let corner = |offset: f64| {
        Point::new(
            to.x - ARROW_HEAD_LENGTH * (angle + offset).cos(),
            to.y - ARROW_HEAD_LENGTH * (angle + offset).sin(),
        )
    };
    [to, corner(-ARROW_HEAD_ANGLE), corner(ARROW_HEAD_ANGLE)]
}
