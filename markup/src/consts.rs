//! Shared numeric constants for the markup crate.
//!
//! All lengths are in base-image pixels so that marks keep their proportions
//! relative to the drawing regardless of display zoom.

// ── Shapes ──────────────────────────────────────────────────────

/// Stroke width for circle, highlight, and arrow outlines.
pub const STROKE_WIDTH: f64 = 4.0;

/// Alpha applied to the annotation color when filling a highlight (0x40).
pub const HIGHLIGHT_FILL_ALPHA: u8 = 0x40;

/// Arrowhead length measured back from the tip.
pub const ARROW_HEAD_LENGTH: f64 = 20.0;

/// Arrowhead half-angle in radians (30°).
pub const ARROW_HEAD_ANGLE: f64 = std::f64::consts::PI / 6.0;

// ── Text ────────────────────────────────────────────────────────

/// Font size for text annotations.
pub const TEXT_FONT_PX: f32 = 24.0;

/// Font size for captions drawn beside shapes.
pub const CAPTION_FONT_PX: f32 = 20.0;

/// Outline width for captions; the outline is drawn before the fill.
pub const CAPTION_STROKE_WIDTH: f32 = 3.0;

/// Vertical distance between an annotation's origin and its caption baseline.
pub const CAPTION_OFFSET_Y: f64 = 10.0;

// ── Rasterization ───────────────────────────────────────────────

/// Per-axis subsample count used when filling polygons.
pub const POLYGON_SUBSAMPLES: u32 = 4;
