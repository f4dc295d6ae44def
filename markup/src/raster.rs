//! Anti-aliased drawing primitives over an RGBA8 buffer.
//!
//! Every primitive computes a per-pixel coverage in `[0, 1]` from pixel
//! centers and blends the paint color source-over. Coverage math is plain
//! `f64` arithmetic with fixed sampling, so the same calls on the same
//! buffer always produce the same bytes.
//!
//! Strokes are centered on the geometric path, as in a 2D canvas: a 4 px
//! stroke extends 2 px on either side of a circle's circumference or a
//! rectangle's edge.

#[cfg(test)]
#[path = "raster_test.rs"]
mod raster_test;

use image::RgbaImage;

use crate::color::Color;
use crate::consts::POLYGON_SUBSAMPLES;
use crate::mapper::Point;

/// Inclusive pixel range touched by a primitive, already clipped to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PixelSpan {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

/// Axis-aligned rectangle with non-negative size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Bounds {
    /// Build from an origin and a signed size, normalizing negative extents.
    #[must_use]
    pub fn from_origin_size(origin: Point, width: f64, height: f64) -> Self {
        let (x0, x1) = if width < 0.0 { (origin.x + width, origin.x) } else { (origin.x, origin.x + width) };
        let (y0, y1) = if height < 0.0 { (origin.y + height, origin.y) } else { (origin.y, origin.y + height) };
        Self { x0, y0, x1, y1 }
    }

    #[must_use]
    pub fn inflate(&self, amount: f64) -> Self {
        Self { x0: self.x0 - amount, y0: self.y0 - amount, x1: self.x1 + amount, y1: self.y1 + amount }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Area of the intersection with the unit pixel square at `(px, py)`.
    fn pixel_overlap(&self, px: f64, py: f64) -> f64 {
        let ox = (self.x1.min(px + 1.0) - self.x0.max(px)).max(0.0);
        let oy = (self.y1.min(py + 1.0) - self.y0.max(py)).max(0.0);
        ox * oy
    }
}

/// A coverage mask positioned in canvas pixels, used for rasterized text.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    left: i64,
    top: i64,
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl Mask {
    /// A zeroed mask covering `width × height` pixels starting at `(left, top)`.
    #[must_use]
    pub fn new(left: i64, top: i64, width: u32, height: u32) -> Self {
        Self { left, top, width, height, data: vec![0.0; width as usize * height as usize] }
    }

    #[must_use]
    pub fn left(&self) -> i64 {
        self.left
    }

    #[must_use]
    pub fn top(&self) -> i64 {
        self.top
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Coverage at mask-local `(x, y)`; zero outside the mask.
    #[must_use]
    pub fn get(&self, x: i64, y: i64) -> f32 {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return 0.0;
        }
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Raise coverage at mask-local `(x, y)` to at least `value`.
    pub fn accumulate(&mut self, x: u32, y: u32, value: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let cell = &mut self.data[y as usize * self.width as usize + x as usize];
        *cell = cell.max(value.clamp(0.0, 1.0));
    }

    /// Returns `true` if no pixel has any coverage.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&c| c <= 0.0)
    }

    /// Grow the mask outward by `radius` pixels with an anti-aliased rim.
    ///
    /// This is the outline stroke of whatever shape the mask holds.
    #[must_use]
    pub fn dilate(&self, radius: f32) -> Self {
        let reach = (radius + 0.5).ceil() as i64;
        let grow = reach as u32;
        let mut out = Self::new(self.left - reach, self.top - reach, self.width + grow * 2, self.height + grow * 2);

        let mut kernel = Vec::new();
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let dist = ((dx * dx + dy * dy) as f32).sqrt();
                let weight = (radius + 0.5 - dist).clamp(0.0, 1.0);
                if weight > 0.0 {
                    kernel.push((dx, dy, weight));
                }
            }
        }

        for oy in 0..out.height {
            for ox in 0..out.width {
                // Source coordinates of this output pixel.
                let sx = i64::from(ox) - reach;
                let sy = i64::from(oy) - reach;
                let mut best = 0.0_f32;
                for &(dx, dy, weight) in &kernel {
                    let c = self.get(sx + dx, sy + dy) * weight;
                    if c > best {
                        best = c;
                    }
                }
                out.accumulate(ox, oy, best);
            }
        }
        out
    }
}

/// A drawable RGBA surface.
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Start from an unmodified copy of `base`.
    #[must_use]
    pub fn from_image(base: &RgbaImage) -> Self {
        Self { image: base.clone() }
    }

    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    #[must_use]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Stroke a circle outline of `width` centered on the circumference.
    pub fn stroke_circle(&mut self, center: Point, radius: f64, width: f64, color: Color) {
        let half = width / 2.0;
        let reach = radius + half + 1.0;
        let Some(span) = self.span(center.x - reach, center.y - reach, center.x + reach, center.y + reach) else {
            return;
        };
        for y in span.y0..=span.y1 {
            for x in span.x0..=span.x1 {
                let dx = f64::from(x) + 0.5 - center.x;
                let dy = f64::from(y) + 0.5 - center.y;
                let ring = (dx.hypot(dy) - radius).abs();
                self.blend(x, y, color, (half + 0.5 - ring).clamp(0.0, 1.0));
            }
        }
    }

    /// Fill an axis-aligned rectangle, with exact area coverage on partial pixels.
    pub fn fill_rect(&mut self, bounds: Bounds, color: Color) {
        if bounds.is_empty() {
            return;
        }
        let Some(span) = self.span(bounds.x0, bounds.y0, bounds.x1, bounds.y1) else {
            return;
        };
        for y in span.y0..=span.y1 {
            for x in span.x0..=span.x1 {
                let cov = bounds.pixel_overlap(f64::from(x), f64::from(y));
                self.blend(x, y, color, cov);
            }
        }
    }

    /// Stroke the outline of an axis-aligned rectangle.
    pub fn stroke_rect(&mut self, bounds: Bounds, width: f64, color: Color) {
        let half = width / 2.0;
        let outer = bounds.inflate(half);
        let inner = bounds.inflate(-half);
        let Some(span) = self.span(outer.x0, outer.y0, outer.x1, outer.y1) else {
            return;
        };
        for y in span.y0..=span.y1 {
            for x in span.x0..=span.x1 {
                let (px, py) = (f64::from(x), f64::from(y));
                let mut cov = outer.pixel_overlap(px, py);
                if !inner.is_empty() {
                    cov -= inner.pixel_overlap(px, py);
                }
                self.blend(x, y, color, cov);
            }
        }
    }

    /// Stroke a straight segment with butt caps. Zero-length segments draw nothing.
    pub fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Color) {
        let (dx, dy) = (to.x - from.x, to.y - from.y);
        let len = dx.hypot(dy);
        if len <= f64::EPSILON {
            return;
        }
        let (ux, uy) = (dx / len, dy / len);
        let half = width / 2.0;
        let pad = half + 1.0;
        let Some(span) = self.span(
            from.x.min(to.x) - pad,
            from.y.min(to.y) - pad,
            from.x.max(to.x) + pad,
            from.y.max(to.y) + pad,
        ) else {
            return;
        };
        for y in span.y0..=span.y1 {
            for x in span.x0..=span.x1 {
                let px = f64::from(x) + 0.5 - from.x;
                let py = f64::from(y) + 0.5 - from.y;
                let along = px * ux + py * uy;
                let across = (px * uy - py * ux).abs();
                let side = (half + 0.5 - across).clamp(0.0, 1.0);
                let ends = (along + 0.5).min(len - along + 0.5).clamp(0.0, 1.0);
                self.blend(x, y, color, side * ends);
            }
        }
    }

    /// Fill a triangle using a fixed subsample grid per pixel.
    pub fn fill_triangle(&mut self, corners: [Point; 3], color: Color) {
        let [a, b, c] = corners;
        let area = edge(a, b, c);
        if area.abs() <= f64::EPSILON {
            return;
        }
        let Some(span) = self.span(
            a.x.min(b.x).min(c.x),
            a.y.min(b.y).min(c.y),
            a.x.max(b.x).max(c.x),
            a.y.max(b.y).max(c.y),
        ) else {
            return;
        };
        let n = POLYGON_SUBSAMPLES;
        let total = f64::from(n * n);
        for y in span.y0..=span.y1 {
            for x in span.x0..=span.x1 {
                let mut hits = 0_u32;
                for sy in 0..n {
                    for sx in 0..n {
                        let p = Point::new(
                            f64::from(x) + (f64::from(sx) + 0.5) / f64::from(n),
                            f64::from(y) + (f64::from(sy) + 0.5) / f64::from(n),
                        );
                        let w0 = edge(b, c, p) * area.signum();
                        let w1 = edge(c, a, p) * area.signum();
                        let w2 = edge(a, b, p) * area.signum();
                        if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                            hits += 1;
                        }
                    }
                }
                self.blend(x, y, color, f64::from(hits) / total);
            }
        }
    }

    /// Paint `color` through a coverage mask.
    pub fn fill_mask(&mut self, mask: &Mask, color: Color) {
        let (w, h) = (i64::from(self.image.width()), i64::from(self.image.height()));
        for my in 0..mask.height {
            let y = mask.top + i64::from(my);
            if y < 0 || y >= h {
                continue;
            }
            for mx in 0..mask.width {
                let x = mask.left + i64::from(mx);
                if x < 0 || x >= w {
                    continue;
                }
                let cov = mask.get(i64::from(mx), i64::from(my));
                self.blend(x as u32, y as u32, color, f64::from(cov));
            }
        }
    }

    /// Clip a float rectangle to the canvas, returning the inclusive pixel span.
    fn span(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Option<PixelSpan> {
        let (w, h) = (self.image.width(), self.image.height());
        if w == 0 || h == 0 {
            return None;
        }
        let (wf, hf) = (f64::from(w), f64::from(h));
        if max_x < 0.0 || max_y < 0.0 || min_x >= wf || min_y >= hf {
            return None;
        }
        Some(PixelSpan {
            x0: min_x.floor().max(0.0) as u32,
            y0: min_y.floor().max(0.0) as u32,
            x1: (max_x.ceil().min(wf - 1.0)) as u32,
            y1: (max_y.ceil().min(hf - 1.0)) as u32,
        })
    }

    /// Source-over blend of `color` at `coverage` onto one pixel.
    fn blend(&mut self, x: u32, y: u32, color: Color, coverage: f64) {
        let src_a = f64::from(color.a) / 255.0 * coverage.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x, y);
        let dst_a = f64::from(dst.0[3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            return;
        }
        let mix = |s: u8, d: u8| {
            let v = (f64::from(s) * src_a + f64::from(d) * dst_a * (1.0 - src_a)) / out_a;
            v.round().clamp(0.0, 255.0) as u8
        };
        dst.0 = [
            mix(color.r, dst.0[0]),
            mix(color.g, dst.0[1]),
            mix(color.b, dst.0[2]),
            (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        ];
    }
}

/// Signed doubled area of triangle `(a, b, p)`.
fn edge(a: Point, b: Point, p: Point) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}
