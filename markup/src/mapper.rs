#[cfg(test)]
#[path = "mapper_test.rs"]
mod mapper_test;

use serde::{Deserialize, Serialize};

/// A point in either screen or base-image space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// On-screen bounding rectangle of the displayed drawing, in CSS pixels.
///
/// This is whatever the host reports for the (possibly scaled) image
/// element; it has no relation to the image's natural size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Natural pixel dimensions of a decoded base image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A rect showing the image unscaled at the screen origin.
    #[must_use]
    pub fn natural_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

/// Converts pointer positions into base-image pixel space.
///
/// Until [`CoordinateMapper::set_natural_size`] is called the mapper refuses
/// every conversion, which is how gestures are kept out of a session whose
/// base image has not finished loading.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateMapper {
    natural: Option<ImageSize>,
}

impl CoordinateMapper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the natural size of the loaded base image.
    pub fn set_natural_size(&mut self, size: ImageSize) {
        self.natural = Some(size);
    }

    /// Forget the natural size (session torn down or reloading).
    pub fn clear(&mut self) {
        self.natural = None;
    }

    #[must_use]
    pub fn natural_size(&self) -> Option<ImageSize> {
        self.natural
    }

    /// Convert a screen-space point to base-image pixels.
    ///
    /// Returns `None` when the natural size is unknown or `display` is empty.
    #[must_use]
    pub fn to_image(&self, screen: Point, display: Rect) -> Option<Point> {
        let natural = self.natural?;
        if !display.is_usable() {
            return None;
        }
        Some(Point {
            x: (screen.x - display.left) * f64::from(natural.width) / display.width,
            y: (screen.y - display.top) * f64::from(natural.height) / display.height,
        })
    }

    /// Convert a base-image point back to screen space under `display`.
    #[must_use]
    pub fn to_screen(&self, image: Point, display: Rect) -> Option<Point> {
        let natural = self.natural?;
        if !display.is_usable() || natural.width == 0 || natural.height == 0 {
            return None;
        }
        Some(Point {
            x: image.x * display.width / f64::from(natural.width) + display.left,
            y: image.y * display.height / f64::from(natural.height) + display.top,
        })
    }
}
