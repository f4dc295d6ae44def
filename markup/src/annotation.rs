//! Annotation records: what a reviewer placed on a drawing.
//!
//! An [`Annotation`] is immutable once created. Its geometry lives in the
//! base image's natural pixel space, so it re-renders faithfully at any
//! display zoom. The JSON shape (`type` + `coordinates`) matches records the
//! web client already persisted inside finding evidence, which lets a session
//! be seeded from them directly.

#[cfg(test)]
#[path = "annotation_test.rs"]
mod annotation_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::Color;
use crate::mapper::Point;

/// Opaque annotation identifier, unique within a session.
///
/// New ids are UUID v4 strings; ids loaded from older records are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(String);

impl AnnotationId {
    /// Generate a fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AnnotationId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kind of mark. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    /// Stroked circle enclosing the dragged diagonal.
    Circle,
    /// Translucent filled rectangle with an outline.
    Highlight,
    /// Line from the drag start to the drag end with an arrowhead at the end.
    Arrow,
    /// Free text anchored at a point.
    Text,
}

impl AnnotationKind {
    pub const ALL: [Self; 4] = [Self::Circle, Self::Highlight, Self::Arrow, Self::Text];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Highlight => "highlight",
            Self::Arrow => "arrow",
            Self::Text => "text",
        }
    }

    /// Whether this kind is a bare point with no extent.
    #[must_use]
    pub fn is_point(self) -> bool {
        matches!(self, Self::Text)
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed drag extent in base-image pixels. Negative when the gesture moved up or left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    pub const ZERO: Self = Self { width: 0.0, height: 0.0 };

    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Extent of the drag from `start` to `end`.
    #[must_use]
    pub fn between(start: Point, end: Point) -> Self {
        Self { width: end.x - start.x, height: end.y - start.y }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// Reasons an annotation cannot be rendered.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnnotationError {
    /// Origin or extent holds NaN or an infinity.
    #[error("annotation {id} has non-finite geometry")]
    NonFinite { id: AnnotationId },

    /// A text annotation with nothing to draw.
    #[error("text annotation {id} has no label")]
    MissingText { id: AnnotationId },
}

/// A single visual mark placed on a drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AnnotationRecord", into = "AnnotationRecord")]
pub struct Annotation {
    id: AnnotationId,
    kind: AnnotationKind,
    origin: Point,
    extent: Extent,
    color: Color,
    label: Option<String>,
    description: Option<String>,
}

impl Annotation {
    /// Create an annotation with a fresh id and the default color for `kind`.
    ///
    /// Text annotations are points, so `extent` is forced to zero for them.
    #[must_use]
    pub fn new(kind: AnnotationKind, origin: Point, extent: Extent, label: Option<String>) -> Self {
        let extent = if kind.is_point() { Extent::ZERO } else { extent };
        Self {
            id: AnnotationId::generate(),
            kind,
            origin,
            extent,
            color: Color::default_for(kind),
            label,
            description: None,
        }
    }

    /// Attach a free-text note. Notes are stored but never drawn.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> &AnnotationId {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> AnnotationKind {
        self.kind
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    #[must_use]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Drag end point: `origin + extent`.
    #[must_use]
    pub fn end(&self) -> Point {
        Point::new(self.origin.x + self.extent.width, self.origin.y + self.extent.height)
    }

    /// Center of the circle drawn for this annotation's drag box.
    #[must_use]
    pub fn circle_center(&self) -> Point {
        Point::new(
            self.origin.x + self.extent.width / 2.0,
            self.origin.y + self.extent.height / 2.0,
        )
    }

    /// Half the drag diagonal, so the circle passes through both drag corners.
    #[must_use]
    pub fn circle_radius(&self) -> f64 {
        self.extent.width.hypot(self.extent.height) / 2.0
    }

    /// Check that the compositor can draw this annotation.
    ///
    /// # Errors
    ///
    /// Returns [`AnnotationError::NonFinite`] for NaN/infinite geometry and
    /// [`AnnotationError::MissingText`] for a text annotation without a label.
    pub fn validate(&self) -> Result<(), AnnotationError> {
        let values = [self.origin.x, self.origin.y, self.extent.width, self.extent.height];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(AnnotationError::NonFinite { id: self.id.clone() });
        }
        if self.kind == AnnotationKind::Text && self.label.as_deref().is_none_or(|l| l.trim().is_empty()) {
            return Err(AnnotationError::MissingText { id: self.id.clone() });
        }
        Ok(())
    }
}

// =============================================================
// Wire format
// =============================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Coordinates {
    x: f64,
    y: f64,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AnnotationRecord {
    id: AnnotationId,
    #[serde(rename = "type")]
    kind: AnnotationKind,
    coordinates: Coordinates,
    color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl From<AnnotationRecord> for Annotation {
    fn from(record: AnnotationRecord) -> Self {
        let c = record.coordinates;
        Self {
            id: record.id,
            kind: record.kind,
            origin: Point::new(c.x, c.y),
            extent: Extent::new(c.width, c.height),
            color: record.color,
            label: record.label,
            description: record.description,
        }
    }
}

impl From<Annotation> for AnnotationRecord {
    fn from(a: Annotation) -> Self {
        Self {
            id: a.id,
            kind: a.kind,
            coordinates: Coordinates {
                x: a.origin.x,
                y: a.origin.y,
                width: a.extent.width,
                height: a.extent.height,
            },
            color: a.color,
            label: a.label,
            description: a.description,
        }
    }
}
