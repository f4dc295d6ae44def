//! Drawing markup engine for construction-document findings.
//!
//! Reviewers place visual annotations (circles, highlights, arrows, text
//! labels) over a raster drawing; the engine keeps them in insertion order,
//! composites them onto the base image, and hands the flattened result plus
//! the structured annotation list to whoever persists finding evidence.
//! Nothing here touches the network; loading and persistence belong to the
//! host.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`annotation`] | Annotation records, kinds, and their wire format |
//! | [`color`] | RGBA colors and per-kind defaults |
//! | [`mapper`] | Screen-to-image coordinate mapping |
//! | [`store`] | Ordered annotation sequence with undo |
//! | [`raster`] | Anti-aliased drawing primitives over an RGBA buffer |
//! | [`text`] | Glyph rasterization for labels and captions |
//! | [`render`] | Deterministic compositor: base image + annotations |
//! | [`input`] | Tool selection and the gesture state machine |
//! | [`controller`] | Gesture handling and label resolution |
//! | [`session`] | Markup session lifecycle: load, edit, save, cancel |
//! | [`consts`] | Shared numeric constants (stroke widths, font sizes, etc.) |

pub mod annotation;
pub mod color;
pub mod consts;
pub mod controller;
pub mod input;
pub mod mapper;
pub mod raster;
pub mod render;
pub mod session;
pub mod store;
pub mod text;

pub use annotation::{Annotation, AnnotationId, AnnotationKind, Extent};
pub use color::Color;
pub use controller::{Action, Controller, LabelPrompt, LabelResolver};
pub use mapper::{CoordinateMapper, ImageSize, Point, Rect};
pub use render::{Compositor, RenderError};
pub use session::{DrawingRef, LoadOutcome, LoadTicket, MarkupSession, SavedMarkup, SessionError};
pub use store::AnnotationStore;
