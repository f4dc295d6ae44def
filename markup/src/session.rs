//! Markup session lifecycle: load, edit, save, cancel.
//!
//! A session starts in `Loading`. The host fetches the base image however it
//! likes and hands the result back through [`MarkupSession::complete_load`]
//! together with the [`LoadTicket`] it was given. Tickets go stale when the
//! session is cancelled, dropped, or reloaded; a stale result is ignored.
//!
//! Until a load succeeds the coordinate mapper has no natural size, so no
//! gesture can be mapped and the compositor never runs. A failed load leaves
//! the session in a "cannot edit" state where every drawing operation
//! returns [`SessionError::Unavailable`].
//!
//! Every store mutation is followed by a recomposite inside the same call,
//! so the flattened preview never reflects a half-applied change.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::annotation::{Annotation, AnnotationKind};
use crate::controller::{Action, Controller, LabelResolver};
use crate::mapper::{CoordinateMapper, ImageSize, Point, Rect};
use crate::render::{Compositor, RenderError, encode_png};
use crate::store::AnnotationStore;

/// The drawing being marked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawingRef {
    /// Loadable reference to the base image (URL, data URL, or path).
    pub url: String,
    /// Human-readable name for display and captions.
    pub name: String,
}

impl DrawingRef {
    #[must_use]
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self { url: url.into(), name: name.into() }
    }
}

/// Errors returned by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The base image has not finished loading.
    #[error("drawing is still loading")]
    NotReady,

    /// The base image failed to load; the session cannot be edited.
    #[error("drawing cannot be edited: {reason}")]
    Unavailable { reason: String },

    /// The session was cancelled.
    #[error("session is closed")]
    Closed,

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Handle for one in-flight base image load.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    generation: u64,
    alive: Arc<AtomicBool>,
}

impl LoadTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// `false` once the issuing session has been cancelled, dropped, or reloaded.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

/// Result of applying a load to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Base image applied; the session is editable.
    Ready(ImageSize),
    /// Load or initial render failed; the session is unavailable.
    Failed(String),
    /// The ticket no longer belongs to this session; nothing changed.
    Stale,
}

/// Everything produced by a save.
#[derive(Debug, Clone)]
pub struct SavedMarkup {
    /// The annotation sequence in draw order.
    pub annotations: Vec<Annotation>,
    /// Base image with all annotations composited.
    pub flattened: RgbaImage,
    /// `flattened` encoded as PNG.
    pub png: Vec<u8>,
}

#[derive(Debug)]
enum SessionState {
    Loading,
    Ready { base: RgbaImage, flattened: RgbaImage },
    Failed { reason: String },
    Closed,
}

/// One drawing markup session.
#[derive(Debug)]
pub struct MarkupSession {
    drawing: DrawingRef,
    store: AnnotationStore,
    controller: Controller,
    mapper: CoordinateMapper,
    compositor: Compositor,
    state: SessionState,
    generation: u64,
    alive: Arc<AtomicBool>,
}

impl MarkupSession {
    /// Open a session over `drawing`, seeded with `initial` annotations.
    ///
    /// Returns the session in the loading state and the ticket the host must
    /// present with the load result.
    #[must_use]
    pub fn open(drawing: DrawingRef, initial: Vec<Annotation>, compositor: Compositor) -> (Self, LoadTicket) {
        info!(drawing = %drawing.name, seeded = initial.len(), "markup session opened");
        let alive = Arc::new(AtomicBool::new(true));
        let session = Self {
            drawing,
            store: AnnotationStore::seeded(initial),
            controller: Controller::new(),
            mapper: CoordinateMapper::new(),
            compositor,
            state: SessionState::Loading,
            generation: 0,
            alive: Arc::clone(&alive),
        };
        let ticket = LoadTicket { generation: 0, alive };
        (session, ticket)
    }

    /// Start over with a fresh load, invalidating any outstanding ticket.
    ///
    /// Annotations are kept. Has no effect on a closed session.
    pub fn reload(&mut self) -> Option<LoadTicket> {
        if matches!(self.state, SessionState::Closed) {
            return None;
        }
        self.alive.store(false, Ordering::Release);
        self.alive = Arc::new(AtomicBool::new(true));
        self.generation += 1;
        self.mapper.clear();
        self.controller.reset();
        self.state = SessionState::Loading;
        debug!(generation = self.generation, "markup session reloading");
        Some(LoadTicket { generation: self.generation, alive: Arc::clone(&self.alive) })
    }

    /// Apply the outcome of the base image load issued with `ticket`.
    pub fn complete_load(&mut self, ticket: &LoadTicket, result: Result<RgbaImage, String>) -> LoadOutcome {
        let stale = !Arc::ptr_eq(&ticket.alive, &self.alive)
            || !ticket.is_live()
            || ticket.generation != self.generation
            || !matches!(self.state, SessionState::Loading);
        if stale {
            warn!(generation = ticket.generation, current = self.generation, "stale drawing load ignored");
            return LoadOutcome::Stale;
        }

        let base = match result {
            Ok(img) if img.width() > 0 && img.height() > 0 => img,
            Ok(_) => return self.fail("drawing has no pixels".to_owned()),
            Err(reason) => return self.fail(reason),
        };

        let flattened = match self.compositor.composite(&base, self.store.snapshot()) {
            Ok(f) => f,
            Err(e) => return self.fail(e.to_string()),
        };

        let size = ImageSize::new(base.width(), base.height());
        self.mapper.set_natural_size(size);
        self.state = SessionState::Ready { base, flattened };
        info!(drawing = %self.drawing.name, width = size.width, height = size.height, "drawing loaded");
        LoadOutcome::Ready(size)
    }

    fn fail(&mut self, reason: String) -> LoadOutcome {
        warn!(drawing = %self.drawing.name, %reason, "drawing load failed");
        self.mapper.clear();
        self.state = SessionState::Failed { reason: reason.clone() };
        LoadOutcome::Failed(reason)
    }

    // --- Queries ---

    #[must_use]
    pub fn drawing(&self) -> &DrawingRef {
        &self.drawing
    }

    /// Whether the base image is loaded and the session accepts edits.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, SessionState::Ready { .. })
    }

    /// Why the session cannot be edited, if the load failed.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            SessionState::Failed { reason } => Some(reason),
            _ => None,
        }
    }

    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        self.store.snapshot()
    }

    #[must_use]
    pub fn natural_size(&self) -> Option<ImageSize> {
        self.mapper.natural_size()
    }

    #[must_use]
    pub fn tool(&self) -> AnnotationKind {
        self.controller.tool()
    }

    /// The current composited preview.
    ///
    /// # Errors
    ///
    /// Fails unless the session is ready.
    pub fn flattened(&self) -> Result<&RgbaImage, SessionError> {
        match &self.state {
            SessionState::Ready { flattened, .. } => Ok(flattened),
            other => Err(unavailable(other)),
        }
    }

    // --- Editing ---

    /// Select the tool for the next gesture. Allowed in any state.
    pub fn set_tool(&mut self, tool: AnnotationKind) {
        self.controller.set_tool(tool);
    }

    /// Forward a pointer-down to the controller.
    ///
    /// # Errors
    ///
    /// Fails unless the session is ready.
    pub fn pointer_down(&mut self, screen: Point, display: Rect) -> Result<Vec<Action>, SessionError> {
        self.ensure_ready()?;
        Ok(self.controller.pointer_down(&self.mapper, screen, display))
    }

    /// Forward a pointer-up to the controller and recomposite if the store changed.
    ///
    /// A new annotation that cannot be rendered is rolled back before the error is returned.
    ///
    /// # Errors
    ///
    /// Fails unless the session is ready, or with [`SessionError::Render`].
    pub fn pointer_up(
        &mut self,
        screen: Point,
        display: Rect,
        resolver: &mut dyn LabelResolver,
    ) -> Result<Vec<Action>, SessionError> {
        self.ensure_ready()?;
        let actions = self.controller.pointer_up(&self.mapper, screen, display, &mut self.store, resolver);
        if actions.contains(&Action::RenderNeeded) {
            if let Err(e) = self.recomposite() {
                self.store.undo_last();
                return Err(e);
            }
        }
        Ok(actions)
    }

    /// Remove the most recent annotation and recomposite.
    ///
    /// Returns `Ok(None)` when there was nothing to undo.
    ///
    /// # Errors
    ///
    /// Fails unless the session is ready.
    pub fn undo_last(&mut self) -> Result<Option<Annotation>, SessionError> {
        self.ensure_ready()?;
        let Some(removed) = self.store.undo_last() else {
            return Ok(None);
        };
        if let Err(e) = self.recomposite() {
            self.store.append(removed);
            return Err(e);
        }
        Ok(Some(removed))
    }

    /// Composite once more and return the sequence, flattened image, and PNG.
    ///
    /// Saving with no annotations is allowed; the flattened image then equals the base.
    ///
    /// # Errors
    ///
    /// Fails unless the session is ready, or if rendering or encoding fails.
    pub fn save(&self) -> Result<SavedMarkup, SessionError> {
        let SessionState::Ready { base, .. } = &self.state else {
            return Err(unavailable(&self.state));
        };
        let annotations = self.store.snapshot().to_vec();
        let flattened = self.compositor.composite(base, &annotations)?;
        let png = encode_png(&flattened)?;
        info!(drawing = %self.drawing.name, annotations = annotations.len(), bytes = png.len(), "markup saved");
        Ok(SavedMarkup { annotations, flattened, png })
    }

    /// Discard all session state. Outstanding load tickets go stale.
    pub fn cancel(&mut self) {
        self.alive.store(false, Ordering::Release);
        self.store = AnnotationStore::new();
        self.controller.reset();
        self.mapper.clear();
        self.state = SessionState::Closed;
        info!(drawing = %self.drawing.name, "markup session cancelled");
    }

    fn ensure_ready(&self) -> Result<(), SessionError> {
        if self.is_ready() { Ok(()) } else { Err(unavailable(&self.state)) }
    }

    fn recomposite(&mut self) -> Result<(), SessionError> {
        if let SessionState::Ready { base, flattened } = &mut self.state {
            *flattened = self.compositor.composite(base, self.store.snapshot())?;
        }
        Ok(())
    }
}

impl Drop for MarkupSession {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Release);
    }
}

fn unavailable(state: &SessionState) -> SessionError {
    match state {
        SessionState::Failed { reason } => SessionError::Unavailable { reason: reason.clone() },
        SessionState::Closed => SessionError::Closed,
        SessionState::Loading | SessionState::Ready { .. } => SessionError::NotReady,
    }
}
