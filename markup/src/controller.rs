//! Interaction controller: turns drag gestures into annotations.
//!
//! The controller owns only the gesture state machine and the tool
//! selection. Everything else is passed in per event: the mapper (which
//! refuses to map until the base image is loaded), the store that receives
//! committed annotations, and the [`LabelResolver`] standing in for the
//! label prompt. Each handler returns the [`Action`]s the host must react
//! to, so the whole thing is testable as `(state, event) -> (state, effects)`.
//!
//! Label rules:
//! - `text` needs a label; a declined or blank answer discards the gesture.
//! - every other kind gets `"Issue {N}"` when the answer is declined or
//!   blank, with `N = store.len() + 1` at commit time.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use tracing::debug;

use crate::annotation::{Annotation, AnnotationKind, Extent};
use crate::input::{InputState, UiState};
use crate::mapper::{CoordinateMapper, Point, Rect};
use crate::store::AnnotationStore;

/// Side effects requested by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A gesture completed and this annotation was appended to the store.
    AnnotationAdded(Annotation),
    /// A gesture completed without producing an annotation.
    GestureDiscarded,
    /// The store changed; the flattened preview must be recomposited.
    RenderNeeded,
}

/// What the label prompt is being asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelPrompt {
    /// Kind of annotation awaiting a label.
    pub kind: AnnotationKind,
    /// Label used if the prompt is declined. `None` for text, where declining cancels.
    pub default_label: Option<String>,
}

impl LabelPrompt {
    /// Prompt text shown to the user.
    #[must_use]
    pub fn message(&self) -> &'static str {
        if self.kind == AnnotationKind::Text { "Enter label text:" } else { "Enter label (optional):" }
    }

    /// Whether declining the prompt abandons the gesture.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.default_label.is_none()
    }
}

/// Supplies label text for a completed gesture.
///
/// Returning `None` means the prompt was declined.
pub trait LabelResolver {
    /// Answer `prompt`.
    fn resolve(&mut self, prompt: &LabelPrompt) -> Option<String>;
}

impl<F> LabelResolver for F
where
    F: FnMut(&LabelPrompt) -> Option<String>,
{
    fn resolve(&mut self, prompt: &LabelPrompt) -> Option<String> {
        self(prompt)
    }
}

/// Gesture state machine plus the active tool.
#[derive(Debug, Clone, Default)]
pub struct Controller {
    pub ui: UiState,
    pub input: InputState,
}

impl Controller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the tool used by the next gesture. An in-flight drag keeps its tool.
    pub fn set_tool(&mut self, tool: AnnotationKind) {
        self.ui.tool = tool;
    }

    #[must_use]
    pub fn tool(&self) -> AnnotationKind {
        self.ui.tool
    }

    /// Start a drag at `screen`.
    ///
    /// Ignored when the mapper cannot map yet. A pointer-down during a drag
    /// restarts the gesture from the new point.
    pub fn pointer_down(&mut self, mapper: &CoordinateMapper, screen: Point, display: Rect) -> Vec<Action> {
        let Some(start) = mapper.to_image(screen, display) else {
            debug!(x = screen.x, y = screen.y, "pointer down refused: image not mapped");
            return vec![];
        };
        self.input = InputState::Dragging { start, tool: self.ui.tool };
        debug!(tool = %self.ui.tool, x = start.x, y = start.y, "gesture started");
        vec![]
    }

    /// Finish the drag at `screen`, resolve its label, and commit to `store`.
    pub fn pointer_up(
        &mut self,
        mapper: &CoordinateMapper,
        screen: Point,
        display: Rect,
        store: &mut AnnotationStore,
        resolver: &mut dyn LabelResolver,
    ) -> Vec<Action> {
        let InputState::Dragging { start, tool } = std::mem::take(&mut self.input) else {
            return vec![];
        };
        let Some(end) = mapper.to_image(screen, display) else {
            debug!(tool = %tool, "gesture discarded: image not mapped");
            return vec![Action::GestureDiscarded];
        };

        let prompt = LabelPrompt {
            kind: tool,
            default_label: (tool != AnnotationKind::Text).then(|| store.next_default_label()),
        };
        let answer = resolver.resolve(&prompt).filter(|l| !l.trim().is_empty());

        let label = match (answer, prompt.default_label) {
            (Some(label), _) => label,
            (None, Some(default)) => default,
            (None, None) => {
                debug!(tool = %tool, "gesture discarded: label declined");
                return vec![Action::GestureDiscarded];
            }
        };

        let annotation = Annotation::new(tool, start, Extent::between(start, end), Some(label));
        store.append(annotation.clone());
        vec![Action::AnnotationAdded(annotation), Action::RenderNeeded]
    }

    /// Drop any in-flight gesture.
    pub fn reset(&mut self) {
        self.input = InputState::Idle;
    }
}
