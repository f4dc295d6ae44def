//! Input model: the active tool and the gesture state machine.
//!
//! `UiState` is the externally owned tool selection, passed into the
//! controller rather than read from ambient state. `InputState` is the
//! gesture tracked between pointer-down and pointer-up; it carries the
//! image-space start point and the tool captured at gesture start.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::annotation::AnnotationKind;
use crate::mapper::Point;

/// Tool selection visible to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiState {
    /// Kind of annotation the next gesture creates.
    pub tool: AnnotationKind,
}

impl Default for UiState {
    fn default() -> Self {
        Self { tool: AnnotationKind::Circle }
    }
}

/// Internal state for the gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// A drag is defining an annotation region.
    Dragging {
        /// Image-space position where the drag started; becomes the annotation origin.
        start: Point,
        /// Tool active when the drag started.
        tool: AnnotationKind,
    },
}

impl InputState {
    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}
