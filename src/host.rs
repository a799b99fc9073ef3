//! Capabilities the gesture layer consumes from its host
//!
//! The interactor never owns the document, its layout, the scroll view or
//! the editing pipeline. It borrows them for the duration of one event
//! through a [`GestureContext`].

use std::cmp::Ordering;

use crate::document::{DocumentPosition, DocumentSelection, NodeId, SelectionAffinity};
use crate::document::{SelectionChangeKind, SelectionReason};
use crate::geometry::{Point, Rect};

/// Hit-testing and geometry of the laid-out document (document coordinates)
pub trait DocumentLayout {
    /// Position nearest to a document-space offset, `None` for an empty layout
    fn position_nearest(&self, offset: Point) -> Option<DocumentPosition>;

    /// Caret rectangle of a position (zero width for text positions)
    fn rect_for_position(&self, position: &DocumentPosition) -> Option<Rect>;

    /// Whether the node's component supports visual selection
    fn is_selectable(&self, node_id: &NodeId) -> bool;

    /// Selection repair: the closest place a caret may go when `node_id`
    /// itself cannot hold one
    fn nearest_selectable_position(&self, node_id: &NodeId) -> Option<DocumentPosition>;

    /// Document order of two positions
    fn compare(&self, a: &DocumentPosition, b: &DocumentPosition) -> Ordering;

    /// The word around a text position
    fn word_selection_at(&self, position: &DocumentPosition) -> Option<DocumentSelection>;

    /// The whole paragraph around a text position
    fn paragraph_selection_at(&self, position: &DocumentPosition) -> Option<DocumentSelection>;

    /// Upstream-to-downstream selection of an atomic node
    fn block_selection_at(&self, position: &DocumentPosition) -> Option<DocumentSelection>;

    /// Direction of a selection in document order
    fn selection_affinity(&self, selection: &DocumentSelection) -> SelectionAffinity {
        SelectionAffinity::from_ordering(self.compare(&selection.base, &selection.extent))
    }
}

/// The scrollable viewport that contains the document
pub trait Viewport {
    /// Map a global pointer location into document space at the current scroll
    fn global_to_document(&self, global: Point) -> Point;

    /// Map a document-space offset into viewport space at the current scroll
    fn document_to_viewport(&self, document: Point) -> Point;

    /// Current vertical scroll offset
    fn scroll_offset(&self) -> f64;

    /// Whether the viewport is moving on its own (momentum or animation)
    fn is_scrolling(&self) -> bool;

    /// Hand a pointer drag over to the scroll view
    fn begin_drag(&mut self, global: Point);

    fn update_drag(&mut self, delta: Point);

    /// Release the drag with a velocity (logical pixels per second)
    fn end_drag(&mut self, velocity: Point);

    fn cancel_drag(&mut self);
}

/// The editing pipeline's view of the selection
pub trait SelectionMutator {
    /// The current selection, as last applied by the editor
    fn selection(&self) -> Option<DocumentSelection>;

    fn request_selection_change(
        &mut self,
        selection: DocumentSelection,
        kind: SelectionChangeKind,
        reason: SelectionReason,
    );

    fn request_clear_selection(&mut self);

    fn request_clear_composing_region(&mut self);
}

/// Edge auto-scrolling while a drag is in progress
pub trait AutoScroller {
    fn start_monitoring(&mut self);

    fn stop_monitoring(&mut self);

    /// Where the dragged point currently is, in viewport space
    fn update_target(&mut self, viewport_offset: Point);
}

/// Platform services
pub trait Platform {
    fn request_focus(&mut self);

    /// Short haptic acknowledgment. Best effort: failures are logged and ignored.
    fn haptic_feedback(&mut self) -> anyhow::Result<()>;
}

/// Outcome of an application tap handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// The handler consumed the tap; skip the default behavior
    Halt,
    /// Run the default behavior
    Continue,
}

/// What a tap handler is told about the tap
#[derive(Debug, Clone, PartialEq)]
pub struct TapDetails {
    pub global_position: Point,
    pub document_offset: Point,
    pub position: Option<DocumentPosition>,
}

/// Optional application hook that sees taps before the default handling
pub trait TapHandler {
    fn on_tap(&mut self, _details: &TapDetails) -> TapOutcome {
        TapOutcome::Continue
    }

    fn on_double_tap(&mut self, _details: &TapDetails) -> TapOutcome {
        TapOutcome::Continue
    }

    fn on_triple_tap(&mut self, _details: &TapDetails) -> TapOutcome {
        TapOutcome::Continue
    }
}

/// Everything the gesture layer borrows from the host for one event
pub struct GestureContext<'a> {
    pub layout: &'a dyn DocumentLayout,
    pub viewport: &'a mut dyn Viewport,
    pub editor: &'a mut dyn SelectionMutator,
    pub auto_scroller: &'a mut dyn AutoScroller,
    pub platform: &'a mut dyn Platform,
}

impl GestureContext<'_> {
    /// Request a user-driven selection change, clearing any IME composition
    pub fn select(&mut self, selection: DocumentSelection, kind: SelectionChangeKind) {
        tracing::debug!("select {}", selection);
        self.editor
            .request_selection_change(selection, kind, SelectionReason::UserInteraction);
        self.editor.request_clear_composing_region();
    }

    /// Request that the selection be cleared, clearing any IME composition
    pub fn clear_selection(&mut self) {
        tracing::debug!("clear selection");
        self.editor.request_clear_selection();
        self.editor.request_clear_composing_region();
    }

    /// Fire the haptic acknowledgment without letting a failure escape
    pub fn haptic_feedback(&mut self) {
        if let Err(e) = self.platform.haptic_feedback() {
            tracing::warn!("haptic feedback unavailable: {:#}", e);
        }
    }
}
