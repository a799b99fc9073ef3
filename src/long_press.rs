//! Long-press selection
//!
//! A long-press selects the word under the finger. Dragging afterwards grows
//! the selection a whole word at a time, anchored on the far side of the
//! original word: dragging forward keeps the word's start as base, dragging
//! backward keeps its end.

use std::cmp::Ordering;

use crate::controls::ControlsController;
use crate::document::{DocumentPosition, DocumentSelection, SelectionChangeKind};
use crate::focal::{DragFocus, FocalPoints};
use crate::geometry::Point;
use crate::host::{DocumentLayout, GestureContext};

#[derive(Debug, Clone)]
pub struct LongPressSession {
    word_start: DocumentPosition,
    word_end: DocumentPosition,
    focus: DragFocus,
}

impl LongPressSession {
    /// Select the word (or atomic block) at the pressed point. Selectable
    /// content with no word under the finger, such as an empty paragraph,
    /// gets a caret.
    ///
    /// Returns `None`, without touching the selection, when nothing
    /// selectable is under the finger.
    pub fn start(ctx: &mut GestureContext<'_>, press: Point) -> Option<Self> {
        let position = ctx.layout.position_nearest(press)?;
        if !ctx.layout.is_selectable(&position.node_id) {
            tracing::debug!("long-press over unselectable node {}", position.node_id);
            return None;
        }

        let unit = ctx
            .layout
            .word_selection_at(&position)
            .or_else(|| ctx.layout.block_selection_at(&position))
            .unwrap_or_else(|| DocumentSelection::collapsed(position.clone()));
        let (word_start, word_end) = ordered(ctx.layout, &unit);

        let kind = if unit.is_collapsed() {
            SelectionChangeKind::PlaceCaret
        } else {
            SelectionChangeKind::ExpandSelection
        };
        ctx.select(DocumentSelection::new(word_start.clone(), word_end.clone()), kind);
        ctx.auto_scroller.start_monitoring();

        tracing::debug!("long-press selected {} -> {}", word_start, word_end);
        Some(Self {
            word_start,
            word_end,
            focus: DragFocus::new(press, ctx.viewport.scroll_offset()),
        })
    }

    /// First movement after the long-press was recognized
    pub fn on_pan_start(&mut self, controls: &mut ControlsController) {
        controls.hide_toolbar();
        controls.show_magnifier();
    }

    /// Finger moved by `delta`
    pub fn on_pan_update(
        &mut self,
        ctx: &mut GestureContext<'_>,
        focal_points: &mut FocalPoints,
        delta: Point,
    ) {
        self.focus.add_finger_delta(delta);
        self.resolve(ctx, focal_points);
    }

    /// The document scrolled under a stationary finger
    pub fn on_scroll_changed(
        &mut self,
        ctx: &mut GestureContext<'_>,
        focal_points: &mut FocalPoints,
    ) {
        self.resolve(ctx, focal_points);
    }

    fn resolve(&mut self, ctx: &mut GestureContext<'_>, focal_points: &mut FocalPoints) {
        let finger = self.focus.document_offset(ctx.viewport.scroll_offset());
        match ctx.layout.position_nearest(finger) {
            Some(nearest) => self.drag_update(ctx, focal_points, finger, &nearest),
            None => {
                let target = ctx.viewport.document_to_viewport(finger);
                ctx.auto_scroller.update_target(target);
            }
        }
    }

    /// Recompute the selection for a finger at `finger` over `nearest`
    pub fn drag_update(
        &mut self,
        ctx: &mut GestureContext<'_>,
        focal_points: &mut FocalPoints,
        finger: Point,
        nearest: &DocumentPosition,
    ) {
        let selection = self.selection_for(ctx.layout, nearest);

        let changed = ctx
            .editor
            .selection()
            .map_or(true, |current| !current.is_equivalent_to(&selection));
        if changed {
            tracing::trace!("long-press drag selects {}", selection);
            ctx.select(selection.clone(), SelectionChangeKind::ExpandSelection);
            ctx.haptic_feedback();
        }

        // Even with an unchanged selection the document may be auto-scrolling
        // under the finger, so the magnifier and auto-scroll target always move.
        if let Some(rect) = ctx.layout.rect_for_position(&selection.extent) {
            focal_points.set_magnifier(rect.center());
        }
        let target = ctx.viewport.document_to_viewport(finger);
        ctx.auto_scroller.update_target(target);
    }

    fn selection_for(
        &self,
        layout: &dyn DocumentLayout,
        nearest: &DocumentPosition,
    ) -> DocumentSelection {
        if layout.compare(nearest, &self.word_start) == Ordering::Less {
            let extent = layout
                .word_selection_at(nearest)
                .map(|word| ordered(layout, &word).0)
                .unwrap_or_else(|| nearest.clone());
            DocumentSelection::new(self.word_end.clone(), extent)
        } else if layout.compare(nearest, &self.word_end) == Ordering::Greater {
            let extent = layout
                .word_selection_at(nearest)
                .map(|word| ordered(layout, &word).1)
                .unwrap_or_else(|| nearest.clone());
            DocumentSelection::new(self.word_start.clone(), extent)
        } else {
            DocumentSelection::new(self.word_start.clone(), self.word_end.clone())
        }
    }

    /// Finger lifted or gesture cancelled
    pub fn end(
        self,
        ctx: &mut GestureContext<'_>,
        controls: &mut ControlsController,
        focal_points: &mut FocalPoints,
    ) {
        ctx.auto_scroller.stop_monitoring();
        controls.hide_magnifier();
        focal_points.clear_magnifier();

        if ctx.editor.selection().is_some_and(|s| !s.is_collapsed()) {
            controls.show_expanded_handles();
            controls.show_toolbar();
        }
        tracing::debug!("long-press ended");
    }
}

/// Endpoints of a selection in document order
fn ordered(
    layout: &dyn DocumentLayout,
    selection: &DocumentSelection,
) -> (DocumentPosition, DocumentPosition) {
    if layout.compare(&selection.base, &selection.extent) == Ordering::Greater {
        (selection.extent.clone(), selection.base.clone())
    } else {
        (selection.base.clone(), selection.extent.clone())
    }
}
