//! Dragging a visible selection handle
//!
//! The session is started by the handle overlay, never inferred from where a
//! document drag began. It remembers which selection endpoint the dragged
//! handle sits on at drag start; that mapping depends on the selection's
//! direction, which can differ from one drag to the next.

use std::time::Instant;

use crate::controls::ControlsController;
use crate::document::{DocumentSelection, HandleType, SelectionBound, SelectionChangeKind};
use crate::error::GestureError;
use crate::focal::{magnifier_focal_point, DragFocus, FocalPoints};
use crate::geometry::Point;
use crate::host::GestureContext;

#[derive(Debug, Clone)]
pub struct DragHandleSession {
    handle: HandleType,
    bound: SelectionBound,
    focus: DragFocus,
}

impl DragHandleSession {
    /// Begin dragging `handle`.
    ///
    /// Fails if there is no selection or if the handle does not exist for
    /// the current selection (a collapsed handle on a range, or an expanded
    /// handle on a caret).
    pub fn start(
        ctx: &mut GestureContext<'_>,
        controls: &mut ControlsController,
        handle: HandleType,
    ) -> Result<Self, GestureError> {
        let selection = ctx
            .editor
            .selection()
            .ok_or(GestureError::NoSelection { handle })?;
        if handle.expects_collapsed() != selection.is_collapsed() {
            return Err(GestureError::HandleMismatch {
                handle,
                collapsed: selection.is_collapsed(),
            });
        }

        let affinity = ctx.layout.selection_affinity(&selection);
        let bound = handle.bound_for(affinity);
        let position = selection.bound(bound);
        let rect = ctx
            .layout
            .rect_for_position(position)
            .ok_or_else(|| GestureError::MissingLayout(position.clone()))?;

        controls.cancel_collapsed_handle_auto_hide_countdown();
        controls.do_not_blink_caret();
        controls.show_magnifier();
        controls.hide_toolbar();
        ctx.auto_scroller.start_monitoring();

        tracing::debug!("dragging {:?} handle as {:?} ({:?})", handle, bound, affinity);
        Ok(Self {
            handle,
            bound,
            focus: DragFocus::new(rect.center(), ctx.viewport.scroll_offset()),
        })
    }

    pub fn handle(&self) -> HandleType {
        self.handle
    }

    pub fn bound(&self) -> SelectionBound {
        self.bound
    }

    /// The handle moved by `delta`
    pub fn update(
        &mut self,
        ctx: &mut GestureContext<'_>,
        focal_points: &mut FocalPoints,
        delta: Point,
    ) {
        self.focus.add_finger_delta(delta);
        self.resolve(ctx, focal_points);
    }

    /// The document scrolled under the stationary handle
    pub fn on_scroll_changed(
        &mut self,
        ctx: &mut GestureContext<'_>,
        focal_points: &mut FocalPoints,
    ) {
        self.resolve(ctx, focal_points);
    }

    fn resolve(&mut self, ctx: &mut GestureContext<'_>, focal_points: &mut FocalPoints) {
        let finger = self.focus.document_offset(ctx.viewport.scroll_offset());
        let target = ctx.viewport.document_to_viewport(finger);

        let Some(nearest) = ctx.layout.position_nearest(finger) else {
            ctx.auto_scroller.update_target(target);
            return;
        };

        let line = ctx.layout.rect_for_position(&nearest);
        focal_points.set_magnifier(magnifier_focal_point(finger, line));

        if let Some(current) = ctx.editor.selection() {
            let (next, kind) = match self.handle {
                HandleType::Collapsed => (
                    DocumentSelection::collapsed(nearest),
                    SelectionChangeKind::PushCaret,
                ),
                HandleType::Upstream | HandleType::Downstream => (
                    current.with_bound(self.bound, nearest),
                    SelectionChangeKind::ExpandSelection,
                ),
            };
            if !next.is_equivalent_to(&current) {
                tracing::trace!("{:?} handle drag selects {}", self.handle, next);
                ctx.select(next, kind);
            }
        }

        ctx.auto_scroller.update_target(target);
    }

    /// Drag released or cancelled
    pub fn end(
        self,
        ctx: &mut GestureContext<'_>,
        controls: &mut ControlsController,
        focal_points: &mut FocalPoints,
        now: Instant,
    ) {
        focal_points.clear_magnifier();
        controls.blink_caret();
        controls.hide_magnifier();
        ctx.auto_scroller.stop_monitoring();

        match ctx.editor.selection() {
            Some(selection) if selection.is_collapsed() => {
                // Dragging one end onto the other collapses the range; swap handle sets.
                controls.show_collapsed_handle();
                controls.start_collapsed_handle_auto_hide_countdown(now);
            }
            Some(_) => controls.show_toolbar(),
            None => {}
        }
        tracing::debug!("{:?} handle drag ended", self.handle);
    }
}
