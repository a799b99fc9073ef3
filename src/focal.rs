//! Focal points that overlay layers anchor to
//!
//! All focal points are in document coordinates. The gesture layer writes
//! them; the overlay layer reads them to position handles, the magnifier and
//! the toolbar.

use std::cmp::Ordering;

use crate::document::DocumentSelection;
use crate::geometry::{Point, Rect};
use crate::host::DocumentLayout;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FocalPoints {
    collapsed_handle: Option<Point>,
    upstream_handle: Option<Point>,
    downstream_handle: Option<Point>,
    magnifier: Option<Point>,
    toolbar: Option<Point>,
}

impl FocalPoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collapsed_handle(&self) -> Option<Point> {
        self.collapsed_handle
    }

    pub fn upstream_handle(&self) -> Option<Point> {
        self.upstream_handle
    }

    pub fn downstream_handle(&self) -> Option<Point> {
        self.downstream_handle
    }

    pub fn magnifier(&self) -> Option<Point> {
        self.magnifier
    }

    pub fn toolbar(&self) -> Option<Point> {
        self.toolbar
    }

    pub fn set_magnifier(&mut self, focal_point: Point) {
        self.magnifier = Some(focal_point);
    }

    pub fn clear_magnifier(&mut self) {
        self.magnifier = None;
    }

    /// Re-anchor handles and toolbar to the given selection
    pub fn sync_to_selection(
        &mut self,
        selection: Option<&DocumentSelection>,
        layout: &dyn DocumentLayout,
    ) {
        self.collapsed_handle = None;
        self.upstream_handle = None;
        self.downstream_handle = None;
        self.toolbar = None;

        let Some(selection) = selection else {
            return;
        };

        if selection.is_collapsed() {
            if let Some(caret) = layout.rect_for_position(&selection.extent) {
                self.collapsed_handle = Some(caret.bottom_center());
                self.toolbar = Some(caret.top_center());
            }
            return;
        }

        let (upstream, downstream) = match layout.compare(&selection.base, &selection.extent) {
            Ordering::Greater => (&selection.extent, &selection.base),
            Ordering::Less | Ordering::Equal => (&selection.base, &selection.extent),
        };
        let upstream_rect = layout.rect_for_position(upstream);
        let downstream_rect = layout.rect_for_position(downstream);

        self.upstream_handle = upstream_rect.map(|r| r.bottom_center());
        self.downstream_handle = downstream_rect.map(|r| r.bottom_center());
        self.toolbar = match (upstream_rect, downstream_rect) {
            (Some(a), Some(b)) => Some(a.union(&b).top_center()),
            (Some(r), None) | (None, Some(r)) => Some(r.top_center()),
            (None, None) => None,
        };
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// The document-space point under a dragging finger
///
/// Finger movement and scrolling both move this point: the finger moves
/// over the document, or the document moves under the finger. Both are
/// folded in so that a scroll of `d` lands on the same point as a finger
/// movement of `d` with no scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragFocus {
    start: Point,
    finger_delta: Point,
    start_scroll: f64,
}

impl DragFocus {
    pub fn new(start: Point, scroll_offset: f64) -> Self {
        Self {
            start,
            finger_delta: Point::ZERO,
            start_scroll: scroll_offset,
        }
    }

    pub fn add_finger_delta(&mut self, delta: Point) {
        self.finger_delta += delta;
    }

    /// Total finger travel since the drag started
    pub fn finger_delta(&self) -> Point {
        self.finger_delta
    }

    /// The point under the finger at the given scroll offset
    pub fn document_offset(&self, scroll_offset: f64) -> Point {
        self.start + self.finger_delta + Point::new(0.0, scroll_offset - self.start_scroll)
    }
}

/// Magnifier focal point: horizontal position follows the finger, vertical
/// position sits on the center of the line being selected
pub fn magnifier_focal_point(finger: Point, line: Option<Rect>) -> Point {
    match line {
        Some(rect) => Point::new(finger.x, rect.center().y),
        None => finger,
    }
}
