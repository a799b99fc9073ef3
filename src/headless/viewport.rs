//! A vertically scrolling viewport with no rendering

use crate::geometry::Point;
use crate::host::Viewport;

/// Release speed (px/s) above which a drag leaves the viewport coasting
pub const MOMENTUM_THRESHOLD: f64 = 50.0;

/// Calls the gesture layer made on the viewport, in order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportCall {
    BeginDrag(Point),
    UpdateDrag(Point),
    EndDrag(Point),
    CancelDrag,
}

#[derive(Debug, Clone)]
pub struct ScrollViewport {
    /// Global position of the viewport's top-left corner
    origin: Point,
    height: f64,
    content_height: f64,
    scroll_offset: f64,
    coasting: bool,
    calls: Vec<ViewportCall>,
}

impl ScrollViewport {
    pub fn new(height: f64, content_height: f64) -> Self {
        Self {
            origin: Point::ZERO,
            height,
            content_height,
            scroll_offset: 0.0,
            coasting: false,
            calls: Vec::new(),
        }
    }

    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn max_scroll_offset(&self) -> f64 {
        (self.content_height - self.height).max(0.0)
    }

    /// Move the content; returns whether the offset changed
    pub fn scroll_by(&mut self, dy: f64) -> bool {
        self.scroll_to(self.scroll_offset + dy)
    }

    pub fn scroll_to(&mut self, offset: f64) -> bool {
        let clamped = offset.clamp(0.0, self.max_scroll_offset());
        let changed = clamped != self.scroll_offset;
        self.scroll_offset = clamped;
        changed
    }

    /// Simulate momentum from a previous fling
    pub fn set_coasting(&mut self, coasting: bool) {
        self.coasting = coasting;
    }

    pub fn calls(&self) -> &[ViewportCall] {
        &self.calls
    }
}

impl Viewport for ScrollViewport {
    fn global_to_document(&self, global: Point) -> Point {
        Point::new(
            global.x - self.origin.x,
            global.y - self.origin.y + self.scroll_offset,
        )
    }

    fn document_to_viewport(&self, document: Point) -> Point {
        Point::new(document.x, document.y - self.scroll_offset)
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    fn is_scrolling(&self) -> bool {
        self.coasting
    }

    fn begin_drag(&mut self, global: Point) {
        self.coasting = false;
        self.calls.push(ViewportCall::BeginDrag(global));
    }

    fn update_drag(&mut self, delta: Point) {
        // Content follows the finger.
        self.scroll_by(-delta.y);
        self.calls.push(ViewportCall::UpdateDrag(delta));
    }

    fn end_drag(&mut self, velocity: Point) {
        self.coasting = velocity.y.abs() > MOMENTUM_THRESHOLD;
        self.calls.push(ViewportCall::EndDrag(velocity));
    }

    fn cancel_drag(&mut self) {
        self.coasting = false;
        self.calls.push(ViewportCall::CancelDrag);
    }
}
