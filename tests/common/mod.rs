//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::time::{Duration, Instant};

use doc_touch::config::GestureConfig;
use doc_touch::controls::ControlsController;
use doc_touch::document::{DocumentPosition, DocumentSelection, HandleType};
use doc_touch::error::GestureError;
use doc_touch::geometry::Point;
use doc_touch::headless::{HeadlessHost, MonospaceDocument};
use doc_touch::host::SelectionMutator;
use doc_touch::interactor::TouchInteractor;
use doc_touch::messages::{GestureMsg, HandleMsg, PointerMsg};
use doc_touch::update::update;

/// Five nodes, 10px per char and 20px per line:
///
/// ```text
/// n0  y   0..20  "hello brave new world"
/// n1  y  20..40  rule
/// n2  y  40..60  embed (unselectable)
/// n3  y  60..80  "second paragraph here"
/// n4  y  80..100 "third line of text"
/// ```
pub const DOC: &str =
    "hello brave new world\n---\n::chart\nsecond paragraph here\nthird line of text\n";

/// Global point over character `offset` of the paragraph on `line`
pub fn over(line: usize, offset: usize) -> Point {
    Point::new(offset as f64 * 10.0 + 2.0, line as f64 * 20.0 + 10.0)
}

pub fn caret(node: &str, offset: usize) -> DocumentSelection {
    DocumentSelection::collapsed(DocumentPosition::text(node, offset))
}

pub fn range(node: &str, base: usize, extent: usize) -> DocumentSelection {
    DocumentSelection::new(
        DocumentPosition::text(node, base),
        DocumentPosition::text(node, extent),
    )
}

/// A headless host plus interactor driven on a virtual clock
pub struct Harness {
    pub host: HeadlessHost,
    pub interactor: TouchInteractor,
    start: Instant,
    pub now: Instant,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(GestureConfig::default())
    }

    pub fn with_config(config: GestureConfig) -> Self {
        let host = HeadlessHost::new(MonospaceDocument::from_text(DOC));
        Self::from_parts(host, config)
    }

    /// A viewport two lines tall over [`DOC`], so it can scroll 60px
    pub fn scrollable() -> Self {
        let host = HeadlessHost::with_viewport_height(MonospaceDocument::from_text(DOC), 40.0);
        Self::from_parts(host, GestureConfig::default())
    }

    pub fn from_parts(host: HeadlessHost, config: GestureConfig) -> Self {
        let start = Instant::now();
        Self {
            host,
            interactor: TouchInteractor::new(config),
            start,
            now: start,
        }
    }

    pub fn send(&mut self, msg: GestureMsg) -> Result<(), GestureError> {
        let mut ctx = self.host.context();
        update(&mut self.interactor, &mut ctx, msg)
    }

    fn pointer(&mut self, msg: PointerMsg) {
        self.send(GestureMsg::Pointer(msg))
            .expect("pointer messages never fail");
    }

    /// Move the clock forward and fire due timers
    pub fn advance(&mut self, ms: u64) {
        self.now += Duration::from_millis(ms);
        self.send(GestureMsg::Tick(self.now)).unwrap();
    }

    pub fn down(&mut self, at: Point) {
        let time = self.now;
        self.pointer(PointerMsg::Down { position: at, time });
    }

    pub fn move_to(&mut self, at: Point) {
        let time = self.now;
        self.pointer(PointerMsg::Move { position: at, time });
    }

    pub fn up(&mut self, at: Point) {
        let time = self.now;
        self.pointer(PointerMsg::Up { position: at, time });
        self.frame();
    }

    pub fn cancel(&mut self) {
        let time = self.now;
        self.pointer(PointerMsg::Cancel { time });
        self.frame();
    }

    pub fn frame(&mut self) {
        self.send(GestureMsg::FrameEnd).unwrap();
    }

    pub fn tap(&mut self, at: Point) {
        self.down(at);
        self.up(at);
    }

    /// Press at `at` and hold until the long-press deadline has passed
    pub fn long_press(&mut self, at: Point) {
        self.down(at);
        let timeout = self.interactor.config().long_press_timeout_ms;
        self.advance(timeout);
        self.frame();
    }

    /// Scroll the viewport and notify the interactor
    pub fn scroll_by(&mut self, dy: f64) {
        assert!(self.host.viewport.scroll_by(dy), "viewport did not scroll");
        self.send(GestureMsg::ScrollChanged).unwrap();
    }

    pub fn handle_start(&mut self, handle: HandleType) -> Result<(), GestureError> {
        self.send(GestureMsg::Handle(HandleMsg::DragStart { handle }))
    }

    pub fn handle_move(&mut self, dx: f64, dy: f64) -> Result<(), GestureError> {
        self.send(GestureMsg::Handle(HandleMsg::DragUpdate {
            delta: Point::new(dx, dy),
        }))
    }

    pub fn handle_end(&mut self) -> Result<(), GestureError> {
        let time = self.now;
        let result = self.send(GestureMsg::Handle(HandleMsg::DragEnd { time }));
        self.frame();
        result
    }

    pub fn handle_cancel(&mut self) -> Result<(), GestureError> {
        let time = self.now;
        let result = self.send(GestureMsg::Handle(HandleMsg::DragCancel { time }));
        self.frame();
        result
    }

    /// Put a selection in place without going through a gesture
    pub fn set_selection(&mut self, selection: DocumentSelection) {
        self.host.editor.set_selection(Some(selection));
    }

    pub fn selection(&self) -> Option<DocumentSelection> {
        self.host.editor.selection()
    }

    pub fn selected_text(&self) -> String {
        self.selection()
            .map(|s| self.host.document.selected_text(&s))
            .unwrap_or_default()
    }

    pub fn controls(&self) -> &ControlsController {
        self.interactor.controls()
    }

    pub fn selection_change_count(&self) -> usize {
        self.host.editor.selection_changes().len()
    }
}
