//! Headless host: every collaborator the gesture layer needs, without a UI
//!
//! Used by the replay tool, the integration tests and the benches.

pub mod editor;
pub mod layout;
pub mod viewport;

pub use editor::{EditorRequest, HeadlessPlatform, RecordingAutoScroller, RecordingEditor};
pub use layout::{MonospaceDocument, NodeKind, TextMetrics};
pub use viewport::{ScrollViewport, ViewportCall};

use crate::host::GestureContext;

/// Default viewport height for [`HeadlessHost::new`]
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 600.0;

#[derive(Debug, Clone)]
pub struct HeadlessHost {
    pub document: MonospaceDocument,
    pub viewport: ScrollViewport,
    pub editor: RecordingEditor,
    pub auto_scroller: RecordingAutoScroller,
    pub platform: HeadlessPlatform,
}

impl HeadlessHost {
    pub fn new(document: MonospaceDocument) -> Self {
        Self::with_viewport_height(document, DEFAULT_VIEWPORT_HEIGHT)
    }

    pub fn with_viewport_height(document: MonospaceDocument, height: f64) -> Self {
        let viewport = ScrollViewport::new(height, document.content_height());
        Self {
            document,
            viewport,
            editor: RecordingEditor::new(),
            auto_scroller: RecordingAutoScroller::new(),
            platform: HeadlessPlatform::new(),
        }
    }

    /// Borrow everything for one gesture event
    pub fn context(&mut self) -> GestureContext<'_> {
        GestureContext {
            layout: &self.document,
            viewport: &mut self.viewport,
            editor: &mut self.editor,
            auto_scroller: &mut self.auto_scroller,
            platform: &mut self.platform,
        }
    }
}
