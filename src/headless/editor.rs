//! Recording collaborators: an editor, an auto-scroller and a platform that
//! remember every request made of them

use anyhow::bail;

use crate::document::{DocumentSelection, SelectionChangeKind, SelectionReason};
use crate::geometry::Point;
use crate::host::{AutoScroller, Platform, SelectionMutator};

/// A request received by [`RecordingEditor`]
#[derive(Debug, Clone, PartialEq)]
pub enum EditorRequest {
    ChangeSelection {
        selection: DocumentSelection,
        kind: SelectionChangeKind,
        reason: SelectionReason,
    },
    ClearSelection,
    ClearComposingRegion,
}

/// Applies selection requests immediately and logs them
#[derive(Debug, Clone, Default)]
pub struct RecordingEditor {
    selection: Option<DocumentSelection>,
    requests: Vec<EditorRequest>,
}

impl RecordingEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selection(selection: DocumentSelection) -> Self {
        Self {
            selection: Some(selection),
            requests: Vec::new(),
        }
    }

    /// Change the selection without logging, as another input source would
    pub fn set_selection(&mut self, selection: Option<DocumentSelection>) {
        self.selection = selection;
    }

    pub fn requests(&self) -> &[EditorRequest] {
        &self.requests
    }

    pub fn take_requests(&mut self) -> Vec<EditorRequest> {
        std::mem::take(&mut self.requests)
    }

    /// Selection changes requested so far, oldest first
    pub fn selection_changes(&self) -> Vec<(DocumentSelection, SelectionChangeKind)> {
        self.requests
            .iter()
            .filter_map(|request| match request {
                EditorRequest::ChangeSelection {
                    selection, kind, ..
                } => Some((selection.clone(), *kind)),
                _ => None,
            })
            .collect()
    }
}

impl SelectionMutator for RecordingEditor {
    fn selection(&self) -> Option<DocumentSelection> {
        self.selection.clone()
    }

    fn request_selection_change(
        &mut self,
        selection: DocumentSelection,
        kind: SelectionChangeKind,
        reason: SelectionReason,
    ) {
        self.selection = Some(selection.clone());
        self.requests.push(EditorRequest::ChangeSelection {
            selection,
            kind,
            reason,
        });
    }

    fn request_clear_selection(&mut self) {
        self.selection = None;
        self.requests.push(EditorRequest::ClearSelection);
    }

    fn request_clear_composing_region(&mut self) {
        self.requests.push(EditorRequest::ClearComposingRegion);
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingAutoScroller {
    monitoring: bool,
    starts: usize,
    stops: usize,
    targets: Vec<Point>,
}

impl RecordingAutoScroller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitoring
    }

    pub fn starts(&self) -> usize {
        self.starts
    }

    pub fn stops(&self) -> usize {
        self.stops
    }

    /// Viewport-space targets received while monitoring
    pub fn targets(&self) -> &[Point] {
        &self.targets
    }

    pub fn last_target(&self) -> Option<Point> {
        self.targets.last().copied()
    }
}

impl AutoScroller for RecordingAutoScroller {
    fn start_monitoring(&mut self) {
        self.monitoring = true;
        self.starts += 1;
    }

    fn stop_monitoring(&mut self) {
        self.monitoring = false;
        self.stops += 1;
    }

    fn update_target(&mut self, viewport_offset: Point) {
        if self.monitoring {
            self.targets.push(viewport_offset);
        }
    }
}

#[derive(Debug, Clone)]
pub struct HeadlessPlatform {
    haptics_available: bool,
    focus_requests: usize,
    haptic_pulses: usize,
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self {
            haptics_available: true,
            focus_requests: 0,
            haptic_pulses: 0,
        }
    }
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// A platform whose haptic engine always fails
    pub fn without_haptics() -> Self {
        Self {
            haptics_available: false,
            ..Self::default()
        }
    }

    pub fn focus_requests(&self) -> usize {
        self.focus_requests
    }

    pub fn haptic_pulses(&self) -> usize {
        self.haptic_pulses
    }
}

impl Platform for HeadlessPlatform {
    fn request_focus(&mut self) {
        self.focus_requests += 1;
    }

    fn haptic_feedback(&mut self) -> anyhow::Result<()> {
        if !self.haptics_available {
            bail!("no haptic engine on this device");
        }
        self.haptic_pulses += 1;
        Ok(())
    }
}
