//! Message types for the Elm-style architecture
//!
//! Every input the gesture layer reacts to is one of these messages.

use std::time::Instant;

use crate::document::HandleType;
use crate::geometry::Point;

/// Pointer events from the document's hit-test area (global coordinates)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerMsg {
    Down { position: Point, time: Instant },
    Move { position: Point, time: Instant },
    Up { position: Point, time: Instant },
    Cancel { time: Instant },
}

/// Events from the handle overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandleMsg {
    DragStart { handle: HandleType },
    /// The handle moved by a global-space delta
    DragUpdate { delta: Point },
    DragEnd { time: Instant },
    DragCancel { time: Instant },
}

/// Top-level gesture message
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureMsg {
    Pointer(PointerMsg),
    Handle(HandleMsg),
    /// Time advanced; fires due timers
    Tick(Instant),
    /// The viewport's scroll offset changed
    ScrollChanged,
    /// The host finished laying out a frame
    FrameEnd,
}

impl GestureMsg {
    /// Messages that arrive every frame and would flood the log
    pub fn is_noisy(&self) -> bool {
        matches!(
            self,
            GestureMsg::Tick(_) | GestureMsg::FrameEnd | GestureMsg::ScrollChanged
        )
    }

    /// Short display name for logging
    pub fn name(&self) -> String {
        match self {
            GestureMsg::Pointer(m) => format!("Pointer::{:?}", m),
            GestureMsg::Handle(m) => format!("Handle::{:?}", m),
            GestureMsg::Tick(_) => "Tick".to_string(),
            GestureMsg::ScrollChanged => "ScrollChanged".to_string(),
            GestureMsg::FrameEnd => "FrameEnd".to_string(),
        }
    }
}
