//! Contract violations raised by the gesture layer
//!
//! These indicate that the visual layer wired a handler to a state that
//! cannot exist (dragging a handle that should not be visible, updating a
//! drag that never started). They are programmer errors, not user errors.

use crate::document::{DocumentPosition, HandleType};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GestureError {
    #[error("cannot drag the {handle:?} handle without a selection")]
    NoSelection { handle: HandleType },

    #[error("the {handle:?} handle cannot be dragged on a {} selection", collapse_label(.collapsed))]
    HandleMismatch { handle: HandleType, collapsed: bool },

    #[error("no handle drag is in progress")]
    NoActiveDrag,

    #[error("cannot start a {requested} while a {active} is in progress")]
    SessionActive {
        requested: &'static str,
        active: &'static str,
    },

    #[error("no layout rectangle for position {0}")]
    MissingLayout(DocumentPosition),
}

fn collapse_label(collapsed: &bool) -> &'static str {
    if *collapsed {
        "collapsed"
    } else {
        "expanded"
    }
}
