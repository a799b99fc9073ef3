//! doc-touch - touch gestures for a rich-text document
//!
//! This crate turns raw pointer events into selection changes and overlay
//! visibility (caret, handles, magnifier, toolbar) following the Elm
//! Architecture pattern: messages in, state transitions through `update`.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod controls;
pub mod document;
pub mod drag_handle;
pub mod error;
pub mod focal;
pub mod geometry;
pub mod headless;
pub mod host;
pub mod interactor;
pub mod long_press;
pub mod messages;
pub mod replay;
pub mod tap;
pub mod timer;
pub mod tracing;
pub mod update;
pub mod util;

// Re-export commonly used types
pub use config::GestureConfig;
pub use controls::{Control, ControlsController, ControlsSignal};
pub use document::{DocumentPosition, DocumentSelection, HandleType, NodeId, NodePosition};
pub use error::GestureError;
pub use geometry::{Point, Rect};
pub use host::GestureContext;
pub use interactor::TouchInteractor;
pub use messages::GestureMsg;
