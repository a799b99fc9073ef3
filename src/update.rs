//! Update function for the Elm-style architecture
//!
//! All gesture input flows through [`update`], which routes each message to
//! the interactor.

use crate::error::GestureError;
use crate::host::GestureContext;
use crate::interactor::TouchInteractor;
use crate::messages::{GestureMsg, HandleMsg, PointerMsg};

#[cfg(debug_assertions)]
use crate::tracing::ControlsSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

/// Main update function
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(
    interactor: &mut TouchInteractor,
    ctx: &mut GestureContext<'_>,
    msg: GestureMsg,
) -> Result<(), GestureError> {
    #[cfg(debug_assertions)]
    {
        update_traced(interactor, ctx, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(interactor, ctx, msg)
    }
}

fn update_inner(
    interactor: &mut TouchInteractor,
    ctx: &mut GestureContext<'_>,
    msg: GestureMsg,
) -> Result<(), GestureError> {
    match msg {
        GestureMsg::Pointer(PointerMsg::Down { position, time }) => {
            interactor.on_pointer_down(ctx, position, time)
        }
        GestureMsg::Pointer(PointerMsg::Move { position, time }) => {
            interactor.on_pointer_move(ctx, position, time)
        }
        GestureMsg::Pointer(PointerMsg::Up { position, time }) => {
            interactor.on_pointer_up(ctx, position, time)
        }
        GestureMsg::Pointer(PointerMsg::Cancel { time }) => interactor.on_pointer_cancel(ctx, time),
        GestureMsg::Handle(HandleMsg::DragStart { handle }) => {
            return interactor.on_handle_drag_start(ctx, handle)
        }
        GestureMsg::Handle(HandleMsg::DragUpdate { delta }) => {
            return interactor.on_handle_drag_update(ctx, delta)
        }
        GestureMsg::Handle(HandleMsg::DragEnd { time }) => {
            return interactor.on_handle_drag_end(ctx, time)
        }
        GestureMsg::Handle(HandleMsg::DragCancel { time }) => {
            return interactor.on_handle_drag_cancel(ctx, time)
        }
        GestureMsg::Tick(now) => interactor.on_tick(ctx, now),
        GestureMsg::ScrollChanged => interactor.on_scroll_changed(ctx),
        GestureMsg::FrameEnd => interactor.on_frame_end(ctx),
    }
    Ok(())
}

/// Traced update wrapper (debug builds only)
///
/// Logs the message and any change in overlay visibility it caused.
#[cfg(debug_assertions)]
fn update_traced(
    interactor: &mut TouchInteractor,
    ctx: &mut GestureContext<'_>,
    msg: GestureMsg,
) -> Result<(), GestureError> {
    let is_noisy = msg.is_noisy();
    let msg_name = msg.name();
    let _span = if is_noisy {
        None
    } else {
        Some(span!(Level::DEBUG, "update", msg = %msg_name).entered())
    };

    let before = ControlsSnapshot::from_controls(interactor.controls());
    if !is_noisy {
        debug!(target: "message", msg = %msg_name, "processing");
    }

    let result = update_inner(interactor, ctx, msg);

    let after = ControlsSnapshot::from_controls(interactor.controls());
    if let Some(diff) = before.diff(&after) {
        debug!(target: "controls", %diff, "visibility changed");
    }
    debug_assert!(
        !(after.collapsed_handle && after.expanded_handles),
        "{}: collapsed and expanded handles visible together",
        msg_name
    );

    if let Err(ref err) = result {
        debug!(target: "message", msg = %msg_name, %err, "rejected");
    }
    result
}
