//! Touch interactor: turns raw pointer events into selection changes
//!
//! The interactor is a single state machine over the pointer's life:
//!
//! ```text
//! Idle --down--> Pressed --up--------------------------> tap (1/2/3) --> Idle
//!                   |--long-press deadline--> LongPress --up/cancel----> Idle
//!                   |--moved past slop, on caret--> CaretDrag --up-----> Idle
//!                   '--moved past slop-----------> ScrollDrag --up-----> Idle
//! Idle --handle overlay--> HandleDrag --end/cancel--------------------> Idle
//! ```
//!
//! Only one phase exists at a time, so at most one gesture session
//! (long-press, caret drag or handle drag) is ever alive.
//!
//! Collaborators are borrowed per call through [`GestureContext`]. Time is
//! whatever the host says it is: events carry an `Instant` and timers fire
//! from [`TouchInteractor::on_tick`].

use std::time::{Duration, Instant};

use crate::config::GestureConfig;
use crate::controls::ControlsController;
use crate::document::{DocumentPosition, DocumentSelection, HandleType, SelectionChangeKind};
use crate::drag_handle::DragHandleSession;
use crate::error::GestureError;
use crate::focal::{magnifier_focal_point, DragFocus, FocalPoints};
use crate::geometry::Point;
use crate::host::{GestureContext, TapDetails, TapHandler, TapOutcome};
use crate::long_press::LongPressSession;
use crate::tap::{TapCount, TapTracker};
use crate::timer::{Countdown, FrameCallbacks, FrameTask};

/// A pointer that is down but not yet resolved into a gesture
#[derive(Debug, Clone, Copy)]
struct Press {
    down: Point,
    /// The viewport was already moving when the pointer went down; a tap that
    /// merely stops scroll momentum must not move the caret.
    was_scrolling: bool,
    /// The long-press deadline passed but nothing selectable was under the
    /// finger. The press can no longer become a tap.
    long_press_rejected: bool,
}

/// A finger that rests longer than this before lifting releases without momentum
const RELEASE_VELOCITY_WINDOW: Duration = Duration::from_millis(100);

/// A drag that belongs to the scroll view
#[derive(Debug, Clone, Copy)]
struct ScrollDrag {
    last: Point,
    last_time: Instant,
    velocity: Point,
}

impl ScrollDrag {
    fn track(&mut self, position: Point, time: Instant) -> Point {
        let delta = position - self.last;
        let dt = time.saturating_duration_since(self.last_time).as_secs_f64();
        if dt > 0.0 {
            self.velocity = delta.scale(1.0 / dt);
        }
        self.last = position;
        self.last_time = time;
        delta
    }

    fn release_velocity(&self, time: Instant) -> Point {
        if time.saturating_duration_since(self.last_time) > RELEASE_VELOCITY_WINDOW {
            Point::ZERO
        } else {
            self.velocity
        }
    }
}

/// Dragging the caret itself (drag started on a collapsed selection)
#[derive(Debug, Clone)]
struct CaretDragSession {
    focus: DragFocus,
    /// Global position of the finger at the previous move
    last: Point,
}

impl CaretDragSession {
    fn start(
        ctx: &GestureContext<'_>,
        controls: &mut ControlsController,
        start: Point,
        finger: Point,
    ) -> Self {
        controls.cancel_collapsed_handle_auto_hide_countdown();
        controls.hide_toolbar();
        controls.show_magnifier();
        controls.do_not_blink_caret();
        tracing::debug!("caret drag started");
        Self {
            focus: DragFocus::new(start, ctx.viewport.scroll_offset()),
            last: finger,
        }
    }

    fn move_to(
        &mut self,
        ctx: &mut GestureContext<'_>,
        controls: &mut ControlsController,
        focal_points: &mut FocalPoints,
        finger: Point,
    ) {
        self.focus.add_finger_delta(finger - self.last);
        self.last = finger;
        let finger = self.focus.document_offset(ctx.viewport.scroll_offset());
        let Some(nearest) = ctx.layout.position_nearest(finger) else {
            return;
        };

        let line = ctx.layout.rect_for_position(&nearest);
        focal_points.set_magnifier(magnifier_focal_point(finger, line));

        let next = DocumentSelection::collapsed(nearest);
        let changed = ctx
            .editor
            .selection()
            .map_or(true, |current| !current.is_equivalent_to(&next));
        if changed {
            tracing::trace!("caret drag selects {}", next);
            ctx.select(next, SelectionChangeKind::PlaceCaret);
            controls.jump_caret_to_opaque();
        }
    }

    fn end(
        self,
        ctx: &GestureContext<'_>,
        controls: &mut ControlsController,
        focal_points: &mut FocalPoints,
        now: Instant,
    ) {
        focal_points.clear_magnifier();
        controls.hide_magnifier();
        controls.blink_caret();
        if ctx.editor.selection().is_some_and(|s| s.is_collapsed()) {
            controls.show_collapsed_handle();
            controls.start_collapsed_handle_auto_hide_countdown(now);
        }
        tracing::debug!("caret drag ended");
    }
}

enum Phase {
    Idle,
    Pressed(Press),
    ScrollDrag(ScrollDrag),
    CaretDrag(CaretDragSession),
    LongPress {
        session: LongPressSession,
        dragging: bool,
        last: Point,
    },
    HandleDrag(DragHandleSession),
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Pressed(_) => "press",
            Phase::ScrollDrag(_) => "scroll drag",
            Phase::CaretDrag(_) => "caret drag",
            Phase::LongPress { .. } => "long-press",
            Phase::HandleDrag(_) => "handle drag",
        }
    }
}

pub struct TouchInteractor {
    config: GestureConfig,
    controls: ControlsController,
    focal_points: FocalPoints,
    taps: TapTracker,
    long_press_timer: Countdown,
    phase: Phase,
    listening_to_scroll: bool,
    frame: FrameCallbacks,
    tap_handler: Option<Box<dyn TapHandler>>,
}

impl TouchInteractor {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            controls: ControlsController::new(config.collapsed_handle_auto_hide()),
            focal_points: FocalPoints::new(),
            taps: TapTracker::new(config.double_tap_timeout(), config.double_tap_slop),
            long_press_timer: Countdown::new(),
            phase: Phase::Idle,
            listening_to_scroll: false,
            frame: FrameCallbacks::new(),
            tap_handler: None,
            config,
        }
    }

    /// Install an application hook that sees taps before the default handling
    pub fn with_tap_handler(mut self, handler: Box<dyn TapHandler>) -> Self {
        self.tap_handler = Some(handler);
        self
    }

    pub fn set_tap_handler(&mut self, handler: Option<Box<dyn TapHandler>>) {
        self.tap_handler = handler;
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn controls(&self) -> &ControlsController {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut ControlsController {
        &mut self.controls
    }

    pub fn focal_points(&self) -> &FocalPoints {
        &self.focal_points
    }

    pub fn is_long_press_in_progress(&self) -> bool {
        matches!(self.phase, Phase::LongPress { .. })
    }

    pub fn is_caret_drag_in_progress(&self) -> bool {
        matches!(self.phase, Phase::CaretDrag(_))
    }

    pub fn is_handle_drag_in_progress(&self) -> bool {
        matches!(self.phase, Phase::HandleDrag(_))
    }

    pub fn is_scroll_drag_in_progress(&self) -> bool {
        matches!(self.phase, Phase::ScrollDrag(_))
    }

    /// Whether scroll-change notifications are currently being acted on
    pub fn is_listening_to_scroll(&self) -> bool {
        self.listening_to_scroll
    }

    /// Whether a long-press deadline is pending
    pub fn is_long_press_pending(&self) -> bool {
        self.long_press_timer.is_pending()
    }

    /// Name of the gesture that owns the pointer, if any
    pub fn active_gesture(&self) -> Option<&'static str> {
        match self.phase {
            Phase::Idle | Phase::Pressed(_) => None,
            ref phase => Some(phase.name()),
        }
    }

    // ========================================================================
    // Pointer events
    // ========================================================================

    pub fn on_pointer_down(&mut self, ctx: &mut GestureContext<'_>, position: Point, time: Instant) {
        if !matches!(self.phase, Phase::Idle) {
            tracing::debug!("pointer down ignored during {}", self.phase.name());
            return;
        }

        let was_scrolling = ctx.viewport.is_scrolling();
        if self.config.multi_tap_enabled {
            self.long_press_timer
                .start(time, self.config.long_press_timeout());
        }

        tracing::trace!("pointer down at {:?} (scrolling: {})", position, was_scrolling);
        self.phase = Phase::Pressed(Press {
            down: position,
            was_scrolling,
            long_press_rejected: false,
        });
    }

    pub fn on_pointer_move(&mut self, ctx: &mut GestureContext<'_>, position: Point, time: Instant) {
        match &mut self.phase {
            Phase::Idle | Phase::HandleDrag(_) => {}
            Phase::Pressed(press) => {
                if press.down.distance_to(position) <= self.config.touch_slop {
                    return;
                }
                let press = *press;
                self.long_press_timer.cancel();
                self.taps.reset();
                self.begin_drag(ctx, press, position, time);
            }
            Phase::ScrollDrag(drag) => {
                let delta = drag.track(position, time);
                ctx.viewport.update_drag(delta);
            }
            Phase::CaretDrag(session) => {
                session.move_to(ctx, &mut self.controls, &mut self.focal_points, position);
                self.frame.schedule(FrameTask::SyncFocalPoints);
            }
            Phase::LongPress {
                session,
                dragging,
                last,
            } => {
                if !*dragging {
                    *dragging = true;
                    session.on_pan_start(&mut self.controls);
                }
                let delta = position - *last;
                *last = position;
                session.on_pan_update(ctx, &mut self.focal_points, delta);
                self.frame.schedule(FrameTask::SyncFocalPoints);
            }
        }
    }

    pub fn on_pointer_up(&mut self, ctx: &mut GestureContext<'_>, position: Point, time: Instant) {
        self.long_press_timer.cancel();
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => {}
            phase @ Phase::HandleDrag(_) => self.phase = phase,
            Phase::Pressed(press) => {
                if press.was_scrolling {
                    tracing::debug!("tap stopped scroll momentum; selection unchanged");
                    self.taps.reset();
                } else if press.long_press_rejected {
                    self.taps.reset();
                } else {
                    self.on_tap_up(ctx, position, time);
                }
            }
            Phase::ScrollDrag(mut drag) => {
                if position != drag.last {
                    let delta = drag.track(position, time);
                    ctx.viewport.update_drag(delta);
                }
                let velocity = drag.release_velocity(time);
                tracing::debug!("scroll drag released at {:?} px/s", velocity);
                ctx.viewport.end_drag(velocity);
            }
            Phase::CaretDrag(session) => {
                session.end(ctx, &mut self.controls, &mut self.focal_points, time);
                self.frame.schedule(FrameTask::SyncFocalPoints);
            }
            Phase::LongPress { session, .. } => self.end_long_press(ctx, session),
        }
    }

    pub fn on_pointer_cancel(&mut self, ctx: &mut GestureContext<'_>, time: Instant) {
        self.long_press_timer.cancel();
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle | Phase::Pressed(_) => {}
            phase @ Phase::HandleDrag(_) => self.phase = phase,
            Phase::ScrollDrag(_) => {
                tracing::debug!("scroll drag cancelled");
                ctx.viewport.cancel_drag();
            }
            Phase::CaretDrag(session) => {
                session.end(ctx, &mut self.controls, &mut self.focal_points, time);
                self.frame.schedule(FrameTask::SyncFocalPoints);
            }
            Phase::LongPress { session, .. } => self.end_long_press(ctx, session),
        }
    }

    /// Advance timers: the long-press deadline and the handle auto-hide
    pub fn on_tick(&mut self, ctx: &mut GestureContext<'_>, now: Instant) {
        self.controls.tick(now);

        if self.long_press_timer.poll(now) {
            if let Phase::Pressed(press) = self.phase {
                self.on_long_press(ctx, press);
            }
        }
    }

    /// The viewport's scroll offset changed
    pub fn on_scroll_changed(&mut self, ctx: &mut GestureContext<'_>) {
        if !self.listening_to_scroll {
            return;
        }
        match &mut self.phase {
            Phase::LongPress { session, .. } => {
                session.on_scroll_changed(ctx, &mut self.focal_points);
            }
            Phase::HandleDrag(session) => {
                session.on_scroll_changed(ctx, &mut self.focal_points);
            }
            _ => return,
        }
        self.frame.schedule(FrameTask::SyncFocalPoints);
    }

    /// Run work deferred until the host has laid out the current frame
    pub fn on_frame_end(&mut self, ctx: &mut GestureContext<'_>) {
        for task in self.frame.drain() {
            match task {
                FrameTask::SyncFocalPoints => {
                    let selection = ctx.editor.selection();
                    self.focal_points
                        .sync_to_selection(selection.as_ref(), ctx.layout);
                }
            }
        }
    }

    // ========================================================================
    // Handle overlay events
    // ========================================================================

    /// The user put a finger on a visible handle and started dragging it
    pub fn on_handle_drag_start(
        &mut self,
        ctx: &mut GestureContext<'_>,
        handle: HandleType,
    ) -> Result<(), GestureError> {
        if let Some(active) = self.active_gesture() {
            return Err(GestureError::SessionActive {
                requested: "handle drag",
                active,
            });
        }

        let session = DragHandleSession::start(ctx, &mut self.controls, handle)?;
        // A press that reached the document under the handle is abandoned.
        self.long_press_timer.cancel();
        self.start_listening_to_scroll();
        self.phase = Phase::HandleDrag(session);
        Ok(())
    }

    pub fn on_handle_drag_update(
        &mut self,
        ctx: &mut GestureContext<'_>,
        delta: Point,
    ) -> Result<(), GestureError> {
        match &mut self.phase {
            Phase::HandleDrag(session) => {
                session.update(ctx, &mut self.focal_points, delta);
                // Handles follow the selection while the finger is still down.
                self.frame.schedule(FrameTask::SyncFocalPoints);
                Ok(())
            }
            _ => Err(GestureError::NoActiveDrag),
        }
    }

    pub fn on_handle_drag_end(
        &mut self,
        ctx: &mut GestureContext<'_>,
        time: Instant,
    ) -> Result<(), GestureError> {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::HandleDrag(session) => {
                session.end(ctx, &mut self.controls, &mut self.focal_points, time);
                self.stop_listening_to_scroll();
                self.frame.schedule(FrameTask::SyncFocalPoints);
                Ok(())
            }
            phase => {
                self.phase = phase;
                Err(GestureError::NoActiveDrag)
            }
        }
    }

    /// Cancellation tears the session down exactly like a release
    pub fn on_handle_drag_cancel(
        &mut self,
        ctx: &mut GestureContext<'_>,
        time: Instant,
    ) -> Result<(), GestureError> {
        self.on_handle_drag_end(ctx, time)
    }

    /// Tear down any live gesture and cancel timers
    pub fn dispose(mut self, ctx: &mut GestureContext<'_>) {
        self.long_press_timer.cancel();
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::ScrollDrag(_) => ctx.viewport.cancel_drag(),
            Phase::LongPress { .. } | Phase::HandleDrag(_) => ctx.auto_scroller.stop_monitoring(),
            Phase::Idle | Phase::Pressed(_) | Phase::CaretDrag(_) => {}
        }
        self.stop_listening_to_scroll();
        self.controls.dispose();
        tracing::debug!("touch interactor disposed");
    }

    // ========================================================================
    // Drag recognition
    // ========================================================================

    fn begin_drag(
        &mut self,
        ctx: &mut GestureContext<'_>,
        press: Press,
        position: Point,
        time: Instant,
    ) {
        let start = ctx.viewport.global_to_document(press.down);
        let over_caret = ctx
            .editor
            .selection()
            .filter(|selection| selection.is_collapsed())
            .zip(ctx.layout.position_nearest(start))
            .is_some_and(|(caret, pressed)| caret.extent.is_equivalent_to(&pressed));

        if over_caret {
            let mut session = CaretDragSession::start(ctx, &mut self.controls, start, press.down);
            session.move_to(ctx, &mut self.controls, &mut self.focal_points, position);
            self.frame.schedule(FrameTask::SyncFocalPoints);
            self.phase = Phase::CaretDrag(session);
        } else {
            tracing::debug!("drag handed to the scroll view");
            ctx.viewport.begin_drag(press.down);
            ctx.viewport.update_drag(position - press.down);
            self.phase = Phase::ScrollDrag(ScrollDrag {
                last: position,
                last_time: time,
                velocity: Point::ZERO,
            });
        }
    }

    // ========================================================================
    // Long-press
    // ========================================================================

    fn on_long_press(&mut self, ctx: &mut GestureContext<'_>, press: Press) {
        let start = ctx.viewport.global_to_document(press.down);
        let Some(session) = LongPressSession::start(ctx, start) else {
            tracing::debug!("long-press found nothing to select");
            self.phase = Phase::Pressed(Press {
                long_press_rejected: true,
                ..press
            });
            return;
        };

        self.taps.reset();
        self.controls.hide_collapsed_handle();
        self.controls.hide_expanded_handles();
        self.controls.hide_magnifier();
        self.controls.show_toolbar();
        ctx.platform.request_focus();
        self.start_listening_to_scroll();
        self.frame.schedule(FrameTask::SyncFocalPoints);

        // Deltas are measured from the press point so travel inside the slop
        // before the deadline is not lost.
        self.phase = Phase::LongPress {
            session,
            dragging: false,
            last: press.down,
        };
    }

    fn end_long_press(&mut self, ctx: &mut GestureContext<'_>, session: LongPressSession) {
        session.end(ctx, &mut self.controls, &mut self.focal_points);
        self.stop_listening_to_scroll();
        self.frame.schedule(FrameTask::SyncFocalPoints);
    }

    fn start_listening_to_scroll(&mut self) {
        self.listening_to_scroll = true;
    }

    /// Safe to call more than once
    fn stop_listening_to_scroll(&mut self) {
        if std::mem::take(&mut self.listening_to_scroll) {
            tracing::trace!("stopped listening to scroll changes");
        }
    }

    // ========================================================================
    // Taps
    // ========================================================================

    fn on_tap_up(&mut self, ctx: &mut GestureContext<'_>, position: Point, time: Instant) {
        let count = if self.config.multi_tap_enabled {
            self.taps.track_tap(position, time)
        } else {
            TapCount::Single
        };

        let document_offset = ctx.viewport.global_to_document(position);
        let tapped = ctx.layout.position_nearest(document_offset);

        if let Some(handler) = self.tap_handler.as_mut() {
            let details = TapDetails {
                global_position: position,
                document_offset,
                position: tapped.clone(),
            };
            let outcome = match count {
                TapCount::Single => handler.on_tap(&details),
                TapCount::Double => handler.on_double_tap(&details),
                TapCount::Triple => handler.on_triple_tap(&details),
            };
            if outcome == TapOutcome::Halt {
                tracing::debug!("{:?} tap handled by application", count);
                return;
            }
        }

        let previous = ctx.editor.selection();
        let tapped_on_caret = match (&previous, &tapped) {
            (Some(previous), Some(tapped)) => {
                previous.is_collapsed() && previous.extent.is_equivalent_to(tapped)
            }
            _ => false,
        };

        tracing::debug!("{:?} tap at {:?}", count, tapped);
        let resulting = match count {
            TapCount::Single => select_caret_at(ctx, tapped.as_ref()),
            TapCount::Double => select_word_at(ctx, tapped.as_ref()),
            TapCount::Triple => select_paragraph_at(ctx, tapped.as_ref()),
        };

        self.apply_post_tap_visibility(resulting.as_ref(), tapped_on_caret, time);
        ctx.platform.request_focus();
        self.frame.schedule(FrameTask::SyncFocalPoints);
    }

    fn apply_post_tap_visibility(
        &mut self,
        resulting: Option<&DocumentSelection>,
        tapped_on_caret: bool,
        now: Instant,
    ) {
        let controls = &mut self.controls;
        controls.hide_magnifier();

        match resulting {
            None => {
                controls.hide_collapsed_handle();
                controls.hide_expanded_handles();
                controls.hide_toolbar();
                controls.do_not_blink_caret();
            }
            Some(selection) if !selection.is_collapsed() => {
                controls.show_expanded_handles();
                controls.show_toolbar();
                controls.do_not_blink_caret();
            }
            Some(_) => {
                controls.show_collapsed_handle();
                controls.start_collapsed_handle_auto_hide_countdown(now);
                if tapped_on_caret {
                    controls.toggle_toolbar();
                } else {
                    controls.hide_toolbar();
                }
                controls.blink_caret();
                controls.jump_caret_to_opaque();
            }
        }
    }
}

/// Single tap: place the caret, repairing taps on unselectable content
fn select_caret_at(
    ctx: &mut GestureContext<'_>,
    tapped: Option<&DocumentPosition>,
) -> Option<DocumentSelection> {
    let Some(position) = tapped else {
        ctx.clear_selection();
        return None;
    };

    let caret = if ctx.layout.is_selectable(&position.node_id) {
        position.clone()
    } else {
        match ctx.layout.nearest_selectable_position(&position.node_id) {
            Some(repaired) => {
                tracing::debug!("tap on unselectable {}; moved to {}", position.node_id, repaired);
                repaired
            }
            None => {
                ctx.clear_selection();
                return None;
            }
        }
    };

    let selection = DocumentSelection::collapsed(caret);
    ctx.select(selection.clone(), SelectionChangeKind::PlaceCaret);
    Some(selection)
}

/// Double tap: word, else atomic block, else caret
fn select_word_at(
    ctx: &mut GestureContext<'_>,
    tapped: Option<&DocumentPosition>,
) -> Option<DocumentSelection> {
    let Some(position) = tapped else {
        ctx.clear_selection();
        return None;
    };
    if !ctx.layout.is_selectable(&position.node_id) {
        return ctx.editor.selection();
    }

    let selection = ctx
        .layout
        .word_selection_at(position)
        .or_else(|| ctx.layout.block_selection_at(position))
        .unwrap_or_else(|| DocumentSelection::collapsed(position.clone()));
    ctx.select(selection.clone(), change_kind(&selection));
    Some(selection)
}

/// Triple tap: paragraph, else caret
fn select_paragraph_at(
    ctx: &mut GestureContext<'_>,
    tapped: Option<&DocumentPosition>,
) -> Option<DocumentSelection> {
    let Some(position) = tapped else {
        ctx.clear_selection();
        return None;
    };
    if !ctx.layout.is_selectable(&position.node_id) {
        return ctx.editor.selection();
    }

    let selection = ctx
        .layout
        .paragraph_selection_at(position)
        .unwrap_or_else(|| DocumentSelection::collapsed(position.clone()));
    ctx.select(selection.clone(), change_kind(&selection));
    Some(selection)
}

fn change_kind(selection: &DocumentSelection) -> SelectionChangeKind {
    if selection.is_collapsed() {
        SelectionChangeKind::PlaceCaret
    } else {
        SelectionChangeKind::ExpandSelection
    }
}
