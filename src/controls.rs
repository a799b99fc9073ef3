//! Visibility of the touch selection controls
//!
//! One state object owns every flag the overlay layer reads: caret blink,
//! the collapsed handle, the expanded handles, the magnifier and the toolbar,
//! plus the countdown that hides an idle collapsed handle. All changes go
//! through the transition methods below so the handle exclusion invariant
//! (collapsed and expanded handles never shown together) has one choke point.
//!
//! Overlay layers learn about changes by draining [`ControlsSignal`]s.

use std::time::{Duration, Instant};

use crate::timer::Countdown;

/// The controls whose visibility is tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    CaretBlink,
    CollapsedHandle,
    ExpandedHandles,
    Magnifier,
    Toolbar,
}

/// A change the overlay layer should react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlsSignal {
    /// A visibility flag changed to the given value
    Changed(Control, bool),
    /// Show the caret at full opacity right now, restarting its blink cycle
    JumpCaretToOpaque,
}

#[derive(Debug, Clone)]
pub struct ControlsController {
    caret_blink: bool,
    collapsed_handle: bool,
    expanded_handles: bool,
    magnifier: bool,
    toolbar: bool,
    auto_hide_delay: Duration,
    collapsed_handle_auto_hide: Countdown,
    signals: Vec<ControlsSignal>,
}

impl ControlsController {
    /// New controller with everything hidden and the caret blinking
    pub fn new(auto_hide_delay: Duration) -> Self {
        Self {
            caret_blink: true,
            collapsed_handle: false,
            expanded_handles: false,
            magnifier: false,
            toolbar: false,
            auto_hide_delay,
            collapsed_handle_auto_hide: Countdown::new(),
            signals: Vec::new(),
        }
    }

    pub fn should_caret_blink(&self) -> bool {
        self.caret_blink
    }

    pub fn is_collapsed_handle_visible(&self) -> bool {
        self.collapsed_handle
    }

    pub fn are_expanded_handles_visible(&self) -> bool {
        self.expanded_handles
    }

    pub fn is_magnifier_visible(&self) -> bool {
        self.magnifier
    }

    pub fn is_toolbar_visible(&self) -> bool {
        self.toolbar
    }

    pub fn is_auto_hide_pending(&self) -> bool {
        self.collapsed_handle_auto_hide.is_pending()
    }

    pub fn auto_hide_deadline(&self) -> Option<Instant> {
        self.collapsed_handle_auto_hide.deadline()
    }

    /// Take all signals raised since the last call
    pub fn take_signals(&mut self) -> Vec<ControlsSignal> {
        std::mem::take(&mut self.signals)
    }

    // === Caret ===

    pub fn blink_caret(&mut self) {
        self.set(Control::CaretBlink, true);
    }

    pub fn do_not_blink_caret(&mut self) {
        self.set(Control::CaretBlink, false);
    }

    /// One-shot: snap the caret to full opacity. Not a persisted flag.
    pub fn jump_caret_to_opaque(&mut self) {
        self.signals.push(ControlsSignal::JumpCaretToOpaque);
    }

    // === Collapsed handle ===

    pub fn show_collapsed_handle(&mut self) {
        self.collapsed_handle_auto_hide.cancel();
        self.set(Control::ExpandedHandles, false);
        self.set(Control::CollapsedHandle, true);
    }

    pub fn hide_collapsed_handle(&mut self) {
        self.collapsed_handle_auto_hide.cancel();
        self.set(Control::CollapsedHandle, false);
    }

    pub fn toggle_collapsed_handle(&mut self) {
        if self.collapsed_handle {
            self.hide_collapsed_handle();
        } else {
            self.show_collapsed_handle();
        }
    }

    /// Hide the collapsed handle after the configured delay, unless cancelled.
    /// Restarting replaces the pending deadline.
    pub fn start_collapsed_handle_auto_hide_countdown(&mut self, now: Instant) {
        tracing::trace!("collapsed handle auto-hide in {:?}", self.auto_hide_delay);
        self.collapsed_handle_auto_hide.start(now, self.auto_hide_delay);
    }

    pub fn cancel_collapsed_handle_auto_hide_countdown(&mut self) {
        self.collapsed_handle_auto_hide.cancel();
    }

    // === Expanded handles ===

    pub fn show_expanded_handles(&mut self) {
        self.collapsed_handle_auto_hide.cancel();
        self.set(Control::CollapsedHandle, false);
        self.set(Control::ExpandedHandles, true);
    }

    pub fn hide_expanded_handles(&mut self) {
        self.set(Control::ExpandedHandles, false);
    }

    pub fn toggle_expanded_handles(&mut self) {
        if self.expanded_handles {
            self.hide_expanded_handles();
        } else {
            self.show_expanded_handles();
        }
    }

    // === Magnifier ===

    pub fn show_magnifier(&mut self) {
        self.set(Control::Magnifier, true);
    }

    pub fn hide_magnifier(&mut self) {
        self.set(Control::Magnifier, false);
    }

    pub fn toggle_magnifier(&mut self) {
        let visible = !self.magnifier;
        self.set(Control::Magnifier, visible);
    }

    // === Toolbar ===

    pub fn show_toolbar(&mut self) {
        self.set(Control::Toolbar, true);
    }

    pub fn hide_toolbar(&mut self) {
        self.set(Control::Toolbar, false);
    }

    pub fn toggle_toolbar(&mut self) {
        let visible = !self.toolbar;
        self.set(Control::Toolbar, visible);
    }

    /// Fire the auto-hide countdown if its deadline has passed.
    /// Returns true if the collapsed handle was hidden.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.collapsed_handle_auto_hide.poll(now) {
            tracing::debug!("collapsed handle auto-hidden");
            self.hide_collapsed_handle();
            true
        } else {
            false
        }
    }

    /// Cancel pending timers and drop undelivered signals
    pub fn dispose(&mut self) {
        self.collapsed_handle_auto_hide.cancel();
        self.signals.clear();
    }

    fn set(&mut self, control: Control, value: bool) {
        let slot = match control {
            Control::CaretBlink => &mut self.caret_blink,
            Control::CollapsedHandle => &mut self.collapsed_handle,
            Control::ExpandedHandles => &mut self.expanded_handles,
            Control::Magnifier => &mut self.magnifier,
            Control::Toolbar => &mut self.toolbar,
        };
        if *slot != value {
            *slot = value;
            self.signals.push(ControlsSignal::Changed(control, value));
        }
        debug_assert!(
            !(self.collapsed_handle && self.expanded_handles),
            "collapsed and expanded handles visible at once"
        );
    }
}
