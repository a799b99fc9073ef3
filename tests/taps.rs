//! Tap, double-tap and triple-tap handling

mod common;

use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;
use std::time::Instant;

use common::{caret, over, range, Harness, DOC};
use doc_touch::config::GestureConfig;
use doc_touch::document::{
    DocumentPosition, DocumentSelection, NodeId, NodePosition, SelectionChangeKind,
    SelectionReason,
};
use doc_touch::geometry::{Point, Rect};
use doc_touch::headless::{EditorRequest, HeadlessHost, MonospaceDocument};
use doc_touch::host::{
    DocumentLayout, GestureContext, SelectionMutator, TapDetails, TapHandler, TapOutcome,
};
use doc_touch::interactor::TouchInteractor;

// ========================================================================
// Single tap
// ========================================================================

#[test]
fn test_tap_places_caret() {
    let mut h = Harness::new();
    h.tap(over(0, 6));

    assert_eq!(h.selection(), Some(caret("n0", 6)));
    assert_eq!(
        h.host.editor.requests(),
        &[
            EditorRequest::ChangeSelection {
                selection: caret("n0", 6),
                kind: SelectionChangeKind::PlaceCaret,
                reason: SelectionReason::UserInteraction,
            },
            EditorRequest::ClearComposingRegion,
        ]
    );
}

#[test]
fn test_tap_shows_blinking_caret_with_collapsed_handle() {
    let mut h = Harness::new();
    h.tap(over(0, 6));

    let controls = h.controls();
    assert!(controls.is_collapsed_handle_visible());
    assert!(!controls.are_expanded_handles_visible());
    assert!(!controls.is_toolbar_visible());
    assert!(!controls.is_magnifier_visible());
    assert!(controls.should_caret_blink());
    assert!(controls.is_auto_hide_pending());
}

#[test]
fn test_tap_requests_focus() {
    let mut h = Harness::new();
    h.tap(over(0, 6));
    assert_eq!(h.host.platform.focus_requests(), 1);
}

#[test]
fn test_tap_on_existing_caret_toggles_toolbar() {
    let mut h = Harness::new();
    h.tap(over(0, 6));
    assert!(!h.controls().is_toolbar_visible());

    h.advance(400);
    h.tap(over(0, 6));
    assert!(h.controls().is_toolbar_visible());
    assert_eq!(h.selection(), Some(caret("n0", 6)));

    h.advance(400);
    h.tap(over(0, 6));
    assert!(!h.controls().is_toolbar_visible());
}

#[test]
fn test_tap_elsewhere_hides_toolbar() {
    let mut h = Harness::new();
    h.tap(over(0, 6));
    h.advance(400);
    h.tap(over(0, 6));
    assert!(h.controls().is_toolbar_visible());

    h.advance(400);
    h.tap(over(3, 2));
    assert_eq!(h.selection(), Some(caret("n3", 2)));
    assert!(!h.controls().is_toolbar_visible());
}

#[test]
fn test_collapsed_handle_auto_hides() {
    let mut h = Harness::new();
    h.tap(over(0, 6));

    h.advance(4999);
    assert!(h.controls().is_collapsed_handle_visible());
    h.advance(1);
    assert!(!h.controls().is_collapsed_handle_visible());
    assert_eq!(h.selection(), Some(caret("n0", 6)));
}

#[test]
fn test_second_tap_restarts_auto_hide() {
    let mut h = Harness::new();
    h.tap(over(0, 6));
    h.advance(3000);
    h.tap(over(3, 2));

    h.advance(3000);
    assert!(h.controls().is_collapsed_handle_visible());
    h.advance(2000);
    assert!(!h.controls().is_collapsed_handle_visible());
}

#[test]
fn test_tap_on_unselectable_node_moves_caret_upstream() {
    let mut h = Harness::new();
    h.tap(over(2, 3));

    assert_eq!(
        h.selection(),
        Some(DocumentSelection::collapsed(DocumentPosition::new(
            NodeId::new("n1"),
            NodePosition::downstream()
        )))
    );
    assert!(h.controls().is_collapsed_handle_visible());
}

#[test]
fn test_focal_points_follow_caret_after_frame() {
    let mut h = Harness::new();
    h.tap(over(0, 6));

    let focal = h.interactor.focal_points();
    assert_eq!(focal.collapsed_handle(), Some(Point::new(60.0, 20.0)));
    assert_eq!(focal.toolbar(), Some(Point::new(60.0, 0.0)));
    assert_eq!(focal.upstream_handle(), None);
}

/// A layout where no point resolves to a document position
struct UnresolvedLayout;

impl DocumentLayout for UnresolvedLayout {
    fn position_nearest(&self, _offset: Point) -> Option<DocumentPosition> {
        None
    }

    fn rect_for_position(&self, _position: &DocumentPosition) -> Option<Rect> {
        None
    }

    fn is_selectable(&self, _node_id: &NodeId) -> bool {
        false
    }

    fn nearest_selectable_position(&self, _node_id: &NodeId) -> Option<DocumentPosition> {
        None
    }

    fn compare(&self, _a: &DocumentPosition, _b: &DocumentPosition) -> Ordering {
        Ordering::Equal
    }

    fn word_selection_at(&self, _position: &DocumentPosition) -> Option<DocumentSelection> {
        None
    }

    fn paragraph_selection_at(&self, _position: &DocumentPosition) -> Option<DocumentSelection> {
        None
    }

    fn block_selection_at(&self, _position: &DocumentPosition) -> Option<DocumentSelection> {
        None
    }
}

#[test]
fn test_tap_outside_content_clears_selection_and_controls() {
    let mut host = HeadlessHost::new(MonospaceDocument::from_text(DOC));
    host.editor.set_selection(Some(caret("n0", 6)));
    let mut interactor = TouchInteractor::new(GestureConfig::default());
    interactor.controls_mut().show_collapsed_handle();
    interactor.controls_mut().show_toolbar();
    assert!(interactor.controls().should_caret_blink());

    let now = Instant::now();
    let mut ctx = GestureContext {
        layout: &UnresolvedLayout,
        viewport: &mut host.viewport,
        editor: &mut host.editor,
        auto_scroller: &mut host.auto_scroller,
        platform: &mut host.platform,
    };
    interactor.on_pointer_down(&mut ctx, over(0, 6), now);
    interactor.on_pointer_up(&mut ctx, over(0, 6), now);

    assert_eq!(host.editor.selection(), None);
    assert_eq!(
        host.editor.requests(),
        &[
            EditorRequest::ClearSelection,
            EditorRequest::ClearComposingRegion
        ]
    );

    let controls = interactor.controls();
    assert!(!controls.is_collapsed_handle_visible());
    assert!(!controls.are_expanded_handles_visible());
    assert!(!controls.is_toolbar_visible());
    assert!(!controls.is_magnifier_visible());
    assert!(!controls.should_caret_blink());
}

#[test]
fn test_tap_while_scroll_coasts_only_stops_scroll() {
    let mut h = Harness::new();
    h.host.viewport.set_coasting(true);
    h.tap(over(0, 6));

    assert_eq!(h.selection(), None);
    assert!(h.host.editor.requests().is_empty());
}

// ========================================================================
// Double and triple tap
// ========================================================================

#[test]
fn test_double_tap_selects_word() {
    let mut h = Harness::new();
    h.tap(over(0, 7));
    h.advance(100);
    h.tap(over(0, 7));

    assert_eq!(h.selection(), Some(range("n0", 6, 11)));
    assert_eq!(h.selected_text(), "brave");

    let changes = h.host.editor.selection_changes();
    assert_eq!(
        changes.last().map(|(_, kind)| *kind),
        Some(SelectionChangeKind::ExpandSelection)
    );
}

#[test]
fn test_double_tap_shows_expanded_handles_and_toolbar() {
    let mut h = Harness::new();
    h.tap(over(0, 7));
    h.advance(100);
    h.tap(over(0, 7));

    let controls = h.controls();
    assert!(controls.are_expanded_handles_visible());
    assert!(!controls.is_collapsed_handle_visible());
    assert!(controls.is_toolbar_visible());
    assert!(!controls.should_caret_blink());
    assert!(!controls.is_auto_hide_pending());
}

#[test]
fn test_double_tap_on_rule_selects_block() {
    let mut h = Harness::new();
    let rule = Point::new(100.0, 30.0);
    h.tap(rule);
    h.advance(100);
    h.tap(rule);

    assert_eq!(
        h.selection(),
        Some(DocumentSelection::new(
            DocumentPosition::new(NodeId::new("n1"), NodePosition::upstream()),
            DocumentPosition::new(NodeId::new("n1"), NodePosition::downstream()),
        ))
    );
    assert!(h.controls().are_expanded_handles_visible());
}

#[test]
fn test_multi_tap_on_unselectable_node_keeps_repaired_caret() {
    let mut h = Harness::new();
    h.tap(over(2, 3));
    let repaired = h.selection();
    assert!(repaired.is_some());
    let changes = h.selection_change_count();

    h.advance(100);
    h.tap(over(2, 3));
    assert_eq!(h.selection(), repaired);
    assert_eq!(h.selection_change_count(), changes);

    h.advance(100);
    h.tap(over(2, 3));
    assert_eq!(h.selection(), repaired);
    assert_eq!(h.selection_change_count(), changes);
}

#[test]
fn test_slow_second_tap_is_single() {
    let mut h = Harness::new();
    h.tap(over(0, 7));
    h.advance(350);
    h.tap(over(0, 7));

    assert_eq!(h.selection(), Some(caret("n0", 7)));
}

#[test]
fn test_triple_tap_selects_paragraph() {
    let mut h = Harness::new();
    h.tap(over(3, 9));
    h.advance(100);
    h.tap(over(3, 9));
    h.advance(100);
    h.tap(over(3, 9));

    assert_eq!(h.selection(), Some(range("n3", 0, 21)));
    assert_eq!(h.selected_text(), "second paragraph here");
    assert!(h.controls().is_toolbar_visible());
}

#[test]
fn test_triple_tap_on_rule_falls_back_to_caret() {
    let mut h = Harness::new();
    let rule = Point::new(100.0, 30.0);
    h.tap(rule);
    h.advance(100);
    h.tap(rule);
    h.advance(100);
    h.tap(rule);

    assert_eq!(
        h.selection(),
        Some(DocumentSelection::collapsed(DocumentPosition::new(
            NodeId::new("n1"),
            NodePosition::upstream()
        )))
    );
    let controls = h.controls();
    assert!(controls.is_collapsed_handle_visible());
    assert!(!controls.are_expanded_handles_visible());
    assert!(!controls.is_toolbar_visible());
}

#[test]
fn test_fourth_tap_starts_over() {
    let mut h = Harness::new();
    for _ in 0..3 {
        h.tap(over(3, 9));
        h.advance(100);
    }
    h.tap(over(3, 9));

    assert_eq!(h.selection(), Some(caret("n3", 9)));
    assert!(h.controls().is_collapsed_handle_visible());
}

#[test]
fn test_multi_tap_disabled_treats_every_tap_as_single() {
    let config = GestureConfig {
        multi_tap_enabled: false,
        ..GestureConfig::default()
    };
    let mut h = Harness::with_config(config);
    h.tap(over(0, 7));
    h.advance(100);
    h.tap(over(0, 7));

    assert_eq!(h.selection(), Some(caret("n0", 7)));
}

// ========================================================================
// Application tap handler
// ========================================================================

#[derive(Default)]
struct Recorder {
    calls: Rc<RefCell<Vec<(&'static str, Option<DocumentPosition>)>>>,
    halt_double: bool,
}

impl TapHandler for Recorder {
    fn on_tap(&mut self, details: &TapDetails) -> TapOutcome {
        self.calls.borrow_mut().push(("tap", details.position.clone()));
        TapOutcome::Continue
    }

    fn on_double_tap(&mut self, details: &TapDetails) -> TapOutcome {
        self.calls
            .borrow_mut()
            .push(("double", details.position.clone()));
        if self.halt_double {
            TapOutcome::Halt
        } else {
            TapOutcome::Continue
        }
    }
}

#[test]
fn test_tap_handler_halt_skips_default() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut h = Harness::new();
    h.interactor.set_tap_handler(Some(Box::new(Recorder {
        calls: Rc::clone(&calls),
        halt_double: true,
    })));

    h.tap(over(0, 7));
    h.advance(100);
    h.tap(over(0, 7));

    assert_eq!(
        *calls.borrow(),
        vec![
            ("tap", Some(DocumentPosition::text("n0", 7))),
            ("double", Some(DocumentPosition::text("n0", 7))),
        ]
    );
    // The first tap ran normally; the halted double tap changed nothing.
    assert_eq!(h.selection(), Some(caret("n0", 7)));
    assert_eq!(h.selection_change_count(), 1);
}

#[test]
fn test_tap_handler_continue_keeps_default() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut h = Harness::new();
    h.interactor.set_tap_handler(Some(Box::new(Recorder {
        calls: Rc::clone(&calls),
        halt_double: false,
    })));

    h.tap(over(0, 7));
    h.advance(100);
    h.tap(over(0, 7));

    assert_eq!(calls.borrow().len(), 2);
    assert_eq!(h.selection(), Some(range("n0", 6, 11)));
}
