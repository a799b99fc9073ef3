//! End-to-end replay of scripted gestures

mod common;

use common::{range, DOC};
use doc_touch::config::GestureConfig;
use doc_touch::error::GestureError;
use doc_touch::headless::MonospaceDocument;
use doc_touch::replay::{Replay, Script};

const DOUBLE_TAP_THEN_BAD_HANDLE: &str = r#"
steps:
  - { at_ms: 0, event: down, x: 72, y: 10 }
  - { at_ms: 40, event: up, x: 72, y: 10 }
  - { at_ms: 150, event: down, x: 72, y: 10 }
  - { at_ms: 190, event: up, x: 72, y: 10 }
  - { event: handle_start, handle: collapsed }
  - { event: handle_start, handle: downstream }
  - { event: handle_move, dx: 100, dy: 0 }
  - { at_ms: 400, event: handle_end }
"#;

#[test]
fn test_replay_reports_each_step() {
    let script = Script::from_yaml(DOUBLE_TAP_THEN_BAD_HANDLE).unwrap();
    let mut replay = Replay::for_script(
        MonospaceDocument::from_text(DOC),
        GestureConfig::default(),
        &script,
    );
    let reports = replay.run(&script);

    assert_eq!(reports.len(), 8);
    assert_eq!(reports[3].selection, Some(range("n0", 6, 11)));
    assert_eq!(reports[3].selected_text, "brave");
    assert!(reports[3].controls.expanded_handles);

    assert_eq!(
        reports[4].error,
        Some(GestureError::HandleMismatch {
            handle: doc_touch::HandleType::Collapsed,
            collapsed: false,
        })
    );
    assert_eq!(reports[5].error, None);

    assert_eq!(reports[7].at_ms, 400);
    assert_eq!(reports[7].selected_text, "brave new world");
    assert!(reports[7].controls.toolbar);
    assert!(!replay.interactor().is_handle_drag_in_progress());
}

#[test]
fn test_report_line_lists_visible_controls() {
    let script = Script::from_yaml(DOUBLE_TAP_THEN_BAD_HANDLE).unwrap();
    let mut replay = Replay::for_script(
        MonospaceDocument::from_text(DOC),
        GestureConfig::default(),
        &script,
    );
    let reports = replay.run(&script);

    let line = reports[3].to_string();
    assert!(line.contains("selection=[n0:6 -> n0:11]"), "{}", line);
    assert!(line.contains("\"brave\""), "{}", line);
    assert!(line.contains("[expanded toolbar]"), "{}", line);

    let rejected = reports[4].to_string();
    assert!(rejected.contains("error:"), "{}", rejected);
}

#[test]
fn test_long_press_waits_on_the_clock() {
    let script = Script::from_yaml(
        r#"
steps:
  - { at_ms: 0, event: down, x: 72, y: 10 }
  - { at_ms: 499, event: wait }
  - { at_ms: 500, event: wait }
  - { at_ms: 520, event: move, x: 172, y: 10 }
  - { at_ms: 540, event: up, x: 172, y: 10 }
"#,
    )
    .unwrap();
    let mut replay = Replay::new(
        MonospaceDocument::from_text(DOC),
        GestureConfig::default(),
        600.0,
    );
    let reports = replay.run(&script);

    assert_eq!(reports[1].selection, None);
    assert_eq!(reports[2].selected_text, "brave");
    assert_eq!(reports[3].selected_text, "brave new world");
    assert!(reports[3].controls.magnifier);
    assert!(!reports[4].controls.magnifier);
    assert_eq!(replay.host().platform.haptic_pulses(), 1);
}
