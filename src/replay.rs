//! Scripted gesture replay against the headless host
//!
//! A script is a YAML list of timestamped steps:
//!
//! ```yaml
//! viewport_height: 400
//! steps:
//!   - { at_ms: 0, event: down, x: 65, y: 10 }
//!   - { at_ms: 80, event: up, x: 65, y: 10 }
//!   - { at_ms: 600, event: wait }
//!   - { event: handle_start, handle: collapsed }
//!   - { event: handle_move, dx: 40, dy: 0 }
//!   - { at_ms: 900, event: handle_end }
//! ```
//!
//! `at_ms` is measured from the start of the replay. Before each step the
//! clock advances to `at_ms` and due timers fire; after it the frame ends.

use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Context;
use serde::Deserialize;

use crate::config::GestureConfig;
use crate::document::{DocumentSelection, HandleType};
use crate::error::GestureError;
use crate::geometry::Point;
use crate::headless::{HeadlessHost, MonospaceDocument, DEFAULT_VIEWPORT_HEIGHT};
use crate::host::SelectionMutator;
use crate::interactor::TouchInteractor;
use crate::messages::{GestureMsg, HandleMsg, PointerMsg};
use crate::tracing::ControlsSnapshot;
use crate::update::update;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub viewport_height: Option<f64>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    /// Milliseconds since the replay started; omitted means "no time passes"
    #[serde(default)]
    pub at_ms: Option<u64>,
    #[serde(flatten)]
    pub event: ScriptEvent,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    Cancel,
    /// Only advance the clock
    Wait,
    /// Scroll the viewport by `by` pixels (positive moves content up)
    Scroll { by: f64 },
    HandleStart { handle: HandleType },
    HandleMove { dx: f64, dy: f64 },
    HandleEnd,
    HandleCancel,
}

impl Script {
    pub fn from_yaml(source: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(source).context("invalid replay script")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_yaml(&source).with_context(|| format!("in {}", path.display()))
    }
}

/// State after one replayed step
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub index: usize,
    pub at_ms: u64,
    pub event: ScriptEvent,
    pub selection: Option<DocumentSelection>,
    pub selected_text: String,
    pub controls: ControlsSnapshot,
    pub error: Option<GestureError>,
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selection = self
            .selection
            .as_ref()
            .map_or_else(|| "none".to_string(), |s| s.to_string());
        write!(
            f,
            "{:>3} {:>6}ms {:<40} selection={}",
            self.index,
            self.at_ms,
            format!("{:?}", self.event),
            selection
        )?;
        if !self.selected_text.is_empty() {
            write!(f, " {:?}", self.selected_text)?;
        }

        let c = &self.controls;
        let flags = [
            ("blink", c.caret_blink),
            ("collapsed", c.collapsed_handle),
            ("expanded", c.expanded_handles),
            ("magnifier", c.magnifier),
            ("toolbar", c.toolbar),
        ];
        let visible: Vec<&str> = flags
            .iter()
            .filter(|(_, on)| *on)
            .map(|(name, _)| *name)
            .collect();
        write!(f, " [{}]", visible.join(" "))?;

        if let Some(err) = &self.error {
            write!(f, " error: {}", err)?;
        }
        Ok(())
    }
}

pub struct Replay {
    host: HeadlessHost,
    interactor: TouchInteractor,
    started: Instant,
    elapsed_ms: u64,
}

impl Replay {
    pub fn new(document: MonospaceDocument, config: GestureConfig, viewport_height: f64) -> Self {
        Self {
            host: HeadlessHost::with_viewport_height(document, viewport_height),
            interactor: TouchInteractor::new(config),
            started: Instant::now(),
            elapsed_ms: 0,
        }
    }

    pub fn for_script(document: MonospaceDocument, config: GestureConfig, script: &Script) -> Self {
        let height = script.viewport_height.unwrap_or(DEFAULT_VIEWPORT_HEIGHT);
        Self::new(document, config, height)
    }

    pub fn host(&self) -> &HeadlessHost {
        &self.host
    }

    pub fn interactor(&self) -> &TouchInteractor {
        &self.interactor
    }

    /// Run every step; rejected steps are reported, not fatal
    pub fn run(&mut self, script: &Script) -> Vec<StepReport> {
        script
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| self.run_step(index, step))
            .collect()
    }

    pub fn run_step(&mut self, index: usize, step: &Step) -> StepReport {
        // The clock never runs backwards.
        if let Some(at_ms) = step.at_ms {
            self.elapsed_ms = self.elapsed_ms.max(at_ms);
        }
        let now = self.started + Duration::from_millis(self.elapsed_ms);

        let error = self
            .dispatch(GestureMsg::Tick(now))
            .and_then(|()| self.apply(&step.event, now))
            .and_then(|()| self.dispatch(GestureMsg::FrameEnd))
            .err();
        if let Some(err) = &error {
            tracing::warn!("step {} rejected: {}", index, err);
        }

        let selection = self.host.editor.selection();
        let selected_text = selection
            .as_ref()
            .map(|s| self.host.document.selected_text(s))
            .unwrap_or_default();
        StepReport {
            index,
            at_ms: self.elapsed_ms,
            event: step.event.clone(),
            selection,
            selected_text,
            controls: ControlsSnapshot::from_controls(self.interactor.controls()),
            error,
        }
    }

    fn apply(&mut self, event: &ScriptEvent, time: Instant) -> Result<(), GestureError> {
        let msg = match *event {
            ScriptEvent::Down { x, y } => GestureMsg::Pointer(PointerMsg::Down {
                position: Point::new(x, y),
                time,
            }),
            ScriptEvent::Move { x, y } => GestureMsg::Pointer(PointerMsg::Move {
                position: Point::new(x, y),
                time,
            }),
            ScriptEvent::Up { x, y } => GestureMsg::Pointer(PointerMsg::Up {
                position: Point::new(x, y),
                time,
            }),
            ScriptEvent::Cancel => GestureMsg::Pointer(PointerMsg::Cancel { time }),
            ScriptEvent::Wait => return Ok(()),
            ScriptEvent::Scroll { by } => {
                if !self.host.viewport.scroll_by(by) {
                    return Ok(());
                }
                GestureMsg::ScrollChanged
            }
            ScriptEvent::HandleStart { handle } => GestureMsg::Handle(HandleMsg::DragStart { handle }),
            ScriptEvent::HandleMove { dx, dy } => GestureMsg::Handle(HandleMsg::DragUpdate {
                delta: Point::new(dx, dy),
            }),
            ScriptEvent::HandleEnd => GestureMsg::Handle(HandleMsg::DragEnd { time }),
            ScriptEvent::HandleCancel => GestureMsg::Handle(HandleMsg::DragCancel { time }),
        };
        self.dispatch(msg)
    }

    fn dispatch(&mut self, msg: GestureMsg) -> Result<(), GestureError> {
        let mut ctx = self.host.context();
        update(&mut self.interactor, &mut ctx, msg)
    }
}
