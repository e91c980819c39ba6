use std::sync::Arc;
use std::time::Instant;

use tracing::warn;

use crate::config::FunnelConfig;
use crate::flow::{Clock, FlowController, FlowError, SystemClock};
use crate::models::{FunnelDefinition, StepDef, StepId, StepKind};
use crate::view::TerminalView;

/// A focusable row on the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Option(usize),
    Continue,
}

/// Which screen layout and key map apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Question,
    Loading,
    Result,
}

pub struct App {
    funnel: FunnelDefinition,
    config: FunnelConfig,
    clock: Arc<dyn Clock>,
    controller: FlowController<TerminalView>,
    cursor: usize,
    cursor_step: StepId,
}

impl App {
    pub fn new(funnel: FunnelDefinition, config: FunnelConfig) -> Self {
        Self::with_clock(funnel, config, Arc::new(SystemClock))
    }

    pub fn with_clock(funnel: FunnelDefinition, config: FunnelConfig, clock: Arc<dyn Clock>) -> Self {
        let controller = start_session(&funnel, &config, &clock);
        let cursor_step = controller.current_step().clone();
        Self {
            funnel,
            config,
            clock,
            controller,
            cursor: 0,
            cursor_step,
        }
    }

    pub fn controller(&self) -> &FlowController<TerminalView> {
        &self.controller
    }

    pub fn current_step(&self) -> Option<&StepDef> {
        self.controller.current_step_def()
    }

    pub fn screen(&self) -> Screen {
        match self.current_step().map(|s| s.kind) {
            Some(StepKind::Loading { .. }) => Screen::Loading,
            Some(StepKind::Results { .. }) => Screen::Result,
            _ => Screen::Question,
        }
    }

    pub fn rows(&self) -> Vec<Row> {
        let Some(step) = self.current_step() else {
            return Vec::new();
        };
        let mut rows: Vec<Row> = match step.kind {
            StepKind::Single | StepKind::Multi => (0..step.options.len()).map(Row::Option).collect(),
            _ => Vec::new(),
        };
        if step.kind.has_continue() {
            rows.push(Row::Continue);
        }
        rows
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn focused_row(&self) -> Option<Row> {
        self.rows().get(self.cursor).copied()
    }

    pub fn select_next_row(&mut self) {
        let count = self.rows().len();
        if count > 0 {
            self.cursor = (self.cursor + 1) % count;
        }
    }

    pub fn select_previous_row(&mut self) {
        let count = self.rows().len();
        if count > 0 {
            self.cursor = (self.cursor + count - 1) % count;
        }
    }

    /// Click the focused row.
    pub fn activate(&mut self) {
        let Some(row) = self.focused_row() else {
            return;
        };
        let Some(step) = self.current_step() else {
            return;
        };
        let id = step.id.clone();
        let kind = step.kind;

        let result = match row {
            Row::Option(index) => {
                let value = step.options[index].value.clone();
                match kind {
                    StepKind::Single => self.controller.record_single_select(&id, &value),
                    StepKind::Multi => self.controller.toggle_multi_select(&id, &value).map(|_| ()),
                    _ => Ok(()),
                }
            }
            Row::Continue => self.controller.press_continue(&id),
        };
        report(result);
        self.sync_cursor();
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.controller.next_deadline()
    }

    /// Run due timers.
    pub fn tick(&mut self) -> usize {
        let fired = self.controller.tick();
        if fired > 0 {
            self.sync_cursor();
        }
        fired
    }

    pub fn scroll_down(&mut self) {
        self.controller.view_mut().scroll_down();
    }

    pub fn scroll_up(&mut self) {
        self.controller.view_mut().scroll_up();
    }

    /// Throw the session away and start a new one.
    pub fn restart(&mut self) {
        self.controller = start_session(&self.funnel, &self.config, &self.clock);
        self.cursor = 0;
        self.cursor_step = self.controller.current_step().clone();
    }

    fn sync_cursor(&mut self) {
        if self.controller.current_step() != &self.cursor_step {
            self.cursor_step = self.controller.current_step().clone();
            self.cursor = 0;
        }
    }
}

fn start_session(
    funnel: &FunnelDefinition,
    config: &FunnelConfig,
    clock: &Arc<dyn Clock>,
) -> FlowController<TerminalView> {
    let view = TerminalView::new(funnel);
    let mut controller =
        FlowController::with_clock(funnel.clone(), config.clone(), view, Arc::clone(clock));
    controller.start();
    controller
}

fn report(result: Result<(), FlowError>) {
    if let Err(e) = result {
        warn!(error = %e, "action ignored");
    }
}
