//! Quiz flow controller: owns the session and decides every transition.

use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::FunnelConfig;
use crate::models::{FunnelDefinition, PathTag, StepDef, StepId, StepKind};
use crate::view::View;

use super::clock::{Clock, SystemClock};
use super::scheduler::{Action, Scheduler};
use super::state::{Answer, PathScores, QuizState};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("unknown step {0}")]
    UnknownStep(StepId),

    #[error("step {step} has no option {value}")]
    UnknownOption { step: StepId, value: String },

    #[error("step {step} does not accept {action}")]
    WrongKind { step: StepId, action: &'static str },

    #[error("continue is disabled on step {0}")]
    ContinueDisabled(StepId),

    #[error("no entry step for path {0}")]
    MissingPathEntry(PathTag),

    #[error("step {0} is not the current step")]
    NotCurrent(StepId),
}

pub struct FlowController<V: View> {
    funnel: FunnelDefinition,
    config: FunnelConfig,
    state: QuizState,
    scheduler: Scheduler,
    view: V,
    clock: Box<dyn Clock>,
}

impl<V: View> FlowController<V> {
    pub fn new(funnel: FunnelDefinition, config: FunnelConfig, view: V) -> Self {
        Self::with_clock(funnel, config, view, SystemClock)
    }

    pub fn with_clock(
        funnel: FunnelDefinition,
        config: FunnelConfig,
        view: V,
        clock: impl Clock + 'static,
    ) -> Self {
        let state = QuizState::new(funnel.start.clone());
        Self {
            funnel,
            config,
            state,
            scheduler: Scheduler::new(),
            view,
            clock: Box::new(clock),
        }
    }

    pub fn funnel(&self) -> &FunnelDefinition {
        &self.funnel
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn current_step(&self) -> &StepId {
        &self.state.current_step
    }

    pub fn current_step_def(&self) -> Option<&StepDef> {
        self.funnel.step(&self.state.current_step)
    }

    pub fn selected_path(&self) -> Option<PathTag> {
        self.state.selected_path
    }

    pub fn path_scores(&self) -> PathScores {
        self.state.path_scores
    }

    pub fn answer(&self, step: &StepId) -> Option<&Answer> {
        self.state.answers.get(step)
    }

    pub fn step_history(&self) -> &[StepId] {
        &self.state.step_history
    }

    /// Continue is enabled on info steps, and on multi-select steps with at
    /// least one selection.
    pub fn is_continue_enabled(&self, step: &StepId) -> bool {
        match self.funnel.step(step).map(|s| s.kind) {
            Some(StepKind::Info) => true,
            Some(StepKind::Multi) => self.state.selected_count(step) > 0,
            _ => false,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Show the first step. History is left empty.
    pub fn start(&mut self) {
        let start = self.state.current_step.clone();
        info!(session = %self.state.session_id, step = %start, "funnel started");
        if let Err(e) = self.view.show_step(&start) {
            warn!(session = %self.state.session_id, error = %e, "start step missing");
            return;
        }
        self.enter(&start);
    }

    /// Select one option, deselect its siblings and advance after a short
    /// pause. A later click on the same step replaces the pending advance.
    pub fn record_single_select(&mut self, step: &StepId, value: &str) -> Result<(), FlowError> {
        let def = current_def(&self.funnel, &self.state, step)?;
        if def.kind != StepKind::Single {
            return Err(FlowError::WrongKind {
                step: step.clone(),
                action: "single-select",
            });
        }
        let index = def
            .option_index(value)
            .ok_or_else(|| FlowError::UnknownOption {
                step: step.clone(),
                value: value.to_string(),
            })?;

        for (i, option) in def.options.iter().enumerate() {
            if i != index {
                self.view.set_option_selected(step, &option.value, false);
            }
        }
        self.view.set_option_selected(step, value, true);
        self.state.select_only(step, index);
        self.state
            .answers
            .insert(step.clone(), Answer::Single(value.to_string()));

        self.scheduler.cancel_owned_by(step);
        match def.options[index].next.clone() {
            Some(next) => {
                debug!(session = %self.state.session_id, %step, value, %next, "single select");
                let now = self.clock.now();
                self.scheduler.schedule(
                    now,
                    self.config.auto_advance(),
                    step.clone(),
                    Action::Navigate(next),
                );
            }
            None => {
                warn!(session = %self.state.session_id, %step, value, "option has no next step");
            }
        }
        Ok(())
    }

    /// Flip one option of a multi-select step. Returns whether it is now
    /// selected.
    pub fn toggle_multi_select(&mut self, step: &StepId, value: &str) -> Result<bool, FlowError> {
        let def = current_def(&self.funnel, &self.state, step)?;
        if def.kind != StepKind::Multi {
            return Err(FlowError::WrongKind {
                step: step.clone(),
                action: "multi-select",
            });
        }
        let index = def
            .option_index(value)
            .ok_or_else(|| FlowError::UnknownOption {
                step: step.clone(),
                value: value.to_string(),
            })?;

        let selected = self.state.toggle(step, index);
        self.view.set_option_selected(step, value, selected);
        self.state.record_selections(def);
        let enabled = self.state.selected_count(step) > 0;
        self.view.set_continue_enabled(step, enabled);
        debug!(session = %self.state.session_id, %step, value, selected, "multi select");

        if self.funnel.is_routing_step(step) {
            self.compute_path_scores();
        }
        Ok(selected)
    }

    /// Recount path scores from the routing step's live selections.
    pub fn compute_path_scores(&mut self) -> PathScores {
        let scores = match self.funnel.step(&self.funnel.routing_step) {
            Some(routing) => PathScores::from_selected(self.state.selected_options(routing)),
            None => PathScores::default(),
        };
        self.state.path_scores = scores;
        scores
    }

    /// Pick the path with the higher score (A on a tie) and go to its entry.
    pub fn route_to_path(&mut self) -> Result<PathTag, FlowError> {
        let scores = self.state.path_scores;
        let path = scores.winner();
        let entry = self
            .funnel
            .path_entry(path)
            .cloned()
            .ok_or(FlowError::MissingPathEntry(path))?;
        self.state.selected_path = Some(path);
        info!(
            session = %self.state.session_id,
            %path,
            score_a = scores.a,
            score_b = scores.b,
            "routed"
        );
        self.navigate_to(&entry);
        Ok(path)
    }

    /// Store the step's selections and move to its fixed successor. Steps
    /// without a successor stay where they are.
    pub fn advance_from_continue(&mut self, step: &StepId) -> Result<(), FlowError> {
        let def = current_def(&self.funnel, &self.state, step)?;
        if def.kind != StepKind::Multi {
            return Err(FlowError::WrongKind {
                step: step.clone(),
                action: "continue from selections",
            });
        }
        self.state.record_selections(def);
        match def.successor.clone() {
            Some(next) => self.navigate_to(&next),
            None => debug!(session = %self.state.session_id, %step, "no successor"),
        }
        Ok(())
    }

    /// The continue control of a step.
    pub fn press_continue(&mut self, step: &StepId) -> Result<(), FlowError> {
        let def = current_def(&self.funnel, &self.state, step)?;
        let kind = def.kind;
        let successor = def.successor.clone();
        match kind {
            StepKind::Multi => {
                if self.state.selected_count(step) == 0 {
                    return Err(FlowError::ContinueDisabled(step.clone()));
                }
                if self.funnel.is_routing_step(step) {
                    self.route_to_path().map(|_| ())
                } else {
                    self.advance_from_continue(step)
                }
            }
            StepKind::Info => {
                if let Some(next) = successor {
                    self.navigate_to(&next);
                }
                Ok(())
            }
            _ => Err(FlowError::WrongKind {
                step: step.clone(),
                action: "continue",
            }),
        }
    }

    /// Show `step` in place of the current one.
    ///
    /// Unknown steps leave everything untouched. Tasks owned by the step
    /// being left are cancelled.
    pub fn navigate_to(&mut self, step: &StepId) {
        if let Err(e) = self.view.show_step(step) {
            warn!(session = %self.state.session_id, error = %e, "navigation skipped");
            return;
        }

        let previous = std::mem::replace(&mut self.state.current_step, step.clone());
        if &previous != step {
            let cancelled = self.scheduler.cancel_owned_by(&previous);
            if cancelled > 0 {
                debug!(session = %self.state.session_id, step = %previous, cancelled, "cancelled pending work");
            }
            if let Err(e) = self.view.hide_step(&previous) {
                warn!(session = %self.state.session_id, error = %e, "hide failed");
            }
        }
        info!(session = %self.state.session_id, from = %previous, to = %step, "navigated");
        self.state.step_history.push(previous);

        self.enter(step);
    }

    /// Start the loading animation for a path unless one is already pending.
    pub fn run_loading_sequence(&mut self, path: PathTag) {
        let Some(loading) = self.funnel.loading_step(path) else {
            warn!(session = %self.state.session_id, %path, "no loading step for path");
            return;
        };
        let owner = loading.id.clone();
        self.start_loading(&owner, path);
    }

    /// The chain belongs to `owner`: leaving it cancels the chain, and its
    /// successor is where the chain ends.
    fn start_loading(&mut self, owner: &StepId, path: PathTag) {
        if self.scheduler.has_pending_for(owner) {
            debug!(session = %self.state.session_id, %path, step = %owner, "loading already running");
            return;
        }
        let now = self.clock.now();
        self.scheduler.schedule(
            now,
            self.config.loading_interval(),
            owner.clone(),
            Action::LoadingTick { path, phase: 0 },
        );
    }

    /// Render the step's chart unless its canvas already has one.
    pub fn prepare_chart(&mut self, step: &StepId) {
        let Some(spec) = self.funnel.step(step).and_then(|s| s.chart.as_ref()) else {
            return;
        };
        if self.view.is_chart_rendered(&spec.canvas) {
            return;
        }
        match self.view.render_chart(spec) {
            Ok(chart) => debug!(session = %self.state.session_id, canvas = %chart.canvas, "chart rendered"),
            Err(e) => warn!(session = %self.state.session_id, error = %e, "chart skipped"),
        }
    }

    /// Fire every scheduled task that is due. Returns how many fired.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();
        let mut fired = 0;
        while let Some((due, owner, action)) = self.scheduler.pop_due(now) {
            self.fire(due, owner, action);
            fired += 1;
        }
        fired
    }

    /// Run one task. Follow-up work is timed from `due`, so a late tick
    /// keeps the original cadence.
    fn fire(&mut self, due: Instant, owner: StepId, action: Action) {
        match action {
            Action::Navigate(to) => self.navigate_to(&to),
            Action::LoadingTick { path, phase } => {
                if let Some(current) = self.config.loading_phases.get(phase) {
                    self.view.set_loading(path, current.progress, &current.text);
                    self.scheduler.schedule(
                        due,
                        self.config.loading_interval(),
                        owner,
                        Action::LoadingTick {
                            path,
                            phase: phase + 1,
                        },
                    );
                } else if let Some(next) = self.funnel.step(&owner).and_then(|s| s.successor.clone()) {
                    self.scheduler.schedule(
                        due,
                        self.config.loading_trailing(),
                        owner,
                        Action::Navigate(next),
                    );
                }
            }
        }
    }

    /// Side effects of arriving on a step that is already shown.
    fn enter(&mut self, step: &StepId) {
        self.view.set_progress(self.funnel.progress_for(step));
        self.view.scroll_to_top();

        let kind = self.funnel.step(step).map(|s| s.kind);
        if kind.is_some_and(|k| k.has_continue()) {
            let enabled = self.is_continue_enabled(step);
            self.view.set_continue_enabled(step, enabled);
        }

        self.prepare_chart(step);

        match kind {
            Some(StepKind::Loading { path }) => self.start_loading(step, path),
            Some(StepKind::Results { path }) => {
                let answers = serde_json::to_string(&self.state.answers).unwrap_or_default();
                info!(session = %self.state.session_id, %path, %answers, "funnel completed");
            }
            _ => {}
        }
    }
}

/// Look up a step that user actions may target: it must exist and be the
/// one on screen.
fn current_def<'a>(
    funnel: &'a FunnelDefinition,
    state: &QuizState,
    step: &StepId,
) -> Result<&'a StepDef, FlowError> {
    let def = funnel
        .step(step)
        .ok_or_else(|| FlowError::UnknownStep(step.clone()))?;
    if &state.current_step != step {
        return Err(FlowError::NotCurrent(step.clone()));
    }
    Ok(def)
}
