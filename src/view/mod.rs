//! The narrow interface the flow controller draws through.

mod terminal_view;

use thiserror::Error;

use crate::models::{Chart, ChartSpec, PathTag, StepId};

pub use terminal_view::{LoadingDisplay, TerminalView};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("no content block for step {0}")]
    MissingStep(StepId),

    #[error("no canvas named {0}")]
    MissingCanvas(String),
}

pub trait View {
    fn show_step(&mut self, step: &StepId) -> Result<(), ViewError>;

    fn hide_step(&mut self, step: &StepId) -> Result<(), ViewError>;

    /// Overall funnel progress, 0-100.
    fn set_progress(&mut self, percent: u8);

    fn set_option_selected(&mut self, step: &StepId, value: &str, selected: bool);

    fn set_continue_enabled(&mut self, step: &StepId, enabled: bool);

    fn set_loading(&mut self, path: PathTag, percent: u8, text: &str);

    fn is_chart_rendered(&self, canvas: &str) -> bool;

    /// Create the chart for `spec.canvas`. If one exists already it is
    /// returned unchanged.
    fn render_chart(&mut self, spec: &ChartSpec) -> Result<&Chart, ViewError>;

    fn scroll_to_top(&mut self);
}
