use std::collections::{HashMap, HashSet};

use crate::models::{Chart, ChartSpec, FunnelDefinition, PathTag, StepId};

use super::{View, ViewError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingDisplay {
    pub percent: u8,
    pub text: String,
}

/// Display model behind the terminal UI.
///
/// Knows which step blocks and canvases exist, keeps what is currently
/// visible and owns the chart registry. `ui` renders straight from it.
#[derive(Debug, Default)]
pub struct TerminalView {
    steps: HashSet<StepId>,
    canvases: HashSet<String>,
    visible: Option<StepId>,
    progress: u8,
    selected: HashMap<StepId, HashSet<String>>,
    continue_enabled: HashMap<StepId, bool>,
    loading: HashMap<PathTag, LoadingDisplay>,
    charts: HashMap<String, Chart>,
    charts_created: usize,
    scroll: u16,
}

impl TerminalView {
    pub fn new(funnel: &FunnelDefinition) -> Self {
        Self {
            steps: funnel.steps.iter().map(|s| s.id.clone()).collect(),
            canvases: funnel.canvases().map(str::to_string).collect(),
            ..Self::default()
        }
    }

    pub fn visible_step(&self) -> Option<&StepId> {
        self.visible.as_ref()
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn is_option_selected(&self, step: &StepId, value: &str) -> bool {
        self.selected
            .get(step)
            .is_some_and(|values| values.contains(value))
    }

    pub fn is_continue_enabled(&self, step: &StepId) -> bool {
        self.continue_enabled.get(step).copied().unwrap_or(false)
    }

    pub fn loading(&self, path: PathTag) -> Option<&LoadingDisplay> {
        self.loading.get(&path)
    }

    pub fn chart(&self, canvas: &str) -> Option<&Chart> {
        self.charts.get(canvas)
    }

    /// How many charts were built over the life of the view.
    pub fn charts_created(&self) -> usize {
        self.charts_created
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}

impl View for TerminalView {
    fn show_step(&mut self, step: &StepId) -> Result<(), ViewError> {
        if !self.steps.contains(step) {
            return Err(ViewError::MissingStep(step.clone()));
        }
        self.visible = Some(step.clone());
        Ok(())
    }

    fn hide_step(&mut self, step: &StepId) -> Result<(), ViewError> {
        if !self.steps.contains(step) {
            return Err(ViewError::MissingStep(step.clone()));
        }
        if self.visible.as_ref() == Some(step) {
            self.visible = None;
        }
        Ok(())
    }

    fn set_progress(&mut self, percent: u8) {
        self.progress = percent.min(100);
    }

    fn set_option_selected(&mut self, step: &StepId, value: &str, selected: bool) {
        let values = self.selected.entry(step.clone()).or_default();
        if selected {
            values.insert(value.to_string());
        } else {
            values.remove(value);
        }
    }

    fn set_continue_enabled(&mut self, step: &StepId, enabled: bool) {
        self.continue_enabled.insert(step.clone(), enabled);
    }

    fn set_loading(&mut self, path: PathTag, percent: u8, text: &str) {
        self.loading.insert(
            path,
            LoadingDisplay {
                percent: percent.min(100),
                text: text.to_string(),
            },
        );
    }

    fn is_chart_rendered(&self, canvas: &str) -> bool {
        self.charts.contains_key(canvas)
    }

    fn render_chart(&mut self, spec: &ChartSpec) -> Result<&Chart, ViewError> {
        if !self.canvases.contains(&spec.canvas) {
            return Err(ViewError::MissingCanvas(spec.canvas.clone()));
        }
        if !self.charts.contains_key(&spec.canvas) {
            self.charts_created += 1;
        }
        Ok(self
            .charts
            .entry(spec.canvas.clone())
            .or_insert_with(|| spec.build()))
    }

    fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::nuora_funnel;
    use crate::models::PATH_A_COLOR;

    #[test]
    fn test_unknown_step_is_reported() {
        let mut view = TerminalView::new(&nuora_funnel());
        let missing = StepId::new("step99");
        assert_eq!(
            view.show_step(&missing),
            Err(ViewError::MissingStep(missing.clone()))
        );
        assert_eq!(view.visible_step(), None);
    }

    #[test]
    fn test_hide_only_clears_matching_step() {
        let mut view = TerminalView::new(&nuora_funnel());
        view.show_step(&StepId::new("step2")).unwrap();
        view.hide_step(&StepId::new("step1")).unwrap();
        assert_eq!(view.visible_step(), Some(&StepId::new("step2")));
        view.hide_step(&StepId::new("step2")).unwrap();
        assert_eq!(view.visible_step(), None);
    }

    #[test]
    fn test_chart_is_built_once_per_canvas() {
        let mut view = TerminalView::new(&nuora_funnel());
        let spec = ChartSpec::comparison("chartPathA1", PATH_A_COLOR);
        let first = view.render_chart(&spec).unwrap().clone();
        let second = view.render_chart(&spec).unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(view.charts_created(), 1);
        assert!(view.is_chart_rendered("chartPathA1"));
    }

    #[test]
    fn test_unknown_canvas_is_reported() {
        let mut view = TerminalView::new(&nuora_funnel());
        let spec = ChartSpec::comparison("chartNowhere", PATH_A_COLOR);
        assert_eq!(
            view.render_chart(&spec).err(),
            Some(ViewError::MissingCanvas("chartNowhere".to_string()))
        );
        assert_eq!(view.charts_created(), 0);
    }

    #[test]
    fn test_scroll_to_top_resets_offset() {
        let mut view = TerminalView::default();
        view.scroll_down();
        view.scroll_down();
        view.scroll_up();
        assert_eq!(view.scroll(), 1);
        view.scroll_to_top();
        assert_eq!(view.scroll(), 0);
    }
}
