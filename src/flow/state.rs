//! In-memory session state.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use uuid::Uuid;

use crate::models::{OptionDef, PathTag, StepDef, StepId};

/// What the user answered on a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Answer {
    Single(String),
    Multi(Vec<String>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathScores {
    pub a: usize,
    pub b: usize,
}

impl PathScores {
    /// Tally the path tags of the selected options. Untagged options add nothing.
    pub fn from_selected<'a>(selected: impl IntoIterator<Item = &'a OptionDef>) -> Self {
        let mut scores = Self::default();
        for option in selected {
            match option.path {
                Some(PathTag::A) => scores.a += 1,
                Some(PathTag::B) => scores.b += 1,
                None => {}
            }
        }
        scores
    }

    /// Higher score wins. A tie goes to path A.
    pub fn winner(&self) -> PathTag {
        if self.b > self.a { PathTag::B } else { PathTag::A }
    }
}

/// One quiz session.
#[derive(Debug, Clone)]
pub struct QuizState {
    pub session_id: Uuid,
    pub current_step: StepId,
    pub selected_path: Option<PathTag>,
    pub path_scores: PathScores,
    pub answers: HashMap<StepId, Answer>,
    /// Option indices currently selected, per step.
    pub selections: HashMap<StepId, BTreeSet<usize>>,
    /// Previously shown steps, oldest first.
    pub step_history: Vec<StepId>,
}

impl QuizState {
    pub fn new(start: StepId) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            current_step: start,
            selected_path: None,
            path_scores: PathScores::default(),
            answers: HashMap::new(),
            selections: HashMap::new(),
            step_history: Vec::new(),
        }
    }

    pub fn selected_count(&self, step: &StepId) -> usize {
        self.selections.get(step).map_or(0, BTreeSet::len)
    }

    pub fn is_selected(&self, step: &StepId, index: usize) -> bool {
        self.selections
            .get(step)
            .is_some_and(|set| set.contains(&index))
    }

    /// Make `index` the only selection on the step.
    pub fn select_only(&mut self, step: &StepId, index: usize) {
        let set = self.selections.entry(step.clone()).or_default();
        set.clear();
        set.insert(index);
    }

    /// Flip `index` and return whether it is now selected.
    pub fn toggle(&mut self, step: &StepId, index: usize) -> bool {
        let set = self.selections.entry(step.clone()).or_default();
        if set.remove(&index) {
            false
        } else {
            set.insert(index);
            true
        }
    }

    /// Selected options of a step, in display order.
    pub fn selected_options<'a>(&self, step: &'a StepDef) -> Vec<&'a OptionDef> {
        self.selections
            .get(&step.id)
            .map(|set| set.iter().filter_map(|&i| step.options.get(i)).collect())
            .unwrap_or_default()
    }

    /// Store the current selections of a multi-select step as its answer.
    /// An empty selection clears the answer.
    pub fn record_selections(&mut self, step: &StepDef) {
        let values: Vec<String> = self
            .selected_options(step)
            .into_iter()
            .map(|o| o.value.clone())
            .collect();
        if values.is_empty() {
            self.answers.remove(&step.id);
        } else {
            self.answers.insert(step.id.clone(), Answer::Multi(values));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StepKind;

    fn routing_step() -> StepDef {
        StepDef::new("step2", StepKind::Multi, "Route")
            .option(OptionDef::new("opt1", "One").votes_for(PathTag::A))
            .option(OptionDef::new("opt2", "Two").votes_for(PathTag::B))
            .option(OptionDef::new("opt3", "Three").votes_for(PathTag::A))
            .option(OptionDef::new("opt4", "Four"))
    }

    #[test]
    fn test_scores_count_only_selected_tagged_options() {
        let step = routing_step();
        let mut state = QuizState::new(step.id.clone());
        state.toggle(&step.id, 0);
        state.toggle(&step.id, 2);
        state.toggle(&step.id, 3);

        let scores = PathScores::from_selected(state.selected_options(&step));
        assert_eq!(scores, PathScores { a: 2, b: 0 });
        assert_eq!(scores.winner(), PathTag::A);
    }

    #[test]
    fn test_winner() {
        assert_eq!(PathScores { a: 0, b: 2 }.winner(), PathTag::B);
        assert_eq!(PathScores { a: 3, b: 2 }.winner(), PathTag::A);
        assert_eq!(PathScores { a: 1, b: 1 }.winner(), PathTag::A);
        assert_eq!(PathScores::default().winner(), PathTag::A);
    }

    #[test]
    fn test_selected_options_follow_display_order() {
        let step = routing_step();
        let mut state = QuizState::new(step.id.clone());
        state.toggle(&step.id, 2);
        state.toggle(&step.id, 0);
        state.record_selections(&step);
        assert_eq!(
            state.answers.get(&step.id),
            Some(&Answer::Multi(vec!["opt1".to_string(), "opt3".to_string()]))
        );
    }

    #[test]
    fn test_empty_selection_clears_answer() {
        let step = routing_step();
        let mut state = QuizState::new(step.id.clone());
        assert!(state.toggle(&step.id, 1));
        state.record_selections(&step);
        assert!(!state.toggle(&step.id, 1));
        state.record_selections(&step);
        assert!(!state.answers.contains_key(&step.id));
        assert_eq!(state.selected_count(&step.id), 0);
    }

    #[test]
    fn test_select_only_replaces_previous() {
        let id = StepId::new("step1");
        let mut state = QuizState::new(id.clone());
        state.select_only(&id, 0);
        state.select_only(&id, 2);
        assert!(!state.is_selected(&id, 0));
        assert!(state.is_selected(&id, 2));
        assert_eq!(state.selected_count(&id), 1);
    }
}
