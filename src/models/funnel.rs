use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::step::{PathTag, StepDef, StepId, StepKind};

/// The complete, static step table of a funnel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelDefinition {
    pub title: String,
    pub start: StepId,
    /// The multi-select step whose tagged answers pick the path.
    pub routing_step: StepId,
    pub path_entries: BTreeMap<PathTag, StepId>,
    pub steps: Vec<StepDef>,
}

impl FunnelDefinition {
    pub fn step(&self, id: &StepId) -> Option<&StepDef> {
        self.steps.iter().find(|s| &s.id == id)
    }

    pub fn path_entry(&self, path: PathTag) -> Option<&StepId> {
        self.path_entries.get(&path)
    }

    /// Progress shown for a step. Unknown or unmapped steps show 0.
    pub fn progress_for(&self, id: &StepId) -> u8 {
        self.step(id).and_then(|s| s.progress).unwrap_or(0)
    }

    pub fn loading_step(&self, path: PathTag) -> Option<&StepDef> {
        self.steps
            .iter()
            .find(|s| s.kind == StepKind::Loading { path })
    }

    pub fn is_routing_step(&self, id: &StepId) -> bool {
        &self.routing_step == id
    }

    pub fn canvases(&self) -> impl Iterator<Item = &str> {
        self.steps
            .iter()
            .filter_map(|s| s.chart.as_ref())
            .map(|c| c.canvas.as_str())
    }
}
