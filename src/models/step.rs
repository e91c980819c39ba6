use std::fmt;

use serde::{Deserialize, Serialize};

use super::chart::ChartSpec;

/// Stable identifier of a funnel step, e.g. `step4a-stats`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One of the two content branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PathTag {
    A,
    B,
}

impl fmt::Display for PathTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathTag::A => f.write_str("A"),
            PathTag::B => f.write_str("B"),
        }
    }
}

/// How a step behaves when the user interacts with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepKind {
    /// Pick one option; the funnel advances on its own.
    Single,
    /// Pick any number of options, then press continue.
    Multi,
    /// Read-only content with a continue control.
    Info,
    /// Fake analysis screen that advances to its successor when done.
    Loading { path: PathTag },
    /// Final screen of a path.
    Results { path: PathTag },
}

impl StepKind {
    /// Whether the step shows a continue control.
    pub fn has_continue(&self) -> bool {
        matches!(self, StepKind::Multi | StepKind::Info)
    }
}

/// A selectable answer on a single- or multi-select step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDef {
    pub value: String,
    pub label: String,
    /// Target of a single-select click.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<StepId>,
    /// Path this option votes for on the routing step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathTag>,
}

impl OptionDef {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            next: None,
            path: None,
        }
    }

    pub fn leads_to(mut self, next: impl Into<String>) -> Self {
        self.next = Some(StepId::new(next));
        self
    }

    pub fn votes_for(mut self, path: PathTag) -> Self {
        self.path = Some(path);
        self
    }
}

/// Static definition of one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDef {
    pub id: StepId,
    pub kind: StepKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDef>,
    /// Fixed next step for continue controls and loading screens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub successor: Option<StepId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartSpec>,
}

impl StepDef {
    pub fn new(id: impl Into<String>, kind: StepKind, title: impl Into<String>) -> Self {
        Self {
            id: StepId::new(id),
            kind,
            title: title.into(),
            body: None,
            options: Vec::new(),
            successor: None,
            progress: None,
            chart: None,
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn option(mut self, option: OptionDef) -> Self {
        self.options.push(option);
        self
    }

    pub fn successor(mut self, next: impl Into<String>) -> Self {
        self.successor = Some(StepId::new(next));
        self
    }

    pub fn progress(mut self, percent: u8) -> Self {
        self.progress = Some(percent);
        self
    }

    pub fn chart(mut self, chart: ChartSpec) -> Self {
        self.chart = Some(chart);
        self
    }

    pub fn option_index(&self, value: &str) -> Option<usize> {
        self.options.iter().position(|o| o.value == value)
    }

    /// Every step id this step can move to.
    pub fn targets(&self) -> impl Iterator<Item = &StepId> {
        self.options
            .iter()
            .filter_map(|o| o.next.as_ref())
            .chain(self.successor.iter())
    }
}
