use serde::{Deserialize, Serialize};

use super::step::PathTag;

pub const PATH_A_COLOR: &str = "#FAC515";
pub const PATH_B_COLOR: &str = "#5DADE2";

const NEUTRAL_FILL: &str = "#E0E0E0";
const NEUTRAL_LINE: &str = "#BDBDBD";

const COMPARISON_LABELS: [&str; 2] = ["Conventional Treatments", "Nuora"];
const COMPARISON_VALUES: [f64; 2] = [1.0, 4.5];
const COMPARISON_MAX: f64 = 5.0;

const TIMELINE_LABELS: [&str; 5] = ["Now", "Week 1", "Week 2", "Week 3", "Month 1"];
const TIMELINE_WITHOUT: [f64; 5] = [50.0, 45.0, 40.0, 35.0, 30.0];
const TIMELINE_WITH: [f64; 5] = [50.0, 65.0, 80.0, 90.0, 95.0];

pub fn path_color(path: PathTag) -> &'static str {
    match path {
        PathTag::A => PATH_A_COLOR,
        PathTag::B => PATH_B_COLOR,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Two bars: conventional treatments against the product.
    Comparison,
    /// Two lines over the first month, with and without the product.
    Timeline,
    /// One rising line through the user's milestones.
    Journey,
}

/// Per-step chart parameters. Everything else about the chart is fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub canvas: String,
    pub kind: ChartKind,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub milestones: Vec<String>,
}

impl ChartSpec {
    pub fn comparison(canvas: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            canvas: canvas.into(),
            kind: ChartKind::Comparison,
            color: color.into(),
            title: None,
            labels: Vec::new(),
            milestones: Vec::new(),
        }
    }

    pub fn timeline(
        canvas: impl Into<String>,
        color: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            canvas: canvas.into(),
            kind: ChartKind::Timeline,
            color: color.into(),
            title: Some(title.into()),
            labels: Vec::new(),
            milestones: Vec::new(),
        }
    }

    pub fn journey(
        canvas: impl Into<String>,
        color: impl Into<String>,
        title: impl Into<String>,
        labels: &[&str],
        milestones: &[&str],
    ) -> Self {
        Self {
            canvas: canvas.into(),
            kind: ChartKind::Journey,
            color: color.into(),
            title: Some(title.into()),
            labels: labels.iter().map(|s| s.to_string()).collect(),
            milestones: milestones.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Materialize the series the view draws.
    pub fn build(&self) -> Chart {
        match self.kind {
            ChartKind::Comparison => Chart {
                canvas: self.canvas.clone(),
                kind: self.kind,
                title: self.title.clone(),
                labels: COMPARISON_LABELS.iter().map(|s| s.to_string()).collect(),
                series: vec![Series {
                    name: "Effectiveness".to_string(),
                    values: COMPARISON_VALUES.to_vec(),
                    colors: vec![NEUTRAL_FILL.to_string(), self.color.clone()],
                }],
                y_max: COMPARISON_MAX,
                value_suffix: Some("x".to_string()),
                point_notes: Vec::new(),
            },
            ChartKind::Timeline => Chart {
                canvas: self.canvas.clone(),
                kind: self.kind,
                title: self.title.clone(),
                labels: TIMELINE_LABELS.iter().map(|s| s.to_string()).collect(),
                series: vec![
                    Series {
                        name: "Without Nuora".to_string(),
                        values: TIMELINE_WITHOUT.to_vec(),
                        colors: vec![NEUTRAL_LINE.to_string()],
                    },
                    Series {
                        name: "With Nuora".to_string(),
                        values: TIMELINE_WITH.to_vec(),
                        colors: vec![self.color.clone()],
                    },
                ],
                y_max: 100.0,
                value_suffix: None,
                point_notes: Vec::new(),
            },
            ChartKind::Journey => {
                let step = 100.0 / self.labels.len().max(1) as f64;
                let values = (1..=self.labels.len()).map(|i| i as f64 * step).collect();
                Chart {
                    canvas: self.canvas.clone(),
                    kind: self.kind,
                    title: self.title.clone(),
                    labels: self.labels.clone(),
                    series: vec![Series {
                        name: "Progress".to_string(),
                        values,
                        colors: vec![self.color.clone()],
                    }],
                    y_max: 100.0,
                    value_suffix: None,
                    point_notes: self.milestones.clone(),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
    /// One colour for the whole series, or one per value.
    pub colors: Vec<String>,
}

impl Series {
    pub fn color_at(&self, index: usize) -> &str {
        self.colors
            .get(index)
            .or_else(|| self.colors.first())
            .map(String::as_str)
            .unwrap_or(NEUTRAL_LINE)
    }
}

/// A chart instance, created once per canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub canvas: String,
    pub kind: ChartKind,
    pub title: Option<String>,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    pub y_max: f64,
    pub value_suffix: Option<String>,
    /// Text attached to each point, e.g. journey milestones.
    pub point_notes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_highlights_second_bar() {
        let chart = ChartSpec::comparison("chartPathA1", PATH_A_COLOR).build();
        let series = &chart.series[0];
        assert_eq!(series.values, vec![1.0, 4.5]);
        assert_eq!(series.color_at(0), NEUTRAL_FILL);
        assert_eq!(series.color_at(1), PATH_A_COLOR);
        assert_eq!(chart.y_max, 5.0);
        assert_eq!(chart.value_suffix.as_deref(), Some("x"));
    }

    #[test]
    fn test_timeline_has_two_series() {
        let chart = ChartSpec::timeline("chartPathB2", PATH_B_COLOR, "Moisture").build();
        assert_eq!(chart.labels.len(), 5);
        assert_eq!(chart.series[0].name, "Without Nuora");
        assert_eq!(chart.series[1].values.last(), Some(&95.0));
        assert_eq!(chart.series[1].color_at(3), PATH_B_COLOR);
    }

    #[test]
    fn test_journey_spreads_values_evenly() {
        let chart = ChartSpec::journey(
            "chartResultsB",
            PATH_B_COLOR,
            "Your Moisture Journey",
            &["Week 1", "Week 3", "Week 6+"],
            &["Environment resets", "Comfort returns", "Natural moisture"],
        )
        .build();
        let values = &chart.series[0].values;
        assert_eq!(values.len(), 3);
        assert!((values[0] - 33.333).abs() < 0.01);
        assert!((values[2] - 100.0).abs() < 1e-9);
        assert_eq!(chart.point_notes[1], "Comfort returns");
    }

    #[test]
    fn test_path_colors() {
        assert_eq!(path_color(PathTag::A), "#FAC515");
        assert_eq!(path_color(PathTag::B), "#5DADE2");
    }
}
