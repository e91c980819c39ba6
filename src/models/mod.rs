mod chart;
mod funnel;
mod step;

pub use chart::{path_color, Chart, ChartKind, ChartSpec, Series, PATH_A_COLOR, PATH_B_COLOR};
pub use funnel::FunnelDefinition;
pub use step::{OptionDef, PathTag, StepDef, StepId, StepKind};
