use std::collections::HashSet;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::models::{FunnelDefinition, PathTag, StepId, StepKind};

/// Error type for loading a funnel definition.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse funnel definition: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("funnel definition must contain at least one step")]
    Empty,

    #[error("step {0} is defined more than once")]
    DuplicateStep(StepId),

    #[error("step {from} points at unknown step {to}")]
    UnknownStep { from: String, to: StepId },

    #[error("no entry step for path {0}")]
    MissingPathEntry(PathTag),

    #[error("routing step {0} must be a multi-select step")]
    RoutingStepNotMulti(StepId),

    #[error("step {step} has progress {progress}, expected 0-100")]
    InvalidProgress { step: StepId, progress: u8 },

    #[error("loading step {0} has no successor")]
    LoadingWithoutSuccessor(StepId),

    #[error("path {path} has a second loading step {step}")]
    DuplicateLoadingStep { path: PathTag, step: StepId },
}

pub fn load_funnel_from_json<P: AsRef<Path>>(path: P) -> Result<FunnelDefinition, LoadError> {
    let path = path.as_ref();
    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_funnel(&json_content)
}

pub fn parse_funnel(json: &str) -> Result<FunnelDefinition, LoadError> {
    let funnel: FunnelDefinition = serde_json::from_str(json)?;
    validate(&funnel)?;
    Ok(funnel)
}

/// Check that every reference in the step table resolves.
pub fn validate(funnel: &FunnelDefinition) -> Result<(), LoadError> {
    if funnel.steps.is_empty() {
        return Err(LoadError::Empty);
    }

    let mut seen = HashSet::new();
    for step in &funnel.steps {
        if !seen.insert(&step.id) {
            return Err(LoadError::DuplicateStep(step.id.clone()));
        }
    }

    let check = |from: &str, to: &StepId| {
        if seen.contains(to) {
            Ok(())
        } else {
            Err(LoadError::UnknownStep {
                from: from.to_string(),
                to: to.clone(),
            })
        }
    };

    check("start", &funnel.start)?;
    check("routing", &funnel.routing_step)?;

    for path in [PathTag::A, PathTag::B] {
        let entry = funnel
            .path_entry(path)
            .ok_or(LoadError::MissingPathEntry(path))?;
        check(&format!("path {path}"), entry)?;
    }

    let mut loading_paths = HashSet::new();
    for step in &funnel.steps {
        if let StepKind::Loading { path } = step.kind {
            if !loading_paths.insert(path) {
                return Err(LoadError::DuplicateLoadingStep {
                    path,
                    step: step.id.clone(),
                });
            }
        }

        for target in step.targets() {
            check(step.id.as_str(), target)?;
        }

        if let Some(progress) = step.progress {
            if progress > 100 {
                return Err(LoadError::InvalidProgress {
                    step: step.id.clone(),
                    progress,
                });
            }
        }

        if matches!(step.kind, StepKind::Loading { .. }) && step.successor.is_none() {
            return Err(LoadError::LoadingWithoutSuccessor(step.id.clone()));
        }

        if funnel.is_routing_step(&step.id) && step.kind != StepKind::Multi {
            return Err(LoadError::RoutingStepNotMulti(step.id.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "title": "Mini",
        "start": "intro",
        "routing_step": "route",
        "path_entries": { "A": "a", "B": "b" },
        "steps": [
            { "id": "intro", "kind": { "type": "single" }, "title": "Hi",
              "options": [ { "value": "go", "label": "Go", "next": "route" } ] },
            { "id": "route", "kind": { "type": "multi" }, "title": "Pick", "progress": 50,
              "options": [
                { "value": "x", "label": "X", "path": "A" },
                { "value": "y", "label": "Y", "path": "B" }
              ] },
            { "id": "a", "kind": { "type": "results", "path": "A" }, "title": "A" },
            { "id": "b", "kind": { "type": "results", "path": "B" }, "title": "B" }
        ]
    }"#;

    #[test]
    fn test_parse_minimal_funnel() {
        let funnel = parse_funnel(MINIMAL).unwrap();
        assert_eq!(funnel.steps.len(), 4);
        assert_eq!(funnel.progress_for(&StepId::new("route")), 50);
        assert_eq!(funnel.progress_for(&StepId::new("intro")), 0);
        let route = funnel.step(&StepId::new("route")).unwrap();
        assert_eq!(route.options[1].path, Some(PathTag::B));
    }

    #[test]
    fn test_rejects_dangling_reference() {
        let json = MINIMAL.replace(r#""next": "route""#, r#""next": "nowhere""#);
        match parse_funnel(&json) {
            Err(LoadError::UnknownStep { from, to }) => {
                assert_eq!(from, "intro");
                assert_eq!(to, StepId::new("nowhere"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_missing_path_entry() {
        let json = MINIMAL.replace(r#", "B": "b""#, "");
        assert!(matches!(
            parse_funnel(&json),
            Err(LoadError::MissingPathEntry(PathTag::B))
        ));
    }

    #[test]
    fn test_rejects_single_select_routing_step() {
        let json = MINIMAL.replace(r#""routing_step": "route""#, r#""routing_step": "intro""#);
        assert!(matches!(
            parse_funnel(&json),
            Err(LoadError::RoutingStepNotMulti(_))
        ));
    }

    #[test]
    fn test_rejects_out_of_range_progress() {
        let json = MINIMAL.replace(r#""progress": 50"#, r#""progress": 150"#);
        assert!(matches!(
            parse_funnel(&json),
            Err(LoadError::InvalidProgress { progress: 150, .. })
        ));
    }

    #[test]
    fn test_rejects_duplicate_step() {
        let json = MINIMAL.replace(r#""id": "b""#, r#""id": "a""#);
        assert!(matches!(parse_funnel(&json), Err(LoadError::DuplicateStep(_))));
    }

    #[test]
    fn test_rejects_second_loading_step_on_a_path() {
        let json = MINIMAL.replace(
            r#"{ "id": "a", "kind""#,
            r#"{ "id": "wait1", "kind": { "type": "loading", "path": "A" }, "title": "W", "successor": "a" },
            { "id": "wait2", "kind": { "type": "loading", "path": "A" }, "title": "W", "successor": "a" },
            { "id": "a", "kind""#,
        );
        match parse_funnel(&json) {
            Err(LoadError::DuplicateLoadingStep { path, step }) => {
                assert_eq!(path, PathTag::A);
                assert_eq!(step, StepId::new("wait2"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_empty_steps() {
        let json = r#"{ "title": "x", "start": "s", "routing_step": "s",
                        "path_entries": {}, "steps": [] }"#;
        assert!(matches!(parse_funnel(json), Err(LoadError::Empty)));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_funnel_from_json("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn test_builtin_round_trips_through_json() {
        let funnel = crate::data::nuora_funnel();
        let json = serde_json::to_string(&funnel).unwrap();
        assert_eq!(parse_funnel(&json).unwrap(), funnel);
    }
}
