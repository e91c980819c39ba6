//! Timing and loading-screen configuration.
//!
//! Every field defaults to the values the funnel was designed around, so an
//! empty JSON object is a valid config file.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_AUTO_ADVANCE_MS: u64 = 300;
pub const DEFAULT_LOADING_INTERVAL_MS: u64 = 1200;
pub const DEFAULT_LOADING_TRAILING_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("at least one loading phase is required")]
    NoLoadingPhases,

    #[error("loading phase {index} has progress {progress}, expected 0-100")]
    InvalidPhaseProgress { index: usize, progress: u8 },
}

/// One tick of the loading screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadingPhase {
    pub progress: u8,
    pub text: String,
}

impl LoadingPhase {
    pub fn new(progress: u8, text: impl Into<String>) -> Self {
        Self {
            progress,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunnelConfig {
    /// Pause between a single-select click and the next step.
    pub auto_advance_ms: u64,
    /// Time between loading phases.
    pub loading_interval_ms: u64,
    /// Pause between the last loading phase and the results step.
    pub loading_trailing_ms: u64,
    pub loading_phases: Vec<LoadingPhase>,
}

impl Default for FunnelConfig {
    fn default() -> Self {
        Self {
            auto_advance_ms: DEFAULT_AUTO_ADVANCE_MS,
            loading_interval_ms: DEFAULT_LOADING_INTERVAL_MS,
            loading_trailing_ms: DEFAULT_LOADING_TRAILING_MS,
            loading_phases: vec![
                LoadingPhase::new(33, "Matching responses to research..."),
                LoadingPhase::new(66, "Reviewing clinical data..."),
                LoadingPhase::new(100, "Building personalized recommendation..."),
            ],
        }
    }
}

impl FunnelConfig {
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(json: &str) -> Result<Self, ConfigError> {
        let config: FunnelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.loading_phases.is_empty() {
            return Err(ConfigError::NoLoadingPhases);
        }
        for (index, phase) in self.loading_phases.iter().enumerate() {
            if phase.progress > 100 {
                return Err(ConfigError::InvalidPhaseProgress {
                    index,
                    progress: phase.progress,
                });
            }
        }
        Ok(())
    }

    pub fn auto_advance(&self) -> Duration {
        Duration::from_millis(self.auto_advance_ms)
    }

    pub fn loading_interval(&self) -> Duration {
        Duration::from_millis(self.loading_interval_ms)
    }

    pub fn loading_trailing(&self) -> Duration {
        Duration::from_millis(self.loading_trailing_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = FunnelConfig::parse("{}").unwrap();
        assert_eq!(config, FunnelConfig::default());
        assert_eq!(config.auto_advance(), Duration::from_millis(300));
        assert_eq!(config.loading_interval(), Duration::from_millis(1200));
        assert_eq!(config.loading_trailing(), Duration::from_millis(500));
        let progress: Vec<u8> = config.loading_phases.iter().map(|p| p.progress).collect();
        assert_eq!(progress, vec![33, 66, 100]);
    }

    #[test]
    fn test_partial_override() {
        let config = FunnelConfig::parse(r#"{ "auto_advance_ms": 0 }"#).unwrap();
        assert_eq!(config.auto_advance_ms, 0);
        assert_eq!(config.loading_interval_ms, DEFAULT_LOADING_INTERVAL_MS);
    }

    #[test]
    fn test_rejects_no_phases() {
        assert!(matches!(
            FunnelConfig::parse(r#"{ "loading_phases": [] }"#),
            Err(ConfigError::NoLoadingPhases)
        ));
    }

    #[test]
    fn test_rejects_phase_over_100() {
        let json = r#"{ "loading_phases": [ { "progress": 120, "text": "x" } ] }"#;
        assert!(matches!(
            FunnelConfig::parse(json),
            Err(ConfigError::InvalidPhaseProgress { index: 0, progress: 120 })
        ));
    }
}
