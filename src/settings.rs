//! Tutorial configuration
//!
//! Loads the step catalog, timing and the skip flag from
//! config/tutorial.json. A missing or broken file falls back to the built-in
//! defaults; CLI args override file settings.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::tutorial::{StepCatalog, StepDefinition, TutorialError, TutorialTiming, default_steps};

/// Path to the tutorial settings file
pub const SETTINGS_FILE: &str = "config/tutorial.json";

#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorialSettings {
    /// Bypass the tutorial entirely (still runs the exit sequence once)
    pub skip_tutorial: bool,
    pub timing: TutorialTiming,
    pub steps: Vec<StepDefinition>,
}

impl Default for TutorialSettings {
    fn default() -> Self {
        Self {
            skip_tutorial: false,
            timing: TutorialTiming::default(),
            steps: default_steps(),
        }
    }
}

impl TutorialSettings {
    /// Load settings from the default file, or defaults if it is missing or invalid
    pub fn load() -> Self {
        let path = Path::new(SETTINGS_FILE);
        if !path.exists() {
            info!("No {} found, using default tutorial", SETTINGS_FILE);
            return Self::default();
        }

        match Self::load_from_file(path) {
            Ok(settings) => {
                info!("Loaded tutorial settings from {}", SETTINGS_FILE);
                settings
            }
            Err(e) => {
                warn!("{}, using default tutorial", e);
                Self::default()
            }
        }
    }

    /// Read and validate a settings file
    pub fn load_from_file(path: &Path) -> Result<Self, TutorialError> {
        let content = fs::read_to_string(path).map_err(|source| TutorialError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, TutorialError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), TutorialError> {
        self.timing.validate()?;
        StepCatalog::new(self.steps.clone()).map(|_| ())
    }

    /// Validated step catalog for the sequencer
    pub fn catalog(&self) -> Result<StepCatalog, TutorialError> {
        StepCatalog::new(self.steps.clone())
    }

    /// Save current settings to the default file
    pub fn save(&self) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        if let Some(parent) = Path::new(SETTINGS_FILE).parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(SETTINGS_FILE, json)?;
        info!("Saved tutorial settings to {}", SETTINGS_FILE);
        Ok(())
    }

    /// Apply CLI argument overrides
    pub fn apply_cli_overrides(&mut self, args: &[String]) {
        for arg in args.iter().skip(1) {
            match arg.as_str() {
                "--skip-tutorial" => self.skip_tutorial = true,
                "--tutorial" => self.skip_tutorial = false,
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tutorial::StepType;

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings = TutorialSettings::from_json(r#"{ "skip_tutorial": true }"#).unwrap();
        assert!(settings.skip_tutorial);
        assert_eq!(settings.steps.len(), 5);
        assert_eq!(settings.timing, TutorialTiming::default());

        let timing = TutorialSettings::from_json(r#"{ "timing": { "transition_pause_secs": 2.0 } }"#)
            .unwrap()
            .timing;
        assert_eq!(timing.transition_pause_secs, 2.0);
        assert_eq!(timing.input_resolve_delay_secs, 0.5);
    }

    #[test]
    fn test_custom_steps() {
        let json = r#"{
            "steps": [
                { "message": "Move!", "type": "movement", "timeout_secs": 4.0 },
                { "message": "Done", "type": "complete", "timeout_secs": 1.0 }
            ]
        }"#;
        let settings = TutorialSettings::from_json(json).unwrap();
        let catalog = settings.catalog().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1).map(|s| s.step_type), Some(StepType::Complete));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let bad_timeout = r#"{ "steps": [ { "message": "x", "type": "aiming", "timeout_secs": -2.0 } ] }"#;
        assert!(matches!(
            TutorialSettings::from_json(bad_timeout),
            Err(TutorialError::InvalidTimeout { index: 0, .. })
        ));
        assert!(matches!(
            TutorialSettings::from_json("{ not json"),
            Err(TutorialError::JsonParse(_))
        ));
        assert!(matches!(
            TutorialSettings::load_from_file(Path::new("config/does_not_exist.json")),
            Err(TutorialError::Io { .. })
        ));
    }

    #[test]
    fn test_cli_overrides() {
        let mut settings = TutorialSettings::default();
        let args: Vec<String> = ["tutorial-demo", "--skip-tutorial"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        settings.apply_cli_overrides(&args);
        assert!(settings.skip_tutorial);
    }
}
