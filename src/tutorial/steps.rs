//! Step definitions and the immutable step catalog

use serde::{Deserialize, Serialize};

use super::error::TutorialError;

/// Kind of instruction a step teaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepType {
    Movement,
    Aiming,
    Shooting,
    Pickup,
    /// Terminal step, only ever resolved by its timeout
    Complete,
}

impl StepType {
    pub const ALL: [StepType; 5] = [
        StepType::Movement,
        StepType::Aiming,
        StepType::Shooting,
        StepType::Pickup,
        StepType::Complete,
    ];

    /// Position in [`StepType::ALL`], used to index behaviour tables
    pub const fn index(self) -> usize {
        match self {
            StepType::Movement => 0,
            StepType::Aiming => 1,
            StepType::Shooting => 2,
            StepType::Pickup => 3,
            StepType::Complete => 4,
        }
    }

    /// Parse step type from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        match normalized.as_str() {
            "movement" | "move" => Some(StepType::Movement),
            "aiming" | "aim" => Some(StepType::Aiming),
            "shooting" | "shoot" | "fire" => Some(StepType::Shooting),
            "pickup" | "pick-up" | "interact" => Some(StepType::Pickup),
            "complete" | "done" | "finish" => Some(StepType::Complete),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StepType::Movement => "Movement",
            StepType::Aiming => "Aiming",
            StepType::Shooting => "Shooting",
            StepType::Pickup => "Pickup",
            StepType::Complete => "Complete",
        }
    }
}

impl std::fmt::Display for StepType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One instructional step: what to show, what it waits for, and how long
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub message: String,
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub timeout_secs: f32,
}

impl StepDefinition {
    pub fn new(step_type: StepType, message: impl Into<String>, timeout_secs: f32) -> Self {
        Self {
            message: message.into(),
            step_type,
            timeout_secs,
        }
    }
}

/// Ordered, validated list of tutorial steps. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct StepCatalog {
    steps: Vec<StepDefinition>,
}

impl StepCatalog {
    /// Build a catalog, rejecting steps whose timeout is not a positive finite number
    pub fn new(steps: Vec<StepDefinition>) -> Result<Self, TutorialError> {
        for (index, step) in steps.iter().enumerate() {
            if !step.timeout_secs.is_finite() || step.timeout_secs <= 0.0 {
                return Err(TutorialError::InvalidTimeout {
                    index,
                    timeout_secs: step.timeout_secs,
                });
            }
        }
        Ok(Self { steps })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StepDefinition> {
        self.steps.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepDefinition> {
        self.steps.iter()
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    /// Sum of every step's timeout
    pub fn total_timeout_secs(&self) -> f32 {
        self.steps.iter().map(|s| s.timeout_secs).sum()
    }
}

/// The standard five-step onboarding sequence
pub fn default_steps() -> Vec<StepDefinition> {
    vec![
        StepDefinition::new(
            StepType::Movement,
            "Use WASD or the arrow keys to move",
            8.0,
        ),
        StepDefinition::new(StepType::Aiming, "Move the mouse to aim", 5.0),
        StepDefinition::new(StepType::Shooting, "Click to shoot", 8.0),
        StepDefinition::new(StepType::Pickup, "Press E to pick up items", 10.0),
        StepDefinition::new(StepType::Complete, "You're ready. Good luck!", 3.0),
    ]
}

impl Default for StepCatalog {
    fn default() -> Self {
        Self {
            steps: default_steps(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = StepCatalog::default();
        assert_eq!(catalog.len(), 5);
        let types: Vec<StepType> = catalog.iter().map(|s| s.step_type).collect();
        assert_eq!(types, StepType::ALL.to_vec());
        assert_eq!(catalog.total_timeout_secs(), 34.0);
        // Defaults must satisfy the same validation as loaded catalogs
        assert!(StepCatalog::new(default_steps()).is_ok());
    }

    #[test]
    fn test_rejects_non_positive_timeout() {
        let steps = vec![
            StepDefinition::new(StepType::Movement, "move", 8.0),
            StepDefinition::new(StepType::Aiming, "aim", 0.0),
        ];
        match StepCatalog::new(steps) {
            Err(TutorialError::InvalidTimeout { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected InvalidTimeout, got {:?}", other),
        }

        let nan = vec![StepDefinition::new(StepType::Pickup, "pick", f32::NAN)];
        assert!(StepCatalog::new(nan).is_err());
    }

    #[test]
    fn test_empty_catalog_is_valid() {
        let catalog = StepCatalog::new(Vec::new()).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.get(0).is_none());
    }

    #[test]
    fn test_step_type_parsing() {
        assert_eq!(StepType::from_str("Movement"), Some(StepType::Movement));
        assert_eq!(StepType::from_str("  aim "), Some(StepType::Aiming));
        assert_eq!(StepType::from_str("pick_up"), Some(StepType::Pickup));
        assert_eq!(StepType::from_str("teleport"), None);
        for (i, step_type) in StepType::ALL.iter().enumerate() {
            assert_eq!(step_type.index(), i);
        }
    }

    #[test]
    fn test_step_definition_json() {
        let json = r#"{ "message": "Click to shoot", "type": "shooting", "timeout_secs": 8.0 }"#;
        let step: StepDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(step.step_type, StepType::Shooting);
        assert_eq!(step.timeout_secs, 8.0);
    }
}
