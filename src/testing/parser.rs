//! TOML scenario file parsing

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::tutorial::{MoveDirection, StepDefinition, TutorialTiming};

/// Complete scenario definition from TOML file
#[derive(Debug, Deserialize)]
pub struct TestDefinition {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub setup: TestSetup,
    #[serde(default)]
    pub input: Vec<ScriptedFrame>,
    #[serde(default)]
    pub expect: TestExpectations,
}

/// Scenario setup configuration
#[derive(Debug, Deserialize)]
pub struct TestSetup {
    /// Seconds per frame
    #[serde(default = "default_dt")]
    pub dt: f32,
    /// Run only the exit sequence instead of starting
    #[serde(default)]
    pub skip_tutorial: bool,
    /// Call start() before frame 0
    #[serde(default = "default_true")]
    pub start: bool,
    /// Fixed frame count; by default run until the tutorial ends
    pub frames: Option<u64>,
    pub timing: Option<TutorialTiming>,
    /// Step catalog; the default five steps when omitted
    pub steps: Option<Vec<StepDefinition>>,
    /// Collaborators that reject every call
    #[serde(default)]
    pub unavailable: Vec<String>,
}

impl Default for TestSetup {
    fn default() -> Self {
        Self {
            dt: default_dt(),
            skip_tutorial: false,
            start: true,
            frames: None,
            timing: None,
            steps: None,
            unavailable: Vec::new(),
        }
    }
}

fn default_dt() -> f32 {
    0.25
}

fn default_true() -> bool {
    true
}

/// Input and API calls for one frame. Unset buttons are released.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScriptedFrame {
    pub frame: u64,
    pub direction: Option<MoveDirection>,
    /// Pointer delta as [x, y]
    pub pointer: Option<[f32; 2]>,
    #[serde(default)]
    pub fire: bool,
    #[serde(default)]
    pub interact: bool,
    #[serde(default)]
    pub skip: bool,
    /// Sequencer call made before the frame's tick: start, skip, complete or reset
    pub call: Option<String>,
}

/// Expected scenario outcomes
#[derive(Debug, Default, Deserialize)]
pub struct TestExpectations {
    #[serde(default)]
    pub sequence: Vec<ExpectedEvent>,
    /// Event names that must never be emitted
    #[serde(default)]
    pub absent: Vec<String>,
    /// Clock time of completion
    pub completed_at: Option<f32>,
    /// Number of completion notifications
    pub completions: Option<u32>,
    /// State assertions at different frames (uses [[expect.state]] TOML syntax)
    #[serde(default)]
    pub state: Vec<StateAssertion>,
}

/// Expected event in sequence
#[derive(Debug, Deserialize)]
pub struct ExpectedEvent {
    pub event: String,
    pub step: Option<usize>,
    pub time_min: Option<f32>,
    pub time_max: Option<f32>,
    /// Exact time (within a small tolerance)
    pub time: Option<f32>,
}

/// State assertion after a frame has run
#[derive(Debug, Clone, Deserialize)]
pub struct StateAssertion {
    pub after_frame: u64,
    #[serde(default)]
    pub checks: Vec<String>,
}

/// Parse a scenario file from path
pub fn parse_test_file(path: &Path) -> Result<TestDefinition, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    parse_test_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

pub fn parse_test_str(content: &str) -> Result<TestDefinition, String> {
    toml::from_str(content).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tutorial::StepType;

    #[test]
    fn test_parse_basic() {
        let toml = r#"
name = "Test"
[setup]
dt = 0.5

[[setup.steps]]
message = "Move"
type = "movement"
timeout_secs = 4.0

[[input]]
frame = 3
direction = "left"

[[input]]
frame = 5
pointer = [1.0, -2.0]
call = "skip"

[expect]
completions = 1

[[expect.sequence]]
event = "StepEntered"
step = 0
"#;
        let def = parse_test_str(toml).unwrap();
        assert_eq!(def.name, "Test");
        assert_eq!(def.setup.dt, 0.5);
        assert!(def.setup.start);
        let steps = def.setup.steps.unwrap();
        assert_eq!(steps[0].step_type, StepType::Movement);
        assert_eq!(def.input[0].direction, Some(MoveDirection::Left));
        assert!(!def.input[0].fire);
        assert_eq!(def.input[1].pointer, Some([1.0, -2.0]));
        assert_eq!(def.input[1].call.as_deref(), Some("skip"));
        assert_eq!(def.expect.completions, Some(1));
        assert_eq!(def.expect.sequence[0].step, Some(0));
    }

    #[test]
    fn test_minimal_file_uses_defaults() {
        let def = parse_test_str("name = \"Bare\"").unwrap();
        assert_eq!(def.setup.dt, 0.25);
        assert!(def.setup.steps.is_none());
        assert!(def.input.is_empty());
        assert!(def.expect.sequence.is_empty());
    }
}
