//! Scenario execution engine
//!
//! Drives a sequencer wired to [`RecordingGates`] frame by frame with a fixed
//! dt, so every run of a scenario is identical.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::tutorial::{Collaborator, RecordingGates, StepCatalog, TutorialSequencer};

use super::MAX_SCENARIO_FRAMES;
use super::assertions::{
    AssertionError, CapturedEvent, SequencerState, check_absent, check_sequence, check_state,
};
use super::input::{ScriptedCall, ScriptedInputs};
use super::parser::{TestDefinition, parse_test_file};

/// Result of running a scenario
#[derive(Debug)]
pub enum TestResult {
    Pass { frames: u64 },
    Fail { error: AssertionError },
    Error { message: String },
}

impl TestResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass { .. })
    }
}

/// Parse and run a scenario file
pub fn run_test_file(path: &Path) -> TestResult {
    match parse_test_file(path) {
        Ok(test) => run_test(&test),
        Err(message) => TestResult::Error { message },
    }
}

fn parse_collaborator(name: &str) -> Option<Collaborator> {
    match name.trim().to_lowercase().replace('-', "_").as_str() {
        "player_control" | "player" => Some(Collaborator::PlayerControl),
        "game_timer" | "timer" => Some(Collaborator::GameTimer),
        "overlay" => Some(Collaborator::Overlay),
        "demo_move" => Some(Collaborator::DemoMove),
        "demo_shot" => Some(Collaborator::DemoShot),
        _ => None,
    }
}

/// Build the sequencer described by the scenario setup
fn build_sequencer(
    test: &TestDefinition,
    completions: Arc<AtomicU32>,
) -> Result<TutorialSequencer<RecordingGates>, String> {
    let setup = &test.setup;

    let catalog = match &setup.steps {
        Some(steps) => StepCatalog::new(steps.clone()).map_err(|e| e.to_string())?,
        None => StepCatalog::default(),
    };

    let timing = setup.timing.unwrap_or_default();
    timing.validate().map_err(|e| e.to_string())?;

    let unavailable = setup
        .unavailable
        .iter()
        .map(|name| parse_collaborator(name).ok_or_else(|| format!("Unknown collaborator '{}'", name)))
        .collect::<Result<Vec<_>, _>>()?;

    let sequencer = TutorialSequencer::new(catalog, timing, RecordingGates::with_unavailable(&unavailable))
        .with_on_complete(move || {
            completions.fetch_add(1, Ordering::SeqCst);
        });
    Ok(sequencer)
}

/// Run a single scenario and return the result
pub fn run_test(test: &TestDefinition) -> TestResult {
    let setup = &test.setup;
    if !setup.dt.is_finite() || setup.dt <= 0.0 {
        return TestResult::Error {
            message: format!("dt must be a positive number, got {}", setup.dt),
        };
    }

    let completions = Arc::new(AtomicU32::new(0));
    let mut sequencer = match build_sequencer(test, completions.clone()) {
        Ok(sequencer) => sequencer,
        Err(message) => return TestResult::Error { message },
    };

    let mut scripted = match ScriptedInputs::from_frames(&test.input) {
        Ok(scripted) => scripted,
        Err(message) => return TestResult::Error { message },
    };
    for state in &test.expect.state {
        scripted.set_max_frame(state.after_frame);
    }

    // Collect state check frames
    let mut state_check_frames: Vec<u64> = test.expect.state.iter().map(|s| s.after_frame).collect();
    state_check_frames.sort();
    state_check_frames.dedup();

    let mut captured: Vec<CapturedEvent> = Vec::new();

    if setup.skip_tutorial {
        sequencer.complete();
    } else if setup.start {
        sequencer.start();
    }
    captured.extend(
        sequencer
            .events_mut()
            .drain()
            .iter()
            .map(|e| CapturedEvent::from_tutorial_event(0, e)),
    );

    let mut frame = 0u64;
    loop {
        let done = match setup.frames {
            Some(frames) => frame >= frames,
            None => !sequencer.is_active(),
        };
        if done && !scripted.has_remaining() {
            break;
        }
        if frame >= MAX_SCENARIO_FRAMES {
            return TestResult::Error {
                message: format!(
                    "Scenario still running after {} frames (t = {:.2})",
                    MAX_SCENARIO_FRAMES,
                    sequencer.now()
                ),
            };
        }

        let (call, input) = scripted.advance_frame();
        match call {
            Some(ScriptedCall::Start) => sequencer.start(),
            Some(ScriptedCall::Skip) => sequencer.skip(),
            Some(ScriptedCall::Complete) => sequencer.complete(),
            Some(ScriptedCall::Reset) => sequencer.reset(),
            None => {}
        }
        sequencer.tick(setup.dt, &input);

        captured.extend(
            sequencer
                .events_mut()
                .drain()
                .iter()
                .map(|e| CapturedEvent::from_tutorial_event(frame, e)),
        );

        // Run state checks for this frame
        if state_check_frames.binary_search(&frame).is_ok() {
            let state = SequencerState::capture(&sequencer, completions.load(Ordering::SeqCst));
            for assertion in test.expect.state.iter().filter(|a| a.after_frame == frame) {
                if let Err(error) = check_state(assertion, &state) {
                    return TestResult::Fail { error };
                }
            }
        }

        frame += 1;
    }

    if let Err(error) = check_sequence(&test.expect.sequence, &captured) {
        return TestResult::Fail { error };
    }
    if let Err(error) = check_absent(&test.expect.absent, &captured) {
        return TestResult::Fail { error };
    }

    if let Some(expected) = test.expect.completed_at {
        let matches = sequencer
            .completed_at()
            .is_some_and(|t| (t - expected).abs() < 1e-3);
        if !matches {
            return TestResult::Fail {
                error: AssertionError {
                    message: "Completion time mismatch".to_string(),
                    expected: format!("t = {}", expected),
                    actual: format!("{:?}", sequencer.completed_at()),
                },
            };
        }
    }

    if let Some(expected) = test.expect.completions {
        let actual = completions.load(Ordering::SeqCst);
        if actual != expected {
            return TestResult::Fail {
                error: AssertionError {
                    message: "Completion callback count mismatch".to_string(),
                    expected: expected.to_string(),
                    actual: actual.to_string(),
                },
            };
        }
    }

    TestResult::Pass { frames: frame }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::parser::parse_test_str;

    #[test]
    fn test_default_run_passes() {
        let test = parse_test_str(
            r#"
name = "Timeout only"
[expect]
completed_at = 38.0
completions = 1
"#,
        )
        .unwrap();
        let result = run_test(&test);
        assert!(result.is_pass(), "{:?}", result);
    }

    #[test]
    fn test_failed_expectation_reported() {
        let test = parse_test_str(
            r#"
name = "Wrong time"
[expect]
completed_at = 30.0
"#,
        )
        .unwrap();
        assert!(matches!(run_test(&test), TestResult::Fail { .. }));
    }

    #[test]
    fn test_bad_setup_is_error() {
        let test = parse_test_str(
            r#"
name = "Bad collaborator"
[setup]
unavailable = ["jukebox"]
"#,
        )
        .unwrap();
        assert!(matches!(run_test(&test), TestResult::Error { .. }));
    }

    #[test]
    fn test_unstarted_fixed_frames() {
        let test = parse_test_str(
            r#"
name = "Never started"
[setup]
start = false
frames = 8

[expect]
completions = 0
absent = ["Started"]

[[expect.state]]
after_frame = 7
checks = ["phase = idle", "time = 0", "active = false"]
"#,
        )
        .unwrap();
        let result = run_test(&test);
        assert!(result.is_pass(), "{:?}", result);
    }
}
