//! Assertion checking for scenario expectations

use super::parser::{ExpectedEvent, StateAssertion};
use crate::tutorial::{RecordingGates, TimedTutorialEvent, TutorialSequencer};

/// Tolerance for time comparisons
const TIME_EPSILON: f32 = 1e-3;

/// Error when an assertion fails
#[derive(Debug, Clone)]
pub struct AssertionError {
    pub message: String,
    pub expected: String,
    pub actual: String,
}

impl std::fmt::Display for AssertionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n    Expected: {}\n    Actual: {}", self.message, self.expected, self.actual)
    }
}

/// Captured event with timing info
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub frame: u64,
    pub time: f32,
    pub event_type: String,
    pub step: Option<usize>,
}

impl CapturedEvent {
    pub fn from_tutorial_event(frame: u64, timed: &TimedTutorialEvent) -> Self {
        Self {
            frame,
            time: timed.time,
            event_type: timed.event.name().to_string(),
            step: timed.event.step_index(),
        }
    }
}

/// Check if captured events match expected sequence (in order, gaps allowed)
pub fn check_sequence(expected: &[ExpectedEvent], captured: &[CapturedEvent]) -> Result<(), AssertionError> {
    let mut captured_idx = 0;

    for (i, exp) in expected.iter().enumerate() {
        // Find matching event starting from current position
        let found = captured[captured_idx..].iter().enumerate().find(|(_, cap)| {
            if cap.event_type != exp.event {
                return false;
            }
            if exp.step.is_some() && cap.step != exp.step {
                return false;
            }
            true
        });

        match found {
            Some((offset, cap)) => {
                if let Some(time) = exp.time {
                    if (cap.time - time).abs() > TIME_EPSILON {
                        return Err(AssertionError {
                            message: format!("Event #{} '{}' at the wrong time", i + 1, exp.event),
                            expected: format!("t = {}", time),
                            actual: format!("t = {} (frame {})", cap.time, cap.frame),
                        });
                    }
                }
                if let Some(min) = exp.time_min {
                    if cap.time < min - TIME_EPSILON {
                        return Err(AssertionError {
                            message: format!("Event #{} '{}' occurred too early", i + 1, exp.event),
                            expected: format!("t >= {}", min),
                            actual: format!("t = {} (frame {})", cap.time, cap.frame),
                        });
                    }
                }
                if let Some(max) = exp.time_max {
                    if cap.time > max + TIME_EPSILON {
                        return Err(AssertionError {
                            message: format!("Event #{} '{}' occurred too late", i + 1, exp.event),
                            expected: format!("t <= {}", max),
                            actual: format!("t = {} (frame {})", cap.time, cap.frame),
                        });
                    }
                }
                captured_idx += offset + 1;
            }
            None => {
                let step_str = exp.step.map(|s| format!(" (step: {})", s)).unwrap_or_default();
                return Err(AssertionError {
                    message: format!("Event #{} '{}'{} not found", i + 1, exp.event, step_str),
                    expected: format!("'{}' event in sequence", exp.event),
                    actual: format!("events after position {}: {:?}",
                        captured_idx,
                        captured[captured_idx..].iter().map(|e| &e.event_type).collect::<Vec<_>>()
                    ),
                });
            }
        }
    }

    Ok(())
}

/// Check that none of the named events were captured
pub fn check_absent(absent: &[String], captured: &[CapturedEvent]) -> Result<(), AssertionError> {
    for name in absent {
        if let Some(cap) = captured.iter().find(|c| &c.event_type == name) {
            return Err(AssertionError {
                message: format!("Event '{}' should never occur", name),
                expected: "no occurrence".to_string(),
                actual: format!("t = {} (frame {})", cap.time, cap.frame),
            });
        }
    }
    Ok(())
}

/// Sequencer and collaborator state for assertions
#[derive(Debug, Clone)]
pub struct SequencerState {
    pub time: f32,
    pub phase: String,
    pub index: usize,
    pub step_type: String,
    pub active: bool,
    pub waiting: bool,
    pub demo_move_active: bool,
    pub live_timers: usize,
    pub completions: u32,
    pub gates: RecordingGates,
}

impl SequencerState {
    pub fn capture(sequencer: &TutorialSequencer<RecordingGates>, completions: u32) -> Self {
        Self {
            time: sequencer.now(),
            phase: format!("{:?}", sequencer.phase()).to_lowercase(),
            index: sequencer.current_index(),
            step_type: sequencer
                .active_step_type()
                .map(|t| t.display_name().to_lowercase())
                .unwrap_or_else(|| "none".to_string()),
            active: sequencer.is_active(),
            waiting: sequencer.waiting_for_input(),
            demo_move_active: sequencer.is_demo_move_active(),
            live_timers: sequencer.live_timer_count(),
            completions,
            gates: sequencer.gates().clone(),
        }
    }

    fn lookup(&self, path: &str) -> Option<CheckValue> {
        let value = match path {
            "time" => CheckValue::Number(self.time),
            "phase" => CheckValue::Text(self.phase.clone()),
            "index" => CheckValue::Number(self.index as f32),
            "step_type" => CheckValue::Text(self.step_type.clone()),
            "active" => CheckValue::Bool(self.active),
            "waiting" => CheckValue::Bool(self.waiting),
            "demo_move_active" => CheckValue::Bool(self.demo_move_active),
            "live_timers" => CheckValue::Number(self.live_timers as f32),
            "completions" => CheckValue::Number(self.completions as f32),
            "gates.player_control" => CheckValue::Bool(self.gates.player_control_enabled),
            "gates.game_timer" => CheckValue::Bool(self.gates.game_timer_enabled),
            "gates.overlay_visible" => CheckValue::Bool(self.gates.overlay_visible),
            "gates.overlay_text" => CheckValue::Text(self.gates.overlay_text.clone()),
            "gates.moves_started" => CheckValue::Number(self.gates.moves_started as f32),
            "gates.moves_cancelled" => CheckValue::Number(self.gates.moves_cancelled as f32),
            "gates.shots_fired" => CheckValue::Number(self.gates.shots_fired as f32),
            "gates.move_active" => CheckValue::Bool(self.gates.active_move.is_some()),
            _ => return None,
        };
        Some(value)
    }
}

enum CheckValue {
    Bool(bool),
    Number(f32),
    Text(String),
}

/// Parse a check string into (path, operator, value)
fn parse_check(check: &str) -> Option<(&str, &str, &str)> {
    // Try operators in order of specificity (>= before >, etc.)
    for op in &[">=", "<=", "!=", "=", ">", "<"] {
        if let Some(idx) = check.find(op) {
            let path = check[..idx].trim();
            let value = check[idx + op.len()..].trim();
            return Some((path, op, value));
        }
    }
    None
}

/// Check state assertions against sequencer state
pub fn check_state(assertion: &StateAssertion, state: &SequencerState) -> Result<(), AssertionError> {
    for check in &assertion.checks {
        let (path, operator, expected_value) = parse_check(check).ok_or_else(|| AssertionError {
            message: format!("Invalid check syntax: {}", check),
            expected: "format: 'property = value' or 'property > value'".to_string(),
            actual: check.clone(),
        })?;

        let actual = state.lookup(path).ok_or_else(|| AssertionError {
            message: format!("Unknown property '{}' after frame {}", path, assertion.after_frame),
            expected: "a sequencer or gates.* property".to_string(),
            actual: path.to_string(),
        })?;

        match actual {
            CheckValue::Number(value) => check_float_comparison(path, value, operator, expected_value)?,
            CheckValue::Bool(value) => {
                check_equality(check, operator, expected_value, &value.to_string())?
            }
            CheckValue::Text(value) => check_equality(check, operator, expected_value, &value)?,
        }
    }

    Ok(())
}

/// Check `=` / `!=` against a textual value (quotes and case ignored)
fn check_equality(check: &str, operator: &str, expected: &str, actual: &str) -> Result<(), AssertionError> {
    let expected = expected.trim_matches('"');
    let equal = expected.eq_ignore_ascii_case(actual);
    let pass = match operator {
        "=" => equal,
        "!=" => !equal,
        _ => {
            return Err(AssertionError {
                message: format!("Operator '{}' not supported here: {}", operator, check),
                expected: "= or !=".to_string(),
                actual: operator.to_string(),
            });
        }
    };

    if !pass {
        return Err(AssertionError {
            message: format!("Check failed: {}", check),
            expected: format!("{} {}", operator, expected),
            actual: actual.to_string(),
        });
    }
    Ok(())
}

/// Check float comparison with operator
fn check_float_comparison(path: &str, actual: f32, operator: &str, expected_str: &str) -> Result<(), AssertionError> {
    let value: f32 = expected_str.trim().parse().map_err(|_| AssertionError {
        message: format!("Invalid value for {}", path),
        expected: "number".to_string(),
        actual: expected_str.to_string(),
    })?;

    let pass = match operator {
        ">=" => actual >= value - TIME_EPSILON,
        "<=" => actual <= value + TIME_EPSILON,
        ">" => actual > value,
        "<" => actual < value,
        "=" => (actual - value).abs() < TIME_EPSILON,
        "!=" => (actual - value).abs() >= TIME_EPSILON,
        _ => false,
    };

    if !pass {
        return Err(AssertionError {
            message: format!("Check failed: {} {} {} (actual: {:.3})", path, operator, expected_str, actual),
            expected: format!("{} {} {}", path, operator, value),
            actual: format!("{:.3}", actual),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured(event_type: &str, time: f32, step: Option<usize>) -> CapturedEvent {
        CapturedEvent {
            frame: (time * 4.0) as u64,
            time,
            event_type: event_type.to_string(),
            step,
        }
    }

    fn expected(event: &str, step: Option<usize>, time: Option<f32>) -> ExpectedEvent {
        ExpectedEvent {
            event: event.to_string(),
            step,
            time_min: None,
            time_max: None,
            time,
        }
    }

    #[test]
    fn test_sequence_in_order_with_gaps() {
        let events = vec![
            captured("Started", 0.0, None),
            captured("StepEntered", 0.0, Some(0)),
            captured("StepTimedOut", 8.0, Some(0)),
            captured("StepEntered", 9.0, Some(1)),
        ];
        let ok = vec![
            expected("Started", None, None),
            expected("StepEntered", Some(1), Some(9.0)),
        ];
        assert!(check_sequence(&ok, &events).is_ok());

        let wrong_time = vec![expected("StepEntered", Some(1), Some(8.0))];
        assert!(check_sequence(&wrong_time, &events).is_err());

        let out_of_order = vec![
            expected("StepEntered", Some(1), None),
            expected("Started", None, None),
        ];
        let err = check_sequence(&out_of_order, &events).unwrap_err();
        assert!(err.message.contains("not found"));
    }

    #[test]
    fn test_absent_events() {
        let events = vec![captured("Skipped", 2.0, Some(1))];
        assert!(check_absent(&["StepTimedOut".to_string()], &events).is_ok());
        assert!(check_absent(&["Skipped".to_string()], &events).is_err());
    }

    #[test]
    fn test_state_checks() {
        let state = SequencerState {
            time: 11.0,
            phase: "completed".to_string(),
            index: 1,
            step_type: "none".to_string(),
            active: false,
            waiting: false,
            demo_move_active: false,
            live_timers: 0,
            completions: 1,
            gates: RecordingGates::new(),
        };
        let assertion = StateAssertion {
            after_frame: 44,
            checks: vec![
                "phase = Completed".to_string(),
                "active = false".to_string(),
                "live_timers = 0".to_string(),
                "time >= 11".to_string(),
                "gates.player_control = true".to_string(),
            ],
        };
        assert!(check_state(&assertion, &state).is_ok());

        let failing = StateAssertion {
            after_frame: 44,
            checks: vec!["index > 1".to_string()],
        };
        assert!(check_state(&failing, &state).is_err());

        let unknown = StateAssertion {
            after_frame: 44,
            checks: vec!["score.left = 1".to_string()],
        };
        assert!(check_state(&unknown, &state).is_err());
    }
}
