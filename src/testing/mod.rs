//! Scenario testing system for deterministic tutorial testing
//!
//! Provides infrastructure for running scripted input against a headless
//! sequencer to verify step timing, skip handling and collaborator state.

use std::fs;
use std::path::{Path, PathBuf};

pub mod assertions;
pub mod input;
pub mod parser;
pub mod runner;

pub use assertions::{AssertionError, CapturedEvent, SequencerState, check_absent, check_sequence, check_state};
pub use input::{ScriptedCall, ScriptedInputs};
pub use parser::{ExpectedEvent, ScriptedFrame, StateAssertion, TestDefinition, TestExpectations, TestSetup, parse_test_file, parse_test_str};
pub use runner::{TestResult, run_test, run_test_file};

/// Default path for test scenarios
pub const SCENARIOS_DIR: &str = "tests/scenarios";

/// Safety limit for scenarios that never finish
pub const MAX_SCENARIO_FRAMES: u64 = 100_000;

/// Find scenario files under `base`, optionally keeping only paths containing `filter`
pub fn discover_scenarios(base: &Path, filter: Option<&str>) -> Vec<PathBuf> {
    let mut scenarios = Vec::new();
    discover_recursive(base, base, filter, &mut scenarios);
    scenarios.sort();
    scenarios
}

fn discover_recursive(base: &Path, current: &Path, filter: Option<&str>, found: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(current) {
        Ok(e) => e,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();

        if path.is_dir() {
            discover_recursive(base, &path, filter, found);
        } else if path.extension().is_some_and(|e| e == "toml") {
            if let Some(f) = filter {
                let rel = path.strip_prefix(base).unwrap_or(&path).to_string_lossy();
                if !rel.contains(f) {
                    continue;
                }
            }
            found.push(path);
        }
    }
}
