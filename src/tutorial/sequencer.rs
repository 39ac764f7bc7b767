//! Tutorial state machine
//!
//! `Idle -> InStep(0) -> [input | timeout] -> ... -> Completed`.
//!
//! A step resolves either by qualifying input (the timeout is cancelled and
//! the next step follows after a short resolve delay) or by its timeout
//! (a transition pause, then the next step). `skip` and `complete` cancel
//! every outstanding timer before running the exit sequence, so nothing
//! scheduled during the run can fire afterwards.

use bevy::log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::detector::{self, FrameInput, SideEffect, StepFlags};
use super::error::{GateError, TutorialError};
use super::events::{TutorialEvent, TutorialEventLog};
use super::gates::{BoundedMove, ExternalGates};
use super::steps::{StepCatalog, StepDefinition, StepType};
use super::timers::{FiredTimer, TimerHandle, TimerScheduler};
use crate::constants::*;

/// Fixed delays used between and inside steps
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorialTiming {
    /// Pause after a step times out, before the next step appears
    pub transition_pause_secs: f32,
    /// Delay after qualifying input, before the next step appears
    pub input_resolve_delay_secs: f32,
    pub demo_move_distance: f32,
    pub demo_move_duration_secs: f32,
}

impl Default for TutorialTiming {
    fn default() -> Self {
        Self {
            transition_pause_secs: TRANSITION_PAUSE_SECS,
            input_resolve_delay_secs: INPUT_RESOLVE_DELAY_SECS,
            demo_move_distance: DEMO_MOVE_DISTANCE,
            demo_move_duration_secs: DEMO_MOVE_DURATION_SECS,
        }
    }
}

impl TutorialTiming {
    pub fn validate(&self) -> Result<(), TutorialError> {
        let fields = [
            ("transition_pause_secs", self.transition_pause_secs),
            ("input_resolve_delay_secs", self.input_resolve_delay_secs),
            ("demo_move_distance", self.demo_move_distance),
            ("demo_move_duration_secs", self.demo_move_duration_secs),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(TutorialError::InvalidTiming { name, value });
            }
        }
        Ok(())
    }
}

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TutorialPhase {
    /// Not started this run
    #[default]
    Idle,
    /// A step is shown and its timeout is armed (or its input is resolving)
    InStep,
    /// Between a timed-out step and the next one
    Transition,
    /// Finished or skipped; nothing further happens until `reset`
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TutorialTimer {
    StepTimeout { step: usize },
    InputResolve { step: usize },
    TransitionPause { next: usize },
    DemoMove,
}

pub type CompletionCallback = Box<dyn FnMut() + Send + Sync>;

/// Drives the onboarding sequence and the collaborators behind `G`
pub struct TutorialSequencer<G> {
    catalog: StepCatalog,
    timing: TutorialTiming,
    gates: G,
    timers: TimerScheduler<TutorialTimer>,
    phase: TutorialPhase,
    current_index: usize,
    waiting_for_input: bool,
    flags: StepFlags,
    timeout: Option<TimerHandle>,
    resolve: Option<TimerHandle>,
    pause: Option<TimerHandle>,
    demo_move: Option<TimerHandle>,
    completed_at: Option<f32>,
    on_complete: Option<CompletionCallback>,
    events: TutorialEventLog,
}

/// Log a failed gate call and report whether it went through
fn gate_ok(result: Result<(), GateError>, action: &str) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!("Tutorial could not {}: {}", action, e);
            false
        }
    }
}

impl<G: ExternalGates> TutorialSequencer<G> {
    pub fn new(catalog: StepCatalog, timing: TutorialTiming, gates: G) -> Self {
        Self {
            catalog,
            timing,
            gates,
            timers: TimerScheduler::new(),
            phase: TutorialPhase::Idle,
            current_index: 0,
            waiting_for_input: false,
            flags: StepFlags::default(),
            timeout: None,
            resolve: None,
            pause: None,
            demo_move: None,
            completed_at: None,
            on_complete: None,
            events: TutorialEventLog::new(),
        }
    }

    pub fn with_on_complete(mut self, callback: impl FnMut() + Send + Sync + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn set_on_complete(&mut self, callback: impl FnMut() + Send + Sync + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    // =========================================================================
    // PUBLIC CONTROL
    // =========================================================================

    /// Begin the sequence at step 0. Ignored unless the sequencer is idle.
    pub fn start(&mut self) {
        if self.phase != TutorialPhase::Idle {
            debug!("Tutorial start ignored (phase {:?})", self.phase);
            return;
        }

        let now = self.timers.now();
        self.phase = TutorialPhase::InStep;
        self.current_index = 0;
        self.completed_at = None;
        info!("Tutorial started ({} steps)", self.catalog.len());
        self.events.emit(
            now,
            TutorialEvent::Started {
                steps: self.catalog.len(),
            },
        );

        gate_ok(self.gates.set_player_control_enabled(false), "disable player control");
        gate_ok(self.gates.set_game_timer_enabled(false), "pause the game timer");
        gate_ok(self.gates.show_overlay(true), "show the overlay");

        self.enter_step(0, now);
    }

    /// Abandon the tutorial from any step. No-op unless active.
    pub fn skip(&mut self) {
        if !self.is_active() {
            debug!("Tutorial skip ignored: not active");
            return;
        }
        let now = self.timers.now();
        info!("Tutorial skipped at step {}", self.current_index + 1);
        self.events.emit(
            now,
            TutorialEvent::Skipped {
                index: self.current_index,
            },
        );
        self.finish(now);
    }

    /// Run the exit sequence. Safe to call before `start` and idempotent.
    pub fn complete(&mut self) {
        let now = self.timers.now();
        self.finish(now);
    }

    /// Return a finished sequencer to idle so another run can start
    pub fn reset(&mut self) {
        if self.is_active() {
            warn!("Tutorial reset ignored while the tutorial is running");
            return;
        }
        self.clear_timers();
        self.phase = TutorialPhase::Idle;
        self.current_index = 0;
        self.waiting_for_input = false;
        self.flags.reset();
        self.completed_at = None;
    }

    /// Advance the clock by `dt` seconds and process one frame of input.
    ///
    /// Input is evaluated before any timer fires, so input arriving in the
    /// same tick a timeout falls due wins over the timeout.
    pub fn tick(&mut self, dt: f32, input: &FrameInput) {
        if !self.is_active() {
            return;
        }
        self.timers.advance(dt);

        if input.skip_pressed {
            self.skip();
            return;
        }

        if self.waiting_for_input {
            self.evaluate_input(input);
        }

        while self.is_active() {
            let Some(fired) = self.timers.pop_due() else {
                break;
            };
            self.handle_timer(fired);
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn is_active(&self) -> bool {
        matches!(self.phase, TutorialPhase::InStep | TutorialPhase::Transition)
    }

    /// Type of the step the session is on, while active
    pub fn active_step_type(&self) -> Option<StepType> {
        if !self.is_active() {
            return None;
        }
        self.catalog.get(self.current_index).map(|s| s.step_type)
    }

    pub fn is_in_movement_step(&self) -> bool {
        self.active_step_type() == Some(StepType::Movement)
    }

    pub fn is_in_shooting_step(&self) -> bool {
        self.active_step_type() == Some(StepType::Shooting)
    }

    /// Whether normal movement input should be ignored by the player controller
    pub fn should_block_player_input(&self) -> bool {
        self.is_in_movement_step()
    }

    pub fn phase(&self) -> TutorialPhase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_step(&self) -> Option<&StepDefinition> {
        self.catalog.get(self.current_index)
    }

    pub fn waiting_for_input(&self) -> bool {
        self.waiting_for_input
    }

    pub fn flags(&self) -> StepFlags {
        self.flags
    }

    /// Current time on the sequencer clock
    pub fn now(&self) -> f32 {
        self.timers.now()
    }

    /// Clock time at which the last run completed
    pub fn completed_at(&self) -> Option<f32> {
        self.completed_at
    }

    /// Seconds left before the current step times out
    pub fn timeout_remaining(&self) -> Option<f32> {
        self.timeout.and_then(|h| self.timers.remaining(h))
    }

    pub fn is_demo_move_active(&self) -> bool {
        self.demo_move.is_some_and(|h| self.timers.is_live(h))
    }

    /// Number of armed timers of any kind
    pub fn live_timer_count(&self) -> usize {
        self.timers.live_count()
    }

    pub fn catalog(&self) -> &StepCatalog {
        &self.catalog
    }

    pub fn timing(&self) -> &TutorialTiming {
        &self.timing
    }

    pub fn gates(&self) -> &G {
        &self.gates
    }

    pub fn gates_mut(&mut self) -> &mut G {
        &mut self.gates
    }

    pub fn events(&self) -> &TutorialEventLog {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut TutorialEventLog {
        &mut self.events
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    fn enter_step(&mut self, index: usize, at: f32) {
        let Some(step) = self.catalog.get(index).cloned() else {
            self.current_index = self.catalog.len();
            self.finish(at);
            return;
        };

        self.current_index = index;
        self.flags.reset();
        self.phase = TutorialPhase::InStep;

        let behavior = detector::behavior(step.step_type);
        gate_ok(self.gates.set_overlay_text(&step.message), "update the overlay text");
        gate_ok(
            self.gates.set_player_control_enabled(behavior.player_control),
            "set player control",
        );

        self.waiting_for_input = true;
        self.timers.rearm(
            &mut self.timeout,
            TutorialTimer::StepTimeout { step: index },
            at,
            step.timeout_secs,
        );

        info!(
            "Tutorial step {}/{} ({}): {}",
            index + 1,
            self.catalog.len(),
            step.step_type,
            step.message
        );
        self.events.emit(
            at,
            TutorialEvent::StepEntered {
                index,
                step_type: step.step_type,
            },
        );
    }

    fn evaluate_input(&mut self, input: &FrameInput) {
        let index = self.current_index;
        let Some(step_type) = self.catalog.get(index).map(|s| s.step_type) else {
            return;
        };
        let Some(detection) = detector::detect(step_type, &mut self.flags, input) else {
            return;
        };
        let now = self.timers.now();

        // Re-detected input while already resolving only gets its side effect
        if self.resolve.is_none() {
            self.timers.cancel_slot(&mut self.timeout);
            self.timers.rearm(
                &mut self.resolve,
                TutorialTimer::InputResolve { step: index },
                now,
                self.timing.input_resolve_delay_secs,
            );
            debug!("Tutorial step {} satisfied by input", index + 1);
            self.events
                .emit(now, TutorialEvent::InputSatisfied { index, step_type });
        }

        if let Some(effect) = detection.side_effect {
            self.perform_side_effect(effect, now);
        }
    }

    fn perform_side_effect(&mut self, effect: SideEffect, at: f32) {
        match effect {
            SideEffect::BoundedMove(direction) => {
                if self.demo_move.is_some() {
                    gate_ok(self.gates.cancel_bounded_move(), "cancel the demonstration move");
                }
                self.timers.cancel_slot(&mut self.demo_move);

                let demo = BoundedMove {
                    direction,
                    distance: self.timing.demo_move_distance,
                    duration_secs: self.timing.demo_move_duration_secs,
                };
                if gate_ok(
                    self.gates.perform_bounded_move(demo),
                    "start the demonstration move",
                ) {
                    self.timers.rearm(
                        &mut self.demo_move,
                        TutorialTimer::DemoMove,
                        at,
                        demo.duration_secs,
                    );
                    self.events
                        .emit(at, TutorialEvent::DemoMoveStarted { direction });
                }
            }
            SideEffect::DemoShot => {
                if gate_ok(self.gates.fire_demo_shot(), "fire the demonstration shot") {
                    self.events.emit(at, TutorialEvent::DemoShotFired);
                }
            }
        }
    }

    fn handle_timer(&mut self, fired: FiredTimer<TutorialTimer>) {
        let at = fired.deadline;
        match fired.kind {
            TutorialTimer::StepTimeout { step } => {
                if self.timeout != Some(fired.handle) {
                    return;
                }
                self.timeout = None;
                if !self.waiting_for_input || step != self.current_index {
                    return;
                }
                let step_type = self
                    .catalog
                    .get(step)
                    .map(|s| s.step_type)
                    .unwrap_or(StepType::Complete);
                debug!("Tutorial step {} timed out", step + 1);
                self.events.emit(
                    at,
                    TutorialEvent::StepTimedOut {
                        index: step,
                        step_type,
                    },
                );
                self.advance(at);
            }
            TutorialTimer::InputResolve { step } => {
                if self.resolve != Some(fired.handle) {
                    return;
                }
                self.resolve = None;
                self.waiting_for_input = false;
                self.enter_step(step + 1, at);
            }
            TutorialTimer::TransitionPause { next } => {
                if self.pause != Some(fired.handle) {
                    return;
                }
                self.pause = None;
                self.enter_step(next, at);
            }
            TutorialTimer::DemoMove => {
                if self.demo_move != Some(fired.handle) {
                    return;
                }
                self.demo_move = None;
                self.events.emit(at, TutorialEvent::DemoMoveFinished);
            }
        }
    }

    /// Leave the current step; the next one follows after the transition pause
    fn advance(&mut self, at: f32) {
        if !self.is_active() {
            return;
        }
        self.timers.cancel_slot(&mut self.timeout);
        self.timers.cancel_slot(&mut self.resolve);
        self.waiting_for_input = false;

        let next = self.current_index + 1;
        if next >= self.catalog.len() {
            self.current_index = self.catalog.len();
            self.finish(at);
            return;
        }

        self.phase = TutorialPhase::Transition;
        self.timers.rearm(
            &mut self.pause,
            TutorialTimer::TransitionPause { next },
            at,
            self.timing.transition_pause_secs,
        );
    }

    fn clear_timers(&mut self) {
        self.timers.clear();
        self.timeout = None;
        self.resolve = None;
        self.pause = None;
        self.demo_move = None;
    }

    /// Exit sequence shared by normal completion, skip and `complete`
    fn finish(&mut self, at: f32) {
        if self.phase == TutorialPhase::Completed {
            return;
        }

        let had_demo_move = self.is_demo_move_active();
        self.clear_timers();
        if had_demo_move {
            gate_ok(self.gates.cancel_bounded_move(), "cancel the demonstration move");
        }

        gate_ok(self.gates.show_overlay(false), "hide the overlay");
        gate_ok(self.gates.set_player_control_enabled(true), "enable player control");
        gate_ok(self.gates.set_game_timer_enabled(true), "resume the game timer");

        self.phase = TutorialPhase::Completed;
        self.waiting_for_input = false;
        self.completed_at = Some(at);
        info!("Tutorial complete at {:.2}s", at);
        self.events.emit(at, TutorialEvent::Completed);

        if let Some(callback) = self.on_complete.as_mut() {
            callback();
        }
    }
}
