//! Scripted onboarding tutorial
//!
//! The core (catalog, detector, timers, gates, sequencer) is plain Rust and
//! knows nothing about Bevy scheduling; `plugin` wires it into an app.

mod detector;
mod error;
mod events;
mod gates;
mod plugin;
mod sequencer;
mod steps;
mod timers;

pub use detector::{
    Detection, FrameInput, STEP_BEHAVIORS, SideEffect, StepBehavior, StepFlags, behavior, detect,
};
pub use error::{Collaborator, GateError, TutorialError};
pub use events::{TimedTutorialEvent, TutorialEvent, TutorialEventLog};
pub use gates::{BoundedMove, ExternalGates, GateCall, MoveDirection, RecordingGates};
pub use plugin::{
    GateRequests, Tutorial, TutorialCompleted, TutorialPlugin, TutorialSystems,
    apply_gate_requests, forward_tutorial_events, start_tutorial, tick_tutorial,
};
pub use sequencer::{CompletionCallback, TutorialPhase, TutorialSequencer, TutorialTiming};
pub use steps::{StepCatalog, StepDefinition, StepType, default_steps};
pub use timers::{FiredTimer, TimerHandle, TimerScheduler};
