//! Arena Tutorial - scripted onboarding for a top-down arena game built with Bevy
//!
//! This crate provides the tutorial sequencer and the game-side collaborators
//! it drives (player control, match timer, overlay), organized into modules.

// Core modules
pub mod constants;
pub mod debug_logging;
pub mod settings;
pub mod testing;
pub mod tutorial;

// Game-side modules
pub mod input;
pub mod match_timer;
pub mod player;
pub mod ui;

// Re-export commonly used types for convenience
pub use constants::*;
pub use debug_logging::DebugLogConfig;
pub use input::{PlayerInput, TutorialInput};
pub use match_timer::{MatchTimer, MatchTimerText};
pub use player::{DemoMove, DemoShot, Player, PlayerControl};
pub use settings::{SETTINGS_FILE, TutorialSettings};
pub use tutorial::{
    ExternalGates, FrameInput, MoveDirection, StepCatalog, StepDefinition, StepType, Tutorial,
    TutorialCompleted, TutorialEvent, TutorialPhase, TutorialPlugin, TutorialSequencer,
    TutorialSystems, TutorialTiming,
};
pub use ui::{SkipButton, TutorialOverlay};
