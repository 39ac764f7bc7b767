//! Tunable constants for the tutorial arena
//!
//! Timing and layout values are defined here for easy tweaking.

use bevy::prelude::*;

// =============================================================================
// ARENA COLORS
// =============================================================================

pub const DEFAULT_BACKGROUND_COLOR: Color = Color::srgb(0.35, 0.32, 0.28);
pub const PLAYER_COLOR: Color = Color::srgb(0.9, 0.5, 0.1);
pub const DEMO_SHOT_COLOR: Color = Color::srgb(0.95, 0.75, 0.55);

// =============================================================================
// TEXT/UI COLORS
// =============================================================================

pub const TEXT_PRIMARY: Color = Color::srgb(0.95, 0.9, 0.8); // Bone white/cream
pub const TEXT_SECONDARY: Color = Color::srgb(0.7, 0.65, 0.55); // Aged parchment
pub const TEXT_ACCENT: Color = Color::srgb(0.9, 0.75, 0.4); // Gold/amber
pub const OVERLAY_BACKGROUND: Color = Color::srgba(0.1, 0.1, 0.1, 0.85);
pub const SKIP_BUTTON_COLOR: Color = Color::srgb(0.25, 0.22, 0.2);
pub const SKIP_BUTTON_HOVER_COLOR: Color = Color::srgb(0.4, 0.35, 0.3);

// =============================================================================
// SIZE CONSTANTS
// =============================================================================

pub const ARENA_WIDTH: f32 = 1600.0;
pub const ARENA_HEIGHT: f32 = 900.0;
pub const PLAYER_SIZE: Vec2 = Vec2::new(40.0, 40.0);
pub const DEMO_SHOT_SIZE: Vec2 = Vec2::new(10.0, 10.0);

// =============================================================================
// PLAYER MOVEMENT
// =============================================================================

pub const MOVE_SPEED: f32 = 300.0;
pub const STICK_DEADZONE: f32 = 0.25; // Analog stick deadzone to prevent drift
pub const POINTER_STICK_SCALE: f32 = 10.0; // Right stick deflection -> pointer delta units

// =============================================================================
// TUTORIAL TIMING
// =============================================================================

pub const TRANSITION_PAUSE_SECS: f32 = 1.0; // Pause between a timed-out step and the next one
pub const INPUT_RESOLVE_DELAY_SECS: f32 = 0.5; // Delay between qualifying input and the next step
pub const DEMO_MOVE_DISTANCE: f32 = 120.0; // World units covered by the demonstration move
pub const DEMO_MOVE_DURATION_SECS: f32 = 0.5;
pub const DEMO_SHOT_SPEED: f32 = 900.0;
pub const DEMO_SHOT_LIFETIME_SECS: f32 = 1.5;

// =============================================================================
// MATCH TIMER
// =============================================================================

pub const MATCH_DURATION_SECS: f32 = 120.0;
