//! Boundary to the subsystems the tutorial switches on and off
//!
//! The sequencer only ever *tells* these collaborators what to do; it never
//! reads state back. A collaborator that is missing reports
//! [`GateError::Unavailable`] and the tutorial carries on without it.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use super::error::{Collaborator, GateError};

/// One of the four axis directions accepted by the movement step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDirection {
    /// Unit vector in world space (+y is up)
    pub fn unit(self) -> Vec2 {
        match self {
            MoveDirection::Up => Vec2::Y,
            MoveDirection::Down => Vec2::NEG_Y,
            MoveDirection::Left => Vec2::NEG_X,
            MoveDirection::Right => Vec2::X,
        }
    }
}

/// A scripted, fixed-length demonstration move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedMove {
    pub direction: MoveDirection,
    pub distance: f32,
    pub duration_secs: f32,
}

impl BoundedMove {
    /// Total displacement of the move
    pub fn offset(&self) -> Vec2 {
        self.direction.unit() * self.distance
    }
}

/// Commands the tutorial issues to the player, timer and overlay subsystems
pub trait ExternalGates {
    fn set_player_control_enabled(&mut self, enabled: bool) -> Result<(), GateError>;

    fn set_game_timer_enabled(&mut self, enabled: bool) -> Result<(), GateError>;

    /// Start a demonstration move. Must run even while player control is disabled.
    fn perform_bounded_move(&mut self, demo: BoundedMove) -> Result<(), GateError>;

    /// Stop an in-flight demonstration move, leaving the player where it is
    fn cancel_bounded_move(&mut self) -> Result<(), GateError>;

    fn fire_demo_shot(&mut self) -> Result<(), GateError>;

    fn show_overlay(&mut self, visible: bool) -> Result<(), GateError>;

    fn set_overlay_text(&mut self, text: &str) -> Result<(), GateError>;
}

/// Single call made through the gates, as recorded by [`RecordingGates`]
#[derive(Debug, Clone, PartialEq)]
pub enum GateCall {
    PlayerControl(bool),
    GameTimer(bool),
    BoundedMove(BoundedMove),
    CancelBoundedMove,
    DemoShot,
    ShowOverlay(bool),
    OverlayText(String),
}

/// Gates that remember every call and the resulting collaborator state.
/// Collaborators listed as unavailable reject calls without changing state.
#[derive(Debug, Clone)]
pub struct RecordingGates {
    pub calls: Vec<GateCall>,
    pub player_control_enabled: bool,
    pub game_timer_enabled: bool,
    pub overlay_visible: bool,
    pub overlay_text: String,
    pub active_move: Option<BoundedMove>,
    pub moves_started: u32,
    pub moves_cancelled: u32,
    pub shots_fired: u32,
    unavailable: Vec<Collaborator>,
}

impl Default for RecordingGates {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            // Collaborators start enabled, as they are before a tutorial runs
            player_control_enabled: true,
            game_timer_enabled: true,
            overlay_visible: false,
            overlay_text: String::new(),
            active_move: None,
            moves_started: 0,
            moves_cancelled: 0,
            shots_fired: 0,
            unavailable: Vec::new(),
        }
    }
}

impl RecordingGates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gates where the listed collaborators are missing
    pub fn with_unavailable(collaborators: &[Collaborator]) -> Self {
        Self {
            unavailable: collaborators.to_vec(),
            ..Self::default()
        }
    }

    fn check(&self, collaborator: Collaborator) -> Result<(), GateError> {
        if self.unavailable.contains(&collaborator) {
            Err(GateError::Unavailable(collaborator))
        } else {
            Ok(())
        }
    }

    /// Number of recorded calls matching `predicate`
    pub fn count(&self, predicate: impl Fn(&GateCall) -> bool) -> usize {
        self.calls.iter().filter(|c| predicate(c)).count()
    }
}

impl ExternalGates for RecordingGates {
    fn set_player_control_enabled(&mut self, enabled: bool) -> Result<(), GateError> {
        self.check(Collaborator::PlayerControl)?;
        self.calls.push(GateCall::PlayerControl(enabled));
        self.player_control_enabled = enabled;
        Ok(())
    }

    fn set_game_timer_enabled(&mut self, enabled: bool) -> Result<(), GateError> {
        self.check(Collaborator::GameTimer)?;
        self.calls.push(GateCall::GameTimer(enabled));
        self.game_timer_enabled = enabled;
        Ok(())
    }

    fn perform_bounded_move(&mut self, demo: BoundedMove) -> Result<(), GateError> {
        self.check(Collaborator::DemoMove)?;
        self.calls.push(GateCall::BoundedMove(demo));
        self.active_move = Some(demo);
        self.moves_started += 1;
        Ok(())
    }

    fn cancel_bounded_move(&mut self) -> Result<(), GateError> {
        self.check(Collaborator::DemoMove)?;
        self.calls.push(GateCall::CancelBoundedMove);
        if self.active_move.take().is_some() {
            self.moves_cancelled += 1;
        }
        Ok(())
    }

    fn fire_demo_shot(&mut self) -> Result<(), GateError> {
        self.check(Collaborator::DemoShot)?;
        self.calls.push(GateCall::DemoShot);
        self.shots_fired += 1;
        Ok(())
    }

    fn show_overlay(&mut self, visible: bool) -> Result<(), GateError> {
        self.check(Collaborator::Overlay)?;
        self.calls.push(GateCall::ShowOverlay(visible));
        self.overlay_visible = visible;
        Ok(())
    }

    fn set_overlay_text(&mut self, text: &str) -> Result<(), GateError> {
        self.check(Collaborator::Overlay)?;
        self.calls.push(GateCall::OverlayText(text.to_string()));
        self.overlay_text = text.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_move_offset() {
        let demo = BoundedMove {
            direction: MoveDirection::Left,
            distance: 120.0,
            duration_secs: 0.5,
        };
        assert_eq!(demo.offset(), Vec2::new(-120.0, 0.0));
        assert_eq!(MoveDirection::Up.unit(), Vec2::Y);
    }

    #[test]
    fn test_recording_gates_unavailable() {
        let mut gates = RecordingGates::with_unavailable(&[Collaborator::GameTimer]);
        assert_eq!(
            gates.set_game_timer_enabled(false),
            Err(GateError::Unavailable(Collaborator::GameTimer))
        );
        // Rejected call leaves state untouched and is not recorded
        assert!(gates.game_timer_enabled);
        assert!(gates.calls.is_empty());

        gates.set_player_control_enabled(false).unwrap();
        assert!(!gates.player_control_enabled);
        assert_eq!(gates.count(|c| matches!(c, GateCall::PlayerControl(_))), 1);
    }
}
