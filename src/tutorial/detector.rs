//! Per-step input detection
//!
//! Each step type maps to one row of [`STEP_BEHAVIORS`]: the predicate that
//! decides whether a frame's input satisfies the step, and whether player
//! control is enabled while the step is shown. New step types are added by
//! adding a row; the sequencer never matches on step type itself.

use bevy::math::Vec2;

use super::gates::MoveDirection;
use super::steps::StepType;

/// Input observed during one frame. Buttons are "pressed this frame".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// First directional key pressed this frame
    pub direction: Option<MoveDirection>,
    /// Pointer movement accumulated this frame
    pub pointer_delta: Vec2,
    pub fire_pressed: bool,
    pub interact_pressed: bool,
    /// Request to abandon the tutorial
    pub skip_pressed: bool,
}

impl FrameInput {
    pub fn direction(direction: MoveDirection) -> Self {
        Self {
            direction: Some(direction),
            ..Default::default()
        }
    }

    pub fn pointer(delta: Vec2) -> Self {
        Self {
            pointer_delta: delta,
            ..Default::default()
        }
    }

    pub fn fire() -> Self {
        Self {
            fire_pressed: true,
            ..Default::default()
        }
    }

    pub fn interact() -> Self {
        Self {
            interact_pressed: true,
            ..Default::default()
        }
    }

    pub fn skip() -> Self {
        Self {
            skip_pressed: true,
            ..Default::default()
        }
    }
}

/// Transient "already acted" flags, cleared on every step entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepFlags {
    pub has_moved: bool,
    pub has_shot: bool,
}

impl StepFlags {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether the one-time action of `step_type` already happened this step
    pub fn acted(&self, step_type: StepType) -> bool {
        match step_type {
            StepType::Movement => self.has_moved,
            StepType::Shooting => self.has_shot,
            _ => false,
        }
    }

    fn mark(&mut self, effect: SideEffect) {
        match effect {
            SideEffect::BoundedMove(_) => self.has_moved = true,
            SideEffect::DemoShot => self.has_shot = true,
        }
    }
}

/// One-time action requested when a step is satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    BoundedMove(MoveDirection),
    DemoShot,
}

/// Outcome of a satisfied step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub side_effect: Option<SideEffect>,
}

/// Behaviour attached to a step type
#[derive(Debug, Clone, Copy)]
pub struct StepBehavior {
    pub step_type: StepType,
    /// Returns Some when the input satisfies the step
    pub detect: fn(&FrameInput, &StepFlags) -> Option<Detection>,
    /// Player control state applied on step entry
    pub player_control: bool,
}

fn detect_movement(input: &FrameInput, flags: &StepFlags) -> Option<Detection> {
    if flags.has_moved {
        return None;
    }
    input.direction.map(|direction| Detection {
        side_effect: Some(SideEffect::BoundedMove(direction)),
    })
}

fn detect_aiming(input: &FrameInput, _flags: &StepFlags) -> Option<Detection> {
    (input.pointer_delta != Vec2::ZERO).then_some(Detection { side_effect: None })
}

fn detect_shooting(input: &FrameInput, flags: &StepFlags) -> Option<Detection> {
    (input.fire_pressed && !flags.has_shot).then_some(Detection {
        side_effect: Some(SideEffect::DemoShot),
    })
}

fn detect_pickup(input: &FrameInput, _flags: &StepFlags) -> Option<Detection> {
    input
        .interact_pressed
        .then_some(Detection { side_effect: None })
}

fn detect_never(_input: &FrameInput, _flags: &StepFlags) -> Option<Detection> {
    None
}

/// Behaviour table indexed by [`StepType::index`]
pub static STEP_BEHAVIORS: [StepBehavior; 5] = [
    StepBehavior {
        step_type: StepType::Movement,
        detect: detect_movement,
        player_control: false,
    },
    StepBehavior {
        step_type: StepType::Aiming,
        detect: detect_aiming,
        player_control: true,
    },
    StepBehavior {
        step_type: StepType::Shooting,
        detect: detect_shooting,
        player_control: true,
    },
    StepBehavior {
        step_type: StepType::Pickup,
        detect: detect_pickup,
        player_control: true,
    },
    StepBehavior {
        step_type: StepType::Complete,
        detect: detect_never,
        player_control: false,
    },
];

pub fn behavior(step_type: StepType) -> &'static StepBehavior {
    &STEP_BEHAVIORS[step_type.index()]
}

/// Evaluate one frame of input against a step.
///
/// On satisfaction the returned side effect (if any) has already been
/// recorded in `flags`, so the same input next frame yields no side effect.
pub fn detect(step_type: StepType, flags: &mut StepFlags, input: &FrameInput) -> Option<Detection> {
    let detection = (behavior(step_type).detect)(input, flags)?;
    if let Some(effect) = detection.side_effect {
        flags.mark(effect);
    }
    Some(detection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_step_types() {
        for step_type in StepType::ALL {
            assert_eq!(behavior(step_type).step_type, step_type);
        }
        assert!(!behavior(StepType::Movement).player_control);
        assert!(behavior(StepType::Aiming).player_control);
        assert!(behavior(StepType::Shooting).player_control);
        assert!(behavior(StepType::Pickup).player_control);
        assert!(!behavior(StepType::Complete).player_control);
    }

    #[test]
    fn test_movement_fires_once() {
        let mut flags = StepFlags::default();
        let input = FrameInput::direction(MoveDirection::Right);

        let first = detect(StepType::Movement, &mut flags, &input).unwrap();
        assert_eq!(
            first.side_effect,
            Some(SideEffect::BoundedMove(MoveDirection::Right))
        );
        assert!(flags.has_moved);
        assert!(detect(StepType::Movement, &mut flags, &input).is_none());

        // Non-directional input never satisfies movement
        let mut fresh = StepFlags::default();
        assert!(detect(StepType::Movement, &mut fresh, &FrameInput::fire()).is_none());
    }

    #[test]
    fn test_shooting_fires_once() {
        let mut flags = StepFlags::default();
        let first = detect(StepType::Shooting, &mut flags, &FrameInput::fire()).unwrap();
        assert_eq!(first.side_effect, Some(SideEffect::DemoShot));
        assert!(flags.acted(StepType::Shooting));
        assert!(detect(StepType::Shooting, &mut flags, &FrameInput::fire()).is_none());
    }

    #[test]
    fn test_aiming_and_pickup() {
        let mut flags = StepFlags::default();
        assert!(detect(StepType::Aiming, &mut flags, &FrameInput::default()).is_none());
        let aimed = detect(StepType::Aiming, &mut flags, &FrameInput::pointer(Vec2::new(0.0, -3.0)));
        assert_eq!(aimed, Some(Detection { side_effect: None }));

        assert!(detect(StepType::Pickup, &mut flags, &FrameInput::fire()).is_none());
        assert!(detect(StepType::Pickup, &mut flags, &FrameInput::interact()).is_some());
        // Neither leaves an acted flag behind
        assert_eq!(flags, StepFlags::default());
    }

    #[test]
    fn test_complete_ignores_all_input() {
        let mut flags = StepFlags::default();
        let everything = FrameInput {
            direction: Some(MoveDirection::Up),
            pointer_delta: Vec2::ONE,
            fire_pressed: true,
            interact_pressed: true,
            skip_pressed: false,
        };
        assert!(detect(StepType::Complete, &mut flags, &everything).is_none());
    }

    #[test]
    fn test_flags_reset() {
        let mut flags = StepFlags {
            has_moved: true,
            has_shot: true,
        };
        flags.reset();
        assert!(!flags.acted(StepType::Movement));
        assert!(!flags.acted(StepType::Shooting));
    }
}
