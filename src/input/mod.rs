//! Input module - PlayerInput / TutorialInput resources and capture_input system

use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;

use crate::constants::*;
use crate::tutorial::{FrameInput, MoveDirection};

/// Continuous input state for the player avatar
#[derive(Resource)]
pub struct PlayerInput {
    pub move_dir: Vec2, // Held movement, each axis in -1..1
    pub aim: Vec2,      // Last nonzero aim direction (unit length)
}

impl Default for PlayerInput {
    fn default() -> Self {
        Self {
            move_dir: Vec2::ZERO,
            aim: Vec2::X, // Default aiming right
        }
    }
}

/// Input snapshot handed to the tutorial sequencer each frame.
/// Overwritten by capture_input, so buttons are "pressed this frame".
#[derive(Resource, Default, Deref, DerefMut)]
pub struct TutorialInput(pub FrameInput);

/// Keys that count as a directional key-down, in priority order
const DIRECTION_KEYS: [(KeyCode, MoveDirection); 8] = [
    (KeyCode::KeyW, MoveDirection::Up),
    (KeyCode::ArrowUp, MoveDirection::Up),
    (KeyCode::KeyS, MoveDirection::Down),
    (KeyCode::ArrowDown, MoveDirection::Down),
    (KeyCode::KeyA, MoveDirection::Left),
    (KeyCode::ArrowLeft, MoveDirection::Left),
    (KeyCode::KeyD, MoveDirection::Right),
    (KeyCode::ArrowRight, MoveDirection::Right),
];

const DIRECTION_BUTTONS: [(GamepadButton, MoveDirection); 4] = [
    (GamepadButton::DPadUp, MoveDirection::Up),
    (GamepadButton::DPadDown, MoveDirection::Down),
    (GamepadButton::DPadLeft, MoveDirection::Left),
    (GamepadButton::DPadRight, MoveDirection::Right),
];

/// Runs in Update to capture input state before it's cleared.
pub fn capture_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    gamepads: Query<&Gamepad>,
    mut input: ResMut<PlayerInput>,
    mut tutorial_input: ResMut<TutorialInput>,
) {
    // Held movement (continuous - overwrite each frame)
    let mut move_dir = Vec2::ZERO;
    for (key, direction) in DIRECTION_KEYS {
        if keyboard.pressed(key) {
            move_dir += direction.unit();
        }
    }

    for gamepad in &gamepads {
        let stick = Vec2::new(
            gamepad.get(GamepadAxis::LeftStickX).unwrap_or(0.0),
            gamepad.get(GamepadAxis::LeftStickY).unwrap_or(0.0),
        );
        if stick.length() > STICK_DEADZONE {
            move_dir += stick;
        }
    }

    input.move_dir = move_dir.clamp(Vec2::NEG_ONE, Vec2::ONE);

    // First directional key-down this frame
    let direction = DIRECTION_KEYS
        .iter()
        .find(|(key, _)| keyboard.just_pressed(*key))
        .map(|(_, direction)| *direction)
        .or_else(|| {
            DIRECTION_BUTTONS
                .iter()
                .find(|(button, _)| gamepads.iter().any(|gp| gp.just_pressed(*button)))
                .map(|(_, direction)| *direction)
        });

    // Pointer movement: mouse (screen y points down) plus right stick
    let mut pointer_delta = Vec2::new(mouse_motion.delta.x, -mouse_motion.delta.y);
    for gamepad in &gamepads {
        let stick = Vec2::new(
            gamepad.get(GamepadAxis::RightStickX).unwrap_or(0.0),
            gamepad.get(GamepadAxis::RightStickY).unwrap_or(0.0),
        );
        if stick.length() > STICK_DEADZONE {
            pointer_delta += stick * POINTER_STICK_SCALE;
        }
    }
    if let Some(aim) = pointer_delta.try_normalize() {
        input.aim = aim;
    }

    let fire_pressed = mouse.just_pressed(MouseButton::Left)
        || gamepads
            .iter()
            .any(|gp| gp.just_pressed(GamepadButton::RightTrigger));

    let interact_pressed = keyboard.just_pressed(KeyCode::KeyE)
        || gamepads
            .iter()
            .any(|gp| gp.just_pressed(GamepadButton::West));

    let skip_pressed = keyboard.just_pressed(KeyCode::Escape)
        || gamepads
            .iter()
            .any(|gp| gp.just_pressed(GamepadButton::Select));

    tutorial_input.0 = FrameInput {
        direction,
        pointer_delta,
        fire_pressed,
        interact_pressed,
        skip_pressed,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn input_world() -> World {
        let mut world = World::new();
        world.init_resource::<ButtonInput<KeyCode>>();
        world.init_resource::<ButtonInput<MouseButton>>();
        world.init_resource::<AccumulatedMouseMotion>();
        world.init_resource::<PlayerInput>();
        world.init_resource::<TutorialInput>();
        world
    }

    #[test]
    fn test_capture_keyboard_and_mouse() {
        let mut world = input_world();
        world
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::ArrowLeft);
        world
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
        world.resource_mut::<AccumulatedMouseMotion>().delta = Vec2::new(0.0, 6.0);

        world.run_system_once(capture_input).unwrap();

        let frame = world.resource::<TutorialInput>().0;
        assert_eq!(frame.direction, Some(MoveDirection::Left));
        assert_eq!(frame.pointer_delta, Vec2::new(0.0, -6.0));
        assert!(frame.fire_pressed);
        assert!(!frame.interact_pressed);
        assert!(!frame.skip_pressed);

        let player = world.resource::<PlayerInput>();
        assert_eq!(player.move_dir, Vec2::new(-1.0, 0.0));
        assert_eq!(player.aim, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_held_key_is_not_a_new_direction() {
        let mut world = input_world();
        {
            let mut keyboard = world.resource_mut::<ButtonInput<KeyCode>>();
            keyboard.press(KeyCode::KeyD);
            // Keep it held but drop the just-pressed state
            keyboard.clear();
            keyboard.press(KeyCode::Escape);
        }

        world.run_system_once(capture_input).unwrap();

        let frame = world.resource::<TutorialInput>().0;
        assert_eq!(frame.direction, None);
        assert!(frame.skip_pressed);
        assert_eq!(world.resource::<PlayerInput>().move_dir, Vec2::X);
        // No pointer movement keeps the previous aim
        assert_eq!(world.resource::<PlayerInput>().aim, Vec2::X);
    }
}
