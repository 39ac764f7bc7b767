//! Player movement, demonstration move and demo shot systems

use bevy::prelude::*;

use crate::constants::*;
use crate::input::PlayerInput;
use crate::player::components::*;
use crate::tutorial::Tutorial;

/// Keep a position inside the visible arena
pub fn clamp_to_arena(position: Vec2) -> Vec2 {
    let half = Vec2::new(ARENA_WIDTH, ARENA_HEIGHT) / 2.0 - PLAYER_SIZE / 2.0;
    position.clamp(-half, half)
}

/// Apply held movement input. Skipped while control is off or the tutorial
/// blocks normal movement; players mid-demonstration are driven elsewhere.
pub fn move_player(
    time: Res<Time>,
    input: Res<PlayerInput>,
    control: Res<PlayerControl>,
    tutorial: Option<Res<Tutorial>>,
    mut players: Query<&mut Transform, (With<Player>, Without<DemoMove>)>,
) {
    if !control.enabled {
        return;
    }
    if tutorial.is_some_and(|t| t.should_block_player_input()) {
        return;
    }

    let step = input.move_dir * MOVE_SPEED * time.delta_secs();
    if step == Vec2::ZERO {
        return;
    }
    for mut transform in &mut players {
        let next = clamp_to_arena(transform.translation.truncate() + step);
        transform.translation.x = next.x;
        transform.translation.y = next.y;
    }
}

/// Advance demonstration moves; runs whether or not player control is enabled
pub fn animate_demo_move(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Transform, &mut DemoMove)>,
) {
    for (entity, mut transform, mut demo) in &mut query {
        demo.elapsed += time.delta_secs();

        let position = clamp_to_arena(demo.position());
        transform.translation.x = position.x;
        transform.translation.y = position.y;

        if demo.is_finished() {
            commands.entity(entity).remove::<DemoMove>();
        }
    }
}

/// Spawn one demonstration shot leaving `origin` along `aim`
pub fn spawn_demo_shot(commands: &mut Commands, origin: Vec2, aim: Vec2) {
    let direction = aim.try_normalize().unwrap_or(Vec2::X);
    let start = origin + direction * (PLAYER_SIZE.x / 2.0 + DEMO_SHOT_SIZE.x);
    commands.spawn((
        Sprite::from_color(DEMO_SHOT_COLOR, DEMO_SHOT_SIZE),
        Transform::from_xyz(start.x, start.y, 1.0),
        DemoShot {
            velocity: direction * DEMO_SHOT_SPEED,
            lifetime: DEMO_SHOT_LIFETIME_SECS,
        },
    ));
}

/// Fly demo shots and despawn them when their lifetime runs out
pub fn update_demo_shots(
    mut commands: Commands,
    time: Res<Time>,
    mut shots: Query<(Entity, &mut Transform, &mut DemoShot)>,
) {
    let dt = time.delta_secs();
    for (entity, mut transform, mut shot) in &mut shots {
        shot.lifetime -= dt;
        if shot.lifetime <= 0.0 {
            commands.entity(entity).despawn();
            continue;
        }
        transform.translation += (shot.velocity * dt).extend(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_to_arena() {
        let inside = Vec2::new(100.0, -50.0);
        assert_eq!(clamp_to_arena(inside), inside);

        let clamped = clamp_to_arena(Vec2::new(5000.0, -5000.0));
        assert_eq!(clamped.x, ARENA_WIDTH / 2.0 - PLAYER_SIZE.x / 2.0);
        assert_eq!(clamped.y, -(ARENA_HEIGHT / 2.0 - PLAYER_SIZE.y / 2.0));
    }
}
