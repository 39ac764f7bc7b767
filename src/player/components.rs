//! Player-related components and resources

use bevy::prelude::*;

use crate::tutorial::BoundedMove;

/// Marker for the player avatar
#[derive(Component)]
pub struct Player;

/// Whether the player may drive the avatar with normal movement input.
/// Toggled by the tutorial; demonstration moves ignore it.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerControl {
    pub enabled: bool,
}

impl Default for PlayerControl {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Scripted demonstration move in progress
#[derive(Component, Debug, Clone, Copy)]
pub struct DemoMove {
    pub start: Vec2,
    pub offset: Vec2,
    pub elapsed: f32,
    pub duration: f32,
}

impl DemoMove {
    pub fn new(start: Vec2, demo: BoundedMove) -> Self {
        Self {
            start,
            offset: demo.offset(),
            elapsed: 0.0,
            duration: demo.duration_secs,
        }
    }

    /// Progress in 0..=1
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Position along the move (ease-out so it settles at the end)
    pub fn position(&self) -> Vec2 {
        let t = self.progress();
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        self.start + self.offset * eased
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }
}

/// Demonstration shot projectile
#[derive(Component, Debug, Clone, Copy)]
pub struct DemoShot {
    pub velocity: Vec2,
    pub lifetime: f32, // Seconds until despawn
}
