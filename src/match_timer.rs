//! Match timer - the game clock the tutorial holds while it runs

use bevy::prelude::*;

use crate::constants::*;

/// Resource tracking the match clock
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct MatchTimer {
    /// Seconds left in the match
    pub remaining: f32,
    /// Whether the clock is counting down
    pub running: bool,
}

impl Default for MatchTimer {
    fn default() -> Self {
        Self {
            remaining: MATCH_DURATION_SECS,
            running: true,
        }
    }
}

impl MatchTimer {
    pub fn set_enabled(&mut self, enabled: bool) {
        self.running = enabled;
    }

    /// Count down by `dt` if running
    pub fn tick(&mut self, dt: f32) {
        if !self.running {
            return;
        }
        self.remaining = (self.remaining - dt).max(0.0);
    }

    pub fn is_finished(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Clock text shown on screen ("M:SS")
    pub fn display(&self) -> String {
        let total = self.remaining.ceil() as u32;
        format!("{}:{:02}", total / 60, total % 60)
    }
}

/// Marker for the match timer text entity
#[derive(Component)]
pub struct MatchTimerText;

/// System to count the match clock down and update its text
pub fn update_match_timer(
    time: Res<Time>,
    mut timer: ResMut<MatchTimer>,
    mut text_query: Query<(&mut Text2d, &mut TextColor), With<MatchTimerText>>,
) {
    timer.tick(time.delta_secs());

    for (mut text, mut color) in &mut text_query {
        text.0 = timer.display();
        // Dimmed while held
        *color = if timer.running {
            TextColor(TEXT_PRIMARY)
        } else {
            TextColor(TEXT_SECONDARY)
        };
    }
}

/// Spawn the match timer text entity (called from setup)
pub fn spawn_match_timer_text(commands: &mut Commands) {
    commands.spawn((
        Text2d::new(MatchTimer::default().display()),
        TextFont {
            font_size: 48.0,
            ..default()
        },
        TextLayout::new_with_justify(bevy::text::Justify::Center),
        TextColor(TEXT_SECONDARY),
        // Top center of the arena, above sprites
        Transform::from_xyz(0.0, ARENA_HEIGHT / 2.0 - 50.0, 100.0),
        Visibility::Visible,
        MatchTimerText,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_timer_does_not_count() {
        let mut timer = MatchTimer::default();
        timer.set_enabled(false);
        timer.tick(5.0);
        assert_eq!(timer.remaining, MATCH_DURATION_SECS);

        timer.set_enabled(true);
        timer.tick(5.0);
        assert_eq!(timer.remaining, MATCH_DURATION_SECS - 5.0);
    }

    #[test]
    fn test_display_and_finish() {
        let mut timer = MatchTimer {
            remaining: 65.2,
            running: true,
        };
        assert_eq!(timer.display(), "1:06");

        timer.tick(100.0);
        assert_eq!(timer.remaining, 0.0);
        assert!(timer.is_finished());
        assert_eq!(timer.display(), "0:00");
    }
}
