//! Bevy wiring for the tutorial sequencer
//!
//! The sequencer lives in the [`Tutorial`] resource with a [`GateRequests`]
//! buffer as its gates. Each frame runs, in order: input capture, sequencer
//! tick, gate application (player control, match timer, overlay, demo
//! move/shot), event forwarding.

use bevy::prelude::*;

use super::error::GateError;
use super::events::TutorialEvent;
use super::gates::{BoundedMove, ExternalGates};
use super::sequencer::{TutorialSequencer, TutorialTiming};
use super::steps::StepCatalog;
use crate::input::{PlayerInput, TutorialInput, capture_input};
use crate::match_timer::MatchTimer;
use crate::player::{DemoMove, Player, PlayerControl, spawn_demo_shot};
use crate::settings::TutorialSettings;
use crate::ui::{TutorialMessageText, TutorialOverlay, handle_skip_button, update_tutorial_progress};

// =============================================================================
// GATE REQUESTS
// =============================================================================

/// Collaborator commands issued by the sequencer during one frame, applied to
/// the world by [`apply_gate_requests`]. Later requests supersede earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GateRequests {
    pub player_control: Option<bool>,
    pub game_timer: Option<bool>,
    pub overlay_visible: Option<bool>,
    pub overlay_text: Option<String>,
    /// Demonstration move to start (after any cancel)
    pub bounded_move: Option<BoundedMove>,
    pub cancel_move: bool,
    pub demo_shots: u32,
}

impl GateRequests {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Take all pending requests, leaving the buffer empty
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl ExternalGates for GateRequests {
    fn set_player_control_enabled(&mut self, enabled: bool) -> Result<(), GateError> {
        self.player_control = Some(enabled);
        Ok(())
    }

    fn set_game_timer_enabled(&mut self, enabled: bool) -> Result<(), GateError> {
        self.game_timer = Some(enabled);
        Ok(())
    }

    fn perform_bounded_move(&mut self, demo: BoundedMove) -> Result<(), GateError> {
        self.bounded_move = Some(demo);
        Ok(())
    }

    fn cancel_bounded_move(&mut self) -> Result<(), GateError> {
        self.bounded_move = None;
        self.cancel_move = true;
        Ok(())
    }

    fn fire_demo_shot(&mut self) -> Result<(), GateError> {
        self.demo_shots += 1;
        Ok(())
    }

    fn show_overlay(&mut self, visible: bool) -> Result<(), GateError> {
        self.overlay_visible = Some(visible);
        Ok(())
    }

    fn set_overlay_text(&mut self, text: &str) -> Result<(), GateError> {
        self.overlay_text = Some(text.to_string());
        Ok(())
    }
}

// =============================================================================
// RESOURCES & MESSAGES
// =============================================================================

/// The app's tutorial sequencer
#[derive(Resource, Deref, DerefMut)]
pub struct Tutorial(pub TutorialSequencer<GateRequests>);

impl Tutorial {
    /// Build from settings, falling back to defaults for invalid parts
    pub fn from_settings(settings: &TutorialSettings) -> Self {
        let catalog = settings.catalog().unwrap_or_else(|e| {
            warn!("{}, using default tutorial steps", e);
            StepCatalog::default()
        });
        let timing = match settings.timing.validate() {
            Ok(()) => settings.timing,
            Err(e) => {
                warn!("{}, using default tutorial timing", e);
                TutorialTiming::default()
            }
        };
        Self(TutorialSequencer::new(catalog, timing, GateRequests::default()))
    }
}

impl FromWorld for Tutorial {
    fn from_world(world: &mut World) -> Self {
        let settings = world
            .get_resource::<TutorialSettings>()
            .cloned()
            .unwrap_or_default();
        Self::from_settings(&settings)
    }
}

/// Written once per run when the tutorial finishes or is skipped
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TutorialCompleted;

/// Ordering of the tutorial's per-frame work within `Update`
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TutorialSystems {
    /// Build this frame's TutorialInput
    Input,
    /// Tick the sequencer and apply its gate requests
    Sequence,
    /// Forward events and refresh overlay text
    Notify,
}

// =============================================================================
// SYSTEMS
// =============================================================================

/// Start the tutorial, or run only its exit sequence if it is disabled
pub fn start_tutorial(settings: Res<TutorialSettings>, mut tutorial: ResMut<Tutorial>) {
    if settings.skip_tutorial {
        info!("Tutorial disabled by settings");
        tutorial.complete();
    } else {
        tutorial.start();
    }
}

pub fn tick_tutorial(time: Res<Time>, input: Res<TutorialInput>, mut tutorial: ResMut<Tutorial>) {
    tutorial.tick(time.delta_secs(), &input.0);
}

/// Apply buffered gate requests to the collaborators present in the world.
/// Missing collaborators are logged and skipped.
pub fn apply_gate_requests(
    mut commands: Commands,
    mut tutorial: ResMut<Tutorial>,
    control: Option<ResMut<PlayerControl>>,
    match_timer: Option<ResMut<MatchTimer>>,
    player_input: Option<Res<PlayerInput>>,
    mut overlays: Query<&mut Visibility, With<TutorialOverlay>>,
    mut overlay_texts: Query<&mut Text, With<TutorialMessageText>>,
    players: Query<(Entity, &Transform), With<Player>>,
) {
    if tutorial.gates().is_empty() {
        return;
    }
    let requests = tutorial.gates_mut().take();

    if let Some(enabled) = requests.player_control {
        match control {
            Some(mut control) => control.enabled = enabled,
            None => warn!("No PlayerControl resource, player control request ignored"),
        }
    }

    if let Some(enabled) = requests.game_timer {
        match match_timer {
            Some(mut timer) => timer.set_enabled(enabled),
            None => warn!("No MatchTimer resource, game timer request ignored"),
        }
    }

    if let Some(visible) = requests.overlay_visible {
        if overlays.is_empty() {
            warn!("No tutorial overlay spawned, visibility request ignored");
        }
        for mut visibility in &mut overlays {
            *visibility = if visible {
                Visibility::Visible
            } else {
                Visibility::Hidden
            };
        }
    }

    if let Some(message) = requests.overlay_text {
        if overlay_texts.is_empty() {
            debug!("No tutorial message text, overlay text dropped: {}", message);
        }
        for mut text in &mut overlay_texts {
            text.0 = message.clone();
        }
    }

    if requests.cancel_move {
        for (entity, _) in &players {
            commands.entity(entity).remove::<DemoMove>();
        }
    }

    let player = players.iter().next();

    if let Some(demo) = requests.bounded_move {
        match player {
            Some((entity, transform)) => {
                commands
                    .entity(entity)
                    .insert(DemoMove::new(transform.translation.truncate(), demo));
            }
            None => warn!("No player to perform the demonstration move"),
        }
    }

    if requests.demo_shots > 0 {
        match player {
            Some((_, transform)) => {
                let aim = player_input.map(|input| input.aim).unwrap_or(Vec2::X);
                for _ in 0..requests.demo_shots {
                    spawn_demo_shot(&mut commands, transform.translation.truncate(), aim);
                }
            }
            None => warn!("No player to fire the demonstration shot"),
        }
    }
}

/// Log drained sequencer events and announce completion
pub fn forward_tutorial_events(
    mut tutorial: ResMut<Tutorial>,
    mut completed: MessageWriter<TutorialCompleted>,
) {
    if !tutorial.events().has_pending() {
        return;
    }
    for timed in tutorial.events_mut().drain() {
        debug!("[{:.2}s] {}", timed.time, timed.event);
        if timed.event == TutorialEvent::Completed {
            completed.write(TutorialCompleted);
        }
    }
}

// =============================================================================
// PLUGIN
// =============================================================================

/// Adds the tutorial resource, its systems and the completion message.
///
/// Insert a [`TutorialSettings`] resource before adding the plugin to use
/// settings other than the defaults.
pub struct TutorialPlugin {
    /// Register keyboard/mouse/gamepad capture and the skip button.
    /// Disabled for headless apps that write `TutorialInput` themselves.
    pub capture_input: bool,
}

impl Default for TutorialPlugin {
    fn default() -> Self {
        Self {
            capture_input: true,
        }
    }
}

impl TutorialPlugin {
    pub fn headless() -> Self {
        Self {
            capture_input: false,
        }
    }
}

impl Plugin for TutorialPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TutorialSettings>()
            .init_resource::<TutorialInput>()
            .init_resource::<Tutorial>()
            .add_message::<TutorialCompleted>()
            .configure_sets(
                Update,
                (
                    TutorialSystems::Input,
                    TutorialSystems::Sequence,
                    TutorialSystems::Notify,
                )
                    .chain(),
            )
            .add_systems(Startup, start_tutorial)
            .add_systems(
                Update,
                (tick_tutorial, apply_gate_requests)
                    .chain()
                    .in_set(TutorialSystems::Sequence),
            )
            .add_systems(
                Update,
                (forward_tutorial_events, update_tutorial_progress).in_set(TutorialSystems::Notify),
            );

        if self.capture_input {
            app.init_resource::<PlayerInput>().add_systems(
                Update,
                (capture_input, handle_skip_button)
                    .chain()
                    .in_set(TutorialSystems::Input),
            );
        }
    }
}
