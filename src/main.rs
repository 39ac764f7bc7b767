//! Arena Tutorial - onboarding demo built with Bevy
//!
//! Main entry point: app setup and system registration.

use arena_tutorial::{
    DebugLogConfig, MatchTimer, Player, PlayerControl, TutorialCompleted, TutorialPlugin,
    TutorialSettings, TutorialSystems, constants::*, match_timer, player, ui,
};
use bevy::{camera::ScalingMode, prelude::*};

fn main() {
    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();

    let debug_log = DebugLogConfig::load_with_args(&args);

    // Load tutorial settings (uses defaults if file doesn't exist)
    let mut settings = TutorialSettings::load();
    settings.apply_cli_overrides(&args);

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        resolution: bevy::window::WindowResolution::new(1280, 720)
                            .with_scale_factor_override(1.0),
                        title: "Arena Tutorial".into(),
                        resizable: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(debug_log.log_plugin()),
        )
        .insert_resource(ClearColor(DEFAULT_BACKGROUND_COLOR))
        .insert_resource(debug_log)
        // Settings must be in place before the plugin builds the sequencer
        .insert_resource(settings)
        .init_resource::<PlayerControl>()
        .init_resource::<MatchTimer>()
        .add_plugins(TutorialPlugin::default())
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                player::move_player,
                player::animate_demo_move,
                player::update_demo_shots,
                match_timer::update_match_timer,
            )
                .after(TutorialSystems::Sequence),
        )
        .add_systems(Update, log_completion.after(TutorialSystems::Notify))
        .run();
}

/// Setup the arena: camera, player, match clock and tutorial overlay
fn setup(mut commands: Commands) {
    // Camera - orthographic, shows entire arena
    commands.spawn((
        Camera2d,
        Transform::from_xyz(0.0, 0.0, 0.0),
        Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::FixedVertical {
                viewport_height: ARENA_HEIGHT,
            },
            ..OrthographicProjection::default_2d()
        }),
    ));

    commands.spawn((
        Sprite::from_color(PLAYER_COLOR, PLAYER_SIZE),
        Transform::from_xyz(0.0, 0.0, 0.0),
        Player,
    ));

    match_timer::spawn_match_timer_text(&mut commands);
    ui::spawn_tutorial_overlay(&mut commands);
}

fn log_completion(mut completed: MessageReader<TutorialCompleted>, timer: Res<MatchTimer>) {
    for _ in completed.read() {
        info!("Tutorial finished, match clock running at {}", timer.display());
    }
}
