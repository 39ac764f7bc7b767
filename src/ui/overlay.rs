//! Tutorial overlay: instruction panel, step progress and skip button

use bevy::prelude::*;

use crate::constants::*;
use crate::input::TutorialInput;
use crate::tutorial::Tutorial;

/// Root node of the tutorial overlay (shown/hidden by the tutorial)
#[derive(Component)]
pub struct TutorialOverlay;

/// Instruction text inside the overlay
#[derive(Component)]
pub struct TutorialMessageText;

/// "Step 2/5" text inside the overlay
#[derive(Component)]
pub struct TutorialProgressText;

/// Clickable button that abandons the tutorial
#[derive(Component)]
pub struct SkipButton;

/// Spawn the overlay hidden; the tutorial shows it on start
pub fn spawn_tutorial_overlay(commands: &mut Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                bottom: Val::Px(40.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                row_gap: Val::Px(10.0),
                ..default()
            },
            Visibility::Hidden,
            TutorialOverlay,
        ))
        .with_children(|root| {
            root.spawn((
                Node {
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    padding: UiRect::axes(Val::Px(24.0), Val::Px(12.0)),
                    row_gap: Val::Px(6.0),
                    ..default()
                },
                BackgroundColor(OVERLAY_BACKGROUND),
            ))
            .with_children(|panel| {
                panel.spawn((
                    Text::new(""),
                    TextFont {
                        font_size: 14.0,
                        ..default()
                    },
                    TextColor(TEXT_SECONDARY),
                    TutorialProgressText,
                ));
                panel.spawn((
                    Text::new(""),
                    TextFont {
                        font_size: 28.0,
                        ..default()
                    },
                    TextColor(TEXT_PRIMARY),
                    TutorialMessageText,
                ));
            });

            root.spawn((
                Button,
                Node {
                    padding: UiRect::axes(Val::Px(16.0), Val::Px(6.0)),
                    ..default()
                },
                BackgroundColor(SKIP_BUTTON_COLOR),
                SkipButton,
            ))
            .with_children(|button| {
                button.spawn((
                    Text::new("Skip tutorial (Esc)"),
                    TextFont {
                        font_size: 16.0,
                        ..default()
                    },
                    TextColor(TEXT_ACCENT),
                ));
            });
        });
}

/// Turn skip button clicks into a skip request for this frame
pub fn handle_skip_button(
    mut interactions: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<SkipButton>),
    >,
    mut tutorial_input: ResMut<TutorialInput>,
) {
    for (interaction, mut background) in &mut interactions {
        match *interaction {
            Interaction::Pressed => {
                tutorial_input.skip_pressed = true;
            }
            Interaction::Hovered => {
                *background = BackgroundColor(SKIP_BUTTON_HOVER_COLOR);
            }
            Interaction::None => {
                *background = BackgroundColor(SKIP_BUTTON_COLOR);
            }
        }
    }
}

/// Keep the progress line in sync with the current step
pub fn update_tutorial_progress(
    tutorial: Res<Tutorial>,
    mut text_query: Query<&mut Text, With<TutorialProgressText>>,
) {
    let Ok(mut text) = text_query.single_mut() else {
        return;
    };

    let progress = if tutorial.is_active() {
        format!(
            "Step {}/{}",
            tutorial.current_index() + 1,
            tutorial.catalog().len()
        )
    } else {
        String::new()
    };
    if text.0 != progress {
        text.0 = progress;
    }
}
