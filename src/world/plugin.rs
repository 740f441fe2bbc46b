//! World plugin - level loading, building and restart on capture.

use bevy::prelude::*;

use crate::core::{GameState, PlayState, PlayerCaughtEvent};
use crate::enemies::EnemyRegistry;
use crate::player::{Inactive, PlayerConfig};

use super::builder::{build_level_from_data, LevelEntity};
use super::data::{load_level_definitions, CurrentLevel, LevelRegistry};

/// Seconds between a capture and the level restart.
const RESTART_DELAY: f32 = 1.5;

/// Pending level restart after the player was caught.
#[derive(Resource)]
pub struct RestartCountdown(pub Timer);

/// World plugin - handles level loading and world setup.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrentLevel>()
            .init_resource::<LevelRegistry>()
            .add_systems(OnEnter(GameState::Loading), load_level_definitions)
            .add_systems(Update, finish_loading.run_if(in_state(GameState::Loading)))
            .add_systems(OnEnter(GameState::InGame), setup_level)
            .add_systems(
                Update,
                (on_player_caught, tick_restart_countdown)
                    .chain()
                    .run_if(in_state(PlayState::Running)),
            )
            .add_systems(OnEnter(GameState::Restarting), (cleanup_level, begin_next_attempt).chain());
    }
}

/// Data is loaded synchronously on entering `Loading`; move on next frame.
fn finish_loading(levels: Res<LevelRegistry>, mut next_state: ResMut<NextState<GameState>>) {
    if levels.levels.is_empty() {
        warn!("No levels loaded, starting with an empty world");
    }
    next_state.set(GameState::InGame);
}

/// Set up the level from data.
pub fn setup_level(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    level_registry: Res<LevelRegistry>,
    current_level: Res<CurrentLevel>,
    enemy_registry: Res<EnemyRegistry>,
    player_config: Res<PlayerConfig>,
) {
    let Some(level) = level_registry.get(&current_level.name) else {
        error!("Level '{}' not found in registry!", current_level.name);
        return;
    };

    info!("Building level: {}", level.name);

    build_level_from_data(
        &mut commands,
        &mut meshes,
        &mut materials,
        level,
        &enemy_registry,
        &player_config,
    );
}

/// Take the caught player out of play and schedule a restart.
fn on_player_caught(
    mut commands: Commands,
    mut caught_events: EventReader<PlayerCaughtEvent>,
    countdown: Option<Res<RestartCountdown>>,
) {
    let mut restart_scheduled = countdown.is_some();

    for event in caught_events.read() {
        warn!("Player {:?} caught by {:?}", event.player, event.enemy);

        if let Some(mut player) = commands.get_entity(event.player) {
            player.insert(Inactive);
        }
        if !restart_scheduled {
            commands.insert_resource(RestartCountdown(Timer::from_seconds(
                RESTART_DELAY,
                TimerMode::Once,
            )));
            restart_scheduled = true;
        }
    }
}

fn tick_restart_countdown(
    time: Res<Time>,
    countdown: Option<ResMut<RestartCountdown>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(mut countdown) = countdown else {
        return;
    };

    countdown.0.tick(time.delta());
    if countdown.0.finished() {
        info!("Restarting level");
        next_state.set(GameState::Restarting);
    }
}

/// Despawn everything the level built.
fn cleanup_level(mut commands: Commands, level_query: Query<Entity, With<LevelEntity>>) {
    for entity in level_query.iter() {
        commands.entity(entity).despawn_recursive();
    }
    commands.remove_resource::<RestartCountdown>();
}

fn begin_next_attempt(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::InGame);
}
