//! Enemy plugin - registers all enemy systems.

use bevy::prelude::*;

use super::ai;
use super::animation::sync_animation_signals;
use super::data::{load_enemy_definitions, EnemyRegistry};
use super::debug::{draw_alert_indicators, draw_vision_cones, toggle_ai_debug_draw, AiDebugDraw};
use super::movement::integrate_movers;
use super::roam::RoamRng;
use crate::core::{GameState, PlayState};

/// Enemy plugin - handles enemy definitions, AI, movement and debug drawing.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<EnemyRegistry>()
            .init_resource::<RoamRng>()
            .init_resource::<AiDebugDraw>()
            // Definitions must be in place before the level is built
            .add_systems(OnEnter(GameState::Loading), load_enemy_definitions)
            // Per-frame decisions: sense, decide, act, then publish signals
            .add_systems(
                Update,
                (
                    ai::initialize_stealth_agents,
                    ai::initialize_roam_agents,
                    ai::update_vision,
                    ai::stealth_ai,
                    ai::roam_ai,
                    ai::patrol_waypoints,
                    ai::halt_disabled_agents,
                    sync_animation_signals,
                )
                    .chain()
                    .run_if(in_state(PlayState::Running)),
            )
            // Movement is integrated on the fixed step
            .add_systems(
                FixedUpdate,
                integrate_movers.run_if(in_state(PlayState::Running)),
            )
            .add_systems(
                Update,
                (toggle_ai_debug_draw, draw_vision_cones, draw_alert_indicators)
                    .chain()
                    .after(sync_animation_signals)
                    .run_if(in_state(GameState::InGame)),
            );
    }
}
