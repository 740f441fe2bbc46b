//! Park Stealth - a top-down park adventure where guards patrol, grow
//! suspicious, chase, search and give up.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, ground-plane helpers
//! - **Player**: Top-down movement of the target the enemies hunt
//! - **Enemies**: Vision, patrols, the stealth and roam state machines
//! - **World**: Level data, obstacles, restart after a capture

pub mod core;
pub mod enemies;
pub mod player;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct ParkStealthPlugin;

impl Plugin for ParkStealthPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Player systems
            .add_plugins(player::PlayerPlugin)

            // Enemy systems
            .add_plugins(enemies::EnemyPlugin)

            // World systems
            .add_plugins(world::WorldPlugin);
    }
}
