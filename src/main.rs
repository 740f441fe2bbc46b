//! Park Stealth - Entry Point
//!
//! Controls:
//! - WASD / arrows: Move
//! - Shift: Sprint
//! - Escape: Pause/Unpause
//! - F1: Toggle AI debug drawing

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

fn main() {
    App::new()
        // Bevy default plugins
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Park Stealth".to_string(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))

        // Physics
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())

        // Our game plugin
        .add_plugins(park_stealth::ParkStealthPlugin)

        .run();
}
