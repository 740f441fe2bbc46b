//! Player-related components.

use bevy::prelude::*;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Marker: the player cannot be targeted right now (caught, hidden, cutscene).
///
/// Enemies treat an inactive player exactly like a missing one.
#[derive(Component)]
pub struct Inactive;

/// Configuration for the top-down player controller.
#[derive(Resource)]
pub struct PlayerConfig {
    /// Base movement speed in units per second
    pub move_speed: f32,
    /// Sprint speed multiplier
    pub sprint_multiplier: f32,
    /// Camera height above the player
    pub camera_height: f32,
    /// Camera distance behind the player (towards +Z)
    pub camera_distance: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 4.0,
            sprint_multiplier: 1.5,
            camera_height: 14.0,
            camera_distance: 9.0,
        }
    }
}
