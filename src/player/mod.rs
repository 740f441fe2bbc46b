//! Player module - the target the enemies hunt, its movement and camera.

mod components;
mod movement;
mod plugin;

pub use components::*;
pub use movement::{spawn_player, PlayerCamera, PLAYER_HALF_HEIGHT, PLAYER_RADIUS};
pub use plugin::PlayerPlugin;
