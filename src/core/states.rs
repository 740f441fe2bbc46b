//! Game state definitions that control the overall flow of the game.
//!
//! States determine which systems run at any given time. Enemy AI only runs
//! while `GameState::InGame` and `PlayState::Running` are both active.

use bevy::prelude::*;

/// Main game states - controls overall game flow.
///
/// - Start in `Loading` to read enemy and level data
/// - Move to `InGame` once data is loaded
/// - `Restarting` tears the level down after a capture and goes straight
///   back to `InGame`
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - loading data files
    #[default]
    Loading,
    /// Active gameplay
    InGame,
    /// Level is being rebuilt after the player was caught
    Restarting,
}

/// Sub-states for gameplay - only active when GameState::InGame.
#[derive(SubStates, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[source(GameState = GameState::InGame)]
pub enum PlayState {
    /// Normal gameplay
    #[default]
    Running,
    /// Gameplay frozen, world still visible
    Paused,
}
