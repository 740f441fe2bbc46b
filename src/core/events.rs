//! Global events used for cross-system communication.
//!
//! The AI layer never reaches into the host directly: it reports captures,
//! state changes and shots through these events and lets other plugins
//! decide what to do with them.

use bevy::prelude::*;

use crate::enemies::{RoamState, StealthState};

/// Sent once when a stealth guard catches the player.
///
/// The world plugin reacts by restarting the level.
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerCaughtEvent {
    /// Guard that made the catch
    pub enemy: Entity,
    /// The caught target
    pub player: Entity,
}

/// Sent for every tick in which a stealth guard ended in a different state.
#[derive(Event, Debug, Clone, Copy)]
pub struct StealthStateChanged {
    pub enemy: Entity,
    pub from: StealthState,
    pub to: StealthState,
}

/// Sent for every tick in which a roaming enemy ended in a different state.
#[derive(Event, Debug, Clone, Copy)]
pub struct RoamStateChanged {
    pub enemy: Entity,
    pub from: RoamState,
    pub to: RoamState,
}

/// Sent when a roaming enemy fires at its target.
#[derive(Event, Debug, Clone, Copy)]
pub struct ShotFiredEvent {
    /// Entity that fired
    pub shooter: Entity,
    /// Entity being shot at
    pub target: Entity,
    /// Shooter position at the time of the shot
    pub origin: Vec3,
}
