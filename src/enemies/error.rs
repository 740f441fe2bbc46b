//! Error types for enemy agent setup.

use bevy::prelude::Entity;
use thiserror::Error;

/// Problems found when an AI agent is initialized. The agent is disabled.
#[derive(Debug, Error, PartialEq)]
pub enum AgentSetupError {
    /// The enemy has a brain but nothing to move it.
    #[error("Enemy {0:?} has no Mover, AI disabled")]
    MissingMover(Entity),

    /// The enemy has a stealth brain but no way to see.
    #[error("Enemy {0:?} has no Vision, AI disabled")]
    MissingVision(Entity),
}
