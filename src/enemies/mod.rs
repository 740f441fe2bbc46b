//! Enemies module - stealth guards, roaming shooters and the AI that drives them.

pub mod ai;
pub mod animation;
mod components;
pub mod data;
pub mod debug;
mod error;
pub mod movement;
pub mod patrol;
mod plugin;
pub mod roam;
pub mod spawning;
pub mod stealth;
pub mod vision;

pub use components::*;
pub use data::{BehaviorConfig, EnemyDefinition, EnemyRegistry};
pub use error::AgentSetupError;
pub use movement::Mover;
pub use patrol::{Patrol, PatrolMode};
pub use plugin::EnemyPlugin;
pub use roam::{RoamBrain, RoamConfig, RoamRng, RoamState};
pub use spawning::{spawn_enemy, EnemyPlacement};
pub use stealth::{StealthBrain, StealthConfig, StealthState};
pub use vision::{LineOfSight, PerceptionState, Vision};
