//! World module - park levels, obstacles and the restart loop.

mod builder;
mod data;
mod error;
mod plugin;

pub use builder::{build_level_from_data, LevelEntity, ACTOR_GROUP, OBSTACLE_GROUP};
pub use data::{
    load_level_file, parse_level, CurrentLevel, EnemySpawnDef, LevelDefinition, LevelRegistry, ObstacleDef,
};
pub use error::DataLoadError;
pub use plugin::{setup_level, RestartCountdown, WorldPlugin};
