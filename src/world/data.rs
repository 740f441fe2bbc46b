//! Level data structures and RON loading.
//!
//! A park level is a flat ground rectangle with box obstacles (hedges,
//! benches, kiosks) that block sight, a player start and a list of enemy
//! placements with their patrol routes. Coordinates are ground-plane `(x, z)`.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::error::DataLoadError;
use crate::enemies::{EnemyPlacement, PatrolMode};

/// Global ambient light settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GlobalAmbientDef {
    pub color: (f32, f32, f32),
    pub brightness: f32,
}

impl Default for GlobalAmbientDef {
    fn default() -> Self {
        Self {
            color: (0.9, 0.9, 1.0),
            brightness: 400.0,
        }
    }
}

/// A box that blocks movement and sight.
#[derive(Debug, Clone, Deserialize)]
pub struct ObstacleDef {
    /// Ground-plane center
    pub position: (f32, f32),
    /// Width (x), height (y), depth (z)
    pub size: (f32, f32, f32),
    /// Rotation around Y in degrees
    #[serde(default)]
    pub rotation: f32,
    #[serde(default = "default_obstacle_color")]
    pub color: (f32, f32, f32),
}

fn default_obstacle_color() -> (f32, f32, f32) {
    (0.2, 0.45, 0.2)
}

/// Placement of one enemy in a level.
#[derive(Debug, Clone, Deserialize)]
pub struct EnemySpawnDef {
    /// File stem of the enemy definition
    pub enemy_type: String,
    pub position: (f32, f32),
    #[serde(default)]
    pub facing: Option<(f32, f32)>,
    #[serde(default)]
    pub waypoints: Vec<(f32, f32)>,
    #[serde(default)]
    pub patrol_mode: Option<PatrolMode>,
}

impl EnemySpawnDef {
    pub fn to_placement(&self) -> EnemyPlacement {
        EnemyPlacement {
            position: Vec2::from(self.position),
            facing: self.facing.map(Vec2::from),
            waypoints: self.waypoints.iter().copied().map(Vec2::from).collect(),
            patrol_mode: self.patrol_mode,
        }
    }
}

/// Complete level definition.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelDefinition {
    pub name: String,
    /// Ground extents (x, z), centered on the origin
    pub size: (f32, f32),
    pub player_start: (f32, f32),
    #[serde(default)]
    pub global_ambient: GlobalAmbientDef,
    #[serde(default)]
    pub obstacles: Vec<ObstacleDef>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawnDef>,
}

impl LevelDefinition {
    /// Check that the level is buildable.
    pub fn validate(&self) -> Result<(), DataLoadError> {
        let invalid = |details: String| DataLoadError::InvalidLevel {
            level: self.name.clone(),
            details,
        };

        if self.size.0 <= 0.0 || self.size.1 <= 0.0 {
            return Err(invalid(format!("ground size {:?} must be positive", self.size)));
        }
        if !self.contains(Vec2::from(self.player_start)) {
            return Err(invalid(format!(
                "player start {:?} is outside the ground",
                self.player_start
            )));
        }
        for (i, obstacle) in self.obstacles.iter().enumerate() {
            let (w, h, d) = obstacle.size;
            if w <= 0.0 || h <= 0.0 || d <= 0.0 {
                return Err(invalid(format!("obstacle {} has non-positive size", i)));
            }
        }
        for spawn in &self.enemies {
            if !self.contains(Vec2::from(spawn.position)) {
                return Err(invalid(format!(
                    "{} at {:?} is outside the ground",
                    spawn.enemy_type, spawn.position
                )));
            }
        }
        Ok(())
    }

    /// Whether a ground point lies on the level's ground.
    pub fn contains(&self, point: Vec2) -> bool {
        let half = Vec2::new(self.size.0, self.size.1) * 0.5;
        point.x.abs() <= half.x && point.y.abs() <= half.y
    }
}

/// Resource storing all loaded level definitions.
#[derive(Resource, Default)]
pub struct LevelRegistry {
    pub levels: HashMap<String, LevelDefinition>,
}

impl LevelRegistry {
    /// Get a level by name.
    pub fn get(&self, name: &str) -> Option<&LevelDefinition> {
        self.levels.get(name)
    }
}

/// Resource indicating which level to load.
#[derive(Resource)]
pub struct CurrentLevel {
    pub name: String,
}

impl Default for CurrentLevel {
    fn default() -> Self {
        Self {
            name: "park".to_string(),
        }
    }
}

/// Parse and validate one level. `origin` is only used in error messages.
pub fn parse_level(origin: &str, contents: &str) -> Result<LevelDefinition, DataLoadError> {
    let level = ron::from_str::<LevelDefinition>(contents).map_err(|e| DataLoadError::ParseError {
        path: origin.to_string(),
        details: e.to_string(),
    })?;
    level.validate()?;
    Ok(level)
}

/// Read, parse and validate one level file.
pub fn load_level_file(path: &Path) -> Result<LevelDefinition, DataLoadError> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound(path.display().to_string()));
    }
    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: path.display().to_string(),
        details: e.to_string(),
    })?;
    parse_level(&path.display().to_string(), &contents)
}

/// Load all level definitions from assets/data/levels/.
pub fn load_level_definitions(mut commands: Commands) {
    let mut registry = LevelRegistry::default();

    let levels_path = Path::new("assets/data/levels");

    if let Ok(entries) = fs::read_dir(levels_path) {
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "ron") {
                continue;
            }
            let Some(stem) = path.file_stem() else {
                continue;
            };
            let name = stem.to_string_lossy();
            let level_name = name.strip_suffix(".level").unwrap_or(&name).to_string();

            match load_level_file(&path) {
                Ok(level) => {
                    info!("Loaded level: {}", level_name);
                    registry.levels.insert(level_name, level);
                }
                Err(e) => error!("{}", e),
            }
        }
    } else {
        warn!("Levels directory not found: {:?}", levels_path);
    }

    info!("Loaded {} level(s)", registry.levels.len());
    commands.insert_resource(registry);
}
