//! Enemy data loading from RON files.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::movement::Mover;
use super::patrol::{Patrol, PatrolMode};
use super::roam::RoamConfig;
use super::stealth::StealthConfig;
use super::vision::Vision;
use crate::world::{DataLoadError, OBSTACLE_GROUP};

/// Which brain drives an enemy, with its tuning.
#[derive(Deserialize, Clone, Debug)]
pub enum BehaviorConfig {
    Stealth(StealthConfig),
    Roam(RoamConfig),
}

/// Movement actuator settings.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct MoverConfig {
    pub stop_threshold: f32,
}

impl Default for MoverConfig {
    fn default() -> Self {
        Self { stop_threshold: 0.1 }
    }
}

impl MoverConfig {
    pub fn to_mover(&self) -> Mover {
        Mover::new(self.stop_threshold)
    }
}

/// Vision zone settings.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct VisionConfig {
    pub view_radius: f32,
    /// Degrees, 360 for all around
    pub view_angle: f32,
    /// Above the body center, not the ground. See [`EnemyDefinition::eye_level`].
    pub eye_height: f32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            view_radius: 8.0,
            view_angle: 90.0,
            eye_height: 0.6,
        }
    }
}

impl VisionConfig {
    pub fn to_vision(&self) -> Vision {
        let mut vision = Vision::default();
        vision.view_radius = self.view_radius;
        vision.view_angle = self.view_angle;
        vision.eye_height = self.eye_height;
        vision.obstacles = OBSTACLE_GROUP;
        vision
    }
}

/// Patrol tuning. Waypoints come from the level, not the enemy type.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct PatrolConfig {
    pub speed: f32,
    pub wait_at_point: f32,
    pub arrival_threshold: f32,
    pub mode: PatrolMode,
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self {
            speed: 2.0,
            wait_at_point: 1.0,
            arrival_threshold: 0.2,
            mode: PatrolMode::Loop,
        }
    }
}

impl PatrolConfig {
    /// Build a patrol over `waypoints`, optionally overriding the traversal mode.
    pub fn to_patrol(&self, waypoints: Vec<Vec2>, mode: Option<PatrolMode>) -> Patrol {
        Patrol::new(waypoints)
            .with_speed(self.speed)
            .with_wait(self.wait_at_point)
            .with_arrival_threshold(self.arrival_threshold)
            .with_mode(mode.unwrap_or(self.mode))
    }
}

/// Collider configuration for an enemy type.
#[derive(Deserialize, Clone, Debug)]
pub struct ColliderConfig {
    pub half_height: f32,
    pub radius: f32,
}

impl ColliderConfig {
    /// Height of the capsule center when standing on the ground.
    pub fn center_height(&self) -> f32 {
        self.half_height + self.radius
    }
}

impl Default for ColliderConfig {
    fn default() -> Self {
        Self {
            half_height: 0.5,
            radius: 0.3,
        }
    }
}

/// Enemy definition loaded from RON file.
#[derive(Deserialize, Clone, Debug)]
pub struct EnemyDefinition {
    pub name: String,
    pub behavior: BehaviorConfig,
    #[serde(default)]
    pub mover: MoverConfig,
    /// Stealth guards need this; roaming enemies ignore it
    #[serde(default)]
    pub vision: Option<VisionConfig>,
    #[serde(default)]
    pub patrol: PatrolConfig,
    #[serde(default)]
    pub collider: ColliderConfig,
    /// Body color (linear RGB)
    #[serde(default = "default_color")]
    pub color: [f32; 3],
}

impl EnemyDefinition {
    /// Height above the ground the sight line is cast at, if the enemy can see.
    pub fn eye_level(&self) -> Option<f32> {
        self.vision
            .as_ref()
            .map(|vision| self.collider.center_height() + vision.eye_height)
    }
}

fn default_color() -> [f32; 3] {
    [0.8, 0.2, 0.2]
}

/// Resource holding all loaded enemy definitions.
#[derive(Resource, Default)]
pub struct EnemyRegistry {
    pub definitions: HashMap<String, EnemyDefinition>,
}

impl EnemyRegistry {
    /// Get an enemy definition by type name.
    pub fn get(&self, enemy_type: &str) -> Option<&EnemyDefinition> {
        self.definitions.get(enemy_type)
    }

    /// Like [`EnemyRegistry::get`], as an error for callers that need the type.
    pub fn require(&self, enemy_type: &str) -> Result<&EnemyDefinition, DataLoadError> {
        self.get(enemy_type)
            .ok_or_else(|| DataLoadError::UnknownEnemyType(enemy_type.to_string()))
    }
}

/// Parse one enemy definition. `origin` is only used in error messages.
pub fn parse_enemy_definition(origin: &str, contents: &str) -> Result<EnemyDefinition, DataLoadError> {
    ron::from_str::<EnemyDefinition>(contents).map_err(|e| DataLoadError::ParseError {
        path: origin.to_string(),
        details: e.to_string(),
    })
}

/// Read and parse one enemy definition file.
pub fn load_enemy_definition_file(path: &Path) -> Result<EnemyDefinition, DataLoadError> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound(path.display().to_string()));
    }
    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: path.display().to_string(),
        details: e.to_string(),
    })?;
    parse_enemy_definition(&path.display().to_string(), &contents)
}

/// Load all enemy definitions from the assets/data/enemies/ directory.
pub fn load_enemy_definitions(mut registry: ResMut<EnemyRegistry>) {
    let enemies_dir = Path::new("assets/data/enemies");

    if !enemies_dir.exists() {
        warn!("Enemy definitions directory not found: {:?}", enemies_dir);
        return;
    }

    let Ok(entries) = fs::read_dir(enemies_dir) else {
        warn!("Failed to read enemy definitions directory");
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();

        if !path.extension().is_some_and(|ext| ext == "ron") {
            continue;
        }
        let Some(enemy_type) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            continue;
        };

        match load_enemy_definition_file(&path) {
            Ok(definition) => {
                info!("Loaded enemy definition: {} ({})", definition.name, enemy_type);
                registry.definitions.insert(enemy_type, definition);
            }
            Err(e) => error!("{}", e),
        }
    }

    info!("Loaded {} enemy definitions", registry.definitions.len());
}
