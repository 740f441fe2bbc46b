//! Enemy spawning from definitions.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::{Enemy, EnemyType, TrackedTarget};
use super::data::{BehaviorConfig, EnemyDefinition};
use super::patrol::PatrolMode;
use super::roam::RoamBrain;
use super::stealth::StealthBrain;
use crate::world::{ACTOR_GROUP, OBSTACLE_GROUP};

/// Where and how a single enemy is placed in a level.
#[derive(Debug, Clone, Default)]
pub struct EnemyPlacement {
    /// Ground position (y is ignored)
    pub position: Vec2,
    /// Initial facing on the ground plane
    pub facing: Option<Vec2>,
    pub waypoints: Vec<Vec2>,
    /// Overrides the definition's patrol mode
    pub patrol_mode: Option<PatrolMode>,
}

/// Spawn an enemy with its brain, actuators and a kinematic capsule driven by a
/// character controller.
///
/// Stealth guards get a `Patrol` only when the placement has waypoints.
pub fn spawn_enemy(
    commands: &mut Commands,
    enemy_type: &str,
    definition: &EnemyDefinition,
    placement: &EnemyPlacement,
    target: Option<Entity>,
) -> Entity {
    let collider = &definition.collider;
    let center_height = collider.center_height();

    let mut mover = definition.mover.to_mover();
    if let Some(facing) = placement.facing {
        mover = mover.with_facing(facing);
    }

    let mut entity = commands.spawn((
        Enemy,
        EnemyType(enemy_type.to_string()),
        TrackedTarget(target),
        mover,
        Transform::from_xyz(placement.position.x, center_height, placement.position.y),
        Collider::capsule_y(collider.half_height, collider.radius),
        RigidBody::KinematicPositionBased,
        CollisionGroups::new(ACTOR_GROUP, OBSTACLE_GROUP | ACTOR_GROUP),
        // Moves go through Rapier so enemies slide along hedges instead of crossing them
        KinematicCharacterController {
            offset: CharacterLength::Absolute(0.01),
            filter_groups: Some(CollisionGroups::new(ACTOR_GROUP, OBSTACLE_GROUP)),
            ..default()
        },
    ));

    match &definition.behavior {
        BehaviorConfig::Stealth(config) => {
            entity.insert(StealthBrain::new(config.clone()));
            match &definition.vision {
                Some(vision) => {
                    entity.insert(vision.to_vision());
                }
                None => warn!("Stealth enemy '{}' has no vision configured", enemy_type),
            }
            if !placement.waypoints.is_empty() {
                entity.insert(
                    definition
                        .patrol
                        .to_patrol(placement.waypoints.clone(), placement.patrol_mode),
                );
            }
        }
        BehaviorConfig::Roam(config) => {
            entity.insert(RoamBrain::new(config.clone()));
        }
    }

    let id = entity.id();
    info!("Spawned {} at {:?}", definition.name, placement.position);
    id
}
