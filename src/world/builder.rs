//! Level construction from data definitions.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::data::{LevelDefinition, ObstacleDef};
use crate::enemies::{spawn_enemy, EnemyRegistry};
use crate::player::{spawn_player, PlayerConfig};

/// Collision group of everything that blocks movement and sight.
pub const OBSTACLE_GROUP: Group = Group::GROUP_2;

/// Collision group of moving characters (player and enemies).
pub const ACTOR_GROUP: Group = Group::GROUP_1;

/// Marker for all level entities that should be cleaned up on restart.
#[derive(Component)]
pub struct LevelEntity;

/// Build a level from a level definition. Returns the player entity.
pub fn build_level_from_data(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    level: &LevelDefinition,
    enemy_registry: &EnemyRegistry,
    player_config: &PlayerConfig,
) -> Entity {
    setup_environment(commands, level);
    spawn_ground(commands, meshes, materials, level);

    for obstacle in &level.obstacles {
        spawn_obstacle(commands, meshes, materials, obstacle);
    }

    // Player first, so every enemy can be handed its target
    let player = spawn_player(
        commands,
        meshes,
        materials,
        player_config,
        Vec2::from(level.player_start),
    );
    commands.entity(player).insert(LevelEntity);

    for spawn in &level.enemies {
        let definition = match enemy_registry.require(&spawn.enemy_type) {
            Ok(definition) => definition,
            Err(e) => {
                error!("Level '{}': {}", level.name, e);
                continue;
            }
        };

        let enemy = spawn_enemy(
            commands,
            &spawn.enemy_type,
            definition,
            &spawn.to_placement(),
            Some(player),
        );

        let collider = &definition.collider;
        let [r, g, b] = definition.color;
        commands.entity(enemy).insert((
            Mesh3d(meshes.add(Capsule3d::new(collider.radius, collider.half_height * 2.0))),
            MeshMaterial3d(materials.add(Color::srgb(r, g, b))),
            LevelEntity,
        ));
    }

    player
}

/// Set up global ambient light and the sun.
fn setup_environment(commands: &mut Commands, level: &LevelDefinition) {
    commands.insert_resource(AmbientLight {
        color: Color::srgb(
            level.global_ambient.color.0,
            level.global_ambient.color.1,
            level.global_ambient.color.2,
        ),
        brightness: level.global_ambient.brightness,
    });

    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::XYZ,
            -std::f32::consts::FRAC_PI_3,
            std::f32::consts::FRAC_PI_6,
            0.0,
        )),
        LevelEntity,
    ));
}

/// Flat ground covering the level.
fn spawn_ground(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    level: &LevelDefinition,
) {
    let (width, depth) = level.size;
    let thickness = 0.1;

    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(width, thickness, depth))),
        MeshMaterial3d(materials.add(Color::srgb(0.45, 0.65, 0.35))),
        Transform::from_xyz(0.0, -thickness / 2.0, 0.0),
        Collider::cuboid(width / 2.0, thickness / 2.0, depth / 2.0),
        RigidBody::Fixed,
        LevelEntity,
    ));
}

/// A fixed box collider in the obstacle group.
fn spawn_obstacle(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    obstacle: &ObstacleDef,
) {
    let (width, height, depth) = obstacle.size;
    let (r, g, b) = obstacle.color;

    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(width, height, depth))),
        MeshMaterial3d(materials.add(Color::srgb(r, g, b))),
        Transform::from_xyz(obstacle.position.0, height / 2.0, obstacle.position.1)
            .with_rotation(Quat::from_rotation_y(obstacle.rotation.to_radians())),
        Collider::cuboid(width / 2.0, height / 2.0, depth / 2.0),
        RigidBody::Fixed,
        CollisionGroups::new(OBSTACLE_GROUP, Group::ALL),
        LevelEntity,
    ));
}
