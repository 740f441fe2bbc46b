//! Top-down player movement and camera.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::*;
use crate::core::PlayState;
use crate::world::{ACTOR_GROUP, OBSTACLE_GROUP};

/// Player capsule half height.
pub const PLAYER_HALF_HEIGHT: f32 = 0.5;

/// Player capsule radius.
pub const PLAYER_RADIUS: f32 = 0.3;

/// Marker component for the overhead camera.
#[derive(Component)]
pub struct PlayerCamera;

/// Set up player movement systems.
pub fn setup_movement_systems(app: &mut App) {
    app.add_systems(
        Update,
        player_movement.run_if(in_state(PlayState::Running)),
    );
}

/// Ground-plane direction from WASD / arrow keys, normalized.
pub fn input_direction(keyboard: &ButtonInput<KeyCode>) -> Vec2 {
    let mut direction = Vec2::ZERO;
    if keyboard.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) {
        direction.y -= 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) {
        direction.y += 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        direction.x -= 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        direction.x += 1.0;
    }

    // Normalize to prevent faster diagonal movement
    direction.normalize_or_zero()
}

/// Handle WASD movement on the ground plane.
///
/// Uses Rapier's KinematicCharacterController for collision against obstacles.
pub fn player_movement(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<PlayerConfig>,
    mut player_query: Query<&mut KinematicCharacterController, (With<Player>, Without<Inactive>)>,
) {
    let Ok(mut controller) = player_query.get_single_mut() else {
        return;
    };

    let direction = input_direction(&keyboard);
    if direction == Vec2::ZERO {
        controller.translation = None;
        return;
    }

    let speed = if keyboard.pressed(KeyCode::ShiftLeft) {
        config.move_speed * config.sprint_multiplier
    } else {
        config.move_speed
    };

    let step = direction * speed * time.delta_secs();
    controller.translation = Some(Vec3::new(step.x, 0.0, step.y));
}

/// Spawn the player entity with an overhead camera.
pub fn spawn_player(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    config: &PlayerConfig,
    position: Vec2,
) -> Entity {
    let center_height = PLAYER_HALF_HEIGHT + PLAYER_RADIUS;

    let player = commands
        .spawn((
            Player,
            Transform::from_xyz(position.x, center_height, position.y),
            Visibility::default(),
            Mesh3d(meshes.add(Capsule3d::new(PLAYER_RADIUS, PLAYER_HALF_HEIGHT * 2.0))),
            MeshMaterial3d(materials.add(Color::srgb(0.2, 0.5, 0.9))),
            // Rapier physics components
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(PLAYER_HALF_HEIGHT, PLAYER_RADIUS),
            CollisionGroups::new(ACTOR_GROUP, OBSTACLE_GROUP | ACTOR_GROUP),
            KinematicCharacterController {
                offset: CharacterLength::Absolute(0.01),
                filter_groups: Some(CollisionGroups::new(ACTOR_GROUP, OBSTACLE_GROUP)),
                ..default()
            },
        ))
        .id();

    commands.entity(player).with_children(|parent| {
        parent.spawn((
            Camera3d::default(),
            PlayerCamera,
            Transform::from_xyz(0.0, config.camera_height, config.camera_distance)
                .looking_at(Vec3::ZERO, Vec3::Y),
        ));
    });

    info!("Spawned player at {:?}", position);
    player
}
