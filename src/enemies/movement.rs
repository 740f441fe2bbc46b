//! Enemy movement actuator.
//!
//! AI systems decide *where* to go during `Update`; the actual translation is
//! applied on the fixed timestep so motion stays stable when frame times vary.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::AnimationSignals;

/// Speeds at or below this are treated as a stop request.
const MIN_SPEED: f32 = 0.01;

/// Squared length under which a vector counts as "not moving".
const STILL_EPSILON_SQ: f32 = 0.01;

/// Converts "go to this point at this speed" into a ground-plane velocity.
///
/// Knows nothing about AI states. Brains and patrols call [`Mover::move_towards`]
/// and [`Mover::stop`]; vision and animation read [`Mover::velocity`] and
/// [`Mover::facing`].
#[derive(Component, Debug, Clone)]
#[require(AnimationSignals)]
pub struct Mover {
    /// Distance at which a point counts as reached when nothing better is configured.
    pub stop_threshold: f32,
    velocity: Vec2,
    facing: Vec2,
}

impl Default for Mover {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl Mover {
    pub fn new(stop_threshold: f32) -> Self {
        Self {
            stop_threshold,
            velocity: Vec2::ZERO,
            // Ground-plane "forward" is -Z
            facing: Vec2::NEG_Y,
        }
    }

    /// Start with a specific facing direction.
    pub fn with_facing(mut self, facing: Vec2) -> Self {
        if facing.length_squared() > STILL_EPSILON_SQ {
            self.facing = facing.normalize();
        }
        self
    }

    /// Head from `from` towards `target` at `speed` units per second.
    pub fn move_towards(&mut self, from: Vec2, target: Vec2, speed: f32) {
        if speed <= MIN_SPEED {
            self.stop();
            return;
        }

        let direction = (target - from).normalize_or_zero();
        self.velocity = direction * speed;

        if direction.length_squared() > STILL_EPSILON_SQ {
            self.facing = direction;
        }
    }

    /// Turn towards `target` without moving.
    pub fn face_towards(&mut self, from: Vec2, target: Vec2) {
        let direction = (target - from).normalize_or_zero();
        if direction.length_squared() > STILL_EPSILON_SQ {
            self.facing = direction;
        }
    }

    /// Zero the velocity. Facing is left untouched.
    pub fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn facing(&self) -> Vec2 {
        self.facing
    }

    pub fn is_moving(&self) -> bool {
        self.velocity.length_squared() > STILL_EPSILON_SQ
    }

    /// Displacement for one integration step.
    pub fn step(&self, dt: f32) -> Vec2 {
        if self.is_moving() {
            self.velocity * dt
        } else {
            Vec2::ZERO
        }
    }
}

/// Apply mover velocities. Runs in `FixedUpdate`.
///
/// Bodies with a [`KinematicCharacterController`] hand the step to Rapier,
/// which slides them along obstacles. Anything else has its transform moved.
pub fn integrate_movers(
    time: Res<Time>,
    mut query: Query<(&Mover, &mut Transform, Option<&mut KinematicCharacterController>)>,
) {
    let dt = time.delta_secs();

    for (mover, mut transform, controller) in query.iter_mut() {
        let step = mover.step(dt);
        if step == Vec2::ZERO {
            continue;
        }
        let step = Vec3::new(step.x, 0.0, step.y);

        match controller {
            // Several fixed steps may run before physics consumes the translation
            Some(mut controller) => {
                controller.translation = Some(controller.translation.unwrap_or(Vec3::ZERO) + step);
            }
            None => transform.translation += step,
        }
    }
}
