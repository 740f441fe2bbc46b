//! Animation signal output.
//!
//! The AI never drives an animator directly. It publishes facing and a
//! moving flag on [`AnimationSignals`]; whatever renders the enemy reads them.

use bevy::prelude::*;

use super::components::AnimationSignals;
use super::movement::Mover;

/// Copy mover state into the animation signals and turn the body to face it.
pub fn sync_animation_signals(mut query: Query<(&Mover, &mut AnimationSignals, &mut Transform)>) {
    for (mover, mut signals, mut transform) in query.iter_mut() {
        let next = AnimationSignals {
            facing: mover.facing(),
            moving: mover.is_moving(),
        };

        if signals.set_if_neq(next) {
            let facing = Vec3::new(next.facing.x, 0.0, next.facing.y);
            if facing != Vec3::ZERO {
                transform.look_to(facing, Vec3::Y);
            }
        }
    }
}
