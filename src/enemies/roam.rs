//! Roaming shooter AI.
//!
//! Wanders around its spawn point, chases the target once it comes within
//! range and stands still to shoot when close enough.

use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use super::components::TrackedTarget;
use super::movement::Mover;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoamState {
    #[default]
    Roaming,
    ChaseTarget,
    ShootingTarget,
    GoingBackToStart,
}

/// Tuning for a roaming shooter, loaded from enemy definition files.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoamConfig {
    /// Maximum distance of a roam point from the start
    pub roam_radius: f32,
    /// Minimum distance of a roam point from the start
    pub min_roam_distance: f32,
    /// Distance at which a roam point or the start counts as reached
    pub reached_distance: f32,
    pub chase_range: f32,
    /// Must not exceed `chase_range`
    pub shooting_range: f32,
    /// Seconds between shots
    pub shoot_cooldown: f32,
    pub move_speed: f32,
}

impl Default for RoamConfig {
    fn default() -> Self {
        Self {
            roam_radius: 10.0,
            min_roam_distance: 1.0,
            reached_distance: 0.5,
            chase_range: 10.0,
            shooting_range: 7.0,
            shoot_cooldown: 1.5,
            move_speed: 3.5,
        }
    }
}

/// Random source for roam points. Seed it for reproducible runs.
#[derive(Resource)]
pub struct RoamRng(pub StdRng);

impl RoamRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for RoamRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

/// Inputs for one roam tick.
#[derive(Debug, Clone, Copy)]
pub struct RoamFrame {
    pub dt: f32,
    pub position: Vec2,
    /// `None` when the target is missing or inactive
    pub target_position: Option<Vec2>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoamOutcome {
    Continue,
    /// A shot was fired at the target this tick
    Fired,
}

#[derive(Component, Debug, Clone)]
#[require(TrackedTarget)]
pub struct RoamBrain {
    pub config: RoamConfig,
    state: RoamState,
    start_position: Vec2,
    roam_point: Vec2,
    shoot_timer: f32,
    started: bool,
}

impl RoamBrain {
    pub fn new(config: RoamConfig) -> Self {
        Self {
            shoot_timer: config.shoot_cooldown,
            config,
            state: RoamState::Roaming,
            start_position: Vec2::ZERO,
            roam_point: Vec2::ZERO,
            started: false,
        }
    }

    pub fn state(&self) -> RoamState {
        self.state
    }

    pub fn start_position(&self) -> Vec2 {
        self.start_position
    }

    pub fn roam_point(&self) -> Vec2 {
        self.roam_point
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn begin(&mut self, position: Vec2, rng: &mut impl Rng) {
        self.start_position = position;
        self.roam_point = self.pick_roam_point(rng);
        self.state = RoamState::Roaming;
        self.shoot_timer = self.config.shoot_cooldown;
        self.started = true;
    }

    pub fn tick(&mut self, frame: &RoamFrame, mover: &mut Mover, rng: &mut impl Rng) -> RoamOutcome {
        if !self.started {
            return RoamOutcome::Continue;
        }

        let position = frame.position;
        let distance_to_target = frame
            .target_position
            .map(|target| position.distance(target));
        let in_chase_range = distance_to_target.is_some_and(|d| d < self.config.chase_range);

        match self.state {
            RoamState::Roaming => {
                mover.move_towards(position, self.roam_point, self.config.move_speed);
                if position.distance(self.roam_point) < self.config.reached_distance {
                    self.roam_point = self.pick_roam_point(rng);
                    mover.move_towards(position, self.roam_point, self.config.move_speed);
                }
                if in_chase_range {
                    self.set_state(RoamState::ChaseTarget);
                }
            }

            RoamState::ChaseTarget => {
                let (Some(target), Some(distance)) = (frame.target_position, distance_to_target) else {
                    self.set_state(RoamState::GoingBackToStart);
                    return RoamOutcome::Continue;
                };

                mover.move_towards(position, target, self.config.move_speed);
                if distance < self.config.shooting_range {
                    mover.stop();
                    mover.face_towards(position, target);
                    self.set_state(RoamState::ShootingTarget);
                } else if distance > self.config.chase_range {
                    self.set_state(RoamState::GoingBackToStart);
                }
            }

            RoamState::ShootingTarget => {
                let (Some(target), Some(distance)) = (frame.target_position, distance_to_target) else {
                    self.set_state(RoamState::GoingBackToStart);
                    return RoamOutcome::Continue;
                };

                mover.stop();
                mover.face_towards(position, target);

                let mut outcome = RoamOutcome::Continue;
                self.shoot_timer -= frame.dt;
                if self.shoot_timer <= 0.0 {
                    self.shoot_timer = self.config.shoot_cooldown;
                    outcome = RoamOutcome::Fired;
                }

                if distance > self.config.shooting_range {
                    let next = if distance < self.config.chase_range {
                        RoamState::ChaseTarget
                    } else {
                        RoamState::GoingBackToStart
                    };
                    self.set_state(next);
                }
                return outcome;
            }

            RoamState::GoingBackToStart => {
                mover.move_towards(position, self.start_position, self.config.move_speed);
                if position.distance(self.start_position) < self.config.reached_distance {
                    self.roam_point = self.pick_roam_point(rng);
                    self.set_state(RoamState::Roaming);
                }
                if in_chase_range {
                    self.set_state(RoamState::ChaseTarget);
                }
            }
        }

        RoamOutcome::Continue
    }

    fn set_state(&mut self, next: RoamState) {
        if self.state != next {
            info!("Roam state change: {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    /// Random point around the start, at least `min_roam_distance` away
    /// (capped at the radius).
    fn pick_roam_point(&self, rng: &mut impl Rng) -> Vec2 {
        let radius = self.config.roam_radius.max(0.0);
        let min = self.config.min_roam_distance.clamp(0.0, radius);

        let angle = rng.gen::<f32>() * TAU;
        let distance = rng.gen_range(min..=radius);
        self.start_position + Vec2::from_angle(angle) * distance
    }
}
