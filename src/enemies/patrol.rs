//! Waypoint patrolling.

use bevy::prelude::*;
use serde::Deserialize;

use super::movement::Mover;

/// How a patrol continues after reaching the last waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum PatrolMode {
    /// A → B → C → A → B → C ...
    #[default]
    Loop,
    /// A → B → C → B → A → B ...
    PingPong,
}

/// Walks an enemy along a fixed list of waypoints, pausing at each one.
///
/// Only participates while active. The stealth brain activates it on entry
/// to `Patrolling` and deactivates it for every other state; each activation
/// starts over from the first waypoint.
#[derive(Component, Debug, Clone)]
pub struct Patrol {
    /// Movement speed while patrolling
    pub speed: f32,
    /// Seconds to wait at each waypoint
    pub wait_at_point: f32,
    pub mode: PatrolMode,
    /// Distance at which a waypoint counts as reached
    pub arrival_threshold: f32,
    waypoints: Vec<Vec2>,
    index: usize,
    direction: isize,
    dwell: Option<f32>,
    active: bool,
}

impl Patrol {
    pub fn new(waypoints: Vec<Vec2>) -> Self {
        Self {
            speed: 2.0,
            wait_at_point: 1.0,
            mode: PatrolMode::Loop,
            arrival_threshold: 0.2,
            waypoints,
            index: 0,
            direction: 1,
            dwell: None,
            active: false,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_wait(mut self, seconds: f32) -> Self {
        self.wait_at_point = seconds;
        self
    }

    pub fn with_mode(mut self, mode: PatrolMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_arrival_threshold(mut self, threshold: f32) -> Self {
        self.arrival_threshold = threshold;
        self
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current_waypoint(&self) -> Option<Vec2> {
        self.waypoints.get(self.index).copied()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_waiting(&self) -> bool {
        self.dwell.is_some()
    }

    /// Remaining dwell time, if currently waiting at a waypoint.
    pub fn dwell_remaining(&self) -> Option<f32> {
        self.dwell
    }

    /// Start patrolling from the first waypoint.
    pub fn activate(&mut self, position: Vec2, mover: &mut Mover) {
        if self.active {
            return;
        }
        self.active = true;
        self.index = 0;
        self.direction = 1;
        self.dwell = None;

        match self.current_waypoint() {
            Some(waypoint) => mover.move_towards(position, waypoint, self.speed),
            None => {
                warn!("Patrol activated without waypoints, standing still");
                mover.stop();
            }
        }
    }

    /// Stop patrolling immediately, cancelling any pending dwell.
    pub fn deactivate(&mut self, mover: &mut Mover) {
        if !self.active {
            return;
        }
        self.active = false;
        self.dwell = None;
        mover.stop();
    }

    /// Advance the patrol by one frame.
    pub fn tick(&mut self, dt: f32, position: Vec2, mover: &mut Mover) {
        if !self.active {
            return;
        }
        let Some(waypoint) = self.current_waypoint() else {
            return;
        };

        if let Some(remaining) = self.dwell {
            let remaining = remaining - dt;
            if remaining > 0.0 {
                self.dwell = Some(remaining);
                return;
            }
            self.dwell = None;
            self.advance();
            if let Some(next) = self.current_waypoint() {
                mover.move_towards(position, next, self.speed);
            }
            return;
        }

        if position.distance(waypoint) <= self.arrival_threshold {
            mover.stop();
            if self.wait_at_point > 0.0 {
                self.dwell = Some(self.wait_at_point);
            } else {
                self.advance();
                if let Some(next) = self.current_waypoint() {
                    mover.move_towards(position, next, self.speed);
                }
            }
        } else {
            mover.move_towards(position, waypoint, self.speed);
        }
    }

    fn advance(&mut self) {
        let count = self.waypoints.len();
        if count <= 1 {
            self.index = 0;
            return;
        }

        match self.mode {
            PatrolMode::Loop => {
                self.index = (self.index + 1) % count;
            }
            PatrolMode::PingPong => {
                let next = self.index as isize + self.direction;
                if next >= count as isize {
                    self.index = count - 2;
                    self.direction = -1;
                } else if next < 0 {
                    self.index = 1;
                    self.direction = 1;
                } else {
                    self.index = next as usize;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Vec<Vec2> {
        vec![Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0), Vec2::new(5.0, 5.0)]
    }

    /// Collect the order in which waypoints get visited by repeatedly
    /// teleporting onto the current waypoint and letting the dwell expire.
    fn visit_order(mut patrol: Patrol, visits: usize) -> Vec<usize> {
        let mut mover = Mover::default();
        patrol.activate(Vec2::new(-1.0, -1.0), &mut mover);

        let mut order = Vec::new();
        for _ in 0..visits {
            order.push(patrol.current_index());
            let here = patrol.current_waypoint().unwrap();
            // Arrive, then wait out the dwell
            patrol.tick(0.1, here, &mut mover);
            patrol.tick(patrol.wait_at_point + 0.1, here, &mut mover);
        }
        order
    }

    #[test]
    fn loop_order_wraps() {
        let order = visit_order(Patrol::new(abc()).with_mode(PatrolMode::Loop), 7);
        assert_eq!(order, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn ping_pong_order_reverses_at_both_ends() {
        let order = visit_order(Patrol::new(abc()).with_mode(PatrolMode::PingPong), 7);
        assert_eq!(order, vec![0, 1, 2, 1, 0, 1, 2]);
    }

    #[test]
    fn zero_wait_advances_immediately() {
        let mut patrol = Patrol::new(abc()).with_wait(0.0);
        let mut mover = Mover::default();
        patrol.activate(Vec2::ZERO, &mut mover);

        patrol.tick(0.016, Vec2::ZERO, &mut mover);
        assert_eq!(patrol.current_index(), 1);
        assert!(!patrol.is_waiting());
        assert!(mover.is_moving());
    }

    #[test]
    fn dwell_stops_and_counts_down() {
        let mut patrol = Patrol::new(abc()).with_wait(1.0);
        let mut mover = Mover::default();
        patrol.activate(Vec2::new(0.0, 3.0), &mut mover);
        assert!(mover.is_moving());

        patrol.tick(0.1, Vec2::ZERO, &mut mover);
        assert!(patrol.is_waiting());
        assert!(!mover.is_moving());

        patrol.tick(0.5, Vec2::ZERO, &mut mover);
        assert_eq!(patrol.current_index(), 0);
        assert!(!mover.is_moving());

        patrol.tick(0.6, Vec2::ZERO, &mut mover);
        assert_eq!(patrol.current_index(), 1);
        assert!(mover.is_moving());
    }

    #[test]
    fn reactivation_starts_over() {
        let mut patrol = Patrol::new(abc()).with_mode(PatrolMode::PingPong);
        let mut mover = Mover::default();
        patrol.activate(Vec2::ZERO, &mut mover);

        // Reach waypoint 0, wait, advance to 1, then start waiting at 1
        patrol.tick(0.1, Vec2::ZERO, &mut mover);
        patrol.tick(2.0, Vec2::ZERO, &mut mover);
        patrol.tick(0.1, Vec2::new(5.0, 0.0), &mut mover);
        assert_eq!(patrol.current_index(), 1);
        assert!(patrol.is_waiting());

        patrol.deactivate(&mut mover);
        assert!(!patrol.is_active());
        assert!(!patrol.is_waiting());
        assert!(!mover.is_moving());

        patrol.activate(Vec2::new(5.0, 0.0), &mut mover);
        assert_eq!(patrol.current_index(), 0);
        assert_eq!(patrol.dwell_remaining(), None);
        assert!(mover.is_moving());
    }

    #[test]
    fn inactive_patrol_does_not_drive_mover() {
        let mut patrol = Patrol::new(abc());
        let mut mover = Mover::default();
        patrol.tick(0.1, Vec2::new(3.0, 3.0), &mut mover);
        assert!(!mover.is_moving());
    }

    #[test]
    fn empty_and_single_waypoint_patrols_are_stationary() {
        let mut mover = Mover::default();
        let mut empty = Patrol::new(Vec::new());
        empty.activate(Vec2::ZERO, &mut mover);
        empty.tick(0.1, Vec2::ZERO, &mut mover);
        assert!(!mover.is_moving());

        let mut single = Patrol::new(vec![Vec2::ZERO]);
        single.activate(Vec2::ZERO, &mut mover);
        for _ in 0..5 {
            single.tick(2.0, Vec2::ZERO, &mut mover);
            assert_eq!(single.current_index(), 0);
        }
    }
}
