//! Enemy vision: detection zone plus line-of-sight checks.
//!
//! Being inside the zone is only *proximity*. A target counts as seen only
//! when an occlusion trace from the eye to the target is unobstructed.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::movement::Mover;

/// Read-only snapshot of what a sensor perceived this frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PerceptionState {
    pub visible: bool,
    /// Ground position where the target was seen, only while visible
    pub sighted_position: Option<Vec2>,
}

/// The target a sensor is asked to look for this frame.
#[derive(Debug, Clone, Copy)]
pub struct SightTarget {
    pub entity: Entity,
    pub position: Vec3,
}

/// Answers "what is the first obstacle between these two points?".
pub trait LineOfSight {
    /// First obstacle hit on the segment `from -> to`, ignoring `exclude`.
    fn first_blocker(&self, from: Vec3, to: Vec3, exclude: Entity) -> Option<Entity>;
}

/// Line of sight with nothing in the way. Used when there is no physics world.
pub struct ClearSight;

impl LineOfSight for ClearSight {
    fn first_blocker(&self, _from: Vec3, _to: Vec3, _exclude: Entity) -> Option<Entity> {
        None
    }
}

/// Line of sight backed by a Rapier ray cast against obstacle collision groups.
pub struct RapierSight<'a> {
    pub context: &'a RapierContext,
    pub obstacles: Group,
}

impl LineOfSight for RapierSight<'_> {
    fn first_blocker(&self, from: Vec3, to: Vec3, exclude: Entity) -> Option<Entity> {
        let delta = to - from;
        let distance = delta.length();
        if distance <= f32::EPSILON {
            return None;
        }

        let filter = QueryFilter::default()
            .groups(CollisionGroups::new(Group::ALL, self.obstacles))
            .exclude_collider(exclude)
            .exclude_sensors();

        self.context
            .cast_ray(from, delta / distance, distance, true, filter)
            .map(|(entity, _toi)| entity)
    }
}

/// Directional detection zone owned by an enemy.
#[derive(Component, Debug, Clone)]
pub struct Vision {
    /// Detection radius on the ground plane
    pub view_radius: f32,
    /// Full cone angle in degrees (360 = all around)
    pub view_angle: f32,
    /// Height of the eye above the enemy origin (the capsule center)
    pub eye_height: f32,
    /// Body radius of targets, so a target touching the zone edge counts as inside
    pub target_radius: f32,
    /// Collision groups that block sight
    pub obstacles: Group,
    orientation: Vec2,
    target_in_zone: bool,
    perception: PerceptionState,
}

impl Default for Vision {
    fn default() -> Self {
        Self {
            view_radius: 8.0,
            view_angle: 90.0,
            eye_height: 0.6,
            target_radius: 0.3,
            obstacles: Group::GROUP_2,
            orientation: Vec2::NEG_Y,
            target_in_zone: false,
            perception: PerceptionState::default(),
        }
    }
}

impl Vision {
    pub fn perception(&self) -> PerceptionState {
        self.perception
    }

    pub fn can_see_target(&self) -> bool {
        self.perception.visible
    }

    pub fn target_in_zone(&self) -> bool {
        self.target_in_zone
    }

    /// Direction the zone currently points along.
    pub fn orientation(&self) -> Vec2 {
        self.orientation
    }

    /// Point the zone along the mover's travel direction, or its facing when
    /// standing still. A zero direction keeps the previous orientation.
    pub fn orient(&mut self, mover: &Mover) {
        let direction = if mover.is_moving() {
            mover.velocity().normalize_or_zero()
        } else {
            mover.facing()
        };
        if direction != Vec2::ZERO {
            self.orientation = direction.normalize();
        }
    }

    /// Whether a ground point lies inside the detection zone.
    pub fn zone_contains(&self, origin: Vec2, point: Vec2) -> bool {
        let offset = point - origin;
        let distance = offset.length();
        if distance > self.view_radius + self.target_radius {
            return false;
        }
        if self.view_angle >= 360.0 || distance <= f32::EPSILON {
            return true;
        }

        let half_angle = (self.view_angle * 0.5).to_radians();
        let cos_to_target = self.orientation.dot(offset / distance);
        cos_to_target >= half_angle.cos()
    }

    /// Recompute perception for this frame.
    ///
    /// `origin` is the enemy's world position, `me` its own collider (never
    /// counted as an obstacle).
    pub fn refresh(
        &mut self,
        origin: Vec3,
        me: Entity,
        target: Option<SightTarget>,
        sight: &impl LineOfSight,
    ) -> PerceptionState {
        let was_visible = self.perception.visible;

        let Some(target) = target else {
            self.target_in_zone = false;
            self.perception = PerceptionState::default();
            return self.perception;
        };

        let ground_origin = crate::core::ground::to_ground(origin);
        let ground_target = crate::core::ground::to_ground(target.position);

        self.target_in_zone = self.zone_contains(ground_origin, ground_target);
        if !self.target_in_zone {
            self.perception = PerceptionState::default();
            return self.perception;
        }

        let eye = origin + Vec3::Y * self.eye_height;
        let aim = Vec3::new(target.position.x, eye.y, target.position.z);
        let visible = match sight.first_blocker(eye, aim, me) {
            None => true,
            Some(hit) => hit == target.entity,
        };

        self.perception = PerceptionState {
            visible,
            sighted_position: visible.then_some(ground_target),
        };

        if visible && !was_visible {
            warn!("Target {:?} spotted at {:?}", target.entity, ground_target);
        } else if !visible && was_visible {
            info!("Sight of {:?} lost behind an obstacle (still in zone)", target.entity);
        }

        self.perception
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Blocks every segment that crosses the plane `x = wall_x`.
    struct WallAtX {
        wall_x: f32,
        wall: Entity,
    }

    impl LineOfSight for WallAtX {
        fn first_blocker(&self, from: Vec3, to: Vec3, _exclude: Entity) -> Option<Entity> {
            let crosses = (from.x - self.wall_x) * (to.x - self.wall_x) < 0.0;
            crosses.then_some(self.wall)
        }
    }

    /// Reports the target itself as the first hit.
    struct HitsTarget(Entity);

    impl LineOfSight for HitsTarget {
        fn first_blocker(&self, _from: Vec3, _to: Vec3, _exclude: Entity) -> Option<Entity> {
            Some(self.0)
        }
    }

    fn me() -> Entity {
        Entity::from_raw(1)
    }

    fn player() -> Entity {
        Entity::from_raw(2)
    }

    fn facing_plus_x() -> Vision {
        let mut vision = Vision::default();
        let mut mover = Mover::default();
        mover.move_towards(Vec2::ZERO, Vec2::X, 1.0);
        vision.orient(&mover);
        vision
    }

    fn target_at(x: f32, z: f32) -> Option<SightTarget> {
        Some(SightTarget {
            entity: player(),
            position: Vec3::new(x, 0.0, z),
        })
    }

    #[test]
    fn zone_respects_radius_and_angle() {
        let vision = facing_plus_x();
        assert!(vision.zone_contains(Vec2::ZERO, Vec2::new(5.0, 0.0)));
        assert!(vision.zone_contains(Vec2::ZERO, Vec2::new(4.0, 3.9)));
        assert!(!vision.zone_contains(Vec2::ZERO, Vec2::new(4.0, 4.5)));
        assert!(!vision.zone_contains(Vec2::ZERO, Vec2::new(-3.0, 0.0)));
        assert!(!vision.zone_contains(Vec2::ZERO, Vec2::new(9.0, 0.0)));
    }

    #[test]
    fn full_circle_sees_behind() {
        let mut vision = facing_plus_x();
        vision.view_angle = 360.0;
        assert!(vision.zone_contains(Vec2::ZERO, Vec2::new(-3.0, 0.0)));
    }

    #[test]
    fn orientation_prefers_velocity_then_facing() {
        let mut vision = Vision::default();
        let mut mover = Mover::default();

        mover.move_towards(Vec2::ZERO, Vec2::new(0.0, 4.0), 2.0);
        vision.orient(&mover);
        assert_eq!(vision.orientation(), Vec2::Y);

        // Standing still keeps looking along the last facing
        mover.stop();
        vision.orient(&mover);
        assert_eq!(vision.orientation(), Vec2::Y);
    }

    #[test]
    fn unobstructed_target_in_zone_is_visible() {
        let mut vision = facing_plus_x();
        let perception = vision.refresh(Vec3::ZERO, me(), target_at(4.0, 0.0), &ClearSight);
        assert!(perception.visible);
        assert_eq!(perception.sighted_position, Some(Vec2::new(4.0, 0.0)));
    }

    #[test]
    fn proximity_alone_is_not_detection() {
        let mut vision = facing_plus_x();
        let wall = WallAtX {
            wall_x: 2.0,
            wall: Entity::from_raw(9),
        };
        let perception = vision.refresh(Vec3::ZERO, me(), target_at(4.0, 0.0), &wall);
        assert!(vision.target_in_zone());
        assert!(!perception.visible);
        assert_eq!(perception.sighted_position, None);
    }

    #[test]
    fn hitting_the_target_itself_counts_as_visible() {
        let mut vision = facing_plus_x();
        let perception = vision.refresh(Vec3::ZERO, me(), target_at(4.0, 0.0), &HitsTarget(player()));
        assert!(perception.visible);
    }

    #[test]
    fn leaving_zone_latches_invisible_immediately() {
        let mut vision = facing_plus_x();
        assert!(vision.refresh(Vec3::ZERO, me(), target_at(4.0, 0.0), &ClearSight).visible);

        let perception = vision.refresh(Vec3::ZERO, me(), target_at(-4.0, 0.0), &ClearSight);
        assert!(!perception.visible);
        assert!(!vision.target_in_zone());
    }

    #[test]
    fn missing_target_is_never_visible() {
        let mut vision = facing_plus_x();
        vision.refresh(Vec3::ZERO, me(), target_at(4.0, 0.0), &ClearSight);
        let perception = vision.refresh(Vec3::ZERO, me(), None, &ClearSight);
        assert_eq!(perception, PerceptionState::default());
    }

    #[test]
    fn visibility_is_reevaluated_while_in_zone() {
        let mut vision = facing_plus_x();
        let wall = WallAtX {
            wall_x: 2.0,
            wall: Entity::from_raw(9),
        };

        assert!(vision.refresh(Vec3::ZERO, me(), target_at(1.5, 0.0), &wall).visible);
        // Steps behind the wall, still inside the zone
        assert!(!vision.refresh(Vec3::ZERO, me(), target_at(3.0, 0.0), &wall).visible);
        assert!(vision.target_in_zone());
        // Steps back out
        assert!(vision.refresh(Vec3::ZERO, me(), target_at(1.8, 0.5), &wall).visible);
    }
}
