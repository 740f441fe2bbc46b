//! Debug drawing for enemy perception and alert indicators.

use bevy::prelude::*;

use super::components::{AiDisabled, AlertIndicators};
use super::vision::Vision;
use crate::core::ground::from_ground;

/// Segments used to approximate the vision arc.
const ARC_SEGMENTS: usize = 12;

/// Height of the indicators above the enemy origin.
const INDICATOR_HEIGHT: f32 = 2.0;

/// Toggle for AI gizmos (F1).
#[derive(Resource)]
pub struct AiDebugDraw {
    pub enabled: bool,
}

impl Default for AiDebugDraw {
    fn default() -> Self {
        Self { enabled: true }
    }
}

pub fn toggle_ai_debug_draw(keyboard: Res<ButtonInput<KeyCode>>, mut draw: ResMut<AiDebugDraw>) {
    if keyboard.just_pressed(KeyCode::F1) {
        draw.enabled = !draw.enabled;
        info!("AI debug drawing: {}", if draw.enabled { "on" } else { "off" });
    }
}

/// Draw each vision zone, colored by whether the target is seen or merely in range.
pub fn draw_vision_cones(
    draw: Res<AiDebugDraw>,
    mut gizmos: Gizmos,
    query: Query<(&Transform, &Vision), Without<AiDisabled>>,
) {
    if !draw.enabled {
        return;
    }

    for (transform, vision) in query.iter() {
        let color = if vision.can_see_target() {
            Color::srgb(1.0, 0.2, 0.2)
        } else if vision.target_in_zone() {
            Color::srgb(1.0, 0.8, 0.2)
        } else {
            Color::srgb(0.3, 0.8, 0.3)
        };

        let height = 0.05;
        let origin = Vec3::new(transform.translation.x, height, transform.translation.z);
        let ground_origin = Vec2::new(origin.x, origin.z);
        let radius = vision.view_radius;

        if vision.view_angle >= 360.0 {
            gizmos.circle(
                Isometry3d::new(origin, Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
                radius,
                color,
            );
            continue;
        }

        let half = (vision.view_angle * 0.5).to_radians();
        let forward = vision.orientation();
        let edge = |angle: f32| {
            from_ground(ground_origin + Vec2::from_angle(angle).rotate(forward) * radius, height)
        };

        gizmos.line(origin, edge(-half), color);
        gizmos.line(origin, edge(half), color);

        let step = (2.0 * half) / ARC_SEGMENTS as f32;
        for i in 0..ARC_SEGMENTS {
            let a = -half + step * i as f32;
            gizmos.line(edge(a), edge(a + step), color);
        }
    }
}

/// Draw the "?" / "!" markers and the detection gauge above each enemy.
pub fn draw_alert_indicators(
    draw: Res<AiDebugDraw>,
    mut gizmos: Gizmos,
    query: Query<(&Transform, &AlertIndicators)>,
) {
    if !draw.enabled {
        return;
    }

    for (transform, indicators) in query.iter() {
        let head = transform.translation + Vec3::Y * INDICATOR_HEIGHT;

        if indicators.suspicion_icon {
            gizmos.sphere(Isometry3d::from_translation(head), 0.15, Color::srgb(1.0, 0.9, 0.1));
        }
        if indicators.alert_icon {
            gizmos.sphere(Isometry3d::from_translation(head), 0.2, Color::srgb(1.0, 0.1, 0.1));
        }
        if let Some(gauge) = indicators.gauge {
            let start = head + Vec3::new(-0.5, 0.3, 0.0);
            gizmos.line(start, start + Vec3::X, Color::srgb(0.2, 0.2, 0.2));
            gizmos.line(start, start + Vec3::X * gauge.fraction(), Color::srgb(1.0, 0.6, 0.1));
        }
    }
}
