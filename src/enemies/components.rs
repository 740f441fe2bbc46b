//! Enemy-related components.

use bevy::prelude::*;

/// Marker component for all enemies.
#[derive(Component)]
pub struct Enemy;

/// Enemy type identifier (matches RON file name).
#[derive(Component, Clone, Debug)]
pub struct EnemyType(pub String);

/// Reference to the entity this enemy hunts.
///
/// Injected at spawn. The entity may be despawned or marked
/// [`crate::player::Inactive`] at any time; AI systems re-check it every frame.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct TrackedTarget(pub Option<Entity>);

/// Marker: this enemy's AI is switched off (bad setup or after a capture).
#[derive(Component, Debug)]
pub struct AiDisabled;

/// A numeric gauge shown above an enemy's head.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gauge {
    pub value: f32,
    pub max: f32,
}

impl Gauge {
    /// Fill fraction in `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            (self.value / self.max).clamp(0.0, 1.0)
        }
    }
}

/// State indicator outputs: "?" icon, "!" icon and the detection gauge.
///
/// Purely observational. The AI writes these and never reads them back.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct AlertIndicators {
    pub suspicion_icon: bool,
    pub alert_icon: bool,
    pub gauge: Option<Gauge>,
}

impl AlertIndicators {
    /// Hide everything.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn set_gauge_value(&mut self, value: f32) {
        if let Some(gauge) = self.gauge.as_mut() {
            gauge.value = value;
        }
    }
}

/// Signals for the animation layer, refreshed every frame from the mover.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct AnimationSignals {
    /// Ground-plane facing direction (unit length)
    pub facing: Vec2,
    pub moving: bool,
}

impl Default for AnimationSignals {
    fn default() -> Self {
        Self {
            facing: Vec2::NEG_Y,
            moving: false,
        }
    }
}
