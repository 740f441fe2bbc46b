//! Stealth guard state machine.
//!
//! A guard patrols until it sees the player, grows suspicious, gives chase,
//! searches where the player was last seen and finally walks back to its post.
//! The brain is plain data driven by [`StealthBrain::tick`]; the ECS glue
//! lives in `ai.rs`.

use bevy::prelude::*;
use serde::Deserialize;

use super::components::{AlertIndicators, Gauge, TrackedTarget};
use super::movement::Mover;
use super::patrol::Patrol;
use super::vision::PerceptionState;

/// Guard behaviour states. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum StealthState {
    /// Walking the patrol route
    #[default]
    Patrolling,
    /// Saw something, standing still while suspicion builds ("?")
    SuspectingPlayer,
    /// Running at the player ("!")
    ChasingPlayer,
    /// Lost sight, heading to where the player was last seen
    SearchingLastKnownPosition,
    /// Gave up, walking back to the spawn point
    ReturningToStartPoint,
}

impl StealthState {
    /// States in which the guard is actively engaged with the target.
    pub fn is_engaged(self) -> bool {
        matches!(
            self,
            StealthState::SuspectingPlayer
                | StealthState::ChasingPlayer
                | StealthState::SearchingLastKnownPosition
        )
    }
}

/// Tuning for a stealth guard, loaded from enemy definition files.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StealthConfig {
    pub starting_state: StealthState,
    pub chase_speed: f32,
    /// Distance at which the player is caught
    pub catch_distance: f32,
    /// Seconds of continuous sight to go from "?" to "!"
    pub suspicion_time_to_alert: f32,
    /// Seconds spent searching before heading home
    pub search_time_before_patrol: f32,
}

impl Default for StealthConfig {
    fn default() -> Self {
        Self {
            starting_state: StealthState::Patrolling,
            chase_speed: 4.0,
            catch_distance: 1.0,
            suspicion_time_to_alert: 1.0,
            search_time_before_patrol: 3.0,
        }
    }
}

/// Fraction of chase speed used to walk home when there is no patrol.
const RETURN_SPEED_FACTOR: f32 = 0.75;

/// Suspicion drains this many times faster than it builds.
const SUSPICION_DECAY_RATE: f32 = 2.0;

/// Everything the brain reads for one frame.
#[derive(Debug, Clone, Copy)]
pub struct BrainFrame {
    pub dt: f32,
    /// Guard ground position
    pub position: Vec2,
    pub perception: PerceptionState,
    /// Target ground position, `None` when the target reference is invalid
    pub target_position: Option<Vec2>,
}

/// Collaborators the brain drives.
pub struct Actuators<'a> {
    pub mover: &'a mut Mover,
    pub patrol: Option<&'a mut Patrol>,
    pub indicators: &'a mut AlertIndicators,
}

/// Result of one brain tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// The target was caught this tick. The brain is now halted.
    Caught,
}

/// The stealth AI agent.
#[derive(Component, Debug, Clone)]
#[require(AlertIndicators, TrackedTarget)]
pub struct StealthBrain {
    pub config: StealthConfig,
    state: StealthState,
    start_position: Vec2,
    suspicion: f32,
    search_timer: f32,
    last_sighting: Option<Vec2>,
    started: bool,
    halted: bool,
}

impl StealthBrain {
    pub fn new(config: StealthConfig) -> Self {
        Self {
            state: config.starting_state,
            config,
            start_position: Vec2::ZERO,
            suspicion: 0.0,
            search_timer: 0.0,
            last_sighting: None,
            started: false,
            halted: false,
        }
    }

    pub fn state(&self) -> StealthState {
        self.state
    }

    pub fn start_position(&self) -> Vec2 {
        self.start_position
    }

    pub fn suspicion(&self) -> f32 {
        self.suspicion
    }

    pub fn search_timer(&self) -> f32 {
        self.search_timer
    }

    /// Last trusted target position; only kept while chasing or searching.
    pub fn last_sighting(&self) -> Option<Vec2> {
        self.last_sighting
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether the brain has stopped for good (the target was caught).
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Anchor the guard at its spawn point and enter the starting state.
    pub fn begin(&mut self, position: Vec2, target_position: Option<Vec2>, actuators: &mut Actuators) {
        self.start_position = position;
        self.started = true;
        self.halted = false;
        self.enter(self.config.starting_state, position, target_position, actuators);
        if self.state != self.config.starting_state {
            info!(
                "Stealth guard could not start in {:?}, starting in {:?}",
                self.config.starting_state, self.state
            );
        }
    }

    /// Evaluate transitions for this frame, then run the current state's action.
    pub fn tick(&mut self, frame: &BrainFrame, actuators: &mut Actuators) -> TickOutcome {
        if !self.started || self.halted {
            return TickOutcome::Continue;
        }

        let Some(target_position) = frame.target_position else {
            if self.state.is_engaged() {
                self.change_state(StealthState::ReturningToStartPoint, frame, actuators);
                return TickOutcome::Continue;
            }
            // Nothing to look at; keep patrolling or walking home
            self.evaluate(frame, false, actuators);
            self.act(frame, actuators);
            return TickOutcome::Continue;
        };

        let visible = frame.perception.visible;

        if self.state == StealthState::ChasingPlayer {
            if visible {
                self.last_sighting = Some(target_position);
            }
            // Within reach is a catch even if the target just slipped out of view
            if frame.position.distance(target_position) <= self.config.catch_distance {
                self.catch(actuators);
                return TickOutcome::Caught;
            }
        }

        self.evaluate(frame, visible, actuators);
        self.act(frame, actuators);
        TickOutcome::Continue
    }

    fn evaluate(&mut self, frame: &BrainFrame, visible: bool, actuators: &mut Actuators) {
        let dt = frame.dt;

        match self.state {
            StealthState::Patrolling => {
                if visible {
                    self.change_state(StealthState::SuspectingPlayer, frame, actuators);
                }
            }

            StealthState::SuspectingPlayer => {
                let threshold = self.config.suspicion_time_to_alert;
                if visible {
                    self.suspicion = (self.suspicion + dt).min(threshold);
                    actuators.indicators.set_gauge_value(self.suspicion);
                    if self.suspicion >= threshold {
                        self.change_state(StealthState::ChasingPlayer, frame, actuators);
                    }
                } else {
                    self.suspicion = (self.suspicion - dt * SUSPICION_DECAY_RATE).max(0.0);
                    actuators.indicators.set_gauge_value(self.suspicion);
                    if self.suspicion <= 0.0 {
                        self.change_state(StealthState::Patrolling, frame, actuators);
                    }
                }
            }

            StealthState::ChasingPlayer => {
                if !visible {
                    self.change_state(StealthState::SearchingLastKnownPosition, frame, actuators);
                }
            }

            StealthState::SearchingLastKnownPosition => {
                if visible {
                    self.change_state(StealthState::ChasingPlayer, frame, actuators);
                    return;
                }

                let duration = self.config.search_time_before_patrol;
                self.search_timer = (self.search_timer + dt).min(duration);
                actuators
                    .indicators
                    .set_gauge_value((duration - self.search_timer).max(0.0));

                let threshold = arrival_threshold(actuators);
                let arrived = self
                    .last_sighting
                    .map_or(true, |spot| frame.position.distance(spot) <= threshold);

                if self.search_timer >= duration || arrived {
                    self.change_state(StealthState::ReturningToStartPoint, frame, actuators);
                }
            }

            StealthState::ReturningToStartPoint => {
                if visible {
                    self.change_state(StealthState::ChasingPlayer, frame, actuators);
                    return;
                }

                let threshold = arrival_threshold(actuators);
                if frame.position.distance(self.start_position) <= threshold {
                    self.change_state(StealthState::Patrolling, frame, actuators);
                }
            }
        }
    }

    fn act(&mut self, frame: &BrainFrame, actuators: &mut Actuators) {
        match self.state {
            // Movement is delegated to the patrol
            StealthState::Patrolling => {}

            StealthState::SuspectingPlayer => actuators.mover.stop(),

            StealthState::ChasingPlayer | StealthState::SearchingLastKnownPosition => {
                if let Some(spot) = self.last_sighting {
                    actuators
                        .mover
                        .move_towards(frame.position, spot, self.config.chase_speed);
                }
            }

            StealthState::ReturningToStartPoint => {
                let speed = match actuators.patrol.as_deref() {
                    Some(patrol) => patrol.speed,
                    None => self.config.chase_speed * RETURN_SPEED_FACTOR,
                };
                actuators
                    .mover
                    .move_towards(frame.position, self.start_position, speed);
            }
        }
    }

    fn change_state(&mut self, next: StealthState, frame: &BrainFrame, actuators: &mut Actuators) {
        if self.state == next {
            return;
        }
        let from = self.state;
        self.enter(next, frame.position, frame.target_position, actuators);
        info!("Stealth state change: {:?} -> {:?}", from, self.state);
    }

    /// Exit the current state and run the entry actions of `next`.
    fn enter(
        &mut self,
        next: StealthState,
        position: Vec2,
        target_position: Option<Vec2>,
        actuators: &mut Actuators,
    ) {
        actuators.indicators.clear();
        actuators.mover.stop();
        self.state = next;

        if next != StealthState::Patrolling {
            if let Some(patrol) = actuators.patrol.as_deref_mut() {
                patrol.deactivate(actuators.mover);
            }
        }

        match next {
            StealthState::Patrolling => {
                self.suspicion = 0.0;
                self.search_timer = 0.0;
                self.last_sighting = None;
                if let Some(patrol) = actuators.patrol.as_deref_mut() {
                    patrol.activate(position, actuators.mover);
                }
            }

            StealthState::SuspectingPlayer => {
                self.search_timer = 0.0;
                self.last_sighting = None;
                actuators.indicators.suspicion_icon = true;
                actuators.indicators.gauge = Some(Gauge {
                    value: self.suspicion,
                    max: self.config.suspicion_time_to_alert,
                });
            }

            StealthState::ChasingPlayer => {
                self.suspicion = 0.0;
                self.search_timer = 0.0;
                match target_position {
                    Some(target) => {
                        actuators.indicators.alert_icon = true;
                        self.last_sighting = Some(target);
                    }
                    None => {
                        // Nothing to chase
                        self.enter(StealthState::ReturningToStartPoint, position, None, actuators);
                    }
                }
            }

            StealthState::SearchingLastKnownPosition => {
                self.suspicion = 0.0;
                self.search_timer = 0.0;
                let duration = self.config.search_time_before_patrol;
                actuators.indicators.suspicion_icon = true;
                actuators.indicators.gauge = Some(Gauge {
                    value: duration,
                    max: duration,
                });
            }

            StealthState::ReturningToStartPoint => {
                self.suspicion = 0.0;
                self.search_timer = 0.0;
                self.last_sighting = None;
            }
        }
    }

    fn catch(&mut self, actuators: &mut Actuators) {
        warn!("Player caught!");
        actuators.mover.stop();
        if let Some(patrol) = actuators.patrol.as_deref_mut() {
            patrol.deactivate(actuators.mover);
        }
        self.halted = true;
    }
}

fn arrival_threshold(actuators: &Actuators) -> f32 {
    actuators
        .patrol
        .as_deref()
        .map_or(actuators.mover.stop_threshold, |patrol| patrol.arrival_threshold)
}
