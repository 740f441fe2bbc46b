//! Enemy AI systems.
//!
//! Thin ECS glue around the brains: read transforms and targets, tick the
//! brains, forward their outcomes as events.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::{AiDisabled, AlertIndicators, TrackedTarget};
use super::error::AgentSetupError;
use super::movement::Mover;
use super::patrol::Patrol;
use super::roam::{RoamBrain, RoamFrame, RoamOutcome, RoamRng};
use super::stealth::{Actuators, BrainFrame, StealthBrain, TickOutcome};
use super::vision::{ClearSight, RapierSight, SightTarget, Vision};
use crate::core::ground::to_ground;
use crate::core::{PlayerCaughtEvent, RoamStateChanged, ShotFiredEvent, StealthStateChanged};
use crate::player::{Inactive, Player};

/// Transforms of entities that can be targeted (inactive ones are filtered out).
type TargetQuery<'w, 's> = Query<'w, 's, &'static Transform, Without<Inactive>>;

/// Resolve a target reference to a live entity and its position.
fn resolve_target(target: &TrackedTarget, targets: &TargetQuery) -> Option<(Entity, Vec3)> {
    let entity = target.0?;
    targets
        .get(entity)
        .ok()
        .map(|transform| (entity, transform.translation))
}

/// Fill in a missing target reference with the single player, if there is one.
fn fallback_to_player(enemy: Entity, target: &mut TrackedTarget, players: &Query<Entity, With<Player>>) {
    if target.0.is_some() {
        return;
    }
    match players.get_single() {
        Ok(player) => target.0 = Some(player),
        Err(_) => error!("Enemy {:?}: no player found, AI runs without a target", enemy),
    }
}

/// Validate newly spawned stealth guards and put them in their starting state.
pub fn initialize_stealth_agents(
    mut commands: Commands,
    mut agents: Query<
        (
            Entity,
            &Transform,
            &mut StealthBrain,
            &mut AlertIndicators,
            &mut TrackedTarget,
            Option<&mut Mover>,
            Option<&mut Patrol>,
            Has<Vision>,
        ),
        Added<StealthBrain>,
    >,
    players: Query<Entity, With<Player>>,
    targets: TargetQuery,
) {
    for (entity, transform, mut brain, mut indicators, mut target, mover, mut patrol, has_vision) in
        agents.iter_mut()
    {
        let Some(mut mover) = mover else {
            error!("{}", AgentSetupError::MissingMover(entity));
            commands.entity(entity).insert(AiDisabled);
            continue;
        };
        if !has_vision {
            error!("{}", AgentSetupError::MissingVision(entity));
            commands.entity(entity).insert(AiDisabled);
            continue;
        }
        if patrol.is_none() {
            warn!("Enemy {:?} has no Patrol, it will stand still when idle", entity);
        }

        fallback_to_player(entity, &mut target, &players);
        let target_position = resolve_target(&target, &targets).map(|(_, position)| to_ground(position));

        let mut actuators = Actuators {
            mover: &mut mover,
            patrol: patrol.as_deref_mut(),
            indicators: &mut indicators,
        };
        brain.begin(to_ground(transform.translation), target_position, &mut actuators);

        info!(
            "Stealth guard {:?} ready in {:?} at {:?}",
            entity,
            brain.state(),
            brain.start_position()
        );
    }
}

/// Validate newly spawned roaming shooters and pick their first roam point.
pub fn initialize_roam_agents(
    mut commands: Commands,
    mut rng: ResMut<RoamRng>,
    mut agents: Query<(Entity, &Transform, &mut RoamBrain, &mut TrackedTarget, Has<Mover>), Added<RoamBrain>>,
    players: Query<Entity, With<Player>>,
) {
    for (entity, transform, mut brain, mut target, has_mover) in agents.iter_mut() {
        if !has_mover {
            error!("{}", AgentSetupError::MissingMover(entity));
            commands.entity(entity).insert(AiDisabled);
            continue;
        }

        fallback_to_player(entity, &mut target, &players);
        brain.begin(to_ground(transform.translation), &mut rng.0);
    }
}

/// Orient each vision zone and recompute what it perceives.
pub fn update_vision(
    rapier_context: Query<&RapierContext>,
    mut sensors: Query<(Entity, &Transform, &Mover, &mut Vision, Option<&TrackedTarget>), Without<AiDisabled>>,
    targets: TargetQuery,
) {
    let context = rapier_context.get_single().ok();

    for (entity, transform, mover, mut vision, target) in sensors.iter_mut() {
        vision.orient(mover);

        let sight_target = target
            .and_then(|target| resolve_target(target, &targets))
            .map(|(target_entity, position)| SightTarget {
                entity: target_entity,
                position,
            });

        match context {
            Some(context) => {
                let sight = RapierSight {
                    context,
                    obstacles: vision.obstacles,
                };
                vision.refresh(transform.translation, entity, sight_target, &sight);
            }
            None => {
                vision.refresh(transform.translation, entity, sight_target, &ClearSight);
            }
        }
    }
}

/// Run the stealth state machine of every guard.
pub fn stealth_ai(
    mut commands: Commands,
    time: Res<Time>,
    mut agents: Query<
        (
            Entity,
            &Transform,
            &Vision,
            &TrackedTarget,
            &mut StealthBrain,
            &mut Mover,
            Option<&mut Patrol>,
            &mut AlertIndicators,
        ),
        Without<AiDisabled>,
    >,
    targets: TargetQuery,
    mut caught_events: EventWriter<PlayerCaughtEvent>,
    mut state_events: EventWriter<StealthStateChanged>,
) {
    let dt = time.delta_secs();

    for (entity, transform, vision, target, mut brain, mut mover, mut patrol, mut indicators) in
        agents.iter_mut()
    {
        if !brain.is_started() {
            continue;
        }

        let resolved = resolve_target(target, &targets);
        let frame = BrainFrame {
            dt,
            position: to_ground(transform.translation),
            perception: vision.perception(),
            target_position: resolved.map(|(_, position)| to_ground(position)),
        };

        let before = brain.state();
        let mut actuators = Actuators {
            mover: &mut mover,
            patrol: patrol.as_deref_mut(),
            indicators: &mut indicators,
        };
        let outcome = brain.tick(&frame, &mut actuators);
        let after = brain.state();

        if before != after {
            state_events.send(StealthStateChanged {
                enemy: entity,
                from: before,
                to: after,
            });
        }

        if outcome == TickOutcome::Caught {
            if let Some((player, _)) = resolved {
                caught_events.send(PlayerCaughtEvent { enemy: entity, player });
            }
            commands.entity(entity).insert(AiDisabled);
        }
    }
}

/// Run the roam/shoot state machine of every roaming enemy.
pub fn roam_ai(
    time: Res<Time>,
    mut rng: ResMut<RoamRng>,
    mut agents: Query<(Entity, &Transform, &TrackedTarget, &mut RoamBrain, &mut Mover), Without<AiDisabled>>,
    targets: TargetQuery,
    mut shot_events: EventWriter<ShotFiredEvent>,
    mut state_events: EventWriter<RoamStateChanged>,
) {
    let dt = time.delta_secs();

    for (entity, transform, target, mut brain, mut mover) in agents.iter_mut() {
        if !brain.is_started() {
            continue;
        }

        let resolved = resolve_target(target, &targets);
        let frame = RoamFrame {
            dt,
            position: to_ground(transform.translation),
            target_position: resolved.map(|(_, position)| to_ground(position)),
        };

        let before = brain.state();
        let outcome = brain.tick(&frame, &mut mover, &mut rng.0);
        let after = brain.state();

        if before != after {
            state_events.send(RoamStateChanged {
                enemy: entity,
                from: before,
                to: after,
            });
        }

        if outcome == RoamOutcome::Fired {
            if let Some((target, _)) = resolved {
                info!("Enemy {:?} shoots at {:?}", entity, target);
                shot_events.send(ShotFiredEvent {
                    shooter: entity,
                    target,
                    origin: transform.translation,
                });
            }
        }
    }
}

/// Walk active patrols along their waypoints.
pub fn patrol_waypoints(
    time: Res<Time>,
    mut query: Query<(&Transform, &mut Patrol, &mut Mover), Without<AiDisabled>>,
) {
    let dt = time.delta_secs();

    for (transform, mut patrol, mut mover) in query.iter_mut() {
        patrol.tick(dt, to_ground(transform.translation), &mut mover);
    }
}

/// Freeze agents the moment their AI is switched off.
pub fn halt_disabled_agents(mut query: Query<(&mut Mover, Option<&mut Patrol>), Added<AiDisabled>>) {
    for (mut mover, patrol) in query.iter_mut() {
        if let Some(mut patrol) = patrol {
            patrol.deactivate(&mut mover);
        }
        mover.stop();
    }
}
