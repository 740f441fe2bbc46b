//! Headless scenarios for the enemy AI.
//!
//! Runs the real AI systems in a `MinimalPlugins` app with a fixed frame
//! time. There is no physics world here, so sight is never blocked. Hedges
//! and benches are exercised in `occlusion_scenarios.rs`.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use park_stealth::core::{PlayerCaughtEvent, RoamStateChanged, ShotFiredEvent, StealthStateChanged};
use park_stealth::enemies::ai::{
    halt_disabled_agents, initialize_roam_agents, initialize_stealth_agents, patrol_waypoints, roam_ai,
    stealth_ai, update_vision,
};
use park_stealth::enemies::animation::sync_animation_signals;
use park_stealth::enemies::movement::integrate_movers;
use park_stealth::enemies::{
    AiDisabled, AlertIndicators, AnimationSignals, Enemy, Mover, Patrol, PatrolMode, RoamBrain, RoamConfig,
    RoamRng, StealthBrain, StealthConfig, StealthState, TrackedTarget, Vision,
};
use park_stealth::player::{Inactive, Player};

/// Seconds per `app.update()`.
const FRAME: f32 = 0.05;

/// Height of actor centers above the ground.
const CENTER: f32 = 0.8;

fn headless_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(FRAME)))
        .insert_resource(RoamRng::seeded(42))
        .add_event::<PlayerCaughtEvent>()
        .add_event::<StealthStateChanged>()
        .add_event::<RoamStateChanged>()
        .add_event::<ShotFiredEvent>()
        .add_systems(
            Update,
            (
                initialize_stealth_agents,
                initialize_roam_agents,
                update_vision,
                stealth_ai,
                roam_ai,
                patrol_waypoints,
                halt_disabled_agents,
                sync_animation_signals,
            )
                .chain(),
        )
        .add_systems(FixedUpdate, integrate_movers);
    app
}

fn spawn_player(app: &mut App, position: Vec2) -> Entity {
    app.world_mut()
        .spawn((Player, Transform::from_xyz(position.x, CENTER, position.y)))
        .id()
}

fn spawn_guard(app: &mut App, position: Vec2, target: Option<Entity>, patrol: Option<Patrol>) -> Entity {
    let mut guard = app.world_mut().spawn((
        Enemy,
        Transform::from_xyz(position.x, CENTER, position.y),
        Mover::default(),
        Vision::default(),
        StealthBrain::new(StealthConfig::default()),
        TrackedTarget(target),
    ));
    if let Some(patrol) = patrol {
        guard.insert(patrol);
    }
    guard.id()
}

fn brain(app: &App, guard: Entity) -> &StealthBrain {
    app.world().get::<StealthBrain>(guard).unwrap()
}

fn state(app: &App, guard: Entity) -> StealthState {
    brain(app, guard).state()
}

fn ground_position(app: &App, entity: Entity) -> Vec2 {
    let translation = app.world().get::<Transform>(entity).unwrap().translation;
    Vec2::new(translation.x, translation.z)
}

fn drain_caught(app: &mut App) -> Vec<PlayerCaughtEvent> {
    app.world_mut()
        .resource_mut::<Events<PlayerCaughtEvent>>()
        .drain()
        .collect()
}

fn drain_state_changes(app: &mut App) -> Vec<StealthStateChanged> {
    app.world_mut()
        .resource_mut::<Events<StealthStateChanged>>()
        .drain()
        .collect()
}

/// Timer and patrol invariants that must hold after every frame.
fn assert_guard_invariants(app: &App, guard: Entity) {
    let brain = brain(app, guard);
    if brain.suspicion() > 0.0 {
        assert_eq!(brain.state(), StealthState::SuspectingPlayer);
    }
    if brain.search_timer() > 0.0 {
        assert_eq!(brain.state(), StealthState::SearchingLastKnownPosition);
    }
    if let Some(patrol) = app.world().get::<Patrol>(guard) {
        if patrol.is_active() {
            assert_eq!(brain.state(), StealthState::Patrolling);
        }
    }
}

/// Run until `done` returns true, at most `max_frames` frames.
fn run_until(app: &mut App, max_frames: usize, mut done: impl FnMut(&mut App) -> bool) -> bool {
    for _ in 0..max_frames {
        app.update();
        if done(app) {
            return true;
        }
    }
    false
}

#[test]
fn guard_spots_escalates_and_catches_exactly_once() {
    let mut app = headless_app();
    // Guard looks along -Z by default; player stands 5 units in front
    let player = spawn_player(&mut app, Vec2::new(0.0, -5.0));
    let guard = spawn_guard(&mut app, Vec2::ZERO, Some(player), None);

    app.update();
    assert_eq!(state(&app, guard), StealthState::SuspectingPlayer);
    let indicators = app.world().get::<AlertIndicators>(guard).unwrap();
    assert!(indicators.suspicion_icon);

    // One second of sight at 0.05s frames, with a little slack
    let mut caught = Vec::new();
    let mut states = vec![StealthState::Patrolling];
    for _ in 0..200 {
        app.update();
        assert_guard_invariants(&app, guard);
        states.extend(drain_state_changes(&mut app).into_iter().map(|change| change.to));
        caught.extend(drain_caught(&mut app));
    }

    assert!(states.contains(&StealthState::SuspectingPlayer));
    assert!(states.contains(&StealthState::ChasingPlayer));
    assert_eq!(caught.len(), 1);
    assert_eq!(caught[0].enemy, guard);
    assert_eq!(caught[0].player, player);

    assert!(app.world().get::<AiDisabled>(guard).is_some());
    let mover = app.world().get::<Mover>(guard).unwrap();
    assert!(!mover.is_moving());
    assert!(ground_position(&app, guard).distance(Vec2::new(0.0, -5.0)) <= 1.0 + 0.1);
}

#[test]
fn suspicion_takes_the_alert_time_before_chasing() {
    let mut app = headless_app();
    let player = spawn_player(&mut app, Vec2::new(0.0, -6.0));
    let guard = spawn_guard(&mut app, Vec2::ZERO, Some(player), None);

    app.update();
    assert_eq!(state(&app, guard), StealthState::SuspectingPlayer);

    // 0.8s in: still suspicious
    for _ in 0..16 {
        app.update();
    }
    assert_eq!(state(&app, guard), StealthState::SuspectingPlayer);
    assert!(brain(&app, guard).suspicion() > 0.6);

    let chased = run_until(&mut app, 10, |app| state(app, guard) == StealthState::ChasingPlayer);
    assert!(chased);
    assert!(app.world().get::<AlertIndicators>(guard).unwrap().alert_icon);
}

#[test]
fn breaking_sight_while_suspicious_returns_to_patrol() {
    let mut app = headless_app();
    let player = spawn_player(&mut app, Vec2::new(0.0, -5.0));
    let waypoints = vec![Vec2::ZERO, Vec2::new(0.0, 4.0)];
    let guard = spawn_guard(&mut app, Vec2::ZERO, Some(player), Some(Patrol::new(waypoints)));

    app.update();
    assert_eq!(state(&app, guard), StealthState::SuspectingPlayer);
    assert!(!app.world().get::<Patrol>(guard).unwrap().is_active());

    for _ in 0..6 {
        app.update();
    }
    // Step out of the zone; suspicion drains at twice the build rate
    app.world_mut().get_mut::<Transform>(player).unwrap().translation.z = 20.0;

    let back = run_until(&mut app, 20, |app| state(app, guard) == StealthState::Patrolling);
    assert!(back);
    assert_eq!(brain(&app, guard).suspicion(), 0.0);
    let patrol = app.world().get::<Patrol>(guard).unwrap();
    assert!(patrol.is_active());
    assert_eq!(patrol.current_index(), 0);
}

#[test]
fn despawned_target_during_search_sends_guard_home() {
    let mut app = headless_app();
    let player = spawn_player(&mut app, Vec2::new(0.0, -7.0));
    let guard = spawn_guard(&mut app, Vec2::ZERO, Some(player), None);

    let chasing = run_until(&mut app, 40, |app| state(app, guard) == StealthState::ChasingPlayer);
    assert!(chasing);

    // Slip behind the guard: out of the zone, so the chase turns into a search
    app.world_mut().get_mut::<Transform>(player).unwrap().translation.z = 25.0;
    app.update();
    assert_eq!(state(&app, guard), StealthState::SearchingLastKnownPosition);
    assert!(brain(&app, guard).last_sighting().is_some());

    app.world_mut().despawn(player);
    app.update();
    assert_eq!(state(&app, guard), StealthState::ReturningToStartPoint);
    assert_eq!(brain(&app, guard).search_timer(), 0.0);
    assert!(brain(&app, guard).last_sighting().is_none());

    let home = run_until(&mut app, 200, |app| state(app, guard) == StealthState::Patrolling);
    assert!(home);
    assert!(ground_position(&app, guard).length() <= 0.2);
    assert!(drain_caught(&mut app).is_empty());
}

#[test]
fn inactive_player_is_treated_as_missing() {
    let mut app = headless_app();
    let player = spawn_player(&mut app, Vec2::new(0.0, -7.0));
    let guard = spawn_guard(&mut app, Vec2::ZERO, Some(player), None);

    let chasing = run_until(&mut app, 40, |app| state(app, guard) == StealthState::ChasingPlayer);
    assert!(chasing);

    app.world_mut().entity_mut(player).insert(Inactive);
    app.update();
    assert_eq!(state(&app, guard), StealthState::ReturningToStartPoint);
    assert!(!app.world().get::<Vision>(guard).unwrap().can_see_target());
}

#[test]
fn patrol_visits_waypoints_in_loop_order() {
    let mut app = headless_app();
    let square = vec![
        Vec2::ZERO,
        Vec2::new(2.0, 0.0),
        Vec2::new(2.0, 2.0),
        Vec2::new(0.0, 2.0),
    ];
    let patrol = Patrol::new(square).with_wait(0.2).with_mode(PatrolMode::Loop);
    // No player anywhere: the guard just walks its route
    let guard = spawn_guard(&mut app, Vec2::ZERO, None, Some(patrol));

    let mut visited = vec![0];
    for _ in 0..400 {
        app.update();
        let index = app.world().get::<Patrol>(guard).unwrap().current_index();
        if visited.last() != Some(&index) {
            visited.push(index);
        }
        assert_eq!(state(&app, guard), StealthState::Patrolling);
        if visited.len() >= 6 {
            break;
        }
    }

    assert_eq!(&visited[..6], &[0, 1, 2, 3, 0, 1]);
    let signals = app.world().get::<AnimationSignals>(guard).unwrap();
    assert_eq!(signals.moving, app.world().get::<Mover>(guard).unwrap().is_moving());
}

#[test]
fn guard_without_vision_is_disabled() {
    let mut app = headless_app();
    let player = spawn_player(&mut app, Vec2::new(0.0, -3.0));
    let guard = app
        .world_mut()
        .spawn((
            Enemy,
            Transform::from_xyz(0.0, CENTER, 0.0),
            Mover::default(),
            StealthBrain::new(StealthConfig::default()),
            TrackedTarget(Some(player)),
        ))
        .id();

    for _ in 0..30 {
        app.update();
    }

    assert!(app.world().get::<AiDisabled>(guard).is_some());
    assert!(!brain(&app, guard).is_started());
    assert_eq!(state(&app, guard), StealthState::Patrolling);
    assert!(!app.world().get::<Mover>(guard).unwrap().is_moving());
}

#[test]
fn guard_finds_the_player_without_an_injected_target() {
    let mut app = headless_app();
    let player = spawn_player(&mut app, Vec2::new(0.0, -4.0));
    let guard = spawn_guard(&mut app, Vec2::ZERO, None, None);

    app.update();
    assert_eq!(app.world().get::<TrackedTarget>(guard).unwrap().0, Some(player));
    assert_eq!(state(&app, guard), StealthState::SuspectingPlayer);
}

#[test]
fn roaming_shooter_fires_at_a_close_target() {
    let mut app = headless_app();
    let player = spawn_player(&mut app, Vec2::new(3.0, 0.0));
    let shooter = app
        .world_mut()
        .spawn((
            Enemy,
            Transform::from_xyz(0.0, CENTER, 0.0),
            Mover::default(),
            RoamBrain::new(RoamConfig::default()),
            TrackedTarget(Some(player)),
        ))
        .id();

    let mut shots = Vec::new();
    for _ in 0..80 {
        app.update();
        shots.extend(
            app.world_mut()
                .resource_mut::<Events<ShotFiredEvent>>()
                .drain(),
        );
    }

    assert!(!shots.is_empty());
    assert!(shots.iter().all(|shot| shot.shooter == shooter && shot.target == player));
    assert!(!app.world().get::<Mover>(shooter).unwrap().is_moving());
}
