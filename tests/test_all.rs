#![allow(unused)]

mod scenario;

use std::{f32::consts::PI, io::Cursor};

use approx::{assert_abs_diff_eq, assert_relative_eq};
use glam::{Mat3A, Quat, Vec3A};
use rocketsim_core::{
    Arena, ArenaConfig, ArenaError, ArenaEvent, BallState, CarConfig, CarControls, CarState,
    DemoMode, GameMode, MutatorConfig, Team, consts,
};

use crate::scenario::*;

fn init_for_test() {
    // Several tests share the process, only the first install succeeds
    let _ = rocketsim_core::init_logger();
}

#[test]
fn multiple_demos_one_tick() {
    init_for_test();

    let mut arena = Arena::new(GameMode::Soccar);

    let orange = CarSetup::new(Team::Orange, Vec3A::new(0.0, 0.0, 17.0))
        .with_config(CarConfig::BREAKOUT)
        .with_boost(0.0)
        .spawn(&mut arena);
    let blue = CarSetup::new(Team::Blue, Vec3A::new(-300.0, 0.0, 17.0))
        .with_config(CarConfig::HYBRID)
        .with_vel(Vec3A::new(2300.0, 0.0, 0.0))
        .with_boost(100.0)
        .with_controls(quick_drive(1.0, 0.0, true, false))
        .spawn(&mut arena);
    assert_eq!((orange, blue), (1, 2));

    let demos = event_log();
    arena.set_car_bump_callback(
        |arena, bumper_id, victim_id, is_demo, demos: &mut EventLog<(u64, u64, u64)>| {
            if !is_demo {
                return;
            }

            let key = (arena.tick_count(), bumper_id, victim_id);
            let mut demos = demos.lock().unwrap();
            assert!(!demos.contains(&key));
            demos.push(key);
        },
        demos.clone(),
    );

    arena.step(15);

    let demos = demos.lock().unwrap();
    assert_eq!(demos.as_slice(), &[(9, 2, 1)]);

    assert!(arena.get_car_state(orange).unwrap().is_demoed);
    assert_eq!(arena.get_car(blue).unwrap().stats().demos, 1);
}

/// A stationary BREAKOUT (orange, id 1) at the center and a HYBRID (blue, id 2) driving
/// straight into its rear, with every bump logged as `(tick, bumper, victim, is_demo)`
fn rear_bump(
    demo_mode: DemoMode,
    blue_speed: f32,
    boost: bool,
) -> (Arena, EventLog<(u64, u64, u64, bool)>) {
    let mut arena = Arena::new(GameMode::Soccar);

    let mut mutator_config = *arena.mutator_config();
    mutator_config.demo_mode = demo_mode;
    arena.set_mutator_config(mutator_config).unwrap();

    CarSetup::new(Team::Orange, Vec3A::new(0.0, 0.0, 17.0))
        .with_config(CarConfig::BREAKOUT)
        .with_boost(0.0)
        .spawn(&mut arena);
    CarSetup::new(Team::Blue, Vec3A::new(-300.0, 0.0, 17.0))
        .with_config(CarConfig::HYBRID)
        .with_vel(Vec3A::new(blue_speed, 0.0, 0.0))
        .with_boost(100.0)
        .with_controls(quick_drive(1.0, 0.0, boost, false))
        .spawn(&mut arena);

    let bumps = event_log();
    arena.set_car_bump_callback(
        |arena, bumper_id, victim_id, is_demo, bumps: &mut EventLog<(u64, u64, u64, bool)>| {
            let bump = (arena.tick_count(), bumper_id, victim_id, is_demo);
            bumps.lock().unwrap().push(bump);
        },
        bumps.clone(),
    );

    (arena, bumps)
}

#[test]
fn demo_on_contact_ignores_speed() {
    init_for_test();

    let (mut arena, bumps) = rear_bump(DemoMode::OnContact, 2300.0, true);
    arena.step(15);

    assert_eq!(bumps.lock().unwrap().as_slice(), &[(9, 2, 1, true)]);
    assert!(arena.get_car_state(1).unwrap().is_demoed);

    // Slow enough that a normal bump would never demolish
    let (mut arena, bumps) = rear_bump(DemoMode::OnContact, 800.0, false);
    arena.step(60);

    let bumps = bumps.lock().unwrap();
    assert_eq!(bumps.len(), 1);
    assert!(bumps[0].3);
    assert!(arena.get_car_state(1).unwrap().is_demoed);
}

#[test]
fn disabled_demos_still_bump() {
    init_for_test();

    let (mut arena, bumps) = rear_bump(DemoMode::Disabled, 2300.0, true);
    arena.step(15);

    assert_eq!(bumps.lock().unwrap().as_slice(), &[(9, 2, 1, false)]);

    let victim = arena.get_car_state(1).unwrap();
    assert!(!victim.is_demoed);
    assert!(victim.vel.x > 500.0);
    assert_eq!(arena.get_car(2).unwrap().stats().demos, 0);
}

#[test]
fn slow_bump_is_not_a_demo() {
    init_for_test();

    let (mut arena, bumps) = rear_bump(DemoMode::Normal, 800.0, false);
    arena.step(60);

    let bumps = bumps.lock().unwrap();
    assert!(!bumps.is_empty());
    assert!(bumps.iter().all(|&(_, bumper_id, victim_id, is_demo)| {
        (bumper_id, victim_id) == (2, 1) && !is_demo
    }));
    assert!(!arena.get_car_state(1).unwrap().is_demoed);
}

#[test]
fn demolished_car_respawns_after_delay() {
    init_for_test();

    let (mut arena, _) = rear_bump(DemoMode::Normal, 2300.0, true);
    let respawn_ticks = (arena.mutator_config().respawn_delay * arena.get_tick_rate()) as u32;

    arena.step(10);
    assert!(arena.get_car_state(1).unwrap().is_demoed);

    // Still waiting a few ticks before the delay is up
    arena.step(respawn_ticks - 5);
    assert!(arena.get_car_state(1).unwrap().is_demoed);

    arena.step(10);
    let victim = arena.get_car_state(1).unwrap();
    assert!(!victim.is_demoed);
    // Orange respawns on its own half
    assert!(victim.pos.y > 0.0);
    assert_relative_eq!(victim.boost, arena.mutator_config().car_spawn_boost_amount);
}

#[test]
fn boost_drains_then_stops() {
    init_for_test();

    let mut arena = Arena::new(GameMode::Soccar);
    let id = CarSetup::new(Team::Blue, Vec3A::new(-1500.0, -2000.0, 17.0))
        .with_boost(50.0)
        .with_controls(quick_drive(0.0, 0.0, true, false))
        .spawn(&mut arena);

    let used_per_second = arena.mutator_config().boost_used_per_second;
    arena.step(60);

    let state = arena.get_car_state(id).unwrap();
    assert!(state.is_boosting);
    assert_abs_diff_eq!(state.boost, 50.0 - used_per_second * 0.5, epsilon = 1e-2);

    arena.step(150);

    let state = arena.get_car_state(id).unwrap();
    assert_eq!(state.boost, 0.0);
    assert!(!state.is_boosting);

    // Empty tank: holding boost is a no-op, not an error
    let speed_before = state.vel.length();
    arena.step(30);
    let state = arena.get_car_state(id).unwrap();
    assert_eq!(state.boost, 0.0);
    assert!(state.vel.length() <= speed_before + 1.0);
}

fn count_pad_pickups(pad_idx: usize) -> (usize, u32) {
    let mut arena = Arena::new(GameMode::Soccar);

    let pickups = event_log();
    arena.set_boost_pickup_callback(
        |_, _, picked_pad_idx, pickups: &mut EventLog<usize>| {
            pickups.lock().unwrap().push(picked_pad_idx);
        },
        pickups.clone(),
    );

    let blue = arena.add_car(Team::Blue, CarConfig::OCTANE).unwrap();
    let mut blue_state = CarState::DEFAULT;
    blue_state.pos = arena.boost_pads()[pad_idx].pos();

    for _ in 0..1250 {
        blue_state.boost = 0.0;
        arena.set_car_state(blue, &blue_state).unwrap();
        arena.step(1);
    }

    let pickups = pickups.lock().unwrap();
    assert!(pickups.iter().all(|&idx| idx == pad_idx));
    (
        pickups.len(),
        arena.get_car(blue).unwrap().stats().boost_pickups,
    )
}

#[test]
fn continuous_boost_pickup() {
    init_for_test();

    let arena = Arena::new(GameMode::Soccar);
    let pads = arena.boost_pads();
    assert!(!pads[0].is_big());

    assert_eq!(count_pad_pickups(0), (3, 3));

    let big_pad_idx = pads.iter().position(|pad| pad.is_big()).unwrap();
    assert_eq!(count_pad_pickups(big_pad_idx), (2, 2));
}

#[test]
fn pads_are_sorted_and_cool_down() {
    init_for_test();

    let mut arena = Arena::new(GameMode::Soccar);
    assert_eq!(arena.num_boost_pads(), 34);

    let pads = arena.boost_pads();
    for pair in pads.windows(2) {
        let (a, b) = (pair[0].pos(), pair[1].pos());
        assert!(a.y < b.y || (a.y == b.y && a.x <= b.x));
    }

    let id = arena.add_car(Team::Orange, CarConfig::DOMINUS).unwrap();
    let mut state = CarState::DEFAULT;
    state.pos = arena.boost_pads()[0].pos();
    arena.set_car_state(id, &state).unwrap();
    arena.step(1);

    let pad_state = *arena.get_boost_pad_state(0).unwrap();
    assert!(!pad_state.is_active());
    assert_eq!(pad_state.prev_picked_up_by, Some(id));
    assert_relative_eq!(pad_state.cooldown(arena.get_tick_rate()), 4.0);
    assert!(matches!(
        arena.last_tick_events(),
        [ArenaEvent::BoostPickup { car_id, pad_idx: 0 }] if *car_id == id
    ));

    arena
        .set_boost_pad_state(0, rocketsim_core::BoostPadState::DEFAULT)
        .unwrap();
    assert!(arena.get_boost_pad_state(0).unwrap().is_active());

    assert!(matches!(
        arena.get_boost_pad_state(34),
        Err(ArenaError::InvalidOperation(_))
    ));
}

fn assert_vec_mirrored(canonical: &[f32], mirrored: &[f32]) {
    assert_abs_diff_eq!(mirrored[0], -canonical[0], epsilon = 1e-4);
    assert_abs_diff_eq!(mirrored[1], -canonical[1], epsilon = 1e-4);
    assert_abs_diff_eq!(mirrored[2], canonical[2], epsilon = 1e-4);
}

fn quat_from_floats(floats: &[f32]) -> Quat {
    Quat::from_xyzw(floats[1], floats[2], floats[3], floats[0])
}

#[test]
fn mirrored_views_every_tick() {
    init_for_test();

    let mut arena = Arena::new(GameMode::Soccar);
    let blue = arena.add_car(Team::Blue, CarConfig::OCTANE).unwrap();
    let orange = arena.add_car(Team::Orange, CarConfig::PLANK).unwrap();
    arena.reset_to_random_kickoff(Some(3));

    arena
        .set_car_controls(blue, quick_drive(1.0, 0.3, true, false))
        .unwrap();
    arena
        .set_car_controls(orange, quick_drive(1.0, -0.2, false, false))
        .unwrap();

    let pads = arena.boost_pads();
    let mirrored_pads: Vec<usize> = pads
        .iter()
        .map(|pad| {
            let mirrored_pos = pad.config().get_mirrored_pos();
            let (idx, nearest) = pads
                .iter()
                .enumerate()
                .filter(|(_, other)| other.is_big() == pad.is_big())
                .min_by(|(_, a), (_, b)| {
                    a.pos()
                        .distance(mirrored_pos)
                        .total_cmp(&b.pos().distance(mirrored_pos))
                })
                .unwrap();
            assert!(nearest.pos().distance(mirrored_pos) < 5.0);
            idx
        })
        .collect();

    let half_turn = Quat::from_rotation_z(PI);
    for tick in 0..240 {
        if tick == 100 {
            arena
                .set_car_controls(orange, quick_air(0.5, 0.2, 0.0, true, false))
                .unwrap();
        }

        arena.step(1);
        let gym_state = arena.get_gym_state();

        for (i, &mirrored_idx) in mirrored_pads.iter().enumerate() {
            assert_eq!(gym_state.pads[1][i], gym_state.pads[0][mirrored_idx]);
        }

        for car in &gym_state.cars {
            assert_eq!(
                car[0][..rocketsim_core::CAR_PREFIX_FLOATS],
                car[1][..rocketsim_core::CAR_PREFIX_FLOATS]
            );
        }

        let [canonical, mirrored] = phys_views(&gym_state);
        for (c, m) in canonical.iter().zip(&mirrored) {
            // Position and velocity
            assert_vec_mirrored(&c[0..3], &m[0..3]);
            assert_vec_mirrored(&c[7..10], &m[7..10]);
            // Angular velocity is unchanged
            assert_eq!(c[10..13], m[10..13]);
            // Forward, right and up
            for axis in 0..3 {
                let start = 13 + axis * 3;
                assert_vec_mirrored(&c[start..start + 3], &m[start..start + 3]);
            }

            let expected = half_turn * quat_from_floats(&c[3..7]);
            let actual = quat_from_floats(&m[3..7]);
            assert!(expected.dot(actual).abs() > 1.0 - 1e-4);

            // Pitch and roll are kept, yaw turns half a circle
            assert_abs_diff_eq!(m[22], c[22], epsilon = 1e-3);
            assert_abs_diff_eq!(m[24], c[24], epsilon = 1e-3);
            let yaw_diff = m[23] - c[23];
            assert_abs_diff_eq!(yaw_diff.cos(), -1.0, epsilon = 1e-3);
        }
    }
}

#[test]
fn rotation_representations_agree() {
    init_for_test();

    let mut arena = Arena::new(GameMode::Soccar);
    let id = arena.add_car(Team::Blue, CarConfig::MERC).unwrap();
    arena
        .set_car_controls(id, quick_air(1.0, 0.4, -0.7, true, true))
        .unwrap();

    for _ in 0..180 {
        arena.step(1);
        let gym_state = arena.get_gym_state();

        let [canonical, mirrored] = phys_views(&gym_state);
        for phys in canonical.iter().chain(&mirrored) {
            let rot_mat = Mat3A::from_cols(
                Vec3A::from_slice(&phys[13..16]),
                Vec3A::from_slice(&phys[16..19]),
                Vec3A::from_slice(&phys[19..22]),
            );

            let from_quat = Mat3A::from_quat(quat_from_floats(&phys[3..7]));
            assert!(from_quat.abs_diff_eq(rot_mat, 1e-4));

            let [pitch, yaw, roll] = [phys[22], phys[23], phys[24]];
            assert!(pitch.abs() <= PI / 2.0 + 1e-6);
            assert!(yaw.abs() <= PI + 1e-6);
            assert!(roll.abs() <= PI + 1e-6);

            let from_pyr = rocketsim_core::Angle::new(yaw, pitch, roll).to_rot_mat();
            assert!(from_pyr.abs_diff_eq(rot_mat, 1e-4));
        }
    }
}

#[test]
fn removed_cars_stay_removed() {
    init_for_test();

    let mut arena = Arena::new(GameMode::Soccar);
    let ids: Vec<u64> = (0..3)
        .map(|i| {
            let team = if i % 2 == 0 { Team::Blue } else { Team::Orange };
            arena.add_car(team, CarConfig::OCTANE).unwrap()
        })
        .collect();
    assert_eq!(ids, [1, 2, 3]);

    let removed = arena.remove_car(2).unwrap();
    assert_eq!(removed.id(), 2);
    assert_eq!(arena.car_ids(), &[1, 3]);

    assert!(matches!(
        arena.get_car(2),
        Err(ArenaError::NotFound { car_id: 2 })
    ));
    assert!(matches!(
        arena.get_car_state(2),
        Err(ArenaError::NotFound { car_id: 2 })
    ));
    assert!(matches!(
        arena.set_car_controls(2, CarControls::DEFAULT),
        Err(ArenaError::InvalidOperation(_))
    ));
    assert!(matches!(
        arena.remove_car(2),
        Err(ArenaError::InvalidOperation(_))
    ));
    assert!(matches!(
        arena.remove_car(42),
        Err(ArenaError::NotFound { car_id: 42 })
    ));

    let mut sentinel = CarState::DEFAULT;
    sentinel.boost = -1.0;
    assert_eq!(arena.get_car_state_or(2, sentinel), sentinel);

    arena.step(10);
    assert!(arena.get_car_state(1).is_ok());
    assert!(arena.get_car_state(3).is_ok());

    // Ids are never reused
    assert_eq!(arena.add_car(Team::Blue, CarConfig::OCTANE).unwrap(), 4);

    for id in [3, 1, 4] {
        arena.remove_car(id).unwrap();
    }
    assert_eq!(arena.num_cars(), 0);
    arena.step(1);
}

fn scripted_run(seed: u64) -> (Arena, Vec<ArenaEvent>) {
    let config = ArenaConfig {
        rng_seed: seed,
        ..ArenaConfig::DEFAULT
    };
    let mut arena = Arena::new_with_config(GameMode::Soccar, config, 120.0).unwrap();
    for (team, preset) in [(Team::Blue, 0), (Team::Orange, 1), (Team::Blue, 3), (Team::Orange, 4)] {
        let config = CarConfig::from_preset_index(preset).unwrap();
        arena.add_car(team, config).unwrap();
    }
    arena.reset_to_random_kickoff(None);

    let mut events = Vec::new();
    for tick in 0..600u32 {
        for &id in arena.car_ids().to_vec().iter() {
            let phase = (tick / 60 + id as u32) % 4;
            let controls = match phase {
                0 => quick_drive(1.0, 0.0, true, false),
                1 => quick_drive(1.0, 0.5, false, true),
                2 => quick_air(-0.3, 0.0, 0.2, true, false),
                _ => quick_drive(-0.5, -1.0, false, false),
            };
            arena.set_car_controls(id, controls).unwrap();
        }

        arena.step(1);
        events.extend_from_slice(arena.last_tick_events());
    }

    (arena, events)
}

#[test]
fn identical_runs_are_identical() {
    init_for_test();

    let (arena_a, events_a) = scripted_run(11);
    let (arena_b, events_b) = scripted_run(11);

    assert_eq!(events_a, events_b);
    assert_eq!(arena_a.get_ball_state(), arena_b.get_ball_state());
    for (car_a, car_b) in arena_a.get_cars().zip(arena_b.get_cars()) {
        assert_eq!(car_a.id(), car_b.id());
        assert_eq!(car_a.get_state(), car_b.get_state());
        assert_eq!(car_a.stats(), car_b.stats());
    }
    assert_eq!(arena_a.get_gym_state(), arena_b.get_gym_state());
}

#[test]
fn tick_count_advances_by_steps() {
    init_for_test();

    let mut arena = Arena::new(GameMode::TheVoid);
    arena.add_car(Team::Blue, CarConfig::OCTANE).unwrap();

    arena.step(0);
    assert_eq!(arena.tick_count(), 0);

    let mut expected = 0;
    for ticks in [1, 7, 0, 120, 3] {
        arena.step(ticks);
        expected += u64::from(ticks);
        assert_eq!(arena.tick_count(), expected);
    }

    let mut slow = Arena::new_with_config(GameMode::Soccar, ArenaConfig::DEFAULT, 30.0).unwrap();
    assert_relative_eq!(slow.tick_time(), 1.0 / 30.0);
    slow.step(30);
    assert_eq!(slow.tick_count(), 30);
}

#[test]
fn goal_scores_once_and_kickoff_resets() {
    init_for_test();

    let mut arena = Arena::new(GameMode::Soccar);
    let blue = arena.add_car(Team::Blue, CarConfig::OCTANE).unwrap();
    arena.add_car(Team::Orange, CarConfig::OCTANE).unwrap();
    arena.reset_to_random_kickoff(Some(0));

    let goals = event_log();
    arena.set_goal_score_callback(
        |arena, team, goals: &mut EventLog<(u64, Team)>| {
            goals.lock().unwrap().push((arena.tick_count(), team));
        },
        goals.clone(),
    );

    BallSetup::new(Vec3A::new(0.0, 4900.0, 300.0))
        .with_vel(Vec3A::new(0.0, 2500.0, 0.0))
        .apply(&mut arena);
    assert!(arena.is_ball_probably_going_in(2.0));

    arena.step(60);

    assert!(arena.is_ball_scored());
    assert_eq!(arena.blue_score(), 1);
    assert_eq!(arena.orange_score(), 0);
    assert_eq!(arena.get_score(Team::Blue), 1);
    {
        let goals = goals.lock().unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].1, Team::Blue);
    }

    // Nobody touched the ball
    assert_eq!(arena.get_car(blue).unwrap().stats().goals, 0);

    arena.reset_to_random_kickoff(Some(5));
    assert_eq!(arena.blue_score(), 0);
    assert!(!arena.is_ball_scored());
    assert_eq!(*arena.get_ball_state(), BallState::DEFAULT);
    assert!(arena.boost_pads().iter().all(|pad| pad.get_state().is_active()));
}

#[test]
fn kickoff_uses_mirrored_spawns() {
    init_for_test();

    let mut arena = Arena::new(GameMode::Soccar);
    let blue_ids: Vec<u64> = (0..3)
        .map(|_| arena.add_car(Team::Blue, CarConfig::OCTANE).unwrap())
        .collect();
    let orange_ids: Vec<u64> = (0..3)
        .map(|_| arena.add_car(Team::Orange, CarConfig::OCTANE).unwrap())
        .collect();

    arena.reset_to_random_kickoff(Some(1234));

    let spawns = consts::car::spawn::LOCATIONS_SOCCAR;
    for (&blue_id, &orange_id) in blue_ids.iter().zip(&orange_ids) {
        let blue = arena.get_car_state(blue_id).unwrap();
        let orange = arena.get_car_state(orange_id).unwrap();

        assert!(
            spawns
                .iter()
                .any(|spawn| spawn.x == blue.pos.x && spawn.y == blue.pos.y)
        );
        assert_relative_eq!(blue.pos.z, consts::car::spawn::SPAWN_Z);

        assert_abs_diff_eq!(orange.pos.x, -blue.pos.x);
        assert_abs_diff_eq!(orange.pos.y, -blue.pos.y);
        assert!(orange.rot_mat.abs_diff_eq(blue.phys.get_mirrored().rot_mat, 1e-5));
        assert_relative_eq!(blue.boost, consts::car::boost::SPAWN_AMOUNT);
    }

    // Every blue car got its own spot
    for (i, &a) in blue_ids.iter().enumerate() {
        for &b in &blue_ids[i + 1..] {
            let (a, b) = (
                arena.get_car_state(a).unwrap().pos,
                arena.get_car_state(b).unwrap().pos,
            );
            assert!(a.distance(b) > 1.0);
        }
    }

    let mut again = arena.clone();
    again.reset_to_random_kickoff(Some(1234));
    for &id in blue_ids.iter().chain(&orange_ids) {
        assert_eq!(
            arena.get_car_state(id).unwrap().pos,
            again.get_car_state(id).unwrap().pos
        );
    }
}

#[test]
fn car_touch_moves_ball_and_records_hit() {
    init_for_test();

    let mut arena = Arena::new(GameMode::Soccar);
    let id = CarSetup::new(Team::Blue, Vec3A::new(0.0, -600.0, 17.0))
        .with_rot(Mat3A::from_rotation_z(PI / 2.0))
        .with_vel(Vec3A::new(0.0, 1400.0, 0.0))
        .with_controls(quick_drive(1.0, 0.0, false, false))
        .spawn(&mut arena);

    arena.step(60);

    let ball = arena.get_ball_state();
    assert_eq!(ball.last_hit_car_id(), id);
    assert!(ball.vel.y > 500.0);

    let hit_info = arena.get_car_state(id).unwrap().ball_hit_info.unwrap();
    assert_eq!(Some(hit_info.tick_count_when_hit), ball.last_hit.map(|hit| hit.tick_count));
    assert!(hit_info.relative_pos_on_ball.y < 0.0);
}

#[test]
fn save_and_load_continues_the_match() {
    init_for_test();

    let (mut arena, _) = scripted_run(21);
    arena.remove_car(2).unwrap();

    let mut bytes = Vec::new();
    arena.serialize(&mut bytes).unwrap();
    let mut loaded = Arena::deserialize(Cursor::new(bytes)).unwrap();

    assert_eq!(loaded.tick_count(), arena.tick_count());
    assert_eq!(loaded.game_mode(), arena.game_mode());
    assert_eq!(loaded.car_ids(), arena.car_ids());
    assert_eq!(loaded.mutator_config(), arena.mutator_config());
    assert_eq!(loaded.get_gym_state(), arena.get_gym_state());

    // The removed id stays retired
    assert!(matches!(
        loaded.remove_car(2),
        Err(ArenaError::InvalidOperation(_))
    ));
    assert_eq!(loaded.add_car(Team::Blue, CarConfig::OCTANE).unwrap(), 5);
    loaded.remove_car(5).unwrap();

    arena.step(1);
    loaded.step(1);
    for (a, b) in arena.get_cars().zip(loaded.get_cars()) {
        assert!(a.get_state().pos.distance(b.get_state().pos) < 1.0);
    }
}

#[test]
fn clones_drop_callbacks() {
    init_for_test();

    let mut arena = Arena::new(GameMode::Soccar);
    arena.add_car(Team::Blue, CarConfig::OCTANE).unwrap();

    let goals = event_log();
    arena.set_goal_score_callback(
        |_, team, goals: &mut EventLog<Team>| goals.lock().unwrap().push(team),
        goals.clone(),
    );

    let mut clone = arena.clone();
    BallSetup::new(Vec3A::new(0.0, -5000.0, 200.0))
        .with_vel(Vec3A::new(0.0, -2000.0, 0.0))
        .apply(&mut clone);
    clone.step(60);

    assert_eq!(clone.orange_score(), 1);
    assert!(goals.lock().unwrap().is_empty());
    assert_eq!(arena.tick_count(), 0);
}

#[test]
fn bad_arguments_are_rejected() {
    init_for_test();

    assert!(matches!(
        Arena::new_with_config(GameMode::Soccar, ArenaConfig::DEFAULT, 10.0),
        Err(ArenaError::InvalidArgument(_))
    ));
    assert!(matches!(
        Arena::new_with_config(
            GameMode::Soccar,
            ArenaConfig {
                ball_sub_steps: 0,
                ..ArenaConfig::DEFAULT
            },
            120.0
        ),
        Err(ArenaError::InvalidArgument(_))
    ));

    let mut arena = Arena::new(GameMode::Heatseeker);
    let id = arena.add_car(Team::Orange, CarConfig::PSYCLOPS).unwrap();

    let mut controls = CarControls::DEFAULT;
    controls.steer = f32::NAN;
    assert!(matches!(
        arena.set_car_controls(id, controls),
        Err(ArenaError::InvalidArgument(_))
    ));

    let mut config = CarConfig::OCTANE;
    config.hitbox_size.x = -1.0;
    assert!(matches!(
        arena.add_car(Team::Blue, config),
        Err(ArenaError::InvalidArgument(_))
    ));
    assert!(matches!(
        CarConfig::from_preset_index(7),
        Err(ArenaError::InvalidArgument(_))
    ));

    let mut mutator_config = *arena.mutator_config();
    mutator_config.ball_radius = 0.0;
    assert!(matches!(
        arena.set_mutator_config(mutator_config),
        Err(ArenaError::InvalidArgument(_))
    ));

    mutator_config.ball_radius = 100.0;
    arena.set_mutator_config(mutator_config).unwrap();
    assert_relative_eq!(arena.mutator_config().ball_radius, 100.0);
}

#[test]
fn void_has_no_pads_or_goals() {
    init_for_test();

    let mut arena = Arena::new(GameMode::TheVoid);
    assert_eq!(arena.num_boost_pads(), 0);

    let id = arena.add_car(Team::Blue, CarConfig::OCTANE).unwrap();
    BallSetup::new(Vec3A::new(0.0, 6000.0, 100.0)).apply(&mut arena);
    assert!(!arena.is_ball_scored());

    arena.step(120);
    assert_eq!(arena.blue_score(), 0);
    assert!(arena.get_ball_state().pos.z < 100.0);
    assert!(arena.get_car_state(id).unwrap().pos.z < consts::car::spawn::RESPAWN_Z);
}
