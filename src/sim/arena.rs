use std::{array::from_fn, f32::consts::PI, fmt};

use ahash::AHashMap;
use fastrand::Rng;
use glam::{EulerRot, Mat3A, Vec3A};
use log::{debug, info, trace, warn};

use super::{
    Ball, BoostPadGrid,
    events::{ArenaCallbacks, ArenaEvent},
};
use crate::{
    ArenaConfig, ArenaError, BallState, BoostPad, BoostPadConfig, Car, CarConfig, CarContact,
    CarControls, CarState, DemoMode, GameMode, MutatorConfig, PhysState, Team,
    collision::ArenaGeometry,
    consts::{
        self, BT_TO_UU, RESTING_CONTACT_SPEED, UU_TO_BT, boostpads, car::bump, car::spawn,
        curves, heatseeker,
    },
    dynamics::resolve_contact,
};

const RESTING_CONTACT_SPEED_BT: f32 = RESTING_CONTACT_SPEED * UU_TO_BT;

/// How far ahead a touch is looked at when crediting shots and saves
const SHOT_PREDICT_TIME: f32 = 2.0;

/// Everything the collision handlers mutate, kept apart from the arena's static data
#[derive(Clone, Debug)]
pub(crate) struct Objects {
    pub ball: Ball,
    /// Do NOT add/remove cars by adding/removing them from the hashmap.
    pub cars: AHashMap<u64, Car>,
    /// Keys of `cars`, ascending
    pub car_ids: Vec<u64>,
    pub tick_count: u64,
    pub game_mode: GameMode,
    pub mutator_config: MutatorConfig,
    pub boost_pads: Vec<BoostPad>,
    /// Events of the current (or last finished) tick
    pub events: Vec<ArenaEvent>,
}

impl Objects {
    fn on_car_world_collision(&mut self, car_id: u64, geometry: &ArenaGeometry) {
        let Some(car) = self.cars.get_mut(&car_id) else {
            return;
        };

        if car.state.is_demoed {
            return;
        }

        let coefs = consts::CollisionCoefs {
            friction: self.mutator_config.car_world_friction,
            restitution: self.mutator_config.car_world_restitution,
        };

        for contact in &geometry.obb_contacts(&car.hitbox()) {
            resolve_contact(
                &mut car.rigid_body,
                None,
                contact,
                coefs,
                RESTING_CONTACT_SPEED_BT,
            );
            car.state.world_contact_normal = Some(contact.normal);
        }
    }

    fn on_car_ball_collision(&mut self, car_id: u64) {
        let Some(car) = self.cars.get_mut(&car_id) else {
            return;
        };

        if car.state.is_demoed {
            return;
        }

        let ball_pos_bt = self.ball.rigid_body.transform.translation;
        let Some(contact) = car.hitbox().sphere_contact(ball_pos_bt, self.ball.radius_bt()) else {
            return;
        };

        let rel_pos_on_ball = (contact.point - ball_pos_bt) * BT_TO_UU;

        let has_goals = self.game_mode.has_soccar_arena();
        let predict = |vel: Vec3A, ball_pos: Vec3A, mutator_config: &MutatorConfig| {
            if has_goals {
                predict_goal_entry(ball_pos, vel, mutator_config, SHOT_PREDICT_TIME)
            } else {
                None
            }
        };

        let entry_before = predict(self.ball.state.vel, self.ball.state.pos, &self.mutator_config);

        resolve_contact(
            &mut self.ball.rigid_body,
            Some(&mut car.rigid_body),
            &contact,
            consts::car::BALL_COEFS,
            RESTING_CONTACT_SPEED_BT,
        );

        self.on_ball_hit(car_id, rel_pos_on_ball);

        let vel_after =
            (self.ball.rigid_body.linear_velocity + self.ball.velocity_impulse_cache) * BT_TO_UU;
        let entry_after = predict(vel_after, self.ball.state.pos, &self.mutator_config);

        let Some(car) = self.cars.get_mut(&car_id) else {
            return;
        };

        let team = car.team();
        if entry_after == Some(team.opponent()) && entry_before != Some(team.opponent()) {
            car.stats.shots += 1;
        }

        if entry_before == Some(team) && entry_after != Some(team) {
            car.stats.saves += 1;
        }
    }

    fn on_car_car_collision(&mut self, car_1_id: u64, car_2_id: u64) {
        let [Some(car_1), Some(car_2)] = self.cars.get_disjoint_mut([&car_1_id, &car_2_id]) else {
            return;
        };

        if car_1.state.is_demoed || car_2.state.is_demoed {
            return;
        }

        let Some(hit) = car_1.hitbox().obb_contact(&car_2.hitbox()) else {
            return;
        };

        // Both directions are judged on the states from the start of the tick
        try_bump(
            car_1,
            car_2,
            hit.point_on_a,
            &self.mutator_config,
            self.tick_count,
            &mut self.events,
        );
        try_bump(
            car_2,
            car_1,
            hit.point_on_b,
            &self.mutator_config,
            self.tick_count,
            &mut self.events,
        );

        if !car_1.state.is_demoed && !car_2.state.is_demoed {
            resolve_contact(
                &mut car_1.rigid_body,
                Some(&mut car_2.rigid_body),
                &hit.contact_for_a(),
                consts::car::CAR_COEFS,
                RESTING_CONTACT_SPEED_BT,
            );
        }
    }
}

/// Bump or demolish `victim` if `striker` drove into it bumper first
fn try_bump(
    striker: &mut Car,
    victim: &mut Car,
    contact_point: Vec3A,
    mutator_config: &MutatorConfig,
    tick_count: u64,
    events: &mut Vec<ArenaEvent>,
) {
    if striker.state.is_demoed || victim.state.is_demoed {
        return;
    }

    if let Some(car_contact) = striker.state.car_contact
        && car_contact.other_car_id == victim.id()
        && car_contact.cooldown_timer > 0.0
    {
        // In cooldown
        return;
    }

    let striker_phys = striker.state.phys;
    let victim_phys = victim.state.phys;

    let delta_pos = victim_phys.pos - striker_phys.pos;
    if striker_phys.vel.dot(delta_pos) <= 0.0 {
        // Moving away from the other car
        return;
    }

    let vel_dir = striker_phys.vel.normalize();
    let dir_to_other_car = delta_pos.normalize();

    let speed_towards_other_car = striker_phys.vel.dot(dir_to_other_car);
    let other_car_away_speed = victim_phys.vel.dot(vel_dir);
    if speed_towards_other_car <= other_car_away_speed {
        // Going towards other car slower than they're going away
        return;
    }

    let local_point = striker
        .rigid_body
        .transform
        .inverse()
        .transform_point3a(contact_point);
    if local_point.x * BT_TO_UU <= bump::MIN_FORWARD_DIST {
        // Didn't hit with bumper
        return;
    }

    let mut is_demo = match mutator_config.demo_mode {
        DemoMode::OnContact => true,
        DemoMode::Disabled => false,
        DemoMode::Normal => striker.state.is_supersonic,
    };
    if is_demo && !mutator_config.enable_team_demos {
        is_demo = striker.team() != victim.team();
    }

    if is_demo {
        debug!(
            "Car {} demolished car {} on tick {tick_count}",
            striker.id(),
            victim.id()
        );
        victim.demolish(mutator_config.respawn_delay);
        striker.stats.demos += 1;
    } else {
        let ground_hit = victim.state.is_on_ground;
        let base_scale = if ground_hit {
            curves::BUMP_VEL_AMOUNT_GROUND
        } else {
            curves::BUMP_VEL_AMOUNT_AIR
        }
        .get_output(speed_towards_other_car);

        let hit_up_dir = if ground_hit {
            victim_phys.rot_mat.z_axis
        } else {
            Vec3A::Z
        };

        let bump_impulse = vel_dir * base_scale
            + hit_up_dir
                * curves::BUMP_UPWARD_VEL_AMOUNT.get_output(speed_towards_other_car)
                * mutator_config.bump_force_scale;

        victim.velocity_impulse_cache += bump_impulse * UU_TO_BT;
    }

    striker.state.car_contact = Some(CarContact {
        other_car_id: victim.id(),
        cooldown_timer: mutator_config.bump_cooldown_time,
    });

    events.push(ArenaEvent::CarBump {
        bumper_id: striker.id(),
        victim_id: victim.id(),
        is_demo,
    });
}

/// For each pad, the index of the pad of the same size closest to its mirror image.
///
/// The standard layout is only symmetric to within a couple of UU, so there is no
/// distance cutoff.
fn mirror_pad_indices(boost_pads: &[BoostPad]) -> Vec<usize> {
    boost_pads
        .iter()
        .enumerate()
        .map(|(i, pad)| {
            let mirrored_pos = pad.config().get_mirrored_pos();
            boost_pads
                .iter()
                .enumerate()
                .filter(|(_, other)| other.is_big() == pad.is_big())
                .min_by(|(_, a), (_, b)| {
                    a.pos()
                        .distance_squared(mirrored_pos)
                        .total_cmp(&b.pos().distance_squared(mirrored_pos))
                })
                .map_or(i, |(idx, _)| idx)
        })
        .collect()
}

/// Ballistic guess of which team's net a ball at `pos` moving with `vel` enters within
/// `max_time` seconds, ignoring bounces
pub(crate) fn predict_goal_entry(
    pos: Vec3A,
    vel: Vec3A,
    mutator_config: &MutatorConfig,
    max_time: f32,
) -> Option<Team> {
    if vel.y.abs() < f32::EPSILON {
        return None;
    }

    let score_dir = vel.y.signum();
    let goal_score_y = mutator_config.goal_base_threshold_y + mutator_config.ball_radius;
    let dist_to_goal = (goal_score_y - pos.y * score_dir).max(0.0);

    let mut time_to_goal = dist_to_goal / vel.y.abs();
    if time_to_goal > max_time {
        return None;
    }

    // Roughly account for drag
    time_to_goal /= (1.0 - mutator_config.ball_drag).powf(time_to_goal);

    let extrap_pos = pos
        + vel * time_to_goal
        + mutator_config.gravity * (time_to_goal * time_to_goal * 0.5);

    let score_margin = mutator_config.ball_radius * 0.64;
    if extrap_pos.z > consts::goal::HEIGHT + score_margin {
        // Too high
        return None;
    }

    if extrap_pos.x.abs() > consts::goal::HALF_WIDTH + score_margin {
        // Too far to the side
        return None;
    }

    // Orange defends the positive y net
    Some(if score_dir > 0.0 {
        Team::Orange
    } else {
        Team::Blue
    })
}

/// A self-contained simulation of one match: the ball, every car and every boost pad.
pub struct Arena {
    rng: Rng,
    tick_time: f32,
    last_car_id: u64,
    config: ArenaConfig,
    geometry: ArenaGeometry,
    /// Only built when every pad fits inside the grid space
    boost_pad_grid: Option<BoostPadGrid>,
    /// For every pad, the index of the pad at its mirrored position
    mirrored_pad_indices: Vec<usize>,
    scores: [u32; 2],
    /// Set while the ball sits inside a goal, so that each entry only scores once
    ball_in_goal: bool,
    pub(crate) objects: Objects,
    pub(crate) callbacks: ArenaCallbacks,
}

impl Clone for Arena {
    /// Callbacks are not carried over to the clone
    fn clone(&self) -> Self {
        Self {
            rng: self.rng.clone(),
            tick_time: self.tick_time,
            last_car_id: self.last_car_id,
            config: self.config.clone(),
            geometry: self.geometry.clone(),
            boost_pad_grid: self.boost_pad_grid.clone(),
            mirrored_pad_indices: self.mirrored_pad_indices.clone(),
            scores: self.scores,
            ball_in_goal: self.ball_in_goal,
            objects: self.objects.clone(),
            callbacks: ArenaCallbacks::default(),
        }
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("game_mode", &self.objects.game_mode)
            .field("tick_rate", &self.get_tick_rate())
            .field("tick_count", &self.objects.tick_count)
            .field("scores", &self.scores)
            .field("car_ids", &self.objects.car_ids)
            .field("ball", &self.objects.ball.state)
            .field("num_boost_pads", &self.objects.boost_pads.len())
            .field("callbacks", &self.callbacks.names())
            .finish_non_exhaustive()
    }
}

impl Arena {
    /// Standard arena for `game_mode` running at 120 ticks per second
    #[must_use]
    pub fn new(game_mode: GameMode) -> Self {
        Self::build(game_mode, ArenaConfig::DEFAULT, 120.0)
    }

    /// - `tick_rate` must be within 15..=120
    pub fn new_with_config(
        game_mode: GameMode,
        config: ArenaConfig,
        tick_rate: f32,
    ) -> Result<Self, ArenaError> {
        if !(15.0..=120.0).contains(&tick_rate) {
            return Err(ArenaError::invalid_arg(format!(
                "tick_rate must be within 15 and 120, got {tick_rate}"
            )));
        }

        config.validate()?;
        Ok(Self::build(game_mode, config, tick_rate))
    }

    fn build(game_mode: GameMode, config: ArenaConfig, tick_rate: f32) -> Self {
        let mutator_config = MutatorConfig::new(game_mode);
        let ball = Ball::new(&mutator_config, config.no_ball_rot);

        let mut boost_pads = Vec::new();
        if game_mode != GameMode::TheVoid {
            if config.use_custom_boost_pads {
                boost_pads.extend(config.custom_boost_pads.iter().copied().map(BoostPad::new));
            } else {
                let big = boostpads::LOCS_BIG_SOCCAR
                    .into_iter()
                    .map(|pos| BoostPadConfig::new(pos, true));
                let small = boostpads::LOCS_SMALL_SOCCAR
                    .into_iter()
                    .map(|pos| BoostPadConfig::new(pos, false));
                boost_pads.extend(big.chain(small).map(BoostPad::new));
            }
        }

        boost_pads.sort_by(|a, b| {
            let (a, b) = (a.pos(), b.pos());
            a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x))
        });

        let boost_pad_grid = BoostPadGrid::new(&boost_pads);
        if boost_pad_grid.is_none() {
            warn!("Some boost pads lie outside of the pad grid, every pad will be checked every tick");
        }

        let mirrored_pad_indices = mirror_pad_indices(&boost_pads);

        info!(
            "Created {} arena at {tick_rate} tps with {} boost pads",
            game_mode.name(),
            boost_pads.len()
        );

        Self {
            rng: Rng::with_seed(config.rng_seed),
            tick_time: 1.0 / tick_rate,
            last_car_id: 0,
            geometry: ArenaGeometry::for_game_mode(game_mode),
            boost_pad_grid,
            mirrored_pad_indices,
            scores: [0; 2],
            ball_in_goal: false,
            config,
            objects: Objects {
                ball,
                cars: AHashMap::new(),
                car_ids: Vec::new(),
                tick_count: 0,
                game_mode,
                mutator_config,
                boost_pads,
                events: Vec::new(),
            },
            callbacks: ArenaCallbacks::default(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.objects.tick_count
    }

    #[inline]
    #[must_use]
    pub const fn tick_time(&self) -> f32 {
        self.tick_time
    }

    #[inline]
    #[must_use]
    pub const fn get_tick_rate(&self) -> f32 {
        1.0 / self.tick_time
    }

    #[inline]
    #[must_use]
    pub const fn game_mode(&self) -> GameMode {
        self.objects.game_mode
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &ArenaConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub const fn mutator_config(&self) -> &MutatorConfig {
        &self.objects.mutator_config
    }

    /// Replaces every tunable at once; takes effect from the next tick
    pub fn set_mutator_config(&mut self, config: MutatorConfig) -> Result<(), ArenaError> {
        config.validate()?;

        if config.ball_radius != self.objects.mutator_config.ball_radius {
            warn!(
                "Ball radius changed mid-play from {} to {}",
                self.objects.mutator_config.ball_radius, config.ball_radius
            );
        }

        self.objects.mutator_config = config;
        self.objects.ball.apply_mutator_config(&config);
        for car in self.objects.cars.values_mut() {
            car.apply_mutator_config(&config);
        }

        Ok(())
    }

    #[must_use]
    pub const fn get_score(&self, team: Team) -> u32 {
        self.scores[team as usize]
    }

    #[must_use]
    pub const fn blue_score(&self) -> u32 {
        self.scores[Team::Blue as usize]
    }

    #[must_use]
    pub const fn orange_score(&self) -> u32 {
        self.scores[Team::Orange as usize]
    }

    /// The error for an id that doesn't resolve to a car: ids this arena issued have been
    /// removed, anything else was never a car here
    fn missing_car_error(&self, car_id: u64, mutating: bool) -> ArenaError {
        if mutating && car_id != 0 && car_id <= self.last_car_id {
            ArenaError::removed_car(car_id)
        } else {
            ArenaError::NotFound { car_id }
        }
    }

    fn car_mut(&mut self, car_id: u64) -> Result<&mut Car, ArenaError> {
        if !self.objects.cars.contains_key(&car_id) {
            return Err(self.missing_car_error(car_id, true));
        }

        self.objects
            .cars
            .get_mut(&car_id)
            .ok_or(ArenaError::NotFound { car_id })
    }

    /// Adds a car to the match at one of its team's respawn spots,
    /// returning the id of the car.
    ///
    /// Ids start at 1 and are never reused within this arena.
    pub fn add_car(&mut self, team: Team, config: CarConfig) -> Result<u64, ArenaError> {
        config.validate()?;

        let id = self.last_car_id + 1;
        let mut car = Car::new(id, team, config, &self.objects.mutator_config);
        car.respawn(
            &mut self.rng,
            self.objects.game_mode,
            self.objects.mutator_config.car_spawn_boost_amount,
        );

        self.last_car_id = id;
        self.objects.cars.insert(id, car);
        self.objects.car_ids.push(id);

        debug!("Added car {id} to team {team:?}");
        Ok(id)
    }

    /// Removes a car, returning it.
    ///
    /// The car id is the only handle to a car: the arena hands out borrows of [`Car`], never
    /// shared ownership, so an id works as a weak reference that stops resolving once the
    /// car is gone. Take the id from a borrowed car with [`Car::id`].
    ///
    /// Removing the same car twice is an [`ArenaError::InvalidOperation`].
    pub fn remove_car(&mut self, car_id: u64) -> Result<Car, ArenaError> {
        let Some(car) = self.objects.cars.remove(&car_id) else {
            return Err(self.missing_car_error(car_id, true));
        };

        self.objects.car_ids.retain(|&id| id != car_id);
        debug!("Removed car {car_id}");
        Ok(car)
    }

    pub fn get_car(&self, car_id: u64) -> Result<&Car, ArenaError> {
        self.objects
            .cars
            .get(&car_id)
            .ok_or_else(|| self.missing_car_error(car_id, false))
    }

    pub fn get_car_state(&self, car_id: u64) -> Result<CarState, ArenaError> {
        self.get_car(car_id).map(|car| car.state)
    }

    /// The car's state, or `default` if no car has this id
    #[must_use]
    pub fn get_car_state_or(&self, car_id: u64, default: CarState) -> CarState {
        self.objects
            .cars
            .get(&car_id)
            .map_or(default, |car| car.state)
    }

    /// Every car, by ascending id
    pub fn get_cars(&self) -> impl ExactSizeIterator<Item = &Car> {
        self.objects.car_ids.iter().map(|id| &self.objects.cars[id])
    }

    /// Ascending
    #[must_use]
    pub fn car_ids(&self) -> &[u64] {
        &self.objects.car_ids
    }

    #[must_use]
    pub fn num_cars(&self) -> usize {
        self.objects.car_ids.len()
    }

    /// Controls persist until replaced
    pub fn set_car_controls(
        &mut self,
        car_id: u64,
        controls: CarControls,
    ) -> Result<(), ArenaError> {
        if !controls.is_finite() {
            return Err(ArenaError::invalid_arg(format!(
                "car {car_id} controls must be finite, got {controls:?}"
            )));
        }

        self.car_mut(car_id)?.set_controls(controls);
        Ok(())
    }

    pub fn set_car_state(&mut self, car_id: u64, state: &CarState) -> Result<(), ArenaError> {
        if !state.phys.is_finite() || !state.boost.is_finite() {
            return Err(ArenaError::invalid_arg(format!(
                "car {car_id} state must be finite"
            )));
        }

        self.car_mut(car_id)?.set_state(state);
        Ok(())
    }

    /// Demolishes a car using the mutator's respawn delay
    pub fn demolish_car(&mut self, car_id: u64) -> Result<(), ArenaError> {
        let respawn_delay = self.objects.mutator_config.respawn_delay;
        self.car_mut(car_id)?.demolish(respawn_delay);
        Ok(())
    }

    /// Puts a car back on a random respawn spot of its team
    pub fn respawn_car(&mut self, car_id: u64, boost_amount: f32) -> Result<(), ArenaError> {
        if !(0.0..=self.objects.mutator_config.car_max_boost_amount).contains(&boost_amount) {
            return Err(ArenaError::invalid_arg(format!(
                "respawn boost amount must be within 0 and the max boost amount, got {boost_amount}"
            )));
        }

        let game_mode = self.objects.game_mode;
        if !self.objects.cars.contains_key(&car_id) {
            return Err(self.missing_car_error(car_id, true));
        }

        if let Some(car) = self.objects.cars.get_mut(&car_id) {
            car.respawn(&mut self.rng, game_mode, boost_amount);
        }

        Ok(())
    }

    #[must_use]
    pub fn is_ball_scored(&self) -> bool {
        if !self.objects.game_mode.has_soccar_arena() {
            return false;
        }

        let mutator_config = &self.objects.mutator_config;
        self.objects.ball.state.pos.y.abs()
            > mutator_config.goal_base_threshold_y + mutator_config.ball_radius
    }

    /// Rough guess of whether the ball will enter either net within `max_time` seconds,
    /// from its current velocity and gravity alone
    #[must_use]
    pub fn is_ball_probably_going_in(&self, max_time: f32) -> bool {
        self.objects.game_mode.has_soccar_arena()
            && predict_goal_entry(
                self.objects.ball.state.pos,
                self.objects.ball.state.vel,
                &self.objects.mutator_config,
                max_time,
            )
            .is_some()
    }

    /// Places every car on a shuffled kickoff spot and resets the ball, the boost pads
    /// and the scores.
    ///
    /// - `seed` reseeds the arena's random number generator first
    pub fn reset_to_random_kickoff(&mut self, seed: Option<u64>) {
        if let Some(seed) = seed {
            self.rng.seed(seed);
        }

        let game_mode = self.objects.game_mode;
        let car_spawn_locations = spawn::get_locations(game_mode);
        let car_respawn_locations = spawn::get_respawn_locations(game_mode);
        let location_amount = car_spawn_locations.len();

        let mut kickoff_order: [usize; spawn::LOCATIONS_SOCCAR.len()] = from_fn(|i| i);
        self.rng.shuffle(&mut kickoff_order[..location_amount]);

        let mut blue_cars = Vec::new();
        let mut orange_cars = Vec::new();
        for id in &self.objects.car_ids {
            let car = &self.objects.cars[id];
            if car.team() == Team::Blue {
                blue_cars.push(*id);
            } else {
                orange_cars.push(*id);
            }
        }

        let mut num_cars_at_respawn_pos = vec![0u16; car_respawn_locations.len()];
        let kickoff_position_amount = blue_cars.len().max(orange_cars.len());
        for i in 0..kickoff_position_amount {
            let spawn_pos = if i < location_amount {
                car_spawn_locations[kickoff_order[i]]
            } else {
                let respawn_pos_idx = (i - location_amount) % car_respawn_locations.len();
                let mut pos = car_respawn_locations[respawn_pos_idx];
                pos.y += spawn::EXTRA_OFFSET_Y * f32::from(num_cars_at_respawn_pos[respawn_pos_idx]);
                num_cars_at_respawn_pos[respawn_pos_idx] += 1;
                pos
            };

            for (team, team_cars) in [(Team::Blue, &blue_cars), (Team::Orange, &orange_cars)] {
                let Some(car_id) = team_cars.get(i) else {
                    continue;
                };

                let mut spawn_state = CarState {
                    phys: PhysState {
                        pos: Vec3A::new(spawn_pos.x, spawn_pos.y, spawn::SPAWN_Z),
                        rot_mat: Mat3A::from_euler(EulerRot::YZX, 0.0, spawn_pos.yaw_ang, 0.0),
                        vel: Vec3A::ZERO,
                        ang_vel: Vec3A::ZERO,
                    },
                    boost: self.objects.mutator_config.car_spawn_boost_amount,
                    ..CarState::DEFAULT
                };

                if team == Team::Orange {
                    spawn_state.phys.pos *= consts::MIRROR_SCALE;
                    spawn_state.phys.rot_mat =
                        Mat3A::from_euler(EulerRot::YZX, 0.0, spawn_pos.yaw_ang + PI, 0.0);
                }

                if let Some(car) = self.objects.cars.get_mut(car_id) {
                    car.set_state(&spawn_state);
                }
            }
        }

        let mut ball_state = BallState::DEFAULT;
        if game_mode == GameMode::Heatseeker {
            let y_sign = if self.rng.bool() { 1.0 } else { -1.0 };
            let scale = Vec3A::new(1.0, y_sign, 1.0);
            ball_state.phys.pos = heatseeker::BALL_START_POS * scale;
            ball_state.phys.vel = heatseeker::BALL_START_VEL * scale;
        }
        self.objects.ball.set_state(ball_state);
        self.ball_in_goal = false;

        for pad in &mut self.objects.boost_pads {
            pad.reset();
        }

        self.scores = [0; 2];
        debug!(
            "Reset to kickoff on tick {} with {} cars",
            self.objects.tick_count,
            self.objects.car_ids.len()
        );
    }

    pub(crate) const fn rearm_goal(&mut self) {
        self.ball_in_goal = false;
    }

    fn update_boost_pads(&mut self) {
        let objects = &mut self.objects;
        if objects.boost_pads.is_empty() {
            return;
        }

        for pad in &mut objects.boost_pads {
            pad.pre_tick_update();
        }

        let tick_rate = 1.0 / self.tick_time;
        let all_pads: Vec<usize> = if self.boost_pad_grid.is_none() {
            (0..objects.boost_pads.len()).collect()
        } else {
            Vec::new()
        };

        for car_id in &objects.car_ids {
            let Some(car) = objects.cars.get_mut(car_id) else {
                continue;
            };

            if car.state.is_demoed {
                continue;
            }

            let nearby_pads = self
                .boost_pad_grid
                .as_ref()
                .map_or(all_pads.as_slice(), |grid| grid.nearby_pads(car.state.pos));

            for &pad_idx in nearby_pads {
                let given = objects.boost_pads[pad_idx].maybe_give_car_boost(
                    *car_id,
                    &mut car.state,
                    &objects.mutator_config,
                    tick_rate,
                );

                if given {
                    trace!("Car {car_id} picked up boost pad {pad_idx}");
                    car.stats.boost_pickups += 1;
                    objects.events.push(ArenaEvent::BoostPickup {
                        car_id: *car_id,
                        pad_idx,
                    });
                    break;
                }
            }
        }
    }

    fn update_goal_state(&mut self) {
        if !self.is_ball_scored() {
            self.ball_in_goal = false;
            return;
        }

        if self.ball_in_goal {
            return;
        }

        self.ball_in_goal = true;

        // Orange goal is at positive Y, so if the ball's Y is positive, blue scored
        let scoring_team = if self.objects.ball.state.pos.y > 0.0 {
            Team::Blue
        } else {
            Team::Orange
        };
        self.scores[scoring_team as usize] += 1;

        if let Some(last_hit) = self.objects.ball.state.last_hit
            && let Some(car) = self.objects.cars.get_mut(&last_hit.car_id)
            && car.team() == scoring_team
        {
            car.stats.goals += 1;
        }

        debug!(
            "{scoring_team:?} scored on tick {}, score is now {}-{}",
            self.objects.tick_count,
            self.blue_score(),
            self.orange_score()
        );
        self.objects.events.push(ArenaEvent::GoalScore { scoring_team });
    }

    fn internal_step(&mut self) {
        let tick_time = self.tick_time;
        let objects = &mut self.objects;
        objects.events.clear();

        for car_id in &objects.car_ids {
            let Some(car) = objects.cars.get_mut(car_id) else {
                continue;
            };

            car.pre_tick_update(
                &self.geometry,
                &mut self.rng,
                objects.game_mode,
                tick_time,
                &objects.mutator_config,
            );
        }

        objects.ball.pre_tick_update(objects.game_mode, tick_time);

        for car in objects.cars.values_mut() {
            car.integrate_velocities(tick_time);
        }
        objects
            .ball
            .integrate_velocities(tick_time, objects.mutator_config.ball_air_resistance);

        let car_ids = objects.car_ids.clone();
        for &car_id in &car_ids {
            objects.on_car_world_collision(car_id, &self.geometry);
        }

        for &car_id in &car_ids {
            objects.on_car_ball_collision(car_id);
        }

        for (i, &car_1_id) in car_ids.iter().enumerate() {
            for &car_2_id in &car_ids[i + 1..] {
                objects.on_car_car_collision(car_1_id, car_2_id);
            }
        }

        for car in objects.cars.values_mut() {
            car.integrate_transform(tick_time);
        }
        objects.ball.integrate_transform(
            &self.geometry,
            tick_time,
            self.config.ball_sub_steps,
            &objects.mutator_config,
        );

        for car in objects.cars.values_mut() {
            car.post_tick_update(tick_time);
            car.finish_physics_tick();
        }
        objects.ball.finish_physics_tick(&objects.mutator_config);

        self.update_boost_pads();
        self.update_goal_state();
        self.dispatch_events();

        self.objects.tick_count += 1;
    }

    /// Simulates `ticks_to_simulate` ticks, firing callbacks as their events happen
    pub fn step(&mut self, ticks_to_simulate: u32) {
        for _ in 0..ticks_to_simulate {
            self.internal_step();
        }
    }

    pub(crate) const fn rng(&self) -> &Rng {
        &self.rng
    }

    pub(crate) const fn last_car_id(&self) -> u64 {
        self.last_car_id
    }

    pub(crate) const fn scores(&self) -> [u32; 2] {
        self.scores
    }

    pub(crate) fn mirrored_pad_indices(&self) -> &[usize] {
        &self.mirrored_pad_indices
    }

    /// Rebuilds the arena's mutable parts from saved data
    pub(crate) fn restore(
        &mut self,
        tick_count: u64,
        last_car_id: u64,
        scores: [u32; 2],
        rng_seed: u64,
        cars: Vec<Car>,
    ) {
        self.objects.tick_count = tick_count;
        self.last_car_id = last_car_id;
        self.scores = scores;
        self.rng = Rng::with_seed(rng_seed);

        self.objects.cars.clear();
        self.objects.car_ids.clear();
        for car in cars {
            self.objects.car_ids.push(car.id());
            self.objects.cars.insert(car.id(), car);
        }
        self.objects.car_ids.sort_unstable();

        self.ball_in_goal = self.is_ball_scored();
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3A;

    use super::predict_goal_entry;
    use crate::{MutatorConfig, Team};

    #[test]
    fn ball_rolling_into_orange_net() {
        let mutator_config = MutatorConfig::default();
        let entry = predict_goal_entry(
            Vec3A::new(0.0, 4000.0, 93.15),
            Vec3A::new(0.0, 2000.0, 0.0),
            &mutator_config,
            2.0,
        );
        assert_eq!(entry, Some(Team::Orange));

        let entry = predict_goal_entry(
            Vec3A::new(0.0, -4000.0, 93.15),
            Vec3A::new(0.0, -2000.0, 0.0),
            &mutator_config,
            2.0,
        );
        assert_eq!(entry, Some(Team::Blue));
    }

    #[test]
    fn wide_or_slow_ball_is_not_going_in() {
        let mutator_config = MutatorConfig::default();
        assert_eq!(
            predict_goal_entry(
                Vec3A::new(2500.0, 4000.0, 93.15),
                Vec3A::new(0.0, 2000.0, 0.0),
                &mutator_config,
                2.0
            ),
            None
        );
        assert_eq!(
            predict_goal_entry(
                Vec3A::new(0.0, 0.0, 93.15),
                Vec3A::new(0.0, 500.0, 0.0),
                &mutator_config,
                2.0
            ),
            None
        );
        assert_eq!(
            predict_goal_entry(
                Vec3A::new(0.0, 4000.0, 1500.0),
                Vec3A::new(0.0, 2000.0, 1000.0),
                &mutator_config,
                2.0
            ),
            None
        );
    }
}
