//! Little-endian binary snapshots of a whole arena.
//!
//! Callbacks are not part of a snapshot and have to be registered again after loading.

use std::io::{Read, Write};

use ahash::AHashSet;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use glam::{Mat3A, Vec3A};
use log::debug;

use crate::{
    Arena, ArenaConfig, ArenaError, BallHitInfo, BallLastHit, BallState, BoostPadConfig,
    BoostPadState, Car, CarConfig, CarContact, CarControls, CarState, CarStats, DemoMode,
    GameMode, HeatseekerInfo, MutatorConfig, PhysState, Team, WheelPairConfig,
};

const MAGIC: [u8; 4] = *b"RSAR";
const FORMAT_VERSION: u32 = 1;

type Result<T> = std::result::Result<T, ArenaError>;

trait Serial: Sized {
    fn write_to(&self, w: &mut impl Write) -> Result<()>;
    fn read_from(r: &mut impl Read) -> Result<Self>;
}

impl Serial for f32 {
    fn write_to(&self, w: &mut impl Write) -> Result<()> {
        Ok(w.write_f32::<LittleEndian>(*self)?)
    }

    fn read_from(r: &mut impl Read) -> Result<Self> {
        Ok(r.read_f32::<LittleEndian>()?)
    }
}

impl Serial for u32 {
    fn write_to(&self, w: &mut impl Write) -> Result<()> {
        Ok(w.write_u32::<LittleEndian>(*self)?)
    }

    fn read_from(r: &mut impl Read) -> Result<Self> {
        Ok(r.read_u32::<LittleEndian>()?)
    }
}

impl Serial for u64 {
    fn write_to(&self, w: &mut impl Write) -> Result<()> {
        Ok(w.write_u64::<LittleEndian>(*self)?)
    }

    fn read_from(r: &mut impl Read) -> Result<Self> {
        Ok(r.read_u64::<LittleEndian>()?)
    }
}

impl Serial for bool {
    fn write_to(&self, w: &mut impl Write) -> Result<()> {
        Ok(w.write_u8(u8::from(*self))?)
    }

    fn read_from(r: &mut impl Read) -> Result<Self> {
        match r.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(ArenaError::Corrupt(format!("invalid bool byte {other}"))),
        }
    }
}

impl<T: Serial> Serial for Option<T> {
    fn write_to(&self, w: &mut impl Write) -> Result<()> {
        self.is_some().write_to(w)?;
        if let Some(value) = self {
            value.write_to(w)?;
        }

        Ok(())
    }

    fn read_from(r: &mut impl Read) -> Result<Self> {
        if bool::read_from(r)? {
            Ok(Some(T::read_from(r)?))
        } else {
            Ok(None)
        }
    }
}

impl Serial for Vec3A {
    fn write_to(&self, w: &mut impl Write) -> Result<()> {
        self.to_array().iter().try_for_each(|v| v.write_to(w))
    }

    fn read_from(r: &mut impl Read) -> Result<Self> {
        Ok(Self::new(
            f32::read_from(r)?,
            f32::read_from(r)?,
            f32::read_from(r)?,
        ))
    }
}

impl Serial for Mat3A {
    fn write_to(&self, w: &mut impl Write) -> Result<()> {
        self.x_axis.write_to(w)?;
        self.y_axis.write_to(w)?;
        self.z_axis.write_to(w)
    }

    fn read_from(r: &mut impl Read) -> Result<Self> {
        Ok(Self::from_cols(
            Vec3A::read_from(r)?,
            Vec3A::read_from(r)?,
            Vec3A::read_from(r)?,
        ))
    }
}

impl Serial for Team {
    fn write_to(&self, w: &mut impl Write) -> Result<()> {
        Ok(w.write_u8(*self as u8)?)
    }

    fn read_from(r: &mut impl Read) -> Result<Self> {
        let value = r.read_u8()?;
        Self::try_from(value).map_err(|_| ArenaError::Corrupt(format!("invalid team {value}")))
    }
}

impl Serial for GameMode {
    fn write_to(&self, w: &mut impl Write) -> Result<()> {
        Ok(w.write_u8(*self as u8)?)
    }

    fn read_from(r: &mut impl Read) -> Result<Self> {
        let value = r.read_u8()?;
        Self::try_from(value).map_err(|_| ArenaError::Corrupt(format!("invalid game mode {value}")))
    }
}

impl Serial for DemoMode {
    fn write_to(&self, w: &mut impl Write) -> Result<()> {
        Ok(w.write_u8(*self as u8)?)
    }

    fn read_from(r: &mut impl Read) -> Result<Self> {
        let value = r.read_u8()?;
        Self::try_from(value).map_err(|_| ArenaError::Corrupt(format!("invalid demo mode {value}")))
    }
}

impl Serial for PhysState {
    fn write_to(&self, w: &mut impl Write) -> Result<()> {
        self.pos.write_to(w)?;
        self.rot_mat.write_to(w)?;
        self.vel.write_to(w)?;
        self.ang_vel.write_to(w)
    }

    fn read_from(r: &mut impl Read) -> Result<Self> {
        Ok(Self {
            pos: Vec3A::read_from(r)?,
            rot_mat: Mat3A::read_from(r)?,
            vel: Vec3A::read_from(r)?,
            ang_vel: Vec3A::read_from(r)?,
        })
    }
}

impl Serial for MutatorConfig {
    fn write_to(&self, w: &mut impl Write) -> Result<()> {
        self.gravity.write_to(w)?;
        for value in [
            self.car_mass,
            self.car_world_friction,
            self.car_world_restitution,
            self.ball_mass,
            self.ball_max_speed,
            self.ball_drag,
            self.ball_air_resistance,
            self.ball_world_friction,
            self.ball_world_restitution,
            self.jump_accel,
            self.jump_immediate_force,
            self.boost_accel_ground,
            self.boost_accel_air,
            self.boost_used_per_second,
            self.respawn_delay,
            self.bump_cooldown_time,
            self.car_max_boost_amount,
            self.car_spawn_boost_amount,
            self.boost_pad_amount_small,
            self.boost_pad_amount_big,
            self.boost_pad_cooldown_big,
            self.boost_pad_cooldown_small,
            self.ball_hit_extra_force_scale,
            self.bump_force_scale,
            self.ball_radius,
            self.recharge_boost_per_second,
            self.recharge_boost_delay,
            self.goal_base_threshold_y,
        ] {
            value.write_to(w)?;
        }

        self.unlimited_flips.write_to(w)?;
        self.unlimited_double_jumps.write_to(w)?;
        self.recharge_boost_enabled.write_to(w)?;
        self.demo_mode.write_to(w)?;
        self.enable_team_demos.write_to(w)
    }

    fn read_from(r: &mut impl Read) -> Result<Self> {
        let gravity = Vec3A::read_from(r)?;
        let mut floats = [0.0; 28];
        for value in &mut floats {
            *value = f32::read_from(r)?;
        }

        let [
            car_mass,
            car_world_friction,
            car_world_restitution,
            ball_mass,
            ball_max_speed,
            ball_drag,
            ball_air_resistance,
            ball_world_friction,
            ball_world_restitution,
            jump_accel,
            jump_immediate_force,
            boost_accel_ground,
            boost_accel_air,
            boost_used_per_second,
            respawn_delay,
            bump_cooldown_time,
            car_max_boost_amount,
            car_spawn_boost_amount,
            boost_pad_amount_small,
            boost_pad_amount_big,
            boost_pad_cooldown_big,
            boost_pad_cooldown_small,
            ball_hit_extra_force_scale,
            bump_force_scale,
            ball_radius,
            recharge_boost_per_second,
            recharge_boost_delay,
            goal_base_threshold_y,
        ] = floats;

        Ok(Self {
            gravity,
            car_mass,
            car_world_friction,
            car_world_restitution,
            ball_mass,
            ball_max_speed,
            ball_drag,
            ball_air_resistance,
            ball_world_friction,
            ball_world_restitution,
            jump_accel,
            jump_immediate_force,
            boost_accel_ground,
            boost_accel_air,
            boost_used_per_second,
            respawn_delay,
            bump_cooldown_time,
            car_max_boost_amount,
            car_spawn_boost_amount,
            boost_pad_amount_small,
            boost_pad_amount_big,
            boost_pad_cooldown_big,
            boost_pad_cooldown_small,
            ball_hit_extra_force_scale,
            bump_force_scale,
            ball_radius,
            unlimited_flips: bool::read_from(r)?,
            unlimited_double_jumps: bool::read_from(r)?,
            recharge_boost_enabled: bool::read_from(r)?,
            recharge_boost_per_second,
            recharge_boost_delay,
            demo_mode: DemoMode::read_from(r)?,
            enable_team_demos: bool::read_from(r)?,
            goal_base_threshold_y,
        })
    }
}

impl Serial for BoostPadConfig {
    fn write_to(&self, w: &mut impl Write) -> Result<()> {
        self.pos.write_to(w)?;
        self.is_big.write_to(w)
    }

    fn read_from(r: &mut impl Read) -> Result<Self> {
        Ok(Self::new(Vec3A::read_from(r)?, bool::read_from(r)?))
    }
}

impl Serial for ArenaConfig {
    fn write_to(&self, w: &mut impl Write) -> Result<()> {
        self.rng_seed.write_to(w)?;
        self.no_ball_rot.write_to(w)?;
        self.ball_sub_steps.write_to(w)?;
        self.use_custom_boost_pads.write_to(w)?;

        (self.custom_boost_pads.len() as u32).write_to(w)?;
        self.custom_boost_pads
            .iter()
            .try_for_each(|pad| pad.write_to(w))
    }

    fn read_from(r: &mut impl Read) -> Result<Self> {
        let rng_seed = u64::read_from(r)?;
        let no_ball_rot = bool::read_from(r)?;
        let ball_sub_steps = u32::read_from(r)?;
        let use_custom_boost_pads = bool::read_from(r)?;

        let num_pads = u32::read_from(r)?;
        let custom_boost_pads = (0..num_pads)
            .map(|_| BoostPadConfig::read_from(r))
            .collect::<Result<_>>()?;

        Ok(Self {
            rng_seed,
            no_ball_rot,
            ball_sub_steps,
            use_custom_boost_pads,
            custom_boost_pads,
        })
    }
}

impl Serial for BallState {
    fn write_to(&self, w: &mut impl Write) -> Result<()> {
        self.phys.write_to(w)?;
        self.hs_info.y_target_dir.write_to(w)?;
        self.hs_info.cur_target_speed.write_to(w)?;
        self.hs_info.time_since_hit.write_to(w)?;

        self.last_hit.is_some().write_to(w)?;
        if let Some(last_hit) = self.last_hit {
            last_hit.car_id.write_to(w)?;
            last_hit.tick_count.write_to(w)?;
        }

        Ok(())
    }

    fn read_from(r: &mut impl Read) -> Result<Self> {
        let phys = PhysState::read_from(r)?;
        let hs_info = HeatseekerInfo {
            y_target_dir: f32::read_from(r)?,
            cur_target_speed: f32::read_from(r)?,
            time_since_hit: f32::read_from(r)?,
        };

        let last_hit = if bool::read_from(r)? {
            Some(BallLastHit {
                car_id: u64::read_from(r)?,
                tick_count: u64::read_from(r)?,
            })
        } else {
            None
        };

        Ok(Self {
            phys,
            hs_info,
            last_hit,
        })
    }
}

impl Serial for BoostPadState {
    fn write_to(&self, w: &mut impl Write) -> Result<()> {
        self.ticks_until_active.write_to(w)?;
        self.prev_picked_up_by.write_to(w)
    }

    fn read_from(r: &mut impl Read) -> Result<Self> {
        Ok(Self {
            ticks_until_active: u64::read_from(r)?,
            prev_picked_up_by: Option::read_from(r)?,
        })
    }
}

impl Serial for WheelPairConfig {
    fn write_to(&self, w: &mut impl Write) -> Result<()> {
        self.wheel_radius.write_to(w)?;
        self.suspension_rest_length.write_to(w)?;
        self.connection_point_offset.write_to(w)
    }

    fn read_from(r: &mut impl Read) -> Result<Self> {
        Ok(Self {
            wheel_radius: f32::read_from(r)?,
            suspension_rest_length: f32::read_from(r)?,
            connection_point_offset: Vec3A::read_from(r)?,
        })
    }
}

impl Serial for CarConfig {
    fn write_to(&self, w: &mut impl Write) -> Result<()> {
        self.hitbox_size.write_to(w)?;
        self.hitbox_pos_offset.write_to(w)?;
        self.front_wheels.write_to(w)?;
        self.back_wheels.write_to(w)?;
        self.three_wheels.write_to(w)?;
        self.dodge_deadzone.write_to(w)
    }

    fn read_from(r: &mut impl Read) -> Result<Self> {
        Ok(Self {
            hitbox_size: Vec3A::read_from(r)?,
            hitbox_pos_offset: Vec3A::read_from(r)?,
            front_wheels: WheelPairConfig::read_from(r)?,
            back_wheels: WheelPairConfig::read_from(r)?,
            three_wheels: bool::read_from(r)?,
            dodge_deadzone: f32::read_from(r)?,
        })
    }
}

impl Serial for CarControls {
    fn write_to(&self, w: &mut impl Write) -> Result<()> {
        for value in [self.throttle, self.steer, self.pitch, self.yaw, self.roll] {
            value.write_to(w)?;
        }

        self.jump.write_to(w)?;
        self.boost.write_to(w)?;
        self.handbrake.write_to(w)
    }

    fn read_from(r: &mut impl Read) -> Result<Self> {
        Ok(Self {
            throttle: f32::read_from(r)?,
            steer: f32::read_from(r)?,
            pitch: f32::read_from(r)?,
            yaw: f32::read_from(r)?,
            roll: f32::read_from(r)?,
            jump: bool::read_from(r)?,
            boost: bool::read_from(r)?,
            handbrake: bool::read_from(r)?,
        })
    }
}

impl Serial for CarContact {
    fn write_to(&self, w: &mut impl Write) -> Result<()> {
        self.other_car_id.write_to(w)?;
        self.cooldown_timer.write_to(w)
    }

    fn read_from(r: &mut impl Read) -> Result<Self> {
        Ok(Self {
            other_car_id: u64::read_from(r)?,
            cooldown_timer: f32::read_from(r)?,
        })
    }
}

impl Serial for BallHitInfo {
    fn write_to(&self, w: &mut impl Write) -> Result<()> {
        self.relative_pos_on_ball.write_to(w)?;
        self.ball_pos.write_to(w)?;
        self.extra_hit_vel.write_to(w)?;
        self.tick_count_when_hit.write_to(w)?;
        self.tick_count_when_extra_impulse_applied.write_to(w)
    }

    fn read_from(r: &mut impl Read) -> Result<Self> {
        Ok(Self {
            relative_pos_on_ball: Vec3A::read_from(r)?,
            ball_pos: Vec3A::read_from(r)?,
            extra_hit_vel: Vec3A::read_from(r)?,
            tick_count_when_hit: u64::read_from(r)?,
            tick_count_when_extra_impulse_applied: u64::read_from(r)?,
        })
    }
}

impl Serial for CarState {
    fn write_to(&self, w: &mut impl Write) -> Result<()> {
        self.phys.write_to(w)?;
        self.controls.write_to(w)?;
        self.prev_controls.write_to(w)?;

        for flag in [
            self.is_on_ground,
            self.wheels_with_contact[0],
            self.wheels_with_contact[1],
            self.wheels_with_contact[2],
            self.wheels_with_contact[3],
            self.has_jumped,
            self.has_double_jumped,
            self.has_flipped,
            self.is_flipping,
            self.is_jumping,
            self.is_boosting,
            self.is_supersonic,
            self.is_auto_flipping,
            self.is_demoed,
        ] {
            flag.write_to(w)?;
        }

        self.flip_rel_torque.write_to(w)?;
        for value in [
            self.jump_time,
            self.flip_time,
            self.air_time,
            self.air_time_since_jump,
            self.boost,
            self.time_since_boosted,
            self.boosting_time,
            self.supersonic_time,
            self.handbrake_val,
            self.auto_flip_timer,
            self.auto_flip_torque_scale,
            self.demo_respawn_timer,
        ] {
            value.write_to(w)?;
        }

        self.world_contact_normal.write_to(w)?;
        self.car_contact.write_to(w)?;
        self.ball_hit_info.write_to(w)
    }

    fn read_from(r: &mut impl Read) -> Result<Self> {
        let phys = PhysState::read_from(r)?;
        let controls = CarControls::read_from(r)?;
        let prev_controls = CarControls::read_from(r)?;

        let mut flags = [false; 14];
        for flag in &mut flags {
            *flag = bool::read_from(r)?;
        }
        let [
            is_on_ground,
            wheel_0,
            wheel_1,
            wheel_2,
            wheel_3,
            has_jumped,
            has_double_jumped,
            has_flipped,
            is_flipping,
            is_jumping,
            is_boosting,
            is_supersonic,
            is_auto_flipping,
            is_demoed,
        ] = flags;

        let flip_rel_torque = Vec3A::read_from(r)?;
        let mut floats = [0.0; 12];
        for value in &mut floats {
            *value = f32::read_from(r)?;
        }
        let [
            jump_time,
            flip_time,
            air_time,
            air_time_since_jump,
            boost,
            time_since_boosted,
            boosting_time,
            supersonic_time,
            handbrake_val,
            auto_flip_timer,
            auto_flip_torque_scale,
            demo_respawn_timer,
        ] = floats;

        Ok(Self {
            phys,
            controls,
            prev_controls,
            is_on_ground,
            wheels_with_contact: [wheel_0, wheel_1, wheel_2, wheel_3],
            has_jumped,
            has_double_jumped,
            has_flipped,
            flip_rel_torque,
            jump_time,
            flip_time,
            is_flipping,
            is_jumping,
            air_time,
            air_time_since_jump,
            boost,
            time_since_boosted,
            is_boosting,
            boosting_time,
            is_supersonic,
            supersonic_time,
            handbrake_val,
            is_auto_flipping,
            auto_flip_timer,
            auto_flip_torque_scale,
            world_contact_normal: Option::read_from(r)?,
            car_contact: Option::read_from(r)?,
            is_demoed,
            demo_respawn_timer,
            ball_hit_info: Option::read_from(r)?,
        })
    }
}

impl Serial for CarStats {
    fn write_to(&self, w: &mut impl Write) -> Result<()> {
        [
            self.goals,
            self.shots,
            self.saves,
            self.demos,
            self.boost_pickups,
        ]
        .iter()
        .try_for_each(|value| value.write_to(w))
    }

    fn read_from(r: &mut impl Read) -> Result<Self> {
        Ok(Self {
            goals: u32::read_from(r)?,
            shots: u32::read_from(r)?,
            saves: u32::read_from(r)?,
            demos: u32::read_from(r)?,
            boost_pickups: u32::read_from(r)?,
        })
    }
}

impl Arena {
    /// Writes everything needed to continue this match later with [`Arena::deserialize`]
    pub fn serialize(&self, mut writer: impl Write) -> Result<()> {
        let w = &mut writer;
        w.write_all(&MAGIC)?;
        FORMAT_VERSION.write_to(w)?;

        self.game_mode().write_to(w)?;
        self.get_tick_rate().write_to(w)?;
        self.config().write_to(w)?;

        self.tick_count().write_to(w)?;
        self.last_car_id().write_to(w)?;
        let [blue_score, orange_score] = self.scores();
        blue_score.write_to(w)?;
        orange_score.write_to(w)?;
        self.rng().get_seed().write_to(w)?;

        self.mutator_config().write_to(w)?;
        self.get_ball_state().write_to(w)?;

        (self.num_boost_pads() as u32).write_to(w)?;
        for pad in self.boost_pads() {
            pad.get_state().write_to(w)?;
        }

        (self.num_cars() as u32).write_to(w)?;
        for car in self.get_cars() {
            car.id().write_to(w)?;
            car.team().write_to(w)?;
            car.config().write_to(w)?;
            car.get_state().write_to(w)?;
            car.stats().write_to(w)?;
        }

        Ok(())
    }

    /// Rebuilds an arena written by [`Arena::serialize`], without any callbacks
    pub fn deserialize(mut reader: impl Read) -> Result<Self> {
        let r = &mut reader;

        let mut magic = [0; 4];
        r.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(ArenaError::Corrupt("not an arena snapshot".to_string()));
        }

        let version = u32::read_from(r)?;
        if version != FORMAT_VERSION {
            return Err(ArenaError::Corrupt(format!(
                "unsupported snapshot version {version}"
            )));
        }

        let game_mode = GameMode::read_from(r)?;
        let tick_rate = f32::read_from(r)?;
        let config = ArenaConfig::read_from(r)?;
        let mut arena = Self::new_with_config(game_mode, config, tick_rate)?;

        let tick_count = u64::read_from(r)?;
        let last_car_id = u64::read_from(r)?;
        let scores = [u32::read_from(r)?, u32::read_from(r)?];
        let rng_seed = u64::read_from(r)?;

        arena.set_mutator_config(MutatorConfig::read_from(r)?)?;
        arena.set_ball_state(BallState::read_from(r)?)?;

        let num_pads = u32::read_from(r)? as usize;
        if num_pads != arena.num_boost_pads() {
            return Err(ArenaError::Corrupt(format!(
                "snapshot has {num_pads} boost pads, the arena has {}",
                arena.num_boost_pads()
            )));
        }

        for i in 0..num_pads {
            arena.set_boost_pad_state(i, BoostPadState::read_from(r)?)?;
        }

        let num_cars = u32::read_from(r)?;
        let mut cars = Vec::new();
        let mut seen_ids = AHashSet::new();
        for _ in 0..num_cars {
            let id = u64::read_from(r)?;
            if id == 0 || id > last_car_id {
                return Err(ArenaError::Corrupt(format!(
                    "car id {id} was never issued (last id is {last_car_id})"
                )));
            }

            if !seen_ids.insert(id) {
                return Err(ArenaError::Corrupt(format!("car id {id} appears twice")));
            }

            let team = Team::read_from(r)?;
            let config = CarConfig::read_from(r)?;
            config.validate()?;

            let state = CarState::read_from(r)?;
            if !state.phys.is_finite() {
                return Err(ArenaError::Corrupt(format!(
                    "car {id} has a non-finite state: {}",
                    state.phys
                )));
            }

            let mut car = Car::new(id, team, config, arena.mutator_config());
            car.set_state(&state);
            car.stats = CarStats::read_from(r)?;
            cars.push(car);
        }

        arena.restore(tick_count, last_car_id, scores, rng_seed, cars);

        debug!(
            "Loaded {} arena on tick {tick_count} with {num_cars} cars",
            game_mode.name()
        );
        Ok(arena)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::Serial;
    use crate::{Arena, ArenaError, CarConfig, CarState, GameMode, MutatorConfig, Team};

    #[test]
    fn car_state_survives_a_round_trip() {
        let mut state = CarState::DEFAULT;
        state.boost = 42.5;
        state.wheels_with_contact = [true, false, true, false];
        state.world_contact_normal = Some(glam::Vec3A::Z);

        let mut bytes = Vec::new();
        state.write_to(&mut bytes).unwrap();
        let loaded = CarState::read_from(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn mutator_config_survives_a_round_trip() {
        let mut config = MutatorConfig::default();
        config.unlimited_flips = true;
        config.bump_force_scale = 2.0;

        let mut bytes = Vec::new();
        config.write_to(&mut bytes).unwrap();
        let loaded = MutatorConfig::read_from(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn garbage_is_rejected() {
        let result = Arena::deserialize(Cursor::new(b"nope, not an arena".to_vec()));
        assert!(matches!(result, Err(ArenaError::Corrupt(_))));

        let truncated = Arena::deserialize(Cursor::new(b"RS".to_vec()));
        assert!(matches!(truncated, Err(ArenaError::Io(_))));
    }

    #[test]
    fn repeated_car_is_rejected() {
        let mut arena = Arena::new(GameMode::Soccar);
        let id = arena.add_car(Team::Blue, CarConfig::OCTANE).unwrap();

        let mut one_car = Vec::new();
        arena.serialize(&mut one_car).unwrap();

        let mut no_cars = Vec::new();
        arena.remove_car(id).unwrap();
        arena.serialize(&mut no_cars).unwrap();

        // Everything before the car count is shared, the car record follows the count
        let prefix = &no_cars[..no_cars.len() - 4];
        let car_record = &one_car[no_cars.len()..];

        let mut bytes = prefix.to_vec();
        2u32.write_to(&mut bytes).unwrap();
        bytes.extend_from_slice(car_record);
        bytes.extend_from_slice(car_record);

        let result = Arena::deserialize(Cursor::new(bytes));
        assert!(matches!(result, Err(ArenaError::Corrupt(_))));
    }
}
