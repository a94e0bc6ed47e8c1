use glam::Vec3A;

use crate::{ArenaError, GameMode, consts};

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum DemoMode {
    /// Demolish when the striking car is supersonic
    #[default]
    Normal,
    /// Every bumper hit is a demolition
    OnContact,
    Disabled,
}

impl TryFrom<u8> for DemoMode {
    type Error = ArenaError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Normal),
            1 => Ok(Self::OnContact),
            2 => Ok(Self::Disabled),
            _ => Err(ArenaError::invalid_arg(format!("unknown demo mode {value}"))),
        }
    }
}

/// Arena-wide tunables.
///
/// Read and written as a whole with [`crate::Arena::mutator_config`] and
/// [`crate::Arena::set_mutator_config`]; changes apply from the next tick.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MutatorConfig {
    pub gravity: Vec3A,
    /// BT mass
    pub car_mass: f32,
    pub car_world_friction: f32,
    pub car_world_restitution: f32,
    /// BT mass
    pub ball_mass: f32,
    pub ball_max_speed: f32,
    /// Linear damping, applied as `vel *= (1 - drag)^dt`
    pub ball_drag: f32,
    /// Quadratic drag, as deceleration per squared unit of speed
    pub ball_air_resistance: f32,
    pub ball_world_friction: f32,
    pub ball_world_restitution: f32,
    pub jump_accel: f32,
    pub jump_immediate_force: f32,
    pub boost_accel_ground: f32,
    pub boost_accel_air: f32,
    pub boost_used_per_second: f32,
    pub respawn_delay: f32,
    pub bump_cooldown_time: f32,
    pub car_max_boost_amount: f32,
    pub car_spawn_boost_amount: f32,
    pub boost_pad_amount_small: f32,
    pub boost_pad_amount_big: f32,
    pub boost_pad_cooldown_big: f32,
    pub boost_pad_cooldown_small: f32,

    pub ball_hit_extra_force_scale: f32,
    pub bump_force_scale: f32,
    pub ball_radius: f32,
    pub unlimited_flips: bool,
    pub unlimited_double_jumps: bool,
    pub recharge_boost_enabled: bool,
    pub recharge_boost_per_second: f32,
    pub recharge_boost_delay: f32,
    pub demo_mode: DemoMode,
    pub enable_team_demos: bool,
    /// Only used if the game mode has soccar goals
    pub goal_base_threshold_y: f32,
}

impl Default for MutatorConfig {
    fn default() -> Self {
        const { Self::new(GameMode::Soccar) }
    }
}

impl MutatorConfig {
    #[must_use]
    pub const fn new(game_mode: GameMode) -> Self {
        Self {
            gravity: Vec3A::new(0., 0., consts::GRAVITY_Z),
            car_mass: consts::car::MASS_BT,
            car_world_friction: consts::car::HIT_WORLD_COEFS.friction,
            car_world_restitution: consts::car::HIT_WORLD_COEFS.restitution,
            ball_mass: consts::ball::MASS_BT,
            ball_max_speed: match game_mode {
                GameMode::Heatseeker => consts::heatseeker::MAX_SPEED,
                _ => consts::ball::MAX_SPEED,
            },
            ball_drag: consts::ball::DRAG,
            ball_air_resistance: match game_mode {
                // The homing force would fight the drag
                GameMode::Heatseeker => 0.0,
                _ => consts::ball::AIR_RESISTANCE,
            },
            ball_world_friction: consts::ball::COEFS.friction,
            ball_world_restitution: consts::ball::COEFS.restitution,
            jump_accel: consts::car::jump::ACCEL,
            jump_immediate_force: consts::car::jump::IMMEDIATE_FORCE,
            boost_accel_ground: consts::car::boost::ACCEL_GROUND,
            boost_accel_air: consts::car::boost::ACCEL_AIR,
            boost_used_per_second: consts::car::boost::USED_PER_SECOND,
            respawn_delay: consts::car::spawn::RESPAWN_TIME,
            bump_cooldown_time: consts::car::bump::COOLDOWN_TIME,
            car_max_boost_amount: consts::car::boost::MAX,
            car_spawn_boost_amount: consts::car::boost::SPAWN_AMOUNT,
            boost_pad_amount_big: consts::boost_pads::BOOST_AMOUNT_BIG,
            boost_pad_amount_small: consts::boost_pads::BOOST_AMOUNT_SMALL,
            boost_pad_cooldown_big: consts::boost_pads::COOLDOWN_BIG,
            boost_pad_cooldown_small: consts::boost_pads::COOLDOWN_SMALL,
            ball_hit_extra_force_scale: 1.,
            bump_force_scale: 1.,
            ball_radius: consts::ball::get_radius(game_mode),
            unlimited_flips: false,
            unlimited_double_jumps: false,
            recharge_boost_enabled: false,
            recharge_boost_per_second: consts::car::boost::RECHARGE_PER_SECOND,
            recharge_boost_delay: consts::car::boost::RECHARGE_DELAY,
            demo_mode: DemoMode::Normal,
            enable_team_demos: false,
            goal_base_threshold_y: consts::goal::SOCCAR_GOAL_SCORE_BASE_THRESHOLD_Y,
        }
    }

    /// Rejects values that would corrupt the simulation
    pub fn validate(&self) -> Result<(), ArenaError> {
        if !self.gravity.is_finite() {
            return Err(ArenaError::invalid_arg(format!(
                "gravity must be finite, got {}",
                self.gravity
            )));
        }

        let positive = [
            ("car_mass", self.car_mass),
            ("ball_mass", self.ball_mass),
            ("ball_radius", self.ball_radius),
            ("ball_max_speed", self.ball_max_speed),
            ("car_max_boost_amount", self.car_max_boost_amount),
        ];

        let non_negative = [
            ("car_world_friction", self.car_world_friction),
            ("car_world_restitution", self.car_world_restitution),
            ("ball_drag", self.ball_drag),
            ("ball_air_resistance", self.ball_air_resistance),
            ("ball_world_friction", self.ball_world_friction),
            ("ball_world_restitution", self.ball_world_restitution),
            ("jump_accel", self.jump_accel),
            ("jump_immediate_force", self.jump_immediate_force),
            ("boost_accel_ground", self.boost_accel_ground),
            ("boost_accel_air", self.boost_accel_air),
            ("boost_used_per_second", self.boost_used_per_second),
            ("respawn_delay", self.respawn_delay),
            ("bump_cooldown_time", self.bump_cooldown_time),
            ("car_spawn_boost_amount", self.car_spawn_boost_amount),
            ("boost_pad_amount_small", self.boost_pad_amount_small),
            ("boost_pad_amount_big", self.boost_pad_amount_big),
            ("boost_pad_cooldown_big", self.boost_pad_cooldown_big),
            ("boost_pad_cooldown_small", self.boost_pad_cooldown_small),
            ("ball_hit_extra_force_scale", self.ball_hit_extra_force_scale),
            ("bump_force_scale", self.bump_force_scale),
            ("recharge_boost_per_second", self.recharge_boost_per_second),
            ("recharge_boost_delay", self.recharge_boost_delay),
            ("goal_base_threshold_y", self.goal_base_threshold_y),
        ];

        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ArenaError::invalid_arg(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }

        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ArenaError::invalid_arg(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        if self.ball_drag >= 1.0 {
            return Err(ArenaError::invalid_arg(format!(
                "ball_drag must be below 1, got {}",
                self.ball_drag
            )));
        }

        if self.car_spawn_boost_amount > self.car_max_boost_amount {
            return Err(ArenaError::invalid_arg(format!(
                "car_spawn_boost_amount ({}) exceeds car_max_boost_amount ({})",
                self.car_spawn_boost_amount, self.car_max_boost_amount
            )));
        }

        Ok(())
    }
}
