use std::ops::{Deref, DerefMut};

use glam::{Mat3A, Vec3A};

use crate::{BallHitInfo, CarControls, PhysState, consts::car as car_consts};

/// The last car this car bumped, and how long until it can bump that car again
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarContact {
    pub other_car_id: u64,
    pub cooldown_timer: f32,
}

/// Everything about a car that changes tick to tick, in UU.
///
/// Written back by [`crate::Arena::step`] and settable as a whole with
/// [`crate::Arena::set_car_state`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarState {
    pub phys: PhysState,
    /// Inputs used on the next tick, kept until replaced
    pub controls: CarControls,
    /// Inputs of the previous tick, used to detect jump presses
    pub prev_controls: CarControls,
    /// At least 3 of the wheel rays hit the arena
    pub is_on_ground: bool,
    /// Per wheel ray: front right, front left, back right, back left.
    ///
    /// Three-wheel configs still cast four rays, their front pair just sits close together.
    pub wheels_with_contact: [bool; 4],
    /// Left the ground by jumping; stays false after rolling off a ramp
    pub has_jumped: bool,
    pub has_double_jumped: bool,
    /// Flipped since last leaving the ground
    pub has_flipped: bool,
    /// Car-local torque axis of the current flip, positive Y for a front flip
    pub flip_rel_torque: Vec3A,
    /// Seconds into the current jump, 0 when not jumping
    pub jump_time: f32,
    /// Seconds into the current flip, 0 when not flipping
    pub flip_time: f32,
    pub is_flipping: bool,
    pub is_jumping: bool,
    /// Seconds since leaving the ground
    pub air_time: f32,
    /// Seconds since the jump ended. A double jump or flip has to start before this
    /// reaches `consts::car::jump::DOUBLEJUMP_MAX_DELAY`.
    pub air_time_since_jump: f32,
    /// Between 0 and `MutatorConfig::car_max_boost_amount`, never negative
    pub boost: f32,
    /// Seconds since boost was last used, drives boost recharge
    pub time_since_boosted: f32,
    /// Thrust was applied this tick. A boost press always lasts a short minimum time,
    /// unless the tank runs dry.
    pub is_boosting: bool,
    pub boosting_time: f32,
    /// Fast enough to demolish on a bumper hit under `DemoMode::Normal`
    pub is_supersonic: bool,
    /// Seconds spent supersonic, after which the lower keep-supersonic speed no longer applies
    pub supersonic_time: f32,
    /// Smoothed handbrake input, it ramps rather than switching instantly
    pub handbrake_val: f32,
    pub is_auto_flipping: bool,
    /// Seconds of auto-flip torque left
    pub auto_flip_timer: f32,
    pub auto_flip_torque_scale: f32,
    /// Normal of the arena surface the hitbox touched this tick
    pub world_contact_normal: Option<Vec3A>,
    /// Last car bumped, with the bump cooldown still running against it
    pub car_contact: Option<CarContact>,
    pub is_demoed: bool,
    /// Seconds until a demolished car respawns
    pub demo_respawn_timer: f32,
    /// Last ball touch
    pub ball_hit_info: Option<BallHitInfo>,
}

impl Default for CarState {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl CarState {
    pub const DEFAULT: Self = Self {
        phys: PhysState {
            pos: Vec3A::new(0.0, 0.0, car_consts::spawn::SPAWN_Z),
            rot_mat: Mat3A::IDENTITY,
            vel: Vec3A::ZERO,
            ang_vel: Vec3A::ZERO,
        },
        controls: CarControls::DEFAULT,
        prev_controls: CarControls::DEFAULT,
        is_on_ground: true,
        wheels_with_contact: [false; 4],
        has_jumped: false,
        has_double_jumped: false,
        has_flipped: false,
        flip_rel_torque: Vec3A::ZERO,
        jump_time: 0.0,
        flip_time: 0.0,
        is_flipping: false,
        is_jumping: false,
        air_time: 0.0,
        air_time_since_jump: 0.0,
        boost: car_consts::boost::SPAWN_AMOUNT,
        time_since_boosted: 0.0,
        is_boosting: false,
        boosting_time: 0.0,
        is_supersonic: false,
        supersonic_time: 0.0,
        handbrake_val: 0.0,
        is_auto_flipping: false,
        auto_flip_timer: 0.0,
        auto_flip_torque_scale: 0.0,
        world_contact_normal: None,
        car_contact: None,
        is_demoed: false,
        demo_respawn_timer: 0.0,
        ball_hit_info: None,
    };

    #[must_use]
    pub const fn has_flip_or_jump(&self) -> bool {
        self.is_on_ground
            || (!self.has_flipped
                && !self.has_double_jumped
                && self.air_time_since_jump < car_consts::jump::DOUBLEJUMP_MAX_DELAY)
    }

    #[must_use]
    pub const fn has_flip_reset(&self) -> bool {
        !self.is_on_ground && self.has_flip_or_jump() && !self.has_jumped
    }

    #[must_use]
    pub const fn got_flip_reset(&self) -> bool {
        !self.is_on_ground && !self.has_jumped
    }

    /// Whether this car's last ball touch happened on `tick_count`
    #[must_use]
    pub fn touched_ball_on_tick(&self, tick_count: u64) -> bool {
        self.ball_hit_info
            .is_some_and(|info| info.tick_count_when_hit == tick_count)
    }
}

impl Deref for CarState {
    type Target = PhysState;
    fn deref(&self) -> &Self::Target {
        &self.phys
    }
}

impl DerefMut for CarState {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.phys
    }
}
