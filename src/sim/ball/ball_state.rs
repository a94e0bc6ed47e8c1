use std::ops::{Deref, DerefMut};

use glam::{Mat3A, Vec3A};

use crate::{PhysState, consts, consts::heatseeker};

/// Homing state, only updated in [`crate::GameMode::Heatseeker`]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeatseekerInfo {
    /// +1 homes on the orange net, -1 on the blue net, 0 before the first touch
    pub y_target_dir: f32,
    /// Speed the ball is steered towards, raised by each retargeting touch
    pub cur_target_speed: f32,
    /// Seconds since the last retargeting touch
    pub time_since_hit: f32,
}

impl Default for HeatseekerInfo {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl HeatseekerInfo {
    pub const DEFAULT: Self = Self {
        y_target_dir: 0.,
        cur_target_speed: heatseeker::INITIAL_TARGET_SPEED,
        time_since_hit: 0.,
    };
}

/// The car that touched the ball last, and when
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BallLastHit {
    pub car_id: u64,
    pub tick_count: u64,
}

/// The ball's public state in UU; rotation is only integrated when the arena was
/// built with `no_ball_rot` off
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BallState {
    pub phys: PhysState,
    pub hs_info: HeatseekerInfo,
    /// `None` until a car touches the ball, and again after kickoff resets
    pub last_hit: Option<BallLastHit>,
}

impl Default for BallState {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BallState {
    pub const DEFAULT: Self = Self {
        phys: PhysState {
            pos: Vec3A::new(0.0, 0.0, consts::ball::REST_Z),
            rot_mat: Mat3A::IDENTITY,
            vel: Vec3A::ZERO,
            ang_vel: Vec3A::ZERO,
        },
        hs_info: HeatseekerInfo::DEFAULT,
        last_hit: None,
    };

    /// Id of the last car to touch the ball, or 0 if none has
    #[must_use]
    pub fn last_hit_car_id(&self) -> u64 {
        self.last_hit.map_or(0, |hit| hit.car_id)
    }
}

impl Deref for BallState {
    type Target = PhysState;
    fn deref(&self) -> &Self::Target {
        &self.phys
    }
}

impl DerefMut for BallState {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.phys
    }
}
