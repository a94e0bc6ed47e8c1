//! Game constants, mostly in Unreal Units (UU) unless suffixed with `_BT`

use glam::Vec3A;

pub use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

/// BulletPhysics Units (1m) to Unreal Units (2cm) conversion scale
pub const BT_TO_UU: f32 = 50.0;

/// Unreal Units (2cm) to BulletPhysics Units (1m) conversion scale
pub const UU_TO_BT: f32 = 1.0 / 50.0;

pub const GRAVITY_Z: f32 = -650.0;

pub const ARENA_EXTENT_X: f32 = 4096.0;
/// Does not include inner-goal
pub const ARENA_EXTENT_Y: f32 = 5120.0;
pub const ARENA_HEIGHT: f32 = 2048.0;
/// Distance between the side walls and back walls where the 45 degree corner cuts meet
pub const ARENA_CORNER_SUM: f32 = 8064.0;

pub const ARENA_COLLISION_BASE_FRICTION: f32 = 0.6;
pub const ARENA_COLLISION_BASE_RESTITUTION: f32 = 0.3;

/// Contacts shallower than this keep their velocity instead of bouncing
pub const RESTING_CONTACT_SPEED: f32 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionCoefs {
    pub friction: f32,
    pub restitution: f32,
}

pub mod goal {
    pub const SOCCAR_GOAL_SCORE_BASE_THRESHOLD_Y: f32 = 5124.25;
    pub const HALF_WIDTH: f32 = 892.755;
    pub const HEIGHT: f32 = 642.775;
    /// Y of the back of the net
    pub const BACK_Y: f32 = 6000.0;
}

pub mod car {
    use super::CollisionCoefs;

    pub const MASS_BT: f32 = 180.0;
    pub const MAX_SPEED: f32 = 2300.0;
    pub const MAX_ANG_SPEED: f32 = 5.5;

    pub const BALL_COEFS: CollisionCoefs = CollisionCoefs {
        friction: 2.0,
        restitution: 0.0,
    };
    pub const CAR_COEFS: CollisionCoefs = CollisionCoefs {
        friction: 0.09,
        restitution: 0.1,
    };
    pub const HIT_WORLD_COEFS: CollisionCoefs = CollisionCoefs {
        friction: 0.3,
        restitution: 0.3,
    };

    pub mod supersonic {
        pub const START_SPEED: f32 = 2200.0;
        pub const MAINTAIN_MIN_SPEED: f32 = START_SPEED - 100.0;
        pub const MAINTAIN_MAX_TIME: f32 = 1.0;
    }

    pub mod drive {
        use super::MASS_BT;

        pub const THROTTLE_TORQUE_AMOUNT: f32 = MASS_BT * 400.0;
        pub const BRAKE_TORQUE_AMOUNT: f32 = MASS_BT * (14.25 + (1.0 / 3.0));
        /// If we are costing with less than this forward vel, we full-brake
        pub const STOPPING_FORWARD_VEL: f32 = 25.0;
        /// How much the brake is applied when costing
        pub const COASTING_BRAKE_FACTOR: f32 = 0.15;
        /// If we are braking and moving faster than this, disable throttle
        pub const BRAKING_NO_THROTTLE_SPEED_THRESH: f32 = 0.01;
        /// Throttle input of less than this is ignored
        pub const THROTTLE_DEADZONE: f32 = 0.001;
        pub const THROTTLE_AIR_ACCEL: f32 = 200.0 / 3.0;
        pub const POWERSLIDE_RISE_RATE: f32 = 5.0;
        pub const POWERSLIDE_FALL_RATE: f32 = 2.0;
    }

    pub mod jump {
        pub const ACCEL: f32 = 4375.0 / 3.0;
        pub const IMMEDIATE_FORCE: f32 = 875.0 / 3.0;
        pub const MIN_TIME: f32 = 0.025;
        pub const RESET_TIME_PAD: f32 = 1.0 / 40.0;
        pub const MAX_TIME: f32 = 0.2;
        /// Can be at most 1.25 seconds after the jump is finished
        pub const DOUBLEJUMP_MAX_DELAY: f32 = 1.25;
    }

    pub mod flip {
        /// Flip z-velocity damping per 1/120th of a second
        pub const Z_DAMP_120: f32 = 0.35;
        pub const Z_DAMP_START: f32 = 0.15;
        pub const Z_DAMP_END: f32 = 0.21;
        pub const TORQUE_TIME: f32 = 0.65;
        pub const PITCHLOCK_EXTRA_TIME: f32 = 0.3;
        pub const INITIAL_VEL_SCALE: f32 = 500.0;
        pub const TORQUE_X: f32 = 260.0;
        pub const TORQUE_Y: f32 = 224.0;
        pub const FORWARD_IMPULSE_MAX_SPEED_SCALE: f32 = 1.0;
        pub const SIDE_IMPULSE_MAX_SPEED_SCALE: f32 = 1.9;
        pub const BACKWARD_IMPULSE_MAX_SPEED_SCALE: f32 = 2.5;
        pub const BACKWARD_IMPULSE_SCALE_X: f32 = 16.0 / 15.0;
    }

    pub mod air_control {
        use glam::Vec3A;

        /// Pitch, yaw, roll
        pub const TORQUE: Vec3A = Vec3A::new(130.0, 95.0, 400.0);
        /// Pitch, yaw, roll
        pub const DAMPING: Vec3A = Vec3A::new(30.0, 20.0, 50.0);
        pub const TORQUE_APPLY_SCALE: f32 = (super::super::TAU / 65536.0) * 1000.0;
    }

    pub mod autoflip {
        pub const IMPULSE: f32 = 200.0;
        pub const TORQUE: f32 = 50.0;
        pub const TIME: f32 = 0.4;
        pub const NORM_Z_THRESH: f32 = std::f32::consts::FRAC_1_SQRT_2;
        pub const ROLL_THRESH: f32 = 2.8;
    }

    pub mod autoroll {
        pub const FORCE: f32 = 100.0;
        pub const TORQUE: f32 = 80.0;
    }

    pub mod boost {
        pub const MAX: f32 = 100.0;
        pub const USED_PER_SECOND: f32 = MAX / 3.0;
        /// Minimum time we can be boosting for
        pub const MIN_TIME: f32 = 0.1;
        pub const ACCEL_GROUND: f32 = 2975.0 / 3.0;
        pub const ACCEL_AIR: f32 = 3175.0 / 3.0;
        pub const SPAWN_AMOUNT: f32 = MAX / 3.0;
        pub const RECHARGE_PER_SECOND: f32 = 10.0;
        pub const RECHARGE_DELAY: f32 = 0.25;
    }

    pub mod bump {
        pub const COOLDOWN_TIME: f32 = 0.25;
        /// Minimum local forward distance of the contact point for the hit to count as a bumper hit
        pub const MIN_FORWARD_DIST: f32 = 64.5;
    }

    pub mod spawn {
        use crate::GameMode;

        use super::super::{FRAC_PI_2, FRAC_PI_4};

        #[derive(Clone, Copy, Debug, PartialEq)]
        pub struct CarSpawnPos {
            pub x: f32,
            pub y: f32,
            pub yaw_ang: f32,
        }

        impl CarSpawnPos {
            #[must_use]
            pub const fn new(x: f32, y: f32, yaw_ang: f32) -> Self {
                Self { x, y, yaw_ang }
            }
        }

        pub const SPAWN_Z: f32 = 17.0;
        pub const RESPAWN_Z: f32 = 36.0;
        pub const RESPAWN_TIME: f32 = 3.0;
        /// Extra Y offset for each additional car that shares a respawn location on kickoff
        pub const EXTRA_OFFSET_Y: f32 = 250.0;

        pub const LOCATIONS_SOCCAR: [CarSpawnPos; 5] = [
            CarSpawnPos::new(-2048.0, -2560.0, FRAC_PI_4),
            CarSpawnPos::new(2048.0, -2560.0, FRAC_PI_4 * 3.0),
            CarSpawnPos::new(-256.0, -3840.0, FRAC_PI_2),
            CarSpawnPos::new(256.0, -3840.0, FRAC_PI_2),
            CarSpawnPos::new(0.0, -4608.0, FRAC_PI_2),
        ];

        pub const LOCATIONS_HEATSEEKER: [CarSpawnPos; 4] = [
            CarSpawnPos::new(-1000.0, -4620.0, FRAC_PI_2),
            CarSpawnPos::new(1000.0, -4620.0, FRAC_PI_2),
            CarSpawnPos::new(-2000.0, -4620.0, FRAC_PI_2),
            CarSpawnPos::new(2000.0, -4620.0, FRAC_PI_2),
        ];

        pub const RESPAWN_LOCATIONS_SOCCAR: [CarSpawnPos; 4] = [
            CarSpawnPos::new(-2304.0, -4608.0, FRAC_PI_2),
            CarSpawnPos::new(-2688.0, -4608.0, FRAC_PI_2),
            CarSpawnPos::new(2304.0, -4608.0, FRAC_PI_2),
            CarSpawnPos::new(2688.0, -4608.0, FRAC_PI_2),
        ];

        /// Kickoff locations for the blue team
        #[must_use]
        pub const fn get_locations(game_mode: GameMode) -> &'static [CarSpawnPos] {
            match game_mode {
                GameMode::Heatseeker => &LOCATIONS_HEATSEEKER,
                _ => &LOCATIONS_SOCCAR,
            }
        }

        /// Respawn locations for the blue team
        #[must_use]
        pub const fn get_respawn_locations(_game_mode: GameMode) -> &'static [CarSpawnPos] {
            &RESPAWN_LOCATIONS_SOCCAR
        }
    }
}

pub mod ball {
    use super::CollisionCoefs;
    use crate::GameMode;

    pub const MASS_BT: f32 = 30.0;
    pub const RADIUS_SOCCAR: f32 = 91.25;
    pub const REST_Z: f32 = 93.15;
    pub const MAX_SPEED: f32 = 6000.0;
    pub const MAX_ANG_SPEED: f32 = 6.0;
    /// Linear damping, applied as `vel *= (1 - DRAG)^dt`
    pub const DRAG: f32 = 0.03;
    /// Quadratic air resistance, as deceleration per squared UU/s of speed
    pub const AIR_RESISTANCE: f32 = 2.0e-6;
    pub const ANGULAR_DAMPING: f32 = 0.005;
    pub const COEFS: CollisionCoefs = CollisionCoefs {
        friction: 0.35,
        restitution: 0.6,
    };

    pub mod car_hit_impulse {
        pub const Z_SCALE_NORMAL: f32 = 0.35;
        pub const FORWARD_SCALE: f32 = 0.65;
        pub const MAX_DELTA_VEL_UU: f32 = 4600.0;
    }

    #[must_use]
    pub const fn get_radius(_game_mode: GameMode) -> f32 {
        RADIUS_SOCCAR
    }
}

pub mod heatseeker {
    use glam::Vec3A;

    use super::PI;

    pub const INITIAL_TARGET_SPEED: f32 = 2900.0;
    pub const TARGET_SPEED_INCREMENT: f32 = 85.0;
    pub const MIN_SPEEDUP_INTERVAL: f32 = 1.0;
    pub const TARGET_Y: f32 = 5120.0;
    pub const TARGET_Z: f32 = 320.0;
    pub const HORIZONTAL_BLEND: f32 = 1.45;
    pub const VERTICAL_BLEND: f32 = 0.78;
    pub const SPEED_BLEND: f32 = 0.3;
    pub const MAX_TURN_PITCH: f32 = 7000.0 * PI / 32768.0;
    pub const MAX_SPEED: f32 = 4600.0;
    pub const BALL_START_POS: Vec3A = Vec3A::new(-1000.0, -2220.0, 92.75);
    pub const BALL_START_VEL: Vec3A = Vec3A::new(0.0, -65.0, 650.0);
}

pub mod bullet_vehicle {
    pub const SUSPENSION_FORCE_SCALE_FRONT: f32 = 36.0 - 0.25;
    pub const SUSPENSION_FORCE_SCALE_BACK: f32 = 54.0 + 0.25 + 0.015;
    pub const SUSPENSION_STIFFNESS: f32 = 500.0;
    pub const WHEELS_DAMPING_COMPRESSION: f32 = 25.0;
    pub const WHEELS_DAMPING_RELAXATION: f32 = 40.0;
    /// UU, not BT
    pub const MAX_SUSPENSION_TRAVEL: f32 = 12.0;
    /// BT, not UU
    pub const SUSPENSION_SUBTRACTION: f32 = 0.05;
    pub const ROLLING_FRICTION_SCALE: f32 = 113.739_63;
    /// Scale of the velocity-based contact damping used for wheel side friction
    pub const CONTACT_DAMPING: f32 = -0.2;
}

pub mod boost_pads {
    pub const CYL_HEIGHT: f32 = 95.0;
    pub const CYL_RAD_BIG: f32 = 208.0;
    pub const CYL_RAD_SMALL: f32 = 144.0;

    pub const BOX_HEIGHT: f32 = 64.0;
    pub const BOX_RAD_BIG: f32 = 160.0;
    pub const BOX_RAD_SMALL: f32 = 120.0;

    pub const COOLDOWN_BIG: f32 = 10.0;
    pub const COOLDOWN_SMALL: f32 = 4.0;

    pub const BOOST_AMOUNT_BIG: f32 = 100.0;
    pub const BOOST_AMOUNT_SMALL: f32 = 12.0;
}

pub mod boostpads {
    use glam::Vec3A;

    pub const LOCS_AMOUNT_BIG: usize = 6;
    pub const LOCS_AMOUNT_SMALL_SOCCAR: usize = 28;

    pub const LOCS_BIG_SOCCAR: [Vec3A; LOCS_AMOUNT_BIG] = [
        Vec3A::new(-3584.0, 0.0, 73.0),
        Vec3A::new(3584.0, 0.0, 73.0),
        Vec3A::new(-3072.0, 4096.0, 73.0),
        Vec3A::new(3072.0, 4096.0, 73.0),
        Vec3A::new(-3072.0, -4096.0, 73.0),
        Vec3A::new(3072.0, -4096.0, 73.0),
    ];

    pub const LOCS_SMALL_SOCCAR: [Vec3A; LOCS_AMOUNT_SMALL_SOCCAR] = [
        Vec3A::new(0.0, -4240.0, 70.0),
        Vec3A::new(-1792.0, -4184.0, 70.0),
        Vec3A::new(1792.0, -4184.0, 70.0),
        Vec3A::new(-940.0, -3308.0, 70.0),
        Vec3A::new(940.0, -3308.0, 70.0),
        Vec3A::new(0.0, -2816.0, 70.0),
        Vec3A::new(-3584.0, -2484.0, 70.0),
        Vec3A::new(3584.0, -2484.0, 70.0),
        Vec3A::new(-1788.0, -2300.0, 70.0),
        Vec3A::new(1788.0, -2300.0, 70.0),
        Vec3A::new(-2048.0, -1036.0, 70.0),
        Vec3A::new(0.0, -1024.0, 70.0),
        Vec3A::new(2048.0, -1036.0, 70.0),
        Vec3A::new(-1024.0, 0.0, 70.0),
        Vec3A::new(1024.0, 0.0, 70.0),
        Vec3A::new(-2048.0, 1036.0, 70.0),
        Vec3A::new(0.0, 1024.0, 70.0),
        Vec3A::new(2048.0, 1036.0, 70.0),
        Vec3A::new(-1788.0, 2300.0, 70.0),
        Vec3A::new(1788.0, 2300.0, 70.0),
        Vec3A::new(-3584.0, 2484.0, 70.0),
        Vec3A::new(3584.0, 2484.0, 70.0),
        Vec3A::new(0.0, 2816.0, 70.0),
        Vec3A::new(-940.0, 3310.0, 70.0),
        Vec3A::new(940.0, 3308.0, 70.0),
        Vec3A::new(-1792.0, 4184.0, 70.0),
        Vec3A::new(1792.0, 4184.0, 70.0),
        Vec3A::new(0.0, 4240.0, 70.0),
    ];
}

pub mod curves {
    use crate::LinearPieceCurve;

    pub const STEER_ANGLE_FROM_SPEED: LinearPieceCurve<6> = LinearPieceCurve::new([
        (0.0, 0.533_56),
        (500.0, 0.319_30),
        (1000.0, 0.182_03),
        (1500.0, 0.105_70),
        (1750.0, 0.085_07),
        (3000.0, 0.034_54),
    ]);

    pub const STEER_ANGLE_FROM_SPEED_THREEWHEEL: LinearPieceCurve<2> =
        LinearPieceCurve::new([(0.0, 0.342_473), (2300.0, 0.034_837)]);

    pub const POWERSLIDE_STEER_ANGLE_FROM_SPEED: LinearPieceCurve<2> =
        LinearPieceCurve::new([(0.0, 0.392_35), (2500.0, 0.126_10)]);

    pub const DRIVE_SPEED_TORQUE_FACTOR: LinearPieceCurve<3> =
        LinearPieceCurve::new([(0.0, 1.0), (1400.0, 0.1), (1410.0, 0.0)]);

    pub const NON_STICKY_FRICTION_FACTOR: LinearPieceCurve<3> =
        LinearPieceCurve::new([(0.0, 0.1), (0.7075, 0.5), (1.0, 1.0)]);

    pub const LAT_FRICTION: LinearPieceCurve<2> = LinearPieceCurve::new([(0.0, 1.0), (1.0, 0.2)]);

    pub const LAT_FRICTION_THREEWHEEL: LinearPieceCurve<2> =
        LinearPieceCurve::new([(0.0, 0.30), (1.0, 0.25)]);

    pub const HANDBRAKE_LAT_FRICTION_FACTOR: f32 = 0.9;

    pub const HANDBRAKE_LONG_FRICTION_FACTOR: LinearPieceCurve<2> =
        LinearPieceCurve::new([(0.0, 0.5), (1.0, 0.9)]);

    pub const BALL_CAR_EXTRA_IMPULSE_FACTOR: LinearPieceCurve<4> = LinearPieceCurve::new([
        (0.0, 0.65),
        (500.0, 0.65),
        (2300.0, 0.55),
        (4600.0, 0.30),
    ]);

    pub const BUMP_VEL_AMOUNT_GROUND: LinearPieceCurve<3> =
        LinearPieceCurve::new([(0.0, 5.0 / 6.0), (1400.0, 1100.0), (2200.0, 1530.0)]);

    pub const BUMP_VEL_AMOUNT_AIR: LinearPieceCurve<3> =
        LinearPieceCurve::new([(0.0, 5.0 / 6.0), (1400.0, 1390.0), (2200.0, 1945.0)]);

    pub const BUMP_UPWARD_VEL_AMOUNT: LinearPieceCurve<3> =
        LinearPieceCurve::new([(0.0, 2.0 / 6.0), (1400.0, 278.0), (2200.0, 417.0)]);
}

/// Unit vector scale that mirrors a position or velocity into the other team's half
pub const MIRROR_SCALE: Vec3A = Vec3A::new(-1.0, -1.0, 1.0);

