use glam::{Mat3A, Vec3A};
use rocketsim_core::{Arena, BallState, CarConfig, CarControls, CarState, Team, consts};

#[derive(Debug, Clone)]
pub struct CarSetup {
    pub team: Team,
    pub config: CarConfig,
    pub controls: CarControls,

    pub pos: Vec3A,
    pub rot_mat: Mat3A,
    pub vel: Vec3A,
    pub ang_vel: Vec3A,

    pub boost: f32,
}

impl CarSetup {
    pub const fn new(team: Team, pos: Vec3A) -> Self {
        Self {
            team,
            config: CarConfig::OCTANE,
            controls: CarControls::DEFAULT,
            pos,
            rot_mat: Mat3A::IDENTITY,
            vel: Vec3A::ZERO,
            ang_vel: Vec3A::ZERO,
            boost: consts::car::boost::SPAWN_AMOUNT,
        }
    }

    pub const fn with_config(mut self, config: CarConfig) -> Self {
        self.config = config;
        self
    }

    pub const fn with_controls(mut self, controls: CarControls) -> Self {
        self.controls = controls;
        self
    }

    pub const fn with_rot(mut self, rot: Mat3A) -> Self {
        self.rot_mat = rot;
        self
    }

    pub const fn with_vel(mut self, vel: Vec3A) -> Self {
        self.vel = vel;
        self
    }

    pub const fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    pub fn make_initial_car_state(&self) -> CarState {
        let mut result = CarState::DEFAULT;
        result.phys.pos = self.pos;
        result.phys.rot_mat = self.rot_mat;
        result.phys.vel = self.vel;
        result.phys.ang_vel = self.ang_vel;

        result.controls = self.controls;
        result.boost = self.boost;
        result
    }

    /// Adds the car to `arena` in this exact state, returning its id
    pub fn spawn(&self, arena: &mut Arena) -> u64 {
        let id = arena.add_car(self.team, self.config).unwrap();
        arena.set_car_state(id, &self.make_initial_car_state()).unwrap();
        arena.set_car_controls(id, self.controls).unwrap();
        id
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BallSetup {
    pub pos: Vec3A,
    pub vel: Vec3A,
    pub ang_vel: Vec3A,
}

impl BallSetup {
    pub const fn new(pos: Vec3A) -> Self {
        Self {
            pos,
            vel: Vec3A::ZERO,
            ang_vel: Vec3A::ZERO,
        }
    }

    pub const fn with_vel(mut self, vel: Vec3A) -> Self {
        self.vel = vel;
        self
    }

    pub const fn with_ang_vel(mut self, ang_vel: Vec3A) -> Self {
        self.ang_vel = ang_vel;
        self
    }

    pub const fn make_ball_state(&self) -> BallState {
        let mut result = BallState::DEFAULT;
        result.phys.pos = self.pos;
        result.phys.vel = self.vel;
        result.phys.ang_vel = self.ang_vel;
        result
    }

    pub fn apply(&self, arena: &mut Arena) {
        arena.set_ball_state(self.make_ball_state()).unwrap();
    }
}
