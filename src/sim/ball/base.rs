use glam::{Affine3A, Vec3A};

use crate::{
    Angle, BallState, GameMode, MutatorConfig,
    collision::ArenaGeometry,
    consts::{self, BT_TO_UU, RESTING_CONTACT_SPEED, UU_TO_BT, heatseeker},
    dynamics::{RigidBody, RigidBodyConstructionInfo, resolve_contact, sphere_local_inertia},
};

#[derive(Clone, Debug)]
pub(crate) struct Ball {
    pub state: BallState,
    pub rigid_body: RigidBody,
    /// In BT, applied in [`Ball::finish_physics_tick`]
    pub velocity_impulse_cache: Vec3A,
    radius_bt: f32,
}

impl Ball {
    pub fn new(mutator_config: &MutatorConfig, no_rot: bool) -> Self {
        let radius_bt = mutator_config.ball_radius * UU_TO_BT;

        let mut info = RigidBodyConstructionInfo::new(
            mutator_config.ball_mass,
            sphere_local_inertia(mutator_config.ball_mass, radius_bt),
        );
        info.start_world_transform.translation.z = consts::ball::REST_Z * UU_TO_BT;
        info.linear_damping = mutator_config.ball_drag;
        info.angular_damping = consts::ball::ANGULAR_DAMPING;
        info.no_rot = no_rot;

        let mut rigid_body = RigidBody::new(info);
        rigid_body.set_gravity(mutator_config.gravity * UU_TO_BT);

        Self {
            state: BallState::DEFAULT,
            rigid_body,
            velocity_impulse_cache: Vec3A::ZERO,
            radius_bt,
        }
    }

    #[inline]
    pub const fn radius_bt(&self) -> f32 {
        self.radius_bt
    }

    pub fn set_state(&mut self, state: BallState) {
        let rb = &mut self.rigid_body;
        rb.set_world_transform(Affine3A {
            matrix3: state.phys.rot_mat,
            translation: state.phys.pos * UU_TO_BT,
        });

        rb.linear_velocity = state.phys.vel * UU_TO_BT;
        rb.angular_velocity = state.phys.ang_vel;
        rb.clear_forces();

        self.velocity_impulse_cache = Vec3A::ZERO;
        self.state = state;
    }

    pub fn apply_mutator_config(&mut self, mutator_config: &MutatorConfig) {
        let rb = &mut self.rigid_body;

        let radius_bt = mutator_config.ball_radius * UU_TO_BT;
        if radius_bt != self.radius_bt || rb.get_mass() != mutator_config.ball_mass {
            self.radius_bt = radius_bt;
            rb.inverse_mass = 1.0 / mutator_config.ball_mass;
            rb.inv_inertia_local = 1.0 / sphere_local_inertia(mutator_config.ball_mass, radius_bt);
            rb.update_inertia_tensor();
        }

        rb.linear_damping = mutator_config.ball_drag;
        rb.set_gravity(mutator_config.gravity * UU_TO_BT);
    }

    /// Heatseeker homing: steer the velocity towards the target net and blend the speed
    /// towards the current target speed
    pub fn pre_tick_update(&mut self, game_mode: GameMode, tick_time: f32) {
        if game_mode != GameMode::Heatseeker {
            return;
        }

        let hs_info = &mut self.state.hs_info;
        if hs_info.y_target_dir == 0.0 {
            return;
        }

        let rb = &mut self.rigid_body;
        let vel = rb.linear_velocity * BT_TO_UU;
        let cur_speed = vel.length();
        if cur_speed == 0.0 {
            return;
        }

        let vel_angle = Angle::from_vec(vel);

        let goal_target_pos = Vec3A::new(
            0.0,
            heatseeker::TARGET_Y * hs_info.y_target_dir,
            heatseeker::TARGET_Z,
        );
        let ball_to_goal = goal_target_pos - rb.transform.translation * BT_TO_UU;
        let delta_angle = Angle::from_vec(ball_to_goal) - vel_angle;

        let speed_ratio = cur_speed / heatseeker::MAX_SPEED;

        let mut new_angle = vel_angle;
        new_angle.yaw += delta_angle.yaw * speed_ratio * heatseeker::HORIZONTAL_BLEND * tick_time;
        new_angle.pitch += delta_angle.pitch * speed_ratio * heatseeker::VERTICAL_BLEND * tick_time;
        new_angle = new_angle.normalize_fix();
        new_angle.pitch = new_angle
            .pitch
            .clamp(-heatseeker::MAX_TURN_PITCH, heatseeker::MAX_TURN_PITCH);

        let new_speed = cur_speed + (hs_info.cur_target_speed - cur_speed) * heatseeker::SPEED_BLEND;

        rb.linear_velocity = new_angle.get_forward_vec() * new_speed * UU_TO_BT;
        hs_info.time_since_hit += tick_time;
    }

    /// Gravity, linear drag and quadratic air resistance
    pub fn integrate_velocities(&mut self, tick_time: f32, air_resistance: f32) {
        let rb = &mut self.rigid_body;
        rb.integrate_velocities(tick_time);

        if air_resistance > 0.0 {
            let speed_uu = rb.linear_velocity.length() * BT_TO_UU;
            if speed_uu > 0.0 {
                let speed_loss = (air_resistance * speed_uu * speed_uu * tick_time).min(speed_uu);
                rb.linear_velocity *= 1.0 - speed_loss / speed_uu;
            }
        }
    }

    /// Moves the ball in `sub_steps` equal steps, resolving its contacts with the arena
    /// after each one
    pub fn integrate_transform(
        &mut self,
        geometry: &ArenaGeometry,
        tick_time: f32,
        sub_steps: u32,
        mutator_config: &MutatorConfig,
    ) {
        let coefs = consts::CollisionCoefs {
            friction: mutator_config.ball_world_friction,
            restitution: mutator_config.ball_world_restitution,
        };

        let sub_step_time = tick_time / sub_steps as f32;
        for _ in 0..sub_steps {
            self.rigid_body.integrate_transform(sub_step_time);

            let contacts = geometry.sphere_contacts(self.rigid_body.transform.translation, self.radius_bt);
            for contact in &contacts {
                resolve_contact(
                    &mut self.rigid_body,
                    None,
                    contact,
                    coefs,
                    const { RESTING_CONTACT_SPEED * UU_TO_BT },
                );
            }
        }
    }

    pub fn finish_physics_tick(&mut self, mutator_config: &MutatorConfig) {
        let rb = &mut self.rigid_body;

        if self.velocity_impulse_cache != Vec3A::ZERO {
            rb.linear_velocity += self.velocity_impulse_cache;
            self.velocity_impulse_cache = Vec3A::ZERO;
        }

        rb.clamp_speeds(
            mutator_config.ball_max_speed * UU_TO_BT,
            consts::ball::MAX_ANG_SPEED,
        );
        rb.assert_finite("ball");

        self.state.phys.pos = rb.transform.translation * BT_TO_UU;
        self.state.phys.rot_mat = rb.transform.matrix3;
        self.state.phys.vel = rb.linear_velocity * BT_TO_UU;
        self.state.phys.ang_vel = rb.angular_velocity;
    }
}
