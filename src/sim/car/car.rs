use std::f32::consts::PI;

use fastrand::Rng;
use glam::{Affine3A, EulerRot, Mat3A, Vec3A};

use crate::{
    CarConfig, CarControls, CarState, CarStats, GameMode, MutatorConfig, PhysState, Team,
    collision::{ArenaGeometry, Obb},
    consts::{
        BT_TO_UU, GRAVITY_Z, UU_TO_BT, car as car_consts, car::drive as drive_consts, curves,
    },
    dynamics::{RigidBody, RigidBodyConstructionInfo, Vehicle, box_local_inertia},
};

/// Scales an acceleration in UU/s^2 into a BT force on the car
const ACCEL_TO_FORCE: f32 = UU_TO_BT * car_consts::MASS_BT;

#[derive(Clone, Debug)]
pub struct Car {
    id: u64,
    team: Team,
    config: CarConfig,
    pub(crate) rigid_body: RigidBody,
    pub(crate) vehicle: Vehicle,
    /// Velocity (BT) added once the tick's physics are done, so that contact handlers
    /// can't influence each other within the same tick
    pub(crate) velocity_impulse_cache: Vec3A,
    pub(crate) state: CarState,
    pub(crate) stats: CarStats,
}

impl Car {
    pub(crate) fn new(id: u64, team: Team, config: CarConfig, mutator_config: &MutatorConfig) -> Self {
        let half_extent = config.hitbox_half_extent_bt();
        let mut info = RigidBodyConstructionInfo::new(
            mutator_config.car_mass,
            box_local_inertia(mutator_config.car_mass, half_extent),
        );
        info.start_world_transform = Affine3A::from_translation(
            (Vec3A::new(0.0, 0.0, car_consts::spawn::SPAWN_Z) * UU_TO_BT).into(),
        );

        let mut rigid_body = RigidBody::new(info);
        rigid_body.set_gravity(mutator_config.gravity * UU_TO_BT);

        let vehicle = Vehicle::new(&rigid_body, config.wheel_setups());

        Self {
            id,
            team,
            config,
            rigid_body,
            vehicle,
            velocity_impulse_cache: Vec3A::ZERO,
            state: CarState {
                boost: mutator_config.car_spawn_boost_amount,
                ..CarState::DEFAULT
            },
            stats: CarStats::default(),
        }
    }

    /// Unique within the arena, never reused
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// Configuration for this car
    #[must_use]
    pub const fn config(&self) -> &CarConfig {
        &self.config
    }

    #[must_use]
    pub const fn get_state(&self) -> &CarState {
        &self.state
    }

    #[must_use]
    pub const fn stats(&self) -> &CarStats {
        &self.stats
    }

    /// Get the forward direction as a unit vector
    #[must_use]
    pub const fn get_forward_dir(&self) -> Vec3A {
        self.state.phys.rot_mat.x_axis
    }

    /// Get the rightward direction as a unit vector
    #[must_use]
    pub const fn get_right_dir(&self) -> Vec3A {
        self.state.phys.rot_mat.y_axis
    }

    /// Get the upward direction as a unit vector
    #[must_use]
    pub const fn get_up_dir(&self) -> Vec3A {
        self.state.phys.rot_mat.z_axis
    }

    /// - `respawn_delay` by default is `consts::car::spawn::RESPAWN_TIME`
    pub const fn demolish(&mut self, respawn_delay: f32) {
        self.state.is_demoed = true;
        self.state.demo_respawn_timer = respawn_delay;
    }

    /// Respawn the car on a random respawn spot of its team,
    /// called after we have been demolished and waited for the respawn timer
    pub(crate) fn respawn(&mut self, rng: &mut Rng, game_mode: GameMode, boost_amount: f32) {
        let respawn_locations = car_consts::spawn::get_respawn_locations(game_mode);
        let spawn_pos = respawn_locations[rng.usize(0..respawn_locations.len())];

        let new_state = CarState {
            phys: PhysState {
                pos: Vec3A::new(
                    spawn_pos.x,
                    spawn_pos.y * -self.team.get_y_dir(),
                    car_consts::spawn::RESPAWN_Z,
                ),
                rot_mat: Mat3A::from_euler(
                    EulerRot::YZX,
                    0.0,
                    spawn_pos.yaw_ang + if self.team == Team::Blue { 0.0 } else { PI },
                    0.0,
                ),
                vel: Vec3A::ZERO,
                ang_vel: Vec3A::ZERO,
            },
            boost: boost_amount,
            ..CarState::DEFAULT
        };

        self.set_state(&new_state);
    }

    pub(crate) fn set_state(&mut self, state: &CarState) {
        self.rigid_body.set_world_transform(Affine3A {
            matrix3: state.phys.rot_mat,
            translation: state.phys.pos * UU_TO_BT,
        });

        self.rigid_body.linear_velocity = state.phys.vel * UU_TO_BT;
        self.rigid_body.angular_velocity = state.phys.ang_vel;
        self.rigid_body.clear_forces();

        self.velocity_impulse_cache = Vec3A::ZERO;
        self.state = *state;
    }

    pub(crate) const fn set_controls(&mut self, controls: CarControls) {
        self.state.controls = controls;
    }

    pub(crate) fn apply_mutator_config(&mut self, mutator_config: &MutatorConfig) {
        if self.rigid_body.get_mass() != mutator_config.car_mass {
            self.rigid_body.set_mass(mutator_config.car_mass);
        }

        self.rigid_body.set_gravity(mutator_config.gravity * UU_TO_BT);
    }

    /// World-space hitbox, in BT
    #[must_use]
    pub(crate) fn hitbox(&self) -> Obb {
        Obb::new(
            &self.rigid_body.transform,
            self.config.hitbox_pos_offset * UU_TO_BT,
            self.config.hitbox_half_extent_bt(),
        )
    }

    fn update_wheels(&mut self, tick_time: f32, num_wheels_in_contact: u8, forward_speed_uu: f32) {
        let state = &mut self.state;
        let rb = &mut self.rigid_body;

        let handbrake_dir = if state.controls.handbrake { 1.0 } else { -1.0 };
        let handbrake_rate = if state.controls.handbrake {
            drive_consts::POWERSLIDE_RISE_RATE
        } else {
            drive_consts::POWERSLIDE_FALL_RATE
        };
        state.handbrake_val =
            (state.handbrake_val + handbrake_dir * handbrake_rate * tick_time).clamp(0.0, 1.0);

        let mut real_brake = 0.0;
        let real_throttle = if state.controls.boost && state.boost > 0.0 {
            1.0
        } else {
            state.controls.throttle
        };

        let abs_forward_speed_uu = forward_speed_uu.abs();
        let mut engine_throttle = real_throttle;
        if !state.controls.handbrake {
            if real_throttle.abs() >= drive_consts::THROTTLE_DEADZONE {
                if abs_forward_speed_uu > drive_consts::STOPPING_FORWARD_VEL
                    && real_throttle.signum() != forward_speed_uu.signum()
                {
                    // Full brake when throttling against the direction of travel
                    real_brake = 1.0;

                    if abs_forward_speed_uu > drive_consts::BRAKING_NO_THROTTLE_SPEED_THRESH {
                        engine_throttle = 0.0;
                    }
                }
            } else {
                engine_throttle = 0.0;
                real_brake = if abs_forward_speed_uu < drive_consts::STOPPING_FORWARD_VEL {
                    1.0
                } else {
                    drive_consts::COASTING_BRAKE_FACTOR
                };
            }
        }

        let mut drive_speed_scale =
            curves::DRIVE_SPEED_TORQUE_FACTOR.get_output(abs_forward_speed_uu);
        if num_wheels_in_contact < 3 {
            drive_speed_scale /= 4.0;
        }

        let drive_engine_force = engine_throttle
            * const { drive_consts::THROTTLE_TORQUE_AMOUNT * UU_TO_BT }
            * drive_speed_scale;
        let drive_brake_force = real_brake * const { drive_consts::BRAKE_TORQUE_AMOUNT * UU_TO_BT };
        for wheel in &mut self.vehicle.wheels {
            wheel.engine_force = drive_engine_force;
            wheel.brake = drive_brake_force;
        }

        let mut steer_angle = if self.config.three_wheels {
            curves::STEER_ANGLE_FROM_SPEED_THREEWHEEL.get_output(abs_forward_speed_uu)
        } else {
            curves::STEER_ANGLE_FROM_SPEED.get_output(abs_forward_speed_uu)
        };

        if state.handbrake_val != 0.0 {
            steer_angle += (curves::POWERSLIDE_STEER_ANGLE_FROM_SPEED
                .get_output(abs_forward_speed_uu)
                - steer_angle)
                * state.handbrake_val;
        }

        steer_angle *= state.controls.steer;
        self.vehicle.wheels[0].steer_angle = steer_angle;
        self.vehicle.wheels[1].steer_angle = steer_angle;

        for wheel in &mut self.vehicle.wheels {
            let info = &wheel.raycast_info;
            if !info.is_in_contact {
                continue;
            }

            let lat_dir = wheel.world_basis.y_axis;
            let long_dir = lat_dir.cross(info.contact_normal_ws);

            let wheel_delta = info.hard_point_ws - rb.transform.translation;
            let wheel_vel = rb.get_velocity_in_local_point(wheel_delta) * BT_TO_UU;

            let base_friction = wheel_vel.dot(lat_dir).abs();
            let friction_curve_input = if base_friction > 5.0 {
                base_friction / (wheel_vel.dot(long_dir).abs() + base_friction)
            } else {
                0.0
            };

            let mut lat_friction = if self.config.three_wheels {
                curves::LAT_FRICTION_THREEWHEEL
            } else {
                curves::LAT_FRICTION
            }
            .get_output(friction_curve_input);
            let mut long_friction = 1.0;

            if state.handbrake_val != 0.0 {
                let handbrake_amount = state.handbrake_val;
                lat_friction *= 1.0 - curves::HANDBRAKE_LAT_FRICTION_FACTOR * handbrake_amount;
                long_friction *= 1.0
                    + (curves::HANDBRAKE_LONG_FRICTION_FACTOR.get_output(friction_curve_input)
                        - 1.0)
                        * handbrake_amount;
            }

            if real_throttle == 0.0 {
                // Contact is not sticky
                let non_sticky_scale =
                    curves::NON_STICKY_FRICTION_FACTOR.get_output(info.contact_normal_ws.z);
                lat_friction *= non_sticky_scale;
                long_friction *= non_sticky_scale;
            }

            wheel.lat_friction = lat_friction;
            wheel.long_friction = long_friction;
        }

        if num_wheels_in_contact > 0 {
            let upwards_dir = self.vehicle.get_upwards_dir_from_wheel_contacts(rb);

            let full_stick =
                real_throttle != 0.0 || abs_forward_speed_uu > drive_consts::STOPPING_FORWARD_VEL;
            let mut sticky_force_scale = if self.config.three_wheels { 0.0 } else { 0.5 };
            if full_stick {
                sticky_force_scale += 1.0 - upwards_dir.z.abs();
            }

            rb.apply_central_force(
                upwards_dir * sticky_force_scale * const { GRAVITY_Z * ACCEL_TO_FORCE },
            );
        }
    }

    fn update_air_torque(&mut self, update_air_control: bool) {
        let dir_pitch = -self.get_right_dir();
        let dir_yaw = self.get_up_dir();
        let dir_roll = -self.get_forward_dir();

        let state = &mut self.state;
        let rb = &mut self.rigid_body;

        if state.is_flipping {
            state.is_flipping = state.has_flipped && state.flip_time < car_consts::flip::TORQUE_TIME;
        }

        let mut do_air_control = false;
        if state.is_flipping {
            if state.flip_rel_torque == Vec3A::ZERO {
                do_air_control = true;
            } else {
                let mut rel_dodge_torque = state.flip_rel_torque;

                let mut pitch_scale = 1.0;
                if rel_dodge_torque.y != 0.0
                    && state.controls.pitch != 0.0
                    && rel_dodge_torque.y.signum() == state.controls.pitch.signum()
                {
                    // Flip cancel
                    pitch_scale = 1.0 - state.controls.pitch.abs().min(1.0);
                    do_air_control = true;
                }

                rel_dodge_torque.y *= pitch_scale;
                let dodge_torque = rel_dodge_torque
                    * const { Vec3A::new(car_consts::flip::TORQUE_X, car_consts::flip::TORQUE_Y, 0.0) };

                let rb_torque =
                    rb.inertia_tensor_world() * (rb.transform.matrix3 * dodge_torque);
                rb.apply_torque(rb_torque);
            }
        } else {
            do_air_control = true;
        }

        do_air_control &= !state.is_auto_flipping;
        do_air_control &= update_air_control;
        if do_air_control {
            let controls = state.controls;
            let mut pitch_torque_scale = 1.0;
            let torque = if controls.pitch != 0.0 || controls.yaw != 0.0 || controls.roll != 0.0 {
                if state.is_flipping
                    || (state.has_flipped
                        && state.flip_time
                            < const {
                                car_consts::flip::TORQUE_TIME
                                    + car_consts::flip::PITCHLOCK_EXTRA_TIME
                            })
                {
                    pitch_torque_scale = 0.0;
                }

                controls.pitch * dir_pitch * pitch_torque_scale * car_consts::air_control::TORQUE.x
                    + controls.yaw * dir_yaw * car_consts::air_control::TORQUE.y
                    + controls.roll * dir_roll * car_consts::air_control::TORQUE.z
            } else {
                Vec3A::ZERO
            };

            let ang_vel = rb.angular_velocity;

            let damp_pitch = dir_pitch.dot(ang_vel)
                * car_consts::air_control::DAMPING.x
                * (1.0 - (controls.pitch * pitch_torque_scale).abs());
            let damp_yaw = dir_yaw.dot(ang_vel)
                * car_consts::air_control::DAMPING.y
                * (1.0 - controls.yaw.abs());
            let damp_roll = dir_roll.dot(ang_vel) * car_consts::air_control::DAMPING.z;

            let damping = dir_yaw * damp_yaw + dir_pitch * damp_pitch + dir_roll * damp_roll;

            let rb_torque = rb.inertia_tensor_world()
                * (torque - damping)
                * car_consts::air_control::TORQUE_APPLY_SCALE;
            rb.apply_torque(rb_torque);
        }

        if state.controls.throttle != 0.0 {
            rb.apply_central_force(
                rb.get_forward_vector()
                    * state.controls.throttle
                    * const { drive_consts::THROTTLE_AIR_ACCEL * ACCEL_TO_FORCE },
            );
        }
    }

    fn update_jump(&mut self, tick_time: f32, mutator_config: &MutatorConfig, jump_pressed: bool) {
        let up_dir = self.get_up_dir();
        let state = &mut self.state;
        let rb = &mut self.rigid_body;

        if state.is_on_ground && !state.is_jumping {
            // Don't reset the jump just yet if we might still be leaving the ground
            // after a minimum-time jump
            if !(state.has_jumped
                && state.jump_time
                    < const { car_consts::jump::MIN_TIME + car_consts::jump::RESET_TIME_PAD })
            {
                state.has_jumped = false;
                state.jump_time = 0.0;
            }
        }

        if state.is_jumping {
            state.is_jumping = state.jump_time < car_consts::jump::MIN_TIME
                || (state.controls.jump && state.jump_time < car_consts::jump::MAX_TIME);
        } else if state.is_on_ground && jump_pressed {
            state.is_jumping = true;
            state.jump_time = 0.0;
            rb.apply_central_impulse(
                up_dir * mutator_config.jump_immediate_force * ACCEL_TO_FORCE,
            );
        }

        if state.is_jumping {
            state.has_jumped = true;

            let mut total_jump_force = up_dir * mutator_config.jump_accel;
            if state.jump_time < car_consts::jump::MIN_TIME {
                const JUMP_PRE_MIN_ACCEL_SCALE: f32 = 0.62;
                total_jump_force *= JUMP_PRE_MIN_ACCEL_SCALE;
            }

            rb.apply_central_force(total_jump_force * ACCEL_TO_FORCE);
        }

        if state.is_jumping || state.has_jumped {
            state.jump_time += tick_time;
        }
    }

    fn update_auto_flip(&mut self, tick_time: f32, jump_pressed: bool) {
        let forward_dir = self.get_forward_dir();
        let up_dir = self.get_up_dir();
        let state = &mut self.state;
        let rb = &mut self.rigid_body;

        if jump_pressed
            && state
                .world_contact_normal
                .is_some_and(|normal| normal.z > car_consts::autoflip::NORM_Z_THRESH)
        {
            let (_, _, roll) = state.phys.rot_mat.to_euler(EulerRot::YZX);
            let abs_roll = roll.abs();
            if abs_roll > car_consts::autoflip::ROLL_THRESH {
                state.auto_flip_timer = car_consts::autoflip::TIME * (abs_roll / PI);
                state.auto_flip_torque_scale = roll.signum();
                state.is_auto_flipping = true;

                rb.apply_central_impulse(
                    -up_dir * const { car_consts::autoflip::IMPULSE * ACCEL_TO_FORCE },
                );
            }
        }

        if state.is_auto_flipping {
            if state.auto_flip_timer <= 0.0 {
                state.is_auto_flipping = false;
                state.auto_flip_timer = 0.0;
            } else {
                rb.angular_velocity += forward_dir
                    * car_consts::autoflip::TORQUE
                    * state.auto_flip_torque_scale
                    * tick_time;
                state.auto_flip_timer -= tick_time;
            }
        }
    }

    fn update_double_jump_or_flip(
        &mut self,
        tick_time: f32,
        mutator_config: &MutatorConfig,
        jump_pressed: bool,
        forward_speed_uu: f32,
    ) {
        let forward_dir = self.get_forward_dir();
        let up_dir = self.get_up_dir();
        let dodge_deadzone = self.config.dodge_deadzone;
        let state = &mut self.state;
        let rb = &mut self.rigid_body;

        if state.is_on_ground {
            state.has_double_jumped = false;
            state.has_flipped = false;
            state.air_time = 0.0;
            state.air_time_since_jump = 0.0;
            state.flip_time = 0.0;
            return;
        }

        let tick_time_scale = tick_time / const { 1. / 120. };

        state.air_time += tick_time;

        if state.has_jumped && !state.is_jumping {
            state.air_time_since_jump += tick_time;
        } else {
            state.air_time_since_jump = 0.0;
        }

        if jump_pressed && state.air_time_since_jump < car_consts::jump::DOUBLEJUMP_MAX_DELAY {
            let controls = state.controls;
            let input_magnitude = controls.yaw.abs() + controls.pitch.abs() + controls.roll.abs();
            let is_flip_input = input_magnitude >= dodge_deadzone;

            let can_use = !state.is_auto_flipping && !state.has_double_jumped && !state.has_flipped
                || if is_flip_input {
                    mutator_config.unlimited_flips
                } else {
                    mutator_config.unlimited_double_jumps
                };

            if can_use && is_flip_input {
                state.flip_time = 0.0;
                state.has_flipped = true;
                state.is_flipping = true;

                let forward_speed_ratio = forward_speed_uu.abs() / car_consts::MAX_SPEED;
                let mut dodge_dir =
                    Vec3A::new(-controls.pitch, controls.yaw + controls.roll, 0.0);

                if dodge_dir.x.abs() < 0.1 && dodge_dir.y.abs() < 0.1 {
                    dodge_dir = Vec3A::ZERO;
                } else {
                    dodge_dir = dodge_dir.normalize();
                }

                state.flip_rel_torque = Vec3A::new(-dodge_dir.y, dodge_dir.x, 0.0) / tick_time_scale;

                if dodge_dir.x.abs() < 0.1 {
                    dodge_dir.x = 0.0;
                }

                if dodge_dir.y.abs() < 0.1 {
                    dodge_dir.y = 0.0;
                }

                if dodge_dir.length_squared() > const { f32::EPSILON * f32::EPSILON } {
                    let should_dodge_backwards = if forward_speed_uu.abs() < 100. {
                        dodge_dir.x < 0.0
                    } else {
                        dodge_dir.x.signum() != forward_speed_uu.signum()
                    };

                    let max_speed_scale_x = if should_dodge_backwards {
                        car_consts::flip::BACKWARD_IMPULSE_MAX_SPEED_SCALE
                    } else {
                        car_consts::flip::FORWARD_IMPULSE_MAX_SPEED_SCALE
                    };

                    let mut initial_dodge_vel = dodge_dir * car_consts::flip::INITIAL_VEL_SCALE;
                    initial_dodge_vel.x *= ((max_speed_scale_x - 1.) * forward_speed_ratio) + 1.0;
                    initial_dodge_vel.y *= ((car_consts::flip::SIDE_IMPULSE_MAX_SPEED_SCALE - 1.)
                        * forward_speed_ratio)
                        + 1.0;
                    if should_dodge_backwards {
                        initial_dodge_vel.x *= car_consts::flip::BACKWARD_IMPULSE_SCALE_X;
                    }

                    let forward_dir_2d = forward_dir.with_z(0.0).normalize_or_zero();
                    let right_dir_2d = Vec3A::new(-forward_dir_2d.y, forward_dir_2d.x, 0.0);
                    let final_delta_vel =
                        initial_dodge_vel.x * forward_dir_2d + initial_dodge_vel.y * right_dir_2d;

                    rb.apply_central_impulse(final_delta_vel * ACCEL_TO_FORCE);
                }
            } else if can_use {
                rb.apply_central_impulse(
                    up_dir * mutator_config.jump_immediate_force * ACCEL_TO_FORCE,
                );
                state.has_double_jumped = true;
            }
        }

        if state.is_flipping {
            state.flip_time += tick_time;
            if state.flip_time <= car_consts::flip::TORQUE_TIME
                && state.flip_time >= car_consts::flip::Z_DAMP_START
                && (rb.linear_velocity.z < 0.0 || state.flip_time < car_consts::flip::Z_DAMP_END)
            {
                rb.linear_velocity.z *= (1. - car_consts::flip::Z_DAMP_120).powf(tick_time_scale);
            }
        } else if state.has_flipped {
            state.flip_time += tick_time;
        }
    }

    fn update_auto_roll(&mut self, num_wheels_in_contact: u8) {
        let rb = &mut self.rigid_body;
        let ground_up_dir = match self.state.world_contact_normal {
            Some(normal) if num_wheels_in_contact == 0 => normal,
            _ => self.vehicle.get_upwards_dir_from_wheel_contacts(rb),
        };
        let ground_down_dir = -ground_up_dir;

        let forward_dir = self.state.phys.rot_mat.x_axis;
        let right_dir = self.state.phys.rot_mat.y_axis;

        let cross_right_dir = ground_up_dir.cross(forward_dir);
        let cross_forward_dir = ground_down_dir.cross(cross_right_dir);

        let right_torque_factor = 1.0 - right_dir.dot(cross_right_dir).clamp(0.0, 1.0);
        let forward_torque_factor = 1.0 - forward_dir.dot(cross_forward_dir).clamp(0.0, 1.0);

        let torque_dir_right = forward_dir * -right_dir.dot(ground_up_dir).signum();
        let torque_dir_forward = right_dir * forward_dir.dot(ground_up_dir).signum();

        let torque_right = torque_dir_right * right_torque_factor;
        let torque_forward = torque_dir_forward * forward_torque_factor;

        rb.apply_central_force(ground_down_dir * const { car_consts::autoroll::FORCE * ACCEL_TO_FORCE });

        let rb_torque = rb.inertia_tensor_world()
            * (torque_forward + torque_right)
            * car_consts::autoroll::TORQUE;
        rb.apply_torque(rb_torque);
    }

    fn update_boost(&mut self, tick_time: f32, mutator_config: &MutatorConfig) {
        let state = &mut self.state;
        let rb = &mut self.rigid_body;

        state.is_boosting = if state.boost > 0.0 {
            state.controls.boost
                || (state.is_boosting && state.boosting_time < car_consts::boost::MIN_TIME)
        } else {
            false
        };

        if state.is_boosting {
            state.boosting_time += tick_time;
            state.time_since_boosted = 0.0;
            state.boost -= mutator_config.boost_used_per_second * tick_time;

            let accel = if state.is_on_ground {
                mutator_config.boost_accel_ground
            } else {
                mutator_config.boost_accel_air
            };

            rb.apply_central_force(rb.get_forward_vector() * accel * ACCEL_TO_FORCE);
        } else {
            state.boosting_time = 0.0;
            state.time_since_boosted += tick_time;

            if mutator_config.recharge_boost_enabled
                && state.time_since_boosted >= mutator_config.recharge_boost_delay
            {
                state.boost += mutator_config.recharge_boost_per_second * tick_time;
            }
        }

        state.boost = state.boost.clamp(0.0, mutator_config.car_max_boost_amount);
    }

    /// Everything driven by the car's own inputs: respawning, wheels, jumps, flips, boost.
    ///
    /// Forces and torques are accumulated on the rigid body, impulses are applied immediately.
    pub(crate) fn pre_tick_update(
        &mut self,
        geometry: &ArenaGeometry,
        rng: &mut Rng,
        game_mode: GameMode,
        tick_time: f32,
        mutator_config: &MutatorConfig,
    ) {
        if self.state.is_demoed {
            self.state.demo_respawn_timer = (self.state.demo_respawn_timer - tick_time).max(0.0);
            if self.state.demo_respawn_timer == 0.0 {
                self.respawn(rng, game_mode, mutator_config.car_spawn_boost_amount);
            }

            if self.state.is_demoed {
                return;
            }
        }

        self.state.controls = self.state.controls.clamp();

        let forward_speed_uu = self.rigid_body.get_forward_speed() * BT_TO_UU;

        // Wheel transforms, traces and friction impulses
        self.vehicle
            .update_vehicle_first(&self.rigid_body, geometry, tick_time);

        let jump_pressed = self.state.controls.jump && !self.state.prev_controls.jump;

        let mut num_wheels_in_contact = 0u8;
        for (wheel, has_contact) in self
            .vehicle
            .wheels
            .iter()
            .zip(&mut self.state.wheels_with_contact)
        {
            *has_contact = wheel.raycast_info.is_in_contact;
            num_wheels_in_contact += u8::from(*has_contact);
        }

        self.state.is_on_ground = num_wheels_in_contact >= 3;

        self.update_wheels(tick_time, num_wheels_in_contact, forward_speed_uu);

        if self.state.is_on_ground {
            self.state.is_flipping = false;
        } else {
            self.update_air_torque(num_wheels_in_contact == 0);
        }

        self.update_jump(tick_time, mutator_config, jump_pressed);
        self.update_auto_flip(tick_time, jump_pressed);
        self.update_double_jump_or_flip(tick_time, mutator_config, jump_pressed, forward_speed_uu);

        if self.state.controls.throttle != 0.0
            && ((0 < num_wheels_in_contact && num_wheels_in_contact < 4)
                || self.state.world_contact_normal.is_some())
        {
            self.update_auto_roll(num_wheels_in_contact);
        }

        self.state.world_contact_normal = None;

        self.vehicle
            .update_vehicle_second(&mut self.rigid_body, tick_time);
        self.update_boost(tick_time, mutator_config);
    }

    pub(crate) fn integrate_velocities(&mut self, tick_time: f32) {
        if !self.state.is_demoed {
            self.rigid_body.integrate_velocities(tick_time);
        }
    }

    pub(crate) fn integrate_transform(&mut self, tick_time: f32) {
        if !self.state.is_demoed {
            self.rigid_body.integrate_transform(tick_time);
        }
    }

    pub(crate) fn post_tick_update(&mut self, tick_time: f32) {
        if self.state.is_demoed {
            return;
        }

        let state = &mut self.state;

        let speed_squared = (self.rigid_body.linear_velocity * BT_TO_UU).length_squared();
        state.is_supersonic = speed_squared
            >= if state.is_supersonic
                && state.supersonic_time < car_consts::supersonic::MAINTAIN_MAX_TIME
            {
                const {
                    car_consts::supersonic::MAINTAIN_MIN_SPEED
                        * car_consts::supersonic::MAINTAIN_MIN_SPEED
                }
            } else {
                const { car_consts::supersonic::START_SPEED * car_consts::supersonic::START_SPEED }
            };

        if state.is_supersonic {
            state.supersonic_time += tick_time;
        } else {
            state.supersonic_time = 0.0;
        }

        if let Some(car_contact) = &mut state.car_contact {
            car_contact.cooldown_timer -= tick_time;
            if car_contact.cooldown_timer <= 0.0 {
                state.car_contact = None;
            }
        }

        state.prev_controls = state.controls;
    }

    pub(crate) fn finish_physics_tick(&mut self) {
        const MAX_SPEED: f32 = car_consts::MAX_SPEED * UU_TO_BT;

        if self.state.is_demoed {
            return;
        }

        let rb = &mut self.rigid_body;
        if self.velocity_impulse_cache != Vec3A::ZERO {
            rb.linear_velocity += self.velocity_impulse_cache;
            self.velocity_impulse_cache = Vec3A::ZERO;
        }

        rb.clamp_speeds(MAX_SPEED, car_consts::MAX_ANG_SPEED);
        rb.assert_finite("car");

        self.state.phys.pos = rb.transform.translation * BT_TO_UU;
        self.state.phys.rot_mat = rb.transform.matrix3;
        self.state.phys.vel = rb.linear_velocity * BT_TO_UU;
        self.state.phys.ang_vel = rb.angular_velocity;
    }
}
