use arrayvec::ArrayVec;
use glam::{Mat3A, Quat, Vec3A};

use super::{RigidBody, resolve_single_bilateral, resolve_single_collision};
use crate::{
    collision::RayHit,
    consts::{UU_TO_BT, bullet_vehicle as vehicle_consts},
};

pub const NUM_WHEELS: usize = 4;

const WHEEL_DIRECTION_CS: Vec3A = Vec3A::new(0.0, 0.0, -1.0);
const WHEEL_AXLE_CS: Vec3A = Vec3A::new(0.0, -1.0, 0.0);

/// Anything wheels can be traced against, in BT units
pub trait VehicleRaycaster {
    fn cast_ray(&self, from: Vec3A, to: Vec3A) -> Option<RayHit>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RaycastInfo {
    pub contact_normal_ws: Vec3A,
    pub contact_point_ws: Vec3A,
    pub hard_point_ws: Vec3A,
    pub wheel_direction_ws: Vec3A,
    pub wheel_axle_ws: Vec3A,
    pub suspension_length: f32,
    pub is_in_contact: bool,
}

/// Layout of one wheel, in BT units
#[derive(Clone, Copy, Debug)]
pub struct WheelSetup {
    pub connection_point_cs: Vec3A,
    /// Rest length with the travel already removed
    pub suspension_rest_length: f32,
    pub wheel_radius: f32,
    pub suspension_force_scale: f32,
}

#[derive(Clone, Debug)]
pub struct Wheel {
    pub chassis_connection_point_cs: Vec3A,
    pub suspension_rest_length: f32,
    pub max_suspension_travel: f32,
    pub wheel_radius: f32,
    pub suspension_force_scale: f32,

    pub raycast_info: RaycastInfo,
    /// Forward, left, up of the (steered) wheel
    pub world_basis: Mat3A,
    pub steer_angle: f32,
    pub engine_force: f32,
    pub brake: f32,
    pub lat_friction: f32,
    pub long_friction: f32,
    pub suspension_relative_velocity: f32,
    pub clipped_inv_contact_dot_suspension: f32,
    pub suspension_force: f32,
    pub extra_pushback: f32,
    pub impulse: Vec3A,
}

impl Wheel {
    fn new(setup: WheelSetup) -> Self {
        Self {
            chassis_connection_point_cs: setup.connection_point_cs,
            suspension_rest_length: setup.suspension_rest_length,
            max_suspension_travel: vehicle_consts::MAX_SUSPENSION_TRAVEL * UU_TO_BT,
            wheel_radius: setup.wheel_radius,
            suspension_force_scale: setup.suspension_force_scale,
            raycast_info: RaycastInfo {
                suspension_length: setup.suspension_rest_length,
                ..Default::default()
            },
            world_basis: Mat3A::IDENTITY,
            steer_angle: 0.0,
            engine_force: 0.0,
            brake: 0.0,
            lat_friction: 0.0,
            long_friction: 0.0,
            suspension_relative_velocity: 0.0,
            clipped_inv_contact_dot_suspension: 1.0,
            suspension_force: 0.0,
            extra_pushback: 0.0,
            impulse: Vec3A::ZERO,
        }
    }

    fn update_wheel_transform_ws(&mut self, chassis: &RigidBody) {
        let info = &mut self.raycast_info;
        info.is_in_contact = false;
        info.hard_point_ws = chassis
            .transform
            .transform_point3a(self.chassis_connection_point_cs);
        info.wheel_direction_ws = chassis.transform.matrix3 * WHEEL_DIRECTION_CS;
        info.wheel_axle_ws = chassis.transform.matrix3 * WHEEL_AXLE_CS;
    }

    fn update_wheel_basis(&mut self, chassis: &RigidBody) {
        self.update_wheel_transform_ws(chassis);
        let up = -self.raycast_info.wheel_direction_ws;
        let right = self.raycast_info.wheel_axle_ws;
        let fwd = up.cross(right).normalize();

        let steering_mat = Mat3A::from_quat(Quat::from_axis_angle(up.into(), self.steer_angle));
        self.world_basis = steering_mat * Mat3A::from_cols(fwd, -right, up);
    }

    fn ray_cast(&mut self, chassis: &RigidBody, raycaster: &impl VehicleRaycaster, time_step: f32) {
        self.update_wheel_transform_ws(chassis);

        let real_ray_length = self.suspension_rest_length
            + self.max_suspension_travel
            + self.wheel_radius
            - vehicle_consts::SUSPENSION_SUBTRACTION;

        let source = self.raycast_info.hard_point_ws;
        let target = source + self.raycast_info.wheel_direction_ws * real_ray_length;
        self.raycast_info.contact_point_ws = target;

        let Some(hit) = raycaster.cast_ray(source, target) else {
            self.raycast_info.suspension_length =
                self.suspension_rest_length + self.max_suspension_travel;
            self.suspension_relative_velocity = 0.0;
            self.raycast_info.contact_normal_ws = -self.raycast_info.wheel_direction_ws;
            self.clipped_inv_contact_dot_suspension = 1.0;
            self.extra_pushback = 0.0;
            return;
        };

        self.raycast_info.contact_point_ws = hit.point;
        self.raycast_info.contact_normal_ws = hit.normal;
        self.raycast_info.is_in_contact = true;

        let up = chassis.get_up_vector();
        let wheel_trace_len = (self.raycast_info.hard_point_ws - hit.point).dot(up);
        self.raycast_info.suspension_length = (wheel_trace_len - self.wheel_radius).clamp(
            self.suspension_rest_length - self.max_suspension_travel,
            self.suspension_rest_length + self.max_suspension_travel,
        );

        let rel_pos = hit.point - chassis.transform.translation;
        let vel_at_contact_point = chassis.get_velocity_in_local_point(rel_pos);
        let proj_vel = hit.normal.dot(vel_at_contact_point);
        let denom = hit.normal.dot(up);

        if denom > 0.1 {
            let inv = 1.0 / denom;
            self.suspension_relative_velocity = proj_vel * inv;
            self.clipped_inv_contact_dot_suspension = inv;
        } else {
            self.suspension_relative_velocity = 0.0;
            self.clipped_inv_contact_dot_suspension = 10.0;
        }

        let ray_pushback_thresh = self.suspension_rest_length + self.wheel_radius
            - vehicle_consts::SUSPENSION_SUBTRACTION;
        self.extra_pushback = if wheel_trace_len < ray_pushback_thresh {
            let dist_delta = wheel_trace_len - ray_pushback_thresh;
            resolve_single_collision(chassis, hit.point, hit.normal, time_step, dist_delta)
                / NUM_WHEELS as f32
        } else {
            0.0
        };
    }

    fn calc_friction_impulses(&mut self, chassis: &RigidBody, friction_scale: f32, time_step: f32) {
        if !self.raycast_info.is_in_contact {
            self.impulse = Vec3A::ZERO;
            return;
        }

        let surf_normal_ws = self.raycast_info.contact_normal_ws;
        let mut axle_dir = self.world_basis.y_axis;
        axle_dir -= surf_normal_ws * axle_dir.dot(surf_normal_ws);
        axle_dir = axle_dir.normalize_or_zero();

        let forward_dir = surf_normal_ws.cross(axle_dir).normalize_or_zero();
        if axle_dir == Vec3A::ZERO || forward_dir == Vec3A::ZERO {
            self.impulse = Vec3A::ZERO;
            return;
        }

        let contact_point = self.raycast_info.contact_point_ws;
        let side_impulse = resolve_single_bilateral(chassis, contact_point, axle_dir);

        let rolling_friction = if self.engine_force == 0.0 {
            if self.brake == 0.0 {
                0.0
            } else {
                let rel_contact_point = contact_point - chassis.transform.translation;
                let contact_vel = chassis.get_velocity_in_local_point(rel_contact_point);
                let mut rel_vel = contact_vel.dot(forward_dir);

                if time_step > 1.0 / 80.0 {
                    let threshold = 0.8 - (1.0 / (time_step * 150.0));
                    if rel_vel.abs() < threshold {
                        rel_vel = 0.0;
                    }
                }

                (-rel_vel * vehicle_consts::ROLLING_FRICTION_SCALE).clamp(-self.brake, self.brake)
            }
        } else {
            -self.engine_force / friction_scale
        };

        let total_friction_force = forward_dir * rolling_friction * self.long_friction
            + axle_dir * side_impulse * self.lat_friction;
        self.impulse = total_friction_force * friction_scale;
    }

    fn update_suspension(&mut self, chassis: &mut RigidBody, time_step: f32) {
        if !self.raycast_info.is_in_contact {
            self.suspension_force = 0.0;
            return;
        }

        let spring_force = (self.suspension_rest_length - self.raycast_info.suspension_length)
            * vehicle_consts::SUSPENSION_STIFFNESS
            * self.clipped_inv_contact_dot_suspension;
        let damping_vel_scale = if self.suspension_relative_velocity < 0.0 {
            vehicle_consts::WHEELS_DAMPING_COMPRESSION
        } else {
            vehicle_consts::WHEELS_DAMPING_RELAXATION
        };

        self.suspension_force = ((spring_force
            - damping_vel_scale * self.suspension_relative_velocity)
            * self.suspension_force_scale)
            .max(0.0);

        if self.suspension_force == 0.0 {
            return;
        }

        let contact_point_offset =
            self.raycast_info.contact_point_ws - chassis.transform.translation;
        let impulse = self.raycast_info.contact_normal_ws
            * (self.suspension_force * time_step + self.extra_pushback);
        chassis.apply_impulse(impulse, contact_point_offset);
    }

    fn apply_friction_impulse(&self, chassis: &mut RigidBody, time_step: f32) {
        if self.impulse == Vec3A::ZERO {
            return;
        }

        let up = chassis.get_up_vector();
        let wheel_contact_offset = self.raycast_info.contact_point_ws - chassis.transform.translation;
        let wheel_rel_pos = wheel_contact_offset - up * up.dot(wheel_contact_offset);
        chassis.apply_impulse(self.impulse * time_step, wheel_rel_pos);
    }
}

/// Raycast vehicle with Rocket League style suspension and tire friction
#[derive(Clone, Debug)]
pub struct Vehicle {
    pub wheels: ArrayVec<Wheel, NUM_WHEELS>,
}

impl Vehicle {
    #[must_use]
    pub fn new(chassis: &RigidBody, setups: [WheelSetup; NUM_WHEELS]) -> Self {
        let wheels = setups
            .into_iter()
            .map(|setup| {
                let mut wheel = Wheel::new(setup);
                wheel.update_wheel_basis(chassis);
                wheel
            })
            .collect();

        Self { wheels }
    }

    #[must_use]
    pub fn num_wheels_in_contact(&self) -> u8 {
        self.wheels
            .iter()
            .map(|wheel| u8::from(wheel.raycast_info.is_in_contact))
            .sum()
    }

    /// Average contact normal of all touching wheels, or the chassis up if none touch
    #[must_use]
    pub fn get_upwards_dir_from_wheel_contacts(&self, chassis: &RigidBody) -> Vec3A {
        let sum_contact_dir: Vec3A = self
            .wheels
            .iter()
            .filter(|wheel| wheel.raycast_info.is_in_contact)
            .map(|wheel| wheel.raycast_info.contact_normal_ws)
            .sum();

        if sum_contact_dir == Vec3A::ZERO {
            chassis.get_up_vector()
        } else {
            sum_contact_dir.normalize_or_zero()
        }
    }

    /// Wheel transforms, traces and friction impulses (using last tick's friction and engine values)
    pub fn update_vehicle_first(
        &mut self,
        chassis: &RigidBody,
        raycaster: &impl VehicleRaycaster,
        time_step: f32,
    ) {
        let friction_scale = chassis.get_mass() / 3.0;
        for wheel in &mut self.wheels {
            wheel.update_wheel_basis(chassis);
            wheel.ray_cast(chassis, raycaster, time_step);
            wheel.calc_friction_impulses(chassis, friction_scale, time_step);
        }
    }

    /// Suspension, then friction impulses
    pub fn update_vehicle_second(&mut self, chassis: &mut RigidBody, time_step: f32) {
        for wheel in &mut self.wheels {
            wheel.update_suspension(chassis, time_step);
        }

        // All suspension must be applied before any friction
        for wheel in &self.wheels {
            wheel.apply_friction_impulse(chassis, time_step);
        }
    }
}
