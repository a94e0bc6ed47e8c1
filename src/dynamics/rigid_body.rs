use glam::{Affine3A, Mat3A, Vec3A};

use super::{integrate_transform, integrate_transform_no_rot};

pub struct RigidBodyConstructionInfo {
    pub mass: f32,
    pub start_world_transform: Affine3A,
    pub local_inertia: Vec3A,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub no_rot: bool,
}

impl RigidBodyConstructionInfo {
    #[must_use]
    pub const fn new(mass: f32, local_inertia: Vec3A) -> Self {
        Self {
            mass,
            local_inertia,
            start_world_transform: Affine3A::IDENTITY,
            linear_damping: 0.0,
            angular_damping: 0.0,
            no_rot: false,
        }
    }
}

/// Principal moments of inertia of a solid box
#[must_use]
pub fn box_local_inertia(mass: f32, half_extents: Vec3A) -> Vec3A {
    let size = half_extents * 2.0;
    let sq = size * size;
    mass / 12.0 * Vec3A::new(sq.y + sq.z, sq.x + sq.z, sq.x + sq.y)
}

/// Principal moments of inertia of a solid sphere
#[must_use]
pub fn sphere_local_inertia(mass: f32, radius: f32) -> Vec3A {
    Vec3A::splat(0.4 * mass * radius * radius)
}

/// A single rigid body, in BT units.
///
/// Static geometry is never a `RigidBody`; contacts against the arena treat the other side
/// as immovable.
#[derive(Clone, Debug)]
pub struct RigidBody {
    pub transform: Affine3A,
    pub linear_velocity: Vec3A,
    pub angular_velocity: Vec3A,
    pub inverse_mass: f32,
    pub inv_inertia_local: Vec3A,
    pub inv_inertia_tensor_world: Mat3A,
    /// Gravity as a force (already multiplied by the mass)
    pub gravity: Vec3A,
    pub total_force: Vec3A,
    pub total_torque: Vec3A,
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// Orientation is never integrated
    pub no_rot: bool,
}

impl RigidBody {
    #[must_use]
    pub fn new(info: RigidBodyConstructionInfo) -> Self {
        debug_assert!(info.mass > 0.0);

        let inv_inertia_local = Vec3A::select(
            info.local_inertia.cmpeq(Vec3A::ZERO),
            Vec3A::ZERO,
            1.0 / info.local_inertia,
        );

        Self {
            transform: info.start_world_transform,
            linear_velocity: Vec3A::ZERO,
            angular_velocity: Vec3A::ZERO,
            inverse_mass: 1.0 / info.mass,
            inv_inertia_local,
            inv_inertia_tensor_world: Self::get_inertia_tensor(
                info.start_world_transform.matrix3,
                inv_inertia_local,
            ),
            gravity: Vec3A::ZERO,
            total_force: Vec3A::ZERO,
            total_torque: Vec3A::ZERO,
            linear_damping: info.linear_damping.clamp(0.0, 1.0),
            angular_damping: info.angular_damping.clamp(0.0, 1.0),
            no_rot: info.no_rot,
        }
    }

    fn get_inertia_tensor(world_mat: Mat3A, inv_inertia_local: Vec3A) -> Mat3A {
        let mut scaled_mat = world_mat.transpose();
        scaled_mat.x_axis *= inv_inertia_local;
        scaled_mat.y_axis *= inv_inertia_local;
        scaled_mat.z_axis *= inv_inertia_local;

        world_mat * scaled_mat
    }

    pub fn update_inertia_tensor(&mut self) {
        self.inv_inertia_tensor_world =
            Self::get_inertia_tensor(self.transform.matrix3, self.inv_inertia_local);
    }

    #[must_use]
    pub fn get_mass(&self) -> f32 {
        1.0 / self.inverse_mass
    }

    /// Changes the mass, keeping the inertia proportional to it
    pub fn set_mass(&mut self, mass: f32) {
        debug_assert!(mass > 0.0);
        let ratio = self.get_mass() / mass;
        let accel = self.gravity * self.inverse_mass;
        self.inverse_mass = 1.0 / mass;
        self.inv_inertia_local *= ratio;
        self.update_inertia_tensor();
        self.set_gravity(accel);
    }

    pub fn set_gravity(&mut self, acceleration: Vec3A) {
        self.gravity = acceleration * self.get_mass();
    }

    pub fn set_world_transform(&mut self, transform: Affine3A) {
        self.transform = transform;
        self.update_inertia_tensor();
    }

    #[must_use]
    pub const fn get_forward_vector(&self) -> Vec3A {
        self.transform.matrix3.x_axis
    }

    #[must_use]
    pub const fn get_up_vector(&self) -> Vec3A {
        self.transform.matrix3.z_axis
    }

    #[must_use]
    pub fn get_forward_speed(&self) -> f32 {
        self.linear_velocity.dot(self.get_forward_vector())
    }

    #[must_use]
    pub fn get_velocity_in_local_point(&self, rel_pos: Vec3A) -> Vec3A {
        self.linear_velocity + self.angular_velocity.cross(rel_pos)
    }

    pub fn apply_central_force(&mut self, force: Vec3A) {
        debug_assert!(!force.is_nan());
        self.total_force += force;
    }

    pub fn apply_torque(&mut self, torque: Vec3A) {
        debug_assert!(!torque.is_nan());
        self.total_torque += torque;
    }

    pub fn apply_central_impulse(&mut self, impulse: Vec3A) {
        debug_assert!(!impulse.is_nan());
        self.linear_velocity += impulse * self.inverse_mass;
    }

    pub fn apply_torque_impulse(&mut self, torque: Vec3A) {
        debug_assert!(!torque.is_nan());
        self.angular_velocity += self.inv_inertia_tensor_world * torque;
    }

    pub fn apply_impulse(&mut self, impulse: Vec3A, rel_pos: Vec3A) {
        self.apply_central_impulse(impulse);
        self.apply_torque_impulse(rel_pos.cross(impulse));
    }

    /// `inv_mass + n . ((I^-1 (r x n)) x r)` for an impulse along `normal` at world point `pos`
    #[must_use]
    pub fn compute_impulse_denominator(&self, pos: Vec3A, normal: Vec3A) -> f32 {
        let r0 = pos - self.transform.translation;
        let c0 = r0.cross(normal);
        let vec = (self.inv_inertia_tensor_world * c0).cross(r0);

        self.inverse_mass + normal.dot(vec)
    }

    /// Inverse of the world inertia tensor's inverse, used to turn angular accelerations into torques
    #[must_use]
    pub fn inertia_tensor_world(&self) -> Mat3A {
        let inertia_local = Vec3A::select(
            self.inv_inertia_local.cmpeq(Vec3A::ZERO),
            Vec3A::ZERO,
            1.0 / self.inv_inertia_local,
        );
        Self::get_inertia_tensor(self.transform.matrix3, inertia_local)
    }

    /// Gravity, accumulated forces and torques, then damping
    pub fn integrate_velocities(&mut self, time_step: f32) {
        self.linear_velocity += (self.total_force + self.gravity) * (self.inverse_mass * time_step);
        self.angular_velocity += self.inv_inertia_tensor_world * self.total_torque * time_step;

        self.linear_velocity *= (1.0 - self.linear_damping).powf(time_step);
        self.angular_velocity *= (1.0 - self.angular_damping).powf(time_step);

        self.clear_forces();
    }

    pub fn integrate_transform(&mut self, time_step: f32) {
        let trans = if self.no_rot {
            integrate_transform_no_rot(&self.transform, self.linear_velocity, time_step)
        } else {
            integrate_transform(
                &self.transform,
                self.linear_velocity,
                self.angular_velocity,
                time_step,
            )
        };

        self.set_world_transform(trans);
    }

    pub const fn clear_forces(&mut self) {
        self.total_force = Vec3A::ZERO;
        self.total_torque = Vec3A::ZERO;
    }

    pub fn clamp_speeds(&mut self, max_speed: f32, max_ang_speed: f32) {
        if self.linear_velocity.length_squared() > max_speed * max_speed {
            self.linear_velocity = self.linear_velocity.normalize() * max_speed;
        }

        if self.angular_velocity.length_squared() > max_ang_speed * max_ang_speed {
            self.angular_velocity = self.angular_velocity.normalize() * max_ang_speed;
        }
    }

    /// Panics if any part of the body's state stopped being finite
    pub fn assert_finite(&self, what: &str) {
        assert!(
            self.transform.is_finite()
                && self.linear_velocity.is_finite()
                && self.angular_velocity.is_finite(),
            "{what} physics state is no longer finite (pos: {}, vel: {}, ang_vel: {})",
            self.transform.translation,
            self.linear_velocity,
            self.angular_velocity,
        );
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use glam::Vec3A;

    use super::*;

    fn unit_box() -> RigidBody {
        RigidBody::new(RigidBodyConstructionInfo::new(
            2.0,
            box_local_inertia(2.0, Vec3A::splat(0.5)),
        ))
    }

    #[test]
    fn gravity_integrates() {
        let mut rb = unit_box();
        rb.set_gravity(Vec3A::new(0.0, 0.0, -10.0));
        rb.integrate_velocities(0.5);
        assert_abs_diff_eq!(rb.linear_velocity.z, -5.0);

        rb.integrate_transform(0.5);
        assert_abs_diff_eq!(rb.transform.translation.z, -2.5);
    }

    #[test]
    fn off_center_impulse_spins() {
        let mut rb = unit_box();
        rb.apply_impulse(Vec3A::new(0.0, 1.0, 0.0), Vec3A::new(0.5, 0.0, 0.0));
        assert_abs_diff_eq!(rb.linear_velocity.y, 0.5);
        assert!(rb.angular_velocity.z > 0.0);
    }

    #[test]
    fn impulse_denominator_at_center_is_inv_mass() {
        let rb = unit_box();
        let denom = rb.compute_impulse_denominator(Vec3A::ZERO, Vec3A::X);
        assert_abs_diff_eq!(denom, 0.5);
    }

    #[test]
    fn set_mass_keeps_gravity_accel() {
        let mut rb = unit_box();
        rb.set_gravity(Vec3A::new(0.0, 0.0, -10.0));
        rb.set_mass(4.0);
        rb.integrate_velocities(1.0);
        assert_abs_diff_eq!(rb.linear_velocity.z, -10.0, epsilon = 1e-5);
    }
}
