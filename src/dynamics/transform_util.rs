use glam::{Affine3A, Mat3A, Quat, Vec3A};

use crate::consts::FRAC_PI_4;

/// Largest rotation (in radians) a body may turn in one integration step
const ANGULAR_MOTION_THRESHOLD: f32 = FRAC_PI_4;

#[must_use]
pub fn integrate_transform_no_rot(cur_trans: &Affine3A, lin_vel: Vec3A, time_step: f32) -> Affine3A {
    Affine3A {
        matrix3: cur_trans.matrix3,
        translation: cur_trans.translation + lin_vel * time_step,
    }
}

#[must_use]
pub fn integrate_transform(
    cur_trans: &Affine3A,
    lin_vel: Vec3A,
    ang_vel: Vec3A,
    time_step: f32,
) -> Affine3A {
    let translation = cur_trans.translation + lin_vel * time_step;

    let mut angle = ang_vel.length();
    if angle * time_step > ANGULAR_MOTION_THRESHOLD {
        angle = ANGULAR_MOTION_THRESHOLD / time_step;
    }

    let axis = if angle < 0.001 {
        // Taylor expansion of sin(0.5 * angle * dt) / angle
        ang_vel
            * (0.5 * time_step
                - time_step * time_step * time_step * (1.0 / 48.0) * angle * angle)
    } else {
        ang_vel * ((0.5 * angle * time_step).sin() / angle)
    };

    let dorn = Quat::from_xyzw(axis.x, axis.y, axis.z, (angle * time_step * 0.5).cos());
    let orn0 = Quat::from_mat3a(&cur_trans.matrix3);
    let predicted_orn = (dorn * orn0).normalize();

    Affine3A {
        matrix3: Mat3A::from_quat(predicted_orn),
        translation,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use glam::{Affine3A, Vec3A};

    use super::*;

    #[test]
    fn no_rot_only_translates() {
        let start = Affine3A::from_rotation_z(0.3);
        let end = integrate_transform_no_rot(&start, Vec3A::new(1.0, 2.0, 3.0), 0.5);
        assert_eq!(end.matrix3, start.matrix3);
        assert_abs_diff_eq!(end.translation.z, 1.5);
    }

    #[test]
    fn spin_about_z() {
        let dt = 1.0 / 120.0;
        let mut trans = Affine3A::IDENTITY;
        for _ in 0..120 {
            trans = integrate_transform(&trans, Vec3A::ZERO, Vec3A::new(0.0, 0.0, 1.0), dt);
        }

        // One second at 1 rad/s
        assert_abs_diff_eq!(trans.matrix3.x_axis.x, 1f32.cos(), epsilon = 1e-4);
        assert_abs_diff_eq!(trans.matrix3.x_axis.y, 1f32.sin(), epsilon = 1e-4);
    }

    #[test]
    fn slow_spin_uses_small_angle_branch() {
        let dt = 1.0 / 120.0;
        let trans = integrate_transform(&Affine3A::IDENTITY, Vec3A::ZERO, Vec3A::new(0.0, 0.0, 1e-4), dt);
        assert_abs_diff_eq!(trans.matrix3.x_axis.y, 1e-4 * dt, epsilon = 1e-9);
    }
}
