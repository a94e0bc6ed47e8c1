use std::fmt::Display;

use glam::{Mat3A, Vec3A};

use crate::{Angle, consts::MIRROR_SCALE, rot_mat_to_quat_wxyz};

/// Default is not implemented for this struct,
/// because the initial start height of the ball/car is different.
/// The correct values are set in `BallState::default()` and `CarState::default()`
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhysState {
    pub pos: Vec3A,
    /// Columns are forward, right and up
    pub rot_mat: Mat3A,
    pub vel: Vec3A,
    pub ang_vel: Vec3A,
}

impl PhysState {
    /// The same state seen from the other team's side: the world rotated 180 degrees about
    /// the vertical axis through the field center.
    ///
    /// Angular velocity is kept as-is.
    #[must_use]
    pub fn get_mirrored(mut self) -> Self {
        self.pos *= MIRROR_SCALE;
        self.vel *= MIRROR_SCALE;

        for i in 0..3 {
            *self.rot_mat.col_mut(i) *= MIRROR_SCALE;
        }

        self
    }

    #[must_use]
    pub const fn get_forward_dir(&self) -> Vec3A {
        self.rot_mat.x_axis
    }

    #[must_use]
    pub const fn get_right_dir(&self) -> Vec3A {
        self.rot_mat.y_axis
    }

    #[must_use]
    pub const fn get_up_dir(&self) -> Vec3A {
        self.rot_mat.z_axis
    }

    #[must_use]
    pub fn get_angle(&self) -> Angle {
        Angle::from_rot_mat(self.rot_mat)
    }

    /// `[w, x, y, z]`
    #[must_use]
    pub fn get_quat_wxyz(&self) -> [f32; 4] {
        rot_mat_to_quat_wxyz(self.rot_mat)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.pos.is_finite()
            && self.rot_mat.is_finite()
            && self.vel.is_finite()
            && self.ang_vel.is_finite()
    }
}

impl Display for PhysState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("PhysState {")?;
        f.write_fmt(format_args!("\n\tpos: {}", self.pos))?;
        f.write_fmt(format_args!("\n\trot_mat: {}", self.rot_mat))?;
        f.write_fmt(format_args!("\n\tvel: {}", self.vel))?;
        f.write_fmt(format_args!("\n\tang_vel: {}", self.ang_vel))?;
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use glam::{Mat3A, Quat, Vec3A};

    use super::PhysState;
    use crate::Angle;

    #[test]
    fn mirror_matches_half_turn() {
        let state = PhysState {
            pos: Vec3A::new(100.0, -200.0, 300.0),
            rot_mat: Angle::new(0.4, 0.2, -0.3).to_rot_mat(),
            vel: Vec3A::new(1.0, 2.0, 3.0),
            ang_vel: Vec3A::new(0.1, 0.2, 0.3),
        };

        let mirrored = state.get_mirrored();
        let half_turn = Mat3A::from_quat(Quat::from_rotation_z(std::f32::consts::PI));

        assert_eq!(mirrored.pos, Vec3A::new(-100.0, 200.0, 300.0));
        assert_eq!(mirrored.ang_vel, state.ang_vel);

        let expected = half_turn * state.rot_mat;
        for i in 0..3 {
            assert_abs_diff_eq!(mirrored.rot_mat.col(i).x, expected.col(i).x, epsilon = 1e-6);
            assert_abs_diff_eq!(mirrored.rot_mat.col(i).y, expected.col(i).y, epsilon = 1e-6);
            assert_abs_diff_eq!(mirrored.rot_mat.col(i).z, expected.col(i).z, epsilon = 1e-6);
        }

        // Mirroring twice is the identity
        assert_eq!(mirrored.get_mirrored(), state);
    }
}
