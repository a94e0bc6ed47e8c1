use std::{
    f32::consts::{FRAC_PI_2, PI, TAU},
    fmt::Display,
    ops::Sub,
};

use glam::{Mat3A, Quat, Vec3A};

/// Below this horizontal forward length, yaw and roll can no longer be told apart
const GIMBAL_LOCK_THRESH: f32 = 1e-6;

/// A rotation expressed as yaw, pitch and roll (in radians).
///
/// The forward direction is `(cos(pitch) * cos(yaw), cos(pitch) * sin(yaw), sin(pitch))`,
/// so a positive pitch points the nose upwards. Equivalent to the rotation
/// `Rz(yaw) * Ry(-pitch) * Rx(-roll)`.
///
/// Angles produced by [`Angle::from_rot_mat`] always have pitch within ±π/2,
/// and yaw and roll within ±π.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Angle {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl Angle {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self { yaw, pitch, roll }
    }

    /// Extracts the angle from a rotation matrix whose columns are forward, right and up
    #[must_use]
    pub fn from_rot_mat(mat: Mat3A) -> Self {
        let forward = mat.x_axis;
        let right = mat.y_axis;
        let up = mat.z_axis;

        let horizontal_len = forward.x.hypot(forward.y);
        let pitch = forward.z.atan2(horizontal_len);

        if horizontal_len < GIMBAL_LOCK_THRESH {
            // Pointing straight up or down, fold all of the roll into yaw
            let yaw = (-right.x).atan2(right.y);
            return Self::new(yaw, pitch, 0.0);
        }

        let yaw = forward.y.atan2(forward.x);
        let roll = (-right.z).atan2(up.z);
        Self::new(yaw, pitch, roll)
    }

    /// Angle with no roll pointing along `forward`
    #[must_use]
    pub fn from_vec(forward: Vec3A) -> Self {
        let horizontal_len = forward.x.hypot(forward.y);
        Self::new(
            forward.y.atan2(forward.x),
            forward.z.atan2(horizontal_len),
            0.0,
        )
    }

    #[must_use]
    pub fn from_quat(quat: Quat) -> Self {
        Self::from_rot_mat(Mat3A::from_quat(quat))
    }

    #[must_use]
    pub fn to_rot_mat(self) -> Mat3A {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        let (sr, cr) = self.roll.sin_cos();

        Mat3A::from_cols(
            Vec3A::new(cp * cy, cp * sy, sp),
            Vec3A::new(cy * sp * sr - cr * sy, sy * sp * sr + cr * cy, -cp * sr),
            Vec3A::new(-cr * cy * sp - sr * sy, -cr * sy * sp + sr * cy, cp * cr),
        )
    }

    #[must_use]
    pub fn to_quat(self) -> Quat {
        (Quat::from_rotation_z(self.yaw)
            * Quat::from_rotation_y(-self.pitch)
            * Quat::from_rotation_x(-self.roll))
        .normalize()
    }

    #[must_use]
    pub fn get_forward_vec(self) -> Vec3A {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3A::new(cp * cy, cp * sy, sp)
    }

    /// Brings every component back into its canonical range without changing the rotation
    #[must_use]
    pub fn normalize_fix(mut self) -> Self {
        self.pitch = wrap_angle(self.pitch);
        if self.pitch > FRAC_PI_2 {
            self.pitch = PI - self.pitch;
            self.yaw += PI;
            self.roll += PI;
        } else if self.pitch < -FRAC_PI_2 {
            self.pitch = -PI - self.pitch;
            self.yaw += PI;
            self.roll += PI;
        }

        self.yaw = wrap_angle(self.yaw);
        self.roll = wrap_angle(self.roll);
        self
    }

    #[must_use]
    pub const fn as_array(self) -> [f32; 3] {
        [self.pitch, self.yaw, self.roll]
    }
}

impl Sub for Angle {
    type Output = Self;

    /// Shortest per-component difference
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(
            wrap_angle(self.yaw - rhs.yaw),
            wrap_angle(self.pitch - rhs.pitch),
            wrap_angle(self.roll - rhs.roll),
        )
    }
}

impl Display for Angle {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "(yaw: {}, pitch: {}, roll: {})",
            self.yaw, self.pitch, self.roll
        )
    }
}

/// Wraps an angle into `[-PI, PI]`
#[must_use]
pub fn wrap_angle(ang: f32) -> f32 {
    let wrapped = (ang + PI).rem_euclid(TAU) - PI;
    // rem_euclid can land exactly on TAU for tiny negative inputs
    wrapped.clamp(-PI, PI)
}

/// Quaternion of a rotation matrix, as `[w, x, y, z]`
#[must_use]
pub fn rot_mat_to_quat_wxyz(mat: Mat3A) -> [f32; 4] {
    let q = Quat::from_mat3a(&mat).normalize();
    [q.w, q.x, q.y, q.z]
}
