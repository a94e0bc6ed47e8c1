use glam::{Affine3A, Mat3A, Vec3A};

use crate::{dynamics::ContactPoint, shared::Aabb};

/// Oriented bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obb {
    pub center: Vec3A,
    /// Columns are the box's local x, y and z axes
    pub axis: Mat3A,
    pub extent: Vec3A,
}

/// Result of a box-box test, seen from the first box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObbHit {
    /// Points from the first box towards the second one
    pub normal: Vec3A,
    pub depth: f32,
    /// Point on the first box closest to the second box's center
    pub point_on_a: Vec3A,
    /// Point on the second box closest to the first box's center
    pub point_on_b: Vec3A,
}

impl ObbHit {
    /// Contact to resolve with the first box as the pushed body
    #[must_use]
    pub fn contact_for_a(&self) -> ContactPoint {
        ContactPoint::new(
            (self.point_on_a + self.point_on_b) * 0.5,
            -self.normal,
            self.depth,
        )
    }
}

impl Obb {
    /// Box of `extent` (half size) offset by `local_offset` in the frame of `transform`
    #[must_use]
    pub fn new(transform: &Affine3A, local_offset: Vec3A, extent: Vec3A) -> Self {
        Self {
            center: transform.transform_point3a(local_offset),
            axis: transform.matrix3,
            extent,
        }
    }

    #[inline]
    fn axes(&self) -> [Vec3A; 3] {
        [self.axis.x_axis, self.axis.y_axis, self.axis.z_axis]
    }

    /// Project the box onto an axis, returning the half-projection length
    #[must_use]
    pub fn project_radius(&self, axis: Vec3A) -> f32 {
        self.axes()
            .into_iter()
            .zip(self.extent.to_array())
            .map(|(local_axis, extent)| axis.dot(local_axis).abs() * extent)
            .sum()
    }

    #[must_use]
    pub fn corners(&self) -> [Vec3A; 8] {
        let [x, y, z] = self.axes();
        let (x, y, z) = (x * self.extent.x, y * self.extent.y, z * self.extent.z);

        let mut corners = [Vec3A::ZERO; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            let sx = if i & 1 == 0 { -1.0 } else { 1.0 };
            let sy = if i & 2 == 0 { -1.0 } else { 1.0 };
            let sz = if i & 4 == 0 { -1.0 } else { 1.0 };
            *corner = self.center + x * sx + y * sy + z * sz;
        }

        corners
    }

    #[must_use]
    pub fn aabb(&self) -> Aabb {
        let half = Vec3A::new(
            self.project_radius(Vec3A::X),
            self.project_radius(Vec3A::Y),
            self.project_radius(Vec3A::Z),
        );
        Aabb::from_half_extents(self.center, half)
    }

    /// The point of the box (surface or inside) closest to `point`
    #[must_use]
    pub fn closest_point(&self, point: Vec3A) -> Vec3A {
        let d = point - self.center;

        self.axes()
            .into_iter()
            .enumerate()
            .fold(self.center, |q, (i, axis)| {
                q + d.dot(axis).clamp(-self.extent[i], self.extent[i]) * axis
            })
    }

    /// Contact with a sphere, with the normal pointing from the box towards the sphere
    #[must_use]
    pub fn sphere_contact(&self, sphere_center: Vec3A, radius: f32) -> Option<ContactPoint> {
        let local = self.axis.transpose() * (sphere_center - self.center);
        let closest = local.clamp(-self.extent, self.extent);
        let delta = local - closest;
        let dist_sq = delta.length_squared();

        if dist_sq >= radius * radius {
            return None;
        }

        if dist_sq > f32::EPSILON * f32::EPSILON {
            let dist = dist_sq.sqrt();
            return Some(ContactPoint::new(
                self.center + self.axis * closest,
                self.axis * (delta / dist),
                radius - dist,
            ));
        }

        // Sphere center is inside the box, push out through the nearest face
        let face_dist = self.extent - local.abs();
        let axis_idx = if face_dist.x <= face_dist.y && face_dist.x <= face_dist.z {
            0
        } else if face_dist.y <= face_dist.z {
            1
        } else {
            2
        };

        let sign = if local[axis_idx] >= 0.0 { 1.0 } else { -1.0 };
        let normal = self.axes()[axis_idx] * sign;
        let mut on_face = local;
        on_face[axis_idx] = self.extent[axis_idx] * sign;

        Some(ContactPoint::new(
            self.center + self.axis * on_face,
            normal,
            face_dist[axis_idx] + radius,
        ))
    }

    /// Separating axis test over the 15 candidate axes
    #[must_use]
    pub fn obb_contact(&self, other: &Self) -> Option<ObbHit> {
        // Edge-edge axes must be this much shallower to win over a face axis
        const EDGE_AXIS_BIAS: f32 = 1.05;

        let t = other.center - self.center;
        let a_axes = self.axes();
        let b_axes = other.axes();

        let mut best_depth = f32::INFINITY;
        let mut best_score = f32::INFINITY;
        let mut best_axis = Vec3A::ZERO;

        let mut test_axis = |axis: Vec3A, bias: f32| -> bool {
            let len_sq = axis.length_squared();
            if len_sq < 1e-8 {
                // Parallel edges, covered by the face axes
                return true;
            }

            let axis = axis / len_sq.sqrt();
            let dist = t.dot(axis);
            let overlap = self.project_radius(axis) + other.project_radius(axis) - dist.abs();
            if overlap < 0.0 {
                return false;
            }

            if overlap * bias < best_score {
                best_score = overlap * bias;
                best_depth = overlap;
                best_axis = if dist < 0.0 { -axis } else { axis };
            }

            true
        };

        for axis in a_axes.into_iter().chain(b_axes) {
            if !test_axis(axis, 1.0) {
                return None;
            }
        }

        for a in a_axes {
            for b in b_axes {
                if !test_axis(a.cross(b), EDGE_AXIS_BIAS) {
                    return None;
                }
            }
        }

        Some(ObbHit {
            normal: best_axis,
            depth: best_depth,
            point_on_a: self.closest_point(other.center),
            point_on_b: other.closest_point(self.center),
        })
    }
}
