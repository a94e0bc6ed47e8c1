use arrayvec::ArrayVec;
use glam::Vec3A;

use super::Obb;
use crate::{
    GameMode,
    consts::{ARENA_CORNER_SUM, ARENA_EXTENT_X, ARENA_EXTENT_Y, ARENA_HEIGHT, UU_TO_BT, goal},
    dynamics::{ContactPoint, VehicleRaycaster},
};

/// Result of a successful ray cast
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub point: Vec3A,
    pub normal: Vec3A,
    /// How far along the ray the hit is, from 0 to 1
    pub fraction: f32,
}

/// Which part of the arena a surface bounds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Region {
    Everywhere,
    Field,
    /// Field, except for points lined up with a goal mouth
    BackWall,
    GoalInterior,
}

#[derive(Clone, Copy, Debug)]
struct Plane {
    /// Points into the playable space
    normal: Vec3A,
    /// A point is inside when `normal.dot(point) >= offset`
    offset: f32,
    region: Region,
}

impl Plane {
    fn new(normal: Vec3A, point_on_plane: Vec3A, region: Region) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            offset: normal.dot(point_on_plane),
            region,
        }
    }

    #[inline]
    fn signed_dist(&self, point: Vec3A) -> f32 {
        self.normal.dot(point) - self.offset
    }
}

/// Goal posts and crossbars
#[derive(Clone, Copy, Debug)]
struct Segment {
    start: Vec3A,
    end: Vec3A,
}

impl Segment {
    fn closest_point(&self, point: Vec3A) -> Vec3A {
        let dir = self.end - self.start;
        let t = ((point - self.start).dot(dir) / dir.length_squared()).clamp(0.0, 1.0);
        self.start + dir * t
    }
}

/// Static arena collision, in BT units.
///
/// The soccar arena is a box with 45 degree corner cuts, plus a goal box behind the middle of
/// each back wall. Surfaces are chosen by where the colliding object's center is, so a body
/// lined up with a goal mouth can pass the back wall and is then bounded by the goal box.
#[derive(Clone, Debug)]
pub struct ArenaGeometry {
    planes: Vec<Plane>,
    rims: Vec<Segment>,
    extent_y: f32,
    goal_half_width: f32,
    goal_height: f32,
}

pub type WorldContacts = ArrayVec<ContactPoint, 16>;

impl ArenaGeometry {
    /// No collision at all
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            planes: Vec::new(),
            rims: Vec::new(),
            extent_y: 0.0,
            goal_half_width: 0.0,
            goal_height: 0.0,
        }
    }

    #[must_use]
    pub fn for_game_mode(game_mode: GameMode) -> Self {
        match game_mode {
            GameMode::TheVoid => Self::empty(),
            GameMode::Soccar | GameMode::Heatseeker => Self::soccar(),
        }
    }

    #[must_use]
    pub fn soccar() -> Self {
        let ext_x = ARENA_EXTENT_X * UU_TO_BT;
        let ext_y = ARENA_EXTENT_Y * UU_TO_BT;
        let height = ARENA_HEIGHT * UU_TO_BT;
        let corner = ARENA_CORNER_SUM * UU_TO_BT;
        let goal_hw = goal::HALF_WIDTH * UU_TO_BT;
        let goal_height = goal::HEIGHT * UU_TO_BT;
        let goal_back = goal::BACK_Y * UU_TO_BT;

        let mut planes = vec![
            Plane::new(Vec3A::Z, Vec3A::ZERO, Region::Everywhere),
            Plane::new(-Vec3A::Z, Vec3A::new(0.0, 0.0, height), Region::Field),
            Plane::new(-Vec3A::X, Vec3A::new(ext_x, 0.0, 0.0), Region::Field),
            Plane::new(Vec3A::X, Vec3A::new(-ext_x, 0.0, 0.0), Region::Field),
            Plane::new(-Vec3A::Y, Vec3A::new(0.0, ext_y, 0.0), Region::BackWall),
            Plane::new(Vec3A::Y, Vec3A::new(0.0, -ext_y, 0.0), Region::BackWall),
            Plane::new(-Vec3A::X, Vec3A::new(goal_hw, 0.0, 0.0), Region::GoalInterior),
            Plane::new(Vec3A::X, Vec3A::new(-goal_hw, 0.0, 0.0), Region::GoalInterior),
            Plane::new(-Vec3A::Z, Vec3A::new(0.0, 0.0, goal_height), Region::GoalInterior),
            Plane::new(-Vec3A::Y, Vec3A::new(0.0, goal_back, 0.0), Region::GoalInterior),
            Plane::new(Vec3A::Y, Vec3A::new(0.0, -goal_back, 0.0), Region::GoalInterior),
        ];

        for (sx, sy) in [(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)] {
            planes.push(Plane::new(
                Vec3A::new(-sx, -sy, 0.0),
                Vec3A::new(sx * corner, 0.0, 0.0),
                Region::Field,
            ));
        }

        let mut rims = Vec::with_capacity(6);
        for sy in [-1.0, 1.0] {
            let y = ext_y * sy;
            for sx in [-1.0, 1.0] {
                rims.push(Segment {
                    start: Vec3A::new(goal_hw * sx, y, 0.0),
                    end: Vec3A::new(goal_hw * sx, y, goal_height),
                });
            }
            rims.push(Segment {
                start: Vec3A::new(-goal_hw, y, goal_height),
                end: Vec3A::new(goal_hw, y, goal_height),
            });
        }

        Self {
            planes,
            rims,
            extent_y: ext_y,
            goal_half_width: goal_hw,
            goal_height,
        }
    }

    #[inline]
    fn in_goal(&self, point: Vec3A) -> bool {
        point.y.abs() > self.extent_y
    }

    #[inline]
    fn in_goal_mouth(&self, point: Vec3A) -> bool {
        point.x.abs() < self.goal_half_width && point.z < self.goal_height
    }

    fn active_planes(&self, center: Vec3A) -> impl Iterator<Item = &Plane> {
        let in_goal = self.in_goal(center);
        let in_mouth = self.in_goal_mouth(center);

        self.planes.iter().filter(move |plane| match plane.region {
            Region::Everywhere => true,
            Region::Field => !in_goal,
            Region::BackWall => !in_goal && !in_mouth,
            Region::GoalInterior => in_goal,
        })
    }

    /// Closest hit of the segment `from -> to` against any surface facing it
    #[must_use]
    pub fn ray_cast(&self, from: Vec3A, to: Vec3A) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;

        for plane in self.active_planes(from) {
            let start_dist = plane.signed_dist(from);
            let end_dist = plane.signed_dist(to);
            if start_dist < 0.0 || end_dist >= 0.0 {
                continue;
            }

            let fraction = start_dist / (start_dist - end_dist);
            if best.is_none_or(|hit| fraction < hit.fraction) {
                best = Some(RayHit {
                    point: from + (to - from) * fraction,
                    normal: plane.normal,
                    fraction,
                });
            }
        }

        best
    }

    /// Every surface the sphere currently overlaps
    #[must_use]
    pub fn sphere_contacts(&self, center: Vec3A, radius: f32) -> WorldContacts {
        let mut contacts = WorldContacts::new();

        for plane in self.active_planes(center) {
            let dist = plane.signed_dist(center);
            if dist < radius && dist > -radius {
                contacts.push(ContactPoint::new(
                    center - plane.normal * dist,
                    plane.normal,
                    radius - dist,
                ));
            }
        }

        if self.in_goal_mouth(center) || self.in_goal(center) {
            for rim in &self.rims {
                let closest = rim.closest_point(center);
                let delta = center - closest;
                let dist_sq = delta.length_squared();
                if dist_sq < radius * radius && dist_sq > f32::EPSILON {
                    let dist = dist_sq.sqrt();
                    contacts.push(ContactPoint::new(closest, delta / dist, radius - dist));
                }
            }
        }

        contacts
    }

    /// Every surface the box's corners currently penetrate, one contact per surface
    #[must_use]
    pub fn obb_contacts(&self, obb: &Obb) -> WorldContacts {
        let mut contacts = WorldContacts::new();
        let corners = obb.corners();

        for plane in self.active_planes(obb.center) {
            let mut depth = 0.0f32;
            let mut point_sum = Vec3A::ZERO;
            let mut num_points = 0u8;

            for corner in corners {
                let dist = plane.signed_dist(corner);
                if dist < 0.0 {
                    depth = depth.max(-dist);
                    point_sum += corner - plane.normal * dist;
                    num_points += 1;
                }
            }

            if num_points != 0 {
                contacts.push(ContactPoint::new(
                    point_sum / f32::from(num_points),
                    plane.normal,
                    depth,
                ));
            }
        }

        contacts
    }
}

impl VehicleRaycaster for ArenaGeometry {
    fn cast_ray(&self, from: Vec3A, to: Vec3A) -> Option<RayHit> {
        self.ray_cast(from, to)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use glam::{Affine3A, Vec3A};

    use super::ArenaGeometry;
    use crate::{collision::Obb, consts::UU_TO_BT};

    fn bt(x: f32, y: f32, z: f32) -> Vec3A {
        Vec3A::new(x, y, z) * UU_TO_BT
    }

    #[test]
    fn ray_hits_floor() {
        let geom = ArenaGeometry::soccar();
        let hit = geom.ray_cast(bt(0.0, 0.0, 100.0), bt(0.0, 0.0, -100.0)).unwrap();
        assert_abs_diff_eq!(hit.fraction, 0.5);
        assert_eq!(hit.normal, Vec3A::Z);

        assert!(geom.ray_cast(bt(0.0, 0.0, 100.0), bt(0.0, 0.0, 50.0)).is_none());
    }

    #[test]
    fn ray_hits_nearest_surface() {
        let geom = ArenaGeometry::soccar();
        let hit = geom.ray_cast(bt(4000.0, 0.0, 100.0), bt(4200.0, 0.0, -100.0)).unwrap();
        assert_eq!(hit.normal, -Vec3A::X);
    }

    #[test]
    fn ball_resting_on_floor() {
        let geom = ArenaGeometry::soccar();
        let contacts = geom.sphere_contacts(bt(0.0, 0.0, 90.0), 91.25 * UU_TO_BT);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].normal, Vec3A::Z);
        assert_abs_diff_eq!(contacts[0].depth, 1.25 * UU_TO_BT, epsilon = 1e-5);
    }

    #[test]
    fn back_wall_open_at_goal_mouth() {
        let geom = ArenaGeometry::soccar();
        let radius = 91.25 * UU_TO_BT;

        let beside_goal = geom.sphere_contacts(bt(2000.0, 5100.0, 300.0), radius);
        assert!(beside_goal.iter().any(|c| c.normal == -Vec3A::Y));

        let in_mouth = geom.sphere_contacts(bt(0.0, 5100.0, 300.0), radius);
        assert!(in_mouth.is_empty());

        let in_goal = geom.sphere_contacts(bt(0.0, 5950.0, 300.0), radius);
        assert!(in_goal.iter().any(|c| c.normal == -Vec3A::Y));
    }

    #[test]
    fn post_deflects_ball() {
        let geom = ArenaGeometry::soccar();
        let contacts = geom.sphere_contacts(bt(850.0, 5100.0, 300.0), 91.25 * UU_TO_BT);
        assert_eq!(contacts.len(), 1);
        assert!(contacts[0].normal.x < 0.0);
    }

    #[test]
    fn corner_cut() {
        let geom = ArenaGeometry::soccar();
        let contacts = geom.sphere_contacts(bt(4000.0, 4050.0, 500.0), 91.25 * UU_TO_BT);
        assert!(contacts.iter().any(|c| c.normal.x < 0.0 && c.normal.y < 0.0));
    }

    #[test]
    fn box_sinking_into_floor() {
        let geom = ArenaGeometry::soccar();
        let obb = Obb::new(
            &Affine3A::from_translation(glam::Vec3::new(0.0, 0.0, 0.5)),
            Vec3A::ZERO,
            Vec3A::new(2.0, 1.0, 0.6),
        );
        let contacts = geom.obb_contacts(&obb);
        assert_eq!(contacts.len(), 1);
        assert_abs_diff_eq!(contacts[0].depth, 0.1, epsilon = 1e-6);
        assert_abs_diff_eq!(contacts[0].point.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn void_has_nothing() {
        let geom = ArenaGeometry::empty();
        assert!(geom.ray_cast(bt(0.0, 0.0, 100.0), bt(0.0, 0.0, -100.0)).is_none());
        assert!(geom.sphere_contacts(Vec3A::ZERO, 1.0).is_empty());
    }
}
