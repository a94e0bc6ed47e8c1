use glam::Vec3A;

use super::RigidBody;
use crate::consts::CollisionCoefs;

/// Error reduction parameter for penetration recovery through impulses
const ERP: f32 = 0.2;
const CONTACT_DAMPING: f32 = -0.2;

/// A single point of contact, in BT units.
///
/// `normal` points out of the other object, towards the first body of the pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactPoint {
    pub point: Vec3A,
    pub normal: Vec3A,
    /// Penetration depth, positive when overlapping
    pub depth: f32,
}

impl ContactPoint {
    #[must_use]
    pub const fn new(point: Vec3A, normal: Vec3A, depth: f32) -> Self {
        Self {
            point,
            normal,
            depth,
        }
    }

    /// The same contact seen from the other body
    #[must_use]
    pub fn flipped(self) -> Self {
        Self::new(self.point, -self.normal, self.depth)
    }
}

/// Non-negative impulse that stops `body` from moving into static ground along `normal`,
/// including a share of penetration recovery for `distance` (negative when penetrating)
#[must_use]
pub fn resolve_single_collision(
    body: &RigidBody,
    contact_position_world: Vec3A,
    contact_normal: Vec3A,
    time_step: f32,
    distance: f32,
) -> f32 {
    let rel_pos = contact_position_world - body.transform.translation;
    let rel_vel = contact_normal.dot(body.get_velocity_in_local_point(rel_pos));

    let positional_error = ERP * -distance / time_step;
    let velocity_error = -rel_vel;
    let jac_diag_inv = 1.0 / body.compute_impulse_denominator(contact_position_world, contact_normal);

    ((positional_error + velocity_error) * jac_diag_inv).max(0.0)
}

/// Damped impulse that cancels part of the velocity of `body` at `pos` along `normal`
#[must_use]
pub fn resolve_single_bilateral(body: &RigidBody, pos: Vec3A, normal: Vec3A) -> f32 {
    debug_assert!(normal.is_normalized());

    let rel_pos = pos - body.transform.translation;
    let rel_vel = normal.dot(body.get_velocity_in_local_point(rel_pos));
    let jac_diag_inv = 1.0 / body.compute_impulse_denominator(pos, normal);

    CONTACT_DAMPING * rel_vel * jac_diag_inv
}

/// Resolves one contact between `a` and either `b` or immovable geometry.
///
/// Applies a restitution impulse along the normal (contacts slower than `resting_speed`
/// do not bounce) and a Coulomb friction impulse, then pushes the bodies apart.
/// Returns the normal impulse applied to `a`.
pub fn resolve_contact(
    a: &mut RigidBody,
    mut b: Option<&mut RigidBody>,
    contact: &ContactPoint,
    coefs: CollisionCoefs,
    resting_speed: f32,
) -> f32 {
    let normal_impulse = apply_contact_impulses(a, b.as_deref_mut(), contact, coefs, resting_speed);

    // Positional correction, split by inverse mass
    if contact.depth > 0.0 {
        let inv_mass_b = b.as_deref().map_or(0.0, |b| b.inverse_mass);
        let total_inv_mass = a.inverse_mass + inv_mass_b;
        a.transform.translation += contact.normal * (contact.depth * a.inverse_mass / total_inv_mass);
        if let Some(b) = b {
            b.transform.translation -= contact.normal * (contact.depth * inv_mass_b / total_inv_mass);
        }
    }

    normal_impulse
}

fn apply_contact_impulses(
    a: &mut RigidBody,
    mut b: Option<&mut RigidBody>,
    contact: &ContactPoint,
    coefs: CollisionCoefs,
    resting_speed: f32,
) -> f32 {
    let n = contact.normal;
    let rel_a = contact.point - a.transform.translation;
    let rel_b = b
        .as_deref()
        .map_or(Vec3A::ZERO, |b| contact.point - b.transform.translation);

    let rel_vel_at = |a: &RigidBody, b: Option<&RigidBody>| {
        a.get_velocity_in_local_point(rel_a)
            - b.map_or(Vec3A::ZERO, |b| b.get_velocity_in_local_point(rel_b))
    };
    let denom_along = |a: &RigidBody, b: Option<&RigidBody>, dir: Vec3A| {
        a.compute_impulse_denominator(contact.point, dir)
            + b.map_or(0.0, |b| b.compute_impulse_denominator(contact.point, dir))
    };

    let normal_vel = rel_vel_at(&*a, b.as_deref()).dot(n);
    if normal_vel >= 0.0 {
        return 0.0;
    }

    let restitution = if -normal_vel > resting_speed {
        coefs.restitution
    } else {
        0.0
    };

    let normal_impulse = -(1.0 + restitution) * normal_vel / denom_along(&*a, b.as_deref(), n);
    a.apply_impulse(n * normal_impulse, rel_a);
    if let Some(b) = b.as_deref_mut() {
        b.apply_impulse(-n * normal_impulse, rel_b);
    }

    let rel_vel = rel_vel_at(&*a, b.as_deref());
    let tangent_vel = rel_vel - n * rel_vel.dot(n);
    let tangent_speed = tangent_vel.length();
    if tangent_speed > f32::EPSILON {
        let tangent = tangent_vel / tangent_speed;
        let friction_impulse = (tangent_speed / denom_along(&*a, b.as_deref(), tangent))
            .min(coefs.friction * normal_impulse);

        a.apply_impulse(-tangent * friction_impulse, rel_a);
        if let Some(b) = b {
            b.apply_impulse(tangent * friction_impulse, rel_b);
        }
    }

    normal_impulse
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use glam::Vec3A;

    use super::*;
    use crate::dynamics::{RigidBodyConstructionInfo, sphere_local_inertia};

    const COEFS: CollisionCoefs = CollisionCoefs {
        friction: 0.5,
        restitution: 0.5,
    };

    fn sphere() -> RigidBody {
        RigidBody::new(RigidBodyConstructionInfo::new(
            1.0,
            sphere_local_inertia(1.0, 1.0),
        ))
    }

    #[test]
    fn bounce_off_ground() {
        let mut rb = sphere();
        rb.linear_velocity = Vec3A::new(0.0, 0.0, -10.0);
        let contact = ContactPoint::new(Vec3A::new(0.0, 0.0, -1.0), Vec3A::Z, 0.1);

        resolve_contact(&mut rb, None, &contact, COEFS, 1.0);
        assert_abs_diff_eq!(rb.linear_velocity.z, 5.0, epsilon = 1e-5);
        assert_abs_diff_eq!(rb.transform.translation.z, 0.1, epsilon = 1e-6);
    }

    #[test]
    fn resting_contact_does_not_bounce() {
        let mut rb = sphere();
        rb.linear_velocity = Vec3A::new(0.0, 0.0, -0.5);
        let contact = ContactPoint::new(Vec3A::new(0.0, 0.0, -1.0), Vec3A::Z, 0.0);

        resolve_contact(&mut rb, None, &contact, COEFS, 1.0);
        assert_abs_diff_eq!(rb.linear_velocity.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn sliding_sphere_starts_rolling() {
        let mut rb = sphere();
        rb.linear_velocity = Vec3A::new(10.0, 0.0, -10.0);
        let contact = ContactPoint::new(Vec3A::new(0.0, 0.0, -1.0), Vec3A::Z, 0.0);

        resolve_contact(&mut rb, None, &contact, COEFS, 1.0);
        assert!(rb.linear_velocity.x < 10.0);
        assert!(rb.angular_velocity.y > 0.0);
    }

    #[test]
    fn equal_bodies_split_momentum() {
        let mut a = sphere();
        let mut b = sphere();
        a.transform.translation = Vec3A::new(-1.0, 0.0, 0.0);
        b.transform.translation = Vec3A::new(1.0, 0.0, 0.0);
        a.linear_velocity = Vec3A::new(4.0, 0.0, 0.0);

        let contact = ContactPoint::new(Vec3A::ZERO, -Vec3A::X, 0.0);
        let frictionless = CollisionCoefs {
            friction: 0.0,
            restitution: 0.0,
        };
        resolve_contact(&mut a, Some(&mut b), &contact, frictionless, 1.0);

        assert_abs_diff_eq!(a.linear_velocity.x, 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(b.linear_velocity.x, 2.0, epsilon = 1e-5);
    }
}
