use glam::Vec3A;

/// Axis-aligned bounding box used to cull collision pairs before narrow-phase tests
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3A,
    pub max: Vec3A,
}

impl Aabb {
    pub const ZERO: Self = Self {
        min: Vec3A::ZERO,
        max: Vec3A::ZERO,
    };

    #[inline]
    #[must_use]
    pub const fn new(min: Vec3A, max: Vec3A) -> Self {
        Self { min, max }
    }

    #[inline]
    #[must_use]
    pub fn from_sphere(center: Vec3A, radius: f32) -> Self {
        Self::new(center - radius, center + radius)
    }

    /// Box around `center` with the given (non-negative) half extents
    #[inline]
    #[must_use]
    pub fn from_half_extents(center: Vec3A, half_extents: Vec3A) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    #[inline]
    #[must_use]
    pub fn center(&self) -> Vec3A {
        (self.min + self.max) * 0.5
    }

    #[inline]
    #[must_use]
    pub fn intersects(&self, rhs: &Self) -> bool {
        self.min.cmple(rhs.max).all() && self.max.cmpge(rhs.min).all()
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, point: Vec3A) -> bool {
        self.min.cmple(point).all() && self.max.cmpge(point).all()
    }

    #[must_use]
    pub fn expanded(self, margin: f32) -> Self {
        Self::new(self.min - margin, self.max + margin)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3A;

    use super::Aabb;

    #[test]
    fn touching_boxes_intersect() {
        let a = Aabb::new(Vec3A::ZERO, Vec3A::ONE);
        let b = Aabb::new(Vec3A::ONE, Vec3A::splat(2.0));
        let c = Aabb::from_sphere(Vec3A::splat(5.0), 1.0);

        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(a.expanded(3.0).intersects(&c));
        assert!(c.contains(Vec3A::splat(5.5)));
    }
}
