/// A continuous function made of straight segments between `(x, y)` control points.
///
/// Inputs before the first point or after the last point are clamped to the first or last output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearPieceCurve<const N: usize> {
    points: [(f32, f32); N],
}

impl<const N: usize> LinearPieceCurve<N> {
    /// `value_mappings` must be sorted by ascending x
    #[must_use]
    pub const fn new(value_mappings: [(f32, f32); N]) -> Self {
        assert!(N != 0, "a curve needs at least one point");

        let mut i = 1;
        while i < N {
            assert!(
                value_mappings[i - 1].0 < value_mappings[i].0,
                "curve points must be sorted by x"
            );
            i += 1;
        }

        Self {
            points: value_mappings,
        }
    }

    #[must_use]
    pub fn get_output(&self, input: f32) -> f32 {
        let (first_x, first_y) = self.points[0];
        if input <= first_x {
            return first_y;
        }

        let Some(end) = self.points.iter().position(|&(x, _)| x > input) else {
            return self.points[N - 1].1;
        };

        let (base_x, base_y) = self.points[end - 1];
        let (max_x, max_y) = self.points[end];
        let interp_frac = (input - base_x) / (max_x - base_x);
        (max_y - base_y) * interp_frac + base_y
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::LinearPieceCurve;
    use crate::consts::curves;

    #[test]
    fn clamps_outside_range() {
        let curve = LinearPieceCurve::new([(0.0, 1.0), (10.0, 3.0)]);
        assert_eq!(curve.get_output(-5.0), 1.0);
        assert_eq!(curve.get_output(50.0), 3.0);
    }

    #[test]
    fn interpolates_between_points() {
        let curve = LinearPieceCurve::new([(0.0, 0.0), (10.0, 10.0), (20.0, 0.0)]);
        assert_relative_eq!(curve.get_output(5.0), 5.0);
        assert_relative_eq!(curve.get_output(15.0), 5.0);
        assert_relative_eq!(curve.get_output(10.0), 10.0);
    }

    #[test]
    fn bump_curves() {
        assert_relative_eq!(curves::BUMP_VEL_AMOUNT_GROUND.get_output(1400.0), 1100.0);
        assert_relative_eq!(curves::BUMP_VEL_AMOUNT_AIR.get_output(2200.0), 1945.0);
        assert_relative_eq!(curves::BUMP_UPWARD_VEL_AMOUNT.get_output(5000.0), 417.0);
    }
}
