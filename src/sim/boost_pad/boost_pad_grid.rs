use glam::{USizeVec2, Vec2, Vec3A};

use crate::{BoostPad, consts::boost_pads};

/// Buckets pads into a coarse 2D grid over the field so a car only tests the pads
/// near it
#[derive(Clone, Debug)]
pub(crate) struct BoostPadGrid {
    cells: Vec<Vec<usize>>,
    max_pad_z: f32,
}

impl BoostPadGrid {
    const GRID_EXTENT: Vec2 = Vec2::new(4096.0, 5120.0);
    const GRID_SIZE: Vec2 = Vec2::new(Self::GRID_EXTENT.x * 2.0, Self::GRID_EXTENT.y * 2.0);
    const CELL_COUNTS: USizeVec2 = USizeVec2::new(8, 10);
    const CELL_AMOUNT: usize = Self::CELL_COUNTS.x * Self::CELL_COUNTS.y;
    const CELL_SIZE: Vec2 = Vec2::new(
        Self::GRID_SIZE.x / Self::CELL_COUNTS.x as f32,
        Self::GRID_SIZE.y / Self::CELL_COUNTS.y as f32,
    );

    /// Returns `None` when a pad lies completely outside of the grid space
    #[must_use]
    pub fn new(pads: &[BoostPad]) -> Option<Self> {
        const BOOST_PAD_MAX_RAD: f32 = boost_pads::CYL_RAD_BIG.max(boost_pads::CYL_RAD_SMALL);

        let mut cells = vec![Vec::new(); Self::CELL_AMOUNT];
        for (pad_idx, pad) in pads.iter().enumerate() {
            let pad_pos = pad.pos().truncate();
            let (pad_aabb_min, pad_aabb_max) =
                (pad_pos - BOOST_PAD_MAX_RAD, pad_pos + BOOST_PAD_MAX_RAD);

            let mut overlapped_any = false;
            for (cell_idx, cell) in cells.iter_mut().enumerate() {
                let (cell_aabb_min, cell_aabb_max) = Self::calc_cell_aabb_2d(cell_idx);
                if pad_aabb_min.cmple(cell_aabb_max).all() && pad_aabb_max.cmpge(cell_aabb_min).all()
                {
                    overlapped_any = true;
                    cell.push(pad_idx);
                }
            }

            if !overlapped_any {
                return None;
            }
        }

        let max_pad_z = pads
            .iter()
            .map(|pad| pad.pos().z)
            .fold(f32::NEG_INFINITY, f32::max);

        Some(Self { cells, max_pad_z })
    }

    fn calc_cell_idx(pos: Vec3A) -> Option<usize> {
        let idx_2d = (pos.truncate() / Self::CELL_SIZE).floor().as_ivec2()
            + (Self::CELL_COUNTS / 2).as_ivec2();
        if idx_2d.x < 0 || idx_2d.y < 0 {
            return None;
        }

        let idx_2d = idx_2d.as_usizevec2();
        if idx_2d.x >= Self::CELL_COUNTS.x || idx_2d.y >= Self::CELL_COUNTS.y {
            return None;
        }

        Some(idx_2d.x + idx_2d.y * Self::CELL_COUNTS.x)
    }

    fn calc_cell_aabb_2d(cell_idx: usize) -> (Vec2, Vec2) {
        let idx_2d = USizeVec2::new(
            cell_idx % Self::CELL_COUNTS.x,
            cell_idx / Self::CELL_COUNTS.x,
        );
        let start_pos_2d = idx_2d.as_vec2() * Self::CELL_SIZE - Self::GRID_SIZE / 2.0;
        (start_pos_2d, start_pos_2d + Self::CELL_SIZE)
    }

    /// Indices of the pads a car at `pos` could be touching, in ascending order
    #[must_use]
    pub fn nearby_pads(&self, pos: Vec3A) -> &[usize] {
        // Pickup cylinders reach this far above a pad
        if pos.z > self.max_pad_z + boost_pads::CYL_HEIGHT {
            return &[];
        }

        Self::calc_cell_idx(pos).map_or(&[], |cell_idx| &self.cells[cell_idx])
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3A;

    use super::BoostPadGrid;
    use crate::{BoostPad, BoostPadConfig};

    fn pad(x: f32, y: f32, is_big: bool) -> BoostPad {
        BoostPad::new(BoostPadConfig::new(Vec3A::new(x, y, 70.0), is_big))
    }

    #[test]
    fn cells_cover_pad_radius() {
        let pads = [pad(0.0, -4240.0, false), pad(3584.0, 0.0, true)];
        let grid = BoostPadGrid::new(&pads).unwrap();

        assert_eq!(grid.nearby_pads(Vec3A::new(0.0, -4240.0, 17.0)), &[0]);
        // Across the cell border from the pad's center, still within its radius
        assert_eq!(grid.nearby_pads(Vec3A::new(-10.0, -4240.0, 17.0)), &[0]);
        assert_eq!(grid.nearby_pads(Vec3A::new(3584.0, 0.0, 17.0)), &[1]);

        assert!(grid.nearby_pads(Vec3A::new(0.0, 0.0, 17.0)).is_empty());
        assert!(grid.nearby_pads(Vec3A::new(0.0, -4240.0, 500.0)).is_empty());
        assert!(grid.nearby_pads(Vec3A::new(0.0, -5500.0, 17.0)).is_empty());
    }

    #[test]
    fn pad_outside_grid_is_rejected() {
        assert!(BoostPadGrid::new(&[pad(9000.0, 0.0, false)]).is_none());
    }
}
