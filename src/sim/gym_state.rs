use crate::{Arena, BallState, Car, GameMode, PhysState};

pub const PHYS_STATE_FLOATS: usize = 25;
pub const CAR_PREFIX_FLOATS: usize = 11;
pub const CAR_FLOATS: usize = CAR_PREFIX_FLOATS + PHYS_STATE_FLOATS;

/// Flattened observation of a whole arena, with every entry seen both as-is and from
/// the other team's side of the field.
///
/// Index 0 of each `[_; 2]` pair is the canonical view, index 1 the mirrored one.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GymState {
    /// `[game_mode, last_touch_car_id, blue_score, orange_score]`
    pub header: [f32; 4],
    /// 1.0 for each active pad, 0.0 for each cooling pad
    pub pads: [Vec<f32>; 2],
    /// `pos(3) quat(4, w first) vel(3) ang_vel(3) rot(9) pyr(3)`
    pub ball: [[f32; PHYS_STATE_FLOATS]; 2],
    /// By ascending car id. `id team goals shots saves demos boost_pickups is_demoed
    /// on_ground ball_touched_last_tick boost`, then the same 25 floats as the ball
    pub cars: Vec<[[f32; CAR_FLOATS]; 2]>,
}

fn write_phys_state(phys: &PhysState, out: &mut [f32]) {
    let rot_mat = phys.rot_mat;

    out[0..3].copy_from_slice(&phys.pos.to_array());
    out[3..7].copy_from_slice(&phys.get_quat_wxyz());
    out[7..10].copy_from_slice(&phys.vel.to_array());
    out[10..13].copy_from_slice(&phys.ang_vel.to_array());
    out[13..16].copy_from_slice(&rot_mat.x_axis.to_array());
    out[16..19].copy_from_slice(&rot_mat.y_axis.to_array());
    out[19..22].copy_from_slice(&rot_mat.z_axis.to_array());
    out[22..25].copy_from_slice(&phys.get_angle().as_array());
}

fn ball_floats(state: &BallState, mirrored: bool) -> [f32; PHYS_STATE_FLOATS] {
    let phys = if mirrored {
        state.phys.get_mirrored()
    } else {
        state.phys
    };

    let mut out = [0.0; PHYS_STATE_FLOATS];
    write_phys_state(&phys, &mut out);
    out
}

fn car_floats(car: &Car, ball_touched_last_tick: bool, mirrored: bool) -> [f32; CAR_FLOATS] {
    let state = car.get_state();
    let stats = car.stats();

    let mut out = [0.0; CAR_FLOATS];
    out[..CAR_PREFIX_FLOATS].copy_from_slice(&[
        car.id() as f32,
        f32::from(car.team() as u8),
        stats.goals as f32,
        stats.shots as f32,
        stats.saves as f32,
        stats.demos as f32,
        stats.boost_pickups as f32,
        f32::from(u8::from(state.is_demoed)),
        f32::from(u8::from(state.is_on_ground)),
        f32::from(u8::from(ball_touched_last_tick)),
        state.boost,
    ]);

    let phys = if mirrored {
        state.phys.get_mirrored()
    } else {
        state.phys
    };
    write_phys_state(&phys, &mut out[CAR_PREFIX_FLOATS..]);

    out
}

impl GymState {
    /// Every float in a single row: header, canonical pads, mirrored pads, both ball
    /// views, then both views of each car
    #[must_use]
    pub fn flatten(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(
            self.header.len()
                + self.pads[0].len() * 2
                + PHYS_STATE_FLOATS * 2
                + self.cars.len() * CAR_FLOATS * 2,
        );

        out.extend_from_slice(&self.header);
        out.extend(self.pads.iter().flatten());
        out.extend(self.ball.iter().flatten());
        out.extend(self.cars.iter().flatten().flatten());

        out
    }

    #[must_use]
    pub fn game_mode(&self) -> Option<GameMode> {
        GameMode::try_from(self.header[0] as u8).ok()
    }
}

impl Arena {
    /// Builds both views of the current state; nothing is cached between calls
    #[must_use]
    pub fn get_gym_state(&self) -> GymState {
        let ball_state = self.get_ball_state();

        let header = [
            f32::from(self.game_mode() as u8),
            ball_state.last_hit_car_id() as f32,
            self.blue_score() as f32,
            self.orange_score() as f32,
        ];

        let pads = self.boost_pads();
        let pad_active = |idx: usize| f32::from(u8::from(pads[idx].get_state().is_active()));
        let canonical_pads = (0..pads.len()).map(pad_active).collect();
        let mirrored_pads = self
            .mirrored_pad_indices()
            .iter()
            .map(|&idx| pad_active(idx))
            .collect();

        let last_tick = self.tick_count().checked_sub(1);
        let cars = self
            .get_cars()
            .map(|car| {
                let touched = last_tick.is_some_and(|tick| car.get_state().touched_ball_on_tick(tick));
                [
                    car_floats(car, touched, false),
                    car_floats(car, touched, true),
                ]
            })
            .collect();

        GymState {
            header,
            pads: [canonical_pads, mirrored_pads],
            ball: [ball_floats(ball_state, false), ball_floats(ball_state, true)],
            cars,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::{CAR_FLOATS, PHYS_STATE_FLOATS};
    use crate::{Arena, CarConfig, GameMode, Team};

    #[test]
    fn layout_sizes() {
        let mut arena = Arena::new(GameMode::Soccar);
        arena.add_car(Team::Blue, CarConfig::OCTANE).unwrap();
        arena.add_car(Team::Orange, CarConfig::DOMINUS).unwrap();
        arena.step(3);

        let gym_state = arena.get_gym_state();
        assert_eq!(gym_state.pads[0].len(), 34);
        assert_eq!(gym_state.pads[1].len(), 34);
        assert_eq!(gym_state.cars.len(), 2);
        assert_eq!(gym_state.game_mode(), Some(GameMode::Soccar));

        let flat = gym_state.flatten();
        assert_eq!(flat.len(), 4 + 34 * 2 + PHYS_STATE_FLOATS * 2 + 2 * CAR_FLOATS * 2);
        assert_abs_diff_eq!(flat[4 + 34 * 2 + PHYS_STATE_FLOATS * 2], 1.0);
    }

    #[test]
    fn mirrored_pads_swap_halves() {
        let arena = Arena::new(GameMode::Soccar);
        let pads = arena.boost_pads();

        for (i, &mirrored_idx) in arena.mirrored_pad_indices().iter().enumerate() {
            let mirrored_pos = pads[i].config().get_mirrored_pos();
            assert_ne!(mirrored_idx, i);
            assert_eq!(pads[mirrored_idx].is_big(), pads[i].is_big());
            assert!(pads[mirrored_idx].pos().distance(mirrored_pos) < 5.0);
            assert_eq!(arena.mirrored_pad_indices()[mirrored_idx], i);
        }
    }

    #[test]
    fn slightly_asymmetric_pads_still_pair_up() {
        let arena = Arena::new(GameMode::Soccar);
        let pads = arena.boost_pads();
        let find = |x: f32, y: f32| {
            pads.iter()
                .position(|pad| pad.pos().x == x && pad.pos().y == y)
                .unwrap()
        };

        let (south, north) = (find(940.0, -3308.0), find(-940.0, 3310.0));
        assert_eq!(arena.mirrored_pad_indices()[south], north);
        assert_eq!(arena.mirrored_pad_indices()[north], south);
    }
}
