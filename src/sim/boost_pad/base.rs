use glam::Vec3A;

use crate::{BoostPadConfig, BoostPadState, CarState, MutatorConfig, consts::boost_pads};

/// A fixed boost pickup and its cooldown state machine.
///
/// Pickups happen when an active pad's cylinder contains a car's origin and the car
/// isn't already full. The pad then counts down a whole number of ticks before it is
/// active again.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoostPad {
    config: BoostPadConfig,
    cyl_radius: f32,
    pub(crate) state: BoostPadState,
}

impl BoostPad {
    #[must_use]
    pub const fn new(config: BoostPadConfig) -> Self {
        let cyl_radius = if config.is_big {
            boost_pads::CYL_RAD_BIG
        } else {
            boost_pads::CYL_RAD_SMALL
        };

        Self {
            config,
            cyl_radius,
            state: BoostPadState::DEFAULT,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &BoostPadConfig {
        &self.config
    }

    #[must_use]
    pub const fn get_state(&self) -> &BoostPadState {
        &self.state
    }

    #[must_use]
    pub const fn pos(&self) -> Vec3A {
        self.config.pos
    }

    #[must_use]
    pub const fn is_big(&self) -> bool {
        self.config.is_big
    }

    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.cyl_radius
    }

    pub(crate) const fn reset(&mut self) {
        self.state = BoostPadState::DEFAULT;
    }

    /// Counts the cooldown down by one tick
    pub(crate) const fn pre_tick_update(&mut self) {
        self.state.ticks_until_active = self.state.ticks_until_active.saturating_sub(1);
    }

    #[must_use]
    pub(crate) fn overlaps(&self, pos: Vec3A) -> bool {
        let dist_sq_2d = self.config.pos.truncate().distance_squared(pos.truncate());
        dist_sq_2d < self.cyl_radius * self.cyl_radius
            && (pos.z - self.config.pos.z).abs() <= boost_pads::CYL_HEIGHT
    }

    /// Returns true if boost was given
    pub(crate) fn maybe_give_car_boost(
        &mut self,
        car_id: u64,
        car_state: &mut CarState,
        mutator_config: &MutatorConfig,
        tick_rate: f32,
    ) -> bool {
        if !self.state.is_active()
            || car_state.boost >= mutator_config.car_max_boost_amount
            || !self.overlaps(car_state.phys.pos)
        {
            return false;
        }

        car_state.boost = (car_state.boost + self.config.get_boost_amount(mutator_config))
            .min(mutator_config.car_max_boost_amount);

        let cooldown = self.config.get_max_cooldown(mutator_config);
        self.state.ticks_until_active = (cooldown * tick_rate).round() as u64;
        self.state.prev_picked_up_by = Some(car_id);

        true
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3A;

    use super::BoostPad;
    use crate::{BoostPadConfig, CarState, MutatorConfig};

    fn car_at(pos: Vec3A, boost: f32) -> CarState {
        let mut state = CarState::DEFAULT;
        state.phys.pos = pos;
        state.boost = boost;
        state
    }

    #[test]
    fn small_pad_cooldown_in_ticks() {
        let mutator_config = MutatorConfig::default();
        let mut pad = BoostPad::new(BoostPadConfig::new(Vec3A::new(0.0, -4240.0, 70.0), false));
        let mut car = car_at(Vec3A::new(0.0, -4240.0, 17.0), 0.0);

        assert!(pad.maybe_give_car_boost(1, &mut car, &mutator_config, 120.0));
        assert_eq!(car.boost, mutator_config.boost_pad_amount_small);
        assert_eq!(pad.get_state().ticks_until_active, 480);
        assert_eq!(pad.get_state().prev_picked_up_by, Some(1));

        car.boost = 0.0;
        for _ in 0..479 {
            pad.pre_tick_update();
            assert!(!pad.maybe_give_car_boost(1, &mut car, &mutator_config, 120.0));
        }

        pad.pre_tick_update();
        assert!(pad.get_state().is_active());
        assert!(pad.maybe_give_car_boost(1, &mut car, &mutator_config, 120.0));
    }

    #[test]
    fn full_car_and_far_car_get_nothing() {
        let mutator_config = MutatorConfig::default();
        let mut pad = BoostPad::new(BoostPadConfig::new(Vec3A::new(3072.0, 0.0, 73.0), true));

        let mut full = car_at(Vec3A::new(3072.0, 0.0, 17.0), 100.0);
        assert!(!pad.maybe_give_car_boost(1, &mut full, &mutator_config, 120.0));

        let mut outside = car_at(Vec3A::new(3072.0 + 210.0, 0.0, 17.0), 0.0);
        assert!(!pad.maybe_give_car_boost(2, &mut outside, &mutator_config, 120.0));

        let mut above = car_at(Vec3A::new(3072.0, 0.0, 200.0), 0.0);
        assert!(!pad.maybe_give_car_boost(3, &mut above, &mutator_config, 120.0));

        let mut near = car_at(Vec3A::new(3072.0 + 200.0, 0.0, 17.0), 50.0);
        assert!(pad.maybe_give_car_boost(4, &mut near, &mutator_config, 120.0));
        assert_eq!(near.boost, 100.0);
        assert_eq!(pad.get_state().ticks_until_active, 1200);
    }
}
