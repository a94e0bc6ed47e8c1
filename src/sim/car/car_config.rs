use glam::Vec3A;

use crate::{
    ArenaError,
    consts::{UU_TO_BT, bullet_vehicle as vehicle_consts},
    dynamics::{NUM_WHEELS, WheelSetup},
};

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WheelPairConfig {
    /// Radius of both wheels
    pub wheel_radius: f32,
    /// How far out the suspension rests
    pub suspension_rest_length: f32,
    /// Where the wheel actually connects (suspension start position)
    ///
    /// NOTE: Y should ALWAYS be positive. It will be automatically negated when creating the second wheel.
    pub connection_point_offset: Vec3A,
}

impl WheelPairConfig {
    const fn new(wheel_radius: f32, suspension_rest_length: f32, offset: [f32; 3]) -> Self {
        Self {
            wheel_radius,
            suspension_rest_length,
            connection_point_offset: Vec3A::new(offset[0], offset[1], offset[2]),
        }
    }

    fn validate(&self, which: &str) -> Result<(), ArenaError> {
        if !self.wheel_radius.is_finite() || self.wheel_radius <= 0.0 {
            return Err(ArenaError::invalid_arg(format!(
                "{which} wheel radius must be finite and positive, got {}",
                self.wheel_radius
            )));
        }

        if !self.suspension_rest_length.is_finite()
            || self.suspension_rest_length <= vehicle_consts::MAX_SUSPENSION_TRAVEL
        {
            return Err(ArenaError::invalid_arg(format!(
                "{which} suspension rest length must be finite and longer than the suspension travel, got {}",
                self.suspension_rest_length
            )));
        }

        if !self.connection_point_offset.is_finite() {
            return Err(ArenaError::invalid_arg(format!(
                "{which} wheel connection point must be finite, got {}",
                self.connection_point_offset
            )));
        }

        Ok(())
    }
}

/// Hitbox and handling of a car, fixed when the car is added
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarConfig {
    /// Full size of hitbox (NOT the half-size/extent)
    pub hitbox_size: Vec3A,
    /// Offset of the hitbox (from it's origin)
    ///
    /// NOTE: Does not effect car's center of mass, that's always at local (0,0,0)
    pub hitbox_pos_offset: Vec3A,
    pub front_wheels: WheelPairConfig,
    pub back_wheels: WheelPairConfig,
    /// Car has three-wheel behavior (psyclops)
    ///
    /// NOTE: The psyclops actually has 4 wheels, the front two are combined
    pub three_wheels: bool,
    /// (|yaw| + |pitch| + |roll|) will need to be >= this in order to flip
    pub dodge_deadzone: f32,
}

impl Default for CarConfig {
    fn default() -> Self {
        Self::OCTANE
    }
}

impl CarConfig {
    pub const OCTANE: Self = Self::preset(
        [120.507, 86.6994, 38.6591],
        [13.8757, 0.0, 20.755],
        WheelPairConfig::new(12.5, 38.755, [51.25, 25.90, 20.755]),
        WheelPairConfig::new(15.0, 37.055, [-33.75, 29.50, 20.755]),
    );
    pub const DOMINUS: Self = Self::preset(
        [130.427, 85.7799, 33.8],
        [9.0, 0.0, 15.75],
        WheelPairConfig::new(12.0, 33.95, [50.30, 31.10, 15.75]),
        WheelPairConfig::new(13.5, 33.85, [-34.75, 33.00, 15.75]),
    );
    pub const PLANK: Self = Self::preset(
        [131.32, 87.1704, 31.8944],
        [9.00857, 0.0, 12.0942],
        WheelPairConfig::new(12.5, 31.9242, [49.97, 27.80, 12.0942]),
        WheelPairConfig::new(17.0, 27.9242, [-35.43, 20.28, 12.0942]),
    );
    pub const BREAKOUT: Self = Self::preset(
        [133.992, 83.021, 32.8],
        [12.5, 0.0, 11.75],
        WheelPairConfig::new(13.5, 29.7, [51.50, 26.67, 11.75]),
        WheelPairConfig::new(15.0, 29.666, [-35.75, 35.00, 11.75]),
    );
    pub const HYBRID: Self = Self::preset(
        [129.519, 84.6879, 36.6591],
        [13.8757, 0.0, 20.755],
        WheelPairConfig::new(12.5, 38.755, [51.25, 25.90, 20.755]),
        WheelPairConfig::new(15.0, 37.055, [-34.00, 29.50, 20.755]),
    );
    pub const MERC: Self = Self::preset(
        [123.22, 79.2103, 44.1591],
        [11.3757, 0.0, 21.505],
        WheelPairConfig::new(15.0, 39.505, [51.25, 25.90, 21.505]),
        WheelPairConfig::new(15.0, 39.105, [-33.75, 29.50, 21.505]),
    );
    pub const PSYCLOPS: Self = Self {
        three_wheels: true,
        ..Self::preset(
            [120.641, 86.8334, 38.7931],
            [13.8757, 0.0, 15.0],
            WheelPairConfig::new(12.5, 33.0, [51.25, 5.0, 15.0]),
            WheelPairConfig::new(15.0, 31.3, [-33.75, 29.50, 15.0]),
        )
    };

    /// In the order bindings number them
    pub const PRESETS: [Self; 7] = [
        Self::OCTANE,
        Self::DOMINUS,
        Self::PLANK,
        Self::BREAKOUT,
        Self::HYBRID,
        Self::MERC,
        Self::PSYCLOPS,
    ];

    const fn preset(
        size: [f32; 3],
        offset: [f32; 3],
        front_wheels: WheelPairConfig,
        back_wheels: WheelPairConfig,
    ) -> Self {
        Self {
            hitbox_size: Vec3A::new(size[0], size[1], size[2]),
            hitbox_pos_offset: Vec3A::new(offset[0], offset[1], offset[2]),
            front_wheels,
            back_wheels,
            three_wheels: false,
            dodge_deadzone: 0.5,
        }
    }

    pub fn from_preset_index(index: u8) -> Result<Self, ArenaError> {
        Self::PRESETS
            .get(usize::from(index))
            .copied()
            .ok_or_else(|| ArenaError::invalid_arg(format!("unknown car preset index {index}")))
    }

    pub fn validate(&self) -> Result<(), ArenaError> {
        if !self.hitbox_size.is_finite() || self.hitbox_size.cmple(Vec3A::ZERO).any() {
            return Err(ArenaError::invalid_arg(format!(
                "hitbox size must be finite and positive, got {}",
                self.hitbox_size
            )));
        }

        if !self.hitbox_pos_offset.is_finite() {
            return Err(ArenaError::invalid_arg(format!(
                "hitbox offset must be finite, got {}",
                self.hitbox_pos_offset
            )));
        }

        if !(0.0..=3.0).contains(&self.dodge_deadzone) {
            return Err(ArenaError::invalid_arg(format!(
                "dodge deadzone must be within 0..=3, got {}",
                self.dodge_deadzone
            )));
        }

        self.front_wheels.validate("front")?;
        self.back_wheels.validate("back")
    }

    #[must_use]
    pub fn hitbox_half_extent_bt(&self) -> Vec3A {
        self.hitbox_size * (0.5 * UU_TO_BT)
    }

    /// Front-right, front-left, back-right, back-left
    pub(crate) fn wheel_setups(&self) -> [WheelSetup; NUM_WHEELS] {
        std::array::from_fn(|i| {
            let front = i < 2;
            let left = i % 2 != 0;

            let (wheels, force_scale) = if front {
                (&self.front_wheels, vehicle_consts::SUSPENSION_FORCE_SCALE_FRONT)
            } else {
                (&self.back_wheels, vehicle_consts::SUSPENSION_FORCE_SCALE_BACK)
            };

            let mut connection_point = wheels.connection_point_offset;
            if left {
                connection_point.y *= -1.0;
            }

            WheelSetup {
                connection_point_cs: connection_point * UU_TO_BT,
                suspension_rest_length: (wheels.suspension_rest_length
                    - vehicle_consts::MAX_SUSPENSION_TRAVEL)
                    * UU_TO_BT,
                wheel_radius: wheels.wheel_radius * UU_TO_BT,
                suspension_force_scale: force_scale,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for (i, preset) in CarConfig::PRESETS.iter().enumerate() {
            preset.validate().unwrap();
            assert_eq!(CarConfig::from_preset_index(i as u8).unwrap(), *preset);
        }

        assert!(CarConfig::PSYCLOPS.three_wheels);
        assert!(CarConfig::from_preset_index(7).is_err());
    }

    #[test]
    fn left_wheels_are_mirrored() {
        let setups = CarConfig::OCTANE.wheel_setups();
        assert_eq!(setups[0].connection_point_cs.y, -setups[1].connection_point_cs.y);
        assert!(setups[0].connection_point_cs.x > 0.0);
        assert!(setups[2].connection_point_cs.x < 0.0);
    }

    #[test]
    fn rejects_degenerate_hitbox() {
        let mut config = CarConfig::OCTANE;
        config.hitbox_size.y = 0.0;
        assert!(config.validate().is_err());

        let mut config = CarConfig::OCTANE;
        config.dodge_deadzone = 4.0;
        assert!(config.validate().is_err());
    }
}
