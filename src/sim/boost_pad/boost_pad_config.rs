use glam::Vec3A;

use crate::{MutatorConfig, consts::MIRROR_SCALE};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoostPadConfig {
    pub pos: Vec3A,
    pub is_big: bool,
}

impl BoostPadConfig {
    #[must_use]
    pub const fn new(pos: Vec3A, is_big: bool) -> Self {
        Self { pos, is_big }
    }

    pub(crate) const fn get_max_cooldown(&self, mutator_config: &MutatorConfig) -> f32 {
        if self.is_big {
            mutator_config.boost_pad_cooldown_big
        } else {
            mutator_config.boost_pad_cooldown_small
        }
    }

    pub(crate) const fn get_boost_amount(&self, mutator_config: &MutatorConfig) -> f32 {
        if self.is_big {
            mutator_config.boost_pad_amount_big
        } else {
            mutator_config.boost_pad_amount_small
        }
    }

    /// Where this pad's counterpart sits on the other half of the field
    #[must_use]
    pub fn get_mirrored_pos(&self) -> Vec3A {
        self.pos * MIRROR_SCALE
    }
}
