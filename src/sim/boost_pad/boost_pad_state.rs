#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoostPadState {
    /// Ticks left until the pad can be picked up again, 0 when it is active
    pub ticks_until_active: u64,
    /// The last car to pick the pad up
    pub prev_picked_up_by: Option<u64>,
}

impl BoostPadState {
    pub const DEFAULT: Self = Self {
        ticks_until_active: 0,
        prev_picked_up_by: None,
    };

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.ticks_until_active == 0
    }

    /// Seconds left until the pad is active again
    #[must_use]
    pub fn cooldown(&self, tick_rate: f32) -> f32 {
        self.ticks_until_active as f32 / tick_rate
    }
}
