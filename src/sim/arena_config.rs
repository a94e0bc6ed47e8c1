use crate::{ArenaError, BoostPadConfig};

/// Construction-time arena settings
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArenaConfig {
    /// Seed of the arena's only random number generator (respawn spots, kickoff shuffles)
    pub rng_seed: u64,
    /// Don't integrate the ball's orientation
    pub no_ball_rot: bool,
    /// Ball integration steps per tick
    pub ball_sub_steps: u32,
    /// Use a custom list of boost pads (`custom_boost_pads`) instead of the normal one
    pub use_custom_boost_pads: bool,
    /// Custom boost pads to use, if `use_custom_boost_pads`
    pub custom_boost_pads: Vec<BoostPadConfig>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ArenaConfig {
    pub const DEFAULT: Self = Self {
        rng_seed: 0,
        no_ball_rot: true,
        ball_sub_steps: 2,
        use_custom_boost_pads: false,
        custom_boost_pads: Vec::new(),
    };

    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.ball_sub_steps == 0 {
            return Err(ArenaError::invalid_arg("ball_sub_steps must be at least 1"));
        }

        if self.use_custom_boost_pads
            && let Some(pad) = self
                .custom_boost_pads
                .iter()
                .find(|pad| !pad.pos.is_finite())
        {
            return Err(ArenaError::invalid_arg(format!(
                "custom boost pad position must be finite, got {}",
                pad.pos
            )));
        }

        Ok(())
    }
}
