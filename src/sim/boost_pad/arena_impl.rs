use crate::{Arena, ArenaError, BoostPad, BoostPadConfig, BoostPadState};

impl Arena {
    /// Every pad, sorted by position (y first, then x)
    #[inline]
    #[must_use]
    pub fn boost_pads(&self) -> &[BoostPad] {
        &self.objects.boost_pads
    }

    #[inline]
    #[must_use]
    pub fn num_boost_pads(&self) -> usize {
        self.objects.boost_pads.len()
    }

    fn pad_index_error(&self, index: usize) -> ArenaError {
        ArenaError::InvalidOperation(format!(
            "boost pad index {index} is out of range, the arena has {} pads",
            self.objects.boost_pads.len()
        ))
    }

    pub fn get_boost_pad_config(&self, index: usize) -> Result<&BoostPadConfig, ArenaError> {
        self.objects
            .boost_pads
            .get(index)
            .map(BoostPad::config)
            .ok_or_else(|| self.pad_index_error(index))
    }

    pub fn get_boost_pad_state(&self, index: usize) -> Result<&BoostPadState, ArenaError> {
        self.objects
            .boost_pads
            .get(index)
            .map(BoostPad::get_state)
            .ok_or_else(|| self.pad_index_error(index))
    }

    pub fn set_boost_pad_state(
        &mut self,
        index: usize,
        state: BoostPadState,
    ) -> Result<(), ArenaError> {
        if index >= self.objects.boost_pads.len() {
            return Err(self.pad_index_error(index));
        }

        self.objects.boost_pads[index].state = state;
        Ok(())
    }
}
