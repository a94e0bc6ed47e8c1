use crate::ArenaError;

/// Discriminants match the numbering used by existing bindings and observation layouts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum GameMode {
    #[default]
    Soccar = 0,
    /// Soccar arena, but the ball homes in on a goal and speeds up with every touch
    Heatseeker = 2,
    /// No goals, boost pads, or arena hull. The cars and ball will fall infinitely.
    TheVoid = 5,
}

impl GameMode {
    pub const ALL: [Self; 3] = [Self::Soccar, Self::Heatseeker, Self::TheVoid];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Soccar => "soccar",
            Self::Heatseeker => "heatseeker",
            Self::TheVoid => "void",
        }
    }

    /// Whether the arena has the soccar hull, goals and boost pads
    #[must_use]
    pub const fn has_soccar_arena(self) -> bool {
        !matches!(self, Self::TheVoid)
    }
}

impl TryFrom<u8> for GameMode {
    type Error = ArenaError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|mode| *mode as u8 == value)
            .ok_or_else(|| ArenaError::invalid_arg(format!("unknown game mode {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::GameMode;

    #[test]
    fn from_index() {
        assert_eq!(GameMode::try_from(2).unwrap(), GameMode::Heatseeker);
        assert_eq!(GameMode::try_from(5).unwrap().name(), "void");
        assert!(GameMode::try_from(1).is_err());
    }
}
