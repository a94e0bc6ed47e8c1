/// Cumulative per-car counters, kept across respawns and kickoffs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarStats {
    pub goals: u32,
    pub shots: u32,
    pub saves: u32,
    /// Demolitions dealt to other cars
    pub demos: u32,
    pub boost_pickups: u32,
}
