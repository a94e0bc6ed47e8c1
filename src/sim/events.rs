use crate::{Arena, Team};

/// A discrete game event produced during a tick.
///
/// Events are queued in the order the tick produced them and handed to the registered
/// callbacks at the end of that tick, before the tick counter advances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArenaEvent {
    /// A car hit another with its bumper
    CarBump {
        bumper_id: u64,
        victim_id: u64,
        is_demo: bool,
    },
    BoostPickup {
        car_id: u64,
        pad_idx: usize,
    },
    GoalScore {
        scoring_team: Team,
    },
}

pub(crate) type CarBumpCallback = Box<dyn FnMut(&Arena, u64, u64, bool) + Send>;
pub(crate) type BoostPickupCallback = Box<dyn FnMut(&Arena, u64, usize) + Send>;
pub(crate) type GoalScoreCallback = Box<dyn FnMut(&Arena, Team) + Send>;

/// At most one callback per event kind
#[derive(Default)]
pub(crate) struct ArenaCallbacks {
    pub car_bump: Option<CarBumpCallback>,
    pub boost_pickup: Option<BoostPickupCallback>,
    pub goal_score: Option<GoalScoreCallback>,
}

impl ArenaCallbacks {
    pub fn names(&self) -> Vec<&'static str> {
        [
            self.car_bump.as_ref().map(|_| "car_bump"),
            self.boost_pickup.as_ref().map(|_| "boost_pickup"),
            self.goal_score.as_ref().map(|_| "goal_score"),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

impl Arena {
    /// Called for every bumper hit between two cars, with
    /// `(arena, bumper_id, victim_id, is_demo, user_data)`.
    ///
    /// Replaces any previous bump callback.
    pub fn set_car_bump_callback<T: Send + 'static>(
        &mut self,
        mut callback: impl FnMut(&Arena, u64, u64, bool, &mut T) + Send + 'static,
        mut user_data: T,
    ) {
        self.callbacks.car_bump = Some(Box::new(move |arena, bumper_id, victim_id, is_demo| {
            callback(arena, bumper_id, victim_id, is_demo, &mut user_data);
        }));
    }

    /// Called whenever a car picks up a boost pad, with `(arena, car_id, pad_idx, user_data)`
    pub fn set_boost_pickup_callback<T: Send + 'static>(
        &mut self,
        mut callback: impl FnMut(&Arena, u64, usize, &mut T) + Send + 'static,
        mut user_data: T,
    ) {
        self.callbacks.boost_pickup = Some(Box::new(move |arena, car_id, pad_idx| {
            callback(arena, car_id, pad_idx, &mut user_data);
        }));
    }

    /// Called once when the ball enters a goal, with `(arena, scoring_team, user_data)`
    pub fn set_goal_score_callback<T: Send + 'static>(
        &mut self,
        mut callback: impl FnMut(&Arena, Team, &mut T) + Send + 'static,
        mut user_data: T,
    ) {
        self.callbacks.goal_score = Some(Box::new(move |arena, scoring_team| {
            callback(arena, scoring_team, &mut user_data);
        }));
    }

    pub fn clear_car_bump_callback(&mut self) {
        self.callbacks.car_bump = None;
    }

    pub fn clear_boost_pickup_callback(&mut self) {
        self.callbacks.boost_pickup = None;
    }

    pub fn clear_goal_score_callback(&mut self) {
        self.callbacks.goal_score = None;
    }

    /// Events produced by the most recent tick, in production order
    #[must_use]
    pub fn last_tick_events(&self) -> &[ArenaEvent] {
        &self.objects.events
    }

    /// Hands the tick's queued events to their callbacks.
    ///
    /// Each callback is taken out of its slot while it runs so it can borrow the arena.
    pub(crate) fn dispatch_events(&mut self) {
        for i in 0..self.objects.events.len() {
            match self.objects.events[i] {
                ArenaEvent::CarBump {
                    bumper_id,
                    victim_id,
                    is_demo,
                } => {
                    if let Some(mut callback) = self.callbacks.car_bump.take() {
                        callback(self, bumper_id, victim_id, is_demo);
                        self.callbacks.car_bump = Some(callback);
                    }
                }
                ArenaEvent::BoostPickup { car_id, pad_idx } => {
                    if let Some(mut callback) = self.callbacks.boost_pickup.take() {
                        callback(self, car_id, pad_idx);
                        self.callbacks.boost_pickup = Some(callback);
                    }
                }
                ArenaEvent::GoalScore { scoring_team } => {
                    if let Some(mut callback) = self.callbacks.goal_score.take() {
                        callback(self, scoring_team);
                        self.callbacks.goal_score = Some(callback);
                    }
                }
            }
        }
    }
}
