mod setup;

pub use setup::*;

use std::sync::{Arc, Mutex};

use rocketsim_core::{CarControls, GymState, PHYS_STATE_FLOATS};

pub fn quick_drive(throttle: f32, steer: f32, boost: bool, handbrake: bool) -> CarControls {
    CarControls {
        throttle,
        steer,
        boost,
        handbrake,

        pitch: 0.0,
        yaw: 0.0,
        roll: 0.0,
        jump: false,
    }
}

pub fn quick_air(pitch: f32, yaw: f32, roll: f32, jump: bool, boost: bool) -> CarControls {
    CarControls {
        throttle: 0.0,
        steer: 0.0,

        pitch,
        yaw,
        roll,
        jump,
        boost,

        handbrake: false,
    }
}

/// Shared log that callbacks push into and the test reads back afterwards
pub type EventLog<T> = Arc<Mutex<Vec<T>>>;

pub fn event_log<T>() -> EventLog<T> {
    Arc::new(Mutex::new(Vec::new()))
}

/// Ball view followed by every car's physics floats, per view
pub fn phys_views(gym_state: &GymState) -> [Vec<[f32; PHYS_STATE_FLOATS]>; 2] {
    std::array::from_fn(|view| {
        let mut out = vec![gym_state.ball[view]];
        for car in &gym_state.cars {
            let mut phys = [0.0; PHYS_STATE_FLOATS];
            phys.copy_from_slice(&car[view][rocketsim_core::CAR_PREFIX_FLOATS..]);
            out.push(phys);
        }
        out
    })
}
