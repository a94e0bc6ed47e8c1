//! Deterministic, headless car-soccar arena physics.
//!
//! An [`Arena`] owns the ball, every car and every boost pad, and advances them all
//! with [`Arena::step`]. State can be read back through the object API or flattened
//! into a canonical + mirrored [`GymState`] for learning code.

pub mod consts;

mod collision;
mod dynamics;
mod error;
mod logging;
mod math;
mod shared;
mod sim;

pub use error::*;
pub use logging::try_init as init_logger;
pub use math::*;
pub use shared::Aabb;
pub use sim::*;

pub use glam;
