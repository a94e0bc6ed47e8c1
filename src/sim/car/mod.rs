mod car;
mod car_config;
mod car_controls;
mod car_state;
mod car_stats;

pub use car::*;
pub use car_config::*;
pub use car_controls::*;
pub use car_state::*;
pub use car_stats::*;
