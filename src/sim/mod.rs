mod arena;
mod arena_config;
mod ball;
mod boost_pad;
mod car;
mod events;
mod game_mode;
mod gym_state;
mod linear_piece_curve;
mod mutator_config;
mod phys_state;
mod serialize;
mod team;

pub use arena::*;
pub use arena_config::*;
pub use ball::*;
pub use boost_pad::*;
pub use car::*;
pub use events::*;
pub use game_mode::*;
pub use gym_state::*;
pub use linear_piece_curve::*;
pub use mutator_config::*;
pub use phys_state::*;
pub use team::*;
