mod arena_impl;
mod base;
mod boost_pad_config;
mod boost_pad_grid;
mod boost_pad_state;

pub use base::*;
pub use boost_pad_config::*;
pub(crate) use boost_pad_grid::*;
pub use boost_pad_state::*;
