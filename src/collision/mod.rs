mod arena_geometry;
mod obb;

pub use arena_geometry::*;
pub use obb::*;
