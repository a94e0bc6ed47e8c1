mod contact;
mod rigid_body;
mod transform_util;
mod vehicle;

pub use contact::*;
pub use rigid_body::*;
pub use transform_util::*;
pub use vehicle::*;
