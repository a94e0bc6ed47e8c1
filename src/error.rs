use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("No car with id {car_id} exists in this arena")]
    NotFound { car_id: u64 },
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("I/O error while (de)serializing arena: {0}")]
    Io(#[from] io::Error),
    #[error("Corrupt arena data: {0}")]
    Corrupt(String),
}

impl ArenaError {
    pub(crate) fn invalid_arg(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn removed_car(car_id: u64) -> Self {
        Self::InvalidOperation(format!("car {car_id} was removed from this arena"))
    }
}
