pub mod delivery;
pub mod error;
pub mod ports;

pub use error::{AppError, ErrorCode};
