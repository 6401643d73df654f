//! Utilities shared by the Hibiki packages: logging setup and time handling.

pub mod logger;
pub mod time;
