//! Utilities shared by the Tap Bridge packages.

pub mod logger;
pub mod time;
