//! Tap Bridge server library.
//!
//! Relays "tap" events from browser clients over WebSocket to a single
//! downstream sound engine over UDP, and broadcasts every tap back to all
//! connected clients.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
