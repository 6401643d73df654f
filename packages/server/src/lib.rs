//! Real-time chat delivery core.
//!
//! Tracks which authenticated principal owns which live connection, which
//! connections are subscribed to which chat room, and fans chat events
//! (messages, read receipts, typing, presence) out to the right connections.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// application
pub mod config;
pub mod wiring;
