//! Networked multiplayer Tetris: a deterministic game engine behind a
//! slot-bounded TCP service with a persisted high-score list.

pub mod core;
pub mod error;
pub mod server;
pub mod types;
pub mod wire;
