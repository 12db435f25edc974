//! Error taxonomy for the service.
//!
//! Errors are local to one session unless stated otherwise: a protocol or
//! I/O error terminates that session only. Synchronization failures are not
//! represented here; a poisoned lock aborts the process (see `server::slots`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed client traffic (out-of-range input byte, truncated frame).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// All session slots are in use; the connection is rejected, not queued.
    #[error("no free session slot")]
    SlotsExhausted,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
