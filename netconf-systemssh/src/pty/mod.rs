//! PTY session layer.
//!
//! The login dialogue is driven through an interactive ssh process attached
//! to a pseudo-terminal. This module defines the session seam the transport
//! is written against, plus the `portable-pty` implementation used in
//! production.

#[cfg(test)]
pub(crate) mod mock;
mod process;

pub use process::{PtyProcess, PtyProcessSpawner};

use std::future::Future;

use bytes::Bytes;

use crate::error::Result;

/// Result of a single read from a PTY session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Bytes in arrival order. Never empty.
    Data(Bytes),

    /// The process exited or closed its output.
    Eof,
}

/// Terminal dimensions requested for the PTY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub width: u16,
    pub height: u16,
}

impl Default for TerminalSize {
    fn default() -> Self {
        Self {
            width: 511,
            height: 24,
        }
    }
}

/// An interactive session attached to a PTY.
pub trait PtySession: Send + 'static {
    /// Wait for the next chunk of output.
    ///
    /// Implementations must be cancel-safe: dropping the returned future
    /// must not lose bytes that were already received.
    fn read(&mut self) -> impl Future<Output = Result<ReadOutcome>> + Send;

    /// Write raw bytes to the process input.
    fn write(&mut self, data: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Whether the underlying process is still running.
    fn is_alive(&mut self) -> bool;

    /// Terminate the process.
    fn close(&mut self) -> Result<()>;
}

/// Spawns PTY sessions from command tokens.
pub trait PtySpawner: Send + Sync {
    type Session: PtySession;

    /// Spawn `command[0]` with the remaining tokens as arguments.
    fn spawn(&self, command: &[String], size: TerminalSize) -> Result<Self::Session>;
}
