//! Error types for netconf-systemssh.

use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::transport::KeepaliveMode;

/// Main error type for netconf-systemssh operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level errors (spawn, login dialogue, session I/O)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Keepalive errors
    #[error("Keepalive error: {0}")]
    Keepalive(#[from] KeepaliveError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// True if this is an authentication failure.
    pub fn is_authentication_failed(&self) -> bool {
        matches!(
            self,
            Error::Transport(TransportError::AuthenticationFailed { .. })
        )
    }

    /// True if this is an operation timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Transport(TransportError::OperationTimeout { .. }))
    }
}

/// Transport layer errors.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Login failed; needs operator action (credentials, host key settings)
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// The ssh client reported that it could not reach the host
    #[error("Connection not opened: {message}")]
    ConnectionNotOpened { message: String },

    /// A timed operation did not reach a terminal state in time
    #[error("{message} (after {timeout:?})")]
    OperationTimeout { message: String, timeout: Duration },

    /// Failed to allocate the PTY or spawn the ssh process
    #[error("Failed to spawn session: {message}")]
    Spawn { message: String },

    /// Transport not open
    #[error("Transport not open - call open_netconf() first")]
    NotOpen,

    /// Login has not completed on the current session
    #[error("Transport not authenticated")]
    NotAuthenticated,

    /// Transport already open
    #[error("Transport already open")]
    AlreadyOpen,

    /// Session output closed after login
    #[error("Session disconnected")]
    Disconnected,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl TransportError {
    pub(crate) fn auth_failed(message: impl Into<String>) -> Self {
        TransportError::AuthenticationFailed {
            message: message.into(),
        }
    }

    pub(crate) fn not_opened(message: impl Into<String>) -> Self {
        TransportError::ConnectionNotOpened {
            message: message.into(),
        }
    }
}

/// Keepalive errors. Both keepalive flavors are unavailable on this transport.
#[derive(Error, Debug)]
pub enum KeepaliveError {
    /// The transport cannot do this kind of keepalive at all
    #[error("{message} (mode: {mode})")]
    NotSupported { mode: KeepaliveMode, message: String },

    /// Reserved for protocol-level keepalive messages
    #[error("{message} (mode: {mode})")]
    NotImplemented { mode: KeepaliveMode, message: String },
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid transport configuration
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// Result type alias using netconf-systemssh's Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_predicates() {
        let err: Error = TransportError::auth_failed("nope").into();
        assert!(err.is_authentication_failed());
        assert!(!err.is_timeout());

        let err: Error = TransportError::OperationTimeout {
            message: "slow".into(),
            timeout: Duration::from_millis(10),
        }
        .into();
        assert!(err.is_timeout());
        assert!(!err.is_authentication_failed());
    }

    #[test]
    fn test_error_display() {
        let err: Error = TransportError::auth_failed("bad password").into();
        assert_eq!(
            err.to_string(),
            "Transport error: Authentication failed: bad password"
        );
    }
}
