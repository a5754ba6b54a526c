//! Keepalives for the system ssh NETCONF transport.
//!
//! Neither flavor is available here. Requesting one fails immediately
//! rather than silently doing nothing, so callers never believe the
//! connection is being kept alive when it is not.

use super::config::{KeepaliveConfig, KeepaliveMode};
use crate::error::{KeepaliveError, Result};

/// `network` keepalives write straight into the session, which would
/// corrupt the NETCONF message stream.
pub fn keepalive_network() -> Result<()> {
    Err(KeepaliveError::NotSupported {
        mode: KeepaliveMode::Network,
        message: "`network` style keepalives not supported with netconf".to_string(),
    }
    .into())
}

// TODO: send protocol level keepalives once an RPC layer sits on top of
// the transport.
pub fn keepalive_standard() -> Result<()> {
    Err(KeepaliveError::NotImplemented {
        mode: KeepaliveMode::Standard,
        message: "keepalives not yet implemented".to_string(),
    }
    .into())
}

/// Start the keepalive described by `config`.
pub fn start_keepalive(config: &KeepaliveConfig) -> Result<()> {
    match config.mode {
        KeepaliveMode::Network => keepalive_network(),
        KeepaliveMode::Standard => keepalive_standard(),
    }
}
