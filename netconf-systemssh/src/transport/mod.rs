//! System ssh transport for NETCONF.
//!
//! This module builds the ssh command line, spawns it on a PTY and drives
//! the interactive login up to the start of the server's `<hello>`.

pub mod auth;
pub mod command;
pub mod config;
mod guard;
pub mod keepalive;
pub mod message;
mod systemssh;
mod timeout;

pub use auth::{AUTH_TIMEOUT_MESSAGE, NetconfAuthenticator};
pub use command::{NetconfSubsystem, OpenCommand, SystemSshCommand};
pub use config::{KeepaliveConfig, KeepaliveMode, SystemSshConfig};
pub use guard::{SessionGuard, SessionLock};
pub use systemssh::{
    CredentialExchange, NetconfPasswordExchange, NetconfSystemSshTransport, SystemSshTransport,
};
pub use timeout::operation_timeout;
