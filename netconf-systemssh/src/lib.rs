//! # netconf-systemssh
//!
//! NETCONF session bootstrap over the system `ssh` binary.
//!
//! Instead of speaking SSH natively, the transport spawns the OpenSSH
//! client on a pseudo-terminal with `-s netconf`, answers its password
//! prompt, and hands back the first bytes of the server's `<hello>` so the
//! capabilities exchange can carry on without losing anything.
//!
//! ## Features
//!
//! - PTY backed ssh subprocess via portable-pty
//! - Interactive password login with repeated-prompt failure detection
//! - Readable diagnostics from ssh client errors (host keys, kex, routing)
//! - Login bounded by a single operation timeout
//! - Session access serialized through a shared guard
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use netconf_systemssh::{NetconfSystemSshTransport, SystemSshConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), netconf_systemssh::Error> {
//!     let config = SystemSshConfig::new("192.168.1.1")
//!         .port(830)
//!         .username("admin")
//!         .password("secret")
//!         .strict_key(false);
//!
//!     let mut transport = NetconfSystemSshTransport::new(config);
//!     let greeting = transport.open_netconf().await?;
//!     println!("{}", String::from_utf8_lossy(&greeting));
//!
//!     transport.close().await?;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod error;
pub mod pty;
pub mod transport;

// Re-export main types for convenience
pub use error::Error;
pub use pty::{PtyProcess, PtySession, PtySpawner, ReadOutcome};
pub use transport::{
    KeepaliveConfig, KeepaliveMode, NetconfSystemSshTransport, SystemSshConfig,
    SystemSshTransport,
};
