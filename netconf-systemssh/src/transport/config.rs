//! System ssh transport configuration.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::pty::TerminalSize;

/// Keepalive flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeepaliveMode {
    /// Transport-level keepalive, written straight into the session.
    Network,

    /// Protocol-level keepalive messages.
    Standard,
}

impl fmt::Display for KeepaliveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeepaliveMode::Network => write!(f, "network"),
            KeepaliveMode::Standard => write!(f, "standard"),
        }
    }
}

/// Keepalive settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeepaliveConfig {
    pub mode: KeepaliveMode,

    /// Time between keepalives.
    #[serde(default = "default_keepalive_interval", with = "duration_secs")]
    pub interval: Duration,

    /// Bytes sent for `network` keepalives.
    #[serde(default = "default_keepalive_pattern")]
    pub pattern: String,
}

impl KeepaliveConfig {
    /// Keepalive of the given mode with default interval and pattern.
    pub fn new(mode: KeepaliveMode) -> Self {
        Self {
            mode,
            interval: default_keepalive_interval(),
            pattern: default_keepalive_pattern(),
        }
    }
}

fn default_keepalive_interval() -> Duration {
    Duration::from_secs(30)
}

fn default_keepalive_pattern() -> String {
    "\u{5}".to_string()
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

/// Configuration for a NETCONF session over the system ssh binary.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use netconf_systemssh::SystemSshConfig;
///
/// let config = SystemSshConfig::new("192.168.1.1")
///     .port(830)
///     .username("admin")
///     .password("secret")
///     .strict_key(false)
///     .timeout_ops(Duration::from_secs(10));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug)]
pub struct SystemSshConfig {
    /// Target host (hostname or IP address).
    pub host: String,

    /// SSH port (default: 22).
    pub port: u16,

    /// Username passed with `-l`.
    pub auth_username: Option<String>,

    /// Password typed into the login prompt.
    pub auth_password: Option<SecretString>,

    /// Private key passed with `-i`.
    pub auth_private_key: Option<PathBuf>,

    /// Enforce host key checking in the ssh client (default: true).
    pub auth_strict_key: bool,

    /// ssh config file passed with `-F`; `/dev/null` when unset.
    pub ssh_config_file: Option<PathBuf>,

    /// known_hosts file used when `auth_strict_key` is set.
    pub ssh_known_hosts_file: Option<PathBuf>,

    /// ssh client binary.
    pub ssh_binary: String,

    /// Socket connect timeout handed to the ssh client.
    pub timeout_socket: Duration,

    /// Transport timeout handed to the ssh client as `ServerAliveInterval`.
    pub timeout_transport: Duration,

    /// Bound on the whole login dialogue. Zero disables it.
    pub timeout_ops: Duration,

    /// Line terminator sent after the credential.
    pub comms_return_char: String,

    /// PTY dimensions.
    pub terminal_size: TerminalSize,

    /// Keepalive started after login, if any.
    pub keepalive: Option<KeepaliveConfig>,
}

impl SystemSshConfig {
    /// Create a configuration for `host` with default settings.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            auth_username: None,
            auth_password: None,
            auth_private_key: None,
            auth_strict_key: true,
            ssh_config_file: None,
            ssh_known_hosts_file: None,
            ssh_binary: "ssh".to_string(),
            timeout_socket: Duration::from_secs(15),
            timeout_transport: Duration::from_secs(30),
            timeout_ops: Duration::from_secs(30),
            comms_return_char: "\n".to_string(),
            terminal_size: TerminalSize::default(),
            keepalive: None,
        }
    }

    /// Set the SSH port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the login username.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.auth_username = Some(username.into());
        self
    }

    /// Set the login password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.auth_password = Some(SecretString::from(password.into()));
        self
    }

    /// Set the private key file.
    pub fn private_key(mut self, path: impl Into<PathBuf>) -> Self {
        self.auth_private_key = Some(path.into());
        self
    }

    /// Enable or disable strict host key checking.
    pub fn strict_key(mut self, strict: bool) -> Self {
        self.auth_strict_key = strict;
        self
    }

    /// Set the ssh config file.
    pub fn ssh_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ssh_config_file = Some(path.into());
        self
    }

    /// Set the known_hosts file.
    pub fn known_hosts_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ssh_known_hosts_file = Some(path.into());
        self
    }

    /// Set the ssh client binary.
    pub fn ssh_binary(mut self, binary: impl Into<String>) -> Self {
        self.ssh_binary = binary.into();
        self
    }

    /// Set the socket connect timeout.
    pub fn timeout_socket(mut self, timeout: Duration) -> Self {
        self.timeout_socket = timeout;
        self
    }

    /// Set the transport timeout.
    pub fn timeout_transport(mut self, timeout: Duration) -> Self {
        self.timeout_transport = timeout;
        self
    }

    /// Set the login dialogue timeout.
    pub fn timeout_ops(mut self, timeout: Duration) -> Self {
        self.timeout_ops = timeout;
        self
    }

    /// Set the line terminator.
    pub fn return_char(mut self, return_char: impl Into<String>) -> Self {
        self.comms_return_char = return_char.into();
        self
    }

    /// Set terminal dimensions.
    pub fn terminal_size(mut self, width: u16, height: u16) -> Self {
        self.terminal_size = TerminalSize { width, height };
        self
    }

    /// Start a keepalive after login.
    pub fn keepalive(mut self, keepalive: KeepaliveConfig) -> Self {
        self.keepalive = Some(keepalive);
        self
    }

    /// Check the configuration before spawning anything.
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(invalid("host must not be empty"));
        }
        if self.port == 0 {
            return Err(invalid("port must not be zero"));
        }
        if self.comms_return_char.is_empty() {
            return Err(invalid("comms_return_char must not be empty"));
        }
        if self.ssh_binary.is_empty() {
            return Err(invalid("ssh_binary must not be empty"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> crate::Error {
    ConfigError::Invalid {
        message: message.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SystemSshConfig::new("router1");
        assert_eq!(config.port, 22);
        assert!(config.auth_strict_key);
        assert_eq!(config.comms_return_char, "\n");
        assert_eq!(config.timeout_ops, Duration::from_secs(30));
        assert!(config.keepalive.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_password_not_in_debug() {
        let config = SystemSshConfig::new("router1").password("hunter2");
        assert!(!format!("{config:?}").contains("hunter2"));
    }

    #[test]
    fn test_validate_rejects() {
        assert!(SystemSshConfig::new("").validate().is_err());
        assert!(SystemSshConfig::new("r1").port(0).validate().is_err());
        assert!(SystemSshConfig::new("r1").return_char("").validate().is_err());
    }

    #[test]
    fn test_keepalive_deserialize() {
        let ka: KeepaliveConfig =
            serde_json::from_str(r#"{"mode": "network", "interval": 10}"#).unwrap();
        assert_eq!(ka.mode, KeepaliveMode::Network);
        assert_eq!(ka.interval, Duration::from_secs(10));
        assert_eq!(ka.pattern, "\u{5}");

        let ka: KeepaliveConfig = serde_json::from_str(r#"{"mode": "standard"}"#).unwrap();
        assert_eq!(ka, KeepaliveConfig::new(KeepaliveMode::Standard));
    }
}
