//! ssh command line construction.

use super::config::SystemSshConfig;

/// Builds the command tokens used to spawn the ssh process.
pub trait OpenCommand: Send + Sync {
    /// Tokens with the program as the first element.
    fn build(&self, config: &SystemSshConfig) -> Vec<String>;
}

/// Plain interactive ssh invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSshCommand;

impl OpenCommand for SystemSshCommand {
    fn build(&self, config: &SystemSshConfig) -> Vec<String> {
        let mut cmd = vec![
            config.ssh_binary.clone(),
            config.host.clone(),
            "-p".to_string(),
            config.port.to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={}", config.timeout_socket.as_secs()),
            "-o".to_string(),
            format!("ServerAliveInterval={}", config.timeout_transport.as_secs()),
        ];

        if let Some(ref user) = config.auth_username {
            cmd.extend(["-l".to_string(), user.clone()]);
        }

        if let Some(ref key) = config.auth_private_key {
            cmd.extend(["-i".to_string(), key.display().to_string()]);
        }

        if config.auth_strict_key {
            cmd.extend(["-o".to_string(), "StrictHostKeyChecking=yes".to_string()]);
            if let Some(ref known_hosts) = config.ssh_known_hosts_file {
                cmd.extend([
                    "-o".to_string(),
                    format!("UserKnownHostsFile={}", known_hosts.display()),
                ]);
            }
        } else {
            cmd.extend([
                "-o".to_string(),
                "StrictHostKeyChecking=no".to_string(),
                "-o".to_string(),
                "UserKnownHostsFile=/dev/null".to_string(),
            ]);
        }

        match config.ssh_config_file {
            Some(ref path) => cmd.extend(["-F".to_string(), path.display().to_string()]),
            None => cmd.extend(["-F".to_string(), "/dev/null".to_string()]),
        }

        cmd
    }
}

/// Wraps another builder and selects the remote `netconf` subsystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetconfSubsystem<C> {
    inner: C,
}

impl<C: OpenCommand> NetconfSubsystem<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<C: OpenCommand> OpenCommand for NetconfSubsystem<C> {
    fn build(&self, config: &SystemSshConfig) -> Vec<String> {
        let mut cmd = self.inner.build(config);
        cmd.extend(["-s".to_string(), "netconf".to_string()]);
        cmd
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_base_command() {
        let config = SystemSshConfig::new("router1")
            .port(830)
            .timeout_socket(Duration::from_secs(5))
            .timeout_transport(Duration::from_secs(10));

        let cmd = SystemSshCommand.build(&config);
        assert_eq!(
            cmd,
            [
                "ssh",
                "router1",
                "-p",
                "830",
                "-o",
                "ConnectTimeout=5",
                "-o",
                "ServerAliveInterval=10",
                "-o",
                "StrictHostKeyChecking=yes",
                "-F",
                "/dev/null",
            ]
        );
    }

    #[test]
    fn test_optional_flags() {
        let config = SystemSshConfig::new("router1")
            .username("admin")
            .private_key("/keys/id_ed25519")
            .strict_key(false)
            .ssh_config_file("/etc/ssh/ssh_config");

        let cmd = SystemSshCommand.build(&config).join(" ");
        assert!(cmd.contains("-l admin"));
        assert!(cmd.contains("-i /keys/id_ed25519"));
        assert!(cmd.contains("-o StrictHostKeyChecking=no -o UserKnownHostsFile=/dev/null"));
        assert!(cmd.ends_with("-F /etc/ssh/ssh_config"));
    }

    #[test]
    fn test_known_hosts_only_with_strict_key() {
        let config = SystemSshConfig::new("r1").known_hosts_file("/tmp/known");
        let cmd = SystemSshCommand.build(&config).join(" ");
        assert!(cmd.contains("UserKnownHostsFile=/tmp/known"));

        let config = SystemSshConfig::new("r1")
            .known_hosts_file("/tmp/known")
            .strict_key(false);
        let cmd = SystemSshCommand.build(&config).join(" ");
        assert!(!cmd.contains("/tmp/known"));
    }

    #[test]
    fn test_netconf_subsystem_appends_two_tokens() {
        let config = SystemSshConfig::new("router1").username("admin");
        let base = SystemSshCommand.build(&config);
        let netconf = NetconfSubsystem::new(SystemSshCommand).build(&config);

        assert_eq!(netconf.len(), base.len() + 2);
        assert_eq!(&netconf[..base.len()], &base[..]);
        assert_eq!(&netconf[base.len()..], ["-s", "netconf"]);
    }
}
