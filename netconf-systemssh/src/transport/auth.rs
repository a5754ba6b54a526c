//! Password login over the PTY, up to the start of the NETCONF greeting.
//!
//! The ssh client is driven interactively: every chunk read from the PTY is
//! appended to an accumulator which is scanned for a password prompt or the
//! server's `<hello`. The credential is typed in when a prompt shows up and
//! the accumulator starts over, so the buffer returned on success holds only
//! what the server sent after the last credential, which is the beginning of
//! its capabilities.
//!
//! A second prompt is taken as proof that the credential was rejected.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use bytes::Bytes;
use log::{debug, error, info};
use secrecy::ExposeSecret;

use super::config::SystemSshConfig;
use super::guard::SessionGuard;
use super::message::ssh_message_handler;
use super::timeout::operation_timeout;
use crate::channel::{LoginScan, OutputAccumulator, scan_login_output};
use crate::error::{Result, TransportError};
use crate::pty::{PtySession, ReadOutcome};

/// Message carried by the timeout error of the login dialogue.
pub const AUTH_TIMEOUT_MESSAGE: &str = "Timed out looking for SSH login password prompt";

/// Prompt occurrences tolerated before the login counts as failed.
const MAX_PASSWORD_PROMPTS: usize = 1;

/// One login attempt against a freshly spawned session.
#[derive(Clone, Copy)]
pub struct NetconfAuthenticator<'a> {
    host: &'a str,
    password: &'a str,
    return_char: &'a str,
    timeout: Duration,
}

impl<'a> NetconfAuthenticator<'a> {
    pub fn new(host: &'a str, password: &'a str, return_char: &'a str, timeout: Duration) -> Self {
        Self {
            host,
            password,
            return_char,
            timeout,
        }
    }

    /// Authenticator using the credentials and timeouts of `config`.
    ///
    /// A missing password is sent as an empty line.
    pub fn from_config(config: &'a SystemSshConfig) -> Self {
        let password = config
            .auth_password
            .as_ref()
            .map(|p| p.expose_secret())
            .unwrap_or_default();

        Self::new(
            &config.host,
            password,
            &config.comms_return_char,
            config.timeout_ops,
        )
    }

    /// Drive the login dialogue until the greeting starts.
    ///
    /// The session stays locked for the whole dialogue, bounded together
    /// with the lock acquisition by the operation timeout. On success
    /// `authenticated` is set and the bytes read since the last credential
    /// are returned untouched.
    pub async fn authenticate<S: PtySession>(
        &self,
        session: &SessionGuard<S>,
        authenticated: &AtomicBool,
    ) -> Result<Bytes> {
        operation_timeout(self.timeout, AUTH_TIMEOUT_MESSAGE, async {
            let mut session = session.lock().await;
            self.negotiate(&mut *session, authenticated).await
        })
        .await
    }

    async fn negotiate<S: PtySession>(
        &self,
        session: &mut S,
        authenticated: &AtomicBool,
    ) -> Result<Bytes> {
        let mut output = OutputAccumulator::new();
        let mut password_count = 0;

        loop {
            match session.read().await? {
                ReadOutcome::Data(data) => {
                    debug!(
                        "Attempting to authenticate. Read: {:?}",
                        String::from_utf8_lossy(&data)
                    );
                    output.extend(&data);
                }
                ReadOutcome::Eof => {
                    ssh_message_handler(self.host, output.as_slice())?;

                    let msg = format!(
                        "Failed to open connection to host {}. Do you need to disable \
                         `auth_strict_key`?",
                        self.host
                    );
                    error!("{}", msg);
                    return Err(TransportError::auth_failed(msg).into());
                }
            }

            let scan = scan_login_output(&output);

            if scan == LoginScan::PasswordPrompt {
                password_count += 1;
                output.reset();
                info!("Found password prompt, sending password");
                session.write(self.password.as_bytes()).await?;
                session.write(self.return_char.as_bytes()).await?;
            }

            if password_count > MAX_PASSWORD_PROMPTS {
                return Err(TransportError::auth_failed(
                    "`password` seen multiple times during session establishment, \
                     likely failed authentication",
                )
                .into());
            }

            if scan == LoginScan::GreetingStart {
                info!("Found start of server capabilities, authentication successful");
                authenticated.store(true, Ordering::Release);
                return Ok(output.take());
            }
        }
    }
}
