//! Opening a NETCONF session through the system ssh binary.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use log::debug;

use super::auth::NetconfAuthenticator;
use super::command::{NetconfSubsystem, OpenCommand, SystemSshCommand};
use super::config::SystemSshConfig;
use super::guard::SessionGuard;
use super::keepalive::start_keepalive;
use crate::error::{Result, TransportError};
use crate::pty::{PtyProcessSpawner, PtySession, PtySpawner, ReadOutcome};

/// Login step run right after the session is spawned.
///
/// Returns whatever output the caller needs from the login (for NETCONF,
/// the start of the server greeting) and sets `authenticated` on success.
pub trait CredentialExchange<S: PtySession>: Send + Sync {
    fn exchange(
        &self,
        session: &SessionGuard<S>,
        config: &SystemSshConfig,
        authenticated: &AtomicBool,
    ) -> impl Future<Output = Result<Bytes>> + Send;
}

/// Answers the ssh password prompt and waits for the `<hello`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetconfPasswordExchange;

impl<S: PtySession> CredentialExchange<S> for NetconfPasswordExchange {
    async fn exchange(
        &self,
        session: &SessionGuard<S>,
        config: &SystemSshConfig,
        authenticated: &AtomicBool,
    ) -> Result<Bytes> {
        NetconfAuthenticator::from_config(config)
            .authenticate(session, authenticated)
            .await
    }
}

/// Transport driving an interactive ssh process on a PTY.
///
/// The open sequence is fixed (build command, spawn, log in, keepalive);
/// the command builder and the login step are plugged in.
pub struct SystemSshTransport<P: PtySpawner, C, X> {
    config: SystemSshConfig,
    spawner: P,
    command: C,
    exchange: X,
    session: Option<SessionGuard<P::Session>>,
    authenticated: AtomicBool,
}

/// NETCONF over system ssh: `-s netconf` subsystem plus password login.
///
/// # Example
///
/// ```rust,no_run
/// use netconf_systemssh::{NetconfSystemSshTransport, SystemSshConfig};
///
/// # async fn example() -> Result<(), netconf_systemssh::Error> {
/// let config = SystemSshConfig::new("192.168.1.1")
///     .port(830)
///     .username("admin")
///     .password("secret");
///
/// let mut transport = NetconfSystemSshTransport::new(config);
/// let greeting = transport.open_netconf().await?;
/// println!("{}", String::from_utf8_lossy(&greeting));
/// transport.close().await?;
/// # Ok(())
/// # }
/// ```
pub type NetconfSystemSshTransport<P = PtyProcessSpawner> =
    SystemSshTransport<P, NetconfSubsystem<SystemSshCommand>, NetconfPasswordExchange>;

impl NetconfSystemSshTransport {
    /// NETCONF transport spawning real PTY processes.
    pub fn new(config: SystemSshConfig) -> Self {
        Self::with_spawner(config, PtyProcessSpawner)
    }
}

impl<P: PtySpawner> NetconfSystemSshTransport<P> {
    /// NETCONF transport with a custom spawner.
    pub fn with_spawner(config: SystemSshConfig, spawner: P) -> Self {
        SystemSshTransport::from_parts(
            config,
            spawner,
            NetconfSubsystem::new(SystemSshCommand),
            NetconfPasswordExchange,
        )
    }
}

impl<P, C, X> SystemSshTransport<P, C, X>
where
    P: PtySpawner,
    C: OpenCommand,
    X: CredentialExchange<P::Session>,
{
    /// Assemble a transport from its collaborators.
    pub fn from_parts(config: SystemSshConfig, spawner: P, command: C, exchange: X) -> Self {
        Self {
            config,
            spawner,
            command,
            exchange,
            session: None,
            authenticated: AtomicBool::new(false),
        }
    }

    /// The configuration of this transport.
    pub fn config(&self) -> &SystemSshConfig {
        &self.config
    }

    /// Command tokens used to spawn the ssh process.
    pub fn open_cmd(&self) -> Vec<String> {
        self.command.build(&self.config)
    }

    /// Spawn the session and log in.
    ///
    /// Returns the bytes captured during login; for NETCONF these start
    /// with the server's `<hello>` and must go to the capabilities parser
    /// unchanged. If a keepalive is configured it is started afterwards,
    /// and its failure is returned.
    ///
    /// After a failed attempt the session is kept so the caller can
    /// [`close`](Self::close) it; a new attempt needs a fresh session.
    pub async fn open_netconf(&mut self) -> Result<Bytes> {
        self.config.validate()?;
        if self.session.is_some() {
            return Err(TransportError::AlreadyOpen.into());
        }

        let login_bytes = self.open_pty().await?;

        if let Some(ref keepalive) = self.config.keepalive {
            start_keepalive(keepalive)?;
        }

        Ok(login_bytes)
    }

    async fn open_pty(&mut self) -> Result<Bytes> {
        let cmd = self.open_cmd();
        let session = self.spawner.spawn(&cmd, self.config.terminal_size)?;
        debug!("Session to host {} spawned", self.config.host);

        let guard = SessionGuard::new(session);
        self.session = Some(guard.clone());

        let login_bytes = self
            .exchange
            .exchange(&guard, &self.config, &self.authenticated)
            .await?;
        debug!("Authenticated to host {} successfully", self.config.host);

        Ok(login_bytes)
    }

    /// Whether login completed on the current session.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Acquire)
    }

    /// Whether the ssh process is still running.
    ///
    /// A session locked by someone else is assumed alive.
    pub fn is_alive(&self) -> bool {
        match self.session.as_ref() {
            Some(guard) => guard.try_lock().is_none_or(|mut session| session.is_alive()),
            None => false,
        }
    }

    /// Handle onto the shared session, for components running alongside
    /// the transport.
    pub fn session(&self) -> Option<SessionGuard<P::Session>> {
        self.session.clone()
    }

    fn authenticated_session(&self) -> Result<&SessionGuard<P::Session>> {
        let guard = self.session.as_ref().ok_or(TransportError::NotOpen)?;
        if !self.is_authenticated() {
            return Err(TransportError::NotAuthenticated.into());
        }
        Ok(guard)
    }

    /// Read the next chunk after login.
    pub async fn read(&self) -> Result<Bytes> {
        let mut session = self.authenticated_session()?.lock().await;
        match session.read().await? {
            ReadOutcome::Data(data) => Ok(data),
            ReadOutcome::Eof => Err(TransportError::Disconnected.into()),
        }
    }

    /// Write raw bytes after login.
    pub async fn write(&self, data: &[u8]) -> Result<()> {
        let mut session = self.authenticated_session()?.lock().await;
        session.write(data).await
    }

    /// Terminate the ssh process and forget the session.
    pub async fn close(&mut self) -> Result<()> {
        self.authenticated.store(false, Ordering::Release);
        if let Some(guard) = self.session.take() {
            guard.lock().await.close()?;
            debug!("Session to host {} closed", self.config.host);
        }
        Ok(())
    }
}
