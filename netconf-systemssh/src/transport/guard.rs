//! Shared access to the PTY session.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

/// Serializes access to a session between the login routine and any other
/// transport activity (keepalives, later reads and writes).
///
/// Cloning yields another handle onto the same session.
#[derive(Debug)]
pub struct SessionGuard<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> Clone for SessionGuard<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S> SessionGuard<S> {
    /// Take ownership of `session`.
    pub fn new(session: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Wait for exclusive access. Released when the returned lock drops.
    pub async fn lock(&self) -> SessionLock<'_, S> {
        SessionLock {
            guard: self.inner.lock().await,
        }
    }

    /// Take exclusive access only if nobody holds it right now.
    pub fn try_lock(&self) -> Option<SessionLock<'_, S>> {
        self.inner
            .try_lock()
            .ok()
            .map(|guard| SessionLock { guard })
    }

    /// Whether the session is currently locked.
    pub fn is_locked(&self) -> bool {
        self.inner.try_lock().is_err()
    }
}

/// Scoped exclusive access to the session.
#[derive(Debug)]
pub struct SessionLock<'a, S> {
    guard: MutexGuard<'a, S>,
}

impl<S> Deref for SessionLock<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.guard
    }
}

impl<S> DerefMut for SessionLock<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.guard
    }
}
