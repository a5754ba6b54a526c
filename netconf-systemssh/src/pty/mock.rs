//! Scripted in-memory PTY session for tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use bytes::Bytes;

use super::{PtySession, PtySpawner, ReadOutcome, TerminalSize};
use crate::error::{Result, TransportError};

/// One scripted read.
#[derive(Debug, Clone)]
pub(crate) enum Step {
    Data(&'static [u8]),
    Eof,
    /// Never completes.
    Hang,
}

/// Session replaying a fixed list of reads and recording every write.
///
/// Once the script is exhausted reads hang forever.
#[derive(Debug)]
pub(crate) struct ScriptedSession {
    script: VecDeque<Step>,
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
    closed: bool,
}

impl ScriptedSession {
    pub(crate) fn new(script: impl IntoIterator<Item = Step>) -> Self {
        Self {
            script: script.into_iter().collect(),
            writes: Arc::new(Mutex::new(Vec::new())),
            closed: false,
        }
    }

    /// Handle onto the recorded writes, usable after the session moves.
    pub(crate) fn writes(&self) -> Arc<Mutex<Vec<Vec<u8>>>> {
        self.writes.clone()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }
}

impl PtySession for ScriptedSession {
    async fn read(&mut self) -> Result<ReadOutcome> {
        match self.script.pop_front() {
            Some(Step::Data(data)) => Ok(ReadOutcome::Data(Bytes::from_static(data))),
            Some(Step::Eof) => Ok(ReadOutcome::Eof),
            Some(Step::Hang) | None => std::future::pending().await,
        }
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        if self.closed {
            return Err(TransportError::Disconnected.into());
        }
        self.writes.lock().unwrap().push(data.to_vec());
        Ok(())
    }

    fn is_alive(&mut self) -> bool {
        !self.closed
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

/// Spawner handing out a single pre-built [`ScriptedSession`].
#[derive(Debug)]
pub(crate) struct ScriptedSpawner {
    session: Mutex<Option<ScriptedSession>>,
    command: Arc<Mutex<Vec<String>>>,
}

impl ScriptedSpawner {
    pub(crate) fn new(session: ScriptedSession) -> Self {
        Self {
            session: Mutex::new(Some(session)),
            command: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The command tokens of the last spawn.
    pub(crate) fn command(&self) -> Vec<String> {
        self.command.lock().unwrap().clone()
    }
}

impl PtySpawner for ScriptedSpawner {
    type Session = ScriptedSession;

    fn spawn(&self, command: &[String], _size: TerminalSize) -> Result<ScriptedSession> {
        *self.command.lock().unwrap() = command.to_vec();
        self.session
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| {
                TransportError::Spawn {
                    message: "scripted session already spawned".to_string(),
                }
                .into()
            })
    }
}
