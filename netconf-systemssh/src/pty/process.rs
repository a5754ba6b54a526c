//! `portable-pty` backed session.

use std::io::{self, Read, Write};

use bytes::Bytes;
use log::{debug, trace, warn};
use portable_pty::{Child, ChildKiller, CommandBuilder, MasterPty, PtySize, native_pty_system};
use tokio::sync::{mpsc, oneshot};

use super::{PtySession, PtySpawner, ReadOutcome, TerminalSize};
use crate::error::{Result, TransportError};

/// errno returned by a PTY master once every slave descriptor is closed.
#[cfg(unix)]
const EIO: i32 = 5;

/// Chunks buffered between the reader thread and the async side.
const READ_CHANNEL_DEPTH: usize = 64;

/// Pending writes queued for the writer thread.
const WRITE_CHANNEL_DEPTH: usize = 32;

/// A chunk for the writer thread and where to report the outcome.
struct WriteRequest {
    data: Bytes,
    reply_to: oneshot::Sender<io::Result<()>>,
}

/// Interactive process spawned on a fresh PTY.
///
/// `portable-pty` only offers a blocking reader and writer, so each side of
/// the master runs on its own thread and talks to the async side over
/// channels. Chunks are forwarded in arrival order, which keeps
/// [`PtySession::read`] cancel-safe, and a write blocked on a stalled child
/// never holds up a runtime worker.
pub struct PtyProcess {
    output: mpsc::Receiver<io::Result<ReadOutcome>>,
    input: mpsc::Sender<WriteRequest>,
    child: Box<dyn Child + Send + Sync>,
    // Closing the master hangs up the child, keep it for the session lifetime.
    _master: Box<dyn MasterPty + Send>,
    eof: bool,
}

impl PtyProcess {
    /// Spawn `command` on a new PTY of the given size.
    ///
    /// The child starts in the caller's working directory, so relative key,
    /// config and binary paths resolve the way they would in a shell.
    pub fn spawn(command: &[String], size: TerminalSize) -> Result<Self> {
        let (program, args) = command.split_first().ok_or_else(|| TransportError::Spawn {
            message: "empty command".to_string(),
        })?;

        let pair = native_pty_system()
            .openpty(PtySize {
                rows: size.height,
                cols: size.width,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| TransportError::Spawn {
                message: format!("failed to open pty: {e}"),
            })?;

        let mut cmd = CommandBuilder::new(program);
        cmd.args(args);
        cmd.cwd(std::env::current_dir().map_err(TransportError::Io)?);

        let mut child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| TransportError::Spawn {
                message: format!("failed to spawn {program}: {e}"),
            })?;
        // Only the child may hold the slave, otherwise EOF is never observed.
        drop(pair.slave);

        let (output, input) = reap_on_error(child.as_mut(), start_io(pair.master.as_ref()))?;

        debug!("spawned {:?} on pty", program);

        Ok(Self {
            output,
            input,
            child,
            _master: pair.master,
            eof: false,
        })
    }
}

type IoChannels = (
    mpsc::Receiver<io::Result<ReadOutcome>>,
    mpsc::Sender<WriteRequest>,
);

/// Attach the reader and writer threads to the master side.
fn start_io(master: &(dyn MasterPty + Send)) -> Result<IoChannels> {
    let reader = master
        .try_clone_reader()
        .map_err(|e| TransportError::Spawn {
            message: format!("failed to clone pty reader: {e}"),
        })?;
    let writer = master.take_writer().map_err(|e| TransportError::Spawn {
        message: format!("failed to take pty writer: {e}"),
    })?;

    let (output_tx, output) = mpsc::channel(READ_CHANNEL_DEPTH);
    std::thread::Builder::new()
        .name("pty-reader".to_string())
        .spawn(move || pump_output(reader, output_tx))
        .map_err(TransportError::Io)?;

    let (input, input_rx) = mpsc::channel(WRITE_CHANNEL_DEPTH);
    std::thread::Builder::new()
        .name("pty-writer".to_string())
        .spawn(move || pump_input(writer, input_rx))
        .map_err(TransportError::Io)?;

    Ok((output, input))
}

/// Kill and reap `child` when the rest of the session could not be set up.
fn reap_on_error<T>(child: &mut (dyn Child + Send + Sync), result: Result<T>) -> Result<T> {
    if result.is_err() {
        warn!("pty setup failed after spawn, killing child");
        let _ = child.kill();
        let _ = child.wait();
    }
    result
}

/// Blocking read loop run on the reader thread.
fn pump_output(mut reader: Box<dyn Read + Send>, tx: mpsc::Sender<io::Result<ReadOutcome>>) {
    let mut buf = [0u8; 4096];
    loop {
        let outcome = match reader.read(&mut buf) {
            Ok(0) => Ok(ReadOutcome::Eof),
            Ok(n) => Ok(ReadOutcome::Data(Bytes::copy_from_slice(&buf[..n]))),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            #[cfg(unix)]
            Err(e) if e.raw_os_error() == Some(EIO) => Ok(ReadOutcome::Eof),
            Err(e) => Err(e),
        };

        let done = !matches!(outcome, Ok(ReadOutcome::Data(_)));
        if tx.blocking_send(outcome).is_err() || done {
            trace!("pty reader exiting");
            return;
        }
    }
}

/// Blocking write loop run on the writer thread.
///
/// Exits once the session drops its sender, which closes the writer.
fn pump_input(mut writer: Box<dyn Write + Send>, mut rx: mpsc::Receiver<WriteRequest>) {
    while let Some(WriteRequest { data, reply_to }) = rx.blocking_recv() {
        let result = writer.write_all(&data).and_then(|()| writer.flush());
        let _ = reply_to.send(result);
    }
    trace!("pty writer exiting");
}

fn writer_gone() -> TransportError {
    TransportError::Io(io::Error::new(
        io::ErrorKind::BrokenPipe,
        "pty writer thread exited",
    ))
}

impl PtySession for PtyProcess {
    async fn read(&mut self) -> Result<ReadOutcome> {
        if self.eof {
            return Ok(ReadOutcome::Eof);
        }

        match self.output.recv().await {
            Some(Ok(ReadOutcome::Data(data))) => Ok(ReadOutcome::Data(data)),
            Some(Ok(ReadOutcome::Eof)) | None => {
                self.eof = true;
                Ok(ReadOutcome::Eof)
            }
            Some(Err(e)) => {
                self.eof = true;
                Err(TransportError::Io(e).into())
            }
        }
    }

    /// Queue `data` for the writer thread and wait until it is flushed.
    ///
    /// Writes reach the child in call order. A cancelled write may still
    /// be delivered.
    async fn write(&mut self, data: &[u8]) -> Result<()> {
        let (reply_to, flushed) = oneshot::channel();
        let request = WriteRequest {
            data: Bytes::copy_from_slice(data),
            reply_to,
        };
        self.input.send(request).await.map_err(|_| writer_gone())?;
        flushed
            .await
            .map_err(|_| writer_gone())?
            .map_err(TransportError::Io)?;
        Ok(())
    }

    fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    fn close(&mut self) -> Result<()> {
        if self.is_alive() {
            self.child.kill().map_err(TransportError::Io)?;
        }
        Ok(())
    }
}

impl Drop for PtyProcess {
    fn drop(&mut self) {
        if self.is_alive() {
            warn!("PtyProcess dropped while child still running, killing it");
            let _ = self.child.kill();
        }
    }
}

/// Spawner producing [`PtyProcess`] sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PtyProcessSpawner;

impl PtySpawner for PtyProcessSpawner {
    type Session = PtyProcess;

    fn spawn(&self, command: &[String], size: TerminalSize) -> Result<PtyProcess> {
        PtyProcess::spawn(command, size)
    }
}
