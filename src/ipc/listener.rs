//! Socket side of the command transport.
//!
//! The daemon owns one Unix stream socket. Clients (normally
//! `tilebind-fire`, spawned by a compositor key bind) connect, write one or
//! more newline-terminated JSON [`Command`]s, and hang up:
//!
//! ```json
//! {"Chord":"ctrl+alt+left"}
//! {"Move":"centreThird"}
//! "Maximize"
//! {"NextScreen":{"keep_maximized":false}}
//! ```
//!
//! Lines that fail to decode are logged and dropped; the connection stays
//! open.

use crate::command::Command;
use crate::traits::CommandSource;
use log::{debug, info, warn};
use std::io::{BufRead, BufReader};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// Transport failures.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("socket i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot encode command: {0}")]
    Json(#[from] serde_json::Error),
}

/// Listens on a socket path and feeds decoded commands into the dispatcher's
/// channel. Connections are served one after another.
pub struct UnixSocketListener {
    socket: PathBuf,
    bound: bool,
}

/// What the reader loop should do after a connection ends.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    SinkClosed,
}

impl UnixSocketListener {
    /// The socket file is only created once [`run`](CommandSource::run)
    /// binds it.
    pub fn new(socket: impl AsRef<Path>) -> Self {
        Self {
            socket: socket.as_ref().to_path_buf(),
            bound: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.socket
    }

    fn bind(&mut self) -> Result<UnixListener, UnixSocketError> {
        // A previous daemon may have left its socket behind.
        if self.socket.exists() {
            debug!("replacing stale socket {}", self.socket.display());
            std::fs::remove_file(&self.socket)?;
        }
        let listener = UnixListener::bind(&self.socket)?;
        self.bound = true;
        info!("accepting commands on {}", self.socket.display());
        Ok(listener)
    }

    fn serve(stream: UnixStream, sink: &mpsc::Sender<Command>) -> Flow {
        for line in BufReader::new(stream).lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("dropping connection: {}", e);
                    return Flow::Continue;
                }
            };
            let Some(cmd) = decode(&line) else { continue };
            if sink.send(cmd).is_err() {
                return Flow::SinkClosed;
            }
        }
        Flow::Continue
    }
}

/// Decode one protocol line. Blank lines are ignored silently, garbage with
/// a warning.
fn decode(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(cmd) => {
            debug!("command {:?}", cmd);
            Some(cmd)
        }
        Err(e) => {
            warn!("ignoring {:?}: {}", line, e);
            None
        }
    }
}

impl CommandSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Blocks until the receiving end of `sink` goes away.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error> {
        let listener = self.bind()?;
        for conn in listener.incoming() {
            match conn {
                Ok(stream) => {
                    if Self::serve(stream, &sink) == Flow::SinkClosed {
                        info!("dispatcher gone, closing {}", self.socket.display());
                        break;
                    }
                }
                Err(e) => warn!("accept failed: {}", e),
            }
        }
        Ok(())
    }
}

impl Drop for UnixSocketListener {
    fn drop(&mut self) {
        if self.bound {
            let _ = std::fs::remove_file(&self.socket);
        }
    }
}
