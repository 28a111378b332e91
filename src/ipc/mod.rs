//! Command transport over a Unix socket.
//!
//! The daemon listens with [`listener::UnixSocketListener`]; the host's key
//! bindings run `tilebind-fire`, which uses [`send_command`] to forward the
//! fired chord as one line of JSON.

pub mod listener;

use crate::command::Command;
use listener::UnixSocketError;
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

/// Default socket path: `$XDG_RUNTIME_DIR/tilebind.sock`.
pub fn default_socket_path() -> PathBuf {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(runtime).join("tilebind.sock")
}

/// Connect to the daemon at `path` and send one command.
pub fn send_command(path: impl AsRef<Path>, cmd: &Command) -> Result<(), UnixSocketError> {
    let mut stream = UnixStream::connect(path.as_ref())?;
    let line = serde_json::to_string(cmd)?;
    writeln!(stream, "{}", line)?;
    stream.shutdown(std::net::Shutdown::Write)?;
    Ok(())
}
