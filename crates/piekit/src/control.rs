use directories::BaseDirs;
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

const SOCKET_NAME: &str = "piedit.sock";

/// Lines understood by the editor's control socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum ControlCommand {
    Present,
    Reload,
}

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("Failed to connect to piedit at {}: {source}. Is piedit running?", .path.display())]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub fn socket_path() -> PathBuf {
    BaseDirs::new()
        .and_then(|dirs| dirs.runtime_dir().map(|d| d.join(SOCKET_NAME)))
        .unwrap_or_else(|| std::env::temp_dir().join(SOCKET_NAME))
}

pub fn send(command: ControlCommand) -> Result<(), ControlError> {
    let path = socket_path();
    let mut stream = UnixStream::connect(&path).map_err(|source| ControlError::Connect {
        path: path.clone(),
        source,
    })?;

    log::debug!("Sending '{}' to {}", command, path.display());
    writeln!(stream, "{}", command)?;
    Ok(())
}
