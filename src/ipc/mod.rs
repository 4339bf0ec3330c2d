//! # IPC
//!
//! Finding the running instance and handing it one command.
//!
//! ```text
//!   IpcCommand ──► Resolver::resolve() ──► EndpointAddress ──► Transport::send()
//!                      │                                           │
//!                      ▼                                           ▼
//!                  NotFound                              ConnectFailed / Timeout
//! ```
//!
//! The socket is owned by the receiver. Nothing here creates, removes, or
//! locks it; we only stat it and connect to it.

pub mod endpoint;
pub mod transport;

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

pub use endpoint::{EndpointAddress, Resolver};
pub use transport::{SocketTransport, Transport};

/// Errors that end a dispatch. None of them are retried.
#[derive(Debug)]
pub enum DispatchError {
    /// No candidate path holds a socket.
    NotFound { probed: Vec<PathBuf> },
    /// The socket vanished, or exists with nobody listening (stale).
    ConnectFailed { path: PathBuf, source: io::Error },
    /// Connect or write took longer than the configured bound.
    Timeout { path: PathBuf, after: Duration },
    /// The command could not be encoded as JSON.
    Encode(serde_json::Error),
}

impl DispatchError {
    /// True for the failures the user can fix by starting hutt.
    pub fn is_no_instance(&self) -> bool {
        matches!(
            self,
            DispatchError::NotFound { .. }
                | DispatchError::ConnectFailed { .. }
                | DispatchError::Timeout { .. }
        )
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::NotFound { probed } => {
                let paths: Vec<String> = probed.iter().map(|p| p.display().to_string()).collect();
                write!(f, "no running instance found (probed: {})", paths.join(", "))
            }
            DispatchError::ConnectFailed { path, source } => {
                write!(f, "failed to reach {}: {source}", path.display())
            }
            DispatchError::Timeout { path, after } => {
                write!(f, "timed out after {after:?} talking to {}", path.display())
            }
            DispatchError::Encode(e) => write!(f, "failed to encode command: {e}"),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::ConnectFailed { source, .. } => Some(source),
            DispatchError::Encode(e) => Some(e),
            _ => None,
        }
    }
}
