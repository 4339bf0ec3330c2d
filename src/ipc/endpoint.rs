//! # Endpoint Resolver
//!
//! The receiver and the dispatcher agree on where the socket lives without
//! ever talking about it. The probe order is part of that contract:
//!
//! 1. an explicit override (`--socket`, `HUTT_SOCKET`, or `[url_handler] socket`)
//! 2. `$XDG_RUNTIME_DIR/hutt.sock`
//! 3. the per-user fallback: `/tmp/hutt-<uid>.sock` on Unix,
//!    `%TEMP%\hutt-<user>.sock` on Windows
//!
//! The first path that is a socket wins. A stale socket (file present, no
//! listener) still wins here; it fails later, at connect time. In particular
//! a stale `$XDG_RUNTIME_DIR/hutt.sock` shadows a live fallback socket, so
//! the receiver must remove its socket file when it exits.

use std::path::{Path, PathBuf};

use log::debug;

use super::DispatchError;

/// Socket file name inside `$XDG_RUNTIME_DIR`.
pub const SOCKET_NAME: &str = "hutt.sock";

/// Path of the receiver's listening socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointAddress(PathBuf);

impl EndpointAddress {
    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn into_path(self) -> PathBuf {
        self.0
    }
}

/// Ordered list of places the receiver may be listening.
#[derive(Debug, Clone)]
pub struct Resolver {
    candidates: Vec<PathBuf>,
}

impl Resolver {
    /// Builds the probe list from the process environment.
    pub fn from_env(socket_override: Option<PathBuf>) -> Self {
        let runtime_dir = std::env::var_os("XDG_RUNTIME_DIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::from_parts(socket_override, runtime_dir, fallback_path())
    }

    pub fn from_parts(
        socket_override: Option<PathBuf>,
        runtime_dir: Option<PathBuf>,
        fallback: PathBuf,
    ) -> Self {
        let mut candidates = Vec::with_capacity(3);
        candidates.extend(socket_override);
        candidates.extend(runtime_dir.map(|dir| dir.join(SOCKET_NAME)));
        candidates.push(fallback);
        Self { candidates }
    }

    pub fn with_candidates(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Returns the first candidate that is a socket. Never connects.
    pub fn resolve(&self) -> Result<EndpointAddress, DispatchError> {
        for path in &self.candidates {
            if is_endpoint(path) {
                debug!("Resolved endpoint {}", path.display());
                return Ok(EndpointAddress(path.clone()));
            }
            debug!("No socket at {}", path.display());
        }
        Err(DispatchError::NotFound {
            probed: self.candidates.clone(),
        })
    }
}

/// Per-user socket path used when `$XDG_RUNTIME_DIR` is unset or empty.
#[cfg(unix)]
pub fn fallback_path() -> PathBuf {
    // SAFETY: getuid has no preconditions and cannot fail.
    let uid = unsafe { libc::getuid() };
    PathBuf::from(format!("/tmp/hutt-{uid}.sock"))
}

/// Per-user socket path used when `$XDG_RUNTIME_DIR` is unset or empty.
#[cfg(windows)]
pub fn fallback_path() -> PathBuf {
    let user = std::env::var("USERNAME").unwrap_or_else(|_| "default".to_string());
    std::env::temp_dir().join(format!("hutt-{user}.sock"))
}

#[cfg(unix)]
fn is_endpoint(path: &Path) -> bool {
    use std::os::unix::fs::FileTypeExt;
    std::fs::metadata(path)
        .map(|m| m.file_type().is_socket())
        .unwrap_or(false)
}

// AF_UNIX sockets on Windows are reparse points that metadata() cannot
// follow, so Path::exists() reports them missing. fs::exists() counts them.
#[cfg(windows)]
fn is_endpoint(path: &Path) -> bool {
    std::fs::exists(path).unwrap_or(false)
}
