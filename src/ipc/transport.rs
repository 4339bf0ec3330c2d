//! # Transport
//!
//! One connection, one write, close. The receiver reads to EOF and parses
//! whatever it got as a single JSON document, so there is no length prefix
//! and no delimiter: the connection *is* the frame.

use std::future::Future;
use std::io;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use super::{DispatchError, EndpointAddress};
use crate::core::command::IpcCommand;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Delivers `command` to the receiver at `address`. Never reads a reply.
    async fn send(
        &self,
        address: &EndpointAddress,
        command: &IpcCommand,
    ) -> Result<(), DispatchError>;
}

/// Native local-socket transport (AF_UNIX on every platform).
pub struct SocketTransport {
    timeout: Duration,
}

impl SocketTransport {
    /// `timeout` bounds the connect and the write separately.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

/// Runs one socket step under `limit`, mapping failures onto `DispatchError`.
async fn within<T>(
    limit: Duration,
    path: &Path,
    step: impl Future<Output = io::Result<T>>,
) -> Result<T, DispatchError> {
    match tokio::time::timeout(limit, step).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(source)) if source.kind() == io::ErrorKind::TimedOut => {
            Err(DispatchError::Timeout {
                path: path.to_path_buf(),
                after: limit,
            })
        }
        Ok(Err(source)) => Err(DispatchError::ConnectFailed {
            path: path.to_path_buf(),
            source,
        }),
        Err(_) => Err(DispatchError::Timeout {
            path: path.to_path_buf(),
            after: limit,
        }),
    }
}

#[cfg(unix)]
#[async_trait]
impl Transport for SocketTransport {
    async fn send(
        &self,
        address: &EndpointAddress,
        command: &IpcCommand,
    ) -> Result<(), DispatchError> {
        use tokio::io::AsyncWriteExt;
        use tokio::net::UnixStream;

        // Encode first so a bad command never opens a connection.
        let payload = command.to_wire().map_err(DispatchError::Encode)?;
        let path = address.path();

        let mut stream = within(self.timeout, path, UnixStream::connect(path)).await?;
        within(self.timeout, path, async {
            stream.write_all(&payload).await?;
            stream.shutdown().await
        })
        .await?;

        debug!("Sent {} bytes to {}", payload.len(), path.display());
        Ok(())
    }
}

#[cfg(windows)]
#[async_trait]
impl Transport for SocketTransport {
    async fn send(
        &self,
        address: &EndpointAddress,
        command: &IpcCommand,
    ) -> Result<(), DispatchError> {
        use std::io::Write;
        use std::net::Shutdown;

        let payload = command.to_wire().map_err(DispatchError::Encode)?;
        let path = address.path();
        let write_timeout = self.timeout;

        // uds_windows blocks, and its connect takes no timeout. A detached
        // thread rather than spawn_blocking: the runtime waits for blocking
        // tasks on shutdown, so a wedged connect would outlive the timeout.
        let (tx, rx) = tokio::sync::oneshot::channel();
        let thread_path = path.to_path_buf();
        std::thread::spawn(move || {
            let result = (|| -> io::Result<usize> {
                let mut stream = uds_windows::UnixStream::connect(&thread_path)?;
                stream.set_write_timeout(Some(write_timeout))?;
                stream.write_all(&payload)?;
                stream.shutdown(Shutdown::Write)?;
                Ok(payload.len())
            })();
            let _ = tx.send(result);
        });

        let len = within(self.timeout, path, async {
            rx.await
                .map_err(|_| io::Error::other("socket thread exited without a result"))?
        })
        .await?;

        debug!("Sent {} bytes to {}", len, path.display());
        Ok(())
    }
}
