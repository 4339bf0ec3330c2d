//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::core::command::IpcCommand;
use crate::ipc::{DispatchError, EndpointAddress, Transport};
use crate::platform::notify::Notifier;

/// Remembers every notification instead of showing it.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, summary: &str, body: &str) -> io::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((summary.to_string(), body.to_string()));
        Ok(())
    }
}

impl Notifier for Arc<RecordingNotifier> {
    fn notify(&self, summary: &str, body: &str) -> io::Result<()> {
        self.as_ref().notify(summary, body)
    }
}

/// A notifier whose backend is never available.
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(&self, _summary: &str, _body: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::NotFound, "notify-send: not found"))
    }
}

/// A transport whose receiver never answers within the bound.
pub struct TimingOutTransport {
    pub after: Duration,
}

#[async_trait]
impl Transport for TimingOutTransport {
    async fn send(
        &self,
        address: &EndpointAddress,
        _command: &IpcCommand,
    ) -> Result<(), DispatchError> {
        Err(DispatchError::Timeout {
            path: address.path().to_path_buf(),
            after: self.after,
        })
    }
}

/// Accepts a single connection and returns everything written before EOF.
#[cfg(unix)]
pub async fn capture_one(listener: tokio::net::UnixListener) -> Vec<u8> {
    use tokio::io::AsyncReadExt;

    let (mut stream, _addr) = listener.accept().await.unwrap();
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    buf
}
