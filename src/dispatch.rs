//! # Dispatch
//!
//! The whole run, start to finish:
//!
//! ```text
//! input ──► compile ──► resolve ──► send ──► exit
//!               │           │          │
//!               │        NotFound   ConnectFailed
//!               ▼           └────┬─────┘
//!      empty input: Skipped      ▼
//!                          notify (best effort), Err
//! ```
//!
//! One straight line per process. No retries: clicking the link again is the retry.

use std::path::PathBuf;

use log::{debug, info, warn};

use crate::core::command::{IpcCommand, compile_url};
use crate::core::url::strip_scheme;
use crate::ipc::{DispatchError, Resolver, Transport};
use crate::platform::notify::{NO_INSTANCE_BODY, NO_INSTANCE_SUMMARY, Notifier};

/// What the dispatcher was asked to deliver.
#[derive(Debug, Clone)]
pub enum Request {
    /// A `hutt://` URL as handed over by the OS. May be empty.
    Url(String),
    /// A ready-made command (`--navigate`, `--quit`).
    Command(IpcCommand),
}

impl Request {
    /// Compiles the request. `None` means there is nothing to send.
    pub fn into_command(self) -> Option<IpcCommand> {
        match self {
            Request::Url(url) => {
                let url = url.trim();
                if strip_scheme(url).is_empty() {
                    None
                } else {
                    Some(compile_url(url))
                }
            }
            Request::Command(cmd) => Some(cmd),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Empty input; nothing was resolved or sent.
    Skipped,
    /// The command was written to this socket.
    Delivered(PathBuf),
}

pub struct Dispatcher {
    resolver: Resolver,
    transport: Box<dyn Transport>,
    notifier: Box<dyn Notifier>,
    notify: bool,
}

impl Dispatcher {
    pub fn new(
        resolver: Resolver,
        transport: Box<dyn Transport>,
        notifier: Box<dyn Notifier>,
        notify: bool,
    ) -> Self {
        Self {
            resolver,
            transport,
            notifier,
            notify,
        }
    }

    pub async fn run(&self, request: Request) -> Result<Outcome, DispatchError> {
        let Some(command) = request.into_command() else {
            info!("No URL given, nothing to do");
            return Ok(Outcome::Skipped);
        };
        debug!("Compiled command: {:?}", command);

        let address = self.resolver.resolve().inspect_err(|e| self.report(e))?;

        self.transport
            .send(&address, &command)
            .await
            .inspect_err(|e| self.report(e))?;

        info!("Delivered to {}", address.path().display());
        Ok(Outcome::Delivered(address.into_path()))
    }

    fn report(&self, error: &DispatchError) {
        warn!("{error}");
        if !self.notify || !error.is_no_instance() {
            return;
        }
        if let Err(e) = self.notifier.notify(NO_INSTANCE_SUMMARY, NO_INSTANCE_BODY) {
            debug!("Notification failed: {e}");
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::ipc::SocketTransport;
    use crate::test_support::{
        FailingNotifier, RecordingNotifier, TimingOutTransport, capture_one,
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::net::UnixListener;

    fn dispatcher(
        candidates: Vec<PathBuf>,
        notifier: Box<dyn Notifier>,
        notify: bool,
    ) -> Dispatcher {
        Dispatcher::new(
            Resolver::with_candidates(candidates),
            Box::new(SocketTransport::new(Duration::from_secs(2))),
            notifier,
            notify,
        )
    }

    #[test]
    fn test_empty_input_compiles_to_nothing() {
        assert!(Request::Url(String::new()).into_command().is_none());
        assert!(Request::Url("  \n".to_string()).into_command().is_none());
        assert!(Request::Url("hutt://".to_string()).into_command().is_none());
        assert!(Request::Url("hutt://x".to_string()).into_command().is_some());
    }

    #[tokio::test]
    async fn test_empty_input_is_skipped_without_probing() {
        let notifier = Arc::new(RecordingNotifier::default());
        // No candidates at all: resolving would fail, so Skipped proves we never tried.
        let d = dispatcher(vec![], Box::new(notifier.clone()), true);
        assert_eq!(d.run(Request::Url(String::new())).await.unwrap(), Outcome::Skipped);
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_not_found_notifies_once() {
        let dir = TempDir::new().unwrap();
        let notifier = Arc::new(RecordingNotifier::default());
        let d = dispatcher(vec![dir.path().join("hutt.sock")], Box::new(notifier.clone()), true);

        let err = d
            .run(Request::Url("hutt://message/abc".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::NotFound { .. }));
        assert_eq!(
            notifier.messages(),
            vec![(NO_INSTANCE_SUMMARY.to_string(), NO_INSTANCE_BODY.to_string())]
        );
    }

    #[tokio::test]
    async fn test_notify_disabled_stays_quiet() {
        let dir = TempDir::new().unwrap();
        let notifier = Arc::new(RecordingNotifier::default());
        let d = dispatcher(vec![dir.path().join("hutt.sock")], Box::new(notifier.clone()), false);

        assert!(d.run(Request::Url("hutt://thread/t".to_string())).await.is_err());
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_notifier_failure_does_not_change_the_error() {
        let dir = TempDir::new().unwrap();
        let d = dispatcher(vec![dir.path().join("hutt.sock")], Box::new(FailingNotifier), true);

        let err = d
            .run(Request::Url("hutt://thread/t".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_stale_socket_notifies_like_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hutt.sock");
        drop(std::os::unix::net::UnixListener::bind(&path).unwrap());
        let notifier = Arc::new(RecordingNotifier::default());
        let d = dispatcher(vec![path], Box::new(notifier.clone()), true);

        let err = d
            .run(Request::Url("hutt://search/x".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::ConnectFailed { .. }));
        assert_eq!(notifier.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_timeout_notifies_like_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hutt.sock");
        let _wedged = std::os::unix::net::UnixListener::bind(&path).unwrap();
        let notifier = Arc::new(RecordingNotifier::default());
        let d = Dispatcher::new(
            Resolver::with_candidates(vec![path.clone()]),
            Box::new(TimingOutTransport {
                after: Duration::from_secs(3),
            }),
            Box::new(notifier.clone()),
            true,
        );

        let err = d
            .run(Request::Url("hutt://message/abc".to_string()))
            .await
            .unwrap_err();
        match err {
            DispatchError::Timeout { path: timed_out, after } => {
                assert_eq!(timed_out, path);
                assert_eq!(after, Duration::from_secs(3));
            }
            other => panic!("expected Timeout, got {other:?}"),
        }
        assert_eq!(
            notifier.messages(),
            vec![(NO_INSTANCE_SUMMARY.to_string(), NO_INSTANCE_BODY.to_string())]
        );
    }

    #[tokio::test]
    async fn test_delivers_ready_made_command() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hutt.sock");
        let receiver = tokio::spawn(capture_one(UnixListener::bind(&path).unwrap()));
        let d = dispatcher(vec![path.clone()], Box::new(RecordingNotifier::default()), true);

        let outcome = d
            .run(Request::Command(IpcCommand::Navigate {
                folder: "/Archive".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Delivered(path));
        assert_eq!(
            receiver.await.unwrap(),
            br#"{"type":"Navigate","folder":"/Archive"}"#.to_vec()
        );
    }
}
