//! Best-effort desktop notifications.

use std::io;
use std::process::{Command, Stdio};

use log::debug;

pub const NO_INSTANCE_SUMMARY: &str = "No running instance found";
pub const NO_INSTANCE_BODY: &str = "Start hutt, then open the link again.";

pub trait Notifier: Send + Sync {
    fn notify(&self, summary: &str, body: &str) -> io::Result<()>;
}

/// Hands the message to the platform's notification tool and returns
/// without waiting for it.
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, summary: &str, body: &str) -> io::Result<()> {
        let mut cmd = notification_command(summary, body);
        debug!("Notifying via {:?}", cmd.get_program());
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn notification_command(summary: &str, body: &str) -> Command {
    use super::delegate::applescript_string;

    let script = format!(
        "display notification {} with title {}",
        applescript_string(body),
        applescript_string(summary)
    );
    let mut cmd = Command::new("osascript");
    cmd.arg("-e").arg(script);
    cmd
}

#[cfg(windows)]
fn notification_command(summary: &str, body: &str) -> Command {
    let mut cmd = Command::new("msg");
    cmd.args(["*", "/TIME:5"]).arg(format!("{summary}: {body}"));
    cmd
}

#[cfg(all(unix, not(target_os = "macos")))]
fn notification_command(summary: &str, body: &str) -> Command {
    let mut cmd = Command::new("notify-send");
    cmd.args(["--app-name=hutt", summary, body]);
    cmd
}
