//! # IPC Commands
//!
//! The one message a dispatcher writes to the running instance.
//!
//! Wire format is a single compact JSON object, one per connection:
//!
//! ```text
//! {"type":"Open","kind":"Message","id":"..."}
//! {"type":"Open","kind":"Thread","id":"..."}
//! {"type":"Open","kind":"Search","query":"..."}
//! {"type":"Open","kind":"Compose","to":"...","subject":"..."}
//! {"type":"Navigate","folder":"..."}
//! {"type":"Quit"}
//! ```
//!
//! `type` selects the command, `kind` selects the [`HuttUrl`] variant of an
//! `Open`. Both are flattened into the same object by serde's internal tagging,
//! so new commands can be added without touching the envelope shape.

use serde::{Deserialize, Serialize};

use super::url::{HuttUrl, strip_scheme};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum IpcCommand {
    /// Open a message, thread, search, or compose window.
    Open(HuttUrl),
    /// Switch the running instance to a folder.
    Navigate { folder: String },
    Quit,
}

impl IpcCommand {
    /// Encodes the command exactly as it goes on the wire: compact, no trailing newline.
    pub fn to_wire(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Compiles a URL with its scheme already stripped. Never fails.
pub fn compile(rest: &str) -> IpcCommand {
    IpcCommand::Open(HuttUrl::parse(rest))
}

/// Compiles a full `hutt://...` URL as delivered by the OS.
pub fn compile_url(url: &str) -> IpcCommand {
    compile(strip_scheme(url))
}
