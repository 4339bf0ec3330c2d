//! # Core Logic
//!
//! Everything here is pure: no sockets, no processes, no environment
//! beyond reading the config file.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • url (HuttUrl)        │
//!                    │  • command (IpcCommand) │
//!                    │  • config               │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │  Linux     │      │   macOS    │      │  Windows   │
//!     │ .desktop   │      │  applet    │      │  registry  │
//!     │  handler   │      │ (delegate) │      │  handler   │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! Every platform entry point runs the same compiler and emits the same bytes.
//!
//! ## Modules
//!
//! - [`url`]: `hutt://` parsing and formatting
//! - [`command`]: the `IpcCommand` wire envelope
//! - [`config`]: settings and their override order

pub mod command;
pub mod config;
pub mod url;
