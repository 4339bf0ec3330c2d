//! # Platform Glue
//!
//! The OS-facing edges of the dispatcher.
//!
//! - [`notify`]: tell the user nothing is running
//! - [`delegate`]: the macOS applet that turns URL events into `argv`

pub mod delegate;
pub mod notify;
