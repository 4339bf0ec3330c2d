//! hutt-open library exports for testing

pub mod core;
pub mod dispatch;
pub mod ipc;
pub mod platform;

#[cfg(test)]
pub mod test_support;
