//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`transport`] - `ScriptedTransport`, a recording [`Transport`](crate::port::Transport)
//!   with queued or per-operation outcomes.
//! - [`fixtures`] - JSON builders for control-plane payloads.
//! - [`config`] - Canonical test configurations (zero-delay retry, small tables).

pub mod config;
pub mod fixtures;
pub mod transport;
