//! Infrastructure layer.
//!
//! Technical concerns that support the application without containing
//! business logic.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for the control-plane client
//! - [`config`] - Configuration loading and validation

pub mod bootstrap;
pub mod config;
