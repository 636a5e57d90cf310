//! Application services (use cases).
//!
//! The retry policy and resilient client make single control-plane calls
//! dependable; the resolver picks entities; workflows compose both into the
//! operations the CLI exposes.

pub mod resilient;
pub mod resolver;
pub mod retry;
pub mod workflow;
