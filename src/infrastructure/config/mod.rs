//! Infrastructure configuration modules.

pub mod api;
pub mod deploy;
pub mod inspect;
pub mod logging;
pub mod settings;
pub mod target;

pub use settings::Config;
