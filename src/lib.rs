//! zeabur-ops - Discovery, configuration, and lifecycle control of Zeabur services.
//!
//! Every operation talks to the Zeabur GraphQL control plane through one
//! resilient client: bounded retries with exponential backoff, and an opt-in
//! single retry without certificate verification when TLS fails.
//!
//! # Architecture
//!
//! - **`domain`** - Projects, services, deployments, and variable sets
//! - **`port`** - The `Transport` and `ControlPlane` traits
//! - **`adapter::outbound`** - reqwest transport and the Zeabur GraphQL client
//! - **`application`** - Retry policy, entity resolution, and the workflows
//!   (inspect, configure-and-deploy, stop-all, redeploy, check)
//! - **`infrastructure`** - TOML configuration and client wiring
//! - **`cli`** - clap commands and terminal rendering
//!
//! # Example
//!
//! ```no_run
//! use zeabur_ops::application::workflow::inspect::inspect;
//! use zeabur_ops::infrastructure::bootstrap::build_client;
//! use zeabur_ops::infrastructure::config::Config;
//!
//! # async fn demo() -> zeabur_ops::error::Result<()> {
//! let config = Config::load_or_default("zeabur.toml")?;
//! let client = build_client(&config)?;
//! let report = inspect(&client, &config.target, &config.inspect, true).await?;
//! println!("{}", report.detail.status);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
