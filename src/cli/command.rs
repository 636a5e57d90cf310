//! Command-line interface definitions.
//!
//! Each workflow is a subcommand of `zeabur-ops`. Global flags select the
//! config file, log level and format, and color mode.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Config file used when `--config` is not given; missing is fine.
pub const DEFAULT_CONFIG: &str = "zeabur.toml";

/// Discover, configure, and control Zeabur services
#[derive(Parser, Debug)]
#[command(name = "zeabur-ops")]
#[command(version, about)]
pub struct Cli {
    /// Path to configuration file [default: zeabur.toml]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// The config file in effect, given or default.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG))
    }
}

/// Color output mode for terminal rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show service status, deployments, variable checklist, and recent logs
    Inspect(InspectArgs),

    /// Replace the service's variables and trigger a redeploy
    Deploy(DeployArgs),

    /// Stop every running deployment of the service
    StopAll,

    /// Trigger a redeploy of the service
    Redeploy,

    /// Check that the control plane is reachable with the configured credential
    Check,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug, Default)]
pub struct InspectArgs {
    /// Fetch logs of the latest deployment
    #[arg(long, overrides_with = "no_logs")]
    pub logs: bool,

    /// Skip the log fetch
    #[arg(long)]
    pub no_logs: bool,
}

impl InspectArgs {
    /// Resolve the flag pair against the configured default.
    #[must_use]
    pub fn fetch_logs(&self, default: bool) -> bool {
        if self.no_logs {
            false
        } else if self.logs {
            true
        } else {
            default
        }
    }
}

/// Arguments for the `deploy` subcommand.
#[derive(Args, Debug, Default)]
pub struct DeployArgs {
    /// Resolve and print the plan without changing anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Subcommands for `zeabur-ops config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Load and validate the configuration file
    Validate,
}
